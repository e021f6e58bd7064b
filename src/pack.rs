//! BMP back to AGF, using the context of the original container.

use alloc::vec::Vec;

use enough::Stop;

use crate::agf::{AgfImage, AlphaPlane, ContainerType};
use crate::bmp::BmpFile;
use crate::compression::{Lzss, SectionCodec};
use crate::context::DecodingContext;
use crate::error::AgfError;
use crate::palette::{PaletteBuilder, PaletteMode};
use crate::transcode::{encode_plain, encode_with_alpha};

/// Settings shared by every pack in a batch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PackOptions {
    pub palette_mode: PaletteMode,
    /// Compress sections with the codec when that makes them smaller.
    pub compress: bool,
}

/// Builder for packing one BMP into an AGF file.
///
/// The container header, embedded BMP headers, alpha header and section
/// lengths all come from `context`, so an unmodified BMP packs back to the
/// exact bytes of the original (uncompressed) container.
#[derive(Clone, Copy)]
pub struct PackRequest<'a> {
    context: &'a DecodingContext,
    palette_mode: PaletteMode,
    codec: &'a dyn SectionCodec,
    compress: bool,
}

impl<'a> PackRequest<'a> {
    pub fn new(context: &'a DecodingContext) -> Self {
        Self {
            context,
            palette_mode: PaletteMode::default(),
            codec: &Lzss,
            compress: false,
        }
    }

    pub fn with_options(self, options: PackOptions) -> Self {
        self.palette_mode(options.palette_mode)
            .compress_sections(options.compress)
    }

    /// Start indexed encodes from the original palette (default) or empty.
    pub fn palette_mode(mut self, mode: PaletteMode) -> Self {
        self.palette_mode = mode;
        self
    }

    pub fn with_codec(mut self, codec: &'a dyn SectionCodec) -> Self {
        self.codec = codec;
        self
    }

    /// Store sections compressed where that saves space. Off by default.
    pub fn compress_sections(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Encode `bmp` and serialize the container.
    pub fn pack(&self, bmp: &[u8], stop: impl Stop) -> Result<Vec<u8>, AgfError> {
        self.pack_inner(bmp, &stop)
    }

    pub(crate) fn pack_inner(&self, bmp: &[u8], stop: &dyn Stop) -> Result<Vec<u8>, AgfError> {
        stop.check()?;
        let bmp = BmpFile::parse(bmp)?;
        let template = self.context.image();
        let geometry = self.context.geometry();

        let (pixels, palette, alpha) = match self.context.container_type() {
            ContainerType::TrueColorWithAlpha32 => {
                if bmp.info.bit_count != 32 {
                    return Err(AgfError::BitDepthMismatch {
                        expected: 32,
                        actual: bmp.info.bit_count,
                    });
                }
                let actual = (bmp.info.width, bmp.info.height);
                let expected = (geometry.width, geometry.height);
                if actual != expected {
                    return Err(AgfError::GeometryMismatch { expected, actual });
                }

                let mut builder = PaletteBuilder::with_mode(self.palette_mode, &template.palette);
                let (pixels, alpha) = encode_with_alpha(bmp.pixels(), template, &mut builder, stop)?;
                let palette = if geometry.bit_count == 8 {
                    builder.finish()
                } else {
                    template.palette.clone()
                };
                (pixels, palette, Some(alpha))
            }
            ContainerType::TrueColor24 => {
                let (pixels, palette) = encode_plain(&bmp, template)?;
                if (bmp.info.width, bmp.info.height) != (geometry.width, geometry.height) {
                    log::warn!(
                        "BMP is {}x{} but the original AGF headers say {}x{}; keeping the original headers",
                        bmp.info.width,
                        bmp.info.height,
                        geometry.width,
                        geometry.height
                    );
                }
                (pixels, palette, None)
            }
        };

        let alpha = match (&template.alpha, alpha) {
            (Some(original), Some(data)) => Some(AlphaPlane {
                header: original.header,
                data,
            }),
            _ => None,
        };
        let image = AgfImage {
            header: template.header,
            bitmap: template.bitmap,
            palette,
            pixels,
            alpha,
            sections: template.sections.clone(),
        };
        image.write(self.compress.then_some(self.codec))
    }
}
