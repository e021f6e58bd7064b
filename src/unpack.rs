//! AGF to BMP.

use enough::Stop;

use crate::agf::{AgfImage, ContainerType};
use crate::bmp::encode_bmp;
use crate::compression::{Lzss, SectionCodec};
use crate::context::{DecodingContext, Unpacked};
use crate::error::AgfError;
use crate::limits::Limits;
use crate::pixel::PixelLayout;
use crate::transcode::decode_with_alpha;

/// Builder for unpacking one AGF file.
///
/// ```no_run
/// use agfbmp::{UnpackRequest, Unstoppable};
///
/// let agf: &[u8] = &[]; // AGF file contents
/// let unpacked = UnpackRequest::new(agf).unpack(Unstoppable)?;
/// std::fs::write("out.bmp", &unpacked.bmp)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Copy)]
pub struct UnpackRequest<'a> {
    data: &'a [u8],
    limits: Option<&'a Limits>,
    codec: &'a dyn SectionCodec,
}

impl<'a> UnpackRequest<'a> {
    /// Unpack `data` with the built-in [`Lzss`] codec and no limits.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            limits: None,
            codec: &Lzss,
        }
    }

    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Codec used for compressed sections.
    pub fn with_codec(mut self, codec: &'a dyn SectionCodec) -> Self {
        self.codec = codec;
        self
    }

    /// Parse the container without producing a BMP.
    pub fn context(&self, stop: impl Stop) -> Result<DecodingContext, AgfError> {
        self.read_context(&stop)
    }

    pub(crate) fn read_context(&self, stop: &dyn Stop) -> Result<DecodingContext, AgfError> {
        let image = AgfImage::read(self.data, self.codec, self.limits, stop)?;
        DecodingContext::new(image)
    }

    /// Parse the container and build the BMP.
    ///
    /// Alpha containers produce a 32-bit BMP with color and alpha planes
    /// joined. Other containers store their pixel plane unchanged, preceded
    /// by the palette when it is 8-bit.
    pub fn unpack(&self, stop: impl Stop) -> Result<Unpacked, AgfError> {
        self.unpack_inner(&stop)
    }

    pub(crate) fn unpack_inner(&self, stop: &dyn Stop) -> Result<Unpacked, AgfError> {
        let context = self.read_context(stop)?;
        let geometry = context.geometry();

        let (bmp, layout, pixels_len) = match context.container_type() {
            ContainerType::TrueColorWithAlpha32 => {
                if let Some(limits) = self.limits {
                    limits.check_memory(geometry.plane_len(4)?)?;
                }
                let alpha = context.alpha().ok_or_else(|| {
                    AgfError::InvalidHeader("alpha container without an alpha plane".into())
                })?;
                let bgra = decode_with_alpha(
                    geometry,
                    context.pixels(),
                    context.palette(),
                    &alpha.data,
                    stop,
                )?;
                let bmp = encode_bmp(
                    &bgra,
                    geometry.width,
                    geometry.height,
                    PixelLayout::Bgra8,
                    None,
                )?;
                (bmp, PixelLayout::Bgra8, bgra.len())
            }
            ContainerType::TrueColor24 => {
                let layout = PixelLayout::from_bit_count(geometry.bit_count)?;
                let palette = (layout == PixelLayout::Indexed8).then(|| context.palette());
                let bmp = encode_bmp(
                    context.pixels(),
                    geometry.width,
                    geometry.height,
                    layout,
                    palette,
                )?;
                (bmp, layout, context.pixels().len())
            }
        };
        log::debug!(
            "unpacked {:?} {}x{} to {}-bit BMP ({} bytes)",
            context.container_type(),
            geometry.width,
            geometry.height,
            layout.bits_per_pixel(),
            bmp.len()
        );

        let pixel_offset = bmp.len() - pixels_len;
        Ok(Unpacked {
            bmp,
            context,
            layout,
            pixel_offset,
        })
    }
}
