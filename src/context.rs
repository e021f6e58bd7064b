use alloc::vec::Vec;

use crate::agf::{AgfImage, AlphaPlane, ContainerHeader, ContainerType, EmbeddedHeaders};
use crate::dib::PaletteEntry;
use crate::error::AgfError;
use crate::pixel::{Geometry, PixelLayout};

/// Everything read from an original AGF file that a later pack needs.
///
/// Created per source file by [`crate::UnpackRequest::context`] or
/// [`crate::UnpackRequest::unpack`] and handed to [`crate::PackRequest`].
/// Nothing is shared between contexts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodingContext {
    image: AgfImage,
    container_type: ContainerType,
}

impl DecodingContext {
    pub(crate) fn new(image: AgfImage) -> Result<Self, AgfError> {
        let container_type = image.container_type()?;
        Ok(Self {
            image,
            container_type,
        })
    }

    pub fn container_type(&self) -> ContainerType {
        self.container_type
    }

    pub fn header(&self) -> &ContainerHeader {
        &self.image.header
    }

    /// BMP headers embedded in section 1, pad bytes included.
    pub fn bitmap(&self) -> &EmbeddedHeaders {
        &self.image.bitmap
    }

    pub fn geometry(&self) -> Geometry {
        self.image.geometry()
    }

    pub fn palette(&self) -> &[PaletteEntry] {
        &self.image.palette
    }

    /// Section 2 as stored, after decompression.
    pub fn pixels(&self) -> &[u8] {
        &self.image.pixels
    }

    pub fn alpha(&self) -> Option<&AlphaPlane> {
        self.image.alpha.as_ref()
    }

    pub fn image(&self) -> &AgfImage {
        &self.image
    }

    pub fn into_image(self) -> AgfImage {
        self.image
    }
}

/// Result of unpacking one AGF file: the BMP bytes and the context needed to
/// pack it again.
#[derive(Clone, Debug)]
pub struct Unpacked {
    /// Complete BMP file.
    pub bmp: Vec<u8>,
    pub context: DecodingContext,
    pub(crate) layout: PixelLayout,
    pub(crate) pixel_offset: usize,
}

impl Unpacked {
    /// Pixel layout of the BMP: [`PixelLayout::Bgra8`] for alpha containers,
    /// otherwise the original bit depth.
    pub fn layout(&self) -> PixelLayout {
        self.layout
    }

    /// BMP pixel data, after the headers and palette.
    pub fn pixels(&self) -> &[u8] {
        &self.bmp[self.pixel_offset..]
    }

    /// Typed view of an alpha container's interleaved pixels.
    ///
    /// Returns [`AgfError::BitDepthMismatch`] unless the BMP is 32-bit.
    #[cfg(feature = "rgb")]
    pub fn as_bgra(&self) -> Result<&[rgb::alt::BGRA<u8>], AgfError> {
        use rgb::AsPixels as _;

        if self.layout != PixelLayout::Bgra8 {
            return Err(AgfError::BitDepthMismatch {
                expected: 32,
                actual: self.layout.bits_per_pixel(),
            });
        }
        Ok(self.pixels().as_pixels())
    }
}
