use crate::error::AgfError;

/// Pixel memory layout of a plane.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelLayout {
    /// One palette index per pixel, rows padded to 4 bytes.
    Indexed8,
    /// 3 channels, 8-bit B,G,R, rows padded to 4 bytes.
    Bgr8,
    /// 4 channels, 8-bit B,G,R,A. The canonical interchange layout.
    Bgra8,
}

impl PixelLayout {
    /// Layout for a DIB `biBitCount`.
    pub fn from_bit_count(bit_count: u16) -> Result<Self, AgfError> {
        match bit_count {
            8 => Ok(Self::Indexed8),
            24 => Ok(Self::Bgr8),
            32 => Ok(Self::Bgra8),
            other => Err(AgfError::InvalidHeader(alloc::format!(
                "unsupported bit depth {other}"
            ))),
        }
    }

    /// Bytes per pixel for this layout.
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            Self::Indexed8 => 1,
            Self::Bgr8 => 3,
            Self::Bgra8 => 4,
        }
    }

    pub fn bits_per_pixel(&self) -> u16 {
        self.bytes_per_pixel() as u16 * 8
    }
}

/// Row stride of a DIB plane: `((width * bpp / 8) + 3) & !3`.
pub fn stride(width: u32, bits_per_pixel: u16) -> usize {
    ((width as usize * bits_per_pixel as usize / 8) + 3) & !3
}

/// Width, height and bit depth of a DIB.
///
/// `height` keeps the BMP sign convention: positive means bottom-up rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Geometry {
    pub width: i32,
    pub height: i32,
    pub bit_count: u16,
}

impl Geometry {
    pub fn stride(&self) -> usize {
        stride(self.width.unsigned_abs(), self.bit_count)
    }

    /// Column count, rejecting negative widths.
    pub(crate) fn columns(&self) -> Result<usize, AgfError> {
        usize::try_from(self.width).map_err(|_| {
            AgfError::InvalidHeader(alloc::format!("negative width {}", self.width))
        })
    }

    /// Row count, whatever the row order.
    pub(crate) fn rows(&self) -> usize {
        self.height.unsigned_abs() as usize
    }

    /// `columns * rows * bytes`, failing on overflow.
    pub(crate) fn plane_len(&self, bytes_per_pixel: usize) -> Result<usize, AgfError> {
        self.columns()?
            .checked_mul(self.rows())
            .and_then(|n| n.checked_mul(bytes_per_pixel))
            .ok_or(AgfError::DimensionsTooLarge {
                width: self.width,
                height: self.height,
            })
    }

    /// `stride * rows`, failing on overflow.
    pub(crate) fn padded_len(&self) -> Result<usize, AgfError> {
        self.stride()
            .checked_mul(self.rows())
            .ok_or(AgfError::DimensionsTooLarge {
                width: self.width,
                height: self.height,
            })
    }
}
