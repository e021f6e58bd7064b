use alloc::string::String;
use enough::StopReason;

/// Errors from AGF/BMP unpacking and packing.
///
/// Every variant is a per-file failure: batch runs log it, count it and
/// move on to the next file.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AgfError {
    #[error("unsupported AGF container type {0} (only 1 = 24-bit and 2 = 32-bit are supported)")]
    UnsupportedContainerType(u32),

    #[error("decompressed section is {actual} bytes, header declares {expected}")]
    DecompressionLengthMismatch { expected: usize, actual: usize },

    #[error("a palette is required to write an 8-bit BMP")]
    MissingPaletteForIndexedImage,

    #[error("packing requires the decoding context of the original AGF file")]
    MissingOriginalContainer,

    #[error("unrecognized format magic bytes")]
    UnrecognizedFormat,

    #[error("invalid header: {0}")]
    InvalidHeader(String),

    #[error("invalid pixel data: {0}")]
    InvalidData(String),

    #[error("bit depth mismatch: original AGF is {expected}-bit, BMP is {actual}-bit")]
    BitDepthMismatch { expected: u16, actual: u16 },

    #[error("geometry mismatch: original AGF is {expected:?}, BMP is {actual:?}")]
    GeometryMismatch {
        expected: (i32, i32),
        actual: (i32, i32),
    },

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: i32, height: i32 },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("buffer too small: need {needed} bytes, got {actual}")]
    BufferTooSmall { needed: usize, actual: usize },

    #[cfg(feature = "std")]
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("operation cancelled")]
    Cancelled(StopReason),
}

impl From<StopReason> for AgfError {
    fn from(r: StopReason) -> Self {
        AgfError::Cancelled(r)
    }
}
