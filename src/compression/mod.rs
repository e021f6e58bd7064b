//! Section codec capability.
//!
//! The container layer only knows a section's stored and declared lengths;
//! which codec turns one into the other is injected through
//! [`SectionCodec`].

mod lzss;

pub use lzss::Lzss;

use alloc::vec::Vec;

use crate::error::AgfError;

/// Compress and decompress AGF section payloads.
pub trait SectionCodec: Send + Sync {
    /// Decompress `input`, producing `original_length` bytes.
    ///
    /// Implementations may return a shorter buffer when the input runs
    /// out; the container layer reports that as
    /// [`AgfError::DecompressionLengthMismatch`].
    fn decompress(&self, input: &[u8], original_length: usize) -> Result<Vec<u8>, AgfError>;

    /// Compress `input`.
    fn compress(&self, input: &[u8]) -> Result<Vec<u8>, AgfError>;
}

impl<C: SectionCodec + ?Sized> SectionCodec for &C {
    fn decompress(&self, input: &[u8], original_length: usize) -> Result<Vec<u8>, AgfError> {
        (**self).decompress(input, original_length)
    }

    fn compress(&self, input: &[u8]) -> Result<Vec<u8>, AgfError> {
        (**self).compress(input)
    }
}
