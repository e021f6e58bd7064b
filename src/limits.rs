use crate::error::AgfError;

/// Resource limits applied while unpacking an AGF file.
///
/// All fields default to `None` (no limit).
#[derive(Clone, Debug, Default)]
pub struct Limits {
    pub max_width: Option<u64>,
    pub max_height: Option<u64>,
    /// Maximum pixel count (width * height).
    pub max_pixels: Option<u64>,
    /// Maximum bytes for any single decompressed or decoded buffer.
    pub max_memory_bytes: Option<u64>,
}

impl Limits {
    /// Check image dimensions. Heights are compared by magnitude since
    /// top-down DIBs carry a negative height.
    pub(crate) fn check(&self, width: i32, height: i32) -> Result<(), AgfError> {
        let w = u64::from(width.unsigned_abs());
        let h = u64::from(height.unsigned_abs());
        if let Some(max_w) = self.max_width {
            if w > max_w {
                return Err(AgfError::LimitExceeded(alloc::format!(
                    "width {w} exceeds limit {max_w}"
                )));
            }
        }
        if let Some(max_h) = self.max_height {
            if h > max_h {
                return Err(AgfError::LimitExceeded(alloc::format!(
                    "height {h} exceeds limit {max_h}"
                )));
            }
        }
        if let Some(max_px) = self.max_pixels {
            let pixels = w * h;
            if pixels > max_px {
                return Err(AgfError::LimitExceeded(alloc::format!(
                    "pixel count {pixels} exceeds limit {max_px}"
                )));
            }
        }
        Ok(())
    }

    /// Check that an allocation size is within memory limits.
    pub(crate) fn check_memory(&self, bytes: usize) -> Result<(), AgfError> {
        if let Some(max_mem) = self.max_memory_bytes {
            if bytes as u64 > max_mem {
                return Err(AgfError::LimitExceeded(alloc::format!(
                    "allocation {bytes} bytes exceeds memory limit {max_mem}"
                )));
            }
        }
        Ok(())
    }
}
