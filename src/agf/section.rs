//! Section framing: a [`SectionHeader`] followed by `length` payload bytes.

use alloc::vec::Vec;

use super::header::SectionHeader;
use crate::compression::SectionCodec;
use crate::cursor::{Cursor, Record};
use crate::error::AgfError;
use crate::limits::Limits;

/// Read one section, decompressing it when its stored length differs from
/// its declared length.
pub(crate) fn read_section(
    cursor: &mut Cursor<'_>,
    codec: &dyn SectionCodec,
    limits: Option<&Limits>,
) -> Result<(SectionHeader, Vec<u8>), AgfError> {
    let header: SectionHeader = cursor.read_record()?;
    let payload = cursor.read_bytes(header.length as usize)?;
    let expected = header.original_length as usize;
    if let Some(limits) = limits {
        limits.check_memory(expected)?;
    }

    if !header.is_compressed() {
        return Ok((header, payload.to_vec()));
    }

    let data = codec.decompress(payload, expected)?;
    if data.len() != expected {
        return Err(AgfError::DecompressionLengthMismatch {
            expected,
            actual: data.len(),
        });
    }
    log::debug!(
        "section decompressed: {} -> {} bytes",
        header.length,
        header.original_length
    );
    Ok((header, data))
}

/// Write one section.
///
/// Sections are stored raw unless `codec` is given and produces something
/// strictly shorter; a compressed payload as long as the original would be
/// read back as raw. `original_length2` is copied from `previous` when the
/// payload size is unchanged.
pub(crate) fn write_section(
    out: &mut Vec<u8>,
    payload: &[u8],
    previous: Option<&SectionHeader>,
    codec: Option<&dyn SectionCodec>,
) -> Result<(), AgfError> {
    let original_length = u32::try_from(payload.len()).map_err(|_| {
        AgfError::InvalidData(alloc::format!("section of {} bytes", payload.len()))
    })?;
    let original_length2 = match previous {
        Some(prev) if prev.original_length == original_length => prev.original_length2,
        _ => original_length,
    };

    let compressed = match codec {
        Some(codec) => Some(codec.compress(payload)?).filter(|c| c.len() < payload.len()),
        None => None,
    };
    let stored = compressed.as_deref().unwrap_or(payload);

    SectionHeader {
        original_length,
        original_length2,
        length: stored.len() as u32,
    }
    .write(out);
    out.extend_from_slice(stored);
    Ok(())
}
