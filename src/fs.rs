//! Whole-file unpack, pack and repack.
//!
//! Inputs are read completely before anything is written, so a file that
//! fails to parse never leaves an output behind.

use std::fs;
use std::path::Path;

use enough::Stop;

use crate::context::DecodingContext;
use crate::error::AgfError;
use crate::limits::Limits;
use crate::pack::{PackOptions, PackRequest};
use crate::unpack::UnpackRequest;

/// Write `data` to `path`, creating missing parent directories.
pub(crate) fn write_file(path: &Path, data: &[u8]) -> Result<(), AgfError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, data)?;
    Ok(())
}

/// Parse an AGF file into a [`DecodingContext`] without writing anything.
pub fn read_context(
    path: &Path,
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<DecodingContext, AgfError> {
    let data = fs::read(path)?;
    let mut request = UnpackRequest::new(&data);
    if let Some(limits) = limits {
        request = request.with_limits(limits);
    }
    request.read_context(stop)
}

/// Unpack the AGF at `input` into a BMP at `output`.
///
/// Returns the context for a later [`pack_file`].
pub fn unpack_file(
    input: &Path,
    output: &Path,
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<DecodingContext, AgfError> {
    let data = fs::read(input)?;
    let mut request = UnpackRequest::new(&data);
    if let Some(limits) = limits {
        request = request.with_limits(limits);
    }
    let unpacked = request.unpack_inner(stop)?;
    write_file(output, &unpacked.bmp)?;
    log::debug!("wrote {} ({} bytes)", output.display(), unpacked.bmp.len());
    Ok(unpacked.context)
}

/// Pack the BMP at `bmp` into an AGF at `output`, using the context of the
/// original container.
pub fn pack_file(
    bmp: &Path,
    context: &DecodingContext,
    output: &Path,
    options: PackOptions,
    stop: &dyn Stop,
) -> Result<(), AgfError> {
    let data = fs::read(bmp)?;
    let agf = PackRequest::new(context)
        .with_options(options)
        .pack_inner(&data, stop)?;
    write_file(output, &agf)?;
    log::debug!("wrote {} ({} bytes)", output.display(), agf.len());
    Ok(())
}

/// Unpack `input` to `intermediate`, then pack that BMP back to `output`.
pub fn repack_file(
    input: &Path,
    intermediate: &Path,
    output: &Path,
    options: PackOptions,
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<(), AgfError> {
    let context = unpack_file(input, intermediate, limits, stop)?;
    pack_file(intermediate, &context, output, options, stop)
}
