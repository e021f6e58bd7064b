//! BMP writer: minimal headers followed by raw pixel data.

use alloc::vec::Vec;

use crate::cursor::Record;
use crate::dib::{BMP_MAGIC, BitmapFileHeader, BitmapInfoHeader, PaletteEntry, write_palette};
use crate::error::AgfError;
use crate::pixel::PixelLayout;

const HEADERS_SIZE: usize = BitmapFileHeader::SIZE + BitmapInfoHeader::SIZE;

/// Write a BMP around already laid-out pixel data.
///
/// `pixels` is copied verbatim, so rows must already be padded and ordered
/// as `height`'s sign says. The palette is written for [`PixelLayout::Indexed8`]
/// only, where it is required; other layouts carry none.
pub(crate) fn encode_bmp(
    pixels: &[u8],
    width: i32,
    height: i32,
    layout: PixelLayout,
    palette: Option<&[PaletteEntry]>,
) -> Result<Vec<u8>, AgfError> {
    let palette = match layout {
        PixelLayout::Indexed8 => match palette {
            Some(p) if !p.is_empty() => p,
            _ => return Err(AgfError::MissingPaletteForIndexedImage),
        },
        _ => &[],
    };

    let off_bits = HEADERS_SIZE + palette.len() * PaletteEntry::SIZE;
    let file_size = off_bits
        .checked_add(pixels.len())
        .filter(|&s| s <= u32::MAX as usize)
        .ok_or(AgfError::DimensionsTooLarge { width, height })?;

    let mut out = Vec::with_capacity(file_size);
    BitmapFileHeader {
        kind: BMP_MAGIC,
        size: file_size as u32,
        reserved1: 0,
        reserved2: 0,
        off_bits: off_bits as u32,
    }
    .write(&mut out);
    BitmapInfoHeader {
        size: BitmapInfoHeader::SIZE as u32,
        width,
        height,
        planes: 1,
        bit_count: layout.bits_per_pixel(),
        ..BitmapInfoHeader::default()
    }
    .write(&mut out);
    write_palette(&mut out, palette);
    out.extend_from_slice(pixels);
    Ok(out)
}
