//! Conversion between AGF pixel planes and BMP pixel data.
//!
//! 32-bit containers keep color (palette indices or packed BGR, rows padded
//! to the DIB stride) and alpha (one unpadded byte per pixel) apart. The
//! alpha plane's rows run in the opposite vertical order: color row `y`
//! pairs with alpha row `height - y - 1`. The canonical form joins them
//! into unpadded B,G,R,A rows in color-plane order.

use alloc::vec;
use alloc::vec::Vec;

use enough::Stop;

use crate::agf::AgfImage;
use crate::bmp::BmpFile;
use crate::dib::PaletteEntry;
use crate::error::AgfError;
use crate::palette::PaletteBuilder;
use crate::pixel::{Geometry, PixelLayout};

/// Color plane layout of an alpha-bearing container: 8-bit indexed or
/// 24-bit packed.
fn color_layout(geometry: &Geometry) -> Result<PixelLayout, AgfError> {
    match PixelLayout::from_bit_count(geometry.bit_count)? {
        PixelLayout::Bgra8 => Err(AgfError::InvalidHeader(
            "32-bit color plane in an alpha-plane container".into(),
        )),
        layout => Ok(layout),
    }
}

/// Bytes a padded plane must hold: full strides for all rows but the
/// last, which only needs its pixels.
fn padded_plane_needed(rows: usize, stride: usize, row_bytes: usize) -> usize {
    match rows {
        0 => 0,
        _ => (rows - 1).saturating_mul(stride).saturating_add(row_bytes),
    }
}

fn ensure_len(buf: &[u8], needed: usize) -> Result<(), AgfError> {
    if buf.len() < needed {
        return Err(AgfError::BufferTooSmall {
            needed,
            actual: buf.len(),
        });
    }
    Ok(())
}

/// Join a color plane and its mirrored alpha plane into canonical BGRA.
pub fn decode_with_alpha(
    geometry: Geometry,
    pixels: &[u8],
    palette: &[PaletteEntry],
    alpha: &[u8],
    stop: &dyn Stop,
) -> Result<Vec<u8>, AgfError> {
    let layout = color_layout(&geometry)?;
    let w = geometry.columns()?;
    let h = geometry.rows();
    let stride = geometry.stride();
    let out_len = geometry.plane_len(4)?;

    ensure_len(
        pixels,
        padded_plane_needed(h, stride, w * layout.bytes_per_pixel()),
    )?;
    ensure_len(alpha, w * h)?;

    let mut out = vec![0u8; out_len];
    for y in 0..h {
        if y % 16 == 0 {
            stop.check()?;
        }
        let color_row = &pixels[y * stride..];
        let alpha_row = &alpha[(h - y - 1) * w..][..w];
        let out_row = &mut out[y * w * 4..][..w * 4];

        match layout {
            PixelLayout::Indexed8 => {
                for ((px, &index), &a) in out_row
                    .chunks_exact_mut(4)
                    .zip(color_row)
                    .zip(alpha_row)
                {
                    let entry = palette.get(usize::from(index)).ok_or_else(|| {
                        AgfError::InvalidData(alloc::format!(
                            "palette index {index} out of range ({} entries)",
                            palette.len()
                        ))
                    })?;
                    px.copy_from_slice(&[entry.blue, entry.green, entry.red, a]);
                }
            }
            _ => {
                for ((px, bgr), &a) in out_row
                    .chunks_exact_mut(4)
                    .zip(color_row.chunks_exact(3))
                    .zip(alpha_row)
                {
                    px[..3].copy_from_slice(bgr);
                    px[3] = a;
                }
            }
        }
    }
    Ok(out)
}

/// Split canonical BGRA back into the color and alpha planes of
/// `template`'s layout.
///
/// Plane sizes come from the original container, not from the BMP: an
/// indexed plane is `rows * stride` with `rows * width` alpha bytes, a
/// packed plane reuses the original lengths. Both start as a copy of the
/// original plane when the sizes agree so row padding survives a repack.
/// Returns `(pixels, alpha)`.
pub fn encode_with_alpha(
    bgra: &[u8],
    template: &AgfImage,
    palette: &mut PaletteBuilder,
    stop: &dyn Stop,
) -> Result<(Vec<u8>, Vec<u8>), AgfError> {
    let geometry = template.geometry();
    let layout = color_layout(&geometry)?;
    let original_alpha = template.alpha.as_ref().ok_or_else(|| {
        AgfError::InvalidHeader("original container has no alpha plane".into())
    })?;
    let w = geometry.columns()?;
    let h = geometry.rows();
    let stride = geometry.stride();

    ensure_len(bgra, geometry.plane_len(4)?)?;

    let (pixels_len, alpha_len) = match layout {
        PixelLayout::Indexed8 => (geometry.padded_len()?, geometry.plane_len(1)?),
        _ => (template.pixels.len(), original_alpha.data.len()),
    };
    let pixels_needed = padded_plane_needed(h, stride, w * layout.bytes_per_pixel());
    if pixels_len < pixels_needed {
        return Err(AgfError::BufferTooSmall {
            needed: pixels_needed,
            actual: pixels_len,
        });
    }
    if alpha_len < w * h {
        return Err(AgfError::BufferTooSmall {
            needed: w * h,
            actual: alpha_len,
        });
    }

    let mut pixels = if template.pixels.len() == pixels_len {
        template.pixels.clone()
    } else {
        vec![0u8; pixels_len]
    };
    let mut alpha = if original_alpha.data.len() == alpha_len {
        original_alpha.data.clone()
    } else {
        vec![0u8; alpha_len]
    };

    for y in 0..h {
        if y % 16 == 0 {
            stop.check()?;
        }
        let src_row = &bgra[y * w * 4..][..w * 4];

        match layout {
            PixelLayout::Indexed8 => {
                let row = &mut pixels[y * stride..][..w];
                for (dst, px) in row.iter_mut().zip(src_row.chunks_exact(4)) {
                    *dst = palette.assign(PaletteEntry::new(px[0], px[1], px[2]));
                }
            }
            _ => {
                let row = &mut pixels[y * stride..][..w * 3];
                for (dst, px) in row.chunks_exact_mut(3).zip(src_row.chunks_exact(4)) {
                    dst.copy_from_slice(&px[..3]);
                }
            }
        }

        let alpha_row = &mut alpha[(h - y - 1) * w..][..w];
        for (dst, px) in alpha_row.iter_mut().zip(src_row.chunks_exact(4)) {
            *dst = px[3];
        }
    }
    Ok((pixels, alpha))
}

/// Color plane and palette for a container without alpha.
///
/// BMP pixel data is stored unchanged. An 8-bit BMP's own palette replaces
/// the original one; BMPs without one fall back to the original palette,
/// as do truecolor images.
pub fn encode_plain(
    bmp: &BmpFile<'_>,
    template: &AgfImage,
) -> Result<(Vec<u8>, Vec<PaletteEntry>), AgfError> {
    let expected = template.geometry().bit_count;
    if bmp.info.bit_count != expected {
        return Err(AgfError::BitDepthMismatch {
            expected,
            actual: bmp.info.bit_count,
        });
    }

    let embedded = bmp.palette();
    let palette = if expected == 8 && !embedded.is_empty() {
        embedded
    } else {
        template.palette.clone()
    };
    Ok((bmp.pixels().to_vec(), palette))
}
