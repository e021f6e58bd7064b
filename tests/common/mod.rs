//! Synthetic AGF files for integration tests.

#![allow(dead_code)]

use agfbmp::{Lzss, PaletteEntry, SectionCodec, stride};

pub fn checkerboard(w: usize, h: usize, bpp: usize) -> Vec<u8> {
    let mut pixels = vec![0u8; w * h * bpp];
    for y in 0..h {
        for x in 0..w {
            let off = (y * w + x) * bpp;
            if (x + y) % 2 == 0 {
                for c in 0..bpp {
                    pixels[off + c] = 200 + (c as u8 * 20);
                }
            } else {
                for c in 0..bpp {
                    pixels[off + c] = 10 + (c as u8 * 30);
                }
            }
        }
    }
    pixels
}

pub fn noise_pattern(w: usize, h: usize, bpp: usize) -> Vec<u8> {
    let mut pixels = vec![0u8; w * h * bpp];
    let mut state: u32 = 0xDEAD_BEEF;
    for p in pixels.iter_mut() {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        *p = state as u8;
    }
    pixels
}

/// `len` palette entries with pairwise distinct colors.
pub fn unique_palette(len: usize) -> Vec<PaletteEntry> {
    (0..len)
        .map(|i| {
            let i = i as u8;
            PaletteEntry::new(i, 255 - i, i.wrapping_mul(7))
        })
        .collect()
}

/// Pad unpadded rows out to the DIB stride with `0xCD` filler.
pub fn pad_rows(rows: &[u8], w: usize, h: usize, bpp: usize) -> Vec<u8> {
    let stride = stride(w as u32, (bpp * 8) as u16);
    let mut plane = vec![0xCD; stride * h];
    for y in 0..h {
        plane[y * stride..][..w * bpp].copy_from_slice(&rows[y * w * bpp..][..w * bpp]);
    }
    plane
}

/// Parts of an AGF file before framing.
#[derive(Clone, Debug)]
pub struct Agf {
    pub kind: u32,
    pub width: i32,
    pub height: i32,
    pub bit_count: u16,
    pub palette: Vec<PaletteEntry>,
    pub pixels: Vec<u8>,
    pub alpha: Option<Vec<u8>>,
}

impl Agf {
    /// Type 2, 8-bit color plane with a full palette of distinct colors.
    pub fn indexed_alpha(w: usize, h: usize) -> Self {
        Self::indexed_alpha_with_palette(w, h, 256)
    }

    pub fn indexed_alpha_with_palette(w: usize, h: usize, palette_len: usize) -> Self {
        let indices: Vec<u8> = checkerboard(w, h, 1)
            .iter()
            .zip(noise_pattern(w, h, 1))
            .map(|(&c, n)| ((usize::from(c) + usize::from(n)) % palette_len) as u8)
            .collect();
        Self {
            kind: 2,
            width: w as i32,
            height: h as i32,
            bit_count: 8,
            palette: unique_palette(palette_len),
            pixels: pad_rows(&indices, w, h, 1),
            alpha: Some(noise_pattern(w, h, 1).iter().map(|v| v ^ 0x55).collect()),
        }
    }

    /// Type 2, 24-bit color plane, no palette.
    pub fn truecolor_alpha(w: usize, h: usize) -> Self {
        Self {
            kind: 2,
            width: w as i32,
            height: h as i32,
            bit_count: 24,
            palette: Vec::new(),
            pixels: pad_rows(&noise_pattern(w, h, 3), w, h, 3),
            alpha: Some(checkerboard(w, h, 1)),
        }
    }

    /// Type 1, 8-bit.
    pub fn indexed(w: usize, h: usize, palette_len: usize) -> Self {
        let indices: Vec<u8> = noise_pattern(w, h, 1)
            .iter()
            .map(|&n| (usize::from(n) % palette_len) as u8)
            .collect();
        Self {
            kind: 1,
            width: w as i32,
            height: h as i32,
            bit_count: 8,
            palette: unique_palette(palette_len),
            pixels: pad_rows(&indices, w, h, 1),
            alpha: None,
        }
    }

    /// Type 1, 24-bit.
    pub fn truecolor(w: usize, h: usize) -> Self {
        Self {
            kind: 1,
            width: w as i32,
            height: h as i32,
            bit_count: 24,
            palette: Vec::new(),
            pixels: pad_rows(&checkerboard(w, h, 3), w, h, 3),
            alpha: None,
        }
    }

    /// Serialize, compressing sections where LZSS makes them smaller.
    pub fn to_bytes(&self, compress: bool) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(b"ACGF");
        out.extend_from_slice(&self.kind.to_le_bytes());
        out.extend_from_slice(&0x1234_5678u32.to_le_bytes());

        let off_bits = 54 + self.palette.len() as u32 * 4;
        let mut meta = Vec::new();
        meta.extend_from_slice(b"BM");
        meta.extend_from_slice(&(off_bits + self.pixels.len() as u32).to_le_bytes());
        meta.extend_from_slice(&[0; 4]);
        meta.extend_from_slice(&off_bits.to_le_bytes());
        meta.extend_from_slice(&[0x12, 0x34]);
        meta.extend_from_slice(&40u32.to_le_bytes());
        meta.extend_from_slice(&self.width.to_le_bytes());
        meta.extend_from_slice(&self.height.to_le_bytes());
        meta.extend_from_slice(&1u16.to_le_bytes());
        meta.extend_from_slice(&self.bit_count.to_le_bytes());
        meta.extend_from_slice(&0u32.to_le_bytes());
        meta.extend_from_slice(&(self.pixels.len() as u32).to_le_bytes());
        meta.extend_from_slice(&2835i32.to_le_bytes());
        meta.extend_from_slice(&2835i32.to_le_bytes());
        meta.extend_from_slice(&(self.palette.len() as u32).to_le_bytes());
        meta.extend_from_slice(&0u32.to_le_bytes());
        for e in &self.palette {
            meta.extend_from_slice(&[e.blue, e.green, e.red, e.reserved]);
        }
        write_section(&mut out, &meta, compress);
        write_section(&mut out, &self.pixels, compress);

        if let Some(alpha) = &self.alpha {
            out.extend_from_slice(b"ACIF");
            out.extend_from_slice(&1u32.to_le_bytes());
            out.extend_from_slice(&0u32.to_le_bytes());
            out.extend_from_slice(&(alpha.len() as u32).to_le_bytes());
            out.extend_from_slice(&self.width.unsigned_abs().to_le_bytes());
            out.extend_from_slice(&self.height.unsigned_abs().to_le_bytes());
            write_section(&mut out, alpha, compress);
        }
        out
    }
}

/// Section framing with an `original_length2` that differs from the
/// declared length, so tests notice if it is not carried through.
pub fn write_section(out: &mut Vec<u8>, data: &[u8], compress: bool) {
    let packed = compress
        .then(|| Lzss.compress(data).unwrap())
        .filter(|p| p.len() < data.len());
    let stored = packed.as_deref().unwrap_or(data);
    out.extend_from_slice(&(data.len() as u32).to_le_bytes());
    out.extend_from_slice(&(data.len() as u32 * 3).to_le_bytes());
    out.extend_from_slice(&(stored.len() as u32).to_le_bytes());
    out.extend_from_slice(stored);
}
