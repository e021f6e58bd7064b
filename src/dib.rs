//! DIB records shared by the AGF container and the BMP serializer.

use alloc::vec::Vec;

use crate::cursor::{Cursor, Record, put_i32, put_u16, put_u32};
use crate::error::AgfError;
use crate::pixel::Geometry;

/// `"BM"` read as a little-endian u16.
pub const BMP_MAGIC: u16 = 0x4D42;

/// Palette entries stored on disk after an indexed encode.
pub const PALETTE_LEN: usize = 256;

/// `BITMAPFILEHEADER`, packed to 14 bytes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BitmapFileHeader {
    pub kind: u16,
    pub size: u32,
    pub reserved1: u16,
    pub reserved2: u16,
    pub off_bits: u32,
}

impl Record for BitmapFileHeader {
    const SIZE: usize = 14;

    fn read(c: &mut Cursor<'_>) -> Result<Self, AgfError> {
        Ok(Self {
            kind: c.read_u16()?,
            size: c.read_u32()?,
            reserved1: c.read_u16()?,
            reserved2: c.read_u16()?,
            off_bits: c.read_u32()?,
        })
    }

    fn write(&self, out: &mut Vec<u8>) {
        put_u16(out, self.kind);
        put_u32(out, self.size);
        put_u16(out, self.reserved1);
        put_u16(out, self.reserved2);
        put_u32(out, self.off_bits);
    }
}

/// `BITMAPINFOHEADER` (40 bytes).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BitmapInfoHeader {
    pub size: u32,
    pub width: i32,
    pub height: i32,
    pub planes: u16,
    pub bit_count: u16,
    pub compression: u32,
    pub size_image: u32,
    pub x_pels_per_meter: i32,
    pub y_pels_per_meter: i32,
    pub clr_used: u32,
    pub clr_important: u32,
}

impl BitmapInfoHeader {
    pub fn geometry(&self) -> Geometry {
        Geometry {
            width: self.width,
            height: self.height,
            bit_count: self.bit_count,
        }
    }
}

impl Record for BitmapInfoHeader {
    const SIZE: usize = 40;

    fn read(c: &mut Cursor<'_>) -> Result<Self, AgfError> {
        Ok(Self {
            size: c.read_u32()?,
            width: c.read_i32()?,
            height: c.read_i32()?,
            planes: c.read_u16()?,
            bit_count: c.read_u16()?,
            compression: c.read_u32()?,
            size_image: c.read_u32()?,
            x_pels_per_meter: c.read_i32()?,
            y_pels_per_meter: c.read_i32()?,
            clr_used: c.read_u32()?,
            clr_important: c.read_u32()?,
        })
    }

    fn write(&self, out: &mut Vec<u8>) {
        put_u32(out, self.size);
        put_i32(out, self.width);
        put_i32(out, self.height);
        put_u16(out, self.planes);
        put_u16(out, self.bit_count);
        put_u32(out, self.compression);
        put_u32(out, self.size_image);
        put_i32(out, self.x_pels_per_meter);
        put_i32(out, self.y_pels_per_meter);
        put_u32(out, self.clr_used);
        put_u32(out, self.clr_important);
    }
}

/// `RGBQUAD`: one palette entry in B,G,R,reserved order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PaletteEntry {
    pub blue: u8,
    pub green: u8,
    pub red: u8,
    pub reserved: u8,
}

impl PaletteEntry {
    pub const fn new(blue: u8, green: u8, red: u8) -> Self {
        Self {
            blue,
            green,
            red,
            reserved: 0,
        }
    }

    /// Whether the color channels match, ignoring `reserved`.
    pub fn same_color(&self, other: &PaletteEntry) -> bool {
        self.blue == other.blue && self.green == other.green && self.red == other.red
    }
}

impl Record for PaletteEntry {
    const SIZE: usize = 4;

    fn read(c: &mut Cursor<'_>) -> Result<Self, AgfError> {
        let [blue, green, red, reserved] = c.read_array()?;
        Ok(Self {
            blue,
            green,
            red,
            reserved,
        })
    }

    fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&[self.blue, self.green, self.red, self.reserved]);
    }
}

/// Parse consecutive palette entries; trailing bytes short of a full entry
/// are ignored.
pub(crate) fn read_palette(data: &[u8]) -> Vec<PaletteEntry> {
    data.chunks_exact(PaletteEntry::SIZE)
        .map(|q| PaletteEntry {
            blue: q[0],
            green: q[1],
            red: q[2],
            reserved: q[3],
        })
        .collect()
}

pub(crate) fn write_palette(out: &mut Vec<u8>, palette: &[PaletteEntry]) {
    out.reserve(palette.len() * PaletteEntry::SIZE);
    for entry in palette {
        entry.write(out);
    }
}
