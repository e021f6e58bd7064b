//! BMP reader: headers, palette region and raw pixel bytes.

use alloc::vec::Vec;

use crate::cursor::{Cursor, Record};
use crate::dib::{self, BMP_MAGIC, BitmapFileHeader, BitmapInfoHeader, PaletteEntry};
use crate::error::AgfError;
use crate::pixel::Geometry;

const BI_RGB: u32 = 0;

/// A parsed BMP file borrowing its palette and pixel bytes from the input.
#[derive(Clone, Copy, Debug)]
pub struct BmpFile<'a> {
    pub file: BitmapFileHeader,
    pub info: BitmapInfoHeader,
    palette: &'a [u8],
    pixels: &'a [u8],
}

impl<'a> BmpFile<'a> {
    /// Parse the headers and locate the palette and pixel data.
    ///
    /// The palette is whatever lies between the end of the info header and
    /// `bfOffBits` for images of 8 bits or fewer; pixel data runs from
    /// `bfOffBits` to the end of the file.
    pub fn parse(data: &'a [u8]) -> Result<Self, AgfError> {
        let mut cursor = Cursor::new(data);
        let file: BitmapFileHeader = cursor.read_record()?;
        if file.kind != BMP_MAGIC {
            return Err(AgfError::UnrecognizedFormat);
        }
        let info: BitmapInfoHeader = cursor.read_record()?;
        if (info.size as usize) < BitmapInfoHeader::SIZE {
            return Err(AgfError::InvalidHeader(alloc::format!(
                "BMP info header of {} bytes is not supported",
                info.size
            )));
        }
        if info.compression != BI_RGB {
            return Err(AgfError::InvalidHeader(alloc::format!(
                "compressed BMP (compression {}) is not supported",
                info.compression
            )));
        }

        let header_end = BitmapFileHeader::SIZE + info.size as usize;
        let off_bits = file.off_bits as usize;
        if off_bits < header_end {
            return Err(AgfError::InvalidHeader(alloc::format!(
                "pixel data offset {off_bits} overlaps the {header_end}-byte header"
            )));
        }
        if off_bits > data.len() {
            return Err(AgfError::UnexpectedEof);
        }

        let palette = if info.bit_count <= 8 {
            &data[header_end..off_bits]
        } else {
            &[]
        };
        Ok(Self {
            file,
            info,
            palette,
            pixels: &data[off_bits..],
        })
    }

    pub fn geometry(&self) -> Geometry {
        self.info.geometry()
    }

    /// The embedded palette; empty for truecolor images.
    pub fn palette(&self) -> Vec<PaletteEntry> {
        dib::read_palette(self.palette)
    }

    /// Raw pixel data, starting at `bfOffBits`.
    pub fn pixels(&self) -> &'a [u8] {
        self.pixels
    }
}
