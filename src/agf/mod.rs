//! AGF container codec.
//!
//! ```text
//! ContainerHeader { signature[4], type, unknown }
//! Section 1: BITMAPFILEHEADER ++ pad[2] ++ BITMAPINFOHEADER ++ palette[N]
//! Section 2: color plane (palette indices or packed BGR)
//! type 2 only: AlphaHeader ++ Section 3: alpha plane
//! ```
//!
//! Each section is `original_length, original_length2, length, payload`.

mod header;
mod section;

pub use header::{AlphaHeader, ContainerHeader, ContainerType, EmbeddedHeaders, SectionHeader};

use alloc::vec::Vec;
use enough::Stop;

use crate::compression::{Lzss, SectionCodec};
use crate::cursor::{Cursor, Record};
use crate::dib::{self, PaletteEntry};
use crate::error::AgfError;
use crate::limits::Limits;
use crate::pixel::Geometry;
use section::{read_section, write_section};

/// Alpha plane of a 32-bit container together with its header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlphaPlane {
    pub header: AlphaHeader,
    /// One byte per pixel, unpadded, rows mirrored against the color plane.
    pub data: Vec<u8>,
}

/// Every piece of an AGF file, as stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AgfImage {
    pub header: ContainerHeader,
    pub bitmap: EmbeddedHeaders,
    pub palette: Vec<PaletteEntry>,
    /// Section 2: palette indices (8-bit) or packed BGR (24-bit), rows
    /// padded to the DIB stride.
    pub pixels: Vec<u8>,
    pub alpha: Option<AlphaPlane>,
    /// Section headers in file order, kept for `original_length2`.
    pub(crate) sections: Vec<SectionHeader>,
}

impl AgfImage {
    /// Parse a whole AGF file.
    pub fn read(
        data: &[u8],
        codec: &dyn SectionCodec,
        limits: Option<&Limits>,
        stop: &dyn Stop,
    ) -> Result<Self, AgfError> {
        let mut cursor = Cursor::new(data);
        let header: ContainerHeader = cursor.read_record()?;
        let kind = header.container_type()?;

        let mut sections = Vec::with_capacity(3);
        let (hdr, meta) = read_section(&mut cursor, codec, limits)?;
        sections.push(hdr);
        let (bitmap, palette) = split_bitmap_section(&meta)?;
        if let Some(limits) = limits {
            limits.check(bitmap.info.width, bitmap.info.height)?;
        }
        stop.check()?;

        let (hdr, pixels) = read_section(&mut cursor, codec, limits)?;
        sections.push(hdr);
        stop.check()?;

        let alpha = if kind.has_alpha() {
            let alpha_header: AlphaHeader = cursor.read_record()?;
            let (hdr, data) = read_section(&mut cursor, codec, limits)?;
            sections.push(hdr);
            Some(AlphaPlane {
                header: alpha_header,
                data,
            })
        } else {
            None
        };
        if cursor.remaining() > 0 {
            log::debug!(
                "ignoring {} trailing bytes at offset {}",
                cursor.remaining(),
                cursor.position()
            );
        }

        log::debug!(
            "AGF {:?}: {}x{} {}-bit, {} palette entries",
            kind,
            bitmap.info.width,
            bitmap.info.height,
            bitmap.info.bit_count,
            palette.len()
        );

        Ok(Self {
            header,
            bitmap,
            palette,
            pixels,
            alpha,
            sections,
        })
    }

    /// Serialize the container. Sections are stored raw unless `codec` is
    /// given.
    pub fn write(&self, codec: Option<&dyn SectionCodec>) -> Result<Vec<u8>, AgfError> {
        let alpha_len = self
            .alpha
            .as_ref()
            .map_or(0, |a| AlphaHeader::SIZE + SectionHeader::SIZE + a.data.len());
        let mut out = Vec::with_capacity(
            ContainerHeader::SIZE
                + 2 * SectionHeader::SIZE
                + EmbeddedHeaders::SIZE
                + self.palette.len() * PaletteEntry::SIZE
                + self.pixels.len()
                + alpha_len,
        );
        self.header.write(&mut out);

        let mut meta = Vec::with_capacity(EmbeddedHeaders::SIZE + self.palette.len() * 4);
        self.bitmap.write(&mut meta);
        dib::write_palette(&mut meta, &self.palette);
        write_section(&mut out, &meta, self.sections.first(), codec)?;

        write_section(&mut out, &self.pixels, self.sections.get(1), codec)?;

        if let Some(alpha) = &self.alpha {
            alpha.header.write(&mut out);
            write_section(&mut out, &alpha.data, self.sections.get(2), codec)?;
        }
        Ok(out)
    }

    pub fn container_type(&self) -> Result<ContainerType, AgfError> {
        self.header.container_type()
    }

    pub fn geometry(&self) -> Geometry {
        self.bitmap.info.geometry()
    }

    pub fn section_headers(&self) -> &[SectionHeader] {
        &self.sections
    }
}

/// Split section 1 into its BMP headers and trailing palette.
fn split_bitmap_section(meta: &[u8]) -> Result<(EmbeddedHeaders, Vec<PaletteEntry>), AgfError> {
    if meta.len() < EmbeddedHeaders::SIZE {
        return Err(AgfError::InvalidHeader(alloc::format!(
            "bitmap section is {} bytes, need at least {}",
            meta.len(),
            EmbeddedHeaders::SIZE
        )));
    }
    let bitmap = EmbeddedHeaders::parse(meta)?;
    let palette = dib::read_palette(&meta[EmbeddedHeaders::SIZE..]);
    Ok((bitmap, palette))
}

/// Header-level facts about an AGF file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AgfInfo {
    pub container_type: ContainerType,
    pub width: i32,
    pub height: i32,
    pub bit_count: u16,
    pub palette_len: usize,
}

impl AgfInfo {
    /// Probe an AGF file, reading only the container header and section 1.
    pub fn from_bytes(data: &[u8]) -> Result<Self, AgfError> {
        let mut cursor = Cursor::new(data);
        let header: ContainerHeader = cursor.read_record()?;
        let container_type = header.container_type()?;
        let (_, meta) = read_section(&mut cursor, &Lzss, None)?;
        let (bitmap, palette) = split_bitmap_section(&meta)?;
        Ok(Self {
            container_type,
            width: bitmap.info.width,
            height: bitmap.info.height,
            bit_count: bitmap.info.bit_count,
            palette_len: palette.len(),
        })
    }
}
