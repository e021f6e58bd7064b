//! AGF container records.

use alloc::vec::Vec;

use crate::cursor::{Cursor, Record, put_u32};
use crate::dib::{BitmapFileHeader, BitmapInfoHeader};
use crate::error::AgfError;

/// AGF container sub-type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContainerType {
    /// Color plane only (8-bit indexed or 24-bit truecolor).
    TrueColor24,
    /// Color plane plus a separate 8-bit alpha plane.
    TrueColorWithAlpha32,
}

impl ContainerType {
    pub fn from_code(code: u32) -> Result<Self, AgfError> {
        match code {
            1 => Ok(Self::TrueColor24),
            2 => Ok(Self::TrueColorWithAlpha32),
            other => Err(AgfError::UnsupportedContainerType(other)),
        }
    }

    pub fn code(self) -> u32 {
        match self {
            Self::TrueColor24 => 1,
            Self::TrueColorWithAlpha32 => 2,
        }
    }

    pub fn has_alpha(self) -> bool {
        self == Self::TrueColorWithAlpha32
    }
}

/// Top-level container header (12 bytes).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContainerHeader {
    pub signature: [u8; 4],
    pub kind: u32,
    pub unknown: u32,
}

impl ContainerHeader {
    /// The validated sub-type.
    pub fn container_type(&self) -> Result<ContainerType, AgfError> {
        ContainerType::from_code(self.kind)
    }
}

impl Record for ContainerHeader {
    const SIZE: usize = 12;

    fn read(c: &mut Cursor<'_>) -> Result<Self, AgfError> {
        Ok(Self {
            signature: c.read_array()?,
            kind: c.read_u32()?,
            unknown: c.read_u32()?,
        })
    }

    fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.signature);
        put_u32(out, self.kind);
        put_u32(out, self.unknown);
    }
}

/// Section framing header (12 bytes).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SectionHeader {
    /// Payload size once decompressed.
    pub original_length: u32,
    /// Always observed equal to `original_length`; carried through untouched.
    pub original_length2: u32,
    /// Bytes stored in the file.
    pub length: u32,
}

impl SectionHeader {
    pub fn is_compressed(&self) -> bool {
        self.length != self.original_length
    }
}

impl Record for SectionHeader {
    const SIZE: usize = 12;

    fn read(c: &mut Cursor<'_>) -> Result<Self, AgfError> {
        Ok(Self {
            original_length: c.read_u32()?,
            original_length2: c.read_u32()?,
            length: c.read_u32()?,
        })
    }

    fn write(&self, out: &mut Vec<u8>) {
        put_u32(out, self.original_length);
        put_u32(out, self.original_length2);
        put_u32(out, self.length);
    }
}

/// Header in front of the alpha-plane section of 32-bit containers
/// (24 bytes).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AlphaHeader {
    pub signature: [u8; 4],
    pub kind: u32,
    pub unknown: u32,
    pub original_length: u32,
    pub width: u32,
    pub height: u32,
}

impl Record for AlphaHeader {
    const SIZE: usize = 24;

    fn read(c: &mut Cursor<'_>) -> Result<Self, AgfError> {
        Ok(Self {
            signature: c.read_array()?,
            kind: c.read_u32()?,
            unknown: c.read_u32()?,
            original_length: c.read_u32()?,
            width: c.read_u32()?,
            height: c.read_u32()?,
        })
    }

    fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.signature);
        put_u32(out, self.kind);
        put_u32(out, self.unknown);
        put_u32(out, self.original_length);
        put_u32(out, self.width);
        put_u32(out, self.height);
    }
}

/// The BMP headers stored at the start of section 1.
///
/// The 14-byte file header is followed by two alignment bytes before the
/// info header; they are kept so a repack reproduces them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EmbeddedHeaders {
    pub file: BitmapFileHeader,
    pub pad: [u8; 2],
    pub info: BitmapInfoHeader,
}

impl Record for EmbeddedHeaders {
    const SIZE: usize = BitmapFileHeader::SIZE + 2 + BitmapInfoHeader::SIZE;

    fn read(c: &mut Cursor<'_>) -> Result<Self, AgfError> {
        Ok(Self {
            file: c.read_record()?,
            pad: c.read_array()?,
            info: c.read_record()?,
        })
    }

    fn write(&self, out: &mut Vec<u8>) {
        self.file.write(out);
        out.extend_from_slice(&self.pad);
        self.info.write(out);
    }
}
