//! Little-endian byte cursor and the fixed-layout [`Record`] trait.
//!
//! Every on-disk record is marshaled field by field through these helpers,
//! so layout and endianness never depend on host memory representation.

use alloc::vec::Vec;

use crate::error::AgfError;

/// Bounds-checked reader over a byte slice.
pub(crate) struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub(crate) fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], AgfError> {
        let end = self.pos.checked_add(n).ok_or(AgfError::UnexpectedEof)?;
        let bytes = self
            .data
            .get(self.pos..end)
            .ok_or(AgfError::UnexpectedEof)?;
        self.pos = end;
        Ok(bytes)
    }

    pub(crate) fn read_array<const N: usize>(&mut self) -> Result<[u8; N], AgfError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub(crate) fn read_u16(&mut self) -> Result<u16, AgfError> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub(crate) fn read_u32(&mut self) -> Result<u32, AgfError> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub(crate) fn read_i32(&mut self) -> Result<i32, AgfError> {
        Ok(i32::from_le_bytes(self.read_array()?))
    }

    pub(crate) fn read_record<R: Record>(&mut self) -> Result<R, AgfError> {
        R::read(self)
    }
}

/// A fixed-size binary record with an explicit little-endian layout.
pub(crate) trait Record: Sized {
    /// Encoded size in bytes.
    const SIZE: usize;

    fn read(cursor: &mut Cursor<'_>) -> Result<Self, AgfError>;

    /// Append the encoded record to `out`.
    fn write(&self, out: &mut Vec<u8>);

    /// Decode a record from the start of `data`.
    fn parse(data: &[u8]) -> Result<Self, AgfError> {
        Self::read(&mut Cursor::new(data))
    }
}

pub(crate) fn put_u16(out: &mut Vec<u8>, v: u16) {
    out.extend_from_slice(&v.to_le_bytes());
}

pub(crate) fn put_u32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_le_bytes());
}

pub(crate) fn put_i32(out: &mut Vec<u8>, v: i32) {
    out.extend_from_slice(&v.to_le_bytes());
}
