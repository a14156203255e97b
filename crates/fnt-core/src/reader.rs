//! Binary reader for container data
//!
//! Everything in NE containers and FNT resources is little-endian. Reads are
//! bounds checked so a bad offset surfaces as [`FontError::OutOfBounds`]
//! instead of a panic.

use crate::{FontError, Result};

/// Little-endian binary reader with bounds checking
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    /// Create a new reader
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Create a reader positioned at `pos`
    pub fn at(data: &'a [u8], pos: usize) -> Self {
        Self { data, pos }
    }

    /// Get current position
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Set position
    pub fn seek(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// Underlying buffer length
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Skip bytes
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.check(self.pos, n)?;
        self.pos += n;
        Ok(())
    }

    /// Read u8
    pub fn read_u8(&mut self) -> Result<u8> {
        let v = self.u8_at(self.pos)?;
        self.pos += 1;
        Ok(v)
    }

    /// Read little-endian u16
    pub fn read_u16(&mut self) -> Result<u16> {
        let v = self.u16_at(self.pos)?;
        self.pos += 2;
        Ok(v)
    }

    /// Read little-endian u32
    pub fn read_u32(&mut self) -> Result<u32> {
        let v = self.u32_at(self.pos)?;
        self.pos += 4;
        Ok(v)
    }

    /// Read u8 at an absolute offset
    pub fn u8_at(&self, offset: usize) -> Result<u8> {
        self.check(offset, 1)?;
        Ok(self.data[offset])
    }

    /// Read little-endian u16 at an absolute offset
    pub fn u16_at(&self, offset: usize) -> Result<u16> {
        self.check(offset, 2)?;
        Ok(u16::from_le_bytes([self.data[offset], self.data[offset + 1]]))
    }

    /// Read little-endian u32 at an absolute offset
    pub fn u32_at(&self, offset: usize) -> Result<u32> {
        self.check(offset, 4)?;
        Ok(u32::from_le_bytes([
            self.data[offset],
            self.data[offset + 1],
            self.data[offset + 2],
            self.data[offset + 3],
        ]))
    }

    /// Borrow `n` bytes at an absolute offset
    pub fn bytes_at(&self, offset: usize, n: usize) -> Result<&'a [u8]> {
        self.check(offset, n)?;
        Ok(&self.data[offset..offset + n])
    }

    /// NUL-terminated string at an absolute offset, decoded as Latin-1.
    /// Runs to the end of the buffer if no terminator is found.
    pub fn cstr_at(&self, offset: usize) -> Result<String> {
        self.check(offset, 1)?;
        let tail = &self.data[offset..];
        let end = tail.iter().position(|&b| b == 0).unwrap_or(tail.len());
        Ok(tail[..end].iter().map(|&b| char::from(b)).collect())
    }

    /// Remaining bytes
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    fn check(&self, offset: usize, len: usize) -> Result<()> {
        match offset.checked_add(len) {
            Some(end) if end <= self.data.len() => Ok(()),
            _ => Err(FontError::OutOfBounds { offset, len }),
        }
    }
}
