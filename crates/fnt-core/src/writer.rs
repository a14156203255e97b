//! Growable byte sink
//!
//! Typed appends in both byte orders. Every method returns `&mut Self`, so
//! writes can be chained or issued one at a time.

/// Growable byte buffer with typed append operations
#[derive(Debug, Default, Clone)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { buf: Vec::with_capacity(capacity) }
    }

    /// Current write position (bytes written so far)
    pub fn position(&self) -> usize {
        self.buf.len()
    }

    pub fn u8(&mut self, v: u8) -> &mut Self {
        self.buf.push(v);
        self
    }

    pub fn i8(&mut self, v: i8) -> &mut Self {
        self.bytes(&v.to_le_bytes())
    }

    pub fn u16_le(&mut self, v: u16) -> &mut Self {
        self.bytes(&v.to_le_bytes())
    }

    pub fn u16_be(&mut self, v: u16) -> &mut Self {
        self.bytes(&v.to_be_bytes())
    }

    pub fn i16_le(&mut self, v: i16) -> &mut Self {
        self.bytes(&v.to_le_bytes())
    }

    pub fn i16_be(&mut self, v: i16) -> &mut Self {
        self.bytes(&v.to_be_bytes())
    }

    pub fn u32_le(&mut self, v: u32) -> &mut Self {
        self.bytes(&v.to_le_bytes())
    }

    pub fn u32_be(&mut self, v: u32) -> &mut Self {
        self.bytes(&v.to_be_bytes())
    }

    pub fn i32_le(&mut self, v: i32) -> &mut Self {
        self.bytes(&v.to_le_bytes())
    }

    pub fn i32_be(&mut self, v: i32) -> &mut Self {
        self.bytes(&v.to_be_bytes())
    }

    /// Append raw bytes
    pub fn bytes(&mut self, data: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(data);
        self
    }

    /// Append a 4-byte ASCII tag in reading order
    pub fn tag(&mut self, tag: &[u8; 4]) -> &mut Self {
        self.bytes(tag)
    }

    /// Append `n` zero bytes
    pub fn zeros(&mut self, n: usize) -> &mut Self {
        self.buf.resize(self.buf.len() + n, 0);
        self
    }

    /// Pad with zeros up to absolute position `pos` (no-op if already past it)
    pub fn pad_to(&mut self, pos: usize) -> &mut Self {
        if pos > self.buf.len() {
            self.buf.resize(pos, 0);
        }
        self
    }

    /// Overwrite a previously written little-endian u16
    pub fn patch_u16_le(&mut self, pos: usize, v: u16) -> &mut Self {
        self.buf[pos..pos + 2].copy_from_slice(&v.to_le_bytes());
        self
    }

    /// Overwrite a previously written little-endian u32
    pub fn patch_u32_le(&mut self, pos: usize, v: u32) -> &mut Self {
        self.buf[pos..pos + 4].copy_from_slice(&v.to_le_bytes());
        self
    }

    /// Overwrite a previously written big-endian u32
    pub fn patch_u32_be(&mut self, pos: usize, v: u32) -> &mut Self {
        self.buf[pos..pos + 4].copy_from_slice(&v.to_be_bytes());
        self
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chained_writes() {
        let mut w = ByteWriter::new();
        w.u8(1).u16_le(0x0302).u16_be(0x0405).u32_le(0x09080706).tag(b"IEND");
        assert_eq!(
            w.as_slice(),
            &[1, 2, 3, 4, 5, 6, 7, 8, 9, b'I', b'E', b'N', b'D']
        );
    }

    #[test]
    fn test_signed_and_patch() {
        let mut w = ByteWriter::new();
        w.i8(-1);
        w.i16_be(-2);
        let slot = w.position();
        w.u32_le(0);
        w.patch_u32_le(slot, 0xAABBCCDD);
        assert_eq!(w.into_vec(), vec![0xFF, 0xFF, 0xFE, 0xDD, 0xCC, 0xBB, 0xAA]);
    }

    #[test]
    fn test_padding() {
        let mut w = ByteWriter::new();
        w.u8(7).pad_to(4).zeros(2).pad_to(3);
        assert_eq!(w.as_slice(), &[7, 0, 0, 0, 0, 0]);
    }
}
