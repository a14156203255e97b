//! PNG Encoder (RFC 2083)
//!
//! From-scratch 8-bit RGBA PNG writer: adaptive per-row filtering, a zlib
//! stream for the single IDAT chunk, and bitwise CRC-32 chunk checksums.

pub mod crc;
pub mod filter;

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::atlas::Canvas;
use crate::writer::ByteWriter;
use crate::{FontError, Result};

pub use crc::{crc32, Crc32};
pub use filter::{FilterHeuristic, FilterType};

/// PNG file signature
pub const PNG_SIGNATURE: [u8; 8] = *b"\x89PNG\r\n\x1a\n";

const BIT_DEPTH: u8 = 8;
const COLOR_TYPE_RGBA: u8 = 6;
const BYTES_PER_PIXEL: usize = 4;

/// Encoder settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderOptions {
    /// zlib level, 0-9
    pub compression: u32,
    pub heuristic: FilterHeuristic,
}

impl Default for EncoderOptions {
    fn default() -> Self {
        Self {
            compression: 9,
            heuristic: FilterHeuristic::default(),
        }
    }
}

/// PNG encoder
#[derive(Debug, Clone, Default)]
pub struct PngEncoder {
    options: EncoderOptions,
}

impl PngEncoder {
    pub fn new(options: EncoderOptions) -> Self {
        Self { options }
    }

    /// Encode a square atlas canvas
    pub fn encode(&self, canvas: &Canvas) -> Result<Vec<u8>> {
        self.encode_rgba(canvas.width() as u32, canvas.height() as u32, &canvas.pixels)
    }

    /// Encode raw RGBA pixels
    pub fn encode_rgba(&self, width: u32, height: u32, pixels: &[u8]) -> Result<Vec<u8>> {
        let stride = width as usize * BYTES_PER_PIXEL;
        if pixels.len() != stride * height as usize {
            return Err(FontError::Encode(format!(
                "expected {} bytes for {}x{} RGBA, got {}",
                stride * height as usize,
                width,
                height,
                pixels.len()
            )));
        }

        let filtered = filter::filter_image(pixels, stride, BYTES_PER_PIXEL, self.options.heuristic);
        let compressed = self.compress(&filtered)?;

        let mut ihdr = ByteWriter::with_capacity(13);
        ihdr.u32_be(width)
            .u32_be(height)
            .u8(BIT_DEPTH)
            .u8(COLOR_TYPE_RGBA)
            .u8(0) // compression
            .u8(0) // filter method
            .u8(0); // interlace

        let mut out = ByteWriter::with_capacity(PNG_SIGNATURE.len() + compressed.len() + 3 * 12 + 13);
        out.bytes(&PNG_SIGNATURE);
        write_chunk(&mut out, b"IHDR", ihdr.as_slice());
        write_chunk(&mut out, b"IDAT", &compressed);
        write_chunk(&mut out, b"IEND", &[]);

        tracing::trace!(width, height, raw = filtered.len(), compressed = compressed.len(), "encoded png");
        Ok(out.into_vec())
    }

    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let level = Compression::new(self.options.compression.min(9));
        let mut encoder = ZlibEncoder::new(Vec::with_capacity(data.len() / 2), level);
        encoder.write_all(data)?;
        Ok(encoder.finish()?)
    }
}

/// Append one chunk: length, type, payload, CRC over type and payload
pub fn write_chunk(out: &mut ByteWriter, tag: &[u8; 4], payload: &[u8]) {
    let mut crc = Crc32::new();
    crc.update(tag);
    crc.update(payload);

    out.u32_be(payload.len() as u32)
        .tag(tag)
        .bytes(payload)
        .u32_be(crc.finish());
}
