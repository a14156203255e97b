//! Glyph table and bitmap unpacking
//!
//! The glyph table follows the header: one `(u16 width, u16 offset)` record
//! per character code. Glyph bitmaps are stored column-planar: each 8-pixel
//! wide byte column spans the full glyph height before the next one starts.

use crate::header::FontHeader;
use crate::reader::ByteReader;
use crate::Result;

/// Size of one glyph table record
pub const GLYPH_RECORD_SIZE: usize = 4;

/// One character's entry in the glyph table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphEntry {
    pub code: u8,
    pub width: u16,
    /// Bitmap offset, relative to the resource base
    pub offset: u16,
}

impl GlyphEntry {
    /// Zero-width glyphs are skipped by layout and rendering
    pub fn is_valid(&self) -> bool {
        self.width > 0
    }

    /// The character this code stands for (Latin-1)
    pub fn character(&self) -> char {
        char::from(self.code)
    }

    /// Bytes per bitmap row
    pub fn row_bytes(&self) -> usize {
        (self.width as usize).div_ceil(8)
    }
}

/// Read the glyph table of the resource at `base`.
///
/// Always yields `header.char_count()` entries, in ascending code order.
pub fn parse_glyph_table(data: &[u8], base: usize, header: &FontHeader) -> Result<Vec<GlyphEntry>> {
    let mut reader = ByteReader::at(data, base + header.header_len);
    let mut glyphs = Vec::with_capacity(header.char_count());

    for i in 0..header.char_count() {
        let width = reader.read_u16()?;
        let offset = reader.read_u16()?;
        glyphs.push(GlyphEntry {
            code: header.first_char + i as u8,
            width,
            offset,
        });
    }

    Ok(glyphs)
}

/// Unpacked 1-bit glyph raster, row-major, MSB first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphBitmap {
    pub width: usize,
    pub height: usize,
    pub bits: Vec<u8>,
}

impl GlyphBitmap {
    pub fn row_bytes(&self) -> usize {
        self.width.div_ceil(8)
    }

    /// Whether pixel (x, y) is set
    pub fn get(&self, x: usize, y: usize) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let byte = self.bits[y * self.row_bytes() + x / 8];
        byte & (0x80 >> (x % 8)) != 0
    }

    /// Number of set pixels
    pub fn ink(&self) -> usize {
        (0..self.height)
            .flat_map(|y| (0..self.width).map(move |x| (x, y)))
            .filter(|&(x, y)| self.get(x, y))
            .count()
    }
}

/// Re-pack a glyph's planar bitmap into row-major order
pub fn extract_bitmap(data: &[u8], base: usize, header: &FontHeader, glyph: &GlyphEntry) -> Result<GlyphBitmap> {
    let reader = ByteReader::new(data);
    let height = header.pixel_height as usize;
    let row_bytes = glyph.row_bytes();
    let start = base + glyph.offset as usize;

    // One bounds check for the whole planar block, then plain indexing
    let planes = reader.bytes_at(start, row_bytes * height)?;

    let mut bits = vec![0u8; row_bytes * height];
    for row in 0..height {
        for col in 0..row_bytes {
            bits[row * row_bytes + col] = planes[col * height + row];
        }
    }

    Ok(GlyphBitmap {
        width: glyph.width as usize,
        height,
        bits,
    })
}
