//! Glyph Atlas
//!
//! Uniform grid layout: every cell is as wide as the widest glyph and as tall
//! as the font, and the canvas is square.

use crate::glyph::{GlyphBitmap, GlyphEntry};
use crate::{FontError, Result};

/// Grid geometry for one font variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtlasLayout {
    pub columns: usize,
    pub rows: usize,
    pub cell_width: usize,
    pub cell_height: usize,
    /// Canvas width and height
    pub side: usize,
}

impl AtlasLayout {
    /// Plan the grid for the given valid glyphs. `None` if there are none.
    pub fn plan(glyphs: &[GlyphEntry], pixel_height: u16) -> Option<Self> {
        let count = glyphs.len();
        if count == 0 {
            return None;
        }

        let columns = ceil_sqrt(count);
        let rows = count.div_ceil(columns);
        let cell_width = glyphs.iter().map(|g| g.width as usize).max()?;
        let cell_height = pixel_height as usize;
        let side = (columns * cell_width).max(rows * cell_height);

        Some(Self { columns, rows, cell_width, cell_height, side })
    }

    /// Top-left pixel of the i-th cell
    pub fn cell_origin(&self, index: usize) -> (usize, usize) {
        let col = index % self.columns;
        let row = index / self.columns;
        (col * self.cell_width, row * self.cell_height)
    }
}

/// Smallest `n` with `n * n >= value`
fn ceil_sqrt(value: usize) -> usize {
    let mut n = (value as f64).sqrt() as usize;
    while n * n > value {
        n -= 1;
    }
    while n * n < value {
        n += 1;
    }
    n
}

/// One glyph's placement in the atlas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtlasEntry {
    pub character: char,
    pub code: u8,
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

/// Square RGBA canvas, initially transparent black
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    pub side: usize,
    pub pixels: Vec<u8>,
}

impl Canvas {
    pub const BYTES_PER_PIXEL: usize = 4;
    pub const INK: [u8; 4] = [255, 255, 255, 255];
    /// Largest accepted width and height. A full 256-glyph font with
    /// 255-pixel cells stays well under it.
    pub const MAX_SIDE: usize = 8192;

    pub fn new(side: usize) -> Result<Self> {
        let too_large = || FontError::AtlasTooLarge { side, max: Self::MAX_SIDE };
        if side > Self::MAX_SIDE {
            return Err(too_large());
        }
        let len = side
            .checked_mul(side)
            .and_then(|n| n.checked_mul(Self::BYTES_PER_PIXEL))
            .ok_or_else(too_large)?;

        let mut pixels = Vec::new();
        pixels.try_reserve_exact(len).map_err(|_| too_large())?;
        pixels.resize(len, 0);
        Ok(Self { side, pixels })
    }

    pub fn width(&self) -> usize {
        self.side
    }

    pub fn height(&self) -> usize {
        self.side
    }

    /// Bytes per scanline
    pub fn stride(&self) -> usize {
        self.side * Self::BYTES_PER_PIXEL
    }

    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        let i = y * self.stride() + x * Self::BYTES_PER_PIXEL;
        [self.pixels[i], self.pixels[i + 1], self.pixels[i + 2], self.pixels[i + 3]]
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, rgba: [u8; 4]) {
        let i = y * self.stride() + x * Self::BYTES_PER_PIXEL;
        self.pixels[i..i + 4].copy_from_slice(&rgba);
    }

    /// Scanline `y`
    pub fn row(&self, y: usize) -> &[u8] {
        let start = y * self.stride();
        &self.pixels[start..start + self.stride()]
    }
}

/// Draw every glyph into its grid cell.
///
/// `glyphs` and `bitmaps` are parallel slices of valid glyphs in table order.
/// Returns one placement per glyph.
pub fn composite(
    canvas: &mut Canvas,
    layout: &AtlasLayout,
    glyphs: &[GlyphEntry],
    bitmaps: &[GlyphBitmap],
) -> Vec<AtlasEntry> {
    let mut entries = Vec::with_capacity(glyphs.len());

    for (i, (glyph, bitmap)) in glyphs.iter().zip(bitmaps).enumerate() {
        let (ox, oy) = layout.cell_origin(i);

        for y in 0..bitmap.height {
            for x in 0..bitmap.width {
                if bitmap.get(x, y) {
                    canvas.set_pixel(ox + x, oy + y, Canvas::INK);
                }
            }
        }

        entries.push(AtlasEntry {
            character: glyph.character(),
            code: glyph.code,
            x: ox,
            y: oy,
            width: glyph.width as usize,
            height: layout.cell_height,
        });
    }

    entries
}
