//! fnt-pack - Font Atlas Container
//!
//! Merges the per-size `<prefix>-<N>pt.{json,png}` pairs written by `fnt2png`
//! into one indexed file. All integers are little-endian.
//!
//! ```text
//! header   "FNTA" | u32 version | u16 variant count
//! toc      per variant: u16 points | u16 pixel height | u16 glyphs
//!                       u32 index offset | u32 image offset | u32 image length
//! indexes  per glyph:   u16 code | u16 x | u16 y | u8 width | u8 height
//! images   raw PNG bytes, in toc order
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use fnt_core::{ByteReader, ByteWriter, FontError, FontMetadata};

pub const MAGIC: [u8; 4] = *b"FNTA";
pub const VERSION: u32 = 1;
pub const HEADER_SIZE: usize = 10;
pub const TOC_RECORD_SIZE: usize = 18;
pub const GLYPH_RECORD_SIZE: usize = 8;

/// Packing error types
#[derive(Debug, thiserror::Error)]
pub enum PackError {
    #[error("No variants found for prefix {0:?}")]
    NoVariants(String),

    #[error("Missing atlas image {0}")]
    MissingImage(PathBuf),

    #[error("{field} value {value} does not fit the container format")]
    Overflow { field: &'static str, value: u64 },

    #[error("Not a font atlas container")]
    BadMagic,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid metadata: {0}")]
    Font(#[from] FontError),
}

pub type Result<T> = std::result::Result<T, PackError>;

/// One variant's atlas and index, as read from disk
#[derive(Debug, Clone)]
pub struct VariantSource {
    pub metadata: FontMetadata,
    pub png: Vec<u8>,
}

impl VariantSource {
    pub fn point_size(&self) -> u32 {
        self.metadata.point_size
    }
}

/// Table of contents record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TocEntry {
    pub point_size: u16,
    pub pixel_height: u16,
    pub glyph_count: u16,
    pub index_offset: u32,
    pub image_offset: u32,
    pub image_len: u32,
}

/// Glyph index record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphRecord {
    pub code: u16,
    pub x: u16,
    pub y: u16,
    pub width: u8,
    pub height: u8,
}

/// Point size encoded in `<prefix>-<N>pt.json`, if the name matches
fn variant_point_size(file_name: &str, prefix: &str) -> Option<u32> {
    let size = file_name
        .strip_prefix(prefix)?
        .strip_prefix('-')?
        .strip_suffix("pt.json")?;
    if size.is_empty() || !size.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    size.parse().ok()
}

/// Find and load every `<prefix>-<N>pt` pair in `dir`, ordered by point size
pub fn discover(dir: &Path, prefix: &str) -> Result<Vec<VariantSource>> {
    let mut found = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if let Some(points) = variant_point_size(name, prefix) {
            found.push((points, entry.path()));
        }
    }
    if found.is_empty() {
        return Err(PackError::NoVariants(prefix.to_string()));
    }
    found.sort_by_key(|(points, _)| *points);

    let mut variants = Vec::with_capacity(found.len());
    for (points, json_path) in found {
        let png_path = json_path.with_extension("png");
        if !png_path.is_file() {
            return Err(PackError::MissingImage(png_path));
        }
        let metadata = FontMetadata::from_json(&fs::read_to_string(&json_path)?)?;
        let png = fs::read(&png_path)?;
        tracing::debug!(points, glyphs = metadata.char_count, png = png.len(), "loaded variant");
        variants.push(VariantSource { metadata, png });
    }
    Ok(variants)
}

fn fit_u16(field: &'static str, value: u32) -> Result<u16> {
    u16::try_from(value).map_err(|_| PackError::Overflow { field, value: value as u64 })
}

fn fit_u8(field: &'static str, value: u32) -> Result<u8> {
    u8::try_from(value).map_err(|_| PackError::Overflow { field, value: value as u64 })
}

fn fit_u32(field: &'static str, value: usize) -> Result<u32> {
    u32::try_from(value).map_err(|_| PackError::Overflow { field, value: value as u64 })
}

/// Build the container
pub fn pack(variants: &[VariantSource]) -> Result<Vec<u8>> {
    let count = u16::try_from(variants.len())
        .map_err(|_| PackError::Overflow { field: "variant count", value: variants.len() as u64 })?;

    let mut w = ByteWriter::new();
    w.tag(&MAGIC).u32_le(VERSION).u16_le(count);
    let toc_start = w.position();
    w.zeros(variants.len() * TOC_RECORD_SIZE);

    let mut index_offsets = Vec::with_capacity(variants.len());
    for variant in variants {
        index_offsets.push(fit_u32("index offset", w.position())?);
        for c in variant.metadata.sorted_characters() {
            w.u16_le(fit_u16("char code", c.char_code)?)
                .u16_le(fit_u16("x", c.x)?)
                .u16_le(fit_u16("y", c.y)?)
                .u8(fit_u8("width", c.width)?)
                .u8(fit_u8("height", c.height)?);
        }
    }

    for (i, variant) in variants.iter().enumerate() {
        let image_offset = fit_u32("image offset", w.position())?;
        w.bytes(&variant.png);

        let meta = &variant.metadata;
        let rec = toc_start + i * TOC_RECORD_SIZE;
        w.patch_u16_le(rec, fit_u16("point size", meta.point_size)?)
            .patch_u16_le(rec + 2, fit_u16("pixel height", meta.pixel_height)?)
            .patch_u16_le(rec + 4, fit_u16("glyph count", meta.characters.len() as u32)?)
            .patch_u32_le(rec + 6, index_offsets[i])
            .patch_u32_le(rec + 10, image_offset)
            .patch_u32_le(rec + 14, fit_u32("image length", variant.png.len())?);
    }

    Ok(w.into_vec())
}

/// Read back the table of contents
pub fn read_toc(data: &[u8]) -> Result<Vec<TocEntry>> {
    let mut r = ByteReader::new(data);
    if r.bytes_at(0, 4)? != &MAGIC[..] {
        return Err(PackError::BadMagic);
    }
    r.seek(4);
    let _version = r.read_u32()?;
    let count = r.read_u16()? as usize;

    let mut toc = Vec::with_capacity(count);
    for _ in 0..count {
        toc.push(TocEntry {
            point_size: r.read_u16()?,
            pixel_height: r.read_u16()?,
            glyph_count: r.read_u16()?,
            index_offset: r.read_u32()?,
            image_offset: r.read_u32()?,
            image_len: r.read_u32()?,
        });
    }
    Ok(toc)
}

/// Read one variant's glyph index
pub fn read_glyphs(data: &[u8], entry: &TocEntry) -> Result<Vec<GlyphRecord>> {
    let mut r = ByteReader::at(data, entry.index_offset as usize);
    (0..entry.glyph_count)
        .map(|_| -> Result<GlyphRecord> {
            Ok(GlyphRecord {
                code: r.read_u16()?,
                x: r.read_u16()?,
                y: r.read_u16()?,
                width: r.read_u8()?,
                height: r.read_u8()?,
            })
        })
        .collect()
}
