//! fnt-core - Bitmap Font Atlas Extraction
//!
//! This crate turns the bitmap fonts embedded in legacy `.FON` containers
//! into glyph atlases:
//! - Resource directory scanning (NE segmented executables)
//! - FNT header and glyph table parsing (v2 and v3 layouts)
//! - Planar glyph bitmap unpacking
//! - Uniform grid atlas layout and compositing
//! - From-scratch PNG encoding (filters, zlib, CRC32, chunk framing)
//! - JSON placement index for the downstream packager
//! - Synthetic FNT/NE writers for building test inputs (`test-util` feature)

pub mod reader;
pub mod writer;
pub mod container;
pub mod header;
pub mod glyph;
pub mod atlas;
pub mod png;
pub mod metadata;
pub mod pipeline;
#[cfg(any(test, feature = "test-util"))]
pub mod builder;

pub use reader::ByteReader;
pub use writer::ByteWriter;
pub use container::{FontResourceRef, locate_fonts, is_ne_container};
pub use header::{FontHeader, HeaderVersion};
pub use glyph::{GlyphEntry, GlyphBitmap, parse_glyph_table, extract_bitmap};
pub use atlas::{AtlasLayout, AtlasEntry, Canvas, composite};
pub use png::{PngEncoder, EncoderOptions, FilterHeuristic, FilterType};
#[cfg(any(test, feature = "test-util"))]
pub use builder::{FntBuilder, NeBuilder};
pub use metadata::{FontMetadata, CharacterEntry};
pub use pipeline::{
    ExtractOptions, ExtractReport, RenderedVariant, VariantOutcome, VariantResult,
    extract_font, process_variant,
};

/// Font extraction error types
#[derive(Debug, thiserror::Error)]
pub enum FontError {
    #[error("Read of {len} bytes at offset {offset:#x} is out of bounds")]
    OutOfBounds { offset: usize, len: usize },

    #[error("Resource alignment shift {0} is out of range")]
    BadAlignment(u16),

    #[error("Atlas of {side}x{side} pixels exceeds the {max} pixel limit")]
    AtlasTooLarge { side: usize, max: usize },

    #[error("No font resources found in container")]
    NoFontResources,

    #[error("Encoding failed: {0}")]
    Encode(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FontError>;
