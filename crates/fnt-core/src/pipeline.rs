//! Extraction pipeline
//!
//! Runs parse -> extract -> layout -> composite -> encode -> index for every
//! font resource in a container, one variant at a time. A failing variant is
//! recorded and skipped; it never stops the others.

use crate::atlas::{composite, AtlasLayout, Canvas};
use crate::container::{locate_fonts, FontResourceRef};
use crate::glyph::{extract_bitmap, parse_glyph_table, GlyphBitmap, GlyphEntry};
use crate::header::FontHeader;
use crate::metadata::FontMetadata;
use crate::png::{EncoderOptions, PngEncoder};
use crate::{FontError, Result};

/// Pipeline configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractOptions {
    pub encoder: EncoderOptions,
}

/// A fully rendered variant, ready to be written out
#[derive(Debug, Clone)]
pub struct RenderedVariant {
    pub header: FontHeader,
    pub png: Vec<u8>,
    pub metadata: FontMetadata,
}

impl RenderedVariant {
    /// `<font_name>-<point_size>pt`
    pub fn file_stem(&self) -> String {
        format!("{}-{}pt", self.metadata.font_name, self.header.point_size)
    }

    /// Serialized metadata
    pub fn json(&self) -> Result<String> {
        self.metadata.to_json()
    }
}

/// What became of one variant that did not fail
#[derive(Debug, Clone)]
pub enum VariantOutcome {
    Rendered(RenderedVariant),
    /// No glyph had a non-zero width
    Empty { point_size: u16 },
}

/// Per-variant result as collected by [`extract_font`]
#[derive(Debug)]
pub struct VariantResult {
    pub resource: FontResourceRef,
    /// Point size, if the header could be read
    pub point_size: Option<u16>,
    pub outcome: Result<VariantOutcome>,
}

/// Results for a whole container, in discovery order
#[derive(Debug, Default)]
pub struct ExtractReport {
    pub variants: Vec<VariantResult>,
}

impl ExtractReport {
    pub fn rendered(&self) -> impl Iterator<Item = &RenderedVariant> {
        self.variants.iter().filter_map(|v| match &v.outcome {
            Ok(VariantOutcome::Rendered(r)) => Some(r),
            _ => None,
        })
    }

    pub fn empty_count(&self) -> usize {
        self.variants
            .iter()
            .filter(|v| matches!(v.outcome, Ok(VariantOutcome::Empty { .. })))
            .count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &VariantResult> {
        self.variants.iter().filter(|v| v.outcome.is_err())
    }
}

/// Render one font resource
pub fn process_variant(
    data: &[u8],
    resource: &FontResourceRef,
    font_name: &str,
    options: &ExtractOptions,
) -> Result<VariantOutcome> {
    let header = FontHeader::parse(data, resource.offset)?;
    render_variant(data, resource.offset, header, font_name, options)
}

/// Render a variant whose header has already been parsed
fn render_variant(
    data: &[u8],
    base: usize,
    header: FontHeader,
    font_name: &str,
    options: &ExtractOptions,
) -> Result<VariantOutcome> {
    tracing::debug!(
        point_size = header.point_size,
        pixel_height = header.pixel_height,
        first = header.first_char,
        last = header.last_char,
        version = ?header.version,
        face = header.face_name.as_deref().unwrap_or(""),
        "parsed font header"
    );

    let glyphs: Vec<GlyphEntry> = parse_glyph_table(data, base, &header)?
        .into_iter()
        .filter(GlyphEntry::is_valid)
        .collect();

    let Some(layout) = AtlasLayout::plan(&glyphs, header.pixel_height) else {
        return Ok(VariantOutcome::Empty { point_size: header.point_size });
    };
    let mut canvas = Canvas::new(layout.side)?;

    let bitmaps = glyphs
        .iter()
        .map(|g| extract_bitmap(data, base, &header, g))
        .collect::<Result<Vec<GlyphBitmap>>>()?;
    let entries = composite(&mut canvas, &layout, &glyphs, &bitmaps);

    let png = PngEncoder::new(options.encoder).encode(&canvas)?;
    let metadata = FontMetadata::new(font_name, &header, &layout, &entries);

    Ok(VariantOutcome::Rendered(RenderedVariant { header, png, metadata }))
}

/// Locate and render every font variant in a container.
///
/// Fails only when the resource directory cannot be read or holds no fonts.
pub fn extract_font(data: &[u8], font_name: &str, options: &ExtractOptions) -> Result<ExtractReport> {
    let resources = locate_fonts(data)?;
    if resources.is_empty() {
        return Err(FontError::NoFontResources);
    }
    tracing::info!(count = resources.len(), font_name, "found font resources");

    let mut report = ExtractReport::default();
    for resource in resources {
        let (point_size, outcome) = match FontHeader::parse(data, resource.offset) {
            Ok(header) => (
                Some(header.point_size),
                render_variant(data, resource.offset, header, font_name, options),
            ),
            Err(e) => (None, Err(e)),
        };

        match (&outcome, point_size) {
            (Ok(VariantOutcome::Rendered(r)), _) => {
                tracing::debug!(
                    point_size = r.header.point_size,
                    glyphs = r.metadata.char_count,
                    atlas = r.metadata.atlas_size,
                    "rendered variant"
                );
            }
            (Ok(VariantOutcome::Empty { point_size }), _) => {
                tracing::warn!(point_size, "no valid glyphs in variant, skipping");
            }
            (Err(e), Some(pt)) => {
                tracing::error!(point_size = pt, offset = resource.offset, "failed to process variant: {e}");
            }
            (Err(e), None) => {
                tracing::error!(offset = resource.offset, "failed to process variant: {e}");
            }
        }

        report.variants.push(VariantResult { resource, point_size, outcome });
    }

    Ok(report)
}
