//! Integration tests - full extraction pipeline
//!
//! Container -> resources -> header -> glyphs -> atlas -> PNG + JSON

use std::io::Read;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use flate2::read::ZlibDecoder;
use fnt_core::png::filter::unfilter_row;
use fnt_core::png::{crc32, PNG_SIGNATURE};
use fnt_core::*;
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

// ============================================================================
// HELPERS
// ============================================================================

/// Decode a PNG produced by the encoder back to (side, RGBA)
fn decode_png(png: &[u8]) -> (usize, Vec<u8>) {
    assert_eq!(&png[..8], &PNG_SIGNATURE);

    let mut pos = 8;
    let mut width = 0usize;
    let mut idat = Vec::new();
    while pos < png.len() {
        let len = u32::from_be_bytes(png[pos..pos + 4].try_into().unwrap()) as usize;
        let tag = &png[pos + 4..pos + 8];
        let payload = &png[pos + 8..pos + 8 + len];
        let crc = u32::from_be_bytes(png[pos + 8 + len..pos + 12 + len].try_into().unwrap());
        assert_eq!(crc, crc32(&png[pos + 4..pos + 8 + len]), "bad CRC on {:?}", tag);

        match tag {
            b"IHDR" => {
                width = u32::from_be_bytes(payload[0..4].try_into().unwrap()) as usize;
                let height = u32::from_be_bytes(payload[4..8].try_into().unwrap()) as usize;
                assert_eq!(width, height);
                assert_eq!(&payload[8..], &[8, 6, 0, 0, 0]);
            }
            b"IDAT" => idat.extend_from_slice(payload),
            b"IEND" => assert!(payload.is_empty()),
            other => panic!("unexpected chunk {:?}", other),
        }
        pos += 12 + len;
    }

    let mut raw = Vec::new();
    ZlibDecoder::new(&idat[..]).read_to_end(&mut raw).unwrap();

    let stride = width * 4;
    assert_eq!(raw.len(), width * (stride + 1));
    let mut pixels = Vec::with_capacity(width * stride);
    let mut prev = vec![0u8; stride];
    for line in raw.chunks(stride + 1) {
        let filter = FilterType::from_u8(line[0]).expect("valid filter tag");
        let mut row = line[1..].to_vec();
        unfilter_row(filter, &mut row, &prev, 4);
        pixels.extend_from_slice(&row);
        prev = row;
    }
    (width, pixels)
}

/// Counts WARN events
struct WarnCounter(Arc<AtomicUsize>);

impl<S: tracing::Subscriber> Layer<S> for WarnCounter {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == tracing::Level::WARN {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

fn rendered(outcome: &VariantOutcome) -> &RenderedVariant {
    match outcome {
        VariantOutcome::Rendered(r) => r,
        other => panic!("expected rendered variant, got {:?}", other),
    }
}

// ============================================================================
// SCENARIOS
// ============================================================================

#[test]
fn test_two_character_font() {
    let fnt = FntBuilder::new(8, 8, 65).blank(8).blank(8).build();
    let data = NeBuilder::new().fonts(vec![fnt]).build();

    let report = extract_font(&data, "tiny", &ExtractOptions::default()).unwrap();
    assert_eq!(report.variants.len(), 1);
    let r = rendered(report.variants[0].outcome.as_ref().unwrap());

    let meta = &r.metadata;
    assert_eq!(meta.atlas_size, 16);
    assert_eq!(meta.char_count, 2);
    let a = &meta.characters["A"];
    let b = &meta.characters["B"];
    assert_eq!((a.x, a.y, a.width, a.height), (0, 0, 8, 8));
    assert_eq!((b.x, b.y, b.width, b.height), (8, 0, 8, 8));
    assert_eq!(a.char_code, 65);
    assert_eq!(b.char, "B");

    let (side, pixels) = decode_png(&r.png);
    assert_eq!(side, 16);
    assert!(pixels.iter().all(|&p| p == 0));
}

#[test]
fn test_empty_variant_does_not_stop_others() {
    let empty = FntBuilder::new(8, 10, 32).blank(0).blank(0).build();
    let good = FntBuilder::new(10, 12, 32).glyph(6, &[0xFC]).build();
    let data = NeBuilder::new().fonts(vec![empty, good]).build();

    let report = extract_font(&data, "mixed", &ExtractOptions::default()).unwrap();
    assert_eq!(report.variants.len(), 2);
    assert!(matches!(
        report.variants[0].outcome,
        Ok(VariantOutcome::Empty { point_size: 8 })
    ));
    assert_eq!(report.empty_count(), 1);

    let stems: Vec<String> = report.rendered().map(|r| r.file_stem()).collect();
    assert_eq!(stems, vec!["mixed-10pt"]);
}

#[test]
fn test_failing_variant_does_not_stop_others() {
    let good = FntBuilder::new(9, 9, 65).glyph(4, &[0xF0]).build();
    // Header claims 200 glyphs but the table is cut short
    let mut broken = FntBuilder::new(14, 16, 0).blank(8).build();
    broken[96] = 200;
    let data = NeBuilder::new().fonts(vec![broken, good]).build();

    let report = extract_font(&data, "partial", &ExtractOptions::default()).unwrap();
    let failures: Vec<_> = report.failures().collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].point_size, Some(14));
    assert_eq!(report.rendered().count(), 1);
}

#[test]
fn test_oversized_variant_does_not_stop_others() {
    // 4 columns of 65535-pixel cells
    let huge = (0..16).fold(FntBuilder::new(20, 1, 0), |b, _| b.blank(u16::MAX)).build();
    let good = FntBuilder::new(8, 8, 65).glyph(8, &[0xFF; 8]).build();
    let data = NeBuilder::new().fonts(vec![huge, good]).build();

    let report = extract_font(&data, "huge", &ExtractOptions::default()).unwrap();
    assert_eq!(report.variants.len(), 2);
    assert_eq!(report.variants[0].point_size, Some(20));
    assert!(matches!(
        report.variants[0].outcome,
        Err(FontError::AtlasTooLarge { side: 262_140, .. })
    ));

    let stems: Vec<String> = report.rendered().map(|r| r.file_stem()).collect();
    assert_eq!(stems, vec!["huge-8pt"]);
}

#[test]
fn test_unknown_version_warns_once_per_variant() {
    let fnt = FntBuilder::new(10, 4, 65).version(0x0100).glyph(3, &[0xE0]).build();
    let data = NeBuilder::new().fonts(vec![fnt]).build();

    let warnings = Arc::new(AtomicUsize::new(0));
    let subscriber = tracing_subscriber::registry().with(WarnCounter(warnings.clone()));
    let report = tracing::subscriber::with_default(subscriber, || {
        extract_font(&data, "legacy", &ExtractOptions::default()).unwrap()
    });

    assert_eq!(report.rendered().count(), 1);
    assert_eq!(warnings.load(Ordering::SeqCst), 1);
}

#[test]
fn test_no_font_resources() {
    let data = NeBuilder::new().block(0x8007, vec![vec![0; 16]]).build();
    assert!(matches!(
        extract_font(&data, "none", &ExtractOptions::default()),
        Err(FontError::NoFontResources)
    ));
}

#[test]
fn test_header_length_follows_version() {
    for (version, len) in [(0x0300u16, 148usize), (0x0200, 118), (0x0100, 117)] {
        let fnt = FntBuilder::new(10, 4, 97)
            .version(version)
            .glyph(3, &[0xE0, 0xA0, 0xE0])
            .glyph(5, &[0x88])
            .build();
        let header = FontHeader::parse(&fnt, 0).unwrap();
        assert_eq!(header.header_len, len);

        let glyphs = parse_glyph_table(&fnt, 0, &header).unwrap();
        assert_eq!(glyphs.len(), header.char_count());
        assert_eq!(glyphs[0].width, 3);
        assert_eq!(glyphs[1].width, 5);
        assert_eq!(glyphs[1].character(), 'b');
    }
}

// ============================================================================
// PROPERTIES
// ============================================================================

#[test]
fn test_canvas_matches_extracted_bits() {
    // A checkerboard-ish set of glyphs with varying widths
    let mut builder = FntBuilder::new(11, 7, 33);
    for i in 0..20u16 {
        let width = 1 + (i * 3) % 13;
        let rows: Vec<u8> = (0..14).map(|j| (i as u8).wrapping_mul(37) ^ (j as u8).wrapping_mul(0x55)).collect();
        builder = builder.glyph(if i == 5 { 0 } else { width }, &rows);
    }
    let fnt = builder.build();
    let data = NeBuilder::new().fonts(vec![fnt]).build();

    let report = extract_font(&data, "grid", &ExtractOptions::default()).unwrap();
    let r = rendered(report.variants[0].outcome.as_ref().unwrap());
    let (side, pixels) = decode_png(&r.png);
    assert_eq!(side, r.metadata.atlas_size as usize);
    assert_eq!(r.metadata.char_count, 19);

    let base = report.variants[0].resource.offset;
    let header = FontHeader::parse(&data, base).unwrap();
    let glyphs = parse_glyph_table(&data, base, &header).unwrap();

    let mut lit = 0;
    for glyph in glyphs.iter().filter(|g| g.is_valid()) {
        let bitmap = extract_bitmap(&data, base, &header, glyph).unwrap();
        let entry = &r.metadata.characters[&glyph.character().to_string()];
        assert!(entry.x as usize + entry.width as usize <= side);
        assert!(entry.y as usize + entry.height as usize <= side);

        for y in 0..bitmap.height {
            for x in 0..bitmap.width {
                let i = ((entry.y as usize + y) * side + entry.x as usize + x) * 4;
                let expected: [u8; 4] = if bitmap.get(x, y) { [255; 4] } else { [0; 4] };
                assert_eq!(&pixels[i..i + 4], &expected, "glyph {} at ({x}, {y})", glyph.code);
            }
        }
        lit += bitmap.ink();
    }

    let white = pixels.chunks(4).filter(|p| p.iter().all(|&c| c == 255)).count();
    assert_eq!(white, lit);
}

#[test]
fn test_heuristics_produce_identical_pixels() {
    let fnt = FntBuilder::new(12, 9, 48)
        .glyph(7, &[0x7C, 0x82, 0x82, 0x82, 0x82, 0x82, 0x7C])
        .glyph(7, &[0x10, 0x30, 0x10, 0x10, 0x10, 0x10, 0x7C])
        .glyph(7, &[0x7C, 0x82, 0x02, 0x1C, 0x60, 0x80, 0xFE])
        .build();
    let data = NeBuilder::new().fonts(vec![fnt]).build();

    let mut decoded = Vec::new();
    for heuristic in [FilterHeuristic::SignedDelta, FilterHeuristic::WrappedBytes] {
        let options = ExtractOptions {
            encoder: EncoderOptions { compression: 6, heuristic },
        };
        let report = extract_font(&data, "digits", &options).unwrap();
        let r = rendered(report.variants[0].outcome.as_ref().unwrap());
        decoded.push(decode_png(&r.png));
    }
    assert_eq!(decoded[0], decoded[1]);
}
