//! End-to-end tests for the fnt2png binary

use std::fs;
use std::path::PathBuf;
use std::process::Command;

use fnt_core::{FntBuilder, FontMetadata, NeBuilder};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("fnt2png-{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn fnt2png() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_fnt2png"));
    cmd.env("RUST_LOG", "warn");
    cmd
}

#[test]
fn test_writes_png_and_json_per_variant() {
    let dir = scratch_dir("variants");
    let small = FntBuilder::new(8, 8, 65).glyph(5, &[0xF8, 0x88]).blank(6).build();
    let large = FntBuilder::new(12, 14, 65).glyph(9, &[0xFF, 0x80]).build();
    let empty = FntBuilder::new(10, 12, 65).blank(0).build();
    let input = dir.join("TESTFONT.FON");
    fs::write(&input, NeBuilder::new().fonts(vec![small, empty, large]).build()).unwrap();

    let status = fnt2png().arg(&input).arg("-o").arg(&dir).status().unwrap();
    assert!(status.success());

    for pt in [8, 12] {
        let png = fs::read(dir.join(format!("TESTFONT-{pt}pt.png"))).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");

        let json = fs::read_to_string(dir.join(format!("TESTFONT-{pt}pt.json"))).unwrap();
        let meta = FontMetadata::from_json(&json).unwrap();
        assert_eq!(meta.font_name, "TESTFONT");
        assert_eq!(meta.point_size, pt);
    }
    assert!(!dir.join("TESTFONT-10pt.png").exists());
    assert!(!dir.join("TESTFONT-10pt.json").exists());

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_name_override() {
    let dir = scratch_dir("name");
    let input = dir.join("x.fon");
    let fnt = FntBuilder::new(9, 9, 48).glyph(4, &[0x60]).build();
    fs::write(&input, NeBuilder::new().fonts(vec![fnt]).build()).unwrap();

    let status = fnt2png()
        .arg(&input)
        .args(["--name", "digits", "--level", "1"])
        .arg("--out-dir")
        .arg(&dir)
        .status()
        .unwrap();
    assert!(status.success());
    assert!(dir.join("digits-9pt.png").exists());

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_no_font_resources_is_fatal() {
    let dir = scratch_dir("nofonts");
    let input = dir.join("empty.fon");
    fs::write(&input, NeBuilder::new().block(0x8007, vec![vec![0; 8]]).build()).unwrap();

    let status = fnt2png().arg(&input).arg("-o").arg(&dir).status().unwrap();
    assert!(!status.success());
    assert_eq!(fs::read_dir(&dir).unwrap().count(), 1);

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_missing_input_is_fatal() {
    let status = fnt2png().arg("/nonexistent/font.fon").status().unwrap();
    assert!(!status.success());

    let status = fnt2png().status().unwrap();
    assert!(!status.success());
}
