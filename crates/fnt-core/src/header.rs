//! FNT Font Header
//!
//! Fixed-layout header at the start of every font resource. All field
//! offsets are relative to the resource base.

use crate::reader::ByteReader;
use crate::Result;

pub const VERSION_2: u16 = 0x0200;
pub const VERSION_3: u16 = 0x0300;

pub const V2_HEADER_LEN: usize = 118;
pub const V3_HEADER_LEN: usize = 148;
pub const DEFAULT_HEADER_LEN: usize = 117;

const OFF_VERSION: usize = 0;
const OFF_COPYRIGHT: usize = 6;
const COPYRIGHT_LEN: usize = 60;
const OFF_POINTS: usize = 68;
const OFF_ASCENT: usize = 74;
const OFF_ITALIC: usize = 80;
const OFF_WEIGHT: usize = 83;
const OFF_CHARSET: usize = 85;
const OFF_PIX_HEIGHT: usize = 88;
const OFF_AVG_WIDTH: usize = 91;
const OFF_MAX_WIDTH: usize = 93;
const OFF_FIRST_CHAR: usize = 95;
const OFF_LAST_CHAR: usize = 96;
const OFF_FACE: usize = 105;
const OFF_BITS_OFFSET: usize = 113;

/// Header layout, decided by the version field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderVersion {
    V2,
    V3,
    /// Unrecognized version, parsed with the default length
    Unknown(u16),
}

impl HeaderVersion {
    pub fn from_raw(raw: u16) -> Self {
        match raw {
            VERSION_3 => Self::V3,
            VERSION_2 => Self::V2,
            other => Self::Unknown(other),
        }
    }

    /// Declared header length; the glyph table starts right after it
    pub fn header_len(self) -> usize {
        match self {
            Self::V3 => V3_HEADER_LEN,
            Self::V2 => V2_HEADER_LEN,
            Self::Unknown(_) => DEFAULT_HEADER_LEN,
        }
    }
}

/// Parsed FNT header for one font variant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontHeader {
    pub version: HeaderVersion,
    pub header_len: usize,
    pub point_size: u16,
    pub pixel_height: u16,
    pub first_char: u8,
    pub last_char: u8,
    /// Offset of the bitmap data, relative to the resource base
    pub bits_offset: u32,
    pub ascent: u16,
    pub italic: bool,
    pub weight: u16,
    pub charset: u8,
    pub avg_width: u16,
    pub max_width: u16,
    pub copyright: String,
    pub face_name: Option<String>,
}

impl FontHeader {
    /// Parse the header of the resource at `base`
    pub fn parse(data: &[u8], base: usize) -> Result<Self> {
        let r = ByteReader::new(data);

        let version = HeaderVersion::from_raw(r.u16_at(base + OFF_VERSION)?);
        if let HeaderVersion::Unknown(raw) = version {
            tracing::warn!(version = raw, base, "unconfirmed font header version, using default layout");
        }

        let copyright = r
            .bytes_at(base + OFF_COPYRIGHT, COPYRIGHT_LEN)?
            .iter()
            .take_while(|&&b| b != 0)
            .map(|&b| char::from(b))
            .collect::<String>()
            .trim_end()
            .to_string();

        // The face name is informational; a bad pointer is not fatal
        let face_name = r
            .u32_at(base + OFF_FACE)
            .ok()
            .filter(|&ptr| ptr != 0)
            .and_then(|ptr| r.cstr_at(base + ptr as usize).ok())
            .filter(|name| !name.is_empty());

        Ok(Self {
            version,
            header_len: version.header_len(),
            point_size: r.u16_at(base + OFF_POINTS)?,
            pixel_height: r.u16_at(base + OFF_PIX_HEIGHT)?,
            first_char: r.u8_at(base + OFF_FIRST_CHAR)?,
            last_char: r.u8_at(base + OFF_LAST_CHAR)?,
            bits_offset: r.u32_at(base + OFF_BITS_OFFSET)?,
            ascent: r.u16_at(base + OFF_ASCENT)?,
            italic: r.u8_at(base + OFF_ITALIC)? != 0,
            weight: r.u16_at(base + OFF_WEIGHT)?,
            charset: r.u8_at(base + OFF_CHARSET)?,
            avg_width: r.u16_at(base + OFF_AVG_WIDTH)?,
            max_width: r.u16_at(base + OFF_MAX_WIDTH)?,
            copyright,
            face_name,
        })
    }

    /// Number of glyph table entries
    pub fn char_count(&self) -> usize {
        if self.last_char < self.first_char {
            0
        } else {
            (self.last_char - self.first_char) as usize + 1
        }
    }
}
