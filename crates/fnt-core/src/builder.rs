//! Synthetic font containers
//!
//! Writes minimal FNT resources and NE containers around them. Used to build
//! test inputs without shipping binary fixtures.

use crate::container::{NE_POINTER_OFFSET, NE_RESOURCE_TABLE_OFFSET, RESOURCE_ENTRY_SIZE, RT_FONT};
use crate::header::{HeaderVersion, VERSION_2};
use crate::writer::ByteWriter;

/// Builder for a single FNT resource
#[derive(Debug, Clone)]
pub struct FntBuilder {
    version: u16,
    point_size: u16,
    pixel_height: u16,
    first_char: u8,
    face: Option<String>,
    /// (width, row-major MSB-first bits)
    glyphs: Vec<(u16, Vec<u8>)>,
}

impl FntBuilder {
    pub fn new(point_size: u16, pixel_height: u16, first_char: u8) -> Self {
        Self {
            version: VERSION_2,
            point_size,
            pixel_height,
            first_char,
            face: None,
            glyphs: Vec::new(),
        }
    }

    pub fn version(mut self, version: u16) -> Self {
        self.version = version;
        self
    }

    pub fn face(mut self, name: &str) -> Self {
        self.face = Some(name.to_string());
        self
    }

    /// Add the next glyph. `rows` is row-major, `ceil(width / 8)` bytes per row;
    /// missing bytes are zero.
    pub fn glyph(mut self, width: u16, rows: &[u8]) -> Self {
        let len = (width as usize).div_ceil(8) * self.pixel_height as usize;
        let mut bits = rows.to_vec();
        bits.resize(len, 0);
        self.glyphs.push((width, bits));
        self
    }

    /// Add a blank glyph
    pub fn blank(self, width: u16) -> Self {
        self.glyph(width, &[])
    }

    pub fn build(&self) -> Vec<u8> {
        let height = self.pixel_height as usize;
        let header_len = HeaderVersion::from_raw(self.version).header_len();
        let table_len = self.glyphs.len() * 4;
        let face_offset = header_len + table_len;
        let face_len = self.face.as_ref().map_or(0, |f| f.len() + 1);
        let bits_offset = face_offset + face_len;
        let last_char = (self.first_char as usize + self.glyphs.len()).saturating_sub(1) as u8;
        let max_width = self.glyphs.iter().map(|g| g.0).max().unwrap_or(0);

        let mut w = ByteWriter::new();
        w.u16_le(self.version).u32_le(0);
        w.bytes(b"Synthetic").pad_to(66).u16_le(0).u16_le(self.point_size);
        w.u16_le(96).u16_le(96).u16_le(self.pixel_height);
        w.pad_to(83).u16_le(400).u8(0);
        w.u16_le(0).u16_le(self.pixel_height).u8(0);
        w.u16_le(max_width).u16_le(max_width);
        w.u8(self.first_char).u8(last_char).u8(0).u8(0);
        w.pad_to(105).u32_le(if self.face.is_some() { face_offset as u32 } else { 0 });
        w.pad_to(113).u32_le(bits_offset as u32);
        w.pad_to(header_len);

        let mut offset = bits_offset;
        for (width, _) in &self.glyphs {
            w.u16_le(*width).u16_le(offset as u16);
            offset += (*width as usize).div_ceil(8) * height;
        }
        if let Some(face) = &self.face {
            w.bytes(face.as_bytes()).u8(0);
        }

        for (width, bits) in &self.glyphs {
            let row_bytes = (*width as usize).div_ceil(8);
            for col in 0..row_bytes {
                for row in 0..height {
                    w.u8(bits[row * row_bytes + col]);
                }
            }
        }

        w.into_vec()
    }
}

/// Builder for an NE container holding arbitrary resources
#[derive(Debug, Clone, Default)]
pub struct NeBuilder {
    shift: u16,
    blocks: Vec<(u16, Vec<Vec<u8>>)>,
}

impl NeBuilder {
    const NE_OFFSET: usize = 0x40;

    pub fn new() -> Self {
        Self { shift: 4, blocks: Vec::new() }
    }

    /// Add a resource block of the given type
    pub fn block(mut self, type_id: u16, resources: Vec<Vec<u8>>) -> Self {
        self.blocks.push((type_id, resources));
        self
    }

    /// Add a font resource block
    pub fn fonts(self, fonts: Vec<Vec<u8>>) -> Self {
        self.block(RT_FONT, fonts)
    }

    pub fn build(&self) -> Vec<u8> {
        let align = 1usize << self.shift;
        let table_offset = Self::NE_OFFSET + 0x40;
        let table_len = 2
            + self
                .blocks
                .iter()
                .map(|(_, r)| 8 + r.len() * RESOURCE_ENTRY_SIZE)
                .sum::<usize>()
            + 2;

        let mut w = ByteWriter::new();
        w.bytes(b"MZ").pad_to(NE_POINTER_OFFSET).u32_le(Self::NE_OFFSET as u32);
        w.pad_to(Self::NE_OFFSET).bytes(b"NE");
        w.pad_to(Self::NE_OFFSET + NE_RESOURCE_TABLE_OFFSET)
            .u16_le((table_offset - Self::NE_OFFSET) as u16);
        w.pad_to(table_offset).u16_le(self.shift);

        let mut data_offset = (table_offset + table_len).next_multiple_of(align);
        let mut placed = Vec::new();
        let mut id = 1u16;
        for (type_id, resources) in &self.blocks {
            w.u16_le(*type_id).u16_le(resources.len() as u16).u32_le(0);
            for res in resources {
                let len = res.len().next_multiple_of(align);
                w.u16_le((data_offset >> self.shift) as u16)
                    .u16_le((len >> self.shift) as u16)
                    .u16_le(0x1C30)
                    .u16_le(0x8000 | id)
                    .u32_le(0);
                placed.push((data_offset, res));
                data_offset += len;
                id += 1;
            }
        }
        w.u16_le(0);

        for (offset, res) in placed {
            w.pad_to(offset).bytes(res);
        }
        w.into_vec()
    }
}
