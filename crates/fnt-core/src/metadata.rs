//! Atlas placement index
//!
//! The JSON document written next to each atlas PNG. Keys of `characters`
//! are the glyph characters themselves; serde_json takes care of escaping
//! `"` and `\`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::atlas::{AtlasEntry, AtlasLayout};
use crate::header::FontHeader;
use crate::Result;

/// Placement of one character
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterEntry {
    pub char: String,
    pub char_code: u32,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl From<&AtlasEntry> for CharacterEntry {
    fn from(e: &AtlasEntry) -> Self {
        Self {
            char: e.character.to_string(),
            char_code: e.code as u32,
            x: e.x as u32,
            y: e.y as u32,
            width: e.width as u32,
            height: e.height as u32,
        }
    }
}

/// Index for one font variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontMetadata {
    pub font_name: String,
    pub point_size: u32,
    pub pixel_height: u32,
    pub atlas_size: u32,
    pub char_count: u32,
    /// Ordered by character, which for single-byte codes is code order
    pub characters: BTreeMap<String, CharacterEntry>,
}

impl FontMetadata {
    pub fn new(font_name: &str, header: &FontHeader, layout: &AtlasLayout, entries: &[AtlasEntry]) -> Self {
        let characters = entries
            .iter()
            .map(|e| (e.character.to_string(), CharacterEntry::from(e)))
            .collect();

        Self {
            font_name: font_name.to_string(),
            point_size: header.point_size as u32,
            pixel_height: header.pixel_height as u32,
            atlas_size: layout.side as u32,
            char_count: entries.len() as u32,
            characters,
        }
    }

    /// Characters sorted by code
    pub fn sorted_characters(&self) -> Vec<&CharacterEntry> {
        let mut chars: Vec<_> = self.characters.values().collect();
        chars.sort_by_key(|c| c.char_code);
        chars
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
