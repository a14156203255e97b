//! NE Resource Directory
//!
//! Locates the FNT font resources embedded in a segmented (NE) executable.
//! The MZ stub stores the NE header offset at 0x3C; the NE header stores the
//! resource table offset (relative to itself) at +0x24. The resource table
//! starts with an alignment shift followed by type blocks:
//!
//! ```text
//! u16 type_id | u16 count | u32 reserved | count x 12-byte entries
//! ```
//!
//! and ends with a zero type id.

use crate::reader::ByteReader;
use crate::{FontError, Result};

/// File offset of the pointer to the NE header
pub const NE_POINTER_OFFSET: usize = 0x3C;
/// Offset of the resource table pointer inside the NE header
pub const NE_RESOURCE_TABLE_OFFSET: usize = 0x24;
/// Resource type id for FNT font resources (RT_FONT with the integer-id bit)
pub const RT_FONT: u16 = 0x8008;
/// Size of a type block header (type id, count, reserved)
pub const TYPE_BLOCK_SIZE: usize = 8;
/// Size of one resource directory entry
pub const RESOURCE_ENTRY_SIZE: usize = 12;

/// One embedded font resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontResourceRef {
    /// Absolute byte offset of the FNT resource
    pub offset: usize,
    /// Declared resource length in bytes
    pub length: usize,
    /// Resource id from the directory entry
    pub id: u16,
}

/// Check the MZ and NE signatures
pub fn is_ne_container(data: &[u8]) -> bool {
    if data.len() < 2 || &data[0..2] != b"MZ" {
        return false;
    }
    let reader = ByteReader::new(data);
    match reader.u32_at(NE_POINTER_OFFSET) {
        Ok(ne) => reader
            .bytes_at(ne as usize, 2)
            .map(|sig| sig == b"NE")
            .unwrap_or(false),
        Err(_) => false,
    }
}

/// Find every font resource in the container, in directory order.
///
/// Returns an empty list when the directory ends before a font block is seen.
/// Only the first font block is collected.
pub fn locate_fonts(data: &[u8]) -> Result<Vec<FontResourceRef>> {
    let mut reader = ByteReader::new(data);

    let ne_offset = reader.u32_at(NE_POINTER_OFFSET)? as usize;
    let table_offset = ne_offset + reader.u16_at(ne_offset + NE_RESOURCE_TABLE_OFFSET)? as usize;

    reader.seek(table_offset);
    let shift = reader.read_u16()?;
    let unit = 1usize
        .checked_shl(shift as u32)
        .ok_or(FontError::BadAlignment(shift))?;
    let scale = |raw: u16| (raw as usize).checked_mul(unit).ok_or(FontError::BadAlignment(shift));

    loop {
        let type_id = reader.read_u16()?;
        if type_id == 0 {
            tracing::debug!("resource directory ends without a font block");
            return Ok(Vec::new());
        }
        let count = reader.read_u16()? as usize;
        reader.skip(4)?;

        if type_id != RT_FONT {
            reader.skip(count * RESOURCE_ENTRY_SIZE)?;
            continue;
        }

        let mut fonts = Vec::with_capacity(count);
        for _ in 0..count {
            let entry = reader.pos();
            let offset = scale(reader.u16_at(entry)?)?;
            let length = scale(reader.u16_at(entry + 2)?)?;
            let id = reader.u16_at(entry + 6)?;
            reader.skip(RESOURCE_ENTRY_SIZE)?;

            tracing::debug!(offset, length, id, "located font resource");
            fonts.push(FontResourceRef { offset, length, id });
        }
        return Ok(fonts);
    }
}
