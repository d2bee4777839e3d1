//! Flag byte and index table handling.
//!
//! # Header Structure
//! ```text
//! [1 byte]    Flag, always 0x00
//! [108 bytes] 27 little-endian u32 index entries
//! ```

use std::io::Write;

use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};
use log::{trace, warn};

use super::layout::{FLAG_BYTE, FLAG_SIZE, HEADER_SIZE, INDEX_ENTRY_COUNT};
use crate::codetable::types::error::{CodeTableError, Result};
use crate::codetable::types::models::IndexTable;

/// Parses the index table from the start of a file image.
///
/// The entries are returned as stored; callers that rely on them for range
/// lookups should check [`IndexTable::is_monotonic`].
pub fn parse(data: &[u8]) -> Result<IndexTable> {
    if data.len() < HEADER_SIZE {
        return Err(CodeTableError::InvalidFormat(format!(
            "File is {} bytes, shorter than the {} byte header",
            data.len(),
            HEADER_SIZE
        )));
    }

    if data[0] != FLAG_BYTE {
        warn!("Unexpected flag byte {:#04x}, expected {:#04x}", data[0], FLAG_BYTE);
    }

    let mut entries = [0u32; INDEX_ENTRY_COUNT];
    LittleEndian::read_u32_into(&data[FLAG_SIZE..HEADER_SIZE], &mut entries);
    trace!("Index table: {:?}", entries);

    Ok(IndexTable::from_entries(entries))
}

/// Writes the flag byte followed by the 27 index entries.
pub fn write<W: Write>(writer: &mut W, index: &IndexTable) -> Result<()> {
    writer.write_u8(FLAG_BYTE)?;
    for &entry in index.entries() {
        writer.write_u32::<LittleEndian>(entry)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_parse_keeps_entries() {
        let mut ends = [24u32; 26];
        ends[..13].fill(12);
        let index = IndexTable::from_end_offsets(ends);

        let mut buf = Vec::new();
        write(&mut buf, &index).unwrap();
        assert_eq!(buf.len(), HEADER_SIZE);
        assert_eq!(buf[0], 0);
        assert_eq!(&buf[1..5], &[0, 0, 0, 0]);
        assert_eq!(&buf[5..9], &[12, 0, 0, 0]);

        assert_eq!(parse(&buf).unwrap(), index);
    }

    #[test]
    fn short_header_is_rejected() {
        let err = parse(&[0u8; 40]).unwrap_err();
        assert!(matches!(err, CodeTableError::InvalidFormat(_)));
    }
}
