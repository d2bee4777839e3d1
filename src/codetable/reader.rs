use std::fs;
use std::path::Path;

use log::{debug, info};

use super::format::{header, layout::HEADER_SIZE};
use super::iter::RecordIterator;
use super::types::error::{CodeTableError, Result};
use super::types::models::{DecodeReport, IndexTable};

/// Reader for code table files.
///
/// The whole file is held in memory. Scans borrow from the reader, so any
/// number of independent iterators can run over the same image.
#[derive(Debug, Clone)]
pub struct CodeTableReader {
    data: Vec<u8>,
}

impl CodeTableReader {
    /// Reads a code table file from the given path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read. The content is not
    /// checked until it is scanned.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening code table: {}", path.display());
        let data = fs::read(path)?;
        debug!("Read {} bytes", data.len());
        Ok(Self::from_bytes(data))
    }

    /// Wraps an in-memory file image.
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self { data }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Length of everything after the fixed header.
    pub fn data_region_len(&self) -> usize {
        self.data.len().saturating_sub(HEADER_SIZE)
    }

    /// Parses the index table from the header.
    pub fn index_table(&self) -> Result<IndexTable> {
        header::parse(&self.data)
    }

    /// Scans every record of the data region, starting at 0x6D.
    pub fn iter_records(&self) -> RecordIterator<'_> {
        self.iter_from(HEADER_SIZE)
    }

    /// Scans from an arbitrary absolute offset to the end of the file.
    ///
    /// The offset must point at the start of a frame; no resynchronisation
    /// is attempted.
    pub fn iter_from(&self, offset: usize) -> RecordIterator<'_> {
        RecordIterator::new(&self.data, offset)
    }

    /// Scans only the group of records whose code starts with `letter`,
    /// using the index table to jump straight to it.
    ///
    /// # Errors
    /// - `InvalidCode` if `letter` is not in `a..=z`
    /// - `InvalidFormat` if the header is missing, the table is not
    ///   monotonic, or the range lies outside the file
    pub fn iter_letter(&self, letter: char) -> Result<RecordIterator<'_>> {
        let index = self.index_table()?;
        if !index.is_monotonic() {
            return Err(CodeTableError::InvalidFormat(
                "Index table is not monotonic".to_string(),
            ));
        }
        let range = index
            .letter_range(letter)
            .ok_or_else(|| CodeTableError::InvalidCode(letter.to_string()))?;

        let start = HEADER_SIZE + range.start as usize;
        let end = HEADER_SIZE + range.end as usize;
        if end > self.data.len() {
            return Err(CodeTableError::InvalidFormat(format!(
                "Group '{}' ends at {:#x}, beyond the file end {:#x}",
                letter,
                end,
                self.data.len()
            )));
        }
        debug!("Group '{}' spans {:#x}..{:#x}", letter, start, end);

        Ok(RecordIterator::new(&self.data[..end], start))
    }

    /// Runs a full scan and gathers everything it produced.
    pub fn decode_all(&self) -> DecodeReport {
        self.iter_records().into_report()
    }
}
