//! Code table construction.
//!
//! Pairs pass through four stages:
//! 1. **Filter**: codes that are empty or do not start with `a..=z` are dropped
//! 2. **Deduplicate**: the first occurrence of each exact `(code, word)` pair wins
//! 3. **Sort**: stable ascending order by code, so equal codes keep arrival order
//! 4. **Encode**: index table from [`format::index`], then the record frames
//!
//! Records that pass the filter but cannot be encoded are rejected one by
//! one and reported in the [`BuildSummary`]; they never abort the build.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use log::{debug, info, warn};

use super::format::{header, index, layout::HEADER_SIZE, record};
use super::types::error::Result;
use super::types::models::{BuildSummary, IndexTable, PairOutcome, Record, RejectedRecord};
use super::utils;

/// Accumulates `(code, word)` pairs and encodes them into a file image.
#[derive(Debug, Default)]
pub struct CodeTableBuilder {
    records: Vec<Record>,
    seen: HashSet<Record>,
    summary: BuildSummary,
}

/// A finished code table image.
#[derive(Debug)]
pub struct CodeTable {
    /// The complete file: flag byte, index table, data region.
    pub bytes: Vec<u8>,
    pub index: IndexTable,
    /// The encoded records in file order.
    pub records: Vec<Record>,
    pub summary: BuildSummary,
}

impl CodeTable {
    /// Bytes after the fixed header.
    pub fn data_region(&self) -> &[u8] {
        &self.bytes[HEADER_SIZE..]
    }

    /// Writes the image to `path`, replacing any existing file.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, &self.bytes)?;
        info!("Wrote {} records ({} bytes) to {}", self.records.len(), self.bytes.len(), path.display());
        Ok(())
    }
}

impl CodeTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offers a single pair to the builder.
    pub fn add_pair(&mut self, code: &str, word: &str) -> PairOutcome {
        self.summary.input += 1;
        self.push(code, word)
    }

    /// Offers a raw `<code> <word>` text line.
    ///
    /// Whitespace runs collapse to a single space before the line is split at
    /// its first space, so the word may itself contain (single) spaces.
    /// Lines without a word part are filtered.
    pub fn add_line(&mut self, line: &str) -> PairOutcome {
        self.summary.input += 1;
        let normalized = utils::collapse_whitespace(line);
        match normalized.split_once(' ') {
            Some((code, word)) => self.push(code, word),
            None => {
                if !normalized.is_empty() {
                    debug!("Filtered line without a word: {:?}", line);
                }
                self.summary.filtered += 1;
                PairOutcome::Filtered
            }
        }
    }

    pub fn extend_pairs<I, C, W>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (C, W)>,
        C: AsRef<str>,
        W: AsRef<str>,
    {
        for (code, word) in pairs {
            self.add_pair(code.as_ref(), word.as_ref());
        }
    }

    pub fn extend_lines<I, L>(&mut self, lines: I)
    where
        I: IntoIterator<Item = L>,
        L: AsRef<str>,
    {
        for line in lines {
            self.add_line(line.as_ref());
        }
    }

    /// Counters for everything offered so far.
    pub fn summary(&self) -> &BuildSummary {
        &self.summary
    }

    /// Number of distinct records that will be encoded.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sorts, indexes and encodes the accepted records.
    ///
    /// # Errors
    /// `IndexOverflow` if the data region would not fit 32-bit offsets.
    pub fn build(self) -> Result<CodeTable> {
        let Self {
            mut records,
            summary,
            ..
        } = self;

        records.sort_by(|a, b| a.code().cmp(b.code()));
        let index = index::compute(&records)?;

        let mut bytes = Vec::with_capacity(HEADER_SIZE + index.data_len() as usize);
        header::write(&mut bytes, &index)?;
        for rec in &records {
            record::write_frame(&mut bytes, rec)?;
        }

        info!("Built code table: {}", summary);
        Ok(CodeTable {
            bytes,
            index,
            records,
            summary,
        })
    }

    fn push(&mut self, code: &str, word: &str) -> PairOutcome {
        if !code.as_bytes().first().is_some_and(u8::is_ascii_lowercase) {
            self.summary.filtered += 1;
            return PairOutcome::Filtered;
        }

        let rec = match Record::new(code, word) {
            Ok(rec) => rec,
            Err(reason) => {
                warn!("Rejected record '{}': {}", code, reason);
                self.summary.rejected.push(RejectedRecord {
                    code: code.to_string(),
                    word: word.to_string(),
                    reason,
                });
                return PairOutcome::Rejected;
            }
        };

        if !self.seen.insert(rec.clone()) {
            self.summary.duplicates += 1;
            return PairOutcome::Duplicate;
        }

        self.records.push(rec);
        self.summary.accepted += 1;
        PairOutcome::Accepted
    }
}
