//! Core data structures for code table components.
//!
//! This module defines the fundamental types used throughout the library:
//! - The `(code, word)` record and its size rules
//! - The per-letter index table
//! - Summaries returned by the decoder and the builder

use std::fmt;
use std::ops::Range;

use super::error::{CodeTableError, Result};
use crate::codetable::format::layout::{
    letter_position, FRAME_OVERHEAD, INDEX_ENTRY_COUNT, MAX_CODE_LEN, MAX_WORD_BYTES,
    WORD_LENGTH_BIAS,
};

/// A single code table entry.
///
/// The code is a non-empty run of lowercase ASCII letters; the word is any
/// text whose UTF-16LE form fits the one-byte length field. Both are fixed
/// once the record exists.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Record {
    code: String,
    word: String,
}

impl Record {
    /// Creates a validated record.
    ///
    /// # Errors
    /// - `InvalidCode` if `code` is empty or contains anything but `a..=z`
    /// - `RecordTooLarge` if `code` exceeds 255 bytes or `word` exceeds
    ///   253 UTF-16LE bytes
    pub fn new(code: impl Into<String>, word: impl Into<String>) -> Result<Self> {
        let code = code.into();
        let word = word.into();

        if code.is_empty() || !code.bytes().all(|b| b.is_ascii_lowercase()) {
            return Err(CodeTableError::InvalidCode(code));
        }

        let word_len = utf16_byte_len(&word);
        check_lengths(&code, code.len(), word_len)?;

        Ok(Self { code, word })
    }

    /// Builds a record from fields the frame decoder has already checked.
    pub(crate) fn from_decoded(code: String, word: String) -> Self {
        Self { code, word }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    /// The first byte of the code, which selects the record's group.
    pub fn leading_letter(&self) -> u8 {
        self.code.as_bytes()[0]
    }

    /// 0-based alphabet position of the leading letter.
    pub fn letter_index(&self) -> usize {
        (self.leading_letter() - b'a') as usize
    }

    /// Byte length of the word once encoded as UTF-16LE.
    pub fn word_byte_len(&self) -> usize {
        utf16_byte_len(&self.word)
    }

    /// Total size of the encoded frame: M + N + 6.
    pub fn encoded_len(&self) -> usize {
        self.code.len() + self.word_byte_len() + FRAME_OVERHEAD
    }

    pub fn into_pair(self) -> (String, String) {
        (self.code, self.word)
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code, self.word)
    }
}

/// Byte length of `text` in UTF-16LE.
pub fn utf16_byte_len(text: &str) -> usize {
    text.encode_utf16().count() * 2
}

/// Checks code and word byte lengths against the one-byte length fields.
pub(crate) fn check_lengths(code: &str, code_len: usize, word_len: usize) -> Result<()> {
    if code_len > MAX_CODE_LEN || word_len > MAX_WORD_BYTES {
        return Err(CodeTableError::RecordTooLarge {
            code: code.to_string(),
            code_len,
            word_len,
            max_code: MAX_CODE_LEN,
            max_word: MAX_WORD_BYTES,
        });
    }
    Ok(())
}

/// Value stored in the N byte for a word of `word_len` UTF-16LE bytes.
pub(crate) fn stored_word_length(word_len: usize) -> u8 {
    (word_len + WORD_LENGTH_BIAS) as u8
}

/// The 27-entry jump table at the start of every file.
///
/// Entry 0 is always 0. Entry `k + 1` is the end-exclusive offset, relative
/// to the data region, of the group for the `k`-th letter. Letter `k`
/// therefore owns `entries[k]..entries[k + 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexTable {
    entries: [u32; INDEX_ENTRY_COUNT],
}

impl IndexTable {
    /// Wraps the raw entries as read from a file. No validation is applied.
    pub fn from_entries(entries: [u32; INDEX_ENTRY_COUNT]) -> Self {
        Self { entries }
    }

    /// Builds a table from the 26 per-letter end offsets.
    pub fn from_end_offsets(ends: [u32; 26]) -> Self {
        let mut entries = [0u32; INDEX_ENTRY_COUNT];
        entries[1..].copy_from_slice(&ends);
        Self { entries }
    }

    pub fn entries(&self) -> &[u32; INDEX_ENTRY_COUNT] {
        &self.entries
    }

    /// End offsets for `a..=z`.
    pub fn end_offsets(&self) -> &[u32] {
        &self.entries[1..]
    }

    /// Byte range of a letter's group, relative to the data region.
    ///
    /// Returns `None` for characters outside `a..=z`. An empty group has
    /// `start == end`.
    pub fn letter_range(&self, letter: char) -> Option<Range<u32>> {
        let pos = u8::try_from(letter).ok().and_then(letter_position)?;
        Some(self.entries[pos]..self.entries[pos + 1])
    }

    /// Total length of the data region according to the table.
    pub fn data_len(&self) -> u32 {
        self.entries[INDEX_ENTRY_COUNT - 1]
    }

    /// Whether the sentinel is 0 and the entries never decrease.
    pub fn is_monotonic(&self) -> bool {
        self.entries[0] == 0 && self.entries.windows(2).all(|w| w[0] <= w[1])
    }
}

/// A record the decoder could not turn into a [`Record`] but skipped over.
#[derive(Debug)]
pub struct SkippedRecord {
    /// Absolute offset of the record's first length byte.
    pub offset: usize,
    pub error: CodeTableError,
}

/// Outcome of a complete linear scan.
#[derive(Debug, Default)]
pub struct DecodeReport {
    pub records: Vec<Record>,
    pub skipped: Vec<SkippedRecord>,
    /// Set when the scan stopped early on a truncated record.
    pub truncated: Option<CodeTableError>,
}

impl DecodeReport {
    pub fn processed(&self) -> usize {
        self.records.len()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    /// `true` when every byte of the data region was consumed without loss.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.truncated.is_none()
    }
}

/// What the builder did with a single input pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairOutcome {
    /// Kept for encoding.
    Accepted,
    /// The exact `(code, word)` pair was already present.
    Duplicate,
    /// Dropped by the leading-letter filter or an unsplittable line.
    Filtered,
    /// Passed the filter but cannot be encoded; see [`BuildSummary::rejected`].
    Rejected,
}

/// An input pair the builder refused to encode.
#[derive(Debug)]
pub struct RejectedRecord {
    pub code: String,
    pub word: String,
    pub reason: CodeTableError,
}

/// Counters collected while feeding the builder.
#[derive(Debug, Default)]
pub struct BuildSummary {
    /// Every pair or line offered to the builder.
    pub input: usize,
    pub accepted: usize,
    pub duplicates: usize,
    pub filtered: usize,
    pub rejected: Vec<RejectedRecord>,
}

impl BuildSummary {
    pub fn rejected_count(&self) -> usize {
        self.rejected.len()
    }
}

impl fmt::Display for BuildSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} input, {} accepted, {} duplicate, {} filtered, {} rejected",
            self.input,
            self.accepted,
            self.duplicates,
            self.filtered,
            self.rejected.len()
        )
    }
}
