//! # codetable
//!
//! Reader and builder for index-accelerated binary code tables: files that
//! map short lowercase letter codes (input-method shorthands) to words,
//! prefixed by a 27-entry jump table giving each leading letter's byte range.
//!
//! Decoding is a lazy linear scan that skips malformed records instead of
//! giving up; building deduplicates, sorts and indexes a set of pairs.
pub mod codetable;

// Re-export the main types for convenience
pub use codetable::{
    build, decode, decode_text, decode_text_lossy,
    format::layout::HEADER_SIZE,
    source::{self, DuplicateLine, TableRow},
    types::models::{
        BuildSummary, DecodeReport, IndexTable, PairOutcome, Record, RejectedRecord,
        SkippedRecord,
    },
    CodeTable, CodeTableBuilder, CodeTableError, CodeTableReader, RecordIterator, Result,
};
