//! Core code table codec module

pub mod builder;
pub mod format;
pub mod iter;
pub mod reader;
pub mod source;
pub mod types;
mod utils;

pub use builder::{CodeTable, CodeTableBuilder};
pub use iter::RecordIterator;
pub use reader::CodeTableReader;
pub use types::error::{CodeTableError, Result};
pub use utils::{collapse_whitespace, decode_text, decode_text_lossy};

/// Starts a linear scan of `bytes` at `offset`.
///
/// Pass [`HEADER_SIZE`](format::layout::HEADER_SIZE) to skip the header, or
/// `HEADER_SIZE` plus an index table entry to start at a letter's group.
pub fn decode(bytes: &[u8], offset: usize) -> RecordIterator<'_> {
    RecordIterator::new(bytes, offset)
}

/// Builds a code table from `(code, word)` pairs in one call.
pub fn build<I, C, W>(pairs: I) -> Result<CodeTable>
where
    I: IntoIterator<Item = (C, W)>,
    C: AsRef<str>,
    W: AsRef<str>,
{
    let mut builder = CodeTableBuilder::new();
    builder.extend_pairs(pairs);
    builder.build()
}
