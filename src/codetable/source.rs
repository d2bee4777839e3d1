//! Text and tabular adapters around the codec.
//!
//! Producers hand the builder either `<code> <word>` lines or rows of a
//! code table export with the columns `编码` (code), `词条` (word) and an
//! optional `候选排序` (candidate rank). Consumers of the decoder usually
//! want the same `<code> <word>` lines back.
//!
//! Tables are read with the `csv` crate, so quoting follows RFC 4180.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use log::{debug, info};

use super::types::error::{CodeTableError, Result};
use super::types::models::Record;
use super::utils;

pub const CODE_COLUMN: &str = "编码";
pub const WORD_COLUMN: &str = "词条";
pub const RANK_COLUMN: &str = "候选排序";

/// One row of a tabular source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub code: String,
    pub word: String,
    /// Candidate order within the code; smaller comes first.
    pub rank: Option<i64>,
}

/// A line that occurs more than once in a text file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateLine {
    pub line: String,
    pub count: usize,
}

/// Reads a text file of unknown encoding and returns its non-empty lines.
pub fn read_lines(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let text = utils::decode_text(&fs::read(path)?)?;
    let lines: Vec<String> = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect();
    info!("Read {} lines from {}", lines.len(), path.display());
    Ok(lines)
}

/// Reads and parses a tabular source file.
pub fn read_table(path: impl AsRef<Path>) -> Result<Vec<TableRow>> {
    let path = path.as_ref();
    let text = utils::decode_text(&fs::read(path)?)?;
    let rows = parse_table(&text)?;
    info!("Read {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Parses comma-separated text whose first record names the columns.
///
/// Quoted fields may contain commas, doubled quotes and line breaks. Rows
/// too short to hold both the code and the word column are skipped. An
/// empty input yields no rows.
///
/// # Errors
/// `MissingColumn` if the header lacks `编码` or `词条`; `Csv` if the text
/// is not well-formed CSV.
pub fn parse_table(text: &str) -> Result<Vec<TableRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let header = reader.headers()?.clone();
    if header.iter().all(|h| h.trim().is_empty()) {
        return Ok(Vec::new());
    }

    let find = |name: &'static str| header.iter().position(|h| h.trim() == name);
    let code_col = find(CODE_COLUMN).ok_or(CodeTableError::MissingColumn(CODE_COLUMN))?;
    let word_col = find(WORD_COLUMN).ok_or(CodeTableError::MissingColumn(WORD_COLUMN))?;
    let rank_col = find(RANK_COLUMN);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let (Some(code), Some(word)) = (record.get(code_col), record.get(word_col)) else {
            debug!("Skipping short row: {:?}", record);
            continue;
        };
        let rank = rank_col
            .and_then(|col| record.get(col))
            .and_then(|value| value.trim().parse().ok());
        rows.push(TableRow {
            code: code.trim().to_string(),
            word: word.trim().to_string(),
            rank,
        });
    }
    Ok(rows)
}

/// Orders rows by code, then by ascending rank, unranked rows last.
///
/// The sort is stable, so rows with equal code and rank keep their input
/// order. Feeding the result to the builder makes the rank decide which of
/// several words for one code comes first in the file.
pub fn order_by_rank(rows: &mut [TableRow]) {
    rows.sort_by(|a, b| {
        a.code
            .cmp(&b.code)
            .then_with(|| (a.rank.is_none(), a.rank).cmp(&(b.rank.is_none(), b.rank)))
    });
}

/// Renders a record as a `<code> <word>` line.
pub fn format_line(record: &Record) -> String {
    format!("{} {}", record.code(), record.word())
}

/// Writes `<code> <word>` lines as UTF-8.
pub fn write_lines<'a, I>(path: impl AsRef<Path>, records: I) -> Result<usize>
where
    I: IntoIterator<Item = &'a Record>,
{
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    let mut count = 0;
    for record in records {
        writeln!(writer, "{}", format_line(record))?;
        count += 1;
    }
    writer.flush()?;
    info!("Wrote {} lines to {}", count, path.display());
    Ok(count)
}

/// Lists lines that appear more than once, most frequent first.
///
/// Trailing line breaks are ignored and empty lines are not counted. Lines
/// with equal counts are listed in order of first appearance.
pub fn duplicate_lines(text: &str) -> Vec<DuplicateLine> {
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (idx, line) in text.lines().enumerate() {
        if line.is_empty() {
            continue;
        }
        counts.entry(line).or_insert((0, idx)).0 += 1;
    }

    let mut dupes: Vec<(&str, usize, usize)> = counts
        .into_iter()
        .filter(|(_, (count, _))| *count > 1)
        .map(|(line, (count, first))| (line, count, first))
        .collect();
    dupes.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    dupes
        .into_iter()
        .map(|(line, count, _)| DuplicateLine {
            line: line.to_string(),
            count,
        })
        .collect()
}
