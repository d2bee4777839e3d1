//! Sequential access to code table records.
//!
//! [`RecordIterator`] is a straight linear scan over the data region. It
//! knows nothing about the index table or letter groups; bounded scans
//! (a single letter) are done by handing it a shorter slice.
//!
//! # Example
//! ```no_run
//! # use codetable::CodeTableReader;
//! # let reader = CodeTableReader::open("def3.bin").unwrap();
//! let mut records = reader.iter_records();
//! for result in records.by_ref() {
//!     let record = result.unwrap();
//!     println!("{} {}", record.code(), record.word());
//! }
//! println!("skipped {} malformed records", records.skipped().len());
//! ```

use log::{info, warn};

use super::format::record::{self, Frame};
use super::types::error::Result;
use super::types::models::{DecodeReport, Record, SkippedRecord};

/// Iterator over the records of a byte buffer, starting at a fixed offset.
///
/// Yields `Ok(record)` for every well-formed frame. Frames with a bad
/// length or encoding are stepped over and collected in [`skipped`](Self::skipped).
/// A frame that runs past the end of the buffer is yielded once as
/// `Err(TruncatedRecord)`, after which the iterator is exhausted.
#[derive(Debug)]
pub struct RecordIterator<'a> {
    data: &'a [u8],
    start: usize,
    position: usize,
    finished: bool,
    skipped: Vec<SkippedRecord>,
}

impl<'a> RecordIterator<'a> {
    /// Starts a scan of `data` at absolute offset `start`.
    pub fn new(data: &'a [u8], start: usize) -> Self {
        Self {
            data,
            start,
            position: start,
            finished: false,
            skipped: Vec::new(),
        }
    }

    /// Absolute offset of the next frame to be read.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Records skipped so far.
    pub fn skipped(&self) -> &[SkippedRecord] {
        &self.skipped
    }

    /// Moves the skipped records out, leaving the list empty.
    pub fn take_skipped(&mut self) -> Vec<SkippedRecord> {
        std::mem::take(&mut self.skipped)
    }

    /// Rewinds to the starting offset and forgets earlier skips.
    pub fn restart(&mut self) {
        self.position = self.start;
        self.finished = false;
        self.skipped.clear();
    }

    /// Runs the scan to completion and gathers everything it produced.
    pub fn into_report(mut self) -> DecodeReport {
        let mut report = DecodeReport::default();
        for result in self.by_ref() {
            match result {
                Ok(record) => report.records.push(record),
                Err(e) => report.truncated = Some(e),
            }
        }
        report.skipped = self.take_skipped();
        info!(
            "Decoded {} records, skipped {}{}",
            report.processed(),
            report.skipped_count(),
            if report.truncated.is_some() { ", stopped at a truncated record" } else { "" }
        );
        report
    }
}

impl Iterator for RecordIterator<'_> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.finished {
            let offset = self.position;
            match record::read_frame(self.data, offset) {
                Ok(Some((Frame::Record(record), next))) => {
                    self.position = next;
                    return Some(Ok(record));
                }
                Ok(Some((Frame::Malformed(error), next))) => {
                    warn!("Skipping record at {:#x}: {}", offset, error);
                    self.skipped.push(SkippedRecord { offset, error });
                    self.position = next;
                }
                Ok(None) => self.finished = true,
                Err(e) => {
                    warn!("Stopping scan at {:#x}: {}", offset, e);
                    self.finished = true;
                    return Some(Err(e));
                }
            }
        }
        None
    }
}

impl std::iter::FusedIterator for RecordIterator<'_> {}
