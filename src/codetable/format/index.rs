//! Per-letter end offset computation.
//!
//! Works on records already sorted by code. A single pass keeps a running
//! offset into the data region; whenever the leading letter changes from
//! `L1` to `L2`, every letter in `[L1, L2)` that has no end offset yet gets
//! the current offset. Letters before the first record's letter end at 0,
//! and after the last record everything from its letter through `z` ends at
//! the final offset. Empty groups thus repeat the previous boundary.

use log::debug;

use super::layout::ALPHABET;
use crate::codetable::types::error::{CodeTableError, Result};
use crate::codetable::types::models::{IndexTable, Record};

/// Computes the index table for `records`, which must be sorted by code.
///
/// # Errors
/// - `InvalidFormat` if the leading letters are not in ascending order
/// - `IndexOverflow` if the data region exceeds `u32::MAX` bytes
pub fn compute<'a, I>(records: I) -> Result<IndexTable>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut ends: [Option<u32>; 26] = [None; 26];
    let mut offset: u64 = 0;
    let mut prev_letter: Option<usize> = None;

    for record in records {
        let letter = record.letter_index();
        if prev_letter != Some(letter) {
            let from = prev_letter.unwrap_or(0);
            if letter < from {
                return Err(CodeTableError::InvalidFormat(format!(
                    "Records are not sorted: '{}' follows group '{}'",
                    record.code(),
                    ALPHABET[from] as char
                )));
            }
            let current = to_u32(offset)?;
            for slot in &mut ends[from..letter] {
                slot.get_or_insert(current);
            }
            prev_letter = Some(letter);
        }
        offset += record.encoded_len() as u64;
    }

    let total = to_u32(offset)?;
    for slot in &mut ends[prev_letter.unwrap_or(0)..] {
        slot.get_or_insert(total);
    }

    let ends = ends.map(|slot| slot.unwrap_or(total));
    for (letter, end) in ALPHABET.iter().zip(ends.iter()) {
        debug!("  {}: {}", *letter as char, end);
    }

    Ok(IndexTable::from_end_offsets(ends))
}

fn to_u32(offset: u64) -> Result<u32> {
    u32::try_from(offset).map_err(|_| CodeTableError::IndexOverflow { size: offset })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(pairs: &[(&str, &str)]) -> Vec<Record> {
        pairs
            .iter()
            .map(|(c, w)| Record::new(*c, *w).unwrap())
            .collect()
    }

    #[test]
    fn empty_input_is_all_zero() {
        let index = compute(Vec::<Record>::new().iter()).unwrap();
        assert_eq!(index.entries(), &[0u32; 27]);
    }

    #[test]
    fn back_fills_leading_and_trailing_letters() {
        // each frame: 1 + 2 + 8 = 11 bytes
        let recs = records(&[("c", "中"), ("c", "文"), ("f", "字")]);
        let index = compute(&recs).unwrap();
        let e = index.entries();
        assert_eq!(e[0], 0);
        assert_eq!(&e[1..3], &[0, 0]); // a, b
        assert_eq!(e[3], 22); // c
        assert_eq!(&e[4..6], &[22, 22]); // d, e
        assert_eq!(e[6], 33); // f
        assert!(e[7..].iter().all(|&v| v == 33));
        assert!(index.is_monotonic());
        assert_eq!(index.letter_range('c'), Some(0..22));
        assert_eq!(index.letter_range('d'), Some(22..22));
    }

    #[test]
    fn single_z_group() {
        let recs = records(&[("zz", "再")]);
        let index = compute(&recs).unwrap();
        assert!(index.entries()[..26].iter().all(|&v| v == 0));
        assert_eq!(index.data_len(), 12);
        assert_eq!(index.letter_range('z'), Some(0..12));
    }

    #[test]
    fn unsorted_letters_are_refused() {
        let recs = records(&[("b", "一"), ("a", "二")]);
        assert!(matches!(
            compute(&recs),
            Err(CodeTableError::InvalidFormat(_))
        ));
    }
}
