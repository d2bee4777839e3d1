//! # Record Frame Encoding & Decoding
//!
//! Every record in the data region is one self-delimiting frame:
//!
//! ```text
//! [1 byte]   M, code length
//! [1 byte]   N, UTF-16LE word length + 2
//! [M bytes]  code, lowercase ASCII
//! [N-2]      word, UTF-16LE
//! [6 bytes]  0x00 padding
//! ```
//!
//! The two length bytes alone determine where the next frame starts, so a
//! frame with a bad code or word can be stepped over without losing sync.
//! Only a frame that runs past the end of the buffer stops decoding.

use std::io::Write;

use byteorder::{LittleEndian, WriteBytesExt};
use encoding_rs::UTF_16LE;
use log::trace;

use super::layout::{PADDING_SIZE, WORD_LENGTH_BIAS};
use crate::codetable::types::error::{CodeTableError, Result};
use crate::codetable::types::models::{check_lengths, stored_word_length, Record};

/// A frame that was fully consumed, whether or not its content was usable.
#[derive(Debug)]
pub enum Frame {
    Record(Record),
    /// The framing was intact but the content was not; the error is always
    /// recoverable.
    Malformed(CodeTableError),
}

/// Decodes the frame starting at `offset`.
///
/// # Returns
/// - `Ok(None)` if `offset` is at (or past) the end of `data`
/// - `Ok(Some((frame, next_offset)))` once the whole frame was consumed
/// - `Err(TruncatedRecord)` if the frame extends beyond `data`
pub fn read_frame(data: &[u8], offset: usize) -> Result<Option<(Frame, usize)>> {
    let mut reader = data.get(offset..).unwrap_or(&[]);
    let frame_start_len = reader.len();

    let code_len = match reader.split_first() {
        Some((&m, rest)) => {
            reader = rest;
            m as usize
        }
        None => return Ok(None),
    };
    let stored_len = take(&mut reader, 1, offset, "word length")?[0];
    let code_bytes = take(&mut reader, code_len, offset, "code")?;

    let code_problem = if code_len == 0 {
        Some(CodeTableError::InvalidLength {
            offset,
            field: "code",
            length: 0,
        })
    } else if !code_bytes.iter().all(u8::is_ascii_lowercase) {
        Some(CodeTableError::InvalidEncoding {
            offset,
            field: "code",
        })
    } else {
        None
    };

    // A stored length below the bias has no word bytes to skip.
    let word_len = stored_len as i32 - WORD_LENGTH_BIAS as i32;
    let word = if word_len < 0 {
        Err(CodeTableError::InvalidLength {
            offset,
            field: "word",
            length: word_len,
        })
    } else {
        let word_bytes = take(&mut reader, word_len as usize, offset, "word")?;
        if word_len % 2 != 0 {
            Err(CodeTableError::InvalidLength {
                offset,
                field: "word",
                length: word_len,
            })
        } else {
            UTF_16LE
                .decode_without_bom_handling_and_without_replacement(word_bytes)
                .map(|text| text.into_owned())
                .ok_or(CodeTableError::InvalidEncoding {
                    offset,
                    field: "word",
                })
        }
    };

    take(&mut reader, PADDING_SIZE, offset, "padding")?;
    let next_offset = offset + (frame_start_len - reader.len());

    let frame = match (code_problem, word) {
        (Some(err), _) | (None, Err(err)) => Frame::Malformed(err),
        (None, Ok(word)) => {
            // Validated as lowercase ASCII above.
            let code = code_bytes.iter().map(|&b| b as char).collect();
            Frame::Record(Record::from_decoded(code, word))
        }
    };
    trace!("Frame at {:#x}..{:#x}: {:?}", offset, next_offset, frame);

    Ok(Some((frame, next_offset)))
}

/// Writes one record frame and returns the number of bytes written.
///
/// # Errors
/// `RecordTooLarge` if the record does not fit the length bytes; nothing is
/// written in that case.
pub fn write_frame<W: Write>(writer: &mut W, record: &Record) -> Result<usize> {
    let code = record.code();
    let units: Vec<u16> = record.word().encode_utf16().collect();
    let word_len = units.len() * 2;
    check_lengths(code, code.len(), word_len)?;

    writer.write_u8(code.len() as u8)?;
    writer.write_u8(stored_word_length(word_len))?;
    writer.write_all(code.as_bytes())?;
    for unit in units {
        writer.write_u16::<LittleEndian>(unit)?;
    }
    writer.write_all(&[0u8; PADDING_SIZE])?;

    Ok(record.encoded_len())
}

/// Splits `n` bytes off the front of `reader`.
fn take<'a>(
    reader: &mut &'a [u8],
    n: usize,
    offset: usize,
    field: &'static str,
) -> Result<&'a [u8]> {
    if reader.len() < n {
        return Err(CodeTableError::TruncatedRecord {
            offset,
            field,
            needed: n,
            available: reader.len(),
        });
    }
    let (head, tail) = reader.split_at(n);
    *reader = tail;
    Ok(head)
}
