//! Fixed constants of the code table format.
//!
//! These are invariants of the on-disk layout, not configuration.

/// Value of the leading flag byte.
pub const FLAG_BYTE: u8 = 0x00;

/// Width of the flag byte at offset 0.
pub const FLAG_SIZE: usize = 1;

/// Number of little-endian `u32` entries in the index table.
pub const INDEX_ENTRY_COUNT: usize = 27;

/// Width of a single index table entry.
pub const INDEX_ENTRY_WIDTH: usize = 4;

/// Offset of the data region (0x6D).
pub const HEADER_SIZE: usize = FLAG_SIZE + INDEX_ENTRY_COUNT * INDEX_ENTRY_WIDTH;

/// Trailing zero bytes after every record.
pub const PADDING_SIZE: usize = 6;

/// Per-record framing: the two length bytes plus the padding.
pub const FRAME_OVERHEAD: usize = 2 + PADDING_SIZE;

/// Extra value stored on top of the word byte length in the N byte.
pub const WORD_LENGTH_BIAS: usize = 2;

/// Longest code that fits the M length byte.
pub const MAX_CODE_LEN: usize = u8::MAX as usize;

/// Longest UTF-16LE word that fits the N length byte.
pub const MAX_WORD_BYTES: usize = u8::MAX as usize - WORD_LENGTH_BIAS;

/// Letters covered by the index table, in group order.
pub const ALPHABET: &[u8; 26] = b"abcdefghijklmnopqrstuvwxyz";

/// Returns the 0-based alphabet position of a lowercase ASCII letter.
pub fn letter_position(letter: u8) -> Option<usize> {
    letter.is_ascii_lowercase().then(|| (letter - b'a') as usize)
}
