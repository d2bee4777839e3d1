//! Text helpers shared by the builder and the source adapters.

use std::sync::OnceLock;

use encoding_rs::{Encoding, GB18030, UTF_8};
use log::{debug, warn};
use regex::Regex;

use super::types::error::{CodeTableError, Result};

static WHITESPACE_RUN: OnceLock<Regex> = OnceLock::new();

fn whitespace_regex() -> &'static Regex {
    WHITESPACE_RUN.get_or_init(|| Regex::new(r"\s+").expect("Invalid whitespace regex pattern"))
}

/// Trims `line` and replaces every whitespace run with a single space.
pub fn collapse_whitespace(line: &str) -> String {
    whitespace_regex().replace_all(line.trim(), " ").into_owned()
}

/// Decodes text input of unknown encoding.
///
/// A byte order mark decides the encoding outright. Otherwise the bytes
/// must be valid UTF-8, or failing that valid GB18030.
pub fn decode_text(bytes: &[u8]) -> Result<String> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        debug!("BOM detected: {}", encoding.name());
        return encoding
            .decode_without_bom_handling_and_without_replacement(&bytes[bom_len..])
            .map(|text| text.into_owned())
            .ok_or(CodeTableError::InvalidEncoding {
                offset: bom_len,
                field: "text",
            });
    }

    for encoding in [UTF_8, GB18030] {
        if let Some(text) = encoding.decode_without_bom_handling_and_without_replacement(bytes) {
            debug!("Decoded text input as {}", encoding.name());
            return Ok(text.into_owned());
        }
    }

    Err(CodeTableError::InvalidEncoding {
        offset: 0,
        field: "text",
    })
}

/// Like [`decode_text`], but never fails: undecodable input is read as
/// UTF-8 with invalid sequences replaced by U+FFFD.
pub fn decode_text_lossy(bytes: &[u8]) -> String {
    decode_text(bytes).unwrap_or_else(|e| {
        warn!("{}; decoding lossily as UTF-8", e);
        UTF_8.decode(bytes).0.into_owned()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_mixed_whitespace() {
        assert_eq!(collapse_whitespace("  ni \t\t你  好 \r\n"), "ni 你 好");
        assert_eq!(collapse_whitespace("   "), "");
    }

    #[test]
    fn decodes_utf8_with_and_without_bom() {
        assert_eq!(decode_text("ni 你".as_bytes()).unwrap(), "ni 你");
        let mut with_bom = vec![0xEF, 0xBB, 0xBF];
        with_bom.extend_from_slice("an 安".as_bytes());
        assert_eq!(decode_text(&with_bom).unwrap(), "an 安");
    }

    #[test]
    fn falls_back_to_gb18030() {
        let (bytes, _, _) = GB18030.encode("编码,词条");
        assert_eq!(decode_text(&bytes).unwrap(), "编码,词条");
    }

    #[test]
    fn decodes_utf16le_with_bom() {
        let mut bytes = vec![0xFF, 0xFE];
        bytes.extend("wo 我".encode_utf16().flat_map(u16::to_le_bytes));
        assert_eq!(decode_text(&bytes).unwrap(), "wo 我");
    }

    #[test]
    fn lossy_decoding_keeps_the_readable_lines() {
        // 0xFF is invalid in both UTF-8 and GB18030
        let bytes = b"ni 1\n\xFF\nni 1\n";
        assert!(decode_text(bytes).is_err());
        assert_eq!(decode_text_lossy(bytes), "ni 1\n\u{FFFD}\nni 1\n");
    }
}
