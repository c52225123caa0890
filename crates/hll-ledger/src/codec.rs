//! Line codec for log entries.
//!
//! Persisted form, one entry per line:
//!
//! ```text
//! <previous_hash>,<escaped_message>,<date>,<nonce>
//! ```
//!
//! Only the message is escaped, and only the delimiter: `,` becomes `\,`.
//! Every other character, backslash included, is written verbatim.
//!
//! A delimiter is a field separator unless the character right before it is
//! a backslash. Decoding turns every `\,` in the message field back into `,`.
//!
//! Two kinds of message cannot be written this way and are refused before
//! mining (see [`ChainCodec::check_message`]):
//!
//! - a message ending in `\`, whose escape would swallow the next delimiter;
//! - a message containing a line feed or carriage return, which would split
//!   the entry across physical lines.
//!
//! For every other message `decode(encode(e)) == e`.

use hll_types::LogEntry;

use crate::error::{Corruption, LogError};

/// Field delimiter.
pub const DELIMITER: char = ',';
/// Escape marker inside the message field.
pub const ESCAPE: char = '\\';

/// Number of unescaped delimiters in a well-formed line.
const DELIMITER_COUNT: usize = 3;

/// Stateless encoder/decoder between [`LogEntry`] and its line form.
pub struct ChainCodec;

impl ChainCodec {
    /// Refuse a message the line format cannot represent.
    pub fn check_message(message: &str) -> Result<(), EncodeError> {
        if message.contains(['\n', '\r']) {
            return Err(EncodeError::LineBreak);
        }
        if message.ends_with(ESCAPE) {
            return Err(EncodeError::TrailingEscape);
        }
        Ok(())
    }

    /// Encode an entry as one line (no terminator).
    pub fn encode(entry: &LogEntry) -> String {
        format!(
            "{}{DELIMITER}{}{DELIMITER}{}{DELIMITER}{}",
            entry.previous_hash,
            escape_message(&entry.message),
            entry.date,
            entry.nonce
        )
    }

    /// Decode one line.
    pub fn decode(line: &str) -> Result<LogEntry, DecodeError> {
        let cuts = delimiter_positions(line);
        if cuts.len() != DELIMITER_COUNT {
            return Err(DecodeError::FieldCount {
                delimiters: cuts.len(),
            });
        }

        let previous_hash = &line[..cuts[0]];
        let message = unescape_message(&line[cuts[0] + 1..cuts[1]]);
        let date = &line[cuts[1] + 1..cuts[2]];
        let nonce_text = &line[cuts[2] + 1..];
        let nonce = nonce_text
            .parse::<u64>()
            .map_err(|_| DecodeError::InvalidNonce(nonce_text.to_string()))?;

        Ok(LogEntry::new(previous_hash, message, date, nonce))
    }

    /// Decode a whole chain, tagging failures with the 0-based line index.
    pub fn decode_all<S: AsRef<str>>(lines: &[S]) -> Result<Vec<LogEntry>, LogError> {
        lines
            .iter()
            .enumerate()
            .map(|(index, line)| {
                Self::decode(line.as_ref()).map_err(|source| {
                    LogError::from(Corruption::MalformedLine {
                        line: Some(index),
                        source,
                    })
                })
            })
            .collect()
    }
}

/// Why a message cannot be encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    #[error("message must not contain line breaks")]
    LineBreak,

    #[error("message must not end with a backslash")]
    TrailingEscape,
}

/// Why a line failed to decode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("expected 3 unescaped delimiters, found {delimiters}")]
    FieldCount { delimiters: usize },

    #[error("nonce {0:?} is not an unsigned integer")]
    InvalidNonce(String),
}

/// Escape a raw message for the persisted line.
pub fn escape_message(message: &str) -> String {
    message.replace(DELIMITER, "\\,")
}

/// Reverse [`escape_message`].
pub fn unescape_message(field: &str) -> String {
    field.replace("\\,", ",")
}

/// Byte offsets of every delimiter not directly preceded by an escape.
fn delimiter_positions(line: &str) -> Vec<usize> {
    let mut cuts = Vec::with_capacity(DELIMITER_COUNT);
    let mut previous = None;
    for (i, c) in line.char_indices() {
        if c == DELIMITER && previous != Some(ESCAPE) {
            cuts.push(i);
        }
        previous = Some(c);
    }
    cuts
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn entry(message: &str) -> LogEntry {
        LogEntry::new("0a".repeat(32), message, "2026-10-17T08:15:30.123Z", 1234)
    }

    #[test]
    fn encode_plain_entry() {
        let line = ChainCodec::encode(&entry("hello"));
        assert_eq!(
            line,
            format!("{},hello,2026-10-17T08:15:30.123Z,1234", "0a".repeat(32))
        );
    }

    #[test]
    fn encode_escapes_delimiter() {
        let line = ChainCodec::encode(&entry("a,b"));
        assert!(line.contains(",a\\,b,"));
    }

    #[test]
    fn decode_reads_all_fields() {
        let line = format!("{},hi there,2026-10-17T08:15:30.123Z,7", "ff".repeat(32));
        let decoded = ChainCodec::decode(&line).unwrap();
        assert_eq!(decoded.previous_hash, "ff".repeat(32));
        assert_eq!(decoded.message, "hi there");
        assert_eq!(decoded.date, "2026-10-17T08:15:30.123Z");
        assert_eq!(decoded.nonce, 7);
    }

    #[test]
    fn decode_unescapes_delimiter() {
        let decoded = ChainCodec::decode("h,one\\, two\\, three,d,0").unwrap();
        assert_eq!(decoded.message, "one, two, three");
    }

    #[test]
    fn roundtrip_tricky_messages() {
        for message in [
            "",
            ",",
            ",,,",
            "\\,",
            "\\\\,x",
            "a\\,b",
            "C:\\new\\table",
            "literal \\n is not a newline",
            "ünïcödé, ✓",
        ] {
            ChainCodec::check_message(message).unwrap();
            let e = entry(message);
            let line = ChainCodec::encode(&e);
            assert_eq!(ChainCodec::decode(&line).unwrap(), e, "message {message:?}");
        }
    }

    #[test]
    fn backslashes_are_written_verbatim() {
        let line = ChainCodec::encode(&entry("C:\\new\\t, a\\,b"));
        assert!(line.contains(",C:\\new\\t\\, a\\\\,b,"));
    }

    #[test]
    fn decodes_lines_written_with_comma_only_escaping() {
        let line = format!(
            "{},C:\\new\\t a\\\\,b\\,c,2026-10-17T08:15:30.123Z,9",
            "ab".repeat(32)
        );
        let decoded = ChainCodec::decode(&line).unwrap();
        assert_eq!(decoded.message, "C:\\new\\t a\\,b,c");
        assert_eq!(ChainCodec::encode(&decoded), line);
    }

    #[test]
    fn unencodable_messages_are_refused() {
        assert_eq!(ChainCodec::check_message("two\nlines"), Err(EncodeError::LineBreak));
        assert_eq!(ChainCodec::check_message("cr\r"), Err(EncodeError::LineBreak));
        assert_eq!(ChainCodec::check_message("dir\\"), Err(EncodeError::TrailingEscape));
        assert!(ChainCodec::check_message("\\ leading is fine").is_ok());
    }

    #[test]
    fn too_few_fields_is_corrupted() {
        let err = ChainCodec::decode("hash,message,date").unwrap_err();
        assert_eq!(err, DecodeError::FieldCount { delimiters: 2 });
    }

    #[test]
    fn too_many_fields_is_corrupted() {
        let err = ChainCodec::decode("hash,mess,age,date,1").unwrap_err();
        assert_eq!(err, DecodeError::FieldCount { delimiters: 4 });
    }

    #[test]
    fn non_numeric_nonce_is_corrupted() {
        let err = ChainCodec::decode("hash,message,date,abc").unwrap_err();
        assert_eq!(err, DecodeError::InvalidNonce("abc".into()));
        assert!(ChainCodec::decode("hash,message,date,-1").is_err());
    }

    #[test]
    fn escaped_delimiter_in_last_field_is_not_a_separator() {
        let err = ChainCodec::decode("hash,message,date\\,1").unwrap_err();
        assert_eq!(err, DecodeError::FieldCount { delimiters: 2 });
    }

    #[test]
    fn decode_all_reports_line_index() {
        let good = ChainCodec::encode(&entry("ok"));
        let lines = vec![good.clone(), good, "broken".to_string()];
        let err = ChainCodec::decode_all(&lines).unwrap_err();
        match err {
            LogError::CorruptedLog(Corruption::MalformedLine { line, source }) => {
                assert_eq!(line, Some(2));
                assert_eq!(source, DecodeError::FieldCount { delimiters: 0 });
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    fn encodable() -> impl Strategy<Value = String> {
        any::<String>().prop_filter("not representable on one line", |m| {
            ChainCodec::check_message(m).is_ok()
        })
    }

    proptest! {
        #[test]
        fn decode_inverts_encode(message in encodable(), nonce in any::<u64>()) {
            let e = LogEntry::new("5f".repeat(32), message, "2026-10-17T08:15:30.123Z", nonce);
            let decoded = ChainCodec::decode(&ChainCodec::encode(&e)).unwrap();
            prop_assert_eq!(decoded, e);
        }

        #[test]
        fn escaped_message_has_no_bare_delimiter(message in encodable()) {
            let escaped = escape_message(&message);
            prop_assert_eq!(delimiter_positions(&escaped).len(), 0);
            prop_assert_eq!(unescape_message(&escaped), message);
        }
    }
}
