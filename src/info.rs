//! `INFO` reply parsing.
//!
//! The reply is read as a properties document:
//!
//! ```text
//! # Server
//! redis_version:7.2.4
//! tcp_port=6379
//! ```
//!
//! Lines starting with `#` or `!` are comments. A key ends at the first
//! unescaped `=`, `:` or whitespace. A line ending in an odd number of
//! backslashes continues on the next one.
//!
//! Lines end at `\n` or `\r\n`. A lone `\r` is not a line terminator here,
//! unlike the general properties format; `INFO` replies always use `\r\n`.

use std::io::BufRead;

use nom::{
    IResult,
    branch::alt,
    bytes::complete::{take_while, take_while_m_n},
    character::complete::{anychar, char, none_of, one_of},
    combinator::{opt, recognize},
    multi::many0,
    sequence::{pair, preceded, tuple},
};
use thiserror::Error;
use tracing::trace;

use crate::error::{DataAccessError, DataAccessResult};
use crate::types::FieldValueMap;

const READ_FAILED: &str = "Cannot read info";

#[derive(Debug, Error)]
#[error("line {line}: {message}")]
pub struct InfoParseError {
    pub line: usize,
    pub message: String,
}

/// Parse an `INFO` reply.
pub fn parse_info(text: &str) -> DataAccessResult<FieldValueMap> {
    read_info(text.as_bytes())
}

/// Parse an `INFO` reply from a reader. The reader is consumed and dropped
/// before returning, whatever the outcome.
pub fn read_info<R: BufRead>(reader: R) -> DataAccessResult<FieldValueMap> {
    let mut props = FieldValueMap::new();
    let mut lines = reader.lines();
    let mut line_no = 0;

    while let Some(first) = lines.next() {
        line_no += 1;
        let start_line = line_no;
        let mut logical = String::from(skip_blank(&first.map_err(read_failed)?));
        if logical.is_empty() || logical.starts_with(['#', '!']) {
            continue;
        }

        while ends_with_continuation(&logical) {
            logical.pop();
            match lines.next() {
                Some(next) => {
                    line_no += 1;
                    logical.push_str(skip_blank(&next.map_err(read_failed)?));
                }
                None => break,
            }
        }

        let (key, value) = parse_entry(&logical).map_err(|message| {
            read_failed(InfoParseError {
                line: start_line,
                message,
            })
        })?;
        props.insert(key, value);
    }

    trace!(entries = props.len(), "Parsed info block");
    Ok(props)
}

fn read_failed(err: impl Into<crate::error::BoxError>) -> DataAccessError {
    DataAccessError::system(READ_FAILED, err)
}

fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\x0c')
}

fn skip_blank(line: &str) -> &str {
    line.trim_start_matches(is_blank)
}

fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

/// Raw key: escaped characters or anything that isn't a separator.
fn raw_key(input: &str) -> IResult<&str, &str> {
    recognize(many0(alt((
        recognize(pair(char('\\'), anychar)),
        recognize(none_of("=: \t\x0c")),
    ))))(input)
}

/// Optional blanks, at most one `=` or `:`, optional blanks.
fn separator(input: &str) -> IResult<&str, ()> {
    let (input, _) = tuple((
        take_while(is_blank),
        opt(one_of("=:")),
        take_while(is_blank),
    ))(input)?;
    Ok((input, ()))
}

fn entry(input: &str) -> IResult<&str, &str> {
    let (input, key) = raw_key(input)?;
    let (input, _) = separator(input)?;
    Ok((input, key))
}

fn parse_entry(line: &str) -> Result<(String, String), String> {
    let (value, key) = entry(line).map_err(|e| format!("Parse failed: {:?}", e))?;
    Ok((unescape(key)?, unescape(value)?))
}

fn unicode_escape(input: &str) -> IResult<&str, &str> {
    preceded(char('u'), take_while_m_n(4, 4, |c: char| c.is_ascii_hexdigit()))(input)
}

fn unescape(raw: &str) -> Result<String, String> {
    let mut out = String::with_capacity(raw.len());
    let mut units: Vec<u16> = Vec::new();
    let mut rest = raw;

    while let Some(pos) = rest.find('\\') {
        flush_units(&mut units, &mut out);
        out.push_str(&rest[..pos]);
        let escaped = &rest[pos + 1..];

        if escaped.starts_with('u') {
            let (after, hex) = unicode_escape(escaped)
                .map_err(|_| "Malformed \\uxxxx encoding.".to_string())?;
            let unit = u16::from_str_radix(hex, 16)
                .map_err(|_| "Malformed \\uxxxx encoding.".to_string())?;
            units.push(unit);
            rest = after;
            // consecutive escapes may form a surrogate pair
            while let Ok((after, hex)) = preceded(char('\\'), unicode_escape)(rest) {
                match u16::from_str_radix(hex, 16) {
                    Ok(unit) => units.push(unit),
                    Err(_) => return Err("Malformed \\uxxxx encoding.".to_string()),
                }
                rest = after;
            }
            continue;
        }

        let mut chars = escaped.chars();
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\x0c'),
            Some(other) => out.push(other),
            None => {}
        }
        rest = chars.as_str();
    }

    flush_units(&mut units, &mut out);
    out.push_str(rest);
    Ok(out)
}

fn flush_units(units: &mut Vec<u16>, out: &mut String) {
    if units.is_empty() {
        return;
    }
    out.extend(
        char::decode_utf16(units.drain(..)).map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::cell::Cell;
    use std::io::{self, BufReader, Read};
    use std::rc::Rc;

    struct TrackedReader {
        inner: io::Cursor<Vec<u8>>,
        dropped: Rc<Cell<bool>>,
    }

    impl Read for TrackedReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.inner.read(buf)
        }
    }

    impl Drop for TrackedReader {
        fn drop(&mut self) {
            self.dropped.set(true);
        }
    }

    fn tracked(data: &[u8]) -> (BufReader<TrackedReader>, Rc<Cell<bool>>) {
        let dropped = Rc::new(Cell::new(false));
        let reader = TrackedReader {
            inner: io::Cursor::new(data.to_vec()),
            dropped: Rc::clone(&dropped),
        };
        (BufReader::new(reader), dropped)
    }

    #[test]
    fn test_empty_text() {
        let props = parse_info("").unwrap();
        assert!(props.is_empty());
    }

    #[test]
    fn test_redis_info_sections() {
        let text = "# Server\r\nredis_version:7.2.4\r\nredis_mode:standalone\r\n\r\n# Clients\r\nconnected_clients:1\r\n";
        let props = parse_info(text).unwrap();
        assert_eq!(
            props.iter().collect::<Vec<_>>(),
            vec![
                ("redis_version", "7.2.4"),
                ("redis_mode", "standalone"),
                ("connected_clients", "1"),
            ]
        );
    }

    #[test]
    fn test_value_keeps_later_separators() {
        let props = parse_info("db0:keys=1,expires=0,avg_ttl=0\n").unwrap();
        assert_eq!(props.get("db0"), Some("keys=1,expires=0,avg_ttl=0"));
    }

    #[test]
    fn test_separator_variants() {
        let props = parse_info("a=1\nb : 2\nc 3\n  d\n! comment\n").unwrap();
        assert_eq!(props.get("a"), Some("1"));
        assert_eq!(props.get("b"), Some("2"));
        assert_eq!(props.get("c"), Some("3"));
        assert_eq!(props.get("d"), Some(""));
        assert_eq!(props.len(), 4);
    }

    #[test]
    fn test_escapes_and_continuation() {
        let text = "key\\:with\\ colon = tab\\there\nlong = first \\\n      second\nuni=\\u0041\\u00e9\n";
        let props = parse_info(text).unwrap();
        assert_eq!(props.get("key:with colon"), Some("tab\there"));
        assert_eq!(props.get("long"), Some("first second"));
        assert_eq!(props.get("uni"), Some("Aé"));
    }

    #[test]
    fn test_surrogate_pair() {
        let props = parse_info("emoji=\\ud83d\\ude00\n").unwrap();
        assert_eq!(props.get("emoji"), Some("\u{1f600}"));
    }

    #[test]
    fn test_duplicate_key_last_wins() {
        let props = parse_info("a:1\nb:2\na:3\n").unwrap();
        assert_eq!(props.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(props.get("a"), Some("3"));
    }

    #[test]
    fn test_malformed_unicode_is_system_error() {
        let err = parse_info("ok:1\nbad:\\u12G4\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::System);
        assert_eq!(err.message(), "Cannot read info");
        let cause = std::error::Error::source(&err)
            .and_then(|s| s.downcast_ref::<InfoParseError>())
            .expect("parse error cause");
        assert_eq!(cause.line, 2);
    }

    #[test]
    fn test_reader_released_on_success() {
        let (reader, dropped) = tracked(b"a:1\n");
        let props = read_info(reader).unwrap();
        assert_eq!(props.get("a"), Some("1"));
        assert!(dropped.get());
    }

    #[test]
    fn test_reader_released_on_failure() {
        let (reader, dropped) = tracked(b"a:\\u00\n");
        assert!(read_info(reader).is_err());
        assert!(dropped.get());
    }

    #[test]
    fn test_invalid_utf8_is_system_error() {
        let (reader, dropped) = tracked(b"a:\xff\xfe\n");
        let err = read_info(reader).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::System);
        assert!(dropped.get());
    }
}
