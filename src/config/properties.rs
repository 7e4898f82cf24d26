//! Parser for the flat `key=value` properties format.
//!
//! Follows the `java.util.Properties` line conventions that signing configs
//! rely on in practice: `#` and `!` comments, backslash escapes, and line
//! continuations. Only `=` separates a key from its value.

use std::str::Chars;

use thiserror::Error;
use tracing::debug;

/// A syntax error at a 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message}")]
pub struct SyntaxError {
    pub line: usize,
    pub message: String,
}

/// Parsed key/value pairs, kept in first-seen order.
///
/// A key that appears more than once keeps the value from its last
/// occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    entries: Vec<(String, String)>,
}

impl Properties {
    /// Creates an empty set of properties.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses properties text.
    ///
    /// Blank lines, comment lines and lines without `=` are skipped.
    /// Fails only on malformed `\uXXXX` escapes.
    pub fn parse(contents: &str) -> Result<Self, SyntaxError> {
        let mut properties = Self::new();

        for (line, logical) in logical_lines(contents) {
            let Some((raw_key, raw_value)) = split_pair(&logical) else {
                debug!(line, "skipping properties line without '='");
                continue;
            };

            let key = unescape(trim_unescaped_end(raw_key.trim_start_matches(is_blank)), line)?;
            let value = unescape(raw_value.trim_start_matches(is_blank), line)?;
            properties.insert(key, value);
        }

        Ok(properties)
    }

    /// Sets `key` to `value`, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

fn is_blank(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\u{000C}')
}

/// Joins continued lines and drops blanks and comments.
///
/// Yields each logical line with the number of the physical line it starts on.
fn logical_lines(contents: &str) -> Vec<(usize, String)> {
    let mut result = Vec::new();
    let mut pending: Option<(usize, String)> = None;

    for (index, physical) in contents.lines().enumerate() {
        let stripped = physical.trim_start_matches(is_blank);

        let (start, mut logical) = match pending.take() {
            Some(continued) => continued,
            None => {
                if stripped.is_empty() || stripped.starts_with(['#', '!']) {
                    continue;
                }
                (index + 1, String::new())
            }
        };

        if ends_with_unpaired_backslash(stripped) {
            logical.push_str(&stripped[..stripped.len() - 1]);
            pending = Some((start, logical));
        } else {
            logical.push_str(stripped);
            result.push((start, logical));
        }
    }

    // A continuation on the final line just ends the entry.
    if let Some(last) = pending {
        result.push(last);
    }

    result
}

/// An odd run of trailing backslashes escapes whatever follows it.
fn ends_with_unpaired_backslash(text: &str) -> bool {
    text.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

/// Trims trailing blanks that are not escaped, so `a\ ` keeps its space.
fn trim_unescaped_end(text: &str) -> &str {
    let mut end = text.len();
    while let Some(ch) = text[..end].chars().next_back() {
        let before = &text[..end - ch.len_utf8()];
        if !is_blank(ch) || ends_with_unpaired_backslash(before) {
            break;
        }
        end = before.len();
    }
    &text[..end]
}

/// Splits at the first `=` that is not escaped.
fn split_pair(line: &str) -> Option<(&str, &str)> {
    let mut escaped = false;
    for (i, ch) in line.char_indices() {
        match ch {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '=' => return Some((&line[..i], &line[i + 1..])),
            _ => {}
        }
    }
    None
}

/// Decodes backslash escapes.
fn unescape(raw: &str, line: usize) -> Result<String, SyntaxError> {
    let mut result = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }

        match chars.next() {
            Some('t') => result.push('\t'),
            Some('n') => result.push('\n'),
            Some('r') => result.push('\r'),
            Some('f') => result.push('\u{000C}'),
            Some('u') => result.push(decode_unicode(&mut chars, line)?),
            Some(other) => result.push(other),
            // Dangling backslash left over from trimming
            None => {}
        }
    }

    Ok(result)
}

/// Decodes the `XXXX` of a `\uXXXX` escape, joining UTF-16 surrogate pairs.
fn decode_unicode(chars: &mut Chars<'_>, line: usize) -> Result<char, SyntaxError> {
    let first = read_code_unit(chars, line)?;
    if let Some(ch) = char::from_u32(u32::from(first)) {
        return Ok(ch);
    }

    let unpaired = || SyntaxError {
        line,
        message: format!("unpaired surrogate escape '\\u{first:04X}'"),
    };

    // Only a high surrogate may start a pair
    if !(0xD800..0xDC00).contains(&first) {
        return Err(unpaired());
    }

    let mut lookahead = chars.clone();
    if lookahead.next() != Some('\\') || lookahead.next() != Some('u') {
        return Err(unpaired());
    }
    let second = read_code_unit(&mut lookahead, line)?;

    match char::decode_utf16([first, second]).next() {
        Some(Ok(ch)) => {
            *chars = lookahead;
            Ok(ch)
        }
        _ => Err(unpaired()),
    }
}

/// Reads exactly four hex digits.
fn read_code_unit(chars: &mut Chars<'_>, line: usize) -> Result<u16, SyntaxError> {
    let hex: String = chars.by_ref().take(4).collect();
    let invalid = || SyntaxError {
        line,
        message: format!("invalid unicode escape '\\u{hex}'"),
    };

    if hex.chars().count() != 4 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    u16::from_str_radix(&hex, 16).map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_pairs() {
        let props = Properties::parse("keyAlias=upload\nstoreFile=release.jks\n").unwrap();
        assert_eq!(props.len(), 2);
        assert_eq!(props.get("keyAlias"), Some("upload"));
        assert_eq!(props.get("storeFile"), Some("release.jks"));
    }

    #[test]
    fn test_comments_and_blank_lines() {
        let props = Properties::parse(
            "# signing\n\n   \n! legacy comment\nkeyAlias=upload\n  # indented comment\nkeyPassword=secret\n",
        )
        .unwrap();
        assert_eq!(props.len(), 2);
        assert_eq!(props.get("keyAlias"), Some("upload"));
        assert_eq!(props.get("keyPassword"), Some("secret"));
    }

    #[test]
    fn test_line_without_separator_is_skipped() {
        let props = Properties::parse("garbage line\nkeyAlias=upload\n").unwrap();
        assert_eq!(props.len(), 1);
        assert_eq!(props.get("keyAlias"), Some("upload"));
    }

    #[test]
    fn test_whitespace_handling() {
        let props = Properties::parse("  keyAlias  =   upload\nkeyPassword=pass  \n").unwrap();
        assert_eq!(props.get("keyAlias"), Some("upload"));
        // Trailing whitespace belongs to the value
        assert_eq!(props.get("keyPassword"), Some("pass  "));
    }

    #[test]
    fn test_splits_on_first_equals() {
        let props = Properties::parse("storePassword=a=b=c").unwrap();
        assert_eq!(props.get("storePassword"), Some("a=b=c"));
    }

    #[test]
    fn test_empty_value() {
        let props = Properties::parse("keyPassword=").unwrap();
        assert_eq!(props.get("keyPassword"), Some(""));
    }

    #[test]
    fn test_duplicate_keys_last_wins() {
        let props = Properties::parse("keyAlias=first\nother=x\nkeyAlias=second\n").unwrap();
        assert_eq!(props.len(), 2);
        assert_eq!(props.get("keyAlias"), Some("second"));
        let keys: Vec<_> = props.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["keyAlias", "other"]);
    }

    #[test]
    fn test_crlf_line_endings() {
        let props = Properties::parse("keyAlias=upload\r\nkeyPassword=secret\r\n").unwrap();
        assert_eq!(props.get("keyAlias"), Some("upload"));
        assert_eq!(props.get("keyPassword"), Some("secret"));
    }

    #[test]
    fn test_windows_path_escapes() {
        let props = Properties::parse(r"storeFile=C:\\keys\\release.jks").unwrap();
        assert_eq!(props.get("storeFile"), Some(r"C:\keys\release.jks"));
    }

    #[test]
    fn test_escaped_separator_in_key() {
        let props = Properties::parse(r"a\=b=c").unwrap();
        assert_eq!(props.get("a=b"), Some("c"));
    }

    #[test]
    fn test_unicode_escape() {
        let props = Properties::parse(r"keyAlias=caf\u00e9").unwrap();
        assert_eq!(props.get("keyAlias"), Some("café"));
    }

    #[test]
    fn test_invalid_unicode_escape() {
        let err = Properties::parse("ok=1\nkeyAlias=\\u00zz\n").unwrap_err();
        assert_eq!(err.line, 2);
    }

    #[test]
    fn test_truncated_unicode_escape() {
        let err = Properties::parse("keyAlias=\\u12").unwrap_err();
        assert_eq!(err.line, 1);
    }

    #[test]
    fn test_signed_unicode_escape_is_rejected() {
        let err = Properties::parse(r"keyAlias=\u+041").unwrap_err();
        assert_eq!(err.line, 1);
        assert!(err.message.contains("+041"));
    }

    #[test]
    fn test_surrogate_pair_escape() {
        let props = Properties::parse(r"keyPassword=\uD83D\uDE00!").unwrap();
        assert_eq!(props.get("keyPassword"), Some("\u{1F600}!"));
    }

    #[test]
    fn test_unpaired_surrogates_are_rejected() {
        for input in [
            r"keyPassword=\uD83D",
            r"keyPassword=\uD83Dx",
            r"keyPassword=\uD83D\u0041",
            r"keyPassword=\uDE00",
        ] {
            let err = Properties::parse(input).unwrap_err();
            assert!(err.message.contains("surrogate"), "{input}: {}", err.message);
        }
    }

    #[test]
    fn test_only_blanks_are_trimmed() {
        let props = Properties::parse("\tkeyAlias\u{000C} =\u{00A0}secret").unwrap();
        assert_eq!(props.get("keyAlias"), Some("\u{00A0}secret"));
    }

    #[test]
    fn test_escaped_trailing_space_in_key() {
        let props = Properties::parse(r"a\ =b").unwrap();
        assert_eq!(props.get("a "), Some("b"));

        let props = Properties::parse("a\\\\ =b").unwrap();
        assert_eq!(props.get("a\\"), Some("b"));
    }

    #[test]
    fn test_line_continuation() {
        let props = Properties::parse("storePassword=abc\\\n    def\nkeyAlias=upload\n").unwrap();
        assert_eq!(props.get("storePassword"), Some("abcdef"));
        assert_eq!(props.get("keyAlias"), Some("upload"));
    }

    #[test]
    fn test_even_backslashes_do_not_continue() {
        let props = Properties::parse("storeFile=dir\\\\\nkeyAlias=upload\n").unwrap();
        assert_eq!(props.get("storeFile"), Some("dir\\"));
        assert_eq!(props.get("keyAlias"), Some("upload"));
    }

    #[test]
    fn test_continuation_error_reports_start_line() {
        let err = Properties::parse("\nkeyAlias=a\\\n\\uXYZW\n").unwrap_err();
        assert_eq!(err.line, 2);
    }

    #[test]
    fn test_insert_replaces() {
        let mut props = Properties::new();
        assert!(props.is_empty());
        props.insert("keyAlias", "a");
        props.insert("keyAlias", "b");
        assert_eq!(props.len(), 1);
        assert!(props.contains_key("keyAlias"));
        assert_eq!(props.get("keyAlias"), Some("b"));
    }
}
