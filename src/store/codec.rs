//! Codec for the `const newsData = [ ... ];` literal embedded in `script.js`.
//!
//! The asset is treated as an opaque text blob containing exactly one
//! recognizable region: the array literal assigned to the `newsData`
//! declaration. Locating the region is a two-step affair:
//!
//! 1. a regex finds the declaration head (`const newsData = [`); the marker
//!    only, never the span
//! 2. a bracket-balance scanner walks forward from the opening `[` to its
//!    matching `]`, tracking single-, double-, and backtick-quoted strings
//!    with backslash escapes so brackets and quotes inside summary text can
//!    never derail the match
//!
//! Greedy pattern matching over the span is exactly what this module exists
//! to avoid: a summary containing `]` or an apostrophe must survive a
//! round-trip unharmed.
//!
//! Decoding parses the extracted span with a small recursive-descent parser
//! for the object-literal subset the store uses (quoted or bare keys, string
//! and integer values, trailing commas tolerated, unknown keys ignored).
//! Encoding renders the items as a single-quoted, four-space-indented
//! literal and splices it over the located span; every byte outside the span
//! is carried through untouched.

use crate::models::{Category, NewsItem};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::fmt::Write;
use std::ops::Range;
use thiserror::Error;
use tracing::debug;

static DECLARATION_HEAD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"const\s+newsData\s*=\s*\[").unwrap());

/// Errors surfaced by [`decode`] and [`encode`].
///
/// Callers treat `RegionNotFound` and `Parse` differently: an update run may
/// recover from either by starting from an empty store, but only a located
/// region can be re-encoded.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The declaration head or its balanced terminator is missing.
    #[error("could not locate the newsData array in the asset")]
    RegionNotFound,
    /// The literal span was located but its contents are malformed.
    #[error("malformed newsData literal at byte {offset}: {message}")]
    Parse {
        /// Absolute byte offset into the asset.
        offset: usize,
        message: String,
    },
}

/// Locate the byte range of the array literal, `[` through `]` inclusive.
pub fn locate(blob: &str) -> Result<Range<usize>, CodecError> {
    let head = DECLARATION_HEAD.find(blob).ok_or(CodecError::RegionNotFound)?;
    let open = head.end() - 1;
    let span = scan_literal_span(blob, open).ok_or(CodecError::RegionNotFound)?;
    debug!(start = span.start, end = span.end, "Located newsData literal span");
    Ok(span)
}

/// Walk from the opening `[` to its balanced `]`, skipping string contents.
fn scan_literal_span(blob: &str, open: usize) -> Option<Range<usize>> {
    let mut depth: usize = 0;
    let mut in_string: Option<char> = None;
    let mut escaped = false;

    for (off, ch) in blob[open..].char_indices() {
        if let Some(quote) = in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == quote {
                in_string = None;
            }
            continue;
        }

        match ch {
            '\'' | '"' | '`' => in_string = Some(ch),
            '[' | '{' => depth += 1,
            ']' | '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    if ch != ']' {
                        return None;
                    }
                    return Some(open..open + off + ch.len_utf8());
                }
            }
            _ => {}
        }
    }

    None
}

/// Decode the store from the asset.
pub fn decode(blob: &str) -> Result<Vec<NewsItem>, CodecError> {
    let span = locate(blob)?;
    parse_items(&blob[span.clone()], span.start)
}

/// Re-encode the asset with `items` replacing the stored sequence.
///
/// Whitespace and quoting inside the literal are normalized to this module's
/// own output style; that reformatting is expected and does not indicate
/// corruption. The declaration name, the trailing `;`, and every byte
/// outside the span come through verbatim.
pub fn encode(blob: &str, items: &[NewsItem]) -> Result<String, CodecError> {
    let span = locate(blob)?;
    let mut out = String::with_capacity(blob.len() + 256);
    out.push_str(&blob[..span.start]);
    out.push_str(&render_literal(items));
    out.push_str(&blob[span.end..]);
    Ok(out)
}

/// Render the items as the store's literal syntax.
pub fn render_literal(items: &[NewsItem]) -> String {
    if items.is_empty() {
        return "[]".to_string();
    }

    let mut out = String::from("[\n");
    for (idx, item) in items.iter().enumerate() {
        out.push_str("    {\n");
        if let Some(id) = item.id {
            writeln!(out, "        'id': {id},").unwrap();
        }
        writeln!(out, "        'title': {},", quote_js(&item.title)).unwrap();
        writeln!(out, "        'summary': {},", quote_js(&item.summary)).unwrap();
        writeln!(out, "        'date': {},", quote_js(&item.date)).unwrap();
        writeln!(out, "        'category': {},", quote_js(item.category.as_str())).unwrap();
        writeln!(out, "        'source': {},", quote_js(&item.source)).unwrap();
        writeln!(out, "        'url': {}", quote_js(&item.url)).unwrap();
        out.push_str("    }");
        if idx + 1 < items.len() {
            out.push(',');
        }
        out.push('\n');
    }
    out.push(']');
    out
}

/// Single-quote a string for the literal, escaping what the scanner and the
/// browser both need escaped.
fn quote_js(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(ch),
        }
    }
    out.push('\'');
    out
}

enum FieldValue {
    Str(String),
    Int(i64),
    Null,
}

struct Cursor<'a> {
    src: &'a str,
    pos: usize,
    base: usize,
}

impl<'a> Cursor<'a> {
    fn new(src: &'a str, base: usize) -> Self {
        Self { src, pos: 0, base }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn eat(&mut self, expected: char) -> Result<(), CodecError> {
        match self.peek() {
            Some(ch) if ch == expected => {
                self.bump();
                Ok(())
            }
            Some(ch) => Err(self.fail(format!("expected {expected:?}, found {ch:?}"))),
            None => Err(self.fail(format!("expected {expected:?}, found end of literal"))),
        }
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(ch) if ch.is_whitespace()) {
            self.bump();
        }
    }

    fn fail(&self, message: impl Into<String>) -> CodecError {
        CodecError::Parse {
            offset: self.base + self.pos,
            message: message.into(),
        }
    }
}

fn parse_items(literal: &str, base: usize) -> Result<Vec<NewsItem>, CodecError> {
    let mut cur = Cursor::new(literal, base);
    cur.skip_ws();
    cur.eat('[')?;

    let mut items = Vec::new();
    loop {
        cur.skip_ws();
        match cur.peek() {
            Some(']') => {
                cur.bump();
                break;
            }
            Some('{') => {
                items.push(parse_object(&mut cur)?);
                cur.skip_ws();
                if cur.peek() == Some(',') {
                    cur.bump();
                }
            }
            Some(ch) => return Err(cur.fail(format!("expected '{{' or ']', found {ch:?}"))),
            None => return Err(cur.fail("unterminated array")),
        }
    }

    Ok(items)
}

fn parse_object(cur: &mut Cursor<'_>) -> Result<NewsItem, CodecError> {
    cur.eat('{')?;
    let mut fields: HashMap<String, FieldValue> = HashMap::new();

    loop {
        cur.skip_ws();
        match cur.peek() {
            Some('}') => {
                cur.bump();
                break;
            }
            Some(',') => {
                cur.bump();
            }
            Some(_) => {
                let key = parse_key(cur)?;
                cur.skip_ws();
                cur.eat(':')?;
                cur.skip_ws();
                let value = parse_value(cur)?;
                fields.insert(key, value);
            }
            None => return Err(cur.fail("unterminated object")),
        }
    }

    let str_field = |key: &str| match fields.get(key) {
        Some(FieldValue::Str(s)) => s.clone(),
        _ => String::new(),
    };
    let id = match fields.get("id") {
        Some(FieldValue::Int(n)) => u32::try_from(*n).ok(),
        _ => None,
    };

    Ok(NewsItem {
        id,
        title: str_field("title"),
        summary: str_field("summary"),
        date: str_field("date"),
        category: Category::from_label(&str_field("category")),
        source: str_field("source"),
        url: str_field("url"),
    })
}

fn parse_key(cur: &mut Cursor<'_>) -> Result<String, CodecError> {
    match cur.peek() {
        Some('\'') | Some('"') | Some('`') => parse_string(cur),
        Some(ch) if ch.is_alphanumeric() || ch == '_' || ch == '$' => {
            let mut key = String::new();
            while let Some(ch) = cur.peek() {
                if ch.is_alphanumeric() || ch == '_' || ch == '$' {
                    key.push(ch);
                    cur.bump();
                } else {
                    break;
                }
            }
            Ok(key)
        }
        Some(ch) => Err(cur.fail(format!("expected object key, found {ch:?}"))),
        None => Err(cur.fail("expected object key, found end of literal")),
    }
}

fn parse_value(cur: &mut Cursor<'_>) -> Result<FieldValue, CodecError> {
    match cur.peek() {
        Some('\'') | Some('"') | Some('`') => Ok(FieldValue::Str(parse_string(cur)?)),
        Some(ch) if ch.is_ascii_digit() || ch == '-' => parse_number(cur),
        Some(ch) if ch.is_ascii_alphabetic() => {
            let mut word = String::new();
            while let Some(ch) = cur.peek() {
                if ch.is_ascii_alphabetic() {
                    word.push(ch);
                    cur.bump();
                } else {
                    break;
                }
            }
            match word.as_str() {
                // booleans and nulls never map onto an item field
                "null" | "undefined" | "true" | "false" => Ok(FieldValue::Null),
                other => Err(cur.fail(format!("unexpected bareword {other:?}"))),
            }
        }
        Some(ch) => Err(cur.fail(format!("expected value, found {ch:?}"))),
        None => Err(cur.fail("expected value, found end of literal")),
    }
}

fn parse_string(cur: &mut Cursor<'_>) -> Result<String, CodecError> {
    let quote = cur.bump().expect("caller peeked a quote");
    let mut out = String::new();

    loop {
        match cur.bump() {
            Some('\\') => match cur.bump() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some('r') => out.push('\r'),
                Some(escaped) => out.push(escaped),
                None => return Err(cur.fail("unterminated escape sequence")),
            },
            Some(ch) if ch == quote => return Ok(out),
            Some(ch) => out.push(ch),
            None => return Err(cur.fail("unterminated string")),
        }
    }
}

fn parse_number(cur: &mut Cursor<'_>) -> Result<FieldValue, CodecError> {
    let mut text = String::new();
    if cur.peek() == Some('-') {
        text.push('-');
        cur.bump();
    }
    while let Some(ch) = cur.peek() {
        if ch.is_ascii_digit() {
            text.push(ch);
            cur.bump();
        } else {
            break;
        }
    }
    text.parse::<i64>()
        .map(FieldValue::Int)
        .map_err(|_| cur.fail(format!("invalid number {text:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ASSET: &str = r#"// site behavior
const pageSize = 10;

const newsData = [
    {
        'id': 301,
        'title': '出願者数が過去最多に',
        'summary': '首都圏の私立中で出願者数が過去最多を更新。',
        'date': '2025-11-04',
        'category': 'entrance',
        'source': 'リセマム',
        'url': 'https://resemom.jp/article/2025/11/04/12345.html'
    },
    {
        'title': '秋の説明会まとめ',
        'summary': '11月開催の学校説明会一覧。',
        'date': '2025-11-03',
        'category': 'school',
        'source': 'インターエデュ',
        'url': 'https://www.inter-edu.com/article/setsumeikai/'
    }
];

function renderNews() {
    // rendering elided
}
"#;

    fn sample_item(url: &str) -> NewsItem {
        NewsItem {
            id: Some(301),
            title: "タイトル".to_string(),
            summary: "要約".to_string(),
            date: "2025-11-04".to_string(),
            category: Category::Entrance,
            source: "リセマム".to_string(),
            url: url.to_string(),
        }
    }

    #[test]
    fn test_decode_reads_both_items() {
        let items = decode(ASSET).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, Some(301));
        assert_eq!(items[0].category, Category::Entrance);
        assert_eq!(items[1].id, None);
        assert_eq!(items[1].category, Category::School);
        assert_eq!(items[1].source, "インターエデュ");
    }

    #[test]
    fn test_decode_missing_declaration() {
        let err = decode("const otherData = [];").unwrap_err();
        assert!(matches!(err, CodecError::RegionNotFound));
    }

    #[test]
    fn test_decode_unbalanced_literal() {
        let err = decode("const newsData = [ { 'title': 'x' ").unwrap_err();
        assert!(matches!(err, CodecError::RegionNotFound));
    }

    #[test]
    fn test_decode_malformed_contents() {
        let err = decode("const newsData = [ 42 ];").unwrap_err();
        assert!(matches!(err, CodecError::Parse { .. }));
    }

    #[test]
    fn test_decode_tolerates_double_quotes_and_bare_keys() {
        let blob = r#"const newsData = [
            { title: "二重引用符", summary: "ok", date: "2025-01-01",
              category: "study", source: "s", url: "https://e/x" },
        ];"#;
        let items = decode(blob).unwrap();
        assert_eq!(items[0].title, "二重引用符");
        assert_eq!(items[0].category, Category::Study);
    }

    #[test]
    fn test_decode_ignores_unknown_keys() {
        let blob = r#"const newsData = [
            { 'title': 't', 'summary': 's', 'date': 'd', 'category': 'study',
              'source': 'x', 'url': 'https://e/x', 'pinned': true, 'weight': 3 }
        ];"#;
        let items = decode(blob).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].url, "https://e/x");
    }

    #[test]
    fn test_quotes_and_brackets_inside_summary_survive() {
        let mut item = sample_item("https://e/q");
        item.summary = "塾の講師いわく「過去問は'直前期'に[3回]解くべき」\\memo".to_string();
        item.title = "it's a \"quoted\" title]".to_string();

        let encoded = encode(ASSET, &[item.clone()]).unwrap();
        let decoded = decode(&encoded).unwrap();
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].summary, item.summary);
        assert_eq!(decoded[0].title, item.title);
    }

    #[test]
    fn test_newlines_in_summary_round_trip() {
        let mut item = sample_item("https://e/n");
        item.summary = "一行目\n二行目".to_string();

        let encoded = encode(ASSET, &[item.clone()]).unwrap();
        // the literal itself must stay on escaped single lines
        assert!(encoded.contains("一行目\\n二行目"));
        let decoded = decode(&encoded).unwrap();
        assert_eq!(decoded[0].summary, item.summary);
    }

    #[test]
    fn test_encode_preserves_bytes_outside_span() {
        let items = vec![sample_item("https://e/a"), sample_item("https://e/b")];
        let encoded = encode(ASSET, &items).unwrap();

        let before = locate(ASSET).unwrap();
        let after = locate(&encoded).unwrap();
        assert_eq!(&ASSET[..before.start], &encoded[..after.start]);
        assert_eq!(&ASSET[before.end..], &encoded[after.end..]);
        assert!(encoded.contains("const newsData = ["));
        assert!(encoded.contains("function renderNews()"));
    }

    #[test]
    fn test_encode_empty_store() {
        let encoded = encode(ASSET, &[]).unwrap();
        assert!(encoded.contains("const newsData = [];"));
        assert_eq!(decode(&encoded).unwrap().len(), 0);
    }

    #[test]
    fn test_round_trip_is_stable() {
        let items = decode(ASSET).unwrap();
        let encoded = encode(ASSET, &items).unwrap();
        let reencoded = encode(&encoded, &decode(&encoded).unwrap()).unwrap();
        assert_eq!(encoded, reencoded);
    }

    #[test]
    fn test_parse_error_reports_absolute_offset() {
        let blob = "const newsData = [ { 'title' 'x' } ];";
        match decode(blob).unwrap_err() {
            CodecError::Parse { offset, .. } => {
                // the offset points into the blob, past the declaration head
                assert!(offset > blob.find('[').unwrap());
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_backtick_strings_are_tolerated() {
        let blob = "const newsData = [ { 'title': `テンプレ文字列`, 'url': 'https://e/t' } ];";
        let items = decode(blob).unwrap();
        assert_eq!(items[0].title, "テンプレ文字列");
    }
}
