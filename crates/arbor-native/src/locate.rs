//! Byte-level helpers for recovering source spans.

use std::ops::Range;

use memchr::{memchr_iter, memchr2_iter, memrchr};

use crate::output::RawSourcePosition;

pub(crate) fn to_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// Bytes between column checkpoints on a line.
const CHECKPOINT_SPACING: usize = 128;

/// Maps byte offsets to line and column numbers.
///
/// Columns are precomputed at every line start and then every
/// [`CHECKPOINT_SPACING`] bytes, so a lookup scans at most one gap no matter
/// how long the line is or in what order offsets are asked for.
pub(crate) struct LineIndex<'a> {
    input: &'a str,
    line_starts: Vec<usize>,
    /// (offset, column) pairs sorted by offset. Every line start is one.
    checkpoints: Vec<(usize, u32)>,
    tab_stop: u32,
}

fn advance_column(column: u32, ch: char, tab_stop: u32) -> u32 {
    match ch {
        '\t' => ((column - 1) / tab_stop + 1) * tab_stop + 1,
        '\r' | '\n' => column,
        _ => column + 1,
    }
}

impl<'a> LineIndex<'a> {
    pub(crate) fn new(input: &'a str, tab_stop: u32) -> Self {
        let bytes = input.as_bytes();
        let tab_stop = tab_stop.max(1);
        let mut line_starts = vec![0];
        for pos in memchr2_iter(b'\n', b'\r', bytes) {
            // "\r\n" breaks once, after the '\n'
            if bytes[pos] == b'\r' && bytes.get(pos + 1) == Some(&b'\n') {
                continue;
            }
            line_starts.push(pos + 1);
        }

        let mut checkpoints =
            Vec::with_capacity(line_starts.len() + bytes.len() / CHECKPOINT_SPACING);
        let mut next_line = 0;
        let mut last = 0;
        let mut column = 1;
        for (offset, ch) in input.char_indices() {
            if line_starts.get(next_line) == Some(&offset) {
                next_line += 1;
                column = 1;
                checkpoints.push((offset, column));
                last = offset;
            } else if offset - last >= CHECKPOINT_SPACING {
                checkpoints.push((offset, column));
                last = offset;
            }
            column = advance_column(column, ch, tab_stop);
        }
        // a line break at the very end starts an empty last line
        let trailing = &line_starts[next_line.min(line_starts.len())..];
        checkpoints.extend(trailing.iter().map(|&start| (start, 1)));

        Self {
            input,
            line_starts,
            checkpoints,
            tab_stop,
        }
    }

    /// The checkpoint a lookup of `offset` starts scanning from.
    fn checkpoint(&self, offset: usize) -> (usize, u32) {
        let at = self.checkpoints.partition_point(|&(start, _)| start <= offset);
        self.checkpoints.get(at.wrapping_sub(1)).copied().unwrap_or((0, 1))
    }

    pub(crate) fn position(&self, offset: usize) -> RawSourcePosition {
        let offset = offset.min(self.input.len());
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        let (from, mut column) = self.checkpoint(offset);
        for ch in self.input.get(from..offset).unwrap_or("").chars() {
            column = advance_column(column, ch, self.tab_stop);
        }
        RawSourcePosition {
            line: to_u32(line + 1),
            column,
            offset: to_u32(offset),
        }
    }
}

/// What kind of markup token a `<` has to start.
#[derive(Debug, Clone, Copy)]
pub(crate) enum MarkupShape<'n> {
    StartTag(&'n str),
    EndTag(&'n str),
    Comment,
    Doctype,
}

fn is_tag_delimiter(byte: u8) -> bool {
    matches!(byte, b'\t' | b'\n' | b'\x0C' | b'\r' | b' ' | b'/' | b'>')
}

fn starts_with_ignore_case(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.len() >= needle.len() && haystack[..needle.len()].eq_ignore_ascii_case(needle)
}

fn name_follows(bytes: &[u8], at: usize, name: &str) -> bool {
    let rest = &bytes[at.min(bytes.len())..];
    if !starts_with_ignore_case(rest, name.as_bytes()) {
        return false;
    }
    rest.get(name.len()).is_none_or(|b| is_tag_delimiter(*b))
}

impl MarkupShape<'_> {
    fn matches(&self, token: &[u8]) -> bool {
        match self {
            MarkupShape::StartTag(name) => name_follows(token, 1, name),
            MarkupShape::EndTag(name) => token.get(1) == Some(&b'/') && name_follows(token, 2, name),
            MarkupShape::Comment => match token.get(1) {
                Some(b'!') | Some(b'?') => true,
                Some(b'/') => token.get(2).is_some_and(|b| !b.is_ascii_alphabetic()),
                _ => false,
            },
            MarkupShape::Doctype => starts_with_ignore_case(&token[1..], b"!doctype"),
        }
    }
}

/// Find where the markup token that ended at `end` began.
///
/// The token is the first `<` in `floor..end` whose following bytes fit
/// `shape`. Falls back to the last `<` in range, then to `floor`.
pub(crate) fn markup_start(input: &str, floor: usize, end: usize, shape: MarkupShape<'_>) -> usize {
    let bytes = input.as_bytes();
    let end = end.min(bytes.len());
    let floor = floor.min(end);
    let window = &bytes[floor..end];
    for pos in memchr_iter(b'<', window) {
        if shape.matches(&window[pos..]) {
            return floor + pos;
        }
    }
    memrchr(b'<', window).map_or(floor, |pos| floor + pos)
}

/// Byte ranges of one attribute inside a start tag. The value range keeps
/// its quotes and is empty when the attribute has no value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AttributeSpan {
    pub(crate) name: Range<usize>,
    pub(crate) value: Range<usize>,
}

fn is_space(byte: u8) -> bool {
    matches!(byte, b'\t' | b'\n' | b'\x0C' | b'\r' | b' ')
}

/// Lex the attributes of a raw start tag. Ranges are relative to `tag`.
pub(crate) fn attribute_spans(tag: &str) -> Vec<AttributeSpan> {
    let bytes = tag.as_bytes();
    let mut spans = Vec::new();
    let mut pos = usize::from(bytes.first() == Some(&b'<'));
    while pos < bytes.len() && !is_space(bytes[pos]) && bytes[pos] != b'/' && bytes[pos] != b'>' {
        pos += 1;
    }
    loop {
        while pos < bytes.len() && (is_space(bytes[pos]) || bytes[pos] == b'/') {
            pos += 1;
        }
        if pos >= bytes.len() || bytes[pos] == b'>' {
            return spans;
        }

        let name_start = pos;
        // a leading '=' belongs to the name
        pos += 1;
        while pos < bytes.len() && !is_space(bytes[pos]) && !matches!(bytes[pos], b'/' | b'>' | b'=') {
            pos += 1;
        }
        let name = name_start..pos;

        let mut after = pos;
        while after < bytes.len() && is_space(bytes[after]) {
            after += 1;
        }
        if bytes.get(after) != Some(&b'=') {
            spans.push(AttributeSpan { name, value: pos..pos });
            pos = after;
            continue;
        }
        after += 1;
        while after < bytes.len() && is_space(bytes[after]) {
            after += 1;
        }
        let value_start = after;
        match bytes.get(after) {
            Some(&quote @ (b'"' | b'\'')) => {
                after += 1;
                while after < bytes.len() && bytes[after] != quote {
                    after += 1;
                }
                after = (after + 1).min(bytes.len());
            }
            Some(b'>') | None => {}
            Some(_) => {
                while after < bytes.len() && !is_space(bytes[after]) && bytes[after] != b'>' {
                    after += 1;
                }
            }
        }
        spans.push(AttributeSpan {
            name,
            value: value_start..after,
        });
        pos = after;
    }
}

/// Whether every character is HTML whitespace.
pub(crate) fn is_html_whitespace(text: &str) -> bool {
    text.bytes().all(is_space)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lexed<'t>(tag: &'t str) -> Vec<(&'t str, &'t str)> {
        attribute_spans(tag)
            .into_iter()
            .map(|span| (&tag[span.name], &tag[span.value]))
            .collect()
    }

    #[test]
    fn test_positions_on_first_line() {
        let index = LineIndex::new("abc", 8);
        assert_eq!(index.position(0), RawSourcePosition { line: 1, column: 1, offset: 0 });
        assert_eq!(index.position(2), RawSourcePosition { line: 1, column: 3, offset: 2 });
    }

    #[test]
    fn test_positions_after_line_breaks() {
        let index = LineIndex::new("a\nb\r\nc\rd", 8);
        assert_eq!(index.position(2).line, 2);
        assert_eq!(index.position(5), RawSourcePosition { line: 3, column: 1, offset: 5 });
        assert_eq!(index.position(7), RawSourcePosition { line: 4, column: 1, offset: 7 });
    }

    #[test]
    fn test_tab_advances_to_next_stop() {
        let index = LineIndex::new("\tx\t\ty", 8);
        assert_eq!(index.position(1).column, 9);
        assert_eq!(index.position(2).column, 10);
        assert_eq!(index.position(4).column, 25);

        let narrow = LineIndex::new("ab\tc", 4);
        assert_eq!(narrow.position(3).column, 5);
    }

    #[test]
    fn test_positions_looked_up_out_of_order() {
        let index = LineIndex::new("hello world", 8);
        assert_eq!(index.position(8).column, 9);
        assert_eq!(index.position(2).column, 3);
        assert_eq!(index.position(11).column, 12);
    }

    #[test]
    fn test_long_line_lookups_scan_one_gap() {
        let line: String = (0..5000).map(|i| format!("<p class=c{i}>\tt{i}</p>")).collect();
        let index = LineIndex::new(&line, 8);
        for offset in (0..line.len()).rev().step_by(97) {
            let (from, _) = index.checkpoint(offset);
            assert!(from <= offset);
            assert!(offset - from < CHECKPOINT_SPACING + 4, "offset {offset} scans from {from}");
        }

        let mut column = 1;
        let mut expected = Vec::new();
        for (offset, ch) in line.char_indices() {
            expected.push((offset, column));
            column = advance_column(column, ch, 8);
        }
        for &(offset, column) in expected.iter().rev().step_by(13) {
            assert_eq!(index.position(offset).column, column);
            assert_eq!(index.position(offset).line, 1);
        }
    }

    #[test]
    fn test_trailing_line_break_starts_a_line() {
        let index = LineIndex::new("ab\n", 8);
        assert_eq!(index.position(3), RawSourcePosition { line: 2, column: 1, offset: 3 });
        let empty = LineIndex::new("", 8);
        assert_eq!(empty.position(0), RawSourcePosition { line: 1, column: 1, offset: 0 });
    }

    #[test]
    fn test_columns_count_characters() {
        let index = LineIndex::new("héllo", 8);
        assert_eq!(index.position(3).column, 3);
    }

    #[test]
    fn test_markup_start_skips_text_angle_brackets() {
        let input = "a < b <p>";
        assert_eq!(markup_start(input, 0, input.len(), MarkupShape::StartTag("p")), 6);
    }

    #[test]
    fn test_markup_start_requires_whole_name() {
        let input = "<pre><p>";
        assert_eq!(markup_start(input, 0, input.len(), MarkupShape::StartTag("p")), 5);
        assert_eq!(markup_start("</P >", 0, 5, MarkupShape::EndTag("p")), 0);
    }

    #[test]
    fn test_markup_start_for_comments_and_doctype() {
        let input = "x<y <!-- c -->";
        assert_eq!(markup_start(input, 0, input.len(), MarkupShape::Comment), 4);
        assert_eq!(markup_start("<!DocType html>", 0, 15, MarkupShape::Doctype), 0);
        assert_eq!(markup_start("</3>", 0, 4, MarkupShape::Comment), 0);
    }

    #[test]
    fn test_markup_start_fallback() {
        assert_eq!(markup_start("ab", 0, 2, MarkupShape::Comment), 0);
        assert_eq!(markup_start("<a <b", 0, 5, MarkupShape::StartTag("zz")), 3);
    }

    #[test]
    fn test_attribute_spans_keep_duplicates_and_quotes() {
        assert_eq!(
            lexed(r#"<div a="1" a='2' b=3 c>"#),
            vec![("a", r#""1""#), ("a", "'2'"), ("b", "3"), ("c", "")]
        );
    }

    #[test]
    fn test_attribute_spans_with_odd_spacing() {
        assert_eq!(lexed("<p  x = \"y z\"/>"), vec![("x", "\"y z\"")]);
        assert!(lexed("<br/>").is_empty());
        assert_eq!(lexed("<input disabled/>"), vec![("disabled", "")]);
        assert_eq!(lexed("<a =b>"), vec![("=b", "")]);
        assert_eq!(lexed("<a x=>"), vec![("x", "")]);
        assert_eq!(lexed(r#"<a x="1"y=2>"#), vec![("x", "\"1\""), ("y", "2")]);
    }

    #[test]
    fn test_whitespace_detection() {
        assert!(is_html_whitespace(" \n\t\r\x0C"));
        assert!(!is_html_whitespace(" x "));
        assert!(!is_html_whitespace("\u{a0}"));
    }
}
