//! Marker grammar: `~` or `=`, optional colons around a class run, then `>`.
//!
//! ```text
//! ~>        plain block
//! =:a:>     wrapped block, justified, classified as "alert"
//! ~w2|g>    plain block, centered, three classifications
//! ```

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Serialize;

/// Single marker pattern. Trailing whitespace (newlines included) belongs to the marker.
static MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([~=])(:)?([a-z0-9]*\|?[a-z0-9]*)?(:)?>\s*").expect("marker pattern is valid")
});

/// Character separating classifications from the centering request.
pub const SEPARATOR: char = '|';

/// Output kind selected by the marker character.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarkerKind {
    /// `~`: the block is emitted on its own.
    PlainBlock,
    /// `=`: the block is emitted inside a wrapper element.
    WrappedBlock,
}

impl MarkerKind {
    fn from_marker(marker: &str) -> Self {
        if marker == "=" {
            MarkerKind::WrappedBlock
        } else {
            MarkerKind::PlainBlock
        }
    }
}

/// The pieces of one marker occurrence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MarkerToken {
    /// Kind selected by the marker character.
    pub kind: MarkerKind,
    /// A `:` directly after the marker character.
    pub left_modifier: bool,
    /// Classification characters, possibly containing one [`SEPARATOR`]. Empty when absent.
    pub class_run: String,
    /// A `:` directly before `>`.
    pub right_modifier: bool,
}

impl MarkerToken {
    fn from_captures(captures: &Captures<'_>) -> Self {
        let marker = captures.get(1).map_or("~", |m| m.as_str());
        Self {
            kind: MarkerKind::from_marker(marker),
            left_modifier: captures.get(2).is_some(),
            class_run: captures
                .get(3)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default(),
            right_modifier: captures.get(4).is_some(),
        }
    }

    /// Whether the class run requests centering.
    pub fn has_separator(&self) -> bool {
        self.class_run.contains(SEPARATOR)
    }
}

/// A marker found in a text value, with its byte range.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarkerSpan {
    /// Byte offset of the marker character.
    pub start: usize,
    /// Byte offset just past the consumed trailing whitespace.
    pub end: usize,
    /// Parsed marker pieces.
    pub token: MarkerToken,
}

impl MarkerSpan {
    /// The matched source text, trailing whitespace included.
    pub fn as_str<'a>(&self, haystack: &'a str) -> &'a str {
        &haystack[self.start..self.end]
    }
}

/// Finds every non-overlapping marker in `text`, left to right.
pub fn find_markers(text: &str) -> impl Iterator<Item = MarkerSpan> + '_ {
    MARKER.captures_iter(text).filter_map(|captures| {
        let whole = captures.get(0)?;
        Some(MarkerSpan {
            start: whole.start(),
            end: whole.end(),
            token: MarkerToken::from_captures(&captures),
        })
    })
}

/// Returns the first marker in `text`, if any.
pub fn first_marker(text: &str) -> Option<MarkerSpan> {
    find_markers(text).next()
}

/// Whether `text` contains at least one marker.
pub fn contains_marker(text: &str) -> bool {
    MARKER.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(kind: MarkerKind, left: bool, class_run: &str, right: bool) -> MarkerToken {
        MarkerToken {
            kind,
            left_modifier: left,
            class_run: class_run.to_string(),
            right_modifier: right,
        }
    }

    #[test]
    fn accepted_markers() {
        use MarkerKind::{PlainBlock as P, WrappedBlock as W};

        let fixtures = [
            ("~>", token(P, false, "", false)),
            ("=>", token(W, false, "", false)),
            ("=|>", token(W, false, "|", false)),
            ("=:|>", token(W, true, "|", false)),
            ("=|:>", token(W, false, "|", true)),
            ("=::>", token(W, true, "", true)),
            ("=a>", token(W, false, "a", false)),
            ("=1>", token(W, false, "1", false)),
            ("~s>", token(P, false, "s", false)),
            ("~s|>", token(P, false, "s|", false)),
            ("~|s>", token(P, false, "|s", false)),
            ("~:s:>", token(P, true, "s", true)),
            ("~:s>", token(P, true, "s", false)),
            ("~s:>", token(P, false, "s", true)),
            ("~gw>", token(P, false, "gw", false)),
            ("~:gw:>", token(P, true, "gw", true)),
            ("~g|w>", token(P, false, "g|w", false)),
            ("=:g2c>", token(W, true, "g2c", false)),
            ("=g2c:>", token(W, false, "g2c", true)),
            ("=g2|c>", token(W, false, "g2|c", false)),
            ("=g2c|>", token(W, false, "g2c|", false)),
            ("~w:>", token(P, false, "w", true)),
        ];

        for (input, expected) in fixtures {
            let span = first_marker(input).unwrap_or_else(|| panic!("{input} should match"));
            assert_eq!(span.token, expected, "input: {input}");
            assert_eq!(span.start, 0, "input: {input}");
            assert_eq!(span.end, input.len(), "input: {input}");
        }
    }

    #[test]
    fn rejected_markers() {
        for input in [
            "=ç>", "=_>", "~A>", "~ç>", "~dg::>", "~::dg>", "~:::>", "~::|>", "~|::>", "->", "~ >",
            "~a",
        ] {
            assert!(!contains_marker(input), "{input} should not match");
            assert!(first_marker(input).is_none(), "{input} should not match");
        }
    }

    #[test]
    fn scan_is_unanchored() {
        // A doubled or mixed marker character leaves the first one as text.
        let span = first_marker("~=>").unwrap();
        assert_eq!(span.start, 1);
        assert_eq!(span.token.kind, MarkerKind::WrappedBlock);

        let span = first_marker("=~>").unwrap();
        assert_eq!(span.start, 1);
        assert_eq!(span.token.kind, MarkerKind::PlainBlock);

        let span = first_marker("~~> content").unwrap();
        assert_eq!(span.start, 1);
    }

    #[test]
    fn trailing_whitespace_is_consumed() {
        let text = "~w:>  \n\t hello";
        let span = first_marker(text).unwrap();
        assert_eq!(span.as_str(text), "~w:>  \n\t ");
        assert_eq!(&text[span.end..], "hello");
    }

    #[test]
    fn finds_all_markers_in_order() {
        let text = "abc ~w|> hello\n~:s> aaa ~>\nccc";
        let spans: Vec<_> = find_markers(text).collect();
        assert_eq!(spans.len(), 3);
        assert_eq!(spans[0].start, 4);
        assert_eq!(spans[0].token.class_run, "w|");
        assert!(spans[0].token.has_separator());
        assert_eq!(spans[1].as_str(text), "~:s> ");
        assert_eq!(spans[2].as_str(text), "~>\n");
        assert_eq!(&text[spans[2].end..], "ccc");
    }

    #[test]
    fn marker_mid_sentence_matches() {
        assert!(contains_marker("some text ~i> more"));
        assert!(!contains_marker("plain text with > and ~ apart"));
    }
}
