//! Resolves a marker token into output kind, alignment and classifications.

use serde::Serialize;

use crate::dictionary::Dictionary;
use crate::grammar::{MarkerKind, MarkerToken, SEPARATOR};

/// Text alignment requested by a marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// `:` before the class run.
    Left,
    /// `:` after the class run.
    Right,
    /// `|` anywhere in the class run.
    Center,
    /// `:` on both sides.
    Justify,
}

impl Alignment {
    /// CSS keyword for `text-align`.
    pub fn as_str(self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Right => "right",
            Alignment::Center => "center",
            Alignment::Justify => "justify",
        }
    }

    fn from_modifiers(left: bool, right: bool) -> Option<Self> {
        match (left, right) {
            (false, false) => None,
            (true, true) => Some(Alignment::Justify),
            (true, false) => Some(Alignment::Left),
            (false, true) => Some(Alignment::Right),
        }
    }
}

impl std::fmt::Display for Alignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Semantic outcome of one marker.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Interpretation {
    /// Whether the block is wrapped.
    pub kind: MarkerKind,
    /// Resolved alignment, `None` when the marker asks for none.
    pub alignment: Option<Alignment>,
    /// Classification names in class-run order.
    pub classifications: Vec<String>,
}

impl Interpretation {
    /// Whether the output block goes inside a wrapper.
    pub fn is_wrapped(&self) -> bool {
        self.kind == MarkerKind::WrappedBlock
    }
}

/// Interprets `token` against `dictionary`. Total over every token the grammar produces.
pub fn interpret(token: &MarkerToken, dictionary: &Dictionary) -> Interpretation {
    let from_colons = Alignment::from_modifiers(token.left_modifier, token.right_modifier);

    let alignment = if token.class_run == SEPARATOR.to_string() && from_colons.is_some() {
        // `:|`, `|:` and `:|:` spell the colon alignment.
        from_colons
    } else if token.has_separator() {
        Some(Alignment::Center)
    } else {
        from_colons
    };

    let classifications = token
        .class_run
        .chars()
        .filter(|ch| *ch != SEPARATOR)
        .filter_map(|ch| dictionary.get(ch))
        .map(str::to_string)
        .collect();

    Interpretation {
        kind: token.kind,
        alignment,
        classifications,
    }
}
