//! Splits the inline children of one paragraph at marker boundaries.

use markdown::mdast::{Node, Text};

use crate::dictionary::Dictionary;
use crate::grammar::{MarkerSpan, find_markers};
use crate::interpret::{Interpretation, interpret};

/// A run of inline content and the marker that opened it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Group {
    /// Interpretation of the opening marker; `None` only for content before the first marker.
    pub style: Option<Interpretation>,
    /// Inline nodes moved out of the source paragraph.
    pub children: Vec<Node>,
}

impl Group {
    fn push_text(&mut self, value: &str) {
        if !value.is_empty() {
            self.children.push(text_node(value));
        }
    }

    /// Strips trailing whitespace from a final text child, dropping it when nothing is left.
    fn trim_end(&mut self) {
        let Some(Node::Text(text)) = self.children.last_mut() else {
            return;
        };
        let trimmed_len = text.value.trim_end().len();
        if trimmed_len == 0 {
            self.children.pop();
        } else {
            text.value.truncate(trimmed_len);
        }
    }
}

fn text_node(value: &str) -> Node {
    Node::Text(Text {
        value: value.to_string(),
        position: None,
    })
}

/// Partitions `children` into groups, one per marker plus a leading remainder.
///
/// The leading remainder is omitted when the very first inline node starts with a
/// marker, so `N` markers produce `N` groups in that case and `N + 1` otherwise.
pub fn partition(children: Vec<Node>, dictionary: &Dictionary) -> Vec<Group> {
    let mut groups = Vec::new();
    let mut current = Group::default();

    for (index, child) in children.into_iter().enumerate() {
        let text = match child {
            Node::Text(text) => text,
            other => {
                current.children.push(other);
                continue;
            }
        };

        let markers: Vec<MarkerSpan> = find_markers(&text.value).collect();
        if markers.is_empty() {
            current.children.push(Node::Text(text));
            continue;
        }

        for (nth, marker) in markers.iter().enumerate() {
            if nth == 0 {
                current.push_text(&text.value[..marker.start]);
            }

            let opens_block = index == 0 && nth == 0 && marker.start == 0;
            if !opens_block {
                groups.push(std::mem::take(&mut current));
            }

            let end = markers
                .get(nth + 1)
                .map_or(text.value.len(), |next| next.start);

            current.style = Some(interpret(&marker.token, dictionary));
            current.push_text(&text.value[marker.end..end]);

            log::trace!(
                "marker {:?} opens group {}",
                marker.as_str(&text.value),
                groups.len()
            );
        }
    }

    groups.push(current);
    for group in &mut groups {
        group.trim_end();
    }

    groups
}
