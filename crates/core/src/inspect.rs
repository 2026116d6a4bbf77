//! Lists the markers of a document without rewriting it.

use markdown::mdast::{Node, Text};
use serde::Serialize;

use crate::SourceLocation;
use crate::dictionary::Dictionary;
use crate::grammar::{MarkerSpan, find_markers};
use crate::interpret::{Interpretation, interpret};

/// One marker found in a paragraph.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MarkerReport {
    /// Where the marker character sits in the source.
    pub location: SourceLocation,
    /// Marker text without its trailing whitespace.
    pub token: String,
    /// What the marker resolves to.
    pub interpretation: Interpretation,
}

/// Reports every marker that the transform would act on, in document order.
///
/// `source` is the text `root` was parsed from; locations point into it.
pub fn inspect(root: &Node, source: &str, dictionary: &Dictionary) -> Vec<MarkerReport> {
    let mut reports = Vec::new();
    collect(root, source, dictionary, &mut reports);
    reports
}

fn collect(node: &Node, source: &str, dictionary: &Dictionary, reports: &mut Vec<MarkerReport>) {
    if let Node::Paragraph(paragraph) = node {
        for child in &paragraph.children {
            if let Node::Text(text) = child {
                reports.extend(
                    find_markers(&text.value).map(|span| report(text, &span, source, dictionary)),
                );
            }
        }
        return;
    }

    if let Some(children) = node.children() {
        for child in children {
            collect(child, source, dictionary, reports);
        }
    }
}

fn report(text: &Text, span: &MarkerSpan, source: &str, dictionary: &Dictionary) -> MarkerReport {
    let token = span.as_str(&text.value).trim_end();
    MarkerReport {
        location: locate(text, span.start, token, source),
        token: token.to_string(),
        interpretation: interpret(&span.token, dictionary),
    }
}

/// Source location of the marker starting at byte `offset` of the text value.
///
/// The value drops container prefixes and decodes character references, so the
/// marker is looked up in the node's source range by occurrence count.
fn locate(text: &Text, offset: usize, token: &str, source: &str) -> SourceLocation {
    let Some(position) = &text.position else {
        return point_in(&text.value, offset);
    };
    let start = position.start.offset;
    let range = source.get(start..position.end.offset);

    let nth = text.value[..offset].matches(token).count();
    match range.and_then(|range| range.match_indices(token).nth(nth)) {
        Some((found, _)) => point_in(source, start + found),
        None => {
            log::debug!("marker {token:?} not found in its source range");
            let relative = point_in(&text.value, offset);
            if relative.line == 1 {
                SourceLocation::new(
                    position.start.line,
                    position.start.column + relative.column - 1,
                )
            } else {
                SourceLocation::new(position.start.line + relative.line - 1, relative.column)
            }
        }
    }
}

/// 1-indexed line and character column of byte `offset` in `text`.
fn point_in(text: &str, offset: usize) -> SourceLocation {
    let before = &text[..offset];
    let line_start = before.rfind('\n').map_or(0, |newline| newline + 1);
    SourceLocation::new(
        before.matches('\n').count() + 1,
        before[line_start..].chars().count() + 1,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::MarkerKind;
    use crate::interpret::Alignment;
    use crate::parse::{ParseOptions, parse_mdast};

    fn reports_for(input: &str) -> Vec<MarkerReport> {
        let root = parse_mdast(input, &ParseOptions::markdown()).unwrap();
        inspect(&root, input, Dictionary::built_in())
    }

    #[test]
    fn reports_markers_in_document_order() {
        let reports = reports_for("intro\n\n~w:> hello\n~:s> xxx\n\n=|> centered");
        assert_eq!(reports.len(), 3);

        assert_eq!(reports[0].token, "~w:>");
        assert_eq!(reports[0].location, SourceLocation::new(3, 1));
        assert_eq!(reports[0].interpretation.alignment, Some(Alignment::Right));

        assert_eq!(reports[1].token, "~:s>");
        assert_eq!(reports[1].location, SourceLocation::new(4, 1));

        assert_eq!(reports[2].token, "=|>");
        assert_eq!(reports[2].location, SourceLocation::new(6, 1));
        assert_eq!(reports[2].interpretation.kind, MarkerKind::WrappedBlock);
    }

    #[test]
    fn mid_line_markers_report_their_column() {
        let reports = reports_for("abc ~i> info");
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].location, SourceLocation::new(1, 5));
        assert_eq!(reports[0].interpretation.classifications, vec!["info"]);
    }

    #[test]
    fn locations_point_into_the_source_inside_containers() {
        let reports = reports_for("> quoted\n> ~w> marker");
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].location, SourceLocation::new(2, 3));

        let reports = reports_for("- item\n  ~w> marker");
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].location, SourceLocation::new(2, 3));

        let reports = reports_for("> > nested ~i> one\n> > ~s> two");
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].location, SourceLocation::new(1, 12));
        assert_eq!(reports[1].location, SourceLocation::new(2, 5));
    }

    #[test]
    fn locations_skip_character_references() {
        let reports = reports_for("a &amp; b ~w> marker");
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].location, SourceLocation::new(1, 11));
    }

    #[test]
    fn repeated_tokens_map_to_their_own_occurrence() {
        let reports = reports_for("> ~w> one\n> ~w> two");
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].location, SourceLocation::new(1, 3));
        assert_eq!(reports[1].location, SourceLocation::new(2, 3));
    }

    #[test]
    fn markers_in_headings_and_code_are_not_reported() {
        let reports = reports_for("# ~w> heading\n\n```\n~w> code\n```\n\n`~w>` inline");
        assert!(reports.is_empty());
    }

    #[test]
    fn report_serializes_to_json() {
        let reports = reports_for("~:wf2:> hello");
        let value = serde_json::to_value(&reports[0]).unwrap();
        assert_eq!(value["token"], "~:wf2:>");
        assert_eq!(value["location"]["line"], 1);
        assert_eq!(value["interpretation"]["kind"], "plain-block");
        assert_eq!(value["interpretation"]["alignment"], "justify");
        assert_eq!(
            value["interpretation"]["classifications"],
            serde_json::json!(["warning", "framed", "type-2"])
        );
    }
}
