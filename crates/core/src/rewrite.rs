//! Rewrites marker paragraphs of an mdast tree in place.

use markdown::mdast::Node;

use crate::assemble::{FlexNode, assemble};
use crate::grammar::contains_marker;
use crate::options::Options;
use crate::parse::AstTransform;
use crate::partition::partition;

/// Counters reported by [`FlexibleParagraphs::rewrite_tree`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RewriteStats {
    /// Paragraphs replaced.
    pub paragraphs: usize,
    /// Nodes emitted in their place.
    pub blocks: usize,
}

/// The flexible paragraph transform.
#[derive(Debug, Default)]
pub struct FlexibleParagraphs {
    options: Options,
}

impl FlexibleParagraphs {
    /// Creates a transform reading `options` for every paragraph.
    pub fn new(options: Options) -> Self {
        Self { options }
    }

    /// Replacement nodes for a paragraph with these inline children, `None` when
    /// no direct text child carries a marker.
    pub fn rewrite_block(&self, children: &[Node]) -> Option<Vec<Node>> {
        if !is_candidate(children) {
            return None;
        }
        Some(self.split(children.to_vec()))
    }

    /// Assembled output for the inline children of a candidate paragraph.
    pub fn assemble_block(&self, children: Vec<Node>) -> Vec<FlexNode> {
        let groups = partition(children, &self.options.dictionary);
        assemble(groups, &self.options)
    }

    /// Rewrites every candidate paragraph under `root`, at any depth.
    pub fn rewrite_tree(&self, root: &mut Node) -> RewriteStats {
        let mut stats = RewriteStats::default();
        if let Some(children) = root.children_mut() {
            self.rewrite_children(children, &mut stats);
        }
        if stats.paragraphs > 0 {
            log::debug!(
                "rewrote {} paragraph(s) into {} block(s)",
                stats.paragraphs,
                stats.blocks
            );
        }
        stats
    }

    fn split(&self, children: Vec<Node>) -> Vec<Node> {
        self.assemble_block(children)
            .into_iter()
            .map(FlexNode::into_node)
            .collect()
    }

    fn rewrite_children(&self, children: &mut Vec<Node>, stats: &mut RewriteStats) {
        let mut index = 0;
        while index < children.len() {
            if let Node::Paragraph(paragraph) = &mut children[index] {
                if is_candidate(&paragraph.children) {
                    let inline = std::mem::take(&mut paragraph.children);
                    let replacement = self.split(inline);
                    let emitted = replacement.len();
                    children.splice(index..=index, replacement);

                    stats.paragraphs += 1;
                    stats.blocks += emitted;
                    // Inserted nodes are output, not input.
                    index += emitted;
                } else {
                    index += 1;
                }
                continue;
            }

            if let Some(nested) = children[index].children_mut() {
                self.rewrite_children(nested, stats);
            }
            index += 1;
        }
    }
}

impl AstTransform for FlexibleParagraphs {
    fn transform(&self, root: &mut Node) {
        self.rewrite_tree(root);
    }
}

/// Whether a paragraph with these inline children is rewritten.
pub fn is_candidate(children: &[Node]) -> bool {
    children
        .iter()
        .any(|child| matches!(child, Node::Text(text) if contains_marker(&text.value)))
}
