#![deny(missing_docs)]
//! flexpara core: splits markdown paragraphs at `~>` / `=>` markers into styled blocks.

/// Output block and wrapper assembly.
pub mod assemble;
/// Serializable configuration loading.
pub mod config;
/// Classification dictionary.
pub mod dictionary;
/// Core error types.
pub mod error;
/// Marker grammar and scanning.
pub mod grammar;
/// Marker reports for tooling.
pub mod inspect;
/// Marker interpretation.
pub mod interpret;
/// Runtime option shapes.
pub mod options;
/// Markdown parsing utilities and extension hooks.
pub mod parse;
/// Inline partitioning at marker boundaries.
pub mod partition;
/// Tree rewriting.
pub mod rewrite;

pub use assemble::{
    FlexBlock, FlexNode, FlexWrapper, assemble, is_valid_attribute_name, is_valid_tag_name,
};
pub use config::{ClassList, FlexConfig};
pub use dictionary::Dictionary;
pub use error::{FlexError, SourceLocation};
pub use grammar::{MarkerKind, MarkerSpan, MarkerToken, contains_marker, find_markers};
pub use inspect::{MarkerReport, inspect};
pub use interpret::{Alignment, Interpretation, interpret};
pub use options::{Options, Properties, Setting, StyleFn};
pub use parse::{AstTransform, ParseOptions, ParserPipeline, parse_mdast, parse_mdast_with_options};
pub use partition::{Group, partition};
pub use rewrite::{FlexibleParagraphs, RewriteStats};
