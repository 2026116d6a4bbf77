//! Markdown parsing utilities and the AST transform hook.

use crate::FlexError;
use markdown::mdast::Node;
use markdown::message::{Message, Place};

/// Parser options for building markdown-rs parse options.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParseOptions {
    /// Enable MDX constructs (JSX, ESM, expressions).
    pub mdx: bool,
    /// Enable GitHub Flavored Markdown constructs.
    pub gfm: bool,
    /// Enable YAML frontmatter parsing.
    pub frontmatter: bool,
    /// Allow raw HTML nodes in the AST.
    pub raw_html: bool,
    /// Enable math constructs ($inline$ and $$block$$).
    pub math: bool,
}

impl ParseOptions {
    /// Markdown-friendly defaults (no MDX).
    pub const fn markdown() -> Self {
        Self {
            mdx: false,
            gfm: true,
            frontmatter: true,
            raw_html: true,
            math: false,
        }
    }

    /// MDX-friendly defaults (JSX/ESM/expression enabled).
    pub const fn mdx() -> Self {
        Self {
            mdx: true,
            gfm: true,
            frontmatter: true,
            raw_html: false,
            math: false,
        }
    }

    /// Convert to markdown-rs `ParseOptions`.
    pub fn to_markdown(self) -> markdown::ParseOptions {
        let mut constructs = markdown::Constructs {
            frontmatter: self.frontmatter,
            // Indented code and raw HTML both collide with MDX syntax.
            code_indented: !self.mdx,
            html_flow: self.raw_html && !self.mdx,
            html_text: self.raw_html && !self.mdx,
            ..Default::default()
        };

        if self.gfm {
            constructs.gfm_autolink_literal = true;
            constructs.gfm_footnote_definition = true;
            constructs.gfm_label_start_footnote = true;
            constructs.gfm_strikethrough = true;
            constructs.gfm_table = true;
            constructs.gfm_task_list_item = true;
        }

        if self.mdx {
            constructs.mdx_esm = true;
            constructs.mdx_expression_flow = true;
            constructs.mdx_expression_text = true;
            constructs.mdx_jsx_flow = true;
            constructs.mdx_jsx_text = true;
        }

        if self.math {
            constructs.math_flow = true;
            constructs.math_text = true;
        }

        markdown::ParseOptions {
            constructs,
            math_text_single_dollar: self.math,
            ..markdown::ParseOptions::default()
        }
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self::markdown()
    }
}

/// Trait for mutating the parsed MDAST after parsing.
pub trait AstTransform {
    /// Mutate the parsed markdown AST in place.
    fn transform(&self, root: &mut Node);
}

impl<F> AstTransform for F
where
    F: Fn(&mut Node),
{
    fn transform(&self, root: &mut Node) {
        (self)(root)
    }
}

/// Configurable parsing pipeline with AST transforms applied in insertion order.
pub struct ParserPipeline {
    options: markdown::ParseOptions,
    ast_transforms: Vec<Box<dyn AstTransform>>,
}

impl ParserPipeline {
    /// Create a new pipeline from markdown-rs parse options.
    pub fn new(options: markdown::ParseOptions) -> Self {
        Self {
            options,
            ast_transforms: Vec::new(),
        }
    }

    /// Add an AST transform.
    pub fn add_ast_transform<T: AstTransform + 'static>(&mut self, transform: T) {
        self.ast_transforms.push(Box::new(transform));
    }

    /// Parse markdown into MDAST using the configured pipeline.
    pub fn parse(&self, input: &str) -> Result<Node, FlexError> {
        let mut root = parse_mdast_with_options(input, &self.options)?;
        for transform in &self.ast_transforms {
            transform.transform(&mut root);
        }

        Ok(root)
    }
}

/// Parse markdown into an MDAST tree using core options.
pub fn parse_mdast(input: &str, options: &ParseOptions) -> Result<Node, FlexError> {
    parse_mdast_with_options(input, &options.to_markdown())
}

/// Parse markdown into an MDAST tree using markdown-rs `ParseOptions`.
pub fn parse_mdast_with_options(
    input: &str,
    options: &markdown::ParseOptions,
) -> Result<Node, FlexError> {
    markdown::to_mdast(input, options).map_err(|err| {
        let (line, column) = message_point(&err);
        FlexError::parse_error(err.to_string(), line, column)
    })
}

fn message_point(message: &Message) -> (usize, usize) {
    match message.place.as_deref() {
        Some(Place::Point(point)) => (point.line, point.column),
        Some(Place::Position(position)) => (position.start.line, position.start.column),
        None => (1, 1),
    }
}
