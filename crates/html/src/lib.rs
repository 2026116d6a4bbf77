#![deny(missing_docs)]
//! HTML output for markdown documents run through the flexible paragraph transform.

/// Rendering state.
pub mod context;
/// Node rendering.
pub mod render;

use flexpara_core::{
    FlexConfig, FlexError, FlexibleParagraphs, Options, ParseOptions, ParserPipeline,
};
use markdown::mdast::Node;
use serde::{Deserialize, Serialize};

use crate::context::Context;
use crate::render::render_node;

/// Renderer switches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderOptions {
    /// Pass raw HTML through instead of escaping it.
    pub allow_raw_html: bool,
}

/// Renders an mdast tree to HTML. Flow blocks are separated by newlines.
pub fn render_html(root: &Node, options: &RenderOptions) -> String {
    let mut ctx = Context::new(options);
    render_node(root, &mut ctx);
    ctx.finish()
}

/// Parse, transform and render in one place.
pub struct Renderer {
    pipeline: ParserPipeline,
    render_options: RenderOptions,
}

impl Renderer {
    /// Creates a renderer running the flexible paragraph transform with `options`.
    pub fn new(options: Options, parse_options: ParseOptions, render_options: RenderOptions) -> Self {
        let mut pipeline = ParserPipeline::new(parse_options.to_markdown());
        pipeline.add_ast_transform(FlexibleParagraphs::new(options));
        Self {
            pipeline,
            render_options,
        }
    }

    /// Creates a renderer from a configuration file's contents.
    pub fn from_config(
        config: &FlexConfig,
        parse_options: ParseOptions,
        render_options: RenderOptions,
    ) -> Result<Self, FlexError> {
        Ok(Self::new(config.build()?, parse_options, render_options))
    }

    /// Renders one markdown document.
    pub fn render(&self, input: &str) -> Result<String, FlexError> {
        let root = self.pipeline.parse(input)?;
        Ok(render_html(&root, &self.render_options))
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(
            Options::default(),
            ParseOptions::markdown(),
            RenderOptions::default(),
        )
    }
}

/// Renders markdown with the transform configured by `config`.
pub fn to_html(
    input: &str,
    config: &FlexConfig,
    render_options: &RenderOptions,
) -> Result<String, FlexError> {
    Renderer::from_config(config, ParseOptions::markdown(), *render_options)?.render(input)
}
