//! Rendering state for the HTML renderer.

use crate::RenderOptions;

/// Nesting the renderer is currently inside.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scope {
    /// Document root or another flow container.
    Root,
    /// A list; `spread` is false for tight lists.
    List {
        /// Whether items are separated by blank lines.
        spread: bool,
    },
    /// Phrasing content of a paragraph, heading, cell or element.
    Phrasing,
}

/// Output buffer plus the scope stack.
pub struct Context<'a> {
    html: String,
    stack: Vec<Scope>,
    options: &'a RenderOptions,
}

impl<'a> Context<'a> {
    /// Creates an empty context.
    pub fn new(options: &'a RenderOptions) -> Self {
        Self {
            html: String::with_capacity(4096),
            stack: vec![Scope::Root],
            options,
        }
    }

    /// Writes markup as is.
    pub fn push_raw(&mut self, s: &str) {
        self.html.push_str(s);
    }

    /// Writes text content, escaped.
    pub fn push_text(&mut self, s: &str) {
        html_escape::encode_text_to_string(s, &mut self.html);
    }

    /// Writes an attribute value, escaped for double quotes.
    pub fn push_attr_value(&mut self, s: &str) {
        html_escape::encode_double_quoted_attribute_to_string(s, &mut self.html);
    }

    /// Writes ` name="value"`.
    pub fn push_attr(&mut self, name: &str, value: &str) {
        self.html.push(' ');
        self.html.push_str(name);
        self.html.push_str("=\"");
        self.push_attr_value(value);
        self.html.push('"');
    }

    /// Innermost scope.
    pub fn current_scope(&self) -> Scope {
        self.stack.last().copied().unwrap_or(Scope::Root)
    }

    /// Whether the nearest list, up to the nearest flow container, is tight.
    pub fn is_in_tight_list(&self) -> bool {
        self.stack
            .iter()
            .rev()
            .find(|scope| matches!(scope, Scope::List { .. } | Scope::Root))
            .is_some_and(|scope| matches!(scope, Scope::List { spread: false }))
    }

    /// Whether output is currently phrasing content.
    pub fn is_in_phrasing(&self) -> bool {
        matches!(self.current_scope(), Scope::Phrasing)
    }

    /// Enters a scope.
    pub fn enter(&mut self, scope: Scope) {
        self.stack.push(scope);
    }

    /// Leaves the innermost scope.
    pub fn exit(&mut self) -> Option<Scope> {
        self.stack.pop()
    }

    /// Whether raw HTML passes through unescaped.
    pub fn raw_html_allowed(&self) -> bool {
        self.options.allow_raw_html
    }

    /// Consumes the context and returns the document.
    pub fn finish(self) -> String {
        self.html
    }
}
