//! Node rendering functions.

use markdown::mdast::{AlignKind, AttributeContent, AttributeValue, Node};

use flexpara_core::{is_valid_attribute_name, is_valid_tag_name};

use crate::context::{Context, Scope};

/// Whether `node` is phrasing content.
fn is_phrasing(node: &Node) -> bool {
    matches!(
        node,
        Node::Text(_)
            | Node::Strong(_)
            | Node::Emphasis(_)
            | Node::Delete(_)
            | Node::InlineCode(_)
            | Node::InlineMath(_)
            | Node::Link(_)
            | Node::LinkReference(_)
            | Node::Image(_)
            | Node::ImageReference(_)
            | Node::Break(_)
            | Node::MdxJsxTextElement(_)
            | Node::MdxTextExpression(_)
            | Node::FootnoteReference(_)
    )
}

/// Renders flow children, one per line.
fn render_flow(children: &[Node], ctx: &mut Context) {
    let mut first = true;
    for child in children {
        if is_silent(child) {
            continue;
        }
        if !first {
            ctx.push_raw("\n");
        }
        render_node(child, ctx);
        first = false;
    }
}

fn render_phrasing(children: &[Node], ctx: &mut Context) {
    ctx.enter(Scope::Phrasing);
    for child in children {
        render_node(child, ctx);
    }
    ctx.exit();
}

/// Nodes that produce no output at all.
fn is_silent(node: &Node) -> bool {
    matches!(
        node,
        Node::Yaml(_) | Node::Toml(_) | Node::Definition(_) | Node::MdxjsEsm(_)
    )
}

/// Renders a list as `<ul>` or `<ol>`.
fn render_list(list: &markdown::mdast::List, ctx: &mut Context) {
    if list.ordered {
        match list.start {
            Some(start) if start != 1 => ctx.push_raw(&format!("<ol start=\"{start}\">\n")),
            _ => ctx.push_raw("<ol>\n"),
        }
    } else {
        ctx.push_raw("<ul>\n");
    }

    ctx.enter(Scope::List {
        spread: list.spread,
    });
    render_flow(&list.children, ctx);
    ctx.exit();

    ctx.push_raw(if list.ordered { "\n</ol>" } else { "\n</ul>" });
}

/// Renders a list item, with a disabled checkbox for GFM task items.
fn render_list_item(item: &markdown::mdast::ListItem, ctx: &mut Context) {
    match item.checked {
        Some(checked) => {
            ctx.push_raw("<li class=\"task-list-item\"><input type=\"checkbox\" disabled");
            if checked {
                ctx.push_raw(" checked");
            }
            ctx.push_raw(" /> ");
        }
        None => ctx.push_raw("<li>"),
    }

    if ctx.is_in_tight_list() {
        render_flow(&item.children, ctx);
    } else {
        ctx.push_raw("\n");
        render_flow(&item.children, ctx);
        ctx.push_raw("\n");
    }

    ctx.push_raw("</li>");
}

/// Renders a paragraph, suppressing `<p>` in tight lists.
fn render_paragraph(para: &markdown::mdast::Paragraph, ctx: &mut Context) {
    let in_tight_list = ctx.is_in_tight_list();
    if !in_tight_list {
        ctx.push_raw("<p>");
    }
    render_phrasing(&para.children, ctx);
    if !in_tight_list {
        ctx.push_raw("</p>");
    }
}

/// Renders a JSX element as a plain HTML element with its literal attributes.
fn render_jsx(
    name: Option<&str>,
    attributes: &[AttributeContent],
    children: &[Node],
    ctx: &mut Context,
) {
    let tag_name = match name {
        Some(name) if is_valid_tag_name(name) => name,
        other => {
            if let Some(name) = other {
                log::warn!("invalid element name {name:?}, rendering its children only");
            }
            if ctx.is_in_phrasing() {
                render_phrasing(children, ctx);
            } else {
                render_flow(children, ctx);
            }
            return;
        }
    };

    ctx.push_raw("<");
    ctx.push_raw(tag_name);
    for attribute in attributes {
        match attribute {
            AttributeContent::Property(property) if !is_valid_attribute_name(&property.name) => {
                log::warn!("dropping attribute with invalid name {:?}", property.name);
            }
            AttributeContent::Property(property) => match &property.value {
                Some(AttributeValue::Literal(value)) => ctx.push_attr(&property.name, value),
                None => {
                    ctx.push_raw(" ");
                    ctx.push_raw(&property.name);
                }
                Some(AttributeValue::Expression(expression)) => {
                    log::debug!(
                        "dropping expression attribute {}={{{}}} on <{tag_name}>",
                        property.name,
                        expression.value
                    );
                }
            },
            AttributeContent::Expression(expression) => {
                log::debug!("dropping spread attribute {{{}}}", expression.value);
            }
        }
    }
    ctx.push_raw(">");

    if ctx.is_in_phrasing() || children.iter().any(is_phrasing) {
        render_phrasing(children, ctx);
    } else if !children.is_empty() {
        ctx.push_raw("\n");
        ctx.enter(Scope::Root);
        render_flow(children, ctx);
        ctx.exit();
        ctx.push_raw("\n");
    }

    ctx.push_raw("</");
    ctx.push_raw(tag_name);
    ctx.push_raw(">");
}

/// Renders a link as `<a>`.
fn render_link(link: &markdown::mdast::Link, ctx: &mut Context) {
    ctx.push_raw("<a");
    ctx.push_attr("href", &link.url);
    if let Some(title) = &link.title {
        ctx.push_attr("title", title);
    }
    ctx.push_raw(">");
    render_phrasing(&link.children, ctx);
    ctx.push_raw("</a>");
}

/// Renders an image as `<img>`.
fn render_image(img: &markdown::mdast::Image, ctx: &mut Context) {
    ctx.push_raw("<img");
    ctx.push_attr("src", &img.url);
    ctx.push_attr("alt", &img.alt);
    if let Some(title) = &img.title {
        ctx.push_attr("title", title);
    }
    ctx.push_raw(" />");
}

fn render_heading(heading: &markdown::mdast::Heading, ctx: &mut Context) {
    ctx.push_raw(&format!("<h{}>", heading.depth));
    render_phrasing(&heading.children, ctx);
    ctx.push_raw(&format!("</h{}>", heading.depth));
}

fn render_code(code: &markdown::mdast::Code, ctx: &mut Context) {
    ctx.push_raw("<pre><code");
    if let Some(lang) = &code.lang {
        ctx.push_attr("class", &format!("language-{lang}"));
    }
    ctx.push_raw(">");
    ctx.push_text(&code.value);
    if !code.value.is_empty() {
        ctx.push_raw("\n");
    }
    ctx.push_raw("</code></pre>");
}

/// Renders a table row with column alignment.
fn render_table_row(
    row: &markdown::mdast::TableRow,
    ctx: &mut Context,
    is_header: bool,
    aligns: &[AlignKind],
) {
    ctx.push_raw("<tr>");

    for (i, cell) in row.children.iter().enumerate() {
        let Node::TableCell(cell) = cell else {
            continue;
        };
        let tag = if is_header { "th" } else { "td" };
        ctx.push_raw("<");
        ctx.push_raw(tag);
        match aligns.get(i) {
            Some(AlignKind::Left) => ctx.push_attr("align", "left"),
            Some(AlignKind::Right) => ctx.push_attr("align", "right"),
            Some(AlignKind::Center) => ctx.push_attr("align", "center"),
            Some(AlignKind::None) | None => {}
        }
        ctx.push_raw(">");
        render_phrasing(&cell.children, ctx);
        ctx.push_raw("</");
        ctx.push_raw(tag);
        ctx.push_raw(">");
    }

    ctx.push_raw("</tr>");
}

/// Renders a table with `<thead>` and an optional `<tbody>`.
fn render_table(table: &markdown::mdast::Table, ctx: &mut Context) {
    ctx.push_raw("<table>\n<thead>");
    if let Some(Node::TableRow(row)) = table.children.first() {
        render_table_row(row, ctx, true, &table.align);
    }
    ctx.push_raw("</thead>");

    if table.children.len() > 1 {
        ctx.push_raw("\n<tbody>");
        for row in table.children.iter().skip(1) {
            if let Node::TableRow(row) = row {
                render_table_row(row, ctx, false, &table.align);
            }
        }
        ctx.push_raw("</tbody>");
    }

    ctx.push_raw("\n</table>");
}

/// Renders raw HTML, passed through or escaped depending on options.
fn render_raw_html(html: &markdown::mdast::Html, ctx: &mut Context) {
    if ctx.raw_html_allowed() {
        ctx.push_raw(&html.value);
    } else {
        log::debug!("escaping raw HTML: {}", html.value);
        ctx.push_text(&html.value);
    }
}

fn render_blockquote(quote: &markdown::mdast::Blockquote, ctx: &mut Context) {
    ctx.push_raw("<blockquote>\n");
    ctx.enter(Scope::Root);
    render_flow(&quote.children, ctx);
    ctx.exit();
    ctx.push_raw("\n</blockquote>");
}

fn render_inline(tag: &str, children: &[Node], ctx: &mut Context) {
    ctx.push_raw("<");
    ctx.push_raw(tag);
    ctx.push_raw(">");
    render_phrasing(children, ctx);
    ctx.push_raw("</");
    ctx.push_raw(tag);
    ctx.push_raw(">");
}

/// Recursively renders a node into `ctx`.
pub fn render_node(node: &Node, ctx: &mut Context) {
    match node {
        Node::Root(root) => render_flow(&root.children, ctx),
        Node::Text(text) => ctx.push_text(&text.value),
        Node::Paragraph(para) => render_paragraph(para, ctx),
        Node::Link(link) => render_link(link, ctx),
        Node::Strong(strong) => render_inline("strong", &strong.children, ctx),
        Node::Emphasis(emphasis) => render_inline("em", &emphasis.children, ctx),
        Node::Delete(delete) => render_inline("del", &delete.children, ctx),
        Node::InlineCode(code) => {
            ctx.push_raw("<code>");
            ctx.push_text(&code.value);
            ctx.push_raw("</code>");
        }
        Node::Heading(heading) => render_heading(heading, ctx),
        Node::List(list) => render_list(list, ctx),
        Node::ListItem(item) => render_list_item(item, ctx),
        Node::Code(code) => render_code(code, ctx),
        Node::Blockquote(quote) => render_blockquote(quote, ctx),
        Node::Image(img) => render_image(img, ctx),
        Node::Break(_) => ctx.push_raw("<br />\n"),
        Node::ThematicBreak(_) => ctx.push_raw("<hr />"),
        Node::Html(html) => render_raw_html(html, ctx),
        Node::Table(table) => render_table(table, ctx),
        Node::MdxJsxFlowElement(elem) => {
            render_jsx(elem.name.as_deref(), &elem.attributes, &elem.children, ctx);
        }
        Node::MdxJsxTextElement(elem) => {
            render_jsx(elem.name.as_deref(), &elem.attributes, &elem.children, ctx);
        }
        Node::InlineMath(math) => {
            ctx.push_raw("<code class=\"language-math math-inline\">");
            ctx.push_text(&math.value);
            ctx.push_raw("</code>");
        }
        Node::Math(math) => {
            ctx.push_raw("<pre><code class=\"language-math math-display\">");
            ctx.push_text(&math.value);
            ctx.push_raw("</code></pre>");
        }
        node if is_silent(node) => {}
        _ => {
            log::warn!("Unhandled markdown node type: {node:?}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RenderOptions;
    use flexpara_core::{ParseOptions, parse_mdast};

    fn render(input: &str) -> String {
        let root = parse_mdast(input, &ParseOptions::markdown()).unwrap();
        crate::render_html(&root, &RenderOptions::default())
    }

    #[test]
    fn flow_blocks_are_one_per_line() {
        assert_eq!(
            render("# Title\n\nsome *text*\n\n---"),
            "<h1>Title</h1>\n<p>some <em>text</em></p>\n<hr />"
        );
    }

    #[test]
    fn tight_lists_drop_paragraph_tags() {
        assert_eq!(
            render("- one\n- two"),
            "<ul>\n<li>one</li>\n<li>two</li>\n</ul>"
        );
        assert_eq!(
            render("3. three\n\n4. four"),
            "<ol start=\"3\">\n<li>\n<p>three</p>\n</li>\n<li>\n<p>four</p>\n</li>\n</ol>"
        );
    }

    #[test]
    fn task_items_render_checkboxes() {
        assert_eq!(
            render("- [x] done"),
            "<ul>\n<li class=\"task-list-item\"><input type=\"checkbox\" disabled checked /> done</li>\n</ul>"
        );
    }

    #[test]
    fn links_and_code_are_escaped() {
        assert_eq!(
            render("[a & b](https://example.com/?q=1&r=2) `x<y`"),
            "<p><a href=\"https://example.com/?q=1&amp;r=2\">a &amp; b</a> <code>x&lt;y</code></p>"
        );
        assert_eq!(
            render("```rust\nfn main() {}\n```"),
            "<pre><code class=\"language-rust\">fn main() {}\n</code></pre>"
        );
    }

    #[test]
    fn raw_html_is_escaped_unless_allowed() {
        let root = parse_mdast("<b>hi</b>", &ParseOptions::markdown()).unwrap();
        assert_eq!(
            crate::render_html(&root, &RenderOptions::default()),
            "<p>&lt;b&gt;hi&lt;/b&gt;</p>"
        );
        assert_eq!(
            crate::render_html(
                &root,
                &RenderOptions {
                    allow_raw_html: true
                }
            ),
            "<p><b>hi</b></p>"
        );
    }

    #[test]
    fn tables_keep_alignment() {
        assert_eq!(
            render("| a | b |\n|:--|--:|\n| 1 | 2 |"),
            "<table>\n<thead><tr><th align=\"left\">a</th><th align=\"right\">b</th></tr></thead>\n<tbody><tr><td align=\"left\">1</td><td align=\"right\">2</td></tr></tbody>\n</table>"
        );
    }

    fn element(name: &str, attributes: &[(&str, &str)]) -> Node {
        use markdown::mdast::{MdxJsxAttribute, MdxJsxFlowElement, Paragraph, Text};

        Node::MdxJsxFlowElement(MdxJsxFlowElement {
            name: Some(name.to_string()),
            attributes: attributes
                .iter()
                .map(|(name, value)| {
                    AttributeContent::Property(MdxJsxAttribute {
                        name: name.to_string(),
                        value: Some(AttributeValue::Literal(value.to_string())),
                    })
                })
                .collect(),
            children: vec![Node::Paragraph(Paragraph {
                children: vec![Node::Text(Text {
                    value: "hi".to_string(),
                    position: None,
                })],
                position: None,
            })],
            position: None,
        })
    }

    #[test]
    fn unwritable_element_and_attribute_names_are_skipped() {
        let options = RenderOptions::default();
        assert_eq!(
            crate::render_html(&element("div><script", &[("title", "t")]), &options),
            "<p>hi</p>"
        );
        assert_eq!(
            crate::render_html(
                &element("section", &[("x onclick", "1"), ("title", "t")]),
                &options
            ),
            "<section title=\"t\">\n<p>hi</p>\n</section>"
        );
    }

    #[test]
    fn frontmatter_produces_no_output() {
        assert_eq!(render("---\ntitle: x\n---\n\nbody"), "<p>body</p>");
    }
}
