//! Builds output blocks and wrappers from partitioned groups.

use markdown::mdast::{
    AttributeContent, AttributeValue, MdxJsxAttribute, MdxJsxFlowElement, Node, Paragraph,
};
use serde_json::Value;

use crate::interpret::{Alignment, Interpretation};
use crate::options::{DEFAULT_WRAPPER_TAG_NAME, Options, Properties, PropertiesFn};
use crate::partition::Group;

/// Tag name of every output block.
pub const BLOCK_TAG_NAME: &str = "p";

/// Keys the assembler owns on wrappers.
const WRAPPER_OWNED_KEYS: [&str; 2] = ["className", "class"];
/// Keys the assembler owns on blocks; style is derived from alignment.
const BLOCK_OWNED_KEYS: [&str; 3] = ["className", "class", "style"];

/// A styled paragraph.
#[derive(Clone, Debug, PartialEq)]
pub struct FlexBlock {
    /// Classes in output order.
    pub class_names: Vec<String>,
    /// Sanitized custom attributes.
    pub properties: Properties,
    /// Inline style, present only when the marker is aligned.
    pub style: Option<String>,
    /// Inline content.
    pub children: Vec<Node>,
}

/// A container holding exactly one [`FlexBlock`].
#[derive(Clone, Debug, PartialEq)]
pub struct FlexWrapper {
    /// Element name.
    pub tag_name: String,
    /// Classes in output order.
    pub class_names: Vec<String>,
    /// Sanitized custom attributes.
    pub properties: Properties,
    /// The wrapped block.
    pub block: FlexBlock,
}

/// One assembled output node.
#[derive(Clone, Debug, PartialEq)]
pub enum FlexNode {
    /// Content before the first marker, emitted as an ordinary paragraph.
    Plain(Vec<Node>),
    /// A styled block on its own.
    Block(FlexBlock),
    /// A styled block inside a wrapper.
    Wrapped(FlexWrapper),
}

impl FlexNode {
    /// Converts into the host tree representation.
    pub fn into_node(self) -> Node {
        match self {
            FlexNode::Plain(children) => Node::Paragraph(Paragraph {
                children,
                position: None,
            }),
            FlexNode::Block(block) => block.into_node(),
            FlexNode::Wrapped(wrapper) => wrapper.into_node(),
        }
    }
}

impl FlexBlock {
    /// Converts into a `<p>` element.
    pub fn into_node(self) -> Node {
        let attributes = element_attributes(&self.class_names, self.properties, self.style);
        jsx_element(BLOCK_TAG_NAME, attributes, self.children)
    }
}

impl FlexWrapper {
    /// Converts into the wrapper element with the block as its only child.
    pub fn into_node(self) -> Node {
        let attributes = element_attributes(&self.class_names, self.properties, None);
        let block = self.block.into_node();
        jsx_element(&self.tag_name, attributes, vec![block])
    }
}

/// Assembles one output node per group, in group order.
pub fn assemble(groups: Vec<Group>, options: &Options) -> Vec<FlexNode> {
    groups
        .into_iter()
        .map(|group| assemble_group(group, options))
        .collect()
}

fn assemble_group(group: Group, options: &Options) -> FlexNode {
    let Some(style) = group.style else {
        return FlexNode::Plain(group.children);
    };

    let block = build_block(&style, group.children, options);
    if !style.is_wrapped() {
        return FlexNode::Block(block);
    }

    let Interpretation {
        alignment,
        classifications,
        ..
    } = &style;
    let class_names = non_empty(options.wrapper_class_name.resolve(*alignment, classifications));
    let properties = custom_properties(
        options.wrapper_properties.as_ref(),
        *alignment,
        classifications,
        &WRAPPER_OWNED_KEYS,
    );

    let mut tag_name = options.wrapper_tag_name.resolve(*alignment, classifications);
    if !is_valid_tag_name(&tag_name) {
        log::warn!("invalid wrapper tag name {tag_name:?}, using {DEFAULT_WRAPPER_TAG_NAME:?}");
        tag_name = DEFAULT_WRAPPER_TAG_NAME.to_string();
    }

    FlexNode::Wrapped(FlexWrapper {
        tag_name,
        class_names,
        properties,
        block,
    })
}

fn build_block(style: &Interpretation, children: Vec<Node>, options: &Options) -> FlexBlock {
    let alignment = style.alignment;
    let classifications = &style.classifications;
    let prefix = options.block_classification_prefix.as_str();

    let mut class_names = options.block_class_name.resolve(alignment, classifications);
    class_names.extend(
        classifications
            .iter()
            .map(|classification| prefixed(prefix, classification)),
    );
    if let Some(alignment) = alignment {
        class_names.push(prefixed(prefix, &format!("align-{alignment}")));
    }

    FlexBlock {
        class_names: non_empty(class_names),
        properties: custom_properties(
            options.block_properties.as_ref(),
            alignment,
            classifications,
            &BLOCK_OWNED_KEYS,
        ),
        style: alignment.map(text_align),
        children,
    }
}

fn prefixed(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}-{name}")
    }
}

fn text_align(alignment: Alignment) -> String {
    format!("text-align:{alignment}")
}

fn non_empty(class_names: Vec<String>) -> Vec<String> {
    class_names
        .into_iter()
        .filter(|name| !name.trim().is_empty())
        .collect()
}

fn custom_properties(
    compute: Option<&PropertiesFn>,
    alignment: Option<Alignment>,
    classifications: &[String],
    owned_keys: &[&str],
) -> Properties {
    let Some(compute) = compute else {
        return Properties::new();
    };
    sanitize_properties(compute.compute(alignment, classifications), owned_keys)
}

/// Whether `name` can be written as an element name: an ASCII letter followed by
/// letters, digits, `-`, `_`, `.` or `:`.
pub fn is_valid_tag_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|first| first.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':'))
}

/// Whether `name` can be written as an attribute name.
pub fn is_valid_attribute_name(name: &str) -> bool {
    !name.is_empty()
        && name.chars().all(|c| {
            !c.is_whitespace()
                && !c.is_control()
                && !matches!(c, '"' | '\'' | '<' | '>' | '/' | '=')
        })
}

/// Drops empty values, unwritable names and keys the assembler sets itself.
pub fn sanitize_properties(properties: Properties, owned_keys: &[&str]) -> Properties {
    properties
        .into_iter()
        .filter(|(key, value)| {
            if owned_keys.contains(&key.as_str()) {
                log::debug!("ignoring custom property {key:?}");
                return false;
            }
            if !is_valid_attribute_name(key) {
                log::warn!("dropping custom property with invalid name {key:?}");
                return false;
            }
            if is_empty_value(value) {
                log::debug!("suppressing empty custom property {key:?}");
                return false;
            }
            true
        })
        .collect()
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

fn element_attributes(
    class_names: &[String],
    properties: Properties,
    style: Option<String>,
) -> Vec<AttributeContent> {
    let mut attributes = Vec::with_capacity(properties.len() + 2);
    if !class_names.is_empty() {
        attributes.push(literal_attribute("class", class_names.join(" ")));
    }
    attributes.extend(
        properties
            .into_iter()
            .filter_map(|(name, value)| property_attribute(name, value)),
    );
    if let Some(style) = style {
        attributes.push(literal_attribute("style", style));
    }
    attributes
}

fn property_attribute(name: String, value: Value) -> Option<AttributeContent> {
    let value = match value {
        Value::Null | Value::Bool(false) => return None,
        Value::Bool(true) => None,
        Value::String(s) => Some(AttributeValue::Literal(s)),
        Value::Number(n) => Some(AttributeValue::Literal(n.to_string())),
        Value::Array(items) => Some(AttributeValue::Literal(
            items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(" "),
        )),
        object @ Value::Object(_) => Some(AttributeValue::Literal(object.to_string())),
    };
    Some(AttributeContent::Property(MdxJsxAttribute { name, value }))
}

fn literal_attribute(name: &str, value: String) -> AttributeContent {
    AttributeContent::Property(MdxJsxAttribute {
        name: name.to_string(),
        value: Some(AttributeValue::Literal(value)),
    })
}

fn jsx_element(name: &str, attributes: Vec<AttributeContent>, children: Vec<Node>) -> Node {
    Node::MdxJsxFlowElement(MdxJsxFlowElement {
        children,
        position: None,
        name: Some(name.to_string()),
        attributes,
    })
}

/// Literal value of attribute `name` on a JSX element, `Some("")` for valueless attributes.
#[cfg(test)]
pub(crate) fn attribute_value<'a>(attributes: &'a [AttributeContent], name: &str) -> Option<&'a str> {
    attributes.iter().find_map(|attribute| match attribute {
        AttributeContent::Property(property) if property.name == name => match &property.value {
            Some(AttributeValue::Literal(value)) => Some(value.as_str()),
            Some(AttributeValue::Expression(_)) => None,
            None => Some(""),
        },
        _ => None,
    })
}
