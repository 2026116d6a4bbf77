//! Runtime options for the flexible paragraph transform.

use crate::dictionary::Dictionary;
use crate::interpret::Alignment;

/// Extra attributes computed for an output node, written in insertion order.
pub type Properties = serde_json::Map<String, serde_json::Value>;

/// Default base class of every marker-styled block.
pub const DEFAULT_BLOCK_CLASS_NAME: &str = "flexible-paragraph";
/// Default prefix joined to classification and alignment classes.
pub const DEFAULT_CLASSIFICATION_PREFIX: &str = "flexiparaph";
/// Default wrapper element.
pub const DEFAULT_WRAPPER_TAG_NAME: &str = "div";
/// Default base class of every wrapper.
pub const DEFAULT_WRAPPER_CLASS_NAME: &str = "flexible-paragraph-wrapper";

/// Value computed from a marker's alignment and classifications.
pub trait StyleFn<T> {
    /// Computes the value for one output node.
    fn compute(&self, alignment: Option<Alignment>, classifications: &[String]) -> T;
}

impl<T, F> StyleFn<T> for F
where
    F: Fn(Option<Alignment>, &[String]) -> T,
{
    fn compute(&self, alignment: Option<Alignment>, classifications: &[String]) -> T {
        (self)(alignment, classifications)
    }
}

/// An option that is either a fixed value or computed per marker.
pub enum Setting<T> {
    /// Same value for every node.
    Constant(T),
    /// Value derived from alignment and classifications.
    Computed(Box<dyn StyleFn<T>>),
}

impl<T: Clone> Setting<T> {
    /// Wraps a fixed value.
    pub fn constant(value: T) -> Self {
        Setting::Constant(value)
    }

    /// Wraps a computing function.
    pub fn computed<F>(compute: F) -> Self
    where
        F: StyleFn<T> + 'static,
    {
        Setting::Computed(Box::new(compute))
    }

    /// Resolves the value for one node.
    pub fn resolve(&self, alignment: Option<Alignment>, classifications: &[String]) -> T {
        match self {
            Setting::Constant(value) => value.clone(),
            Setting::Computed(compute) => compute.compute(alignment, classifications),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Setting<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Setting::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
            Setting::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// Boxed attribute capability.
pub type PropertiesFn = Box<dyn StyleFn<Properties>>;

/// Options of one transform instance. Built once, read for every paragraph.
pub struct Options {
    /// Character to classification table.
    pub dictionary: Dictionary,
    /// Base classes of every marker-styled block.
    pub block_class_name: Setting<Vec<String>>,
    /// Prefix for classification and alignment classes; empty means bare tokens.
    pub block_classification_prefix: String,
    /// Extra block attributes.
    pub block_properties: Option<PropertiesFn>,
    /// Element name of wrappers.
    pub wrapper_tag_name: Setting<String>,
    /// Base classes of every wrapper.
    pub wrapper_class_name: Setting<Vec<String>>,
    /// Extra wrapper attributes.
    pub wrapper_properties: Option<PropertiesFn>,
}

impl Options {
    /// Sets the block classes from a function.
    pub fn with_block_class_name<F>(mut self, compute: F) -> Self
    where
        F: Fn(Option<Alignment>, &[String]) -> Vec<String> + 'static,
    {
        self.block_class_name = Setting::computed(compute);
        self
    }

    /// Sets the classification prefix.
    pub fn with_classification_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.block_classification_prefix = prefix.into();
        self
    }

    /// Sets the block attribute function.
    pub fn with_block_properties<F>(mut self, compute: F) -> Self
    where
        F: Fn(Option<Alignment>, &[String]) -> Properties + 'static,
    {
        self.block_properties = Some(Box::new(compute));
        self
    }

    /// Sets the wrapper element name from a function.
    pub fn with_wrapper_tag_name<F>(mut self, compute: F) -> Self
    where
        F: Fn(Option<Alignment>, &[String]) -> String + 'static,
    {
        self.wrapper_tag_name = Setting::computed(compute);
        self
    }

    /// Sets the wrapper classes from a function.
    pub fn with_wrapper_class_name<F>(mut self, compute: F) -> Self
    where
        F: Fn(Option<Alignment>, &[String]) -> Vec<String> + 'static,
    {
        self.wrapper_class_name = Setting::computed(compute);
        self
    }

    /// Sets the wrapper attribute function.
    pub fn with_wrapper_properties<F>(mut self, compute: F) -> Self
    where
        F: Fn(Option<Alignment>, &[String]) -> Properties + 'static,
    {
        self.wrapper_properties = Some(Box::new(compute));
        self
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            dictionary: Dictionary::default(),
            block_class_name: Setting::constant(vec![DEFAULT_BLOCK_CLASS_NAME.to_string()]),
            block_classification_prefix: DEFAULT_CLASSIFICATION_PREFIX.to_string(),
            block_properties: None,
            wrapper_tag_name: Setting::constant(DEFAULT_WRAPPER_TAG_NAME.to_string()),
            wrapper_class_name: Setting::constant(vec![DEFAULT_WRAPPER_CLASS_NAME.to_string()]),
            wrapper_properties: None,
        }
    }
}

impl std::fmt::Debug for Options {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Options")
            .field("dictionary", &self.dictionary)
            .field("block_class_name", &self.block_class_name)
            .field(
                "block_classification_prefix",
                &self.block_classification_prefix,
            )
            .field("block_properties", &self.block_properties.is_some())
            .field("wrapper_tag_name", &self.wrapper_tag_name)
            .field("wrapper_class_name", &self.wrapper_class_name)
            .field("wrapper_properties", &self.wrapper_properties.is_some())
            .finish()
    }
}
