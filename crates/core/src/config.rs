//! Serializable configuration, loaded from JSON or YAML.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::FlexError;
use crate::assemble::{is_valid_attribute_name, is_valid_tag_name, sanitize_properties};
use crate::dictionary::Dictionary;
use crate::options::{
    DEFAULT_BLOCK_CLASS_NAME, DEFAULT_CLASSIFICATION_PREFIX, DEFAULT_WRAPPER_CLASS_NAME,
    DEFAULT_WRAPPER_TAG_NAME, Options, Properties, Setting,
};

/// A class list written either as one string or as a list of strings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClassList {
    /// Space separated classes.
    One(String),
    /// Classes in order.
    Many(Vec<String>),
}

impl ClassList {
    /// Classes in order, split on whitespace.
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            ClassList::One(value) => value.split_whitespace().map(str::to_string).collect(),
            ClassList::Many(values) => values
                .iter()
                .flat_map(|value| value.split_whitespace())
                .map(str::to_string)
                .collect(),
        }
    }
}

impl From<&str> for ClassList {
    fn from(value: &str) -> Self {
        ClassList::One(value.to_string())
    }
}

/// Static configuration of the transform.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct FlexConfig {
    /// Overrides merged onto the built-in dictionary.
    pub dictionary: BTreeMap<String, String>,
    /// Base classes of every block.
    pub block_class_name: ClassList,
    /// Prefix of classification and alignment classes.
    pub block_classification_prefix: String,
    /// Constant block attributes.
    pub block_properties: Properties,
    /// Wrapper element name.
    pub wrapper_tag_name: String,
    /// Base classes of every wrapper.
    pub wrapper_class_name: ClassList,
    /// Constant wrapper attributes.
    pub wrapper_properties: Properties,
}

impl Default for FlexConfig {
    fn default() -> Self {
        Self {
            dictionary: BTreeMap::new(),
            block_class_name: DEFAULT_BLOCK_CLASS_NAME.into(),
            block_classification_prefix: DEFAULT_CLASSIFICATION_PREFIX.to_string(),
            block_properties: Properties::new(),
            wrapper_tag_name: DEFAULT_WRAPPER_TAG_NAME.to_string(),
            wrapper_class_name: DEFAULT_WRAPPER_CLASS_NAME.into(),
            wrapper_properties: Properties::new(),
        }
    }
}

impl FlexConfig {
    /// Parses a JSON document.
    pub fn from_json_str(input: &str) -> Result<Self, FlexError> {
        Ok(serde_json::from_str(input)?)
    }

    /// Parses a YAML document. An empty document yields the defaults.
    pub fn from_yaml_str(input: &str) -> Result<Self, FlexError> {
        if input.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(input)?)
    }

    /// Reads a `.json`, `.yaml` or `.yml` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FlexError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        let config = match extension.as_deref() {
            Some("json") => Self::from_json_str(&std::fs::read_to_string(path)?)?,
            Some("yaml" | "yml") => Self::from_yaml_str(&std::fs::read_to_string(path)?)?,
            _ => return Err(FlexError::UnsupportedConfigFormat(path.to_path_buf())),
        };
        log::debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    /// The dictionary this configuration selects.
    pub fn dictionary(&self) -> Result<Dictionary, FlexError> {
        if self.dictionary.is_empty() {
            return Ok(Dictionary::default());
        }
        Dictionary::from_string_overrides(&self.dictionary)
    }

    /// Validates and converts into runtime options.
    pub fn build(&self) -> Result<Options, FlexError> {
        if !is_valid_tag_name(&self.wrapper_tag_name) {
            return Err(FlexError::invalid_config(format!(
                "wrapperTagName {:?} is not a valid element name",
                self.wrapper_tag_name
            )));
        }
        for (field, properties) in [
            ("blockProperties", &self.block_properties),
            ("wrapperProperties", &self.wrapper_properties),
        ] {
            if let Some(name) = properties.keys().find(|name| !is_valid_attribute_name(name)) {
                return Err(FlexError::invalid_config(format!(
                    "{field} key {name:?} is not a valid attribute name"
                )));
            }
        }

        let mut options = Options {
            dictionary: self.dictionary()?,
            block_class_name: Setting::constant(self.block_class_name.to_vec()),
            block_classification_prefix: self.block_classification_prefix.clone(),
            block_properties: None,
            wrapper_tag_name: Setting::constant(self.wrapper_tag_name.clone()),
            wrapper_class_name: Setting::constant(self.wrapper_class_name.to_vec()),
            wrapper_properties: None,
        };

        let block_properties = sanitize_properties(self.block_properties.clone(), &[]);
        if !block_properties.is_empty() {
            options = options.with_block_properties(move |_, _| block_properties.clone());
        }
        let wrapper_properties = sanitize_properties(self.wrapper_properties.clone(), &[]);
        if !wrapper_properties.is_empty() {
            options = options.with_wrapper_properties(move |_, _| wrapper_properties.clone());
        }

        Ok(options)
    }
}
