//! WebAssembly bindings for rendering flexible paragraph markdown from JavaScript.

use flexpara_core::options::{
    DEFAULT_BLOCK_CLASS_NAME, DEFAULT_WRAPPER_CLASS_NAME, DEFAULT_WRAPPER_TAG_NAME,
};
use flexpara_core::{
    Alignment, ClassList, FlexConfig, Options, ParseOptions, Properties, inspect,
    is_valid_tag_name, parse_mdast,
};
use flexpara_html::{RenderOptions, Renderer};
use js_sys::{Array, Function, Object, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::*;

// ============================================================================
// Config
// ============================================================================

/// Keys whose value may be a `(alignment, classifications) => value` function.
const CALLBACK_KEYS: [&str; 5] = [
    "blockClassName",
    "blockProperties",
    "wrapperTagName",
    "wrapperClassName",
    "wrapperProperties",
];

/// A JavaScript config object split into its serializable part and its callbacks.
struct JsConfig {
    config: FlexConfig,
    callbacks: Vec<(String, Function)>,
    parse_options: ParseOptions,
    render_options: RenderOptions,
}

fn read_config(value: JsValue) -> Result<JsConfig, JsError> {
    let mut parsed = JsConfig {
        config: FlexConfig::default(),
        callbacks: Vec::new(),
        parse_options: ParseOptions::markdown(),
        render_options: RenderOptions::default(),
    };
    if value.is_undefined() || value.is_null() {
        return Ok(parsed);
    }

    let object = value
        .dyn_into::<Object>()
        .map_err(|_| JsError::new("Invalid config: expected an object"))?;

    // Everything that is not a callback or a switch goes through serde.
    let plain = Object::new();
    for key in Object::keys(&object).iter() {
        let Some(name) = key.as_string() else {
            continue;
        };
        let entry = Reflect::get(&object, &key).map_err(js_error)?;
        match name.as_str() {
            "allowRawHtml" => parsed.render_options.allow_raw_html = entry.as_bool() == Some(true),
            "mdx" => {
                if entry.as_bool() == Some(true) {
                    parsed.parse_options = ParseOptions::mdx();
                }
            }
            _ if entry.is_function() && CALLBACK_KEYS.contains(&name.as_str()) => {
                parsed.callbacks.push((name, entry.unchecked_into()));
            }
            _ => {
                Reflect::set(&plain, &key, &entry).map_err(js_error)?;
            }
        }
    }

    parsed.config = serde_wasm_bindgen::from_value(plain.into())
        .map_err(|e| JsError::new(&format!("Invalid config: {}", e)))?;
    Ok(parsed)
}

impl JsConfig {
    fn into_options(self) -> Result<Options, JsError> {
        let mut options = self
            .config
            .build()
            .map_err(|e| JsError::new(&e.to_string()))?;

        for (key, callback) in self.callbacks {
            options = match key.as_str() {
                "blockClassName" => options.with_block_class_name(move |alignment, classes| {
                    class_list(call(&callback, alignment, classes), DEFAULT_BLOCK_CLASS_NAME)
                }),
                "wrapperClassName" => options.with_wrapper_class_name(move |alignment, classes| {
                    class_list(call(&callback, alignment, classes), DEFAULT_WRAPPER_CLASS_NAME)
                }),
                "wrapperTagName" => options.with_wrapper_tag_name(move |alignment, classes| {
                    tag_name(call(&callback, alignment, classes))
                }),
                "blockProperties" => options.with_block_properties(move |alignment, classes| {
                    properties(call(&callback, alignment, classes))
                }),
                "wrapperProperties" => options.with_wrapper_properties(move |alignment, classes| {
                    properties(call(&callback, alignment, classes))
                }),
                _ => options,
            };
        }
        Ok(options)
    }
}

fn js_error(err: JsValue) -> JsError {
    JsError::new(&err.as_string().unwrap_or_else(|| format!("{:?}", err)))
}

// ============================================================================
// Callback bridge
// ============================================================================

/// Calls a style callback; `None` when it throws.
fn call(
    callback: &Function,
    alignment: Option<Alignment>,
    classifications: &[String],
) -> Option<JsValue> {
    let alignment = alignment.map_or(JsValue::UNDEFINED, |a| JsValue::from_str(a.as_str()));
    let classifications: Array = classifications
        .iter()
        .map(|c| JsValue::from_str(c))
        .collect();
    match callback.call2(&JsValue::NULL, &alignment, &classifications) {
        Ok(value) => Some(value),
        Err(err) => {
            log::warn!("style callback threw {:?}", err);
            None
        }
    }
}

fn class_list(value: Option<JsValue>, fallback: &str) -> Vec<String> {
    if let Some(value) = value {
        if let Some(single) = value.as_string() {
            return ClassList::One(single).to_vec();
        }
        if Array::is_array(&value) {
            let items = Array::from(&value)
                .iter()
                .filter_map(|item| item.as_string())
                .collect();
            return ClassList::Many(items).to_vec();
        }
        log::warn!("class name callback returned {:?}, using {:?}", value, fallback);
    }
    vec![fallback.to_string()]
}

fn tag_name(value: Option<JsValue>) -> String {
    match value.as_ref().and_then(JsValue::as_string) {
        Some(name) if is_valid_tag_name(&name) => name,
        _ => {
            log::warn!(
                "wrapper tag callback returned {:?}, using {:?}",
                value,
                DEFAULT_WRAPPER_TAG_NAME
            );
            DEFAULT_WRAPPER_TAG_NAME.to_string()
        }
    }
}

fn properties(value: Option<JsValue>) -> Properties {
    match value {
        Some(value) if value.is_undefined() || value.is_null() => Properties::new(),
        Some(value) => serde_wasm_bindgen::from_value(value).unwrap_or_else(|e| {
            log::warn!("properties callback returned an unusable value: {}", e);
            Properties::new()
        }),
        None => Properties::new(),
    }
}

// ============================================================================
// API
// ============================================================================

/// Renders markdown to HTML, rewriting flexible paragraph markers.
///
/// `config` is `undefined` or an object with the keys of a configuration file
/// (`dictionary`, `blockClassName`, `blockClassificationPrefix`,
/// `blockProperties`, `wrapperTagName`, `wrapperClassName`,
/// `wrapperProperties`) plus `allowRawHtml` and `mdx`. The class name, tag name
/// and properties keys also accept a function of `(alignment, classifications)`.
///
/// # Example (JavaScript)
///
/// ```javascript
/// import { render } from './flexpara_wasm';
///
/// const html = render('=a> Careful', {
///   wrapperTagName: (alignment, classes) => classes.includes('alert') ? 'aside' : 'div',
/// });
/// // <aside class="flexible-paragraph-wrapper">
/// // <p class="flexible-paragraph flexiparaph-alert">Careful</p>
/// // </aside>
/// ```
#[wasm_bindgen]
pub fn render(input: &str, config: JsValue) -> Result<String, JsError> {
    let config = read_config(config)?;
    let parse_options = config.parse_options;
    let render_options = config.render_options;
    let renderer = Renderer::new(config.into_options()?, parse_options, render_options);
    renderer
        .render(input)
        .map_err(|e| JsError::new(&format!("Parse error: {}", e)))
}

/// Lists every marker of the document with its location and meaning.
///
/// Only the `dictionary` and `mdx` keys of `config` matter here.
#[wasm_bindgen(js_name = inspect_markers)]
pub fn inspect_markers(input: &str, config: JsValue) -> Result<JsValue, JsError> {
    let config = read_config(config)?;
    let dictionary = config
        .config
        .dictionary()
        .map_err(|e| JsError::new(&e.to_string()))?;
    let root = parse_mdast(input, &config.parse_options)
        .map_err(|e| JsError::new(&format!("Parse error: {}", e)))?;

    serde_wasm_bindgen::to_value(&inspect(&root, input, &dictionary))
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}
