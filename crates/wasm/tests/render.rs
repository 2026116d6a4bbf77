use flexpara_wasm::{inspect_markers, render};
use js_sys::{Function, Object, Reflect};
use serde::Deserialize;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

#[derive(Deserialize, Debug)]
struct MarkerReport {
    location: Location,
    token: String,
    interpretation: Interpretation,
}

#[derive(Deserialize, Debug)]
struct Location {
    line: f64,
    column: f64,
}

#[derive(Deserialize, Debug)]
struct Interpretation {
    kind: String,
    alignment: Option<String>,
    classifications: Vec<String>,
}

fn config(entries: &[(&str, JsValue)]) -> JsValue {
    let object = Object::new();
    for (key, value) in entries {
        Reflect::set(&object, &JsValue::from_str(key), value).unwrap();
    }
    object.into()
}

#[wasm_bindgen_test]
fn render_with_defaults() {
    let html = render("~> standard", JsValue::UNDEFINED).expect("render should succeed");
    assert_eq!(html, r#"<p class="flexible-paragraph">standard</p>"#);
}

#[wasm_bindgen_test]
fn render_with_plain_config_values() {
    let html = render(
        "~:s> solid",
        config(&[
            ("blockClassificationPrefix", JsValue::from_str("fp")),
            ("blockClassName", JsValue::from_str("para flex")),
        ]),
    )
    .expect("render should succeed");
    assert_eq!(
        html,
        r#"<p class="para flex fp-success fp-align-left" style="text-align:left">solid</p>"#
    );
}

#[wasm_bindgen_test]
fn wrapper_tag_from_callback() {
    let tag = Function::new_with_args(
        "alignment, classifications",
        "return classifications.includes('alert') ? 'aside' : 'section';",
    );
    let html = render("=a> careful\n\n=> calm", config(&[("wrapperTagName", tag.into())]))
        .expect("render should succeed");
    assert_eq!(
        html,
        "<aside class=\"flexible-paragraph-wrapper\">\n\
         <p class=\"flexible-paragraph flexiparaph-alert\">careful</p>\n\
         </aside>\n\
         <section class=\"flexible-paragraph-wrapper\">\n\
         <p class=\"flexible-paragraph\">calm</p>\n\
         </section>"
    );
}

#[wasm_bindgen_test]
fn block_properties_from_callback() {
    let properties = Function::new_with_args(
        "alignment",
        "return { 'data-align': alignment || 'none', className: 'ignored' };",
    );
    let html = render("~|> x\n~> y", config(&[("blockProperties", properties.into())]))
        .expect("render should succeed");
    assert_eq!(
        html,
        "<p class=\"flexible-paragraph flexiparaph-align-center\" data-align=\"center\" style=\"text-align:center\">x</p>\n\
         <p class=\"flexible-paragraph\" data-align=\"none\">y</p>"
    );
}

#[wasm_bindgen_test]
fn throwing_callback_falls_back_to_default() {
    let broken = Function::new_no_args("throw new Error('boom');");
    let html = render("~s> x", config(&[("blockClassName", broken.into())]))
        .expect("render should succeed");
    assert_eq!(
        html,
        r#"<p class="flexible-paragraph flexiparaph-success">x</p>"#
    );
}

#[wasm_bindgen_test]
fn invalid_callback_tag_falls_back_to_div() {
    let tag = Function::new_no_args("return 'div><script';");
    let html = render("=> x", config(&[("wrapperTagName", tag.into())]))
        .expect("render should succeed");
    assert_eq!(
        html,
        "<div class=\"flexible-paragraph-wrapper\">\n\
         <p class=\"flexible-paragraph\">x</p>\n\
         </div>"
    );
}

#[wasm_bindgen_test]
fn raw_html_is_opt_in() {
    let html = render(
        "~> <b>hi</b>",
        config(&[("allowRawHtml", JsValue::TRUE)]),
    )
    .expect("render should succeed");
    assert_eq!(html, r#"<p class="flexible-paragraph"><b>hi</b></p>"#);
}

#[wasm_bindgen_test]
fn unknown_config_keys_are_rejected() {
    assert!(render("x", config(&[("paragraphClass", JsValue::from_str("x"))])).is_err());
    assert!(render("x", JsValue::from_str("not an object")).is_err());
}

#[wasm_bindgen_test]
fn inspect_reports_markers() {
    let reports = inspect_markers("intro\n\n~w:> hello\n~:s> xxx", JsValue::UNDEFINED)
        .expect("inspect should succeed");
    let reports: Vec<MarkerReport> =
        serde_wasm_bindgen::from_value(reports).expect("deserialize reports");

    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].token, "~w:>");
    assert_eq!(reports[0].location.line, 3.0);
    assert_eq!(reports[0].location.column, 1.0);
    assert_eq!(reports[0].interpretation.kind, "plain-block");
    assert_eq!(reports[0].interpretation.alignment.as_deref(), Some("right"));
    assert_eq!(reports[0].interpretation.classifications, vec!["warning"]);

    assert_eq!(reports[1].token, "~:s>");
    assert_eq!(reports[1].location.line, 4.0);
    assert_eq!(reports[1].interpretation.alignment.as_deref(), Some("left"));
    assert_eq!(reports[1].interpretation.classifications, vec!["success"]);
}
