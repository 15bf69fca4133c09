use serde_json::{json, Value};
use svg2lottie::{convert_svg_strings, ConvertError, ConvertOptions};

fn convert(svg: &str, options: &ConvertOptions) -> Result<Value, ConvertError> {
    Ok(serde_json::to_value(convert_svg_strings(&[svg], options)?).unwrap())
}

#[test]
fn test_use_expands_into_nested_groups() {
    let doc = convert(
        r##"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink">
            <defs><path id="tri" d="M0 0 L10 0 L5 8 Z"/></defs>
            <use id="tri-ref" xlink:href="#tri" x="20" y="30" transform="rotate(90)" fill="blue"/>
        </svg>"##,
        &ConvertOptions::default(),
    )
    .unwrap();

    let shapes = doc["layers"][0]["shapes"].as_array().unwrap();
    assert_eq!(shapes.len(), 1);

    let outer = &shapes[0];
    assert_eq!(outer["nm"], "Use tri-ref");
    let outer_tr = &outer["it"][1];
    assert!((outer_tr["r"]["k"].as_f64().unwrap() - 90.0).abs() < 1e-9);

    let offset = &outer["it"][0];
    assert_eq!(offset["nm"], "Use Offset");
    assert_eq!(offset["it"][1]["p"]["k"], json!([20.0, 30.0, 0.0]));

    let content = &offset["it"][0];
    assert_eq!(content["nm"], "tri");
    assert_eq!(content["it"][0]["ty"], "sh");
    assert_eq!(content["it"][0]["ks"]["k"]["c"], true);
    assert_eq!(content["it"][1]["ty"], "fl");
    assert_eq!(content["it"][1]["c"]["k"], json!([0.0, 0.0, 1.0, 1.0]));
}

#[test]
fn test_missing_target_contributes_nothing() {
    let doc = convert(
        r##"<svg><use href="#missing"/><g><use href="#missing"/></g></svg>"##,
        &ConvertOptions::default(),
    )
    .unwrap();
    assert_eq!(doc["layers"][0]["shapes"], json!([]));
}

#[test]
fn test_symbols_render_only_through_use() {
    let svg = r##"<svg><symbol id="s"><rect width="2" height="2"/></symbol></svg>"##;
    let doc = convert(svg, &ConvertOptions::default()).unwrap();
    assert_eq!(doc["layers"][0]["shapes"], json!([]));

    let svg = r##"<svg><symbol id="s"><rect width="2" height="2"/></symbol><use href="#s"/></svg>"##;
    let doc = convert(svg, &ConvertOptions::default()).unwrap();
    assert_eq!(doc["layers"][0]["shapes"][0]["nm"], "Use");
}

#[test]
fn test_reference_cycles_terminate() {
    let svg = r##"<svg>
        <g id="a"><rect width="1" height="1"/><use href="#b"/></g>
        <g id="b"><use href="#a"/></g>
    </svg>"##;
    let doc = convert(svg, &ConvertOptions::default()).unwrap();
    assert_eq!(doc["layers"][0]["shapes"].as_array().unwrap().len(), 2);

    let strict = ConvertOptions { strict: true, max_reference_depth: 4, ..ConvertOptions::default() };
    assert!(matches!(convert(svg, &strict), Err(ConvertError::RecursionLimit(4))));
}

#[test]
fn test_self_referencing_fan_out_finishes() {
    let uses = r##"<use href="#a"/>"##.repeat(8);
    let svg = format!(r#"<svg><g id="a"><rect width="1" height="1"/>{}</g></svg>"#, uses);
    let doc = convert(&svg, &ConvertOptions::default()).unwrap();

    let shapes = doc["layers"][0]["shapes"].as_array().unwrap();
    assert_eq!(shapes.len(), 1);
    assert_eq!(shapes[0]["nm"], "a");
    assert_eq!(shapes[0]["it"].as_array().unwrap().len(), 2);
    assert_eq!(shapes[0]["it"][0]["it"][0]["ty"], "rc");
}
