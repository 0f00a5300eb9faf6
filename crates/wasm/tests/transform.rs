use rhinotabs_wasm::{inspect, transform};
use serde::{Deserialize, Serialize};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

#[derive(Deserialize, Debug)]
struct TransformResult {
    code: String,
    tab_groups: usize,
    import_inserted: bool,
}

#[derive(Deserialize, Debug)]
struct BlockInfo {
    line: usize,
    column: usize,
    levels: Vec<String>,
    model: String,
    attribute: String,
}

fn config(value: serde_json::Value) -> JsValue {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .expect("config should serialize")
}

#[wasm_bindgen_test]
fn transform_basic_block() {
    let source = "# Config\n\n```rhinoconfig\nfoo: bar\n```\n";
    let result = transform(source, "docs/config.mdx", JsValue::UNDEFINED)
        .expect("transform should succeed");

    let result: TransformResult =
        serde_wasm_bindgen::from_value(result).expect("deserialize result");

    assert_eq!(result.tab_groups, 1);
    assert!(result.import_inserted);
    assert!(result.code.starts_with("import Tabs from '@theme/Tabs';"));
    assert!(result.code.contains("<Tabs groupId=\"rhino-config\" defaultValue=\"1\""));
    assert!(result.code.contains("\"label\":\"Attribute\""));
    assert!(!result.code.contains("rhinoconfig"));
}

#[wasm_bindgen_test]
fn transform_leaves_plain_documents_alone() {
    let source = "# Hello\n\n```js\nconst a = 1;\n```\n";
    let result = transform(source, "docs/plain.mdx", JsValue::NULL).expect("transform should succeed");

    let result: TransformResult =
        serde_wasm_bindgen::from_value(result).expect("deserialize result");

    assert_eq!(result.code, source);
    assert_eq!(result.tab_groups, 0);
    assert!(!result.import_inserted);
}

#[wasm_bindgen_test]
fn transform_honors_config() {
    let source = "```cfg levels=global,bogus\nfoo: bar\n```\n";
    let cfg = config(serde_json::json!({
        "marker": "cfg",
        "groupId": "settings",
        "unknownLevel": "skip",
    }));

    let result = transform(source, "docs/config.mdx", cfg).expect("transform should succeed");
    let result: TransformResult =
        serde_wasm_bindgen::from_value(result).expect("deserialize result");

    assert!(result.code.contains("groupId=\"settings\""));
    assert!(result.code.contains(r#"values={[{"label":"Global","value":"0"}]}"#));
}

#[wasm_bindgen_test]
fn transform_rejects_invalid_config() {
    let cfg = config(serde_json::json!({ "unknownLevel": "maybe" }));
    assert!(transform("text", "docs/a.mdx", cfg).is_err());
}

#[wasm_bindgen_test]
fn inspect_lists_blocks() {
    let source = "Intro\n\n```rhinoconfig levels=model model=post attribute=slug\nfoo: bar\n```\n";
    let blocks = inspect(source, JsValue::UNDEFINED).expect("inspect should succeed");

    let blocks: Vec<BlockInfo> =
        serde_wasm_bindgen::from_value(blocks).expect("deserialize blocks");

    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].line, 3);
    assert_eq!(blocks[0].column, 1);
    assert_eq!(blocks[0].levels, vec!["model"]);
    assert_eq!(blocks[0].model, "post");
    assert_eq!(blocks[0].attribute, "slug");
}
