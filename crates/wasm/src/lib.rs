use rhinotabs_core::{ConfigTabs, ParseOptions, TabsOptions, parse_mdast, rewrite_source};
use serde::Serialize;
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::*;

// ============================================================================
// Config
// ============================================================================

/// Reads `TabsOptions` from a JS object; `undefined`/`null` mean defaults.
/// A malformed object is an error.
fn parse_config(config: JsValue) -> Result<TabsOptions, JsError> {
    if config.is_undefined() || config.is_null() {
        return Ok(TabsOptions::default());
    }
    serde_wasm_bindgen::from_value(config)
        .map_err(|e| JsError::new(&format!("Invalid options: {}", e)))
}

// ============================================================================
// Transform API
// ============================================================================

/// Result of rewriting one MDX document.
#[derive(Debug, Clone, Serialize)]
pub struct TransformResult {
    /// Rewritten MDX source.
    pub code: String,
    /// Number of generated tab groups.
    pub tab_groups: usize,
    /// Whether the Tabs/TabItem import was added.
    pub import_inserted: bool,
}

/// Rewrites `rhinoconfig` fences in an MDX document into `<Tabs>` samples.
///
/// Intended to run as a preprocessing step before the site's MDX loader. The
/// error message includes `filepath:line:column` of the offending block.
///
/// # Example (JavaScript)
///
/// ```javascript
/// import { transform } from 'rhinotabs-wasm';
///
/// const { code, tab_groups } = transform(source, 'docs/components.mdx', {
///   groupId: 'rhino-config',
///   unknownLevel: 'error',
/// });
/// ```
#[wasm_bindgen]
pub fn transform(source: &str, filepath: &str, config: JsValue) -> Result<JsValue, JsError> {
    let options = parse_config(config)?;

    let output = rewrite_source(source, Some(filepath), &options)
        .map_err(|e| JsError::new(&e.to_string()))?;

    let result = TransformResult {
        code: output.code,
        tab_groups: output.tab_groups,
        import_inserted: output.import_inserted,
    };

    serde_wasm_bindgen::to_value(&result)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

// ============================================================================
// Inspect API
// ============================================================================

/// A tagged block and the directives it would render with.
#[derive(Debug, Clone, Serialize)]
pub struct BlockInfo {
    /// 1-indexed line of the opening fence.
    pub line: usize,
    /// 1-indexed column of the opening fence.
    pub column: usize,
    /// Levels requested, unvalidated.
    pub levels: Vec<String>,
    /// Model section name.
    pub model: String,
    /// Attribute section name.
    pub attribute: String,
}

/// Lists `rhinoconfig` blocks in a document without rewriting it.
#[wasm_bindgen]
pub fn inspect(source: &str, config: JsValue) -> Result<JsValue, JsError> {
    let options = parse_config(config)?;

    let root =
        parse_mdast(source, &ParseOptions::mdx()).map_err(|e| JsError::new(&e.to_string()))?;
    let blocks: Vec<BlockInfo> = ConfigTabs::new(options)
        .tagged_blocks(&root)
        .into_iter()
        .map(|block| {
            let (line, column) = block
                .position
                .map(|p| (p.start.line, p.start.column))
                .unwrap_or((1, 1));
            BlockInfo {
                line,
                column,
                levels: block.directives.levels,
                model: block.directives.model,
                attribute: block.directives.attribute,
            }
        })
        .collect();

    serde_wasm_bindgen::to_value(&blocks)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}
