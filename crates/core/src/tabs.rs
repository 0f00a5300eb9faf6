//! Builders for the generated `<Tabs>` tree and its import.

use crate::TabsError;
use crate::esm::import_bindings;
use crate::options::TabsOptions;
use markdown::mdast::{
    AttributeContent, AttributeValue, AttributeValueExpression, Code, MdxJsxAttribute,
    MdxJsxFlowElement, MdxjsEsm, Node,
};
use markdown::unist::Position;
use serde::Serialize;

/// JSX name of the tab container component.
pub const TABS_COMPONENT: &str = "Tabs";
/// JSX name of a single tab pane component.
pub const TAB_ITEM_COMPONENT: &str = "TabItem";

/// One tab: label plus the generated configuration text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pane {
    /// Human-readable label.
    pub label: String,
    /// Level name the pane was generated from.
    pub level: String,
    /// Generated code shown in the pane.
    pub code: String,
}

/// Entry of the `values` prop on `<Tabs>`.
#[derive(Debug, Serialize)]
struct TabValue<'a> {
    label: &'a str,
    value: String,
}

/// A tab group ready to be turned into MDX nodes.
#[derive(Debug, Clone)]
pub struct TabGroup {
    /// Panes in display order.
    pub panes: Vec<Pane>,
    /// Index of the pane selected on load.
    pub default_index: usize,
}

impl TabGroup {
    /// Group panes, selecting the pane for `options.default_level` when present.
    pub fn new(panes: Vec<Pane>, options: &TabsOptions) -> Self {
        let default_index = panes
            .iter()
            .position(|pane| pane.level == options.default_level)
            .unwrap_or(0);
        Self {
            panes,
            default_index,
        }
    }

    /// Build the `<Tabs>` flow element, positioned where the source block was.
    pub fn into_node(
        self,
        options: &TabsOptions,
        position: Option<Position>,
    ) -> Result<Node, TabsError> {
        let values: Vec<TabValue<'_>> = self
            .panes
            .iter()
            .enumerate()
            .map(|(idx, pane)| TabValue {
                label: &pane.label,
                value: idx.to_string(),
            })
            .collect();
        let values = serde_json::to_string(&values)
            .map_err(|err| TabsError::InternalError(format!("tab values: {err}")))?;

        let attributes = vec![
            literal_attribute("groupId", &options.group_id),
            literal_attribute("defaultValue", &self.default_index.to_string()),
            AttributeContent::Property(MdxJsxAttribute {
                name: "values".to_string(),
                value: Some(AttributeValue::Expression(AttributeValueExpression {
                    value: values,
                    stops: vec![],
                })),
            }),
        ];

        let children = self
            .panes
            .into_iter()
            .enumerate()
            .map(|(idx, pane)| tab_item(idx, pane.code, &options.code_lang))
            .collect();

        Ok(Node::MdxJsxFlowElement(MdxJsxFlowElement {
            children,
            position,
            name: Some(TABS_COMPONENT.to_string()),
            attributes,
        }))
    }
}

fn tab_item(idx: usize, code: String, lang: &str) -> Node {
    Node::MdxJsxFlowElement(MdxJsxFlowElement {
        children: vec![Node::Code(Code {
            value: code,
            position: None,
            lang: Some(lang.to_string()),
            meta: None,
        })],
        position: None,
        name: Some(TAB_ITEM_COMPONENT.to_string()),
        attributes: vec![literal_attribute("value", &idx.to_string())],
    })
}

fn literal_attribute(name: &str, value: &str) -> AttributeContent {
    AttributeContent::Property(MdxJsxAttribute {
        name: name.to_string(),
        value: Some(AttributeValue::Literal(value.to_string())),
    })
}

/// Which tab components are already bound by the document's imports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportedComponents {
    /// `Tabs` is bound.
    pub tabs: bool,
    /// `TabItem` is bound.
    pub tab_item: bool,
}

impl ImportedComponents {
    /// Record bindings made by an ESM block.
    ///
    /// A component counts as imported when its local name is bound, whatever
    /// the module; a second binding of the same name would not compile.
    pub fn scan(&mut self, esm: &str, options: &TabsOptions) {
        for binding in import_bindings(esm) {
            let expected = match binding.local.as_str() {
                TABS_COMPONENT => {
                    self.tabs = true;
                    &options.tabs_source
                }
                TAB_ITEM_COMPONENT => {
                    self.tab_item = true;
                    &options.tab_item_source
                }
                _ => continue,
            };
            if binding.source != *expected {
                log::warn!(
                    "`{}` is imported from `{}`, not `{}`; keeping the existing import",
                    binding.local,
                    binding.source,
                    expected
                );
            }
        }
    }

    /// Both components are available.
    pub fn complete(&self) -> bool {
        self.tabs && self.tab_item
    }
}

/// Import node for the components not yet imported, or `None` when nothing is missing.
pub fn import_node(imported: ImportedComponents, options: &TabsOptions) -> Option<Node> {
    if imported.complete() {
        return None;
    }

    let mut lines = Vec::new();
    if !imported.tabs {
        lines.push(format!(
            "import {TABS_COMPONENT} from '{}';",
            options.tabs_source
        ));
    }
    if !imported.tab_item {
        lines.push(format!(
            "import {TAB_ITEM_COMPONENT} from '{}';",
            options.tab_item_source
        ));
    }
    Some(Node::MdxjsEsm(MdxjsEsm {
        value: lines.join("\n"),
        position: None,
        stops: vec![],
    }))
}
