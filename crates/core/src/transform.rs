//! The config-tabs tree transform.
//!
//! Walks an mdast tree, replaces every code block tagged with the marker
//! language by a `<Tabs>` element holding one pane per requested level, and
//! makes sure the tab components are imported once at the top of the document.

use crate::meta::{Directives, parse_directives};
use crate::options::{TabsOptions, UnknownLevelPolicy};
use crate::parse::AstTransform;
use crate::tabs::{ImportedComponents, Pane, TabGroup, import_node};
use crate::template::{find_template, known_levels};
use crate::{SourceLocation, TabsError};
use markdown::mdast::{Code, Node};
use markdown::unist::Position;

/// A code block that was replaced by a tab group.
#[derive(Debug, Clone)]
pub struct Replacement {
    /// Position of the original code block.
    pub position: Option<Position>,
    /// Levels rendered, after unknown levels were skipped.
    pub levels: Vec<String>,
    /// The generated `<Tabs>` element.
    pub node: Node,
}

/// Summary of one transform pass.
#[derive(Debug, Clone, Default)]
pub struct TransformReport {
    /// Replaced blocks in document order.
    pub replacements: Vec<Replacement>,
    /// Import node inserted at the top of the root, if any.
    pub import: Option<Node>,
}

impl TransformReport {
    /// Whether any block was replaced.
    pub fn transformed(&self) -> bool {
        !self.replacements.is_empty()
    }

    /// Whether an import declaration was added.
    pub fn import_inserted(&self) -> bool {
        self.import.is_some()
    }
}

/// A marker-tagged code block found without transforming it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedBlock {
    /// Position of the code block.
    pub position: Option<Position>,
    /// Directives parsed from its meta.
    pub directives: Directives,
}

/// Rewrites marker-tagged code blocks into tab groups.
#[derive(Debug, Clone, Default)]
pub struct ConfigTabs {
    options: TabsOptions,
}

impl ConfigTabs {
    /// Create a transform with the given options.
    pub fn new(options: TabsOptions) -> Self {
        Self { options }
    }

    /// Options in use.
    pub fn options(&self) -> &TabsOptions {
        &self.options
    }

    /// Transform `root` in place.
    ///
    /// On error the tree may be partially rewritten and must be discarded.
    pub fn apply(&self, root: &mut Node) -> Result<TransformReport, TabsError> {
        let mut state = TransformState::new(&self.options);
        if let Some(children) = root.children_mut() {
            state.visit_children(children)?;
        }

        let mut report = TransformReport {
            replacements: state.replacements,
            import: None,
        };
        if !report.transformed() {
            return Ok(report);
        }

        if let Some(import) = import_node(state.imported, &self.options) {
            let location = SourceLocation::from_position(root.position());
            let Node::Root(root) = root else {
                return Err(TabsError::MalformedTree {
                    message: "tab imports need a document root".to_string(),
                    location,
                });
            };
            log::debug!("inserting tab imports: {:?}", import);
            root.children.insert(0, import.clone());
            report.import = Some(import);
        }

        Ok(report)
    }

    /// List marker-tagged blocks and their directives without changing the tree.
    pub fn tagged_blocks(&self, root: &Node) -> Vec<TaggedBlock> {
        let mut blocks = Vec::new();
        collect_tagged(root, &self.options, &mut blocks);
        blocks
    }
}

impl AstTransform for ConfigTabs {
    type Output = TransformReport;

    fn transform(&self, root: &mut Node) -> Result<TransformReport, TabsError> {
        self.apply(root)
    }
}

fn is_tagged(code: &Code, options: &TabsOptions) -> bool {
    code.lang.as_deref() == Some(options.marker.as_str())
}

fn collect_tagged(node: &Node, options: &TabsOptions, blocks: &mut Vec<TaggedBlock>) {
    if let Node::Code(code) = node
        && is_tagged(code, options)
    {
        blocks.push(TaggedBlock {
            position: code.position.clone(),
            directives: parse_directives(code.meta.as_deref(), options),
        });
    }
    if let Some(children) = node.children() {
        for child in children {
            collect_tagged(child, options, blocks);
        }
    }
}

/// Per-document state; nothing survives past one `apply` call.
struct TransformState<'a> {
    options: &'a TabsOptions,
    replacements: Vec<Replacement>,
    imported: ImportedComponents,
}

impl<'a> TransformState<'a> {
    fn new(options: &'a TabsOptions) -> Self {
        Self {
            options,
            replacements: Vec::new(),
            imported: ImportedComponents::default(),
        }
    }

    fn visit_children(&mut self, children: &mut [Node]) -> Result<(), TabsError> {
        for child in children.iter_mut() {
            let replacement = match child {
                Node::Code(code) if is_tagged(code, self.options) => Some(self.replace(code)?),
                Node::MdxjsEsm(esm) => {
                    self.imported.scan(&esm.value, self.options);
                    None
                }
                _ => None,
            };

            if let Some(node) = replacement {
                *child = node;
                continue;
            }

            if let Some(grandchildren) = child.children_mut() {
                self.visit_children(grandchildren)?;
            }
        }
        Ok(())
    }

    fn replace(&mut self, code: &Code) -> Result<Node, TabsError> {
        let options = self.options;
        let directives = parse_directives(code.meta.as_deref(), options);
        let location = SourceLocation::from_position(code.position.as_ref());

        let mut panes = Vec::with_capacity(directives.levels.len());
        for level in &directives.levels {
            match find_template(level) {
                Some(template) => panes.push(Pane {
                    label: template.label(),
                    level: level.clone(),
                    code: template.render(&code.value, &directives),
                }),
                None => match options.unknown_level {
                    UnknownLevelPolicy::Error => {
                        return Err(TabsError::UnknownLevel {
                            level: level.clone(),
                            expected: known_levels(),
                            location,
                        });
                    }
                    UnknownLevelPolicy::Skip => {
                        log::warn!("skipping unknown level `{}` at {}", level, location);
                    }
                },
            }
        }

        if panes.is_empty() {
            return Err(TabsError::EmptyTabGroup { location });
        }

        let levels: Vec<String> = panes.iter().map(|pane| pane.level.clone()).collect();
        let node = TabGroup::new(panes, options).into_node(options, code.position.clone())?;
        log::debug!("replaced {} block at {} with tabs {:?}", options.marker, location, levels);

        self.replacements.push(Replacement {
            position: code.position.clone(),
            levels,
            node: node.clone(),
        });
        Ok(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::{ParseOptions, parse_and_transform, parse_mdast};
    use markdown::mdast::{AttributeContent, AttributeValue, MdxJsxFlowElement};

    fn parse(source: &str) -> Node {
        parse_mdast(source, &ParseOptions::mdx()).expect("source should parse")
    }

    fn run(source: &str) -> (Node, TransformReport) {
        let mut root = parse(source);
        let report = ConfigTabs::default()
            .apply(&mut root)
            .expect("transform should succeed");
        (root, report)
    }

    fn top_level(root: &Node) -> &Vec<Node> {
        root.children().expect("root has children")
    }

    fn tabs_elements(node: &Node, found: &mut Vec<MdxJsxFlowElement>) {
        if let Node::MdxJsxFlowElement(element) = node
            && element.name.as_deref() == Some("Tabs")
        {
            found.push(element.clone());
            return;
        }
        if let Some(children) = node.children() {
            for child in children {
                tabs_elements(child, found);
            }
        }
    }

    fn all_tabs(root: &Node) -> Vec<MdxJsxFlowElement> {
        let mut found = Vec::new();
        tabs_elements(root, &mut found);
        found
    }

    fn labels(tabs: &MdxJsxFlowElement) -> Vec<String> {
        let values = tabs
            .attributes
            .iter()
            .find_map(|attr| match attr {
                AttributeContent::Property(prop) if prop.name == "values" => match &prop.value {
                    Some(AttributeValue::Expression(expr)) => Some(expr.value.clone()),
                    _ => None,
                },
                _ => None,
            })
            .expect("values attribute");
        let values: serde_json::Value = serde_json::from_str(&values).expect("values is JSON");
        values
            .as_array()
            .expect("values is an array")
            .iter()
            .map(|value| value["label"].as_str().unwrap_or_default().to_string())
            .collect()
    }

    fn pane_code(tabs: &MdxJsxFlowElement, idx: usize) -> String {
        let Node::MdxJsxFlowElement(item) = &tabs.children[idx] else {
            panic!("expected TabItem");
        };
        let Some(Node::Code(code)) = item.children.first() else {
            panic!("expected code in TabItem");
        };
        code.value.clone()
    }

    fn esm_count(root: &Node) -> usize {
        top_level(root)
            .iter()
            .filter(|node| matches!(node, Node::MdxjsEsm(_)))
            .count()
    }

    #[test]
    fn block_without_meta_gets_three_panes() {
        let (root, report) = run("```rhinoconfig\nfoo: bar\n```\n");
        let tabs = all_tabs(&root);

        assert_eq!(tabs.len(), 1);
        assert_eq!(labels(&tabs[0]), vec!["Global", "Model", "Attribute"]);
        assert_eq!(tabs[0].children.len(), 3);
        assert_eq!(report.replacements[0].levels, vec!["global", "model", "attribute"]);
    }

    #[test]
    fn levels_directive_limits_panes() {
        let (root, _) = run("```rhinoconfig levels=global,model\nfoo: bar\n```\n");
        let tabs = all_tabs(&root);

        assert_eq!(labels(&tabs[0]), vec!["Global", "Model"]);
        assert_eq!(tabs[0].children.len(), 2);
    }

    #[test]
    fn model_and_attribute_directives_name_sections() {
        let (root, _) = run("```rhinoconfig model=post attribute=name\nfoo: bar\n```\n");
        let tabs = all_tabs(&root);

        let model = pane_code(&tabs[0], 1);
        assert!(model.contains("post: {\n      foo: bar\n    }"), "{model}");

        let attribute = pane_code(&tabs[0], 2);
        assert!(
            attribute.contains("post: {\n      name: {\n        foo: bar\n      }\n    }"),
            "{attribute}"
        );
    }

    #[test]
    fn two_blocks_share_one_import() {
        let source = "# Config\n\n```rhinoconfig\na: 1\n```\n\ntext\n\n```rhinoconfig levels=model\nb: 2\n```\n";
        let (root, report) = run(source);

        assert_eq!(report.replacements.len(), 2);
        assert!(report.import_inserted());
        assert_eq!(esm_count(&root), 1);
        let Node::MdxjsEsm(esm) = &top_level(&root)[0] else {
            panic!("import should be first");
        };
        assert_eq!(
            esm.value,
            "import Tabs from '@theme/Tabs';\nimport TabItem from '@theme/TabItem';"
        );
    }

    #[test]
    fn existing_import_is_not_duplicated() {
        let source = "import Tabs from '@theme/Tabs';\nimport TabItem from '@theme/TabItem';\n\n```rhinoconfig\na: 1\n```\n";
        let (root, report) = run(source);

        assert!(report.transformed());
        assert!(!report.import_inserted());
        assert_eq!(esm_count(&root), 1);
    }

    #[test]
    fn partial_import_adds_missing_component() {
        let source = "import Tabs from '@theme/Tabs';\n\n```rhinoconfig\na: 1\n```\n";
        let (root, report) = run(source);

        let Some(Node::MdxjsEsm(esm)) = report.import.as_ref() else {
            panic!("expected inserted import");
        };
        assert_eq!(esm.value, "import TabItem from '@theme/TabItem';");
        assert_eq!(esm_count(&root), 2);
    }

    #[test]
    fn document_without_tagged_blocks_is_unchanged() {
        let source = "# Title\n\n```js\nconst a = 1;\n```\n\n```rhinoconfigx\nfoo\n```\n";
        let original = parse(source);
        let (root, report) = run(source);

        assert!(!report.transformed());
        assert!(!report.import_inserted());
        assert_eq!(root, original);
    }

    #[test]
    fn replacement_preserves_sibling_order_and_position() {
        let source = "before\n\n```rhinoconfig levels=global\nx: 1\n```\n\nafter\n";
        let (root, report) = run(source);
        let children = top_level(&root);

        assert!(matches!(children[0], Node::MdxjsEsm(_)));
        assert!(matches!(children[1], Node::Paragraph(_)));
        assert!(matches!(children[2], Node::MdxJsxFlowElement(_)));
        assert!(matches!(children[3], Node::Paragraph(_)));
        assert_eq!(children.len(), 4);

        let position = report.replacements[0].position.as_ref().expect("position");
        assert_eq!(position.start.line, 3);
        assert_eq!(children[2].position(), Some(position));
    }

    #[test]
    fn nested_blocks_are_transformed() {
        let source = "> ```rhinoconfig levels=global\n> a: 1\n> ```\n\n- item\n\n  ```rhinoconfig levels=model\n  b: 2\n  ```\n";
        let (root, report) = run(source);

        assert_eq!(report.replacements.len(), 2);
        assert_eq!(all_tabs(&root).len(), 2);
        assert_eq!(esm_count(&root), 1);
    }

    #[test]
    fn unknown_level_fails_by_default() {
        let mut root = parse("text\n\n```rhinoconfig levels=global,modle\na: 1\n```\n");
        let err = ConfigTabs::default().apply(&mut root).unwrap_err();

        match err {
            TabsError::UnknownLevel {
                level, location, ..
            } => {
                assert_eq!(level, "modle");
                assert_eq!(location.line, 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unknown_level_can_be_skipped() {
        let tabs = ConfigTabs::new(TabsOptions {
            unknown_level: UnknownLevelPolicy::Skip,
            ..TabsOptions::default()
        });
        let mut root = parse("```rhinoconfig levels=global,modle,attribute\na: 1\n```\n");
        let report = tabs.apply(&mut root).expect("skip policy should succeed");

        assert_eq!(report.replacements[0].levels, vec!["global", "attribute"]);
        assert_eq!(labels(&all_tabs(&root)[0]), vec!["Global", "Attribute"]);
    }

    #[test]
    fn skipping_every_level_is_an_error() {
        let tabs = ConfigTabs::new(TabsOptions {
            unknown_level: UnknownLevelPolicy::Skip,
            ..TabsOptions::default()
        });
        let mut root = parse("```rhinoconfig levels=Global\na: 1\n```\n");
        let err = tabs.apply(&mut root).unwrap_err();
        assert!(matches!(err, TabsError::EmptyTabGroup { .. }), "{err:?}");
    }

    #[test]
    fn non_root_tree_cannot_take_imports() {
        let Node::Root(mut document) = parse("> ```rhinoconfig\n> a: 1\n> ```\n") else {
            panic!("expected root");
        };
        let mut quote = document.children.remove(0);

        let err = ConfigTabs::default().apply(&mut quote).unwrap_err();
        assert!(matches!(err, TabsError::MalformedTree { .. }), "{err:?}");
    }

    #[test]
    fn custom_marker_is_matched_exactly() {
        let tabs = ConfigTabs::new(TabsOptions {
            marker: "cfg".into(),
            ..TabsOptions::default()
        });
        let mut root = parse("```cfg\na: 1\n```\n\n```rhinoconfig\nb: 2\n```\n");
        let report = tabs.apply(&mut root).expect("transform should succeed");

        assert_eq!(report.replacements.len(), 1);
        assert!(matches!(top_level(&root)[2], Node::Code(_)));
    }

    #[test]
    fn tagged_blocks_lists_directives_without_mutating() {
        let root = parse("```rhinoconfig model=post\na\n```\n\n```rhinoconfig levels=global\nb\n```\n");
        let blocks = ConfigTabs::default().tagged_blocks(&root);

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].directives.model, "post");
        assert_eq!(blocks[1].directives.levels, vec!["global"]);
        assert!(all_tabs(&root).is_empty());
    }

    #[test]
    fn runs_as_parse_transform() {
        let tabs = ConfigTabs::default();
        let (root, report) =
            parse_and_transform("```rhinoconfig\na: 1\n```\n", &ParseOptions::mdx(), &tabs)
                .expect("transform should succeed");
        assert_eq!(report.replacements.len(), 1);
        assert_eq!(all_tabs(&root).len(), 1);
        assert_eq!(esm_count(&root), 1);

        let err = parse_and_transform(
            "```rhinoconfig levels=nope\na: 1\n```\n",
            &ParseOptions::mdx(),
            &tabs,
        )
        .unwrap_err();
        assert!(matches!(err, TabsError::UnknownLevel { .. }));
    }
}
