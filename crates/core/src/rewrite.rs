//! Source-to-source rewriting.
//!
//! Parses an MDX document, runs [`ConfigTabs`] over it, then splices the
//! serialized tab groups back into the original text by source offset. Text
//! outside the replaced fences is left byte-for-byte intact.

use crate::TabsError;
use crate::options::TabsOptions;
use crate::parse::{ParseOptions, parse_and_transform};
use crate::serialize::to_mdx;
use crate::transform::ConfigTabs;
use markdown::mdast::Node;
use markdown::unist::Position;
use std::cmp::Reverse;

/// Result of rewriting one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteOutput {
    /// Rewritten MDX source.
    pub code: String,
    /// Number of tab groups generated.
    pub tab_groups: usize,
    /// Whether an import declaration was added.
    pub import_inserted: bool,
}

/// Rewrite every marker-tagged fence in `source` into MDX tabs.
///
/// Errors name `filepath` when one is given. No partial output is returned.
pub fn rewrite_source(
    source: &str,
    filepath: Option<&str>,
    options: &TabsOptions,
) -> Result<RewriteOutput, TabsError> {
    rewrite(source, options).map_err(|err| match filepath {
        Some(path) => err.with_file(path),
        None => err,
    })
}

fn rewrite(source: &str, options: &TabsOptions) -> Result<RewriteOutput, TabsError> {
    let tabs = ConfigTabs::new(options.clone());
    let (root, report) = parse_and_transform(source, &ParseOptions::mdx(), &tabs)?;
    if !report.transformed() {
        return Ok(RewriteOutput {
            code: source.to_string(),
            tab_groups: 0,
            import_inserted: false,
        });
    }

    let mut splices = report
        .replacements
        .iter()
        .map(|replacement| {
            let position = replacement.position.as_ref().ok_or_else(|| {
                TabsError::InternalError("replaced block has no source position".to_string())
            })?;
            Ok((position, &replacement.node))
        })
        .collect::<Result<Vec<(&Position, &Node)>, TabsError>>()?;
    splices.sort_by_key(|(position, _)| Reverse(position.start.offset));

    let mut code = source.to_string();
    for (position, node) in splices {
        let prefix = continuation_prefix(source, position.start.offset);
        let text = indent_continuation(&to_mdx(node)?, &prefix);
        code.replace_range(position.start.offset..position.end.offset, &text);
    }

    if let Some(import) = &report.import {
        let import = to_mdx(import)?;
        match frontmatter_end(&root) {
            Some(end) => {
                let mut text = format!("\n\n{import}\n");
                if source[end..].starts_with("\n\n") {
                    text.pop();
                }
                code.insert_str(end, &text);
            }
            None => code.insert_str(0, &format!("{import}\n\n")),
        }
    }

    Ok(RewriteOutput {
        code,
        tab_groups: report.replacements.len(),
        import_inserted: report.import_inserted(),
    })
}

/// Byte offset just past the closing frontmatter fence.
fn frontmatter_end(root: &Node) -> Option<usize> {
    root.children()?.iter().find_map(|node| match node {
        Node::Yaml(yaml) => yaml.position.as_ref().map(|p| p.end.offset),
        Node::Toml(toml) => toml.position.as_ref().map(|p| p.end.offset),
        _ => None,
    })
}

/// Container prefix for lines after the first, derived from the text before
/// the fence on its opening line. Blockquote markers are kept; list markers
/// and other content become spaces.
fn continuation_prefix(source: &str, offset: usize) -> String {
    let line_start = source[..offset].rfind('\n').map_or(0, |idx| idx + 1);
    source[line_start..offset]
        .chars()
        .map(|c| if c == '>' || c.is_whitespace() { c } else { ' ' })
        .collect()
}

fn indent_continuation(text: &str, prefix: &str) -> String {
    if prefix.is_empty() {
        return text.to_string();
    }

    let blank = prefix.trim_end();
    let mut out = String::with_capacity(text.len() + prefix.len() * 8);
    for (idx, line) in text.split('\n').enumerate() {
        if idx > 0 {
            out.push('\n');
            if line.is_empty() {
                out.push_str(blank);
            } else {
                out.push_str(prefix);
            }
        }
        out.push_str(line);
    }
    out
}
