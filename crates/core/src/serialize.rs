//! MDX text for generated nodes.
//!
//! Only the node kinds this crate produces are supported: JSX flow elements,
//! fenced code, and ESM blocks. Anything else is an internal error.

use crate::TabsError;
use markdown::mdast::{AttributeContent, AttributeValue, Code, MdxJsxFlowElement, Node};

/// Serialize a generated node to MDX source.
pub fn to_mdx(node: &Node) -> Result<String, TabsError> {
    match node {
        Node::MdxJsxFlowElement(element) => element_to_mdx(element),
        Node::Code(code) => Ok(code_to_mdx(code)),
        Node::MdxjsEsm(esm) => Ok(esm.value.clone()),
        other => Err(TabsError::InternalError(format!(
            "cannot serialize generated node: {:?}",
            other
        ))),
    }
}

fn element_to_mdx(element: &MdxJsxFlowElement) -> Result<String, TabsError> {
    let name = element.name.as_deref().unwrap_or_default();
    let mut open = format!("<{name}");
    for attribute in &element.attributes {
        open.push(' ');
        open.push_str(&attribute_to_mdx(attribute)?);
    }

    if element.children.is_empty() {
        open.push_str(" />");
        return Ok(open);
    }
    open.push('>');

    let children = element
        .children
        .iter()
        .map(to_mdx)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(format!("{open}\n\n{}\n\n</{name}>", children.join("\n\n")))
}

fn attribute_to_mdx(attribute: &AttributeContent) -> Result<String, TabsError> {
    match attribute {
        AttributeContent::Expression(expression) => Ok(format!("{{{}}}", expression.value)),
        AttributeContent::Property(property) => Ok(match &property.value {
            None => property.name.clone(),
            Some(AttributeValue::Expression(expression)) => {
                format!("{}={{{}}}", property.name, expression.value)
            }
            Some(AttributeValue::Literal(value)) if !value.contains('"') => {
                format!("{}=\"{}\"", property.name, value)
            }
            Some(AttributeValue::Literal(value)) if !value.contains('\'') => {
                format!("{}='{}'", property.name, value)
            }
            Some(AttributeValue::Literal(value)) => {
                let quoted = serde_json::to_string(value)
                    .map_err(|err| TabsError::InternalError(format!("attribute: {err}")))?;
                format!("{}={{{}}}", property.name, quoted)
            }
        }),
    }
}

fn code_to_mdx(code: &Code) -> String {
    let fence = "`".repeat(fence_length(&code.value));
    let mut out = fence.clone();
    if let Some(lang) = &code.lang {
        out.push_str(lang);
        if let Some(meta) = &code.meta {
            out.push(' ');
            out.push_str(meta);
        }
    }
    out.push('\n');
    if !code.value.is_empty() {
        out.push_str(&code.value);
        out.push('\n');
    }
    out.push_str(&fence);
    out
}

/// Shortest backtick fence that no run inside `value` can close.
fn fence_length(value: &str) -> usize {
    let mut longest = 0;
    let mut run = 0;
    for c in value.chars() {
        if c == '`' {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    (longest + 1).max(3)
}
