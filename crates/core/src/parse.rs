//! Markdown parsing utilities and the tree-transform hook.

use crate::esm::{esm_signal, expression_signal};
use crate::{SourceLocation, TabsError};
use markdown::mdast::Node;
use markdown::message::{Message, Place};

/// Parser options for building markdown-rs parse options.
#[derive(Clone, Copy, Debug)]
pub struct ParseOptions {
    /// Enable MDX constructs (JSX, ESM, expressions).
    pub mdx: bool,
    /// Enable GitHub Flavored Markdown constructs.
    pub gfm: bool,
    /// Enable YAML frontmatter parsing.
    pub frontmatter: bool,
    /// Enable indented code blocks.
    pub code_indented: bool,
}

impl ParseOptions {
    /// MDX-friendly defaults (JSX/ESM/expression enabled).
    pub const fn mdx() -> Self {
        Self {
            mdx: true,
            gfm: true,
            frontmatter: true,
            code_indented: false,
        }
    }

    /// Convert to markdown-rs `ParseOptions`.
    ///
    /// With MDX on, ESM and expression parse callbacks are installed so that
    /// `import` lines become `MdxjsEsm` nodes and nested braces in attribute
    /// expressions are tracked.
    pub fn to_markdown(self) -> markdown::ParseOptions {
        let mut constructs = markdown::Constructs {
            frontmatter: self.frontmatter,
            code_indented: self.code_indented,
            ..Default::default()
        };

        if self.gfm {
            constructs.gfm_autolink_literal = true;
            constructs.gfm_footnote_definition = true;
            constructs.gfm_label_start_footnote = true;
            constructs.gfm_strikethrough = true;
            constructs.gfm_table = true;
            constructs.gfm_task_list_item = true;
        }

        let mut options = markdown::ParseOptions::default();
        if self.mdx {
            constructs.mdx_esm = true;
            constructs.mdx_expression_flow = true;
            constructs.mdx_expression_text = true;
            constructs.mdx_jsx_flow = true;
            constructs.mdx_jsx_text = true;
            options.mdx_esm_parse = Some(Box::new(esm_signal));
            options.mdx_expression_parse = Some(Box::new(expression_signal));
        }

        options.constructs = constructs;
        options
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self::mdx()
    }
}

/// A pass over a parsed document.
///
/// Constructing the transform is the plugin factory; [`AstTransform::transform`]
/// runs once per parsed document. A failing transform aborts the document and
/// the partially mutated tree must be dropped.
pub trait AstTransform {
    /// What the pass reports back about the document.
    type Output;

    /// Mutate the parsed markdown AST in place.
    fn transform(&self, root: &mut Node) -> Result<Self::Output, TabsError>;
}

/// Parse markdown into an MDAST tree using core options.
pub fn parse_mdast(input: &str, options: &ParseOptions) -> Result<Node, TabsError> {
    markdown::to_mdast(input, &options.to_markdown()).map_err(|err| TabsError::MarkdownAdapter {
        message: err.to_string(),
        location: message_location(&err),
    })
}

/// Parse `input` and run `transform` over the tree.
pub fn parse_and_transform<T: AstTransform>(
    input: &str,
    options: &ParseOptions,
    transform: &T,
) -> Result<(Node, T::Output), TabsError> {
    let mut root = parse_mdast(input, options)?;
    let output = transform.transform(&mut root)?;
    Ok((root, output))
}

fn message_location(message: &Message) -> SourceLocation {
    match &message.place {
        Some(place) => match place.as_ref() {
            Place::Point(point) => SourceLocation::new(point.line, point.column),
            Place::Position(position) => {
                SourceLocation::new(position.start.line, position.start.column)
            }
        },
        None => SourceLocation::new(1, 1),
    }
}
