#![deny(missing_docs)]
//! rhinotabs core: turns `rhinoconfig` code fences into tabbed MDX samples.

/// Core error types.
pub mod error;
/// JavaScript scanning for ESM blocks and expressions.
pub mod esm;
/// Code fence meta directive parsing.
pub mod meta;
/// Transform configuration.
pub mod options;
/// Markdown parsing utilities and extension hooks.
pub mod parse;
/// Source-to-source rewriting.
pub mod rewrite;
/// MDX serialization of generated nodes.
pub mod serialize;
/// Tab group and import node builders.
pub mod tabs;
/// Level templates.
pub mod template;
/// The config-tabs tree transform.
pub mod transform;

pub use error::{SourceLocation, TabsError};
pub use meta::{Directives, parse_directives};
pub use options::{TabsOptions, UnknownLevelPolicy};
pub use esm::{ImportBinding, import_bindings};
pub use parse::{AstTransform, ParseOptions, parse_and_transform, parse_mdast};
pub use rewrite::{RewriteOutput, rewrite_source};
pub use serialize::to_mdx;
pub use template::{DEFAULT_LEVELS, LevelTemplate, TEMPLATES, find_template};
pub use transform::{ConfigTabs, Replacement, TaggedBlock, TransformReport};
