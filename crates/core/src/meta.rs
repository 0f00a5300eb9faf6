//! Code fence meta directives.
//!
//! The info string after the marker language carries space-separated
//! `key=value` tokens:
//!
//! ````text
//! ```rhinoconfig levels=global,model model=post attribute="name"
//! ````
//!
//! Tokens that are not recognized, or that have no `=`, are ignored and the
//! corresponding default is kept.

use crate::options::TabsOptions;
use crate::template::DEFAULT_LEVELS;

/// Directives read from a tagged code block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directives {
    /// Levels to render, in order. Names are not validated here.
    pub levels: Vec<String>,
    /// Section name for the model level.
    pub model: String,
    /// Section name for the attribute level.
    pub attribute: String,
}

impl Directives {
    /// Directives with every value at its default.
    pub fn defaults(options: &TabsOptions) -> Self {
        Self {
            levels: DEFAULT_LEVELS.iter().map(|l| l.to_string()).collect(),
            model: options.default_model.clone(),
            attribute: options.default_attribute.clone(),
        }
    }
}

/// Parse directives from an optional meta string.
pub fn parse_directives(meta: Option<&str>, options: &TabsOptions) -> Directives {
    let mut directives = Directives::defaults(options);
    let Some(meta) = meta else {
        return directives;
    };

    for token in tokenize_meta(meta) {
        let Some((key, value)) = token.split_once('=') else {
            continue;
        };
        let value = unquote(value.trim());
        match key.trim() {
            "levels" => {
                let levels: Vec<String> = value
                    .split(',')
                    .map(str::trim)
                    .filter(|level| !level.is_empty())
                    .map(str::to_string)
                    .collect();
                if !levels.is_empty() {
                    directives.levels = levels;
                }
            }
            "model" if !value.is_empty() => directives.model = value.to_string(),
            "attribute" if !value.is_empty() => directives.attribute = value.to_string(),
            _ => {}
        }
    }

    directives
}

/// Tokenize meta respecting quoted values.
/// Splits on whitespace but keeps quoted strings intact.
fn tokenize_meta(meta: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut token_start: Option<usize> = None;
    let mut in_quotes = false;
    let mut quote_char = '"';

    for (i, c) in meta.char_indices() {
        match c {
            '"' | '\'' if !in_quotes => {
                if token_start.is_none() {
                    token_start = Some(i);
                }
                in_quotes = true;
                quote_char = c;
            }
            c if c == quote_char && in_quotes => {
                in_quotes = false;
            }
            c if c.is_whitespace() && !in_quotes => {
                if let Some(start) = token_start.take() {
                    tokens.push(&meta[start..i]);
                }
            }
            _ => {
                if token_start.is_none() {
                    token_start = Some(i);
                }
            }
        }
    }

    if let Some(start) = token_start {
        tokens.push(&meta[start..]);
    }

    tokens
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
