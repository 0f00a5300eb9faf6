//! Level templates for the generated configuration samples.
//!
//! Each level wraps the snippet in a fixed chain of named sections inside the
//! top-level `rhinoConfig` object:
//!
//! | level       | sections               |
//! |-------------|------------------------|
//! | `global`    | none                   |
//! | `model`     | `model`                |
//! | `attribute` | `model` → `attribute`  |

use crate::meta::Directives;

/// Levels rendered when a block has no `levels=` directive.
pub const DEFAULT_LEVELS: [&str; 3] = ["global", "model", "attribute"];

const HEADER: &str = "const rhinoConfig = {\n  version: 1,\n  components: {\n";
const FOOTER: &str = "  }\n}";
const BODY_INDENT: usize = 4;
const STEP: usize = 2;

/// A named section wrapping the snippet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    /// Keyed by the `model=` directive.
    Model,
    /// Keyed by the `attribute=` directive.
    Attribute,
}

impl Section {
    fn key<'a>(&self, directives: &'a Directives) -> &'a str {
        match self {
            Section::Model => &directives.model,
            Section::Attribute => &directives.attribute,
        }
    }
}

/// Template for one tab level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelTemplate {
    /// Level name as written in `levels=`.
    pub name: &'static str,
    /// Sections wrapping the snippet, outermost first.
    pub sections: &'static [Section],
}

/// Known levels, each one section deeper than the last.
pub const TEMPLATES: &[LevelTemplate] = &[
    LevelTemplate {
        name: "global",
        sections: &[],
    },
    LevelTemplate {
        name: "model",
        sections: &[Section::Model],
    },
    LevelTemplate {
        name: "attribute",
        sections: &[Section::Model, Section::Attribute],
    },
];

/// Look up the template for a level name (exact, case-sensitive).
pub fn find_template(name: &str) -> Option<&'static LevelTemplate> {
    TEMPLATES.iter().find(|template| template.name == name)
}

/// Comma-separated names of all known levels, for error messages.
pub fn known_levels() -> String {
    TEMPLATES
        .iter()
        .map(|template| template.name)
        .collect::<Vec<_>>()
        .join(", ")
}

impl LevelTemplate {
    /// Render the configuration sample for this level.
    pub fn render(&self, snippet: &str, directives: &Directives) -> String {
        let keys: Vec<&str> = self
            .sections
            .iter()
            .map(|section| section.key(directives))
            .collect();
        render_config(snippet, &keys)
    }

    /// Tab label: the level name with its first letter uppercased.
    pub fn label(&self) -> String {
        capitalize(self.name)
    }
}

/// Wrap `snippet` in nested `key: { ... }` sections inside the config object.
pub fn render_config(snippet: &str, sections: &[&str]) -> String {
    let mut out = String::from(HEADER);

    for (depth, key) in sections.iter().enumerate() {
        push_indent(&mut out, BODY_INDENT + STEP * depth);
        out.push_str(key);
        out.push_str(": {\n");
    }

    let body_indent = BODY_INDENT + STEP * sections.len();
    if snippet.is_empty() {
        out.push('\n');
    }
    for line in snippet.lines() {
        if !line.trim().is_empty() {
            push_indent(&mut out, body_indent);
            out.push_str(line);
        }
        out.push('\n');
    }

    for depth in (0..sections.len()).rev() {
        push_indent(&mut out, BODY_INDENT + STEP * depth);
        out.push_str("}\n");
    }

    out.push_str(FOOTER);
    out
}

/// Uppercase the first character, leaving the rest untouched.
pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn push_indent(out: &mut String, width: usize) {
    out.extend(std::iter::repeat_n(' ', width));
}
