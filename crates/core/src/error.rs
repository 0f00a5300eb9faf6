use markdown::unist::Position;
use thiserror::Error;

/// Source location information for error reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// Optional file path
    pub file: Option<String>,
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
}

impl SourceLocation {
    /// Create a new source location
    pub fn new(line: usize, column: usize) -> Self {
        Self {
            file: None,
            line,
            column,
        }
    }

    /// Create a source location with file information
    pub fn with_file(file: String, line: usize, column: usize) -> Self {
        Self {
            file: Some(file),
            line,
            column,
        }
    }

    /// Start of an mdast node position, or `1:1` for synthetic nodes.
    pub fn from_position(position: Option<&Position>) -> Self {
        match position {
            Some(position) => Self::new(position.start.line, position.start.column),
            None => Self::new(1, 1),
        }
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(file) = &self.file {
            write!(f, "{}:{}:{}", file, self.line, self.column)
        } else {
            write!(f, "{}:{}", self.line, self.column)
        }
    }
}

/// Errors that can occur while transforming a document.
#[derive(Debug, Error)]
pub enum TabsError {
    /// markdown-rs parser error surfaced through the adapter.
    #[error("Parse error at {location}: {message}")]
    MarkdownAdapter {
        /// Error message
        message: String,
        /// Source location
        location: SourceLocation,
    },
    /// A `levels=` entry has no template.
    #[error("Unknown level `{level}` at {location} (expected one of: {expected})")]
    UnknownLevel {
        /// Level name as written in the code block meta
        level: String,
        /// Comma-separated list of known level names
        expected: String,
        /// Source location of the code block
        location: SourceLocation,
    },
    /// Every requested level was skipped, leaving nothing to render.
    #[error("No renderable levels at {location}")]
    EmptyTabGroup {
        /// Source location of the code block
        location: SourceLocation,
    },
    /// The tree has no place to put the tab imports.
    #[error("Malformed tree at {location}: {message}")]
    MalformedTree {
        /// Error message
        message: String,
        /// Source location
        location: SourceLocation,
    },
    /// Internal logic error (unexpected state).
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl TabsError {
    /// Location carried by this error, if any.
    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            Self::MarkdownAdapter { location, .. }
            | Self::UnknownLevel { location, .. }
            | Self::EmptyTabGroup { location }
            | Self::MalformedTree { location, .. } => Some(location),
            Self::InternalError(_) => None,
        }
    }

    /// Attach a file path to the error location so build failures name the document.
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        let file = file.into();
        match &mut self {
            Self::MarkdownAdapter { location, .. }
            | Self::UnknownLevel { location, .. }
            | Self::EmptyTabGroup { location }
            | Self::MalformedTree { location, .. } => location.file = Some(file),
            Self::InternalError(_) => {}
        }
        self
    }
}
