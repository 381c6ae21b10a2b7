mod highlighter;
mod search;
mod theme;

pub use highlighter::{Language, LanguageHighlighter};
pub use search::{next_match, RegexHighlighter};
pub use theme::{HighlightGroup, Theme};

use crossterm::style::Color;
use std::path::Path;

use crate::editor::{Cursor, Document};

/// A colored span within a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Highlight {
    /// Start column (char index, 0-based)
    pub column: usize,
    /// Length in chars
    pub length: usize,
    pub fg: Color,
    pub bg: Option<Color>,
}

impl Highlight {
    pub fn new(column: usize, length: usize, fg: Color) -> Self {
        Self {
            column,
            length,
            fg,
            bg: None,
        }
    }

    pub fn with_bg(mut self, bg: Color) -> Self {
        self.bg = Some(bg);
        self
    }
}

/// Computes highlight spans for a document
pub trait SyntaxHighlighter {
    /// Recompute against the current document text
    fn update(&mut self, document: &Document, cursor: &Cursor);

    /// Spans for one line, ordered by column
    fn get_highlights(&self, line: usize) -> &[Highlight];
}

/// Highlighter that never highlights anything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpHighlighter;

impl SyntaxHighlighter for NoOpHighlighter {
    fn update(&mut self, _document: &Document, _cursor: &Cursor) {}

    fn get_highlights(&self, _line: usize) -> &[Highlight] {
        &[]
    }
}

/// Pick a highlighter by file extension, falling back to [`NoOpHighlighter`]
pub fn highlighter_for_path(path: &Path) -> Box<dyn SyntaxHighlighter> {
    Language::from_path(path)
        .and_then(LanguageHighlighter::new)
        .map(|h| Box::new(h) as Box<dyn SyntaxHighlighter>)
        .unwrap_or_else(|| Box::new(NoOpHighlighter))
}
