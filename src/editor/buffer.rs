use std::cell::Cell;
use std::rc::Rc;

use super::{Cursor, Document};
use crate::syntax::{Highlight, NoOpHighlighter, SyntaxHighlighter};
use crate::view::Viewport;

/// One open document together with its cursor, highlighter and visible window
pub struct DocumentBuffer {
    pub document: Document,
    pub cursor: Cursor,
    pub viewport: Viewport,
    highlighter: Box<dyn SyntaxHighlighter>,
    /// Set by the document's change subscription, cleared once the highlighter caught up
    highlights_stale: Rc<Cell<bool>>,
}

impl DocumentBuffer {
    pub fn new(document: Document) -> Self {
        Self::with_highlighter(document, Box::new(NoOpHighlighter))
    }

    pub fn with_highlighter(mut document: Document, highlighter: Box<dyn SyntaxHighlighter>) -> Self {
        let highlights_stale = Rc::new(Cell::new(true));
        let stale = Rc::clone(&highlights_stale);
        document.subscribe(move || stale.set(true));

        Self {
            document,
            cursor: Cursor::new(),
            viewport: Viewport::default(),
            highlighter,
            highlights_stale,
        }
    }

    /// Recompute highlights if the document changed since the last recompute
    pub fn refresh_highlights(&mut self) {
        if self.highlights_stale.replace(false) {
            self.highlighter.update(&self.document, &self.cursor);
        }
    }

    pub fn highlights(&self, line: usize) -> &[Highlight] {
        self.highlighter.get_highlights(line)
    }

    /// Re-establish the viewport invariant for a screen of `available_height` rows
    pub fn consolidate_viewport(&mut self, available_height: usize) {
        if self.document.is_empty() {
            self.cursor.clamp(&self.document);
        }
        self.viewport
            .consolidate(self.document.number_of_lines(), self.cursor.line(), available_height);
    }

    /// Display name for the status line
    pub fn display_name(&self) -> String {
        self.document
            .path
            .as_ref()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .map(String::from)
            .unwrap_or_else(|| "[No Name]".to_string())
    }
}

impl Default for DocumentBuffer {
    fn default() -> Self {
        Self::new(Document::empty())
    }
}
