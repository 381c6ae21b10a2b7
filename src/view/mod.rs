//! What the modes hand to the screen: the visible line window and a frame
//! describing one redraw.

use crossterm::style::Color;

use crate::syntax::Highlight;

/// The half-open range of document lines `[top, bottom)` currently on screen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    top: usize,
    bottom: usize,
}

impl Viewport {
    pub fn new(top: usize, bottom: usize) -> Self {
        Self {
            top,
            bottom: bottom.max(top),
        }
    }

    pub fn top(&self) -> usize {
        self.top
    }

    pub fn bottom(&self) -> usize {
        self.bottom
    }

    pub fn height(&self) -> usize {
        self.bottom - self.top
    }

    pub fn range(&self) -> std::ops::Range<usize> {
        self.top..self.bottom
    }

    /// Re-establish the window invariant after an edit, cursor move or resize.
    ///
    /// Afterwards `top <= cursor_line < bottom <= document_len` and
    /// `bottom - top <= available_height`. An empty document collapses the
    /// window to `(0, 0)`. A zero height is treated as one row so the cursor
    /// line always stays visible.
    pub fn consolidate(&mut self, document_len: usize, cursor_line: usize, available_height: usize) {
        if document_len == 0 {
            *self = Self::default();
            return;
        }

        let available = available_height.max(1);
        let cursor_line = cursor_line.min(document_len - 1);

        // The document may have shrunk below the window
        let mut bottom = self.bottom.min(document_len);
        let mut top = self.top.min(bottom);

        if bottom - top <= available {
            // Grow downwards first, then upwards once the end of the document is reached
            bottom = document_len.min(top + available);
            if bottom - top < available {
                top = bottom.saturating_sub(available);
            }
        } else {
            // The screen shrank: give up rows below the cursor first, then above it
            let excess = bottom - top - available;
            bottom = (cursor_line + 1).max(bottom - excess);
            if bottom - top > available {
                top += bottom - top - available;
            }
        }

        // Slide the window over the cursor, keeping its height
        if cursor_line >= bottom {
            let overflow = cursor_line - bottom + 1;
            top += overflow;
            bottom += overflow;
        } else if cursor_line < top {
            let overflow = top - cursor_line;
            top -= overflow;
            bottom -= overflow;
        }

        self.top = top;
        self.bottom = bottom;

        debug_assert!(self.top <= cursor_line && cursor_line < self.bottom);
        debug_assert!(self.bottom <= document_len);
        debug_assert!(self.height() <= available);
    }

    /// Screen row of a document line that lies inside the window
    pub fn screen_row(&self, line: usize) -> usize {
        line.saturating_sub(self.top)
    }
}

/// Everything needed to paint one screen
#[derive(Debug, Clone)]
pub struct Frame<'a> {
    /// The visible document lines
    pub lines: &'a [String],
    /// Document line number of `lines[0]`
    pub first_line: usize,
    /// Highlights for each visible line, in drawing order
    pub highlights: Vec<Vec<Highlight>>,
    /// Cursor position on screen (row, column); None hides the cursor
    pub cursor: Option<(usize, usize)>,
    pub status: &'static str,
    pub status_color: Color,
    /// Right-aligned text on the status line
    pub status_right: String,
    /// Transient message shown next to the mode name
    pub message: Option<&'a str>,
    /// Contents of the command line (without the leading ':'), when it is shown
    pub command_line: Option<String>,
}

impl Frame<'_> {
    /// A frame with no document content
    pub fn blank(status: &'static str, status_color: Color) -> Frame<'static> {
        Frame {
            lines: &[],
            first_line: 0,
            highlights: Vec::new(),
            cursor: None,
            status,
            status_color,
            status_right: String::new(),
            message: None,
            command_line: None,
        }
    }
}

/// Paints frames. Implemented by the terminal front end.
pub trait Renderer {
    /// Rows available for document text (excluding status and command line)
    fn text_rows(&self) -> usize;

    fn draw(&mut self, frame: &Frame<'_>) -> anyhow::Result<()>;
}
