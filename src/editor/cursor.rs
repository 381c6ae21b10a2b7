use super::Document;

/// Cursor position in a document (0-indexed).
///
/// The cursor never holds a position the document cannot address: every
/// update goes through [`Cursor::set`], which clamps against the document
/// passed in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    line: usize,
    column: usize,
    /// Lets the column sit one past the last char (the append position)
    pub allow_extra_column: bool,
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }

    /// Last addressable line (0 for an empty document)
    pub fn max_line(&self, document: &Document) -> usize {
        document.number_of_lines().saturating_sub(1)
    }

    /// Last addressable column on the current line (0 for an empty document)
    pub fn max_column(&self, document: &Document) -> usize {
        if document.is_empty() {
            return 0;
        }
        let len = document.line_len(self.line);
        if self.allow_extra_column {
            len
        } else {
            len.saturating_sub(1)
        }
    }

    /// Move to (line, column), clamped to the document.
    ///
    /// Negative values count from the end: `-1` is the last line or the last
    /// addressable column, `-2` the one before it, and so on.
    pub fn set(&mut self, document: &Document, line: isize, column: isize) {
        self.line = resolve_index(line, self.max_line(document));
        self.column = resolve_index(column, self.max_column(document));
    }

    pub fn set_line(&mut self, document: &Document, line: isize) {
        self.set(document, line, self.column as isize);
    }

    pub fn set_column(&mut self, document: &Document, column: isize) {
        self.set(document, self.line as isize, column);
    }

    /// Re-apply the clamp, e.g. after the document or `allow_extra_column` changed
    pub fn clamp(&mut self, document: &Document) {
        self.set(document, self.line as isize, self.column as isize);
    }

    /// Move cursor up by n lines, stopping at the first line
    pub fn move_up(&mut self, document: &Document, n: usize) {
        let line = self.line.saturating_sub(n);
        self.set(document, line as isize, self.column as isize);
    }

    /// Move cursor down by n lines, stopping at the last line
    pub fn move_down(&mut self, document: &Document, n: usize) {
        let line = self.line.saturating_add(n).min(isize::MAX as usize);
        self.set(document, line as isize, self.column as isize);
    }

    /// Move cursor left by n columns, stopping at column 0
    pub fn move_left(&mut self, document: &Document, n: usize) {
        let column = self.column.saturating_sub(n);
        self.set(document, self.line as isize, column as isize);
    }

    /// Move cursor right by n columns, stopping at the last column
    pub fn move_right(&mut self, document: &Document, n: usize) {
        let column = self.column.saturating_add(n).min(isize::MAX as usize);
        self.set(document, self.line as isize, column as isize);
    }
}

/// Resolve a signed request against `0..=max`, counting negatives from the end
fn resolve_index(requested: isize, max: usize) -> usize {
    let bound = max as isize + 1;
    let effective = if requested < 0 {
        bound + requested
    } else {
        requested
    };
    effective.clamp(0, max as isize) as usize
}
