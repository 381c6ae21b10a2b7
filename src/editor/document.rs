use regex::Regex;
use std::fmt;
use std::path::PathBuf;

use crate::error::{EditorError, Result};

/// Callback invoked after every mutation of a [`Document`]
pub type ChangeHandler = Box<dyn FnMut()>;

/// A line-oriented text document.
///
/// Columns are counted in chars, not bytes. Every mutating method notifies
/// all subscribers exactly once after the mutation has been applied.
pub struct Document {
    lines: Vec<String>,
    /// Where the document was loaded from or last saved to
    pub path: Option<PathBuf>,
    subscribers: Vec<ChangeHandler>,
}

impl Document {
    pub fn new(lines: Vec<String>, path: Option<PathBuf>) -> Self {
        Self {
            lines,
            path,
            subscribers: Vec::new(),
        }
    }

    /// A document holding a single empty line
    pub fn empty() -> Self {
        Self::new(vec![String::new()], None)
    }

    pub fn number_of_lines(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line(&self, line: usize) -> Option<&str> {
        self.lines.get(line).map(String::as_str)
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Length of a line in chars (0 for a missing line)
    pub fn line_len(&self, line: usize) -> usize {
        self.lines.get(line).map(|l| l.chars().count()).unwrap_or(0)
    }

    /// Register a handler that runs after every mutation
    pub fn subscribe(&mut self, handler: impl FnMut() + 'static) {
        self.subscribers.push(Box::new(handler));
    }

    fn notify(&mut self) {
        for handler in self.subscribers.iter_mut() {
            handler();
        }
    }

    /// Splice `text` into `line` at `column`
    pub fn insert(&mut self, line: usize, column: usize, text: &str) {
        let target = &mut self.lines[line];
        let byte = char_to_byte_idx(target, column);
        target.insert_str(byte, text);
        self.notify();
    }

    /// Remove `count` chars starting at `column`. Chars past the end of the line are ignored.
    pub fn delete_in_line(&mut self, line: usize, column: usize, count: usize) {
        let target = &mut self.lines[line];
        let start = char_to_byte_idx(target, column);
        let end = char_to_byte_idx(target, column.saturating_add(count));
        target.replace_range(start..end, "");
        self.notify();
    }

    /// Cut `line` at `column`, moving the suffix onto a new line below
    pub fn split_line(&mut self, line: usize, column: usize) {
        let target = &mut self.lines[line];
        let byte = char_to_byte_idx(target, column);
        let suffix = target.split_off(byte);
        self.lines.insert(line + 1, suffix);
        self.notify();
    }

    /// Append line `first + 1` onto line `first`.
    ///
    /// Joining the last line is a no-op. An index outside the document is a
    /// caller bug and is reported as [`EditorError::LineOutOfRange`].
    pub fn join_lines(&mut self, first: usize) -> Result<()> {
        if first >= self.lines.len() {
            return Err(EditorError::LineOutOfRange {
                line: first,
                len: self.lines.len(),
            });
        }

        if first + 1 < self.lines.len() {
            let second = self.lines.remove(first + 1);
            self.lines[first].push_str(&second);
        }
        self.notify();
        Ok(())
    }

    pub fn insert_line(&mut self, at: usize, text: &str) {
        tracing::debug!("Inserting line {}", at);
        self.lines.insert(at, text.to_string());
        self.notify();
    }

    pub fn delete_line(&mut self, at: usize) {
        if at < self.lines.len() {
            self.lines.remove(at);
        } else {
            tracing::warn!("Cannot delete line {} (document has {} lines)", at, self.lines.len());
        }
        self.notify();
    }

    /// Replace every match of `pattern` in the whole text with `substitute`
    pub fn replace(&mut self, pattern: &Regex, substitute: &str) {
        let text = self.text();
        let replaced = pattern.replace_all(&text, substitute);
        self.lines = if self.lines.is_empty() && replaced.is_empty() {
            Vec::new()
        } else {
            replaced.split('\n').map(String::from).collect()
        };
        self.notify();
    }

    /// The whole document joined with `\n`
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Convert a flat char offset into `text()` to (line, column)
    pub fn get_coordinates(&self, index: usize) -> Option<(usize, usize)> {
        let mut consumed = 0;
        for (line_number, line) in self.lines.iter().enumerate() {
            let len = line.chars().count();
            if index <= consumed + len {
                return Some((line_number, index - consumed));
            }
            consumed += len + 1;
        }
        None
    }

    /// Convert (line, column) into a flat char offset into `text()`
    pub fn get_index(&self, line: usize, column: usize) -> usize {
        self.lines
            .iter()
            .take(line)
            .map(|l| l.chars().count() + 1)
            .sum::<usize>()
            + column
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new(Vec::new(), None)
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("lines", &self.lines)
            .field("path", &self.path)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

/// Byte offset of char `col` in `s`, or `s.len()` past the end
pub fn char_to_byte_idx(s: &str, col: usize) -> usize {
    s.char_indices().nth(col).map(|(i, _)| i).unwrap_or(s.len())
}

/// Char offset of byte `byte` in `s`
pub fn byte_to_char_idx(s: &str, byte: usize) -> usize {
    s[..byte.min(s.len())].chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn doc(lines: &[&str]) -> Document {
        Document::new(lines.iter().map(|s| s.to_string()).collect(), None)
    }

    #[test]
    fn test_insert_and_delete() {
        let mut d = doc(&["abc"]);
        d.insert(0, 1, "XY");
        assert_eq!(d.line(0), Some("aXYbc"));
        d.delete_in_line(0, 1, 2);
        assert_eq!(d.line(0), Some("abc"));
        // past the end degrades to nothing
        d.delete_in_line(0, 10, 1);
        assert_eq!(d.line(0), Some("abc"));
        d.delete_in_line(0, 2, 5);
        assert_eq!(d.line(0), Some("ab"));
    }

    #[test]
    fn test_multibyte_columns() {
        let mut d = doc(&["héllo"]);
        d.delete_in_line(0, 1, 1);
        assert_eq!(d.line(0), Some("hllo"));
        d.insert(0, 1, "é");
        assert_eq!(d.line_len(0), 5);
    }

    #[test]
    fn test_split_and_join() {
        let mut d = doc(&["hello world", "x"]);
        d.split_line(0, 5);
        assert_eq!(d.lines(), &["hello", " world", "x"]);
        d.join_lines(0).unwrap();
        assert_eq!(d.lines(), &["hello world", "x"]);
        // joining the last line does nothing
        d.join_lines(1).unwrap();
        assert_eq!(d.lines(), &["hello world", "x"]);
    }

    #[test]
    fn test_join_out_of_range() {
        let mut d = doc(&["a"]);
        assert!(matches!(
            d.join_lines(1),
            Err(EditorError::LineOutOfRange { line: 1, len: 1 })
        ));
    }

    #[test]
    fn test_insert_and_delete_lines() {
        let mut d = doc(&["a", "b"]);
        d.insert_line(1, "");
        assert_eq!(d.lines(), &["a", "", "b"]);
        d.delete_line(0);
        assert_eq!(d.lines(), &["", "b"]);
        d.delete_line(7);
        assert_eq!(d.number_of_lines(), 2);
        d.delete_line(0);
        d.delete_line(0);
        assert!(d.is_empty());
    }

    #[test]
    fn test_every_mutation_notifies_once() {
        let calls = Rc::new(Cell::new(0));
        let mut d = doc(&["abc", "def"]);
        let counter = calls.clone();
        d.subscribe(move || counter.set(counter.get() + 1));

        d.insert(0, 0, "x");
        assert_eq!(calls.get(), 1);
        d.delete_in_line(0, 0, 1);
        assert_eq!(calls.get(), 2);
        d.split_line(0, 1);
        assert_eq!(calls.get(), 3);
        d.join_lines(0).unwrap();
        assert_eq!(calls.get(), 4);
        d.insert_line(0, "new");
        assert_eq!(calls.get(), 5);
        d.delete_line(0);
        assert_eq!(calls.get(), 6);
        d.replace(&Regex::new("d").unwrap(), "D");
        assert_eq!(calls.get(), 7);

        // a failing join does not notify
        assert!(d.join_lines(9).is_err());
        assert_eq!(calls.get(), 7);
    }

    #[test]
    fn test_replace() {
        let mut d = doc(&["foo bar", "bar foo"]);
        d.replace(&Regex::new("foo").unwrap(), "baz");
        assert_eq!(d.lines(), &["baz bar", "bar baz"]);
        d.replace(&Regex::new(r"bar\nbar").unwrap(), "joined");
        assert_eq!(d.lines(), &["baz joined baz"]);
    }

    #[test]
    fn test_index_and_coordinates() {
        let d = doc(&["abc", "", "de"]);
        assert_eq!(d.text(), "abc\n\nde");
        assert_eq!(d.get_index(0, 2), 2);
        assert_eq!(d.get_index(2, 1), 6);
        assert_eq!(d.get_coordinates(0), Some((0, 0)));
        assert_eq!(d.get_coordinates(3), Some((0, 3)));
        assert_eq!(d.get_coordinates(4), Some((1, 0)));
        assert_eq!(d.get_coordinates(5), Some((2, 0)));
        assert_eq!(d.get_coordinates(7), Some((2, 2)));
        assert_eq!(d.get_coordinates(8), None);
    }

    proptest! {
        #[test]
        fn split_then_join_restores_line(line in "[a-zé ]{0,20}", column in 0usize..25) {
            let mut d = Document::new(vec![line.clone(), "tail".to_string()], None);
            let column = column.min(line.chars().count());
            d.split_line(0, column);
            d.join_lines(0).unwrap();
            prop_assert_eq!(d.lines(), &[line, "tail".to_string()]);
        }

        #[test]
        fn insert_then_delete_restores_line(line in "[a-z]{0,20}", text in "[A-Z]{1,5}", column in 0usize..25) {
            let mut d = Document::new(vec![line.clone()], None);
            let column = column.min(line.len());
            d.insert(0, column, &text);
            d.delete_in_line(0, column, text.chars().count());
            prop_assert_eq!(d.line(0), Some(line.as_str()));
        }

        #[test]
        fn coordinates_invert_index(lines in prop::collection::vec("[a-z]{0,8}", 1..6), pick in 0usize..64) {
            let d = Document::new(lines.clone(), None);
            let line = pick % lines.len();
            let column = pick % (lines[line].len() + 1);
            let index = d.get_index(line, column);
            prop_assert_eq!(d.get_coordinates(index), Some((line, column)));
        }
    }
}
