use crossterm::style::Color;
use regex::Regex;

use super::{Highlight, SyntaxHighlighter};
use crate::editor::{byte_to_char_idx, char_to_byte_idx, Cursor, Document};

/// Highlights every match of a pattern, plus the next match after the cursor.
///
/// Used as the live preview while a `search` or `replace` command is typed.
pub struct RegexHighlighter {
    pattern: Option<Regex>,
    highlights: Vec<Vec<Highlight>>,
}

impl RegexHighlighter {
    /// An invalid pattern produces a highlighter without highlights
    pub fn new(pattern: &str) -> Self {
        let pattern = match Regex::new(pattern) {
            Ok(regex) => Some(regex),
            Err(_) => {
                tracing::debug!("Not a valid regular expression: '{}'", pattern);
                None
            }
        };
        Self {
            pattern,
            highlights: Vec::new(),
        }
    }
}

impl SyntaxHighlighter for RegexHighlighter {
    fn update(&mut self, document: &Document, cursor: &Cursor) {
        let Some(pattern) = &self.pattern else {
            self.highlights = vec![Vec::new(); document.number_of_lines()];
            return;
        };

        self.highlights = document
            .lines()
            .iter()
            .map(|line| {
                pattern
                    .find_iter(line)
                    .map(|m| {
                        let column = byte_to_char_idx(line, m.start());
                        let length = line[m.start()..m.end()].chars().count();
                        Highlight::new(column, length, Color::Black).with_bg(Color::Yellow)
                    })
                    .collect()
            })
            .collect();

        if let Some((line, column, length)) = next_match(pattern, document, cursor) {
            self.highlights[line]
                .push(Highlight::new(column, length, Color::Black).with_bg(Color::Green));
        }

        tracing::debug!(
            "Number of highlights: {}",
            self.highlights.iter().map(Vec::len).sum::<usize>()
        );
    }

    fn get_highlights(&self, line: usize) -> &[Highlight] {
        self.highlights.get(line).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// First match starting strictly after the cursor, as (line, column, length in chars).
///
/// The scan does not wrap around to the start of the document.
pub fn next_match(
    pattern: &Regex,
    document: &Document,
    cursor: &Cursor,
) -> Option<(usize, usize, usize)> {
    let text = document.text();
    let start = document.get_index(cursor.line(), cursor.column()) + 1;
    if start > text.chars().count() {
        return None;
    }

    let m = pattern.find_at(&text, char_to_byte_idx(&text, start))?;
    let index = byte_to_char_idx(&text, m.start());
    let length = text[m.start()..m.end()].chars().count();
    let (line, column) = document.get_coordinates(index)?;
    Some((line, column, length))
}
