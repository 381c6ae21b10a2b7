use std::path::Path;
use streaming_iterator::StreamingIterator;
use tree_sitter::{Language as TsLanguage, Parser, Query, QueryCursor};

use super::theme::Theme;
use super::{Highlight, SyntaxHighlighter};
use crate::editor::{byte_to_char_idx, Cursor, Document};

/// Languages with a tree-sitter grammar compiled in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Rust,
    Python,
}

impl Language {
    /// Pick a language by file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("rs") => Some(Self::Rust),
            Some("py") | Some("pyi") => Some(Self::Python),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Rust => "rust",
            Self::Python => "python",
        }
    }

    fn grammar(&self) -> TsLanguage {
        match self {
            Self::Rust => tree_sitter_rust::LANGUAGE.into(),
            Self::Python => tree_sitter_python::LANGUAGE.into(),
        }
    }

    fn highlight_query(&self) -> &'static str {
        match self {
            Self::Rust => rust_highlight_query(),
            Self::Python => python_highlight_query(),
        }
    }
}

/// Tree-sitter based highlighter for a single language
pub struct LanguageHighlighter {
    parser: Parser,
    query: Query,
    theme: Theme,
    /// Highlights per document line, recomputed on `update`
    highlights: Vec<Vec<Highlight>>,
}

impl LanguageHighlighter {
    /// Set up the parser and query. Returns None if the grammar or query is rejected.
    pub fn new(language: Language) -> Option<Self> {
        let grammar = language.grammar();
        let mut parser = Parser::new();
        if let Err(e) = parser.set_language(&grammar) {
            tracing::error!("Failed to load {} grammar: {:?}", language.name(), e);
            return None;
        }

        let query = match Query::new(&grammar, language.highlight_query()) {
            Ok(query) => query,
            Err(e) => {
                tracing::error!("Invalid {} highlight query: {:?}", language.name(), e);
                return None;
            }
        };

        tracing::info!("Chose {} highlighter", language.name());
        Some(Self {
            parser,
            query,
            theme: Theme::default(),
            highlights: Vec::new(),
        })
    }
}

impl SyntaxHighlighter for LanguageHighlighter {
    fn update(&mut self, document: &Document, _cursor: &Cursor) {
        let lines = document.lines();
        self.highlights = vec![Vec::new(); lines.len()];

        let source = document.text();
        let Some(tree) = self.parser.parse(&source, None) else {
            return;
        };

        let mut query_cursor = QueryCursor::new();
        let mut matches = query_cursor.matches(&self.query, tree.root_node(), source.as_bytes());

        while let Some(m) = matches.next() {
            for capture in m.captures {
                let capture_name = self.query.capture_names()[capture.index as usize];
                let Some(color) = self.theme.get_color_for_capture(capture_name) else {
                    continue;
                };

                let start = capture.node.start_position();
                let end = capture.node.end_position();

                // Split multi-line nodes into one span per line
                for row in start.row..=end.row.min(lines.len().saturating_sub(1)) {
                    let line = &lines[row];
                    let start_byte = if row == start.row { start.column } else { 0 };
                    let end_byte = if row == end.row { end.column } else { line.len() };

                    let column = byte_to_char_idx(line, start_byte);
                    let end_column = byte_to_char_idx(line, end_byte);
                    if column < end_column {
                        self.highlights[row].push(Highlight::new(column, end_column - column, color));
                    }
                }
            }
        }

        for line in self.highlights.iter_mut() {
            line.sort_by_key(|h| h.column);
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

/// Get the highlight query for Rust
pub fn rust_highlight_query() -> &'static str {
    // Named node types only; anonymous keyword tokens vary between grammar versions
    r##"
(line_comment) @comment
(block_comment) @comment

(string_literal) @string
(raw_string_literal) @string
(char_literal) @string
(boolean_literal) @constant
(integer_literal) @number
(float_literal) @number

(function_item name: (identifier) @function)
(call_expression function: (identifier) @function.call)
(call_expression function: (field_expression field: (field_identifier) @function.call))
(macro_invocation macro: (identifier) @function.macro)

(type_identifier) @type
(primitive_type) @builtin

(mutable_specifier) @keyword
(self) @builtin
"##
}

/// Get the highlight query for Python
pub fn python_highlight_query() -> &'static str {
    r##"
(comment) @comment

(string) @string
(integer) @number
(float) @number
(true) @constant
(false) @constant
(none) @constant

(function_definition name: (identifier) @function)
(call function: (identifier) @function.call)
(call function: (attribute attribute: (identifier) @function.call))
(class_definition name: (identifier) @type)

[
  "def" "class" "return" "if" "elif" "else" "for" "while" "in" "not" "and" "or"
  "import" "from" "as" "with" "try" "except" "finally" "raise" "pass" "break"
  "continue" "lambda" "yield" "is" "del" "global" "assert"
] @keyword
"##
}
