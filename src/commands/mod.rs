use regex::Regex;
use std::path::PathBuf;

use crate::error::Result;

/// Parsed command from the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `save [path]` - Write the active buffer
    Save(Option<PathBuf>),
    /// `load <path>` - Open a file in a new buffer
    Load(PathBuf),
    /// `quit` - Leave the editor
    Quit,
    /// `empty` - Open a new empty buffer
    Empty,
    /// `search <pattern>` - Jump to the next regex match after the cursor
    Search(String),
    /// `replace <pattern> <substitute>` - Replace every match in the document
    Replace { pattern: String, substitute: String },
    /// Anything else
    Unknown(String),
}

/// Parse a command string into a Command
pub fn parse_command(input: &str) -> Command {
    let parts: Vec<&str> = input.split_whitespace().collect();

    match parts.as_slice() {
        ["save"] => Command::Save(None),
        ["save", path] => Command::Save(Some(PathBuf::from(path))),
        ["load", path] => Command::Load(PathBuf::from(path)),
        ["quit"] => Command::Quit,
        ["empty"] => Command::Empty,
        ["search", pattern] => Command::Search(pattern.to_string()),
        ["replace", pattern, substitute] => Command::Replace {
            pattern: pattern.to_string(),
            substitute: substitute.to_string(),
        },
        _ => Command::Unknown(input.trim().to_string()),
    }
}

/// The pattern to preview while a `search` or `replace` command is being typed
pub fn preview_pattern(input: &str) -> Option<&str> {
    let parts: Vec<&str> = input.split_whitespace().collect();

    match parts.as_slice() {
        ["search", pattern] | ["replace", pattern] | ["replace", pattern, _] => Some(*pattern),
        _ => None,
    }
}

/// Compile a `search`/`replace` pattern
pub fn compile_pattern(pattern: &str) -> Result<Regex> {
    Ok(Regex::new(pattern)?)
}

/// Command line input buffer
#[derive(Debug, Clone, Default)]
pub struct CommandLine {
    input: String,
}

impl CommandLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Replace the contents with `seed`
    pub fn seed(&mut self, seed: &str) {
        self.input = seed.to_string();
    }

    pub fn clear(&mut self) {
        self.input.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }

    pub fn insert_char(&mut self, ch: char) {
        self.input.push(ch);
    }

    /// Drop the last character; returns false if there was nothing to drop
    pub fn delete_char_before(&mut self) -> bool {
        self.input.pop().is_some()
    }

    /// Rewrite a leading `search` into `replace`, keeping its arguments.
    ///
    /// Returns false (and changes nothing) if the command is not a search.
    pub fn toggle_search_to_replace(&mut self) -> bool {
        let mut parts: Vec<&str> = self.input.split_whitespace().collect();
        if parts.first() != Some(&"search") {
            return false;
        }
        parts[0] = "replace";
        self.input = parts.join(" ");
        true
    }

    /// Parse the current input and clear it
    pub fn execute(&mut self) -> Command {
        let cmd = parse_command(&self.input);
        self.clear();
        cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command("save"), Command::Save(None));
        assert_eq!(
            parse_command("  save   out.txt "),
            Command::Save(Some(PathBuf::from("out.txt")))
        );
        assert_eq!(parse_command("load a.py"), Command::Load(PathBuf::from("a.py")));
        assert_eq!(parse_command("quit"), Command::Quit);
        assert_eq!(parse_command("empty"), Command::Empty);
        assert_eq!(parse_command("search fo+"), Command::Search("fo+".to_string()));
        assert_eq!(
            parse_command("replace a b"),
            Command::Replace {
                pattern: "a".to_string(),
                substitute: "b".to_string()
            }
        );
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(parse_command(""), Command::Unknown(String::new()));
        assert_eq!(parse_command("load"), Command::Unknown("load".to_string()));
        assert_eq!(parse_command("quit now"), Command::Unknown("quit now".to_string()));
        assert_eq!(parse_command("replace a"), Command::Unknown("replace a".to_string()));
        assert_eq!(parse_command("w"), Command::Unknown("w".to_string()));
    }

    #[test]
    fn test_preview_pattern() {
        assert_eq!(preview_pattern("search foo"), Some("foo"));
        assert_eq!(preview_pattern("replace foo"), Some("foo"));
        assert_eq!(preview_pattern("replace foo bar"), Some("foo"));
        assert_eq!(preview_pattern("search"), None);
        assert_eq!(preview_pattern("save foo"), None);
    }

    #[test]
    fn test_compile_pattern() {
        assert!(compile_pattern(r"fo+\d").is_ok());
        assert!(matches!(
            compile_pattern("("),
            Err(crate::error::EditorError::InvalidPattern(_))
        ));
    }

    #[test]
    fn test_toggle_search_to_replace() {
        let mut line = CommandLine::new();
        line.seed("search  foo");
        assert!(line.toggle_search_to_replace());
        assert_eq!(line.input(), "replace foo");

        line.seed("save x");
        assert!(!line.toggle_search_to_replace());
        assert_eq!(line.input(), "save x");
    }

    #[test]
    fn test_editing() {
        let mut line = CommandLine::new();
        line.insert_char('q');
        assert_eq!(line.input(), "q");
        assert!(line.delete_char_before());
        assert!(!line.delete_char_before());
        line.seed("quit");
        assert_eq!(line.execute(), Command::Quit);
        assert!(line.is_empty());
    }
}
