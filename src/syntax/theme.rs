use crossterm::style::Color;
use std::collections::HashMap;

/// Highlight group names used by tree-sitter queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HighlightGroup {
    Keyword,
    Function,
    Type,
    String,
    Number,
    Comment,
    Constant,
    Builtin,
}

impl HighlightGroup {
    /// Parse a tree-sitter capture name to a highlight group
    pub fn from_capture_name(name: &str) -> Option<Self> {
        // Handle hierarchical names like "function.call" -> Function
        let base = name.split('.').next()?;

        match base {
            "keyword" => Some(Self::Keyword),
            "function" => Some(Self::Function),
            "type" => Some(Self::Type),
            "string" => Some(Self::String),
            "number" => Some(Self::Number),
            "comment" => Some(Self::Comment),
            "constant" => Some(Self::Constant),
            "builtin" => Some(Self::Builtin),
            _ => None,
        }
    }
}

/// Maps highlight groups to terminal colors
#[derive(Debug, Clone)]
pub struct Theme {
    colors: HashMap<HighlightGroup, Color>,
}

impl Theme {
    /// The 16-color palette the editor ships with
    pub fn default_theme() -> Self {
        let mut colors = HashMap::new();

        colors.insert(HighlightGroup::Comment, Color::DarkGrey);
        colors.insert(HighlightGroup::Keyword, Color::Blue);
        colors.insert(HighlightGroup::Number, Color::Cyan);
        colors.insert(HighlightGroup::Constant, Color::Cyan);
        colors.insert(HighlightGroup::String, Color::Green);
        colors.insert(HighlightGroup::Builtin, Color::Blue);
        colors.insert(HighlightGroup::Type, Color::Yellow);
        colors.insert(HighlightGroup::Function, Color::Magenta);

        Self { colors }
    }

    pub fn get_color(&self, group: HighlightGroup) -> Option<Color> {
        self.colors.get(&group).copied()
    }

    pub fn get_color_for_capture(&self, capture_name: &str) -> Option<Color> {
        HighlightGroup::from_capture_name(capture_name).and_then(|group| self.get_color(group))
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::default_theme()
    }
}
