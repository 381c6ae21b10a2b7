use super::{draw_document, DrawRequest, EnterParams, Mode, ModeName, Transition};
use crate::commands::{compile_pattern, preview_pattern, Command, CommandLine};
use crate::editor::Editor;
use crate::input::Key;
use crate::syntax::{next_match, NoOpHighlighter, RegexHighlighter, SyntaxHighlighter};
use crate::view::Renderer;

/// The `:` command line
pub struct CommandMode {
    line: CommandLine,
    /// Highlights matches of the pattern being typed
    preview: Box<dyn SyntaxHighlighter>,
}

impl Default for CommandMode {
    fn default() -> Self {
        Self {
            line: CommandLine::new(),
            preview: Box::new(NoOpHighlighter),
        }
    }
}

impl CommandMode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self) -> &str {
        self.line.input()
    }

    fn update_preview(&mut self, editor: &Editor) {
        let buffer = editor.buffers.active_buffer();
        self.preview = match (preview_pattern(self.line.input()), buffer) {
            (Some(pattern), Some(buffer)) => {
                let mut highlighter = RegexHighlighter::new(pattern);
                highlighter.update(&buffer.document, &buffer.cursor);
                Box::new(highlighter)
            }
            _ => Box::new(NoOpHighlighter),
        };
    }

    fn execute(&mut self, editor: &mut Editor, command: Command) -> Transition {
        tracing::debug!("Execute {:?}", command);
        match command {
            Command::Quit => return Transition::Quit,
            Command::Save(path) => {
                if editor.buffers.active_buffer().is_some() {
                    editor.save(path.as_deref());
                }
            }
            Command::Load(path) => {
                editor.load_file(&path);
            }
            Command::Empty => editor.buffers.load_empty_buffer(),
            Command::Search(pattern) => search(editor, &pattern),
            Command::Replace {
                pattern,
                substitute,
            } => replace(editor, &pattern, &substitute),
            Command::Unknown(input) => {
                if !input.is_empty() {
                    tracing::debug!("Unknown command {:?}", input);
                }
            }
        }
        Transition::switch(ModeName::Normal)
    }
}

/// Move the cursor to the next match after it; invalid patterns are ignored
fn search(editor: &mut Editor, pattern: &str) {
    let Some(buffer) = editor.buffers.active_buffer_mut() else {
        return;
    };
    let regex = match compile_pattern(pattern) {
        Ok(regex) => regex,
        Err(e) => {
            tracing::debug!("Ignoring search: {}", e);
            return;
        }
    };
    if let Some((line, column, _)) = next_match(&regex, &buffer.document, &buffer.cursor) {
        buffer
            .cursor
            .set(&buffer.document, line as isize, column as isize);
    }
}

fn replace(editor: &mut Editor, pattern: &str, substitute: &str) {
    let Some(buffer) = editor.buffers.active_buffer_mut() else {
        return;
    };
    match compile_pattern(pattern) {
        Ok(regex) => {
            buffer.document.replace(&regex, substitute);
            buffer.cursor.clamp(&buffer.document);
        }
        Err(e) => tracing::debug!("Ignoring replace: {}", e),
    }
}

impl Mode for CommandMode {
    fn name(&self) -> ModeName {
        ModeName::Command
    }

    fn enter(&mut self, editor: &mut Editor, params: EnterParams) {
        self.line.seed(params.command.as_deref().unwrap_or_default());
        self.update_preview(editor);
    }

    fn leave(&mut self, _editor: &mut Editor) {
        self.line.clear();
        self.preview = Box::new(NoOpHighlighter);
    }

    fn draw(&mut self, editor: &mut Editor, renderer: &mut dyn Renderer) -> anyhow::Result<()> {
        draw_document(
            editor,
            renderer,
            DrawRequest {
                mode: ModeName::Command,
                status_right: String::new(),
                command_line: Some(self.line.input().to_string()),
                preview: Some(self.preview.as_ref()),
            },
        )
    }

    fn update(&mut self, editor: &mut Editor, key: Option<Key>) -> anyhow::Result<Transition> {
        let Some(key) = key else {
            return Ok(Transition::Stay);
        };

        let transition = match key {
            Key::Enter => {
                let command = self.line.execute();
                self.execute(editor, command)
            }
            Key::Backspace => {
                if self.line.delete_char_before() {
                    self.update_preview(editor);
                    Transition::Stay
                } else {
                    Transition::switch(ModeName::Normal)
                }
            }
            Key::Ctrl('r') => {
                if self.line.toggle_search_to_replace() {
                    self.update_preview(editor);
                    Transition::Stay
                } else {
                    Transition::switch(ModeName::Normal)
                }
            }
            Key::Char(c) if key.is_printable() => {
                self.line.insert_char(c);
                self.update_preview(editor);
                Transition::Stay
            }
            _ => {
                self.line.clear();
                Transition::switch(ModeName::Normal)
            }
        };
        Ok(transition)
    }
}
