use super::{draw_document, DrawRequest, EnterParams, Mode, ModeName, Transition};
use crate::editor::{Document, DocumentBuffer, Editor};
use crate::input::{Key, KeyAction, KeyBuffer, NormalCommand};
use crate::view::Renderer;

/// Navigation and line editing through short key sequences
#[derive(Debug, Default)]
pub struct NormalMode {
    keys: KeyBuffer,
}

impl NormalMode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run a recognized command against the active buffer
    fn execute(&mut self, editor: &mut Editor, command: NormalCommand) -> Transition {
        // These work with or without a buffer
        match command {
            NormalCommand::EnterCommand => return Transition::switch(ModeName::Command),
            NormalCommand::Quit => return Transition::Quit,
            NormalCommand::SaveAndQuit => {
                if editor.buffers.active_buffer().is_some() {
                    editor.save(None);
                }
                return Transition::Quit;
            }
            _ => {}
        }

        let Some(buffer) = editor.buffers.active_buffer_mut() else {
            return Transition::Stay;
        };
        let DocumentBuffer {
            document, cursor, ..
        } = buffer;

        match command {
            NormalCommand::MoveLeft => cursor.move_left(document, 1),
            NormalCommand::MoveDown => cursor.move_down(document, 1),
            NormalCommand::MoveUp => cursor.move_up(document, 1),
            NormalCommand::MoveRight => cursor.move_right(document, 1),
            NormalCommand::LineStart => cursor.set_column(document, 0),
            NormalCommand::LineEnd => cursor.set_column(document, -1),
            NormalCommand::LastLine => cursor.set_line(document, -1),
            NormalCommand::FirstLine => cursor.set_line(document, 0),

            NormalCommand::DeleteChar if !document.is_empty() => {
                let (line, column) = (cursor.line(), cursor.column());
                document.delete_in_line(line, column, 1);
                if column >= document.line_len(line) {
                    cursor.move_left(document, 1);
                }
            }
            NormalCommand::DeleteCharBefore if !document.is_empty() => {
                let (line, column) = (cursor.line(), cursor.column());
                if column > 0 {
                    document.delete_in_line(line, column - 1, 1);
                    cursor.move_left(document, 1);
                }
            }
            NormalCommand::DeleteLine if !document.is_empty() => {
                let line = cursor.line();
                document.delete_line(line);
                if line >= document.number_of_lines() {
                    cursor.move_up(document, 1);
                }
                cursor.set_column(document, 0);
            }
            NormalCommand::DeleteChar
            | NormalCommand::DeleteCharBefore
            | NormalCommand::DeleteLine => {}

            NormalCommand::Insert => {
                ensure_line(document);
                return Transition::switch(ModeName::Insert);
            }
            NormalCommand::Append => {
                ensure_line(document);
                cursor.allow_extra_column = true;
                cursor.move_right(document, 1);
                return Transition::switch(ModeName::Insert);
            }
            NormalCommand::InsertLineStart => {
                ensure_line(document);
                cursor.set_column(document, 0);
                return Transition::switch(ModeName::Insert);
            }
            NormalCommand::AppendLineEnd => {
                ensure_line(document);
                cursor.allow_extra_column = true;
                let end = document.line_len(cursor.line());
                cursor.set_column(document, end as isize);
                cursor.move_right(document, 1);
                return Transition::switch(ModeName::Insert);
            }
            NormalCommand::OpenLineBelow => {
                let at = (cursor.line() + 1).min(document.number_of_lines());
                document.insert_line(at, "");
                cursor.set(document, at as isize, 0);
                return Transition::switch(ModeName::Insert);
            }
            NormalCommand::OpenLineAbove => {
                let at = cursor.line().min(document.number_of_lines());
                document.insert_line(at, "");
                cursor.set(document, at as isize, 0);
                return Transition::switch(ModeName::Insert);
            }

            NormalCommand::EnterCommand | NormalCommand::Quit | NormalCommand::SaveAndQuit => {
                unreachable!("handled before the buffer lookup")
            }
        }

        Transition::Stay
    }
}

/// Insert mode needs a line to type into
fn ensure_line(document: &mut Document) {
    if document.is_empty() {
        document.insert_line(0, "");
    }
}

impl Mode for NormalMode {
    fn name(&self) -> ModeName {
        ModeName::Normal
    }

    fn enter(&mut self, editor: &mut Editor, _params: EnterParams) {
        if let Some(buffer) = editor.buffers.active_buffer_mut() {
            buffer.cursor.allow_extra_column = false;
            buffer.cursor.clamp(&buffer.document);
            buffer.refresh_highlights();
        }
    }

    fn leave(&mut self, _editor: &mut Editor) {
        self.keys.clear();
    }

    fn draw(&mut self, editor: &mut Editor, renderer: &mut dyn Renderer) -> anyhow::Result<()> {
        draw_document(
            editor,
            renderer,
            DrawRequest {
                mode: ModeName::Normal,
                status_right: self.keys.to_string(),
                command_line: None,
                preview: None,
            },
        )
    }

    fn update(&mut self, editor: &mut Editor, key: Option<Key>) -> anyhow::Result<Transition> {
        match self.keys.push(key) {
            KeyAction::Command(command) => Ok(self.execute(editor, command)),
            KeyAction::Pending | KeyAction::Discarded => Ok(Transition::Stay),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::editor::{DocumentBufferManager, MemoryFileSystem};

    fn setup(lines: &[&str]) -> (Editor, MemoryFileSystem) {
        let fs = MemoryFileSystem::new();
        fs.insert("doc.txt", lines);
        let mut buffers = DocumentBufferManager::with_file_system(Box::new(fs.clone()));
        buffers.load_file(std::path::Path::new("doc.txt")).unwrap();
        (Editor::with_buffers(Settings::default(), buffers), fs)
    }

    fn press(mode: &mut NormalMode, editor: &mut Editor, keys: &str) -> Transition {
        let mut last = Transition::Stay;
        for c in keys.chars() {
            last = mode.update(editor, Some(Key::Char(c))).unwrap();
        }
        last
    }

    fn state(editor: &Editor) -> (Vec<String>, usize, usize) {
        let buffer = editor.buffers.active_buffer().unwrap();
        (
            buffer.document.lines().to_vec(),
            buffer.cursor.line(),
            buffer.cursor.column(),
        )
    }

    fn place(editor: &mut Editor, line: isize, column: isize) {
        let buffer = editor.buffers.active_buffer_mut().unwrap();
        buffer.cursor.set(&buffer.document, line, column);
    }

    #[test]
    fn test_delete_char() {
        let (mut editor, _) = setup(&["abc", "def"]);
        let mut mode = NormalMode::new();
        place(&mut editor, 0, 1);
        press(&mut mode, &mut editor, "x");
        assert_eq!(state(&editor), (vec!["ac".into(), "def".into()], 0, 1));
        // at the end of the line the cursor steps back
        press(&mut mode, &mut editor, "x");
        assert_eq!(state(&editor), (vec!["a".into(), "def".into()], 0, 0));
    }

    #[test]
    fn test_delete_char_before() {
        let (mut editor, _) = setup(&["abc"]);
        let mut mode = NormalMode::new();
        press(&mut mode, &mut editor, "X");
        assert_eq!(state(&editor), (vec!["abc".into()], 0, 0));
        place(&mut editor, 0, 2);
        press(&mut mode, &mut editor, "X");
        assert_eq!(state(&editor), (vec!["ac".into()], 0, 1));
    }

    #[test]
    fn test_dd_deletes_exactly_one_line() {
        let (mut editor, _) = setup(&["one", "two", "three"]);
        let mut mode = NormalMode::new();
        place(&mut editor, 2, 3);
        assert_eq!(press(&mut mode, &mut editor, "d"), Transition::Stay);
        assert_eq!(state(&editor).0.len(), 3);
        press(&mut mode, &mut editor, "d");
        assert_eq!(state(&editor), (vec!["one".into(), "two".into()], 1, 0));
    }

    #[test]
    fn test_broken_prefix_does_nothing() {
        let (mut editor, _) = setup(&["abc"]);
        let mut mode = NormalMode::new();
        press(&mut mode, &mut editor, "dx");
        assert_eq!(state(&editor), (vec!["abc".into()], 0, 0));
        assert!(mode.keys.is_empty());
    }

    #[test]
    fn test_jumps() {
        let (mut editor, _) = setup(&["abc", "de", "fghij"]);
        let mut mode = NormalMode::new();
        press(&mut mode, &mut editor, "J");
        assert_eq!(state(&editor).1, 2);
        press(&mut mode, &mut editor, "L");
        assert_eq!(state(&editor).2, 4);
        press(&mut mode, &mut editor, "H");
        assert_eq!(state(&editor).2, 0);
        press(&mut mode, &mut editor, "K");
        assert_eq!(state(&editor).1, 0);
        press(&mut mode, &mut editor, "ljjk");
        assert_eq!((state(&editor).1, state(&editor).2), (1, 1));
    }

    #[test]
    fn test_insert_entries() {
        let (mut editor, _) = setup(&["abc"]);
        let mut mode = NormalMode::new();
        assert_eq!(press(&mut mode, &mut editor, "A"), Transition::switch(ModeName::Insert));
        assert_eq!(state(&editor).2, 3);

        let (mut editor, _) = setup(&["abc"]);
        assert_eq!(press(&mut mode, &mut editor, "a"), Transition::switch(ModeName::Insert));
        assert_eq!(state(&editor).2, 1);

        let (mut editor, _) = setup(&["abc"]);
        place(&mut editor, 0, 2);
        press(&mut mode, &mut editor, "I");
        assert_eq!(state(&editor).2, 0);
    }

    #[test]
    fn test_open_lines() {
        let (mut editor, _) = setup(&["a", "b"]);
        let mut mode = NormalMode::new();
        press(&mut mode, &mut editor, "o");
        assert_eq!(state(&editor), (vec!["a".into(), "".into(), "b".into()], 1, 0));

        let (mut editor, _) = setup(&["a", "b"]);
        place(&mut editor, 1, 0);
        press(&mut mode, &mut editor, "O");
        assert_eq!(state(&editor), (vec!["a".into(), "".into(), "b".into()], 1, 0));
    }

    #[test]
    fn test_insert_on_empty_document_creates_line() {
        let (mut editor, _) = setup(&[]);
        let mut mode = NormalMode::new();
        press(&mut mode, &mut editor, "i");
        assert_eq!(state(&editor), (vec!["".into()], 0, 0));

        let (mut editor, _) = setup(&[]);
        press(&mut mode, &mut editor, "o");
        assert_eq!(state(&editor), (vec!["".into()], 0, 0));
    }

    #[test]
    fn test_quit_and_save() {
        let (mut editor, fs) = setup(&["abc"]);
        let mut mode = NormalMode::new();
        press(&mut mode, &mut editor, "x");
        assert_eq!(press(&mut mode, &mut editor, "ZZ"), Transition::Quit);
        assert_eq!(fs.get("doc.txt"), Some(vec!["bc".to_string()]));

        let (mut editor, fs) = setup(&["abc"]);
        press(&mut mode, &mut editor, "x");
        assert_eq!(press(&mut mode, &mut editor, "ZQ"), Transition::Quit);
        assert_eq!(fs.get("doc.txt"), Some(vec!["abc".to_string()]));
    }

    #[test]
    fn test_without_buffer() {
        let mut editor = Editor::with_buffers(
            Settings::default(),
            DocumentBufferManager::with_file_system(Box::new(MemoryFileSystem::new())),
        );
        let mut mode = NormalMode::new();
        assert_eq!(press(&mut mode, &mut editor, "x"), Transition::Stay);
        assert_eq!(press(&mut mode, &mut editor, "i"), Transition::Stay);
        assert_eq!(press(&mut mode, &mut editor, ":"), Transition::switch(ModeName::Command));
        assert_eq!(press(&mut mode, &mut editor, "ZZ"), Transition::Quit);
    }
}
