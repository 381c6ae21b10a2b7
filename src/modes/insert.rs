use super::{draw_document, DrawRequest, EnterParams, Mode, ModeName, Transition};
use crate::editor::{DocumentBuffer, Editor};
use crate::input::Key;
use crate::view::Renderer;

/// Free text entry at the cursor
#[derive(Debug, Default)]
pub struct InsertMode;

impl InsertMode {
    pub fn new() -> Self {
        Self
    }
}

impl Mode for InsertMode {
    fn name(&self) -> ModeName {
        ModeName::Insert
    }

    fn enter(&mut self, editor: &mut Editor, _params: EnterParams) {
        if let Some(buffer) = editor.buffers.active_buffer_mut() {
            buffer.cursor.allow_extra_column = true;
            buffer.refresh_highlights();
        }
    }

    fn leave(&mut self, _editor: &mut Editor) {}

    fn draw(&mut self, editor: &mut Editor, renderer: &mut dyn Renderer) -> anyhow::Result<()> {
        draw_document(
            editor,
            renderer,
            DrawRequest {
                mode: ModeName::Insert,
                status_right: String::new(),
                command_line: None,
                preview: None,
            },
        )
    }

    fn update(&mut self, editor: &mut Editor, key: Option<Key>) -> anyhow::Result<Transition> {
        let tab_width = editor.settings.editor.tab_width;
        // Normal mode only enters Insert with an active, non-empty buffer
        let Some(buffer) = editor.buffers.active_buffer_mut() else {
            return Ok(Transition::switch(ModeName::Normal));
        };
        let DocumentBuffer {
            document, cursor, ..
        } = buffer;
        let Some(key) = key else {
            return Ok(Transition::Stay);
        };
        if document.is_empty() {
            document.insert_line(0, "");
        }
        let (line, column) = (cursor.line(), cursor.column());

        match key {
            Key::Escape => {
                cursor.move_left(document, 1);
                return Ok(Transition::switch(ModeName::Normal));
            }
            Key::Enter => {
                document.split_line(line, column);
                cursor.move_down(document, 1);
                cursor.set_column(document, 0);
            }
            Key::Tab => {
                document.insert(line, column, &" ".repeat(tab_width));
                cursor.move_right(document, tab_width);
            }
            Key::Delete => {
                if column < document.line_len(line) {
                    document.delete_in_line(line, column, 1);
                } else if line + 1 < document.number_of_lines() {
                    document.join_lines(line)?;
                }
            }
            Key::Backspace => {
                if column > 0 {
                    document.delete_in_line(line, column - 1, 1);
                    cursor.move_left(document, 1);
                } else if line > 0 {
                    let joined_at = document.line_len(line - 1);
                    document.join_lines(line - 1)?;
                    cursor.set(document, (line - 1) as isize, joined_at as isize);
                }
            }
            Key::Char(c) if key.is_printable() => {
                let mut encoded = [0; 4];
                document.insert(line, column, c.encode_utf8(&mut encoded));
                cursor.move_right(document, 1);
            }
            _ => {}
        }

        Ok(Transition::Stay)
    }
}
