#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::Path;

use crossterm::style::Color;
use pte::config::Settings;
use pte::editor::{DocumentBufferManager, Editor, MemoryFileSystem};
use pte::input::{Key, KeySource};
use pte::view::{Frame, Renderer};

/// Replays a fixed list of keystrokes, then fails
pub struct ScriptedKeys {
    keys: VecDeque<Option<Key>>,
}

impl ScriptedKeys {
    pub fn new(keys: impl IntoIterator<Item = Option<Key>>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
        }
    }

    /// One keystroke per char: printable chars as typed, plus `\x1b` for Escape and `\n` for Enter
    pub fn typed(text: &str) -> Self {
        Self::new(text.chars().map(|c| {
            Some(match c {
                '\x1b' => Key::Escape,
                '\n' => Key::Enter,
                '\x08' => Key::Backspace,
                '\t' => Key::Tab,
                c => Key::Char(c),
            })
        }))
    }
}

impl KeySource for ScriptedKeys {
    fn read(&mut self) -> anyhow::Result<Option<Key>> {
        self.keys
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("key script exhausted"))
    }
}

/// What one draw call showed
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub lines: Vec<String>,
    pub first_line: usize,
    pub cursor: Option<(usize, usize)>,
    pub status: &'static str,
    pub status_color: Color,
    pub status_right: String,
    pub message: Option<String>,
    pub command_line: Option<String>,
    pub highlight_counts: Vec<usize>,
}

/// Keeps a copy of every frame
pub struct RecordingRenderer {
    rows: usize,
    pub frames: Vec<Snapshot>,
}

impl RecordingRenderer {
    pub fn new(rows: usize) -> Self {
        Self {
            rows,
            frames: Vec::new(),
        }
    }

    pub fn last(&self) -> &Snapshot {
        self.frames.last().expect("nothing was drawn")
    }
}

impl Renderer for RecordingRenderer {
    fn text_rows(&self) -> usize {
        self.rows
    }

    fn draw(&mut self, frame: &Frame<'_>) -> anyhow::Result<()> {
        self.frames.push(Snapshot {
            lines: frame.lines.to_vec(),
            first_line: frame.first_line,
            cursor: frame.cursor,
            status: frame.status,
            status_color: frame.status_color,
            status_right: frame.status_right.clone(),
            message: frame.message.map(String::from),
            command_line: frame.command_line.clone(),
            highlight_counts: frame.highlights.iter().map(Vec::len).collect(),
        });
        Ok(())
    }
}

/// An editor whose active buffer is `path` holding `lines`, backed by memory
pub fn editor_with(path: &str, lines: &[&str]) -> (Editor, MemoryFileSystem) {
    let fs = MemoryFileSystem::new();
    fs.insert(path, lines);
    let mut buffers = DocumentBufferManager::with_file_system(Box::new(fs.clone()));
    buffers
        .load_file(Path::new(path))
        .expect("file was just inserted");
    (Editor::with_buffers(Settings::default(), buffers), fs)
}

pub fn lines(editor: &Editor) -> Vec<String> {
    editor
        .buffers
        .active_buffer()
        .map(|b| b.document.lines().to_vec())
        .unwrap_or_default()
}

pub fn cursor(editor: &Editor) -> (usize, usize) {
    let buffer = editor.buffers.active_buffer().expect("no active buffer");
    (buffer.cursor.line(), buffer.cursor.column())
}
