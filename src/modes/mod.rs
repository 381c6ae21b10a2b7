//! The modal editing state machine.
//!
//! Exactly one [`Mode`] is active at a time. Each loop iteration draws the
//! active mode, reads one keystroke and feeds it to the mode, which answers
//! with a [`Transition`].

mod command;
mod insert;
mod machine;
mod normal;

pub use command::CommandMode;
pub use insert::InsertMode;
pub use machine::ModeMachine;
pub use normal::NormalMode;

use crossterm::style::Color;

use crate::editor::Editor;
use crate::input::Key;
use crate::syntax::SyntaxHighlighter;
use crate::view::{Frame, Renderer};

/// The modes the editor can be in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModeName {
    Normal,
    Insert,
    Command,
}

impl ModeName {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModeName::Normal => "NORMAL MODE",
            ModeName::Insert => "INSERT MODE",
            ModeName::Command => "COMMAND MODE",
        }
    }

    pub fn status_color(&self) -> Color {
        match self {
            ModeName::Normal => Color::Cyan,
            ModeName::Insert => Color::Green,
            ModeName::Command => Color::Yellow,
        }
    }
}

impl std::fmt::Display for ModeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters handed to [`Mode::enter`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnterParams {
    /// Initial contents of the command line (Command mode only)
    pub command: Option<String>,
}

impl EnterParams {
    pub fn command(seed: impl Into<String>) -> Self {
        Self {
            command: Some(seed.into()),
        }
    }
}

/// What the machine should do after a mode handled a keystroke
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Stay,
    Switch(ModeName, EnterParams),
    Quit,
}

impl Transition {
    pub fn switch(mode: ModeName) -> Self {
        Transition::Switch(mode, EnterParams::default())
    }
}

pub trait Mode {
    fn name(&self) -> ModeName;

    /// Per-mode setup; runs once each time the mode becomes active
    fn enter(&mut self, editor: &mut Editor, params: EnterParams);

    /// Per-mode teardown; runs once each time the mode stops being active
    fn leave(&mut self, editor: &mut Editor);

    fn draw(&mut self, editor: &mut Editor, renderer: &mut dyn Renderer) -> anyhow::Result<()>;

    /// Handle one keystroke (`None` when no input arrived).
    ///
    /// An error means an internal invariant broke and the editor must stop.
    fn update(&mut self, editor: &mut Editor, key: Option<Key>) -> anyhow::Result<Transition>;
}

/// Status-line and command-line content a mode wants drawn
struct DrawRequest<'a> {
    mode: ModeName,
    status_right: String,
    command_line: Option<String>,
    /// Drawn on top of the buffer's own highlights
    preview: Option<&'a dyn SyntaxHighlighter>,
}

/// Lay out the active buffer and hand a frame to the renderer
fn draw_document(
    editor: &mut Editor,
    renderer: &mut dyn Renderer,
    request: DrawRequest<'_>,
) -> anyhow::Result<()> {
    let rows = renderer.text_rows();
    let message = editor.status_message().map(String::from);

    let Some(buffer) = editor.buffers.active_buffer_mut() else {
        let mut frame = Frame::blank(request.mode.as_str(), request.mode.status_color());
        frame.status_right = "[no buffer]".to_string();
        frame.message = message.as_deref();
        frame.command_line = request.command_line;
        return renderer.draw(&frame);
    };

    buffer.refresh_highlights();
    buffer.consolidate_viewport(rows);

    let range = buffer.viewport.range();
    let highlights = range
        .clone()
        .map(|line| {
            let mut spans = buffer.highlights(line).to_vec();
            if let Some(preview) = request.preview {
                spans.extend_from_slice(preview.get_highlights(line));
            }
            spans
        })
        .collect();

    let frame = Frame {
        lines: &buffer.document.lines()[range.clone()],
        first_line: range.start,
        highlights,
        cursor: Some((
            buffer.viewport.screen_row(buffer.cursor.line()),
            buffer.cursor.column(),
        )),
        status: request.mode.as_str(),
        status_color: request.mode.status_color(),
        status_right: request.status_right,
        message: message.as_deref(),
        command_line: request.command_line,
    };
    renderer.draw(&frame)
}
