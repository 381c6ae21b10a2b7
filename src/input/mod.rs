use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::fmt;

/// A keystroke with control keys normalized to stable names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// A printable character (including space)
    Char(char),
    /// A control chord, e.g. `Ctrl('r')`
    Ctrl(char),
    Escape,
    Enter,
    Backspace,
    Delete,
    Tab,
    /// Anything else (arrows, function keys, ...)
    Unknown,
}

impl Key {
    pub fn is_printable(&self) -> bool {
        matches!(self, Key::Char(c) if !c.is_control())
    }
}

impl From<KeyEvent> for Key {
    fn from(key: KeyEvent) -> Self {
        match (key.modifiers, key.code) {
            (m, KeyCode::Char('[')) if m.contains(KeyModifiers::CONTROL) => Key::Escape,
            (m, KeyCode::Char(c)) if m.contains(KeyModifiers::CONTROL) => {
                Key::Ctrl(c.to_ascii_lowercase())
            }
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => Key::Char(c),
            (_, KeyCode::Esc) => Key::Escape,
            (_, KeyCode::Enter) => Key::Enter,
            (_, KeyCode::Backspace) => Key::Backspace,
            (_, KeyCode::Delete) => Key::Delete,
            (_, KeyCode::Tab) => Key::Tab,
            _ => Key::Unknown,
        }
    }
}

/// Where keystrokes come from.
///
/// `read` waits for at most one input unit and returns `None` when nothing
/// arrived within the source's own timeout.
pub trait KeySource {
    fn read(&mut self) -> anyhow::Result<Option<Key>>;
}

/// Commands recognized in Normal mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalCommand {
    MoveLeft,
    MoveDown,
    MoveUp,
    MoveRight,
    LineStart,
    LineEnd,
    LastLine,
    FirstLine,
    DeleteChar,
    DeleteCharBefore,
    DeleteLine,
    Insert,
    Append,
    InsertLineStart,
    AppendLineEnd,
    OpenLineBelow,
    OpenLineAbove,
    EnterCommand,
    SaveAndQuit,
    Quit,
}

/// Every Normal-mode key sequence and the command it triggers
pub const NORMAL_COMMANDS: &[(&[char], NormalCommand)] = &[
    // movement
    (&['h'], NormalCommand::MoveLeft),
    (&['j'], NormalCommand::MoveDown),
    (&['k'], NormalCommand::MoveUp),
    (&['l'], NormalCommand::MoveRight),
    (&['H'], NormalCommand::LineStart),
    (&['J'], NormalCommand::LastLine),
    (&['K'], NormalCommand::FirstLine),
    (&['L'], NormalCommand::LineEnd),
    // deletion
    (&['x'], NormalCommand::DeleteChar),
    (&['X'], NormalCommand::DeleteCharBefore),
    (&['d', 'd'], NormalCommand::DeleteLine),
    // insert mode entry
    (&['i'], NormalCommand::Insert),
    (&['a'], NormalCommand::Append),
    (&['I'], NormalCommand::InsertLineStart),
    (&['A'], NormalCommand::AppendLineEnd),
    (&['o'], NormalCommand::OpenLineBelow),
    (&['O'], NormalCommand::OpenLineAbove),
    // command mode entry
    (&[':'], NormalCommand::EnterCommand),
    // quitting
    (&['Z', 'Z'], NormalCommand::SaveAndQuit),
    (&['Z', 'Q'], NormalCommand::Quit),
];

/// Result of feeding one keystroke to a [`KeyBuffer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// The keys so far start at least one command; wait for more
    Pending,
    /// A complete command was typed; the buffer has been cleared
    Command(NormalCommand),
    /// The keys match nothing; the buffer has been cleared
    Discarded,
}

/// Accumulates Normal-mode keystrokes until they form a command
#[derive(Debug, Clone, Default)]
pub struct KeyBuffer {
    keys: Vec<char>,
}

impl KeyBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Feed one keystroke. `None` (no input) leaves the buffer untouched.
    pub fn push(&mut self, key: Option<Key>) -> KeyAction {
        match key {
            None => return KeyAction::Pending,
            Some(Key::Char(c)) => self.keys.push(c),
            Some(_) => {
                self.clear();
                return KeyAction::Discarded;
            }
        }

        if let Some(command) = self.command() {
            self.clear();
            KeyAction::Command(command)
        } else if self.is_prefix() {
            KeyAction::Pending
        } else {
            self.clear();
            KeyAction::Discarded
        }
    }

    fn command(&self) -> Option<NormalCommand> {
        NORMAL_COMMANDS
            .iter()
            .find(|(keys, _)| *keys == self.keys.as_slice())
            .map(|(_, command)| *command)
    }

    fn is_prefix(&self) -> bool {
        NORMAL_COMMANDS
            .iter()
            .any(|(keys, _)| keys.starts_with(&self.keys))
    }
}

impl fmt::Display for KeyBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.keys.iter().try_for_each(|c| write!(f, "{}", c))
    }
}
