pub mod commands;
pub mod config;
pub mod editor;
pub mod error;
pub mod input;
pub mod logging;
pub mod modes;
pub mod syntax;
pub mod terminal;
pub mod view;

pub use config::{load_config, Settings};
pub use editor::{Cursor, Document, DocumentBuffer, DocumentBufferManager, Editor};
pub use error::{EditorError, Result};
pub use modes::{ModeMachine, ModeName};
pub use terminal::Terminal;
