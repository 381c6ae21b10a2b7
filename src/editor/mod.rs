mod buffer;
mod cursor;
mod document;
mod manager;

pub use buffer::DocumentBuffer;
pub use cursor::Cursor;
pub use document::{byte_to_char_idx, char_to_byte_idx, ChangeHandler, Document};
pub use manager::{DocumentBufferManager, FileSystem, LocalFileSystem, MemoryFileSystem};

use std::path::Path;

use crate::config::Settings;

/// State shared by all modes: the open buffers, settings and the status message
pub struct Editor {
    pub buffers: DocumentBufferManager,
    pub settings: Settings,
    /// Message shown on the status line until the next keystroke
    status_message: Option<String>,
}

impl Editor {
    pub fn new(settings: Settings) -> Self {
        Self::with_buffers(settings, DocumentBufferManager::new())
    }

    pub fn with_buffers(settings: Settings, buffers: DocumentBufferManager) -> Self {
        Self {
            buffers,
            settings,
            status_message: None,
        }
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    /// Load a file into a new active buffer, reporting the outcome on the status line
    pub fn load_file(&mut self, path: &Path) -> bool {
        match self.buffers.load_file(path) {
            Ok(()) => {
                self.set_status(format!("\"{}\" loaded", path.display()));
                true
            }
            Err(e) => {
                self.set_status(format!("Cannot load: {}", e));
                false
            }
        }
    }

    /// Save the active buffer, reporting the outcome on the status line
    pub fn save(&mut self, path: Option<&Path>) -> bool {
        match self.buffers.save_buffer(path) {
            Ok(()) => {
                let name = self
                    .buffers
                    .active_buffer()
                    .map(DocumentBuffer::display_name)
                    .unwrap_or_default();
                self.set_status(format!("\"{}\" written", name));
                true
            }
            Err(e) => {
                self.set_status(format!("Cannot save: {}", e));
                false
            }
        }
    }
}
