use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use super::{Document, DocumentBuffer};
use crate::error::{EditorError, Result};
use crate::syntax::highlighter_for_path;

/// Line-oriented file access
pub trait FileSystem {
    fn read_lines(&self, path: &Path) -> Result<Vec<String>>;

    /// Write every line followed by a newline
    fn write_lines(&self, path: &Path, lines: &[String]) -> Result<()>;
}

/// The real file system
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl FileSystem for LocalFileSystem {
    fn read_lines(&self, path: &Path) -> Result<Vec<String>> {
        let content = std::fs::read_to_string(path).map_err(|source| EditorError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(content.lines().map(String::from).collect())
    }

    fn write_lines(&self, path: &Path, lines: &[String]) -> Result<()> {
        let io_error = |source| EditorError::Io {
            path: path.to_path_buf(),
            source,
        };
        let file = std::fs::File::create(path).map_err(io_error)?;
        let mut writer = BufWriter::new(file);
        for line in lines {
            writeln!(writer, "{}", line).map_err(io_error)?;
        }
        writer.flush().map_err(io_error)
    }
}

/// In-memory file system; clones share the same files
#[derive(Debug, Clone, Default)]
pub struct MemoryFileSystem {
    files: Rc<RefCell<HashMap<PathBuf, Vec<String>>>>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, path: impl Into<PathBuf>, lines: &[&str]) {
        self.files
            .borrow_mut()
            .insert(path.into(), lines.iter().map(|s| s.to_string()).collect());
    }

    pub fn get(&self, path: impl AsRef<Path>) -> Option<Vec<String>> {
        self.files.borrow().get(path.as_ref()).cloned()
    }
}

impl FileSystem for MemoryFileSystem {
    fn read_lines(&self, path: &Path) -> Result<Vec<String>> {
        self.get(path).ok_or_else(|| EditorError::Io {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        })
    }

    fn write_lines(&self, path: &Path, lines: &[String]) -> Result<()> {
        self.files
            .borrow_mut()
            .insert(path.to_path_buf(), lines.to_vec());
        Ok(())
    }
}

/// All open buffers, in the order they were opened, plus the active one
pub struct DocumentBufferManager {
    buffers: Vec<DocumentBuffer>,
    /// Index into `buffers`
    active: Option<usize>,
    fs: Box<dyn FileSystem>,
}

impl DocumentBufferManager {
    pub fn new() -> Self {
        Self::with_file_system(Box::new(LocalFileSystem))
    }

    pub fn with_file_system(fs: Box<dyn FileSystem>) -> Self {
        Self {
            buffers: Vec::new(),
            active: None,
            fs,
        }
    }

    pub fn buffers(&self) -> &[DocumentBuffer] {
        &self.buffers
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn active_buffer(&self) -> Option<&DocumentBuffer> {
        self.active.and_then(|idx| self.buffers.get(idx))
    }

    pub fn active_buffer_mut(&mut self) -> Option<&mut DocumentBuffer> {
        self.active.and_then(|idx| self.buffers.get_mut(idx))
    }

    fn push_active(&mut self, buffer: DocumentBuffer) {
        self.buffers.push(buffer);
        self.active = Some(self.buffers.len() - 1);
    }

    /// Open `path` in a new buffer and make it active.
    ///
    /// On failure nothing changes: no buffer is added and the active buffer stays.
    pub fn load_file(&mut self, path: &Path) -> Result<()> {
        tracing::info!("Loading file '{}'", path.display());
        let lines = self.fs.read_lines(path).map_err(|e| {
            tracing::error!("Failed to read '{}': {}", path.display(), e);
            e
        })?;
        tracing::info!("Loaded {} lines from '{}'", lines.len(), path.display());

        let document = Document::new(lines, Some(path.to_path_buf()));
        let buffer = DocumentBuffer::with_highlighter(document, highlighter_for_path(path));
        self.push_active(buffer);
        Ok(())
    }

    /// Write the active buffer to `path`, or to the path stored in its document.
    ///
    /// On success the path is remembered for later saves.
    pub fn save_buffer(&mut self, path: Option<&Path>) -> Result<()> {
        let Some(buffer) = self.active.and_then(|idx| self.buffers.get_mut(idx)) else {
            return Err(EditorError::NoActiveBuffer);
        };

        let Some(path) = path
            .map(Path::to_path_buf)
            .or_else(|| buffer.document.path.clone())
        else {
            tracing::error!("Cannot save buffer: no path given and none stored in the buffer");
            return Err(EditorError::NoPath);
        };

        tracing::info!("Saving buffer to '{}'", path.display());
        if let Err(e) = self.fs.write_lines(&path, buffer.document.lines()) {
            tracing::error!("Failed to save buffer to '{}': {}", path.display(), e);
            return Err(e);
        }

        buffer.document.path = Some(path);
        Ok(())
    }

    /// Open a new buffer holding one empty line and make it active
    pub fn load_empty_buffer(&mut self) {
        tracing::info!("Creating empty buffer");
        self.push_active(DocumentBuffer::new(Document::empty()));
    }
}

impl Default for DocumentBufferManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> (DocumentBufferManager, MemoryFileSystem) {
        let fs = MemoryFileSystem::new();
        (DocumentBufferManager::with_file_system(Box::new(fs.clone())), fs)
    }

    #[test]
    fn test_load_makes_buffer_active() {
        let (mut manager, fs) = manager();
        fs.insert("a.txt", &["one", "two"]);
        manager.load_file(Path::new("a.txt")).unwrap();
        let buffer = manager.active_buffer().unwrap();
        assert_eq!(buffer.document.lines(), &["one", "two"]);
        assert_eq!(buffer.document.path.as_deref(), Some(Path::new("a.txt")));
    }

    #[test]
    fn test_failed_load_changes_nothing() {
        let (mut manager, _fs) = manager();
        manager.load_empty_buffer();
        assert!(manager.load_file(Path::new("missing.txt")).is_err());
        assert_eq!(manager.buffers().len(), 1);
        assert_eq!(manager.active_index(), Some(0));
    }

    #[test]
    fn test_save_requires_buffer_and_path() {
        let (mut manager, fs) = manager();
        assert!(matches!(manager.save_buffer(None), Err(EditorError::NoActiveBuffer)));

        manager.load_empty_buffer();
        assert!(matches!(manager.save_buffer(None), Err(EditorError::NoPath)));

        manager.save_buffer(Some(Path::new("out.txt"))).unwrap();
        assert_eq!(fs.get("out.txt"), Some(vec![String::new()]));

        // the path is remembered
        manager.active_buffer_mut().unwrap().document.insert(0, 0, "hi");
        manager.save_buffer(None).unwrap();
        assert_eq!(fs.get("out.txt"), Some(vec!["hi".to_string()]));
    }

    #[test]
    fn test_failed_save_keeps_path() {
        let dir = tempfile::tempdir().unwrap();
        let original = dir.path().join("a.txt");
        std::fs::write(&original, "one\n").unwrap();
        let target = dir.path().join("missing_dir").join("out.txt");

        let mut manager = DocumentBufferManager::with_file_system(Box::new(LocalFileSystem));
        manager.load_file(&original).unwrap();
        assert!(matches!(
            manager.save_buffer(Some(&target)),
            Err(EditorError::Io { .. })
        ));
        let buffer = manager.active_buffer().unwrap();
        assert_eq!(buffer.document.path.as_deref(), Some(original.as_path()));
        assert!(!target.exists());

        let mut editor = crate::Editor::with_buffers(Default::default(), manager);
        assert!(!editor.save(Some(&target)));
        assert!(editor.status_message().unwrap().starts_with("Cannot save"));
        let buffer = editor.buffers.active_buffer().unwrap();
        assert_eq!(buffer.document.path.as_deref(), Some(original.as_path()));
        assert_eq!(std::fs::read_to_string(&original).unwrap(), "one\n");
    }

    #[test]
    fn test_local_file_system_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("file.txt");
        let fs = LocalFileSystem;
        fs.write_lines(&path, &["a".to_string(), "".to_string(), "b".to_string()])
            .unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a\n\nb\n");
        assert_eq!(fs.read_lines(&path).unwrap(), vec!["a", "", "b"]);
        assert!(fs.read_lines(&dir.path().join("nope")).is_err());
    }
}
