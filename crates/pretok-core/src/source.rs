//! File loading, stat capture, and token location mapping.
//!
//! The source manager owns every buffer that contributes to a translation
//! unit. Files are loaded at most once (deduplicated by path) and keep the
//! stat fields the PTH file table serializes. Buffers are `Arc<str>` so a
//! per-file lexer can hold the text without borrowing the manager.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Handle to a file registered with a [`SourceManager`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct FileId(u32);

impl FileId {
    #[inline]
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A position inside a registered file.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SourceLocation {
    pub file: FileId,
    pub offset: u32,
}

impl SourceLocation {
    #[inline]
    pub fn new(file: FileId, offset: u32) -> Self {
        Self { file, offset }
    }
}

/// Stat fields serialized into the PTH file table, with the on-disk widths.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct FileStat {
    pub inode: u32,
    pub device: u32,
    pub mode: u16,
    pub mtime: u64,
    pub size: u64,
}

impl FileStat {
    #[cfg(unix)]
    pub fn from_metadata(meta: &std::fs::Metadata) -> Self {
        use std::os::unix::fs::MetadataExt;
        Self {
            inode: meta.ino() as u32,
            device: meta.dev() as u32,
            mode: meta.mode() as u16,
            mtime: meta.mtime() as u64,
            size: meta.len(),
        }
    }
}

/// One registered file: path, stat, and (when available) its contents.
pub struct SourceFile {
    pub path: PathBuf,
    pub stat: FileStat,
    buffer: Option<Arc<str>>,
}

impl SourceFile {
    /// The file's contents, if a buffer was loaded.
    #[inline]
    pub fn text(&self) -> Option<&Arc<str>> {
        self.buffer.as_ref()
    }
}

/// Registry of every file contributing to the translation unit.
#[derive(Default)]
pub struct SourceManager {
    files: Vec<SourceFile>,
    by_path: HashMap<PathBuf, FileId>,
}

impl SourceManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `path` from disk and register it, capturing stat information.
    /// Loading the same path twice returns the original id.
    pub fn load_file(&mut self, path: &Path) -> io::Result<FileId> {
        if let Some(&id) = self.by_path.get(path) {
            return Ok(id);
        }
        let meta = std::fs::metadata(path)?;
        let text = std::fs::read_to_string(path)?;
        Ok(self.push(SourceFile {
            path: path.to_path_buf(),
            stat: FileStat::from_metadata(&meta),
            buffer: Some(text.into()),
        }))
    }

    /// Register an in-memory buffer under `path` with default stat fields.
    pub fn add_buffer(&mut self, path: impl Into<PathBuf>, text: &str) -> FileId {
        let path = path.into();
        if let Some(&id) = self.by_path.get(&path) {
            return id;
        }
        self.push(SourceFile {
            path,
            stat: FileStat::default(),
            buffer: Some(text.into()),
        })
    }

    fn push(&mut self, file: SourceFile) -> FileId {
        let id = FileId(self.files.len() as u32);
        self.by_path.insert(file.path.clone(), id);
        self.files.push(file);
        id
    }

    #[inline]
    pub fn lookup(&self, path: &Path) -> Option<FileId> {
        self.by_path.get(path).copied()
    }

    /// # Panics
    /// Panics if `id` was not created by this manager.
    #[inline]
    pub fn file(&self, id: FileId) -> &SourceFile {
        &self.files[id.index()]
    }

    pub fn file_ids(&self) -> impl Iterator<Item = FileId> + '_ {
        (0..self.files.len() as u32).map(FileId)
    }

    #[inline]
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Byte offset of a location within its file. PTH token records store
    /// this value directly.
    #[inline]
    pub fn file_offset(&self, loc: SourceLocation) -> u32 {
        loc.offset
    }

    /// The source text covered by `len` bytes at `loc`.
    ///
    /// # Panics
    /// Panics if the file has no buffer or the span is out of bounds.
    pub fn span_text(&self, loc: SourceLocation, len: u32) -> &str {
        let file = self.file(loc.file);
        let text = file
            .text()
            .unwrap_or_else(|| panic!("no buffer for {}", file.path.display()));
        &text[loc.offset as usize..(loc.offset + len) as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_buffer_deduplicates_by_path() {
        let mut sm = SourceManager::new();
        let a = sm.add_buffer("/main.c", "int x;");
        let b = sm.add_buffer("/main.c", "other");
        assert_eq!(a, b);
        assert_eq!(sm.file_count(), 1);
        assert_eq!(sm.file(a).text().unwrap().as_ref(), "int x;");
    }

    #[test]
    fn span_text_slices_the_buffer() {
        let mut sm = SourceManager::new();
        let id = sm.add_buffer("/main.c", "int x;");
        let loc = SourceLocation::new(id, 4);
        assert_eq!(sm.span_text(loc, 1), "x");
        assert_eq!(sm.file_offset(loc), 4);
    }

    #[test]
    fn load_file_captures_stat() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.c");
        std::fs::write(&path, "int a;\n").unwrap();

        let mut sm = SourceManager::new();
        let id = sm.load_file(&path).unwrap();
        let file = sm.file(id);
        assert_eq!(file.stat.size, 7);
        assert_ne!(file.stat.inode, 0);
        assert_ne!(file.stat.mtime, 0);
        assert_eq!(file.text().unwrap().as_ref(), "int a;\n");

        // Same path, same id.
        assert_eq!(sm.load_file(&path).unwrap(), id);
        assert_eq!(sm.file_count(), 1);
    }
}
