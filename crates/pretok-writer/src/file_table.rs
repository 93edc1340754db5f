//! The file-keyed hash table: path -> (token region, conditional table).
//!
//! Keys are tagged: a real file (with its stat tail), a directory, or a
//! path known not to exist. Only file keys carry token data; the other two
//! shapes exist so a reader can cache negative and directory lookups. The
//! writer inserts file keys only.

use std::path::PathBuf;

use pretok_core::FileStat;
use pretok_format::{bernstein_hash, BitWriter, TableInfo};

/// Value of a file-table entry: absolute offsets of the file's token
/// region and of its preprocessor-conditional table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PthEntry {
    pub token_off: u32,
    pub ppcond_off: u32,
}

/// A file-table key. The discriminator is one byte on disk: 0x1 file,
/// 0x2 directory, 0x0 nonexistent.
pub enum FileKey {
    File { path: PathBuf, stat: FileStat },
    Directory { path: PathBuf },
    NonExistent { path: PathBuf },
}

impl FileKey {
    pub fn tag(&self) -> u8 {
        match self {
            FileKey::File { .. } => 0x1,
            FileKey::Directory { .. } => 0x2,
            FileKey::NonExistent { .. } => 0x0,
        }
    }

    pub fn path(&self) -> &PathBuf {
        match self {
            FileKey::File { path, .. }
            | FileKey::Directory { path }
            | FileKey::NonExistent { path } => path,
        }
    }

    #[cfg(unix)]
    fn name_bytes(&self) -> &[u8] {
        use std::os::unix::ffi::OsStrExt;
        self.path().as_os_str().as_bytes()
    }

    /// Length of the stat tail in the value encoding. Directory and
    /// nonexistent keys carry none.
    fn stat_len(&self) -> u32 {
        match self {
            FileKey::File { .. } => 4 + 4 + 2 + 8 + 8,
            FileKey::Directory { .. } | FileKey::NonExistent { .. } => 0,
        }
    }
}

/// Encoding policy for the file table.
///
/// Key bytes: tag, name, NUL (all counted in `key_len`). Value bytes for a
/// file key: `u32 token_off`, `u32 ppcond_off`, then the stat tail
/// `u32 inode, u32 device, u16 mode, u64 mtime, u64 size`; nothing for the
/// other shapes.
pub struct FileTableInfo;

impl TableInfo for FileTableInfo {
    type Key = FileKey;
    type Value = PthEntry;

    fn hash(&self, key: &FileKey) -> u32 {
        bernstein_hash(key.name_bytes())
    }

    fn emit_key_value_lengths(
        &mut self,
        out: &mut BitWriter,
        key: &FileKey,
        _value: &PthEntry,
    ) -> (u32, u32) {
        // Tag byte + name + NUL. The u16 emission rejects names that would
        // overflow the on-disk key length.
        let n = key.name_bytes().len() as u32 + 1 + 1;
        out.emit_u16(n);

        let m = key.stat_len()
            + match key {
                FileKey::File { .. } => 4 + 4,
                _ => 0,
            };
        out.emit_u8(m as u8);
        (n, m)
    }

    fn emit_key(&mut self, out: &mut BitWriter, key: &FileKey, key_len: u32) {
        out.emit_u8(key.tag());
        out.emit_bytes(key.name_bytes());
        out.emit_u8(0);
        debug_assert_eq!(key.name_bytes().len() as u32 + 2, key_len);
    }

    fn emit_value(&mut self, out: &mut BitWriter, key: &FileKey, value: &PthEntry, _value_len: u32) {
        if let FileKey::File { stat, .. } = key {
            out.emit_u32(value.token_off);
            out.emit_u32(value.ppcond_off);
            out.emit_u32(stat.inode);
            out.emit_u32(stat.device);
            out.emit_u16(stat.mode as u32);
            out.emit_u64(stat.mtime);
            out.emit_u64(stat.size);
        }
    }
}
