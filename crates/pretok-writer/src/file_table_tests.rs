//! File-table encoding tests for all three key shapes.

use std::path::PathBuf;

use pretok_core::FileStat;
use pretok_format::{bernstein_hash, BitWriter, HashTableBuilder};

use crate::file_table::{FileKey, FileTableInfo, PthEntry};

fn u16_at(buf: &[u8], off: usize) -> u16 {
    u16::from_le_bytes([buf[off], buf[off + 1]])
}

fn u32_at(buf: &[u8], off: usize) -> u32 {
    u32::from_le_bytes([buf[off], buf[off + 1], buf[off + 2], buf[off + 3]])
}

fn u64_at(buf: &[u8], off: usize) -> u64 {
    u32_at(buf, off) as u64 | (u32_at(buf, off + 4) as u64) << 32
}

/// Find the single entry in an emitted one-entry table and return the
/// offset of its `u32 hash`.
fn single_entry(buf: &[u8], dir: u32) -> usize {
    let dir = dir as usize;
    let bucket_count = u32_at(buf, dir) as usize;
    assert_eq!(u32_at(buf, dir + 4), 1);
    let mut entry = None;
    for b in 0..bucket_count {
        let off = u32_at(buf, dir + 8 + 4 * b) as usize;
        if off != 0 {
            assert_eq!(u16_at(buf, off), 1); // bucket length
            assert!(entry.is_none());
            entry = Some(off + 2);
        }
    }
    entry.unwrap()
}

fn emit_single(key: FileKey, value: PthEntry) -> (Vec<u8>, u32) {
    let mut builder = HashTableBuilder::new(FileTableInfo);
    builder.insert(key, value);
    let mut out = BitWriter::new();
    // Offset 0 means "empty bucket"; real tables never start a file.
    out.emit_u32(0);
    let dir = builder.emit(&mut out);
    (out.into_bytes(), dir)
}

#[test]
fn file_key_carries_offsets_and_stat_tail() {
    let stat = FileStat {
        inode: 0x1111,
        device: 0x22,
        mode: 0o100644,
        mtime: 0x1234_5678_9ABC,
        size: 0xDEF0,
    };
    let key = FileKey::File {
        path: PathBuf::from("/usr/include/stdio.h"),
        stat,
    };
    let (buf, dir) = emit_single(key, PthEntry {
        token_off: 0x40,
        ppcond_off: 0x80,
    });

    let e = single_entry(&buf, dir);
    assert_eq!(u32_at(&buf, e), bernstein_hash(b"/usr/include/stdio.h"));
    let key_len = u16_at(&buf, e + 4) as usize;
    assert_eq!(key_len, 1 + "/usr/include/stdio.h".len() + 1);
    let value_len = buf[e + 6] as usize;
    assert_eq!(value_len, 8 + 26); // offsets + stat tail

    let k = e + 7;
    assert_eq!(buf[k], 0x1); // tag
    assert_eq!(&buf[k + 1..k + key_len - 1], b"/usr/include/stdio.h");
    assert_eq!(buf[k + key_len - 1], 0); // NUL, counted in key_len

    let v = k + key_len;
    assert_eq!(u32_at(&buf, v), 0x40);
    assert_eq!(u32_at(&buf, v + 4), 0x80);
    assert_eq!(u32_at(&buf, v + 8), 0x1111);
    assert_eq!(u32_at(&buf, v + 12), 0x22);
    assert_eq!(u16_at(&buf, v + 16), 0o100644);
    assert_eq!(u64_at(&buf, v + 18), 0x1234_5678_9ABC);
    assert_eq!(u64_at(&buf, v + 26), 0xDEF0);
    assert_eq!(dir as usize, (v + value_len + 3) & !3);
}

#[test]
fn directory_key_has_no_value_bytes() {
    let key = FileKey::Directory {
        path: PathBuf::from("/usr/include"),
    };
    let (buf, dir) = emit_single(key, PthEntry {
        token_off: 0,
        ppcond_off: 0,
    });

    let e = single_entry(&buf, dir);
    let key_len = u16_at(&buf, e + 4) as usize;
    assert_eq!(buf[e + 6], 0); // value length
    assert_eq!(buf[e + 7], 0x2); // tag
    // The value region is empty: the key's NUL is the last payload byte.
    let payload_end = e + 7 + key_len;
    assert_eq!(buf[payload_end - 1], 0);
    assert_eq!(dir as usize, (payload_end + 3) & !3);
}

#[test]
fn nonexistent_key_tag_is_zero() {
    let key = FileKey::NonExistent {
        path: PathBuf::from("/no/such/file.h"),
    };
    let (buf, dir) = emit_single(key, PthEntry {
        token_off: 0,
        ppcond_off: 0,
    });

    let e = single_entry(&buf, dir);
    assert_eq!(buf[e + 6], 0); // value length
    assert_eq!(buf[e + 7], 0x0); // tag
}
