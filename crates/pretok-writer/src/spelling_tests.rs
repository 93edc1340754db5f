//! Spelling pool tests.

use pretok_format::BitWriter;

use crate::spelling::SpellingPool;

#[test]
fn identical_spellings_share_an_offset() {
    let mut pool = SpellingPool::new();
    let a = pool.intern(b"abc");
    let b = pool.intern(b"abc");
    assert_eq!(a, b);
    assert_eq!(pool.len(), 1);
}

#[test]
fn offsets_are_nul_separated() {
    let mut pool = SpellingPool::new();
    assert_eq!(pool.intern(b"abc"), 0);
    assert_eq!(pool.intern(b"xy"), 4); // "abc\0" is 4 bytes
    assert_eq!(pool.intern(b""), 7); // "xy\0" is 3 bytes
    assert_eq!(pool.intern(b"abc"), 0); // still the original offset
}

#[test]
fn emit_writes_insertion_order_with_terminators() {
    let mut pool = SpellingPool::new();
    pool.intern(b"42");
    pool.intern(b"\"s\"");
    pool.intern(b"42");

    let mut out = BitWriter::new();
    out.emit_u32(0xFFFF_FFFF); // preceding section
    let start = pool.emit(&mut out);
    let buf = out.into_bytes();

    assert_eq!(start, 4);
    assert_eq!(&buf[start as usize..], b"42\0\"s\"\0");
}

#[test]
fn empty_pool_emits_nothing() {
    let pool = SpellingPool::new();
    let mut out = BitWriter::new();
    let start = pool.emit(&mut out);
    assert_eq!(start, 0);
    assert!(out.into_bytes().is_empty());
}
