//! On-disk format primitives for the PTH token cache.
//!
//! This crate contains:
//! - Format identity constants (`MAGIC`, `VERSION`)
//! - Little-endian byte emission (`BitWriter`)
//! - The string hash shared by every on-disk table (`bernstein_hash`)
//! - The generic chained hash table builder (`HashTableBuilder`, `TableInfo`)
//!
//! Everything in a PTH file is little-endian. The file starts with the
//! 7-byte magic (no terminator), a `u32` version, and a 16-byte prologue of
//! four `u32` section offsets that is patched after the body is written.

pub mod bitwriter;
pub mod hash;
pub mod table;


pub use bitwriter::BitWriter;
pub use hash::bernstein_hash;
pub use table::{HashTableBuilder, TableInfo};

/// Magic bytes at offset 0. Seven bytes, no trailing NUL; readers must
/// compare exactly this width.
pub const MAGIC: &[u8; 7] = b"cfe-pth";

/// Format version written right after the magic. There is no cross-version
/// compatibility: readers reject anything but an exact match.
pub const VERSION: u32 = 1;

/// Size of the reserved prologue: four `u32` section offsets.
pub const PROLOGUE_SIZE: u32 = 16;
