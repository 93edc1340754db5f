//! Pre-Tokenized Header writer.
//!
//! Serializes the raw token streams of a translation unit — the main file
//! plus every header discovered through its includes — into one PTH cache
//! file. A reader can then skip re-lexing and re-interning on later
//! compilations of the same inputs.
//!
//! The file contains, in emission order: the magic and version, a patched
//! four-offset prologue, a 4-byte-aligned token region and a conditional
//! jump table per file, the identifier tables (name-keyed hash table plus
//! a dense ID-to-name-offset table), the deduplicated spelling pool for
//! literal tokens, and the file-keyed hash table.
//!
//! Entry point: [`cache_tokens`].

mod error;
mod file_table;
mod registry;
mod spelling;
mod writer;

#[cfg(test)]
mod file_table_tests;
#[cfg(test)]
mod spelling_tests;

pub use error::WriteError;
pub use file_table::{FileKey, FileTableInfo, PthEntry};
pub use registry::IdentifierRegistry;
pub use spelling::SpellingPool;
pub use writer::{cache_tokens, PthWriter};
