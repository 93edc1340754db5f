//! Error types for PTH generation.
//!
//! Only environmental failures are errors: per-file skip conditions
//! (non-absolute path, missing buffer) are silently skipped, and structural
//! violations that cannot occur on well-formed input (imbalanced
//! conditionals, integer range overflows) are assertions.

use std::path::PathBuf;

/// Error producing the PTH output file. The output may be partial; callers
/// should delete it on failure.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("cannot open output file {}: {source}", path.display())]
    OutputOpen {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot write output file {}: {source}", path.display())]
    OutputWrite {
        path: PathBuf,
        source: std::io::Error,
    },
}
