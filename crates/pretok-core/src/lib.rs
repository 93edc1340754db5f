//! Raw lexing and source management for the pretok PTH writer.
//!
//! This crate provides the front end the writer consumes:
//! - `token` - raw token kinds and the in-memory token
//! - `ident` - identifier interning and preprocessor-keyword classification
//! - `source` - file loading, stat capture, and location mapping
//! - `lexer` - the raw lexer with start-of-line tracking and the
//!   include-filename mode
//! - `pp` - the discovery preprocessor that walks includes to populate the
//!   source manager

pub mod ident;
pub mod lexer;
pub mod pp;
pub mod source;
pub mod token;

#[cfg(test)]
mod pp_tests;

pub use ident::{Ident, IdentTable, PPKeyword};
pub use lexer::RawLexer;
pub use pp::{LangOptions, Preprocessor};
pub use source::{FileId, FileStat, SourceFile, SourceLocation, SourceManager};
pub use token::{Token, TokenKind};
