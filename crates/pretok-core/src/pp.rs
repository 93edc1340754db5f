//! Discovery preprocessor.
//!
//! The PTH writer needs every file the translation unit pulls in, but none
//! of the preprocessor's semantics: macro expansion and conditional
//! evaluation are out of scope, so "preprocessing" here is a recursive walk
//! over include directives that loads each referenced file into the source
//! manager exactly once. The token streams the writer serializes are lexed
//! separately, per file, from the raw buffers.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::ident::{Ident, IdentTable, PPKeyword};
use crate::lexer::RawLexer;
use crate::source::{FileId, SourceManager};
use crate::token::{Token, TokenKind};

/// Dialect switches consumed by the lexer.
#[derive(Clone, Copy, Default, Debug)]
pub struct LangOptions {
    /// Return comment tokens from the raw lexer instead of folding them
    /// into the next token's flags.
    pub keep_comments: bool,
}

/// Owns the source manager and identifier table for one translation unit
/// and performs include discovery from the main file.
pub struct Preprocessor {
    sm: SourceManager,
    idents: IdentTable,
    lang: LangOptions,
    include_dirs: Vec<PathBuf>,
    main_file: FileId,
    scanned: HashSet<FileId>,
}

impl Preprocessor {
    pub fn new(sm: SourceManager, main_file: FileId, lang: LangOptions) -> Self {
        Self {
            sm,
            idents: IdentTable::new(),
            lang,
            include_dirs: Vec::new(),
            main_file,
            scanned: HashSet::new(),
        }
    }

    /// Add a directory to the include search path.
    pub fn add_include_dir(&mut self, dir: impl Into<PathBuf>) {
        self.include_dirs.push(dir.into());
    }

    /// Walk the main file and, transitively, every include it resolves,
    /// loading each referenced file into the source manager. Unresolvable
    /// includes are skipped; discovery is best-effort.
    pub fn enter_main_source_file(&mut self) {
        self.scan_file(self.main_file);
    }

    fn scan_file(&mut self, id: FileId) {
        if !self.scanned.insert(id) {
            return;
        }
        let Some(text) = self.sm.file(id).text().cloned() else {
            return;
        };

        let mut lex = RawLexer::with_options(&text, id, &self.lang);
        loop {
            let tok = lex.lex_raw();
            match tok.kind {
                TokenKind::Eof => break,
                TokenKind::Hash if tok.at_start_of_line() => {
                    let directive = lex.lex_raw();
                    if !directive.is(TokenKind::Identifier) {
                        continue;
                    }
                    if !PPKeyword::classify(token_text(&text, &directive)).is_include() {
                        continue;
                    }
                    lex.set_parsing_pp_directive(true);
                    let filename = lex.lex_include_filename();
                    lex.set_parsing_pp_directive(false);
                    let spelling = token_text(&text, &filename);
                    if let Some(target) = self.resolve_include(spelling, id) {
                        self.scan_file(target);
                    }
                }
                _ => {}
            }
        }
    }

    /// Map an include filename token's spelling (`"x.h"` or `<x.h>`) to a
    /// loaded file. Quoted includes search the including file's directory
    /// first, then the include path; angle includes search the include path
    /// only.
    fn resolve_include(&mut self, spelling: &str, including: FileId) -> Option<FileId> {
        let bytes = spelling.as_bytes();
        if bytes.len() < 2 {
            return None;
        }
        let (quoted, name) = match (bytes[0], bytes[bytes.len() - 1]) {
            (b'"', b'"') => (true, &spelling[1..spelling.len() - 1]),
            (b'<', b'>') => (false, &spelling[1..spelling.len() - 1]),
            _ => return None,
        };

        if quoted {
            if let Some(parent) = self.sm.file(including).path.parent() {
                let candidate = parent.join(name);
                if let Some(id) = self.try_load(&candidate) {
                    return Some(id);
                }
            }
        }
        let dirs = std::mem::take(&mut self.include_dirs);
        let mut found = None;
        for dir in &dirs {
            if let Some(id) = self.try_load(&dir.join(name)) {
                found = Some(id);
                break;
            }
        }
        self.include_dirs = dirs;
        found
    }

    fn try_load(&mut self, path: &Path) -> Option<FileId> {
        if !path.is_file() {
            return None;
        }
        self.sm.load_file(path).ok()
    }

    /// Intern the token's spelling, returning its identifier handle.
    pub fn lookup_identifier(&mut self, tok: &Token) -> Ident {
        let spelling = self.sm.span_text(tok.location, tok.len);
        self.idents.intern(spelling)
    }

    /// The token's spelling, sliced out of its file's buffer.
    ///
    /// # Panics
    /// Panics if the token's file has no buffer.
    pub fn spelling(&self, tok: &Token) -> &str {
        self.sm.span_text(tok.location, tok.len)
    }

    #[inline]
    pub fn source_manager(&self) -> &SourceManager {
        &self.sm
    }

    #[inline]
    pub fn source_manager_mut(&mut self) -> &mut SourceManager {
        &mut self.sm
    }

    #[inline]
    pub fn ident_table(&self) -> &IdentTable {
        &self.idents
    }

    #[inline]
    pub fn main_file(&self) -> FileId {
        self.main_file
    }

    #[inline]
    pub fn language_options(&self) -> &LangOptions {
        &self.lang
    }
}

fn token_text<'t>(text: &'t str, tok: &Token) -> &'t str {
    let start = tok.location.offset as usize;
    &text[start..start + tok.len as usize]
}
