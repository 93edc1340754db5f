//! The PTH assembler: per-token encoding, the per-file lexer pass with
//! conditional backpatching, section ordering, and the prologue patch.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use pretok_core::{FileId, PPKeyword, Preprocessor, RawLexer, Token, TokenKind};
use pretok_format::{BitWriter, HashTableBuilder, MAGIC, PROLOGUE_SIZE, VERSION};

use crate::error::WriteError;
use crate::file_table::{FileKey, FileTableInfo, PthEntry};
use crate::registry::IdentifierRegistry;
use crate::spelling::SpellingPool;

/// Lex every contributing file and serialize the PTH body.
///
/// The writer owns the output buffer, the persistent-ID registry, the
/// spelling pool, and the file table; it borrows the preprocessor for
/// identifier lookup and spellings. Nothing it accumulates is observable
/// until [`generate`](PthWriter::generate) runs.
pub struct PthWriter<'a> {
    out: BitWriter,
    pp: &'a mut Preprocessor,
    ids: IdentifierRegistry,
    strings: SpellingPool,
    files: HashTableBuilder<FileTableInfo>,
}

impl<'a> PthWriter<'a> {
    pub fn new(pp: &'a mut Preprocessor) -> Self {
        Self {
            out: BitWriter::new(),
            pp,
            ids: IdentifierRegistry::new(),
            strings: SpellingPool::new(),
            files: HashTableBuilder::new(FileTableInfo),
        }
    }

    /// Serialize one token as a 12-byte record: the packed
    /// kind/flags/length word, the payload (spelling-pool offset for
    /// literals, persistent ID otherwise), and the file offset.
    fn emit_token(&mut self, tok: &Token) {
        assert!(
            tok.len <= 0xFFFF,
            "token length does not fit in 16 bits: {}",
            tok.len
        );
        self.out
            .emit_u32((tok.kind as u32) | ((tok.flags as u32) << 8) | (tok.len << 16));

        if tok.is_literal() {
            let spelling = self.pp.spelling(tok);
            let offset = self.strings.intern(spelling.as_bytes());
            self.out.emit_u32(offset);
        } else {
            let id = self.ids.resolve(tok.ident);
            self.out.emit_u32(id);
        }

        self.out
            .emit_u32(self.pp.source_manager().file_offset(tok.location));
    }

    /// Lex one file to its end, emitting its token region and building its
    /// preprocessor-conditional table.
    ///
    /// Conditionals are linked by two-pass backpatching: `#if`-likes append
    /// an entry with target 0 and push its index; `#elif`/`#else` patch the
    /// open entry to point here, then open again at this index; `#endif`
    /// patches the open entry and appends a self-referential entry, written
    /// to disk as 0.
    ///
    /// # Panics
    /// Panics on imbalanced conditionals; the input is expected to be a
    /// well-formed translation unit.
    fn lex_tokens(&mut self, lex: &mut RawLexer<'_>) -> PthEntry {
        // Token records are read back as 4-byte words; align the region.
        self.out.pad_to(4);
        let file_start = self.out.tell();

        // (hash offset within this file's region, partner index)
        let mut ppcond: Vec<(u32, u32)> = Vec::new();
        let mut start_cond: Vec<usize> = Vec::new();
        let mut parsing_directive = false;

        let mut tok = lex.lex_raw();
        loop {
            // A directive ends at the next line boundary (or EOF): emit the
            // end-of-directive marker, then keep processing this token.
            if (tok.at_start_of_line() || tok.is(TokenKind::Eof)) && parsing_directive {
                let mut eod = tok;
                eod.kind = TokenKind::Eod;
                eod.clear_flag(Token::START_OF_LINE);
                eod.ident = None;
                self.emit_token(&eod);
                parsing_directive = false;
            }

            if tok.is(TokenKind::Identifier) {
                tok.ident = Some(self.pp.lookup_identifier(&tok));
                self.emit_token(&tok);
                tok = lex.lex_raw();
                continue;
            }

            if tok.is(TokenKind::Hash) && tok.at_start_of_line() {
                debug_assert!(!parsing_directive);
                let hash_off = self.out.tell() - file_start;
                self.emit_token(&tok);

                tok = lex.lex_raw();
                if !tok.is(TokenKind::Identifier) {
                    self.emit_token(&tok);
                    if tok.is(TokenKind::Eof) {
                        break;
                    }
                    tok = lex.lex_raw();
                    continue;
                }

                let ident = self.pp.lookup_identifier(&tok);
                tok.ident = Some(ident);
                let keyword = self.pp.ident_table().pp_keyword(ident);
                parsing_directive = true;

                match keyword {
                    PPKeyword::Include | PPKeyword::Import | PPKeyword::IncludeNext => {
                        self.emit_token(&tok);
                        lex.set_parsing_pp_directive(true);
                        tok = lex.lex_include_filename();
                        lex.set_parsing_pp_directive(false);
                        if tok.is(TokenKind::Identifier) {
                            tok.ident = Some(self.pp.lookup_identifier(&tok));
                        }
                        // The filename token is emitted below.
                    }
                    PPKeyword::If | PPKeyword::Ifdef | PPKeyword::Ifndef => {
                        start_cond.push(ppcond.len());
                        ppcond.push((hash_off, 0));
                    }
                    PPKeyword::Endif => {
                        let index = ppcond.len() as u32;
                        let open = start_cond
                            .pop()
                            .expect("imbalanced preprocessor conditionals");
                        assert_eq!(ppcond[open].1, 0, "conditional closed twice");
                        ppcond[open].1 = index;
                        // Self-referential sentinel, rewritten to 0 on disk.
                        ppcond.push((hash_off, index));
                        self.emit_token(&tok);

                        // Some files have gibberish on the same line as the
                        // #endif; discard it, then reprocess the token we
                        // stopped on without lexing a fresh one.
                        loop {
                            tok = lex.lex_raw();
                            if tok.is(TokenKind::Eof) || tok.at_start_of_line() {
                                break;
                            }
                        }
                        continue;
                    }
                    PPKeyword::Elif | PPKeyword::Else => {
                        // Both a close and a re-open of the block.
                        let index = ppcond.len() as u32;
                        let open = start_cond
                            .pop()
                            .expect("imbalanced preprocessor conditionals");
                        assert_eq!(ppcond[open].1, 0, "conditional closed twice");
                        ppcond[open].1 = index;
                        ppcond.push((hash_off, 0));
                        start_cond.push(index as usize);
                    }
                    _ => {}
                }
            }

            self.emit_token(&tok);
            if tok.is(TokenKind::Eof) {
                break;
            }
            tok = lex.lex_raw();
        }

        assert!(
            start_cond.is_empty(),
            "imbalanced preprocessor conditionals"
        );

        let ppcond_off = self.out.tell();
        self.out.emit_u32(ppcond.len() as u32);
        for (i, &(hash_off, target)) in ppcond.iter().enumerate() {
            self.out.emit_u32(hash_off);
            assert_ne!(target, 0, "conditional entry not backpatched");
            // #endif entries go out as 0 so readers can sanity-check.
            self.out
                .emit_u32(if target as usize == i { 0 } else { target });
        }

        PthEntry {
            token_off: file_start,
            ppcond_off,
        }
    }

    /// Assemble the whole PTH image: magic, version, prologue placeholder,
    /// per-file sections, identifier tables, spelling pool, file table,
    /// then the prologue patch.
    pub fn generate(mut self) -> Vec<u8> {
        self.out.emit_bytes(MAGIC);
        self.out.emit_u32(VERSION);

        let prologue_off = self.out.tell();
        for _ in 0..PROLOGUE_SIZE {
            self.out.emit_u8(0);
        }

        let file_ids: Vec<FileId> = self.pp.source_manager().file_ids().collect();
        for fid in file_ids {
            let (path, stat, text) = {
                let file = self.pp.source_manager().file(fid);
                if !file.path.is_absolute() {
                    continue;
                }
                let Some(text) = file.text().cloned() else {
                    continue;
                };
                (file.path.clone(), file.stat, text)
            };

            let opts = *self.pp.language_options();
            let mut lex = RawLexer::with_options(&text, fid, &opts);
            let entry = self.lex_tokens(&mut lex);
            self.files.insert(FileKey::File { path, stat }, entry);
        }

        let (id_table_off, name_dir_off) =
            self.ids.emit_tables(&mut self.out, self.pp.ident_table());
        let spelling_off = self.strings.emit(&mut self.out);
        let file_dir_off = self.files.emit(&mut self.out);

        self.out.seek_to(prologue_off);
        self.out.emit_u32(name_dir_off);
        self.out.emit_u32(id_table_off);
        self.out.emit_u32(file_dir_off);
        self.out.emit_u32(spelling_off);

        self.out.into_bytes()
    }
}

/// Cache the translation unit's tokens into `output`.
///
/// Runs include discovery so the source manager holds every contributing
/// file, then writes the PTH image. On error the output may exist and be
/// partial; callers should delete it.
pub fn cache_tokens(pp: &mut Preprocessor, output: &Path) -> Result<(), WriteError> {
    pp.enter_main_source_file();

    let mut file = File::create(output).map_err(|source| WriteError::OutputOpen {
        path: output.to_path_buf(),
        source,
    })?;

    let bytes = PthWriter::new(pp).generate();
    file.write_all(&bytes).map_err(|source| WriteError::OutputWrite {
        path: output.to_path_buf(),
        source,
    })?;
    Ok(())
}
