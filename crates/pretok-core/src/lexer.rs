//! Raw lexer: a thin wrapper over the logos stream.
//!
//! The wrapper filters trivia (whitespace, newlines, comments) while
//! folding it into the next real token's flags: a token after a newline is
//! at start of line, a token after horizontal whitespace or a comment has
//! leading space. A block comment containing a newline counts as a line
//! break. Unrecognized bytes come back as `Unknown` tokens; the end of the
//! source is an `Eof` token with a zero length.
//!
//! Include filenames need their own mode because `<stdio.h>` is one token
//! inside an include directive and six tokens anywhere else; see
//! [`lex_include_filename`](RawLexer::lex_include_filename).

use logos::Logos;

use crate::pp::LangOptions;
use crate::source::{FileId, SourceLocation};
use crate::token::{Token, TokenKind};

pub struct RawLexer<'src> {
    inner: logos::Lexer<'src, TokenKind>,
    file: FileId,
    source_len: u32,
    at_line_start: bool,
    leading_space: bool,
    parsing_pp_directive: bool,
    keep_comments: bool,
}

impl<'src> RawLexer<'src> {
    pub fn new(text: &'src str, file: FileId) -> Self {
        Self::with_options(text, file, &LangOptions::default())
    }

    pub fn with_options(text: &'src str, file: FileId, opts: &LangOptions) -> Self {
        Self {
            inner: TokenKind::lexer(text),
            file,
            source_len: text.len() as u32,
            at_line_start: true,
            leading_space: false,
            parsing_pp_directive: false,
            keep_comments: opts.keep_comments,
        }
    }

    /// Mark that the consumer is inside a preprocessor directive. Only the
    /// include-filename mode depends on it.
    pub fn set_parsing_pp_directive(&mut self, value: bool) {
        self.parsing_pp_directive = value;
    }

    /// Lex the next non-trivia token. At the end of the source this returns
    /// an `Eof` token (repeatedly, if called again).
    pub fn lex_raw(&mut self) -> Token {
        loop {
            let Some(result) = self.inner.next() else {
                return self.token_at(TokenKind::Eof, self.source_len, 0);
            };
            let kind = result.unwrap_or(TokenKind::Unknown);
            match kind {
                TokenKind::Whitespace => self.leading_space = true,
                TokenKind::Newline => {
                    self.at_line_start = true;
                    self.leading_space = false;
                }
                TokenKind::LineComment | TokenKind::BlockComment => {
                    if self.keep_comments {
                        let span = self.inner.span();
                        return self.token_at(kind, span.start as u32, span.len() as u32);
                    }
                    if self.inner.slice().contains('\n') {
                        self.at_line_start = true;
                        self.leading_space = false;
                    } else {
                        self.leading_space = true;
                    }
                }
                _ => {
                    let span = self.inner.span();
                    return self.token_at(kind, span.start as u32, span.len() as u32);
                }
            }
        }
    }

    /// Lex the filename token of an include directive: horizontal
    /// whitespace, then either `<...>` as a single angle-string token or
    /// whatever `lex_raw` produces (a quoted filename lexes as a plain
    /// string literal). Requires directive mode.
    pub fn lex_include_filename(&mut self) -> Token {
        debug_assert!(self.parsing_pp_directive);

        let rem = self.inner.remainder();
        let skipped = rem.len() - rem.trim_start_matches([' ', '\t']).len();
        if skipped > 0 {
            self.inner.bump(skipped);
            self.leading_space = true;
        }

        let rem = self.inner.remainder();
        if rem.starts_with('<') {
            if let Some(close) = rem.find('>') {
                if !rem[..close].contains('\n') {
                    let start = self.inner.span().end as u32;
                    let len = (close + 1) as u32;
                    self.inner.bump(close + 1);
                    return self.token_at(TokenKind::AngleStringLiteral, start, len);
                }
            }
        }
        self.lex_raw()
    }

    fn token_at(&mut self, kind: TokenKind, offset: u32, len: u32) -> Token {
        let mut flags = 0;
        if self.at_line_start {
            flags |= Token::START_OF_LINE;
        }
        if self.leading_space {
            flags |= Token::LEADING_SPACE;
        }
        self.at_line_start = false;
        self.leading_space = false;
        Token::new(kind, flags, len, SourceLocation::new(self.file, offset))
    }
}
