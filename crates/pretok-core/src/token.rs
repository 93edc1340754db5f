//! Raw token kinds and the in-memory token.
//!
//! `TokenKind` doubles as the logos lexer definition: recognized kinds carry
//! `token`/`regex` patterns, synthesized kinds (`Eof`, `Eod`,
//! `AngleStringLiteral`, `Unknown`) carry none and are produced by
//! [`RawLexer`](crate::lexer::RawLexer) itself.
//!
//! The discriminant is part of the PTH file format (token records store it
//! in one byte), so variants must not be reordered once a format version is
//! published.

use logos::Logos;

use crate::ident::Ident;
use crate::source::SourceLocation;

/// All raw token kinds. `#[repr(u8)]`: the discriminant is the on-disk kind.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TokenKind {
    /// End of file. Synthesized when the source is exhausted.
    Eof = 0,
    /// End of preprocessor directive. Synthesized by the writer, never
    /// produced by the lexer.
    Eod,
    /// A byte sequence the lexer does not recognize.
    Unknown,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Identifier,

    /// Preprocessing number: covers every C numeric literal form, including
    /// exponent signs (`1e+5`) and suffixes.
    #[regex(r"[0-9](?:[0-9a-zA-Z_.]|[eEpP][+\-])*")]
    #[regex(r"\.[0-9](?:[0-9a-zA-Z_.]|[eEpP][+\-])*")]
    NumericConstant,

    /// Character constant, with or without the wide `L` prefix.
    #[regex(r"L?'(?:[^'\\\n]|\\.)+'")]
    CharConstant,

    #[regex(r#""(?:[^"\\\n]|\\.)*""#)]
    StringLiteral,

    #[regex(r#"L"(?:[^"\\\n]|\\.)*""#)]
    WideStringLiteral,

    /// `<filename>` in an include directive. Only produced in
    /// include-filename mode.
    AngleStringLiteral,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(".")]
    Period,
    #[token("...")]
    Ellipsis,
    #[token("&")]
    Amp,
    #[token("&&")]
    AmpAmp,
    #[token("&=")]
    AmpEqual,
    #[token("*")]
    Star,
    #[token("*=")]
    StarEqual,
    #[token("+")]
    Plus,
    #[token("++")]
    PlusPlus,
    #[token("+=")]
    PlusEqual,
    #[token("-")]
    Minus,
    #[token("--")]
    MinusMinus,
    #[token("-=")]
    MinusEqual,
    #[token("->")]
    Arrow,
    #[token("~")]
    Tilde,
    #[token("!")]
    Exclaim,
    #[token("!=")]
    ExclaimEqual,
    #[token("/")]
    Slash,
    #[token("/=")]
    SlashEqual,
    #[token("%")]
    Percent,
    #[token("%=")]
    PercentEqual,
    #[token("<")]
    Less,
    #[token("<<")]
    LessLess,
    #[token("<=")]
    LessEqual,
    #[token("<<=")]
    LessLessEqual,
    #[token(">")]
    Greater,
    #[token(">>")]
    GreaterGreater,
    #[token(">=")]
    GreaterEqual,
    #[token(">>=")]
    GreaterGreaterEqual,
    #[token("^")]
    Caret,
    #[token("^=")]
    CaretEqual,
    #[token("|")]
    Pipe,
    #[token("||")]
    PipePipe,
    #[token("|=")]
    PipeEqual,
    #[token("?")]
    Question,
    #[token(":")]
    Colon,
    #[token(";")]
    Semi,
    #[token("=")]
    Equal,
    #[token("==")]
    EqualEqual,
    #[token(",")]
    Comma,
    #[token("#")]
    Hash,
    #[token("##")]
    HashHash,

    /// Horizontal whitespace. Trivia: consumed by the lexer wrapper.
    #[regex(r"[ \t\r\x0B\x0C]+")]
    Whitespace,
    #[token("\n")]
    Newline,
    #[regex(r"//[^\n]*")]
    LineComment,
    #[regex(r"/\*[^*]*\*+(?:[^/*][^*]*\*+)*/")]
    BlockComment,
}

impl TokenKind {
    /// Literal kinds carry a spelling-pool payload in their token record;
    /// every other kind carries a persistent identifier ID (possibly 0).
    #[inline]
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            TokenKind::NumericConstant
                | TokenKind::CharConstant
                | TokenKind::StringLiteral
                | TokenKind::WideStringLiteral
                | TokenKind::AngleStringLiteral
        )
    }

    /// Whitespace and comments, filtered out of the raw stream.
    #[inline]
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace
                | TokenKind::Newline
                | TokenKind::LineComment
                | TokenKind::BlockComment
        )
    }
}

/// One raw token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub flags: u8,
    /// Byte length of the token's spelling in its source file.
    pub len: u32,
    pub location: SourceLocation,
    /// Interned identifier, attached by the consumer after lookup.
    pub ident: Option<Ident>,
}

impl Token {
    /// The token is the first on its line.
    pub const START_OF_LINE: u8 = 0x01;
    /// The token is preceded by horizontal whitespace or a comment.
    pub const LEADING_SPACE: u8 = 0x02;

    pub fn new(kind: TokenKind, flags: u8, len: u32, location: SourceLocation) -> Self {
        Self {
            kind,
            flags,
            len,
            location,
            ident: None,
        }
    }

    #[inline]
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    #[inline]
    pub fn at_start_of_line(&self) -> bool {
        self.flags & Self::START_OF_LINE != 0
    }

    #[inline]
    pub fn has_leading_space(&self) -> bool {
        self.flags & Self::LEADING_SPACE != 0
    }

    #[inline]
    pub fn clear_flag(&mut self, flag: u8) {
        self.flags &= !flag;
    }

    #[inline]
    pub fn is_literal(&self) -> bool {
        self.kind.is_literal()
    }
}
