//! Identifier interning and preprocessor-keyword classification.
//!
//! Converts identifier spellings into cheap integer handles (`Ident`).
//! Comparing two handles is O(1); the table also remembers, per identifier,
//! whether its spelling names a preprocessor directive.

use std::collections::HashMap;

/// A lightweight handle to an interned identifier.
///
/// Handles are ordered by first-intern order. The persistent IDs written to
/// a PTH file are assigned separately by the writer; a handle is purely an
/// in-memory name.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Ident(u32);

impl Ident {
    /// Raw index, for debugging.
    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

/// Directive names an identifier can spell, as classified after a `#`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PPKeyword {
    NotKeyword,
    If,
    Ifdef,
    Ifndef,
    Elif,
    Else,
    Endif,
    Include,
    Import,
    IncludeNext,
    Define,
    Undef,
    Line,
    Error,
    Pragma,
    Warning,
}

impl PPKeyword {
    pub fn classify(name: &str) -> PPKeyword {
        match name {
            "if" => PPKeyword::If,
            "ifdef" => PPKeyword::Ifdef,
            "ifndef" => PPKeyword::Ifndef,
            "elif" => PPKeyword::Elif,
            "else" => PPKeyword::Else,
            "endif" => PPKeyword::Endif,
            "include" => PPKeyword::Include,
            "import" => PPKeyword::Import,
            "include_next" => PPKeyword::IncludeNext,
            "define" => PPKeyword::Define,
            "undef" => PPKeyword::Undef,
            "line" => PPKeyword::Line,
            "error" => PPKeyword::Error,
            "pragma" => PPKeyword::Pragma,
            "warning" => PPKeyword::Warning,
            _ => PPKeyword::NotKeyword,
        }
    }

    /// Include-like directives cause the lexer to be switched into
    /// filename mode.
    #[inline]
    pub fn is_include(self) -> bool {
        matches!(
            self,
            PPKeyword::Include | PPKeyword::Import | PPKeyword::IncludeNext
        )
    }
}

struct IdentEntry {
    name: Box<str>,
    keyword: PPKeyword,
}

/// Identifier interner. Deduplicates spellings and returns `Ident` handles.
#[derive(Default)]
pub struct IdentTable {
    map: HashMap<Box<str>, Ident>,
    entries: Vec<IdentEntry>,
}

impl IdentTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a spelling, returning its handle. Classification happens once,
    /// at first sight.
    pub fn intern(&mut self, name: &str) -> Ident {
        if let Some(&id) = self.map.get(name) {
            return id;
        }

        let id = Ident(self.entries.len() as u32);
        self.entries.push(IdentEntry {
            name: name.into(),
            keyword: PPKeyword::classify(name),
        });
        self.map.insert(name.into(), id);
        id
    }

    /// Resolve a handle back to its spelling.
    ///
    /// # Panics
    /// Panics if the handle was not created by this table.
    #[inline]
    pub fn name(&self, id: Ident) -> &str {
        &self.entries[id.0 as usize].name
    }

    /// The preprocessor-keyword classification of this identifier.
    ///
    /// # Panics
    /// Panics if the handle was not created by this table.
    #[inline]
    pub fn pp_keyword(&self, id: Ident) -> PPKeyword {
        self.entries[id.0 as usize].keyword
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
