//! Lexical tokens.
//!
//! A [`Token`] is immutable apart from its [`ScopeDepth`], which starts out
//! [`ScopeDepth::Unresolved`] and is written once by the scope resolver for
//! every identifier that denotes a variable reference.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use crate::Span;

/// Lexical address of a variable reference.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum ScopeDepth {
    /// Not yet visited by the resolver.
    #[default]
    Unresolved,
    /// Not declared in any open local scope; addresses the global scope.
    Global,
    /// Declared `hops` scopes out along the `enclosing` chain.
    Local(u32),
}

impl ScopeDepth {
    #[inline]
    pub fn is_resolved(self) -> bool {
        !matches!(self, ScopeDepth::Unresolved)
    }
}

/// Token kinds.
///
/// Kinds carry no payload; the literal text lives on [`Token::text`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TokenKind {
    // Literals
    Number,
    String,
    Ident,

    // Keywords
    Let,
    While,
    If,
    Else,
    Def,
    Return,
    Println,
    Print,
    Lambda,
    True,
    False,
    Nil,
    Class,
    New,
    And,
    Or,

    // List primitives
    First,
    Rest,
    Empty,
    Size,
    Push,
    Pop,
    Append,
    Get,
    Map,
    Filter,
    Reduce,

    // Operators
    Assign,
    AddAssign,
    SubAssign,
    Increment,
    Decrement,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    EqEq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    MatchRe,
    Produce,

    // Delimiters
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semi,
    Comma,
    Period,

    Eof,
}

/// Reserved words, matched by the lexer automaton ahead of identifiers.
pub const KEYWORDS: &[(&str, TokenKind)] = &[
    ("let", TokenKind::Let),
    ("while", TokenKind::While),
    ("if", TokenKind::If),
    ("else", TokenKind::Else),
    ("def", TokenKind::Def),
    ("return", TokenKind::Return),
    ("println", TokenKind::Println),
    ("print", TokenKind::Print),
    ("lambda", TokenKind::Lambda),
    ("true", TokenKind::True),
    ("false", TokenKind::False),
    ("nil", TokenKind::Nil),
    ("class", TokenKind::Class),
    ("new", TokenKind::New),
    ("and", TokenKind::And),
    ("or", TokenKind::Or),
    ("first", TokenKind::First),
    ("rest", TokenKind::Rest),
    ("empty", TokenKind::Empty),
    ("size", TokenKind::Size),
    ("push", TokenKind::Push),
    ("pop", TokenKind::Pop),
    ("append", TokenKind::Append),
    ("get", TokenKind::Get),
    ("map", TokenKind::Map),
    ("filter", TokenKind::Filter),
    ("reduce", TokenKind::Reduce),
];

/// Punctuation and operator spellings.
///
/// `&&` and `||` are alternate spellings of `and` and `or`.
pub const OPERATORS: &[(&str, TokenKind)] = &[
    (":=", TokenKind::Assign),
    ("+=", TokenKind::AddAssign),
    ("-=", TokenKind::SubAssign),
    ("++", TokenKind::Increment),
    ("--", TokenKind::Decrement),
    ("+", TokenKind::Plus),
    ("-", TokenKind::Minus),
    ("*", TokenKind::Star),
    ("/", TokenKind::Slash),
    ("%", TokenKind::Percent),
    ("==", TokenKind::EqEq),
    ("!=", TokenKind::NotEq),
    ("<", TokenKind::Lt),
    (">", TokenKind::Gt),
    ("<=", TokenKind::LtEq),
    (">=", TokenKind::GtEq),
    ("=~", TokenKind::MatchRe),
    ("=>", TokenKind::Produce),
    ("&&", TokenKind::And),
    ("||", TokenKind::Or),
    ("(", TokenKind::LParen),
    (")", TokenKind::RParen),
    ("{", TokenKind::LBrace),
    ("}", TokenKind::RBrace),
    ("[", TokenKind::LBracket),
    ("]", TokenKind::RBracket),
    (";", TokenKind::Semi),
    (",", TokenKind::Comma),
    (".", TokenKind::Period),
];

impl TokenKind {
    /// Human-readable name used in parse diagnostics.
    pub fn display_name(self) -> &'static str {
        match self {
            TokenKind::Number => "number",
            TokenKind::String => "string",
            TokenKind::Ident => "identifier",
            TokenKind::Eof => "end of input",
            TokenKind::And => "and",
            TokenKind::Or => "or",
            other => KEYWORDS
                .iter()
                .chain(OPERATORS)
                .find(|(_, kind)| *kind == other)
                .map_or("token", |(text, _)| *text),
        }
    }

    /// Keywords naming a list primitive (`first`, `map`, ...).
    pub fn is_list_op(self) -> bool {
        matches!(
            self,
            TokenKind::First
                | TokenKind::Rest
                | TokenKind::Empty
                | TokenKind::Size
                | TokenKind::Push
                | TokenKind::Pop
                | TokenKind::Append
                | TokenKind::Get
                | TokenKind::Map
                | TokenKind::Filter
                | TokenKind::Reduce
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A lexical unit: kind, source text, location, and resolved scope depth.
#[derive(Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Source text. String literals keep their surrounding quotes.
    pub text: Rc<str>,
    pub span: Span,
    depth: Cell<ScopeDepth>,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<Rc<str>>, span: Span) -> Self {
        Token {
            kind,
            text: text.into(),
            span,
            depth: Cell::new(ScopeDepth::Unresolved),
        }
    }

    #[inline]
    pub fn depth(&self) -> ScopeDepth {
        self.depth.get()
    }

    /// Record the lexical address computed by the resolver.
    #[inline]
    pub fn set_depth(&self, depth: ScopeDepth) {
        self.depth.set(depth);
    }

    #[inline]
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({:?})", self.kind, &*self.text)?;
        match self.depth() {
            ScopeDepth::Unresolved => Ok(()),
            ScopeDepth::Global => f.write_str("@global"),
            ScopeDepth::Local(hops) => write!(f, "@{hops}"),
        }
    }
}

/// Lexer output for one parse unit. Always ends with an [`TokenKind::Eof`] token.
#[derive(Clone, Debug, Default)]
pub struct TokenList {
    tokens: Vec<Token>,
}

impl TokenList {
    pub fn new() -> Self {
        TokenList { tokens: Vec::new() }
    }

    #[inline]
    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    #[inline]
    pub fn as_slice(&self) -> &[Token] {
        &self.tokens
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    /// Kinds only, convenient for assertions.
    pub fn kinds(&self) -> Vec<TokenKind> {
        self.tokens.iter().map(|t| t.kind).collect()
    }
}

impl<'a> IntoIterator for &'a TokenList {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}
