#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    Number(f64),
    Ident(String),
    Str(String),
    Color(String), // digits only, "ff0000"

    // Statement keywords
    Scene,
    Create,
    Set,
    Animate,
    Render,
    Save,
    Export,
    Video,
    Wait,
    Loop,
    Clean,

    // Operators
    Plus,   // +
    Minus,  // -
    Star,   // *
    Slash,  // /
    Eq,     // =

    // Punctuation
    Colon,     // :
    Comma,     // ,
    Semicolon, // ;
    Dot,       // .
    LParen,    // (
    RParen,    // )
    LBrace,    // {
    RBrace,    // }
    LBracket,  // [
    RBracket,  // ]

    Newline,
    /// Deferred lexical error; the parser reports it.
    Illegal(String),
    Eof,
}

impl TokenKind {
    pub fn is_literal(&self) -> bool {
        matches!(self, Self::Number(_) | Self::Str(_) | Self::Color(_))
    }

    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            Self::Scene | Self::Create | Self::Set | Self::Animate | Self::Render | Self::Save
            | Self::Export | Self::Video | Self::Wait | Self::Loop | Self::Clean
        )
    }

    /// Tokens that end a statement.
    pub fn is_terminator(&self) -> bool {
        matches!(self, Self::Newline | Self::Semicolon | Self::RBrace | Self::Eof)
    }
}

/// Maps an identifier string to its keyword token, or returns `Ident`.
///
/// Object kinds, property names and animation kinds stay identifiers; the
/// parser resolves them in context.
pub fn keyword_or_ident(s: String) -> TokenKind {
    match s.as_str() {
        "scene"   => TokenKind::Scene,
        "create"  => TokenKind::Create,
        "set"     => TokenKind::Set,
        "animate" => TokenKind::Animate,
        "render"  => TokenKind::Render,
        "save"    => TokenKind::Save,
        "export"  => TokenKind::Export,
        "video"   => TokenKind::Video,
        "wait"    => TokenKind::Wait,
        "loop"    => TokenKind::Loop,
        "clean"   => TokenKind::Clean,
        _         => TokenKind::Ident(s),
    }
}

// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Source text of the token.
    pub literal: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, literal: impl Into<String>, line: usize, column: usize) -> Self {
        Self { kind, literal: literal.into(), line, column }
    }
}
