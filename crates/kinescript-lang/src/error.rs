use std::path::PathBuf;

/// Error codes prefixed by phase: L = lexer, P = parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorCode {
    // Lexer
    L001, // illegal character
    L002, // unterminated string literal

    // Parser
    P001, // unexpected token
    P002, // missing expected token
    P003, // unknown object, property or animation kind
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::L001 => "L001",
            Self::L002 => "L002",
            Self::P001 => "P001",
            Self::P002 => "P002",
            Self::P003 => "P003",
        }
    }
}

/// A positioned front-end diagnostic.
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    pub code: ErrorCode,
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl Error {
    pub fn new(code: ErrorCode, line: usize, column: usize, message: impl Into<String>) -> Self {
        Self { code, line, column, message: message.into() }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}:{} — {}", self.code.as_str(), self.line, self.column, self.message)
    }
}

// ─────────────────────────────────────────────────────────────────────────────

/// A failure while executing a statement. Halts the rest of the script.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeError {
    pub line: usize,
    pub message: String,
}

impl RuntimeError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self { line, message: message.into() }
    }
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[runtime] {} — {}", self.line, self.message)
    }
}

impl std::error::Error for RuntimeError {}

// ─── Boundary errors ─────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config `{path}`: {source}")]
    Io { path: PathBuf, source: std::io::Error },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    #[error("failed to save frame `{path}`: {reason}")]
    Save { path: PathBuf, reason: String },
}

#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("filesystem error on `{path}`: {source}")]
    Io { path: PathBuf, source: std::io::Error },

    #[error("transcoder `{program}` not available: {source}")]
    TranscoderMissing { program: String, source: std::io::Error },

    #[error("transcoder `{program}` exited with {status}")]
    TranscoderFailed { program: String, status: String },
}
