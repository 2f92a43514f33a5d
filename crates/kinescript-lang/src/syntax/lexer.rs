use crate::syntax::token::{Token, TokenKind, keyword_or_ident};

pub struct Lexer<'a> {
    source: &'a [u8],
    pos: usize,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source: source.as_bytes(), pos: 0, line: 1, column: 1 }
    }

    /// Scans the whole source. Never fails: bad input becomes `Illegal`
    /// tokens, and the stream always ends with `Eof`.
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token();
            let done = tok.kind == TokenKind::Eof;
            tokens.push(tok);
            if done { break; }
        }
        tokens
    }

    pub fn next_token(&mut self) -> Token {
        loop {
            self.skip_whitespace();

            if self.is_at_end() {
                return Token::new(TokenKind::Eof, "", self.line, self.column);
            }

            let line = self.line;
            let col = self.column;
            let start = self.pos;
            let ch = self.advance();

            let kind = match ch {
                b'\n' => TokenKind::Newline,
                b'=' => TokenKind::Eq,
                b'+' => TokenKind::Plus,
                b'-' => TokenKind::Minus,
                b'*' => TokenKind::Star,
                b',' => TokenKind::Comma,
                b'.' => TokenKind::Dot,
                b':' => TokenKind::Colon,
                b';' => TokenKind::Semicolon,
                b'(' => TokenKind::LParen,
                b')' => TokenKind::RParen,
                b'{' => TokenKind::LBrace,
                b'}' => TokenKind::RBrace,
                b'[' => TokenKind::LBracket,
                b']' => TokenKind::RBracket,

                b'/' => {
                    if self.peek() == b'/' { self.skip_line(); continue; }
                    TokenKind::Slash
                }
                b'#' => {
                    if self.is_hex_sequence() { TokenKind::Color(self.read_hex_color()) }
                    else { self.skip_line(); continue; }
                }
                b'"' => match self.read_string() {
                    Some(s) => TokenKind::Str(s),
                    None => TokenKind::Illegal("unterminated string literal".into()),
                },
                b'0'..=b'9' => TokenKind::Number(self.read_number(start)),
                b'a'..=b'z' | b'A'..=b'Z' | b'_' => keyword_or_ident(self.read_ident(start)),

                other => {
                    let shown = self.finish_char(start, other);
                    TokenKind::Illegal(format!("illegal character `{shown}`"))
                }
            };

            let literal = match &kind {
                TokenKind::Newline => "\\n".to_string(),
                _ => String::from_utf8_lossy(&self.source[start..self.pos]).into_owned(),
            };
            return Token::new(kind, literal, line, col);
        }
    }

    // ─── Primitives ──────────────────────────────────────────────────────────

    fn advance(&mut self) -> u8 {
        let ch = self.source[self.pos];
        self.pos += 1;
        if ch == b'\n' { self.line += 1; self.column = 1; }
        else { self.column += 1; }
        ch
    }

    fn peek(&self) -> u8 {
        if self.is_at_end() { 0 } else { self.source[self.pos] }
    }

    fn peek_next(&self) -> u8 {
        if self.pos + 1 >= self.source.len() { 0 } else { self.source[self.pos + 1] }
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    /// Newlines are significant, so only intra-line whitespace is skipped.
    fn skip_whitespace(&mut self) {
        while !self.is_at_end() {
            match self.peek() {
                b' ' | b'\t' | b'\r' => { self.advance(); }
                _ => break,
            }
        }
    }

    fn skip_line(&mut self) {
        while !self.is_at_end() && self.peek() != b'\n' { self.advance(); }
    }

    /// Consumes the continuation bytes of a multi-byte UTF-8 character so
    /// one illegal character yields one token.
    fn finish_char(&mut self, start: usize, first: u8) -> String {
        if first >= 0x80 {
            while !self.is_at_end() && (self.peek() & 0xC0) == 0x80 { self.advance(); }
        }
        String::from_utf8_lossy(&self.source[start..self.pos]).into_owned()
    }

    // ─── Readers ─────────────────────────────────────────────────────────────

    /// Returns true when the next 6 bytes are all hex digits.
    fn is_hex_sequence(&self) -> bool {
        self.pos + 6 <= self.source.len()
            && self.source[self.pos..self.pos + 6].iter().all(|b| b.is_ascii_hexdigit())
    }

    /// Greedy: every following hex digit belongs to the literal. Anything
    /// other than six digits is rejected later when the color is resolved.
    fn read_hex_color(&mut self) -> String {
        let mut s = String::with_capacity(6);
        while !self.is_at_end() && self.peek().is_ascii_hexdigit() {
            s.push(self.advance() as char);
        }
        s
    }

    /// No escape sequences: the next `"` always closes the string.
    /// Returns `None` when the line or input ends first.
    fn read_string(&mut self) -> Option<String> {
        let begin = self.pos;
        loop {
            if self.is_at_end() || self.peek() == b'\n' { return None; }
            if self.advance() == b'"' { break; }
        }
        Some(String::from_utf8_lossy(&self.source[begin..self.pos - 1]).into_owned())
    }

    fn read_number(&mut self, start: usize) -> f64 {
        while !self.is_at_end() && self.peek().is_ascii_digit() {
            self.advance();
        }
        // consume decimal only if followed by at least one digit
        if self.peek() == b'.' && self.peek_next().is_ascii_digit() {
            self.advance();
            while !self.is_at_end() && self.peek().is_ascii_digit() {
                self.advance();
            }
        }
        std::str::from_utf8(&self.source[start..self.pos])
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0.0)
    }

    fn read_ident(&mut self, start: usize) -> String {
        while !self.is_at_end() && (self.peek().is_ascii_alphanumeric() || self.peek() == b'_') {
            self.advance();
        }
        String::from_utf8_lossy(&self.source[start..self.pos]).into_owned()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
