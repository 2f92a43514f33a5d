use crate::syntax::ast::*;
use crate::error::{Error, ErrorCode};
use crate::syntax::token::{Token, TokenKind};

/// Easing names accepted just before an `animate` duration.
pub const EASING_NAMES: &[&str] = &["linear", "smooth", "easein", "easeout", "easeinout", "elastic", "bounce"];

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    errors: Vec<Error>,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        let mut tokens = tokens;
        if tokens.last().map(|t| &t.kind) != Some(&TokenKind::Eof) {
            let (line, column) = tokens.last().map(|t| (t.line, t.column + 1)).unwrap_or((1, 1));
            tokens.push(Token::new(TokenKind::Eof, "", line, column));
        }
        Self { tokens, pos: 0, errors: Vec::new() }
    }

    /// Parses to the end and fails with every diagnostic collected.
    pub fn parse(mut self) -> Result<Program, Vec<Error>> {
        let program = self.parse_program();
        if self.errors.is_empty() { Ok(program) } else { Err(self.errors) }
    }

    /// Fail-soft parse: a bad statement is recorded in `errors()` and
    /// skipped up to the next line, then parsing continues.
    pub fn parse_program(&mut self) -> Program {
        let mut statements = Vec::new();

        while !self.is_at_end() {
            let pos_before = self.pos;

            match self.peek_kind() {
                TokenKind::Newline | TokenKind::Semicolon => { self.advance(); }
                TokenKind::Eof => break,
                TokenKind::RBrace => {
                    let err = self.unexpected("statement");
                    self.errors.push(err);
                    self.advance();
                }
                _ => match self.parse_stmt() {
                    Ok(s) => statements.push(s),
                    Err(e) => { self.errors.push(e); self.recover(false); }
                },
            }

            // guarantee progress: if nothing was consumed, force-advance
            // to prevent an infinite loop on unrecognised tokens
            if self.pos == pos_before {
                self.advance();
            }
        }

        Program { statements }
    }

    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    // ─── Statements ──────────────────────────────────────────────────────────

    fn parse_stmt(&mut self) -> Result<Stmt, Error> {
        let stmt = match self.peek_kind() {
            TokenKind::Scene   => self.parse_scene()?,
            TokenKind::Create  => self.parse_create()?,
            TokenKind::Set     => self.parse_set()?,
            TokenKind::Animate => self.parse_animate()?,
            TokenKind::Render  => self.parse_render()?,
            TokenKind::Save    => self.parse_save()?,
            TokenKind::Export  => self.parse_export()?,
            TokenKind::Video   => self.parse_video()?,
            TokenKind::Wait    => self.parse_wait()?,
            TokenKind::Loop    => self.parse_loop()?,
            TokenKind::Clean   => self.parse_clean()?,
            _ => return Err(self.unexpected("statement")),
        };
        self.expect_terminator()?;
        Ok(stmt)
    }

    fn parse_scene(&mut self) -> Result<Stmt, Error> {
        let span = self.span();
        self.advance();
        let width = self.parse_expr()?;
        let height = self.parse_expr()?;
        let name = self.parse_expr()?;
        Ok(Stmt::Scene { width, height, name, span })
    }

    /// Parameters are kept in source order; the evaluator matches them
    /// against each object kind's accepted orderings.
    fn parse_create(&mut self) -> Result<Stmt, Error> {
        let span = self.span();
        self.advance();
        let kind_tok = self.peek().clone();
        let kind_name = self.expect_ident()?;
        let kind = ObjectKind::from_name(&kind_name).ok_or_else(|| Error::new(
            ErrorCode::P003, kind_tok.line, kind_tok.column,
            format!("unknown object kind `{kind_name}`"),
        ))?;
        let name = self.expect_ident()?;
        let params = self.parse_until_terminator()?;
        Ok(Stmt::Create { kind, name, params, span })
    }

    fn parse_set(&mut self) -> Result<Stmt, Error> {
        let span = self.span();
        self.advance();
        let target = self.expect_ident()?;
        self.expect(TokenKind::Dot)?;
        let prop_tok = self.peek().clone();
        let prop_name = self.expect_ident()?;
        let property = Property::from_name(&prop_name).ok_or_else(|| Error::new(
            ErrorCode::P003, prop_tok.line, prop_tok.column,
            format!("unknown property `{prop_name}`"),
        ))?;
        self.expect(TokenKind::Eq)?;
        let value = self.parse_expr()?;
        Ok(Stmt::Set { target, property, value, span })
    }

    fn parse_animate(&mut self) -> Result<Stmt, Error> {
        let span = self.span();
        self.advance();
        let kind_tok = self.peek().clone();
        let kind_name = self.expect_ident()?;
        let kind = AnimationKindName::from_name(&kind_name).ok_or_else(|| Error::new(
            ErrorCode::P003, kind_tok.line, kind_tok.column,
            format!("unknown animation `{kind_name}`"),
        ))?;
        let target = self.expect_ident()?;
        let mut params = self.parse_until_terminator()?;

        let Some(duration) = params.pop() else {
            return Err(self.missing("animation duration"));
        };
        let easing = match params.last() {
            Some(Expr::Ident(name)) if EASING_NAMES.contains(&name.as_str()) => {
                let name = name.clone();
                params.pop();
                Some(name)
            }
            _ => None,
        };

        Ok(Stmt::Animate(AnimateStmt { kind, target, params, easing, duration, span }))
    }

    fn parse_render(&mut self) -> Result<Stmt, Error> {
        let span = self.span();
        self.advance();
        if self.at_terminator() {
            Ok(Stmt::Render { span })
        } else {
            let count = self.parse_expr()?;
            Ok(Stmt::RenderFrames { count, span })
        }
    }

    fn parse_save(&mut self) -> Result<Stmt, Error> {
        let span = self.span();
        self.advance();
        let name = self.parse_expr()?;
        Ok(Stmt::Save { name, span })
    }

    fn parse_export(&mut self) -> Result<Stmt, Error> {
        let span = self.span();
        self.advance();
        let name = self.parse_expr()?;
        let (fps, duration) = if self.at_terminator() {
            (None, None)
        } else {
            let fps = self.parse_expr()?;
            let duration = self.parse_expr()?;
            (Some(fps), Some(duration))
        };
        Ok(Stmt::Export { name, fps, duration, span })
    }

    fn parse_video(&mut self) -> Result<Stmt, Error> {
        let span = self.span();
        self.advance();
        let name = self.parse_expr()?;
        let fps = self.parse_expr()?;
        let duration = self.parse_expr()?;
        Ok(Stmt::Video { name, fps, duration, span })
    }

    fn parse_wait(&mut self) -> Result<Stmt, Error> {
        let span = self.span();
        self.advance();
        let seconds = self.parse_expr()?;
        Ok(Stmt::Wait { seconds, span })
    }

    fn parse_loop(&mut self) -> Result<Stmt, Error> {
        let span = self.span();
        self.advance();
        let count = self.parse_expr()?;
        self.skip_newlines();
        self.expect(TokenKind::LBrace)?;
        let body = self.parse_block();
        self.expect(TokenKind::RBrace)?;
        Ok(Stmt::Loop { count, body, span })
    }

    /// Statements up to the closing `}`. Errors inside the body are
    /// recorded and recovery stops at the brace.
    fn parse_block(&mut self) -> Vec<Stmt> {
        let mut stmts = Vec::new();
        loop {
            let pos_before = self.pos;
            match self.peek_kind() {
                TokenKind::Newline | TokenKind::Semicolon => { self.advance(); }
                TokenKind::RBrace | TokenKind::Eof => break,
                _ => match self.parse_stmt() {
                    Ok(s) => stmts.push(s),
                    Err(e) => { self.errors.push(e); self.recover(true); }
                },
            }
            if self.pos == pos_before {
                self.advance();
            }
        }
        stmts
    }

    fn parse_clean(&mut self) -> Result<Stmt, Error> {
        let span = self.span();
        self.advance();
        let dirs = if self.at_terminator() { None } else { Some(self.parse_expr()?) };
        Ok(Stmt::Clean { dirs, span })
    }

    // ─── Expressions ─────────────────────────────────────────────────────────

    pub fn parse_expr(&mut self) -> Result<Expr, Error> {
        match self.peek_kind() {
            TokenKind::Number(n) => { self.advance(); Ok(Expr::Number(n)) }
            TokenKind::Minus => {
                self.advance();
                match self.peek_kind() {
                    TokenKind::Number(n) => { self.advance(); Ok(Expr::Number(-n)) }
                    _ => Err(self.unexpected("number after `-`")),
                }
            }
            TokenKind::Str(s)   => { self.advance(); Ok(Expr::Str(s)) }
            TokenKind::Color(c) => { self.advance(); Ok(Expr::Color(c)) }
            TokenKind::Ident(s) => { self.advance(); Ok(Expr::Ident(s)) }
            TokenKind::LParen => {
                self.advance();
                let x = self.parse_expr()?;
                self.expect(TokenKind::Comma)?;
                let y = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                Ok(Expr::Coord(Box::new(x), Box::new(y)))
            }
            TokenKind::LBracket => {
                self.advance();
                let mut items = Vec::new();
                self.skip_newlines();
                while !self.check(TokenKind::RBracket) && !self.is_at_end() {
                    items.push(self.parse_expr()?);
                    self.skip_newlines();
                    if !self.matches(TokenKind::Comma) { break; }
                    self.skip_newlines();
                }
                self.expect(TokenKind::RBracket)?;
                Ok(Expr::Array(items))
            }
            _ => Err(self.unexpected("expression")),
        }
    }

    fn parse_until_terminator(&mut self) -> Result<Vec<Expr>, Error> {
        let mut exprs = Vec::new();
        while !self.at_terminator() {
            exprs.push(self.parse_expr()?);
        }
        Ok(exprs)
    }

    // ─── Token primitives ────────────────────────────────────────────────────

    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn peek_kind(&self) -> TokenKind {
        self.tokens[self.pos].kind.clone()
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() { self.pos += 1; }
        tok
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    fn matches(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) { self.advance(); true } else { false }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, Error> {
        if self.check(kind.clone()) {
            return Ok(self.advance());
        }
        let tok = self.peek();
        if let Some(err) = lexical_error(tok) {
            return Err(err);
        }
        Err(Error::new(
            ErrorCode::P002,
            tok.line,
            tok.column,
            format!("expected {:?}, found {}", kind, describe(tok)),
        ))
    }

    fn expect_ident(&mut self) -> Result<String, Error> {
        match self.peek_kind() {
            TokenKind::Ident(s) => { self.advance(); Ok(s) }
            _ => Err(self.missing("identifier")),
        }
    }

    fn expect_terminator(&mut self) -> Result<(), Error> {
        match self.peek_kind() {
            TokenKind::Newline | TokenKind::Semicolon => { self.advance(); Ok(()) }
            TokenKind::RBrace | TokenKind::Eof => Ok(()),
            _ => Err(self.unexpected("end of statement")),
        }
    }

    fn at_terminator(&self) -> bool {
        self.peek().kind.is_terminator()
    }

    fn skip_newlines(&mut self) {
        while self.check(TokenKind::Newline) { self.advance(); }
    }

    fn is_at_end(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::Eof)
    }

    fn span(&self) -> Span {
        let tok = self.peek();
        Span::new(tok.line, tok.column)
    }

    fn unexpected(&self, expected: &str) -> Error {
        self.error_here(ErrorCode::P001, expected)
    }

    fn missing(&self, expected: &str) -> Error {
        self.error_here(ErrorCode::P002, expected)
    }

    fn error_here(&self, code: ErrorCode, expected: &str) -> Error {
        let tok = self.peek();
        lexical_error(tok).unwrap_or_else(|| Error::new(
            code,
            tok.line,
            tok.column,
            format!("expected {}, found {}", expected, describe(tok)),
        ))
    }

    /// Skip the rest of a broken statement. Inside a loop body a `}` also
    /// stops recovery so the loop itself can close.
    fn recover(&mut self, in_block: bool) {
        loop {
            match self.peek_kind() {
                TokenKind::Newline | TokenKind::Semicolon | TokenKind::Eof => break,
                TokenKind::RBrace if in_block => break,
                _ => { self.advance(); }
            }
        }
    }
}

/// Turns a deferred `Illegal` token into its lexical diagnostic.
fn lexical_error(tok: &Token) -> Option<Error> {
    match &tok.kind {
        TokenKind::Illegal(msg) => {
            let code = if msg.starts_with("unterminated") { ErrorCode::L002 } else { ErrorCode::L001 };
            Some(Error::new(code, tok.line, tok.column, msg.clone()))
        }
        _ => None,
    }
}

fn describe(tok: &Token) -> String {
    match &tok.kind {
        TokenKind::Newline => "end of line".to_string(),
        TokenKind::Eof => "end of input".to_string(),
        _ => format!("`{}`", tok.literal),
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
