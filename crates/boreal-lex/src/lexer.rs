//! The scanning driver: walks the DFA table one byte at a time, assembling
//! lexemes, coupling identifier recognition to the Symbol Table, and
//! reporting lexical errors through the shared [`Handler`] (§4.2).

use crate::class::classify;
use crate::keywords;
use crate::table::{table, Action, START, TERMINAL};
use crate::token::{Keyword, Operator, Token, TokenKind};
use boreal_util::{Diagnostic, Handler, Origin, Span};
use boreal_symtab::SymbolTable;

pub const MAX_IDENTIFIER_LEN: usize = 32;
pub const MAX_STRING_CONTENT_LEN: usize = 64;
pub const MAX_INTEGER_VALUE: i64 = 32767;

pub struct Lexer<'a> {
    cursor: crate::cursor::Cursor<'a>,
    line: u32,
    column: u32,
    handler: &'a Handler,
    symtab: &'a mut SymbolTable,
    /// When set, `Lexer::define`/`lookup` is invoked; cleared by the
    /// semantic action for `begin` and at the end of each body (§4.2,
    /// §9 "Mode toggle").
    declaration_mode: bool,
    stop_at: Option<(u32, u32)>,
    stopped: bool,
    last_token: Option<Token>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, handler: &'a Handler, symtab: &'a mut SymbolTable) -> Self {
        Self {
            cursor: crate::cursor::Cursor::new(source),
            line: 1,
            column: 0,
            handler,
            symtab,
            declaration_mode: true,
            stop_at: None,
            stopped: false,
            last_token: None,
        }
    }

    pub fn set_declaration_mode(&mut self, on: bool) {
        self.declaration_mode = on;
    }

    /// Arms the stop-at protocol (§4.2) for a `findDefinition` query.
    pub fn arm_stop_at(&mut self, line: u32, column: u32) {
        self.stop_at = Some((line, column));
    }

    pub fn last_token(&self) -> Option<&Token> {
        self.last_token.as_ref()
    }

    /// The Symbol Table the lexer resolves identifiers against. Semantic
    /// Actions reach it through here rather than holding their own
    /// reference, since the lexer already owns the only live borrow (§5:
    /// "the Symbol Table is shared by Lexer and Semantic Actions but only
    /// the Semantic Actions call `enterScope`/`exitScope`; only the Lexer
    /// calls `define`/`lookup`. This separation is enforced by contract,
    /// not by locks.").
    pub fn symtab_mut(&mut self) -> &mut SymbolTable {
        self.symtab
    }

    /// Pulls the next token from the source. Always returns an `Eof` token
    /// once the buffer (or the stop-at point) is exhausted; never panics.
    pub fn next_token(&mut self) -> Token {
        if self.stopped {
            return self.eof_token();
        }

        loop {
            let start_pos = self.cursor.position();
            let start_line = self.line;
            let start_col = self.column;
            let mut state = START;

            loop {
                let class = match self.cursor.current() {
                    Some(b) => classify(b),
                    None => crate::class::CharClass::Eof,
                };
                let transition = table().get(state, class);

                match transition.action {
                    Action::Read => {
                        self.cursor.advance();
                        self.column += 1;
                        state = transition.next as u8;
                        continue;
                    }
                    Action::Eol => {
                        self.cursor.advance();
                        self.line += 1;
                        self.column = 0;
                        state = transition.next as u8;
                        continue;
                    }
                    Action::None => {
                        state = transition.next as u8;
                        continue;
                    }
                    _ => {}
                }

                debug_assert_eq!(transition.next, TERMINAL);

                let end_pos = self.cursor.position();
                let span = Span::new(start_pos, end_pos, start_line, start_col);

                // Every arm either yields a `Token` (returned to the caller)
                // or `break`s the DFA-stepping loop to retry scanning a
                // fresh token from `Start` — recovery from an error or a
                // skipped comment must never resume mid-state, since
                // `start_pos`/`state` are only valid for the abandoned
                // attempt.
                match transition.action {
                    Action::ProduceIdentifier => {
                        if let Some(tok) = self.finish_identifier(start_pos, end_pos, span) {
                            return self.record_last(tok);
                        }
                    }
                    Action::ProduceInteger => return self.finish_integer(start_pos, end_pos, span),
                    Action::ProduceString => {
                        // The closing quote hasn't been consumed yet (it was
                        // the lookahead byte that told us the string ended).
                        self.cursor.advance();
                        self.column += 1;
                        let end = self.cursor.position();
                        let span = Span::new(start_pos, end, start_line, start_col);
                        return self.finish_string(start_pos, end, span);
                    }
                    Action::ProduceComment => {}
                    Action::ProduceAssign => return self.two_char_op(start_pos, start_line, start_col, Operator::Assign, ":="),
                    Action::ProduceLe => return self.two_char_op(start_pos, start_line, start_col, Operator::Le, "<="),
                    Action::ProduceNe => return self.two_char_op(start_pos, start_line, start_col, Operator::Ne, "<>"),
                    Action::ProduceGe => return self.two_char_op(start_pos, start_line, start_col, Operator::Ge, ">="),
                    Action::ProducePower => return self.two_char_op(start_pos, start_line, start_col, Operator::Power, "**"),
                    Action::ProduceLt => return self.single_op_token(Operator::Lt, span),
                    Action::ProduceGt => return self.single_op_token(Operator::Gt, span),
                    Action::ProduceStar => return self.single_op_token(Operator::Star, span),
                    Action::ProduceSingle => return self.finish_single(span),
                    // `:` was already consumed entering `SeenColon`; emit
                    // directly instead of peeking-and-consuming again.
                    Action::ProduceColon => return self.single_op_token(Operator::Colon, span),
                    Action::ProduceEof => return self.eof_token(),
                    Action::ErrorUnexpectedChar => {
                        self.report(Origin::Lexer, "unexpected character", span);
                        self.cursor.advance();
                        self.column += 1;
                    }
                    Action::ErrorIllegalBrace => {
                        self.report(Origin::Lexer, "'}' outside a comment", span);
                        self.cursor.advance();
                        self.column += 1;
                    }
                    Action::ErrorUnterminatedString => {
                        self.report(Origin::Lexer, "unterminated string literal", span);
                    }
                    Action::ErrorUnterminatedStringConsumeEol => {
                        self.cursor.advance();
                        self.line += 1;
                        self.column = 0;
                        self.report(Origin::Lexer, "unterminated string literal", span);
                    }
                    Action::ErrorUnclosedComment => {
                        self.report(Origin::Lexer, "unclosed comment at end of file", span);
                    }
                    Action::ErrorIdentifierTooLong | Action::ErrorIntegerOverflow => {
                        unreachable!("reported directly by finish_identifier/finish_integer")
                    }
                    Action::Read | Action::Eol | Action::None => unreachable!(),
                }
                break;
            }
        }
    }

    fn record_last(&mut self, token: Token) -> Token {
        self.last_token = Some(token.clone());
        if let Some((line, col)) = self.stop_at {
            if token.span.line > line || (token.span.line == line && self.column as u32 >= col) {
                self.stopped = true;
            }
        }
        token
    }

    fn finish_identifier(&mut self, start: usize, end: usize, span: Span) -> Option<Token> {
        let lexeme = self.cursor.slice(start, end).to_string();
        if lexeme.len() > MAX_IDENTIFIER_LEN {
            self.report(
                Origin::Lexer,
                format!("identifier '{lexeme}' exceeds {MAX_IDENTIFIER_LEN} characters"),
                span,
            );
            return None;
        }
        if let Some(keyword) = keywords::lookup(&lexeme.to_ascii_lowercase()) {
            return Some(Token {
                kind: TokenKind::Keyword(keyword),
                lexeme,
                span,
                symbol: None,
            });
        }

        let symbol = if self.declaration_mode {
            match self.symtab.define(&lexeme, span) {
                Ok(id) => Some(id),
                Err(_) => {
                    self.report(
                        Origin::Lexer,
                        format!("'{lexeme}' is already declared in the current scope"),
                        span,
                    );
                    return None;
                }
            }
        } else {
            match self.symtab.lookup(&lexeme) {
                Some(id) => Some(id),
                None => {
                    self.report(Origin::Lexer, format!("'{lexeme}' is not declared"), span);
                    return None;
                }
            }
        };

        Some(Token {
            kind: TokenKind::Identifier,
            lexeme,
            span,
            symbol,
        })
    }

    fn finish_integer(&mut self, start: usize, end: usize, span: Span) -> Token {
        let lexeme = self.cursor.slice(start, end).to_string();
        match lexeme.parse::<i64>() {
            Ok(value) if value <= MAX_INTEGER_VALUE => Token {
                kind: TokenKind::IntegerLiteral(value as i32),
                lexeme,
                span,
                symbol: None,
            },
            _ => {
                self.report(
                    Origin::Lexer,
                    format!("integer literal '{lexeme}' exceeds {MAX_INTEGER_VALUE}"),
                    span,
                );
                Token {
                    kind: TokenKind::IntegerLiteral(0),
                    lexeme,
                    span,
                    symbol: None,
                }
            }
        }
    }

    fn finish_string(&mut self, start: usize, end: usize, span: Span) -> Token {
        // Slice excludes neither quote by construction of the DFA walk
        // (start is the opening `'`, end is one past the closing `'`).
        let raw = self.cursor.slice(start, end);
        let content = &raw[1..raw.len() - 1];
        if content.len() > MAX_STRING_CONTENT_LEN {
            self.report(
                Origin::Lexer,
                format!("string literal exceeds {MAX_STRING_CONTENT_LEN} characters"),
                span,
            );
        }
        Token {
            kind: TokenKind::StringLiteral(content.to_string()),
            lexeme: raw.to_string(),
            span,
            symbol: None,
        }
    }

    fn finish_single(&mut self, span: Span) -> Token {
        let byte = self.cursor.current().unwrap_or(b'\0');
        self.cursor.advance();
        self.column += 1;
        let op = match byte {
            b'+' => Operator::Plus,
            b'-' => Operator::Minus,
            b'/' => Operator::Slash,
            b'=' => Operator::Equal,
            b'(' => Operator::LParen,
            b')' => Operator::RParen,
            b';' => Operator::Semicolon,
            b',' => Operator::Comma,
            _ => unreachable!("ProduceSingle only reached for single-char operator bytes"),
        };
        Token {
            kind: TokenKind::Operator(op),
            lexeme: (byte as char).to_string(),
            span,
            symbol: None,
        }
    }

    fn single_op_token(&mut self, op: Operator, span: Span) -> Token {
        let lexeme = match op {
            Operator::Lt => "<",
            Operator::Gt => ">",
            Operator::Star => "*",
            Operator::Colon => ":",
            _ => unreachable!(),
        };
        Token {
            kind: TokenKind::Operator(op),
            lexeme: lexeme.to_string(),
            span,
            symbol: None,
        }
    }

    /// Consumes the still-unread second byte of a two-character operator
    /// (the lookahead that told the DFA which operator this is) before
    /// building its span.
    fn two_char_op(
        &mut self,
        start_pos: usize,
        start_line: u32,
        start_col: u32,
        op: Operator,
        lexeme: &str,
    ) -> Token {
        self.cursor.advance();
        self.column += 1;
        let span = Span::new(start_pos, self.cursor.position(), start_line, start_col);
        Token {
            kind: TokenKind::Operator(op),
            lexeme: lexeme.to_string(),
            span,
            symbol: None,
        }
    }

    fn eof_token(&self) -> Token {
        Token {
            kind: TokenKind::Eof,
            lexeme: String::new(),
            span: Span::point(self.cursor.position(), self.line, self.column),
            symbol: None,
        }
    }

    fn report(&self, origin: Origin, message: impl Into<String>, span: Span) {
        self.handler.emit(Diagnostic::error(origin, message, span));
    }
}

/// Distinguishes a recognised keyword's textual spelling from an ordinary
/// identifier, for callers that already have a [`Keyword`] and want its
/// canonical source text back (diagnostics, golden-file output).
pub fn keyword_text(keyword: Keyword) -> &'static str {
    use Keyword::*;
    match keyword {
        Program => "program",
        Procedure => "procedure",
        Function => "function",
        Var => "var",
        Begin => "begin",
        End => "end",
        Integer => "integer",
        Boolean => "boolean",
        StringType => "string",
        Real => "real",
        Char => "char",
        True => "true",
        False => "false",
        If => "if",
        Then => "then",
        Else => "else",
        While => "while",
        Do => "do",
        Repeat => "repeat",
        Until => "until",
        For => "for",
        To => "to",
        Case => "case",
        Of => "of",
        Otherwise => "otherwise",
        Loop => "loop",
        Exit => "exit",
        When => "when",
        Return => "return",
        Write => "write",
        Writeln => "writeln",
        Read => "read",
        And => "and",
        Or => "or",
        Xor => "xor",
        Not => "not",
        In => "in",
        Max => "max",
        Min => "min",
        Mod => "mod",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(src: &str) -> Vec<Token> {
        let handler = Handler::new();
        let mut symtab = SymbolTable::new();
        let mut lexer = Lexer::new(src, &handler, &mut symtab);
        let mut out = Vec::new();
        loop {
            let tok = lexer.next_token();
            let is_eof = tok.is_eof();
            out.push(tok);
            if is_eof {
                break;
            }
        }
        out
    }

    #[test]
    fn lexes_program_header() {
        let toks = tokens("program P;");
        assert_eq!(toks[0].kind, TokenKind::Keyword(Keyword::Program));
        assert_eq!(toks[1].kind, TokenKind::Identifier);
        assert_eq!(toks[2].kind, TokenKind::Operator(Operator::Semicolon));
        assert!(toks[3].is_eof());
    }

    #[test]
    fn two_char_operators_are_not_split() {
        let toks = tokens("x := y <= z <> w >= v ** u");
        let ops: Vec<_> = toks
            .iter()
            .filter_map(|t| match &t.kind {
                TokenKind::Operator(op) => Some(*op),
                _ => None,
            })
            .collect();
        assert_eq!(
            ops,
            vec![
                Operator::Assign,
                Operator::Le,
                Operator::Ne,
                Operator::Ge,
                Operator::Power,
            ]
        );
    }

    #[test]
    fn undeclared_identifier_in_use_mode_is_an_error() {
        let handler = Handler::new();
        let mut symtab = SymbolTable::new();
        let mut lexer = Lexer::new("y", &handler, &mut symtab);
        lexer.set_declaration_mode(false);
        lexer.next_token();
        assert!(handler.has_errors());
    }

    #[test]
    fn comments_are_skipped_entirely() {
        let toks = tokens("x { this is a comment } y");
        assert_eq!(toks.len(), 3); // x, y, eof
    }

    #[test]
    fn crlf_counts_as_one_line() {
        let toks = tokens("x\r\ny");
        assert_eq!(toks[0].span.line, 1);
        assert_eq!(toks[1].span.line, 2);
    }

    #[test]
    fn identifier_over_32_chars_is_rejected() {
        let handler = Handler::new();
        let mut symtab = SymbolTable::new();
        let long = "a".repeat(33);
        let mut lexer = Lexer::new(&long, &handler, &mut symtab);
        lexer.next_token();
        assert!(handler.has_errors());
    }

    #[test]
    fn integer_above_32767_is_rejected() {
        let handler = Handler::new();
        let mut symtab = SymbolTable::new();
        let mut lexer = Lexer::new("32768", &handler, &mut symtab);
        lexer.next_token();
        assert!(handler.has_errors());
    }
}
