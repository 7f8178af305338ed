//! Maps a lexer [`Token`] to the terminal spelling used in
//! [`crate::grammar::BOREAL_GRAMMAR`], so the driver can look a token up
//! directly as an ACTION/GOTO table column.

use boreal_lex::{keyword_text, Operator, Token, TokenKind};

pub fn terminal_name(token: &Token) -> &'static str {
    match &token.kind {
        TokenKind::Eof => "eof",
        TokenKind::Identifier => "identifier",
        TokenKind::IntegerLiteral(_) => "integer_literal",
        TokenKind::StringLiteral(_) => "string_literal",
        TokenKind::Keyword(k) => keyword_text(*k),
        TokenKind::Operator(op) => operator_name(*op),
    }
}

fn operator_name(op: Operator) -> &'static str {
    match op {
        Operator::Assign => ":=",
        Operator::Le => "<=",
        Operator::Ne => "<>",
        Operator::Ge => ">=",
        Operator::Power => "**",
        Operator::Lt => "<",
        Operator::Gt => ">",
        Operator::Plus => "+",
        Operator::Minus => "-",
        Operator::Star => "*",
        Operator::Slash => "/",
        Operator::Equal => "=",
        Operator::LParen => "(",
        Operator::RParen => ")",
        Operator::Semicolon => ";",
        Operator::Colon => ":",
        Operator::Comma => ",",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boreal_lex::Keyword;
    use boreal_util::Span;

    #[test]
    fn keyword_tokens_use_their_reserved_spelling() {
        let token = Token {
            kind: TokenKind::Keyword(Keyword::Program),
            lexeme: "program".to_string(),
            span: Span::DUMMY,
            symbol: None,
        };
        assert_eq!(terminal_name(&token), "program");
    }
}
