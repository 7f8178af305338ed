//! The Lexer (§4.2): a table-driven DFA that tokenises Boreal source text
//! one byte at a time, coupling identifier recognition to a shared
//! [`boreal_symtab::SymbolTable`] as it goes.

mod class;
mod cursor;
mod keywords;
mod lexer;
mod table;
mod token;

pub use lexer::{keyword_text, Lexer, MAX_IDENTIFIER_LEN, MAX_INTEGER_VALUE, MAX_STRING_CONTENT_LEN};
pub use token::{Keyword, Operator, Token, TokenKind};

#[cfg(test)]
mod proptests {
    use super::*;
    use boreal_symtab::SymbolTable;
    use boreal_util::Handler;
    use proptest::prelude::*;

    proptest! {
        /// The lexer must always terminate and eventually reach EOF,
        /// however garbled the input — no input should make it loop
        /// forever or consume past the end of the buffer (§8 invariants).
        #[test]
        fn lexer_terminates_on_arbitrary_input(src in "\\PC{0,200}") {
            let handler = Handler::new();
            let mut symtab = SymbolTable::new();
            let mut lexer = Lexer::new(&src, &handler, &mut symtab);
            let mut steps = 0;
            loop {
                let tok = lexer.next_token();
                steps += 1;
                prop_assert!(steps < src.len() + 1000);
                if tok.is_eof() {
                    break;
                }
            }
        }
    }
}
