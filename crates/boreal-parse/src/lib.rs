//! The Parser (§4.3): a canonical SLR(1) shift-reduce driver over a
//! generated ACTION/GOTO table, plus the table generator itself (LR(0)
//! automaton + FIRST/FOLLOW sets) and a textual table loader matching the
//! format §6 describes.

mod attribute;
mod driver;
mod first_follow;
mod grammar;
mod lr0;
mod symbol;
mod table;
mod terminal;

pub use attribute::Attribute;
pub use driver::{parse, SemanticActions};
pub use grammar::{Grammar, Production, BOREAL_GRAMMAR};
pub use symbol::GSym;
pub use table::{Action, Table, TableError};
pub use terminal::terminal_name;

use std::sync::OnceLock;

/// The Boreal grammar and its generated SLR(1) table, built once and
/// shared read-only across analyses (§9 "Table ownership").
pub fn grammar() -> &'static Grammar {
    static GRAMMAR: OnceLock<Grammar> = OnceLock::new();
    GRAMMAR.get_or_init(|| Grammar::from_text(BOREAL_GRAMMAR))
}

pub fn table() -> &'static Table {
    static TABLE: OnceLock<Table> = OnceLock::new();
    TABLE.get_or_init(|| Table::build_slr(grammar()).expect("Boreal grammar must be SLR(1)"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use boreal_lex::{Lexer, Token};
    use boreal_symtab::SymbolTable;
    use boreal_util::{Handler, Span};

    #[derive(Clone, Debug, PartialEq)]
    struct TestAttr {
        span: Span,
        text: String,
    }

    impl Attribute for TestAttr {
        fn span(&self) -> Span {
            self.span
        }
        fn with_span(mut self, span: Span) -> Self {
            self.span = span;
            self
        }
    }

    /// A semantic-action stand-in that just concatenates lexemes, enough
    /// to prove the driver shifts/reduces/accepts correctly without
    /// depending on `boreal-sem`.
    struct RecordingActions {
        reductions: Vec<u32>,
    }

    impl SemanticActions<TestAttr> for RecordingActions {
        fn token_attribute(&mut self, token: &Token) -> TestAttr {
            TestAttr {
                span: token.span,
                text: token.lexeme.clone(),
            }
        }

        fn reduce(&mut self, production: u32, rhs: &[TestAttr], _lexer: &mut Lexer) -> TestAttr {
            self.reductions.push(production);
            TestAttr {
                span: Span::DUMMY,
                text: rhs.iter().map(|a| a.text.as_str()).collect::<Vec<_>>().join(" "),
            }
        }
    }

    fn run(src: &str) -> (Option<TestAttr>, Handler, RecordingActions) {
        let handler = Handler::new();
        let mut symtab = SymbolTable::new();
        let mut lexer = Lexer::new(src, &handler, &mut symtab);
        let mut actions = RecordingActions { reductions: Vec::new() };
        let result = parse(grammar(), table(), &mut lexer, &mut actions, &handler, false);
        (result, handler, actions)
    }

    #[test]
    fn accepts_a_minimal_program() {
        let (result, handler, _) = run("program P; var x : integer ; begin x := 2 + 3 ; end ;");
        assert!(!handler.has_errors(), "{:?}", handler.diagnostics());
        assert!(result.is_some());
    }

    #[test]
    fn accepts_a_function_declaration() {
        let (result, handler, _) = run(
            "program P; function f ( a : integer ) : integer ; begin return a + 1 ; end ; begin end ;",
        );
        assert!(!handler.has_errors(), "{:?}", handler.diagnostics());
        assert!(result.is_some());
    }

    #[test]
    fn rejects_a_missing_semicolon_with_an_expected_set() {
        let (result, handler, _) = run("program P var x : integer ; begin end ;");
        assert!(result.is_none());
        assert!(handler.has_errors());
    }

    #[test]
    fn dangling_else_binds_to_the_nearest_if() {
        let (result, handler, _) = run(
            "program P; var x : integer ; begin if x then if x then x := 1 else x := 2 ; end ;",
        );
        assert!(!handler.has_errors(), "{:?}", handler.diagnostics());
        assert!(result.is_some());
    }

    #[test]
    fn accepts_loop_case_and_in_expressions() {
        let (result, handler, _) = run(
            "program P; var x : integer ; begin \
             loop exit when x in ( 1 , 2 , 3 ) ; end ; \
             case x of 1 : x := 1 ; otherwise x := 0 ; end ; \
             end ;",
        );
        assert!(!handler.has_errors(), "{:?}", handler.diagnostics());
        assert!(result.is_some());
    }
}
