//! The shift-reduce driver (§4.3 "Driver"): a dual-stack SLR(1) loop that
//! pulls tokens from the [`Lexer`] one at a time and dispatches reductions
//! to a caller-supplied [`SemanticActions`] implementation.

use crate::attribute::Attribute;
use crate::grammar::Grammar;
use crate::table::{Action, Table};
use crate::terminal;
use boreal_lex::Lexer;
use boreal_util::{Diagnostic, Handler, Origin, Span};

/// One action per production (§4.4); `reduce` receives the already-popped
/// RHS attributes in left-to-right order and returns the LHS attribute
/// (its span is overwritten by the driver with the RHS concatenation
/// immediately afterwards, per §4.3 "Span propagation").
pub trait SemanticActions<A: Attribute> {
    fn token_attribute(&mut self, token: &boreal_lex::Token) -> A;
    /// `lexer` is reborrowed from the driver's own handle for the
    /// duration of this call — exactly long enough for mode toggling
    /// (§4.4(1)) and Symbol Table edits through [`Lexer::symtab_mut`].
    fn reduce(&mut self, production: u32, rhs: &[A], lexer: &mut Lexer) -> A;
}

/// Runs the shift-reduce loop to completion. `partial` mirrors §5's
/// "go-to-definition" cancellation contract: when `true`, an unexpected
/// end-of-stream (the lexer's stop-at protocol firing mid-construct) is
/// treated as normal EOF rather than reported as a syntax error.
pub fn parse<A: Attribute>(
    grammar: &Grammar,
    table: &Table,
    lexer: &mut Lexer,
    actions: &mut impl SemanticActions<A>,
    handler: &Handler,
    partial: bool,
) -> Option<A> {
    let mut states: Vec<u32> = vec![0];
    let mut attrs: Vec<A> = Vec::new();
    let mut lookahead = lexer.next_token();

    loop {
        let state = *states.last().expect("state stack is never empty");
        let name = terminal::terminal_name(&lookahead);
        let Some(terminal_id) = grammar.terminal_id(name) else {
            report_syntax_error(grammar, table, state, &lookahead, handler);
            return None;
        };

        match table.action(state, terminal_id) {
            Some(Action::Shift(next)) => {
                attrs.push(actions.token_attribute(&lookahead));
                states.push(next);
                lookahead = lexer.next_token();
            }
            Some(Action::Reduce(production_id)) => {
                let production = &grammar.productions[production_id as usize];
                let arity = production.rhs.len();
                let split_at = attrs.len() - arity;
                let popped: Vec<A> = attrs.split_off(split_at);
                states.truncate(states.len() - arity);

                let span = reduced_span(&popped, &lookahead.span);
                let result = actions.reduce(production_id, &popped, lexer).with_span(span);

                let top = *states.last().expect("state stack is never empty");
                let goto_state = table
                    .goto(top, production.lhs)
                    .unwrap_or_else(|| panic!("missing GOTO[{top}, {}]", production.lhs));
                states.push(goto_state);
                attrs.push(result);
            }
            Some(Action::Accept) => return attrs.pop(),
            None => {
                if partial && lookahead.is_eof() {
                    return None;
                }
                report_syntax_error(grammar, table, state, &lookahead, handler);
                return None;
            }
        }
    }
}

/// The reduced non-terminal's span: concatenation of its RHS spans, or a
/// zero-length point at the lookahead's position for an empty RHS (§4.3
/// "Span propagation").
fn reduced_span<A: Attribute>(rhs: &[A], lookahead_span: &Span) -> Span {
    match rhs.split_first() {
        Some((first, rest)) => rest
            .iter()
            .fold(first.span(), |acc, a| acc.merge(a.span())),
        None => Span::point(lookahead_span.start, lookahead_span.line, lookahead_span.column),
    }
}

fn report_syntax_error(
    grammar: &Grammar,
    table: &Table,
    state: u32,
    found: &boreal_lex::Token,
    handler: &Handler,
) {
    let expected: Vec<&str> = table
        .expected_terminals(state)
        .into_iter()
        .map(|t| grammar.terminal_name(t))
        .collect();
    let message = format!(
        "unexpected {}, expected one of: {}",
        terminal::terminal_name(found),
        expected.join(", "),
    );
    handler.emit(Diagnostic::error(Origin::Parser, message, found.span));
}
