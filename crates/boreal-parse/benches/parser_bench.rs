//! Benchmarks the SLR(1) driver loop over a representative Boreal program
//! exercising every statement form (§4.4), independent of `boreal-sem` —
//! the semantic actions here are a no-op stand-in, same as the driver's
//! own unit tests use.

use boreal_lex::{Lexer, Token};
use boreal_parse::{parse, Attribute};
use boreal_symtab::SymbolTable;
use boreal_util::{Handler, Span};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

#[derive(Clone, Debug)]
struct BenchAttr {
    span: Span,
}

impl Attribute for BenchAttr {
    fn span(&self) -> Span {
        self.span
    }
    fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }
}

/// Toggles the lexer's declare/use mode the same way `boreal-sem`'s real
/// actions do, without any of the type-checking work, so the sample
/// program below exercises the full grammar instead of drowning in
/// "already declared" lexical errors the moment an identifier is reused.
struct NoopActions;

impl boreal_parse::SemanticActions<BenchAttr> for NoopActions {
    fn token_attribute(&mut self, token: &Token) -> BenchAttr {
        BenchAttr { span: token.span }
    }

    fn reduce(&mut self, production: u32, _rhs: &[BenchAttr], lexer: &mut Lexer) -> BenchAttr {
        let grammar = boreal_parse::grammar();
        let lhs = grammar.productions[production as usize].lhs;
        match grammar.nonterminal_name(lhs) {
            "ScopeBody" => lexer.set_declaration_mode(false),
            "Program" | "ProcDecl" | "FuncDecl" => lexer.set_declaration_mode(true),
            _ => {}
        }
        BenchAttr { span: Span::DUMMY }
    }
}

const SOURCE: &str = "
program Sample;
    var total: integer;
    var flag: logical;

    function square(n: integer): integer;
    begin
        return n * n;
    end;

    procedure accumulate(var acc: integer; n: integer);
    begin
        acc := acc + square(n);
    end;

begin
    total := 0;
    flag := true;
    for total to 10 do
        accumulate(total, total);
    while flag do
        flag := total in (1, 2, 3);
    repeat
        total := total - 1;
    until total <= 0;
    case total of
        0: write(\"done\");
        otherwise write(\"not done\");
    end;
    loop
        exit when total = 0;
        total := max(total - 1, 0);
    end;
end;
";

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse_sample_program", |b| {
        b.iter(|| {
            let handler = Handler::new();
            let mut symtab = SymbolTable::new();
            let mut lexer = Lexer::new(black_box(SOURCE), &handler, &mut symtab);
            let mut actions = NoopActions;
            parse(
                boreal_parse::grammar(),
                boreal_parse::table(),
                &mut lexer,
                &mut actions,
                &handler,
                false,
            )
        })
    });
}

criterion_group!(benches, bench_parse);
criterion_main!(benches);
