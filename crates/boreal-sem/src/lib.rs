//! Semantic Actions (spec 4.4) plus the two entry points a caller actually
//! drives the pipeline through: [`analyze`] and [`find_definition`].
//!
//! Wiring is the same three-stage pipeline every crate below this one
//! builds towards: a [`boreal_symtab::SymbolTable`] shared by a
//! [`boreal_lex::Lexer`] (which `define`s/`lookup`s identifiers as it
//! scans) and an [`Actions`] (which `enterScope`/`exitScope`s and fleshes
//! out each symbol once its declaration is fully parsed), driven by
//! [`boreal_parse::parse`].

pub mod actions;
pub mod attrs;
pub mod tokens;
pub mod types;

pub use actions::Actions;
pub use attrs::{Attrs, IdentRef};
pub use tokens::{Occurrence, SemanticToken, SemanticTokenType};
pub use types::{ParamSig, TypeTag};

use boreal_lex::Lexer;
use boreal_symtab::SymbolTable;
use boreal_util::{Diagnostic, ErrorRecord, Handler, Level, Origin, Span};

/// The `analyze(sourceText)` result (spec 6 "Core entry point").
pub struct AnalysisResult {
    pub diagnostics: Vec<Diagnostic>,
    pub lexical_errors: Vec<ErrorRecord>,
    pub syntax_errors: Vec<ErrorRecord>,
    pub semantic_errors: Vec<ErrorRecord>,
    pub semantic_warnings: Vec<ErrorRecord>,
    pub semantic_tokens: Vec<SemanticToken>,
    pub symbol_table: SymbolTable,
    pub accepted: bool,
}

impl AnalysisResult {
    pub fn has_errors(&self) -> bool {
        !self.lexical_errors.is_empty() || !self.syntax_errors.is_empty() || !self.semantic_errors.is_empty()
    }
}

/// Runs the full pipeline once over `source`: lex, parse, and drive the
/// semantic actions to completion (or to the first syntax error), then
/// resolve the recorded identifier occurrences into the semantic-token
/// stream and split the shared diagnostic list back out by origin.
pub fn analyze(source: &str) -> AnalysisResult {
    let handler = Handler::new();
    let mut symtab = SymbolTable::new();
    let (program_count, occurrences, accepted);
    {
        let mut lexer = Lexer::new(source, &handler, &mut symtab);
        let mut actions = Actions::new(&handler);
        let result = boreal_parse::parse(boreal_parse::grammar(), boreal_parse::table(), &mut lexer, &mut actions, &handler, false);
        accepted = result.is_some();
        program_count = actions.program_count();
        occurrences = actions.occurrences().to_vec();
    }

    // The "exactly one program" check (4.4 Open Questions) runs here,
    // independent of whether the rest of the file parsed cleanly: a
    // `ProgramHeader` reduce always fires before any syntax error can
    // abort the parse, so `program_count` is meaningful either way.
    if program_count == 0 {
        handler.emit(Diagnostic::error(Origin::Semantic, "no 'program' declaration found", Span::DUMMY));
    } else if program_count > 1 {
        handler.emit(Diagnostic::error(Origin::Semantic, "more than one 'program' declaration found", Span::DUMMY));
    }

    let semantic_tokens = tokens::resolve(&occurrences, &symtab);
    let semantic = handler.by_origin(Origin::Semantic);
    let semantic_errors = semantic.iter().filter(|d| d.level == Level::Error).map(Diagnostic::to_record).collect();
    let semantic_warnings = semantic.iter().filter(|d| d.level == Level::Warning).map(Diagnostic::to_record).collect();

    AnalysisResult {
        lexical_errors: handler.by_origin(Origin::Lexer).iter().map(Diagnostic::to_record).collect(),
        syntax_errors: handler.by_origin(Origin::Parser).iter().map(Diagnostic::to_record).collect(),
        semantic_errors,
        semantic_warnings,
        semantic_tokens,
        diagnostics: handler.diagnostics(),
        symbol_table: symtab,
        accepted,
    }
}

/// `findDefinition(sourceText, line, column)` (spec 6): stops lexing just
/// past the query position (the same stop-at protocol 5 describes for
/// cancellation) and looks up whichever identifier occurrence, if any,
/// covers that position. Returns `None` if a lexical or syntax error was
/// recorded anywhere in the truncated prefix.
pub fn find_definition(source: &str, line: u32, column: u32) -> Option<Span> {
    let handler = Handler::new();
    let mut symtab = SymbolTable::new();
    let occurrences;
    {
        let mut lexer = Lexer::new(source, &handler, &mut symtab);
        lexer.arm_stop_at(line, column);
        let mut actions = Actions::new(&handler);
        boreal_parse::parse(boreal_parse::grammar(), boreal_parse::table(), &mut lexer, &mut actions, &handler, true);
        occurrences = actions.occurrences().to_vec();
    }
    if !handler.by_origin(Origin::Lexer).is_empty() || !handler.by_origin(Origin::Parser).is_empty() {
        return None;
    }
    let occ = occurrences.iter().find(|occ| {
        occ.span.line == line && occ.span.column <= column && column < occ.span.column + occ.span.len() as u32
    })?;
    Some(symtab.get(occ.symbol).definition_site)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(result: &AnalysisResult) -> Vec<String> {
        result.diagnostics.iter().map(|d| d.message.clone()).collect()
    }

    #[test]
    fn scenario_1_clean_program_reports_no_errors() {
        let result = analyze("program P; var x: integer; begin x := 2 + 3; end;");
        assert!(!result.has_errors(), "{:?}", messages(&result));
        assert!(result.accepted);
    }

    #[test]
    fn scenario_2_undeclared_variable_is_a_semantic_error() {
        let result = analyze("program P; begin y := 1; end;");
        // `y` is undeclared, so the Lexer itself reports it and returns no
        // token for the occurrence (4.2) — it never reaches AssignStmt.
        assert!(result.has_errors());
        assert!(messages(&result).iter().any(|m| m.contains("not declared")));
    }

    #[test]
    fn scenario_3_assigning_logical_to_integer_is_a_type_error() {
        let result = analyze("program P; var x: integer; begin x := true; end;");
        assert!(messages(&result).iter().any(|m| m == "integer is not compatible with logical"));
    }

    #[test]
    fn scenario_4_function_declaration_round_trips_cleanly() {
        let result = analyze(
            "program P; function f(a: integer): integer; begin return a + 1; end; begin end;",
        );
        assert!(!result.has_errors(), "{:?}", messages(&result));
        let f = result
            .symbol_table
            .lookup("f")
            .map(|id| result.symbol_table.get(id))
            .expect("f must be declared");
        assert_eq!(f.kind, boreal_symtab::SymbolKind::Function);
        assert_eq!(f.return_type, Some(boreal_symtab::DataType::Integer));
        assert_eq!(f.parameters.len(), 1);
        assert!(!f.parameters[0].by_reference);
        assert_eq!(f.parameters[0].data_type, boreal_symtab::DataType::Integer);
    }

    #[test]
    fn scenario_5_undeclared_variable_inside_a_loop_is_reported() {
        // `x` is undeclared, so the Lexer drops its token entirely (4.2
        // "return no token") and the parser desyncs on the following
        // `:=` — a fatal syntax error with no recovery (4.3), so the
        // `loop ... end` production never reduces and its own "must
        // contain at least one exit" check never runs. Only the
        // lexical error is observable here.
        let result = analyze("program P; begin loop x := 1; end; end;");
        assert!(messages(&result).iter().any(|m| m.contains("not declared")));
    }

    #[test]
    fn loop_without_exit_is_reported_when_it_parses_cleanly() {
        let result = analyze("program P; var x: integer; begin loop x := 1; end; end;");
        assert!(messages(&result).iter().any(|m| m == "Loop must contain at least one exit"));
    }

    #[test]
    fn scenario_6_non_logical_if_condition_is_an_error() {
        let result = analyze("program P; var x: integer; begin if 1 + 1 then x := 0; end;");
        assert!(messages(&result).iter().any(|m| m.contains("condition must be logical")));
    }

    #[test]
    fn symbol_table_ends_back_at_the_global_scope() {
        let result = analyze("program P; var x: integer; begin x := 1; end;");
        assert_eq!(result.symbol_table.current_scope_name(), "global");
    }

    #[test]
    fn missing_program_header_is_reported() {
        let result = analyze("var x: integer;");
        assert!(messages(&result).iter().any(|m| m.contains("no 'program' declaration")));
    }

    #[test]
    fn duplicate_declaration_in_one_scope_is_a_lexical_error() {
        let result = analyze("program P; var x: integer; var x: integer; begin end;");
        assert!(!result.lexical_errors.is_empty());
        assert!(result.lexical_errors.iter().any(|e| e.message.contains("already declared")));
    }

    #[test]
    fn exit_when_outside_a_loop_is_flagged_at_the_subprogram_end() {
        let result = analyze("program P; var x: integer; begin exit; end;");
        assert!(messages(&result).iter().any(|m| m.contains("not inside a 'loop' or 'repeat'")));
    }

    #[test]
    fn calling_an_undeclared_arity_mismatch_is_a_type_error() {
        let result = analyze(
            "program P; procedure p(a: integer); begin end; begin p(); end;",
        );
        assert!(messages(&result).iter().any(|m| m.contains("expects 1 argument")));
    }

    #[test]
    fn procedure_used_in_an_expression_is_rejected() {
        let result = analyze(
            "program P; var x: integer; procedure p(); begin end; begin x := p(); end;",
        );
        assert!(messages(&result).iter().any(|m| m.contains("cannot be used in an expression")));
    }

    #[test]
    fn read_argument_must_be_a_bare_identifier() {
        let result = analyze("program P; var x: integer; begin read(x + 1); end;");
        assert!(messages(&result).iter().any(|m| m.contains("must be identifiers")));
    }

    #[test]
    fn find_definition_resolves_a_use_site_back_to_its_declaration() {
        let source = "program P; var count: integer; begin count := count + 1; end;";
        // column 37 is the start of the `count :=` use site.
        let def_span = find_definition(source, 1, 37).expect("expected a definition");
        let decl_pos = source.find("count:").unwrap();
        assert_eq!(def_span.start, decl_pos);
    }

    #[test]
    fn find_definition_returns_none_past_a_lexical_error() {
        let source = "program P; begin y := 1; end;";
        assert!(find_definition(source, 1, 17).is_none());
    }
}
