//! JSON-serialisable mirrors of `boreal-sem`'s result types.
//!
//! Kept separate from the analysis crates themselves: `boreal-sem` and
//! `boreal-util` carry no `serde` dependency (nothing inside the analysis
//! pipeline needs to serialise anything), so the CLI driver — the one
//! component spec 6 asks to emit JSON — owns the conversion instead.

use boreal_sem::{AnalysisResult, SemanticTokenType};
use boreal_util::ErrorRecord;
use serde::Serialize;

#[derive(Serialize)]
pub struct ErrorRecordReport {
    pub severity: String,
    pub message: String,
    pub position: usize,
    pub line: u32,
    pub column: u32,
    pub length: usize,
}

impl From<&ErrorRecord> for ErrorRecordReport {
    fn from(e: &ErrorRecord) -> Self {
        Self {
            severity: e.severity.to_string(),
            message: e.message.clone(),
            position: e.position,
            line: e.line,
            column: e.column,
            length: e.length,
        }
    }
}

#[derive(Serialize)]
pub struct SemanticTokenReport {
    pub line: u32,
    pub column: u32,
    pub length: usize,
    pub token_type: String,
    pub is_definition: bool,
}

#[derive(Serialize)]
pub struct ParameterReport {
    pub name: String,
    pub data_type: String,
    pub by_reference: bool,
}

#[derive(Serialize)]
pub struct SymbolReport {
    pub id: u32,
    pub name: String,
    pub kind: String,
    pub data_type: String,
    pub memory_offset: Option<u32>,
    pub return_type: Option<String>,
    pub parameters: Vec<ParameterReport>,
}

#[derive(Serialize)]
pub struct AnalysisReport {
    pub accepted: bool,
    pub lexical_errors: Vec<ErrorRecordReport>,
    pub syntax_errors: Vec<ErrorRecordReport>,
    pub semantic_errors: Vec<ErrorRecordReport>,
    pub semantic_warnings: Vec<ErrorRecordReport>,
    pub semantic_tokens: Vec<SemanticTokenReport>,
    pub symbols: Vec<SymbolReport>,
}

impl From<&AnalysisResult> for AnalysisReport {
    fn from(result: &AnalysisResult) -> Self {
        let semantic_tokens = result
            .semantic_tokens
            .iter()
            .map(|t| SemanticTokenReport {
                line: t.line,
                column: t.column,
                length: t.length,
                token_type: match t.token_type {
                    SemanticTokenType::Variable => "variable".to_string(),
                    SemanticTokenType::Function => "function".to_string(),
                },
                is_definition: t.is_definition,
            })
            .collect();

        let symbols = result
            .symbol_table
            .symbols()
            .map(|(id, entry)| SymbolReport {
                id: id.as_u32(),
                name: entry.original_name.clone(),
                kind: format!("{:?}", entry.kind),
                data_type: format!("{:?}", entry.data_type),
                memory_offset: entry.memory_offset,
                return_type: entry.return_type.map(|t| format!("{:?}", t)),
                parameters: entry
                    .parameters
                    .iter()
                    .map(|p| ParameterReport {
                        name: p.name.clone(),
                        data_type: format!("{:?}", p.data_type),
                        by_reference: p.by_reference,
                    })
                    .collect(),
            })
            .collect();

        Self {
            accepted: result.accepted,
            lexical_errors: result.lexical_errors.iter().map(ErrorRecordReport::from).collect(),
            syntax_errors: result.syntax_errors.iter().map(ErrorRecordReport::from).collect(),
            semantic_errors: result.semantic_errors.iter().map(ErrorRecordReport::from).collect(),
            semantic_warnings: result.semantic_warnings.iter().map(ErrorRecordReport::from).collect(),
            semantic_tokens,
            symbols,
        }
    }
}
