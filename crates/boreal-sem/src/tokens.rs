//! The semantic-token stream (spec 6): `{line, column, length, tokenType,
//! modifiers}` for every resolved identifier occurrence, built after parsing
//! completes by resolving each occurrence's `DefId` against the final
//! `SymbolTable` rather than at the moment the token is shifted, since a
//! declaration's own symbol kind isn't known until its declaring production
//! reduces, which happens after the identifier has already been shifted.

use boreal_symtab::{SymbolKind, SymbolTable};
use boreal_util::{DefId, Span};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SemanticTokenType {
    Variable,
    Function,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SemanticToken {
    pub line: u32,
    pub column: u32,
    pub length: usize,
    pub token_type: SemanticTokenType,
    /// The only modifier spec 6 names is `definition`; a flag is enough.
    pub is_definition: bool,
}

/// One identifier occurrence recorded as it is shifted; resolved into a
/// [`SemanticToken`] once the symbol table holds every symbol's final kind.
#[derive(Clone, Copy, Debug)]
pub struct Occurrence {
    pub span: Span,
    pub symbol: DefId,
}

pub fn resolve(occurrences: &[Occurrence], symtab: &SymbolTable) -> Vec<SemanticToken> {
    occurrences
        .iter()
        .filter_map(|occ| {
            let entry = symtab.get(occ.symbol);
            let token_type = match entry.kind {
                SymbolKind::Variable | SymbolKind::Parameter => SemanticTokenType::Variable,
                SymbolKind::Function | SymbolKind::Procedure | SymbolKind::Program => {
                    SemanticTokenType::Function
                }
                SymbolKind::Unknown => return None,
            };
            Some(SemanticToken {
                line: occ.span.line,
                column: occ.span.column,
                length: occ.span.len(),
                token_type,
                is_definition: occ.span == entry.definition_site,
            })
        })
        .collect()
}
