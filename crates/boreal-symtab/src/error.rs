use crate::SymbolKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SymtabError {
    #[error("symbol `{name}` already has kind {existing:?}, cannot set to {attempted:?}")]
    KindAlreadySet {
        name: String,
        existing: SymbolKind,
        attempted: SymbolKind,
    },
}
