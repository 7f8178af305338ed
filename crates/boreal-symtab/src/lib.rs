//! The Symbol Table (§4.1): a stack of case-insensitive scopes shared,
//! single-threaded, by the Lexer (which declares and looks up identifiers as
//! it scans) and the Semantic Actions (which flesh out each symbol's kind,
//! data type, and offset once its declaration is fully parsed).
//!
//! Generalised from `faxc-sem::scope::ScopeTree` (`Rib`/`RibId`) — the
//! same parent-linked-vector shape, renamed to match Boreal's vocabulary
//! and carrying a richer per-symbol record since the Symbol Table is a
//! first-class, externally observable component rather than an internal
//! resolver detail.

mod error;
mod scope;
mod symbol_entry;

pub use error::SymtabError;
pub use scope::{Scope, ScopeId};
pub use symbol_entry::{DataType, Parameter, SymbolEntry, SymbolKind};

use boreal_util::{DefId, IndexVec, Span};

pub struct SymbolTable {
    scopes: IndexVec<ScopeId, Scope>,
    current: ScopeId,
    entries: IndexVec<DefId, SymbolEntry>,
}

const GLOBAL_SCOPE_NAME: &str = "global";

impl SymbolTable {
    pub fn new() -> Self {
        let mut scopes = IndexVec::new();
        let root = scopes.push(Scope::new(GLOBAL_SCOPE_NAME.to_string(), None));
        Self {
            scopes,
            current: root,
            entries: IndexVec::new(),
        }
    }

    /// Pushes a fresh child scope named `name` and makes it current.
    pub fn enter_scope(&mut self, name: &str) -> ScopeId {
        let parent = self.current;
        let id = self.scopes.push(Scope::new(name.to_string(), Some(parent)));
        self.scopes[parent].children.push(id);
        self.current = id;
        id
    }

    /// Pops back to the parent of the current scope. Never pops the global
    /// scope — calling this while already at global is a no-op.
    pub fn exit_scope(&mut self) {
        if let Some(parent) = self.scopes[self.current].parent {
            self.current = parent;
        }
    }

    pub fn current_scope_name(&self) -> &str {
        &self.scopes[self.current].name
    }

    pub fn current_scope(&self) -> ScopeId {
        self.current
    }

    /// Defines a fresh, `UNKNOWN`-kinded symbol named `name` in the current
    /// scope. Returns `Err` with the already-defined `DefId` if `name`
    /// (compared case-insensitively) already exists in the current scope —
    /// callers that only need the boolean outcome can match on `is_err()`.
    pub fn define(&mut self, name: &str, span: Span) -> Result<DefId, DefId> {
        let key = canonical(name);
        if let Some(&existing) = self.scopes[self.current].symbols.get(&key) {
            return Err(existing);
        }
        let entry = SymbolEntry::new(name.to_string(), self.current, span);
        let def_id = self.entries.push(entry);
        self.scopes[self.current].symbols.insert(key, def_id);
        Ok(def_id)
    }

    /// Walks the scope stack from innermost to outermost (global).
    pub fn lookup(&self, name: &str) -> Option<DefId> {
        let key = canonical(name);
        let mut scope = self.current;
        loop {
            if let Some(&id) = self.scopes[scope].symbols.get(&key) {
                return Some(id);
            }
            match self.scopes[scope].parent {
                Some(parent) => scope = parent,
                None => return None,
            }
        }
    }

    pub fn lookup_in_current_scope(&self, name: &str) -> Option<DefId> {
        self.scopes[self.current]
            .symbols
            .get(&canonical(name))
            .copied()
    }

    pub fn get(&self, id: DefId) -> &SymbolEntry {
        &self.entries[id]
    }

    pub fn get_mut(&mut self, id: DefId) -> &mut SymbolEntry {
        &mut self.entries[id]
    }

    /// Every symbol ever defined, in declaration order, regardless of which
    /// scope it lives in — used by the CLI driver to dump the whole table.
    pub fn symbols(&self) -> impl Iterator<Item = (DefId, &SymbolEntry)> {
        self.entries.iter_enumerated()
    }

    /// Sets a symbol's kind, enforcing the one-way `UNKNOWN -> {...}`
    /// transition (§3 invariants: "never backwards").
    pub fn set_kind(&mut self, id: DefId, kind: SymbolKind) -> Result<(), SymtabError> {
        let entry = self.get_mut(id);
        if entry.kind != SymbolKind::Unknown {
            return Err(SymtabError::KindAlreadySet {
                name: entry.original_name.clone(),
                existing: entry.kind,
                attempted: kind,
            });
        }
        entry.kind = kind;
        Ok(())
    }

    /// Drops every scope and symbol and starts over, for re-analysing a new
    /// buffer without constructing a new table.
    pub fn reset(&mut self) {
        *self = SymbolTable::new();
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

fn canonical(name: &str) -> String {
    name.to_ascii_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn define_is_case_insensitive_within_a_scope() {
        let mut table = SymbolTable::new();
        let first = table.define("Counter", Span::DUMMY);
        assert!(first.is_ok());
        let dup = table.define("COUNTER", Span::DUMMY);
        assert!(dup.is_err());
    }

    #[test]
    fn lookup_walks_outward_through_enclosing_scopes() {
        let mut table = SymbolTable::new();
        let outer = table.define("x", Span::DUMMY).unwrap();
        table.enter_scope("inner");
        assert_eq!(table.lookup("x"), Some(outer));
        assert_eq!(table.lookup_in_current_scope("x"), None);
    }

    #[test]
    fn shadowing_prefers_the_innermost_definition() {
        let mut table = SymbolTable::new();
        let outer = table.define("x", Span::DUMMY).unwrap();
        table.enter_scope("inner");
        let inner = table.define("x", Span::DUMMY).unwrap();
        assert_ne!(outer, inner);
        assert_eq!(table.lookup("x"), Some(inner));
        table.exit_scope();
        assert_eq!(table.lookup("x"), Some(outer));
    }

    #[test]
    fn exit_scope_never_pops_global() {
        let mut table = SymbolTable::new();
        table.exit_scope();
        assert_eq!(table.current_scope_name(), "global");
    }

    #[test]
    fn kind_transitions_exactly_once() {
        let mut table = SymbolTable::new();
        let id = table.define("f", Span::DUMMY).unwrap();
        assert!(table.set_kind(id, SymbolKind::Function).is_ok());
        assert!(table.set_kind(id, SymbolKind::Variable).is_err());
    }
}
