use boreal_util::DefId;
use rustc_hash::FxHashMap;

boreal_util::define_idx!(ScopeId);

/// One entry on the scope stack. The root (`parent: None`) is always the
/// global scope; every other scope is a procedure, function, or (were
/// nested blocks in scope) block introduced while entering a declaration.
#[derive(Debug)]
pub struct Scope {
    pub name: String,
    pub parent: Option<ScopeId>,
    pub children: Vec<ScopeId>,
    pub(crate) symbols: FxHashMap<String, DefId>,
}

impl Scope {
    pub(crate) fn new(name: String, parent: Option<ScopeId>) -> Self {
        Self {
            name,
            parent,
            children: Vec::new(),
            symbols: FxHashMap::default(),
        }
    }
}
