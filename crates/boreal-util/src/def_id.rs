//! Globally unique ids handed out to symbols so the Symbol Table, a
//! lexer-attached identifier token, and the semantic-token stream can all
//! refer to the same symbol without aliasing a `&SymbolEntry`.

use crate::index_vec::Idx;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DefId(u32);

impl DefId {
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

/// `DefId`s are handed out sequentially by `IndexVec::push` on the Symbol
/// Table's entry list, so they double as the index into an
/// `IndexVec<DefId, _>` of symbol records without a separate lookup table.
impl Idx for DefId {
    fn from_usize(idx: usize) -> Self {
        assert!(idx <= u32::MAX as usize, "def id {} exceeds u32::MAX", idx);
        DefId(idx as u32)
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}
