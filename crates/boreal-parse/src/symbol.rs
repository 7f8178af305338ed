//! Grammar symbols. A production's right-hand side is a sequence of
//! [`GSym`]s; terminals and non-terminals are interned separately so both
//! can be cheap `u16` ids into the [`crate::grammar::Grammar`]'s name
//! tables.

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GSym {
    Terminal(u16),
    NonTerminal(u16),
}

impl GSym {
    pub fn is_terminal(self) -> bool {
        matches!(self, GSym::Terminal(_))
    }
}

/// A grammar-text token is a non-terminal if its first character is an
/// ASCII uppercase letter; every other spelling (keywords, punctuation,
/// the lexer's token-category names) is a terminal.
pub fn looks_like_nonterminal(token: &str) -> bool {
    token.chars().next().is_some_and(|c| c.is_ascii_uppercase())
}
