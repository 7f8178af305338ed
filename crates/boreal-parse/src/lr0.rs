//! The LR(0) automaton: items, closure, goto, and the canonical
//! collection of states the SLR(1) table is built over (§4.3: "Canonical
//! SLR(1) shift-reduce").

use crate::grammar::Grammar;
use crate::symbol::GSym;
use rustc_hash::FxHashMap;
use std::collections::BTreeSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Item {
    pub production: u16,
    /// Position of the dot within the RHS, `0..=rhs.len()`.
    pub dot: u16,
}

pub type ItemSet = BTreeSet<Item>;

impl Item {
    fn symbol_after_dot(self, grammar: &Grammar) -> Option<GSym> {
        grammar.productions[self.production as usize]
            .rhs
            .get(self.dot as usize)
            .copied()
    }

    fn advanced(self) -> Item {
        Item {
            production: self.production,
            dot: self.dot + 1,
        }
    }
}

/// Closes `items` under "if `A -> a . B b` is in the set, add `B -> . g`
/// for every production of `B`."
pub fn closure(items: ItemSet, grammar: &Grammar) -> ItemSet {
    let mut set = items;
    let mut changed = true;
    while changed {
        changed = false;
        let snapshot: Vec<Item> = set.iter().copied().collect();
        for item in snapshot {
            if let Some(GSym::NonTerminal(nt)) = item.symbol_after_dot(grammar) {
                for (i, production) in grammar.productions.iter().enumerate() {
                    if production.lhs == nt {
                        changed |= set.insert(Item {
                            production: i as u16,
                            dot: 0,
                        });
                    }
                }
            }
        }
    }
    set
}

/// `goto(items, X)`: advance every item whose symbol after the dot is
/// `X`, then close the result.
pub fn goto(items: &ItemSet, symbol: GSym, grammar: &Grammar) -> ItemSet {
    let moved: ItemSet = items
        .iter()
        .filter(|item| item.symbol_after_dot(grammar) == Some(symbol))
        .map(|item| item.advanced())
        .collect();
    closure(moved, grammar)
}

pub struct Automaton {
    pub states: Vec<ItemSet>,
    pub transitions: FxHashMap<(usize, GSym), usize>,
}

/// Builds the canonical collection of LR(0) item sets by repeatedly
/// applying `goto` to every already-discovered state until no new state
/// appears.
pub fn build_automaton(grammar: &Grammar) -> Automaton {
    let start_item = Item {
        production: 0,
        dot: 0,
    };
    let start_state = closure(ItemSet::from([start_item]), grammar);

    let mut states = vec![start_state];
    let mut index: FxHashMap<ItemSet, usize> = FxHashMap::default();
    index.insert(states[0].clone(), 0);
    let mut transitions = FxHashMap::default();

    let mut worklist = vec![0usize];
    while let Some(state_id) = worklist.pop() {
        let symbols: Vec<GSym> = states[state_id]
            .iter()
            .filter_map(|item| item.symbol_after_dot(grammar))
            .collect();
        let mut seen = BTreeSet::new();
        for symbol in symbols {
            if !seen.insert(symbol) {
                continue;
            }
            let target = goto(&states[state_id], symbol, grammar);
            if target.is_empty() {
                continue;
            }
            let target_id = *index.entry(target.clone()).or_insert_with(|| {
                states.push(target);
                worklist.push(states.len() - 1);
                states.len() - 1
            });
            transitions.insert((state_id, symbol), target_id);
        }
    }

    Automaton {
        states,
        transitions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::BOREAL_GRAMMAR;

    #[test]
    fn start_state_closure_includes_every_declaration_alternative() {
        let g = Grammar::from_text(BOREAL_GRAMMAR);
        let automaton = build_automaton(&g);
        // Reachable via Program -> . program ... ; the start state itself
        // only needs the augmented item and Program's productions, but a
        // non-trivial automaton must contain more than one state.
        assert!(automaton.states.len() > 10);
    }

    #[test]
    fn goto_on_program_keyword_advances_the_dot() {
        let g = Grammar::from_text(BOREAL_GRAMMAR);
        let automaton = build_automaton(&g);
        let program_kw = GSym::Terminal(g.terminal_id("program").unwrap());
        assert!(automaton.transitions.contains_key(&(0, program_kw)));
    }
}
