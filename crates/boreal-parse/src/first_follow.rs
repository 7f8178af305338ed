//! FIRST/FOLLOW set computation over a [`Grammar`], the input the SLR(1)
//! table builder needs alongside the LR(0) automaton (§4.3: "canonical
//! SLR(1) shift-reduce").

use crate::grammar::Grammar;
use crate::symbol::GSym;
use rustc_hash::{FxHashMap, FxHashSet};

pub type FirstSets = FxHashMap<u16, FxHashSet<u16>>;
pub type FollowSets = FxHashMap<u16, FxHashSet<u16>>;
pub type NullableSet = FxHashMap<u16, bool>;

/// Which non-terminals can derive the empty string, by fixed-point
/// iteration over the productions whose RHS is empty or all-nullable.
pub fn compute_nullable(grammar: &Grammar) -> NullableSet {
    let mut nullable: NullableSet = grammar
        .nonterminals
        .iter()
        .enumerate()
        .map(|(i, _)| (i as u16, false))
        .collect();
    let mut changed = true;
    while changed {
        changed = false;
        for production in &grammar.productions {
            if nullable[&production.lhs] {
                continue;
            }
            let all_nullable = production
                .rhs
                .iter()
                .all(|s| matches!(s, GSym::NonTerminal(nt) if nullable[nt]));
            if production.rhs.is_empty() || all_nullable {
                nullable.insert(production.lhs, true);
                changed = true;
            }
        }
    }
    nullable
}

/// FIRST(A) for every non-terminal `A`, fixed-point iteration until no
/// set grows.
pub fn compute_first(grammar: &Grammar, nullable: &NullableSet) -> FirstSets {
    let mut first: FirstSets = grammar
        .nonterminals
        .iter()
        .enumerate()
        .map(|(i, _)| (i as u16, FxHashSet::default()))
        .collect();

    let mut changed = true;
    while changed {
        changed = false;
        for production in &grammar.productions {
            let (seq_first, _) = first_of_sequence(&production.rhs, &first, nullable);
            let entry = first.entry(production.lhs).or_default();
            for t in seq_first {
                changed |= entry.insert(t);
            }
        }
    }
    first
}

/// FIRST of a symbol sequence plus whether the whole sequence can derive
/// the empty string.
pub fn first_of_sequence(
    seq: &[GSym],
    first: &FirstSets,
    nullable: &NullableSet,
) -> (FxHashSet<u16>, bool) {
    let mut out = FxHashSet::default();
    for sym in seq {
        match sym {
            GSym::Terminal(t) => {
                out.insert(*t);
                return (out, false);
            }
            GSym::NonTerminal(nt) => {
                out.extend(first.get(nt).into_iter().flatten().copied());
                if !nullable.get(nt).copied().unwrap_or(false) {
                    return (out, false);
                }
            }
        }
    }
    (out, true)
}

/// FOLLOW(A) for every non-terminal `A`; FOLLOW of the augmented start
/// seeds with `eof` (§4.3 production 0 is the augmented start).
pub fn compute_follow(grammar: &Grammar, first: &FirstSets, nullable: &NullableSet) -> FollowSets {
    let mut follow: FollowSets = grammar
        .nonterminals
        .iter()
        .enumerate()
        .map(|(i, _)| (i as u16, FxHashSet::default()))
        .collect();
    follow
        .get_mut(&grammar.augmented_start())
        .unwrap()
        .insert(grammar.eof);

    let mut changed = true;
    while changed {
        changed = false;
        for production in &grammar.productions {
            for (i, sym) in production.rhs.iter().enumerate() {
                let GSym::NonTerminal(b) = sym else { continue };
                let rest = &production.rhs[i + 1..];
                let (rest_first, rest_nullable) = first_of_sequence(rest, first, nullable);
                {
                    let entry = follow.entry(*b).or_default();
                    for t in rest_first {
                        changed |= entry.insert(t);
                    }
                }
                if rest_nullable {
                    let lhs_follow = follow.get(&production.lhs).cloned().unwrap_or_default();
                    let entry = follow.entry(*b).or_default();
                    for t in lhs_follow {
                        changed |= entry.insert(t);
                    }
                }
            }
        }
    }
    follow
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::BOREAL_GRAMMAR;

    #[test]
    fn decl_list_is_nullable_and_follow_includes_begin() {
        let g = Grammar::from_text(BOREAL_GRAMMAR);
        let nullable = compute_nullable(&g);
        let first = compute_first(&g, &nullable);
        let follow = compute_follow(&g, &first, &nullable);
        let decl_list = g
            .nonterminals
            .iter()
            .position(|n| n == "DeclList")
            .unwrap() as u16;
        assert!(nullable[&decl_list]);
        let begin = g.terminal_id("begin").unwrap();
        assert!(follow[&decl_list].contains(&begin));
    }

    #[test]
    fn expr_first_includes_identifier_and_unary_operators() {
        let g = Grammar::from_text(BOREAL_GRAMMAR);
        let nullable = compute_nullable(&g);
        let first = compute_first(&g, &nullable);
        let expr = g.nonterminals.iter().position(|n| n == "Expr").unwrap() as u16;
        let identifier = g.terminal_id("identifier").unwrap();
        let minus = g.terminal_id("-").unwrap();
        assert!(first[&expr].contains(&identifier));
        assert!(first[&expr].contains(&minus));
    }
}
