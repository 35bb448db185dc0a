//! FIRST-set computation (§4.4): fixed-point iteration over all grammar
//! symbols, Dragon-book style, grounded on the skeleton in
//! `examples/andrewbaxter-fork_rustemo/src/table.rs`'s `first_sets`/`firsts`.

use std::collections::{BTreeSet, HashMap};

use crate::error::{GrammarError, Result};
use crate::grammar::{Grammar, Symbol};

/// FIRST(X): the terminals that can begin a string derived from `X`, and
/// whether `X` can derive the empty string. `ε` never appears as a
/// `Symbol` value (see `grammar::Symbol`'s doc comment) — nullability is
/// tracked out of band instead.
#[derive(Debug, Clone, Default)]
pub struct FirstSet {
    pub terminals: BTreeSet<Symbol>,
    pub nullable: bool,
}

pub type FirstSets = HashMap<Symbol, FirstSet>;

pub fn compute_first_sets(grammar: &Grammar) -> Result<FirstSets> {
    let mut first: FirstSets = HashMap::new();

    for terminal in &grammar.terminals {
        let entry = first.entry(terminal.clone()).or_default();
        entry.terminals.insert(terminal.clone());
    }
    for nonterminal in &grammar.non_terminals {
        first.entry(nonterminal.clone()).or_default();
    }

    let mut changed = true;
    while changed {
        changed = false;
        for production in &grammar.productions {
            if production.rhs.is_empty() {
                let entry = first.get_mut(&production.lhs).unwrap();
                if !entry.nullable {
                    entry.nullable = true;
                    changed = true;
                }
                continue;
            }

            let mut nullable_prefix = true;
            let mut additions: BTreeSet<Symbol> = BTreeSet::new();
            for symbol in &production.rhs {
                let symbol_first = first.get(symbol).cloned().unwrap_or_default();
                additions.extend(symbol_first.terminals.iter().cloned());
                if !symbol_first.nullable {
                    nullable_prefix = false;
                    break;
                }
            }

            let entry = first.get_mut(&production.lhs).unwrap();
            let before = entry.terminals.len();
            entry.terminals.extend(additions);
            if entry.terminals.len() > before {
                changed = true;
            }
            if nullable_prefix && !entry.nullable {
                entry.nullable = true;
                changed = true;
            }
        }
    }

    for (symbol, set) in &first {
        if set.terminals.is_empty() && !set.nullable {
            return Err(GrammarError::EmptyFirstSet(symbol.clone()));
        }
    }

    Ok(first)
}

/// FIRST of a symbol sequence followed by a trailing lookahead, used by
/// the item-set closure to compute per-item lookaheads (§4.5).
pub fn first_of_sequence(
    first_sets: &FirstSets,
    seq: &[Symbol],
    trailing: &Symbol,
) -> BTreeSet<Symbol> {
    let mut result = BTreeSet::new();
    let mut nullable_prefix = true;
    for symbol in seq {
        let set = first_sets.get(symbol).cloned().unwrap_or_default();
        result.extend(set.terminals.iter().cloned());
        if !set.nullable {
            nullable_prefix = false;
            break;
        }
    }
    if nullable_prefix {
        result.insert(trailing.clone());
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Grammar;

    fn test_grammar() -> Grammar {
        Grammar::parse(
            "E → T Ep\n\
             Ep → '+' T Ep | ε\n\
             T → F Tp\n\
             Tp → '*' F Tp | ε\n\
             F → '(' E ')' | ID\n",
        )
        .unwrap()
    }

    #[test]
    fn first_of_terminal_is_itself() {
        let g = test_grammar();
        let first = compute_first_sets(&g).unwrap();
        let id = Symbol::Terminal("ID".to_string());
        assert_eq!(first[&id].terminals, BTreeSet::from([id.clone()]));
        assert!(!first[&id].nullable);
    }

    #[test]
    fn first_of_f_is_paren_and_id() {
        let g = test_grammar();
        let first = compute_first_sets(&g).unwrap();
        let f = Symbol::NonTerminal("F".to_string());
        let expected = BTreeSet::from([
            Symbol::Terminal("'('".to_string()),
            Symbol::Terminal("ID".to_string()),
        ]);
        assert_eq!(first[&f].terminals, expected);
        assert!(!first[&f].nullable);
    }

    #[test]
    fn nullable_nonterminal_is_marked() {
        let g = test_grammar();
        let first = compute_first_sets(&g).unwrap();
        let ep = Symbol::NonTerminal("Ep".to_string());
        assert!(first[&ep].nullable);
        assert_eq!(
            first[&ep].terminals,
            BTreeSet::from([Symbol::Terminal("'+'".to_string())])
        );
    }

    #[test]
    fn undefined_nonterminal_is_an_empty_first_set_error() {
        // "Undefined" is referenced but never on a lhs, so its FIRST set
        // can never gain a member: this is the infinite-recursion symptom.
        let g = Grammar::parse("S → Undefined\n").unwrap();
        let err = compute_first_sets(&g).unwrap_err();
        assert!(matches!(err, GrammarError::EmptyFirstSet(_)));
    }
}
