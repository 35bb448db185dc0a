//! LR(1) item sets and the canonical collection (§4.5), grounded on the
//! closure/goto construction in `examples/andrewbaxter-fork_rustemo/src/table.rs`,
//! adapted from LALR item sets to full LR(1) items carrying one lookahead
//! terminal apiece.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use log::debug;

use crate::first::{first_of_sequence, FirstSets};
use crate::grammar::{Grammar, Production, Symbol};
use crate::index::StateIndex;

/// One LR(1) item: a production, a dot position within its RHS, and a
/// single lookahead terminal. `Ord`/`Hash` derive structurally, which is
/// what lets an [`ItemSet`] (a `BTreeSet<Item>`) stand in as its own
/// canonical, order-independent identity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Item {
    pub prod: usize,
    pub dot: usize,
    pub lookahead: Symbol,
}

pub type ItemSet = BTreeSet<Item>;

impl Item {
    fn production<'g>(&self, grammar: &'g Grammar) -> &'g Production {
        &grammar.productions[self.prod]
    }

    /// The symbol immediately after the dot, if any.
    pub fn next_symbol(&self, grammar: &Grammar) -> Option<Symbol> {
        self.production(grammar).rhs.get(self.dot).cloned()
    }

    pub fn is_complete(&self, grammar: &Grammar) -> bool {
        self.dot >= self.production(grammar).rhs.len()
    }

    fn advanced(&self) -> Item {
        Item {
            prod: self.prod,
            dot: self.dot + 1,
            lookahead: self.lookahead.clone(),
        }
    }
}

/// Closes an item set under production expansion: for every item with the
/// dot before a non-terminal `B`, add `B -> .gamma` items for every
/// production of `B`, with lookahead FIRST(beta lookahead) per the usual
/// LR(1) closure rule.
pub fn closure(grammar: &Grammar, first_sets: &FirstSets, seed: ItemSet) -> ItemSet {
    let mut items = seed;
    let mut changed = true;
    while changed {
        changed = false;
        let snapshot: Vec<Item> = items.iter().cloned().collect();
        for item in &snapshot {
            let Some(next) = item.next_symbol(grammar) else {
                continue;
            };
            if !grammar.is_nonterminal(&next) {
                continue;
            }
            let production = item.production(grammar);
            let beta = &production.rhs[item.dot + 1..];
            let lookaheads = first_of_sequence(first_sets, beta, &item.lookahead);

            for (idx, candidate) in grammar.productions.iter().enumerate() {
                if candidate.lhs != next {
                    continue;
                }
                for lookahead in &lookaheads {
                    let new_item = Item {
                        prod: idx,
                        dot: 0,
                        lookahead: lookahead.clone(),
                    };
                    if items.insert(new_item) {
                        changed = true;
                    }
                }
            }
        }
    }
    items
}

/// Moves the dot past `symbol` for every item that has it next, then
/// closes the result. Returns `None` if no item in `from` advances on
/// `symbol` (an empty goto, which the caller should skip rather than
/// record as a state).
pub fn goto(
    grammar: &Grammar,
    first_sets: &FirstSets,
    from: &ItemSet,
    symbol: &Symbol,
) -> Option<ItemSet> {
    let mut seed = BTreeSet::new();
    for item in from {
        if item.next_symbol(grammar).as_ref() == Some(symbol) {
            seed.insert(item.advanced());
        }
    }
    if seed.is_empty() {
        None
    } else {
        Some(closure(grammar, first_sets, seed))
    }
}

/// The canonical collection of LR(1) item sets, numbered in discovery
/// order. `IndexMap` preserves that order so [`StateIndex`] values line up
/// with insertion, matching the deterministic trace output §4.9 requires.
pub struct Collection {
    pub states: Vec<ItemSet>,
    pub transitions: std::collections::BTreeMap<(StateIndex, Symbol), StateIndex>,
}

pub fn build_canonical_collection(grammar: &Grammar, first_sets: &FirstSets) -> Collection {
    let start_item = Item {
        prod: 0,
        dot: 0,
        lookahead: Symbol::end(),
    };
    let start_set = closure(grammar, first_sets, BTreeSet::from([start_item]));

    let mut discovered: IndexMap<ItemSet, StateIndex> = IndexMap::new();
    discovered.insert(start_set.clone(), StateIndex(0));
    let mut transitions = std::collections::BTreeMap::new();

    let mut frontier = vec![start_set];
    while let Some(current) = frontier.pop() {
        let current_index = discovered[&current];

        let mut symbols: BTreeSet<Symbol> = BTreeSet::new();
        for item in &current {
            if let Some(symbol) = item.next_symbol(grammar) {
                symbols.insert(symbol);
            }
        }

        for symbol in symbols {
            let Some(target) = goto(grammar, first_sets, &current, &symbol) else {
                continue;
            };
            let target_index = if let Some(existing) = discovered.get(&target) {
                *existing
            } else {
                let new_index = StateIndex(discovered.len());
                debug!("discovered state {} ({} items)", new_index.0, target.len());
                discovered.insert(target.clone(), new_index);
                frontier.push(target);
                new_index
            };
            transitions.insert((current_index, symbol), target_index);
        }
    }

    let states = discovered.into_iter().map(|(set, _)| set).collect();
    Collection { states, transitions }
}
