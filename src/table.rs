//! ACTION/GOTO table construction (§4.6), grounded on the table-builder
//! shape of `examples/andrewbaxter-fork_rustemo/src/table.rs` (kept: the
//! state-indexed `HashMap` action/goto layout; replaced: LALR merging with
//! a plain canonical LR(1) collection, and the Rustemo `Action` enum's
//! codegen-oriented variants with the three this crate's driver needs).

use std::collections::HashMap;

use log::debug;

use crate::error::{GrammarError, Result};
use crate::first::compute_first_sets;
use crate::grammar::{Grammar, Symbol};
use crate::index::{ProdIndex, StateIndex};
use crate::items::{build_canonical_collection, Item, ItemSet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Shift(StateIndex),
    Reduce(ProdIndex),
    Accept,
}

pub struct Tables {
    pub action: HashMap<(StateIndex, Symbol), Action>,
    pub goto: HashMap<(StateIndex, Symbol), StateIndex>,
    pub states: Vec<ItemSet>,
}

pub fn build_tables(grammar: &Grammar) -> Result<Tables> {
    let first_sets = compute_first_sets(grammar)?;
    let collection = build_canonical_collection(grammar, &first_sets);
    debug!("canonical collection has {} states", collection.states.len());

    let mut action: HashMap<(StateIndex, Symbol), Action> = HashMap::new();
    let mut goto: HashMap<(StateIndex, Symbol), StateIndex> = HashMap::new();

    for ((from, symbol), to) in &collection.transitions {
        if symbol.is_terminal() {
            action.insert((*from, symbol.clone()), Action::Shift(*to));
        } else {
            goto.insert((*from, symbol.clone()), *to);
        }
    }

    for (state_idx, item_set) in collection.states.iter().enumerate() {
        let from = StateIndex(state_idx);
        for item in item_set {
            if !item.is_complete(grammar) {
                continue;
            }
            let is_accept = item.prod == 0 && item.lookahead == Symbol::end();

            let new_action = if is_accept {
                Action::Accept
            } else {
                Action::Reduce(ProdIndex(item.prod))
            };

            let key = (from, item.lookahead.clone());
            match action.get(&key) {
                None => {
                    action.insert(key, new_action);
                }
                Some(Action::Shift(_)) => {
                    // Shift/reduce conflicts resolve in favor of shift (§4.6).
                    debug!(
                        "shift/reduce conflict in state {} on {:?}: keeping shift",
                        from.0, item.lookahead
                    );
                }
                Some(Action::Reduce(existing)) => {
                    if ProdIndex(item.prod) != *existing {
                        return Err(conflict_error(
                            grammar,
                            item_set,
                            state_idx,
                            &item.lookahead,
                            existing.0,
                            item.prod,
                        ));
                    }
                }
                Some(Action::Accept) => {}
            }
        }
    }

    Ok(Tables {
        action,
        goto,
        states: collection.states,
    })
}

fn conflict_error(
    _grammar: &Grammar,
    _item_set: &ItemSet,
    state: usize,
    symbol: &Symbol,
    a: usize,
    b: usize,
) -> GrammarError {
    GrammarError::ReduceReduceConflict {
        state,
        symbol: symbol.clone(),
        a,
        b,
    }
}
