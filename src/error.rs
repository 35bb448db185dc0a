//! Error types for grammar loading and table construction.
//!
//! Parse failures are never represented as `Err` — per §7 of the design,
//! only construction-time problems (missing files, malformed grammars,
//! unresolvable conflicts) are fatal. A failed parse is a value
//! (`ParseOutcome { success: false, .. }`), not an error.

use std::path::PathBuf;

use crate::grammar::Symbol;

#[derive(Debug, thiserror::Error)]
pub enum GrammarError {
    #[error("grammar file not found: {0}")]
    NotFound(PathBuf),

    #[error("malformed grammar at line {line}")]
    Syntax { line: usize },

    #[error(
        "reduce-reduce conflict in state {state} on lookahead {symbol:?}: \
         production {a:?} vs production {b:?}"
    )]
    ReduceReduceConflict {
        state: usize,
        symbol: Symbol,
        a: usize,
        b: usize,
    },

    #[error("FIRST({0:?}) is empty: infinite recursion on this symbol")]
    EmptyFirstSet(Symbol),

    #[error("start symbol {0:?} is not the lhs of any production")]
    MissingStart(Symbol),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GrammarError>;
