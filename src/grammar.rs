//! Symbols, productions, and the context-free grammar loader (§4.3).

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use crate::error::{GrammarError, Result};

/// A name given to the internal augmented start production's non-terminal.
/// Never produced by the grammar-file parser, so it can't collide with a
/// user-declared non-terminal.
const AUGMENTED_START: &str = "$start";

/// A grammar symbol: a terminal (including the end marker `$`) or a
/// non-terminal. `ε` is deliberately not a variant here — it only ever
/// shows up inside a [`crate::first::FirstSet`], never as a symbol
/// identity (see SPEC_FULL.md §3).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbol {
    /// Canonical form: `ID`, `CONSTANT`, and `$` are stored bare; every
    /// other terminal (quoted in the grammar file, or bare-and-implicitly
    /// quoted) is stored with its surrounding single quotes, e.g. `'if'`.
    Terminal(String),
    NonTerminal(String),
}

impl Symbol {
    pub fn end() -> Symbol {
        Symbol::Terminal("$".to_string())
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Symbol::Terminal(_))
    }

    /// The text used for error messages and trace dumps: quoted terminals
    /// have their quotes stripped back off (`'+'` -> `+`), everything else
    /// is shown as stored.
    pub fn display_name(&self) -> &str {
        match self {
            Symbol::Terminal(s) | Symbol::NonTerminal(s) => {
                if s.len() >= 2 && s.starts_with('\'') && s.ends_with('\'') {
                    &s[1..s.len() - 1]
                } else {
                    s.as_str()
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Production {
    pub lhs: Symbol,
    pub rhs: Vec<Symbol>,
}

#[derive(Debug, Clone)]
pub struct Grammar {
    pub productions: Vec<Production>,
    pub terminals: BTreeSet<Symbol>,
    pub non_terminals: BTreeSet<Symbol>,
    /// Always the internal `$start` non-terminal after augmentation.
    pub start: Symbol,
}

impl Grammar {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                GrammarError::NotFound(path.to_path_buf())
            } else {
                GrammarError::Io(e)
            }
        })?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self> {
        let mut productions = Vec::new();
        let mut terminals: BTreeSet<Symbol> = BTreeSet::new();
        let mut non_terminals: BTreeSet<Symbol> = BTreeSet::new();
        let mut declared_start: Option<Symbol> = None;

        for (idx, raw_line) in text.lines().enumerate() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            // Split on the Unicode arrow as a scalar value, not bytes.
            let mut split = line.splitn(2, '→');
            let lhs_raw = split.next().unwrap().trim();
            let rhs_raw = split
                .next()
                .ok_or(GrammarError::Syntax { line: idx + 1 })?;

            let lhs = Symbol::NonTerminal(lhs_raw.to_string());
            non_terminals.insert(lhs.clone());
            if declared_start.is_none() {
                declared_start = Some(lhs.clone());
            }

            for alt in rhs_raw.split('|') {
                let mut rhs = Vec::new();
                for part in alt.split_whitespace() {
                    if part == "ε" {
                        continue;
                    }
                    let symbol = classify_symbol(part);
                    match &symbol {
                        Symbol::Terminal(_) => {
                            terminals.insert(symbol.clone());
                        }
                        Symbol::NonTerminal(_) => {
                            non_terminals.insert(symbol.clone());
                        }
                    }
                    rhs.push(symbol);
                }
                productions.push(Production {
                    lhs: lhs.clone(),
                    rhs,
                });
            }
        }

        let start = declared_start.ok_or(GrammarError::Syntax { line: 1 })?;
        if !productions.iter().any(|p| p.lhs == start) {
            return Err(GrammarError::MissingStart(start));
        }

        terminals.insert(Symbol::end());

        // Explicit augmentation (SPEC_FULL.md §4.3 / §9): the caller's
        // grammar need not already supply its own `S' -> S` rule.
        let augmented_start = Symbol::NonTerminal(AUGMENTED_START.to_string());
        non_terminals.insert(augmented_start.clone());
        let mut augmented_productions = vec![Production {
            lhs: augmented_start.clone(),
            rhs: vec![start],
        }];
        augmented_productions.extend(productions);

        Ok(Grammar {
            productions: augmented_productions,
            terminals,
            non_terminals,
            start: augmented_start,
        })
    }

    pub fn is_nonterminal(&self, symbol: &Symbol) -> bool {
        self.non_terminals.contains(symbol)
    }
}

/// Classifies one whitespace-separated grammar-file token into a [`Symbol`]
/// per SPEC_FULL.md §4.3: `ID`/`CONSTANT` are special terminals, `'x'` is a
/// quoted terminal, a leading-uppercase bare name is a non-terminal, and
/// any other bare token is an implicit terminal (as if quoted).
fn classify_symbol(part: &str) -> Symbol {
    if part == "ID" || part == "CONSTANT" {
        Symbol::Terminal(part.to_string())
    } else if part.len() >= 2 && part.starts_with('\'') && part.ends_with('\'') {
        Symbol::Terminal(part.to_string())
    } else if part.chars().next().map(char::is_uppercase).unwrap_or(false) {
        Symbol::NonTerminal(part.to_string())
    } else {
        Symbol::Terminal(format!("'{part}'"))
    }
}
