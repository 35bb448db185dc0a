//! Parse driver (§4.7): the table-driven LR(1) stack automaton.

use log::{debug, warn};

use crate::bridge::bridge_all;
use crate::grammar::{Grammar, Symbol};
use crate::index::StateIndex;
use crate::table::{Action, Tables};
use crate::token::{Token, TokenKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepAction {
    Shift(StateIndex),
    Reduce { lhs: Symbol, len: usize },
    Accept,
}

/// One row of the per-step parse trace (§4.9): the state stack, the
/// current lookahead, and the action taken from it.
#[derive(Debug, Clone)]
pub struct ParseStep {
    pub stack: Vec<StateIndex>,
    pub lookahead: Symbol,
    pub remaining: usize,
    pub action: StepAction,
}

#[derive(Debug, Clone)]
pub struct ParseOutcome {
    pub success: bool,
    pub errors: Vec<String>,
    pub steps: Vec<ParseStep>,
    pub reductions: Vec<Symbol>,
}

/// Runs `tokens` through `tables`. `tokens` are raw scanner tokens, not
/// yet bridged to parser terminals — bridging happens internally so the
/// ERROR-token short-circuit (§9) can inspect the original lexeme and
/// line before anything is looked up in the tables.
pub fn parse(grammar: &Grammar, tables: &Tables, tokens: &[Token]) -> ParseOutcome {
    if let Some(bad) = tokens.iter().find(|t| t.kind == TokenKind::Error) {
        warn!("lexical error token on line {}, short-circuiting parse", bad.line);
        return ParseOutcome {
            success: false,
            errors: vec![format!(
                "Line {}: Syntax error, unexpected token '{}'",
                bad.line, bad.lexeme
            )],
            steps: Vec::new(),
            reductions: Vec::new(),
        };
    }

    let symbols = bridge_all(tokens);
    let last_line = tokens.last().map(|t| t.line).unwrap_or(1);

    let mut stack: Vec<StateIndex> = vec![StateIndex(0)];
    let mut cursor = 0usize;
    let mut steps = Vec::new();
    let mut reductions = Vec::new();

    loop {
        let state = *stack.last().unwrap();
        let (lookahead, line) = match symbols.get(cursor) {
            Some(sym) => (sym.clone(), tokens[cursor].line),
            None => (Symbol::end(), last_line),
        };

        let action = tables.action.get(&(state, lookahead.clone()));
        let Some(action) = action else {
            return ParseOutcome {
                success: false,
                errors: vec![format!(
                    "Line {}: Syntax error, unexpected token '{}'",
                    line,
                    lookahead.display_name()
                )],
                steps,
                reductions,
            };
        };

        match action {
            Action::Shift(target) => {
                debug!("state {}: shift {} on {:?}", state.0, target.0, lookahead);
                steps.push(ParseStep {
                    stack: stack.clone(),
                    lookahead: lookahead.clone(),
                    remaining: symbols.len().saturating_sub(cursor),
                    action: StepAction::Shift(*target),
                });
                stack.push(*target);
                cursor += 1;
            }
            Action::Reduce(prod_idx) => {
                let production = &grammar.productions[prod_idx.0];
                let pop_len = production.rhs.len();
                debug!(
                    "state {}: reduce {} ({} symbols)",
                    state.0,
                    production.lhs.display_name(),
                    pop_len
                );
                steps.push(ParseStep {
                    stack: stack.clone(),
                    lookahead: lookahead.clone(),
                    remaining: symbols.len().saturating_sub(cursor),
                    action: StepAction::Reduce {
                        lhs: production.lhs.clone(),
                        len: pop_len,
                    },
                });
                reductions.push(production.lhs.clone());
                for _ in 0..pop_len {
                    stack.pop();
                }
                let uncovered = *stack.last().unwrap();
                match tables.goto.get(&(uncovered, production.lhs.clone())) {
                    Some(next) => stack.push(*next),
                    None => {
                        return ParseOutcome {
                            success: false,
                            errors: vec![format!("Line {}: Invalid action in parser", line)],
                            steps,
                            reductions,
                        };
                    }
                }
            }
            Action::Accept => {
                steps.push(ParseStep {
                    stack: stack.clone(),
                    lookahead: lookahead.clone(),
                    remaining: symbols.len().saturating_sub(cursor),
                    action: StepAction::Accept,
                });
                return ParseOutcome {
                    success: true,
                    errors: Vec::new(),
                    steps,
                    reductions,
                };
            }
        }
    }
}
