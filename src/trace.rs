//! Trace emitter (§4.9): renders the four diagnostic artifacts and writes
//! them once, at the end of a run, per the accumulate-then-write design
//! recorded in SPEC_FULL.md §9.

use std::fs;
use std::path::Path;

use crate::driver::{ParseOutcome, StepAction};
use crate::grammar::Grammar;
use crate::index::StateIndex;
use crate::items::ItemSet;
use crate::table::{Action, Tables};

pub const STATES_FILE: &str = "states.txt";
pub const TABLES_FILE: &str = "parsing_tables.txt";
pub const STEPS_FILE: &str = "parse_steps.txt";
pub const ERRORS_FILE: &str = "syntax_errors.txt";

pub fn format_item(grammar: &Grammar, item: &crate::items::Item) -> String {
    let production = &grammar.productions[item.prod];
    let mut rhs_parts: Vec<String> = production
        .rhs
        .iter()
        .map(|s| s.display_name().to_string())
        .collect();
    rhs_parts.insert(item.dot, ".".to_string());
    format!(
        "{} -> {}, {}",
        production.lhs.display_name(),
        rhs_parts.join(" "),
        item.lookahead.display_name()
    )
}

pub fn render_states(grammar: &Grammar, states: &[ItemSet]) -> String {
    let mut out = String::new();
    for (idx, set) in states.iter().enumerate() {
        out.push_str(&format!("State {}:\n", idx));
        for item in set {
            out.push_str(&format!("  {}\n", format_item(grammar, item)));
        }
    }
    out
}

pub fn render_tables(tables: &Tables) -> String {
    let mut out = String::new();
    out.push_str("ACTION:\n");
    let mut action_entries: Vec<_> = tables.action.iter().collect();
    action_entries.sort_by_key(|((state, symbol), _)| (state.0, symbol.clone()));
    for ((state, symbol), action) in action_entries {
        let rendered = match action {
            Action::Shift(target) => format!("shift {}", target.0),
            Action::Reduce(prod) => format!("reduce {}", prod.0),
            Action::Accept => "accept".to_string(),
        };
        out.push_str(&format!(
            "  [{}, {}] -> {}\n",
            state.0,
            symbol.display_name(),
            rendered
        ));
    }

    out.push_str("GOTO:\n");
    let mut goto_entries: Vec<_> = tables.goto.iter().collect();
    goto_entries.sort_by_key(|((state, symbol), _)| (state.0, symbol.clone()));
    for ((state, symbol), target) in goto_entries {
        out.push_str(&format!(
            "  [{}, {}] -> {}\n",
            state.0,
            symbol.display_name(),
            target.0
        ));
    }
    out
}

pub fn render_steps(outcome: &ParseOutcome) -> String {
    let mut out = String::new();
    for (idx, step) in outcome.steps.iter().enumerate() {
        let stack: Vec<String> = step.stack.iter().map(|s: &StateIndex| s.0.to_string()).collect();
        let action = match &step.action {
            StepAction::Shift(target) => format!("shift {}", target.0),
            StepAction::Reduce { lhs, len } => format!("reduce {} ({} symbols)", lhs.display_name(), len),
            StepAction::Accept => "accept".to_string(),
        };
        out.push_str(&format!(
            "{}: stack=[{}] lookahead={} remaining={} action={}\n",
            idx,
            stack.join(" "),
            step.lookahead.display_name(),
            step.remaining,
            action
        ));
    }
    out
}

pub fn render_errors(outcome: &ParseOutcome) -> String {
    outcome.errors.join("\n")
}

/// Writes all four artifacts into `dir`, creating it if necessary.
pub fn write_artifacts(
    dir: &Path,
    grammar: &Grammar,
    tables: &Tables,
    outcome: &ParseOutcome,
) -> std::io::Result<()> {
    fs::create_dir_all(dir)?;
    fs::write(dir.join(STATES_FILE), render_states(grammar, &tables.states))?;
    fs::write(dir.join(TABLES_FILE), render_tables(tables))?;
    fs::write(dir.join(STEPS_FILE), render_steps(outcome))?;
    fs::write(dir.join(ERRORS_FILE), render_errors(outcome))?;
    Ok(())
}
