//! Grammar-driven DFA lexer and table-driven LR(1) parser core.
//!
//! The crate is split along the pipeline described in the design:
//! a lexical grammar loader and DFA-style scanner (`lexgrammar`, `lexer`)
//! feed a token-bridge (`bridge`) into a context-free grammar loader,
//! FIRST-set computer, item-set builder and table builder (`grammar`,
//! `first`, `items`, `table`), which together parameterize a parse
//! driver (`driver`) whose trace can be rendered and written to disk
//! (`trace`).

pub mod bridge;
pub mod driver;
pub mod error;
pub mod first;
pub mod grammar;
pub mod index;
pub mod items;
pub mod lexer;
pub mod lexgrammar;
pub mod table;
pub mod token;
pub mod trace;

use std::path::Path;

use error::Result;

/// Owns the loaded grammars and built tables for one (lexical grammar,
/// CFG) pair, and exposes the two public operations of §5: `tokenize`
/// and `parse`. Both run to completion synchronously; building an
/// `Analyzer` does all of the up-front grammar work so that repeated
/// parses against the same grammar pay the table-construction cost once.
pub struct Analyzer {
    pub lexical_grammar: lexgrammar::LexicalGrammar,
    pub grammar: grammar::Grammar,
    pub tables: table::Tables,
}

impl Analyzer {
    pub fn build(tokens_path: &Path, grammar_path: &Path) -> Result<Self> {
        let lexical_grammar = lexgrammar::LexicalGrammar::load(tokens_path)?;
        let grammar = grammar::Grammar::load(grammar_path)?;
        let tables = table::build_tables(&grammar)?;
        Ok(Self {
            lexical_grammar,
            grammar,
            tables,
        })
    }

    pub fn tokenize(&self, source: &str) -> Vec<token::Token> {
        lexer::tokenize(&self.lexical_grammar, source)
    }

    pub fn parse(&self, tokens: &[token::Token]) -> driver::ParseOutcome {
        driver::parse(&self.grammar, &self.tables, tokens)
    }
}
