//! Grammar-of-tokens loader (§4.1): keyword set and per-category
//! recognizers compiled from the mini-regex dialect.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use regex::Regex;

use crate::error::{GrammarError, Result};

#[derive(Debug, Clone)]
pub struct LexicalGrammar {
    pub keywords: HashSet<String>,
    /// Category name -> compiled anchored alternation, in file order.
    pub categories: Vec<(String, Regex)>,
}

impl LexicalGrammar {
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
        let mut keywords = HashSet::new();
        let mut categories = Vec::new();

        for (idx, raw_line) in text.lines().enumerate() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut split = line.splitn(2, '→');
            let lhs = split.next().unwrap().trim();
            let rhs = split
                .next()
                .ok_or(GrammarError::Syntax { line: idx + 1 })?;

            let alternatives: Vec<String> = rhs
                .split('|')
                .map(|alt| alt.trim().trim_matches('\'').to_string())
                .collect();

            if lhs == "Keyword" {
                keywords.extend(alternatives);
            } else {
                let regex = compile_category(&alternatives)
                    .map_err(|_| GrammarError::Syntax { line: idx + 1 })?;
                categories.push((lhs.to_string(), regex));
            }
        }

        Ok(Self {
            keywords,
            categories,
        })
    }
}

/// Compiles the mini-regex dialect of §4.1 (`\d`, `\w`, character classes,
/// `+ * ?`, grouping, and literal `.`) into a single anchored alternation.
fn compile_category(alternatives: &[String]) -> std::result::Result<Regex, regex::Error> {
    let parts: Vec<String> = alternatives.iter().map(|alt| compile_alternative(alt)).collect();
    let pattern = format!("^(?:{})$", parts.join("|"));
    Regex::new(&pattern)
}

fn compile_alternative(expr: &str) -> String {
    let chars: Vec<char> = expr.chars().collect();
    let mut out = String::new();
    let mut i = 0;
    let mut in_class = false;
    while i < chars.len() {
        let c = chars[i];
        if c == '\\' && i + 1 < chars.len() {
            let next = chars[i + 1];
            match next {
                // \d and \w are dialect class shorthands, not generic escapes.
                'd' | 'w' => {
                    out.push('\\');
                    out.push(next);
                }
                other => out.push_str(&regex::escape(&other.to_string())),
            }
            i += 2;
        } else if in_class {
            // Inside [...], pass characters through literally so ranges
            // like `A-Z` survive; only `\` and the closing `]` need escaping.
            match c {
                ']' => {
                    out.push(']');
                    in_class = false;
                }
                '\\' => out.push_str(r"\\"),
                _ => out.push(c),
            }
            i += 1;
        } else {
            match c {
                '[' => {
                    out.push('[');
                    in_class = true;
                }
                '+' | '*' | '?' | '(' | ')' | ']' => out.push(c),
                '.' => out.push_str("\\."),
                _ => out.push_str(&regex::escape(&c.to_string())),
            }
            i += 1;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_rule_populates_keyword_set() {
        let g = LexicalGrammar::parse("Keyword → 'if' | 'else' | 'while'\n").unwrap();
        assert!(g.keywords.contains("if"));
        assert!(g.keywords.contains("while"));
        assert!(g.categories.is_empty());
    }

    #[test]
    fn category_rule_compiles_alternation() {
        let g = LexicalGrammar::parse("Identifier → [A-Za-z_]\\w*\n").unwrap();
        assert_eq!(g.categories.len(), 1);
        assert_eq!(g.categories[0].0, "Identifier");
        assert!(g.categories[0].1.is_match("foo_123"));
        assert!(!g.categories[0].1.is_match("1foo"));
    }

    #[test]
    fn literal_dot_is_not_a_wildcard() {
        let g = LexicalGrammar::parse("Ellipsis → ...\n").unwrap();
        assert!(g.categories[0].1.is_match("..."));
        assert!(!g.categories[0].1.is_match("abc"));
    }

    #[test]
    fn malformed_line_is_syntax_error() {
        let err = LexicalGrammar::parse("Keyword if else\n").unwrap_err();
        assert!(matches!(err, GrammarError::Syntax { line: 1 }));
    }

    #[test]
    fn blank_and_comment_lines_are_ignored() {
        let g = LexicalGrammar::parse("\n# a comment\nKeyword → 'if'\n").unwrap();
        assert_eq!(g.keywords.len(), 1);
    }
}
