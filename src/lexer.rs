//! DFA lexical scanner (§4.2): a tagged-enum state machine driven by a
//! [`LexicalGrammar`], exposed through a small `peek`/`advance` core so no
//! state ever has to "back up a character" by hand (SPEC_FULL.md §9).

use once_cell::sync::Lazy;
use regex::Regex;

use crate::lexgrammar::LexicalGrammar;
use crate::token::{Token, TokenKind};

/// The numeric sub-states of §4.2 (`NUMBER`, `SCIENTIFIC`, `COMPLEX`),
/// exhaustively matched inside `scan_number` rather than dispatched by
/// name. `START`, `IDENTIFIER`, and `STRING` never need to re-enter this
/// loop on the same buffer, so they're handled procedurally instead: the
/// top-level `tokenize` loop picks the start action directly, and
/// `scan_identifier`/`scan_string` each run their own self-contained scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Number,
    Scientific,
    Complex,
}

struct Scanner {
    chars: Vec<char>,
    pos: usize,
    line: u32,
}

impl Scanner {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    /// Consumes the current character, incrementing the line counter
    /// before the caller gets to dispatch on the *next* one, per §4.2's
    /// "newlines increment the line counter before dispatch".
    fn advance(&mut self) -> Option<char> {
        let c = self.peek();
        if let Some(ch) = c {
            self.pos += 1;
            if ch == '\n' {
                self.line += 1;
            }
        }
        c
    }

    fn set_pos(&mut self, pos: usize) {
        self.pos = pos;
    }
}

/// Scans `source` into a token stream using the classification rules of
/// `grammar`. Never fails: unrecognized bytes surface as `ERROR` tokens.
pub fn tokenize(grammar: &LexicalGrammar, source: &str) -> Vec<Token> {
    let mut sc = Scanner::new(source);
    let mut tokens = Vec::new();

    while let Some(c) = sc.peek() {
        if c == ' ' || c == '\t' || c == '\r' || c == '\n' {
            sc.advance();
            continue;
        }

        let start_line = sc.line;

        if c.is_ascii_alphabetic() || c == '_' {
            tokens.push(scan_identifier(&mut sc, grammar, start_line));
        } else if c.is_ascii_digit() {
            scan_number(&mut sc, grammar, start_line, &mut tokens);
        } else if c == '"' {
            tokens.push(scan_string(&mut sc, grammar, start_line));
        } else if "+-*/=<>!&|".contains(c) {
            sc.advance();
            tokens.push(Token::new(start_line, TokenKind::Operator, c.to_string()));
        } else if ";,(){}[]".contains(c) {
            sc.advance();
            tokens.push(Token::new(start_line, TokenKind::Delimiter, c.to_string()));
        } else {
            sc.advance();
            tokens.push(Token::new(start_line, TokenKind::Error, c.to_string()));
        }
    }

    tokens
}

fn scan_identifier(sc: &mut Scanner, grammar: &LexicalGrammar, start_line: u32) -> Token {
    let mut buf = String::new();
    while let Some(c) = sc.peek() {
        if c.is_ascii_alphanumeric() || c == '_' {
            buf.push(c);
            sc.advance();
        } else {
            break;
        }
    }
    let kind = classify(&buf, grammar);
    Token::new(start_line, kind, buf)
}

fn scan_number(
    sc: &mut Scanner,
    grammar: &LexicalGrammar,
    start_line: u32,
    tokens: &mut Vec<Token>,
) {
    let lexeme_start = sc.pos;
    let mut buf = String::new();
    buf.push(sc.advance().expect("caller verified a digit is present"));

    // Leading-zero rule: "0" followed by another digit consumes the whole
    // run as a single ERROR token.
    if buf == "0" {
        if let Some(d) = sc.peek() {
            if d.is_ascii_digit() {
                while let Some(d2) = sc.peek() {
                    if d2.is_ascii_digit() {
                        buf.push(d2);
                        sc.advance();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::new(start_line, TokenKind::Error, buf));
                return;
            }
        }
    }

    let mut state = State::Number;
    loop {
        match state {
            State::Number => match sc.peek() {
                Some(c) if c.is_ascii_digit() => {
                    buf.push(c);
                    sc.advance();
                }
                Some('.') if !buf.contains('.') && !buf.to_ascii_lowercase().contains('e') => {
                    buf.push('.');
                    sc.advance();
                }
                Some(c @ ('e' | 'E')) if !buf.to_ascii_lowercase().contains('e') => {
                    buf.push(c);
                    sc.advance();
                    state = State::Scientific;
                }
                Some(c @ ('+' | '-')) => {
                    buf.push(c);
                    sc.advance();
                    state = State::Complex;
                }
                _ => break,
            },
            State::Scientific => match sc.peek() {
                Some(c) if c.is_ascii_digit() || c == '+' || c == '-' => {
                    buf.push(c);
                    sc.advance();
                }
                _ => break,
            },
            State::Complex => {
                let segment = current_segment(&buf);
                match sc.peek() {
                    Some(c) if c.is_ascii_digit() => {
                        buf.push(c);
                        sc.advance();
                    }
                    Some('.') if !segment.contains('.') => {
                        buf.push('.');
                        sc.advance();
                    }
                    Some('i') if segment.chars().any(|c| c.is_ascii_digit()) => {
                        buf.push('i');
                        sc.advance();
                        let kind = classify(&buf, grammar);
                        tokens.push(Token::new(start_line, kind, buf));
                        return;
                    }
                    _ => {
                        // Broken complex shape (§9 open question): drop
                        // the last buffered character, emit whatever
                        // prefix remains as a number, and re-dispatch from
                        // the dropped character's own source position so
                        // it gets reprocessed as a fresh token in START.
                        // That position is one behind the (not yet
                        // consumed) character that broke the pattern,
                        // clamped to the start of this lexeme so it can
                        // never run off the front.
                        buf.pop();
                        if !buf.is_empty() {
                            let kind = classify(&buf, grammar);
                            tokens.push(Token::new(start_line, kind, buf));
                        }
                        let back_to = sc.pos.saturating_sub(1).max(lexeme_start);
                        sc.set_pos(back_to);
                        return;
                    }
                }
            }
        }
    }

    let kind = classify(&buf, grammar);
    tokens.push(Token::new(start_line, kind, buf));
}

/// The substring of `buf` after its last `+` or `-` sign: the segment the
/// COMPLEX state is currently extending.
fn current_segment(buf: &str) -> &str {
    let after_plus = buf.rsplit('+').next().unwrap_or(buf);
    after_plus.rsplit('-').next().unwrap_or(after_plus)
}

fn scan_string(sc: &mut Scanner, grammar: &LexicalGrammar, start_line: u32) -> Token {
    let mut buf = String::new();
    buf.push(sc.advance().expect("caller verified an opening quote"));

    loop {
        match sc.peek() {
            None => return Token::new(start_line, TokenKind::Error, buf),
            Some('\n') => {
                sc.advance();
                return Token::new(start_line, TokenKind::Error, buf);
            }
            Some('"') => {
                let escaped = buf.ends_with('\\');
                buf.push('"');
                sc.advance();
                if !escaped {
                    let kind = classify(&buf, grammar);
                    return Token::new(start_line, kind, buf);
                }
            }
            Some(c) => {
                buf.push(c);
                sc.advance();
            }
        }
    }
}

fn category_kind(name: &str) -> Option<TokenKind> {
    match name {
        "Identifier" => Some(TokenKind::Identifier),
        "Number" | "Constant" => Some(TokenKind::Constant),
        "Operator" => Some(TokenKind::Operator),
        "Delimiter" => Some(TokenKind::Delimiter),
        _ => None,
    }
}

static IDENTIFIER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_]\w*$").unwrap());
static SCIENTIFIC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?(\d+\.\d+|\d+)[Ee][+-]?\d+$").unwrap());
static COMPLEX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?(\d+\.\d+|\d+)[+-](\d+\.\d+|\d+)i$").unwrap());
static INTEGER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([1-9]\d*|0)$").unwrap());
static FLOAT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[+-]?\d+\.\d+$").unwrap());
static STRING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"^(".*"|'.*')$"#).unwrap());

/// Classifies a finalized lexeme per the eight-rule chain of §4.2: keyword
/// set first, then the grammar file's own categories (matched in file
/// order), then the built-in fallback patterns that guarantee S1-S6 hold
/// regardless of grammar-file content.
fn classify(lexeme: &str, grammar: &LexicalGrammar) -> TokenKind {
    if grammar.keywords.contains(lexeme) {
        return TokenKind::Keyword;
    }
    for (name, regex) in &grammar.categories {
        if let Some(kind) = category_kind(name) {
            if regex.is_match(lexeme) {
                return kind;
            }
        }
    }
    if IDENTIFIER_RE.is_match(lexeme) {
        return TokenKind::Identifier;
    }
    if SCIENTIFIC_RE.is_match(lexeme) {
        return TokenKind::Constant;
    }
    if COMPLEX_RE.is_match(lexeme) {
        return TokenKind::Constant;
    }
    if INTEGER_RE.is_match(lexeme) {
        return TokenKind::Constant;
    }
    if FLOAT_RE.is_match(lexeme) {
        return TokenKind::Constant;
    }
    if STRING_RE.is_match(lexeme) {
        return TokenKind::Constant;
    }
    TokenKind::Error
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grammar() -> LexicalGrammar {
        LexicalGrammar::parse("Keyword → 'int' | 'if' | 'else' | 'while'\n").unwrap()
    }

    #[test]
    fn s1_keyword_identifier_operator_constant_delimiter() {
        let tokens = tokenize(&grammar(), "int x = 42;");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Keyword,
                TokenKind::Identifier,
                TokenKind::Operator,
                TokenKind::Constant,
                TokenKind::Delimiter,
            ]
        );
        assert_eq!(tokens[0].lexeme, "int");
        assert_eq!(tokens[3].lexeme, "42");
    }

    #[test]
    fn s2_leading_zero_is_one_error_token() {
        let tokens = tokenize(&grammar(), "0123");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Error);
        assert_eq!(tokens[0].lexeme, "0123");
    }

    #[test]
    fn s3_scientific_notation() {
        let tokens = tokenize(&grammar(), "1.5e-3");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Constant);
        assert_eq!(tokens[0].lexeme, "1.5e-3");
    }

    #[test]
    fn s4_newline_in_string_is_error_and_bumps_line() {
        let tokens = tokenize(&grammar(), "\"hi\nthere\"");
        assert_eq!(tokens[0].kind, TokenKind::Error);
        assert_eq!(tokens[0].line, 1);
        // The rest of the source is parsed starting on line 2.
        assert!(tokens.iter().any(|t| t.line == 2));
    }

    #[test]
    fn complex_literal() {
        let tokens = tokenize(&grammar(), "3+4i");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Constant);
        assert_eq!(tokens[0].lexeme, "3+4i");
    }

    #[test]
    fn broken_complex_shape_falls_back_to_number_plus_operator() {
        // "5+" with nothing following the sign: not a complex literal.
        let tokens = tokenize(&grammar(), "5+ x");
        assert_eq!(tokens[0].kind, TokenKind::Constant);
        assert_eq!(tokens[0].lexeme, "5");
        assert_eq!(tokens[1].kind, TokenKind::Operator);
        assert_eq!(tokens[1].lexeme, "+");
        assert_eq!(tokens[2].kind, TokenKind::Identifier);
    }

    #[test]
    fn zero_alone_is_a_valid_integer() {
        let tokens = tokenize(&grammar(), "0;");
        assert_eq!(tokens[0].kind, TokenKind::Constant);
        assert_eq!(tokens[0].lexeme, "0");
    }

    #[test]
    fn unknown_byte_is_error() {
        let tokens = tokenize(&grammar(), "@");
        assert_eq!(tokens[0].kind, TokenKind::Error);
        assert_eq!(tokens[0].lexeme, "@");
    }

    #[test]
    fn line_numbers_are_non_decreasing() {
        let tokens = tokenize(&grammar(), "int x;\nint y;\n");
        let mut last = 0;
        for t in &tokens {
            assert!(t.line >= last);
            last = t.line;
        }
    }
}
