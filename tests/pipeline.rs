//! Integration tests exercising the full lex -> bridge -> parse pipeline
//! against the concrete scenarios.

use std::fs;

use lr1lex::grammar::{Grammar, Symbol};
use lr1lex::lexgrammar::LexicalGrammar;
use lr1lex::table::build_tables;
use lr1lex::token::TokenKind;
use lr1lex::{driver, lexer};

const TOKENS_GRAMMAR: &str = "Keyword → 'int' | 'if' | 'else' | 'while'\n";

const ARITH_GRAMMAR: &str = "E → E '+' T | T\n\
                              T → T '*' F | F\n\
                              F → '(' E ')' | ID\n";

#[test]
fn s1_keyword_identifier_operator_constant_delimiter() {
    let lg = LexicalGrammar::parse(TOKENS_GRAMMAR).unwrap();
    let tokens = lexer::tokenize(&lg, "int x = 42;");
    let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
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
fn s2_leading_zero_run_is_one_error_token() {
    let lg = LexicalGrammar::parse(TOKENS_GRAMMAR).unwrap();
    let tokens = lexer::tokenize(&lg, "0123");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::Error);
    assert_eq!(tokens[0].lexeme, "0123");
}

#[test]
fn s3_scientific_notation_is_one_constant() {
    let lg = LexicalGrammar::parse(TOKENS_GRAMMAR).unwrap();
    let tokens = lexer::tokenize(&lg, "1.5e-3");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::Constant);
    assert_eq!(tokens[0].lexeme, "1.5e-3");
}

#[test]
fn s4_newline_inside_string_is_error_and_bumps_line() {
    let lg = LexicalGrammar::parse(TOKENS_GRAMMAR).unwrap();
    let tokens = lexer::tokenize(&lg, "\"hi\nthere\"");
    assert!(tokens.iter().any(|t| t.kind == TokenKind::Error));
    let error_tok = tokens.iter().find(|t| t.kind == TokenKind::Error).unwrap();
    assert_eq!(error_tok.line, 1);
    // whatever follows the embedded newline starts on line 2.
    assert!(tokens.iter().any(|t| t.line == 2));
}

#[test]
fn s5_arithmetic_expression_parses_with_leaf_first_reductions() {
    let grammar = Grammar::parse(ARITH_GRAMMAR).unwrap();
    let tables = build_tables(&grammar).unwrap();

    let tokens = vec![
        lr1lex::token::Token::new(1, TokenKind::Identifier, "x"),
        lr1lex::token::Token::new(1, TokenKind::Operator, "+"),
        lr1lex::token::Token::new(1, TokenKind::Identifier, "y"),
        lr1lex::token::Token::new(1, TokenKind::Operator, "*"),
        lr1lex::token::Token::new(1, TokenKind::Identifier, "z"),
    ];

    let outcome = driver::parse(&grammar, &tables, &tokens);
    assert!(outcome.success, "errors: {:?}", outcome.errors);

    // Bottom-up order for `id + id * id` under this grammar: the first id
    // reduces all the way up to E before '+' is shifted (E is the only
    // thing that can precede '+' in `E -> E '+' T`), then the second id
    // reduces only to T before the state forces a shift on '*', and the
    // third id folds back up through T and E at the end.
    let reduced_names: Vec<String> = outcome
        .reductions
        .iter()
        .map(|s| s.display_name().to_string())
        .collect();
    assert_eq!(
        reduced_names,
        vec!["F", "T", "E", "F", "T", "F", "T", "E"]
    );
}

#[test]
fn s6_doubled_operator_fails_with_exact_error_string() {
    let grammar = Grammar::parse(ARITH_GRAMMAR).unwrap();
    let tables = build_tables(&grammar).unwrap();

    let tokens = vec![
        lr1lex::token::Token::new(1, TokenKind::Identifier, "x"),
        lr1lex::token::Token::new(1, TokenKind::Operator, "+"),
        lr1lex::token::Token::new(1, TokenKind::Operator, "+"),
        lr1lex::token::Token::new(1, TokenKind::Identifier, "y"),
    ];

    let outcome = driver::parse(&grammar, &tables, &tokens);
    assert!(!outcome.success);
    assert_eq!(
        outcome.errors,
        vec!["Line 1: Syntax error, unexpected token '+'"]
    );
}

#[test]
fn end_to_end_from_grammar_files_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let tokens_path = dir.path().join("tokens.grammar");
    let grammar_path = dir.path().join("cfg.grammar");
    fs::write(&tokens_path, TOKENS_GRAMMAR).unwrap();
    fs::write(&grammar_path, "S → ID\n").unwrap();

    let analyzer = lr1lex::Analyzer::build(&tokens_path, &grammar_path).unwrap();
    let tokens = analyzer.tokenize("count");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::Identifier);

    let outcome = analyzer.parse(&tokens);
    assert!(outcome.success);

    let out_dir = dir.path().join("trace-out");
    lr1lex::trace::write_artifacts(&out_dir, &analyzer.grammar, &analyzer.tables, &outcome)
        .unwrap();
    assert!(out_dir.join(lr1lex::trace::STATES_FILE).exists());
}

#[test]
fn reduce_reduce_conflict_fails_construction_not_parsing() {
    let grammar = Grammar::parse("S → A | B\nA → ID\nB → ID\n").unwrap();
    let err = build_tables(&grammar).unwrap_err();
    assert!(err.to_string().contains("reduce-reduce conflict"));
}

#[test]
fn quoted_terminal_round_trips_through_symbol_display() {
    let grammar = Grammar::parse(ARITH_GRAMMAR).unwrap();
    assert!(grammar
        .terminals
        .contains(&Symbol::Terminal("'+'".to_string())));
}
