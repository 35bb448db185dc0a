//! Command-line driver for the lexer/parser core.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::info;

use lr1lex::Analyzer;

#[derive(Parser)]
#[command(name = "lr1lex")]
#[command(about = "Grammar-driven DFA lexer and LR(1) parser", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the lexical grammar (grammar-of-tokens) file
    #[arg(long)]
    tokens: PathBuf,

    /// Path to the context-free grammar file
    #[arg(long)]
    grammar: PathBuf,

    /// Path to the source file to scan and parse
    #[arg(long)]
    source: PathBuf,

    /// Directory to write the trace artifacts into
    #[arg(long, default_value = "trace-out")]
    out_dir: PathBuf,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match run(&cli) {
        Ok(success) => {
            if success {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> lr1lex::error::Result<bool> {
    info!("loading grammars");
    let analyzer = Analyzer::build(&cli.tokens, &cli.grammar)?;

    let source = std::fs::read_to_string(&cli.source)?;
    let tokens = analyzer.tokenize(&source);
    info!("lexed {} tokens", tokens.len());
    for token in &tokens {
        println!("{token}");
    }

    let outcome = analyzer.parse(&tokens);
    if outcome.success {
        println!("parse succeeded");
    } else {
        println!("parse failed");
        for error in &outcome.errors {
            println!("{error}");
        }
    }

    lr1lex::trace::write_artifacts(&cli.out_dir, &analyzer.grammar, &analyzer.tables, &outcome)?;
    info!("trace artifacts written to {}", cli.out_dir.display());

    Ok(outcome.success)
}
