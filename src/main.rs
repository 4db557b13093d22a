// exprc: scan, parse and evaluate integer arithmetic statements

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgAction, Parser as ClapParser};
use tracing_subscriber::EnvFilter;

use exprc::interpreter::engine::Interpreter;
use exprc::parser::lexer::{Scanner, Token};
use exprc::parser::parse::Parser;

/// Scan, parse and evaluate `;`-terminated arithmetic statements.
#[derive(Debug, ClapParser)]
#[command(name = "exprc", version, about)]
struct Cli {
    /// Source file to process
    file: PathBuf,

    /// Print the token stream instead of parsing
    #[arg(long, conflicts_with = "ast")]
    tokens: bool,

    /// Print each statement's syntax tree instead of evaluating it
    #[arg(long)]
    ast: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(directive_for_verbosity(cli.verbose))),
        )
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();

    let source = fs::read_to_string(&cli.file)
        .with_context(|| format!("reading {}", cli.file.display()))?;

    if cli.tokens {
        dump_tokens(&source);
        return Ok(());
    }

    let mut parser = match Parser::new(&source) {
        Ok(parser) => parser,
        Err(e) => {
            eprintln!("Parser error: {}", e);
            std::process::exit(1);
        }
    };

    let program = match parser.parse_program() {
        Ok(program) => program,
        Err(e) => {
            eprintln!("Parser error: {}", e);
            std::process::exit(1);
        }
    };

    if cli.ast {
        for node in &program.nodes {
            println!("{}", node);
        }
        return Ok(());
    }

    let mut interpreter = Interpreter::new(program);
    let outcome = interpreter.run();

    for value in interpreter.results() {
        println!("{}", value);
    }

    if let Err(e) = outcome {
        eprintln!("Runtime error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Print one token per line with the line it ended on.
fn dump_tokens(source: &str) {
    let mut scanner = Scanner::new(source);

    loop {
        match scanner.scan() {
            Ok(Token::Eof) => break,
            Ok(Token::Ident) => println!("{:>4}  identifier {}", scanner.line(), scanner.text()),
            Ok(token) => println!("{:>4}  {}", scanner.line(), token),
            Err(e) => {
                eprintln!("Lexer error: {}", e);
                std::process::exit(1);
            }
        }
    }
}

fn directive_for_verbosity(v: u8) -> &'static str {
    match v {
        0 => "exprc=warn",
        1 => "exprc=debug",
        _ => "exprc=trace",
    }
}
