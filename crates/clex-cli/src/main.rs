use clap::{Parser, Subcommand, ValueEnum};
use clex_lexer::{scan_chunks, TokenStream, WriteSink};
use std::path::Path;

#[derive(Parser)]
#[command(name = "clex")]
#[command(about = "Tokenizer for a C-like language")]
#[command(version)]
struct Cli {
    /// Log scanner activity to stderr (also enabled by CLEX_LOG / RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Tokenize a file and print its tokens
    Lex {
        /// Input source file
        path: String,

        /// Output layout
        #[arg(long, value_enum, default_value_t = Format::List)]
        format: Format,

        /// Scan in independent chunks of this many bytes (0 = whole file)
        #[arg(long, default_value_t = 0)]
        chunk_size: usize,
    },

    /// Tokenize a file and report diagnostics only
    Check {
        /// Input source file
        path: String,

        /// Scan in independent chunks of this many bytes (0 = whole file)
        #[arg(long, default_value_t = 0)]
        chunk_size: usize,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    /// One token per line
    List,
    /// All tokens on one line as `(tok)(tok)...`
    Groups,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Lex {
            path,
            format,
            chunk_size,
        } => cmd_lex(&path, format, chunk_size),
        Command::Check { path, chunk_size } => cmd_check(&path, chunk_size),
    }
}

/// Logs go to stderr so stdout keeps tokens and diagnostics.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_env("CLEX_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .ok()
        .or_else(|| verbose.then(|| EnvFilter::new("clex_lexer=debug")));

    if let Some(filter) = filter {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .with(filter)
            .init();
    }
}

fn read_source(path: &str) -> Vec<u8> {
    let p = Path::new(path);
    if !p.exists() {
        eprintln!("Error: file not found: {path}");
        std::process::exit(1);
    }
    match std::fs::read(p) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error reading {path}: {e}");
            std::process::exit(1);
        }
    }
}

/// Scan `source` chunk by chunk, printing diagnostics to stdout as they occur.
fn scan(source: &[u8], chunk_size: usize) -> (Vec<TokenStream>, usize) {
    let mut sink = WriteSink::stdout();
    let streams = scan_chunks(source, chunk_size, &mut sink);
    tracing::debug!(
        chunks = streams.len(),
        diagnostics = sink.reported(),
        "file scanned"
    );
    (streams, sink.reported())
}

fn cmd_lex(path: &str, format: Format, chunk_size: usize) {
    let source = read_source(path);
    let (streams, _) = scan(&source, chunk_size);

    for tokens in &streams {
        match format {
            Format::List => print!("{tokens}"),
            Format::Groups => println!("{}", tokens.groups()),
        }
    }
}

fn cmd_check(path: &str, chunk_size: usize) {
    let source = read_source(path);
    let (_, diagnostics) = scan(&source, chunk_size);

    if diagnostics > 0 {
        eprintln!("{path}: {diagnostics} lexical error(s)");
        std::process::exit(1);
    }

    eprintln!("OK: {path}");
}
