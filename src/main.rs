//! Eva Interpreter CLI
//!
//! Main entry point for the `eva` command.

use clap::{Parser, Subcommand};
use miette::Result;
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use eva::diagnostics::SourceFile;
use eva::interp::{Interpreter, Value};
use eva::loader::{DEFAULT_MODULE_DIR, FsModuleLoader};
use eva::repl::Repl;

#[derive(Parser)]
#[command(name = "eva")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Interpreter for the Eva programming language", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Directory searched by `import` (repeatable, searched in order)
    #[arg(
        long = "module-path",
        value_name = "DIR",
        global = true,
        env = "EVA_PATH",
        value_delimiter = ':'
    )]
    module_path: Vec<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an Eva program
    Run {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Evaluate an expression given on the command line
    Eval {
        /// Eva source text
        #[arg(value_name = "SOURCE")]
        source: String,
    },

    /// Parse a source file and print its expression tree
    Parse {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print the array-based AST as JSON
        #[arg(long)]
        json: bool,
    },

    /// Start the interactive REPL
    Repl,

    /// Show information about the interpreter
    Info,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins; --verbose only raises the default level
    let default_filter = if cli.verbose { "eva=debug" } else { "eva=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    let search_paths = if cli.module_path.is_empty() {
        vec![PathBuf::from(DEFAULT_MODULE_DIR)]
    } else {
        cli.module_path
    };
    tracing::debug!("Module search path: {:?}", search_paths);

    match cli.command {
        Commands::Run { input } => run(&input, search_paths),

        Commands::Eval { source } => eval(&source, search_paths),

        Commands::Parse { input, json } => parse(&input, json),

        Commands::Repl => Repl::new(interpreter(search_paths)).run(),

        Commands::Info => info(&search_paths),
    }
}

fn interpreter(search_paths: Vec<PathBuf>) -> Interpreter {
    Interpreter::with_loader(FsModuleLoader::new(search_paths))
}

fn read_source(input: &Path) -> Result<SourceFile> {
    let content = std::fs::read_to_string(input)
        .map_err(|e| miette::miette!("Failed to read input file: {}", e))?;
    Ok(SourceFile::new(input.display().to_string(), content))
}

fn run(input: &Path, search_paths: Vec<PathBuf>) -> Result<()> {
    tracing::info!("Running {:?}", input);

    let file = read_source(input)?;
    let interpreter = interpreter(search_paths);
    match interpreter.eval_file(&file)? {
        Value::Null => {}
        value => println!("{}", value),
    }
    Ok(())
}

fn eval(source: &str, search_paths: Vec<PathBuf>) -> Result<()> {
    let interpreter = interpreter(search_paths);
    let file = SourceFile::new("<eval>", source);
    match interpreter.eval_file(&file)? {
        Value::Null => {}
        value => println!("{}", value),
    }
    Ok(())
}

fn parse(input: &Path, json: bool) -> Result<()> {
    let file = read_source(input)?;
    let body = eva::parser::parse_body(&file)?;

    if json {
        let json = serde_json::to_string_pretty(&body)
            .map_err(|e| miette::miette!("Failed to serialize AST: {}", e))?;
        println!("{}", json);
    } else {
        println!("{}", body);
    }
    Ok(())
}

fn info(search_paths: &[PathBuf]) -> Result<()> {
    println!("Eva Interpreter");
    println!("Version: {}", eva::VERSION);
    println!();
    println!("Forms:");
    println!("  begin var set if while lambda class super new prop module import");
    println!("Sugar:");
    println!("  def switch for ++ -- += -=");
    println!();
    println!("Module search path:");
    for dir in search_paths {
        println!("  {}", dir.display());
    }

    Ok(())
}
