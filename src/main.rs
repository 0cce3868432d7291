use clap::{Parser as ClapParser, Subcommand, ValueEnum};
use sift_lang::{
    Config,
    cli::{self, CliError, CompileOptions, CompileResult, DiagnosticFormat},
};
use std::{
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
};
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(name = "sift")]
#[command(about = "Sift - compile extract/select/join/output scripts into streaming pipelines")]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to ./sift.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

impl From<Format> for DiagnosticFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Text => DiagnosticFormat::Text,
            Format::Json => DiagnosticFormat::Json,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a script
    Compile {
        /// Script file ('-' or omitted reads stdin)
        script: Option<PathBuf>,

        /// Write the result to this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Directory of snippet templates
        #[arg(long)]
        snippets: Option<PathBuf>,

        /// Diagnostic format
        #[arg(long, value_enum, default_value = "text")]
        format: Format,
    },

    /// Check script syntax without generating code
    Check {
        /// Script file ('-' or omitted reads stdin)
        script: Option<PathBuf>,

        /// Diagnostic format
        #[arg(long, value_enum, default_value = "text")]
        format: Format,
    },

    /// Print the token stream of a script
    Tokens {
        /// Script file ('-' or omitted reads stdin)
        script: Option<PathBuf>,
    },

    /// Compile statements interactively
    Repl,

    /// List documentation categories
    Docs,

    /// Show documentation for a specific category
    Doc {
        /// Category name (use 'sift docs' to list categories)
        category: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("SIFT_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let format = match &cli.command {
        Commands::Compile { format, .. } | Commands::Check { format, .. } => (*format).into(),
        _ => DiagnosticFormat::Text,
    };

    if let Err(e) = run(cli) {
        let message = match &e {
            CliError::Compile(diagnostics) => {
                cli::render_diagnostics(diagnostics, format).unwrap_or_else(|_| e.to_string())
            }
            _ => e.to_string(),
        };
        eprintln!("{}", message);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = Config::discover(cli.config.as_deref())?;

    match cli.command {
        Commands::Compile {
            script,
            output,
            snippets,
            ..
        } => {
            let options = CompileOptions {
                script: read_script(script.as_deref())?,
                script_path: script.filter(|p| p.as_path() != Path::new("-")),
                output,
                snippets_dir: snippets,
            };
            match cli::execute_compile(&options, &config)? {
                CompileResult::Printed(text) => print!("{}", text),
                CompileResult::Written(path) => eprintln!("wrote {}", path.display()),
            }
        }
        Commands::Check { script, .. } => {
            let result = cli::execute_check(&read_script(script.as_deref())?)?;
            println!("Syntax is valid ({} statements)", result.statements);
        }
        Commands::Tokens { script } => {
            println!("{}", cli::format_tokens(&read_script(script.as_deref())?)?);
        }
        Commands::Repl => {
            let snippets = config.snippet_provider();
            let stdin = io::stdin();
            cli::run_repl(stdin.lock(), io::stdout(), snippets.as_ref())?;
        }
        Commands::Docs => print!("{}", cli::get_docs_overview()),
        Commands::Doc { category } => print!("{}", cli::get_doc_category(&category)?),
    }
    Ok(())
}

fn read_script(path: Option<&Path>) -> Result<String, CliError> {
    match path {
        Some(path) if path != Path::new("-") => Ok(fs::read_to_string(path)?),
        _ if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
        _ => Err(CliError::NoInput),
    }
}
