use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use reporoast::cli::commands;
use reporoast::cli::{OutputFormat, ReviewOptions};

#[derive(Parser)]
#[command(name = "reporoast")]
#[command(
    version,
    about = "Brutally honest AI code review for public GitHub repositories"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true)]
    verbose: bool,

    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Review a repository and stream progress as it happens
    Review {
        #[arg(help = "Repository URL, e.g. https://github.com/owner/repo")]
        url: String,
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            help = "Output format: text, json, sse"
        )]
        format: OutputFormat,
        #[arg(long, help = "LLM provider (gemini, openai)")]
        provider: Option<String>,
        #[arg(long, help = "Model to use")]
        model: Option<String>,
    },

    /// Check hosting API quota and model provider health
    Check {
        #[arg(long, help = "LLM provider (gemini, openai)")]
        provider: Option<String>,
        #[arg(long, help = "Model to use")]
        model: Option<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources)
    Show {
        #[arg(
            short = 'f',
            long,
            default_value = "toml",
            help = "Output format: toml, json"
        )]
        format: String,
    },
    /// Show configuration file paths
    Path,
    /// Initialize configuration
    Init {
        #[arg(long, short, help = "Initialize global config")]
        global: bool,
        #[arg(long, help = "Overwrite existing config")]
        force: bool,
    },
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31mreporoast encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }
        eprintln!();

        // Call default hook for backtrace (if RUST_BACKTRACE=1)
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };

    // Logs go to stderr so json/sse output on stdout stays parseable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let code = match cli.command {
        Commands::Review {
            url,
            format,
            provider,
            model,
        } => commands::review::run(ReviewOptions {
            url,
            format,
            provider,
            model,
        })?,
        Commands::Check { provider, model } => commands::check::run(provider, model)?,
        Commands::Config { action } => {
            match action {
                ConfigAction::Show { format } => commands::config::show(&format)?,
                ConfigAction::Path => commands::config::path()?,
                ConfigAction::Init { global, force } => commands::config::init(global, force)?,
            }
            ExitCode::SUCCESS
        }
    };

    Ok(code)
}
