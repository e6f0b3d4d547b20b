use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use slidesmith::OutputFormat;
use slidesmith::cli::commands;

/// Parse output format from string
fn parse_format(s: &str) -> Result<OutputFormat, String> {
    s.parse()
}

#[derive(Parser)]
#[command(name = "slidesmith")]
#[command(version, about = "AI-driven slide deck generator (PDF and PPTX)")]
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
    /// Generate a presentation on a theme
    Generate {
        #[arg(help = "Presentation theme")]
        theme: String,
        #[arg(long, short = 'n', help = "Number of slides (default: 10)")]
        slides: Option<u32>,
        #[arg(long, short, help = "Target audience")]
        audience: Option<String>,
        #[arg(long, short, help = "Additional information for the prompt")]
        info: Option<String>,
        #[arg(long, short, help = "Visual style: default, dark, creative")]
        style: Option<String>,
        #[arg(long, short, value_parser = parse_format, help = "Output format: pdf, pptx (default: pptx)")]
        format: Option<OutputFormat>,
    },

    /// Render stored presentation JSON without calling the LLM
    Render {
        #[arg(help = "Path to presentation JSON")]
        file: PathBuf,
        #[arg(long, short, default_value = "default", help = "Visual style: default, dark, creative")]
        style: String,
        #[arg(long, short, value_parser = parse_format, default_value = "pptx", help = "Output format: pdf, pptx")]
        format: OutputFormat,
    },

    /// Inspect or clear the content cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// List cached decks
    List,
    /// Remove every cached deck
    Clear,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources)
    Show {
        #[arg(long, help = "Output as JSON instead of TOML")]
        json: bool,
    },
    /// Show configuration file paths
    Path,
    /// Initialize project configuration
    Init {
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
        eprintln!("\x1b[31mSlidesmith encountered an unexpected error:\x1b[0m");
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

        // Backtrace when RUST_BACKTRACE=1
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Generate {
            theme,
            slides,
            audience,
            info,
            style,
            format,
        } => {
            let rt = Runtime::new()?;
            rt.block_on(commands::generate::run(commands::generate::GenerateOptions {
                theme,
                slides,
                audience,
                info,
                style,
                format,
            }))?;
        }
        Commands::Render {
            file,
            style,
            format,
        } => {
            let rt = Runtime::new()?;
            rt.block_on(commands::render::run(&file, &style, format))?;
        }
        Commands::Cache { action } => {
            let rt = Runtime::new()?;
            match action {
                CacheAction::List => rt.block_on(commands::cache::list())?,
                CacheAction::Clear => rt.block_on(commands::cache::clear())?,
            }
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { json } => commands::config::show(json)?,
            ConfigAction::Path => commands::config::path()?,
            ConfigAction::Init { force } => commands::config::init(force)?,
        },
    }

    Ok(())
}
