use clap::{Parser, Subcommand};
use keyword_debugger::config::{DebuggerConfig, EventFormat};
use keyword_debugger::controller;
use keyword_debugger::executor::{library, Status};
use keyword_debugger::parser;
use keyword_debugger::Result;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "keyword-debugger")]
#[command(about = "Step through nested keyword scripts", long_about = None)]
struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print worker events as JSON lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Debug a script interactively
    Debug {
        script: PathBuf,

        /// Start running instead of pausing before the first keyword
        #[arg(long)]
        no_stop_on_entry: bool,
    },

    /// Run a script without stopping
    Run { script: PathBuf },

    /// Parse a script and list its keywords
    Check { script: PathBuf },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => DebuggerConfig::load(path)?,
        None => DebuggerConfig::default(),
    };
    if cli.json {
        config.event_format = EventFormat::Json;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with_writer(io::stderr)
        .init();

    let status = match cli.command {
        Commands::Debug {
            script,
            no_stop_on_entry,
        } => {
            if no_stop_on_entry {
                config.stop_on_entry = false;
            }
            let script = parser::load_script(&script)?;
            let stdin = io::BufReader::new(io::stdin());
            controller::debug_script(script, &config, stdin, io::stderr())?.status
        }
        Commands::Run { script } => {
            let script = parser::load_script(&script)?;
            let summary = controller::run_script(&script, config.event_format);
            if let Some(failure) = &summary.failure {
                eprintln!("❌ {}", failure);
            }
            summary.status
        }
        Commands::Check { script } => {
            let script = parser::load_script(&script)?;
            println!("{} top-level keyword call(s)", script.body.len());
            let mut keywords: Vec<_> = script.keywords.values().collect();
            keywords.sort_by_key(|def| def.line);
            for def in keywords {
                println!(
                    "  :{} {} (line {}, {} call(s))",
                    def.name,
                    def.params.join(" "),
                    def.line,
                    def.body.len()
                );
            }
            println!("built-ins: {}", library::BUILTINS.join(", "));
            Status::Pass
        }
    };

    if status != Status::Pass {
        std::process::exit(1);
    }
    Ok(())
}
