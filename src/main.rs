use clap::{Parser, Subcommand};
use std::path::PathBuf;

use promedia::output::{self, ExportData, ExportFormat};
use promedia::state::Derived;
use promedia::store::{self, KvStore};

const EXIT_SUCCESS: i32 = 0;
const EXIT_CONFIG: i32 = 1;
const EXIT_STORAGE: i32 = 2;
const EXIT_EXPORT: i32 = 3;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Open the interactive calculator (default if no subcommand)
    Tui,
    /// Print the computed results for the saved session
    Summary {
        /// Tab-separated entry rows for scripting (no colors)
        #[arg(long)]
        tsv: bool,
    },
    /// Export the saved session to a file
    Export {
        /// Output format
        #[arg(short, long, value_parser = ["csv", "json", "txt"], default_value = "txt")]
        format: String,

        /// Output path (defaults to promedia-<timestamp>.<ext> in the
        /// current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Reset the saved session to a blank calculator
    Clear,
    /// Create a starter config file interactively
    Init,
}

#[derive(Parser, Debug)]
#[command(name = "promedia")]
#[command(about = "Grade-weighting calculator for the terminal", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/promedia/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Path to session file (defaults to ~/.config/promedia/session.json)
    #[arg(short, long, global = true)]
    session: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Tui);

    // Load config
    let config_path = cli.config.map(PathBuf::from);
    let config = match promedia::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate config at startup, reporting every problem at once
    if let Err(errors) = promedia::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    // Init runs before any session is touched
    if matches!(command, Commands::Init) {
        if let Err(e) = promedia::config::run_init_wizard(None) {
            eprintln!("Init failed: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
        std::process::exit(EXIT_SUCCESS);
    }

    // Open the session store. A broken file degrades to a fresh
    // calculator instead of locking the user out.
    let session_path = cli
        .session
        .map(PathBuf::from)
        .unwrap_or_else(store::get_session_path);
    let had_session = session_path.exists();
    let kv = match KvStore::load(&session_path) {
        Ok(kv) => kv,
        Err(e) => {
            eprintln!("Warning: {} - starting with a blank session", e);
            KvStore::empty(&session_path)
        }
    };

    let mut state = store::load_session(&kv);

    // Config defaults only apply when nothing was saved yet
    if !had_session {
        state.pass_grade = config.pass_grade();
        state.exam_weight = config.exam_weight();
    }

    if cli.verbose {
        eprintln!(
            "Session: {} ({} entries, exam mode {})",
            session_path.display(),
            state.entries.len(),
            if state.exam_mode { "on" } else { "off" }
        );
    }

    match command {
        Commands::Tui => {
            let saved_theme = store::load_theme(&kv);
            let preference = saved_theme.as_deref().or(config.theme.as_deref());
            let theme = promedia::tui::resolve_theme(preference);

            let app = promedia::tui::App::new(state, config, kv, theme, cli.verbose);
            if let Err(e) = promedia::tui::run_tui(app).await {
                eprintln!("TUI error: {}", e);
                std::process::exit(EXIT_STORAGE);
            }
        }
        Commands::Summary { tsv } => {
            let derived = Derived::compute(&state);
            if tsv {
                let data = ExportData::from_state(&state, &derived, chrono::Local::now());
                let out = output::format_tsv(&data);
                if !out.is_empty() {
                    println!("{}", out);
                }
            } else {
                let use_colors = output::should_use_colors();
                println!("{}", output::format_summary(&state, &derived, use_colors));
            }
        }
        Commands::Export { format, output: output_path } => {
            // The arg parser only lets known formats through
            let format = ExportFormat::parse(&format).unwrap_or(ExportFormat::Txt);
            let derived = Derived::compute(&state);
            let timestamp = chrono::Local::now();
            let data = ExportData::from_state(&state, &derived, timestamp);

            let rendered = match output::render_export(&data, format) {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("Export failed: {}", e);
                    std::process::exit(EXIT_EXPORT);
                }
            };

            let path = output_path
                .unwrap_or_else(|| PathBuf::from(output::export_filename(format, timestamp)));

            if let Err(e) = std::fs::write(&path, rendered) {
                eprintln!("Failed to write {}: {}", path.display(), e);
                std::process::exit(EXIT_EXPORT);
            }

            println!("Exported to {}", path.display());
        }
        Commands::Clear => {
            let mut kv = kv;
            let blank = promedia::state::CalculatorState::default();
            if let Err(e) = store::save_session(&mut kv, &blank) {
                eprintln!("Failed to clear session: {}", e);
                std::process::exit(EXIT_STORAGE);
            }
            println!("Session cleared.");
        }
        Commands::Init => unreachable!("handled above"),
    }

    std::process::exit(EXIT_SUCCESS);
}
