// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Triage: keyboard-driven media sorting
//!
//! Terminal front end: an interactive session reading one key per line,
//! plus queue listing and session file management.

use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use triage::config::{SessionConfig, TransferMode, DEFAULT_CONFIG_FILE};
use triage::launch::open_default;
use triage::scanner::{scan, Item};
use triage::sorter::{sort_items, SortKey};
use triage::{Result, SessionController, Snapshot};

/// Triage CLI - sort media files into buckets one at a time
#[derive(Parser, Debug)]
#[command(name = "triage")]
#[command(author = "Jonathan D. A. Jewell <hyperpolymath>")]
#[command(version = "1.0.0")]
#[command(about = "Keyboard-driven media triage", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to session file (JSON format)
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE, global = true)]
    config: PathBuf,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable trace logging (most verbose)
    #[arg(long, global = true)]
    trace: bool,

    /// Output format for results
    #[arg(long, global = true, default_value = "text", value_parser = ["text", "json", "jsonl"])]
    format: String,

    /// Suppress non-essential output (quiet mode)
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start an interactive triage session
    Run {
        /// Input folder (overrides and updates the session file)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Include subfolders
        #[arg(short, long)]
        recursive: bool,
    },

    /// List the queue a session would start with
    Scan {
        /// Folder to scan (default: input folder from the session file)
        path: Option<PathBuf>,

        /// Include subfolders
        #[arg(short, long)]
        recursive: bool,

        /// Sort key: name, time or size
        #[arg(short, long)]
        sort: Option<SortKey>,

        /// Reverse the sort direction
        #[arg(long)]
        reverse: bool,
    },

    /// Session file management
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show current session settings
    Show,

    /// Generate default session file
    Generate {
        /// Output file path
        #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
        output: PathBuf,
    },

    /// Change session settings
    Set {
        /// Input folder
        #[arg(long)]
        input: Option<String>,

        /// Include subfolders (true/false)
        #[arg(long)]
        recursive: Option<bool>,

        /// Sort key: name, time or size
        #[arg(long)]
        sort: Option<SortKey>,

        /// Reverse sort direction (true/false)
        #[arg(long)]
        reverse: Option<bool>,

        /// Transfer mode: copy or move
        #[arg(long)]
        mode: Option<TransferMode>,

        /// Destination as N=PATH (empty PATH clears the bucket)
        #[arg(long = "bucket", value_parser = parse_bucket)]
        buckets: Vec<(usize, String)>,
    },
}

fn parse_bucket(raw: &str) -> std::result::Result<(usize, String), String> {
    let (index, path) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected N=PATH, got '{}'", raw))?;
    let index: usize = index
        .trim()
        .parse()
        .map_err(|_| format!("bucket must be a number, got '{}'", index))?;
    Ok((index, path.to_string()))
}

/// A single-key command in the interactive session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Classify(usize),
    Skip,
    GoBack,
    Undo,
    Next,
    Previous,
    Reload,
    Open,
    History,
    Help,
    Quit,
}

impl Action {
    fn from_key(key: &str) -> Option<Self> {
        match key {
            "a" => Some(Action::Classify(1)),
            "s" => Some(Action::Classify(2)),
            "d" => Some(Action::Classify(3)),
            "w" => Some(Action::Skip),
            "x" => Some(Action::GoBack),
            "z" | "u" => Some(Action::Undo),
            "n" => Some(Action::Next),
            "p" => Some(Action::Previous),
            "r" => Some(Action::Reload),
            "o" => Some(Action::Open),
            "h" => Some(Action::History),
            "?" => Some(Action::Help),
            "q" => Some(Action::Quit),
            _ => None,
        }
    }
}

const HELP: &str = "\
  a / s / d   send to bucket 1 / 2 / 3
  w           skip (set aside)
  x           bring back the last skipped file
  z           undo the last classification
  n / p       browse next / previous
  r           rescan the input folder
  o           open the current file
  h           show history
  q           quit";

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let config = SessionConfig::load_or_default(&cli.config);

    match cli.command {
        Some(Commands::Run { input, recursive }) => run_session(config, &cli.config, input, recursive),
        Some(Commands::Scan { path, recursive, sort, reverse }) => {
            run_scan(&config, path, recursive, sort, reverse, &cli.format)
        }
        Some(Commands::Config { action }) => run_config_command(config, action, &cli.config),
        None => run_session(config, &cli.config, None, false),
    }
}

/// Interactive session on stdin/stdout
fn run_session(
    mut config: SessionConfig,
    config_path: &Path,
    input: Option<PathBuf>,
    recursive: bool,
) -> anyhow::Result<()> {
    if input.is_some() || recursive {
        if let Some(input) = input {
            config.input_folder = input.to_string_lossy().into_owned();
        }
        config.include_subfolders |= recursive;
        config.persist(config_path);
    }

    let mut session = SessionController::new(config);
    info!("Session started, press ? for keys");
    println!("{}", session.snapshot());

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        stdout.flush()?;

        let Some(line) = lines.next() else { break };
        let key = line?.trim().to_lowercase();
        if key.is_empty() {
            continue;
        }

        let Some(action) = Action::from_key(&key) else {
            println!("Unknown key '{}', press ? for help", key);
            continue;
        };

        match action {
            Action::Quit => break,
            Action::Help => println!("{}", HELP),
            Action::History => print_history(&session),
            Action::Open => open_current(&session),
            _ => match dispatch(&mut session, action) {
                Ok(snapshot) => println!("{}", snapshot),
                Err(e) if e.is_actionable() => println!("! {}", e),
                Err(e) => warn!("{}", e),
            },
        }
    }

    info!("Session ended with {} files left", session.queue().len());
    Ok(())
}

/// Apply a session-changing action
fn dispatch(session: &mut SessionController, action: Action) -> Result<Snapshot> {
    debug!("Action: {:?}", action);
    match action {
        Action::Classify(bucket) => session.classify(bucket),
        Action::Skip => Ok(session.skip()),
        Action::GoBack => Ok(session.go_back()),
        Action::Undo => session.undo(),
        Action::Next => Ok(session.advance()),
        Action::Previous => Ok(session.retreat()),
        Action::Reload => Ok(session.reload()),
        Action::Open | Action::History | Action::Help | Action::Quit => Ok(session.snapshot()),
    }
}

fn open_current(session: &SessionController) {
    match session.current() {
        Some(item) => {
            if let Err(e) = open_default(item.path.as_os_str()) {
                println!("! Cannot open {}: {}", item.path.display(), e);
            }
        }
        None => println!("Nothing to open"),
    }
}

fn print_history(session: &SessionController) {
    let entries = session.history().recent(10);
    println!("Recent history ({} entries):", entries.len());
    for entry in entries {
        println!(
            "  {} [{}] {} -> {}",
            entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
            entry.mode,
            entry.restored_path().display(),
            entry.produced_path.display()
        );
    }
}

/// Print the sorted queue
fn run_scan(
    config: &SessionConfig,
    path: Option<PathBuf>,
    recursive: bool,
    sort: Option<SortKey>,
    reverse: bool,
    format: &str,
) -> anyhow::Result<()> {
    let Some(root) = path.or_else(|| config.input_path()) else {
        anyhow::bail!("No folder given and no input folder in the session file");
    };

    let mut items = scan(&root, recursive || config.include_subfolders);
    let key = sort.unwrap_or(config.sort_method);
    sort_items(&mut items, key, reverse || config.reverse_sort);

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&items)?),
        "jsonl" => {
            for item in &items {
                println!("{}", serde_json::to_string(item)?);
            }
        }
        _ => {
            for (i, item) in items.iter().enumerate() {
                println!("{:4}. {}", i + 1, describe(item));
            }
            println!("\n{} files (sorted by {})", items.len(), key);
        }
    }

    Ok(())
}

fn describe(item: &Item) -> String {
    format!(
        "{} ({:?}, {} bytes, {})",
        item.path.display(),
        item.kind,
        item.size,
        item.modified.format("%Y-%m-%d %H:%M")
    )
}

/// Run config commands
fn run_config_command(
    mut config: SessionConfig,
    action: ConfigCommands,
    config_path: &Path,
) -> anyhow::Result<()> {
    match action {
        ConfigCommands::Show => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigCommands::Generate { output } => {
            SessionConfig::default().save(&output)?;
            println!("Generated session file at {:?}", output);
        }
        ConfigCommands::Set { input, recursive, sort, reverse, mode, buckets } => {
            if let Some(v) = input { config.input_folder = v; }
            if let Some(v) = recursive { config.include_subfolders = v; }
            if let Some(v) = sort { config.sort_method = v; }
            if let Some(v) = reverse { config.reverse_sort = v; }
            if let Some(v) = mode { config.set_mode(v); }
            for (bucket, path) in buckets {
                let path = path.trim();
                let path = (!path.is_empty()).then(|| Path::new(path));
                config.set_destination(bucket, path)?;
            }
            config.save(config_path)?;
            println!("Updated {:?}", config_path);
        }
    }

    Ok(())
}
