//! # Savepoint CLI
//!
//! Command-line front-end for the savepoint library: stage files, record
//! full-tree commits, inspect staging state and restore prior snapshots.
//!
//! ## Usage
//! ```bash
//! # Initialize a repository in the current directory
//! savepoint init
//!
//! # Stage a file or directory
//! savepoint add notes.txt
//!
//! # Record the staging area as a commit
//! savepoint commit -m "Initial state"
//!
//! # Show staged and untracked entries
//! savepoint status
//!
//! # Restore the working directory to a commit
//! savepoint checkout <commit_id>
//! ```

use clap::{Parser, Subcommand};
use colored::*;
use humantime::format_duration;
use savepoint::{InitOutcome, Repository, Result, StageOutcome};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Savepoint CLI - snapshot and restore directory states
#[derive(Parser)]
#[command(name = "savepoint")]
#[command(version)]
#[command(about = "Stage, commit and restore full snapshots of a working directory")]
#[command(long_about = None)]
struct Cli {
    /// Working directory (defaults to current)
    #[arg(short, long, global = true)]
    path: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a repository in the working directory
    Init,

    /// Stage a file or directory for the next commit
    Add {
        /// Path to stage
        path: PathBuf,
    },

    /// Record the staging area as a new commit
    Commit {
        /// Commit message
        #[arg(short, long)]
        message: String,
    },

    /// Show staged and untracked entries
    Status,

    /// Restore the working directory to a commit
    Checkout {
        /// Commit identifier
        commit_id: String,
    },
}

fn main() {
    let cli = Cli::parse();

    // Set up logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("savepoint=debug")),
            )
            .with_writer(std::io::stderr)
            .init();
    }

    // Disable colors if needed
    if std::env::var("NO_COLOR").is_ok() {
        colored::control::set_override(false);
    }

    // Run command
    if let Err(e) = run(cli) {
        if e.is_informational() {
            println!("{}", e.to_string().yellow());
        } else {
            eprintln!("{}: {}", "Error".red().bold(), e);
            std::process::exit(1);
        }
    }
}

/// Main command runner
fn run(cli: Cli) -> Result<()> {
    let root = cli.path.unwrap_or_else(|| PathBuf::from("."));
    let repo = Repository::new(root);

    match cli.command {
        Commands::Init => cmd_init(&repo),
        Commands::Add { path } => cmd_add(&repo, &path),
        Commands::Commit { message } => cmd_commit(&repo, &message),
        Commands::Status => cmd_status(&repo),
        Commands::Checkout { commit_id } => cmd_checkout(&repo, &commit_id),
    }
}

/// Initialize a repository
fn cmd_init(repo: &Repository) -> Result<()> {
    match repo.init()? {
        InitOutcome::Created => {
            println!("{} Initialized empty repository", "✓".green().bold());
            println!("  Root: {}", repo.root().display().to_string().cyan());
        }
        InitOutcome::Existing => {
            println!("{}", "Repository already exists.".yellow());
        }
    }
    Ok(())
}

/// Stage a file or directory
fn cmd_add(repo: &Repository, path: &Path) -> Result<()> {
    match repo.add(path)? {
        StageOutcome::Staged { name } => {
            println!("{} Staged {}", "✓".green().bold(), name.cyan());
        }
        StageOutcome::Ignored { name } => {
            println!(
                "{}",
                format!("Path {} is protected or ignored.", name).yellow()
            );
        }
        StageOutcome::Missing { path } => {
            println!(
                "{}",
                format!("Path {} does not exist.", path.display()).yellow()
            );
        }
    }
    Ok(())
}

/// Record a commit from the staging area
fn cmd_commit(repo: &Repository, message: &str) -> Result<()> {
    let start = Instant::now();
    let record = repo.commit(message)?;

    println!(
        "{} Commit {} created",
        "✓".green().bold(),
        record.id.yellow().bold()
    );
    println!("  Message: {}", record.message.cyan());
    println!(
        "  Time: {}",
        format_duration(start.elapsed()).to_string().cyan()
    );
    Ok(())
}

/// Show staged and untracked entries
fn cmd_status(repo: &Repository) -> Result<()> {
    let report = repo.status()?;

    println!("{}", "Staged:".blue().bold());
    if report.staged.is_empty() {
        println!("  {}", "(none)".dimmed());
    }
    for name in &report.staged {
        println!("  {}", name.green());
    }

    println!("{}", "Untracked:".blue().bold());
    if report.untracked.is_empty() {
        println!("  {}", "(none)".dimmed());
    }
    for name in &report.untracked {
        println!("  {}", name.red());
    }
    Ok(())
}

/// Restore the working directory to a commit
fn cmd_checkout(repo: &Repository, commit_id: &str) -> Result<()> {
    let start = Instant::now();
    let report = repo.checkout(commit_id)?;

    println!(
        "{} Switched to commit {}",
        "✓".green().bold(),
        report.id.yellow().bold()
    );
    println!(
        "  Entries restored: {}",
        report.entries_restored.to_string().cyan()
    );
    println!(
        "  Entries removed: {}",
        report.entries_removed.to_string().cyan()
    );
    println!(
        "  Time: {}",
        format_duration(start.elapsed()).to_string().cyan()
    );

    if !report.warnings.is_empty() {
        println!("\n{}", "Warnings:".yellow().bold());
        for warning in &report.warnings {
            println!("  - {}", warning.yellow());
        }
    }
    Ok(())
}
