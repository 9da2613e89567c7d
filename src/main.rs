use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use similar::{ChangeTag, TextDiff};
use std::env;
use std::path::{Path, PathBuf};
use textpatch::plan::{load_from_path, PlanConfig};
use textpatch::{EditSession, EngineError, SessionResult};
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "textpatch")]
#[command(about = "Transactional multi-edit text engine", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply every session in a plan file
    Apply {
        /// Plan file to apply (otherwise applies all in plans/)
        #[arg(short, long)]
        plan: Option<PathBuf>,

        /// Dry run - evaluate everything, write nothing
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Show unified diff of changes
        #[arg(short, long)]
        diff: bool,

        /// Emit session reports as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check whether a plan would apply cleanly, without writing
    Check {
        /// Plan file to check (otherwise checks all in plans/)
        #[arg(short, long)]
        plan: Option<PathBuf>,
    },

    /// One-shot find/replace session on a single file
    Replace {
        /// Absolute path to the target file
        file: PathBuf,

        /// Text to search for (literal, not regex)
        search: String,

        /// Replacement text
        replacement: String,

        /// Replace every occurrence instead of requiring a unique match
        #[arg(short, long)]
        all: bool,

        /// Dry run - evaluate everything, write nothing
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Show unified diff of changes
        #[arg(short, long)]
        diff: bool,

        /// Emit the session report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Apply {
            plan,
            dry_run,
            diff,
            json,
        } => cmd_apply(plan, dry_run, diff, json),

        Commands::Check { plan } => cmd_apply(plan, true, false, false),

        Commands::Replace {
            file,
            search,
            replacement,
            all,
            dry_run,
            diff,
            json,
        } => cmd_replace(file, search, replacement, all, dry_run, diff, json),
    }
}

/// Helper: Discover all .toml plan files in a plans/ directory next to the
/// current working directory.
fn discover_plan_files() -> Result<Vec<PathBuf>> {
    let plans_dir = env::current_dir()?.join("plans");

    if !plans_dir.exists() {
        anyhow::bail!(
            "No plan specified and no plans/ directory found in {}",
            env::current_dir()?.display()
        );
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(&plans_dir).max_depth(1) {
        let entry = entry?;
        if entry.file_type().is_file()
            && entry.path().extension().and_then(|s| s.to_str()) == Some("toml")
        {
            files.push(entry.path().to_path_buf());
        }
    }

    files.sort();

    if files.is_empty() {
        anyhow::bail!("No .toml plan files found in {}", plans_dir.display());
    }

    Ok(files)
}

/// Helper: Show unified diff between original and final content
fn display_diff(file: &Path, original: &str, modified: &str) {
    println!(
        "\n{}",
        format!("--- {} (original)", file.display()).dimmed()
    );
    println!("{}", format!("+++ {} (edited)", file.display()).dimmed());

    let diff = TextDiff::from_lines(original, modified);

    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => format!("-{}", change).red(),
            ChangeTag::Insert => format!("+{}", change).green(),
            ChangeTag::Equal => format!(" {}", change).normal(),
        };
        print!("{}", sign);
    }
}

fn report_success(target: &Path, result: &SessionResult, dry_run: bool, show_diff: bool) {
    let verb = if dry_run { "Would apply" } else { "Applied" };
    println!(
        "{} {}: {} {} edits, {} occurrences, +{} -{} lines",
        "✓".green(),
        target.display(),
        verb,
        result.outcomes.len(),
        result.total_replaced,
        result.diff_stats.added,
        result.diff_stats.removed,
    );

    if show_diff {
        display_diff(target, &result.original_content, &result.final_content);
    }
}

fn report_failure(target: &Path, error: &EngineError) {
    eprintln!(
        "{} {}: [{}] {}",
        "✗".red(),
        target.display(),
        error.reason_code(),
        error
    );
    if let Some(index) = error.failing_index() {
        eprintln!("  Failing operation index: {}", index);
    }
}

fn run_plan_sessions(
    config: PlanConfig,
    dry_run: bool,
    show_diff: bool,
    reports: &mut Vec<SessionResult>,
) -> (usize, usize) {
    let mut applied = 0;
    let mut failed = 0;

    for definition in config.sessions {
        let target = PathBuf::from(&definition.file);

        let outcome = definition
            .into_session()
            .and_then(|session: EditSession| if dry_run { session.preview() } else { session.run() });

        match outcome {
            Ok(result) => {
                report_success(&target, &result, dry_run, show_diff);
                reports.push(result);
                applied += 1;
            }
            Err(e) => {
                report_failure(&target, &e);
                failed += 1;
            }
        }
    }

    (applied, failed)
}

fn cmd_apply(plan: Option<PathBuf>, dry_run: bool, show_diff: bool, json: bool) -> Result<()> {
    let plan_files = if let Some(path) = plan {
        vec![path]
    } else {
        discover_plan_files()?
    };

    if dry_run && !json {
        println!("{}", "[DRY RUN - no files will be modified]".cyan());
    }

    let mut total_applied = 0;
    let mut total_failed = 0;
    let mut reports = Vec::new();

    for plan_file in plan_files {
        if !json {
            println!("Loading plan from {}...", plan_file.display());
        }

        let config = load_from_path(&plan_file)?;
        let (applied, failed) = run_plan_sessions(config, dry_run, show_diff, &mut reports);
        total_applied += applied;
        total_failed += failed;
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        println!();
        println!("{}", "Summary:".bold());
        println!("  {} applied", format!("{}", total_applied).green());
        println!("  {} failed", format!("{}", total_failed).red());
    }

    if total_failed > 0 {
        std::process::exit(1);
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_replace(
    file: PathBuf,
    search: String,
    replacement: String,
    all: bool,
    dry_run: bool,
    show_diff: bool,
    json: bool,
) -> Result<()> {
    let outcome = EditSession::from_raw(&file, vec![(search, replacement, all)])
        .and_then(|session| if dry_run { session.preview() } else { session.run() });

    match outcome {
        Ok(result) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                report_success(&file, &result, dry_run, show_diff);
            }
            Ok(())
        }
        Err(e) => {
            report_failure(&file, &e);
            std::process::exit(1);
        }
    }
}
