//! # placard
//!
//! Command-line front end for checking a placeholder configuration before it
//! ships: validate it, resolve a single context, or replay a composer session.

#![deny(unsafe_code)]

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use placard_composer::{ComposerEvent, ComposerTracker, PlaceholderUpdate};
use placard_core::{CategoryId, CategoryRecord, CategoryTree, ComposerContext, ComposerMode};
use placard_settings::{ConfigurationSet, ConfigurationStore, LoadedConfiguration, load_from_path};
use tracing::warn;

/// Composer placeholder configuration tool.
#[derive(Parser, Debug)]
#[command(name = "placard", about = "Composer placeholder configuration tool")]
struct Cli {
    /// Minimum log level (`RUST_LOG` takes precedence).
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a settings file and print what was dropped.
    Check {
        /// Theme settings JSON file.
        #[arg(long)]
        settings: PathBuf,
    },
    /// Resolve the placeholder for one composer context.
    Resolve {
        /// Theme settings JSON file.
        #[arg(long)]
        settings: PathBuf,
        /// Category list JSON file (`[{"id": 1, "parent_category_id": null}, ...]`).
        #[arg(long)]
        categories: Option<PathBuf>,
        /// Category the composer targets. Omit for unscoped composition.
        #[arg(long)]
        category: Option<u64>,
        /// Composer mode.
        #[arg(long, value_enum, default_value_t = ModeArg::Topic)]
        mode: ModeArg,
        /// Print the matched rule and candidate chain as JSON.
        #[arg(long)]
        explain: bool,
    },
    /// Replay a JSON array of composer events and print each published placeholder.
    Replay {
        /// Theme settings JSON file.
        #[arg(long)]
        settings: PathBuf,
        /// Category list JSON file.
        #[arg(long)]
        categories: Option<PathBuf>,
        /// Events JSON file.
        #[arg(long)]
        events: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    /// New topic.
    #[value(alias = "new_topic")]
    Topic,
    /// Reply.
    Reply,
}

impl From<ModeArg> for ComposerMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Topic => Self::NewTopic,
            ModeArg::Reply => Self::Reply,
        }
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    if cli.log_json {
        placard_core::logging::init_json_subscriber(&cli.log_level);
    } else {
        placard_core::logging::init_subscriber(&cli.log_level);
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match cli.command {
        Command::Check { settings } => run_check(&settings, &mut out),
        Command::Resolve {
            settings,
            categories,
            category,
            mode,
            explain,
        } => {
            let context = ComposerContext {
                category_id: category.map(CategoryId::new),
                mode: mode.into(),
            };
            let config = load_or_no_overrides(&settings);
            let tree = load_categories(categories.as_deref())?;
            run_resolve(&context, &config.set, &tree, explain, &mut out)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Replay {
            settings,
            categories,
            events,
        } => {
            let config = load_or_no_overrides(&settings);
            let tree = load_categories(categories.as_deref())?;
            let events = load_events(&events)?;
            run_replay(config.set, &tree, &events, &mut out)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Load settings, treating a structurally invalid file as "no overrides".
fn load_or_no_overrides(path: &Path) -> LoadedConfiguration {
    load_from_path(path).unwrap_or_else(|e| {
        warn!(path = %path.display(), error = %e, "settings rejected, resolving without overrides");
        LoadedConfiguration::default()
    })
}

fn load_categories(path: Option<&Path>) -> Result<CategoryTree> {
    let Some(path) = path else {
        return Ok(CategoryTree::new());
    };
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read categories file: {}", path.display()))?;
    let records: Vec<CategoryRecord> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse categories file: {}", path.display()))?;
    Ok(CategoryTree::from_records(records))
}

fn load_events(path: &Path) -> Result<Vec<ComposerEvent>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read events file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse events file: {}", path.display()))
}

fn run_check(path: &Path, out: &mut impl Write) -> Result<ExitCode> {
    let loaded = match load_from_path(path) {
        Ok(loaded) => loaded,
        Err(e) => {
            writeln!(out, "invalid: {e}")?;
            return Ok(ExitCode::FAILURE);
        }
    };

    let report = &loaded.report;
    writeln!(
        out,
        "rules: {} accepted, {} rejected; categories: {}; inherit: {}",
        report.accepted,
        report.rejected.len(),
        loaded.set.category_count(),
        loaded.set.inherit_from_parent()
    )?;
    for rejection in &report.rejected {
        writeln!(out, "  entry {}: {}", rejection.index, rejection.reason)?;
    }
    Ok(ExitCode::SUCCESS)
}

fn run_resolve(
    context: &ComposerContext,
    config: &ConfigurationSet,
    tree: &CategoryTree,
    explain: bool,
    out: &mut impl Write,
) -> Result<()> {
    let resolution = placard_resolve::resolve_detailed(context, config, tree);
    if explain {
        serde_json::to_writer_pretty(&mut *out, &resolution)?;
        writeln!(out)?;
    } else {
        writeln!(out, "{}", resolution.placeholder)?;
    }
    Ok(())
}

fn run_replay(
    config: ConfigurationSet,
    tree: &CategoryTree,
    events: &[ComposerEvent],
    out: &mut impl Write,
) -> Result<()> {
    let tracker = ComposerTracker::new(Arc::new(ConfigurationStore::new(config)));
    for event in events {
        if let Some(update) = tracker.handle(*event, tree) {
            writeln!(out, "{}", format_update(&update))?;
        }
    }
    Ok(())
}

fn format_update(update: &PlaceholderUpdate) -> String {
    let category = update
        .context
        .category_id
        .map_or_else(|| "-".to_owned(), |c| c.to_string());
    let text = if update.placeholder.is_override() {
        update.placeholder.as_str()
    } else {
        "<default>"
    };
    format!(
        "{}\t{}\t{}\t{}",
        update.version, category, update.context.mode, text
    )
}
