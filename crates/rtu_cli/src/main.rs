//! RetroArch Thumbnail Updater - command-line entry point.
//!
//! Wires the core library into a terminal workflow: load a playlist,
//! scan a thumbnail directory, run a match with a progress bar, then
//! optionally export the matched images and write the playlist back.

use std::io;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use rtu_core::config::{ConfigManager, MatchingSettings, PathSettings};
use rtu_core::export::export_thumbnails;
use rtu_core::logging::{init_tracing, LogLevel};
use rtu_core::matching::{scan_candidates, scan_image_candidates};
use rtu_core::models::{MatchOptions, NormalizeRule};
use rtu_core::orchestrator::MatchOrchestrator;
use rtu_core::playlist::PlaylistStore;

mod cli;

use cli::{Cli, Commands, MatchArgs, ResetArgs, ScanArgs};

fn main() {
    let cli = Cli::parse();

    // Configuration comes up before logging so the configured level
    // applies from the first line.
    let mut config = ConfigManager::new(&cli.config);
    if let Err(e) = config.load_or_create() {
        eprintln!("Warning: Failed to load config: {}. Using defaults.", e);
    }

    let level = if cli.verbose {
        LogLevel::Debug
    } else {
        config.settings().logging.level
    };
    init_tracing(level);

    tracing::info!("RetroArch Thumbnail Updater starting");
    tracing::info!("Config: {}", config.path().display());
    tracing::info!("Core version: {}", rtu_core::version());

    if let Err(err) = run(cli, &mut config) {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

fn run(cli: Cli, config: &mut ConfigManager) -> Result<()> {
    match cli.command {
        Commands::Match(args) => run_match(config, args),
        Commands::Reset(args) => run_reset(config, args),
        Commands::Scan(args) => run_scan(config, args),
    }
}

fn run_match(config: &mut ConfigManager, args: MatchArgs) -> Result<()> {
    let mut store = PlaylistStore::new();
    store
        .load(&args.playlist)
        .with_context(|| format!("failed to load playlist {}", args.playlist.display()))?;
    let entry_count = store.entries().map(|e| e.len()).unwrap_or(0);

    let candidates = scan_candidate_paths(&args.thumbnails)
        .with_context(|| format!("failed to scan {}", args.thumbnails.display()))?;
    println!(
        "{} entries, {} candidate images",
        entry_count,
        candidates.len()
    );

    let options = build_options(&config.settings().matching, &args);

    let orchestrator = MatchOrchestrator::new();
    let handle = orchestrator
        .begin_match(&store, candidates, options)
        .context("failed to start the match run")?;

    let bar = progress_bar(entry_count as u64, "entries matched");
    let entries = handle
        .wait(&mut store, |ratio| {
            bar.set_position((ratio * entry_count as f64).round() as u64);
        })
        .context("match run failed")?;
    bar.finish_and_clear();

    let mut matched = 0usize;
    for entry in &entries {
        match entry.thumbnail.as_ref() {
            Some(thumbnail) => {
                matched += 1;
                println!("  {} -> {}", entry.label, thumbnail.file_name);
            }
            None => println!("  {} -> (no match)", entry.label),
        }
    }
    println!("Matched {} of {} entries", matched, entries.len());

    let destination = export_destination(args.copy_to.as_ref(), &config.settings().paths);
    if let Some(destination) = destination {
        let bar = progress_bar(matched as u64, "thumbnails copied");
        let copied = export_thumbnails(&entries, &destination, || bar.inc(1)).with_context(|| {
            format!("failed to export thumbnails to {}", destination.display())
        })?;
        bar.finish_and_clear();
        println!("Copied {} thumbnails to {}", copied, destination.display());
    }

    if args.save {
        let output = args.output.as_deref().unwrap_or(&args.playlist);
        let title = playlist_title(&store, output);
        store
            .save(Some(output), &title)
            .with_context(|| format!("failed to save playlist {}", output.display()))?;
        println!("Saved playlist to {}", output.display());
    }

    remember_paths(config, Some(&args.playlist), Some(&args.thumbnails));
    Ok(())
}

fn run_reset(config: &mut ConfigManager, args: ResetArgs) -> Result<()> {
    let mut store = PlaylistStore::new();
    // Loading clears every thumbnail reference, so reset is load + save.
    store
        .load(&args.playlist)
        .with_context(|| format!("failed to load playlist {}", args.playlist.display()))?;

    let output = args.output.as_deref().unwrap_or(&args.playlist);
    let title = playlist_title(&store, output);
    store
        .save(Some(output), &title)
        .with_context(|| format!("failed to save playlist {}", output.display()))?;

    let entry_count = store.entries().map(|e| e.len()).unwrap_or(0);
    println!(
        "Cleared thumbnails on {} entries, saved to {}",
        entry_count,
        output.display()
    );

    remember_paths(config, Some(&args.playlist), None);
    Ok(())
}

fn run_scan(config: &mut ConfigManager, args: ScanArgs) -> Result<()> {
    let candidates = if args.all {
        scan_candidates(&args.thumbnails)
    } else {
        scan_image_candidates(&args.thumbnails)
    }
    .with_context(|| format!("failed to scan {}", args.thumbnails.display()))?;

    for name in &candidates {
        println!("{name}");
    }
    eprintln!(
        "{} candidates in {}",
        candidates.len(),
        args.thumbnails.display()
    );

    remember_paths(config, None, Some(&args.thumbnails));
    Ok(())
}

/// Candidate strings for a match run: every image filename in the
/// directory, joined onto it. Full paths make the thumbnail references
/// written into the playlist locate their files from any working
/// directory; the matcher strips the directory before scoring.
fn scan_candidate_paths(dir: &Path) -> io::Result<Vec<String>> {
    let names = scan_image_candidates(dir)?;
    Ok(names
        .into_iter()
        .map(|name| dir.join(name).to_string_lossy().into_owned())
        .collect())
}

/// Destination for `--copy-to`. A bare flag falls back to the
/// configured export folder; an absent flag disables the export.
fn export_destination(choice: Option<&Option<PathBuf>>, paths: &PathSettings) -> Option<PathBuf> {
    choice.map(|explicit| match explicit {
        Some(dir) => dir.clone(),
        None => PathBuf::from(&paths.export_folder),
    })
}

/// Start from the configured matching options and apply command-line
/// overrides on top.
fn build_options(settings: &MatchingSettings, args: &MatchArgs) -> MatchOptions {
    let mut options = settings.to_options();
    if let Some(threshold) = args.threshold {
        options.threshold = threshold;
    }
    if let Some(max_candidates) = args.max_candidates {
        options.max_candidates_per_entry = max_candidates;
    }
    if args.strip_region_tags && !options.normalize.contains(&NormalizeRule::StripRegionTags) {
        options.normalize.push(NormalizeRule::StripRegionTags);
    }
    if args.keep_region_tags {
        options
            .normalize
            .retain(|rule| *rule != NormalizeRule::StripRegionTags);
    }
    options
}

/// Title for a saved document: the loaded playlist name when present,
/// otherwise the output file stem.
fn playlist_title(store: &PlaylistStore, output: &Path) -> String {
    if let Some(name) = store.document().map(|d| d.name.as_str()) {
        if !name.is_empty() {
            return name.to_string();
        }
    }
    output
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "playlist".to_string())
}

/// Persist last-used paths for the next run. Best-effort: failures are
/// logged and never fail the command.
fn remember_paths(config: &mut ConfigManager, playlist: Option<&Path>, thumbnails: Option<&Path>) {
    let paths = &mut config.settings_mut().paths;
    if let Some(playlist) = playlist {
        paths.last_playlist_path = playlist.to_string_lossy().into_owned();
    }
    if let Some(thumbnails) = thumbnails {
        paths.last_thumbnails_path = thumbnails.to_string_lossy().into_owned();
    }
    if let Err(e) = config.save() {
        tracing::warn!("Failed to persist last-used paths: {}", e);
    }
}

fn progress_bar(len: u64, message: &str) -> ProgressBar {
    let bar = ProgressBar::new(len);
    bar.set_style(
        ProgressStyle::with_template(
            "{spinner:.cyan} [{elapsed_precise}] {bar:30} {pos}/{len} {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    bar.set_draw_target(ProgressDrawTarget::stderr_with_hz(12));
    bar.enable_steady_tick(Duration::from_millis(120));
    bar.set_message(message.to_string());
    bar
}
