// SPDX-License-Identifier: MPL-2.0
//! Application wiring: settings, data layout, the active list and the
//! navigation engine, driven from the command line.

pub mod cli;
pub mod library;
pub mod paths;
pub mod persisted_state;
pub mod runner;

pub use cli::{Cli, CliCommand, USAGE};
pub use library::ListSelection;
pub use persisted_state::AppState;

use crate::cache::AssetCache;
use crate::catalog::Catalog;
use crate::config::{self, Config};
use crate::error::{Error, Result};
use crate::infrastructure::{BitmapApplier, ImageRsDecoder, ReqwestHttpClient};
use crate::navigation::{NavigationEngine, NavigationSettings};
use paths::DataLayout;
use runner::{Command, RunOptions, Runner};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

/// Navigation engine over the production adapters.
pub type WallpaperEngine = NavigationEngine<ReqwestHttpClient, ImageRsDecoder, BitmapApplier>;

/// Builds the production engine around `catalog`.
pub fn build_engine(
    catalog: Catalog,
    client: Arc<ReqwestHttpClient>,
    config: &Config,
    layout: &DataLayout,
) -> WallpaperEngine {
    let cache = AssetCache::new(
        client,
        layout.thumbnail_cache_dir(),
        layout.wallpaper_cache_dir(),
    );
    let applier = BitmapApplier::new(layout.composed_bitmap(), config.display.apply_command.clone());
    NavigationEngine::new(
        catalog,
        cache,
        Arc::new(ImageRsDecoder),
        Arc::new(applier),
        NavigationSettings::from_config(config),
    )
}

/// Loads settings, falling back to defaults when the file is unusable.
fn load_config() -> Config {
    match config::load() {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(error = %err, "using default settings");
            Config::default()
        }
    }
}

fn is_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

/// Adds `inputs` (files, directories or URLs) to `catalog`. Returns the
/// number of entries created.
///
/// # Errors
///
/// Returns an error if a relative path cannot be made absolute.
pub fn add_inputs(catalog: &mut Catalog, inputs: &[String]) -> Result<usize> {
    let mut added = 0;
    for input in inputs {
        if is_url(input) {
            added += usize::from(catalog.add(input, None, None));
            continue;
        }
        let path = std::path::absolute(Path::new(input))?;
        if path.is_dir() {
            added += catalog.add_directory(&path);
        } else if let Some(source) = path.to_str() {
            if !path.is_file() {
                tracing::warn!(path = %path.display(), "skipping missing file");
                continue;
            }
            added += usize::from(catalog.add_file(source));
        }
    }
    Ok(added)
}

/// Executes a parsed command line, writing user-facing output to `out`.
///
/// # Errors
///
/// Returns an error when the command cannot complete: no data directory,
/// an unsaved list, a failed sync or an unknown entry.
pub async fn run<W: Write>(cli: Cli, out: &mut W) -> Result<()> {
    if cli.command == CliCommand::Help {
        out.write_all(USAGE.as_bytes())?;
        return Ok(());
    }

    let config = load_config();
    let layout = DataLayout::resolve()
        .ok_or_else(|| Error::Config("no data directory available".to_string()))?;
    let list = cli.list.unwrap_or(config.rotation.list);
    tracing::debug!(data_dir = %layout.root().display(), %list, "starting");

    match cli.command {
        CliCommand::Add(inputs) => {
            let mut catalog = library::open_cached(list, &layout);
            let added = add_inputs(&mut catalog, &inputs)?;
            catalog.save()?;
            writeln!(out, "added {added} wallpaper(s) to the {list} list ({} total)", catalog.len())?;
        }
        CliCommand::Remove { source, delete } => {
            let mut catalog = library::open_cached(list, &layout);
            let removed = catalog
                .remove(&source, delete)
                .or_else(|| {
                    let absolute = std::path::absolute(&source).ok()?;
                    catalog.remove(absolute.to_str()?, delete)
                })
                .ok_or_else(|| Error::Resolve(format!("{source}: not in the {list} list")))?;
            catalog.save()?;
            writeln!(out, "removed {}", removed.source())?;
        }
        CliCommand::Clear => {
            let mut catalog = library::open_cached(list, &layout);
            catalog.remove_all();
            catalog.save()?;
            writeln!(out, "cleared the {list} list")?;
        }
        CliCommand::List => {
            let catalog = library::open_cached(list, &layout);
            for entry in catalog.iter() {
                writeln!(out, "{}\t{}", entry.source(), entry.dimensions().unwrap_or("-"))?;
            }
        }
        command @ (CliCommand::Sync | CliCommand::Refresh) => {
            let client = Arc::new(ReqwestHttpClient::new()?);
            let repository = library::repository(client, &config, &layout);
            let catalog = if command == CliCommand::Refresh {
                library::refresh_online(&layout, &repository).await?
            } else {
                library::sync_online(&layout, &repository).await?
            };
            writeln!(out, "online list has {} wallpaper(s)", catalog.len())?;
        }
        command @ (CliCommand::Run
        | CliCommand::Next { .. }
        | CliCommand::Current
        | CliCommand::Apply) => {
            let client = Arc::new(ReqwestHttpClient::new()?);
            let repository = library::repository(Arc::clone(&client), &config, &layout);
            let catalog = library::open(list, &layout, &repository).await;

            let (state, warning) = AppState::load();
            if let Some(warning) = warning {
                tracing::warn!("{warning}");
            }
            let mut engine = build_engine(catalog, client, &config, &layout);
            if let Some(source) = state.current_for(list) {
                engine = engine.with_current(source);
            }

            let mut runner = Runner::new(&engine, list, state, None);
            match command {
                CliCommand::Run => {
                    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
                    runner
                        .run(RunOptions::from_rotation(&config.rotation), stdin, out)
                        .await?;
                }
                CliCommand::Next { apply } => runner.execute(Command::Next { apply }, out).await?,
                CliCommand::Current => runner.execute(Command::Current, out).await?,
                _ => runner.execute(Command::Apply, out).await?,
            }
        }
        CliCommand::Help => {}
    }
    Ok(())
}
