//! `racedocs`: scrape, cache and serve per-event regulatory documents.

use clap::{ArgAction, Args, Parser, Subcommand};
use racedocs_cache::CacheStore;
use racedocs_config::{EventCatalog, Settings, validate_url};
use racedocs_library::{Downloader, HttpClient, Regenerator, SeasonSource, discover_events, update_catalog};
use racedocs_render::Pages;
use racedocs_server::{AppState, api, pwa, serve, spawn_schedule};
use racedocs_storage::BackendHandle;
use racedocs_storage::backend::{LocalBackend, ReadOnlyBackend};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Debug, Parser)]
#[command(name = "racedocs", version, about)]
struct Cli {
    /// Settings file (toml, yaml or json)
    #[arg(short, long, global = true, env = "RACEDOCS_CONFIG")]
    config: Option<PathBuf>,
    /// More logging; repeat for more (overridden by RUST_LOG)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    /// Don't write the cache, downloads or the event catalog
    #[arg(long, global = true)]
    dry_run: bool,
    /// Log JSON lines instead of text
    #[arg(long, global = true)]
    log_json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, PartialEq, Eq, Subcommand)]
enum Command {
    /// Serve the JSON API
    Api,
    /// Serve the web app
    Pwa,
    /// Regenerate the cache once
    Regen,
    /// Find this season's events and add them to the event catalog
    Discover(DiscoverArgs),
}

#[derive(Debug, PartialEq, Eq, Args)]
struct DiscoverArgs {
    /// Read the season page from a saved HTML file
    #[arg(long, value_name = "FILE")]
    test: Option<PathBuf>,
    /// Rewrite the catalog even when no new events were found
    #[arg(long)]
    force: bool,
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);
    let settings = Settings::load(cli.config.as_deref()).map_err(report)?;
    tracing::debug!(data_dir = %settings.data_dir.display(), catalog = %settings.catalog.display(), "Settings loaded");
    match &cli.command {
        Command::Api => run_api(&settings, cli.dry_run).await,
        Command::Pwa => run_pwa(&settings, cli.dry_run).await,
        Command::Regen => {
            let (regenerator, _) = pipeline(&settings, cli.dry_run)?;
            let count = regenerator.run().await.len();
            tracing::info!(count, "Regeneration complete");
            Ok(())
        },
        Command::Discover(args) => run_discover(&settings, args, cli.dry_run).await,
    }
}

fn init_tracing(verbose: u8, json: bool) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().with_target(verbose >= 2)).init();
    }
}

/// Flatten an error tree into a diagnostic for the terminal.
fn report<E>(err: exn::Exn<E>) -> miette::Report
where
    E: std::error::Error + Send + Sync + 'static,
{
    miette::miette!("{err:?}")
}

fn local_backend(name: &str, root: &Path, dry_run: bool) -> miette::Result<BackendHandle> {
    let local: BackendHandle = Arc::new(LocalBackend::new(name, root).map_err(report)?);
    Ok(match dry_run {
        true => Arc::new(ReadOnlyBackend::new(local)),
        false => local,
    })
}

/// The regenerator and the backend holding downloaded documents.
fn pipeline(settings: &Settings, dry_run: bool) -> miette::Result<(Arc<Regenerator>, BackendHandle)> {
    let root = settings.data_root().map_err(report)?;
    let data = local_backend("data", &root, dry_run)?;
    let files = local_backend("documents", &root.join(&settings.fetch.download_dir), dry_run)?;
    let client = HttpClient::new(&settings.fetch).map_err(report)?;
    let cache = CacheStore::new(data, &settings.cache_file);
    let mut regenerator = Regenerator::new(client.clone(), &settings.catalog, cache)
        .with_event_delay(settings.fetch.event_delay());
    match (settings.fetch.download, dry_run) {
        (true, false) => {
            let downloader = Downloader::new(client, files.clone()).with_delay(settings.fetch.download_delay());
            regenerator = regenerator.with_downloader(downloader);
        },
        (true, true) => tracing::warn!("Dry run: documents will not be downloaded"),
        (false, _) => {},
    }
    Ok((Arc::new(regenerator), files))
}

fn app_state(settings: &Settings, dry_run: bool) -> miette::Result<AppState> {
    let (regenerator, files) = pipeline(settings, dry_run)?;
    let pages = Pages::new().map_err(report)?;
    Ok(AppState::new(regenerator, pages)
        .with_files(files)
        .with_cache_token(settings.cache_token.clone()))
}

async fn run_api(settings: &Settings, dry_run: bool) -> miette::Result<()> {
    let state = app_state(settings, dry_run)?;
    let schedule = settings
        .schedule_secs
        .map(|secs| spawn_schedule(state.clone(), Duration::from_secs(secs)));
    let router = api::router(state, settings.api.request_timeout());
    let result = serve(&settings.api.address(), router, shutdown_signal()).await;
    if let Some(schedule) = schedule {
        schedule.abort();
    }
    result.map_err(report)
}

async fn run_pwa(settings: &Settings, dry_run: bool) -> miette::Result<()> {
    let state = app_state(settings, dry_run)?;
    let router = pwa::router(state, settings.pwa.request_timeout());
    serve(&settings.pwa.address(), router, shutdown_signal()).await.map_err(report)
}

async fn run_discover(settings: &Settings, args: &DiscoverArgs, dry_run: bool) -> miette::Result<()> {
    let client = HttpClient::new(&settings.fetch).map_err(report)?;
    let season_url = validate_url("fetch.season_url", &settings.fetch.season_url).map_err(report)?;
    let source = match &args.test {
        Some(path) => SeasonSource::File(path),
        None => SeasonSource::Remote,
    };
    let events = discover_events(&client, &season_url, source).await.map_err(report)?;
    for event in &events {
        tracing::info!("Found {event}");
    }
    if dry_run {
        let catalog = EventCatalog::load(&settings.catalog).map_err(report)?;
        let new = events.iter().filter(|event| !catalog.event_ids.contains(&event.id)).count();
        tracing::info!(new, "Dry run: catalog not updated");
        return Ok(());
    }
    let update = update_catalog(&settings.catalog, &events, args.force).map_err(report)?;
    tracing::info!(added = update.added.len(), total = update.total, saved = update.saved, "Catalog updated");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Unable to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
            },
            Err(e) => {
                tracing::error!(error = %e, "Unable to listen for SIGTERM");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutting down");
}
