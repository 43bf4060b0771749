//! Binary entry point: start logging, read the config, kick off the seed load
//! in the background, then hand the store to the TUI until the user quits.
use std::env;

use player_roster::config::{self, Config};
use player_roster::export::SystemExporter;
use player_roster::seed::{spawn_seed_load, HttpSeedSource};
use player_roster::{logging, run_app, App, RecordStore};
use tracing::{info, warn};

fn main() -> anyhow::Result<()> {
    // Logging goes first so config warnings end up in the log file. The app
    // is still usable without one.
    match config::data_dir().and_then(|dir| logging::init(&dir)) {
        Ok(path) => info!(path = %path.display(), "logging started"),
        Err(err) => eprintln!("logging disabled: {err:#}"),
    }

    let config = Config::load()?;

    let source = HttpSeedSource::new(config.seed_url.clone(), config.http_timeout());
    info!(url = source.url(), "starting seed load");
    let seed = spawn_seed_load(source);

    let export_dir = config.export_dir();
    if !export_dir.exists() {
        warn!(dir = %export_dir.display(), "export directory will be created on first export");
    }
    let exporter = SystemExporter::new(export_dir, env::temp_dir(), config.logo_url.clone());

    let mut app = App::new(RecordStore::new(), Box::new(exporter), Some(seed));
    run_app(&mut app)
}
