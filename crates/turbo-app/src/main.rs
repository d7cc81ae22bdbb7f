mod app;
mod cli;
mod pages;

use std::path::Path;

use tracing_subscriber::EnvFilter;
use turbo_config::TurboConfig;
use url::Url;
use winit::event_loop::EventLoop;

fn main() {
    let args = cli::parse();

    // Config comes first: it carries the default log level.
    let loaded = match &args.config {
        Some(path) => turbo_config::load_config_from(Path::new(path)),
        None => turbo_config::load_config(),
    };
    let (config, config_error) = match loaded {
        Ok(config) => (config, None),
        Err(e) => (TurboConfig::default(), Some(e)),
    };

    let log_directive = args
        .log_level
        .clone()
        .unwrap_or_else(|| format!("turbo={}", config.logging.level.as_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                log_directive
                    .parse()
                    .unwrap_or_else(|_| "turbo=info".parse().unwrap()),
            ),
        )
        .init();

    tracing::info!("Turbo v{} starting...", env!("CARGO_PKG_VERSION"));

    if let Some(path) = &args.config {
        tracing::info!("Using config override: {path}");
    }
    if let Some(e) = config_error {
        tracing::warn!("Config load failed, using defaults: {e}");
    }

    let location = args
        .url
        .as_deref()
        .unwrap_or(&config.session.start_location)
        .to_string();
    let start_location = match Url::parse(&location) {
        Ok(url) => url,
        Err(e) => {
            tracing::error!("Invalid start location {location:?}: {e}");
            std::process::exit(2);
        }
    };
    tracing::info!("Start location: {start_location}");

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            tracing::error!("Failed to create event loop: {e}");
            std::process::exit(1);
        }
    };
    let mut app = app::TurboApp::new(config, start_location);

    tracing::info!("Entering event loop");
    if let Err(e) = event_loop.run_app(&mut app) {
        tracing::error!("Event loop error: {e}");
    }
    tracing::info!("Shutdown complete");
}
