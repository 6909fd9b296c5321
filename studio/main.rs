/// leafscan screen
///
/// The single-screen leaf classifier, served to a browser by a synchronous
/// tiny_http server. Open it on a phone to use the camera directly.
///
/// Run with:
///   cargo run --bin studio --release
/// Then open http://127.0.0.1:7878
///
/// The model is read once at startup from `model_path` in `leafscan.json`
/// (or `LEAFSCAN_MODEL`). `leafscan init-model` writes an untrained one.

mod state;
mod render;
mod routes;
mod handlers;
mod util;

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use tiny_http::Server;

use leafscan::{AppConfig, Classifier};
use state::AppState;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env().context("failed to load configuration")?;
    let classifier = Classifier::load(&config.model_path, &config)
        .with_context(|| format!("failed to load model {}", config.model_path.display()))?;

    let server = Server::http(config.bind_addr.as_str())
        .map_err(|e| anyhow!("failed to bind {}: {}", config.bind_addr, e))?;

    let shared_state = Arc::new(AppState::new(classifier, config.max_upload_bytes));

    log::info!("leafscan screen listening on http://{}", config.bind_addr);

    // One thread per request; classification is synchronous within it.
    for request in server.incoming_requests() {
        let state_clone = shared_state.clone();
        std::thread::spawn(move || {
            routes::dispatch(request, state_clone);
        });
    }
    Ok(())
}
