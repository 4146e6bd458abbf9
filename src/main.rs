//! AI Spam Shield — Binary Entrypoint
//! Boots the Axum HTTP server, wiring the check pipeline, shared state, and
//! the Prometheus exporter.

use std::sync::Arc;

use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ai_spam_shield::api::{self, AppState};
use ai_spam_shield::client::HttpSpamClient;
use ai_spam_shield::config::ShieldConfig;
use ai_spam_shield::engine::SpamShield;
use ai_spam_shield::log::CheckLog;
use ai_spam_shield::metrics::Metrics;

/// Enable compact tracing logs in development only.
/// Activation requires BOTH:
///   - dev environment (debug build OR SHUTTLE_ENV in {local, development, dev})
///   - SPAM_SHIELD_DEV_LOG=1
fn enable_dev_tracing() {
    let dev_flag = std::env::var("SPAM_SHIELD_DEV_LOG")
        .ok()
        .is_some_and(|v| v == "1");

    let is_dev_env = cfg!(debug_assertions)
        || matches!(
            std::env::var("SHUTTLE_ENV")
                .unwrap_or_default()
                .to_ascii_lowercase()
                .as_str(),
            "local" | "development" | "dev"
        );

    if !(dev_flag && is_dev_env) {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("spam_shield=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    // This enables SPAM_SHIELD_CONFIG_PATH / SPAM_SHIELD_API_KEY overrides.
    let _ = dotenvy::dotenv();

    // Initialize dev tracing early (no-op in production).
    enable_dev_tracing();

    let config = ShieldConfig::load_default().expect("Failed to load shield config");
    let metrics = Metrics::init(config.threshold);

    let client = HttpSpamClient::new(&config).expect("Failed to build classifier client");
    let shield = Arc::new(SpamShield::new(Arc::new(client), Arc::new(CheckLog::new())));

    let state = AppState::new(shield, config);
    let router = api::router(state).merge(metrics.router());

    Ok(router.into())
}
