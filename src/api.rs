use std::sync::{Arc, RwLock};

use shuttle_axum::axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::client::HttpSpamClient;
use crate::config::ShieldConfig;
use crate::engine::{RequestMeta, SpamShield};
use crate::log::{ClearToken, LogEntry, LogFilter, LogStats};
use crate::verdict::{CheckKind, CheckResult};

// Simple shared app state used by Axum.
#[derive(Clone)]
pub struct AppState {
    pub shield: Arc<SpamShield>,
    pub config: Arc<RwLock<ShieldConfig>>,
}

impl AppState {
    pub fn new(shield: Arc<SpamShield>, config: ShieldConfig) -> Self {
        Self {
            shield,
            config: Arc::new(RwLock::new(config)),
        }
    }

    /// Per-request snapshot; components never read config through globals.
    fn config_snapshot(&self) -> ShieldConfig {
        self.config.read().expect("config rwlock poisoned").clone()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/check", post(check))
        .route("/logs", get(logs))
        .route("/stats", get(stats))
        .route("/admin/clear-token", get(clear_token))
        .route("/admin/clear-logs", post(clear_logs))
        .route("/admin/reload-config", get(reload_config))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

fn default_kind() -> CheckKind {
    CheckKind::Email
}

#[derive(serde::Deserialize)]
struct CheckReq {
    content: String,
    #[serde(default = "default_kind")]
    kind: CheckKind,
}

/// Manual check endpoint; doubles as the operator's connection test against
/// the configured classifier.
async fn check(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CheckReq>,
) -> Json<CheckResult> {
    let config = state.config_snapshot();
    let meta = meta_from_headers(&headers);
    let result = state
        .shield
        .check(&config, &body.content, body.kind, &meta)
        .await;
    Json(result)
}

fn default_page() -> usize {
    1
}
fn default_per_page() -> usize {
    20
}

#[derive(serde::Deserialize)]
struct LogsQuery {
    #[serde(default)]
    filter: LogFilter,
    #[serde(default = "default_page")]
    page: usize,
    #[serde(default = "default_per_page")]
    per_page: usize,
}

#[derive(serde::Serialize)]
struct LogsPage {
    entries: Vec<LogEntry>,
    total: usize,
    page: usize,
    per_page: usize,
}

async fn logs(State(state): State<AppState>, Query(q): Query<LogsQuery>) -> Json<LogsPage> {
    let page = q.page.max(1);
    let (entries, total) = state.shield.log().query(q.filter, page, q.per_page);
    Json(LogsPage {
        entries,
        total,
        page,
        per_page: q.per_page,
    })
}

async fn stats(State(state): State<AppState>) -> Json<LogStats> {
    Json(state.shield.log().stats())
}

#[derive(serde::Serialize)]
struct TokenResp {
    token: ClearToken,
}

/// Step one of the destructive clear: fetch a one-time confirmation token.
async fn clear_token(State(state): State<AppState>) -> Json<TokenResp> {
    Json(TokenResp {
        token: state.shield.log().issue_clear_token(),
    })
}

#[derive(serde::Deserialize)]
struct ClearReq {
    token: ClearToken,
}

#[derive(serde::Serialize)]
struct ClearResp {
    cleared: usize,
}

async fn clear_logs(
    State(state): State<AppState>,
    Json(body): Json<ClearReq>,
) -> Result<Json<ClearResp>, (StatusCode, &'static str)> {
    match state.shield.log().clear(body.token) {
        Some(cleared) => {
            info!(target: "spam_shield", cleared, "check log cleared");
            Ok(Json(ClearResp { cleared }))
        }
        None => Err((StatusCode::FORBIDDEN, "invalid or expired clear token")),
    }
}

async fn reload_config(State(state): State<AppState>) -> String {
    let fresh = match ShieldConfig::load_default() {
        Ok(cfg) => cfg,
        Err(e) => return format!("failed: {e}"),
    };
    let client = match HttpSpamClient::new(&fresh) {
        Ok(c) => c,
        Err(e) => return format!("failed: {e}"),
    };
    state.shield.set_client(Arc::new(client));
    match state.config.write() {
        Ok(mut cfg) => {
            *cfg = fresh;
            "reloaded".to_string()
        }
        Err(_) => "failed: lock poisoned".to_string(),
    }
}

/// Best-effort client metadata: explicit client-ip header first, then the
/// first hop of x-forwarded-for; empty when neither is present.
fn meta_from_headers(headers: &HeaderMap) -> RequestMeta {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    };

    let mut ip = header("client-ip");
    if ip.is_empty() {
        ip = header("x-forwarded-for")
            .split(',')
            .next()
            .unwrap_or_default()
            .trim()
            .to_string();
    }

    RequestMeta {
        ip_address: ip,
        user_agent: header("user-agent"),
    }
}
