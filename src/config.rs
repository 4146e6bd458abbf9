// src/config.rs
//! Shield configuration: the knobs the original deployment exposed, loaded
//! from TOML with env overrides. Components never read ambient globals; the
//! caller takes a snapshot per incoming submission and passes it down.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::{env, fs};

use anyhow::Context;

use crate::policy::clamp01;

// --- env defaults & names ---
pub const DEFAULT_CONFIG_PATH: &str = "config/spam-shield.toml";
pub const DEFAULT_API_URL: &str = "https://ai-spam-shield.scorepixel.com/check-spam";
pub const DEFAULT_THRESHOLD: f32 = 0.6;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

pub const ENV_CONFIG_PATH: &str = "SPAM_SHIELD_CONFIG_PATH";
pub const ENV_API_KEY: &str = "SPAM_SHIELD_API_KEY";
pub const ENV_THRESHOLD: &str = "SPAM_SHIELD_THRESHOLD";

fn default_true() -> bool {
    true
}
fn default_threshold() -> f32 {
    DEFAULT_THRESHOLD
}
fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShieldConfig {
    /// Master switch; when off, the adapter registry activates nothing.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Confidence threshold in `<0.0, 1.0>`; content at or above it is spam.
    #[serde(default = "default_threshold")]
    pub threshold: f32,
    #[serde(default = "default_true")]
    pub check_comments: bool,
    #[serde(default = "default_true")]
    pub check_contact_forms: bool,
    /// Persist successful checks to the check log.
    #[serde(default = "default_true")]
    pub log_enabled: bool,
    /// Single bounded timeout per classifier call; no retry, no backoff.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Full endpoint URL of the remote classifier (`.../check-spam`).
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Bearer credential; empty means no Authorization header.
    /// "ENV" means: read from SPAM_SHIELD_API_KEY.
    #[serde(default)]
    pub api_key: String,
    /// Sent as `X-Origin-Domain` so the classifier knows the calling site.
    #[serde(default)]
    pub origin_domain: String,
}

impl Default for ShieldConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: DEFAULT_THRESHOLD,
            check_comments: true,
            check_contact_forms: true,
            log_enabled: true,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            api_url: default_api_url(),
            api_key: String::new(),
            origin_domain: String::new(),
        }
    }
}

impl ShieldConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let data = fs::read_to_string(path.as_ref())
            .with_context(|| format!("reading shield config from {}", path.as_ref().display()))?;
        Self::from_toml_str(&data)
    }

    pub fn from_toml_str(toml_str: &str) -> anyhow::Result<Self> {
        let mut cfg: ShieldConfig = toml::from_str(toml_str).context("parsing shield config")?;
        cfg.sanitize()?;
        Ok(cfg)
    }

    /// Load using env var + fallbacks:
    /// 1) $SPAM_SHIELD_CONFIG_PATH (must exist when set)
    /// 2) config/spam-shield.toml
    /// 3) built-in defaults
    pub fn load_default() -> anyhow::Result<Self> {
        if let Ok(p) = env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                anyhow::bail!("{ENV_CONFIG_PATH} points to non-existent path");
            }
            return Self::load_from_file(&pb);
        }
        let default_p = PathBuf::from(DEFAULT_CONFIG_PATH);
        if default_p.exists() {
            return Self::load_from_file(&default_p);
        }
        let mut cfg = Self::default();
        cfg.sanitize()?;
        Ok(cfg)
    }

    fn sanitize(&mut self) -> anyhow::Result<()> {
        // Resolve api key if "ENV"
        if self.api_key.trim().eq_ignore_ascii_case("env") {
            self.api_key = env::var(ENV_API_KEY)
                .map_err(|_| anyhow::anyhow!("Missing {ENV_API_KEY} env var"))?;
        }

        // Env override wins over file value; invalid values are ignored.
        if let Some(t) = parse_threshold_env(env::var(ENV_THRESHOLD).ok()) {
            self.threshold = t;
        }

        // Sanitize ranges
        if !(0.0..=1.0).contains(&self.threshold) {
            self.threshold = clamp01(self.threshold);
        }
        if self.timeout_secs == 0 {
            self.timeout_secs = DEFAULT_TIMEOUT_SECS;
        }
        if self.api_url.trim().is_empty() {
            self.api_url = default_api_url();
        }
        Ok(())
    }
}

// parse optional float env and clamp to <0.0..=1.0>
fn parse_threshold_env(raw: Option<String>) -> Option<f32> {
    raw.and_then(|s| s.trim().parse::<f32>().ok())
        .map(clamp01)
}
