use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{EnpaError, Result};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled key: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_opt<F>(lookup: &F, profile: &str, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = lookup(&prefixed).filter(|s| !s.is_empty()) {
            return Some(v);
        }
    }
    lookup(key).filter(|s| !s.is_empty())
}

/// Parse a profiled key. Absent is `Ok(None)`; present but unparsable is an error.
fn profiled_parse<F, T>(lookup: &F, profile: &str, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match profiled_opt(lookup, profile, key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| EnpaError::InvalidOption {
                key: key.to_string(),
                value: raw.clone(),
                reason: e.to_string(),
            }),
    }
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub window: WindowOptions,
    pub workers: WorkerOptions,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `ENPA_PROFILE`. When set (e.g. `PROD`), every key
    /// is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Result<Self> {
        let profile = env_or("ENPA_PROFILE", "");
        Self::from_lookup(&profile, env_opt)
    }

    /// Build config for a named profile from an arbitrary key lookup.
    pub fn from_lookup<F>(profile: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Ok(Self {
            profile: p.to_string(),
            window: WindowOptions::from_lookup(&lookup, p)?,
            workers: WorkerOptions::from_lookup(&lookup, p)?,
        })
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!(
            "  window:      start_time={}, duration={}",
            display_opt(self.window.start_time),
            display_opt(self.window.duration)
        );
        tracing::info!(
            "  workers:     threads={}",
            self.workers.resolved_worker_threads()
        );
    }
}

fn display_opt(v: Option<i64>) -> String {
    v.map(|v| v.to_string()).unwrap_or_else(|| "(unset)".to_string())
}

// ── Window ────────────────────────────────────────────────────

/// Raw window options as supplied to the run. Both fields are seconds.
///
/// Nothing is validated here; the filter validates once at construction so a
/// misconfigured run fails before it sees any record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowOptions {
    pub start_time: Option<i64>,
    pub duration: Option<i64>,
}

impl WindowOptions {
    pub fn new(start_time: i64, duration: i64) -> Self {
        Self {
            start_time: Some(start_time),
            duration: Some(duration),
        }
    }

    fn from_lookup<F>(lookup: &F, p: &str) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            start_time: profiled_parse(lookup, p, "PIPELINE_START_TIME")?,
            duration: profiled_parse(lookup, p, "PIPELINE_DURATION")?,
        })
    }
}

// ── Workers ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerOptions {
    /// 0 = use available parallelism.
    pub worker_threads: usize,
}

impl WorkerOptions {
    fn from_lookup<F>(lookup: &F, p: &str) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            worker_threads: profiled_parse(lookup, p, "PIPELINE_WORKERS")?.unwrap_or(0),
        })
    }

    /// Resolve worker thread count (0 means use available parallelism).
    pub fn resolved_worker_threads(&self) -> usize {
        if self.worker_threads == 0 {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4)
        } else {
            self.worker_threads
        }
    }
}
