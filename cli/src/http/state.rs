//! HTTP server shared state

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Local};
use vintner_core::api::{AppConfig, TaskCoordinator};

/// Shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub coordinator: TaskCoordinator,
    pub config: Arc<AppConfig>,
    pub upload_dir: Arc<PathBuf>,
    pub stats: Arc<RwLock<ServerStats>>,
}

impl AppState {
    pub fn new(coordinator: TaskCoordinator, config: AppConfig) -> Self {
        let upload_dir = PathBuf::from(&config.app.upload_dir);
        Self {
            coordinator,
            config: Arc::new(config),
            upload_dir: Arc::new(upload_dir),
            stats: Arc::new(RwLock::new(ServerStats::new())),
        }
    }

    pub fn record_request(&self, endpoint: &str) {
        let mut stats = self.stats.write().unwrap_or_else(PoisonError::into_inner);
        stats.increment_request(endpoint);
    }

    pub fn record_error(&self) {
        let mut stats = self.stats.write().unwrap_or_else(PoisonError::into_inner);
        stats.increment_error();
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        let stats = self.stats.read().unwrap_or_else(PoisonError::into_inner);
        StatsSnapshot {
            uptime_seconds: stats.uptime_seconds(),
            requests_total: stats.requests_total,
            requests_by_endpoint: stats.requests_by_endpoint.clone(),
            errors_total: stats.errors_total,
        }
    }
}

/// Point-in-time copy of the counters, taken under the read lock.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsSnapshot {
    pub uptime_seconds: f64,
    pub requests_total: u64,
    pub requests_by_endpoint: BTreeMap<String, u64>,
    pub errors_total: u64,
}

/// Request counters
pub struct ServerStats {
    pub requests_total: u64,
    pub requests_by_endpoint: BTreeMap<String, u64>,
    pub errors_total: u64,
    pub start_time: DateTime<Local>,
}

impl ServerStats {
    pub fn new() -> Self {
        Self {
            requests_total: 0,
            requests_by_endpoint: BTreeMap::new(),
            errors_total: 0,
            start_time: Local::now(),
        }
    }

    pub fn increment_request(&mut self, endpoint: &str) {
        self.requests_total += 1;
        *self
            .requests_by_endpoint
            .entry(endpoint.to_string())
            .or_insert(0) += 1;
    }

    pub fn increment_error(&mut self) {
        self.errors_total += 1;
    }

    pub fn uptime_seconds(&self) -> f64 {
        let now = Local::now();
        (now - self.start_time).num_milliseconds() as f64 / 1000.0
    }
}

impl Default for ServerStats {
    fn default() -> Self {
        Self::new()
    }
}
