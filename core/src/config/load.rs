use std::path::{Path, PathBuf};

use super::types::AppConfig;

/// Get the default vintner data directory: ~/.vintner
pub fn get_vintner_data_dir() -> anyhow::Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Cannot determine home directory"))?;
    Ok(home.join(".vintner"))
}

pub fn load_default() -> anyhow::Result<AppConfig> {
    load_from(None)
}

/// Resolve the configuration, honouring an explicit path first.
pub fn load_from(explicit: Option<&Path>) -> anyhow::Result<AppConfig> {
    let mut cfg = match explicit {
        Some(path) => read_config(path)?,
        None => {
            // Priority 1: ~/.vintner/config.toml
            let user_config = get_vintner_data_dir()
                .ok()
                .map(|dir| dir.join("config.toml"))
                .filter(|p| p.exists());

            // Priority 2: ./config.toml (current directory)
            let local_config = Path::new("config.toml");

            if let Some(path) = user_config {
                read_config(&path)?
            } else if local_config.exists() {
                read_config(local_config)?
            } else {
                AppConfig::default()
            }
        }
    };

    apply_env_overrides(&mut cfg);
    cfg.validate().map_err(|e| anyhow::anyhow!(e))?;
    Ok(cfg)
}

fn read_config(path: &Path) -> anyhow::Result<AppConfig> {
    let s = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    let cfg = toml::from_str::<AppConfig>(&s)
        .map_err(|e| anyhow::anyhow!("failed to parse {}: {e}", path.display()))?;
    Ok(cfg)
}

/// Environment variable overrides (highest priority).
fn apply_env_overrides(cfg: &mut AppConfig) {
    if let Some(v) = non_empty_env("VINTNER_STORAGE_URL") {
        cfg.storage.base_url = v;
    }
    if let Some(v) = non_empty_env("VINTNER_STORAGE_SAS_TOKEN") {
        cfg.storage.sas_token = v;
    }
    if let Some(v) = non_empty_env("VINTNER_MAX_WORKERS") {
        match v.parse::<usize>() {
            Ok(n) => cfg.worker.max_workers = n,
            Err(_) => tracing::warn!("ignoring VINTNER_MAX_WORKERS={v}: not a number"),
        }
    }
    if let Some(v) = non_empty_env("VINTNER_LOG_DIR") {
        cfg.logging.directory = Some(v);
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
