use std::{collections::HashMap, fs, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::utils;

/// Runtime configuration. Every tunable the reconciler or renderer uses
/// lives here rather than as an inline literal; a partial config file
/// only overrides the fields it names.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Schedule feed: an HTTP(S) URL, or a local path (used as-is when it
    /// exists on disk).
    pub source_url: String,
    pub store_path: PathBuf,
    pub backup_path: PathBuf,
    pub output_path: PathBuf,
    /// Similarity ratio two normalized matchup names must exceed to be
    /// considered the same fixture.
    pub similarity_threshold: f64,
    /// Maximum start-time difference, in minutes, for two records to be
    /// merge candidates.
    pub duplicate_window_min: i64,
    /// Per-category retention overrides, in hours since scheduled start.
    pub persist_window_hours: HashMap<String, f64>,
    /// Retention for categories without an override.
    pub default_persist_hours: f64,
    /// Display cutoff; must not exceed any persist window.
    pub display_window_hours: f64,
    /// Starts further in the future than this are treated as feed errors.
    pub max_future_hours: f64,
    /// Region codes whose channels sort first on the rendered cards.
    pub preferred_regions: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source_url: String::new(),
            store_path: utils::store_path(),
            backup_path: utils::backup_path(),
            output_path: utils::output_path(),
            similarity_threshold: 0.60,
            duplicate_window_min: 60,
            persist_window_hours: HashMap::new(),
            default_persist_hours: 5.0,
            display_window_hours: 4.0,
            max_future_hours: 24.0,
            preferred_regions: vec!["es".to_string(), "mx".to_string()],
        }
    }
}

impl AppConfig {
    /// Loads the config file named by `MATCHDAY_CONFIG`, falling back to
    /// the platform data dir, falling back to defaults. A missing or
    /// unreadable file never aborts the run.
    pub fn load() -> Self {
        let path = std::env::var("MATCHDAY_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| utils::config_path());
        let mut config = match read_config(&path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!("config {:?} unusable, using defaults: {err}", path);
                Self::default()
            }
        };
        if let Ok(url) = std::env::var("MATCHDAY_SOURCE_URL") {
            config.source_url = url;
        }
        config
    }

    /// Retention window for a category, in hours.
    pub fn persist_hours(&self, category: &str) -> f64 {
        self.persist_window_hours
            .get(category)
            .copied()
            .unwrap_or(self.default_persist_hours)
    }
}

fn read_config(path: &PathBuf) -> Result<AppConfig, String> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let contents = fs::read_to_string(path).map_err(|err| err.to_string())?;
    serde_json::from_str(&contents).map_err(|err| err.to_string())
}
