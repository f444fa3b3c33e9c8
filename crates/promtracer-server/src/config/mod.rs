//! Demo server config loader (strict parsing).

pub mod schema;

use std::fs;

use promtracer_core::error::{PromTracerError, Result};

pub use schema::{FileConfig, ListenerFailureSetting, MetricsSection, ServerSection, StatsLevelSetting};

pub fn load_from_file(path: &str) -> Result<FileConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| PromTracerError::BadConfig(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<FileConfig> {
    let cfg: FileConfig = serde_yaml::from_str(s)
        .map_err(|e| PromTracerError::BadConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
