// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Config file persistence.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use pixelwerk_core::AppConfig;
use tracing::{debug, info};

use super::data_dir;

/// Load the config from `explicit` if given (it must exist), otherwise from
/// the default location if present, otherwise defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<(AppConfig, PathBuf)> {
    match explicit {
        Some(path) => {
            let config = AppConfig::load(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?;
            info!(path = %path.display(), "Loaded config");
            Ok((config, path.to_path_buf()))
        }
        None => {
            let path = data_dir::default_config_path();
            if path.exists() {
                let config = AppConfig::load(&path)
                    .with_context(|| format!("failed to load config from {}", path.display()))?;
                info!(path = %path.display(), "Loaded config");
                Ok((config, path))
            } else {
                debug!(path = %path.display(), "No config file; using defaults");
                Ok((AppConfig::default(), path))
            }
        }
    }
}

/// Write `config` to `path`, creating parent directories.
pub fn persist_config(path: &Path, config: &AppConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    config
        .save(path)
        .with_context(|| format!("failed to write config to {}", path.display()))?;
    info!(path = %path.display(), "Config saved");
    Ok(())
}
