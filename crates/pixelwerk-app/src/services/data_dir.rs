// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-aware config directory resolution.

use std::path::PathBuf;

const CONFIG_FILE: &str = "config.json";

/// Return the application config directory. Not created here; it only has to
/// exist once a config is saved.
pub fn config_dir() -> PathBuf {
    dirs_fallback().join("pixelwerk")
}

/// Default location of the persisted `AppConfig`.
pub fn default_config_path() -> PathBuf {
    config_dir().join(CONFIG_FILE)
}

fn dirs_fallback() -> PathBuf {
    // Try XDG config dir, then fallback to home
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg);
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".config");
    }
    // Last resort
    PathBuf::from(".")
}
