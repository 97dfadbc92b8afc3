// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! JSON configuration file.
//!
//! ```json
//! { "Ntp": { "Server": "pool.ntp.org", "TimeoutMs": 3000 } }
//! ```
//!
//! A missing, unreadable, or malformed file is not an error: every lookup falls back to the
//! built-in default. Unknown keys are ignored.

use std::fs;
use std::path::Path;
use std::time::Duration;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Server used when neither the command line nor the configuration names one.
pub const DEFAULT_SERVER: &str = "time.windows.com";

/// Configuration file read when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "appsettings.json";

/// Top-level configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Settings for the time query.
    #[serde(rename = "Ntp", default)]
    pub ntp: NtpSection,
}

/// The `Ntp` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NtpSection {
    /// Host name or address of the NTP server.
    #[serde(rename = "Server", default, skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
    /// Reply timeout in milliseconds.
    #[serde(rename = "TimeoutMs", default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl AppConfig {
    /// Read and parse `path`. Returns `None` if the file is absent or not valid JSON.
    pub fn load(path: &Path) -> Option<AppConfig> {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                debug!("no configuration at {}: {}", path.display(), e);
                return None;
            }
        };
        match serde_json::from_str(&json) {
            Ok(config) => Some(config),
            Err(e) => {
                warn!("ignoring invalid configuration {}: {}", path.display(), e);
                None
            }
        }
    }

    /// The configured server, unless it is missing or blank.
    pub fn server(&self) -> Option<&str> {
        self.ntp
            .server
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// The configured reply timeout.
    pub fn timeout(&self) -> Option<Duration> {
        self.ntp.timeout_ms.map(Duration::from_millis)
    }
}

/// The server named by the configuration file at `path`, if any.
pub fn default_server(path: &Path) -> Option<String> {
    AppConfig::load(path)?.server().map(str::to_owned)
}
