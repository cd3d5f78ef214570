//! Configuration model
//!
//! Loaded from YAML by `cli::runtime::load_config`, then patched from the
//! `AUTOPLANT_*` environment variables.

use action_flow::{PortalAccess, PORTAL_REPORT_URL};
use action_primitives::webdriver::WebDriverSettings;
use action_primitives::Timings;
use serde::{Deserialize, Serialize};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::warn;

pub const ENV_USERNAME: &str = "AUTOPLANT_USERNAME";
pub const ENV_PASSWORD: &str = "AUTOPLANT_PASSWORD";
pub const ENV_WEBDRIVER_URL: &str = "AUTOPLANT_WEBDRIVER_URL";
pub const ENV_HEADLESS: &str = "AUTOPLANT_HEADLESS";
pub const ENV_REPORT_URL: &str = "AUTOPLANT_REPORT_URL";
pub const ENV_ARTIFACTS_DIR: &str = "AUTOPLANT_ARTIFACTS_DIR";

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub portal: PortalConfig,
    pub webdriver: WebDriverSettings,
    pub timing: Timings,
    pub artifacts: ArtifactsConfig,
    pub server: ServerConfig,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    pub report_url: String,
    pub username: String,
    pub password: String,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            report_url: PORTAL_REPORT_URL.to_string(),
            username: String::new(),
            password: String::new(),
        }
    }
}

impl std::fmt::Debug for PortalConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortalConfig")
            .field("report_url", &self.report_url)
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

impl PortalConfig {
    pub fn access(&self) -> PortalAccess {
        PortalAccess::new(self.username.clone(), self.password.clone())
            .with_report_url(self.report_url.clone())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactsConfig {
    /// Where checkpoint and error screenshots are written
    pub dir: PathBuf,
    /// Save the "details" screenshot before the final submit
    pub checkpoint: bool,
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("artifacts"),
            checkpoint: true,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 5000)),
        }
    }
}

impl Config {
    /// Apply `AUTOPLANT_*` overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    pub(crate) fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(username) = lookup(ENV_USERNAME) {
            self.portal.username = username;
        }
        if let Some(password) = lookup(ENV_PASSWORD) {
            self.portal.password = password;
        }
        if let Some(url) = lookup(ENV_REPORT_URL) {
            self.portal.report_url = url;
        }
        if let Some(url) = lookup(ENV_WEBDRIVER_URL) {
            self.webdriver.url = url;
        }
        if let Some(raw) = lookup(ENV_HEADLESS) {
            match parse_flag(&raw) {
                Some(headless) => self.webdriver.headless = headless,
                None => warn!(value = %raw, "ignoring {}: expected true/false", ENV_HEADLESS),
            }
        }
        if let Some(dir) = lookup(ENV_ARTIFACTS_DIR) {
            self.artifacts.dir = PathBuf::from(dir);
        }
    }

    /// Copy safe to print: the password is replaced by asterisks.
    pub fn redacted(&self) -> Config {
        let mut copy = self.clone();
        if !copy.portal.password.is_empty() {
            copy.portal.password = "********".to_string();
        }
        copy
    }

    pub fn has_credentials(&self) -> bool {
        !self.portal.username.is_empty() && !self.portal.password.is_empty()
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
