//! YAML suite configuration

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use shopcheck_common::{Credentials, PricePolicy};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{E2eError, E2eResult};

/// A complete suite configuration parsed from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteConfig {
    /// Storefront under test
    #[serde(default)]
    pub target: TargetConfig,

    /// How pages are opened
    #[serde(default)]
    pub browser: BrowserSettings,

    /// Handling of malformed price text during extraction
    #[serde(default)]
    pub price_policy: PricePolicy,

    /// Directory for the JSON report and failure snapshots
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("test-results")
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            target: TargetConfig::default(),
            browser: BrowserSettings::default(),
            price_policy: PricePolicy::default(),
            output_dir: default_output_dir(),
        }
    }
}

/// Storefront location, account and wait budgets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Login page URL; other pages are resolved against it
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub credentials: Credentials,

    /// Upper bound for a single page operation
    #[serde(default = "default_action_timeout")]
    pub action_timeout_ms: u64,

    /// How long expectations keep polling before failing
    #[serde(default = "default_expect_timeout")]
    pub expect_timeout_ms: u64,
}

fn default_base_url() -> String {
    "https://www.saucedemo.com/".to_string()
}

fn default_action_timeout() -> u64 {
    30_000
}

fn default_expect_timeout() -> u64 {
    5_000 // 5 seconds, same as Playwright's expect
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            credentials: Credentials::default(),
            action_timeout_ms: default_action_timeout(),
            expect_timeout_ms: default_expect_timeout(),
        }
    }
}

impl TargetConfig {
    pub fn action_timeout(&self) -> Duration {
        Duration::from_millis(self.action_timeout_ms)
    }

    pub fn expect_timeout(&self) -> Duration {
        Duration::from_millis(self.expect_timeout_ms)
    }

    /// Absolute URL of a page next to the login page, e.g. `inventory.html`
    pub fn page_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}

/// Which page implementation drives the scenarios
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum DriverKind {
    /// Headless Chrome against the real target
    #[default]
    Chromium,
    /// In-process storefront, no browser or network
    Fake,
}

/// Browser launch settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserSettings {
    #[serde(default)]
    pub driver: DriverKind,

    #[serde(default = "default_headless")]
    pub headless: bool,

    #[serde(default = "default_viewport")]
    pub viewport: Viewport,

    /// Browser language and `navigator.language`, e.g. `ru-RU`
    #[serde(default)]
    pub locale: Option<String>,

    /// IANA time zone for every page, e.g. `Europe/Moscow`
    #[serde(default)]
    pub timezone: Option<String>,

    /// Chrome binary; auto-detected when unset
    #[serde(default)]
    pub executable: Option<PathBuf>,
}

fn default_headless() -> bool {
    true
}

fn default_viewport() -> Viewport {
    Viewport {
        width: 1920,
        height: 1080,
    }
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            driver: DriverKind::default(),
            headless: default_headless(),
            viewport: default_viewport(),
            locale: None,
            timezone: None,
            executable: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl SuiteConfig {
    /// Parse a suite config from YAML string
    pub fn from_yaml(yaml: &str) -> E2eResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a suite config from a YAML file
    pub fn from_file(path: &Path) -> E2eResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Load from `path`, falling back to defaults when the file is absent
    pub fn load(path: &Path) -> E2eResult<Self> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    fn validate(&self) -> E2eResult<()> {
        let url = &self.target.base_url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(E2eError::Config(format!(
                "target.base_url must be an http(s) URL, got '{}'",
                url
            )));
        }
        if self.target.action_timeout_ms == 0 || self.target.expect_timeout_ms == 0 {
            return Err(E2eError::Config("timeouts must be positive".to_string()));
        }
        Ok(())
    }
}
