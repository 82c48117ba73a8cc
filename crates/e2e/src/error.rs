//! Error types for E2E testing

use shopcheck_common::VerifyError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum E2eError {
    #[error("Target {url} is unreachable: {reason}")]
    TargetUnreachable { url: String, reason: String },

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Scenario not found: {0}")]
    ScenarioNotFound(String),

    #[error("Assertion failed: {what}: expected {expected}, got {actual}")]
    AssertionFailed {
        what: String,
        expected: String,
        actual: String,
    },

    #[error("Assertion failed: {0}")]
    Order(#[from] VerifyError),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Timeout waiting for: {0}")]
    Timeout(String),

    #[error("Malformed data: {0}")]
    MalformedData(#[from] shopcheck_common::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

impl E2eError {
    pub fn assertion(
        what: impl Into<String>,
        expected: impl std::fmt::Display,
        actual: impl std::fmt::Display,
    ) -> Self {
        E2eError::AssertionFailed {
            what: what.into(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}

impl From<chromiumoxide::error::CdpError> for E2eError {
    fn from(e: chromiumoxide::error::CdpError) -> Self {
        E2eError::Browser(e.to_string())
    }
}

pub type E2eResult<T> = Result<T, E2eError>;
