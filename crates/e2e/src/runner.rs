//! Scenario runner: opens a page per scenario, records steps and failures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shopcheck_common::PricePolicy;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

use crate::config::{SuiteConfig, TargetConfig};
use crate::error::{E2eError, E2eResult};
use crate::page::{Driver, Page};
use crate::preflight::check_reachable;
use crate::scenarios::{Scenario, StepLog, StepResult};
use crate::session::Session;
use crate::snapshot::{save_snapshot, SnapshotInfo};

/// Result of running a single scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub name: String,
    pub tags: Vec<String>,
    pub success: bool,
    pub duration_ms: u64,
    pub steps: Vec<StepResult>,
    /// Step that was in progress when the scenario failed
    pub failed_step: Option<String>,
    pub error: Option<String>,
    pub snapshot: Option<SnapshotInfo>,
}

/// Result of running a set of scenarios
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteResult {
    pub started_at: DateTime<Utc>,
    pub driver: String,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub duration_ms: u64,
    pub results: Vec<ScenarioResult>,
}

impl SuiteResult {
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

/// Configuration for the test runner
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub target: TargetConfig,
    pub price_policy: PricePolicy,
    pub output_dir: PathBuf,
    /// GET the base URL once before the first scenario
    pub preflight: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self::from_suite(&SuiteConfig::default())
    }
}

impl RunnerConfig {
    pub fn from_suite(suite: &SuiteConfig) -> Self {
        Self {
            target: suite.target.clone(),
            price_policy: suite.price_policy,
            output_dir: suite.output_dir.clone(),
            preflight: false,
        }
    }
}

/// Runs scenarios one after another against pages from a [`Driver`]
pub struct TestRunner {
    driver: Arc<dyn Driver>,
    config: RunnerConfig,
}

impl TestRunner {
    pub fn new(driver: Arc<dyn Driver>, config: RunnerConfig) -> Self {
        Self { driver, config }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Run every known scenario
    pub async fn run_all(&self) -> E2eResult<SuiteResult> {
        self.run_scenarios(&Scenario::ALL).await
    }

    /// Run scenarios carrying `tag`
    pub async fn run_tagged(&self, tag: &str) -> E2eResult<SuiteResult> {
        let selected: Vec<Scenario> = Scenario::ALL
            .into_iter()
            .filter(|s| s.has_tag(tag))
            .collect();
        self.run_scenarios(&selected).await
    }

    /// Run a specific scenario by exact name
    pub async fn run_test(&self, name: &str) -> E2eResult<ScenarioResult> {
        let scenario: Scenario = name.parse()?;
        self.preflight().await?;
        Ok(self.run_scenario(scenario).await)
    }

    /// Run a list of scenarios
    pub async fn run_scenarios(&self, scenarios: &[Scenario]) -> E2eResult<SuiteResult> {
        let started_at = Utc::now();
        let start = Instant::now();

        self.preflight().await?;

        info!(
            "Running {} scenario(s) with the {} driver...",
            scenarios.len(),
            self.driver.name()
        );

        let mut results = Vec::with_capacity(scenarios.len());
        for &scenario in scenarios {
            let result = self.run_scenario(scenario).await;
            if result.success {
                info!("✓ {} ({} ms)", result.name, result.duration_ms);
            } else {
                error!(
                    "✗ {} - {}",
                    result.name,
                    result.error.as_deref().unwrap_or("unknown error")
                );
            }
            results.push(result);
        }

        let passed = results.iter().filter(|r| r.success).count();
        let failed = results.len() - passed;
        let duration_ms = start.elapsed().as_millis() as u64;

        info!(
            "Test Results: {} passed, {} failed ({} ms)",
            passed, failed, duration_ms
        );

        Ok(SuiteResult {
            started_at,
            driver: self.driver.name().to_string(),
            total: results.len(),
            passed,
            failed,
            duration_ms,
            results,
        })
    }

    async fn preflight(&self) -> E2eResult<()> {
        if !self.config.preflight {
            return Ok(());
        }
        let timeout = self.config.target.action_timeout().min(Duration::from_secs(30));
        check_reachable(&self.config.target.base_url, timeout).await
    }

    /// Run one scenario on a fresh page. Failures end up in the result,
    /// never as an `Err`, so the suite moves on to the next scenario.
    pub async fn run_scenario(&self, scenario: Scenario) -> ScenarioResult {
        let start = Instant::now();
        debug!("Running scenario: {}", scenario);

        let mut result = ScenarioResult {
            name: scenario.name().to_string(),
            tags: scenario.tags().iter().map(|t| t.to_string()).collect(),
            success: false,
            duration_ms: 0,
            steps: Vec::new(),
            failed_step: None,
            error: None,
            snapshot: None,
        };

        let page = match self.driver.new_page().await {
            Ok(page) => page,
            Err(e) => {
                result.error = Some(e.to_string());
                result.duration_ms = start.elapsed().as_millis() as u64;
                return result;
            }
        };

        let session = Session::new(
            Arc::clone(&page),
            self.config.target.clone(),
            self.config.price_policy,
        );
        let mut steps = StepLog::new();
        let outcome = scenario.run(&session, &mut steps).await;

        result.failed_step = match &outcome {
            Ok(()) => None,
            Err(_) => steps.current().map(str::to_string),
        };
        result.steps = steps.finish(&outcome);

        if let Err(e) = &outcome {
            result.error = Some(e.to_string());
            result.snapshot = self.capture(page.as_ref(), scenario).await;
        }
        result.success = outcome.is_ok();

        if let Err(e) = page.close().await {
            warn!("Closing page of {} failed: {}", scenario, e);
        }

        result.duration_ms = start.elapsed().as_millis() as u64;
        result
    }

    async fn capture(&self, page: &dyn Page, scenario: Scenario) -> Option<SnapshotInfo> {
        let dir = self.config.output_dir.join("snapshots");
        let stored = match page.screenshot().await {
            Ok(png) => save_snapshot(&dir, scenario.name(), &png),
            Err(e) => Err(e),
        };

        match stored {
            Ok(info) => Some(info),
            Err(e) => {
                warn!("No snapshot for {}: {}", scenario, e);
                None
            }
        }
    }

    /// Write results to `test-results.json` in the output directory
    pub fn write_results(&self, results: &SuiteResult) -> E2eResult<PathBuf> {
        std::fs::create_dir_all(&self.config.output_dir)?;

        let path = self.config.output_dir.join("test-results.json");
        let json = serde_json::to_string_pretty(results)?;
        std::fs::write(&path, json)?;

        info!("Results written to: {}", path.display());
        Ok(path)
    }

    /// Release the browser behind the driver
    pub async fn shutdown(&self) -> E2eResult<()> {
        self.driver.shutdown().await
    }
}

/// Parse a scenario list like `"sort-all-modes,cart-add-remove"`
pub fn parse_scenario_list(list: &str) -> E2eResult<Vec<Scenario>> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse())
        .collect::<E2eResult<Vec<_>>>()
        .and_then(|v| {
            if v.is_empty() {
                Err(E2eError::Config("empty scenario list".to_string()))
            } else {
                Ok(v)
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_list_parses_names() {
        let list = parse_scenario_list("sort-all-modes, cart-add-remove").unwrap();
        assert_eq!(list, vec![Scenario::SortAllModes, Scenario::CartAddRemove]);
    }

    #[test]
    fn scenario_list_rejects_unknown_and_empty() {
        assert!(matches!(
            parse_scenario_list("sort-all-modes,nope"),
            Err(E2eError::ScenarioNotFound(_))
        ));
        assert!(matches!(parse_scenario_list(" , "), Err(E2eError::Config(_))));
    }

    #[test]
    fn default_config_skips_preflight() {
        let config = RunnerConfig::default();
        assert!(!config.preflight);
        assert_eq!(config.output_dir, PathBuf::from("test-results"));
    }
}
