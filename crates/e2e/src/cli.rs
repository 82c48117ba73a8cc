//! Command line of the `e2e` test target
//!
//! The target is built with `harness = false`, so cargo forwards libtest's
//! flags to it. `--list` prints the selected scenarios the way libtest lists
//! tests. `--ignored` selects nothing because no scenario is ignored. The
//! remaining harness flags are accepted and have no effect.

use clap::Parser;
use shopcheck_common::PricePolicy;
use std::path::PathBuf;

use crate::config::{DriverKind, SuiteConfig};
use crate::error::E2eResult;
use crate::runner::parse_scenario_list;
use crate::scenarios::Scenario;

#[derive(Parser, Debug)]
#[command(name = "shopcheck-e2e")]
#[command(about = "E2E scenarios for the Swag Labs storefront")]
pub struct RunArgs {
    /// Suite configuration file (defaults apply when it is missing)
    #[arg(short, long, default_value = "shopcheck.yaml", env = "SHOPCHECK_CONFIG")]
    pub config: PathBuf,

    /// Page driver. Without a config file the default is fake
    #[arg(long, value_enum, env = "SHOPCHECK_DRIVER")]
    pub driver: Option<DriverKind>,

    /// Login page URL of the storefront
    #[arg(long, env = "SHOPCHECK_BASE_URL")]
    pub base_url: Option<String>,

    /// Run only scenarios carrying this tag
    #[arg(short, long)]
    pub tag: Option<String>,

    /// Run only these scenarios (comma-separated names)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// Malformed price handling
    #[arg(long, value_enum, env = "SHOPCHECK_PRICE_POLICY")]
    pub price_policy: Option<PricePolicy>,

    /// Output directory for results
    #[arg(short, long, env = "SHOPCHECK_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,

    /// Substring filter on scenario names, as passed by `cargo test <filter>`
    pub filter: Option<String>,

    /// Match the filter against whole scenario names
    #[arg(long)]
    pub exact: bool,

    /// List the selected scenarios instead of running them
    #[arg(long)]
    pub list: bool,

    /// Run only ignored tests; there are none
    #[arg(long, conflicts_with = "include_ignored")]
    pub ignored: bool,

    // Harness flags with no effect on the scenario runner
    #[arg(long, hide = true)]
    pub include_ignored: bool,
    #[arg(long, hide = true)]
    pub test_threads: Option<usize>,
    #[arg(long, hide = true)]
    pub nocapture: bool,
    #[arg(short, long, hide = true)]
    pub quiet: bool,
}

impl RunArgs {
    /// Load the config file and apply flag and environment overrides.
    ///
    /// Without a config file the fake storefront is used, so a bare
    /// `cargo test` stays offline.
    pub fn suite_config(&self) -> E2eResult<SuiteConfig> {
        let mut config = SuiteConfig::load(&self.config)?;
        if !self.config.exists() {
            config.browser.driver = DriverKind::Fake;
        }

        if let Some(driver) = self.driver {
            config.browser.driver = driver;
        }
        if let Some(url) = &self.base_url {
            config.target.base_url = url.clone();
        }
        if self.headed {
            config.browser.headless = false;
        }
        if let Some(policy) = self.price_policy {
            config.price_policy = policy;
        }
        if let Some(output) = &self.output {
            config.output_dir = output.clone();
        }
        Ok(config)
    }

    /// Scenarios picked by `--name`, `--tag` or the positional filter
    pub fn selection(&self) -> E2eResult<Vec<Scenario>> {
        if self.ignored {
            return Ok(Vec::new());
        }
        if let Some(names) = &self.name {
            return parse_scenario_list(names);
        }

        Ok(Scenario::ALL
            .into_iter()
            .filter(|s| self.tag.as_deref().map_or(true, |tag| s.has_tag(tag)))
            .filter(|s| match &self.filter {
                Some(filter) if self.exact => s.name() == filter.as_str(),
                Some(filter) => s.name().contains(filter.as_str()),
                None => true,
            })
            .collect())
    }

    /// libtest-style listing, one `name: test` line per scenario
    pub fn listing(&self) -> E2eResult<String> {
        Ok(self
            .selection()?
            .iter()
            .map(|s| format!("{}: test\n", s.name()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use test_case::test_case;

    fn parse(args: &[&str]) -> RunArgs {
        RunArgs::try_parse_from(std::iter::once("e2e").chain(args.iter().copied())).unwrap()
    }

    #[test_case(&["--ignored"] ; "ignored")]
    #[test_case(&["--include-ignored"] ; "include ignored")]
    #[test_case(&["--test-threads", "1"] ; "test threads")]
    #[test_case(&["--test-threads=4", "--nocapture", "-q"] ; "mixed harness flags")]
    #[test_case(&["--list", "--exact", "sort-all-modes"] ; "list exact")]
    fn accepts_harness_flags(args: &[&str]) {
        let cli = RunArgs::try_parse_from(std::iter::once("e2e").chain(args.iter().copied()));
        assert!(cli.is_ok(), "{:?}", cli.err());
    }

    #[test]
    fn ignored_run_selects_nothing() {
        let args = parse(&["--ignored"]);
        assert!(args.selection().unwrap().is_empty());
        assert_eq!(args.listing().unwrap(), "");
    }

    #[test]
    fn list_prints_selected_scenarios() {
        let args = parse(&["--list", "--tag", "auth"]);
        assert!(args.list);
        assert_eq!(
            args.listing().unwrap(),
            "auth-login-logout: test\nauth-invalid-credentials: test\n"
        );
    }

    #[test_case("sort-name", false, 2 ; "substring")]
    #[test_case("sort-name", true, 0 ; "exact needs whole name")]
    #[test_case("sort-persistence", true, 1 ; "exact whole name")]
    fn filter_selects_by_name(filter: &str, exact: bool, expected: usize) {
        let mut args = vec![filter];
        if exact {
            args.push("--exact");
        }
        assert_eq!(parse(&args).selection().unwrap().len(), expected);
    }

    #[test]
    fn enum_flags_parse_as_value_enums() {
        let args = parse(&["--driver", "chromium", "--price-policy", "strict"]);
        assert_eq!(args.driver, Some(DriverKind::Chromium));
        assert_eq!(args.price_policy, Some(PricePolicy::Strict));
    }

    #[test_case(&["--driver", "firefox"] ; "unknown driver")]
    #[test_case(&["--price-policy", "zero"] ; "unknown policy")]
    fn unknown_enum_values_are_rejected(args: &[&str]) {
        let cli = RunArgs::try_parse_from(std::iter::once("e2e").chain(args.iter().copied()));
        assert!(cli.is_err());
    }

    #[test]
    fn missing_config_file_defaults_to_fake_driver() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("shopcheck.yaml");
        let args = parse(&["--config", missing.to_str().unwrap()]);

        let config = args.suite_config().unwrap();
        assert_eq!(config.browser.driver, DriverKind::Fake);
        assert_eq!(config.target.base_url, "https://www.saucedemo.com/");
    }

    #[test]
    fn config_file_then_flags_override() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("shopcheck.yaml");
        std::fs::write(&path, "price_policy: strict\nbrowser:\n  timezone: Europe/Moscow\n")
            .unwrap();

        let config = parse(&["--config", path.to_str().unwrap()])
            .suite_config()
            .unwrap();
        assert_eq!(config.browser.driver, DriverKind::Chromium);
        assert_eq!(config.price_policy, PricePolicy::Strict);
        assert_eq!(config.browser.timezone.as_deref(), Some("Europe/Moscow"));

        let config = parse(&[
            "--config",
            path.to_str().unwrap(),
            "--driver",
            "fake",
            "--price-policy",
            "lenient",
            "--headed",
        ])
        .suite_config()
        .unwrap();
        assert_eq!(config.browser.driver, DriverKind::Fake);
        assert_eq!(config.price_policy, PricePolicy::Lenient);
        assert!(!config.browser.headless);
    }
}
