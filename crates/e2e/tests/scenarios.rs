//! Scenarios against the in-process storefront

use std::sync::Arc;

use shopcheck_common::{PricePolicy, ProductRecord};
use shopcheck_e2e::config::TargetConfig;
use shopcheck_e2e::mock::{FakeDriver, FakeProduct, StorefrontOptions};
use shopcheck_e2e::{authenticate, Driver, RunnerConfig, Scenario, Session, TestRunner};
use tempfile::TempDir;
use test_case::test_case;

fn target() -> TargetConfig {
    TargetConfig {
        expect_timeout_ms: 300,
        ..Default::default()
    }
}

fn runner(options: StorefrontOptions, out: &TempDir) -> TestRunner {
    let config = RunnerConfig {
        target: target(),
        price_policy: PricePolicy::Lenient,
        output_dir: out.path().to_path_buf(),
        preflight: false,
    };
    TestRunner::new(Arc::new(FakeDriver::new(options)), config)
}

#[tokio::test]
async fn every_scenario_passes_on_a_healthy_storefront() {
    let out = TempDir::new().unwrap();
    let driver = Arc::new(FakeDriver::default());
    let runner = TestRunner::new(
        driver.clone(),
        RunnerConfig {
            target: target(),
            output_dir: out.path().to_path_buf(),
            ..Default::default()
        },
    );

    let results = runner.run_all().await.unwrap();
    for result in &results.results {
        assert!(result.success, "{} failed: {:?}", result.name, result.error);
        assert!(result.snapshot.is_none());
        assert!(result.steps.iter().all(|s| s.success));
    }
    assert_eq!(results.total, Scenario::ALL.len());
    assert_eq!(results.passed, Scenario::ALL.len());
    assert_eq!(results.driver, "fake");

    // One fresh page per scenario
    assert_eq!(driver.pages_opened(), Scenario::ALL.len());
}

#[test_case("auth", &["auth-login-logout", "auth-invalid-credentials"])]
#[test_case("checkout", &["checkout-complete-order"])]
#[test_case(
    "smoke",
    &["auth-login-logout", "checkout-complete-order", "sort-name-ascending-default"]
)]
#[tokio::test]
async fn tag_selects_scenarios(tag: &str, expected: &[&str]) {
    let out = TempDir::new().unwrap();
    let results = runner(StorefrontOptions::default(), &out)
        .run_tagged(tag)
        .await
        .unwrap();
    let names: Vec<_> = results.results.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, expected);
}

#[tokio::test]
async fn lost_sort_on_reload_fails_persistence_with_snapshot() {
    let out = TempDir::new().unwrap();
    let options = StorefrontOptions {
        persist_sort_on_reload: false,
        ..Default::default()
    };

    let result = runner(options, &out)
        .run_scenario(Scenario::SortPersistence)
        .await;

    assert!(!result.success);
    assert_eq!(result.failed_step.as_deref(), Some("sort survives reload"));
    let error = result.error.unwrap();
    assert!(error.contains("\"hilo\""), "{}", error);
    assert!(error.contains("\"az\""), "{}", error);

    let last = result.steps.last().unwrap();
    assert!(!last.success);

    let snapshot = result.snapshot.expect("failure snapshot");
    assert!(snapshot.path.starts_with(out.path()));
    assert_eq!(snapshot.sha256.len(), 64);
    assert!(snapshot.width > 0 && snapshot.height > 0);
}

#[tokio::test]
async fn ignored_sort_selection_fails_change_detection() {
    let out = TempDir::new().unwrap();
    let options = StorefrontOptions {
        apply_sort: false,
        ..Default::default()
    };

    let result = runner(options, &out).run_scenario(Scenario::SortAllModes).await;
    assert!(!result.success);
    let error = result.error.unwrap();
    assert!(error.contains("did not reorder"), "{}", error);
    assert_eq!(result.failed_step.as_deref(), Some("select Name (Z to A)"));
}

#[tokio::test]
async fn unsorted_listing_fails_price_order_at_first_pair() {
    let out = TempDir::new().unwrap();
    let options = StorefrontOptions {
        apply_sort: false,
        ..Default::default()
    };

    let result = runner(options, &out)
        .run_scenario(Scenario::SortPriceAscending)
        .await;
    assert!(!result.success);
    let error = result.error.unwrap();
    // Backpack 29.99 precedes Bike Light 9.99
    assert!(error.contains("item 0"), "{}", error);
    assert!(error.contains("Sauce Labs Backpack"), "{}", error);
}

#[tokio::test]
async fn report_is_written_as_json() {
    let out = TempDir::new().unwrap();
    let runner = runner(StorefrontOptions::default(), &out);
    let results = runner.run_tagged("auth").await.unwrap();

    let path = runner.write_results(&results).unwrap();
    assert_eq!(path, out.path().join("test-results.json"));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["total"], 2);
    assert_eq!(json["passed"], 2);
    assert!(json["started_at"].is_string());
    assert_eq!(json["results"][0]["name"], "auth-login-logout");
    assert!(json["results"][0]["steps"].as_array().unwrap().len() >= 5);
}

#[tokio::test]
async fn unknown_scenario_name_is_an_error() {
    let out = TempDir::new().unwrap();
    let err = runner(StorefrontOptions::default(), &out)
        .run_test("sort-by-rating")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("sort-by-rating"));
}

async fn logged_in_session(catalog: Vec<FakeProduct>, policy: PricePolicy) -> Session {
    let driver = FakeDriver::new(StorefrontOptions::default().with_catalog(catalog));
    let page = driver.new_page().await.unwrap();
    let session = Session::new(page, target(), policy);
    authenticate(&session, &Default::default()).await.unwrap();
    session
}

#[tokio::test]
async fn price_ascending_orders_three_item_catalog() {
    let catalog = vec![
        FakeProduct::new("Sauce Labs Backpack", 29.99),
        FakeProduct::new("Sauce Labs Bike Light", 9.99),
        FakeProduct::new("Sauce Labs Bolt T-Shirt", 15.99),
    ];
    let session = logged_in_session(catalog, PricePolicy::Lenient).await;
    session
        .page()
        .select_option(".product_sort_container", "lohi")
        .await
        .unwrap();

    let products = session.products().await.unwrap();
    assert_eq!(
        products.records(),
        &[
            ProductRecord::new("Sauce Labs Bike Light", 9.99),
            ProductRecord::new("Sauce Labs Bolt T-Shirt", 15.99),
            ProductRecord::new("Sauce Labs Backpack", 29.99),
        ]
    );

    // Re-reading without changing the mode yields the same listing
    assert_eq!(session.products().await.unwrap(), products);
}

#[tokio::test]
async fn malformed_price_extracts_as_zero_when_lenient() {
    let catalog = vec![
        FakeProduct::new("Sauce Labs Backpack", 29.99),
        FakeProduct::with_price_text("Sauce Labs Onesie", "N/A"),
        FakeProduct::without_price("Sauce Labs Bike Light"),
    ];
    let session = logged_in_session(catalog, PricePolicy::Lenient).await;

    let products = session.products().await.unwrap();
    assert_eq!(products.prices(), vec![29.99, 0.0, 0.0]);
}

#[tokio::test]
async fn malformed_price_fails_extraction_when_strict() {
    let catalog = vec![FakeProduct::with_price_text("Sauce Labs Onesie", "N/A")];
    let session = logged_in_session(catalog, PricePolicy::Strict).await;

    let err = session.products().await.unwrap_err();
    assert!(err.to_string().contains("N/A"), "{}", err);
}

#[test_case(vec![] ; "empty catalog")]
#[test_case(vec![FakeProduct::new("Sauce Labs Onesie", 7.99)] ; "single item")]
#[tokio::test]
async fn tiny_catalogs_pass_every_sort_scenario(catalog: Vec<FakeProduct>) {
    let out = TempDir::new().unwrap();
    let results = runner(StorefrontOptions::default().with_catalog(catalog), &out)
        .run_tagged("sort")
        .await
        .unwrap();
    for result in &results.results {
        assert!(result.success, "{} failed: {:?}", result.name, result.error);
    }
}
