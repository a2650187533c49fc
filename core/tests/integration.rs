//! Full resource lifecycle against the live mock backend.
//!
//! # Design
//! Starts the mock server on a random port, then exercises every façade
//! operation over real HTTP through `UreqTransport`. Validates that request
//! building and response handling work end-to-end with the actual server,
//! and that the typed DTOs still match the server's schema.

use serde_json::json;
use testhub_core::types::{
    ConfigEntry, ConfigUpdate, GlobalSettings, ListParams, QuickGenerateParams, Scenario,
    ScenarioCreate, ScenarioQuickGenerate, ScenarioUpdate, ScenarioWithCases, TestCase,
    TestCaseCreate, TestReport,
};
use testhub_core::{ApiError, GenerationStrategy, QueryParams, TestHubClient, UreqTransport};

async fn start_server() -> TestHubClient<UreqTransport> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(mock_server::run(listener));
    TestHubClient::new(&format!("http://{addr}/api"), UreqTransport::default())
}

#[tokio::test]
async fn configs_lifecycle() {
    let client = start_server().await;
    let configs = client.configs();

    // Step 1: no entries yet, settings come back with defaults.
    let list = configs.list(None).await.unwrap();
    assert_eq!(list, json!([]));
    let settings: GlobalSettings = serde_json::from_value(configs.get_settings().await.unwrap()).unwrap();
    assert!(settings.browser_headless);
    assert!(settings.target_url.is_none());

    // Step 2: update settings.
    let update = GlobalSettings {
        target_url: Some("https://example.com".to_string()),
        browser_timeout: 10_000,
        ..Default::default()
    };
    configs.update_settings(&update).await.unwrap();
    let settings: GlobalSettings = serde_json::from_value(configs.get_settings().await.unwrap()).unwrap();
    assert_eq!(settings.target_url.as_deref(), Some("https://example.com"));
    assert_eq!(settings.browser_timeout, 10_000);

    // Step 3: entries are now addressable by key.
    let entry: ConfigEntry = serde_json::from_value(configs.get_config("target_url").await.unwrap()).unwrap();
    assert_eq!(entry.config_value.as_deref(), Some("https://example.com"));

    let updated = configs
        .update_config(
            "browser_timeout",
            &ConfigUpdate {
                config_value: Some("20000".to_string()),
                description: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated["config_value"], "20000");

    // Step 4: paging is forwarded.
    let page = configs
        .list(Some(&QueryParams::new().with("limit", 2)))
        .await
        .unwrap();
    assert_eq!(page.as_array().unwrap().len(), 2);

    // Step 5: unknown key.
    let err = configs.get_config("missing").await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound { .. }));
}

#[tokio::test]
async fn scenarios_lifecycle() {
    let client = start_server().await;
    let scenarios = client.scenarios();

    // Step 1: create.
    let input = ScenarioCreate {
        name: "Login".to_string(),
        description: Some("login flow".to_string()),
        target_url: "https://example.com/login".to_string(),
        user_query: "log in with valid credentials".to_string(),
        generation_strategy: GenerationStrategy::Basic,
    };
    let created: Scenario = serde_json::from_value(scenarios.create(&input).await.unwrap()).unwrap();
    assert_eq!(created.name, "Login");
    assert_eq!(created.total_cases, 0);
    let id = created.id;

    // Step 2: update.
    let update = ScenarioUpdate {
        status: Some("ready".to_string()),
        ..Default::default()
    };
    let updated: Scenario = serde_json::from_value(scenarios.update(id, &update).await.unwrap()).unwrap();
    assert_eq!(updated.status, "ready");

    // Step 3: list filtered by status.
    let filter = ListParams {
        status: Some("ready".to_string()),
        ..Default::default()
    };
    let ready = scenarios
        .list(Some(&QueryParams::from_serialize(&filter).unwrap()))
        .await
        .unwrap();
    assert_eq!(ready.as_array().unwrap().len(), 1);

    // Step 4: execute before generating fails with 400.
    let err = scenarios.execute(id).await.unwrap_err();
    assert!(matches!(err, ApiError::Http { status: 400, .. }));

    // Step 5: generate with an explicit strategy.
    let detail: ScenarioWithCases =
        serde_json::from_value(scenarios.generate(id, &GenerationStrategy::HappyPath).await.unwrap()).unwrap();
    assert_eq!(detail.scenario.total_cases, 1);
    assert_eq!(detail.test_cases.len(), 1);

    let cases: Vec<TestCase> = serde_json::from_value(scenarios.get_cases(id).await.unwrap()).unwrap();
    assert_eq!(cases, detail.test_cases);

    // Step 6: execute and read reports and steps.
    let summary = scenarios.execute(id).await.unwrap();
    assert_eq!(summary["passed"], 1);
    let reports: Vec<TestReport> = serde_json::from_value(scenarios.get_reports(id).await.unwrap()).unwrap();
    assert_eq!(reports.len(), 1);
    let steps = scenarios.get_report_steps(id, reports[0].id).await.unwrap();
    assert_eq!(steps.as_array().unwrap().len(), 3);

    // Step 7: detail includes cases.
    let detail: ScenarioWithCases = serde_json::from_value(scenarios.get_detail(id).await.unwrap()).unwrap();
    assert_eq!(detail.scenario.status, "generated");

    // Step 8: delete, then the scenario is gone.
    scenarios.delete(id).await.unwrap();
    let err = scenarios.get_detail(id).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound { .. }));
}

#[tokio::test]
async fn scenario_quick_generate_sends_body() {
    let client = start_server().await;
    let result = client
        .scenarios()
        .quick_generate(&ScenarioQuickGenerate {
            user_query: "search for shoes".to_string(),
            target_url: "https://shop.example".to_string(),
            generation_strategy: GenerationStrategy::Comprehensive,
            auto_detect_captcha: false,
        })
        .await
        .unwrap();
    assert_eq!(result["summary"]["total"], 5);
    assert_eq!(result["scenario"]["target_url"], "https://shop.example");
}

#[tokio::test]
async fn test_cases_lifecycle() {
    let client = start_server().await;
    let test_cases = client.test_cases();

    // Step 1: create.
    let input = TestCaseCreate {
        name: "Checkout".to_string(),
        description: None,
        target_url: "https://shop.example".to_string(),
        user_query: "buy one item".to_string(),
        test_data: Some(json!({"sku": "A-1"})),
        expected_result: Some("order placed".to_string()),
        scenario_id: None,
    };
    let created: TestCase = serde_json::from_value(test_cases.create(&input).await.unwrap()).unwrap();
    assert_eq!(created.test_data, Some(json!({"sku": "A-1"})));
    let id = created.id;

    // Step 2: generate, execute, reports.
    let generated = test_cases.generate(id).await.unwrap();
    assert_eq!(generated["actions"].as_array().unwrap().len(), 3);
    test_cases.execute(id).await.unwrap();
    let reports: Vec<TestReport> = serde_json::from_value(test_cases.get_reports(id).await.unwrap()).unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].status, "passed");
    let steps = test_cases.get_report_steps(id, reports[0].id).await.unwrap();
    assert_eq!(steps.as_array().unwrap().len(), 3);

    // Step 3: update and fetch.
    test_cases
        .update(id, &json!({"priority": "P0"}))
        .await
        .unwrap();
    let fetched: TestCase = serde_json::from_value(test_cases.get_detail(id).await.unwrap()).unwrap();
    assert_eq!(fetched.priority, "P0");
    assert_eq!(fetched.execution_count, 1);

    // Step 4: list, delete, list.
    let all = test_cases.list(None).await.unwrap();
    assert_eq!(all.as_array().unwrap().len(), 1);
    test_cases.delete(id).await.unwrap();
    let err = test_cases.delete(id).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound { .. }));
    assert_eq!(test_cases.list(None).await.unwrap(), json!([]));
}

#[tokio::test]
async fn test_case_quick_generate_uses_query_string() {
    let client = start_server().await;
    let params = QueryParams::from_serialize(&QuickGenerateParams {
        user_query: "log in & out".to_string(),
        target_url: "https://example.com/?next=/home".to_string(),
    })
    .unwrap();

    let result = client.test_cases().quick_generate(&params).await.unwrap();
    assert_eq!(result["user_query"], "log in & out");
    assert_eq!(result["target_url"], "https://example.com/?next=/home");

    let params = params.with("captcha_selector", "#captcha img");
    let result = client
        .test_cases()
        .quick_generate_with_captcha(&params)
        .await
        .unwrap();
    assert_eq!(result["captcha_selector"], "#captcha img");
    assert!(result["captcha_input_selector"].is_null());
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    // Bind then drop to get a port nothing listens on.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = TestHubClient::new(&format!("http://{addr}/api"), UreqTransport::default());
    let err = client.configs().get_settings().await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}
