//! In-memory stand-in for the testhub backend.
//!
//! Serves the configuration, scenario and test-case endpoints under `/api`
//! with FastAPI-style error bodies (`{"detail": "..."}`). Generation and
//! execution are simulated deterministically so client tests can assert on
//! their results.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        FromRequest, FromRequestParts, Path, Query, Request, State,
    },
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{NaiveDateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use tracing::info;

pub const TARGET_URL_KEY: &str = "target_url";

/// Keys backing the settings singleton, with their stored type.
const SETTINGS_KEYS: &[(&str, &str)] = &[
    ("target_url", "string"),
    ("default_username", "string"),
    ("default_password", "string"),
    ("captcha_selector", "string"),
    ("captcha_input_selector", "string"),
    ("browser_headless", "boolean"),
    ("use_computer_use", "boolean"),
    ("browser_timeout", "number"),
];

// ---------------------------------------------------------------------------
// Models
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConfigEntry {
    pub id: i64,
    pub config_key: String,
    pub config_value: Option<String>,
    pub config_type: String,
    pub description: Option<String>,
    pub is_encrypted: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Deserialize)]
pub struct ConfigUpdate {
    pub config_value: Option<String>,
    pub description: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Settings {
    pub target_url: Option<String>,
    pub default_username: Option<String>,
    pub default_password: Option<String>,
    pub captcha_selector: Option<String>,
    pub captcha_input_selector: Option<String>,
    pub browser_headless: Option<bool>,
    pub use_computer_use: Option<bool>,
    pub browser_timeout: Option<u32>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Scenario {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub target_url: String,
    pub user_query: String,
    pub generation_strategy: String,
    pub total_cases: u32,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Deserialize)]
pub struct CreateScenario {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub target_url: String,
    pub user_query: String,
    #[serde(default = "default_strategy")]
    pub generation_strategy: String,
}

#[derive(Deserialize)]
pub struct UpdateScenario {
    pub name: Option<String>,
    pub description: Option<String>,
    pub target_url: Option<String>,
    pub user_query: Option<String>,
    pub generation_strategy: Option<String>,
    pub status: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TestCase {
    pub id: i64,
    pub scenario_id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    pub target_url: String,
    pub user_query: String,
    pub test_data: Option<Value>,
    pub expected_result: Option<String>,
    pub priority: String,
    pub case_type: String,
    pub status: String,
    pub actions: Option<Vec<String>>,
    pub script: Option<String>,
    pub execution_count: u32,
    pub last_execution_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Deserialize)]
pub struct CreateTestCase {
    pub name: String,
    pub description: Option<String>,
    pub target_url: String,
    pub user_query: String,
    pub test_data: Option<Value>,
    pub expected_result: Option<String>,
    pub scenario_id: Option<i64>,
}

#[derive(Deserialize)]
pub struct UpdateTestCase {
    pub name: Option<String>,
    pub description: Option<String>,
    pub target_url: Option<String>,
    pub user_query: Option<String>,
    pub test_data: Option<Value>,
    pub expected_result: Option<String>,
    pub priority: Option<String>,
    pub case_type: Option<String>,
    pub status: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TestReport {
    pub id: i64,
    pub test_case_id: i64,
    pub scenario_id: Option<i64>,
    pub status: String,
    pub result: Option<String>,
    pub error_message: Option<String>,
    pub execution_time: Option<u64>,
    pub screenshot_path: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StepResult {
    pub id: i64,
    pub test_report_id: i64,
    pub step_number: u32,
    pub step_name: String,
    pub step_type: String,
    pub status: String,
}

#[derive(Deserialize, Default)]
pub struct StrategyInput {
    pub generation_strategy: Option<String>,
}

#[derive(Deserialize)]
pub struct ScenarioQuickGenerate {
    pub user_query: String,
    #[serde(default)]
    pub target_url: String,
    #[serde(default = "default_strategy")]
    pub generation_strategy: String,
}

#[derive(Deserialize)]
pub struct QuickGenerateQuery {
    pub user_query: String,
    pub target_url: String,
    pub captcha_selector: Option<String>,
    pub captcha_input_selector: Option<String>,
}

#[derive(Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub skip: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
    pub status: Option<String>,
}

fn default_strategy() -> String {
    "basic".to_string()
}

fn default_limit() -> usize {
    100
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct Store {
    next_id: i64,
    configs: BTreeMap<String, ConfigEntry>,
    scenarios: BTreeMap<i64, Scenario>,
    test_cases: BTreeMap<i64, TestCase>,
    reports: BTreeMap<i64, TestReport>,
    steps: BTreeMap<i64, Vec<StepResult>>,
}

impl Store {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    /// Insert or overwrite a configuration value.
    pub fn set_config(&mut self, key: &str, value: &str, config_type: &str) {
        let now = now();
        if let Some(entry) = self.configs.get_mut(key) {
            entry.config_value = Some(value.to_string());
            entry.updated_at = now;
            return;
        }
        let id = self.next_id();
        self.configs.insert(
            key.to_string(),
            ConfigEntry {
                id,
                config_key: key.to_string(),
                config_value: Some(value.to_string()),
                config_type: config_type.to_string(),
                description: None,
                is_encrypted: false,
                created_at: now,
                updated_at: now,
            },
        );
    }

    fn config_value(&self, key: &str) -> Option<&str> {
        self.configs
            .get(key)
            .and_then(|entry| entry.config_value.as_deref())
    }

    fn settings(&self) -> Value {
        let flag = |key: &str, default: bool| {
            self.config_value(key)
                .map(|v| v == "true")
                .unwrap_or(default)
        };
        json!({
            "target_url": self.config_value(TARGET_URL_KEY),
            "default_username": self.config_value("default_username"),
            "default_password": self.config_value("default_password"),
            "captcha_selector": self.config_value("captcha_selector"),
            "captcha_input_selector": self.config_value("captcha_input_selector"),
            "browser_headless": flag("browser_headless", true),
            "use_computer_use": flag("use_computer_use", false),
            "browser_timeout": self
                .config_value("browser_timeout")
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(30_000),
        })
    }

    fn cases_of(&self, scenario_id: i64) -> Vec<TestCase> {
        self.test_cases
            .values()
            .filter(|case| case.scenario_id == Some(scenario_id))
            .cloned()
            .collect()
    }

    /// Record a passed run of `case_id` and return the report.
    fn record_run(&mut self, case_id: i64, scenario_id: Option<i64>) -> Option<TestReport> {
        let report_id = self.next_id();
        let now = now();
        let case = self.test_cases.get_mut(&case_id)?;
        case.execution_count += 1;
        case.last_execution_at = Some(now);
        case.status = "completed".to_string();
        case.script
            .get_or_insert_with(|| format!("// script for {}", case.name));
        let actions = case.actions.clone().unwrap_or_default();

        let report = TestReport {
            id: report_id,
            test_case_id: case_id,
            scenario_id,
            status: "passed".to_string(),
            result: Some(format!("{} step(s) passed", actions.len())),
            error_message: None,
            execution_time: Some(0),
            screenshot_path: None,
            created_at: now,
        };
        self.reports.insert(report_id, report.clone());

        let mut steps = Vec::with_capacity(actions.len());
        for (index, action) in actions.into_iter().enumerate() {
            let step_id = self.next_id();
            steps.push(StepResult {
                id: step_id,
                test_report_id: report_id,
                step_number: index as u32 + 1,
                step_name: action,
                step_type: "action".to_string(),
                status: "passed".to_string(),
            });
        }
        self.steps.insert(report_id, steps);
        Some(report)
    }

    /// Remove a test case along with its reports and their step results.
    fn remove_case(&mut self, case_id: i64) -> Option<TestCase> {
        let case = self.test_cases.remove(&case_id)?;
        let report_ids: Vec<i64> = self
            .reports
            .values()
            .filter(|r| r.test_case_id == case_id)
            .map(|r| r.id)
            .collect();
        for report_id in report_ids {
            self.reports.remove(&report_id);
            self.steps.remove(&report_id);
        }
        Some(case)
    }

    /// Remove every test case generated for `scenario_id`.
    fn remove_cases_of(&mut self, scenario_id: i64) {
        let case_ids: Vec<i64> = self.cases_of(scenario_id).iter().map(|c| c.id).collect();
        for case_id in case_ids {
            self.remove_case(case_id);
        }
    }

    fn reports_where(&self, keep: impl Fn(&TestReport) -> bool) -> Vec<TestReport> {
        let mut reports: Vec<_> = self.reports.values().filter(|r| keep(r)).cloned().collect();
        reports.sort_by(|a, b| b.id.cmp(&a.id));
        reports
    }
}

pub type Db = Arc<RwLock<Store>>;

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

/// Canned actions for a natural-language query.
fn actions_for(user_query: &str, target_url: &str) -> Vec<String> {
    vec![
        format!("open {target_url}"),
        format!("perform: {user_query}"),
        "verify result".to_string(),
    ]
}

fn case_count(strategy: &str) -> Option<usize> {
    match strategy {
        "happy_path" => Some(1),
        "basic" => Some(3),
        "comprehensive" => Some(5),
        _ => None,
    }
}

const CASE_TYPES: &[&str] = &["positive", "negative", "boundary", "exception", "security"];

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error response in the backend's `{"detail": ...}` shape.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    fn not_found(what: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, format!("{what} not found"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, rejection.body_text())
    }
}

// ---------------------------------------------------------------------------
// Extractors
// ---------------------------------------------------------------------------

/// `Json` whose rejections render as `{"detail": ...}`.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

/// `Query` whose rejections render as `{"detail": ...}`.
pub struct QueryArgs<T>(pub T);

impl<S, T> FromRequestParts<S> for QueryArgs<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

/// `Path` whose rejections render as `{"detail": ...}`.
pub struct PathArgs<T>(pub T);

impl<S, T> FromRequestParts<S> for PathArgs<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn app() -> Router {
    app_with_store(Store::default())
}

/// Router over a pre-seeded store.
pub fn app_with_store(store: Store) -> Router {
    let db: Db = Arc::new(RwLock::new(store));
    let api = Router::new()
        .route("/configs/", get(list_configs))
        .route("/configs/settings", get(get_settings).put(update_settings))
        .route("/configs/{key}", get(get_config).put(update_config))
        .route("/scenarios/", get(list_scenarios).post(create_scenario))
        .route("/scenarios/quick-generate", post(quick_generate_scenario))
        .route(
            "/scenarios/{id}",
            get(get_scenario).put(update_scenario).delete(delete_scenario),
        )
        .route("/scenarios/{id}/generate", post(generate_scenario))
        .route("/scenarios/{id}/execute", post(execute_scenario))
        .route("/scenarios/{id}/cases", get(scenario_cases))
        .route("/scenarios/{id}/reports", get(scenario_reports))
        .route(
            "/scenarios/{id}/reports/{report_id}/steps",
            get(scenario_report_steps),
        )
        .route("/test-cases", get(list_test_cases).post(create_test_case))
        .route("/test-cases/quick-generate", post(quick_generate_test_case))
        .route(
            "/test-cases/quick-generate-with-captcha",
            post(quick_generate_with_captcha),
        )
        .route(
            "/test-cases/{id}",
            get(get_test_case).put(update_test_case).delete(delete_test_case),
        )
        .route("/test-cases/{id}/generate", post(generate_test_case))
        .route("/test-cases/{id}/execute", post(execute_test_case))
        .route("/test-cases/{id}/reports", get(test_case_reports))
        .route(
            "/test-cases/{id}/reports/{report_id}/steps",
            get(test_case_report_steps),
        )
        .with_state(db);

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock backend listening");
    }
    axum::serve(listener, app()).await
}

fn page<T>(items: impl Iterator<Item = T>, query: &ListQuery) -> Vec<T> {
    items.skip(query.skip).take(query.limit).collect()
}

// ---------------------------------------------------------------------------
// Configs
// ---------------------------------------------------------------------------

async fn list_configs(
    State(db): State<Db>,
    QueryArgs(query): QueryArgs<ListQuery>,
) -> Json<Vec<ConfigEntry>> {
    let store = db.read().await;
    Json(page(store.configs.values().cloned(), &query))
}

async fn get_settings(State(db): State<Db>) -> Json<Value> {
    Json(db.read().await.settings())
}

async fn update_settings(State(db): State<Db>, JsonBody(input): JsonBody<Settings>) -> Json<Value> {
    let mut store = db.write().await;
    let values = [
        input.target_url,
        input.default_username,
        input.default_password,
        input.captcha_selector,
        input.captcha_input_selector,
        input.browser_headless.map(|b| b.to_string()),
        input.use_computer_use.map(|b| b.to_string()),
        input.browser_timeout.map(|n| n.to_string()),
    ];
    let mut updated = 0;
    for ((key, config_type), value) in SETTINGS_KEYS.iter().zip(values) {
        if let Some(value) = value {
            store.set_config(key, &value, config_type);
            updated += 1;
        }
    }
    Json(json!({ "message": "settings updated", "updated": updated }))
}

async fn get_config(
    State(db): State<Db>,
    PathArgs(key): PathArgs<String>,
) -> ApiResult<Json<ConfigEntry>> {
    let store = db.read().await;
    store
        .configs
        .get(&key)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::not_found("config"))
}

async fn update_config(
    State(db): State<Db>,
    PathArgs(key): PathArgs<String>,
    JsonBody(input): JsonBody<ConfigUpdate>,
) -> ApiResult<Json<ConfigEntry>> {
    let mut store = db.write().await;
    let entry = store
        .configs
        .get_mut(&key)
        .ok_or_else(|| ApiError::not_found("config"))?;
    if let Some(value) = input.config_value {
        entry.config_value = Some(value);
    }
    if let Some(description) = input.description {
        entry.description = Some(description);
    }
    entry.updated_at = now();
    Ok(Json(entry.clone()))
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

async fn list_scenarios(
    State(db): State<Db>,
    QueryArgs(query): QueryArgs<ListQuery>,
) -> Json<Vec<Scenario>> {
    let store = db.read().await;
    let matching = store
        .scenarios
        .values()
        .rev()
        .filter(|s| query.status.as_deref().map_or(true, |status| s.status == status))
        .cloned();
    Json(page(matching, &query))
}

async fn create_scenario(
    State(db): State<Db>,
    JsonBody(input): JsonBody<CreateScenario>,
) -> Json<Scenario> {
    let mut store = db.write().await;
    let target_url = if input.target_url.is_empty() {
        store
            .config_value(TARGET_URL_KEY)
            .unwrap_or_default()
            .to_string()
    } else {
        input.target_url
    };
    let now = now();
    let scenario = Scenario {
        id: store.next_id(),
        name: input.name,
        description: input.description,
        target_url,
        user_query: input.user_query,
        generation_strategy: input.generation_strategy,
        total_cases: 0,
        status: "draft".to_string(),
        created_at: now,
        updated_at: now,
    };
    store.scenarios.insert(scenario.id, scenario.clone());
    Json(scenario)
}

async fn get_scenario(State(db): State<Db>, PathArgs(id): PathArgs<i64>) -> ApiResult<Json<Value>> {
    let store = db.read().await;
    let scenario = store
        .scenarios
        .get(&id)
        .ok_or_else(|| ApiError::not_found("scenario"))?;
    Ok(Json(with_cases(scenario, store.cases_of(id))))
}

fn with_cases(scenario: &Scenario, cases: Vec<TestCase>) -> Value {
    let mut value = json!(scenario);
    value["test_cases"] = json!(cases);
    value
}

async fn update_scenario(
    State(db): State<Db>,
    PathArgs(id): PathArgs<i64>,
    JsonBody(input): JsonBody<UpdateScenario>,
) -> ApiResult<Json<Scenario>> {
    let mut store = db.write().await;
    let scenario = store
        .scenarios
        .get_mut(&id)
        .ok_or_else(|| ApiError::not_found("scenario"))?;
    if let Some(name) = input.name {
        scenario.name = name;
    }
    if let Some(description) = input.description {
        scenario.description = Some(description);
    }
    if let Some(target_url) = input.target_url {
        scenario.target_url = target_url;
    }
    if let Some(user_query) = input.user_query {
        scenario.user_query = user_query;
    }
    if let Some(strategy) = input.generation_strategy {
        scenario.generation_strategy = strategy;
    }
    if let Some(status) = input.status {
        scenario.status = status;
    }
    scenario.updated_at = now();
    Ok(Json(scenario.clone()))
}

async fn delete_scenario(
    State(db): State<Db>,
    PathArgs(id): PathArgs<i64>,
) -> ApiResult<Json<Value>> {
    let mut store = db.write().await;
    store
        .scenarios
        .remove(&id)
        .ok_or_else(|| ApiError::not_found("scenario"))?;
    store.remove_cases_of(id);
    Ok(Json(json!({ "message": "scenario deleted" })))
}

/// Accepts the strategy from the query string or from a JSON body.
async fn generate_scenario(
    State(db): State<Db>,
    PathArgs(id): PathArgs<i64>,
    QueryArgs(query): QueryArgs<StrategyInput>,
    body: Result<Json<StrategyInput>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let from_body = match body {
        Ok(Json(input)) => input.generation_strategy,
        Err(JsonRejection::MissingJsonContentType(_)) => None,
        Err(rejection) => return Err(rejection.into()),
    };
    let mut store = db.write().await;
    let scenario = store
        .scenarios
        .get(&id)
        .cloned()
        .ok_or_else(|| ApiError::not_found("scenario"))?;

    let strategy = query
        .generation_strategy
        .or(from_body)
        .unwrap_or_else(|| scenario.generation_strategy.clone());
    let count = case_count(&strategy).ok_or_else(|| {
        ApiError::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("unknown generation strategy `{strategy}`"),
        )
    })?;

    store.remove_cases_of(id);

    let now = now();
    for index in 0..count {
        let case_type = CASE_TYPES[index % CASE_TYPES.len()];
        let user_query = format!("{} ({case_type})", scenario.user_query);
        let case = TestCase {
            id: store.next_id(),
            scenario_id: Some(id),
            name: format!("{} #{}", scenario.name, index + 1),
            description: None,
            target_url: scenario.target_url.clone(),
            actions: Some(actions_for(&user_query, &scenario.target_url)),
            user_query,
            test_data: None,
            expected_result: None,
            priority: if index == 0 { "P0" } else { "P1" }.to_string(),
            case_type: case_type.to_string(),
            status: "generated".to_string(),
            script: None,
            execution_count: 0,
            last_execution_at: None,
            created_at: now,
            updated_at: now,
        };
        store.test_cases.insert(case.id, case);
    }

    let scenario = store
        .scenarios
        .get_mut(&id)
        .ok_or_else(|| ApiError::not_found("scenario"))?;
    scenario.total_cases = count as u32;
    scenario.status = "generated".to_string();
    scenario.updated_at = now;
    let scenario = scenario.clone();
    Ok(Json(with_cases(&scenario, store.cases_of(id))))
}

async fn execute_scenario(
    State(db): State<Db>,
    PathArgs(id): PathArgs<i64>,
) -> ApiResult<Json<Value>> {
    let mut store = db.write().await;
    if !store.scenarios.contains_key(&id) {
        return Err(ApiError::not_found("scenario"));
    }
    let cases = store.cases_of(id);
    if cases.is_empty() {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            "scenario has no test cases",
        ));
    }

    let mut results = Vec::with_capacity(cases.len());
    for case in &cases {
        if let Some(report) = store.record_run(case.id, Some(id)) {
            results.push(json!({
                "test_case_id": case.id,
                "name": case.name,
                "status": "completed",
                "result": report.result,
            }));
        }
    }
    Ok(Json(json!({
        "message": format!("executed {} case(s)", results.len()),
        "total": cases.len(),
        "passed": results.len(),
        "failed": 0,
        "results": results,
    })))
}

async fn scenario_cases(State(db): State<Db>, PathArgs(id): PathArgs<i64>) -> Json<Vec<TestCase>> {
    Json(db.read().await.cases_of(id))
}

async fn scenario_reports(
    State(db): State<Db>,
    PathArgs(id): PathArgs<i64>,
) -> Json<Vec<TestReport>> {
    Json(db.read().await.reports_where(|r| r.scenario_id == Some(id)))
}

async fn scenario_report_steps(
    State(db): State<Db>,
    PathArgs((id, report_id)): PathArgs<(i64, i64)>,
) -> ApiResult<Json<Vec<StepResult>>> {
    let store = db.read().await;
    match store.reports.get(&report_id) {
        Some(report) if report.scenario_id == Some(id) => {
            Ok(Json(store.steps.get(&report_id).cloned().unwrap_or_default()))
        }
        _ => Err(ApiError::not_found("report")),
    }
}

async fn quick_generate_scenario(
    State(db): State<Db>,
    JsonBody(input): JsonBody<ScenarioQuickGenerate>,
) -> ApiResult<Json<Value>> {
    let store = db.read().await;
    let target_url = if input.target_url.is_empty() {
        store
            .config_value(TARGET_URL_KEY)
            .map(str::to_string)
            .ok_or_else(|| {
                ApiError::new(
                    StatusCode::BAD_REQUEST,
                    "no target URL in the request or the global configuration",
                )
            })?
    } else {
        input.target_url
    };
    let count = case_count(&input.generation_strategy).ok_or_else(|| {
        ApiError::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("unknown generation strategy `{}`", input.generation_strategy),
        )
    })?;

    let cases: Vec<Value> = (0..count)
        .map(|index| {
            let case_type = CASE_TYPES[index % CASE_TYPES.len()];
            json!({
                "name": format!("quick case #{}", index + 1),
                "description": input.user_query,
                "user_query": input.user_query,
                "priority": "P1",
                "case_type": case_type,
                "actions": actions_for(&input.user_query, &target_url),
                "status": "success",
            })
        })
        .collect();

    Ok(Json(json!({
        "scenario": {
            "name": "quick scenario",
            "description": input.user_query,
            "target_url": target_url,
            "generation_strategy": input.generation_strategy,
            "total_cases": count,
        },
        "test_cases": cases,
        "summary": { "total": count, "passed": count, "failed": 0 },
    })))
}

// ---------------------------------------------------------------------------
// Test cases
// ---------------------------------------------------------------------------

async fn list_test_cases(
    State(db): State<Db>,
    QueryArgs(query): QueryArgs<ListQuery>,
) -> Json<Vec<TestCase>> {
    let store = db.read().await;
    Json(page(store.test_cases.values().rev().cloned(), &query))
}

async fn create_test_case(
    State(db): State<Db>,
    JsonBody(input): JsonBody<CreateTestCase>,
) -> Json<TestCase> {
    let mut store = db.write().await;
    let now = now();
    let case = TestCase {
        id: store.next_id(),
        scenario_id: input.scenario_id,
        name: input.name,
        description: input.description,
        target_url: input.target_url,
        user_query: input.user_query,
        test_data: input.test_data,
        expected_result: input.expected_result,
        priority: "P1".to_string(),
        case_type: "positive".to_string(),
        status: "draft".to_string(),
        actions: None,
        script: None,
        execution_count: 0,
        last_execution_at: None,
        created_at: now,
        updated_at: now,
    };
    store.test_cases.insert(case.id, case.clone());
    Json(case)
}

async fn get_test_case(
    State(db): State<Db>,
    PathArgs(id): PathArgs<i64>,
) -> ApiResult<Json<TestCase>> {
    let store = db.read().await;
    store
        .test_cases
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::not_found("test case"))
}

async fn update_test_case(
    State(db): State<Db>,
    PathArgs(id): PathArgs<i64>,
    JsonBody(input): JsonBody<UpdateTestCase>,
) -> ApiResult<Json<TestCase>> {
    let mut store = db.write().await;
    let case = store
        .test_cases
        .get_mut(&id)
        .ok_or_else(|| ApiError::not_found("test case"))?;
    if let Some(name) = input.name {
        case.name = name;
    }
    if let Some(description) = input.description {
        case.description = Some(description);
    }
    if let Some(target_url) = input.target_url {
        case.target_url = target_url;
    }
    if let Some(user_query) = input.user_query {
        case.user_query = user_query;
    }
    if let Some(test_data) = input.test_data {
        case.test_data = Some(test_data);
    }
    if let Some(expected_result) = input.expected_result {
        case.expected_result = Some(expected_result);
    }
    if let Some(priority) = input.priority {
        case.priority = priority;
    }
    if let Some(case_type) = input.case_type {
        case.case_type = case_type;
    }
    if let Some(status) = input.status {
        case.status = status;
    }
    case.updated_at = now();
    Ok(Json(case.clone()))
}

async fn delete_test_case(
    State(db): State<Db>,
    PathArgs(id): PathArgs<i64>,
) -> ApiResult<Json<Value>> {
    let mut store = db.write().await;
    store
        .remove_case(id)
        .ok_or_else(|| ApiError::not_found("test case"))?;
    Ok(Json(json!({ "message": "test case deleted" })))
}

async fn generate_test_case(
    State(db): State<Db>,
    PathArgs(id): PathArgs<i64>,
) -> ApiResult<Json<Value>> {
    let mut store = db.write().await;
    let case = store
        .test_cases
        .get_mut(&id)
        .ok_or_else(|| ApiError::not_found("test case"))?;
    let actions = actions_for(&case.user_query, &case.target_url);
    case.actions = Some(actions.clone());
    case.status = "generated".to_string();
    case.updated_at = now();
    Ok(Json(json!({ "message": "test case generated", "actions": actions })))
}

async fn execute_test_case(
    State(db): State<Db>,
    PathArgs(id): PathArgs<i64>,
) -> ApiResult<Json<Value>> {
    let mut store = db.write().await;
    let report = store
        .record_run(id, None)
        .ok_or_else(|| ApiError::not_found("test case"))?;
    Ok(Json(json!({
        "message": "test case executed",
        "report_id": report.id,
        "status": report.status,
        "result": report.result,
    })))
}

async fn test_case_reports(
    State(db): State<Db>,
    PathArgs(id): PathArgs<i64>,
) -> Json<Vec<TestReport>> {
    Json(db.read().await.reports_where(|r| r.test_case_id == id))
}

async fn test_case_report_steps(
    State(db): State<Db>,
    PathArgs((id, report_id)): PathArgs<(i64, i64)>,
) -> ApiResult<Json<Vec<StepResult>>> {
    let store = db.read().await;
    match store.reports.get(&report_id) {
        Some(report) if report.test_case_id == id => {
            Ok(Json(store.steps.get(&report_id).cloned().unwrap_or_default()))
        }
        _ => Err(ApiError::not_found("report")),
    }
}

async fn quick_generate_test_case(QueryArgs(query): QueryArgs<QuickGenerateQuery>) -> Json<Value> {
    Json(json!({
        "status": "success",
        "user_query": query.user_query,
        "target_url": query.target_url,
        "actions": actions_for(&query.user_query, &query.target_url),
    }))
}

async fn quick_generate_with_captcha(
    QueryArgs(query): QueryArgs<QuickGenerateQuery>,
) -> Json<Value> {
    Json(json!({
        "status": "success",
        "user_query": query.user_query,
        "target_url": query.target_url,
        "captcha_selector": query.captcha_selector,
        "captcha_input_selector": query.captcha_input_selector,
        "actions": actions_for(&query.user_query, &query.target_url),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_count_follows_strategy() {
        assert_eq!(case_count("happy_path"), Some(1));
        assert_eq!(case_count("basic"), Some(3));
        assert_eq!(case_count("comprehensive"), Some(5));
        assert_eq!(case_count("boundary-value"), None);
    }

    #[test]
    fn settings_fall_back_to_defaults() {
        let settings = Store::default().settings();
        assert_eq!(settings["browser_headless"], true);
        assert_eq!(settings["use_computer_use"], false);
        assert_eq!(settings["browser_timeout"], 30_000);
        assert!(settings["target_url"].is_null());
        assert!(settings["captcha_selector"].is_null());
        assert!(settings["captcha_input_selector"].is_null());
    }

    #[test]
    fn set_config_overwrites_existing_value() {
        let mut store = Store::default();
        store.set_config("browser_timeout", "1000", "number");
        store.set_config("browser_timeout", "2000", "number");
        assert_eq!(store.configs.len(), 1);
        assert_eq!(store.settings()["browser_timeout"], 2000);
    }

    #[test]
    fn create_scenario_input_defaults_strategy() {
        let input: CreateScenario =
            serde_json::from_str(r#"{"name":"Login","user_query":"log in"}"#).unwrap();
        assert_eq!(input.generation_strategy, "basic");
        assert!(input.target_url.is_empty());
    }

    fn case(id: i64, scenario_id: Option<i64>) -> TestCase {
        let now = now();
        TestCase {
            id,
            scenario_id,
            name: "case".to_string(),
            description: None,
            target_url: "https://example.com".to_string(),
            user_query: "q".to_string(),
            test_data: None,
            expected_result: None,
            priority: "P1".to_string(),
            case_type: "positive".to_string(),
            status: "generated".to_string(),
            actions: Some(vec!["a".to_string(), "b".to_string()]),
            script: None,
            execution_count: 0,
            last_execution_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn record_run_bumps_execution_count() {
        let mut store = Store::default();
        store.test_cases.insert(1, case(1, None));
        store.next_id = 1;
        let report = store.record_run(1, None).unwrap();
        assert_eq!(store.test_cases[&1].execution_count, 1);
        assert_eq!(store.steps[&report.id].len(), 2);
        assert!(store.record_run(99, None).is_none());
    }

    #[test]
    fn remove_case_drops_reports_and_steps() {
        let mut store = Store::default();
        store.test_cases.insert(1, case(1, Some(7)));
        store.test_cases.insert(2, case(2, Some(7)));
        store.next_id = 2;
        let first = store.record_run(1, Some(7)).unwrap();
        let second = store.record_run(2, Some(7)).unwrap();

        assert!(store.remove_case(1).is_some());
        assert!(!store.reports.contains_key(&first.id));
        assert!(!store.steps.contains_key(&first.id));
        assert!(store.reports.contains_key(&second.id));
        assert!(store.remove_case(1).is_none());

        store.remove_cases_of(7);
        assert!(store.test_cases.is_empty());
        assert!(store.reports.is_empty());
        assert!(store.steps.is_empty());
    }
}
