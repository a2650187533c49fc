//! Identifiers and DTOs for the testhub API.
//!
//! # Design
//! The façade forwards payloads verbatim and accepts any `Serialize` value,
//! so nothing here is mandatory. These types mirror the backend's schemas for
//! callers that want typed payloads and typed results
//! (`serde_json::from_value::<Scenario>(..)`). They are defined independently
//! from the mock-server crate; integration tests catch schema drift.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Opaque key naming one resource instance: a config key or a numeric id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceId {
    Int(i64),
    Key(String),
}

impl ResourceId {
    /// Percent-encoded form for use as a single path segment.
    pub fn to_path_segment(&self) -> String {
        match self {
            ResourceId::Int(n) => n.to_string(),
            ResourceId::Key(k) => urlencoding::encode(k).into_owned(),
        }
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceId::Int(n) => write!(f, "{n}"),
            ResourceId::Key(k) => f.write_str(k),
        }
    }
}

impl From<i64> for ResourceId {
    fn from(n: i64) -> Self {
        ResourceId::Int(n)
    }
}

impl From<i32> for ResourceId {
    fn from(n: i32) -> Self {
        ResourceId::Int(n.into())
    }
}

impl From<u32> for ResourceId {
    fn from(n: u32) -> Self {
        ResourceId::Int(n.into())
    }
}

impl From<&str> for ResourceId {
    fn from(k: &str) -> Self {
        ResourceId::Key(k.to_string())
    }
}

impl From<String> for ResourceId {
    fn from(k: String) -> Self {
        ResourceId::Key(k)
    }
}

impl From<&ResourceId> for ResourceId {
    fn from(id: &ResourceId) -> Self {
        id.clone()
    }
}

/// How the backend should synthesize cases for a scenario.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStrategy {
    HappyPath,
    #[default]
    Basic,
    Comprehensive,
}

/// Filters accepted by the list endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Only honoured by the scenario list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// A single stored configuration entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConfigEntry {
    pub id: i64,
    pub config_key: String,
    pub config_value: Option<String>,
    pub config_type: String,
    pub description: Option<String>,
    #[serde(default)]
    pub is_encrypted: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Partial update of one configuration entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The singleton settings view over the well-known configuration keys.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GlobalSettings {
    pub target_url: Option<String>,
    pub default_username: Option<String>,
    pub default_password: Option<String>,
    #[serde(default = "empty_selector")]
    pub captcha_selector: Option<String>,
    #[serde(default = "empty_selector")]
    pub captcha_input_selector: Option<String>,
    #[serde(default = "default_true")]
    pub browser_headless: bool,
    #[serde(default)]
    pub use_computer_use: bool,
    #[serde(default = "default_browser_timeout")]
    pub browser_timeout: u32,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            target_url: None,
            default_username: None,
            default_password: None,
            captcha_selector: empty_selector(),
            captcha_input_selector: empty_selector(),
            browser_headless: true,
            use_computer_use: false,
            browser_timeout: default_browser_timeout(),
        }
    }
}

/// Captcha selectors default to empty when the field is absent.
fn empty_selector() -> Option<String> {
    Some(String::new())
}

fn default_true() -> bool {
    true
}

fn default_browser_timeout() -> u32 {
    30_000
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioCreate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Empty means "use the configured target URL".
    #[serde(default)]
    pub target_url: String,
    pub user_query: String,
    #[serde(default)]
    pub generation_strategy: GenerationStrategy,
}

/// Only the fields present in the JSON are applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScenarioUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_strategy: Option<GenerationStrategy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub target_url: String,
    pub user_query: String,
    pub generation_strategy: GenerationStrategy,
    pub total_cases: u32,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Scenario detail, including the cases generated for it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScenarioWithCases {
    #[serde(flatten)]
    pub scenario: Scenario,
    #[serde(default)]
    pub test_cases: Vec<TestCase>,
}

/// Body of the scenario quick-generate workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioQuickGenerate {
    pub user_query: String,
    #[serde(default)]
    pub target_url: String,
    #[serde(default)]
    pub generation_strategy: GenerationStrategy,
    #[serde(default)]
    pub auto_detect_captcha: bool,
}

// ---------------------------------------------------------------------------
// Test cases
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCaseCreate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub target_url: String,
    pub user_query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scenario_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TestCaseUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
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

/// Query of the test-case quick-generate workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuickGenerateParams {
    pub user_query: String,
    pub target_url: String,
}

/// Query of the captcha-aware quick-generate workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptchaQuickGenerateParams {
    pub user_query: String,
    pub target_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub captcha_selector: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub captcha_input_selector: Option<String>,
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
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
