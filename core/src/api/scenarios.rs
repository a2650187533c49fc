use serde::Serialize;
use serde_json::{json, Value};

use super::json_body;
use crate::client::TestHubClient;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest};
use crate::query::QueryParams;
use crate::transport::Transport;
use crate::types::ResourceId;

/// Test scenarios and their generation/execution actions.
#[derive(Debug)]
pub struct ScenariosApi<'a, T> {
    client: &'a TestHubClient<T>,
}

impl<'a, T> ScenariosApi<'a, T> {
    pub(crate) fn new(client: &'a TestHubClient<T>) -> Self {
        Self { client }
    }

    pub fn build_list(&self, params: Option<&QueryParams>) -> HttpRequest {
        HttpRequest::new(HttpMethod::Get, self.client.endpoint("/scenarios/"))
            .with_query(params.cloned().unwrap_or_default())
    }

    pub fn build_get_detail(&self, id: impl Into<ResourceId>) -> HttpRequest {
        HttpRequest::new(HttpMethod::Get, self.item(&id.into(), ""))
    }

    pub fn build_create<P: Serialize + ?Sized>(&self, data: &P) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest::new(HttpMethod::Post, self.client.endpoint("/scenarios/")).with_json(json_body(data)?))
    }

    pub fn build_update<P: Serialize + ?Sized>(
        &self,
        id: impl Into<ResourceId>,
        data: &P,
    ) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest::new(HttpMethod::Put, self.item(&id.into(), "")).with_json(json_body(data)?))
    }

    pub fn build_delete(&self, id: impl Into<ResourceId>) -> HttpRequest {
        HttpRequest::new(HttpMethod::Delete, self.item(&id.into(), ""))
    }

    /// The strategy is sent as-is under `generation_strategy`.
    pub fn build_generate<S: Serialize + ?Sized>(
        &self,
        id: impl Into<ResourceId>,
        strategy: &S,
    ) -> Result<HttpRequest, ApiError> {
        let body = json!({ "generation_strategy": json_body(strategy)? });
        Ok(HttpRequest::new(HttpMethod::Post, self.item(&id.into(), "/generate")).with_json(body))
    }

    pub fn build_execute(&self, id: impl Into<ResourceId>) -> HttpRequest {
        HttpRequest::new(HttpMethod::Post, self.item(&id.into(), "/execute"))
    }

    pub fn build_get_cases(&self, id: impl Into<ResourceId>) -> HttpRequest {
        HttpRequest::new(HttpMethod::Get, self.item(&id.into(), "/cases"))
    }

    pub fn build_get_reports(&self, id: impl Into<ResourceId>) -> HttpRequest {
        HttpRequest::new(HttpMethod::Get, self.item(&id.into(), "/reports"))
    }

    pub fn build_get_report_steps(
        &self,
        id: impl Into<ResourceId>,
        report_id: impl Into<ResourceId>,
    ) -> HttpRequest {
        let suffix = format!("/reports/{}/steps", report_id.into().to_path_segment());
        HttpRequest::new(HttpMethod::Get, self.item(&id.into(), &suffix))
    }

    /// Create-and-generate in one call; the payload travels as the body.
    pub fn build_quick_generate<P: Serialize + ?Sized>(&self, data: &P) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest::new(HttpMethod::Post, self.client.endpoint("/scenarios/quick-generate"))
            .with_json(json_body(data)?))
    }

    fn item(&self, id: &ResourceId, suffix: &str) -> String {
        self.client
            .endpoint(&format!("/scenarios/{}{suffix}", id.to_path_segment()))
    }
}

impl<T: Transport> ScenariosApi<'_, T> {
    pub async fn list(&self, params: Option<&QueryParams>) -> Result<Value, ApiError> {
        self.client.dispatch(self.build_list(params)).await
    }

    pub async fn get_detail(&self, id: impl Into<ResourceId>) -> Result<Value, ApiError> {
        self.client.dispatch(self.build_get_detail(id)).await
    }

    pub async fn create<P: Serialize + ?Sized>(&self, data: &P) -> Result<Value, ApiError> {
        let request = self.build_create(data)?;
        self.client.dispatch(request).await
    }

    pub async fn update<P: Serialize + ?Sized>(&self, id: impl Into<ResourceId>, data: &P) -> Result<Value, ApiError> {
        let request = self.build_update(id, data)?;
        self.client.dispatch(request).await
    }

    pub async fn delete(&self, id: impl Into<ResourceId>) -> Result<Value, ApiError> {
        self.client.dispatch(self.build_delete(id)).await
    }

    pub async fn generate<S: Serialize + ?Sized>(
        &self,
        id: impl Into<ResourceId>,
        strategy: &S,
    ) -> Result<Value, ApiError> {
        let request = self.build_generate(id, strategy)?;
        self.client.dispatch(request).await
    }

    pub async fn execute(&self, id: impl Into<ResourceId>) -> Result<Value, ApiError> {
        self.client.dispatch(self.build_execute(id)).await
    }

    pub async fn get_cases(&self, id: impl Into<ResourceId>) -> Result<Value, ApiError> {
        self.client.dispatch(self.build_get_cases(id)).await
    }

    pub async fn get_reports(&self, id: impl Into<ResourceId>) -> Result<Value, ApiError> {
        self.client.dispatch(self.build_get_reports(id)).await
    }

    pub async fn get_report_steps(
        &self,
        id: impl Into<ResourceId>,
        report_id: impl Into<ResourceId>,
    ) -> Result<Value, ApiError> {
        self.client
            .dispatch(self.build_get_report_steps(id, report_id))
            .await
    }

    pub async fn quick_generate<P: Serialize + ?Sized>(&self, data: &P) -> Result<Value, ApiError> {
        let request = self.build_quick_generate(data)?;
        self.client.dispatch(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::RecordingTransport;
    use crate::types::{GenerationStrategy, ScenarioCreate};

    const BASE: &str = "http://localhost:8000/api";

    fn client() -> TestHubClient<RecordingTransport> {
        TestHubClient::new(BASE, RecordingTransport::replying(200, "{}"))
    }

    #[test]
    fn build_generate_matches_example() {
        let req = client().scenarios().build_generate(42, "boundary-value").unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:8000/api/scenarios/42/generate");
        assert_eq!(req.body, Some(json!({"generation_strategy": "boundary-value"})));
    }

    #[test]
    fn build_generate_keeps_strategy_shape() {
        let strategy = json!({"mode": "pairwise", "depth": 2});
        let req = client().scenarios().build_generate(1, &strategy).unwrap();
        assert_eq!(req.body, Some(json!({"generation_strategy": strategy})));

        let req = client()
            .scenarios()
            .build_generate(1, &GenerationStrategy::Comprehensive)
            .unwrap();
        assert_eq!(req.body, Some(json!({"generation_strategy": "comprehensive"})));
    }

    #[test]
    fn build_create_posts_to_collection() {
        let input = ScenarioCreate {
            name: "Login".to_string(),
            description: None,
            target_url: String::new(),
            user_query: "log in with valid credentials".to_string(),
            generation_strategy: GenerationStrategy::Basic,
        };
        let req = client().scenarios().build_create(&input).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:8000/api/scenarios/");
        let body = req.body.unwrap();
        assert_eq!(body["name"], "Login");
        assert_eq!(body["generation_strategy"], "basic");
        assert!(body.get("description").is_none());
    }

    #[test]
    fn build_execute_has_no_body() {
        let req = client().scenarios().build_execute(7);
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:8000/api/scenarios/7/execute");
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn build_sub_collections() {
        let api_client = client();
        let api = api_client.scenarios();
        assert_eq!(api.build_get_cases(3).path, "http://localhost:8000/api/scenarios/3/cases");
        assert_eq!(api.build_get_reports(3).path, "http://localhost:8000/api/scenarios/3/reports");
        assert_eq!(
            api.build_get_report_steps(3, 9).path,
            "http://localhost:8000/api/scenarios/3/reports/9/steps"
        );
    }

    #[test]
    fn build_get_detail_is_idempotent() {
        let api_client = client();
        let api = api_client.scenarios();
        assert_eq!(api.build_get_detail(5), api.build_get_detail(5));
    }

    #[test]
    fn build_quick_generate_sends_body() {
        let payload = json!({"user_query": "search", "target_url": "https://example.com"});
        let req = client().scenarios().build_quick_generate(&payload).unwrap();
        assert_eq!(req.path, "http://localhost:8000/api/scenarios/quick-generate");
        assert!(req.query.is_empty());
        assert_eq!(req.body, Some(payload));
    }

    #[tokio::test]
    async fn delete_dispatches_delete() {
        let client = TestHubClient::new(BASE, RecordingTransport::replying(200, r#"{"message":"deleted"}"#));
        let value = client.scenarios().delete(11).await.unwrap();
        assert_eq!(value["message"], "deleted");
        let sent = client.transport().last();
        assert_eq!(sent.method, HttpMethod::Delete);
        assert_eq!(sent.path, "http://localhost:8000/api/scenarios/11");
    }

    #[tokio::test]
    async fn generate_passes_transport_error_through() {
        let err = ApiError::Transport("timed out".to_string());
        let client = TestHubClient::new(BASE, RecordingTransport::failing(err.clone()));
        let got = client.scenarios().generate(42, "basic").await.unwrap_err();
        assert_eq!(got, err);
    }
}
