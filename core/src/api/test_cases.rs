use serde::Serialize;
use serde_json::Value;

use super::json_body;
use crate::client::TestHubClient;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest};
use crate::query::QueryParams;
use crate::transport::Transport;
use crate::types::ResourceId;

/// Test cases, their actions and the quick-generate workflows.
///
/// Unlike the scenario workflow, both quick-generate variants carry all of
/// their input in the query string and send no body.
#[derive(Debug)]
pub struct TestCasesApi<'a, T> {
    client: &'a TestHubClient<T>,
}

impl<'a, T> TestCasesApi<'a, T> {
    pub(crate) fn new(client: &'a TestHubClient<T>) -> Self {
        Self { client }
    }

    pub fn build_list(&self, params: Option<&QueryParams>) -> HttpRequest {
        HttpRequest::new(HttpMethod::Get, self.client.endpoint("/test-cases"))
            .with_query(params.cloned().unwrap_or_default())
    }

    pub fn build_get_detail(&self, id: impl Into<ResourceId>) -> HttpRequest {
        HttpRequest::new(HttpMethod::Get, self.item(&id.into(), ""))
    }

    pub fn build_create<P: Serialize + ?Sized>(&self, data: &P) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest::new(HttpMethod::Post, self.client.endpoint("/test-cases")).with_json(json_body(data)?))
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

    pub fn build_generate(&self, id: impl Into<ResourceId>) -> HttpRequest {
        HttpRequest::new(HttpMethod::Post, self.item(&id.into(), "/generate"))
    }

    pub fn build_execute(&self, id: impl Into<ResourceId>) -> HttpRequest {
        HttpRequest::new(HttpMethod::Post, self.item(&id.into(), "/execute"))
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

    pub fn build_quick_generate(&self, params: &QueryParams) -> HttpRequest {
        HttpRequest::new(HttpMethod::Post, self.client.endpoint("/test-cases/quick-generate"))
            .with_query(params.clone())
    }

    /// Same workflow as `build_quick_generate`, for targets guarded by a
    /// captcha; selectors travel as query parameters.
    pub fn build_quick_generate_with_captcha(&self, params: &QueryParams) -> HttpRequest {
        HttpRequest::new(
            HttpMethod::Post,
            self.client.endpoint("/test-cases/quick-generate-with-captcha"),
        )
        .with_query(params.clone())
    }

    fn item(&self, id: &ResourceId, suffix: &str) -> String {
        self.client
            .endpoint(&format!("/test-cases/{}{suffix}", id.to_path_segment()))
    }
}

impl<T: Transport> TestCasesApi<'_, T> {
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

    pub async fn generate(&self, id: impl Into<ResourceId>) -> Result<Value, ApiError> {
        self.client.dispatch(self.build_generate(id)).await
    }

    pub async fn execute(&self, id: impl Into<ResourceId>) -> Result<Value, ApiError> {
        self.client.dispatch(self.build_execute(id)).await
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

    pub async fn quick_generate(&self, params: &QueryParams) -> Result<Value, ApiError> {
        self.client.dispatch(self.build_quick_generate(params)).await
    }

    pub async fn quick_generate_with_captcha(&self, params: &QueryParams) -> Result<Value, ApiError> {
        self.client
            .dispatch(self.build_quick_generate_with_captcha(params))
            .await
    }
}
