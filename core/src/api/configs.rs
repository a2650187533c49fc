use serde::Serialize;
use serde_json::Value;

use super::json_body;
use crate::client::TestHubClient;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest};
use crate::query::QueryParams;
use crate::transport::Transport;
use crate::types::ResourceId;

/// Configuration entries and the global settings singleton.
#[derive(Debug)]
pub struct ConfigsApi<'a, T> {
    client: &'a TestHubClient<T>,
}

impl<'a, T> ConfigsApi<'a, T> {
    pub(crate) fn new(client: &'a TestHubClient<T>) -> Self {
        Self { client }
    }

    pub fn build_list(&self, params: Option<&QueryParams>) -> HttpRequest {
        HttpRequest::new(HttpMethod::Get, self.client.endpoint("/configs/"))
            .with_query(params.cloned().unwrap_or_default())
    }

    pub fn build_get_settings(&self) -> HttpRequest {
        HttpRequest::new(HttpMethod::Get, self.client.endpoint("/configs/settings"))
    }

    pub fn build_update_settings<P: Serialize + ?Sized>(&self, settings: &P) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest::new(HttpMethod::Put, self.client.endpoint("/configs/settings"))
            .with_json(json_body(settings)?))
    }

    pub fn build_get_config(&self, key: impl Into<ResourceId>) -> HttpRequest {
        HttpRequest::new(HttpMethod::Get, self.item(&key.into()))
    }

    pub fn build_update_config<P: Serialize + ?Sized>(
        &self,
        key: impl Into<ResourceId>,
        data: &P,
    ) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest::new(HttpMethod::Put, self.item(&key.into())).with_json(json_body(data)?))
    }

    fn item(&self, key: &ResourceId) -> String {
        self.client
            .endpoint(&format!("/configs/{}", key.to_path_segment()))
    }
}

impl<T: Transport> ConfigsApi<'_, T> {
    pub async fn list(&self, params: Option<&QueryParams>) -> Result<Value, ApiError> {
        self.client.dispatch(self.build_list(params)).await
    }

    pub async fn get_settings(&self) -> Result<Value, ApiError> {
        self.client.dispatch(self.build_get_settings()).await
    }

    pub async fn update_settings<P: Serialize + ?Sized>(&self, settings: &P) -> Result<Value, ApiError> {
        let request = self.build_update_settings(settings)?;
        self.client.dispatch(request).await
    }

    pub async fn get_config(&self, key: impl Into<ResourceId>) -> Result<Value, ApiError> {
        self.client.dispatch(self.build_get_config(key)).await
    }

    pub async fn update_config<P: Serialize + ?Sized>(
        &self,
        key: impl Into<ResourceId>,
        data: &P,
    ) -> Result<Value, ApiError> {
        let request = self.build_update_config(key, data)?;
        self.client.dispatch(request).await
    }
}
