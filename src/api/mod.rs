//! This module defines the REST client and the traits commands depend on. Commands never hold the
//! client directly; they hold per-capability traits so external calls can be mocked and
//! substituted in tests, keeping command logic decoupled from the transport.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::debug;
use url::Url;

use crate::models::{App, CatalogItem, Job, NamedRef};
use crate::option_types::{FieldDescriptor, SelectOption};

pub mod sources;

#[cfg(test)]
pub use mocks::*;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Failed to reach the API: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("API request failed ({status}): {message}")]
    Status { status: StatusCode, message: String },
    #[error("Failed to decode API response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Invalid API URL: {0}")]
    Url(#[from] url::ParseError),
}

/// JSON client for the management API, authenticating with a bearer token.
///
/// Cloning is cheap and clones share the underlying connection pool.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    token: String,
}

impl ApiClient {
    pub fn new(mut base_url: Url, token: impl Into<String>) -> Result<Self, ApiError> {
        // Joining relative endpoint paths drops the last path segment unless
        // the base ends with a slash.
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("stratus-cli/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url,
            token: token.into(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(path)?)
    }

    async fn execute(&self, request: reqwest::RequestBuilder) -> Result<Value, ApiError> {
        let response = request
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        debug!(%status, "api response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status,
                message: status_message(&body),
            });
        }

        if status == StatusCode::NO_CONTENT {
            return Ok(Value::Null);
        }

        Ok(response.json().await?)
    }

    async fn get(&self, path: &str, query: &[(String, String)]) -> Result<Value, ApiError> {
        let url = self.endpoint(path)?;
        debug!(%url, "GET");
        self.execute(self.http.get(url).query(query)).await
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        let url = self.endpoint(path)?;
        debug!(%url, "POST");
        self.execute(self.http.post(url).json(body)).await
    }

    async fn put(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        let url = self.endpoint(path)?;
        debug!(%url, "PUT");
        self.execute(self.http.put(url).json(body)).await
    }

    async fn delete(&self, path: &str) -> Result<Value, ApiError> {
        let url = self.endpoint(path)?;
        debug!(%url, "DELETE");
        self.execute(self.http.delete(url)).await
    }

    /// Fetch name/value pairs from one of the `api/options/...` endpoints.
    pub async fn select_options(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<Vec<SelectOption>, ApiError> {
        let body = self.get(path, query).await?;
        decode_field(&body, "data")
    }
}

/// Pull the human-readable message out of an error body, falling back to the
/// raw text when the body is not the usual JSON envelope.
fn status_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            ["msg", "error", "message"]
                .into_iter()
                .find_map(|key| value.get(key).and_then(Value::as_str).map(str::to_string))
        })
        .unwrap_or_else(|| body.trim().to_string())
}

fn decode_field<T: DeserializeOwned>(body: &Value, key: &str) -> Result<T, ApiError> {
    Ok(serde_json::from_value(
        body.get(key).cloned().unwrap_or(Value::Null),
    )?)
}

// Dependency to list applications
#[async_trait]
pub trait AppLister {
    async fn list_apps(&self) -> Result<Vec<App>, ApiError>;
}

#[async_trait]
impl AppLister for ApiClient {
    async fn list_apps(&self) -> Result<Vec<App>, ApiError> {
        let body = self.get("api/apps", &[]).await?;
        decode_field(&body, "apps")
    }
}

#[async_trait]
pub trait AppCreator {
    async fn create_app(&self, app: &Value) -> Result<App, ApiError>;
}

#[async_trait]
impl AppCreator for ApiClient {
    async fn create_app(&self, app: &Value) -> Result<App, ApiError> {
        let body = self.post("api/apps", &json!({ "app": app })).await?;
        decode_field(&body, "app")
    }
}

#[async_trait]
pub trait AppUpdater {
    async fn update_app(&self, id: i64, app: &Value) -> Result<App, ApiError>;
}

#[async_trait]
impl AppUpdater for ApiClient {
    async fn update_app(&self, id: i64, app: &Value) -> Result<App, ApiError> {
        let body = self
            .put(&format!("api/apps/{id}"), &json!({ "app": app }))
            .await?;
        decode_field(&body, "app")
    }
}

#[async_trait]
pub trait AppDeleter {
    async fn delete_app(&self, id: i64) -> Result<(), ApiError>;
}

#[async_trait]
impl AppDeleter for ApiClient {
    async fn delete_app(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("api/apps/{id}")).await?;
        Ok(())
    }
}

// Dependency to list catalog items
#[async_trait]
pub trait CatalogItemLister {
    async fn list_catalog_items(&self) -> Result<Vec<CatalogItem>, ApiError>;
}

#[async_trait]
impl CatalogItemLister for ApiClient {
    async fn list_catalog_items(&self) -> Result<Vec<CatalogItem>, ApiError> {
        let body = self.get("api/catalog-items", &[]).await?;
        decode_field(&body, "catalogItems")
    }
}

#[async_trait]
pub trait CatalogItemCreator {
    async fn create_catalog_item(&self, item: &Value) -> Result<CatalogItem, ApiError>;
}

#[async_trait]
impl CatalogItemCreator for ApiClient {
    async fn create_catalog_item(&self, item: &Value) -> Result<CatalogItem, ApiError> {
        let body = self
            .post("api/catalog-items", &json!({ "catalogItem": item }))
            .await?;
        decode_field(&body, "catalogItem")
    }
}

#[async_trait]
pub trait CatalogItemDeleter {
    async fn delete_catalog_item(&self, id: i64) -> Result<(), ApiError>;
}

#[async_trait]
impl CatalogItemDeleter for ApiClient {
    async fn delete_catalog_item(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("api/catalog-items/{id}")).await?;
        Ok(())
    }
}

// Dependency to list jobs
#[async_trait]
pub trait JobLister {
    async fn list_jobs(&self) -> Result<Vec<Job>, ApiError>;
}

#[async_trait]
impl JobLister for ApiClient {
    async fn list_jobs(&self) -> Result<Vec<Job>, ApiError> {
        let body = self.get("api/jobs", &[]).await?;
        decode_field(&body, "jobs")
    }
}

#[async_trait]
pub trait JobCreator {
    async fn create_job(&self, job: &Value) -> Result<Job, ApiError>;
}

#[async_trait]
impl JobCreator for ApiClient {
    async fn create_job(&self, job: &Value) -> Result<Job, ApiError> {
        let body = self.post("api/jobs", &json!({ "job": job })).await?;
        decode_field(&body, "job")
    }
}

// Dependency to discover job types and their declared option types
#[async_trait]
pub trait JobTypeOptionFetcher {
    async fn list_job_types(&self) -> Result<Vec<NamedRef>, ApiError>;

    /// Returns the option-type descriptors a job of this type prompts for.
    /// A job type without custom options yields an empty list.
    async fn job_type_option_types(
        &self,
        job_type_id: i64,
    ) -> Result<Vec<FieldDescriptor>, ApiError>;
}

#[async_trait]
impl JobTypeOptionFetcher for ApiClient {
    async fn list_job_types(&self) -> Result<Vec<NamedRef>, ApiError> {
        let body = self.get("api/job-types", &[]).await?;
        decode_field(&body, "jobTypes")
    }

    async fn job_type_option_types(
        &self,
        job_type_id: i64,
    ) -> Result<Vec<FieldDescriptor>, ApiError> {
        let body = self.get(&format!("api/job-types/{job_type_id}"), &[]).await?;
        Ok(serde_json::from_value(
            body.pointer("/jobType/optionTypes")
                .cloned()
                .unwrap_or_else(|| Value::Array(Vec::new())),
        )?)
    }
}


#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn client() -> ApiClient {
        ApiClient::new(
            Url::parse("https://stratus.example.com/base").expect("url should parse"),
            "token",
        )
        .expect("client should build")
    }

    #[test]
    fn test_endpoint_joins_relative_to_the_base_path() {
        let url = client().endpoint("api/apps").expect("endpoint should join");
        assert_eq!(url.as_str(), "https://stratus.example.com/base/api/apps");
    }

    #[test]
    fn test_status_message_prefers_the_json_envelope() {
        assert_eq!(
            status_message(r#"{"success":false,"msg":"app not found"}"#),
            "app not found"
        );
        assert_eq!(
            status_message(r#"{"error":"invalid token"}"#),
            "invalid token"
        );
        assert_eq!(status_message("502 Bad Gateway\n"), "502 Bad Gateway");
    }

    #[test]
    fn test_decode_field_reports_a_missing_key() {
        let body = json!({"apps": []});
        let result: Result<Vec<App>, ApiError> = decode_field(&body, "jobs");

        assert!(matches!(result, Err(ApiError::Decode(_))));
    }

    #[test]
    fn test_decode_field_extracts_the_named_list() {
        let body = json!({
            "data": [
                {"name": "Ops", "value": 4},
                {"name": "Platform"}
            ]
        });

        let options: Vec<SelectOption> = decode_field(&body, "data").expect("options should decode");

        assert_eq!(options.len(), 2);
        assert_eq!(options[1].submit_value(), json!("Platform"));
    }
}
