use std::sync::Arc;

use anyhow::{Context, Result};
use url::Url;

use crate::api::ApiClient;
use crate::args::GlobalArgs;

/// Construction hook for commands that need a connected API client.
pub trait TryFromWithApiClient<T>: Sized {
    fn try_from_with_api_client(value: T, client: Arc<ApiClient>) -> Result<Self>;
}

#[derive(Debug, thiserror::Error)]
pub enum TryToGetApiClientError {
    #[error("Missing API URL: pass --url or set the STRATUS_URL environment variable")]
    MissingUrl,
    #[error("Missing API token: pass --token or set the STRATUS_TOKEN environment variable")]
    MissingToken,
    #[error("Failed to create API client: {0}")]
    CreatingClient(anyhow::Error),
}

pub trait WithApiClient<Args>: Sized {
    fn with_api_client(args: Args, global_args: &GlobalArgs) -> Result<Self>;
}

impl<Args, T> WithApiClient<Args> for T
where
    T: TryFromWithApiClient<Args>,
{
    fn with_api_client(args: Args, global_args: &GlobalArgs) -> Result<Self> {
        // Build the shared client from the global connection flags.
        let client = try_get_api_client(global_args)?;

        // Finally create a new instance of the command using the arguments and the client.
        Self::try_from_with_api_client(args, Arc::new(client))
    }
}

fn try_get_api_client(global_args: &GlobalArgs) -> Result<ApiClient, TryToGetApiClientError> {
    let url = global_args
        .url
        .as_deref()
        .ok_or(TryToGetApiClientError::MissingUrl)?;
    let token = global_args
        .token
        .as_deref()
        .ok_or(TryToGetApiClientError::MissingToken)?;

    let base_url = Url::parse(url)
        .context("parsing the API base URL")
        .map_err(TryToGetApiClientError::CreatingClient)?;

    ApiClient::new(base_url, token)
        .context("creating the API client")
        .map_err(TryToGetApiClientError::CreatingClient)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn global_args(url: Option<&str>, token: Option<&str>) -> GlobalArgs {
        GlobalArgs {
            debug: false,
            format: None,
            url: url.map(str::to_string),
            token: token.map(str::to_string),
        }
    }

    #[test]
    fn test_missing_url_is_reported_first() {
        let error = try_get_api_client(&global_args(None, Some("token"))).unwrap_err();
        assert!(matches!(error, TryToGetApiClientError::MissingUrl));
    }

    #[test]
    fn test_missing_token_is_reported() {
        let error =
            try_get_api_client(&global_args(Some("https://stratus.example.com"), None)).unwrap_err();
        assert!(matches!(error, TryToGetApiClientError::MissingToken));
    }

    #[test]
    fn test_unparseable_url_fails_client_creation() {
        let error =
            try_get_api_client(&global_args(Some("not a url"), Some("token"))).unwrap_err();
        assert!(matches!(error, TryToGetApiClientError::CreatingClient(_)));
    }

    #[test]
    fn test_valid_flags_build_a_client() {
        let result = try_get_api_client(&global_args(
            Some("https://stratus.example.com"),
            Some("token"),
        ));
        assert!(result.is_ok());
    }
}
