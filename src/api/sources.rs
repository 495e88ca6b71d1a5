//! Named option sources backed by the API's option endpoints.
//!
//! The engine looks sources up by name in an explicit registry; this module
//! owns the catalog of names the command modules rely on.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::option_types::payload::value_to_string;
use crate::option_types::{OptionSourceProvider, OptionSourceRegistry, SelectOption, SourceParams};

use super::ApiClient;

/// One option endpoint exposed as a provider. `filter_keys` names the context
/// params forwarded as query string filters; everything else is ignored.
struct EndpointSource {
    client: Arc<ApiClient>,
    path: &'static str,
    filter_keys: &'static [&'static str],
}

#[async_trait]
impl OptionSourceProvider for EndpointSource {
    async fn fetch_options(&self, params: &SourceParams) -> Result<Vec<SelectOption>> {
        let query = filter_query(params, self.filter_keys);
        Ok(self.client.select_options(self.path, &query).await?)
    }
}

fn filter_query(params: &SourceParams, keys: &[&str]) -> Vec<(String, String)> {
    keys.iter()
        .filter_map(|key| match params.get(*key) {
            Some(value) if !value.is_null() => Some(((*key).to_string(), value_to_string(value))),
            _ => None,
        })
        .collect()
}

/// The sources every command can take for granted. Cloud options are scoped
/// to the group already picked in the same run, when there is one.
pub fn default_registry(client: Arc<ApiClient>) -> OptionSourceRegistry {
    let mut registry = OptionSourceRegistry::new();
    registry
        .register("groups", endpoint(&client, "api/options/groups", &[]))
        .register(
            "clouds",
            endpoint(&client, "api/options/clouds", &["groupId"]),
        )
        .register(
            "blueprints",
            endpoint(&client, "api/options/blueprints", &[]),
        )
        .register("workflows", endpoint(&client, "api/options/workflows", &[]));
    registry
}

fn endpoint(
    client: &Arc<ApiClient>,
    path: &'static str,
    filter_keys: &'static [&'static str],
) -> Arc<dyn OptionSourceProvider> {
    Arc::new(EndpointSource {
        client: client.clone(),
        path,
        filter_keys,
    })
}
