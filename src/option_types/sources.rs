//! Option sources.
//!
//! Select fields either carry a static option list or name a source that
//! produces one. Sources are fetched lazily, one field at a time, right
//! before that field is prompted for, and never cached: a source may depend
//! on values resolved earlier in the same run (a cloud list scoped to the
//! chosen group, for example), so the fetch has to see the latest state.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde_json::{Map, Value};

use super::{OptionSource, SelectOption};

/// Context handed to a source when fetching: the caller's parameters merged
/// with every value resolved so far in the current run.
pub type SourceParams = Map<String, Value>;

#[async_trait]
pub trait OptionSourceProvider: Send + Sync {
    async fn fetch_options(&self, params: &SourceParams) -> Result<Vec<SelectOption>>;
}

/// Adapts a plain closure into an [`OptionSourceProvider`] so commands can
/// declare one-off sources inline.
pub struct FnSource<F>(pub F);

#[async_trait]
impl<F> OptionSourceProvider for FnSource<F>
where
    F: Fn(&SourceParams) -> Result<Vec<SelectOption>> + Send + Sync,
{
    async fn fetch_options(&self, params: &SourceParams) -> Result<Vec<SelectOption>> {
        (self.0)(params)
    }
}

/// Named option sources, looked up by the string a field's `optionSource`
/// carries on the wire.
#[derive(Default)]
pub struct OptionSourceRegistry {
    providers: HashMap<String, Arc<dyn OptionSourceProvider>>,
}

impl OptionSourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        name: impl Into<String>,
        provider: Arc<dyn OptionSourceProvider>,
    ) -> &mut Self {
        self.providers.insert(name.into(), provider);
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn OptionSourceProvider>> {
        self.providers.get(name).cloned()
    }
}

/// Fetch options from a field's declared source.
///
/// A named source that is not in the registry is an error regardless of
/// whether the field is required; the field definition itself is broken.
pub async fn fetch_from(
    source: &OptionSource,
    registry: &OptionSourceRegistry,
    params: &SourceParams,
) -> Result<Vec<SelectOption>> {
    match source {
        OptionSource::Named(name) => {
            let provider = registry
                .get(name)
                .ok_or_else(|| anyhow!("unknown option source '{name}'"))?;
            provider.fetch_options(params).await
        }
        OptionSource::Provider(provider) => provider.fetch_options(params).await,
    }
}

#[cfg(test)]
pub(crate) mod mocks {
    use super::*;
    use mockall::mock;

    mock! {
        pub OptionSourceProvider {}

        #[async_trait]
        impl OptionSourceProvider for OptionSourceProvider {
            async fn fetch_options(&self, params: &SourceParams) -> Result<Vec<SelectOption>>;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mocks::MockOptionSourceProvider;
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_named_source_is_looked_up_in_the_registry() {
        let mut provider = MockOptionSourceProvider::new();
        provider
            .expect_fetch_options()
            .times(1)
            .returning(|_| Ok(vec![SelectOption::new("Production", "1")]));

        let mut registry = OptionSourceRegistry::new();
        registry.register("groups", Arc::new(provider));

        let options = fetch_from(
            &OptionSource::Named("groups".to_string()),
            &registry,
            &SourceParams::new(),
        )
        .await
        .unwrap();

        assert_eq!(options, vec![SelectOption::new("Production", "1")]);
    }

    #[tokio::test]
    async fn test_unknown_named_source_is_an_error() {
        let registry = OptionSourceRegistry::new();

        let result = fetch_from(
            &OptionSource::Named("nope".to_string()),
            &registry,
            &SourceParams::new(),
        )
        .await;

        assert!(result.unwrap_err().to_string().contains("nope"));
    }

    #[tokio::test]
    async fn test_inline_source_sees_the_params() {
        let source = OptionSource::Provider(Arc::new(FnSource(|params: &SourceParams| {
            let group = params.get("groupId").cloned().unwrap_or(Value::Null);
            Ok(vec![SelectOption::new(format!("cloud for {group}"), group)])
        })));

        let mut params = SourceParams::new();
        params.insert("groupId".to_string(), json!("42"));

        let options = fetch_from(&source, &OptionSourceRegistry::new(), &params)
            .await
            .unwrap();

        assert_eq!(options[0].value, json!("42"));
    }
}
