use crate::provide_credential::ApiKeyFileCredentialProvider;
use crate::{Config, Credential};
use async_trait::async_trait;
use sauthc1_core::{Context, ProvideCredential, Result};
use std::sync::Arc;

/// ConfigCredentialProvider loads the api key from a [`Config`].
///
/// Explicit `api_key_id` and `api_key_secret` win. Otherwise the configured
/// `api_key_file`, if any, is read.
#[derive(Debug)]
pub struct ConfigCredentialProvider {
    config: Arc<Config>,
}

impl ConfigCredentialProvider {
    /// Create a new `ConfigCredentialProvider` instance.
    pub fn new(cfg: Arc<Config>) -> Self {
        Self { config: cfg }
    }
}

#[async_trait]
impl ProvideCredential for ConfigCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        if let (Some(id), Some(secret)) = (&self.config.api_key_id, &self.config.api_key_secret) {
            return Ok(Some(Credential::new(id, secret)));
        }

        match &self.config.api_key_file {
            Some(path) => {
                ApiKeyFileCredentialProvider::new()
                    .with_path(path)
                    .provide_credential(ctx)
                    .await
            }
            None => Ok(None),
        }
    }
}
