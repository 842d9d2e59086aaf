use crate::Credential;
use async_trait::async_trait;
use sauthc1_core::{Context, ProvideCredential, Result};

/// StaticCredentialProvider provides a fixed api key id and secret.
#[derive(Debug, Clone)]
pub struct StaticCredentialProvider {
    id: String,
    secret: String,
}

impl StaticCredentialProvider {
    /// Create a new StaticCredentialProvider with api key id and secret.
    pub fn new(id: &str, secret: &str) -> Self {
        Self {
            id: id.to_string(),
            secret: secret.to_string(),
        }
    }
}

#[async_trait]
impl ProvideCredential for StaticCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
        Ok(Some(Credential::new(&self.id, &self.secret)))
    }
}
