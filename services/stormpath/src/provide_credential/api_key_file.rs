use crate::constants::*;
use crate::Credential;
use async_trait::async_trait;
use ini::Ini;
use log::debug;
use sauthc1_core::{Context, Error, ProvideCredential, Result};

/// ApiKeyFileCredentialProvider loads the api key from an `apiKey.properties` file.
///
/// The file is the one offered for download by the Stormpath console:
///
/// ```text
/// apiKey.id = 2SF81PCVA776S8QA9SZ7PCREX
/// apiKey.secret = tBnn1TRMxhbzCkVHvdfWJHxrJjXtfrUGKy0LZ3CVQ6U
/// ```
///
/// The path is determined by:
/// 1. The path specified via `with_path()`
/// 2. The `STORMPATH_API_KEY_FILE` environment variable
/// 3. Default to `~/.stormpath/apiKey.properties`
///
/// A file that can't be read yields nothing. A file that is read but lacks
/// either key is a configuration error.
#[derive(Debug, Default, Clone)]
pub struct ApiKeyFileCredentialProvider {
    path: Option<String>,
}

impl ApiKeyFileCredentialProvider {
    /// Create a new ApiKeyFileCredentialProvider with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the path to the api key file.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    fn resolve_path(&self, ctx: &Context) -> String {
        if let Some(path) = &self.path {
            path.clone()
        } else if let Some(path) = ctx.env_var(STORMPATH_API_KEY_FILE) {
            path
        } else {
            DEFAULT_API_KEY_FILE.to_string()
        }
    }
}

#[async_trait]
impl ProvideCredential for ApiKeyFileCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let path = self.resolve_path(ctx);
        let Some(expanded_path) = ctx.expand_home_dir(&path) else {
            debug!("failed to expand homedir for path: {path}");
            return Ok(None);
        };

        let content = match ctx.file_read_as_string(&expanded_path).await {
            Ok(content) => content,
            Err(err) => {
                debug!("failed to read api key file {expanded_path}: {err:?}");
                return Ok(None);
            }
        };

        let conf = Ini::load_from_str(&content).map_err(|e| {
            Error::config_invalid(format!("failed to parse api key file {expanded_path}"))
                .with_source(anyhow::Error::new(e))
        })?;
        let props = conf.general_section();

        match (
            props.get(API_KEY_ID_PROPERTY),
            props.get(API_KEY_SECRET_PROPERTY),
        ) {
            (Some(id), Some(secret)) => Ok(Some(Credential::new(id, secret))),
            _ => Err(Error::config_invalid(format!(
                "api key file {expanded_path} must contain both {API_KEY_ID_PROPERTY} and {API_KEY_SECRET_PROPERTY}"
            ))),
        }
    }
}
