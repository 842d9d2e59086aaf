use std::fmt::{Debug, Formatter};

use crate::constants::*;
use sauthc1_core::{utils::Redact, Context};

/// Config carries all the configuration for loading Stormpath credentials.
#[derive(Clone, Default)]
pub struct Config {
    /// `api_key_id` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`STORMPATH_API_KEY_ID`]
    pub api_key_id: Option<String>,
    /// `api_key_secret` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`STORMPATH_API_KEY_SECRET`]
    pub api_key_secret: Option<String>,
    /// `api_key_file` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`STORMPATH_API_KEY_FILE`]
    ///
    /// Falls back to `~/.stormpath/apiKey.properties` when unset.
    pub api_key_file: Option<String>,
}

impl Config {
    /// Create a new Config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set api_key_id
    pub fn with_api_key_id(mut self, api_key_id: impl Into<String>) -> Self {
        self.api_key_id = Some(api_key_id.into());
        self
    }

    /// Set api_key_secret
    pub fn with_api_key_secret(mut self, api_key_secret: impl Into<String>) -> Self {
        self.api_key_secret = Some(api_key_secret.into());
        self
    }

    /// Set api_key_file
    pub fn with_api_key_file(mut self, api_key_file: impl Into<String>) -> Self {
        self.api_key_file = Some(api_key_file.into());
        self
    }

    /// Load config from env.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        if let Some(v) = ctx.env_var(STORMPATH_API_KEY_ID) {
            self.api_key_id.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(STORMPATH_API_KEY_SECRET) {
            self.api_key_secret.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(STORMPATH_API_KEY_FILE) {
            self.api_key_file.get_or_insert(v);
        }

        self
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key_id", &Redact::from(&self.api_key_id))
            .field("api_key_secret", &Redact::from(&self.api_key_secret))
            .field("api_key_file", &self.api_key_file)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sauthc1_core::StaticEnv;
    use std::collections::HashMap;

    #[test]
    fn test_from_env_keeps_explicit_values() {
        let ctx = Context::new().with_env(StaticEnv {
            home_dir: None,
            envs: HashMap::from([
                (STORMPATH_API_KEY_ID.to_string(), "env_id".to_string()),
                (STORMPATH_API_KEY_SECRET.to_string(), "env_secret".to_string()),
                (STORMPATH_API_KEY_FILE.to_string(), "/etc/apiKey.properties".to_string()),
            ]),
        });

        let cfg = Config::new().with_api_key_id("explicit_id").from_env(&ctx);
        assert_eq!(cfg.api_key_id.as_deref(), Some("explicit_id"));
        assert_eq!(cfg.api_key_secret.as_deref(), Some("env_secret"));
        assert_eq!(cfg.api_key_file.as_deref(), Some("/etc/apiKey.properties"));
    }

    #[test]
    fn test_from_env_with_os_env() {
        temp_env::with_vars(
            vec![
                (STORMPATH_API_KEY_ID, Some("os_id")),
                (STORMPATH_API_KEY_SECRET, None::<&str>),
                (STORMPATH_API_KEY_FILE, None::<&str>),
            ],
            || {
                let ctx = Context::new().with_env(sauthc1_core::OsEnv);
                let cfg = Config::default().from_env(&ctx);
                assert_eq!(cfg.api_key_id.as_deref(), Some("os_id"));
                assert!(cfg.api_key_secret.is_none());
                assert!(cfg.api_key_file.is_none());
            },
        );
    }

    #[test]
    fn test_debug_redacts_secret() {
        let cfg = Config::new().with_api_key_secret("tBnn1TRMxhbzCkVHvdfWJHxrJjXtfrUGKy0LZ3CVQ6U");
        let s = format!("{cfg:?}");
        assert!(s.contains("tBn***Q6U"));
        assert!(!s.contains("TRMxhbz"));
    }
}
