// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use crate::{Error, Result};
use bytes::Bytes;
use std::collections::HashMap;
use std::fmt::Debug;
use std::path::PathBuf;
use std::sync::Arc;

/// Context carries every side effect sauthc1 may need: reading the api key
/// file, sending requests and looking up environment variables.
///
/// There is no process wide state. Build one `Context`, hand it to the
/// credential providers and the client, and clone it wherever it is needed.
///
/// Nothing is wired up by default: a fresh context reads no files, sends no
/// requests and sees an empty environment.
///
/// ```
/// use sauthc1_core::{Context, OsEnv};
///
/// let ctx = Context::new().with_env(OsEnv);
/// assert!(ctx.env_var("SAUTHC1_SURELY_UNSET_VARIABLE").is_none());
/// ```
#[derive(Clone, Debug)]
pub struct Context {
    fs: Arc<dyn FileRead>,
    http: Arc<dyn HttpSend>,
    env: Arc<dyn Env>,
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    /// Create a context whose components all refuse to do anything.
    pub fn new() -> Self {
        Self {
            fs: Arc::new(NoopFileRead),
            http: Arc::new(NoopHttpSend),
            env: Arc::new(NoopEnv),
        }
    }

    /// Use `fs` to read files.
    pub fn with_file_read(mut self, fs: impl FileRead) -> Self {
        self.fs = Arc::new(fs);
        self
    }

    /// Use `http` to send requests.
    pub fn with_http_send(mut self, http: impl HttpSend) -> Self {
        self.http = Arc::new(http);
        self
    }

    /// Use `env` to look up environment variables and the home dir.
    pub fn with_env(mut self, env: impl Env) -> Self {
        self.env = Arc::new(env);
        self
    }

    /// Read the whole file.
    #[inline]
    pub async fn file_read(&self, path: &str) -> Result<Vec<u8>> {
        self.fs.file_read(path).await
    }

    /// Read the whole file as utf-8 text.
    pub async fn file_read_as_string(&self, path: &str) -> Result<String> {
        let bytes = self.file_read(path).await?;
        Ok(String::from_utf8(bytes)?)
    }

    /// Send the request and collect the full response.
    #[inline]
    pub async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        self.http.http_send(req).await
    }

    /// Look up an environment variable.
    #[inline]
    pub fn env_var(&self, key: &str) -> Option<String> {
        self.env.var(key)
    }

    /// Home dir of the current user, if known.
    #[inline]
    pub fn home_dir(&self) -> Option<PathBuf> {
        self.env.home_dir()
    }

    /// Replace a leading `~` with the home dir.
    ///
    /// Paths without a leading `~/` (or `~\`) come back unchanged. Returns
    /// `None` when the path needs a home dir and there is none.
    pub fn expand_home_dir(&self, path: &str) -> Option<String> {
        match path.strip_prefix('~') {
            Some(rest) if rest.starts_with('/') || rest.starts_with('\\') => self
                .home_dir()
                .map(|home| format!("{}{rest}", home.to_string_lossy())),
            _ => Some(path.to_string()),
        }
    }
}

/// FileRead reads a whole file into memory.
#[async_trait::async_trait]
pub trait FileRead: Debug + Send + Sync + 'static {
    /// Read the file content entirely in `Vec<u8>`.
    async fn file_read(&self, path: &str) -> Result<Vec<u8>>;
}

/// HttpSend dispatches signed requests.
///
/// Implementations MUST NOT follow redirects on their own: every hop has to be
/// signed again, so redirect responses are returned to the caller as-is.
#[async_trait::async_trait]
pub trait HttpSend: Debug + Send + Sync + 'static {
    /// Send http request and return the response.
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>>;
}

/// Env gives access to environment variables and the home dir.
pub trait Env: Debug + Send + Sync + 'static {
    /// Get an environment variable.
    ///
    /// Returns `None` if the variable is unset or not valid utf-8.
    fn var(&self, key: &str) -> Option<String>;

    /// Return the path to the users home dir, `None` if it can't be found.
    fn home_dir(&self) -> Option<PathBuf>;
}

/// OsEnv reads the environment of the current process.
#[derive(Debug, Copy, Clone)]
pub struct OsEnv;

impl Env for OsEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var_os(key)?.into_string().ok()
    }

    fn home_dir(&self) -> Option<PathBuf> {
        home::home_dir()
    }
}

/// StaticEnv serves a fixed set of variables and a fixed home dir.
///
/// Mostly useful in tests.
#[derive(Debug, Clone, Default)]
pub struct StaticEnv {
    /// The home directory to use.
    pub home_dir: Option<PathBuf>,
    /// The environment variables to use.
    pub envs: HashMap<String, String>,
}

impl Env for StaticEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.envs.get(key).cloned()
    }

    fn home_dir(&self) -> Option<PathBuf> {
        self.home_dir.clone()
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct NoopFileRead;

#[async_trait::async_trait]
impl FileRead for NoopFileRead {
    async fn file_read(&self, path: &str) -> Result<Vec<u8>> {
        Err(Error::unexpected(format!(
            "can't read {path}: no file reader configured"
        )))
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct NoopHttpSend;

#[async_trait::async_trait]
impl HttpSend for NoopHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        Err(Error::unexpected(format!(
            "can't send {} {}: no http client configured",
            req.method(),
            req.uri()
        )))
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct NoopEnv;

impl Env for NoopEnv {
    fn var(&self, _: &str) -> Option<String> {
        None
    }

    fn home_dir(&self) -> Option<PathBuf> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_expand_home_dir() {
        let ctx = Context::new().with_env(StaticEnv {
            home_dir: Some(PathBuf::from("/home/sauthc1")),
            envs: HashMap::new(),
        });

        assert_eq!(
            ctx.expand_home_dir("~/.stormpath/apiKey.properties"),
            Some("/home/sauthc1/.stormpath/apiKey.properties".to_string())
        );
        assert_eq!(
            ctx.expand_home_dir("/etc/apiKey.properties"),
            Some("/etc/apiKey.properties".to_string())
        );
        assert_eq!(ctx.expand_home_dir("~user/x"), Some("~user/x".to_string()));
        assert_eq!(
            Context::new().expand_home_dir("~/.stormpath/apiKey.properties"),
            None
        );
    }

    #[test]
    fn test_os_env_home_dir() {
        assert_eq!(OsEnv.home_dir(), home::home_dir());
    }

    #[test]
    fn test_static_env() {
        let ctx = Context::new().with_env(StaticEnv {
            home_dir: None,
            envs: HashMap::from([("STORMPATH_API_KEY_ID".to_string(), "id".to_string())]),
        });

        assert_eq!(ctx.env_var("STORMPATH_API_KEY_ID"), Some("id".to_string()));
        assert_eq!(ctx.env_var("STORMPATH_API_KEY_SECRET"), None);
        assert_eq!(ctx.home_dir(), None);
    }

    #[tokio::test]
    async fn test_noop_components_fail() {
        let ctx = Context::new();

        let err = ctx.file_read("/tmp/x").await.expect_err("must fail");
        assert_eq!(err.kind(), ErrorKind::Unexpected);

        let req = http::Request::new(Bytes::new());
        let err = ctx.http_send(req).await.expect_err("must fail");
        assert_eq!(err.kind(), ErrorKind::Unexpected);
        assert!(ctx.env_var("HOME").is_none());
    }
}
