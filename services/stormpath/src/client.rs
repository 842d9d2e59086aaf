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

use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http::header::{ACCEPT, AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE, HOST, LOCATION, USER_AGENT};
use http::{Method, Request, Response, StatusCode, Uri};
use log::{debug, warn};
use serde::Deserialize;
use url::Url;

use sauthc1_core::{Context, Error, ProvideCredential, Result, Signer};

use crate::constants::{APPLICATION_JSON, DEFAULT_BASE_URL, DEFAULT_MAX_REDIRECTS, X_STORMPATH_DATE};
use crate::{Credential, RequestSigner};

/// ClientConfig carries the settings of a [`Client`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base url that relative request paths are joined onto.
    ///
    /// Default to `https://api.stormpath.com/v1/`.
    pub base_url: String,
    /// Maximum number of redirects followed for one call.
    ///
    /// Default to `10`.
    pub max_redirects: usize,
    /// Timeout of one call, redirects included.
    ///
    /// Default to 30 seconds.
    pub timeout: Duration,
    /// `User-Agent` sent with every request. It never takes part in the signature.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_redirects: DEFAULT_MAX_REDIRECTS,
            timeout: Duration::from_secs(30),
            user_agent: format!(
                "sauthc1-stormpath/{} ({}; {})",
                env!("CARGO_PKG_VERSION"),
                std::env::consts::OS,
                std::env::consts::ARCH
            ),
        }
    }
}

impl ClientConfig {
    /// Set base_url
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set max_redirects
    pub fn with_max_redirects(mut self, max_redirects: usize) -> Self {
        self.max_redirects = max_redirects;
        self
    }

    /// Set timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set user_agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Client sends SAuthc1 signed requests to Stormpath.
///
/// A client is built once and passed around explicitly. Cloning is cheap and
/// every clone shares the same immutable credential.
///
/// Redirects are followed here instead of inside the transport: every hop is
/// signed again with a fresh nonce and timestamp.
#[derive(Debug, Clone)]
pub struct Client {
    signer: Signer<Credential>,
    config: Arc<ClientConfig>,
}

impl Client {
    /// Create a new client with an already loaded credential.
    pub fn new(ctx: Context, credential: Credential, config: ClientConfig) -> Self {
        Self {
            signer: Signer::new(ctx, credential, RequestSigner::new()),
            config: Arc::new(config),
        }
    }

    /// Load the credential from `provider` once and create a new client.
    pub async fn from_provider(
        ctx: Context,
        provider: impl ProvideCredential<Credential = Credential>,
        config: ClientConfig,
    ) -> Result<Self> {
        let signer = Signer::load(ctx, provider, RequestSigner::new()).await?;

        Ok(Self {
            signer,
            config: Arc::new(config),
        })
    }

    /// The config of this client.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The credential used to sign requests.
    pub fn credential(&self) -> &Credential {
        self.signer.credential()
    }

    /// Build a request against the configured base url.
    ///
    /// Relative paths are joined onto `base_url`, absolute urls (like the
    /// `href` of a resource) are used as-is. The request carries `User-Agent`,
    /// `Accept` and `Content-Type` and an empty body.
    pub fn request(&self, method: Method, path: &str) -> Result<Request<Bytes>> {
        let url = match Url::parse(path) {
            Ok(url) => url,
            Err(_) => parse_url(&self.config.base_url)?
                .join(path.trim_start_matches('/'))
                .map_err(|e| {
                    Error::request_invalid(format!("can't join {path} onto base url"))
                        .with_source(e)
                })?,
        };

        let req = Request::builder()
            .method(method)
            .uri(url.as_str())
            .header(USER_AGENT, self.config.user_agent.as_str())
            .header(ACCEPT, APPLICATION_JSON)
            .header(CONTENT_TYPE, APPLICATION_JSON)
            .body(Bytes::new())?;
        Ok(req)
    }

    /// Sign and send the request, following redirects.
    ///
    /// Uses the timeout from [`ClientConfig`].
    pub async fn send(&self, req: Request<Bytes>) -> Result<Response<Bytes>> {
        self.send_with_timeout(req, self.config.timeout).await
    }

    /// Sign and send the request, following redirects, within `timeout`.
    pub async fn send_with_timeout(
        &self,
        req: Request<Bytes>,
        timeout: Duration,
    ) -> Result<Response<Bytes>> {
        tokio::time::timeout(timeout, self.send_following_redirects(req))
            .await
            .map_err(|e| {
                Error::unexpected(format!("request timed out after {timeout:?}")).with_source(e)
            })?
    }

    /// Send the request and turn Stormpath error documents into errors.
    ///
    /// `200`, `201`, `204` and `302` are successful. Any other status is
    /// parsed as [`ServiceErrorResponse`] and returned as
    /// [`sauthc1_core::ErrorKind::ServiceError`].
    pub async fn execute(&self, req: Request<Bytes>) -> Result<Response<Bytes>> {
        let resp = self.send(req).await?;

        match resp.status() {
            StatusCode::OK | StatusCode::CREATED | StatusCode::NO_CONTENT | StatusCode::FOUND => {
                Ok(resp)
            }
            status => {
                warn!("stormpath request got unexpected response: {status}");
                Err(ServiceErrorResponse::parse(status, resp.body()))
            }
        }
    }

    async fn send_following_redirects(&self, req: Request<Bytes>) -> Result<Response<Bytes>> {
        let (mut parts, mut body) = req.into_parts();
        let mut redirects = 0;

        loop {
            self.signer.sign(&mut parts, &body)?;

            let mut req = Request::new(body.clone());
            *req.method_mut() = parts.method.clone();
            *req.uri_mut() = parts.uri.clone();
            *req.version_mut() = parts.version;
            *req.headers_mut() = parts.headers.clone();

            debug!("sending {} {}", parts.method, parts.uri);
            let resp = self.signer.context().http_send(req).await?;
            let status = resp.status();
            debug!(
                "got {status} for {} {} ({} bytes)",
                parts.method,
                parts.uri,
                resp.body().len()
            );
            let Some(location) = redirect_location(&resp)? else {
                return Ok(resp);
            };

            redirects += 1;
            if redirects > self.config.max_redirects {
                return Err(Error::redirect_limit_exceeded(format!(
                    "stopped after {} redirects, last location: {location}",
                    self.config.max_redirects
                )));
            }

            let next = resolve_location(&parts.uri, &location)?;
            debug!(
                "following redirect {redirects} ({status}) from {} to {next}",
                parts.uri
            );

            if matches!(
                status,
                StatusCode::MOVED_PERMANENTLY | StatusCode::FOUND | StatusCode::SEE_OTHER
            ) && parts.method != Method::GET
                && parts.method != Method::HEAD
            {
                parts.method = Method::GET;
                body = Bytes::new();
                parts.headers.remove(CONTENT_LENGTH);
            }

            parts.uri = next;
            parts.headers.remove(AUTHORIZATION);
            parts.headers.remove(HOST);
            parts.headers.remove(X_STORMPATH_DATE);
        }
    }
}

/// Returns the `Location` of a redirect response, `None` if the response is final.
fn redirect_location(resp: &Response<Bytes>) -> Result<Option<String>> {
    if !matches!(
        resp.status(),
        StatusCode::MOVED_PERMANENTLY
            | StatusCode::FOUND
            | StatusCode::SEE_OTHER
            | StatusCode::TEMPORARY_REDIRECT
            | StatusCode::PERMANENT_REDIRECT
    ) {
        return Ok(None);
    }

    match resp.headers().get(LOCATION) {
        Some(v) => Ok(Some(v.to_str()?.to_string())),
        None => Ok(None),
    }
}

fn resolve_location(current: &Uri, location: &str) -> Result<Uri> {
    let next = parse_url(&current.to_string())?.join(location).map_err(|e| {
        Error::request_invalid(format!("invalid redirect location {location}")).with_source(e)
    })?;

    Ok(next.as_str().parse()?)
}

fn parse_url(s: &str) -> Result<Url> {
    Url::parse(s).map_err(|e| Error::request_invalid(format!("invalid url {s}")).with_source(e))
}

/// Error document returned by Stormpath.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ServiceErrorResponse {
    /// HTTP status echoed by the service.
    pub status: u16,
    /// Stormpath specific error code.
    pub code: i64,
    /// End user facing message.
    pub message: String,
    /// Developer facing message.
    pub developer_message: String,
    /// Link to the error documentation.
    pub more_info: String,
}

impl ServiceErrorResponse {
    fn parse(status: StatusCode, body: &[u8]) -> Error {
        match serde_json::from_slice::<ServiceErrorResponse>(body) {
            Ok(resp) => Error::service_error(resp.to_string()),
            Err(e) => Error::service_error(format!(
                "unexpected response {status}: {}",
                String::from_utf8_lossy(body)
            ))
            .with_source(e),
        }
    }
}

impl Display for ServiceErrorResponse {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "status {} code {}: {}",
            self.status, self.code, self.message
        )?;
        if !self.developer_message.is_empty() {
            write!(f, " ({})", self.developer_message)?;
        }
        if !self.more_info.is_empty() {
            write!(f, ", more info: {}", self.more_info)?;
        }
        Ok(())
    }
}
