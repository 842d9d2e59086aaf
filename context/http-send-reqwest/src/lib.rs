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

//! Reqwest-based HTTP sending implementation for sauthc1.
//!
//! `ReqwestHttpSend` implements `HttpSend` from `sauthc1_core` on top of a
//! `reqwest::Client`. Redirects are never followed here: the signing client
//! has to sign every hop again with a fresh nonce, so 3xx responses are handed
//! back untouched.
//!
//! ## Example
//!
//! ```no_run
//! use sauthc1_core::Context;
//! use sauthc1_http_send_reqwest::ReqwestHttpSend;
//!
//! let ctx = Context::new().with_http_send(ReqwestHttpSend::default());
//! ```

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::BodyExt;
use reqwest::redirect::Policy;
use reqwest::{Client, Request};
use sauthc1_core::{Error, HttpSend, Result};

/// Reqwest-based implementation of the `HttpSend` trait.
#[derive(Debug)]
pub struct ReqwestHttpSend {
    client: Client,
}

impl Default for ReqwestHttpSend {
    /// # Panics
    ///
    /// Panics if the client can't be built, like `reqwest::Client::new`. Use
    /// [`ReqwestHttpSend::try_default`] to handle the error instead.
    fn default() -> Self {
        Self::try_default().expect("reqwest client without redirects must build")
    }
}

impl ReqwestHttpSend {
    /// Build a reqwest::Client that never follows redirects.
    pub fn try_default() -> Result<Self> {
        let client = Client::builder()
            .redirect(Policy::none())
            .build()
            .map_err(|e| Error::unexpected("failed to build reqwest client").with_source(e))?;
        Ok(Self { client })
    }

    /// Create a new ReqwestHttpSend with a reqwest::Client.
    ///
    /// The client should be built with `redirect(Policy::none())`, otherwise
    /// redirected requests reach the server with a stale signature.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpSend for ReqwestHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let req = Request::try_from(req)
            .map_err(|e| Error::request_invalid("failed to convert request").with_source(e))?;
        let resp: http::Response<_> = self
            .client
            .execute(req)
            .await
            .map_err(|e| Error::unexpected("failed to send request").with_source(e))?
            .into();

        let (parts, body) = resp.into_parts();
        let bs = BodyExt::collect(body)
            .await
            .map(|buf| buf.to_bytes())
            .map_err(|e| Error::unexpected("failed to read response body").with_source(e))?;
        Ok(http::Response::from_parts(parts, bs))
    }
}
