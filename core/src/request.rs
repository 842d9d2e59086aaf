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

use std::mem;

use http::uri::Authority;
use http::HeaderMap;
use http::Method;
use percent_encoding::percent_decode;

use crate::{Error, Result};

/// Signing context for request.
///
/// Built from `http::request::Parts` without touching the uri: signing only
/// reads the target, it never rewrites it.
#[derive(Debug)]
pub struct SigningRequest {
    /// HTTP method.
    pub method: Method,
    /// HTTP authority.
    pub authority: Authority,
    /// HTTP path, percent decoded.
    ///
    /// Kept as raw bytes: `%FF` decodes to a lone `0xFF` and must be encoded
    /// back as `%FF`, not rejected or replaced. Empty if the request uri
    /// carries no path at all.
    pub path: Vec<u8>,
    /// HTTP query parameters, percent decoded, in request order.
    ///
    /// `+` decodes to a space. Keys and values are raw bytes like `path`.
    pub query: Vec<(Vec<u8>, Vec<u8>)>,
    /// HTTP headers.
    pub headers: HeaderMap,
}

impl SigningRequest {
    /// Build a signing context from http::request::Parts.
    pub fn build(parts: &mut http::request::Parts) -> Result<Self> {
        let authority = parts.uri.authority().cloned().ok_or_else(|| {
            Error::header_missing("request without authority can't derive host for signing")
        })?;

        let path = match parts.uri.path_and_query() {
            Some(paq) => percent_decode(paq.path().as_bytes()).collect(),
            None => Vec::new(),
        };

        let query = parts.uri.query().map(parse_query).unwrap_or_default();

        Ok(SigningRequest {
            method: parts.method.clone(),
            authority,
            path,
            query,

            // Take the headers out of the request to avoid copy.
            // We will return it back when apply the context.
            headers: mem::take(&mut parts.headers),
        })
    }

    /// Apply the signing context back to http::request::Parts.
    pub fn apply(mut self, parts: &mut http::request::Parts) -> Result<()> {
        mem::swap(&mut parts.headers, &mut self.headers);
        Ok(())
    }

    /// Host value derived from the authority: `host[:port]`, without userinfo.
    pub fn host(&self) -> String {
        match self.authority.port() {
            Some(port) => format!("{}:{}", self.authority.host(), port),
            None => self.authority.host().to_string(),
        }
    }

    /// Get header names as sorted, deduplicated vector.
    ///
    /// Names are already lower-cased by `http::HeaderMap`.
    pub fn header_name_to_vec_sorted(&self) -> Vec<&str> {
        let mut h = self
            .headers
            .keys()
            .map(|k| k.as_str())
            .collect::<Vec<&str>>();
        h.sort_unstable();
        h.dedup();

        h
    }

    /// Get all values of the header joined by `sep`, in insertion order.
    ///
    /// Returns empty string if header not found.
    pub fn header_values_joined(&self, name: &str, sep: &str) -> Result<String> {
        let mut s = String::new();
        for (idx, v) in self.headers.get_all(name).iter().enumerate() {
            if idx != 0 {
                s.push_str(sep);
            }
            s.push_str(v.to_str()?);
        }

        Ok(s)
    }
}

/// Split a raw query into decoded `(key, value)` pairs.
///
/// Empty segments are skipped and a segment without `=` has an empty value.
fn parse_query(query: &str) -> Vec<(Vec<u8>, Vec<u8>)> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
            (decode_query_component(k), decode_query_component(v))
        })
        .collect()
}

fn decode_query_component(s: &str) -> Vec<u8> {
    let bs: Vec<u8> = s
        .bytes()
        .map(|b| if b == b'+' { b' ' } else { b })
        .collect();
    percent_decode(&bs).collect()
}
