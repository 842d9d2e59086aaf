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

//! Canonical request construction.

use std::fmt::Write;

use http::header::USER_AGENT;
use http::Method;
use percent_encoding::percent_encode;
use sauthc1_core::hash::hex_sha256;
use sauthc1_core::{Result, SigningRequest};

use crate::constants::{SAUTHC1_PATH_ENCODE_SET, SAUTHC1_QUERY_ENCODE_SET};

/// Build the canonical request string.
///
/// ## Format
///
/// ```text
/// METHOD + "\n" +
/// CanonicalPath + "\n" +
/// CanonicalQueryString + "\n" +
/// CanonicalHeaders + "\n" +
/// SignedHeaders + "\n" +
/// HexEncode(SHA256(Payload))
/// ```
///
/// `CanonicalHeaders` ends with its own `\n`, so a blank line always
/// separates it from `SignedHeaders`.
pub fn canonical_request(req: &SigningRequest, body: &[u8]) -> Result<String> {
    // 256 is specially chosen to avoid reallocation for most requests.
    let mut f = String::with_capacity(256);

    writeln!(f, "{}", req.method)?;
    writeln!(f, "{}", canonical_path(&req.path))?;
    writeln!(f, "{}", canonical_query_string(&req.query))?;
    writeln!(f, "{}", canonical_headers(req)?)?;
    writeln!(f, "{}", signed_headers(req))?;
    write!(f, "{}", payload_hash(&req.method, body))?;

    Ok(f)
}

/// Canonicalize a percent decoded path.
///
/// Empty path becomes `/`. Every byte outside the unreserved set is percent
/// encoded except `/`, whether or not the bytes form valid utf-8.
pub fn canonical_path(path: &[u8]) -> String {
    if path.is_empty() {
        return "/".to_string();
    }

    percent_encode(path, &SAUTHC1_PATH_ENCODE_SET).to_string()
}

/// Canonicalize percent decoded query pairs.
///
/// Pairs are sorted by key only; values of a repeated key keep their request
/// order. Every pair is emitted as `key=value`, even when the value is empty.
pub fn canonical_query_string(query: &[(Vec<u8>, Vec<u8>)]) -> String {
    let mut query = query.iter().collect::<Vec<_>>();
    query.sort_by(|(a, _), (b, _)| a.cmp(b));

    let mut s = String::with_capacity(query.len() * 16);
    for (idx, (k, v)) in query.into_iter().enumerate() {
        if idx != 0 {
            s.push('&');
        }
        s.extend(percent_encode(k, &SAUTHC1_QUERY_ENCODE_SET));
        s.push('=');
        s.extend(percent_encode(v, &SAUTHC1_QUERY_ENCODE_SET));
    }

    s
}

/// Canonicalize all headers except `User-Agent`.
///
/// One `name:value\n` line per header name, sorted by name. Repeated values
/// are comma joined on the same line.
pub fn canonical_headers(req: &SigningRequest) -> Result<String> {
    let mut s = String::with_capacity(128);
    for name in signed_header_names(req) {
        s.push_str(name);
        s.push(':');
        s.push_str(&req.header_values_joined(name, ",")?);
        s.push('\n');
    }

    Ok(s)
}

/// Signed header names joined by `;`.
pub fn signed_headers(req: &SigningRequest) -> String {
    signed_header_names(req).join(";")
}

/// Hex encoded SHA256 of the payload.
///
/// `GET` and `DELETE` always hash an empty payload, whatever the caller passes.
pub fn payload_hash(method: &Method, body: &[u8]) -> String {
    if *method == Method::GET || *method == Method::DELETE {
        hex_sha256(&[])
    } else {
        hex_sha256(body)
    }
}

/// User agents get rewritten by proxies and runtimes on the way out, so they
/// never take part in the signature.
fn signed_header_names(req: &SigningRequest) -> Vec<&str> {
    req.header_name_to_vec_sorted()
        .into_iter()
        .filter(|name| *name != USER_AGENT.as_str())
        .collect()
}
