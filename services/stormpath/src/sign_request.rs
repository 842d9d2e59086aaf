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

use std::fmt::Write;

use http::request::Parts;
use http::{header, HeaderValue};
use log::debug;
use sauthc1_core::hash::{hex_hmac_sha256, hex_sha256};
use sauthc1_core::time::{format_date, format_iso8601, now, parse_iso8601, DateTime};
use sauthc1_core::{Error, Result, SignRequest, SigningRequest};

use crate::canonical::{canonical_request, signed_headers};
use crate::constants::{
    ALGORITHM, AUTHENTICATION_SCHEME, ID_TERMINATOR, SAUTHC1_ID, SAUTHC1_SIGNATURE,
    SAUTHC1_SIGNED_HEADERS, X_STORMPATH_DATE,
};
use crate::key::derive_signing_key;
use crate::Credential;

/// RequestSigner that implements SAuthc1.
///
/// Every call takes the current time and a fresh v4 UUID nonce unless they
/// were pinned with [`RequestSigner::with_time`] / [`RequestSigner::with_nonce`].
#[derive(Debug, Default, Clone)]
pub struct RequestSigner {
    time: Option<DateTime>,
    nonce: Option<String>,
}

impl RequestSigner {
    /// Create a new SAuthc1 request signer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing or fixture reproduction.
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    /// Specify the signing time as a `YYYYMMDDThhmmssZ` timestamp.
    ///
    /// Fails with [`sauthc1_core::ErrorKind::TimestampMalformed`] if it can't be parsed.
    pub fn with_timestamp(self, timestamp: &str) -> Result<Self> {
        Ok(self.with_time(parse_iso8601(timestamp)?))
    }

    /// Specify the nonce.
    ///
    /// # Note
    ///
    /// A nonce must never be reused against the real service.
    /// Only use this function for testing or fixture reproduction.
    pub fn with_nonce(mut self, nonce: impl Into<String>) -> Self {
        self.nonce = Some(nonce.into());
        self
    }
}

impl SignRequest for RequestSigner {
    type Credential = Credential;

    fn sign_request(&self, req: &mut Parts, body: &[u8], credential: &Credential) -> Result<()> {
        let now = self.time.unwrap_or_else(now);
        let nonce = self.nonce.clone().unwrap_or_else(new_nonce);

        sign(req, body, credential, now, &nonce)
    }
}

/// Generate a fresh nonce: a random v4 UUID.
pub fn new_nonce() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Sign the request with explicit time and nonce.
///
/// Sets `Host` and `X-Stormpath-Date` first so both take part in the
/// signature, then writes `Authorization`. Nothing else on the request is
/// touched. Identical input always yields an identical header.
pub fn sign(
    req: &mut Parts,
    body: &[u8],
    cred: &Credential,
    now: DateTime,
    nonce: &str,
) -> Result<()> {
    if cred.id.is_empty() || cred.secret.is_empty() {
        return Err(Error::credential_invalid(
            "api key id and secret must not be empty",
        ));
    }

    let mut signed_req = SigningRequest::build(req)?;

    let timestamp = format_iso8601(now);
    let date_stamp = format_date(now);

    let result = (|| -> Result<()> {
        // A stale signature must never be signed over.
        signed_req.headers.remove(header::AUTHORIZATION);
        let host = HeaderValue::try_from(signed_req.host())?;
        signed_req.headers.insert(header::HOST, host);
        signed_req
            .headers
            .insert(X_STORMPATH_DATE, HeaderValue::try_from(timestamp.as_str())?);

        let creq = canonical_request(&signed_req, body)?;
        debug!("calculated canonical request: {creq}");

        let scope = scope_id(&cred.id, &date_stamp, nonce);
        debug!("calculated scope: {scope}");

        let string_to_sign = string_to_sign(&timestamp, &scope, &creq)?;
        debug!("calculated string to sign: {string_to_sign}");

        let signing_key = derive_signing_key(&cred.secret, &date_stamp, nonce);
        let signature = hex_hmac_sha256(&signing_key, string_to_sign.as_bytes());

        let mut authorization = HeaderValue::try_from(authorization_value(
            &scope,
            &signed_headers(&signed_req),
            &signature,
        ))?;
        authorization.set_sensitive(true);
        signed_req
            .headers
            .insert(header::AUTHORIZATION, authorization);

        Ok(())
    })();

    // Headers must go back onto the request even if signing failed halfway.
    signed_req.apply(req)?;
    result
}

/// Scope: `<id>/<YYYYMMDD>/<nonce>/sauthc1_request`
pub fn scope_id(id: &str, date_stamp: &str, nonce: &str) -> String {
    format!("{id}/{date_stamp}/{nonce}/{ID_TERMINATOR}")
}

/// StringToSign:
///
/// ```text
/// HMAC-SHA-256
/// 20160308T230740Z
/// <id>/20160308/<nonce>/sauthc1_request
/// <hashed_canonical_request>
/// ```
pub fn string_to_sign(timestamp: &str, scope: &str, canonical_request: &str) -> Result<String> {
    let mut f = String::with_capacity(256);
    writeln!(f, "{ALGORITHM}")?;
    writeln!(f, "{timestamp}")?;
    writeln!(f, "{scope}")?;
    write!(f, "{}", hex_sha256(canonical_request.as_bytes()))?;
    Ok(f)
}

/// `SAuthc1 sauthc1Id=<scope>, sauthc1SignedHeaders=<names>, sauthc1Signature=<hex>`
pub fn authorization_value(scope: &str, signed_headers: &str, signature: &str) -> String {
    format!(
        "{AUTHENTICATION_SCHEME} {SAUTHC1_ID}={scope}, {SAUTHC1_SIGNED_HEADERS}={signed_headers}, {SAUTHC1_SIGNATURE}={signature}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{Method, Request};
    use pretty_assertions::assert_eq;
    use sauthc1_core::ErrorKind;

    const ID: &str = "2SF81PCVA776S8QA9SZ7PCREX";
    const SECRET: &str = "tBnn1TRMxhbzCkVHvdfWJHxrJjXtfrUGKy0LZ3CVQ6U";

    fn credential() -> Credential {
        Credential::new(ID, SECRET)
    }

    fn request(method: Method, uri: &str, user_agent: &'static str) -> Parts {
        let mut req = Request::new(());
        *req.method_mut() = method;
        *req.uri_mut() = uri.parse().expect("url must be valid");
        req.headers_mut()
            .insert(header::USER_AGENT, HeaderValue::from_static(user_agent));
        req.headers_mut()
            .insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        req.headers_mut()
            .insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));

        req.into_parts().0
    }

    fn sign_fixture(
        method: Method,
        uri: &str,
        body: &[u8],
        timestamp: &str,
        nonce: &str,
    ) -> Result<Parts> {
        let mut parts = request(method, uri, "sauthc1-test");
        RequestSigner::new()
            .with_timestamp(timestamp)?
            .with_nonce(nonce)
            .sign_request(&mut parts, body, &credential())?;
        Ok(parts)
    }

    fn authorization(parts: &Parts) -> &str {
        parts.headers[header::AUTHORIZATION]
            .to_str()
            .expect("authorization must be ascii")
    }

    #[test]
    fn test_known_tenant_request() -> anyhow::Result<()> {
        let _ = env_logger::builder().is_test(true).try_init();

        let parts = sign_fixture(
            Method::GET,
            "https://api.stormpath.com/v1/tenants/current",
            b"",
            "20160308T230740Z",
            "03d9cf9c-352e-4bf5-5308-40c98fc54958",
        )?;

        assert_eq!(
            authorization(&parts),
            "SAuthc1 sauthc1Id=2SF81PCVA776S8QA9SZ7PCREX/20160308/03d9cf9c-352e-4bf5-5308-40c98fc54958/sauthc1_request, \
             sauthc1SignedHeaders=accept;content-type;host;x-stormpath-date, \
             sauthc1Signature=046a236231085b1556dc6ae15d439367637ac25744070d4fdd5ea7b7701b560c"
        );
        assert_eq!(parts.headers[header::HOST], "api.stormpath.com");
        assert_eq!(parts.headers[X_STORMPATH_DATE], "20160308T230740Z");
        assert!(parts.headers[header::AUTHORIZATION].is_sensitive());
        assert_eq!(parts.headers[header::USER_AGENT], "sauthc1-test");
        assert_eq!(parts.uri, "https://api.stormpath.com/v1/tenants/current");
        Ok(())
    }

    #[test]
    fn test_known_request_with_query() -> anyhow::Result<()> {
        let parts = sign_fixture(
            Method::GET,
            "https://api.stormpath.com/v1/applications/4jIEdHsNp17DWMQd8HTKQY/accountStoreMappings/?offset=0&limit=25",
            b"",
            "20160309T002222Z",
            "3abf1257-2b65-41bf-6773-9b5f607850bc",
        )?;

        assert_eq!(
            authorization(&parts),
            "SAuthc1 sauthc1Id=2SF81PCVA776S8QA9SZ7PCREX/20160309/3abf1257-2b65-41bf-6773-9b5f607850bc/sauthc1_request, \
             sauthc1SignedHeaders=accept;content-type;host;x-stormpath-date, \
             sauthc1Signature=b309318222f8d3fd450c7e2d9833eb55cb440c6302a57f8aba784a3010fa7dd3"
        );
        Ok(())
    }

    #[test]
    fn test_known_delete_request_ignores_body() -> anyhow::Result<()> {
        let expected = "SAuthc1 sauthc1Id=2SF81PCVA776S8QA9SZ7PCREX/20160309/459c56d5-a391-49d2-7fc3-a48e7b4b5539/sauthc1_request, \
             sauthc1SignedHeaders=accept;content-type;host;x-stormpath-date, \
             sauthc1Signature=3f1387bde0f2ccde13f219ccf3d314ed1bbecf469bff6f8e2ebf14d621051faa";

        for body in [&b""[..], &b"\"\""[..], &br#"{"ignored":true}"#[..]] {
            let parts = sign_fixture(
                Method::DELETE,
                "https://api.stormpath.com/v1/directories/4jJ4VvOa3wljEdUFZr7L3W",
                body,
                "20160309T002224Z",
                "459c56d5-a391-49d2-7fc3-a48e7b4b5539",
            )?;
            assert_eq!(authorization(&parts), expected);
        }
        Ok(())
    }

    #[test]
    fn test_known_post_request_signs_body() -> anyhow::Result<()> {
        let parts = sign_fixture(
            Method::POST,
            "https://api.stormpath.com/v1/applications",
            br#"{"name":"my app"}"#,
            "20160309T002224Z",
            "459c56d5-a391-49d2-7fc3-a48e7b4b5539",
        )?;

        assert_eq!(
            authorization(&parts),
            "SAuthc1 sauthc1Id=2SF81PCVA776S8QA9SZ7PCREX/20160309/459c56d5-a391-49d2-7fc3-a48e7b4b5539/sauthc1_request, \
             sauthc1SignedHeaders=accept;content-type;host;x-stormpath-date, \
             sauthc1Signature=389d55575e0717eed451fcb251e9a08ad2e5214622bbe609c7d23fcd165062be"
        );

        let other = sign_fixture(
            Method::POST,
            "https://api.stormpath.com/v1/applications",
            br#"{"name":"other app"}"#,
            "20160309T002224Z",
            "459c56d5-a391-49d2-7fc3-a48e7b4b5539",
        )?;
        assert_ne!(authorization(&parts), authorization(&other));
        Ok(())
    }

    #[test]
    fn test_get_body_does_not_change_signature() -> anyhow::Result<()> {
        let uri = "https://api.stormpath.com/v1/tenants/current";
        let nonce = "03d9cf9c-352e-4bf5-5308-40c98fc54958";
        let empty = sign_fixture(Method::GET, uri, b"", "20160308T230740Z", nonce)?;
        let quoted = sign_fixture(Method::GET, uri, b"\"\"", "20160308T230740Z", nonce)?;
        assert_eq!(authorization(&empty), authorization(&quoted));
        Ok(())
    }

    #[test]
    fn test_user_agent_does_not_change_signature() -> anyhow::Result<()> {
        let signer = RequestSigner::new()
            .with_timestamp("20160308T221346Z")?
            .with_nonce("8fd1415e-6e0b-45b9-7513-7fd6e9887795");

        let mut a = request(Method::GET, "https://requestb.in/1kvzjhg1", "Foo Bar");
        let mut b = request(
            Method::GET,
            "https://requestb.in/1kvzjhg1",
            "Foo Bar AppEngine-Google; (+http://code.google.com/appengine; appid: dev~x)",
        );
        signer.sign_request(&mut a, b"", &credential())?;
        signer.sign_request(&mut b, b"", &credential())?;

        assert_eq!(authorization(&a), authorization(&b));
        assert!(!authorization(&a).contains("user-agent"));
        Ok(())
    }

    #[test]
    fn test_signed_header_change_changes_signature() -> anyhow::Result<()> {
        let signer = RequestSigner::new()
            .with_timestamp("20160308T230740Z")?
            .with_nonce("03d9cf9c-352e-4bf5-5308-40c98fc54958");
        let uri = "https://api.stormpath.com/v1/tenants/current";

        let mut a = request(Method::GET, uri, "sauthc1-test");
        let mut b = request(Method::GET, uri, "sauthc1-test");
        b.headers
            .insert(header::ACCEPT, HeaderValue::from_static("application/xml"));
        signer.sign_request(&mut a, b"", &credential())?;
        signer.sign_request(&mut b, b"", &credential())?;

        assert_ne!(authorization(&a), authorization(&b));
        Ok(())
    }

    #[test]
    fn test_query_order_does_not_change_signature() -> anyhow::Result<()> {
        let nonce = "3abf1257-2b65-41bf-6773-9b5f607850bc";
        let a = sign_fixture(
            Method::GET,
            "https://api.stormpath.com/v1/accounts?limit=25&offset=0&expand=groups",
            b"",
            "20160309T002222Z",
            nonce,
        )?;
        let b = sign_fixture(
            Method::GET,
            "https://api.stormpath.com/v1/accounts?expand=groups&offset=0&limit=25",
            b"",
            "20160309T002222Z",
            nonce,
        )?;
        assert_eq!(authorization(&a), authorization(&b));
        Ok(())
    }

    #[test]
    fn test_empty_path_matches_root() -> anyhow::Result<()> {
        let nonce = "03d9cf9c-352e-4bf5-5308-40c98fc54958";
        let a = sign_fixture(
            Method::GET,
            "https://api.stormpath.com",
            b"",
            "20160308T230740Z",
            nonce,
        )?;
        let b = sign_fixture(
            Method::GET,
            "https://api.stormpath.com/",
            b"",
            "20160308T230740Z",
            nonce,
        )?;
        assert_eq!(authorization(&a), authorization(&b));
        Ok(())
    }

    #[test]
    fn test_non_utf8_path_and_query_are_signed() -> anyhow::Result<()> {
        let nonce = "03d9cf9c-352e-4bf5-5308-40c98fc54958";
        let raw = sign_fixture(
            Method::GET,
            "https://api.stormpath.com/v1/%FF?q=%FF",
            b"",
            "20160308T230740Z",
            nonce,
        )?;
        let replaced = sign_fixture(
            Method::GET,
            "https://api.stormpath.com/v1/%FF?q=%EF%BF%BD",
            b"",
            "20160308T230740Z",
            nonce,
        )?;
        assert_ne!(authorization(&raw), authorization(&replaced));
        Ok(())
    }

    #[test]
    fn test_host_overwritten_from_authority() -> anyhow::Result<()> {
        let mut parts = request(Method::GET, "http://127.0.0.1:9000/v1/tenants/current", "ua");
        parts
            .headers
            .insert(header::HOST, HeaderValue::from_static("stale.example.com"));
        RequestSigner::new().sign_request(&mut parts, b"", &credential())?;

        assert_eq!(parts.headers[header::HOST], "127.0.0.1:9000");
        assert_eq!(parts.headers.get_all(header::HOST).iter().count(), 1);
        Ok(())
    }

    #[test]
    fn test_signing_twice_replaces_authorization() -> anyhow::Result<()> {
        let signer = RequestSigner::new()
            .with_timestamp("20160308T230740Z")?
            .with_nonce("03d9cf9c-352e-4bf5-5308-40c98fc54958");

        let mut parts = request(
            Method::GET,
            "https://api.stormpath.com/v1/tenants/current",
            "sauthc1-test",
        );
        signer.sign_request(&mut parts, b"", &credential())?;
        let first = authorization(&parts).to_string();
        signer.sign_request(&mut parts, b"", &credential())?;

        assert_eq!(authorization(&parts), first);
        assert_eq!(parts.headers.get_all(header::AUTHORIZATION).iter().count(), 1);
        Ok(())
    }

    #[test]
    fn test_fresh_nonce_per_call() -> anyhow::Result<()> {
        let signer = RequestSigner::new().with_timestamp("20160308T230740Z")?;
        let uri = "https://api.stormpath.com/v1/tenants/current";

        let mut a = request(Method::GET, uri, "ua");
        let mut b = request(Method::GET, uri, "ua");
        signer.sign_request(&mut a, b"", &credential())?;
        signer.sign_request(&mut b, b"", &credential())?;

        assert_ne!(authorization(&a), authorization(&b));
        Ok(())
    }

    #[test]
    fn test_deterministic() -> anyhow::Result<()> {
        let signer = RequestSigner::new()
            .with_timestamp("20160308T230740Z")?
            .with_nonce("03d9cf9c-352e-4bf5-5308-40c98fc54958");
        let uri = "https://api.stormpath.com/v1/tenants/current";

        let results = (0..4)
            .map(|_| {
                let mut parts = request(Method::GET, uri, "ua");
                signer.sign_request(&mut parts, b"", &credential())?;
                Ok(authorization(&parts).to_string())
            })
            .collect::<Result<Vec<_>>>()?;
        assert!(results.windows(2).all(|w| w[0] == w[1]));
        Ok(())
    }

    #[test]
    fn test_malformed_timestamp() {
        let err = RequestSigner::new()
            .with_timestamp("2016-03-08 23:07:40")
            .expect_err("must fail");
        assert_eq!(err.kind(), ErrorKind::TimestampMalformed);
    }

    #[test]
    fn test_request_without_authority() {
        let mut parts = request(Method::GET, "/v1/tenants/current", "ua");
        let err = RequestSigner::new()
            .sign_request(&mut parts, b"", &credential())
            .expect_err("must fail");
        assert_eq!(err.kind(), ErrorKind::HeaderMissing);
        assert!(parts.headers.get(header::AUTHORIZATION).is_none());
    }

    #[test]
    fn test_empty_credential() {
        let mut parts = request(Method::GET, "https://api.stormpath.com/v1", "ua");
        let err = RequestSigner::new()
            .sign_request(&mut parts, b"", &Credential::new(ID, ""))
            .expect_err("must fail");
        assert_eq!(err.kind(), ErrorKind::CredentialInvalid);
    }

    #[test]
    fn test_string_to_sign() -> anyhow::Result<()> {
        let scope = scope_id(ID, "20160308", "nonce");
        assert_eq!(scope, "2SF81PCVA776S8QA9SZ7PCREX/20160308/nonce/sauthc1_request");

        let s = string_to_sign("20160308T230740Z", &scope, "")?;
        assert_eq!(
            s,
            "HMAC-SHA-256\n\
             20160308T230740Z\n\
             2SF81PCVA776S8QA9SZ7PCREX/20160308/nonce/sauthc1_request\n\
             e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        Ok(())
    }
}
