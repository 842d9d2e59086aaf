//! Signers for Stormpath, the SAuthc1 request signing scheme.
//!
//! ```no_run
//! use http::Method;
//! use sauthc1_core::{Context, OsEnv};
//! use sauthc1_file_read_tokio::TokioFileRead;
//! use sauthc1_http_send_reqwest::ReqwestHttpSend;
//! use sauthc1_stormpath::{Client, ClientConfig, DefaultCredentialProvider};
//!
//! # async fn example() -> sauthc1_core::Result<()> {
//! let ctx = Context::new()
//!     .with_file_read(TokioFileRead)
//!     .with_http_send(ReqwestHttpSend::default())
//!     .with_env(OsEnv);
//!
//! let client =
//!     Client::from_provider(ctx, DefaultCredentialProvider::new(), ClientConfig::default())
//!         .await?;
//! let resp = client
//!     .execute(client.request(Method::GET, "tenants/current")?)
//!     .await?;
//! println!("{}", String::from_utf8_lossy(resp.body()));
//! # Ok(())
//! # }
//! ```

mod config;
pub use config::Config;

mod credential;
pub use credential::Credential;

mod canonical;
pub use canonical::{
    canonical_headers, canonical_path, canonical_query_string, canonical_request, payload_hash,
    signed_headers,
};

mod key;
pub use key::derive_signing_key;

mod sign_request;
pub use sign_request::{authorization_value, new_nonce, scope_id, sign, string_to_sign};
pub use sign_request::RequestSigner;

mod provide_credential;
pub use provide_credential::*;

mod client;
pub use client::{Client, ClientConfig, ServiceErrorResponse};

mod constants;
pub use constants::X_STORMPATH_DATE;
