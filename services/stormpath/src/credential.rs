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

use sauthc1_core::utils::Redact;
use sauthc1_core::SigningCredential;
use std::fmt::{Debug, Formatter};

/// Credential that holds the api key id and secret.
///
/// Stormpath api keys never expire on their own, so there is no expiry to track.
#[derive(Default, Clone, PartialEq, Eq)]
pub struct Credential {
    /// Api key id, the public half that shows up in `sauthc1Id`.
    pub id: String,
    /// Api key secret, only ever used as HMAC key material.
    pub secret: String,
}

impl Credential {
    /// Create a new credential.
    pub fn new(id: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            secret: secret.into(),
        }
    }
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("id", &Redact::from(&self.id))
            .field("secret", &Redact::from(&self.secret))
            .finish()
    }
}

impl SigningCredential for Credential {
    fn is_valid(&self) -> bool {
        !self.id.is_empty() && !self.secret.is_empty()
    }
}
