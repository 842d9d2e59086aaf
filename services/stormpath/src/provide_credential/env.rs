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

use crate::{constants::*, Credential};
use async_trait::async_trait;
use sauthc1_core::{Context, ProvideCredential, Result};

/// EnvCredentialProvider loads the api key from environment variables.
///
/// This provider looks for the following environment variables:
/// - `STORMPATH_API_KEY_ID`: The api key id
/// - `STORMPATH_API_KEY_SECRET`: The api key secret
///
/// Both must be present, otherwise nothing is loaded.
#[derive(Debug, Default, Clone)]
pub struct EnvCredentialProvider;

impl EnvCredentialProvider {
    /// Create a new EnvCredentialProvider.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProvideCredential for EnvCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let id = ctx.env_var(STORMPATH_API_KEY_ID);
        let secret = ctx.env_var(STORMPATH_API_KEY_SECRET);

        match (id, secret) {
            (Some(id), Some(secret)) => Ok(Some(Credential { id, secret })),
            _ => Ok(None),
        }
    }
}
