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

use percent_encoding::AsciiSet;
use percent_encoding::NON_ALPHANUMERIC;

// Wire tokens of the SAuthc1 scheme.
pub const AUTHENTICATION_SCHEME: &str = "SAuthc1";
pub const ALGORITHM: &str = "HMAC-SHA-256";
pub const ID_TERMINATOR: &str = "sauthc1_request";
pub const SAUTHC1_ID: &str = "sauthc1Id";
pub const SAUTHC1_SIGNED_HEADERS: &str = "sauthc1SignedHeaders";
pub const SAUTHC1_SIGNATURE: &str = "sauthc1Signature";

// Headers used in stormpath services.
pub const X_STORMPATH_DATE: &str = "x-stormpath-date";

// Env values used in stormpath services.
pub const STORMPATH_API_KEY_ID: &str = "STORMPATH_API_KEY_ID";
pub const STORMPATH_API_KEY_SECRET: &str = "STORMPATH_API_KEY_SECRET";
pub const STORMPATH_API_KEY_FILE: &str = "STORMPATH_API_KEY_FILE";

// Keys inside `apiKey.properties`.
pub const API_KEY_ID_PROPERTY: &str = "apiKey.id";
pub const API_KEY_SECRET_PROPERTY: &str = "apiKey.secret";
pub const DEFAULT_API_KEY_FILE: &str = "~/.stormpath/apiKey.properties";

pub const DEFAULT_BASE_URL: &str = "https://api.stormpath.com/v1/";
pub const DEFAULT_MAX_REDIRECTS: usize = 10;
pub const APPLICATION_JSON: &str = "application/json";

/// AsciiSet for canonical query keys and values.
///
/// - Encode every byte except the unreserved characters: 'A'-'Z', 'a'-'z', '0'-'9', '-', '.', '_', and '~'.
/// - Space becomes `%20` and `*` becomes `%2A`, never `+` or a literal `*`.
pub static SAUTHC1_QUERY_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// AsciiSet for the canonical path.
///
/// Same as [`SAUTHC1_QUERY_ENCODE_SET`] but keeps `/` so segment separators survive.
pub static SAUTHC1_PATH_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');
