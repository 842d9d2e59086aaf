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

//! Time related utils.

use crate::Error;
use chrono::NaiveDateTime;
use chrono::Utc;

/// DateTime is the alias for chrono::DateTime<Utc>.
pub type DateTime = chrono::DateTime<Utc>;

const DATE: &str = "%Y%m%d";
const ISO8601: &str = "%Y%m%dT%H%M%SZ";

/// Create datetime of now.
pub fn now() -> DateTime {
    Utc::now()
}

/// Format time into date: `20220301`
pub fn format_date(t: DateTime) -> String {
    t.format(DATE).to_string()
}

/// Format time into ISO8601 basic format: `20220313T072004Z`
pub fn format_iso8601(t: DateTime) -> String {
    t.format(ISO8601).to_string()
}

/// Parse time from ISO8601 basic format: `20220313T072004Z`
///
/// Returns [`crate::ErrorKind::TimestampMalformed`] if the input can't be parsed.
pub fn parse_iso8601(s: &str) -> crate::Result<DateTime> {
    NaiveDateTime::parse_from_str(s, ISO8601)
        .map(|t| t.and_utc())
        .map_err(|e| {
            Error::timestamp_malformed(format!("`{s}` is not in YYYYMMDDThhmmssZ form"))
                .with_source(e)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use chrono::TimeZone;

    fn test_time() -> DateTime {
        Utc.with_ymd_and_hms(2016, 3, 8, 23, 7, 40).unwrap()
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(test_time()), "20160308")
    }

    #[test]
    fn test_format_iso8601() {
        assert_eq!(format_iso8601(test_time()), "20160308T230740Z")
    }

    #[test]
    fn test_parse_iso8601() {
        let t = parse_iso8601("20160308T230740Z").expect("must be valid");
        assert_eq!(t, test_time());
        assert_eq!(format_iso8601(t), "20160308T230740Z");
    }

    #[test]
    fn test_parse_iso8601_malformed() {
        for input in ["", "2016-03-08T23:07:40Z", "20160308T230740", "20161308T230740Z"] {
            let err = parse_iso8601(input).expect_err("must fail");
            assert_eq!(err.kind(), ErrorKind::TimestampMalformed, "input: {input}");
        }
    }
}
