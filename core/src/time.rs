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

use crate::{Error, Result};
use chrono::{FixedOffset, Local, Utc};

/// DateTime is the alias for `chrono::DateTime<Utc>`.
pub type DateTime = chrono::DateTime<Utc>;

/// Create datetime of now.
pub fn now() -> DateTime {
    Utc::now()
}

/// Current local time carrying the local timezone offset.
pub fn local_now() -> chrono::DateTime<FixedOffset> {
    Local::now().fixed_offset()
}

/// Format time into date: `20220301`
pub fn format_date(t: DateTime) -> String {
    t.format("%Y%m%d").to_string()
}

/// Format time into ISO8601: `20220313T072004Z`
pub fn format_iso8601(t: DateTime) -> String {
    t.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Parse time from RFC3339.
///
/// All these examples are valid:
///
/// - `2022-03-13T07:20:04Z`
/// - `2022-03-01T08:12:34+00:00`
/// - `2022-03-01T08:12:34.123456-08:00`
pub fn parse_rfc3339(s: &str) -> Result<DateTime> {
    Ok(chrono::DateTime::parse_from_rfc3339(s)
        .map_err(|e| {
            Error::unexpected(format!("parse '{s}' into rfc3339 failed")).with_source(e)
        })?
        .with_timezone(&Utc))
}

/// Convert epoch seconds, possibly fractional, into datetime.
pub fn from_epoch_seconds(secs: f64) -> Result<DateTime> {
    if !secs.is_finite() {
        return Err(Error::unexpected(format!(
            "epoch seconds '{secs}' is not a finite number"
        )));
    }

    let whole = secs.floor();
    let nanos = ((secs - whole) * 1_000_000_000.0).round() as u32;
    chrono::DateTime::from_timestamp(whole as i64, nanos.min(999_999_999))
        .ok_or_else(|| Error::unexpected(format!("epoch seconds '{secs}' is out of range")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn test_time() -> DateTime {
        Utc.with_ymd_and_hms(2022, 3, 1, 8, 12, 34).unwrap()
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(test_time()), "20220301")
    }

    #[test]
    fn test_format_iso8601() {
        assert_eq!(format_iso8601(test_time()), "20220301T081234Z")
    }

    #[test]
    fn test_parse_rfc3339() {
        for v in [
            "2022-03-01T08:12:34Z",
            "2022-03-01T08:12:34+00:00",
            "2022-03-01T16:12:34+08:00",
        ] {
            assert_eq!(parse_rfc3339(v).expect("must succeed"), test_time(), "{v}");
        }

        assert!(parse_rfc3339("yesterday").is_err());
    }

    #[test]
    fn test_from_epoch_seconds() {
        assert_eq!(
            from_epoch_seconds(1646122354.0).expect("must succeed"),
            test_time()
        );
        assert_eq!(
            from_epoch_seconds(1646122354.5)
                .expect("must succeed")
                .timestamp_subsec_millis(),
            500
        );
        assert!(from_epoch_seconds(f64::NAN).is_err());
    }

    #[test]
    fn test_local_now_compares_with_utc() {
        let before = now();
        let local = local_now();
        assert!(local >= before);
    }
}
