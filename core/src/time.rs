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
use chrono::SubsecRound;
use chrono::Utc;

/// DateTime is the alias for `chrono::DateTime<Utc>`.
pub type DateTime = chrono::DateTime<Utc>;

/// The only time format accepted in SAS tokens: "2022-03-13T07:20:04Z"
pub const SAS_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Create a new DateTime for now.
pub fn now() -> DateTime {
    Utc::now()
}

/// Format time into SAS format: `2022-03-13T07:20:04Z`
pub fn format_sas_time(t: DateTime) -> String {
    t.format(SAS_TIME_FORMAT).to_string()
}

/// Parse time from SAS format: `2022-03-13T07:20:04Z`
pub fn parse_sas_time(s: &str) -> crate::Result<DateTime> {
    NaiveDateTime::parse_from_str(s, SAS_TIME_FORMAT)
        .map(|v| v.and_utc())
        .map_err(|e| {
            Error::format(format!(
                "time `{s}` doesn't match expected format yyyy-MM-ddTHH:mm:ssZ"
            ))
            .with_source(e)
        })
}

/// Drop the sub-second part, which SAS time fields can't carry.
pub fn truncate_to_seconds(t: DateTime) -> DateTime {
    t.trunc_subsecs(0)
}
