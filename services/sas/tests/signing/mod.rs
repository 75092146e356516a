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

mod properties;
mod verify;

use chrono::{TimeZone, Utc};
use tablesign_core::hash::base64_encode;
use tablesign_core::time::DateTime;
use tablesign_sas::{SasBuilder, SasPermission, SharedKeyCredential};

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn test_credential() -> SharedKeyCredential {
    SharedKeyCredential::new("acct", &base64_encode(b"K"))
}

pub fn test_expiry() -> DateTime {
    Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
}

/// An account builder with every signed field set.
pub fn full_account_builder() -> SasBuilder {
    SasBuilder::new()
        .with_resource_types("sco".parse().unwrap())
        .with_permissions([SasPermission::Read, SasPermission::List])
        .with_starts_on(Utc.with_ymd_and_hms(2024, 12, 1, 8, 30, 0).unwrap())
        .with_expires_on(test_expiry())
        .with_ip_range("168.1.5.60-168.1.5.70".parse::<tablesign_sas::SasIpRange>().unwrap())
}

/// A table builder with every signed field set.
pub fn full_table_builder() -> SasBuilder {
    SasBuilder::for_table("People")
        .with_permissions_str("dar")
        .with_starts_on(Utc.with_ymd_and_hms(2024, 12, 1, 8, 30, 0).unwrap())
        .with_expires_on(test_expiry())
        .with_ip_range("2001:db8::1".parse::<std::net::IpAddr>().unwrap())
        .with_identifier("read-policy")
        .with_partition_key_range(Some("Smith"), Some("Smith"))
        .with_row_key_range(Some("1"), Some("9"))
}
