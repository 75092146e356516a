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

use super::{full_account_builder, full_table_builder, test_credential, test_expiry};
use anyhow::Result;
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use pretty_assertions::assert_eq;
use std::collections::HashSet;
use tablesign_core::hash::base64_encode;
use tablesign_sas::{
    SasBuilder, SasIpRange, SasParameters, SasPermission, SasProtocol, SharedKeyCredential,
};
use test_case::test_case;

fn sign(builder: SasBuilder) -> String {
    builder
        .build_with_credential(&test_credential())
        .expect("build must succeed")
        .signature()
        .to_string()
}

#[test_case(full_account_builder(); "account")]
#[test_case(full_table_builder(); "table")]
#[test_case(SasBuilder::new().with_permissions_str("r").with_expires_on(test_expiry()); "minimal account")]
#[test_case(SasBuilder::for_table("t1").with_identifier("policy"); "stored policy")]
fn test_round_trip(builder: SasBuilder) -> Result<()> {
    let params = builder.build_with_credential(&test_credential())?;

    let (parsed, remaining) = SasParameters::from_query_string(&params.to_query_string())?;
    assert!(remaining.is_empty());
    assert_eq!(parsed, params);
    assert_eq!(parsed.to_query_string(), params.to_query_string());
    Ok(())
}

#[test]
fn test_permission_order_does_not_matter() {
    let perms = [
        SasPermission::Read,
        SasPermission::Write,
        SasPermission::Delete,
        SasPermission::List,
    ];
    let expected = sign(
        SasBuilder::new()
            .with_permissions_str("rwdl")
            .with_expires_on(test_expiry()),
    );

    // Every rotation, forwards and backwards, plus duplicates.
    for i in 0..perms.len() {
        let mut rotated = perms.to_vec();
        rotated.rotate_left(i);
        let mut reversed = rotated.clone();
        reversed.reverse();
        let mut doubled = rotated.clone();
        doubled.extend(reversed.iter().copied());

        for input in [rotated, reversed, doubled] {
            let sig = sign(
                SasBuilder::new()
                    .with_permissions(input.clone())
                    .with_expires_on(test_expiry()),
            );
            assert_eq!(sig, expected, "Failed on input: {:?}", input);
        }
    }

    assert_eq!(
        sign(
            SasBuilder::new()
                .with_permissions_str("ldwr")
                .with_expires_on(test_expiry())
        ),
        expected
    );
}

#[test]
fn test_different_keys_never_collide() {
    let builder = full_account_builder();

    let mut seen = HashSet::new();
    for i in 0u32..128 {
        let mut key = b"0123456789abcdef".to_vec();
        key.extend_from_slice(&i.to_be_bytes());

        let cred = SharedKeyCredential::new("acct", &base64_encode(&key));
        let sig = builder
            .build_with_credential(&cred)
            .expect("build must succeed")
            .signature()
            .to_string();
        assert!(seen.insert(sig), "collision on key {i}");
    }
    assert_eq!(seen.len(), 128);
}

#[test]
fn test_single_byte_key_change_changes_signature() {
    let builder = full_table_builder();
    let base = SharedKeyCredential::new("acct", &base64_encode(&[7u8; 64]));
    let expected = builder.build_with_credential(&base).unwrap();

    for idx in 0..64 {
        let mut key = [7u8; 64];
        key[idx] ^= 1;
        let cred = SharedKeyCredential::new("acct", &base64_encode(&key));
        let params = builder.build_with_credential(&cred).unwrap();
        assert_ne!(params.signature(), expected.signature(), "byte {idx}");
    }
}

#[test]
fn test_every_signed_field_changes_signature() {
    let base = full_account_builder();
    let expected = sign(base.clone());

    let variations: Vec<(&str, SasBuilder)> = vec![
        ("permissions", base.clone().with_permissions_str("rwl")),
        (
            "start",
            base.clone()
                .with_starts_on("2024-12-01T08:30:01Z".parse::<DateTime<Utc>>().unwrap()),
        ),
        (
            "expiry",
            base.clone()
                .with_expires_on(test_expiry() + TimeDelta::seconds(1)),
        ),
        ("protocol", base.clone().with_protocol(SasProtocol::HttpsAndHttp)),
        ("no protocol", base.clone().with_protocol(SasProtocol::None)),
        ("version", base.clone().with_version("2020-12-06")),
        (
            "ip range",
            base.clone()
                .with_ip_range("168.1.5.60-168.1.5.71".parse::<SasIpRange>().unwrap()),
        ),
        (
            "resource types",
            base.clone().with_resource_types("sc".parse().unwrap()),
        ),
    ];

    for (name, builder) in variations {
        assert_ne!(sign(builder), expected, "{name} didn't change the signature");
    }

    // Same inputs under the other scope.
    let account_sig = sign(
        SasBuilder::new()
            .with_permissions_str("r")
            .with_expires_on(test_expiry()),
    );
    let table_sig = sign(
        SasBuilder::for_table("t1")
            .with_permissions_str("r")
            .with_expires_on(test_expiry()),
    );
    assert_ne!(account_sig, table_sig);
}

#[test]
fn test_every_table_field_changes_signature() {
    let base = full_table_builder();
    let expected = sign(base.clone());

    let variations: Vec<(&str, SasBuilder)> = vec![
        ("table", base.clone().with_table_name("Peoples")),
        ("identifier", base.clone().with_identifier("other-policy")),
        ("partition keys", base.clone().with_partition_key_range(Some("Smith"), None)),
        ("row keys", base.clone().with_row_key_range(Some("1"), Some("8"))),
        ("permissions", base.clone().with_permissions_str("r")),
    ];

    for (name, builder) in variations {
        assert_ne!(sign(builder), expected, "{name} didn't change the signature");
    }

    // Table names are signed lowercased.
    assert_eq!(sign(base.clone().with_table_name("PEOPLE")), expected);
}

#[test]
fn test_unset_expiry_differs_from_epoch() {
    let epoch_time = Utc.timestamp_opt(0, 0).unwrap();
    let base = SasBuilder::for_table("t1").with_identifier("policy");

    let unset = base.clone().build_with_credential(&test_credential()).unwrap();
    let epoch = base
        .clone()
        .with_expires_on(epoch_time)
        .build_with_credential(&test_credential())
        .unwrap();

    assert_eq!(unset.expires_on(), None);
    assert_eq!(epoch.expires_on(), Some(epoch_time));
    assert_ne!(unset.signature(), epoch.signature());
    assert!(epoch.to_query_string().contains("se=1970-01-01T00%3A00%3A00Z"));
    assert!(!unset.to_query_string().contains("se="));
}

#[test]
fn test_keys_are_case_insensitive() -> Result<()> {
    let (lower, _) =
        SasParameters::from_query_string("sv=2021-01-01&sp=r&se=2025-01-01T00%3A00%3A00Z")?;
    let (upper, _) =
        SasParameters::from_query_string("SV=2021-01-01&Sp=r&sE=2025-01-01T00%3A00%3A00Z")?;

    assert_eq!(lower, upper);
    assert_eq!(upper.version(), "2021-01-01");
    assert_eq!(upper.expires_on(), Some(test_expiry()));
    Ok(())
}
