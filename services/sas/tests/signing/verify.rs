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

use super::{full_account_builder, full_table_builder, init_logger, test_credential};
use anyhow::Result;
use tablesign_core::hash::base64_encode;
use tablesign_core::ErrorKind;
use tablesign_sas::{SasBuilder, SasParameters, SharedKeyCredential};
use test_case::test_case;

/// Replace `key` in an encoded query string, dropping it when `value` is `None`.
fn tamper(query: &str, key: &str, value: Option<&str>) -> String {
    query
        .split('&')
        .filter_map(|pair| match pair.split_once('=') {
            Some((k, _)) if k == key => value.map(|v| format!("{k}={v}")),
            _ => Some(pair.to_string()),
        })
        .collect::<Vec<_>>()
        .join("&")
}

#[test_case(full_account_builder(); "account")]
#[test_case(full_table_builder(); "table")]
#[test_case(SasBuilder::for_table("t1").with_identifier("policy"); "stored policy")]
fn test_verify_built_token(builder: SasBuilder) -> Result<()> {
    init_logger();

    let query = builder.build_with_credential(&test_credential())?.to_query_string();
    let (parsed, _) = SasParameters::from_query_string(&query)?;

    parsed.verify(&test_credential())?;
    Ok(())
}

#[test_case("sp", Some("rwl"); "escalated permissions")]
#[test_case("se", Some("2026-01-01T00%3A00%3A00Z"); "extended expiry")]
#[test_case("st", None; "dropped start")]
#[test_case("sip", None; "dropped ip range")]
#[test_case("spr", Some("https%2Chttp"); "downgraded protocol")]
#[test_case("srt", Some("o"); "changed resource types")]
#[test_case("sv", Some("2020-12-06"); "changed version")]
fn test_verify_rejects_tampered_account_token(key: &str, value: Option<&str>) -> Result<()> {
    let query = full_account_builder()
        .build_with_credential(&test_credential())?
        .to_query_string();
    assert!(query.contains(&format!("{key}=")), "{key} must be signed");

    let (parsed, _) = SasParameters::from_query_string(&tamper(&query, key, value))?;
    let err = parsed.verify(&test_credential()).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.field(), Some("sig"));
    Ok(())
}

#[test_case("tn", Some("Other"); "other table")]
#[test_case("si", Some("write-policy"); "other policy")]
#[test_case("spk", Some("Jones"); "wider partition range")]
#[test_case("erk", None; "open row range")]
fn test_verify_rejects_tampered_table_token(key: &str, value: Option<&str>) -> Result<()> {
    let query = full_table_builder()
        .build_with_credential(&test_credential())?
        .to_query_string();

    let (parsed, _) = SasParameters::from_query_string(&tamper(&query, key, value))?;
    let err = parsed.verify(&test_credential()).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    Ok(())
}

#[test_case("tn=Secret", "tn"; "table name")]
#[test_case("si=admin", "si"; "identifier")]
#[test_case("spk=a", "spk"; "start partition key")]
#[test_case("srk=a", "srk"; "start row key")]
#[test_case("epk=z", "epk"; "end partition key")]
#[test_case("erk=z", "erk"; "end row key")]
#[test_case("tn=Secret&si=admin&spk=a", "si"; "several fields")]
fn test_verify_rejects_fields_account_scope_does_not_sign(
    extra: &str,
    field: &str,
) -> Result<()> {
    let query = full_account_builder()
        .build_with_credential(&test_credential())?
        .to_query_string();

    let (parsed, _) = SasParameters::from_query_string(&format!("{query}&{extra}"))?;
    let err = parsed.verify(&test_credential()).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.field(), Some(field));
    Ok(())
}

#[test]
fn test_verify_rejects_resource_types_on_table_token() -> Result<()> {
    let query = full_table_builder()
        .build_with_credential(&test_credential())?
        .to_query_string();

    let (parsed, _) = SasParameters::from_query_string(&format!("{query}&srt=sco"))?;
    let err = parsed.verify(&test_credential()).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.field(), Some("srt"));
    Ok(())
}

#[test]
fn test_verify_table_name_case_is_not_signed() -> Result<()> {
    let query = full_table_builder()
        .build_with_credential(&test_credential())?
        .to_query_string();

    let (parsed, _) = SasParameters::from_query_string(&tamper(&query, "tn", Some("PEOPLE")))?;
    parsed.verify(&test_credential())?;
    Ok(())
}

#[test]
fn test_verify_rejects_wrong_key() -> Result<()> {
    let params = full_account_builder().build_with_credential(&test_credential())?;

    let other = SharedKeyCredential::new("acct", &base64_encode(b"L"));
    let err = params.verify(&other).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.field(), Some("sig"));

    let other = SharedKeyCredential::new("other", &base64_encode(b"K"));
    let err = params.verify(&other).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    Ok(())
}

#[test_case("sr", Some("b"), "sr"; "unknown scope")]
#[test_case("sr", None, "sr"; "missing scope")]
#[test_case("sig", None, "sig"; "missing signature")]
#[test_case("sig", Some("not%20base64%21"), "sig"; "signature not base64")]
fn test_verify_rejects_malformed_token(key: &str, value: Option<&str>, field: &str) -> Result<()> {
    let query = full_account_builder()
        .build_with_credential(&test_credential())?
        .to_query_string();

    let (parsed, _) = SasParameters::from_query_string(&tamper(&query, key, value))?;
    let err = parsed.verify(&test_credential()).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.field(), Some(field));
    Ok(())
}

#[test]
fn test_verify_requires_credential() -> Result<()> {
    let params = full_account_builder().build_with_credential(&test_credential())?;

    let err = params
        .verify(&SharedKeyCredential::new("acct", ""))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Argument);
    assert_eq!(err.field(), Some("account_key"));
    Ok(())
}
