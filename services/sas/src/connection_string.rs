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

use std::collections::HashMap;

use tablesign_core::{Error, Result};

use crate::constants::*;
use crate::SharedKeyCredential;

/// Parses the shared key out of a [storage connection string][1].
///
/// [1]: https://learn.microsoft.com/en-us/azure/storage/common/storage-configure-connection-string
pub(crate) fn parse(conn_str: &str) -> Result<SharedKeyCredential> {
    let key_values = parse_into_key_values(conn_str)?;

    // Emulator connection strings may override the well-known account.
    if key_values.get(USE_DEVELOPMENT_STORAGE).map(String::as_str) == Some("true") {
        return Ok(SharedKeyCredential::new(
            key_values
                .get(ACCOUNT_NAME)
                .map_or(DEVELOPMENT_ACCOUNT_NAME, String::as_str),
            key_values
                .get(ACCOUNT_KEY)
                .map_or(DEVELOPMENT_ACCOUNT_KEY, String::as_str),
        ));
    }

    let account_name = key_values.get(ACCOUNT_NAME).ok_or_else(|| {
        Error::argument(format!("connection string has no {ACCOUNT_NAME}")).with_field(ACCOUNT_NAME)
    })?;
    let account_key = key_values.get(ACCOUNT_KEY).ok_or_else(|| {
        Error::argument(format!("connection string has no {ACCOUNT_KEY}")).with_field(ACCOUNT_KEY)
    })?;

    Ok(SharedKeyCredential::new(account_name, account_key))
}

fn parse_into_key_values(conn_str: &str) -> Result<HashMap<String, String>> {
    conn_str
        .trim()
        .replace("\n", "")
        .split(';')
        .filter(|&field| !field.trim().is_empty())
        .map(|field| {
            // Only split on the first '=', base64 keys end with padding.
            let (key, value) = field.trim().split_once('=').ok_or_else(|| {
                Error::parse(format!(
                    "invalid connection string, expected '=' in field: {}",
                    field.trim()
                ))
            })?;
            Ok((key.to_string(), value.to_string()))
        })
        .collect()
}
