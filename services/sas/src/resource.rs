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

use std::fmt;

use log::debug;
use tablesign_core::time::format_sas_time;
use tablesign_core::{Error, Result};

use crate::constants::*;
use crate::{SasParameters, SasPermission};

const ACCOUNT_PERMISSIONS: &[SasPermission] = &[
    SasPermission::Read,
    SasPermission::Write,
    SasPermission::Delete,
    SasPermission::List,
    SasPermission::Add,
    SasPermission::Create,
    SasPermission::Update,
    SasPermission::Process,
];

const TABLE_PERMISSIONS: &[SasPermission] = &[
    SasPermission::Read,
    SasPermission::Add,
    SasPermission::Update,
    SasPermission::Delete,
];

/// The scope a SAS grants access to.
///
/// Each scope owns its permission alphabet and the layout of its string to sign.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum SasResource {
    /// Account level token, code `a`.
    #[default]
    Account,
    /// Token for a single table, code `t`.
    Table,
}

impl SasResource {
    /// Code written to `sr`.
    pub fn code(&self) -> &'static str {
        match self {
            SasResource::Account => "a",
            SasResource::Table => "t",
        }
    }

    /// Look up the scope for an `sr` code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "a" => Some(SasResource::Account),
            "t" => Some(SasResource::Table),
            _ => None,
        }
    }

    /// Permissions the scope allows, in signing order.
    pub fn permission_order(&self) -> &'static [SasPermission] {
        match self {
            SasResource::Account => ACCOUNT_PERMISSIONS,
            SasResource::Table => TABLE_PERMISSIONS,
        }
    }

    /// Rewrite a permission string into the scope's canonical order.
    ///
    /// Duplicates are dropped. A character outside the scope's alphabet fails
    /// with [`ErrorKind::Validation`](tablesign_core::ErrorKind::Validation).
    pub fn normalize_permissions(&self, permissions: &str) -> Result<String> {
        let order = self.permission_order();
        let mut granted = vec![false; order.len()];

        for c in permissions.chars() {
            let Some(idx) = order.iter().position(|p| p.code() == c) else {
                return Err(Error::validation(format!(
                    "{SAS_PERMISSIONS} contains `{c}` which is not allowed for {self} scope, expected any of `{}`",
                    order.iter().map(SasPermission::code).collect::<String>()
                ))
                .with_field(SAS_PERMISSIONS));
            };
            granted[idx] = true;
        }

        Ok(order
            .iter()
            .zip(granted)
            .filter(|(_, granted)| *granted)
            .map(|(p, _)| p.code())
            .collect())
    }

    /// Reject fields that `params` carries but this scope doesn't sign.
    ///
    /// Account scope doesn't sign `si`, `tn` or the key range, table scope
    /// doesn't sign `srt`. A violation fails with
    /// [`ErrorKind::Validation`](tablesign_core::ErrorKind::Validation) on the
    /// offending key.
    pub fn check_fields(&self, params: &SasParameters) -> Result<()> {
        let unsigned: Vec<(&'static str, bool)> = match self {
            SasResource::Account => vec![
                (SAS_IDENTIFIER, !params.identifier().is_empty()),
                (SAS_TABLE_NAME, !params.table_name().is_empty()),
                (
                    SAS_START_PARTITION_KEY,
                    !params.start_partition_key().is_empty(),
                ),
                (SAS_START_ROW_KEY, !params.start_row_key().is_empty()),
                (SAS_END_PARTITION_KEY, !params.end_partition_key().is_empty()),
                (SAS_END_ROW_KEY, !params.end_row_key().is_empty()),
            ],
            SasResource::Table => vec![(SAS_RESOURCE_TYPES, params.resource_types().is_some())],
        };

        match unsigned.into_iter().find(|(_, present)| *present) {
            Some((field, _)) => Err(Error::validation(format!(
                "{field} is not supported for {self} scope"
            ))
            .with_field(field)),
            None => Ok(()),
        }
    }

    /// Construct the string to sign for `params`.
    ///
    /// Every field keeps its line even when unset, so an unset time signs
    /// differently from any explicit one.
    ///
    /// ## Format
    ///
    /// Account scope:
    ///
    /// ```text
    /// AccountName + "\n" +
    /// Permissions + "\n" +
    /// Service + "\n" +
    /// ResourceTypes + "\n" +
    /// Start + "\n" +
    /// Expiry + "\n" +
    /// IPRange + "\n" +
    /// Protocol + "\n" +
    /// Version + "\n"
    /// ```
    ///
    /// Table scope:
    ///
    /// ```text
    /// Permissions + "\n" +
    /// Start + "\n" +
    /// Expiry + "\n" +
    /// "/table/" + AccountName + "/" + lowercase(TableName) + "\n" +
    /// Identifier + "\n" +
    /// IPRange + "\n" +
    /// Protocol + "\n" +
    /// Version + "\n" +
    /// StartPartitionKey + "\n" +
    /// StartRowKey + "\n" +
    /// EndPartitionKey + "\n" +
    /// EndRowKey
    /// ```
    pub(crate) fn string_to_sign(&self, account_name: &str, params: &SasParameters) -> Result<String> {
        let start = params.starts_on().map(format_sas_time).unwrap_or_default();
        let expiry = params.expires_on().map(format_sas_time).unwrap_or_default();
        let ip_range = params.ip_range().map(|v| v.to_string()).unwrap_or_default();
        let protocol = params.protocol().as_str();

        let s = match self {
            SasResource::Account => {
                let resource_types = params
                    .resource_types()
                    .map(|v| v.to_string())
                    .unwrap_or_default();

                [
                    account_name,
                    params.permissions(),
                    TABLE_SERVICE,
                    resource_types.as_str(),
                    start.as_str(),
                    expiry.as_str(),
                    ip_range.as_str(),
                    protocol,
                    params.version(),
                    "",
                ]
                .join("\n")
            }
            SasResource::Table => {
                if params.table_name().is_empty() {
                    return Err(Error::argument(format!(
                        "{SAS_TABLE_NAME} is required for table scope"
                    ))
                    .with_field(SAS_TABLE_NAME));
                }
                let canonical_resource = format!(
                    "/table/{}/{}",
                    account_name,
                    params.table_name().to_lowercase()
                );

                [
                    params.permissions(),
                    start.as_str(),
                    expiry.as_str(),
                    canonical_resource.as_str(),
                    params.identifier(),
                    ip_range.as_str(),
                    protocol,
                    params.version(),
                    params.start_partition_key(),
                    params.start_row_key(),
                    params.end_partition_key(),
                    params.end_row_key(),
                ]
                .join("\n")
            }
        };

        debug!("string to sign: {}", &s);

        Ok(s)
    }
}

impl fmt::Display for SasResource {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SasResource::Account => write!(f, "account"),
            SasResource::Table => write!(f, "table"),
        }
    }
}
