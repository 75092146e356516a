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

use tablesign_core::hash::base64_hmac_sha256;
use tablesign_core::time::{truncate_to_seconds, DateTime};
use tablesign_core::{Error, Result};

use crate::constants::*;
use crate::{
    ResourceTypes, SasIpRange, SasParameters, SasPermission, SasProtocol, SasResource,
    SharedKeyCredential,
};

/// Builder that signs shared access signatures with an account key.
///
/// - [Create an account SAS](https://learn.microsoft.com/en-us/rest/api/storageservices/create-account-sas)
/// - [Create a service SAS](https://learn.microsoft.com/en-us/rest/api/storageservices/create-service-sas)
///
/// Configure it, then call [`SasBuilder::build`]. The builder keeps no key and
/// can be reused to sign the same inputs for other accounts.
#[derive(Clone, Debug)]
pub struct SasBuilder {
    resource: SasResource,
    version: String,
    resource_types: Option<ResourceTypes>,
    protocol: SasProtocol,
    starts_on: Option<DateTime>,
    expires_on: Option<DateTime>,
    ip_range: Option<SasIpRange>,
    identifier: Option<String>,
    permissions: Option<String>,
    table_name: Option<String>,
    start_partition_key: Option<String>,
    start_row_key: Option<String>,
    end_partition_key: Option<String>,
    end_row_key: Option<String>,
}

impl Default for SasBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SasBuilder {
    /// Create a builder for an account scoped SAS.
    pub fn new() -> Self {
        Self {
            resource: SasResource::Account,
            version: DEFAULT_SAS_VERSION.to_string(),
            resource_types: None,
            protocol: SasProtocol::Https,
            starts_on: None,
            expires_on: None,
            ip_range: None,
            identifier: None,
            permissions: None,
            table_name: None,
            start_partition_key: None,
            start_row_key: None,
            end_partition_key: None,
            end_row_key: None,
        }
    }

    /// Create a builder for a SAS scoped to `table_name`.
    pub fn for_table(table_name: &str) -> Self {
        Self::new()
            .with_resource(SasResource::Table)
            .with_table_name(table_name)
    }

    /// Set the scope of the SAS.
    pub fn with_resource(mut self, resource: SasResource) -> Self {
        self.resource = resource;
        self
    }

    /// Set the service version, defaults to [`DEFAULT_SAS_VERSION`].
    pub fn with_version(mut self, version: &str) -> Self {
        self.version = version.to_string();
        self
    }

    /// Set the resource types of an account SAS.
    pub fn with_resource_types(mut self, resource_types: ResourceTypes) -> Self {
        self.resource_types = Some(resource_types);
        self
    }

    /// Set the allowed protocols, defaults to [`SasProtocol::Https`].
    pub fn with_protocol(mut self, protocol: SasProtocol) -> Self {
        self.protocol = protocol;
        self
    }

    /// Set the time the SAS becomes valid.
    ///
    /// Sub-second precision is dropped.
    pub fn with_starts_on(mut self, starts_on: DateTime) -> Self {
        self.starts_on = Some(truncate_to_seconds(starts_on));
        self
    }

    /// Set the time the SAS expires.
    ///
    /// Sub-second precision is dropped.
    pub fn with_expires_on(mut self, expires_on: DateTime) -> Self {
        self.expires_on = Some(truncate_to_seconds(expires_on));
        self
    }

    /// Restrict the addresses requests may come from.
    pub fn with_ip_range(mut self, ip_range: impl Into<SasIpRange>) -> Self {
        self.ip_range = Some(ip_range.into());
        self
    }

    /// Refer to a stored access policy on the table.
    pub fn with_identifier(mut self, identifier: &str) -> Self {
        self.identifier = Some(identifier.to_string());
        self
    }

    /// Grant `permissions`, in any order.
    pub fn with_permissions(mut self, permissions: impl IntoIterator<Item = SasPermission>) -> Self {
        self.permissions = Some(permissions.into_iter().map(|p| p.code()).collect());
        self
    }

    /// Grant permissions from a raw permission string like `"rw"`.
    ///
    /// The string is checked against the scope's alphabet at build time.
    pub fn with_permissions_str(mut self, permissions: &str) -> Self {
        self.permissions = Some(permissions.to_string());
        self
    }

    /// Set the table of a table scoped SAS.
    pub fn with_table_name(mut self, table_name: &str) -> Self {
        self.table_name = Some(table_name.to_string());
        self
    }

    /// Limit a table scoped SAS to partition keys in `start..=end`.
    ///
    /// Either side may be `None` to leave it open.
    pub fn with_partition_key_range(mut self, start: Option<&str>, end: Option<&str>) -> Self {
        self.start_partition_key = start.map(str::to_string);
        self.end_partition_key = end.map(str::to_string);
        self
    }

    /// Limit a table scoped SAS to row keys in `start..=end`.
    ///
    /// Either side may be `None` to leave it open.
    pub fn with_row_key_range(mut self, start: Option<&str>, end: Option<&str>) -> Self {
        self.start_row_key = start.map(str::to_string);
        self.end_row_key = end.map(str::to_string);
        self
    }

    /// Validate the inputs and sign them with `account_key`.
    ///
    /// `account_key` is the base64 encoded storage account key.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::Argument`](tablesign_core::ErrorKind::Argument) when the
    ///   account name, key, table name, expiry or permissions are missing.
    /// - [`ErrorKind::Validation`](tablesign_core::ErrorKind::Validation) when
    ///   the inputs break a signing rule.
    pub fn build(&self, account_name: &str, account_key: &str) -> Result<SasParameters> {
        self.build_with_credential(&SharedKeyCredential::new(account_name, account_key))
    }

    /// Same as [`SasBuilder::build`] with the account taken from `credential`.
    pub fn build_with_credential(&self, credential: &SharedKeyCredential) -> Result<SasParameters> {
        let key = credential.decoded_key()?;
        let mut params = self.to_unsigned_parameters()?;

        let string_to_sign = self
            .resource
            .string_to_sign(credential.account_name(), &params)?;
        params.signature = Some(base64_hmac_sha256(&key, string_to_sign.as_bytes()));

        Ok(params)
    }

    /// Check the inputs and lay them out as they'll be signed.
    fn to_unsigned_parameters(&self) -> Result<SasParameters> {
        let non_empty = |v: &Option<String>| v.clone().filter(|v| !v.is_empty());

        let identifier = non_empty(&self.identifier);
        let table_name = non_empty(&self.table_name);
        let key_range = [
            non_empty(&self.start_partition_key),
            non_empty(&self.start_row_key),
            non_empty(&self.end_partition_key),
            non_empty(&self.end_row_key),
        ];

        if self.version.is_empty() {
            return Err(Error::argument(format!("{SAS_VERSION} must not be empty"))
                .with_field(SAS_VERSION));
        }

        if self.resource == SasResource::Table && table_name.is_none() {
            return Err(
                Error::argument(format!("{SAS_TABLE_NAME} is required for table scope"))
                    .with_field(SAS_TABLE_NAME),
            );
        }

        if let Some(v) = &identifier {
            if v.chars().count() > MAX_IDENTIFIER_LENGTH {
                return Err(Error::validation(format!(
                    "{SAS_IDENTIFIER} must be at most {MAX_IDENTIFIER_LENGTH} characters"
                ))
                .with_field(SAS_IDENTIFIER));
            }
        }

        // Without a stored access policy, the token itself must carry
        // permissions and expiry.
        let permissions = match non_empty(&self.permissions) {
            Some(v) => Some(self.resource.normalize_permissions(&v)?),
            None if identifier.is_none() => {
                return Err(Error::argument(format!(
                    "{SAS_PERMISSIONS} is required without a stored access policy"
                ))
                .with_field(SAS_PERMISSIONS))
            }
            None => None,
        };
        if self.expires_on.is_none() && identifier.is_none() {
            return Err(Error::argument(format!(
                "{SAS_EXPIRY_TIME} is required without a stored access policy"
            ))
            .with_field(SAS_EXPIRY_TIME));
        }

        if let (Some(start), Some(expiry)) = (self.starts_on, self.expires_on) {
            if expiry < start {
                return Err(Error::validation(format!(
                    "{SAS_EXPIRY_TIME} must not be earlier than {SAS_START_TIME}"
                ))
                .with_field(SAS_EXPIRY_TIME));
            }
        }

        if let Some(ip_range) = &self.ip_range {
            ip_range.validate()?;
        }

        let [start_partition_key, start_row_key, end_partition_key, end_row_key] = key_range;

        let params = SasParameters {
            version: Some(self.version.clone()),
            resource_types: self.resource_types,
            protocol: self.protocol,
            starts_on: self.starts_on,
            expires_on: self.expires_on,
            ip_range: self.ip_range,
            identifier,
            resource: Some(self.resource.code().to_string()),
            permissions,
            signature: None,
            table_name,
            start_partition_key,
            start_row_key,
            end_partition_key,
            end_row_key,
        };
        // Fields the scope doesn't sign would ride along unauthenticated.
        self.resource.check_fields(&params)?;

        Ok(params)
    }
}
