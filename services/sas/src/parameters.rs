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

use std::fmt::{self, Debug, Display, Formatter};
use std::str::FromStr;

use http::uri::PathAndQuery;
use http::Uri;
use log::debug;
use tablesign_core::hash::{base64_decode, verify_hmac_sha256};
use tablesign_core::time::{self, DateTime};
use tablesign_core::utils::Redact;
use tablesign_core::{Error, Result};

use crate::constants::*;
use crate::{ResourceTypes, SasIpRange, SasProtocol, SasResource, SharedKeyCredential};

/// The query parameters that make up a shared access signature.
///
/// A value is either produced by [`SasBuilder`](crate::SasBuilder), in which case
/// it carries a signature over its own fields, or parsed from an untrusted query
/// string, in which case nothing about it has been checked until
/// [`SasParameters::verify`] is called.
///
/// Accessors never fail: unset string fields read as `""` and unset times as `None`.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SasParameters {
    pub(crate) version: Option<String>,
    pub(crate) resource_types: Option<ResourceTypes>,
    pub(crate) protocol: SasProtocol,
    pub(crate) starts_on: Option<DateTime>,
    pub(crate) expires_on: Option<DateTime>,
    pub(crate) ip_range: Option<SasIpRange>,
    pub(crate) identifier: Option<String>,
    pub(crate) resource: Option<String>,
    pub(crate) permissions: Option<String>,
    pub(crate) signature: Option<String>,
    pub(crate) table_name: Option<String>,
    pub(crate) start_partition_key: Option<String>,
    pub(crate) start_row_key: Option<String>,
    pub(crate) end_partition_key: Option<String>,
    pub(crate) end_row_key: Option<String>,
}

impl Debug for SasParameters {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("SasParameters")
            .field("version", &self.version)
            .field("resource_types", &self.resource_types)
            .field("protocol", &self.protocol)
            .field("starts_on", &self.starts_on)
            .field("expires_on", &self.expires_on)
            .field("ip_range", &self.ip_range)
            .field("identifier", &self.identifier)
            .field("resource", &self.resource)
            .field("permissions", &self.permissions)
            .field("signature", &Redact::from(&self.signature))
            .field("table_name", &self.table_name)
            .field("start_partition_key", &self.start_partition_key)
            .field("start_row_key", &self.start_row_key)
            .field("end_partition_key", &self.end_partition_key)
            .field("end_row_key", &self.end_row_key)
            .finish()
    }
}

impl SasParameters {
    /// Service version the token was signed for, [`DEFAULT_SAS_VERSION`] if absent.
    pub fn version(&self) -> &str {
        self.version.as_deref().unwrap_or(DEFAULT_SAS_VERSION)
    }

    /// Resource types an account token is valid for.
    pub fn resource_types(&self) -> Option<ResourceTypes> {
        self.resource_types
    }

    /// Protocols requests must use.
    pub fn protocol(&self) -> SasProtocol {
        self.protocol
    }

    /// Time the token becomes valid, `None` means immediately.
    pub fn starts_on(&self) -> Option<DateTime> {
        self.starts_on
    }

    /// Time the token stops being valid, `None` means the token doesn't carry one.
    pub fn expires_on(&self) -> Option<DateTime> {
        self.expires_on
    }

    /// Addresses requests are accepted from, `None` means any.
    pub fn ip_range(&self) -> Option<SasIpRange> {
        self.ip_range
    }

    /// Stored access policy the token refers to.
    pub fn identifier(&self) -> &str {
        self.identifier.as_deref().unwrap_or_default()
    }

    /// Scope code of the token, see [`SasResource::code`].
    pub fn resource(&self) -> &str {
        self.resource.as_deref().unwrap_or_default()
    }

    /// Permission codes granted by the token.
    pub fn permissions(&self) -> &str {
        self.permissions.as_deref().unwrap_or_default()
    }

    /// Base64 encoded HMAC-SHA256 signature.
    pub fn signature(&self) -> &str {
        self.signature.as_deref().unwrap_or_default()
    }

    /// Table a table scoped token is valid for.
    pub fn table_name(&self) -> &str {
        self.table_name.as_deref().unwrap_or_default()
    }

    /// Lowest partition key a table scoped token can access.
    pub fn start_partition_key(&self) -> &str {
        self.start_partition_key.as_deref().unwrap_or_default()
    }

    /// Lowest row key a table scoped token can access.
    pub fn start_row_key(&self) -> &str {
        self.start_row_key.as_deref().unwrap_or_default()
    }

    /// Highest partition key a table scoped token can access.
    pub fn end_partition_key(&self) -> &str {
        self.end_partition_key.as_deref().unwrap_or_default()
    }

    /// Highest row key a table scoped token can access.
    pub fn end_row_key(&self) -> &str {
        self.end_row_key.as_deref().unwrap_or_default()
    }

    /// Whether `now` lies inside the token's time window.
    ///
    /// Unset bounds are treated as open.
    pub fn is_valid_at(&self, now: DateTime) -> bool {
        self.starts_on.map_or(true, |v| v <= now) && self.expires_on.map_or(true, |v| now <= v)
    }

    /// Same as [`SasParameters::is_valid_at`] with the current time.
    pub fn is_valid_now(&self) -> bool {
        self.is_valid_at(time::now())
    }

    /// Build parameters out of already percent-decoded query pairs.
    ///
    /// Keys are matched case-insensitively. SAS keys are taken out, everything
    /// else is returned untouched and in input order as the second element, so
    /// callers get the rest of their query string back without the SAS.
    ///
    /// Text fields are kept byte for byte. Typed fields are parsed into their
    /// values and serialize back canonically: `srt=ocs` is written as `sco`,
    /// IPv6 addresses in `sip` are written in lower case compressed form, and
    /// times are written in the SAS time format. Only the typed fields are checked:
    /// `st` and `se` fail with [`ErrorKind::Format`](tablesign_core::ErrorKind::Format),
    /// `srt`, `spr` and `sip` fail with [`ErrorKind::Parse`](tablesign_core::ErrorKind::Parse).
    /// Permissions are not checked against the scope here.
    ///
    /// If a key shows up more than once, the last value wins.
    pub fn parse<I, K, V>(values: I) -> Result<(Self, Vec<(String, String)>)>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut params = SasParameters::default();
        let mut remaining = Vec::new();

        for (k, v) in values {
            let (key, value) = (k.as_ref(), v.as_ref());

            match key.to_ascii_lowercase().as_str() {
                SAS_VERSION => params.version = Some(value.to_string()),
                SAS_RESOURCE_TYPES => params.resource_types = Some(value.parse()?),
                SAS_PROTOCOL => params.protocol = value.parse()?,
                SAS_START_TIME => params.starts_on = Some(parse_time(SAS_START_TIME, value)?),
                SAS_EXPIRY_TIME => params.expires_on = Some(parse_time(SAS_EXPIRY_TIME, value)?),
                SAS_IP_RANGE => params.ip_range = Some(value.parse()?),
                SAS_IDENTIFIER => params.identifier = Some(value.to_string()),
                SAS_RESOURCE => params.resource = Some(value.to_string()),
                SAS_PERMISSIONS => params.permissions = Some(value.to_string()),
                SAS_SIGNATURE => params.signature = Some(value.to_string()),
                SAS_TABLE_NAME => params.table_name = Some(value.to_string()),
                SAS_START_PARTITION_KEY => params.start_partition_key = Some(value.to_string()),
                SAS_START_ROW_KEY => params.start_row_key = Some(value.to_string()),
                SAS_END_PARTITION_KEY => params.end_partition_key = Some(value.to_string()),
                SAS_END_ROW_KEY => params.end_row_key = Some(value.to_string()),
                _ => remaining.push((key.to_string(), value.to_string())),
            }
        }

        debug!(
            "parsed sas parameters: {params:?}, {} query parameters left",
            remaining.len()
        );
        Ok((params, remaining))
    }

    /// Parse a raw query string like `sv=2019-02-02&sp=r&sig=...`.
    ///
    /// A leading `?` is ignored and values are percent-decoded before parsing.
    pub fn from_query_string(query: &str) -> Result<(Self, Vec<(String, String)>)> {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self::parse(form_urlencoded::parse(query.as_bytes()))
    }

    /// Parse the SAS out of an URI's query string.
    pub fn from_uri(uri: &Uri) -> Result<(Self, Vec<(String, String)>)> {
        Self::from_query_string(uri.query().unwrap_or_default())
    }

    /// Convert the SAS into a percent-encoded query string.
    ///
    /// Unset and empty fields are left out, `sv` is always written.
    pub fn to_query_string(&self) -> String {
        let optional = |v: &Option<String>| -> Option<String> {
            v.as_deref().filter(|v| !v.is_empty()).map(str::to_string)
        };

        let elements: [(&str, Option<String>); 15] = [
            (SAS_VERSION, Some(self.version().to_string())),
            (
                SAS_RESOURCE_TYPES,
                self.resource_types.map(|v| v.to_string()),
            ),
            (
                SAS_PROTOCOL,
                Some(self.protocol.to_string()).filter(|v| !v.is_empty()),
            ),
            (SAS_START_TIME, self.starts_on.map(time::format_sas_time)),
            (SAS_EXPIRY_TIME, self.expires_on.map(time::format_sas_time)),
            (SAS_IP_RANGE, self.ip_range.map(|v| v.to_string())),
            (SAS_IDENTIFIER, optional(&self.identifier)),
            (SAS_RESOURCE, optional(&self.resource)),
            (SAS_TABLE_NAME, optional(&self.table_name)),
            (SAS_PERMISSIONS, optional(&self.permissions)),
            (SAS_START_PARTITION_KEY, optional(&self.start_partition_key)),
            (SAS_START_ROW_KEY, optional(&self.start_row_key)),
            (SAS_END_PARTITION_KEY, optional(&self.end_partition_key)),
            (SAS_END_ROW_KEY, optional(&self.end_row_key)),
            (SAS_SIGNATURE, optional(&self.signature)),
        ];

        elements
            .iter()
            .filter_map(|(k, v)| v.as_ref().map(|v| format!("{}={}", k, urlencoded(v))))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Append the SAS to `uri`, keeping any query it already has.
    pub fn apply_to_uri(&self, uri: &Uri) -> Result<Uri> {
        let mut parts = uri.clone().into_parts();

        let paq = {
            let (path, query) = match &parts.path_and_query {
                Some(paq) => (paq.path(), paq.query().unwrap_or_default()),
                None => ("/", ""),
            };

            if query.is_empty() {
                format!("{path}?{self}")
            } else {
                format!("{path}?{query}&{self}")
            }
        };

        parts.path_and_query = Some(PathAndQuery::from_str(&paq).map_err(|e| {
            Error::unexpected("failed to build path and query with sas").with_source(e)
        })?);
        Uri::from_parts(parts)
            .map_err(|e| Error::unexpected("failed to build uri with sas").with_source(e))
    }

    /// Check the signature against `credential`.
    ///
    /// Fields the scope named by `sr` doesn't sign are rejected. The string to
    /// sign is then rebuilt from these parameters and compared in constant time. Any failure to line up, including a
    /// missing or undecodable `sig`, is reported as
    /// [`ErrorKind::Validation`](tablesign_core::ErrorKind::Validation).
    ///
    /// Only the signature is checked, see [`SasParameters::is_valid_at`] for the
    /// time window.
    pub fn verify(&self, credential: &SharedKeyCredential) -> Result<()> {
        let resource = SasResource::from_code(self.resource()).ok_or_else(|| {
            Error::validation(format!(
                "{SAS_RESOURCE} `{}` is not a known scope, expected `a` or `t`",
                self.resource()
            ))
            .with_field(SAS_RESOURCE)
        })?;
        // Fields outside the signed set can't be trusted.
        resource.check_fields(self)?;

        if self.signature().is_empty() {
            return Err(Error::validation("sas has no signature").with_field(SAS_SIGNATURE));
        }
        let tag = base64_decode(self.signature()).map_err(|e| {
            Error::validation(format!("{SAS_SIGNATURE} is not valid base64"))
                .with_field(SAS_SIGNATURE)
                .with_source(e)
        })?;

        let key = credential.decoded_key()?;
        let string_to_sign = resource.string_to_sign(credential.account_name(), self)?;

        if !verify_hmac_sha256(&key, string_to_sign.as_bytes(), &tag) {
            return Err(Error::validation("signature mismatch").with_field(SAS_SIGNATURE));
        }
        Ok(())
    }
}

impl Display for SasParameters {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}

fn parse_time(key: &'static str, value: &str) -> Result<DateTime> {
    time::parse_sas_time(value).map_err(|e| {
        Error::format(format!(
            "{key} `{value}` doesn't match expected format yyyy-MM-ddTHH:mm:ssZ"
        ))
        .with_field(key)
        .with_source(e)
    })
}

fn urlencoded(s: &str) -> String {
    form_urlencoded::byte_serialize(s.as_bytes()).collect()
}
