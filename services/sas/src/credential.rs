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

use std::fmt::{Debug, Formatter};

use tablesign_core::hash::base64_decode;
use tablesign_core::utils::Redact;
use tablesign_core::{Error, Result};

use crate::connection_string;

/// Storage account name and base64 encoded account key.
///
/// The key is only read for the duration of a signing or verification call.
#[derive(Clone)]
pub struct SharedKeyCredential {
    account_name: String,
    account_key: String,
}

impl Debug for SharedKeyCredential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedKeyCredential")
            .field("account_name", &self.account_name)
            .field("account_key", &Redact::from(&self.account_key))
            .finish()
    }
}

impl SharedKeyCredential {
    /// Create a new credential with account name and key.
    pub fn new(account_name: &str, account_key: &str) -> Self {
        Self {
            account_name: account_name.to_string(),
            account_key: account_key.to_string(),
        }
    }

    /// Load the credential out of a [storage connection string][1].
    ///
    /// ```txt
    /// AccountName=mystorageaccount;AccountKey=Eby8vdM02xNOcqFlqUwJPLlmEtlCDXJ1OUzFT50uSRZ6IFsuFq2UVErCz4I6tq/K1SZFPTOtr/KBHBeksoGMGw==
    /// ```
    ///
    /// `UseDevelopmentStorage=true` selects the local emulator account.
    ///
    /// [1]: https://learn.microsoft.com/en-us/azure/storage/common/storage-configure-connection-string
    pub fn from_connection_string(conn_str: &str) -> Result<Self> {
        connection_string::parse(conn_str)
    }

    /// Storage account name.
    pub fn account_name(&self) -> &str {
        &self.account_name
    }

    /// Base64 encoded account key.
    pub fn account_key(&self) -> &str {
        &self.account_key
    }

    /// Check both parts are present and return the raw signing key.
    pub(crate) fn decoded_key(&self) -> Result<Vec<u8>> {
        if self.account_name.is_empty() {
            return Err(Error::argument("account name is required").with_field("account_name"));
        }
        if self.account_key.is_empty() {
            return Err(Error::argument("account key is required").with_field("account_key"));
        }

        base64_decode(&self.account_key).map_err(|e| {
            Error::argument("account key must be base64 encoded")
                .with_field("account_key")
                .with_source(e)
        })
    }
}
