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

//! Table storage shared access signatures
//!
//! This crate builds, signs, serializes, parses and verifies SAS tokens for
//! table storage:
//! - Account scoped tokens (`sr=a`)
//! - Table scoped tokens (`sr=t`), optionally limited to a key range or bound
//!   to a stored access policy
//!
//! It performs no I/O. Attaching the token to a request is left to the caller,
//! either through [`SasParameters::to_query_string`] or
//! [`SasParameters::apply_to_uri`].
//!
//! # Example
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use tablesign_sas::{SasBuilder, SasParameters, SasPermission, SharedKeyCredential};
//!
//! # fn main() -> tablesign_core::Result<()> {
//! let cred = SharedKeyCredential::new("acct", "a2V5");
//!
//! // Sign a token that can read and write every table in the account.
//! let sas = SasBuilder::new()
//!     .with_permissions([SasPermission::Write, SasPermission::Read])
//!     .with_expires_on(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap())
//!     .build_with_credential(&cred)?;
//! assert!(sas.to_query_string().contains("sp=rw"));
//!
//! // Parse it back on the other side and check it.
//! let (parsed, rest) = SasParameters::from_query_string(&sas.to_query_string())?;
//! assert!(rest.is_empty());
//! parsed.verify(&cred)?;
//! # Ok(())
//! # }
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

mod constants;
pub use constants::DEFAULT_SAS_VERSION;

mod protocol;
pub use protocol::SasProtocol;

mod resource_types;
pub use resource_types::ResourceTypes;

mod ip_range;
pub use ip_range::SasIpRange;

mod permission;
pub use permission::SasPermission;

mod resource;
pub use resource::SasResource;

mod parameters;
pub use parameters::SasParameters;

mod build;
pub use build::SasBuilder;

mod credential;
pub use credential::SharedKeyCredential;

mod connection_string;
