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

/// Service version used when a token doesn't carry `sv`.
pub const DEFAULT_SAS_VERSION: &str = "2019-02-02";

/// Service code the account scope signs in its `service` slot.
pub const TABLE_SERVICE: &str = "t";

/// Longest stored access policy identifier the service accepts.
pub const MAX_IDENTIFIER_LENGTH: usize = 64;

// Query parameters used in SAS tokens.
pub const SAS_VERSION: &str = "sv";
pub const SAS_RESOURCE_TYPES: &str = "srt";
pub const SAS_PROTOCOL: &str = "spr";
pub const SAS_START_TIME: &str = "st";
pub const SAS_EXPIRY_TIME: &str = "se";
pub const SAS_IP_RANGE: &str = "sip";
pub const SAS_IDENTIFIER: &str = "si";
pub const SAS_RESOURCE: &str = "sr";
pub const SAS_PERMISSIONS: &str = "sp";
pub const SAS_SIGNATURE: &str = "sig";
pub const SAS_TABLE_NAME: &str = "tn";
pub const SAS_START_PARTITION_KEY: &str = "spk";
pub const SAS_START_ROW_KEY: &str = "srk";
pub const SAS_END_PARTITION_KEY: &str = "epk";
pub const SAS_END_ROW_KEY: &str = "erk";

// Connection string fields.
pub const ACCOUNT_NAME: &str = "AccountName";
pub const ACCOUNT_KEY: &str = "AccountKey";
pub const USE_DEVELOPMENT_STORAGE: &str = "UseDevelopmentStorage";

// Well-known account of the local storage emulator.
pub const DEVELOPMENT_ACCOUNT_NAME: &str = "devstoreaccount1";
pub const DEVELOPMENT_ACCOUNT_KEY: &str =
    "Eby8vdM02xNOcqFlqUwJPLlmEtlCDXJ1OUzFT50uSRZ6IFsuFq2UVErCz4I6tq/K1SZFPTOtr/KBHBeksoGMGw==";
