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
use std::str::FromStr;

use tablesign_core::Error;

use crate::constants::SAS_PROTOCOL;

/// Specifies the protocol permitted for a request made with the SAS.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum SasProtocol {
    /// No protocol restriction was carried by the token.
    #[default]
    None,
    /// Only requests over HTTPS are permitted.
    Https,
    /// Requests over both HTTPS and HTTP are permitted.
    HttpsAndHttp,
}

impl SasProtocol {
    /// Wire representation, empty for [`SasProtocol::None`].
    pub fn as_str(&self) -> &'static str {
        match self {
            SasProtocol::None => "",
            SasProtocol::Https => "https",
            SasProtocol::HttpsAndHttp => "https,http",
        }
    }

    /// Whether the protocol is unset.
    pub fn is_none(&self) -> bool {
        matches!(self, SasProtocol::None)
    }
}

impl fmt::Display for SasProtocol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SasProtocol {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Ok(SasProtocol::None),
            "https" => Ok(SasProtocol::Https),
            "https,http" => Ok(SasProtocol::HttpsAndHttp),
            v => Err(Error::parse(format!(
                "{SAS_PROTOCOL} `{v}` is invalid, expected `https` or `https,http`"
            ))
            .with_field(SAS_PROTOCOL)),
        }
    }
}
