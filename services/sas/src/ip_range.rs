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
use std::net::IpAddr;
use std::str::FromStr;

use tablesign_core::{Error, Result};

use crate::constants::SAS_IP_RANGE;

/// An inclusive range of IP addresses a SAS accepts requests from.
///
/// A range parsed from a single address keeps `end` unset so that it
/// serializes back to exactly what was signed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SasIpRange {
    start: IpAddr,
    end: Option<IpAddr>,
}

impl SasIpRange {
    /// A range covering a single address.
    pub fn single(ip: IpAddr) -> Self {
        Self {
            start: ip,
            end: None,
        }
    }

    /// A range from `start` to `end`, both inclusive.
    pub fn new(start: IpAddr, end: IpAddr) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }

    /// First address in the range.
    pub fn start(&self) -> IpAddr {
        self.start
    }

    /// Last address in the range.
    pub fn end(&self) -> IpAddr {
        self.end.unwrap_or(self.start)
    }

    /// Whether `ip` falls inside the range.
    pub fn contains(&self, ip: IpAddr) -> bool {
        match (self.start, self.end(), ip) {
            (IpAddr::V4(s), IpAddr::V4(e), IpAddr::V4(v)) => s <= v && v <= e,
            (IpAddr::V6(s), IpAddr::V6(e), IpAddr::V6(v)) => s <= v && v <= e,
            _ => false,
        }
    }

    /// Reject ranges that can't match any address.
    pub(crate) fn validate(&self) -> Result<()> {
        let end = self.end();
        if self.start.is_ipv4() != end.is_ipv4() {
            return Err(Error::validation(format!(
                "{SAS_IP_RANGE} `{self}` mixes IPv4 and IPv6 addresses"
            ))
            .with_field(SAS_IP_RANGE));
        }
        if !self.contains(self.start) || !self.contains(end) {
            return Err(Error::validation(format!(
                "{SAS_IP_RANGE} `{self}` starts after it ends"
            ))
            .with_field(SAS_IP_RANGE));
        }
        Ok(())
    }
}

impl From<IpAddr> for SasIpRange {
    fn from(ip: IpAddr) -> Self {
        Self::single(ip)
    }
}

impl fmt::Display for SasIpRange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.end {
            None => write!(f, "{}", self.start),
            Some(end) => write!(f, "{}-{}", self.start, end),
        }
    }
}

impl FromStr for SasIpRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let parse_ip = |v: &str| {
            IpAddr::from_str(v).map_err(|e| {
                Error::parse(format!(
                    "{SAS_IP_RANGE} `{s}` is invalid, expected `<ip>` or `<ip>-<ip>`"
                ))
                .with_field(SAS_IP_RANGE)
                .with_source(e)
            })
        };

        match s.split_once('-') {
            None => Ok(Self::single(parse_ip(s)?)),
            Some((start, end)) => Ok(Self::new(parse_ip(start)?, parse_ip(end)?)),
        }
    }
}
