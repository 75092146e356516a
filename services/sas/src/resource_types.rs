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

use crate::constants::SAS_RESOURCE_TYPES;

/// Resource categories an account SAS grants access to.
///
/// Serialized in the fixed order `s`, `c`, `o` no matter how it was parsed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ResourceTypes {
    /// Service level APIs, like get/set service properties.
    pub service: bool,
    /// Container level APIs, like create/delete table.
    pub container: bool,
    /// Object level APIs, like query/insert/update entities.
    pub object: bool,
}

impl ResourceTypes {
    /// All resource types.
    pub fn all() -> Self {
        Self {
            service: true,
            container: true,
            object: true,
        }
    }

    /// Whether no resource type is selected.
    pub fn is_empty(&self) -> bool {
        !(self.service || self.container || self.object)
    }
}

impl fmt::Display for ResourceTypes {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.service {
            f.write_str("s")?;
        }
        if self.container {
            f.write_str("c")?;
        }
        if self.object {
            f.write_str("o")?;
        }
        Ok(())
    }
}

impl FromStr for ResourceTypes {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut v = ResourceTypes::default();
        for c in s.chars() {
            match c {
                's' => v.service = true,
                'c' => v.container = true,
                'o' => v.object = true,
                _ => {
                    return Err(Error::parse(format!(
                        "{SAS_RESOURCE_TYPES} contains invalid character `{c}`, expected any of `sco`"
                    ))
                    .with_field(SAS_RESOURCE_TYPES))
                }
            }
        }
        Ok(v)
    }
}
