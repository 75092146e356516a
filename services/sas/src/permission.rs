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

/// Operations a SAS can grant.
///
/// Which of them are allowed, and in which order they are signed, depends on
/// the [`SasResource`](crate::SasResource) scope of the token.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SasPermission {
    /// `r`: read or query.
    Read,
    /// `w`: write.
    Write,
    /// `d`: delete.
    Delete,
    /// `l`: list.
    List,
    /// `a`: add.
    Add,
    /// `c`: create.
    Create,
    /// `u`: update.
    Update,
    /// `p`: process.
    Process,
}

impl SasPermission {
    /// Single character code of the permission.
    pub fn code(&self) -> char {
        match self {
            SasPermission::Read => 'r',
            SasPermission::Write => 'w',
            SasPermission::Delete => 'd',
            SasPermission::List => 'l',
            SasPermission::Add => 'a',
            SasPermission::Create => 'c',
            SasPermission::Update => 'u',
            SasPermission::Process => 'p',
        }
    }

    /// Look up the permission for a character code.
    pub fn from_code(c: char) -> Option<Self> {
        match c {
            'r' => Some(SasPermission::Read),
            'w' => Some(SasPermission::Write),
            'd' => Some(SasPermission::Delete),
            'l' => Some(SasPermission::List),
            'a' => Some(SasPermission::Add),
            'c' => Some(SasPermission::Create),
            'u' => Some(SasPermission::Update),
            'p' => Some(SasPermission::Process),
            _ => None,
        }
    }
}

impl fmt::Display for SasPermission {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
