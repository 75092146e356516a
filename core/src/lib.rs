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

//! Core components for signing table storage shared access signatures.
//!
//! This crate provides the foundational pieces shared by the tablesign services:
//!
//! - [`Error`] and [`ErrorKind`]: the error taxonomy every operation reports through
//! - [`hash`]: HMAC-SHA256 and base64 helpers used to compute and check signatures
//! - [`time`]: the single time format SAS tokens carry
//! - [`utils`]: general utilities including data redaction
//!
//! Nothing in here performs I/O or keeps state between calls.

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod error;
pub use error::{Error, ErrorKind, Result};
