// Copyright 2024 RustFS Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Topology and capacity reporting for an erasure coded RustFS cluster.
//!
//! Snapshots fetched from the admin API decode into [`StorageInfo`],
//! [`InfoMessage`] and [`DataUsageInfo`]. Per node drive maps reduce through
//! [`BackendDisks::merge`], and drive lists roll up into per set figures with
//! [`PoolSets::from_disks`]. Nothing here does I/O except [`AdminClient`], which
//! delegates to a caller supplied [`AdminTransport`].

pub mod backend;
pub mod client;
pub mod consts;
pub mod data_usage;
pub mod disk;
pub mod error;
pub mod info_commands;
pub mod pools;
pub mod service_commands;
pub mod services;
pub mod storage;
mod utils;

pub use backend::*;
pub use client::*;
pub use data_usage::*;
pub use disk::*;
pub use error::{BoxError, Error, Result};
pub use info_commands::*;
pub use pools::*;
pub use service_commands::*;
pub use services::*;
pub use storage::*;
