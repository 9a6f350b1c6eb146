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

use std::{collections::HashMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::utils::{is_default, null_as_default};

pub const DRIVE_STATE_OK: &str = "ok";
pub const DRIVE_STATE_OFFLINE: &str = "offline";
pub const DRIVE_STATE_CORRUPT: &str = "corrupt";
pub const DRIVE_STATE_MISSING: &str = "missing";
pub const DRIVE_STATE_PERMISSION: &str = "permission-denied";
pub const DRIVE_STATE_FAULTY: &str = "faulty";
pub const DRIVE_STATE_ROOT_MOUNT: &str = "root-mount";
pub const DRIVE_STATE_UNKNOWN: &str = "unknown";
pub const DRIVE_STATE_UNFORMATTED: &str = "unformatted";

/// State of a server or service: offline, initializing or online.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ItemState {
    Offline,
    Initializing,
    Online,
}

impl ItemState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemState::Offline => "offline",
            ItemState::Initializing => "initializing",
            ItemState::Online => "online",
        }
    }
}

impl fmt::Display for ItemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "offline" => Ok(ItemState::Offline),
            "initializing" => Ok(ItemState::Initializing),
            "online" => Ok(ItemState::Online),
            _ => Err(format!("unknown item state '{s}'")),
        }
    }
}

/// Call count and accumulated latency of one storage API over a window.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TimedAction {
    #[serde(rename = "count")]
    pub count: u64,
    #[serde(rename = "acc_time_ns")]
    pub acc_time: u64,
    #[serde(rename = "min_ns", skip_serializing_if = "is_default")]
    pub min_time: u64,
    #[serde(rename = "max_ns", skip_serializing_if = "is_default")]
    pub max_time: u64,
    #[serde(rename = "bytes", skip_serializing_if = "is_default")]
    pub bytes: u64,
}

impl TimedAction {
    pub fn merge(&mut self, other: &TimedAction) {
        self.count += other.count;
        self.acc_time += other.acc_time;
        self.bytes += other.bytes;
        if self.min_time == 0 || (other.min_time > 0 && other.min_time < self.min_time) {
            self.min_time = other.min_time;
        }
        self.max_time = self.max_time.max(other.max_time);
    }

    /// Average time per call in nanoseconds.
    pub fn avg(&self) -> Option<u64> {
        if self.count == 0 {
            return None;
        }
        Some(self.acc_time / self.count)
    }
}

/// Per-drive storage API statistics, only returned when drive metrics are requested.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DiskMetrics {
    #[serde(rename = "lastMinute", skip_serializing_if = "is_default", deserialize_with = "null_as_default")]
    pub last_minute: HashMap<String, TimedAction>,
    #[serde(rename = "apiCalls", skip_serializing_if = "is_default", deserialize_with = "null_as_default")]
    pub api_calls: HashMap<String, u64>,
    /// Unused by current servers.
    #[serde(rename = "totalTokens", skip_serializing_if = "is_default")]
    pub total_tokens: u32,
    #[serde(rename = "totalWaiting", skip_serializing_if = "is_default")]
    pub total_waiting: u32,
    #[serde(rename = "totalErrorsAvailability", skip_serializing_if = "is_default")]
    pub total_errors_availability: u64,
    #[serde(rename = "totalErrorsTimeout", skip_serializing_if = "is_default")]
    pub total_errors_timeout: u64,
    #[serde(rename = "totalWrites", skip_serializing_if = "is_default")]
    pub total_writes: u64,
    #[serde(rename = "totalDeletes", skip_serializing_if = "is_default")]
    pub total_deletes: u64,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CacheStats {
    pub capacity: i64,
    pub used: i64,
    pub hits: i64,
    pub misses: i64,
    #[serde(rename = "delHits")]
    pub del_hits: i64,
    #[serde(rename = "delMisses")]
    pub del_misses: i64,
    pub collisions: i64,
}

/// Progress of a drive that is being healed.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HealingDisk {
    pub id: String,
    pub heal_id: String,
    pub pool_index: Option<usize>,
    pub set_index: Option<usize>,
    pub disk_index: Option<usize>,
    pub endpoint: String,
    pub path: String,
    #[serde(with = "time::serde::rfc3339::option")]
    pub started: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_update: Option<OffsetDateTime>,
    pub retry_attempts: u64,
    pub objects_total_count: u64,
    pub objects_total_size: u64,
    pub items_healed: u64,
    pub items_failed: u64,
    pub item_skipped: u64,
    pub bytes_done: u64,
    pub bytes_failed: u64,
    pub bytes_skipped: u64,
    pub objects_healed: u64,
    pub objects_failed: u64,
    #[serde(rename = "current_bucket")]
    pub bucket: String,
    #[serde(rename = "current_object")]
    pub object: String,
    #[serde(rename = "queued_buckets", deserialize_with = "null_as_default")]
    pub queue_buckets: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub healed_buckets: Vec<String>,
    pub finished: bool,
}

/// Location of a drive inside the pool/set topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DiskPlacement {
    pub pool: usize,
    pub set: usize,
    pub disk: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Disk {
    #[serde(skip_serializing_if = "is_default")]
    pub endpoint: String,
    #[serde(rename = "rootDisk", skip_serializing_if = "is_default")]
    pub root_disk: bool,
    #[serde(rename = "path", skip_serializing_if = "is_default")]
    pub drive_path: String,
    #[serde(skip_serializing_if = "is_default")]
    pub healing: bool,
    #[serde(skip_serializing_if = "is_default")]
    pub scanning: bool,
    #[serde(skip_serializing_if = "is_default")]
    pub state: String,
    #[serde(skip_serializing_if = "is_default")]
    pub uuid: String,
    pub major: u32,
    pub minor: u32,
    #[serde(skip_serializing_if = "is_default")]
    pub model: String,
    #[serde(rename = "totalspace", skip_serializing_if = "is_default")]
    pub total_space: u64,
    #[serde(rename = "usedspace", skip_serializing_if = "is_default")]
    pub used_space: u64,
    #[serde(rename = "availspace", skip_serializing_if = "is_default")]
    pub available_space: u64,
    #[serde(rename = "readthroughput", skip_serializing_if = "is_default")]
    pub read_throughput: f64,
    #[serde(rename = "writethroughput", skip_serializing_if = "is_default")]
    pub write_throughput: f64,
    #[serde(rename = "readlatency", skip_serializing_if = "is_default")]
    pub read_latency: f64,
    #[serde(rename = "writelatency", skip_serializing_if = "is_default")]
    pub write_latency: f64,
    #[serde(skip_serializing_if = "is_default")]
    pub utilization: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<DiskMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heal_info: Option<HealingDisk>,
    pub used_inodes: u64,
    #[serde(skip_serializing_if = "is_default")]
    pub free_inodes: u64,
    #[serde(skip_serializing_if = "is_default")]
    pub local: bool,
    #[serde(rename = "cacheStats", skip_serializing_if = "Option::is_none")]
    pub cache: Option<CacheStats>,

    // -1 until the drive is assigned to a set
    pub pool_index: i32,
    pub set_index: i32,
    pub disk_index: i32,
}

impl Default for Disk {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            root_disk: false,
            drive_path: String::new(),
            healing: false,
            scanning: false,
            state: String::new(),
            uuid: String::new(),
            major: 0,
            minor: 0,
            model: String::new(),
            total_space: 0,
            used_space: 0,
            available_space: 0,
            read_throughput: 0.0,
            write_throughput: 0.0,
            read_latency: 0.0,
            write_latency: 0.0,
            utilization: 0.0,
            metrics: None,
            heal_info: None,
            used_inodes: 0,
            free_inodes: 0,
            local: false,
            cache: None,
            pool_index: -1,
            set_index: -1,
            disk_index: -1,
        }
    }
}

impl Disk {
    /// Position of the drive in the topology, `None` while it is not placed yet.
    pub fn placement(&self) -> Option<DiskPlacement> {
        Some(DiskPlacement {
            pool: usize::try_from(self.pool_index).ok()?,
            set: usize::try_from(self.set_index).ok()?,
            disk: usize::try_from(self.disk_index).ok()?,
        })
    }

    /// Drives that answered, including fresh drives waiting to be formatted.
    pub fn is_online(&self) -> bool {
        self.state == DRIVE_STATE_OK || self.state == DRIVE_STATE_UNFORMATTED
    }

    /// Node the drive belongs to: the endpoint authority, or the raw endpoint for local paths.
    pub fn node(&self) -> String {
        match self.endpoint.parse::<hyper::Uri>() {
            Ok(uri) => match uri.authority() {
                Some(authority) => authority.to_string(),
                None => self.endpoint.clone(),
            },
            Err(_) => self.endpoint.clone(),
        }
    }
}
