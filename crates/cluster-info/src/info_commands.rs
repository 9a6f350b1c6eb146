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

use std::{collections::HashMap, time::Duration};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::backend::{BackendType, ErasureBackend};
use crate::disk::Disk;
use crate::pools::{ErasureSetInfo, PoolSets};
use crate::services::Services;
use crate::utils::{duration_nanos, duration_nanos_vec, is_default, null_as_default};

/// A counter that the server either computed or failed to compute.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CountInfo {
    pub count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CountInfo {
    pub fn ok(count: u64) -> Self {
        Self { count, error: None }
    }

    pub fn failed(err: impl Into<String>) -> Self {
        Self {
            count: 0,
            error: Some(err.into()),
        }
    }

    /// The count, or the error the server reported instead of it.
    pub fn outcome(&self) -> Result<u64, &str> {
        match self.error.as_deref() {
            Some(err) if !err.is_empty() => Err(err),
            _ => Ok(self.count),
        }
    }
}

pub type Buckets = CountInfo;
pub type Objects = CountInfo;
pub type Versions = CountInfo;
pub type DeleteMarkers = CountInfo;

/// Total size used, or the error that prevented computing it.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Usage {
    pub size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Usage {
    pub fn ok(size: u64) -> Self {
        Self { size, error: None }
    }

    pub fn failed(err: impl Into<String>) -> Self {
        Self {
            size: 0,
            error: Some(err.into()),
        }
    }

    pub fn outcome(&self) -> Result<u64, &str> {
        match self.error.as_deref() {
            Some(err) if !err.is_empty() => Err(err),
            _ => Ok(self.size),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct MemStats {
    pub alloc: u64,
    pub total_alloc: u64,
    pub mallocs: u64,
    pub frees: u64,
    pub heap_alloc: u64,
}

/// Recent garbage collection activity of a server runtime.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GCStats {
    pub last_gc: DateTime<Utc>,
    pub num_gc: i64,
    #[serde(with = "duration_nanos")]
    pub pause_total: Duration,
    /// Most recent first.
    #[serde(with = "duration_nanos_vec")]
    pub pause: Vec<Duration>,
    #[serde(deserialize_with = "null_as_default")]
    pub pause_end: Vec<DateTime<Utc>>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct LicenseInfo {
    #[serde(rename = "ID")]
    pub id: String,
    pub organization: String,
    pub plan: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub trial: bool,
    #[serde(rename = "APIKey")]
    pub api_key: String,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerProperties {
    #[serde(skip_serializing_if = "is_default")]
    pub state: String,
    #[serde(skip_serializing_if = "is_default")]
    pub endpoint: String,
    #[serde(skip_serializing_if = "is_default")]
    pub scheme: String,
    #[serde(skip_serializing_if = "is_default")]
    pub uptime: i64,
    #[serde(skip_serializing_if = "is_default")]
    pub version: String,
    #[serde(rename = "commitID", skip_serializing_if = "is_default")]
    pub commit_id: String,
    #[serde(skip_serializing_if = "is_default")]
    pub network: HashMap<String, String>,
    #[serde(rename = "drives", skip_serializing_if = "is_default")]
    pub disks: Vec<Disk>,
    /// Only meaningful when `pool_numbers` has exactly one entry, see [`ServerProperties::pool`].
    #[serde(rename = "poolNumber", skip_serializing_if = "is_default")]
    pub pool_number: i32,
    #[serde(rename = "poolNumbers", skip_serializing_if = "is_default")]
    pub pool_numbers: Vec<i32>,
    pub mem_stats: MemStats,
    #[serde(rename = "go_max_procs", skip_serializing_if = "is_default")]
    pub max_procs: i32,
    #[serde(skip_serializing_if = "is_default")]
    pub num_cpu: i32,
    #[serde(skip_serializing_if = "is_default")]
    pub runtime_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gc_stats: Option<GCStats>,
    #[serde(rename = "minio_env_vars", skip_serializing_if = "is_default")]
    pub env_vars: HashMap<String, String>,
    pub edition: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<LicenseInfo>,
    pub is_leader: bool,
    pub ilm_expiry_in_progress: bool,
}

impl ServerProperties {
    /// The pool of a server that belongs to exactly one pool.
    pub fn pool(&self) -> Option<i32> {
        match self.pool_numbers.as_slice() {
            [_] => Some(self.pool_number),
            _ => None,
        }
    }

    /// Records pool membership, setting `pool_number` only for single pool servers.
    pub fn set_pools(&mut self, pools: impl IntoIterator<Item = i32>) {
        let mut pools: Vec<i32> = pools.into_iter().collect();
        pools.sort_unstable();
        pools.dedup();
        self.pool_number = match pools.as_slice() {
            [only] => *only,
            _ => 0,
        };
        self.pool_numbers = pools;
    }
}

/// Server admin information of a whole deployment.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InfoMessage {
    #[serde(skip_serializing_if = "is_default")]
    pub mode: String,
    #[serde(skip_serializing_if = "is_default")]
    pub domain: Vec<String>,
    #[serde(skip_serializing_if = "is_default")]
    pub region: String,
    #[serde(rename = "sqsARN", skip_serializing_if = "is_default")]
    pub sqs_arn: Vec<String>,
    #[serde(rename = "deploymentID", skip_serializing_if = "is_default")]
    pub deployment_id: String,
    #[serde(skip_serializing_if = "is_default")]
    pub buckets: Buckets,
    #[serde(skip_serializing_if = "is_default")]
    pub objects: Objects,
    #[serde(skip_serializing_if = "is_default")]
    pub versions: Versions,
    #[serde(rename = "deletemarkers", skip_serializing_if = "is_default")]
    pub delete_markers: DeleteMarkers,
    #[serde(skip_serializing_if = "is_default")]
    pub usage: Usage,
    #[serde(skip_serializing_if = "is_default")]
    pub services: Services,
    #[serde(skip_serializing_if = "is_default")]
    pub backend: ErasureBackend,
    #[serde(skip_serializing_if = "is_default")]
    pub servers: Vec<ServerProperties>,
    #[serde(skip_serializing_if = "PoolSets::is_empty")]
    pub pools: PoolSets,
}

impl InfoMessage {
    pub fn backend_type(&self) -> BackendType {
        BackendType::from_name(&self.backend.backend_type)
    }

    /// Standard storage class parity, `None` when the backend is not erasure coded.
    pub fn standard_parity(&self) -> Option<i32> {
        match self.backend_type() {
            BackendType::Erasure => Some(self.backend.standard_sc_parity),
            _ => None,
        }
    }

    /// Reduced redundancy storage class parity, `None` when the backend is not erasure coded.
    pub fn rr_parity(&self) -> Option<i32> {
        match self.backend_type() {
            BackendType::Erasure => Some(self.backend.rr_sc_parity),
            _ => None,
        }
    }

    /// Standard parity in its legacy form, -1 meaning parity does not apply.
    pub fn standard_parity_sentinel(&self) -> i32 {
        self.standard_parity().unwrap_or(-1)
    }

    pub fn erasure_set(&self, pool: usize, set: usize) -> Option<&ErasureSetInfo> {
        self.pools.get(pool, set)
    }

    /// Every drive reported by every server.
    pub fn disks(&self) -> impl Iterator<Item = &Disk> {
        self.servers.iter().flat_map(|s| s.disks.iter())
    }
}
