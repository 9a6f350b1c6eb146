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

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::null_as_default;

/// Objects and bytes transitioned to one remote tier.
#[derive(Clone, Copy, Default, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TierStats {
    #[serde(rename = "totalSize")]
    pub total_size: u64,
    #[serde(rename = "numVersions")]
    pub num_versions: i32,
    #[serde(rename = "numObjects")]
    pub num_objects: i32,
}

impl TierStats {
    pub fn add(&self, u: &TierStats) -> TierStats {
        TierStats {
            total_size: self.total_size + u.total_size,
            num_versions: self.num_versions + u.num_versions,
            num_objects: self.num_objects + u.num_objects,
        }
    }
}

/// Usage of one bucket, with object size and version count histograms.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BucketUsageInfo {
    pub size: u64,
    #[serde(rename = "objectsPendingReplicationTotalSize")]
    pub replication_pending_size: u64,
    #[serde(rename = "objectsFailedReplicationTotalSize")]
    pub replication_failed_size: u64,
    #[serde(rename = "objectsReplicatedTotalSize")]
    pub replicated_size: u64,
    #[serde(rename = "objectReplicaTotalSize")]
    pub replica_size: u64,
    #[serde(rename = "objectsPendingReplicationCount")]
    pub replication_pending_count: u64,
    #[serde(rename = "objectsFailedReplicationCount")]
    pub replication_failed_count: u64,

    #[serde(rename = "versionsCount")]
    pub versions_count: u64,
    #[serde(rename = "objectsCount")]
    pub objects_count: u64,
    #[serde(rename = "deleteMarkersCount")]
    pub delete_markers_count: u64,
    #[serde(rename = "objectsSizesHistogram", deserialize_with = "null_as_default")]
    pub object_size_histogram: HashMap<String, u64>,
    #[serde(rename = "objectsVersionsHistogram", deserialize_with = "null_as_default")]
    pub object_versions_histogram: HashMap<String, u64>,
}

/// Cluster wide usage as of the last scanner update.
///
/// The snapshot is independent from the live topology and may be older or newer
/// than an `InfoMessage` fetched at the same time. A bucket or tier without an
/// entry has no recorded activity.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataUsageInfo {
    /// When the usage was last updated, which does not imply a full scan.
    #[serde(rename = "lastUpdate")]
    pub last_update: DateTime<Utc>,

    #[serde(rename = "objectsCount")]
    pub objects_total_count: u64,
    #[serde(rename = "objectsTotalSize")]
    pub objects_total_size: u64,

    #[serde(rename = "objectsPendingReplicationTotalSize")]
    pub replication_pending_size: u64,
    #[serde(rename = "objectsFailedReplicationTotalSize")]
    pub replication_failed_size: u64,
    #[serde(rename = "objectsReplicatedTotalSize")]
    pub replicated_size: u64,
    #[serde(rename = "objectsReplicaTotalSize")]
    pub replica_size: u64,
    #[serde(rename = "objectsPendingReplicationCount")]
    pub replication_pending_count: u64,
    #[serde(rename = "objectsFailedReplicationCount")]
    pub replication_failed_count: u64,

    #[serde(rename = "bucketsCount")]
    pub buckets_count: u64,
    #[serde(rename = "bucketsUsageInfo", deserialize_with = "null_as_default")]
    pub buckets_usage: HashMap<String, BucketUsageInfo>,
    #[serde(rename = "tierStats", deserialize_with = "null_as_default")]
    pub tier_stats: HashMap<String, TierStats>,

    #[serde(rename = "capacity")]
    pub total_capacity: u64,
    #[serde(rename = "freeCapacity")]
    pub total_free_capacity: u64,
    #[serde(rename = "usedCapacity")]
    pub total_used_capacity: u64,
}

impl DataUsageInfo {
    /// Usage of `bucket`, all zero when nothing was recorded for it.
    pub fn bucket_usage(&self, bucket: &str) -> BucketUsageInfo {
        self.buckets_usage.get(bucket).cloned().unwrap_or_default()
    }

    pub fn tier(&self, tier: &str) -> TierStats {
        self.tier_stats.get(tier).copied().unwrap_or_default()
    }

    /// Sum over every tier.
    pub fn tier_totals(&self) -> TierStats {
        self.tier_stats.values().fold(TierStats::default(), |acc, st| acc.add(st))
    }

    /// Adds per-tier stats into this snapshot.
    pub fn merge_tier_stats(&mut self, tiers: &HashMap<String, TierStats>) {
        for (tier, st) in tiers {
            let cur = self.tier_stats.entry(tier.clone()).or_default();
            *cur = cur.add(st);
        }
    }

    /// Keeps the more recent of two snapshots; `a` wins ties.
    pub fn latest(a: DataUsageInfo, b: DataUsageInfo) -> DataUsageInfo {
        if b.last_update > a.last_update { b } else { a }
    }
}
