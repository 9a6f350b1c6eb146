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

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::warn;

use crate::backend::ErasureBackend;
use crate::disk::Disk;
use crate::error::Error;
use crate::utils::{is_default, null_as_default};

/// Rollup of one erasure set.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErasureSetInfo {
    pub id: usize,
    #[serde(rename = "rawUsage")]
    pub raw_usage: u64,
    #[serde(rename = "rawCapacity")]
    pub raw_capacity: u64,
    pub usage: u64,
    #[serde(rename = "objectsCount")]
    pub objects_count: u64,
    #[serde(rename = "versionsCount")]
    pub versions_count: u64,
    #[serde(rename = "deleteMarkersCount")]
    pub delete_markers_count: u64,
    #[serde(rename = "healDisks")]
    pub heal_disks: usize,
    #[serde(rename = "onlineDisks", skip_serializing_if = "is_default")]
    pub online_disks: usize,
    #[serde(rename = "offlineDisks", skip_serializing_if = "is_default")]
    pub offline_disks: usize,
    #[serde(skip_serializing_if = "is_default", deserialize_with = "null_as_default")]
    pub nodes: Vec<String>,
}

/// Pool and set index of an erasure set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SetKey {
    pub pool: usize,
    pub set: usize,
}

impl SetKey {
    pub fn new(pool: usize, set: usize) -> Self {
        Self { pool, set }
    }
}

/// Erasure sets of every pool, keyed by `(pool, set)`.
///
/// The set index is always taken from `ErasureSetInfo::id`. On the wire this is the
/// nested object `{"<pool>": {"<set>": {...}}}`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PoolSets(BTreeMap<SetKey, ErasureSetInfo>);

impl PoolSets {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Stores `info` under `(pool, info.id)`, returning the set it replaced.
    pub fn insert(&mut self, pool: usize, info: ErasureSetInfo) -> Option<ErasureSetInfo> {
        self.0.insert(SetKey::new(pool, info.id), info)
    }

    pub fn get(&self, pool: usize, set: usize) -> Option<&ErasureSetInfo> {
        self.0.get(&SetKey::new(pool, set))
    }

    /// Sets of one pool, ordered by set index.
    pub fn pool(&self, pool: usize) -> impl Iterator<Item = &ErasureSetInfo> {
        self.0
            .range(SetKey::new(pool, 0)..=SetKey::new(pool, usize::MAX))
            .map(|(_, info)| info)
    }

    pub fn pools(&self) -> BTreeSet<usize> {
        self.0.keys().map(|k| k.pool).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SetKey, &ErasureSetInfo)> {
        self.0.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Builds per-set drive and capacity figures from a flat drive list.
    ///
    /// Drives that are not placed in a set yet are skipped. Object counters are left
    /// at zero; they come from the data usage scanner, not from drives.
    pub fn from_disks(disks: &[Disk]) -> PoolSets {
        let mut sets = PoolSets::new();
        let mut nodes: BTreeMap<SetKey, BTreeSet<String>> = BTreeMap::new();

        for disk in disks.iter() {
            let Some(p) = disk.placement() else {
                continue;
            };
            let key = SetKey::new(p.pool, p.set);
            let info = sets.0.entry(key).or_insert_with(|| ErasureSetInfo {
                id: p.set,
                ..Default::default()
            });

            info.raw_capacity += disk.total_space;
            info.raw_usage += disk.used_space;
            if disk.healing {
                info.heal_disks += 1;
            }
            if disk.is_online() {
                info.online_disks += 1;
            } else {
                info.offline_disks += 1;
            }
            nodes.entry(key).or_default().insert(disk.node());
        }

        for (key, node_set) in nodes {
            if let Some(info) = sets.0.get_mut(&key) {
                info.nodes = node_set.into_iter().collect();
            }
        }
        sets
    }

    /// Sets reporting more drives than their pool is configured with.
    ///
    /// Only reported and logged; the snapshot is kept as is.
    pub fn oversubscribed(&self, backend: &ErasureBackend) -> Vec<SetKey> {
        let mut found = Vec::new();
        for (key, info) in self.0.iter() {
            let Some(expected) = backend.drives_per_set(key.pool) else {
                continue;
            };
            let reported = info.online_disks + info.offline_disks;
            if reported > expected {
                warn!(
                    pool = key.pool,
                    set = key.set,
                    reported,
                    expected,
                    "erasure set reports more drives than configured"
                );
                found.push(*key);
            }
        }
        found
    }
}

impl FromIterator<(usize, ErasureSetInfo)> for PoolSets {
    fn from_iter<T: IntoIterator<Item = (usize, ErasureSetInfo)>>(iter: T) -> Self {
        let mut sets = PoolSets::new();
        for (pool, info) in iter {
            sets.insert(pool, info);
        }
        sets
    }
}

impl Serialize for PoolSets {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut nested: BTreeMap<usize, BTreeMap<usize, &ErasureSetInfo>> = BTreeMap::new();
        for (key, info) in self.0.iter() {
            nested.entry(key.pool).or_default().insert(key.set, info);
        }
        nested.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PoolSets {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let nested: Option<BTreeMap<usize, BTreeMap<usize, ErasureSetInfo>>> = Option::deserialize(deserializer)?;
        let mut sets = PoolSets::new();
        for (pool, pool_sets) in nested.unwrap_or_default() {
            for (set, info) in pool_sets {
                if info.id != set {
                    return Err(serde::de::Error::custom(Error::SetIdMismatch { pool, set, id: info.id }));
                }
                sets.insert(pool, info);
            }
        }
        Ok(sets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disk::{DRIVE_STATE_OFFLINE, DRIVE_STATE_OK};

    fn set(id: usize, usage: u64) -> ErasureSetInfo {
        ErasureSetInfo {
            id,
            usage,
            ..Default::default()
        }
    }

    #[test]
    fn test_insert_keys_by_id() {
        let mut sets = PoolSets::new();
        assert!(sets.insert(0, set(1, 10)).is_none());
        assert!(sets.insert(1, set(0, 20)).is_none());
        assert_eq!(sets.insert(0, set(1, 30)).map(|s| s.usage), Some(10));

        assert_eq!(sets.len(), 2);
        assert_eq!(sets.get(0, 1).map(|s| s.usage), Some(30));
        assert_eq!(sets.get(1, 0).map(|s| s.usage), Some(20));
        assert!(sets.get(0, 0).is_none());
        assert_eq!(sets.pools().into_iter().collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn test_pool_iteration_is_ordered() {
        let sets: PoolSets = [(0, set(2, 0)), (1, set(0, 0)), (0, set(0, 0)), (0, set(1, 0))]
            .into_iter()
            .collect();
        let ids: Vec<_> = sets.pool(0).map(|s| s.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(sets.pool(1).count(), 1);
        assert_eq!(sets.pool(7).count(), 0);
    }

    #[test]
    fn test_nested_wire_form() {
        let sets: PoolSets = [(0, set(0, 1)), (0, set(1, 2)), (1, set(0, 3))].into_iter().collect();
        let v = serde_json::to_value(&sets).unwrap();
        assert_eq!(v["0"]["1"]["usage"], 2);
        assert_eq!(v["1"]["0"]["usage"], 3);
        assert!(v["0"]["0"].get("nodes").is_none());
        assert!(v["0"]["0"].get("onlineDisks").is_none());
        assert_eq!(v["0"]["0"]["healDisks"], 0);

        let back: PoolSets = serde_json::from_value(v).unwrap();
        assert_eq!(back, sets);
    }

    #[test]
    fn test_decode_rejects_id_mismatch() {
        let err = serde_json::from_str::<PoolSets>(r#"{"0":{"1":{"id":2}}}"#).unwrap_err();
        assert!(err.to_string().contains("does not match"));

        let null: PoolSets = serde_json::from_str("null").unwrap();
        assert!(null.is_empty());
    }

    fn disk(endpoint: &str, state: &str, pool: i32, set: i32, idx: i32) -> Disk {
        Disk {
            endpoint: endpoint.to_string(),
            state: state.to_string(),
            pool_index: pool,
            set_index: set,
            disk_index: idx,
            total_space: 100,
            used_space: 10,
            ..Default::default()
        }
    }

    #[test]
    fn test_from_disks() {
        let mut healing = disk("http://n2:9000/d2", DRIVE_STATE_OK, 0, 0, 3);
        healing.healing = true;
        let disks = vec![
            disk("http://n1:9000/d1", DRIVE_STATE_OK, 0, 0, 0),
            disk("http://n1:9000/d2", DRIVE_STATE_OK, 0, 0, 1),
            disk("http://n2:9000/d1", DRIVE_STATE_OFFLINE, 0, 0, 2),
            healing,
            disk("http://n3:9000/d1", DRIVE_STATE_OK, 0, 1, 0),
            disk("http://n9:9000/d1", DRIVE_STATE_OK, -1, -1, -1),
        ];

        let sets = PoolSets::from_disks(&disks);
        assert_eq!(sets.len(), 2);

        let s0 = sets.get(0, 0).unwrap();
        assert_eq!(s0.id, 0);
        assert_eq!(s0.raw_capacity, 400);
        assert_eq!(s0.raw_usage, 40);
        assert_eq!(s0.online_disks, 3);
        assert_eq!(s0.offline_disks, 1);
        assert_eq!(s0.heal_disks, 1);
        assert_eq!(s0.nodes, vec!["n1:9000".to_string(), "n2:9000".to_string()]);

        let s1 = sets.get(0, 1).unwrap();
        assert_eq!(s1.id, 1);
        assert_eq!(s1.nodes, vec!["n3:9000".to_string()]);
    }

    #[test]
    fn test_oversubscribed() {
        let mut sets = PoolSets::new();
        sets.insert(
            0,
            ErasureSetInfo {
                id: 0,
                online_disks: 3,
                offline_disks: 2,
                ..Default::default()
            },
        );
        sets.insert(
            0,
            ErasureSetInfo {
                id: 1,
                online_disks: 4,
                ..Default::default()
            },
        );
        sets.insert(
            3,
            ErasureSetInfo {
                id: 0,
                online_disks: 99,
                ..Default::default()
            },
        );
        let backend = ErasureBackend {
            total_sets: vec![2],
            drives_per_set: vec![4],
            ..Default::default()
        };
        assert_eq!(sets.oversubscribed(&backend), vec![SetKey::new(0, 0)]);
        // the snapshot is not modified
        assert_eq!(sets.get(0, 0).unwrap().offline_disks, 2);
    }
}
