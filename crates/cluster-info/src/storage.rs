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

use serde::{Deserialize, Serialize};

use crate::backend::{BackendDisks, BackendInfo};
use crate::disk::Disk;
use crate::utils::null_as_default;

/// Capacity snapshot of the whole cluster.
///
/// `disks` is flat across pools; use `Disk::pool_index` to get a per-pool view.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct StorageInfo {
    #[serde(deserialize_with = "null_as_default")]
    pub disks: Vec<Disk>,
    pub backend: BackendInfo,
}

impl StorageInfo {
    pub fn disks_in_pool(&self, pool: usize) -> impl Iterator<Item = &Disk> {
        self.disks
            .iter()
            .filter(move |d| usize::try_from(d.pool_index).is_ok_and(|p| p == pool))
    }

    /// Online and offline drive counts per node, derived from the drive states.
    pub fn online_offline_disks(&self) -> (BackendDisks, BackendDisks) {
        let mut online = BackendDisks::new();
        let mut offline = BackendDisks::new();
        for disk in self.disks.iter() {
            let node = disk.node();
            // every node is keyed in both maps, even with a zero count
            online.add(node.clone(), 0);
            offline.add(node.clone(), 0);
            if disk.is_online() {
                online.add(node, 1);
            } else {
                offline.add(node, 1);
            }
        }
        (online, offline)
    }

    /// Raw capacity of the data drives of every pool.
    pub fn usable_capacity(&self) -> u64 {
        self.data_disks().map(|d| d.total_space).sum()
    }

    /// Free space of the data drives of every pool.
    pub fn usable_free_capacity(&self) -> u64 {
        self.data_disks().map(|d| d.available_space).sum()
    }

    // drives whose index falls within the standard class data drive count of their pool
    fn data_disks(&self) -> impl Iterator<Item = &Disk> {
        self.disks.iter().filter(move |disk| match disk.placement() {
            Some(p) => self.backend.standard_sc_data.get(p.pool).is_some_and(|data| p.disk < *data),
            None => false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendType;
    use crate::disk::{DRIVE_STATE_OFFLINE, DRIVE_STATE_OK, DRIVE_STATE_UNFORMATTED};

    fn disk(endpoint: &str, state: &str, pool: i32, idx: i32, total: u64, avail: u64) -> Disk {
        Disk {
            endpoint: endpoint.to_string(),
            state: state.to_string(),
            pool_index: pool,
            set_index: if pool < 0 { -1 } else { 0 },
            disk_index: idx,
            total_space: total,
            available_space: avail,
            ..Default::default()
        }
    }

    fn sample() -> StorageInfo {
        StorageInfo {
            disks: vec![
                disk("http://n1:9000/d1", DRIVE_STATE_OK, 0, 0, 100, 60),
                disk("http://n1:9000/d2", DRIVE_STATE_OK, 0, 1, 100, 50),
                disk("http://n2:9000/d1", DRIVE_STATE_OFFLINE, 0, 2, 100, 0),
                disk("http://n2:9000/d2", DRIVE_STATE_UNFORMATTED, 0, 3, 100, 100),
                disk("http://n3:9000/d1", DRIVE_STATE_OK, 1, 0, 500, 400),
                disk("http://n3:9000/d2", DRIVE_STATE_OK, 1, 1, 500, 300),
                disk("http://n4:9000/d1", DRIVE_STATE_OK, -1, -1, 900, 900),
            ],
            backend: BackendInfo {
                backend_type: BackendType::Erasure,
                standard_sc_data: vec![2, 1],
                standard_sc_parities: vec![2, 1],
                total_sets: vec![1, 1],
                drives_per_set: vec![4, 2],
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_disks_in_pool() {
        let info = sample();
        assert_eq!(info.disks_in_pool(0).count(), 4);
        assert_eq!(info.disks_in_pool(1).count(), 2);
        assert_eq!(info.disks_in_pool(2).count(), 0);
    }

    #[test]
    fn test_online_offline_disks() {
        let (online, offline) = sample().online_offline_disks();
        assert_eq!(online.get("n1:9000"), Some(2));
        assert_eq!(online.get("n2:9000"), Some(1));
        assert_eq!(offline.get("n2:9000"), Some(1));
        assert_eq!(offline.get("n1:9000"), Some(0));
        assert_eq!(online.sum(), 6);
        assert_eq!(offline.sum(), 1);
    }

    #[test]
    fn test_usable_capacity() {
        let info = sample();
        // pool 0 counts disks 0 and 1, pool 1 only disk 0, the unplaced disk never counts
        assert_eq!(info.usable_capacity(), 100 + 100 + 500);
        assert_eq!(info.usable_free_capacity(), 60 + 50 + 400);

        let no_layout = StorageInfo {
            disks: info.disks.clone(),
            ..Default::default()
        };
        assert_eq!(no_layout.usable_capacity(), 0);
    }

    #[test]
    fn test_wire_keys() {
        let v = serde_json::to_value(sample()).unwrap();
        assert!(v["Disks"].is_array());
        assert_eq!(v["Backend"]["Type"], 2);
        assert_eq!(v["Backend"]["StandardSCData"][1], 1);

        let back: StorageInfo = serde_json::from_value(v).unwrap();
        assert_eq!(back, sample());

        let empty: StorageInfo = serde_json::from_str(r#"{"Disks":null,"Backend":{"Type":1}}"#).unwrap();
        assert!(empty.disks.is_empty());
        assert_eq!(empty.backend.backend_type, BackendType::FS);
    }
}
