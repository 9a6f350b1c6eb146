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

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

use crate::error::{Error, Result};
use crate::utils::null_as_default;

/// Backend tag of an erasure coded deployment, as reported in `InfoMessage`.
pub const ERASURE_TYPE: &str = "Erasure";
/// Backend tag of a single drive filesystem deployment.
pub const FS_TYPE: &str = "FS";

/// Storage engine a deployment runs.
///
/// Encoded as its integer tag; tags this crate does not know decode as `Unknown`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendType {
    #[default]
    Unknown,
    FS,
    Erasure,
    Gateway,
}

impl BackendType {
    pub fn tag(&self) -> u8 {
        match self {
            BackendType::Unknown => 0,
            BackendType::FS => 1,
            BackendType::Erasure => 2,
            BackendType::Gateway => 3,
        }
    }

    pub fn from_tag(tag: u8) -> Self {
        match tag {
            1 => BackendType::FS,
            2 => BackendType::Erasure,
            3 => BackendType::Gateway,
            _ => BackendType::Unknown,
        }
    }

    /// Classifies a backend type string; only `"Erasure"` and `"FS"` are recognized.
    pub fn from_name(name: &str) -> Self {
        match name {
            ERASURE_TYPE => BackendType::Erasure,
            FS_TYPE => BackendType::FS,
            _ => BackendType::Unknown,
        }
    }
}

impl Serialize for BackendType {
    fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.tag())
    }
}

impl<'de> Deserialize<'de> for BackendType {
    fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let tag = i64::deserialize(deserializer)?;
        Ok(u8::try_from(tag).map(BackendType::from_tag).unwrap_or_default())
    }
}

/// Number of drives per node endpoint.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BackendDisks(HashMap<String, usize>);

impl BackendDisks {
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    pub fn sum(&self) -> usize {
        self.0.values().sum()
    }

    /// Reduces two endpoint-disk maps into a new one.
    ///
    /// Counts of endpoints present in both maps are added. Endpoints only present
    /// in `other` are not carried over, so the key set is always the one of `self`.
    pub fn merge(&self, other: &BackendDisks) -> BackendDisks {
        let mut merged = HashMap::with_capacity(self.0.len());
        for (endpoint, count) in self.0.iter() {
            let extra = other.0.get(endpoint).copied().unwrap_or(0);
            merged.insert(endpoint.clone(), count + extra);
        }
        BackendDisks(merged)
    }

    /// Folds per-node reports left to right in iteration order.
    ///
    /// The first report fixes the set of endpoints; `merge` is not commutative, so
    /// callers must feed reports in one stable order to get stable results.
    pub fn merge_all<'a, I>(reports: I) -> BackendDisks
    where
        I: IntoIterator<Item = &'a BackendDisks>,
    {
        let mut reports = reports.into_iter();
        let Some(first) = reports.next() else {
            return BackendDisks::new();
        };
        reports.fold(first.clone(), |acc, next| {
            let dropped = next.0.keys().filter(|k| !acc.0.contains_key(*k)).count();
            if dropped > 0 {
                debug!(dropped, "endpoints absent from the first report are not merged");
            }
            acc.merge(next)
        })
    }

    pub fn get(&self, endpoint: &str) -> Option<usize> {
        self.0.get(endpoint).copied()
    }

    pub fn insert(&mut self, endpoint: impl Into<String>, count: usize) -> Option<usize> {
        self.0.insert(endpoint.into(), count)
    }

    /// Adds `count` drives to `endpoint`, creating the entry if needed.
    pub fn add(&mut self, endpoint: impl Into<String>, count: usize) {
        *self.0.entry(endpoint.into()).or_insert(0) += count;
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl From<HashMap<String, usize>> for BackendDisks {
    fn from(m: HashMap<String, usize>) -> Self {
        Self(m)
    }
}

impl<K: Into<String>> FromIterator<(K, usize)> for BackendDisks {
    fn from_iter<T: IntoIterator<Item = (K, usize)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Backend description carried by `StorageInfo`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct BackendInfo {
    #[serde(rename = "Type")]
    pub backend_type: BackendType,

    /// Only meaningful for gateway backends.
    pub gateway_online: bool,

    // The rest is only meaningful for erasure backends.
    #[serde(deserialize_with = "null_as_default")]
    pub online_disks: BackendDisks,
    #[serde(deserialize_with = "null_as_default")]
    pub offline_disks: BackendDisks,

    #[serde(rename = "StandardSCData", deserialize_with = "null_as_default")]
    pub standard_sc_data: Vec<usize>,
    #[serde(rename = "StandardSCParities", deserialize_with = "null_as_default")]
    pub standard_sc_parities: Vec<usize>,
    #[serde(rename = "RRSCData", deserialize_with = "null_as_default")]
    pub rr_sc_data: Vec<usize>,
    #[serde(rename = "RRSCParities", deserialize_with = "null_as_default")]
    pub rr_sc_parities: Vec<usize>,

    #[serde(deserialize_with = "null_as_default")]
    pub total_sets: Vec<usize>,
    #[serde(deserialize_with = "null_as_default")]
    pub drives_per_set: Vec<usize>,
}

impl BackendInfo {
    /// Number of pools described, after checking every non-empty per-pool array agrees.
    pub fn pool_count(&self) -> Result<usize> {
        check_pool_arrays(&[
            ("StandardSCData", &self.standard_sc_data),
            ("StandardSCParities", &self.standard_sc_parities),
            ("RRSCData", &self.rr_sc_data),
            ("RRSCParities", &self.rr_sc_parities),
            ("TotalSets", &self.total_sets),
            ("DrivesPerSet", &self.drives_per_set),
        ])
    }

    /// Drives configured across all pools.
    pub fn total_drives(&self) -> usize {
        self.total_sets.iter().zip(self.drives_per_set.iter()).map(|(s, d)| s * d).sum()
    }
}

fn check_pool_arrays(arrays: &[(&'static str, &Vec<usize>)]) -> Result<usize> {
    let mut expected: Option<usize> = None;
    for &(field, values) in arrays.iter().filter(|(_, v)| !v.is_empty()) {
        match expected {
            None => expected = Some(values.len()),
            Some(n) if n != values.len() => {
                return Err(Error::InconsistentPoolLayout {
                    field,
                    got: values.len(),
                    expected: n,
                });
            }
            Some(_) => {}
        }
    }
    Ok(expected.unwrap_or(0))
}

/// Filesystem backend description.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FSBackend {
    #[serde(rename = "backendType")]
    pub backend_type: String,
}

/// Erasure backend description carried by `InfoMessage`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErasureBackend {
    #[serde(rename = "backendType")]
    pub backend_type: String,
    #[serde(rename = "onlineDisks")]
    pub online_disks: usize,
    #[serde(rename = "offlineDisks")]
    pub offline_disks: usize,
    /// Parity drives of the standard storage class.
    #[serde(rename = "standardSCParity")]
    pub standard_sc_parity: i32,
    /// Parity drives of the reduced redundancy storage class.
    #[serde(rename = "rrSCParity")]
    pub rr_sc_parity: i32,
    #[serde(rename = "totalSets", deserialize_with = "null_as_default")]
    pub total_sets: Vec<usize>,
    #[serde(rename = "totalDrivesPerSet", deserialize_with = "null_as_default")]
    pub drives_per_set: Vec<usize>,
}

impl ErasureBackend {
    pub fn pool_count(&self) -> Result<usize> {
        check_pool_arrays(&[("totalSets", &self.total_sets), ("totalDrivesPerSet", &self.drives_per_set)])
    }

    pub fn drives_per_set(&self, pool: usize) -> Option<usize> {
        self.drives_per_set.get(pool).copied()
    }
}
