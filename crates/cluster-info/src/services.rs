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

use std::{collections::HashMap, fmt};

use serde::{Deserialize, Serialize};

use crate::utils::is_default;

pub const DEFAULT_ARN_PARTITION: &str = "rustfs";
/// Resource kind of every notification target ARN.
pub const NOTIFICATION_ARN_TYPE: &str = "sqs";

/// Status of an endpoint.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Status {
    #[serde(skip_serializing_if = "is_default")]
    pub status: String,
}

impl Status {
    pub fn new(status: impl Into<String>) -> Self {
        Self { status: status.into() }
    }
}

/// Status of each audit target, keyed by target name.
pub type Audit = HashMap<String, Status>;

/// Status of each logger target, keyed by target name.
pub type Logger = HashMap<String, Status>;

/// Status of each notification target, keyed by target id.
pub type TargetIDStatus = HashMap<String, Status>;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KMS {
    #[serde(skip_serializing_if = "is_default")]
    pub status: String,
    #[serde(skip_serializing_if = "is_default")]
    pub encrypt: String,
    #[serde(skip_serializing_if = "is_default")]
    pub decrypt: String,
    #[serde(skip_serializing_if = "is_default")]
    pub endpoint: String,
    #[serde(skip_serializing_if = "is_default")]
    pub version: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LDAP {
    #[serde(skip_serializing_if = "is_default")]
    pub status: String,
}

/// Identifier of a configured notification target.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ARN {
    pub arn_type: String,
    pub id: String,
    pub region: String,
    pub resource: String,
}

impl fmt::Display for ARN {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.id.is_empty() && self.resource.is_empty() && self.region.is_empty() {
            return Ok(());
        }
        write!(
            f,
            "arn:{}:{}:{}:{}:{}",
            DEFAULT_ARN_PARTITION, self.arn_type, self.region, self.id, self.resource
        )
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Services {
    /// Kept for older servers, newer ones fill `kms_status`.
    #[serde(skip_serializing_if = "is_default")]
    pub kms: KMS,
    #[serde(rename = "kmsStatus", skip_serializing_if = "is_default")]
    pub kms_status: Vec<KMS>,
    #[serde(skip_serializing_if = "is_default")]
    pub ldap: LDAP,
    #[serde(skip_serializing_if = "is_default")]
    pub logger: Vec<Logger>,
    #[serde(skip_serializing_if = "is_default")]
    pub audit: Vec<Audit>,
    /// One entry per notification config: target type to the statuses of its targets.
    #[serde(skip_serializing_if = "is_default")]
    pub notifications: Vec<HashMap<String, Vec<TargetIDStatus>>>,
}

impl Services {
    /// Lists one ARN per configured notification target.
    ///
    /// The order follows map iteration and is not stable between calls.
    pub fn list_notification_arns(&self) -> Vec<ARN> {
        let mut arns = Vec::new();
        for notify in self.notifications.iter() {
            for (target_type, target_statuses) in notify.iter() {
                for target_status in target_statuses.iter() {
                    for target_id in target_status.keys() {
                        arns.push(ARN {
                            arn_type: NOTIFICATION_ARN_TYPE.to_string(),
                            id: target_id.clone(),
                            resource: target_type.clone(),
                            ..Default::default()
                        });
                    }
                }
            }
        }
        arns
    }
}
