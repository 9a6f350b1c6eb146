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

use hyper::Uri;

use crate::consts::{QUERY_CAPACITY, QUERY_METRICS};

/// Extra data asked from `server_info`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServerInfoOpts {
    /// Include per drive metrics in every `Disk`.
    pub metrics: bool,
}

impl ServerInfoOpts {
    pub fn with_drive_metrics(mut self, metrics: bool) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn query(&self) -> String {
        format!("{}={}", QUERY_METRICS, self.metrics)
    }

    pub fn parse_params(&mut self, uri: &Uri) -> Result<(), String> {
        let query_pairs = query_pairs(uri);
        if let Some(v) = query_pairs.get(QUERY_METRICS) {
            self.metrics = parse_bool(QUERY_METRICS, v)?;
        }
        Ok(())
    }
}

/// Options of `data_usage_info`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataUsageInfoOpts {
    /// Include cluster capacity totals.
    pub capacity: bool,
}

impl Default for DataUsageInfoOpts {
    fn default() -> Self {
        Self { capacity: true }
    }
}

impl DataUsageInfoOpts {
    pub fn with_capacity(mut self, capacity: bool) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn query(&self) -> String {
        format!("{}={}", QUERY_CAPACITY, self.capacity)
    }

    pub fn parse_params(&mut self, uri: &Uri) -> Result<(), String> {
        let query_pairs = query_pairs(uri);
        if let Some(v) = query_pairs.get(QUERY_CAPACITY) {
            self.capacity = parse_bool(QUERY_CAPACITY, v)?;
        }
        Ok(())
    }
}

fn query_pairs(uri: &Uri) -> HashMap<String, String> {
    uri.query()
        .unwrap_or("")
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter_map(|pair| {
            let mut split = pair.splitn(2, '=');
            let key = split.next()?.to_string();
            let value = split.next().unwrap_or("").to_string();
            Some((key, value))
        })
        .collect()
}

fn parse_bool(key: &str, v: &str) -> Result<bool, String> {
    match v {
        "true" | "1" => Ok(true),
        "false" | "0" | "" => Ok(false),
        _ => Err(format!("invalid boolean '{v}' for '{key}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_info_opts() {
        let opts = ServerInfoOpts::default();
        assert!(!opts.metrics);
        assert_eq!(opts.query(), "metrics=false");
        assert_eq!(opts.with_drive_metrics(true).query(), "metrics=true");
    }

    #[test]
    fn test_data_usage_opts_default_capacity() {
        assert_eq!(DataUsageInfoOpts::default().query(), "capacity=true");
        assert_eq!(DataUsageInfoOpts::default().with_capacity(false).query(), "capacity=false");
    }

    #[test]
    fn test_parse_params() {
        let uri: Uri = "/rustfs/admin/v3/info?metrics=true&other=x".parse().unwrap();
        let mut opts = ServerInfoOpts::default();
        opts.parse_params(&uri).unwrap();
        assert!(opts.metrics);

        let uri: Uri = "/rustfs/admin/v3/datausageinfo?capacity=false".parse().unwrap();
        let mut opts = DataUsageInfoOpts::default();
        opts.parse_params(&uri).unwrap();
        assert!(!opts.capacity);

        // absent flags keep their defaults
        let uri: Uri = "/rustfs/admin/v3/datausageinfo".parse().unwrap();
        let mut opts = DataUsageInfoOpts::default();
        opts.parse_params(&uri).unwrap();
        assert!(opts.capacity);

        let uri: Uri = "/rustfs/admin/v3/info?metrics=maybe".parse().unwrap();
        assert!(ServerInfoOpts::default().parse_params(&uri).is_err());
    }

    #[test]
    fn test_round_trip_through_query() {
        let opts = ServerInfoOpts::default().with_drive_metrics(true);
        let uri: Uri = format!("/info?{}", opts.query()).parse().unwrap();
        let mut parsed = ServerInfoOpts::default();
        parsed.parse_params(&uri).unwrap();
        assert_eq!(parsed, opts);
    }
}
