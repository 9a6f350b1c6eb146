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

/// Prefix of every admin API route.
pub const ADMIN_PREFIX: &str = "/rustfs/admin";

pub const ADMIN_API_VERSION: &str = "v3";

pub const STORAGE_INFO_PATH: &str = "/storageinfo";
pub const DATA_USAGE_INFO_PATH: &str = "/datausageinfo";
pub const SERVER_INFO_PATH: &str = "/info";

pub const QUERY_CAPACITY: &str = "capacity";
pub const QUERY_METRICS: &str = "metrics";
