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

use async_trait::async_trait;
use hyper::{Method, Uri};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::consts::{ADMIN_API_VERSION, ADMIN_PREFIX, DATA_USAGE_INFO_PATH, SERVER_INFO_PATH, STORAGE_INFO_PATH};
use crate::data_usage::DataUsageInfo;
use crate::error::{BoxError, Error, Result};
use crate::info_commands::InfoMessage;
use crate::service_commands::{DataUsageInfoOpts, ServerInfoOpts};
use crate::storage::StorageInfo;

/// Admin API request handed to the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminRequest {
    pub method: Method,
    pub uri: Uri,
}

/// Sends admin requests to the cluster.
///
/// Implementations own signing, retries and status handling: a non-success
/// response must come back as an error, a success as the raw JSON body.
#[async_trait]
pub trait AdminTransport: Send + Sync {
    async fn execute(&self, req: AdminRequest) -> core::result::Result<Vec<u8>, BoxError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminClientConfig {
    /// Route prefix, including the API version.
    pub api_prefix: String,
}

impl Default for AdminClientConfig {
    fn default() -> Self {
        Self {
            api_prefix: format!("{ADMIN_PREFIX}/{ADMIN_API_VERSION}"),
        }
    }
}

/// Fetches cluster snapshots and decodes them.
pub struct AdminClient<T> {
    transport: T,
    config: AdminClientConfig,
}

impl<T: AdminTransport> AdminClient<T> {
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, AdminClientConfig::default())
    }

    pub fn with_config(transport: T, config: AdminClientConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &AdminClientConfig {
        &self.config
    }

    /// Drives and backend layout of the cluster.
    #[instrument(level = "debug", skip(self))]
    pub async fn storage_info(&self) -> Result<StorageInfo> {
        self.get_json(STORAGE_INFO_PATH, None).await
    }

    /// Usage as of the last scanner cycle.
    #[instrument(level = "debug", skip(self))]
    pub async fn data_usage_info(&self, opts: DataUsageInfoOpts) -> Result<DataUsageInfo> {
        self.get_json(DATA_USAGE_INFO_PATH, Some(opts.query())).await
    }

    /// Server, backend and erasure set information.
    #[instrument(level = "debug", skip(self))]
    pub async fn server_info(&self, opts: ServerInfoOpts) -> Result<InfoMessage> {
        self.get_json(SERVER_INFO_PATH, Some(opts.query())).await
    }

    fn request(&self, path: &str, query: Option<String>) -> Result<AdminRequest> {
        let mut target = format!("{}{}", self.config.api_prefix, path);
        if let Some(query) = query {
            target.push('?');
            target.push_str(&query);
        }
        let uri = target
            .parse::<Uri>()
            .map_err(|e| Error::InvalidRequest(format!("{target}: {e}")))?;
        Ok(AdminRequest { method: Method::GET, uri })
    }

    async fn get_json<R: DeserializeOwned>(&self, path: &str, query: Option<String>) -> Result<R> {
        let req = self.request(path, query)?;
        debug!(uri = %req.uri, "sending admin request");
        let body = self.transport.execute(req).await.map_err(Error::transport)?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use std::{io, sync::Mutex};

    use super::*;

    #[derive(Default)]
    struct MockTransport {
        body: Vec<u8>,
        fail: bool,
        seen: Mutex<Vec<AdminRequest>>,
    }

    impl MockTransport {
        fn with_body(body: &str) -> Self {
            Self {
                body: body.as_bytes().to_vec(),
                ..Default::default()
            }
        }

        fn seen(&self) -> Vec<AdminRequest> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AdminTransport for MockTransport {
        async fn execute(&self, req: AdminRequest) -> core::result::Result<Vec<u8>, BoxError> {
            self.seen.lock().unwrap().push(req);
            if self.fail {
                return Err(Box::new(io::Error::new(io::ErrorKind::PermissionDenied, "403 Forbidden: access denied")));
            }
            Ok(self.body.clone())
        }
    }

    #[tokio::test]
    async fn test_storage_info_request() {
        let client = AdminClient::new(MockTransport::with_body(r#"{"Disks":[],"Backend":{"Type":2,"TotalSets":[1]}}"#));
        let info = client.storage_info().await.unwrap();
        assert_eq!(info.backend.total_sets, vec![1]);

        let seen = client.transport.seen();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].method, Method::GET);
        assert_eq!(seen[0].uri.path(), "/rustfs/admin/v3/storageinfo");
        assert_eq!(seen[0].uri.query(), None);
    }

    #[tokio::test]
    async fn test_data_usage_info_request() {
        let client = AdminClient::new(MockTransport::with_body(r#"{"bucketsCount":3,"capacity":10}"#));
        let info = client.data_usage_info(DataUsageInfoOpts::default()).await.unwrap();
        assert_eq!(info.buckets_count, 3);
        assert_eq!(info.total_capacity, 10);

        client
            .data_usage_info(DataUsageInfoOpts::default().with_capacity(false))
            .await
            .unwrap();
        let seen = client.transport.seen();
        assert_eq!(seen[0].uri.path(), "/rustfs/admin/v3/datausageinfo");
        assert_eq!(seen[0].uri.query(), Some("capacity=true"));
        assert_eq!(seen[1].uri.query(), Some("capacity=false"));
    }

    #[tokio::test]
    async fn test_server_info_request() {
        let config = AdminClientConfig {
            api_prefix: "/minio/admin/v3".to_string(),
        };
        let client = AdminClient::with_config(
            MockTransport::with_body(r#"{"mode":"online","backend":{"backendType":"Erasure","standardSCParity":0}}"#),
            config,
        );
        let info = client
            .server_info(ServerInfoOpts::default().with_drive_metrics(true))
            .await
            .unwrap();
        assert_eq!(info.mode, "online");
        assert_eq!(info.standard_parity(), Some(0));

        let seen = client.transport.seen();
        assert_eq!(seen[0].uri.path(), "/minio/admin/v3/info");
        assert_eq!(seen[0].uri.query(), Some("metrics=true"));
    }

    #[tokio::test]
    async fn test_transport_error_passes_through() {
        let client = AdminClient::new(MockTransport {
            fail: true,
            ..Default::default()
        });
        let err = client.server_info(ServerInfoOpts::default()).await.unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
        assert_eq!(err.to_string(), "403 Forbidden: access denied");
        let Error::Transport(inner) = err else { unreachable!() };
        let io_err = inner.downcast_ref::<io::Error>().unwrap();
        assert_eq!(io_err.kind(), io::ErrorKind::PermissionDenied);
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let client = AdminClient::new(MockTransport::with_body(r#"{"Disks": "nope"}"#));
        let err = client.storage_info().await.unwrap_err();
        assert!(err.is_decode());

        let client = AdminClient::new(MockTransport::with_body("not json"));
        assert!(client.data_usage_info(DataUsageInfoOpts::default()).await.unwrap_err().is_decode());
    }

    #[tokio::test]
    async fn test_invalid_prefix() {
        let client = AdminClient::with_config(
            MockTransport::with_body("{}"),
            AdminClientConfig {
                api_prefix: "bad prefix with spaces".to_string(),
            },
        );
        let err = client.storage_info().await.unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
        assert!(client.transport.seen().is_empty());
    }
}
