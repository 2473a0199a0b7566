//! rpc::client
//!
//! HTTP client for a node's RPC API.
//!
//! # Design
//!
//! One client serves three roles: it is the remote [`ResolveProcedure`]
//! (`dag/resolve`), a [`NameResolver`] (`name/resolve`), and a [`DagStore`]
//! (`block/get`). Every command is a `POST {api}/api/v0/<command>?arg=...`.
//! Non-success responses carry a JSON body of the form
//! `{"Message": "...", "Code": 0, "Type": "error"}`.
//!
//! `block/get` returns raw block bytes, which are decoded as this crate's
//! JSON node encoding and verified against the requested CID. The client
//! therefore serves as a block store only for nodes that hold blocks written
//! in that encoding; dag-pb or dag-cbor blocks fail to decode.
//!
//! Requests, error bodies and response bodies are raced against the caller's
//! cancellation token.
//! Timeouts are a client setting and surface as `RpcError::Network`. There is
//! no retry.
//!
//! # Example
//!
//! ```no_run
//! use dagpath::core::types::Path;
//! use dagpath::resolver::{PathResolver, RemoteResolver};
//! use dagpath::rpc::RpcClient;
//! use tokio_util::sync::CancellationToken;
//!
//! # tokio_test::block_on(async {
//! let client = RpcClient::new("http://127.0.0.1:5001")
//!     .with_auth("Bearer token")
//!     .unwrap();
//! let resolver = RemoteResolver::from_client(client);
//!
//! let path = Path::new("/ipns/example.com/docs").unwrap();
//! let resolved = resolver
//!     .resolve_path(&CancellationToken::new(), &path)
//!     .await
//!     .unwrap();
//! println!("{}", resolved);
//! # });
//! ```

use std::time::Duration;

use async_trait::async_trait;
use cid::Cid;
use reqwest::header::{HeaderValue, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use super::traits::{RemoteResolution, ResolveProcedure, RpcError};
use crate::core::config::Config;
use crate::core::node::Node;
use crate::core::types::{Namespace, Path};
use crate::naming::{NameError, NameResolver};
use crate::store::{DagStore, StoreError};

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = concat!("dagpath/", env!("CARGO_PKG_VERSION"));

/// Path prefix of every RPC command.
const API_PREFIX: &str = "api/v0";

/// RPC API client.
#[derive(Clone)]
pub struct RpcClient {
    /// HTTP client for making requests
    client: Client,
    /// API base URL, without the `/api/v0` prefix
    api_base: String,
    /// Optional `Authorization` header value
    auth: Option<HeaderValue>,
    /// Per-request timeout, if configured
    timeout: Option<Duration>,
}

// Custom Debug to avoid exposing the auth header
impl std::fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcClient")
            .field("api_base", &self.api_base)
            .field("has_auth", &self.auth.is_some())
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Body of a `dag/resolve` response.
#[derive(Debug, Deserialize)]
struct DagResolveResponse {
    #[serde(rename = "Cid")]
    cid: CidLink,
    #[serde(rename = "RemPath", default)]
    rem_path: String,
}

/// A CID encoded as a DAG-JSON link (`{"/": "<cid>"}`).
#[derive(Debug, Deserialize)]
struct CidLink {
    #[serde(rename = "/")]
    link: String,
}

/// Body of a `name/resolve` response.
#[derive(Debug, Deserialize)]
struct NameResolveResponse {
    #[serde(rename = "Path")]
    path: String,
}

/// Error body returned with non-success statuses.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(rename = "Message")]
    message: String,
}

impl RpcClient {
    /// Create a client for the API at `api_base` (e.g. `http://127.0.0.1:5001`).
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            auth: None,
            timeout: None,
        }
    }

    /// Send `value` as the `Authorization` header on every request.
    ///
    /// # Errors
    ///
    /// `RpcError::InvalidConfig` if `value` is not a valid header value.
    pub fn with_auth(mut self, value: impl AsRef<str>) -> Result<Self, RpcError> {
        let mut header = HeaderValue::from_str(value.as_ref())
            .map_err(|e| RpcError::InvalidConfig(format!("authorization header: {}", e)))?;
        header.set_sensitive(true);
        self.auth = Some(header);
        Ok(self)
    }

    /// Apply a per-request timeout.
    ///
    /// # Errors
    ///
    /// `RpcError::InvalidConfig` if the HTTP client cannot be rebuilt.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, RpcError> {
        self.client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RpcError::InvalidConfig(e.to_string()))?;
        self.timeout = Some(timeout);
        Ok(self)
    }

    /// Build a client from the `[api]` section of `config`.
    pub fn from_config(config: &Config) -> Result<Self, RpcError> {
        let mut client = Self::new(config.api_url());
        if let Some(auth) = config.api_auth() {
            client = client.with_auth(auth)?;
        }
        if let Some(timeout) = config.api_timeout() {
            client = client.with_timeout(timeout)?;
        }
        Ok(client)
    }

    /// Get the API base URL.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Check if an `Authorization` header is configured.
    pub fn has_auth(&self) -> bool {
        self.auth.is_some()
    }

    /// Build URL for an RPC command.
    fn endpoint(&self, command: &str) -> String {
        format!("{}/{}/{}", self.api_base, API_PREFIX, command)
    }

    /// Resolve a name on the remote node, following records recursively.
    pub async fn name_resolve(
        &self,
        cancel: &CancellationToken,
        path: &str,
    ) -> Result<String, RpcError> {
        let response = self
            .send(
                cancel,
                "name/resolve",
                &[("arg", path), ("recursive", "true")],
            )
            .await?;
        let body: NameResolveResponse = Self::read_json(cancel, response).await?;
        Ok(body.path)
    }

    /// Fetch the raw bytes of a block.
    pub async fn block_get(
        &self,
        cancel: &CancellationToken,
        cid: &Cid,
    ) -> Result<Vec<u8>, RpcError> {
        let arg = cid.to_string();
        let response = self.send(cancel, "block/get", &[("arg", &arg)]).await?;
        Self::read_bytes(cancel, response).await
    }

    /// Send a command, mapping non-success statuses to `RpcError::Api`.
    async fn send(
        &self,
        cancel: &CancellationToken,
        command: &str,
        query: &[(&str, &str)],
    ) -> Result<Response, RpcError> {
        if cancel.is_cancelled() {
            return Err(RpcError::Cancelled);
        }

        let mut request = self
            .client
            .post(self.endpoint(command))
            .query(query)
            .header(USER_AGENT, USER_AGENT_VALUE);
        if let Some(auth) = &self.auth {
            request = request.header(AUTHORIZATION, auth.clone());
        }

        tracing::debug!(command, api = %self.api_base, "rpc request");
        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(RpcError::Cancelled),
            result = request.send() => result.map_err(|e| RpcError::Network(e.to_string()))?,
        };

        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(Self::error_from_response(cancel, response, status).await)
        }
    }

    /// Turn an error response into `RpcError::Api`.
    async fn error_from_response(
        cancel: &CancellationToken,
        response: Response,
        status: StatusCode,
    ) -> RpcError {
        let bytes = match Self::read_bytes(cancel, response).await {
            Ok(bytes) => bytes,
            Err(RpcError::Cancelled) => return RpcError::Cancelled,
            Err(_) => Vec::new(),
        };
        let text = String::from_utf8_lossy(&bytes);
        let message = match serde_json::from_str::<ApiErrorBody>(&text) {
            Ok(body) => body.message,
            Err(_) if !text.trim().is_empty() => text.trim().to_string(),
            Err(_) => status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string(),
        };

        tracing::debug!(status = status.as_u16(), %message, "rpc error response");
        RpcError::Api {
            status: status.as_u16(),
            message,
        }
    }

    async fn read_bytes(
        cancel: &CancellationToken,
        response: Response,
    ) -> Result<Vec<u8>, RpcError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(RpcError::Cancelled),
            result = response.bytes() => result
                .map(|bytes| bytes.to_vec())
                .map_err(|e| RpcError::Network(e.to_string())),
        }
    }

    async fn read_json<T: DeserializeOwned>(
        cancel: &CancellationToken,
        response: Response,
    ) -> Result<T, RpcError> {
        let bytes = Self::read_bytes(cancel, response).await?;
        serde_json::from_slice(&bytes).map_err(|e| RpcError::Decode(e.to_string()))
    }
}

fn to_name_error(err: RpcError) -> NameError {
    match err {
        RpcError::Cancelled => NameError::Cancelled,
        other => NameError::Backend(other.to_string()),
    }
}

fn to_store_error(err: RpcError) -> StoreError {
    match err {
        RpcError::Cancelled => StoreError::Cancelled,
        other => StoreError::Backend(other.to_string()),
    }
}

#[async_trait]
impl ResolveProcedure for RpcClient {
    fn name(&self) -> &'static str {
        "rpc"
    }

    async fn dag_resolve(
        &self,
        cancel: &CancellationToken,
        path: &str,
    ) -> Result<RemoteResolution, RpcError> {
        let response = self.send(cancel, "dag/resolve", &[("arg", path)]).await?;
        let body: DagResolveResponse = Self::read_json(cancel, response).await?;
        let cid = Cid::try_from(body.cid.link.as_str())
            .map_err(|e| RpcError::Decode(format!("invalid CID '{}': {}", body.cid.link, e)))?;

        Ok(RemoteResolution {
            cid,
            rem_path: body.rem_path,
        })
    }
}

#[async_trait]
impl NameResolver for RpcClient {
    fn name(&self) -> &'static str {
        "rpc"
    }

    async fn resolve(&self, cancel: &CancellationToken, path: &str) -> Result<Path, NameError> {
        let parsed = Path::new(path)?;
        if parsed.namespace() != Namespace::Ipns {
            return Ok(parsed);
        }

        let resolved = self
            .name_resolve(cancel, path)
            .await
            .map_err(to_name_error)?;
        Path::new(&resolved).map_err(|e| NameError::InvalidRecord {
            name: parsed.root().to_string(),
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl DagStore for RpcClient {
    fn name(&self) -> &'static str {
        "rpc"
    }

    async fn get(&self, cancel: &CancellationToken, cid: &Cid) -> Result<Node, StoreError> {
        let bytes = self.block_get(cancel, cid).await.map_err(to_store_error)?;
        Ok(Node::decode(cid, &bytes)?)
    }
}
