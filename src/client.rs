//! Node client seam and its JSON-RPC adapter
//!
//! The explorer only ever asks two questions of a node: what is the latest
//! block, and what is the block at height `h`. [`ChainClient`] captures that;
//! [`RpcChainClient`] answers it over HTTP with `chain_get_block`.

use crate::block::BlockInfo;
use crate::config::Config;
use crate::error::{ExplorerError, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::debug;

const GET_BLOCK_METHOD: &str = "chain_get_block";

#[async_trait]
pub trait ChainClient: Send + Sync {
    async fn get_latest_block_info(&self) -> Result<BlockInfo>;
    async fn get_block_info_by_height(&self, height: u64) -> Result<BlockInfo>;
}

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    params: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorObject>,
}

/// JSON-RPC 2.0 client for a node's RPC endpoint.
pub struct RpcChainClient {
    http: reqwest::Client,
    rpc_url: String,
    next_id: AtomicU64,
}

impl RpcChainClient {
    pub fn new(rpc_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ExplorerError::Config(format!("building HTTP client: {}", e)))?;

        Ok(Self {
            http,
            rpc_url: rpc_url.into(),
            next_id: AtomicU64::new(1),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.node.rpc_url.clone(), config.request_timeout())
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: Option<Value>) -> Result<T> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = RpcRequest {
            jsonrpc: "2.0",
            id,
            method,
            params,
        };
        debug!(id, method, url = %self.rpc_url, "sending RPC request");

        let response = self.http.post(&self.rpc_url).json(&request).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ExplorerError::UpstreamFetch(format!(
                "{} returned HTTP {}",
                method, status
            )));
        }

        let body = response.bytes().await?;
        let reply: RpcResponse<T> = serde_json::from_slice(&body).map_err(|e| {
            ExplorerError::UpstreamFetch(format!("malformed {} response: {}", method, e))
        })?;

        match (reply.result, reply.error) {
            (_, Some(err)) => Err(ExplorerError::UpstreamFetch(format!(
                "RPC error {}: {}",
                err.code, err.message
            ))),
            (Some(result), None) => Ok(result),
            (None, None) => Err(ExplorerError::UpstreamFetch(format!(
                "{} returned neither result nor error",
                method
            ))),
        }
    }
}

#[async_trait]
impl ChainClient for RpcChainClient {
    async fn get_latest_block_info(&self) -> Result<BlockInfo> {
        self.call(GET_BLOCK_METHOD, None).await
    }

    async fn get_block_info_by_height(&self, height: u64) -> Result<BlockInfo> {
        let params = json!({ "block_identifier": { "Height": height } });
        self.call(GET_BLOCK_METHOD, Some(params)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_omits_missing_params() {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: 4,
            method: GET_BLOCK_METHOD,
            params: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({ "jsonrpc": "2.0", "id": 4, "method": "chain_get_block" })
        );
    }

    #[test]
    fn test_response_with_error_object() {
        let reply: RpcResponse<BlockInfo> = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": { "code": -32001, "message": "block not known" }
        }))
        .unwrap();
        assert!(reply.result.is_none());
        let err = reply.error.unwrap();
        assert_eq!(err.code, -32001);
        assert_eq!(err.message, "block not known");
    }

    #[test]
    fn test_client_builds_from_config() {
        let client = RpcChainClient::from_config(&Config::default()).unwrap();
        assert_eq!(client.rpc_url(), "http://localhost/node-1/rpc");
    }
}
