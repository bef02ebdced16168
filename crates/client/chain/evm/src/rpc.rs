//! Minimal JSON-RPC client over HTTP.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// JSON-RPC transport errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RpcError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("response carried neither result nor error")]
    MissingResult,
}

#[derive(Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'a str,
    method: &'a str,
    params: serde_json::Value,
    id: u64,
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    result: Option<serde_json::Value>,
    error: Option<JsonRpcErrorObject>,
}

#[derive(Deserialize, Debug)]
struct JsonRpcErrorObject {
    code: i64,
    message: String,
}

impl JsonRpcResponse {
    fn into_result(self) -> Result<serde_json::Value, RpcError> {
        if let Some(error) = self.error {
            return Err(RpcError::Rpc {
                code: error.code,
                message: error.message,
            });
        }
        self.result.ok_or(RpcError::MissingResult)
    }
}

/// Plain HTTP JSON-RPC client with incrementing request ids.
#[derive(Clone)]
pub struct RpcClient {
    url: String,
    http_client: reqwest::Client,
    id: Arc<AtomicU64>,
}

impl RpcClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            http_client: reqwest::Client::new(),
            id: Arc::new(AtomicU64::new(1)),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn call(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<serde_json::Value, RpcError> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id: self.id.fetch_add(1, Ordering::Relaxed),
        };

        tracing::debug!(method, "sending json-rpc request to {}", self.url);

        let response = self
            .http_client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|err| RpcError::Transport(err.to_string()))?;

        let parsed: JsonRpcResponse = response
            .json()
            .await
            .map_err(|err| RpcError::Transport(err.to_string()))?;

        parsed.into_result()
    }
}

/// Decode a `0x`-prefixed hex payload from an RPC result.
pub(crate) fn decode_hex_result(value: &serde_json::Value) -> Result<Vec<u8>, RpcError> {
    let text = value
        .as_str()
        .ok_or_else(|| RpcError::Transport("expected hex string result".to_string()))?;
    hex::decode(text.trim_start_matches("0x"))
        .map_err(|err| RpcError::Transport(format!("invalid hex in result: {err}")))
}
