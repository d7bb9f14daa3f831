//! `ProductSource` backed by an Ethereum JSON-RPC node (`eth_call`).

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Deserialize;
use serde_json::json;
use tracechain_common::address::Address;
use tracing::debug;

use crate::abi::{self, ParamKind, Token};
use crate::config::LedgerConfig;
use crate::error::{ConfigError, SourceError};
use crate::schema::{
    history_return_kinds, product_return_kinds, RecordTuple, PRODUCTS_SELECTOR,
    PRODUCT_COUNTER_SELECTOR, PRODUCT_HISTORY_SELECTOR,
};
use crate::source::ProductSource;

#[derive(Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<String>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

pub struct JsonRpcSource {
    client: reqwest::Client,
    url: String,
    contract: Address,
    history_enabled: bool,
    next_id: AtomicU64,
}

impl JsonRpcSource {
    pub fn new(url: impl Into<String>, contract: Address) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            contract,
            history_enabled: true,
            next_id: AtomicU64::new(1),
        }
    }

    pub fn from_config(config: &LedgerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config.rpc_url.clone(), config.contract()?)
            .with_history(config.history_enabled))
    }

    pub fn with_history(mut self, enabled: bool) -> Self {
        self.history_enabled = enabled;
        self
    }

    pub fn contract(&self) -> Address {
        self.contract
    }

    /// Run a read-only call against the contract at the latest block.
    async fn eth_call(&self, data: Vec<u8>) -> Result<Vec<u8>, SourceError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": "eth_call",
            "params": [
                { "to": self.contract.to_string(), "data": format!("0x{}", hex::encode(&data)) },
                "latest"
            ],
        });
        debug!(id, url = %self.url, selector = %hex::encode(&data[..4.min(data.len())]), "eth_call");

        let resp = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| SourceError::Transport(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(SourceError::Transport(format!("HTTP {}", resp.status())));
        }
        let rpc: RpcResponse = resp
            .json()
            .await
            .map_err(|e| SourceError::Malformed(e.to_string()))?;
        if let Some(err) = rpc.error {
            return Err(SourceError::Rpc {
                code: err.code,
                message: err.message,
            });
        }
        let result = rpc
            .result
            .ok_or_else(|| SourceError::Malformed("response has neither result nor error".into()))?;
        decode_hex(&result)
    }
}

fn decode_hex(s: &str) -> Result<Vec<u8>, SourceError> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    hex::decode(digits).map_err(|e| SourceError::Malformed(format!("bad hex in result: {e}")))
}

impl ProductSource for JsonRpcSource {
    async fn count(&self) -> Result<u64, SourceError> {
        let data = self
            .eth_call(abi::encode_call(PRODUCT_COUNTER_SELECTOR, &[]))
            .await?;
        match abi::decode(&[ParamKind::Uint(256)], &data)?.as_slice() {
            [Token::Uint(word)] => word
                .to_u64()
                .ok_or_else(|| SourceError::Malformed("product counter exceeds u64".into())),
            other => Err(SourceError::Malformed(format!(
                "unexpected productCounter result: {other:?}"
            ))),
        }
    }

    async fn record_at(&self, index: u64) -> Result<RecordTuple, SourceError> {
        let data = self
            .eth_call(abi::encode_call(PRODUCTS_SELECTOR, &[Token::uint(index)]))
            .await?;
        let tokens = abi::decode(&product_return_kinds(), &data)?;
        Ok(RecordTuple(tokens))
    }

    async fn history_at(&self, id: u64) -> Result<Vec<RecordTuple>, SourceError> {
        if !self.history_enabled {
            return Err(SourceError::Unsupported("getProductHistory"));
        }
        let data = self
            .eth_call(abi::encode_call(PRODUCT_HISTORY_SELECTOR, &[Token::uint(id)]))
            .await?;
        match abi::decode(&history_return_kinds(), &data)?.pop() {
            Some(Token::Array(entries)) => Ok(entries
                .into_iter()
                .map(|entry| match entry {
                    Token::Tuple(fields) => RecordTuple(fields),
                    other => RecordTuple(vec![other]),
                })
                .collect()),
            other => Err(SourceError::Malformed(format!(
                "unexpected getProductHistory result: {other:?}"
            ))),
        }
    }

    fn source_name(&self) -> &str {
        "json-rpc"
    }
}
