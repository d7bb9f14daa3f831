use std::ops::Range;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracechain_common::address::Address;

use crate::error::ConfigError;

/// Registry contract deployed on Sepolia.
pub const DEFAULT_CONTRACT_ADDRESS: &str = "0x081d9ff472e1b25b8820e9a17b2598f52132ccf8";
pub const DEFAULT_RPC_URL: &str = "http://localhost:8545";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// How the contract numbers its records. A property of the deployment,
/// never guessed at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Numbering {
    /// Records live at `1..=count`. The deployed registry starts ids at 1.
    #[default]
    OneBased,
    /// Records live at `0..count`.
    ZeroBased,
}

impl Numbering {
    pub fn indices(self, count: u64) -> Range<u64> {
        match self {
            Numbering::OneBased => 1..count.saturating_add(1),
            Numbering::ZeroBased => 0..count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    pub rpc_url: String,
    pub contract_address: String,
    pub numbering: Numbering,
    /// Maximum record calls in flight. 1 reproduces strictly sequential reads.
    pub concurrency: usize,
    pub request_timeout_secs: u64,
    /// Whether the contract exposes `getProductHistory`.
    pub history_enabled: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.into(),
            contract_address: DEFAULT_CONTRACT_ADDRESS.into(),
            numbering: Numbering::default(),
            concurrency: 1,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            history_enabled: true,
        }
    }
}

impl LedgerConfig {
    /// Read a JSON config file. Missing keys take their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rpc_url.trim().is_empty() {
            return Err(ConfigError::Invalid("rpc_url is empty".into()));
        }
        if self.concurrency == 0 {
            return Err(ConfigError::Invalid("concurrency must be at least 1".into()));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be at least 1".into(),
            ));
        }
        self.contract()?;
        Ok(())
    }

    pub fn contract(&self) -> Result<Address, ConfigError> {
        self.contract_address
            .parse()
            .map_err(|e| ConfigError::Invalid(format!("contract_address: {e}")))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
