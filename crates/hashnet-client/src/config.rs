//! Client configuration
//!
//! All durations are stored as milliseconds so the struct maps one to one
//! onto a TOML file. Accessors return [`Duration`] values.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use hashnet_api::AccountId;
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};
use crate::network::NodeAddress;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;
pub const DEFAULT_MIN_BACKOFF_MS: u64 = 250;
pub const DEFAULT_MAX_BACKOFF_MS: u64 = 8_000;
pub const DEFAULT_MIN_NODE_BACKOFF_MS: u64 = 8_000;
pub const DEFAULT_MAX_NODE_BACKOFF_MS: u64 = 60 * 60 * 1000;
pub const DEFAULT_CLOSE_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 2 * 60 * 1000;
pub const DEFAULT_GRPC_DEADLINE_MS: u64 = 10_000;
pub const DEFAULT_KEEP_ALIVE_MS: u64 = 100_000;

/// Configuration shared by every network and request of a [`crate::Client`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Consensus nodes as `"host:port" -> "shard.realm.num"`
    pub network: HashMap<String, String>,
    /// Mirror nodes as `"host:port"`
    pub mirror_network: Vec<String>,
    /// `mainnet`, `testnet`, `previewnet` or a hex encoded ledger id
    pub ledger_id: Option<String>,
    /// Dial consensus nodes over TLS
    pub transport_security: bool,
    /// Verify node certificates against the address book hash
    pub verify_certificates: bool,
    /// Backoff applied to a node after its first failure
    pub min_node_backoff_ms: u64,
    /// Upper bound of a node's backoff
    pub max_node_backoff_ms: u64,
    /// Lower bound of the interval between readmission sweeps
    pub min_node_readmit_time_ms: u64,
    /// Upper bound of the interval between readmission sweeps
    pub max_node_readmit_time_ms: u64,
    /// Budget for closing channels on reconfiguration and shutdown
    pub close_timeout_ms: u64,
    /// Bad responses after which a node is evicted; `<= 0` disables eviction
    pub max_node_attempts: i64,
    /// Number of nodes a request is prepared for; defaults to a third of the network
    pub max_nodes_per_request: Option<usize>,
    /// Attempts per request before giving up
    pub max_attempts: u32,
    /// Initial delay between retries of one request
    pub min_backoff_ms: u64,
    /// Upper bound of the delay between retries of one request
    pub max_backoff_ms: u64,
    /// Overall time budget of one request
    pub request_timeout_ms: u64,
    /// Deadline of a single gRPC call
    pub grpc_deadline_ms: u64,
    /// HTTP/2 keep-alive interval of node channels
    pub keep_alive_ms: u64,
    /// Worker threads of the executor backing blocking calls
    pub executor_threads: usize,
    /// Regenerate expired transaction ids unless a transaction says otherwise
    pub default_regenerate_transaction_id: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            network: HashMap::new(),
            mirror_network: Vec::new(),
            ledger_id: None,
            transport_security: false,
            verify_certificates: true,
            min_node_backoff_ms: DEFAULT_MIN_NODE_BACKOFF_MS,
            max_node_backoff_ms: DEFAULT_MAX_NODE_BACKOFF_MS,
            min_node_readmit_time_ms: DEFAULT_MIN_NODE_BACKOFF_MS,
            max_node_readmit_time_ms: DEFAULT_MAX_NODE_BACKOFF_MS,
            close_timeout_ms: DEFAULT_CLOSE_TIMEOUT_MS,
            max_node_attempts: -1,
            max_nodes_per_request: None,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            min_backoff_ms: DEFAULT_MIN_BACKOFF_MS,
            max_backoff_ms: DEFAULT_MAX_BACKOFF_MS,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            grpc_deadline_ms: DEFAULT_GRPC_DEADLINE_MS,
            keep_alive_ms: DEFAULT_KEEP_ALIVE_MS,
            executor_threads: 2,
            default_regenerate_transaction_id: true,
        }
    }
}

impl ClientConfig {
    /// Create a config for the given consensus network
    pub fn new(network: HashMap<String, String>) -> Self {
        Self {
            network,
            ..Default::default()
        }
    }

    /// Parse a config from TOML text and validate it
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ClientError::config(format!("failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ClientError::config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn with_mirror_network(mut self, mirror_network: Vec<String>) -> Self {
        self.mirror_network = mirror_network;
        self
    }

    pub fn with_transport_security(mut self, enabled: bool) -> Self {
        self.transport_security = enabled;
        self
    }

    pub fn with_verify_certificates(mut self, verify: bool) -> Self {
        self.verify_certificates = verify;
        self
    }

    pub fn with_node_backoff(mut self, min_ms: u64, max_ms: u64) -> Self {
        self.min_node_backoff_ms = min_ms;
        self.max_node_backoff_ms = max_ms;
        self
    }

    pub fn with_node_readmit_time(mut self, min_ms: u64, max_ms: u64) -> Self {
        self.min_node_readmit_time_ms = min_ms;
        self.max_node_readmit_time_ms = max_ms;
        self
    }

    pub fn with_request_backoff(mut self, min_ms: u64, max_ms: u64) -> Self {
        self.min_backoff_ms = min_ms;
        self.max_backoff_ms = max_ms;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_max_node_attempts(mut self, max_node_attempts: i64) -> Self {
        self.max_node_attempts = max_node_attempts;
        self
    }

    pub fn with_max_nodes_per_request(mut self, count: usize) -> Self {
        self.max_nodes_per_request = Some(count);
        self
    }

    pub fn with_timeouts(mut self, request_timeout_ms: u64, grpc_deadline_ms: u64) -> Self {
        self.request_timeout_ms = request_timeout_ms;
        self.grpc_deadline_ms = grpc_deadline_ms;
        self
    }

    pub fn with_close_timeout(mut self, close_timeout_ms: u64) -> Self {
        self.close_timeout_ms = close_timeout_ms;
        self
    }

    pub fn min_node_backoff(&self) -> Duration {
        Duration::from_millis(self.min_node_backoff_ms)
    }

    pub fn max_node_backoff(&self) -> Duration {
        Duration::from_millis(self.max_node_backoff_ms)
    }

    pub fn min_node_readmit_time(&self) -> Duration {
        Duration::from_millis(self.min_node_readmit_time_ms)
    }

    pub fn max_node_readmit_time(&self) -> Duration {
        Duration::from_millis(self.max_node_readmit_time_ms)
    }

    pub fn close_timeout(&self) -> Duration {
        Duration::from_millis(self.close_timeout_ms)
    }

    pub fn min_backoff(&self) -> Duration {
        Duration::from_millis(self.min_backoff_ms)
    }

    pub fn max_backoff(&self) -> Duration {
        Duration::from_millis(self.max_backoff_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn grpc_deadline(&self) -> Duration {
        Duration::from_millis(self.grpc_deadline_ms)
    }

    pub fn keep_alive(&self) -> Duration {
        Duration::from_millis(self.keep_alive_ms)
    }

    /// Parse the consensus network into node addresses grouped by account
    pub fn parsed_network(&self) -> Result<HashMap<AccountId, Vec<NodeAddress>>> {
        let mut parsed: HashMap<AccountId, Vec<NodeAddress>> = HashMap::new();
        for (address, account) in &self.network {
            let account: AccountId = account.parse()?;
            parsed
                .entry(account)
                .or_default()
                .push(address.parse::<NodeAddress>()?);
        }
        Ok(parsed)
    }

    /// Reject values that can never work, before any network is built
    pub fn validate(&self) -> Result<()> {
        if self.min_node_backoff_ms > self.max_node_backoff_ms {
            return Err(ClientError::config(
                "min_node_backoff_ms must not exceed max_node_backoff_ms",
            ));
        }
        if self.min_node_readmit_time_ms > self.max_node_readmit_time_ms {
            return Err(ClientError::config(
                "min_node_readmit_time_ms must not exceed max_node_readmit_time_ms",
            ));
        }
        if self.min_backoff_ms > self.max_backoff_ms {
            return Err(ClientError::config(
                "min_backoff_ms must not exceed max_backoff_ms",
            ));
        }
        if self.max_attempts == 0 {
            return Err(ClientError::config("max_attempts must be at least 1"));
        }
        if self.executor_threads == 0 {
            return Err(ClientError::config("executor_threads must be at least 1"));
        }
        if self.max_nodes_per_request == Some(0) {
            return Err(ClientError::config(
                "max_nodes_per_request must be greater than 0",
            ));
        }
        self.parsed_network()?;
        for address in &self.mirror_network {
            address.parse::<NodeAddress>()?;
        }
        Ok(())
    }
}
