//! Consensus node network keyed by node account id

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use hashnet_api::AccountId;
use parking_lot::Mutex;
use tracing::info;

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::network::address::NodeAddress;
use crate::network::node::Node;
use crate::network::pool::{Network, NetworkSettings};

pub type ConsensusNode = Node<AccountId>;

/// Ledger a network belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LedgerId {
    Mainnet,
    Testnet,
    Previewnet,
    Other(Vec<u8>),
}

impl LedgerId {
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Self::Mainnet => vec![0],
            Self::Testnet => vec![1],
            Self::Previewnet => vec![2],
            Self::Other(bytes) => bytes.clone(),
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        match bytes {
            [0] => Self::Mainnet,
            [1] => Self::Testnet,
            [2] => Self::Previewnet,
            other => Self::Other(other.to_vec()),
        }
    }
}

impl fmt::Display for LedgerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mainnet => f.write_str("mainnet"),
            Self::Testnet => f.write_str("testnet"),
            Self::Previewnet => f.write_str("previewnet"),
            Self::Other(bytes) => f.write_str(&const_hex::encode(bytes)),
        }
    }
}

impl FromStr for LedgerId {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "mainnet" => Ok(Self::Mainnet),
            "testnet" => Ok(Self::Testnet),
            "previewnet" => Ok(Self::Previewnet),
            hex => const_hex::decode(hex)
                .map(|bytes| Self::from_bytes(&bytes))
                .map_err(|e| ClientError::config(format!("invalid ledger id `{}`: {}", hex, e))),
        }
    }
}

/// Consensus nodes plus the request fan-out policy.
pub struct ConsensusNetwork {
    pool: Network<AccountId>,
    transport_security: Mutex<bool>,
    ledger_id: Mutex<Option<LedgerId>>,
    max_nodes_per_request: Mutex<Option<usize>>,
}

impl ConsensusNetwork {
    pub fn new(settings: NetworkSettings) -> Self {
        Self {
            pool: Network::new(settings),
            transport_security: Mutex::new(false),
            ledger_id: Mutex::new(None),
            max_nodes_per_request: Mutex::new(None),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let ledger_id = config.ledger_id.as_deref().map(str::parse).transpose()?;
        let network = secure_addresses(config.parsed_network()?, config.transport_security);

        Ok(Self {
            pool: Network::with_network(NetworkSettings::from(config), network),
            transport_security: Mutex::new(config.transport_security),
            ledger_id: Mutex::new(ledger_id),
            max_nodes_per_request: Mutex::new(config.max_nodes_per_request),
        })
    }

    /// The underlying node pool.
    pub fn pool(&self) -> &Network<AccountId> {
        &self.pool
    }

    /// Replace the membership; addresses follow the current transport security.
    pub async fn set_network(&self, network: HashMap<AccountId, Vec<NodeAddress>>) -> Result<()> {
        let secure = *self.transport_security.lock();
        self.pool.set_network(secure_addresses(network, secure)).await
    }

    /// Node ids a request should be prepared for.
    pub fn node_account_ids_for_execute(&self) -> Result<Vec<AccountId>> {
        let node_count = self.pool.len();
        let count = match *self.max_nodes_per_request.lock() {
            Some(max) => max.clamp(1, node_count.max(1)),
            None => node_count.div_ceil(3),
        };
        let nodes = self.pool.most_healthy_nodes(count)?;
        Ok(nodes.iter().map(|node| *node.key()).collect())
    }

    pub fn node_proxies(&self, account_id: &AccountId) -> Vec<Arc<ConsensusNode>> {
        self.pool.node_proxies(account_id)
    }

    pub fn transport_security(&self) -> bool {
        *self.transport_security.lock()
    }

    /// Move every node to its TLS or plaintext port. Backoff state is kept,
    /// old channels are closed.
    pub async fn set_transport_security(&self, enabled: bool) -> Result<()> {
        {
            let mut current = self.transport_security.lock();
            if *current == enabled {
                return Ok(());
            }
            *current = enabled;
        }
        info!("Switching consensus network transport security to {}", enabled);
        if enabled {
            self.pool.remap_addresses(NodeAddress::to_secure).await
        } else {
            self.pool.remap_addresses(NodeAddress::to_insecure).await
        }
    }

    pub fn ledger_id(&self) -> Option<LedgerId> {
        self.ledger_id.lock().clone()
    }

    pub fn set_ledger_id(&self, ledger_id: Option<LedgerId>) {
        *self.ledger_id.lock() = ledger_id;
    }

    /// Certificate hashes by node account, applied to nodes created afterwards.
    pub fn set_address_book(&self, cert_hashes: HashMap<AccountId, Vec<u8>>) {
        self.pool.set_cert_hashes(cert_hashes);
    }

    pub fn set_verify_certificates(&self, verify: bool) {
        self.pool.set_verify_certificates(verify);
    }

    pub fn max_nodes_per_request(&self) -> Option<usize> {
        *self.max_nodes_per_request.lock()
    }

    /// Cap on the nodes a request is prepared for; `None` uses a third of
    /// the network.
    pub fn set_max_nodes_per_request(&self, max: Option<usize>) -> Result<()> {
        if max == Some(0) {
            return Err(ClientError::config(
                "max_nodes_per_request must be greater than 0",
            ));
        }
        *self.max_nodes_per_request.lock() = max;
        Ok(())
    }

    pub fn min_node_backoff(&self) -> Duration {
        self.pool.settings().min_node_backoff
    }

    pub fn set_min_node_backoff(&self, min: Duration) {
        self.pool.set_min_node_backoff(min);
    }

    pub fn max_node_backoff(&self) -> Duration {
        self.pool.settings().max_node_backoff
    }

    pub fn set_max_node_backoff(&self, max: Duration) {
        self.pool.set_max_node_backoff(max);
    }

    pub fn min_node_readmit_time(&self) -> Duration {
        self.pool.settings().min_node_readmit_time
    }

    pub fn set_min_node_readmit_time(&self, min: Duration) {
        self.pool.set_min_node_readmit_time(min);
    }

    pub fn max_node_readmit_time(&self) -> Duration {
        self.pool.settings().max_node_readmit_time
    }

    pub fn set_max_node_readmit_time(&self, max: Duration) {
        self.pool.set_max_node_readmit_time(max);
    }

    pub fn max_node_attempts(&self) -> i64 {
        self.pool.settings().max_node_attempts
    }

    pub fn set_max_node_attempts(&self, max_node_attempts: i64) {
        self.pool.set_max_node_attempts(max_node_attempts);
    }

    pub fn close_timeout(&self) -> Duration {
        self.pool.settings().close_timeout
    }

    pub fn set_close_timeout(&self, close_timeout: Duration) {
        self.pool.set_close_timeout(close_timeout);
    }

    /// Snapshot of `address -> node account id`.
    pub fn network(&self) -> HashMap<String, AccountId> {
        self.pool.network()
    }
}

fn secure_addresses(
    network: HashMap<AccountId, Vec<NodeAddress>>,
    secure: bool,
) -> HashMap<AccountId, Vec<NodeAddress>> {
    if !secure {
        return network;
    }
    network
        .into_iter()
        .map(|(account, addresses)| {
            (account, addresses.iter().map(NodeAddress::to_secure).collect())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(count: u64) -> ClientConfig {
        let network = (3..3 + count)
            .map(|i| (format!("10.0.0.{}:50211", i), format!("0.0.{}", i)))
            .collect();
        ClientConfig::new(network)
    }

    #[test]
    fn test_ledger_id_parse_and_display() {
        assert_eq!("mainnet".parse::<LedgerId>().unwrap(), LedgerId::Mainnet);
        assert_eq!("02".parse::<LedgerId>().unwrap(), LedgerId::Previewnet);
        assert_eq!(
            "abcd".parse::<LedgerId>().unwrap(),
            LedgerId::Other(vec![0xab, 0xcd])
        );
        assert_eq!(LedgerId::Other(vec![0xab, 0xcd]).to_string(), "abcd");
        assert_eq!(LedgerId::Testnet.to_bytes(), vec![1]);
        assert!("not-hex".parse::<LedgerId>().is_err());
    }

    #[tokio::test]
    async fn test_default_fan_out_is_a_third() {
        let network = ConsensusNetwork::from_config(&config_with(7)).unwrap();
        assert_eq!(network.node_account_ids_for_execute().unwrap().len(), 3);

        let network = ConsensusNetwork::from_config(&config_with(1)).unwrap();
        assert_eq!(network.node_account_ids_for_execute().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_max_nodes_per_request_caps_fan_out() {
        let network =
            ConsensusNetwork::from_config(&config_with(7).with_max_nodes_per_request(5)).unwrap();
        let ids = network.node_account_ids_for_execute().unwrap();
        assert_eq!(ids.len(), 5);

        network.set_max_nodes_per_request(Some(20)).unwrap();
        assert_eq!(network.node_account_ids_for_execute().unwrap().len(), 7);
    }

    #[tokio::test]
    async fn test_transport_security_moves_ports() {
        let network = ConsensusNetwork::from_config(&config_with(2)).unwrap();
        assert!(network.network().contains_key("10.0.0.3:50211"));

        network.set_transport_security(true).await.unwrap();
        let snapshot = network.network();
        assert_eq!(snapshot.get("10.0.0.3:50212"), Some(&AccountId::from(3)));
        assert!(!snapshot.contains_key("10.0.0.3:50211"));

        // membership updates keep the secure ports
        let mut map = HashMap::new();
        map.insert(AccountId::from(9), vec![NodeAddress::new("10.0.0.9", 50211)]);
        network.set_network(map).await.unwrap();
        assert!(network.network().contains_key("10.0.0.9:50212"));

        network.set_transport_security(false).await.unwrap();
        assert!(network.network().contains_key("10.0.0.9:50211"));
    }

    #[tokio::test]
    async fn test_from_config_with_security_and_ledger() {
        let mut config = config_with(1).with_transport_security(true);
        config.ledger_id = Some("testnet".to_string());
        let network = ConsensusNetwork::from_config(&config).unwrap();

        assert!(network.transport_security());
        assert_eq!(network.ledger_id(), Some(LedgerId::Testnet));
        assert!(network.network().contains_key("10.0.0.3:50212"));
    }

    #[tokio::test]
    async fn test_setters_round_trip() {
        let network = ConsensusNetwork::from_config(&config_with(1)).unwrap();
        network.set_min_node_backoff(Duration::from_millis(300));
        network.set_max_node_backoff(Duration::from_secs(5));
        network.set_max_node_attempts(4);
        network.set_close_timeout(Duration::from_secs(2));
        network.set_max_node_readmit_time(Duration::from_secs(9));

        assert_eq!(network.min_node_backoff(), Duration::from_millis(300));
        assert_eq!(network.max_node_backoff(), Duration::from_secs(5));
        assert_eq!(network.max_node_attempts(), 4);
        assert_eq!(network.close_timeout(), Duration::from_secs(2));
        assert_eq!(network.max_node_readmit_time(), Duration::from_secs(9));
        let node = &network.node_proxies(&AccountId::from(3))[0];
        assert_eq!(node.min_backoff(), Duration::from_millis(300));
    }
}
