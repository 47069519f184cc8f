//! Mirror node network; each mirror is keyed by its own address

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::ClientConfig;
use crate::error::Result;
use crate::network::address::NodeAddress;
use crate::network::node::Node;
use crate::network::pool::{Network, NetworkSettings};

pub type MirrorNode = Node<NodeAddress>;

pub struct MirrorNetwork {
    pool: Network<NodeAddress>,
}

fn keyed(addresses: Vec<NodeAddress>) -> HashMap<NodeAddress, Vec<NodeAddress>> {
    addresses
        .into_iter()
        .map(|address| (address.clone(), vec![address]))
        .collect()
}

fn parse_all(addresses: &[String]) -> Result<Vec<NodeAddress>> {
    addresses.iter().map(|address| address.parse()).collect()
}

impl MirrorNetwork {
    pub fn new(settings: NetworkSettings) -> Self {
        Self {
            pool: Network::new(settings),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let addresses = parse_all(&config.mirror_network)?;
        Ok(Self {
            pool: Network::with_network(NetworkSettings::from(config), keyed(addresses)),
        })
    }

    pub fn pool(&self) -> &Network<NodeAddress> {
        &self.pool
    }

    pub async fn set_network(&self, addresses: Vec<String>) -> Result<()> {
        let addresses = parse_all(&addresses)?;
        self.pool.set_network(keyed(addresses)).await
    }

    /// A random healthy mirror.
    pub fn next_mirror_node(&self) -> Result<Arc<MirrorNode>> {
        self.pool.random_node()
    }

    /// Addresses of every mirror.
    pub fn network(&self) -> Vec<String> {
        let mut addresses: Vec<String> = self.pool.network().into_keys().collect();
        addresses.sort();
        addresses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::network::address::TransportConfig;

    #[tokio::test]
    async fn test_mirror_network_membership() {
        let config = ClientConfig::default().with_mirror_network(vec![
            "mirror.example.com:443".to_string(),
            "127.0.0.1:5600".to_string(),
        ]);
        let network = MirrorNetwork::from_config(&config).unwrap();
        assert_eq!(
            network.network(),
            vec!["127.0.0.1:5600".to_string(), "mirror.example.com:443".to_string()]
        );

        network
            .set_network(vec!["127.0.0.1:5600".to_string()])
            .await
            .unwrap();
        let node = network.next_mirror_node().unwrap();
        assert_eq!(node.key(), &NodeAddress::new("127.0.0.1", 5600));
        assert_eq!(node.transport(), &TransportConfig::Plaintext);
    }

    #[tokio::test]
    async fn test_mirror_tls_without_hash() {
        let config =
            ClientConfig::default().with_mirror_network(vec!["mirror.example.com:443".to_string()]);
        let network = MirrorNetwork::from_config(&config).unwrap();
        let node = network.next_mirror_node().unwrap();
        assert_eq!(
            node.transport(),
            &TransportConfig::Tls {
                cert_hash: None,
                verify: true
            }
        );
    }

    #[tokio::test]
    async fn test_empty_mirror_network() {
        let network = MirrorNetwork::new(NetworkSettings::default());
        assert!(matches!(
            network.next_mirror_node(),
            Err(ClientError::NoHealthyNodes)
        ));
        assert!(network.set_network(vec!["bad".to_string()]).await.is_err());
    }
}
