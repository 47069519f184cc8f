//! Node pool grouped by identity key
//!
//! One [`Network`] owns every [`Node`] of a network, the subset currently
//! eligible for selection, and the readmission schedule. All state lives
//! behind a single lock; channel shutdown waits happen after it is released.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rand::seq::{IndexedRandom, SliceRandom};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::network::address::{NodeAddress, TransportConfig};
use crate::network::channel::{ChannelSettings, ManagedChannel};
use crate::network::node::{Node, NodeKey};

/// Tunables of a node pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkSettings {
    pub min_node_backoff: Duration,
    pub max_node_backoff: Duration,
    pub min_node_readmit_time: Duration,
    pub max_node_readmit_time: Duration,
    pub close_timeout: Duration,
    /// Bad responses after which a node is evicted; `<= 0` disables eviction
    pub max_node_attempts: i64,
    pub verify_certificates: bool,
    pub channel: ChannelSettings,
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self::from(&ClientConfig::default())
    }
}

impl From<&ClientConfig> for NetworkSettings {
    fn from(config: &ClientConfig) -> Self {
        Self {
            min_node_backoff: config.min_node_backoff(),
            max_node_backoff: config.max_node_backoff(),
            min_node_readmit_time: config.min_node_readmit_time(),
            max_node_readmit_time: config.max_node_readmit_time(),
            close_timeout: config.close_timeout(),
            max_node_attempts: config.max_node_attempts,
            verify_certificates: config.verify_certificates,
            channel: ChannelSettings {
                keep_alive: config.keep_alive(),
                ..Default::default()
            },
        }
    }
}

struct NetworkState<K> {
    nodes: Vec<Arc<Node<K>>>,
    by_key: HashMap<K, Vec<Arc<Node<K>>>>,
    healthy: Vec<Arc<Node<K>>>,
    earliest_readmit: Instant,
    settings: NetworkSettings,
    cert_hashes: HashMap<K, Vec<u8>>,
    closing: Vec<(K, ManagedChannel)>,
}

impl<K: NodeKey> NetworkState<K> {
    fn build_node(&self, key: K, address: NodeAddress) -> Node<K> {
        let transport = TransportConfig::resolve(
            &address,
            self.cert_hashes.get(&key).map(Vec::as_slice),
            self.settings.verify_certificates,
        );
        Node::new(
            key,
            address,
            transport,
            self.settings.channel,
            self.settings.min_node_backoff,
            self.settings.max_node_backoff,
        )
    }

    fn contains(&self, key: &K, address: &NodeAddress) -> bool {
        self.nodes
            .iter()
            .any(|node| node.key() == key && node.address() == address)
    }

    fn is_healthy_member(&self, node: &Arc<Node<K>>) -> bool {
        self.healthy.iter().any(|healthy| Arc::ptr_eq(healthy, node))
    }

    /// Rebuild `by_key` from `nodes` and mark every node eligible again.
    fn reset(&mut self) {
        self.by_key.clear();
        for node in &self.nodes {
            self.by_key
                .entry(node.key().clone())
                .or_default()
                .push(node.clone());
        }
        self.healthy = self.nodes.clone();
    }

    fn readmit(&mut self, now: Instant) {
        if now <= self.earliest_readmit {
            return;
        }

        let mut next = now + self.settings.max_node_readmit_time;
        for node in &self.nodes {
            let readmit_at = node.readmit_at();
            if readmit_at > now && readmit_at < next {
                next = readmit_at;
            }
        }
        self.earliest_readmit = next.max(now + self.settings.min_node_readmit_time);

        let readmitted: Vec<_> = self
            .nodes
            .iter()
            .filter(|node| node.readmit_at() <= now && !self.is_healthy_member(node))
            .cloned()
            .collect();
        for node in readmitted {
            debug!("Node {} readmitted", node.key());
            self.healthy.push(node);
        }
    }

    /// Detach every node whose bad count reached the eviction limit.
    fn remove_dead(&mut self) -> Vec<Arc<Node<K>>> {
        let limit = self.settings.max_node_attempts;
        if limit <= 0 {
            return Vec::new();
        }

        let (dead, alive): (Vec<_>, Vec<_>) = self
            .nodes
            .drain(..)
            .partition(|node| node.bad_count() >= limit as u64);
        self.nodes = alive;
        if dead.is_empty() {
            return dead;
        }

        self.healthy
            .retain(|node| !dead.iter().any(|gone| Arc::ptr_eq(gone, node)));
        for node in &dead {
            if let Some(proxies) = self.by_key.get_mut(node.key()) {
                proxies.retain(|proxy| !Arc::ptr_eq(proxy, node));
                if proxies.is_empty() {
                    self.by_key.remove(node.key());
                }
            }
            warn!(
                "Evicting node {} ({}) after {} bad responses",
                node.key(),
                node.address(),
                node.bad_count()
            );
        }
        dead
    }
}

/// Shut evicted nodes down in the background, bounded by `timeout`.
fn dispose_detached<K: NodeKey>(nodes: Vec<Arc<Node<K>>>, timeout: Duration) {
    if nodes.is_empty() {
        return;
    }
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            handle.spawn(async move {
                for node in nodes {
                    node.close(timeout).await;
                }
            });
        }
        Err(_) => {
            // no runtime to wait on, drop the channels right away
            for node in nodes {
                node.begin_close();
            }
        }
    }
}

/// Node pool keyed by `K`.
pub struct Network<K> {
    state: Mutex<NetworkState<K>>,
}

impl<K: NodeKey> Network<K> {
    pub fn new(settings: NetworkSettings) -> Self {
        Self {
            state: Mutex::new(NetworkState {
                nodes: Vec::new(),
                by_key: HashMap::new(),
                healthy: Vec::new(),
                earliest_readmit: Instant::now(),
                settings,
                cert_hashes: HashMap::new(),
                closing: Vec::new(),
            }),
        }
    }

    /// Build a pool holding `network` from the start.
    pub fn with_network(settings: NetworkSettings, network: HashMap<K, Vec<NodeAddress>>) -> Self {
        let pool = Self::new(settings);
        pool.replace_membership(network);
        pool
    }

    /// Replace the pool's membership with `network`.
    ///
    /// Nodes whose `(key, address)` is unchanged are kept as the same instance
    /// so their channel and backoff survive. Removed nodes are closed after
    /// the new membership is in place, sharing one close budget; running out
    /// of it yields [`ClientError::CloseTimeout`].
    pub async fn set_network(&self, network: HashMap<K, Vec<NodeAddress>>) -> Result<()> {
        let (removed, close_timeout) = self.replace_membership(network);
        close_within_budget(removed, close_timeout).await
    }

    fn replace_membership(
        &self,
        network: HashMap<K, Vec<NodeAddress>>,
    ) -> (Vec<Arc<Node<K>>>, Duration) {
        let mut state = self.state.lock();

        let mut removed = Vec::new();
        for index in (0..state.nodes.len()).rev() {
            let node = &state.nodes[index];
            let keep = network
                .get(node.key())
                .is_some_and(|addresses| addresses.contains(node.address()));
            if !keep {
                removed.push(state.nodes.remove(index));
            }
        }

        let mut added = 0;
        for (key, addresses) in &network {
            for address in addresses {
                if state.contains(key, address) {
                    continue;
                }
                let node = state.build_node(key.clone(), address.clone());
                state.nodes.push(Arc::new(node));
                added += 1;
            }
        }

        state.reset();
        info!(
            "Network updated: {} node(s) added, {} removed",
            added,
            removed.len()
        );
        (removed, state.settings.close_timeout)
    }

    /// Return nodes whose backoff elapsed to the healthy set.
    ///
    /// Sweeps run at most once per readmission interval.
    pub fn readmit_nodes(&self) {
        self.state.lock().readmit(Instant::now());
    }

    /// Evict nodes that reached `max_node_attempts` bad responses.
    pub fn remove_dead_nodes(&self) {
        let (dead, timeout) = {
            let mut state = self.state.lock();
            (state.remove_dead(), state.settings.close_timeout)
        };
        dispose_detached(dead, timeout);
    }

    /// A uniformly random healthy node.
    pub fn random_node(&self) -> Result<Arc<Node<K>>> {
        let mut state = self.state.lock();
        state.readmit(Instant::now());
        state
            .healthy
            .choose(&mut rand::rng())
            .cloned()
            .ok_or(ClientError::NoHealthyNodes)
    }

    /// Up to `count` healthy nodes, at most one per key.
    pub fn most_healthy_nodes(&self, count: usize) -> Result<Vec<Arc<Node<K>>>> {
        let (selected, dead, timeout) = {
            let mut state = self.state.lock();
            state.readmit(Instant::now());
            let dead = state.remove_dead();

            if state.healthy.is_empty() {
                let timeout = state.settings.close_timeout;
                drop(state);
                dispose_detached(dead, timeout);
                return Err(ClientError::NoHealthyNodes);
            }

            let mut candidates = state.healthy.clone();
            candidates.shuffle(&mut rand::rng());

            let mut keys = HashSet::with_capacity(count);
            let selected: Vec<_> = candidates
                .into_iter()
                .filter(|node| keys.insert(node.key().clone()))
                .take(count)
                .collect();
            (selected, dead, state.settings.close_timeout)
        };

        dispose_detached(dead, timeout);
        Ok(selected)
    }

    /// Every node registered under `key`.
    pub fn node_proxies(&self, key: &K) -> Vec<Arc<Node<K>>> {
        let mut state = self.state.lock();
        state.readmit(Instant::now());
        state.by_key.get(key).cloned().unwrap_or_default()
    }

    pub fn increase_backoff(&self, node: &Arc<Node<K>>) {
        let mut state = self.state.lock();
        node.increase_backoff();
        state.healthy.retain(|healthy| !Arc::ptr_eq(healthy, node));
    }

    pub fn decrease_backoff(&self, node: &Arc<Node<K>>) {
        let _state = self.state.lock();
        node.decrease_backoff();
    }

    pub fn nodes(&self) -> Vec<Arc<Node<K>>> {
        self.state.lock().nodes.clone()
    }

    pub fn healthy_nodes(&self) -> Vec<Arc<Node<K>>> {
        self.state.lock().healthy.clone()
    }

    pub fn keys(&self) -> Vec<K> {
        self.state.lock().by_key.keys().cloned().collect()
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.state.lock().by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().by_key.is_empty()
    }

    /// Snapshot of the membership as `address -> key`.
    pub fn network(&self) -> HashMap<String, K> {
        self.state
            .lock()
            .nodes
            .iter()
            .map(|node| (node.address().to_string(), node.key().clone()))
            .collect()
    }

    pub fn settings(&self) -> NetworkSettings {
        self.state.lock().settings.clone()
    }

    pub fn set_min_node_backoff(&self, min: Duration) {
        let mut state = self.state.lock();
        state.settings.min_node_backoff = min;
        for node in &state.nodes {
            node.set_min_backoff(min);
        }
    }

    pub fn set_max_node_backoff(&self, max: Duration) {
        let mut state = self.state.lock();
        state.settings.max_node_backoff = max;
        for node in &state.nodes {
            node.set_max_backoff(max);
        }
    }

    /// Changing the minimum readmit time makes every node eligible now.
    pub fn set_min_node_readmit_time(&self, min: Duration) {
        let mut state = self.state.lock();
        state.settings.min_node_readmit_time = min;
        let now = Instant::now();
        for node in &state.nodes {
            node.set_readmit_at(now);
        }
    }

    pub fn set_max_node_readmit_time(&self, max: Duration) {
        self.state.lock().settings.max_node_readmit_time = max;
    }

    pub fn set_max_node_attempts(&self, max_node_attempts: i64) {
        self.state.lock().settings.max_node_attempts = max_node_attempts;
    }

    pub fn set_close_timeout(&self, close_timeout: Duration) {
        self.state.lock().settings.close_timeout = close_timeout;
    }

    /// Certificate hashes used for nodes created from now on.
    pub fn set_cert_hashes(&self, cert_hashes: HashMap<K, Vec<u8>>) {
        self.state.lock().cert_hashes = cert_hashes;
    }

    /// Verification policy used for nodes created from now on.
    pub fn set_verify_certificates(&self, verify: bool) {
        self.state.lock().settings.verify_certificates = verify;
    }

    /// Move every node to `remap(address)`, keeping backoff state.
    ///
    /// Nodes whose address does not change are left untouched.
    pub async fn remap_addresses(&self, remap: impl Fn(&NodeAddress) -> NodeAddress) -> Result<()> {
        let (replaced, close_timeout) = {
            let mut state = self.state.lock();
            let mut replaced = Vec::new();
            let mut nodes = Vec::with_capacity(state.nodes.len());
            for node in &state.nodes {
                let address = remap(node.address());
                if &address == node.address() {
                    nodes.push(node.clone());
                    continue;
                }
                let transport = TransportConfig::resolve(
                    &address,
                    state.cert_hashes.get(node.key()).map(Vec::as_slice),
                    state.settings.verify_certificates,
                );
                nodes.push(Arc::new(node.rebuild(address, transport)));
                replaced.push(node.clone());
            }
            state.nodes = nodes;
            state.reset();
            (replaced, state.settings.close_timeout)
        };

        close_within_budget(replaced, close_timeout).await
    }

    /// First phase of shutdown: stop every channel from accepting calls.
    pub fn begin_close(&self) {
        let mut state = self.state.lock();
        let mut closing = Vec::new();
        for node in &state.nodes {
            if let Some(channel) = node.begin_close() {
                closing.push((node.key().clone(), channel));
            }
        }
        state.closing.extend(closing);
    }

    /// Second phase of shutdown: wait for channels until `deadline`.
    ///
    /// If any channel fails to drain, or `previous_error` is set, every
    /// remaining channel is dropped and the error returned. The pool is
    /// emptied in all cases.
    pub async fn await_close(
        &self,
        deadline: Instant,
        previous_error: Option<ClientError>,
    ) -> Result<()> {
        let closing = {
            let mut state = self.state.lock();
            state.nodes.clear();
            state.by_key.clear();
            state.healthy.clear();
            std::mem::take(&mut state.closing)
        };

        let mut error = previous_error;
        if error.is_none() {
            for (key, channel) in &closing {
                let remaining = deadline.saturating_duration_since(Instant::now());
                if !channel.await_termination(remaining).await {
                    warn!("Channel to node {} did not terminate before the deadline", key);
                    error = Some(ClientError::CloseTimeout);
                    break;
                }
            }
        }

        // dropping the handles forces whatever is left
        drop(closing);
        match error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Two-phase close bounded by the configured close timeout.
    pub async fn close(&self) -> Result<()> {
        let timeout = self.state.lock().settings.close_timeout;
        self.close_with_timeout(timeout).await
    }

    pub async fn close_with_timeout(&self, timeout: Duration) -> Result<()> {
        self.begin_close();
        self.await_close(Instant::now() + timeout, None).await
    }
}

/// Close `nodes` in order, each within its fair share of what is left of
/// `budget`.
async fn close_within_budget<K: NodeKey>(nodes: Vec<Arc<Node<K>>>, budget: Duration) -> Result<()> {
    let deadline = Instant::now() + budget;
    let total = nodes.len();
    let mut timed_out = false;

    for (closed, node) in nodes.into_iter().enumerate() {
        let remaining = deadline.saturating_duration_since(Instant::now());
        let share = remaining / (total - closed) as u32;
        if !node.close(share).await {
            timed_out = true;
        }
    }

    if timed_out {
        return Err(ClientError::CloseTimeout);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn settings() -> NetworkSettings {
        NetworkSettings {
            min_node_backoff: Duration::from_millis(250),
            max_node_backoff: Duration::from_secs(8),
            min_node_readmit_time: Duration::from_millis(100),
            max_node_readmit_time: Duration::from_secs(1),
            close_timeout: Duration::from_secs(1),
            max_node_attempts: -1,
            verify_certificates: true,
            channel: ChannelSettings::default(),
        }
    }

    fn address(i: u16) -> NodeAddress {
        NodeAddress::new(format!("10.0.0.{}", i), 50211)
    }

    fn network_of(ids: &[u16]) -> HashMap<String, Vec<NodeAddress>> {
        ids.iter()
            .map(|i| (format!("0.0.{}", i), vec![address(*i)]))
            .collect()
    }

    fn find(network: &Network<String>, key: &str) -> Arc<Node<String>> {
        network
            .nodes()
            .into_iter()
            .find(|node| node.key() == key)
            .unwrap()
    }

    #[tokio::test]
    async fn test_set_network_keeps_unchanged_nodes() {
        let network = Network::new(settings());
        network.set_network(network_of(&[3, 4, 5, 6, 7])).await.unwrap();
        assert_eq!(network.nodes().len(), 5);

        let before: Vec<_> = [5, 6, 7].iter().map(|i| find(&network, &format!("0.0.{}", i))).collect();

        // drop 0.0.3 and 0.0.4, add 0.0.8
        network.set_network(network_of(&[5, 6, 7, 8])).await.unwrap();
        assert_eq!(network.nodes().len(), 4);
        assert_eq!(network.healthy_nodes().len(), 4);

        for node in &before {
            let after = find(&network, node.key());
            assert!(Arc::ptr_eq(node, &after));
        }
        assert!(network.nodes().iter().all(|n| n.key() != "0.0.3" && n.key() != "0.0.4"));
    }

    #[tokio::test]
    async fn test_set_network_replaces_moved_address() {
        let network = Network::new(settings());
        network.set_network(network_of(&[3])).await.unwrap();
        let original = find(&network, "0.0.3");

        let mut moved = HashMap::new();
        moved.insert("0.0.3".to_string(), vec![address(30)]);
        network.set_network(moved).await.unwrap();

        let replacement = find(&network, "0.0.3");
        assert!(!Arc::ptr_eq(&original, &replacement));
        assert_eq!(replacement.address(), &address(30));
    }

    #[tokio::test]
    async fn test_set_network_groups_proxies() {
        let network = Network::new(settings());
        let mut map = HashMap::new();
        map.insert("0.0.3".to_string(), vec![address(1), address(2), address(1)]);
        network.set_network(map).await.unwrap();

        assert_eq!(network.len(), 1);
        assert_eq!(network.node_proxies(&"0.0.3".to_string()).len(), 2);
        assert!(network.node_proxies(&"0.0.9".to_string()).is_empty());
    }

    #[tokio::test]
    async fn test_set_network_closes_removed_channels() {
        let network = Network::new(settings());
        network.set_network(network_of(&[3, 4])).await.unwrap();
        let removed = find(&network, "0.0.4");
        removed.channel().unwrap();

        network.set_network(network_of(&[3])).await.unwrap();
        assert!(!removed.has_channel());
    }

    #[tokio::test]
    async fn test_set_network_reports_close_timeout() {
        let network = Network::new(NetworkSettings {
            close_timeout: Duration::from_millis(20),
            ..settings()
        });
        network.set_network(network_of(&[3, 4])).await.unwrap();
        let busy = find(&network, "0.0.4");
        let _guard = busy.channel().unwrap().begin_call().unwrap();

        let result = network.set_network(network_of(&[3])).await;
        assert!(matches!(result, Err(ClientError::CloseTimeout)));
        // the new membership is in place regardless
        assert_eq!(network.nodes().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_removes_from_healthy_until_readmitted() {
        let network = Network::new(settings());
        network.set_network(network_of(&[3, 4])).await.unwrap();
        let node = find(&network, "0.0.3");

        network.increase_backoff(&node);
        assert_eq!(network.healthy_nodes().len(), 1);

        tokio::time::advance(Duration::from_millis(100)).await;
        network.readmit_nodes();
        assert_eq!(network.healthy_nodes().len(), 1);

        tokio::time::advance(Duration::from_millis(200)).await;
        network.readmit_nodes();
        assert_eq!(network.healthy_nodes().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_readmit_waits_for_sweep_interval() {
        let network = Network::new(settings());
        network.set_network(network_of(&[3, 4])).await.unwrap();
        let node = find(&network, "0.0.3");

        // nothing is backed off, so the next sweep is a full max interval out
        tokio::time::advance(Duration::from_millis(1)).await;
        network.readmit_nodes();
        network.increase_backoff(&node);

        tokio::time::advance(Duration::from_millis(500)).await;
        assert!(node.is_healthy());
        network.readmit_nodes();
        assert_eq!(network.healthy_nodes().len(), 1);

        tokio::time::advance(Duration::from_millis(600)).await;
        network.readmit_nodes();
        assert_eq!(network.healthy_nodes().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_random_node_fails_when_all_backed_off() {
        let network = Network::new(settings());
        network.set_network(network_of(&[3])).await.unwrap();
        let node = network.random_node().unwrap();

        network.increase_backoff(&node);
        assert!(matches!(network.random_node(), Err(ClientError::NoHealthyNodes)));
        assert!(matches!(
            network.most_healthy_nodes(1),
            Err(ClientError::NoHealthyNodes)
        ));
    }

    #[tokio::test]
    async fn test_most_healthy_nodes_distinct_keys() {
        let network = Network::new(settings());
        let mut map = network_of(&[3, 4, 5]);
        map.insert("0.0.3".to_string(), vec![address(3), address(33), address(34)]);
        network.set_network(map).await.unwrap();

        for _ in 0..20 {
            let nodes = network.most_healthy_nodes(3).unwrap();
            let keys: HashSet<_> = nodes.iter().map(|n| n.key().clone()).collect();
            assert_eq!(keys.len(), nodes.len());
            assert_eq!(nodes.len(), 3);
        }
        assert_eq!(network.most_healthy_nodes(10).unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_dead_node_evicted() {
        let network = Network::new(NetworkSettings {
            max_node_attempts: 3,
            ..settings()
        });
        network.set_network(network_of(&[3, 4, 5, 6, 7])).await.unwrap();
        let node = find(&network, "0.0.5");

        for _ in 0..3 {
            network.increase_backoff(&node);
        }
        assert_eq!(network.nodes().len(), 5);

        let selected = network.most_healthy_nodes(5).unwrap();
        assert!(selected.iter().all(|n| n.key() != "0.0.5"));
        assert_eq!(network.nodes().len(), 4);
        assert!(network.node_proxies(&"0.0.5".to_string()).is_empty());
    }

    #[tokio::test]
    async fn test_eviction_disabled_by_default() {
        let network = Network::new(settings());
        network.set_network(network_of(&[3])).await.unwrap();
        let node = find(&network, "0.0.3");
        for _ in 0..10 {
            node.increase_backoff();
        }
        network.remove_dead_nodes();
        assert_eq!(network.nodes().len(), 1);
    }

    #[tokio::test]
    async fn test_min_readmit_time_resets_nodes() {
        let network = Network::new(settings());
        network.set_network(network_of(&[3])).await.unwrap();
        let node = find(&network, "0.0.3");
        node.increase_backoff();
        assert!(!node.is_healthy());

        network.set_min_node_readmit_time(Duration::from_millis(50));
        assert!(node.is_healthy());
    }

    #[tokio::test]
    async fn test_backoff_bounds_propagate() {
        let network = Network::new(settings());
        network.set_network(network_of(&[3, 4])).await.unwrap();
        network.set_min_node_backoff(Duration::from_secs(1));
        network.set_max_node_backoff(Duration::from_secs(2));
        for node in network.nodes() {
            assert_eq!(node.min_backoff(), Duration::from_secs(1));
            assert_eq!(node.max_backoff(), Duration::from_secs(2));
        }
    }

    #[tokio::test]
    async fn test_remap_addresses_keeps_backoff() {
        let network = Network::new(settings());
        network.set_network(network_of(&[3])).await.unwrap();
        let node = find(&network, "0.0.3");
        node.increase_backoff();

        network.remap_addresses(NodeAddress::to_secure).await.unwrap();
        let secure = find(&network, "0.0.3");
        assert_eq!(secure.address().port(), Some(50212));
        assert!(matches!(secure.transport(), TransportConfig::Tls { .. }));
        assert_eq!(secure.bad_count(), 1);
        assert_eq!(secure.current_backoff(), node.current_backoff());
    }

    #[tokio::test]
    async fn test_cert_hashes_apply_to_new_nodes() {
        let network = Network::new(settings());
        let mut hashes = HashMap::new();
        hashes.insert("0.0.3".to_string(), b"abcd".to_vec());
        network.set_cert_hashes(hashes);

        let mut map = HashMap::new();
        map.insert("0.0.3".to_string(), vec![NodeAddress::new("10.0.0.3", 50212)]);
        network.set_network(map).await.unwrap();

        assert_eq!(
            find(&network, "0.0.3").transport(),
            &TransportConfig::Tls {
                cert_hash: Some(b"abcd".to_vec()),
                verify: true
            }
        );
    }

    #[tokio::test]
    async fn test_two_phase_close_clears_state() {
        let network = Network::new(settings());
        network.set_network(network_of(&[3, 4])).await.unwrap();
        for node in network.nodes() {
            node.channel().unwrap();
        }

        network.begin_close();
        network
            .await_close(Instant::now() + Duration::from_secs(1), None)
            .await
            .unwrap();
        assert!(network.is_empty());
        assert!(network.nodes().is_empty());
        assert!(network.healthy_nodes().is_empty());
    }

    #[tokio::test]
    async fn test_close_surfaces_errors_and_still_clears() {
        let network = Network::new(settings());
        network.set_network(network_of(&[3])).await.unwrap();
        let node = find(&network, "0.0.3");
        let _guard = node.channel().unwrap().begin_call().unwrap();

        let result = network.close_with_timeout(Duration::from_millis(20)).await;
        assert!(matches!(result, Err(ClientError::CloseTimeout)));
        assert!(network.nodes().is_empty());

        let network = Network::<String>::new(settings());
        network.begin_close();
        let result = network
            .await_close(Instant::now(), Some(ClientError::NoHealthyNodes))
            .await;
        assert!(matches!(result, Err(ClientError::NoHealthyNodes)));
    }

    proptest! {
        #[test]
        fn prop_set_network_preserves_identity(
            first in proptest::collection::btree_set(1u16..20, 1..10),
            second in proptest::collection::btree_set(1u16..20, 1..10),
        ) {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            runtime.block_on(async {
                let network = Network::new(settings());
                let first: Vec<u16> = first.into_iter().collect();
                let second: Vec<u16> = second.into_iter().collect();
                network.set_network(network_of(&first)).await.unwrap();
                let before = network.nodes();
                network.set_network(network_of(&second)).await.unwrap();
                let after = network.nodes();

                let mut pairs = HashSet::new();
                for node in &after {
                    assert!(pairs.insert((node.key().clone(), node.address().clone())));
                }
                assert_eq!(after.len(), second.len());

                for node in &before {
                    if let Some(kept) = after.iter().find(|n| n.key() == node.key() && n.address() == node.address()) {
                        assert!(Arc::ptr_eq(node, kept));
                    }
                }
            });
        }

        #[test]
        fn prop_readmit_never_admits_early(backoffs in proptest::collection::vec(0usize..5, 1..8), step_ms in 1u64..2000) {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .start_paused(true)
                .build()
                .unwrap();
            runtime.block_on(async {
                let ids: Vec<u16> = (1..=backoffs.len() as u16).collect();
                let network = Network::new(settings());
                network.set_network(network_of(&ids)).await.unwrap();
                for (node, count) in network.nodes().iter().zip(&backoffs) {
                    for _ in 0..*count {
                        network.increase_backoff(node);
                    }
                }

                tokio::time::advance(Duration::from_millis(step_ms)).await;
                network.readmit_nodes();
                let now = Instant::now();
                for node in network.healthy_nodes() {
                    assert!(node.readmit_at() <= now);
                }
            });
        }
    }
}
