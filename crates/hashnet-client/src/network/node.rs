//! A single pooled connection with its own backoff state
//!
//! A node is healthy once `now >= readmit_at`. Every failure doubles the
//! backoff (up to the max) and pushes `readmit_at` forward; every success
//! halves it (down to the min) without touching `readmit_at`.

use std::fmt;
use std::hash::Hash;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::error::Result;
use crate::network::address::{NodeAddress, TransportConfig};
use crate::network::channel::{self, ChannelSettings, ManagedChannel};

/// Interval between two connectivity probes.
pub const CONNECT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Upper bound of a connectivity check.
pub const CONNECT_CHECK_TIMEOUT: Duration = Duration::from_secs(10);

const MAX_CONNECT_ATTEMPTS: u32 =
    (CONNECT_CHECK_TIMEOUT.as_millis() / CONNECT_POLL_INTERVAL.as_millis()) as u32;

/// Identity a network groups its nodes by.
pub trait NodeKey: Clone + Eq + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static {}

impl<T> NodeKey for T where T: Clone + Eq + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static {}

#[derive(Debug, Clone, Copy)]
struct Backoff {
    min: Duration,
    max: Duration,
    current: Duration,
    readmit_at: Instant,
    bad_count: u64,
}

/// One connection to one address, plus the backoff state that decides when
/// it may be selected.
pub struct Node<K> {
    key: K,
    address: NodeAddress,
    transport: TransportConfig,
    settings: ChannelSettings,
    backoff: Mutex<Backoff>,
    channel: Mutex<Option<ManagedChannel>>,
    has_connected: AtomicBool,
}

impl<K: NodeKey> Node<K> {
    pub fn new(
        key: K,
        address: NodeAddress,
        transport: TransportConfig,
        settings: ChannelSettings,
        min_backoff: Duration,
        max_backoff: Duration,
    ) -> Self {
        Self {
            key,
            address,
            transport,
            settings,
            backoff: Mutex::new(Backoff {
                min: min_backoff,
                max: max_backoff.max(min_backoff),
                current: min_backoff,
                readmit_at: Instant::now(),
                bad_count: 0,
            }),
            channel: Mutex::new(None),
            has_connected: AtomicBool::new(false),
        }
    }

    /// Same key, address and transport, with the backoff state carried over.
    pub(crate) fn rebuild(&self, address: NodeAddress, transport: TransportConfig) -> Self {
        Self {
            key: self.key.clone(),
            address,
            transport,
            settings: self.settings,
            backoff: Mutex::new(*self.backoff.lock()),
            channel: Mutex::new(None),
            has_connected: AtomicBool::new(false),
        }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn address(&self) -> &NodeAddress {
        &self.address
    }

    pub fn transport(&self) -> &TransportConfig {
        &self.transport
    }

    pub fn is_healthy(&self) -> bool {
        Instant::now() >= self.backoff.lock().readmit_at
    }

    pub fn readmit_at(&self) -> Instant {
        self.backoff.lock().readmit_at
    }

    /// Time until the node becomes healthy again; zero when it already is.
    pub fn remaining_backoff(&self) -> Duration {
        self.backoff
            .lock()
            .readmit_at
            .saturating_duration_since(Instant::now())
    }

    pub fn current_backoff(&self) -> Duration {
        self.backoff.lock().current
    }

    pub fn min_backoff(&self) -> Duration {
        self.backoff.lock().min
    }

    pub fn max_backoff(&self) -> Duration {
        self.backoff.lock().max
    }

    pub fn bad_count(&self) -> u64 {
        self.backoff.lock().bad_count
    }

    pub fn increase_backoff(&self) {
        let mut backoff = self.backoff.lock();
        backoff.bad_count += 1;
        backoff.readmit_at = Instant::now() + backoff.current;
        backoff.current = (backoff.current * 2).min(backoff.max);
        warn!(
            "Node {} ({}) in backoff for {:?}, bad responses: {}",
            self.key,
            self.address,
            backoff.readmit_at.saturating_duration_since(Instant::now()),
            backoff.bad_count
        );
    }

    pub fn decrease_backoff(&self) {
        let mut backoff = self.backoff.lock();
        backoff.current = (backoff.current / 2).max(backoff.min);
    }

    pub fn set_min_backoff(&self, min: Duration) {
        let mut backoff = self.backoff.lock();
        backoff.min = min;
        backoff.max = backoff.max.max(min);
        backoff.current = backoff.current.clamp(backoff.min, backoff.max);
    }

    pub fn set_max_backoff(&self, max: Duration) {
        let mut backoff = self.backoff.lock();
        backoff.max = max.max(backoff.min);
        backoff.current = backoff.current.clamp(backoff.min, backoff.max);
    }

    pub(crate) fn set_readmit_at(&self, readmit_at: Instant) {
        self.backoff.lock().readmit_at = readmit_at;
    }

    /// The node's channel, created on first use.
    pub fn channel(&self) -> Result<ManagedChannel> {
        let mut slot = self.channel.lock();
        if let Some(channel) = slot.as_ref() {
            return Ok(channel.clone());
        }

        let channel = channel::dial(&self.address, &self.transport, &self.settings)?;
        *slot = Some(channel.clone());
        Ok(channel)
    }

    pub fn has_channel(&self) -> bool {
        self.channel.lock().is_some()
    }

    /// Poll until the address accepts connections or `deadline` passes.
    ///
    /// Returns `true` when the node could not be reached. A node that
    /// connected once is not probed again.
    pub async fn channel_failed_to_connect(&self, deadline: Instant) -> bool {
        if self.has_connected.load(Ordering::Acquire) {
            return false;
        }

        let deadline = deadline.min(Instant::now() + CONNECT_CHECK_TIMEOUT);
        for attempt in 1..=MAX_CONNECT_ATTEMPTS {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            if channel::probe(&self.address, remaining).await {
                self.has_connected.store(true, Ordering::Release);
                debug!("Node {} reachable after {} probe(s)", self.key, attempt);
                return false;
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            tokio::time::sleep(CONNECT_POLL_INTERVAL.min(remaining)).await;
        }

        warn!("Node {} ({}) failed to connect", self.key, self.address);
        true
    }

    /// Take the channel out of the node and stop it accepting calls.
    ///
    /// A later [`Node::channel`] call dials a fresh one.
    pub fn begin_close(&self) -> Option<ManagedChannel> {
        let channel = self.channel.lock().take()?;
        channel.shutdown();
        self.has_connected.store(false, Ordering::Release);
        Some(channel)
    }

    /// Graceful shutdown bounded by `timeout`; the channel is dropped either way.
    ///
    /// Returns `false` when in-flight calls were still running at the deadline.
    pub async fn close(&self, timeout: Duration) -> bool {
        let Some(channel) = self.begin_close() else {
            return true;
        };
        let terminated = channel.await_termination(timeout).await;
        if !terminated {
            warn!(
                "Channel to node {} did not terminate within {:?}, forcing shutdown",
                self.key, timeout
            );
        }
        terminated
    }
}

impl<K: fmt::Debug> fmt::Debug for Node<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("key", &self.key)
            .field("address", &self.address)
            .field("transport", &self.transport)
            .finish_non_exhaustive()
    }
}
