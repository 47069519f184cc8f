//! The client: consensus and mirror networks, operator and shared settings

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use hashnet_api::AccountId;
use parking_lot::{Mutex, RwLock};
use tokio::runtime::{Handle, Runtime};
use tokio::time::Instant;
use tracing::info;

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::metrics::MetricsMonitor;
use crate::network::{ConsensusNetwork, MirrorNetwork, NodeAddress};
use crate::transaction::Signer;
use crate::transport::{GrpcTransport, Transport};

/// Account that pays for transactions and the key that signs them.
#[derive(Clone)]
pub struct Operator {
    pub account_id: AccountId,
    pub signer: Arc<dyn Signer>,
}

impl fmt::Debug for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operator")
            .field("account_id", &self.account_id)
            .field("public_key", &self.signer.public_key())
            .finish()
    }
}

struct ClientInner {
    consensus: ConsensusNetwork,
    mirror: MirrorNetwork,
    config: RwLock<ClientConfig>,
    operator: RwLock<Option<Operator>>,
    transport: Arc<dyn Transport>,
    metrics: Option<Arc<MetricsMonitor>>,
    /// Runtime backing the blocking calls, built on first use
    executor: Mutex<Option<Arc<Runtime>>>,
}

impl Drop for ClientInner {
    fn drop(&mut self) {
        if let Some(runtime) = self.executor.get_mut().take()
            && let Ok(runtime) = Arc::try_unwrap(runtime)
        {
            runtime.shutdown_background();
        }
    }
}

/// Handle to a node network. Cheap to clone; clones share all state.
#[derive(Clone)]
pub struct Client(Arc<ClientInner>);

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("consensus_nodes", &self.0.consensus.pool().len())
            .field("mirror_nodes", &self.0.mirror.pool().len())
            .field("operator", &*self.0.operator.read())
            .finish_non_exhaustive()
    }
}

/// Builder for [`Client`] with a custom transport or metrics.
pub struct ClientBuilder {
    config: ClientConfig,
    transport: Option<Arc<dyn Transport>>,
    metrics: Option<Arc<MetricsMonitor>>,
}

impl ClientBuilder {
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<MetricsMonitor>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn build(self) -> Result<Client> {
        self.config.validate()?;
        let consensus = ConsensusNetwork::from_config(&self.config)?;
        let mirror = MirrorNetwork::from_config(&self.config)?;

        info!(
            "Client created with {} consensus node(s) and {} mirror node(s)",
            consensus.pool().len(),
            mirror.pool().len()
        );

        Ok(Client(Arc::new(ClientInner {
            consensus,
            mirror,
            config: RwLock::new(self.config),
            operator: RwLock::new(None),
            transport: self
                .transport
                .unwrap_or_else(|| Arc::new(GrpcTransport)),
            metrics: self.metrics,
            executor: Mutex::new(None),
        })))
    }
}

impl Client {
    pub fn builder(config: ClientConfig) -> ClientBuilder {
        ClientBuilder {
            config,
            transport: None,
            metrics: None,
        }
    }

    pub fn from_config(config: ClientConfig) -> Result<Self> {
        Self::builder(config).build()
    }

    /// Client for consensus nodes given as `"host:port" -> account`.
    pub fn for_network(network: HashMap<String, AccountId>) -> Result<Self> {
        let network = network
            .into_iter()
            .map(|(address, account)| (address, account.to_string()))
            .collect();
        Self::from_config(ClientConfig::new(network))
    }

    /// Load a TOML config file and build a client from it.
    pub fn from_config_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        Self::from_config(ClientConfig::from_file(path)?)
    }

    pub fn set_operator(&self, account_id: AccountId, signer: Arc<dyn Signer>) {
        info!("Client operator set to {}", account_id);
        *self.0.operator.write() = Some(Operator { account_id, signer });
    }

    pub fn operator(&self) -> Option<Operator> {
        self.0.operator.read().clone()
    }

    pub fn operator_account_id(&self) -> Option<AccountId> {
        self.0.operator.read().as_ref().map(|operator| operator.account_id)
    }

    /// Snapshot of the current configuration.
    pub fn config(&self) -> ClientConfig {
        self.0.config.read().clone()
    }

    /// Change request-level settings. Node pool settings live on the
    /// networks and have their own setters.
    pub fn update_config(&self, update: impl FnOnce(&mut ClientConfig)) -> Result<()> {
        let mut config = self.0.config.write();
        let mut updated = config.clone();
        update(&mut updated);
        updated.validate()?;
        *config = updated;
        Ok(())
    }

    pub fn set_max_attempts(&self, max_attempts: u32) -> Result<()> {
        self.update_config(|config| config.max_attempts = max_attempts)
    }

    pub fn set_request_timeout(&self, timeout: Duration) -> Result<()> {
        self.update_config(|config| config.request_timeout_ms = timeout.as_millis() as u64)
    }

    pub fn set_default_regenerate_transaction_id(&self, regenerate: bool) -> Result<()> {
        self.update_config(|config| config.default_regenerate_transaction_id = regenerate)
    }

    pub fn consensus_network(&self) -> &ConsensusNetwork {
        &self.0.consensus
    }

    pub fn mirror_network(&self) -> &MirrorNetwork {
        &self.0.mirror
    }

    pub fn transport(&self) -> &dyn Transport {
        self.0.transport.as_ref()
    }

    pub fn metrics(&self) -> Option<&MetricsMonitor> {
        self.0.metrics.as_deref()
    }

    /// Replace the consensus network, given as `"host:port" -> account`.
    pub async fn set_network(&self, network: HashMap<String, AccountId>) -> Result<()> {
        let mut parsed: HashMap<AccountId, Vec<NodeAddress>> = HashMap::new();
        for (address, account) in network {
            parsed.entry(account).or_default().push(address.parse()?);
        }
        self.0.consensus.set_network(parsed).await
    }

    pub fn network(&self) -> HashMap<String, AccountId> {
        self.0.consensus.network()
    }

    pub async fn set_mirror_network(&self, addresses: Vec<String>) -> Result<()> {
        self.0.mirror.set_network(addresses).await
    }

    pub fn mirror_network_addresses(&self) -> Vec<String> {
        self.0.mirror.network()
    }

    /// Run `future` to completion on the client's executor.
    ///
    /// Fails when called from inside an async runtime, where blocking would
    /// stall the caller's worker thread.
    pub(crate) fn block_on<F: Future>(&self, future: F) -> Result<F::Output> {
        if Handle::try_current().is_ok() {
            return Err(ClientError::config(
                "blocking calls can not be made from within an async runtime",
            ));
        }
        let runtime = {
            let mut executor = self.0.executor.lock();
            match executor.as_ref() {
                Some(runtime) => runtime.clone(),
                None => {
                    let threads = self.0.config.read().executor_threads;
                    let runtime = Arc::new(
                        tokio::runtime::Builder::new_multi_thread()
                            .worker_threads(threads)
                            .thread_name("hashnet-executor")
                            .enable_all()
                            .build()
                            .map_err(|e| {
                                ClientError::config(format!("failed to start executor: {}", e))
                            })?,
                    );
                    *executor = Some(runtime.clone());
                    runtime
                }
            }
        };
        Ok(runtime.block_on(future))
    }

    /// Close both networks within the configured close timeout.
    pub async fn close(&self) -> Result<()> {
        let timeout = self.0.consensus.close_timeout();
        self.close_with_timeout(timeout).await
    }

    /// Stop all channels from taking new calls, then wait up to `timeout`
    /// for in-flight calls. If the consensus network fails to drain, the
    /// mirror network is closed forcibly and the error returned.
    pub async fn close_with_timeout(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        self.0.consensus.pool().begin_close();
        self.0.mirror.pool().begin_close();

        let consensus = self.0.consensus.pool().await_close(deadline, None).await;
        let result = self
            .0
            .mirror
            .pool()
            .await_close(deadline, consensus.err())
            .await;
        info!("Client closed");
        result
    }

    pub fn close_blocking(&self) -> Result<()> {
        self.block_on(self.close())?
    }
}
