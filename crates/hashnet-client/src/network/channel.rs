//! Channel construction and lifecycle
//!
//! Channels are created lazily: dialing never blocks, the connection is made
//! on the first request. A [`ManagedChannel`] counts in-flight calls so that a
//! graceful shutdown can wait for them to drain.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use hyper_util::rt::TokioIo;
use rustls::pki_types::ServerName;
use tokio::net::TcpStream;
use tokio::sync::Notify;
use tonic::transport::{Channel, ClientTlsConfig, Endpoint};
use tracing::debug;

use crate::error::{ClientError, Result};
use crate::network::address::{NodeAddress, TransportConfig};
use crate::network::{in_process, tls};

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings applied to every channel a network creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelSettings {
    pub keep_alive: Duration,
    pub connect_timeout: Duration,
}

impl Default for ChannelSettings {
    fn default() -> Self {
        Self {
            keep_alive: Duration::from_millis(crate::config::DEFAULT_KEEP_ALIVE_MS),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

struct ChannelState {
    shutdown: AtomicBool,
    in_flight: AtomicUsize,
    idle: Notify,
}

/// A tonic channel plus the bookkeeping needed for graceful shutdown.
#[derive(Clone)]
pub struct ManagedChannel {
    channel: Channel,
    state: Arc<ChannelState>,
}

/// Marks one call as in flight for as long as it is alive.
pub struct CallGuard {
    state: Arc<ChannelState>,
}

impl Drop for CallGuard {
    fn drop(&mut self) {
        if self.state.in_flight.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.state.idle.notify_waiters();
        }
    }
}

impl ManagedChannel {
    fn new(channel: Channel) -> Self {
        Self {
            channel,
            state: Arc::new(ChannelState {
                shutdown: AtomicBool::new(false),
                in_flight: AtomicUsize::new(0),
                idle: Notify::new(),
            }),
        }
    }

    pub fn channel(&self) -> Channel {
        self.channel.clone()
    }

    /// Register a call; returns `None` once shutdown has been requested.
    pub fn begin_call(&self) -> Option<CallGuard> {
        self.state.in_flight.fetch_add(1, Ordering::AcqRel);
        let guard = CallGuard {
            state: self.state.clone(),
        };
        if self.state.shutdown.load(Ordering::Acquire) {
            return None;
        }
        Some(guard)
    }

    pub fn in_flight(&self) -> usize {
        self.state.in_flight.load(Ordering::Acquire)
    }

    /// Stop accepting new calls. Calls already in flight continue.
    pub fn shutdown(&self) {
        self.state.shutdown.store(true, Ordering::Release);
    }

    pub fn is_shutdown(&self) -> bool {
        self.state.shutdown.load(Ordering::Acquire)
    }

    /// Wait until every in-flight call finished, for at most `timeout`.
    pub async fn await_termination(&self, timeout: Duration) -> bool {
        let drained = async {
            loop {
                let notified = self.state.idle.notified();
                if self.in_flight() == 0 {
                    return;
                }
                notified.await;
            }
        };
        tokio::time::timeout(timeout, drained).await.is_ok()
    }
}

fn endpoint(uri: String, settings: &ChannelSettings) -> Result<Endpoint> {
    let endpoint = Endpoint::from_shared(uri)
        .map_err(|e| ClientError::config(format!("invalid node address: {}", e)))?
        .connect_timeout(settings.connect_timeout)
        .http2_keep_alive_interval(settings.keep_alive)
        .keep_alive_while_idle(true)
        .tcp_nodelay(true);
    Ok(endpoint)
}

/// Create the channel for `address` without connecting.
pub(crate) fn dial(
    address: &NodeAddress,
    transport: &TransportConfig,
    settings: &ChannelSettings,
) -> Result<ManagedChannel> {
    let channel = match (address, transport) {
        (_, TransportConfig::InProcess { name }) => {
            let name = name.clone();
            let connector = tower::service_fn(move |_: http::Uri| {
                let name = name.clone();
                async move { in_process::connect(&name).map(TokioIo::new) }
            });
            endpoint("http://in-process.invalid".to_string(), settings)?
                .connect_with_connector_lazy(connector)
        }
        (NodeAddress::Remote { .. }, TransportConfig::Plaintext) => {
            endpoint(format!("http://{}", address), settings)?.connect_lazy()
        }
        (NodeAddress::Remote { host, .. }, TransportConfig::Tls { cert_hash, verify })
            if cert_hash.is_some() || !verify =>
        {
            let pinned = if *verify { cert_hash.as_deref() } else { None };
            let connector = tokio_rustls::TlsConnector::from(tls::client_config(pinned)?);
            let server_name = ServerName::try_from(host.clone())
                .map_err(|e| ClientError::config(format!("invalid TLS server name: {}", e)))?;
            let target = address.to_string();
            let service = tower::service_fn(move |_: http::Uri| {
                let connector = connector.clone();
                let server_name = server_name.clone();
                let target = target.clone();
                async move {
                    let tcp = TcpStream::connect(&target).await?;
                    tcp.set_nodelay(true)?;
                    let stream = connector.connect(server_name, tcp).await?;
                    Ok::<_, io::Error>(TokioIo::new(stream))
                }
            });
            endpoint(format!("http://{}", address), settings)?.connect_with_connector_lazy(service)
        }
        (NodeAddress::Remote { host, .. }, TransportConfig::Tls { .. }) => {
            let tls = ClientTlsConfig::new()
                .with_native_roots()
                .domain_name(host.clone());
            endpoint(format!("https://{}", address), settings)?
                .tls_config(tls)?
                .connect_lazy()
        }
        (NodeAddress::InProcess { .. }, _) => {
            return Err(ClientError::config(format!(
                "{} can only be dialed in process",
                address
            )));
        }
    };

    debug!("Created channel to {}", address);
    Ok(ManagedChannel::new(channel))
}

/// Probe whether `address` accepts connections, for at most `timeout`.
pub(crate) async fn probe(address: &NodeAddress, timeout: Duration) -> bool {
    match address {
        NodeAddress::InProcess { name } => in_process::is_listening(name),
        NodeAddress::Remote { .. } => {
            let target = address.to_string();
            matches!(
                tokio::time::timeout(timeout, TcpStream::connect(target)).await,
                Ok(Ok(_))
            )
        }
    }
}
