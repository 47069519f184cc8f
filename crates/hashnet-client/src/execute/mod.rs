//! Request execution: node selection, classification and retry
//!
//! Every request that goes to a consensus node runs through [`execute`]. The
//! request type describes how to build the wire message for a node and how
//! to read the node's answer; the loop here owns the rest: picking a node,
//! feeding the outcome back into the node's backoff, and deciding whether to
//! try again.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use hashnet_api::{AccountId, ResponseCode, TransactionId};
use rand::seq::{IndexedRandom, SliceRandom};
use tokio::time::Instant;
use tonic::{Code, Status};
use tracing::{debug, warn};

use crate::client::Client;
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::network::{ConsensusNetwork, ConsensusNode};
use crate::transport::Transport;

/// How a node's answer is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExecutionState {
    Success,
    /// Try again after a delay, on the same node
    Retry,
    /// The node could not serve the request; penalise it and move on
    ServerError,
    /// The request itself was rejected
    RequestError,
}

/// Per-request overrides of the client configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecuteOptions {
    pub max_attempts: Option<u32>,
    pub min_backoff: Option<Duration>,
    pub max_backoff: Option<Duration>,
    pub grpc_deadline: Option<Duration>,
    pub request_timeout: Option<Duration>,
}

#[derive(Debug, Clone, Copy)]
struct Budget {
    max_attempts: u32,
    min_backoff: Duration,
    max_backoff: Duration,
    grpc_deadline: Duration,
    request_timeout: Duration,
}

impl ExecuteOptions {
    fn resolve(&self, config: &ClientConfig, timeout: Option<Duration>) -> Budget {
        let min_backoff = self.min_backoff.unwrap_or_else(|| config.min_backoff());
        Budget {
            max_attempts: self.max_attempts.unwrap_or(config.max_attempts).max(1),
            min_backoff,
            max_backoff: self
                .max_backoff
                .unwrap_or_else(|| config.max_backoff())
                .max(min_backoff),
            grpc_deadline: self.grpc_deadline.unwrap_or_else(|| config.grpc_deadline()),
            request_timeout: timeout
                .or(self.request_timeout)
                .unwrap_or_else(|| config.request_timeout()),
        }
    }
}

impl Budget {
    /// Delay before retry number `attempt` (1-based).
    fn retry_delay(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt.saturating_sub(1)).unwrap_or(u32::MAX);
        self.min_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }
}

/// A request the engine can send to consensus nodes.
#[async_trait]
pub(crate) trait Execute: Send {
    type GrpcRequest: Clone + fmt::Debug + Send + Sync + 'static;
    type GrpcResponse: fmt::Debug + Send + 'static;
    type Output: Send;

    /// Node ids the request may be sent to, in preference order.
    fn node_account_ids(&self) -> &[AccountId];

    fn options(&self) -> &ExecuteOptions;

    fn transaction_id(&self) -> Option<TransactionId>;

    /// Wire message for the node at `node_index` of [`Execute::node_account_ids`].
    fn make_request(&self, node_index: usize) -> Result<Self::GrpcRequest>;

    async fn send(
        &self,
        transport: &dyn Transport,
        node: &ConsensusNode,
        request: Self::GrpcRequest,
        timeout: Duration,
    ) -> std::result::Result<Self::GrpcResponse, Status>;

    /// The node's status code, or the raw value when it is not recognised.
    fn response_status(&self, response: &Self::GrpcResponse) -> std::result::Result<ResponseCode, i32>;

    fn classify(
        &mut self,
        status: ResponseCode,
        response: &Self::GrpcResponse,
        config: &ClientConfig,
    ) -> ExecutionState;

    fn map_response(
        &self,
        response: Self::GrpcResponse,
        node_id: AccountId,
        request: &Self::GrpcRequest,
    ) -> Result<Self::Output>;

    fn status_error(&self, status: ResponseCode, response: &Self::GrpcResponse) -> ClientError {
        let _ = response;
        ClientError::PrecheckStatus {
            status,
            transaction_id: self.transaction_id(),
        }
    }
}

#[derive(Debug)]
struct Candidate {
    /// Position of the node id in the request's node list
    index: usize,
    node: Arc<ConsensusNode>,
}

/// Candidate nodes visited in rotation, preferring the healthy ones.
#[derive(Debug)]
struct NodeRotation {
    candidates: Vec<Candidate>,
    attempted: Vec<bool>,
    position: usize,
}

impl NodeRotation {
    fn new(candidates: Vec<Candidate>) -> Self {
        let attempted = vec![false; candidates.len()];
        Self {
            candidates,
            attempted,
            position: 0,
        }
    }

    /// Move to the next candidate to try, returning how long to wait before
    /// it becomes healthy.
    fn select(&mut self) -> Duration {
        let len = self.candidates.len();
        for offset in 0..len {
            let position = (self.position + offset) % len;
            if self.candidates[position].node.is_healthy() {
                self.position = position;
                return Duration::ZERO;
            }
        }

        let (position, wait) = self
            .candidates
            .iter()
            .enumerate()
            .map(|(position, candidate)| (position, candidate.node.remaining_backoff()))
            .min_by_key(|(_, wait)| *wait)
            .unwrap_or((self.position, Duration::ZERO));
        self.position = position;
        wait
    }

    fn current(&mut self) -> &Candidate {
        self.attempted[self.position] = true;
        &self.candidates[self.position]
    }

    fn advance(&mut self) {
        self.position = (self.position + 1) % self.candidates.len();
    }

    fn attempted_all(&self) -> bool {
        self.attempted.iter().all(|attempted| *attempted)
    }
}

fn candidates(network: &ConsensusNetwork, node_ids: &[AccountId]) -> Result<Vec<Candidate>> {
    let mut rng = rand::rng();

    if let [node_id] = node_ids {
        let mut proxies = network.node_proxies(node_id);
        if proxies.is_empty() {
            return Err(ClientError::UnknownNode(node_id.to_string()));
        }
        proxies.shuffle(&mut rng);
        return Ok(proxies
            .into_iter()
            .map(|node| Candidate { index: 0, node })
            .collect());
    }

    node_ids
        .iter()
        .enumerate()
        .map(|(index, node_id)| {
            network
                .node_proxies(node_id)
                .choose(&mut rng)
                .cloned()
                .map(|node| Candidate { index, node })
                .ok_or_else(|| ClientError::UnknownNode(node_id.to_string()))
        })
        .collect()
}

enum GrpcFailure {
    Transient,
    DeadlineExceeded,
    Terminal,
}

fn classify_grpc(status: &Status) -> GrpcFailure {
    match status.code() {
        Code::Unavailable | Code::ResourceExhausted => GrpcFailure::Transient,
        Code::Internal if status.message().to_ascii_lowercase().contains("rst stream") => {
            GrpcFailure::Transient
        }
        Code::DeadlineExceeded => GrpcFailure::DeadlineExceeded,
        _ => GrpcFailure::Terminal,
    }
}

fn exhausted(last_error: Option<ClientError>) -> Option<Box<ClientError>> {
    last_error.map(Box::new)
}

/// Run `executable` against the client's consensus network until it
/// succeeds, fails terminally, or runs out of attempts or time.
pub(crate) async fn execute<E: Execute>(
    client: &Client,
    executable: &mut E,
    timeout: Option<Duration>,
) -> Result<E::Output> {
    let config = client.config();
    let budget = executable.options().resolve(&config, timeout);
    let network = client.consensus_network();
    let transport = client.transport();
    let metrics = client.metrics();

    let node_ids = executable.node_account_ids().to_vec();
    if node_ids.is_empty() {
        return Err(ClientError::MissingNodeAccountIds);
    }
    let mut rotation = NodeRotation::new(candidates(network, &node_ids)?);

    let deadline = Instant::now() + budget.request_timeout;
    let mut last_error: Option<ClientError> = None;

    for attempt in 1..=budget.max_attempts {
        let wait = rotation.select();
        if !wait.is_zero() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            debug!("No healthy candidate, waiting {:?} for the next one", wait.min(remaining));
            tokio::time::sleep(wait.min(remaining)).await;
        }
        if Instant::now() >= deadline {
            return Err(ClientError::Timeout {
                last_error: exhausted(last_error),
            });
        }

        let candidate = rotation.current();
        let node = candidate.node.clone();
        let node_index = candidate.index;
        let node_id = *node.key();
        let node_label = node_id.to_string();

        if transport.channel_failed_to_connect(&node, deadline).await {
            network.pool().increase_backoff(&node);
            if let Some(metrics) = metrics {
                metrics.record_failure(&node_label, "connect");
            }
            let err = ClientError::ConnectFailed(node_label);
            warn!(
                "Retrying on another node (attempt {}/{}): {}",
                attempt, budget.max_attempts, err
            );
            last_error = Some(err);
            rotation.advance();
            continue;
        }

        let request = executable.make_request(node_index)?;
        let remaining = deadline.saturating_duration_since(Instant::now());
        let grpc_timeout = budget.grpc_deadline.min(remaining);
        debug!("Attempt {} on node {} ({})", attempt, node_id, node.address());

        let started = Instant::now();
        let sent = tokio::time::timeout(
            grpc_timeout,
            executable.send(transport, &node, request.clone(), grpc_timeout),
        )
        .await
        .unwrap_or_else(|_| Err(Status::deadline_exceeded("attempt deadline elapsed")));
        let latency = started.elapsed();

        let response = match sent {
            Ok(response) => response,
            Err(status) => {
                if let Some(metrics) = metrics {
                    metrics.observe_request(&node_label, "grpc_error", latency);
                    metrics.record_failure(&node_label, &format!("{:?}", status.code()));
                }
                match classify_grpc(&status) {
                    GrpcFailure::Terminal => return Err(ClientError::Grpc(status)),
                    GrpcFailure::DeadlineExceeded if Instant::now() >= deadline => {
                        return Err(ClientError::Timeout {
                            last_error: Some(Box::new(ClientError::Grpc(status))),
                        });
                    }
                    GrpcFailure::Transient | GrpcFailure::DeadlineExceeded => {
                        network.pool().increase_backoff(&node);
                        let err = ClientError::Grpc(status);
                        warn!(
                            "Retrying on another node (attempt {}/{}): {}",
                            attempt, budget.max_attempts, err
                        );
                        last_error = Some(err);
                        rotation.advance();
                        continue;
                    }
                }
            }
        };

        let status = match executable.response_status(&response) {
            Ok(status) => status,
            Err(code) => {
                network.pool().decrease_backoff(&node);
                return Err(ClientError::UnrecognizedStatus(code));
            }
        };
        if status != ResponseCode::InvalidNodeAccount {
            network.pool().decrease_backoff(&node);
        }

        match executable.classify(status, &response, &config) {
            ExecutionState::Success => {
                if let Some(metrics) = metrics {
                    metrics.observe_request(&node_label, "success", latency);
                    metrics.record_success(&node_label);
                    metrics.set_healthy_nodes(network.pool().healthy_nodes().len());
                }
                return executable.map_response(response, node_id, &request);
            }
            ExecutionState::ServerError => {
                network.pool().increase_backoff(&node);
                if let Some(metrics) = metrics {
                    metrics.observe_request(&node_label, "server_error", latency);
                    metrics.record_failure(&node_label, status.as_str_name());
                }
                let err = executable.status_error(status, &response);
                warn!(
                    "Retrying on another node (attempt {}/{}): {}",
                    attempt, budget.max_attempts, err
                );
                last_error = Some(err);
                if rotation.attempted_all() {
                    delay(&budget, attempt, deadline).await;
                }
                rotation.advance();
            }
            ExecutionState::Retry => {
                if let Some(metrics) = metrics {
                    metrics.observe_request(&node_label, "retry", latency);
                }
                let err = executable.status_error(status, &response);
                warn!(
                    "Retrying request (attempt {}/{}): {}",
                    attempt, budget.max_attempts, err
                );
                last_error = Some(err);
                delay(&budget, attempt, deadline).await;
            }
            ExecutionState::RequestError => {
                if let Some(metrics) = metrics {
                    metrics.observe_request(&node_label, "request_error", latency);
                    metrics.record_failure(&node_label, status.as_str_name());
                }
                return Err(executable.status_error(status, &response));
            }
        }
    }

    Err(ClientError::MaxAttemptsExceeded {
        last_error: exhausted(last_error),
    })
}

async fn delay(budget: &Budget, attempt: u32, deadline: Instant) {
    let remaining = deadline.saturating_duration_since(Instant::now());
    tokio::time::sleep(budget.retry_delay(attempt).min(remaining)).await;
}
