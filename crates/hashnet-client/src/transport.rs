//! The seam between the execution engine and the wire
//!
//! [`GrpcTransport`] sends unary calls over a node's managed channel. Tests
//! swap in their own [`Transport`] to script node behaviour.

use std::time::Duration;

use async_trait::async_trait;
use hashnet_api::proto;
use hashnet_api::proto::consensus_service_client::ConsensusServiceClient;
use hashnet_api::proto::crypto_service_client::CryptoServiceClient;
use hashnet_api::proto::file_service_client::FileServiceClient;
use tokio::time::Instant;
use tonic::Status;
use tonic::metadata::MetadataValue;
use tonic::transport::Channel;
use tower::ServiceExt;
use tracing::{debug, trace};

use crate::network::{CallGuard, ConsensusNode};

pub const USER_AGENT: &str = concat!("hashnet-sdk-rust/", env!("CARGO_PKG_VERSION"));

/// A unary method exposed by a consensus node service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrpcMethod {
    /// `ConsensusService.submitMessage`
    SubmitMessage,
    /// `FileService.appendContent`
    AppendContent,
    /// `CryptoService.getTransactionReceipts`
    GetTransactionReceipts,
}

impl GrpcMethod {
    /// Short name used in logs and metric labels.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SubmitMessage => "submitMessage",
            Self::AppendContent => "appendContent",
            Self::GetTransactionReceipts => "getTransactionReceipts",
        }
    }
}

/// Sends requests to consensus nodes.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Submit a signed transaction; the response carries the precheck code.
    async fn submit_transaction(
        &self,
        node: &ConsensusNode,
        method: GrpcMethod,
        transaction: proto::Transaction,
        timeout: Duration,
    ) -> Result<proto::TransactionResponse, Status>;

    async fn query(
        &self,
        node: &ConsensusNode,
        method: GrpcMethod,
        query: proto::Query,
        timeout: Duration,
    ) -> Result<proto::Response, Status>;

    /// `true` when the node could not be reached before `deadline`.
    async fn channel_failed_to_connect(&self, node: &ConsensusNode, deadline: Instant) -> bool {
        node.channel_failed_to_connect(deadline).await
    }
}

/// Production transport over tonic channels.
#[derive(Debug, Default, Clone, Copy)]
pub struct GrpcTransport;

impl GrpcTransport {
    /// Check out the node's channel for one call and wait until it can take it.
    ///
    /// Readiness failures are connection failures, so they surface as
    /// `Unavailable` rather than the generated stubs' `Unknown`.
    async fn ready_channel(node: &ConsensusNode) -> Result<(Channel, CallGuard), Status> {
        let managed = node
            .channel()
            .map_err(|e| Status::unavailable(e.to_string()))?;
        let call = managed
            .begin_call()
            .ok_or_else(|| Status::unavailable("channel is shutting down"))?;

        let mut channel = managed.channel();
        channel
            .ready()
            .await
            .map_err(|e| Status::unavailable(format!("service was not ready: {}", e)))?;
        Ok((channel, call))
    }

    fn request<T>(message: T, timeout: Duration) -> tonic::Request<T> {
        let mut request = tonic::Request::new(message);
        request.set_timeout(timeout);
        request
            .metadata_mut()
            .insert("x-user-agent", MetadataValue::from_static(USER_AGENT));
        request
    }
}

#[async_trait]
impl Transport for GrpcTransport {
    async fn submit_transaction(
        &self,
        node: &ConsensusNode,
        method: GrpcMethod,
        transaction: proto::Transaction,
        timeout: Duration,
    ) -> Result<proto::TransactionResponse, Status> {
        let (channel, _call) = Self::ready_channel(node).await?;
        trace!("{} request: {:?}", method.name(), transaction);
        debug!("Sending {} to node {} ({})", method.name(), node.key(), node.address());

        let request = Self::request(transaction, timeout);
        let response = match method {
            GrpcMethod::SubmitMessage => {
                ConsensusServiceClient::new(channel)
                    .submit_message(request)
                    .await?
            }
            GrpcMethod::AppendContent => {
                FileServiceClient::new(channel)
                    .append_content(request)
                    .await?
            }
            GrpcMethod::GetTransactionReceipts => {
                return Err(Status::invalid_argument(format!(
                    "{} does not take a transaction",
                    method.name()
                )));
            }
        }
        .into_inner();

        trace!("{} response: {:?}", method.name(), response);
        Ok(response)
    }

    async fn query(
        &self,
        node: &ConsensusNode,
        method: GrpcMethod,
        query: proto::Query,
        timeout: Duration,
    ) -> Result<proto::Response, Status> {
        if method != GrpcMethod::GetTransactionReceipts {
            return Err(Status::invalid_argument(format!(
                "{} is not a query",
                method.name()
            )));
        }

        let (channel, _call) = Self::ready_channel(node).await?;
        trace!("{} request: {:?}", method.name(), query);
        debug!("Sending {} to node {} ({})", method.name(), node.key(), node.address());

        let response = CryptoServiceClient::new(channel)
            .get_transaction_receipts(Self::request(query, timeout))
            .await?
            .into_inner();

        trace!("{} response: {:?}", method.name(), response);
        Ok(response)
    }
}
