//! Scripted transport shared by the unit tests

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use hashnet_api::{AccountId, ResponseCode, proto};
use parking_lot::Mutex;
use tokio::time::Instant;
use tonic::Status;

use crate::client::Client;
use crate::config::ClientConfig;
use crate::network::ConsensusNode;
use crate::transport::{GrpcMethod, Transport};

#[derive(Debug, Clone)]
pub(crate) struct SubmittedCall {
    pub node: AccountId,
    pub method: GrpcMethod,
    pub transaction: proto::Transaction,
}

/// Answers from queues; an empty queue answers `OK` and a `SUCCESS` receipt.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    submit: Mutex<VecDeque<Result<proto::TransactionResponse, Status>>>,
    queries: Mutex<VecDeque<Result<proto::Response, Status>>>,
    unreachable: Mutex<HashSet<AccountId>>,
    submitted: Mutex<Vec<SubmittedCall>>,
    queried: Mutex<Vec<(AccountId, proto::Query)>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_submit(&self, response: Result<proto::TransactionResponse, Status>) {
        self.submit.lock().push_back(response);
    }

    pub fn push_query(&self, response: Result<proto::Response, Status>) {
        self.queries.lock().push_back(response);
    }

    pub fn set_unreachable(&self, node: AccountId) {
        self.unreachable.lock().insert(node);
    }

    pub fn submitted(&self) -> Vec<SubmittedCall> {
        self.submitted.lock().clone()
    }

    pub fn submitted_nodes(&self) -> Vec<AccountId> {
        self.submitted.lock().iter().map(|call| call.node).collect()
    }

    pub fn queried(&self) -> Vec<(AccountId, proto::Query)> {
        self.queried.lock().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn submit_transaction(
        &self,
        node: &ConsensusNode,
        method: GrpcMethod,
        transaction: proto::Transaction,
        _timeout: Duration,
    ) -> Result<proto::TransactionResponse, Status> {
        self.submitted.lock().push(SubmittedCall {
            node: *node.key(),
            method,
            transaction,
        });
        self.submit
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(precheck(ResponseCode::Ok)))
    }

    async fn query(
        &self,
        node: &ConsensusNode,
        _method: GrpcMethod,
        query: proto::Query,
        _timeout: Duration,
    ) -> Result<proto::Response, Status> {
        self.queried.lock().push((*node.key(), query));
        self.queries
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(receipt_response(ResponseCode::Ok, ResponseCode::Success)))
    }

    async fn channel_failed_to_connect(&self, node: &ConsensusNode, _deadline: Instant) -> bool {
        self.unreachable.lock().contains(node.key())
    }
}

pub(crate) fn precheck(code: ResponseCode) -> proto::TransactionResponse {
    proto::TransactionResponse {
        node_transaction_precheck_code: code as i32,
        cost: 0,
    }
}

pub(crate) fn receipt_response(precheck: ResponseCode, status: ResponseCode) -> proto::Response {
    proto::Response {
        response: Some(proto::response::Response::TransactionGetReceipt(
            proto::TransactionGetReceiptResponse {
                header: Some(proto::ResponseHeader {
                    node_transaction_precheck_code: precheck as i32,
                    response_type: proto::ResponseType::AnswerOnly as i32,
                    cost: 0,
                }),
                receipt: Some(proto::TransactionReceipt {
                    status: status as i32,
                    ..Default::default()
                }),
            },
        )),
    }
}

/// Client over nodes `0.0.3 ..` with short request backoff.
pub(crate) fn test_client(transport: Arc<ScriptedTransport>, nodes: u64) -> Client {
    let network = (3..3 + nodes)
        .map(|i| (format!("10.0.0.{}:50211", i), format!("0.0.{}", i)))
        .collect();
    let config = ClientConfig::new(network)
        .with_node_backoff(250, 8_000)
        .with_request_backoff(10, 100)
        .with_timeouts(5_000, 1_000);
    Client::builder(config)
        .with_transport(transport)
        .build()
        .unwrap()
}
