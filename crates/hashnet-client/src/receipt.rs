//! Transaction receipts and the query that polls for them

use std::time::Duration;

use async_trait::async_trait;
use hashnet_api::{AccountId, FileId, ResponseCode, TopicId, TransactionId, proto};
use tonic::Status;

use crate::client::Client;
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::execute::{self, Execute, ExecuteOptions, ExecutionState};
use crate::network::ConsensusNode;
use crate::transport::{GrpcMethod, Transport};

/// Where a transaction stands according to its receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiptOutcome {
    /// Reached consensus with `SUCCESS`
    Accepted,
    /// Reached consensus with an error status
    Rejected(ResponseCode),
    /// Not final yet
    Pending,
}

impl ReceiptOutcome {
    pub fn of(status: ResponseCode) -> Self {
        match status {
            ResponseCode::Busy
            | ResponseCode::Unknown
            | ResponseCode::Ok
            | ResponseCode::ReceiptNotFound
            | ResponseCode::RecordNotFound
            | ResponseCode::PlatformNotActive => Self::Pending,
            ResponseCode::Success => Self::Accepted,
            other => Self::Rejected(other),
        }
    }
}

/// Outcome of a transaction once it reached consensus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionReceipt {
    pub status: ResponseCode,
    pub account_id: Option<AccountId>,
    pub file_id: Option<FileId>,
    pub topic_id: Option<TopicId>,
    pub topic_sequence_number: u64,
    pub topic_running_hash: Vec<u8>,
}

impl TransactionReceipt {
    pub fn from_proto(receipt: &proto::TransactionReceipt) -> Result<Self> {
        let status = ResponseCode::from_code(receipt.status).map_err(ClientError::UnrecognizedStatus)?;
        Ok(Self {
            status,
            account_id: receipt.account_id.as_ref().map(AccountId::from_proto),
            file_id: receipt.file_id.as_ref().map(FileId::from_proto),
            topic_id: receipt.topic_id.as_ref().map(TopicId::from_proto),
            topic_sequence_number: receipt.topic_sequence_number,
            topic_running_hash: receipt.topic_running_hash.clone(),
        })
    }

    pub fn outcome(&self) -> ReceiptOutcome {
        ReceiptOutcome::of(self.status)
    }

    /// Fail with [`ClientError::ReceiptStatus`] unless the status is `SUCCESS`.
    pub fn validate_status(self, transaction_id: TransactionId) -> Result<Self> {
        if self.status != ResponseCode::Success {
            return Err(ClientError::ReceiptStatus {
                status: self.status,
                transaction_id,
            });
        }
        Ok(self)
    }
}

/// Polls a node until the receipt of a transaction is final.
#[derive(Debug, Clone, Default)]
pub struct TransactionReceiptQuery {
    transaction_id: Option<TransactionId>,
    node_account_ids: Vec<AccountId>,
    options: ExecuteOptions,
}

impl TransactionReceiptQuery {
    pub fn new(transaction_id: TransactionId) -> Self {
        Self {
            transaction_id: Some(transaction_id),
            ..Default::default()
        }
    }

    pub fn transaction_id(&self) -> Option<TransactionId> {
        self.transaction_id
    }

    pub fn set_transaction_id(&mut self, transaction_id: TransactionId) -> &mut Self {
        self.transaction_id = Some(transaction_id);
        self
    }

    pub fn node_account_ids(&self) -> &[AccountId] {
        &self.node_account_ids
    }

    pub fn set_node_account_ids(&mut self, node_account_ids: Vec<AccountId>) -> &mut Self {
        self.node_account_ids = node_account_ids;
        self
    }

    pub fn options_mut(&mut self) -> &mut ExecuteOptions {
        &mut self.options
    }

    pub async fn execute(&self, client: &Client) -> Result<TransactionReceipt> {
        self.execute_inner(client, None).await
    }

    pub async fn execute_with_timeout(
        &self,
        client: &Client,
        timeout: Duration,
    ) -> Result<TransactionReceipt> {
        self.execute_inner(client, Some(timeout)).await
    }

    async fn execute_inner(
        &self,
        client: &Client,
        timeout: Option<Duration>,
    ) -> Result<TransactionReceipt> {
        let transaction_id = self.transaction_id.ok_or(ClientError::MissingTransactionId)?;
        let node_account_ids = if self.node_account_ids.is_empty() {
            client.consensus_network().node_account_ids_for_execute()?
        } else {
            self.node_account_ids.clone()
        };

        let mut poll = ReceiptPoll {
            transaction_id,
            node_account_ids,
            options: self.options.clone(),
        };
        execute::execute(client, &mut poll, timeout).await
    }
}

struct ReceiptPoll {
    transaction_id: TransactionId,
    node_account_ids: Vec<AccountId>,
    options: ExecuteOptions,
}

fn receipt_response(response: &proto::Response) -> Option<&proto::TransactionGetReceiptResponse> {
    match response.response.as_ref()? {
        proto::response::Response::TransactionGetReceipt(receipt) => Some(receipt),
    }
}

fn receipt_status(response: &proto::Response) -> Option<ResponseCode> {
    let status = receipt_response(response)?.receipt.as_ref()?.status;
    ResponseCode::from_code(status).ok()
}

#[async_trait]
impl Execute for ReceiptPoll {
    type GrpcRequest = proto::Query;
    type GrpcResponse = proto::Response;
    type Output = TransactionReceipt;

    fn node_account_ids(&self) -> &[AccountId] {
        &self.node_account_ids
    }

    fn options(&self) -> &ExecuteOptions {
        &self.options
    }

    fn transaction_id(&self) -> Option<TransactionId> {
        Some(self.transaction_id)
    }

    fn make_request(&self, _node_index: usize) -> Result<proto::Query> {
        Ok(proto::Query {
            query: Some(proto::query::Query::TransactionGetReceipt(
                proto::TransactionGetReceiptQuery {
                    header: Some(proto::QueryHeader {
                        payment: None,
                        response_type: proto::ResponseType::AnswerOnly as i32,
                    }),
                    transaction_id: Some(self.transaction_id.to_proto()),
                    include_duplicates: false,
                    include_child_receipts: false,
                },
            )),
        })
    }

    async fn send(
        &self,
        transport: &dyn Transport,
        node: &ConsensusNode,
        request: proto::Query,
        timeout: Duration,
    ) -> std::result::Result<proto::Response, Status> {
        transport
            .query(node, GrpcMethod::GetTransactionReceipts, request, timeout)
            .await
    }

    fn response_status(&self, response: &proto::Response) -> std::result::Result<ResponseCode, i32> {
        match receipt_response(response).and_then(|r| r.header.as_ref()) {
            Some(header) => ResponseCode::from_code(header.node_transaction_precheck_code),
            // a response without a header says nothing yet
            None => Ok(ResponseCode::Unknown),
        }
    }

    fn classify(
        &mut self,
        status: ResponseCode,
        response: &proto::Response,
        _config: &ClientConfig,
    ) -> ExecutionState {
        match status {
            ResponseCode::Busy
            | ResponseCode::Unknown
            | ResponseCode::ReceiptNotFound
            | ResponseCode::RecordNotFound
            | ResponseCode::PlatformNotActive => ExecutionState::Retry,
            ResponseCode::Ok => match receipt_status(response).map(ReceiptOutcome::of) {
                Some(ReceiptOutcome::Pending) | None => ExecutionState::Retry,
                Some(ReceiptOutcome::Accepted | ReceiptOutcome::Rejected(_)) => {
                    ExecutionState::Success
                }
            },
            _ => ExecutionState::RequestError,
        }
    }

    fn map_response(
        &self,
        response: proto::Response,
        _node_id: AccountId,
        _request: &proto::Query,
    ) -> Result<TransactionReceipt> {
        let receipt = receipt_response(&response)
            .and_then(|r| r.receipt.as_ref())
            .ok_or_else(|| ClientError::config("receipt response carried no receipt"))?;
        TransactionReceipt::from_proto(receipt)
    }

    fn status_error(&self, status: ResponseCode, response: &proto::Response) -> ClientError {
        let status = match status {
            ResponseCode::Ok => receipt_status(response).unwrap_or(status),
            other => other,
        };
        ClientError::PrecheckStatus {
            status,
            transaction_id: Some(self.transaction_id),
        }
    }
}
