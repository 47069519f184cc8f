//! Hashnet Client Integration Tests
//!
//! End-to-end tests over the in-process transport: every node is a tonic
//! server registered with `in_process::listen`, answering from a script.
//! These tests need no external network.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use ed25519_dalek::{Signer as _, SigningKey, Verifier};
use hashnet_api::proto;
use hashnet_api::proto::consensus_service_server::{ConsensusService, ConsensusServiceServer};
use hashnet_api::proto::crypto_service_server::{CryptoService, CryptoServiceServer};
use hashnet_api::proto::file_service_server::{FileService, FileServiceServer};
use hashnet_api::proto::transaction_body::Data;
use hashnet_client::network::in_process::{self, InProcessIncoming};
use hashnet_client::{
    AccountId, Client, ClientConfig, ClientError, FileAppendTransaction, FileId, GrpcMethod,
    MetricsMonitor, PublicKey, ResponseCode, Signer, TopicId, TopicMessageSubmitTransaction,
};
use parking_lot::Mutex;
use prost::Message;
use tonic::{Request, Response, Status};

const PAYER: u64 = 1001;

struct Ed25519Signer(SigningKey);

impl Signer for Ed25519Signer {
    fn public_key(&self) -> PublicKey {
        PublicKey::ed25519(self.0.verifying_key().to_bytes().to_vec())
    }

    fn sign(&self, message: &[u8]) -> Vec<u8> {
        self.0.sign(message).to_bytes().to_vec()
    }
}

fn operator_key() -> SigningKey {
    SigningKey::from_bytes(&[42; 32])
}

/// Script and record of one fake node.
#[derive(Default)]
struct NodeState {
    prechecks: Mutex<VecDeque<ResponseCode>>,
    receipts: Mutex<VecDeque<ResponseCode>>,
    submitted: Mutex<Vec<(GrpcMethod, proto::Transaction)>>,
    receipt_queries: Mutex<usize>,
}

impl NodeState {
    fn bodies(&self) -> Vec<proto::TransactionBody> {
        self.submitted
            .lock()
            .iter()
            .map(|(_, transaction)| {
                let signed = proto::SignedTransaction::decode(
                    transaction.signed_transaction_bytes.as_slice(),
                )
                .unwrap();
                proto::TransactionBody::decode(signed.body_bytes.as_slice()).unwrap()
            })
            .collect()
    }
}

/// A consensus node serving the generated services from a [`NodeState`].
#[derive(Clone)]
struct FakeNode {
    state: Arc<NodeState>,
}

impl FakeNode {
    fn submit(
        &self,
        method: GrpcMethod,
        request: Request<proto::Transaction>,
    ) -> Result<Response<proto::TransactionResponse>, Status> {
        self.state
            .submitted
            .lock()
            .push((method, request.into_inner()));
        let code = self
            .state
            .prechecks
            .lock()
            .pop_front()
            .unwrap_or(ResponseCode::Ok);
        Ok(Response::new(proto::TransactionResponse {
            node_transaction_precheck_code: code as i32,
            cost: 0,
        }))
    }
}

#[tonic::async_trait]
impl ConsensusService for FakeNode {
    async fn submit_message(
        &self,
        request: Request<proto::Transaction>,
    ) -> Result<Response<proto::TransactionResponse>, Status> {
        self.submit(GrpcMethod::SubmitMessage, request)
    }
}

#[tonic::async_trait]
impl FileService for FakeNode {
    async fn append_content(
        &self,
        request: Request<proto::Transaction>,
    ) -> Result<Response<proto::TransactionResponse>, Status> {
        self.submit(GrpcMethod::AppendContent, request)
    }
}

#[tonic::async_trait]
impl CryptoService for FakeNode {
    async fn get_transaction_receipts(
        &self,
        _request: Request<proto::Query>,
    ) -> Result<Response<proto::Response>, Status> {
        *self.state.receipt_queries.lock() += 1;
        let status = self
            .state
            .receipts
            .lock()
            .pop_front()
            .unwrap_or(ResponseCode::Success);
        Ok(Response::new(proto::Response {
            response: Some(proto::response::Response::TransactionGetReceipt(
                proto::TransactionGetReceiptResponse {
                    header: Some(proto::ResponseHeader {
                        node_transaction_precheck_code: ResponseCode::Ok as i32,
                        response_type: proto::ResponseType::AnswerOnly as i32,
                        cost: 0,
                    }),
                    receipt: Some(proto::TransactionReceipt {
                        status: status as i32,
                        ..Default::default()
                    }),
                },
            )),
        }))
    }
}

fn spawn_node(incoming: InProcessIncoming, state: Arc<NodeState>) {
    let node = FakeNode { state };
    tokio::spawn(async move {
        let _ = tonic::transport::Server::builder()
            .add_service(ConsensusServiceServer::new(node.clone()))
            .add_service(FileServiceServer::new(node.clone()))
            .add_service(CryptoServiceServer::new(node))
            .serve_with_incoming(incoming)
            .await;
    });
}

/// Start `count` fake nodes `0.0.3 ..` and a client over them.
fn start_network(test: &str, count: u64) -> (Client, HashMap<AccountId, Arc<NodeState>>) {
    let mut network = HashMap::new();
    let mut states = HashMap::new();
    for num in 3..3 + count {
        let name = format!("it-{}-{}", test, num);
        let state = Arc::new(NodeState::default());
        spawn_node(in_process::listen(name.clone()), state.clone());
        network.insert(format!("in-process:{}", name), format!("0.0.{}", num));
        states.insert(AccountId::from(num), state);
    }

    let config = ClientConfig::new(network)
        .with_request_backoff(10, 100)
        .with_node_backoff(250, 8_000)
        .with_timeouts(10_000, 2_000);
    let client = Client::builder(config)
        .with_metrics(Arc::new(MetricsMonitor::new().unwrap()))
        .build()
        .unwrap();
    client.set_operator(AccountId::from(PAYER), Arc::new(Ed25519Signer(operator_key())));
    (client, states)
}

// ============== Topic Message Tests ==============

#[tokio::test]
async fn test_topic_message_chunks_reach_node_in_order() {
    let (client, states) = start_network("topic-chunks", 1);
    let message: Vec<u8> = (0..2500u32).map(|i| (i % 251) as u8).collect();

    let mut transaction = TopicMessageSubmitTransaction::default();
    transaction
        .set_topic_id(TopicId::from(900))
        .unwrap()
        .set_message(message.clone())
        .unwrap();
    let responses = transaction.execute_all(&client).await.unwrap();
    assert_eq!(responses.len(), 3);

    let node = &states[&AccountId::from(3)];
    let bodies = node.bodies();
    assert_eq!(bodies.len(), 3);

    let mut reassembled = Vec::new();
    for (index, body) in bodies.iter().enumerate() {
        assert_eq!(body.node_account_id, Some(AccountId::from(3).to_proto()));
        let Some(Data::ConsensusSubmitMessage(submit)) = &body.data else {
            panic!("unexpected body");
        };
        let info = submit.chunk_info.as_ref().unwrap();
        assert_eq!(info.number as usize, index + 1);
        assert_eq!(info.total, 3);
        reassembled.extend_from_slice(&submit.message);
    }
    assert_eq!(reassembled, message);
    assert!(
        node.submitted
            .lock()
            .iter()
            .all(|(method, _)| *method == GrpcMethod::SubmitMessage)
    );

    let metrics = client.metrics().unwrap().gather();
    assert!(metrics.contains("hashnet_success_requests_total{node=\"0.0.3\"} 3"));
}

#[tokio::test]
async fn test_signatures_verify_against_submitted_bytes() {
    let (client, states) = start_network("signatures", 1);

    let mut transaction = TopicMessageSubmitTransaction::default();
    transaction
        .set_topic_id(TopicId::from(1))
        .unwrap()
        .set_message("hello")
        .unwrap();
    let response = transaction.execute(&client).await.unwrap();

    let submitted = states[&AccountId::from(3)].submitted.lock().clone();
    assert_eq!(submitted.len(), 1);
    let signed =
        proto::SignedTransaction::decode(submitted[0].1.signed_transaction_bytes.as_slice())
            .unwrap();
    let pairs = signed.sig_map.unwrap().sig_pair;
    assert_eq!(pairs.len(), 1);
    let Some(proto::signature_pair::Signature::Ed25519(signature)) = &pairs[0].signature else {
        panic!("expected an ed25519 signature");
    };
    let signature = ed25519_dalek::Signature::from_slice(signature).unwrap();
    assert!(
        operator_key()
            .verifying_key()
            .verify(&signed.body_bytes, &signature)
            .is_ok()
    );
    assert_eq!(response.node_id, AccountId::from(3));
}

// ============== Failover Tests ==============

#[tokio::test]
async fn test_busy_node_fails_over() {
    let (client, states) = start_network("failover", 2);
    for state in states.values() {
        state.prechecks.lock().push_back(ResponseCode::Busy);
    }

    let mut transaction = TopicMessageSubmitTransaction::default();
    transaction
        .set_topic_id(TopicId::from(1))
        .unwrap()
        .set_message("retry me")
        .unwrap()
        .set_node_account_ids(vec![AccountId::from(3), AccountId::from(4)])
        .unwrap();
    let response = transaction.execute(&client).await.unwrap();

    let total: usize = states
        .values()
        .map(|state| state.submitted.lock().len())
        .sum();
    assert_eq!(total, 3);
    assert!(states[&response.node_id].submitted.lock().len() == 2);

    // each node saw a body naming itself
    for (node_id, state) in &states {
        for body in state.bodies() {
            assert_eq!(body.node_account_id, Some(node_id.to_proto()));
        }
    }
}

#[tokio::test]
async fn test_precheck_rejection_is_final() {
    let (client, states) = start_network("rejected", 1);
    states[&AccountId::from(3)]
        .prechecks
        .lock()
        .push_back(ResponseCode::InvalidSignature);

    let mut transaction = TopicMessageSubmitTransaction::default();
    transaction
        .set_topic_id(TopicId::from(1))
        .unwrap()
        .set_message("bad")
        .unwrap();
    let err = transaction.execute(&client).await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::PrecheckStatus {
            status: ResponseCode::InvalidSignature,
            ..
        }
    ));
    assert_eq!(states[&AccountId::from(3)].submitted.lock().len(), 1);
}

// ============== File Append Tests ==============

#[tokio::test]
async fn test_file_append_waits_for_each_receipt() {
    let (client, states) = start_network("file-append", 1);

    let mut transaction = FileAppendTransaction::default();
    transaction
        .set_file_id(FileId::from(150))
        .unwrap()
        .set_contents(vec![9u8; 10_000])
        .unwrap();
    let responses = transaction.execute_all(&client).await.unwrap();
    assert_eq!(responses.len(), 3);

    let node = &states[&AccountId::from(3)];
    assert_eq!(*node.receipt_queries.lock(), 3);
    let sizes: Vec<usize> = node
        .bodies()
        .into_iter()
        .map(|body| match body.data {
            Some(Data::FileAppend(append)) => append.contents.len(),
            _ => panic!("unexpected body"),
        })
        .collect();
    assert_eq!(sizes, vec![4096, 4096, 1808]);

    let receipt = responses[2].get_receipt(&client).await.unwrap();
    assert_eq!(receipt.status, ResponseCode::Success);
}

#[tokio::test]
async fn test_file_append_last_chunk_rejection_fails() {
    let (client, states) = start_network("file-append-last", 1);
    let node = &states[&AccountId::from(3)];
    node.receipts
        .lock()
        .extend([ResponseCode::Success, ResponseCode::InvalidFileId]);

    let mut transaction = FileAppendTransaction::default();
    transaction
        .set_file_id(FileId::from(150))
        .unwrap()
        .set_contents(vec![4u8; 5_000])
        .unwrap();
    let err = transaction.execute_all(&client).await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::ReceiptStatus {
            status: ResponseCode::InvalidFileId,
            ..
        }
    ));
    assert_eq!(node.submitted.lock().len(), 2);
    assert_eq!(*node.receipt_queries.lock(), 2);
}

#[tokio::test]
async fn test_receipt_polls_until_final() {
    let (client, states) = start_network("receipt-poll", 1);
    let node = &states[&AccountId::from(3)];
    node.receipts.lock().extend([ResponseCode::Unknown, ResponseCode::Unknown]);

    let mut transaction = TopicMessageSubmitTransaction::default();
    transaction
        .set_topic_id(TopicId::from(1))
        .unwrap()
        .set_message("poll")
        .unwrap();
    let response = transaction.execute(&client).await.unwrap();
    let receipt = response.get_receipt(&client).await.unwrap();
    assert_eq!(receipt.status, ResponseCode::Success);
    assert_eq!(*node.receipt_queries.lock(), 3);
}

#[tokio::test]
async fn test_failed_receipt_surfaces_status() {
    let (client, states) = start_network("receipt-fail", 1);
    states[&AccountId::from(3)]
        .receipts
        .lock()
        .push_back(ResponseCode::InvalidTopicId);

    let mut transaction = TopicMessageSubmitTransaction::default();
    transaction
        .set_topic_id(TopicId::from(1))
        .unwrap()
        .set_message("fail")
        .unwrap();
    let response = transaction.execute(&client).await.unwrap();
    let err = response.get_receipt(&client).await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::ReceiptStatus {
            status: ResponseCode::InvalidTopicId,
            ..
        }
    ));
}

// ============== Lifecycle Tests ==============

#[tokio::test]
async fn test_close_after_traffic() {
    let (client, _states) = start_network("close", 2);

    let mut transaction = TopicMessageSubmitTransaction::default();
    transaction
        .set_topic_id(TopicId::from(1))
        .unwrap()
        .set_message("bye")
        .unwrap();
    transaction.execute(&client).await.unwrap();

    client
        .close_with_timeout(std::time::Duration::from_secs(5))
        .await
        .unwrap();
    assert!(client.consensus_network().pool().is_empty());
}
