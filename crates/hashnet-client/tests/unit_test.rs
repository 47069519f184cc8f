//! Hashnet Client Unit Tests
//!
//! Tests of the public API that need no node to talk to.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use hashnet_client::network::NetworkSettings;
use hashnet_client::transaction::{ChunkData, ChunkPlan, FileAppendData, required_chunks};
use hashnet_client::{
    AccountId, Client, ClientConfig, ClientError, ConsensusNetwork, FileAppendTransaction,
    LedgerId, MetricsMonitor, NodeAddress, PublicKey, Signer, Timestamp, TopicId,
    TopicMessageSubmitTransaction, Transaction, TransactionId,
};

struct StaticSigner;

impl Signer for StaticSigner {
    fn public_key(&self) -> PublicKey {
        PublicKey::ed25519(vec![7; 32])
    }

    fn sign(&self, message: &[u8]) -> Vec<u8> {
        message.iter().rev().copied().take(64).collect()
    }
}

fn transaction_id() -> TransactionId {
    TransactionId::with_valid_start(AccountId::from(1001), Timestamp::from_nanos(1_000_000_000))
}

// ============== Configuration Tests ==============

#[test]
fn test_config_from_toml() {
    let config = ClientConfig::from_toml_str(
        r#"
        mirror_network = ["127.0.0.1:5600"]
        ledger_id = "testnet"
        max_attempts = 4
        min_node_backoff_ms = 100
        max_node_backoff_ms = 1000

        [network]
        "127.0.0.1:50211" = "0.0.3"
        "127.0.0.1:50212" = "0.0.4"
        "#,
    )
    .unwrap();
    assert_eq!(config.max_attempts, 4);
    assert_eq!(config.min_node_backoff(), Duration::from_millis(100));

    let client = Client::from_config(config).unwrap();
    assert_eq!(client.network().len(), 2);
    assert_eq!(client.consensus_network().ledger_id(), Some(LedgerId::Testnet));
    assert_eq!(client.mirror_network_addresses(), vec!["127.0.0.1:5600".to_string()]);
}

#[test]
fn test_config_rejects_bad_values() {
    assert!(ClientConfig::from_toml_str("max_attempts = 0").is_err());
    assert!(ClientConfig::from_toml_str("[network]\n\"nohost\" = \"0.0.3\"").is_err());
    assert!(ClientConfig::from_toml_str("[network]\n\"127.0.0.1:1\" = \"zero\"").is_err());
    assert!(ClientConfig::from_toml_str("not toml at all =").is_err());
}

#[test]
fn test_config_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("client.toml");
    let config = ClientConfig::new(HashMap::from([(
        "127.0.0.1:50211".to_string(),
        "0.0.3".to_string(),
    )]))
    .with_max_attempts(7);
    std::fs::write(&path, toml::to_string(&config).unwrap()).unwrap();

    let client = Client::from_config_file(&path).unwrap();
    assert_eq!(client.config().max_attempts, 7);
    assert_eq!(client.network()["127.0.0.1:50211"], AccountId::from(3));
}

// ============== Network Tests ==============

#[test]
fn test_node_address_parsing() {
    let address: NodeAddress = "node.example.com:50212".parse().unwrap();
    assert_eq!(address.host(), Some("node.example.com"));
    assert_eq!(address.port(), Some(50212));
    assert!(address.is_transport_security());

    let address: NodeAddress = "in-process:local".parse().unwrap();
    assert!(address.is_in_process());
    assert_eq!(address.to_string(), "in-process:local");

    assert!("missing-port".parse::<NodeAddress>().is_err());
}

#[test]
fn test_ledger_id() {
    assert_eq!("mainnet".parse::<LedgerId>().unwrap(), LedgerId::Mainnet);
    assert_eq!(LedgerId::Previewnet.to_bytes(), vec![2]);
    assert_eq!(LedgerId::from_bytes(&[1]), LedgerId::Testnet);
    assert_eq!(LedgerId::from_bytes(&[9, 9]), LedgerId::Other(vec![9, 9]));
}

#[test]
fn test_node_count_for_execute() {
    let network = ConsensusNetwork::new(NetworkSettings::default());
    assert!(network.node_account_ids_for_execute().is_err());

    let config = ClientConfig::new(
        (3..10)
            .map(|i| (format!("127.0.0.1:{}", 50000 + i), format!("0.0.{}", i)))
            .collect(),
    );
    let client = Client::from_config(config).unwrap();
    // a third of seven nodes, rounded up
    assert_eq!(client.consensus_network().node_account_ids_for_execute().unwrap().len(), 3);

    client.consensus_network().set_max_nodes_per_request(Some(5)).unwrap();
    assert_eq!(client.consensus_network().node_account_ids_for_execute().unwrap().len(), 5);

    assert!(matches!(
        client.consensus_network().set_max_nodes_per_request(Some(0)),
        Err(ClientError::Config(_))
    ));
    assert_eq!(client.consensus_network().max_nodes_per_request(), Some(5));
}

// ============== Chunking Tests ==============

#[test]
fn test_required_chunks() {
    assert_eq!(required_chunks(1, 1024, 20).unwrap(), 1);
    assert_eq!(required_chunks(1024, 1024, 20).unwrap(), 1);
    assert_eq!(required_chunks(1025, 1024, 20).unwrap(), 2);
    assert!(matches!(required_chunks(0, 1024, 20), Err(ClientError::EmptyPayload)));
    assert!(matches!(
        required_chunks(20 * 1024 + 1, 1024, 20),
        Err(ClientError::TooManyChunks { required: 21, max: 20 })
    ));
}

#[test]
fn test_chunk_plan_ids_are_consecutive() {
    let mut data = ChunkData::new(10, 5);
    data.data = vec![0; 45];
    let plan = ChunkPlan::new(&data, transaction_id()).unwrap();
    assert_eq!(plan.required_chunks, 5);

    let ids = plan.transaction_ids();
    for window in ids.windows(2) {
        assert_eq!(window[1], window[0].with_offset(1));
    }
    assert_eq!(plan.linkage(4).unwrap().number, 5);
}

// ============== Transaction Tests ==============

#[test]
fn test_freeze_sign_and_serialize() {
    let mut transaction = TopicMessageSubmitTransaction::default();
    transaction
        .set_topic_id(TopicId::from(10))
        .unwrap()
        .set_message(vec![1u8; 1500])
        .unwrap()
        .set_transaction_id(transaction_id())
        .unwrap()
        .set_node_account_ids(vec![AccountId::from(3), AccountId::from(4), AccountId::from(5)])
        .unwrap()
        .freeze()
        .unwrap()
        .sign_with(Arc::new(StaticSigner))
        .unwrap();

    assert_eq!(transaction.required_chunks(), Some(2));
    assert_eq!(transaction.signable_node_body_bytes().unwrap().len(), 6);

    let hashes = transaction.all_transaction_hashes_per_node().unwrap();
    assert_eq!(hashes.len(), 2);
    assert_eq!(hashes[1].len(), 3);

    let bytes = transaction.to_bytes().unwrap();
    let restored = TopicMessageSubmitTransaction::from_bytes(&bytes).unwrap();
    assert_eq!(restored.transaction_id(), Some(transaction_id()));
    assert_eq!(restored.node_account_ids().unwrap().len(), 3);
    assert_eq!(
        restored.all_transaction_hashes_per_node().unwrap(),
        transaction.all_transaction_hashes_per_node().unwrap()
    );
}

#[test]
fn test_frozen_transaction_is_immutable() {
    let mut transaction = FileAppendTransaction::new(FileAppendData::default());
    transaction
        .set_contents(vec![3u8; 100])
        .unwrap()
        .set_transaction_id(transaction_id())
        .unwrap()
        .set_node_account_ids(vec![AccountId::from(3)])
        .unwrap()
        .freeze()
        .unwrap();

    assert!(matches!(
        transaction.set_max_transaction_fee(1),
        Err(ClientError::AlreadyFrozen)
    ));
    assert!(matches!(
        transaction.set_contents(vec![1]),
        Err(ClientError::AlreadyFrozen)
    ));

    transaction
        .add_signature(PublicKey::ed25519(vec![1; 32]), vec![2; 64])
        .unwrap();
    let signatures = transaction.signatures().unwrap();
    assert_eq!(signatures[&AccountId::from(3)].len(), 1);
}

#[test]
fn test_unfrozen_transaction_needs_freeze() {
    let transaction: Transaction<FileAppendData> = Transaction::default();
    assert!(matches!(transaction.to_bytes(), Err(ClientError::FreezeRequired)));
    assert!(matches!(
        transaction.transaction_hash(),
        Err(ClientError::FreezeRequired)
    ));
}

// ============== Metrics Tests ==============

#[test]
fn test_metrics_gather() {
    let metrics = MetricsMonitor::new().unwrap();
    metrics.observe_request("0.0.3", "success", Duration::from_millis(3));
    let text = metrics.gather();
    assert!(text.contains("hashnet_request_latency_seconds"));
}
