//! Hashnet Client - Rust SDK for a replicated node network
//!
//! This crate provides:
//! - Consensus and mirror node pools with per-node backoff and readmission
//! - A retry engine that fails over between nodes until a request succeeds
//! - Transactions frozen and signed once per target node, split into
//!   ordered chunks when the payload is large
//! - Receipt queries that poll until a transaction reaches consensus
//! - TLS with address-book certificate pinning, and an in-process transport
//! - Prometheus metrics and TOML configuration

pub mod client;
pub mod config;
pub mod error;
pub mod execute;
pub mod metrics;
pub mod network;
pub mod receipt;
pub mod transaction;
pub mod transport;

#[cfg(test)]
mod test_support;

pub use client::{Client, ClientBuilder, Operator};
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use execute::ExecuteOptions;
pub use metrics::MetricsMonitor;
pub use network::{ConsensusNetwork, LedgerId, MirrorNetwork, NodeAddress};
pub use receipt::{ReceiptOutcome, TransactionReceipt, TransactionReceiptQuery};
pub use transaction::{
    FileAppendTransaction, PublicKey, Signer, TopicMessageSubmitTransaction, Transaction,
    TransactionResponse,
};
pub use transport::{GrpcMethod, GrpcTransport, Transport};

pub use hashnet_api::{AccountId, FileId, ResponseCode, Timestamp, TopicId, TransactionId};
