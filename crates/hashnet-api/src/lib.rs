//! Hashnet API - wire schema and identity model
//!
//! This crate provides:
//! - Protobuf messages and gRPC service stubs for consensus nodes (`proto`,
//!   generated from `proto/hashnet.proto`)
//! - The response code enumeration returned by prechecks and receipts
//! - Entity and transaction identifiers

pub mod model;
pub mod proto;
pub mod status;

pub use model::{AccountId, EntityIdError, FileId, Timestamp, TopicId, TransactionId};
pub use status::ResponseCode;
