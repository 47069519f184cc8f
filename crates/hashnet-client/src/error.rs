//! Client error types for the hashnet SDK

use hashnet_api::{EntityIdError, ResponseCode, TransactionId};

/// Error type for hashnet client operations
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("gRPC error: {0}")]
    Grpc(#[from] tonic::Status),

    #[error("transport error: {0}")]
    Transport(#[from] tonic::transport::Error),

    #[error("failed to decode protobuf: {0}")]
    Decode(#[from] prost::DecodeError),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    EntityId(#[from] EntityIdError),

    #[error("message data must not be empty")]
    EmptyPayload,

    #[error("message requires {required} chunks but max chunks is {max}")]
    TooManyChunks { required: usize, max: usize },

    #[error("transaction must be frozen first")]
    FreezeRequired,

    #[error("transaction is immutable; it has at least one signature or has been explicitly frozen")]
    AlreadyFrozen,

    #[error("a single value can not be returned for a transaction with {0} chunks")]
    MultipleChunks(usize),

    #[error("transaction requires exactly one node account id, found {0}")]
    RequireOneNode(usize),

    #[error("node account ids must be set or a client network provided")]
    MissingNodeAccountIds,

    #[error("transaction id must be set or a client operator provided")]
    MissingTransactionId,

    #[error("no healthy node was found")]
    NoHealthyNodes,

    #[error("node {0} is not part of the network")]
    UnknownNode(String),

    #[error("failed to connect to node {0}")]
    ConnectFailed(String),

    #[error("transaction {transaction_id:?} failed precheck with status {status}")]
    PrecheckStatus {
        status: ResponseCode,
        transaction_id: Option<TransactionId>,
    },

    #[error("node returned unrecognized status code {0}")]
    UnrecognizedStatus(i32),

    #[error("receipt for transaction {transaction_id} contained error status {status}")]
    ReceiptStatus {
        status: ResponseCode,
        transaction_id: TransactionId,
    },

    #[error("request timeout{}", display_last(.last_error))]
    Timeout { last_error: Option<Box<ClientError>> },

    #[error("exceeded maximum attempts for request{}", display_last(.last_error))]
    MaxAttemptsExceeded { last_error: Option<Box<ClientError>> },

    #[error("failed to properly shutdown all channels")]
    CloseTimeout,

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

fn display_last(last_error: &Option<Box<ClientError>>) -> String {
    match last_error {
        Some(err) => format!(" with last error: {err}"),
        None => String::new(),
    }
}

impl ClientError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Returns the last observed failure for exhausted-retry errors.
    pub fn last_error(&self) -> Option<&ClientError> {
        match self {
            Self::Timeout { last_error } | Self::MaxAttemptsExceeded { last_error } => {
                last_error.as_deref()
            }
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
