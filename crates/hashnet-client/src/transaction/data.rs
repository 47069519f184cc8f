//! Body templates for the transaction types this client submits

use hashnet_api::proto::transaction_body::Data;
use hashnet_api::{FileId, TopicId, proto};

use crate::error::{ClientError, Result};
use crate::transaction::chunked::{ChunkData, ChunkSlice};
use crate::transport::GrpcMethod;

pub const TOPIC_MESSAGE_CHUNK_SIZE: usize = 1024;
pub const FILE_APPEND_CHUNK_SIZE: usize = 4096;
pub const DEFAULT_MAX_CHUNKS: usize = 20;

/// Maps a concrete operation onto the body of a transaction.
pub trait TransactionData: Clone + Send + Sync + 'static {
    fn method(&self) -> GrpcMethod;

    /// The chunkable payload, for types that have one.
    fn chunk_data(&self) -> Option<&ChunkData> {
        None
    }

    fn chunk_data_mut(&mut self) -> Option<&mut ChunkData> {
        None
    }

    /// Whether chunk `i` must reach consensus before chunk `i + 1` is sent.
    fn wait_for_receipt(&self) -> bool {
        false
    }

    /// Body data carrying `chunk`, or the whole operation when not chunked.
    fn to_body_data(&self, chunk: Option<&ChunkSlice>) -> Data;

    /// Rebuild the operation from the bodies of all its chunks, in order.
    fn from_body_data(bodies: &[Data]) -> Result<Self>;
}

/// Restore a payload that was split into `bodies.len()` chunks.
fn rejoin(parts: Vec<Vec<u8>>, default_chunk_size: usize) -> ChunkData {
    let chunk_size = match parts.as_slice() {
        [first, _, ..] => first.len(),
        _ => default_chunk_size,
    };
    ChunkData {
        max_chunks: parts.len().max(DEFAULT_MAX_CHUNKS),
        data: parts.concat(),
        chunk_size,
    }
}

/// Message submitted to a consensus topic, split across chunks linked to
/// the first one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicMessageSubmitData {
    pub topic_id: Option<TopicId>,
    pub chunks: ChunkData,
}

impl Default for TopicMessageSubmitData {
    fn default() -> Self {
        Self {
            topic_id: None,
            chunks: ChunkData::new(TOPIC_MESSAGE_CHUNK_SIZE, DEFAULT_MAX_CHUNKS),
        }
    }
}

impl TopicMessageSubmitData {
    pub fn new(topic_id: TopicId, message: impl Into<Vec<u8>>) -> Self {
        let mut data = Self {
            topic_id: Some(topic_id),
            ..Default::default()
        };
        data.chunks.data = message.into();
        data
    }

    pub fn message(&self) -> &[u8] {
        &self.chunks.data
    }
}

impl TransactionData for TopicMessageSubmitData {
    fn method(&self) -> GrpcMethod {
        GrpcMethod::SubmitMessage
    }

    fn chunk_data(&self) -> Option<&ChunkData> {
        Some(&self.chunks)
    }

    fn chunk_data_mut(&mut self) -> Option<&mut ChunkData> {
        Some(&mut self.chunks)
    }

    fn to_body_data(&self, chunk: Option<&ChunkSlice>) -> Data {
        let (message, chunk_info) = match chunk {
            Some(slice) => (
                slice.payload.clone(),
                slice.linkage.map(|linkage| proto::ConsensusMessageChunkInfo {
                    initial_transaction_id: Some(linkage.initial_transaction_id.to_proto()),
                    total: linkage.total as i32,
                    number: linkage.number as i32,
                }),
            ),
            None => (self.chunks.data.clone(), None),
        };
        Data::ConsensusSubmitMessage(proto::ConsensusSubmitMessageTransactionBody {
            topic_id: self.topic_id.map(|id| id.to_proto()),
            message,
            chunk_info,
        })
    }

    fn from_body_data(bodies: &[Data]) -> Result<Self> {
        let mut topic_id = None;
        let mut parts = Vec::with_capacity(bodies.len());
        for body in bodies {
            let Data::ConsensusSubmitMessage(body) = body else {
                return Err(ClientError::config(
                    "expected a consensus submit message body",
                ));
            };
            topic_id = body.topic_id.as_ref().map(TopicId::from_proto);
            parts.push(body.message.clone());
        }
        Ok(Self {
            topic_id,
            chunks: rejoin(parts, TOPIC_MESSAGE_CHUNK_SIZE),
        })
    }
}

/// Contents appended to a file. Chunks carry no linkage on the wire, so each
/// one must reach consensus before the next is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAppendData {
    pub file_id: Option<FileId>,
    pub chunks: ChunkData,
}

impl Default for FileAppendData {
    fn default() -> Self {
        Self {
            file_id: None,
            chunks: ChunkData::new(FILE_APPEND_CHUNK_SIZE, DEFAULT_MAX_CHUNKS),
        }
    }
}

impl FileAppendData {
    pub fn new(file_id: FileId, contents: impl Into<Vec<u8>>) -> Self {
        let mut data = Self {
            file_id: Some(file_id),
            ..Default::default()
        };
        data.chunks.data = contents.into();
        data
    }

    pub fn contents(&self) -> &[u8] {
        &self.chunks.data
    }
}

impl TransactionData for FileAppendData {
    fn method(&self) -> GrpcMethod {
        GrpcMethod::AppendContent
    }

    fn chunk_data(&self) -> Option<&ChunkData> {
        Some(&self.chunks)
    }

    fn chunk_data_mut(&mut self) -> Option<&mut ChunkData> {
        Some(&mut self.chunks)
    }

    fn wait_for_receipt(&self) -> bool {
        true
    }

    fn to_body_data(&self, chunk: Option<&ChunkSlice>) -> Data {
        let contents = match chunk {
            Some(slice) => slice.payload.clone(),
            None => self.chunks.data.clone(),
        };
        Data::FileAppend(proto::FileAppendTransactionBody {
            file_id: self.file_id.map(|id| id.to_proto()),
            contents,
        })
    }

    fn from_body_data(bodies: &[Data]) -> Result<Self> {
        let mut file_id = None;
        let mut parts = Vec::with_capacity(bodies.len());
        for body in bodies {
            let Data::FileAppend(body) = body else {
                return Err(ClientError::config("expected a file append body"));
            };
            file_id = body.file_id.as_ref().map(FileId::from_proto);
            parts.push(body.contents.clone());
        }
        Ok(Self {
            file_id,
            chunks: rejoin(parts, FILE_APPEND_CHUNK_SIZE),
        })
    }
}
