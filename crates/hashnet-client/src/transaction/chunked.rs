//! Splitting oversized payloads into ordered chunks

use std::ops::Range;

use hashnet_api::TransactionId;

use crate::error::{ClientError, Result};

/// Valid starts of consecutive chunks are this many nanoseconds apart.
pub const CHUNK_VALID_START_STEP_NANOS: i64 = 1;

/// Number of chunks `data_len` bytes need at `chunk_size` bytes each.
pub fn required_chunks(data_len: usize, chunk_size: usize, max_chunks: usize) -> Result<usize> {
    if data_len == 0 {
        return Err(ClientError::EmptyPayload);
    }
    if chunk_size == 0 {
        return Err(ClientError::config("chunk size must be greater than 0"));
    }

    let required = data_len.div_ceil(chunk_size);
    if required > max_chunks {
        return Err(ClientError::TooManyChunks {
            required,
            max: max_chunks,
        });
    }
    Ok(required)
}

/// Payload of a chunkable transaction plus its split limits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkData {
    pub data: Vec<u8>,
    pub chunk_size: usize,
    pub max_chunks: usize,
}

impl ChunkData {
    pub fn new(chunk_size: usize, max_chunks: usize) -> Self {
        Self {
            data: Vec::new(),
            chunk_size,
            max_chunks,
        }
    }

    pub fn required_chunks(&self) -> Result<usize> {
        required_chunks(self.data.len(), self.chunk_size, self.max_chunks)
    }

    pub(crate) fn range(&self, index: usize) -> Range<usize> {
        let start = (index * self.chunk_size).min(self.data.len());
        let end = (start + self.chunk_size).min(self.data.len());
        start..end
    }

    /// Chunk `index` (0-based) of a plan, with linkage when there is more than one.
    pub(crate) fn slice(&self, index: usize, plan: &ChunkPlan) -> ChunkSlice {
        ChunkSlice {
            payload: self.data[self.range(index)].to_vec(),
            linkage: plan.linkage(index),
        }
    }
}

/// Link from one chunk back to the first chunk of its sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkLinkage {
    pub initial_transaction_id: TransactionId,
    /// 1-based
    pub number: usize,
    pub total: usize,
}

/// The part of the payload one chunk carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkSlice {
    pub payload: Vec<u8>,
    pub linkage: Option<ChunkLinkage>,
}

/// How a payload was split when the transaction was frozen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkPlan {
    pub chunk_size: usize,
    pub max_chunks: usize,
    pub required_chunks: usize,
    pub initial_transaction_id: TransactionId,
}

impl ChunkPlan {
    pub fn new(data: &ChunkData, initial_transaction_id: TransactionId) -> Result<Self> {
        Ok(Self {
            chunk_size: data.chunk_size,
            max_chunks: data.max_chunks,
            required_chunks: data.required_chunks()?,
            initial_transaction_id,
        })
    }

    /// A plan for transactions without a chunkable payload.
    pub fn single(transaction_id: TransactionId) -> Self {
        Self {
            chunk_size: 0,
            max_chunks: 1,
            required_chunks: 1,
            initial_transaction_id: transaction_id,
        }
    }

    pub fn transaction_id(&self, index: usize) -> TransactionId {
        self.initial_transaction_id
            .with_offset(index as i64 * CHUNK_VALID_START_STEP_NANOS)
    }

    pub fn transaction_ids(&self) -> Vec<TransactionId> {
        (0..self.required_chunks)
            .map(|index| self.transaction_id(index))
            .collect()
    }

    pub fn linkage(&self, index: usize) -> Option<ChunkLinkage> {
        if self.required_chunks <= 1 {
            return None;
        }
        Some(ChunkLinkage {
            initial_transaction_id: self.initial_transaction_id,
            number: index + 1,
            total: self.required_chunks,
        })
    }
}
