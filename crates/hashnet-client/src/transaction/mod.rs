//! Transactions: freezing, signing and ordered submission
//!
//! A [`Transaction`] is built from a body template ([`TransactionData`]).
//! Freezing fixes the node list, the transaction ids and the chunk plan, and
//! materialises one signable variant per `(chunk, node)`. Execution submits
//! chunk 1 through chunk n strictly in order, each chunk running through the
//! retry engine on its own.

pub mod chunked;
pub mod data;
pub mod response;
pub mod signer;
pub mod signing;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use hashnet_api::proto::transaction_body::Data;
use hashnet_api::{AccountId, FileId, ResponseCode, TopicId, TransactionId, proto};
use prost::Message;
use tonic::Status;
use tracing::{debug, info};

use crate::client::Client;
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::execute::{self, Execute, ExecuteOptions, ExecutionState};
use crate::network::ConsensusNode;
use crate::transport::Transport;

pub use chunked::{ChunkData, ChunkLinkage, ChunkPlan, ChunkSlice, required_chunks};
pub use data::{FileAppendData, TopicMessageSubmitData, TransactionData};
pub use response::TransactionResponse;
pub use signer::{KeyKind, PublicKey, Signer};
pub use signing::{BodyTemplate, SigningMatrix, SigningVariant};

pub const DEFAULT_TRANSACTION_VALID_DURATION: Duration = Duration::from_secs(120);
pub const DEFAULT_MAX_TRANSACTION_FEE: u64 = 200_000_000;

pub type TopicMessageSubmitTransaction = Transaction<TopicMessageSubmitData>;
pub type FileAppendTransaction = Transaction<FileAppendData>;

/// Signatures of one chunk, by node and public key.
pub type SignatureMap = HashMap<AccountId, HashMap<PublicKey, Vec<u8>>>;

#[derive(Debug, Clone)]
struct Frozen {
    template: BodyTemplate,
    plan: ChunkPlan,
    matrix: SigningMatrix,
}

fn chunk_body<D: TransactionData>(data: &D, plan: &ChunkPlan, chunk: usize) -> Data {
    match data.chunk_data() {
        Some(chunks) => data.to_body_data(Some(&chunks.slice(chunk, plan))),
        None => data.to_body_data(None),
    }
}

/// A transaction of type `D`, mutable until frozen.
pub struct Transaction<D> {
    data: D,
    node_account_ids: Option<Vec<AccountId>>,
    transaction_id: Option<TransactionId>,
    max_transaction_fee: u64,
    transaction_valid_duration: Duration,
    transaction_memo: String,
    regenerate_transaction_id: Option<bool>,
    options: ExecuteOptions,
    signers: Vec<Arc<dyn Signer>>,
    frozen: Option<Frozen>,
}

impl<D: TransactionData + Default> Default for Transaction<D> {
    fn default() -> Self {
        Self::new(D::default())
    }
}

impl<D: fmt::Debug> fmt::Debug for Transaction<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transaction")
            .field("data", &self.data)
            .field("node_account_ids", &self.node_account_ids)
            .field("transaction_id", &self.transaction_id)
            .field("frozen", &self.frozen.is_some())
            .field("signers", &self.signers.len())
            .finish_non_exhaustive()
    }
}

impl<D: TransactionData> Transaction<D> {
    pub fn new(data: D) -> Self {
        Self {
            data,
            node_account_ids: None,
            transaction_id: None,
            max_transaction_fee: DEFAULT_MAX_TRANSACTION_FEE,
            transaction_valid_duration: DEFAULT_TRANSACTION_VALID_DURATION,
            transaction_memo: String::new(),
            regenerate_transaction_id: None,
            options: ExecuteOptions::default(),
            signers: Vec::new(),
            frozen: None,
        }
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen.is_some()
    }

    fn require_not_frozen(&self) -> Result<()> {
        if self.is_frozen() {
            return Err(ClientError::AlreadyFrozen);
        }
        Ok(())
    }

    fn frozen(&self) -> Result<&Frozen> {
        self.frozen.as_ref().ok_or(ClientError::FreezeRequired)
    }

    pub fn data(&self) -> &D {
        &self.data
    }

    pub fn data_mut(&mut self) -> Result<&mut D> {
        self.require_not_frozen()?;
        Ok(&mut self.data)
    }

    /// Explicit node ids, or the ones chosen at freeze time.
    pub fn node_account_ids(&self) -> Option<Vec<AccountId>> {
        match &self.frozen {
            Some(frozen) => Some(frozen.matrix.node_ids().to_vec()),
            None => self.node_account_ids.clone(),
        }
    }

    pub fn set_node_account_ids(&mut self, node_account_ids: Vec<AccountId>) -> Result<&mut Self> {
        self.require_not_frozen()?;
        self.node_account_ids = Some(node_account_ids);
        Ok(self)
    }

    /// Explicit transaction id, or the first chunk's id once frozen.
    pub fn transaction_id(&self) -> Option<TransactionId> {
        match &self.frozen {
            Some(frozen) => frozen.matrix.transaction_ids().first().copied(),
            None => self.transaction_id,
        }
    }

    pub fn set_transaction_id(&mut self, transaction_id: TransactionId) -> Result<&mut Self> {
        self.require_not_frozen()?;
        self.transaction_id = Some(transaction_id);
        Ok(self)
    }

    pub fn max_transaction_fee(&self) -> u64 {
        self.max_transaction_fee
    }

    pub fn set_max_transaction_fee(&mut self, fee: u64) -> Result<&mut Self> {
        self.require_not_frozen()?;
        self.max_transaction_fee = fee;
        Ok(self)
    }

    pub fn transaction_valid_duration(&self) -> Duration {
        self.transaction_valid_duration
    }

    pub fn set_transaction_valid_duration(&mut self, duration: Duration) -> Result<&mut Self> {
        self.require_not_frozen()?;
        self.transaction_valid_duration = duration;
        Ok(self)
    }

    pub fn transaction_memo(&self) -> &str {
        &self.transaction_memo
    }

    pub fn set_transaction_memo(&mut self, memo: impl Into<String>) -> Result<&mut Self> {
        self.require_not_frozen()?;
        self.transaction_memo = memo.into();
        Ok(self)
    }

    pub fn regenerate_transaction_id(&self) -> Option<bool> {
        self.regenerate_transaction_id
    }

    /// Overrides the client's default for regenerating expired ids.
    pub fn set_regenerate_transaction_id(&mut self, regenerate: bool) -> Result<&mut Self> {
        self.require_not_frozen()?;
        self.regenerate_transaction_id = Some(regenerate);
        Ok(self)
    }

    fn chunk_data_mut(&mut self) -> Result<&mut ChunkData> {
        self.require_not_frozen()?;
        self.data
            .chunk_data_mut()
            .ok_or_else(|| ClientError::config("transaction type has no chunkable payload"))
    }

    pub fn set_chunk_size(&mut self, chunk_size: usize) -> Result<&mut Self> {
        if chunk_size == 0 {
            return Err(ClientError::config("chunk size must be greater than 0"));
        }
        self.chunk_data_mut()?.chunk_size = chunk_size;
        Ok(self)
    }

    pub fn set_max_chunks(&mut self, max_chunks: usize) -> Result<&mut Self> {
        self.chunk_data_mut()?.max_chunks = max_chunks;
        Ok(self)
    }

    /// Per-request overrides; these may change after freezing.
    pub fn options_mut(&mut self) -> &mut ExecuteOptions {
        &mut self.options
    }

    /// Number of chunks, once frozen.
    pub fn required_chunks(&self) -> Option<usize> {
        self.frozen.as_ref().map(|frozen| frozen.plan.required_chunks)
    }

    /// Freeze with explicit node ids and transaction id.
    pub fn freeze(&mut self) -> Result<&mut Self> {
        self.freeze_inner(None)
    }

    /// Freeze, filling node ids and transaction id from `client`.
    pub fn freeze_with(&mut self, client: &Client) -> Result<&mut Self> {
        self.freeze_inner(Some(client))
    }

    fn freeze_inner(&mut self, client: Option<&Client>) -> Result<&mut Self> {
        if self.is_frozen() {
            return Ok(self);
        }

        let transaction_id = match (self.transaction_id, client.and_then(Client::operator)) {
            (Some(transaction_id), _) => transaction_id,
            (None, Some(operator)) => TransactionId::generate(operator.account_id),
            (None, None) => return Err(ClientError::MissingTransactionId),
        };

        let node_account_ids = match (&self.node_account_ids, client) {
            (Some(ids), _) if !ids.is_empty() => ids.clone(),
            (Some(_), _) | (None, None) => return Err(ClientError::MissingNodeAccountIds),
            (None, Some(client)) => {
                let ids = client.consensus_network().node_account_ids_for_execute()?;
                if ids.is_empty() {
                    return Err(ClientError::MissingNodeAccountIds);
                }
                ids
            }
        };

        let plan = match self.data.chunk_data() {
            Some(chunks) => ChunkPlan::new(chunks, transaction_id)?,
            None => ChunkPlan::single(transaction_id),
        };
        let template = BodyTemplate::new(
            self.max_transaction_fee,
            self.transaction_valid_duration,
            self.transaction_memo.clone(),
        );
        let matrix = SigningMatrix::build(
            &template,
            &node_account_ids,
            &plan.transaction_ids(),
            |chunk| chunk_body(&self.data, &plan, chunk),
        );

        debug!(
            "Froze transaction {} for {} node(s) in {} chunk(s)",
            transaction_id,
            node_account_ids.len(),
            plan.required_chunks
        );
        self.frozen = Some(Frozen {
            template,
            plan,
            matrix,
        });
        Ok(self)
    }

    /// Sign every variant with `signer` now, and again whenever the
    /// transaction id is regenerated.
    pub fn sign_with(&mut self, signer: Arc<dyn Signer>) -> Result<&mut Self> {
        let public_key = signer.public_key();
        if self
            .signers
            .iter()
            .any(|existing| existing.public_key() == public_key)
        {
            self.frozen()?;
            return Ok(self);
        }
        let frozen = self.frozen.as_mut().ok_or(ClientError::FreezeRequired)?;
        frozen.matrix.sign(std::slice::from_ref(&signer));
        self.signers.push(signer);
        Ok(self)
    }

    /// Sign with the client operator, freezing with the client first if needed.
    pub fn sign_with_operator(&mut self, client: &Client) -> Result<&mut Self> {
        let operator = client
            .operator()
            .ok_or_else(|| ClientError::config("client has no operator"))?;
        self.freeze_with(client)?;
        self.sign_with(operator.signer)
    }

    /// Attach a signature computed elsewhere. Only valid for a transaction
    /// with exactly one chunk and one node.
    pub fn add_signature(&mut self, public_key: PublicKey, signature: Vec<u8>) -> Result<&mut Self> {
        let frozen = self.frozen.as_mut().ok_or(ClientError::FreezeRequired)?;
        let matrix = &mut frozen.matrix;
        if matrix.chunks() != 1 {
            return Err(ClientError::MultipleChunks(matrix.chunks()));
        }
        if matrix.node_ids().len() != 1 {
            return Err(ClientError::RequireOneNode(matrix.node_ids().len()));
        }
        let (transaction_id, node_id) = (matrix.transaction_ids()[0], matrix.node_ids()[0]);
        matrix.add_signature_for(transaction_id, node_id, public_key, signature);
        Ok(self)
    }

    /// Attach a signature to the variant for `(transaction_id, node_id)`.
    pub fn add_signature_for(
        &mut self,
        public_key: PublicKey,
        signature: Vec<u8>,
        transaction_id: TransactionId,
        node_id: AccountId,
    ) -> Result<&mut Self> {
        let frozen = self.frozen.as_mut().ok_or(ClientError::FreezeRequired)?;
        if !frozen
            .matrix
            .add_signature_for(transaction_id, node_id, public_key, signature)
        {
            return Err(ClientError::config(format!(
                "no variant for transaction {} on node {}",
                transaction_id, node_id
            )));
        }
        Ok(self)
    }

    /// `(node, transaction id, body bytes)` of every variant, for external signing.
    pub fn signable_node_body_bytes(&self) -> Result<Vec<(AccountId, TransactionId, Vec<u8>)>> {
        Ok(self
            .frozen()?
            .matrix
            .variants()
            .iter()
            .map(|variant| (variant.node_id, variant.transaction_id, variant.body_bytes.clone()))
            .collect())
    }

    fn single_chunk(&self) -> Result<&SigningMatrix> {
        let matrix = &self.frozen()?.matrix;
        if matrix.chunks() != 1 {
            return Err(ClientError::MultipleChunks(matrix.chunks()));
        }
        Ok(matrix)
    }

    /// Hash of the transaction as sent to the first node.
    pub fn transaction_hash(&self) -> Result<Vec<u8>> {
        Ok(self.single_chunk()?.variant(0, 0).hash())
    }

    pub fn transaction_hash_per_node(&self) -> Result<HashMap<AccountId, Vec<u8>>> {
        Ok(hashes_of(self.single_chunk()?.row(0)))
    }

    /// One map of node hashes per chunk.
    pub fn all_transaction_hashes_per_node(&self) -> Result<Vec<HashMap<AccountId, Vec<u8>>>> {
        let matrix = &self.frozen()?.matrix;
        Ok((0..matrix.chunks())
            .map(|chunk| hashes_of(matrix.row(chunk)))
            .collect())
    }

    pub fn signatures(&self) -> Result<SignatureMap> {
        Ok(signatures_of(self.single_chunk()?.row(0)))
    }

    pub fn all_signatures(&self) -> Result<Vec<SignatureMap>> {
        let matrix = &self.frozen()?.matrix;
        Ok((0..matrix.chunks())
            .map(|chunk| signatures_of(matrix.row(chunk)))
            .collect())
    }

    /// Serialize every variant as a `TransactionList`.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.frozen()?.matrix.to_transaction_list().encode_to_vec())
    }

    /// Rebuild a frozen transaction from [`Transaction::to_bytes`] output.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let list = proto::TransactionList::decode(bytes)?;
        let mut variants = Vec::with_capacity(list.transaction_list.len());
        let mut bodies = Vec::with_capacity(list.transaction_list.len());
        for transaction in &list.transaction_list {
            let (variant, body) = SigningVariant::from_transaction(transaction)?;
            variants.push(variant);
            bodies.push(body);
        }

        let matrix = SigningMatrix::from_variants(variants)?;
        let width = matrix.node_ids().len();
        let first = &bodies[0];
        let chunk_bodies: Vec<Data> = bodies
            .iter()
            .step_by(width)
            .map(|body| {
                body.data
                    .clone()
                    .ok_or_else(|| ClientError::config("transaction body carries no data"))
            })
            .collect::<Result<_>>()?;
        let data = D::from_body_data(&chunk_bodies)?;

        let valid_duration = first
            .transaction_valid_duration
            .as_ref()
            .map(|duration| Duration::from_secs(duration.seconds.max(0) as u64))
            .unwrap_or(DEFAULT_TRANSACTION_VALID_DURATION);
        let template = BodyTemplate::new(first.transaction_fee, valid_duration, first.memo.clone());

        let initial_transaction_id = matrix.transaction_ids()[0];
        let plan = match data.chunk_data() {
            Some(chunks) => ChunkPlan {
                chunk_size: chunks.chunk_size,
                max_chunks: chunks.max_chunks,
                required_chunks: matrix.chunks(),
                initial_transaction_id,
            },
            None => ChunkPlan::single(initial_transaction_id),
        };

        let mut transaction = Self::new(data);
        transaction.max_transaction_fee = first.transaction_fee;
        transaction.transaction_valid_duration = valid_duration;
        transaction.transaction_memo = first.memo.clone();
        transaction.transaction_id = Some(initial_transaction_id);
        transaction.node_account_ids = Some(matrix.node_ids().to_vec());
        transaction.frozen = Some(Frozen {
            template,
            plan,
            matrix,
        });
        Ok(transaction)
    }

    /// Freeze with `client` if needed and add the operator's signature.
    fn prepare(&mut self, client: &Client) -> Result<()> {
        self.freeze_with(client)?;
        if let Some(operator) = client.operator() {
            self.sign_with(operator.signer)?;
        }
        Ok(())
    }

    /// Submit and return the first chunk's response.
    pub async fn execute(&mut self, client: &Client) -> Result<TransactionResponse> {
        self.execute_first(client, None).await
    }

    pub async fn execute_with_timeout(
        &mut self,
        client: &Client,
        timeout: Duration,
    ) -> Result<TransactionResponse> {
        self.execute_first(client, Some(timeout)).await
    }

    async fn execute_first(
        &mut self,
        client: &Client,
        timeout: Option<Duration>,
    ) -> Result<TransactionResponse> {
        let responses = self.execute_chunks(client, timeout).await?;
        responses
            .into_iter()
            .next()
            .ok_or_else(|| ClientError::config("transaction produced no chunks"))
    }

    /// Submit every chunk in order; one response per chunk.
    pub async fn execute_all(&mut self, client: &Client) -> Result<Vec<TransactionResponse>> {
        self.execute_chunks(client, None).await
    }

    pub async fn execute_all_with_timeout(
        &mut self,
        client: &Client,
        timeout: Duration,
    ) -> Result<Vec<TransactionResponse>> {
        self.execute_chunks(client, Some(timeout)).await
    }

    async fn execute_chunks(
        &mut self,
        client: &Client,
        timeout: Option<Duration>,
    ) -> Result<Vec<TransactionResponse>> {
        self.prepare(client)?;

        let explicit_transaction_id = self.transaction_id.is_some();
        let Self {
            data,
            regenerate_transaction_id,
            options,
            signers,
            frozen,
            ..
        } = self;
        let frozen = frozen.as_mut().ok_or(ClientError::FreezeRequired)?;
        let chunks = frozen.plan.required_chunks;
        let wait_for_receipt = data.wait_for_receipt();

        let mut responses = Vec::with_capacity(chunks);
        for chunk in 0..chunks {
            let mut execution = ChunkExecution {
                chunk,
                frozen: &mut *frozen,
                data: &*data,
                signers: signers.as_slice(),
                options: &*options,
                regenerate: *regenerate_transaction_id,
                explicit_transaction_id,
            };
            let response = execute::execute(client, &mut execution, timeout).await?;
            debug!(
                "Chunk {}/{} accepted by node {}",
                chunk + 1,
                chunks,
                response.node_id
            );

            // every chunk waits for its receipt, the last one included
            if wait_for_receipt {
                response.get_receipt(client).await?;
            }
            responses.push(response);
        }

        if chunks > 1 {
            info!("Submitted {} chunks of transaction {}", chunks, frozen.plan.initial_transaction_id);
        }
        Ok(responses)
    }

    /// [`Transaction::execute`] on the client's executor. Must not be called
    /// from inside an async runtime.
    pub fn execute_blocking(&mut self, client: &Client) -> Result<TransactionResponse> {
        client.block_on(self.execute(client))?
    }

    pub fn execute_all_blocking(&mut self, client: &Client) -> Result<Vec<TransactionResponse>> {
        client.block_on(self.execute_all(client))?
    }
}

fn hashes_of(row: &[SigningVariant]) -> HashMap<AccountId, Vec<u8>> {
    row.iter()
        .map(|variant| (variant.node_id, variant.hash()))
        .collect()
}

fn signatures_of(row: &[SigningVariant]) -> SignatureMap {
    row.iter()
        .map(|variant| {
            let signatures = variant.signatures.iter().cloned().collect();
            (variant.node_id, signatures)
        })
        .collect()
}

impl Transaction<TopicMessageSubmitData> {
    pub fn set_topic_id(&mut self, topic_id: TopicId) -> Result<&mut Self> {
        self.data_mut()?.topic_id = Some(topic_id);
        Ok(self)
    }

    pub fn set_message(&mut self, message: impl Into<Vec<u8>>) -> Result<&mut Self> {
        self.data_mut()?.chunks.data = message.into();
        Ok(self)
    }
}

impl Transaction<FileAppendData> {
    pub fn set_file_id(&mut self, file_id: FileId) -> Result<&mut Self> {
        self.data_mut()?.file_id = Some(file_id);
        Ok(self)
    }

    pub fn set_contents(&mut self, contents: impl Into<Vec<u8>>) -> Result<&mut Self> {
        self.data_mut()?.chunks.data = contents.into();
        Ok(self)
    }
}

/// One chunk of a frozen transaction, as seen by the retry engine.
struct ChunkExecution<'a, D> {
    chunk: usize,
    frozen: &'a mut Frozen,
    data: &'a D,
    signers: &'a [Arc<dyn Signer>],
    options: &'a ExecuteOptions,
    /// Per-transaction regeneration setting; `None` defers to the client
    regenerate: Option<bool>,
    explicit_transaction_id: bool,
}

impl<D: TransactionData> ChunkExecution<'_, D> {
    fn current_transaction_id(&self) -> TransactionId {
        self.frozen.matrix.transaction_ids()[self.chunk]
    }

    fn can_regenerate(&self, config: &ClientConfig) -> bool {
        !self.explicit_transaction_id
            && self
                .regenerate
                .unwrap_or(config.default_regenerate_transaction_id)
    }

    /// Swap in a fresh transaction id and re-sign.
    ///
    /// Regenerating the first chunk moves the whole plan, since later chunks
    /// link back to it. A later chunk only gets a fresh id of its own.
    fn regenerate_transaction_id(&mut self) {
        let expired = self.current_transaction_id();
        let fresh = TransactionId::generate(expired.account_id);
        let frozen = &mut *self.frozen;

        if self.chunk == 0 {
            frozen.plan.initial_transaction_id = fresh;
            for chunk in 0..frozen.plan.required_chunks {
                let body = chunk_body(self.data, &frozen.plan, chunk);
                let transaction_id = frozen.plan.transaction_id(chunk);
                frozen
                    .matrix
                    .regenerate_chunk(chunk, &frozen.template, transaction_id, body);
            }
        } else {
            let body = chunk_body(self.data, &frozen.plan, self.chunk);
            frozen
                .matrix
                .regenerate_chunk(self.chunk, &frozen.template, fresh, body);
        }
        frozen.matrix.sign(self.signers);
        info!("Transaction {} expired, regenerated as {}", expired, fresh);
    }
}

#[async_trait]
impl<D: TransactionData> Execute for ChunkExecution<'_, D> {
    type GrpcRequest = proto::Transaction;
    type GrpcResponse = proto::TransactionResponse;
    type Output = TransactionResponse;

    fn node_account_ids(&self) -> &[AccountId] {
        self.frozen.matrix.node_ids()
    }

    fn options(&self) -> &ExecuteOptions {
        self.options
    }

    fn transaction_id(&self) -> Option<TransactionId> {
        Some(self.current_transaction_id())
    }

    fn make_request(&self, node_index: usize) -> Result<proto::Transaction> {
        Ok(self
            .frozen
            .matrix
            .variant(self.chunk, node_index)
            .to_transaction())
    }

    async fn send(
        &self,
        transport: &dyn Transport,
        node: &ConsensusNode,
        request: proto::Transaction,
        timeout: Duration,
    ) -> std::result::Result<proto::TransactionResponse, Status> {
        transport
            .submit_transaction(node, self.data.method(), request, timeout)
            .await
    }

    fn response_status(
        &self,
        response: &proto::TransactionResponse,
    ) -> std::result::Result<ResponseCode, i32> {
        ResponseCode::from_code(response.node_transaction_precheck_code)
    }

    fn classify(
        &mut self,
        status: ResponseCode,
        _response: &proto::TransactionResponse,
        config: &ClientConfig,
    ) -> ExecutionState {
        match status {
            ResponseCode::Ok => ExecutionState::Success,
            ResponseCode::Busy
            | ResponseCode::PlatformNotActive
            | ResponseCode::PlatformTransactionNotCreated
            | ResponseCode::InvalidNodeAccount => ExecutionState::ServerError,
            ResponseCode::TransactionExpired if self.can_regenerate(config) => {
                self.regenerate_transaction_id();
                ExecutionState::Retry
            }
            _ => ExecutionState::RequestError,
        }
    }

    fn map_response(
        &self,
        _response: proto::TransactionResponse,
        node_id: AccountId,
        request: &proto::Transaction,
    ) -> Result<TransactionResponse> {
        Ok(TransactionResponse::new(
            node_id,
            self.current_transaction_id(),
            signing::transaction_hash(&request.signed_transaction_bytes),
        ))
    }
}
