//! Per-(chunk, node) transaction variants and their signatures
//!
//! The serialized body embeds the target node's account id, so every node a
//! chunk may go to gets its own copy of the bytes. Each signature in a
//! variant is computed over that variant's own bytes.

use std::sync::Arc;
use std::time::Duration;

use hashnet_api::proto::transaction_body::Data;
use hashnet_api::{AccountId, TransactionId, proto};
use prost::Message;
use sha2::{Digest, Sha384};

use crate::error::{ClientError, Result};
use crate::transaction::signer::{PublicKey, Signer};

/// SHA-384 of a variant's signed transaction bytes.
pub fn transaction_hash(signed_transaction_bytes: &[u8]) -> Vec<u8> {
    Sha384::digest(signed_transaction_bytes).to_vec()
}

/// Transaction body with the fields every variant shares.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyTemplate {
    body: proto::TransactionBody,
}

impl BodyTemplate {
    pub fn new(max_transaction_fee: u64, valid_duration: Duration, memo: impl Into<String>) -> Self {
        Self {
            body: proto::TransactionBody {
                transaction_fee: max_transaction_fee,
                transaction_valid_duration: Some(proto::Duration {
                    seconds: valid_duration.as_secs() as i64,
                }),
                memo: memo.into(),
                ..Default::default()
            },
        }
    }

    pub fn set_transaction_id(&mut self, transaction_id: TransactionId) {
        self.body.transaction_id = Some(transaction_id.to_proto());
    }

    pub fn set_node_identity(&mut self, node_id: AccountId) {
        self.body.node_account_id = Some(node_id.to_proto());
    }

    pub fn set_chunk_payload(&mut self, data: Data) {
        self.body.data = Some(data);
    }

    pub fn serialize(&self) -> Vec<u8> {
        self.body.encode_to_vec()
    }
}

/// One signable copy of a chunk's body, addressed to one node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningVariant {
    pub transaction_id: TransactionId,
    pub node_id: AccountId,
    pub body_bytes: Vec<u8>,
    pub signatures: Vec<(PublicKey, Vec<u8>)>,
}

impl SigningVariant {
    pub fn has_signature(&self, public_key: &PublicKey) -> bool {
        self.signatures.iter().any(|(key, _)| key == public_key)
    }

    /// Adds the signature unless the key already signed this variant.
    pub fn add_signature(&mut self, public_key: PublicKey, signature: Vec<u8>) -> bool {
        if self.has_signature(&public_key) {
            return false;
        }
        self.signatures.push((public_key, signature));
        true
    }

    pub fn signed_transaction_bytes(&self) -> Vec<u8> {
        proto::SignedTransaction {
            body_bytes: self.body_bytes.clone(),
            sig_map: Some(proto::SignatureMap {
                sig_pair: self
                    .signatures
                    .iter()
                    .map(|(key, signature)| key.to_signature_pair(signature))
                    .collect(),
            }),
        }
        .encode_to_vec()
    }

    pub fn to_transaction(&self) -> proto::Transaction {
        proto::Transaction {
            signed_transaction_bytes: self.signed_transaction_bytes(),
        }
    }

    pub fn hash(&self) -> Vec<u8> {
        transaction_hash(&self.signed_transaction_bytes())
    }

    /// Decode a submitted transaction back into a variant and its body.
    pub fn from_transaction(
        transaction: &proto::Transaction,
    ) -> Result<(Self, proto::TransactionBody)> {
        let signed = proto::SignedTransaction::decode(transaction.signed_transaction_bytes.as_slice())?;
        let body = proto::TransactionBody::decode(signed.body_bytes.as_slice())?;

        let transaction_id = body
            .transaction_id
            .as_ref()
            .ok_or(ClientError::MissingTransactionId)?;
        let node_id = body
            .node_account_id
            .as_ref()
            .ok_or(ClientError::MissingNodeAccountIds)?;

        let signatures = signed
            .sig_map
            .iter()
            .flat_map(|map| map.sig_pair.iter())
            .filter_map(PublicKey::from_signature_pair)
            .collect();

        Ok((
            Self {
                transaction_id: TransactionId::from_proto(transaction_id)?,
                node_id: AccountId::from_proto(node_id),
                body_bytes: signed.body_bytes,
                signatures,
            },
            body,
        ))
    }
}

/// Every variant of a frozen transaction, chunk-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningMatrix {
    node_ids: Vec<AccountId>,
    transaction_ids: Vec<TransactionId>,
    variants: Vec<SigningVariant>,
}

fn build_row(
    template: &BodyTemplate,
    node_ids: &[AccountId],
    transaction_id: TransactionId,
    data: Data,
) -> Vec<SigningVariant> {
    let mut body = template.clone();
    body.set_transaction_id(transaction_id);
    body.set_chunk_payload(data);
    node_ids
        .iter()
        .map(|node_id| {
            body.set_node_identity(*node_id);
            SigningVariant {
                transaction_id,
                node_id: *node_id,
                body_bytes: body.serialize(),
                signatures: Vec::new(),
            }
        })
        .collect()
}

impl SigningMatrix {
    /// One variant per `(chunk, node)`; `chunk_data(i)` supplies chunk `i`'s body data.
    pub fn build(
        template: &BodyTemplate,
        node_ids: &[AccountId],
        transaction_ids: &[TransactionId],
        mut chunk_data: impl FnMut(usize) -> Data,
    ) -> Self {
        let variants = transaction_ids
            .iter()
            .enumerate()
            .flat_map(|(chunk, transaction_id)| {
                build_row(template, node_ids, *transaction_id, chunk_data(chunk))
            })
            .collect();

        Self {
            node_ids: node_ids.to_vec(),
            transaction_ids: transaction_ids.to_vec(),
            variants,
        }
    }

    /// Reassemble a matrix from variants listed chunk-major.
    ///
    /// Rejects lists that do not form a grid: every chunk must target the same
    /// nodes in the same order, and all variants of a chunk share one id.
    pub fn from_variants(variants: Vec<SigningVariant>) -> Result<Self> {
        let first = variants
            .first()
            .ok_or_else(|| ClientError::config("transaction list is empty"))?;
        let first_id = first.transaction_id;

        let node_ids: Vec<AccountId> = variants
            .iter()
            .take_while(|variant| variant.transaction_id == first_id)
            .map(|variant| variant.node_id)
            .collect();
        if variants.len() % node_ids.len() != 0 {
            return Err(ClientError::config(
                "transaction list does not cover every node for every chunk",
            ));
        }

        let mut transaction_ids = Vec::with_capacity(variants.len() / node_ids.len());
        for row in variants.chunks(node_ids.len()) {
            let transaction_id = row[0].transaction_id;
            let consistent = row
                .iter()
                .zip(&node_ids)
                .all(|(variant, node_id)| {
                    variant.transaction_id == transaction_id && variant.node_id == *node_id
                });
            if !consistent || transaction_ids.contains(&transaction_id) {
                return Err(ClientError::config(
                    "transaction list does not form a consistent chunk/node grid",
                ));
            }
            transaction_ids.push(transaction_id);
        }

        Ok(Self {
            node_ids,
            transaction_ids,
            variants,
        })
    }

    pub fn chunks(&self) -> usize {
        self.transaction_ids.len()
    }

    pub fn node_ids(&self) -> &[AccountId] {
        &self.node_ids
    }

    pub fn transaction_ids(&self) -> &[TransactionId] {
        &self.transaction_ids
    }

    pub fn variants(&self) -> &[SigningVariant] {
        &self.variants
    }

    pub fn row(&self, chunk: usize) -> &[SigningVariant] {
        let width = self.node_ids.len();
        &self.variants[chunk * width..(chunk + 1) * width]
    }

    pub fn variant(&self, chunk: usize, node: usize) -> &SigningVariant {
        &self.variants[chunk * self.node_ids.len() + node]
    }

    /// Sign every variant with each signer that has not signed it yet.
    pub fn sign(&mut self, signers: &[Arc<dyn Signer>]) {
        for signer in signers {
            let public_key = signer.public_key();
            for variant in &mut self.variants {
                if variant.has_signature(&public_key) {
                    continue;
                }
                let signature = signer.sign(&variant.body_bytes);
                variant.signatures.push((public_key.clone(), signature));
            }
        }
    }

    /// Attach a signature computed elsewhere to the variant for
    /// `(transaction_id, node_id)`. Returns `false` when no variant matches.
    pub fn add_signature_for(
        &mut self,
        transaction_id: TransactionId,
        node_id: AccountId,
        public_key: PublicKey,
        signature: Vec<u8>,
    ) -> bool {
        match self
            .variants
            .iter_mut()
            .find(|variant| variant.transaction_id == transaction_id && variant.node_id == node_id)
        {
            Some(variant) => {
                variant.add_signature(public_key, signature);
                true
            }
            None => false,
        }
    }

    /// Rebuild chunk `chunk` for a new transaction id. Its signatures are dropped.
    pub fn regenerate_chunk(
        &mut self,
        chunk: usize,
        template: &BodyTemplate,
        transaction_id: TransactionId,
        data: Data,
    ) {
        let width = self.node_ids.len();
        let row = build_row(template, &self.node_ids, transaction_id, data);
        self.variants
            .splice(chunk * width..(chunk + 1) * width, row);
        self.transaction_ids[chunk] = transaction_id;
    }

    /// `proto::TransactionList` of every variant, chunk-major.
    pub fn to_transaction_list(&self) -> proto::TransactionList {
        proto::TransactionList {
            transaction_list: self
                .variants
                .iter()
                .map(SigningVariant::to_transaction)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use hashnet_api::{Timestamp, TopicId};

    use super::*;

    struct FixedSigner(u8);

    impl Signer for FixedSigner {
        fn public_key(&self) -> PublicKey {
            PublicKey::ed25519(vec![self.0; 32])
        }

        fn sign(&self, message: &[u8]) -> Vec<u8> {
            // deterministic stand-in: key byte followed by the message hash
            let mut signature = vec![self.0];
            signature.extend(Sha384::digest(message));
            signature
        }
    }

    fn ids(count: i64) -> Vec<TransactionId> {
        let base = TransactionId::with_valid_start(AccountId::from(2), Timestamp::from_nanos(1_000));
        (0..count).map(|offset| base.with_offset(offset)).collect()
    }

    fn data(chunk: usize) -> Data {
        Data::ConsensusSubmitMessage(proto::ConsensusSubmitMessageTransactionBody {
            topic_id: Some(TopicId::from(5).to_proto()),
            message: vec![chunk as u8; 4],
            chunk_info: None,
        })
    }

    fn matrix(chunks: i64, nodes: &[u64]) -> SigningMatrix {
        let template = BodyTemplate::new(100, Duration::from_secs(120), "memo");
        let node_ids: Vec<AccountId> = nodes.iter().map(|n| AccountId::from(*n)).collect();
        SigningMatrix::build(&template, &node_ids, &ids(chunks), data)
    }

    #[test]
    fn test_variant_per_chunk_and_node() {
        let matrix = matrix(3, &[3, 4]);
        assert_eq!(matrix.variants().len(), 6);
        assert_eq!(matrix.chunks(), 3);
        assert_eq!(matrix.variant(2, 1).node_id, AccountId::from(4));
        assert_eq!(matrix.variant(2, 1).transaction_id, ids(3)[2]);

        // the node id is part of the body, so bytes differ per node
        assert_ne!(matrix.variant(0, 0).body_bytes, matrix.variant(0, 1).body_bytes);
        let body = proto::TransactionBody::decode(matrix.variant(1, 0).body_bytes.as_slice()).unwrap();
        assert_eq!(body.memo, "memo");
        assert_eq!(body.node_account_id, Some(AccountId::from(3).to_proto()));
    }

    #[test]
    fn test_signatures_follow_variant_bytes() {
        let mut matrix = matrix(2, &[3, 4]);
        let signers: Vec<Arc<dyn Signer>> = vec![Arc::new(FixedSigner(1)), Arc::new(FixedSigner(2))];
        matrix.sign(&signers);
        matrix.sign(&signers);

        for variant in matrix.variants() {
            assert_eq!(variant.signatures.len(), 2);
            let expected = FixedSigner(1).sign(&variant.body_bytes);
            assert_eq!(variant.signatures[0].1, expected);
        }
        assert_ne!(
            matrix.variant(0, 0).signatures[0].1,
            matrix.variant(0, 1).signatures[0].1
        );
    }

    #[test]
    fn test_regenerate_chunk_drops_signatures() {
        let mut matrix = matrix(2, &[3, 4]);
        let signers: Vec<Arc<dyn Signer>> = vec![Arc::new(FixedSigner(1))];
        matrix.sign(&signers);

        let fresh = ids(10)[9];
        let template = BodyTemplate::new(100, Duration::from_secs(120), "memo");
        matrix.regenerate_chunk(1, &template, fresh, data(1));
        assert_eq!(matrix.transaction_ids()[1], fresh);
        assert!(matrix.row(1).iter().all(|variant| variant.signatures.is_empty()));
        assert!(matrix.row(0).iter().all(|variant| variant.signatures.len() == 1));
    }

    #[test]
    fn test_transaction_round_trip_keeps_signatures() {
        let mut matrix = matrix(2, &[3, 4]);
        matrix.sign(&[Arc::new(FixedSigner(7)) as Arc<dyn Signer>]);

        let variants = matrix
            .to_transaction_list()
            .transaction_list
            .iter()
            .map(|transaction| SigningVariant::from_transaction(transaction).map(|(variant, _)| variant))
            .collect::<Result<Vec<_>>>()
            .unwrap();
        let rebuilt = SigningMatrix::from_variants(variants).unwrap();
        assert_eq!(rebuilt, matrix);
    }

    #[test]
    fn test_from_variants_rejects_ragged_grid() {
        let matrix = matrix(2, &[3, 4]);
        let mut variants = matrix.variants().to_vec();
        variants.pop();
        assert!(SigningMatrix::from_variants(variants).is_err());

        let mut variants = matrix.variants().to_vec();
        variants.swap(2, 3);
        assert!(SigningMatrix::from_variants(variants).is_err());

        assert!(SigningMatrix::from_variants(Vec::new()).is_err());
    }

    #[test]
    fn test_hash_is_sha384_of_signed_bytes() {
        let matrix = matrix(1, &[3]);
        let variant = matrix.variant(0, 0);
        assert_eq!(variant.hash().len(), 48);
        assert_eq!(variant.hash(), transaction_hash(&variant.signed_transaction_bytes()));
    }
}
