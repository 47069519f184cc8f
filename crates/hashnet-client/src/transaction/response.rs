use std::fmt;

use hashnet_api::{AccountId, TransactionId};

use crate::client::Client;
use crate::error::Result;
use crate::receipt::{TransactionReceipt, TransactionReceiptQuery};

/// A node accepted a transaction for consensus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionResponse {
    /// Node that accepted the transaction
    pub node_id: AccountId,
    pub transaction_id: TransactionId,
    /// SHA-384 of the submitted signed transaction bytes
    pub transaction_hash: Vec<u8>,
    /// Whether [`TransactionResponse::get_receipt`] fails on a non-`SUCCESS` receipt
    pub validate_status: bool,
}

impl TransactionResponse {
    pub fn new(node_id: AccountId, transaction_id: TransactionId, transaction_hash: Vec<u8>) -> Self {
        Self {
            node_id,
            transaction_id,
            transaction_hash,
            validate_status: true,
        }
    }

    pub fn with_validate_status(mut self, validate_status: bool) -> Self {
        self.validate_status = validate_status;
        self
    }

    /// Receipt query pinned to the node that accepted the transaction.
    pub fn get_receipt_query(&self) -> TransactionReceiptQuery {
        let mut query = TransactionReceiptQuery::new(self.transaction_id);
        query.set_node_account_ids(vec![self.node_id]);
        query
    }

    pub async fn get_receipt(&self, client: &Client) -> Result<TransactionReceipt> {
        let receipt = self.get_receipt_query().execute(client).await?;
        if self.validate_status {
            return receipt.validate_status(self.transaction_id);
        }
        Ok(receipt)
    }

    pub fn get_receipt_blocking(&self, client: &Client) -> Result<TransactionReceipt> {
        client.block_on(self.get_receipt(client))?
    }
}

impl fmt::Display for TransactionResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} via node {} (hash {})",
            self.transaction_id,
            self.node_id,
            const_hex::encode(&self.transaction_hash)
        )
    }
}

#[cfg(test)]
mod tests {
    use hashnet_api::{ResponseCode, Timestamp};

    use super::*;
    use crate::error::ClientError;
    use crate::test_support::{ScriptedTransport, receipt_response, test_client};

    fn response() -> TransactionResponse {
        TransactionResponse::new(
            AccountId::from(4),
            TransactionId::with_valid_start(AccountId::from(1001), Timestamp::from_nanos(7)),
            vec![0xaa; 48],
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_receipt_validation() {
        let transport = ScriptedTransport::new();
        transport.push_query(Ok(receipt_response(ResponseCode::Ok, ResponseCode::FailBalance)));
        transport.push_query(Ok(receipt_response(ResponseCode::Ok, ResponseCode::FailBalance)));
        let client = test_client(transport.clone(), 3);

        let err = response().get_receipt(&client).await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::ReceiptStatus {
                status: ResponseCode::FailBalance,
                ..
            }
        ));

        let receipt = response()
            .with_validate_status(false)
            .get_receipt(&client)
            .await
            .unwrap();
        assert_eq!(receipt.status, ResponseCode::FailBalance);

        assert!(transport.queried().iter().all(|(node, _)| *node == AccountId::from(4)));
    }

    #[test]
    fn test_display() {
        let text = response().to_string();
        assert!(text.starts_with("0.0.1001@0.000000007 via node 0.0.4"));
    }
}
