//! The remote API the store talks to.
//!
//! `TransactionApi` is the only way state enters the client. Implementations
//! convert wire payloads into domain types before returning them, so a
//! malformed server response surfaces as an [`ApiError`] and never reaches
//! the store.

use async_trait::async_trait;
use thiserror::Error;

use crate::{
    FeeRequest, Money, NewMoneyRequest, NewScheduledTransaction, NewTransaction,
    ScheduledQuery, ScheduledTransaction, ScheduledTransactionPatch, Transaction,
    TransactionQuery, Wallet,
};

/// Failure of a remote call.
///
/// The contract is message-only: the store records `message` verbatim for
/// display.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ApiError {
    pub message: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<crate::EngineError> for ApiError {
    fn from(err: crate::EngineError) -> Self {
        Self::new(err.to_string())
    }
}

/// Confirmation returned by `cancel_scheduled_transaction`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelledScheduledTransaction {
    pub id: String,
}

#[async_trait]
pub trait TransactionApi: Send + Sync {
    async fn get_transactions(&self, query: &TransactionQuery) -> Result<Vec<Transaction>, ApiError>;

    async fn get_pending_transactions(&self) -> Result<Vec<Transaction>, ApiError>;

    async fn get_transaction_details(&self, id: &str) -> Result<Transaction, ApiError>;

    async fn create_transaction(&self, request: &NewTransaction) -> Result<Transaction, ApiError>;

    /// Advisory fee for a prospective transfer.
    async fn calculate_transaction_fee(&self, request: FeeRequest) -> Result<Money, ApiError>;

    async fn create_money_request(&self, request: &NewMoneyRequest) -> Result<(), ApiError>;

    async fn get_scheduled_transactions(
        &self,
        query: &ScheduledQuery,
    ) -> Result<Vec<ScheduledTransaction>, ApiError>;

    async fn get_scheduled_transaction_details(
        &self,
        id: &str,
    ) -> Result<ScheduledTransaction, ApiError>;

    async fn create_scheduled_transaction(
        &self,
        request: &NewScheduledTransaction,
    ) -> Result<ScheduledTransaction, ApiError>;

    async fn update_scheduled_transaction(
        &self,
        id: &str,
        patch: &ScheduledTransactionPatch,
    ) -> Result<ScheduledTransaction, ApiError>;

    async fn cancel_scheduled_transaction(
        &self,
        id: &str,
    ) -> Result<CancelledScheduledTransaction, ApiError>;

    async fn get_wallets(&self) -> Result<Vec<Wallet>, ApiError>;
}
