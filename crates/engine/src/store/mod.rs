//! The transaction store.
//!
//! [`TransactionStore`] runs the async commands against a [`TransactionApi`]
//! and reduces their results into a shared [`StoreState`]. Front-ends read
//! the state through [`TransactionStore::snapshot`] and the pure functions in
//! [`selectors`].
//!
//! Every command follows the same lifecycle: mark the slice as loading, call
//! the API with the lock released, then settle the result. Fetch results that
//! were overtaken by a newer fetch of the same kind are dropped.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;

use crate::{
    ApiError, NewMoneyRequest, NewScheduledTransaction, NewTransaction, ScheduledQuery,
    ScheduledStatus, ScheduledTransaction, ScheduledTransactionPatch, Transaction,
    TransactionApi, TransactionQuery, ValidationError,
};

use state::{Command, Outcome, Slice, StoreState, Ticket};

pub mod selectors;
pub mod state;

/// Store custom errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("scheduled transaction {id} is {status} and can no longer be cancelled")]
    NotCancellable { id: String, status: ScheduledStatus },
    #[error("scheduled transaction {id} is {status} and can no longer be edited")]
    NotEditable { id: String, status: ScheduledStatus },
    /// A newer command of the same kind finished first; this result was
    /// dropped.
    #[error("request superseded by a newer one")]
    Superseded,
}

pub type ResultStore<T> = Result<T, StoreError>;

pub struct TransactionStore<A: ?Sized> {
    api: Arc<A>,
    state: Arc<Mutex<StoreState>>,
}

impl<A: ?Sized> Clone for TransactionStore<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            state: Arc::clone(&self.state),
        }
    }
}

impl<A> TransactionStore<A>
where
    A: TransactionApi + ?Sized,
{
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            state: Arc::new(Mutex::new(StoreState::new())),
        }
    }

    /// The collaborator, for calls that do not go through the store
    /// (wallets, fee quotes).
    pub fn api(&self) -> &A {
        &self.api
    }

    /// A copy of the current state.
    pub async fn snapshot(&self) -> StoreState {
        self.state.lock().await.clone()
    }

    /// Runs `f` against the current state without cloning it.
    pub async fn read<R>(&self, f: impl FnOnce(&StoreState) -> R) -> R {
        let state = self.state.lock().await;
        f(&state)
    }

    async fn begin(&self, command: Command) -> Ticket {
        self.state.lock().await.begin(command)
    }

    /// Settles `ticket` with `result`, mapping the success value to the
    /// reducer input with `outcome`.
    async fn settle<T>(
        &self,
        ticket: Ticket,
        result: Result<T, ApiError>,
        outcome: impl FnOnce(&T) -> Outcome,
    ) -> ResultStore<T> {
        let reduced = match &result {
            Ok(value) => Ok(outcome(value)),
            Err(err) => Err(err.message.clone()),
        };
        let applied = self.state.lock().await.settle(ticket, reduced);
        if !applied {
            return Err(StoreError::Superseded);
        }
        result.map_err(StoreError::from)
    }

    /// Loads the transaction list. The server applies `query`.
    pub async fn fetch_transactions(
        &self,
        query: &TransactionQuery,
    ) -> ResultStore<Vec<Transaction>> {
        let ticket = self.begin(Command::FetchTransactions).await;
        let result = self.api.get_transactions(query).await;
        self.settle(ticket, result, |items| Outcome::Transactions(items.clone()))
            .await
    }

    /// Loads one transaction into the selection.
    pub async fn fetch_transaction_details(&self, id: &str) -> ResultStore<Transaction> {
        let ticket = self.begin(Command::FetchTransactionDetails).await;
        let result = self.api.get_transaction_details(id).await;
        self.settle(ticket, result, |tx| Outcome::TransactionDetails(tx.clone()))
            .await
    }

    pub async fn fetch_pending_transactions(&self) -> ResultStore<Vec<Transaction>> {
        let ticket = self.begin(Command::FetchPendingTransactions).await;
        let result = self.api.get_pending_transactions().await;
        self.settle(ticket, result, |items| {
            Outcome::PendingTransactions(items.clone())
        })
        .await
    }

    /// Sends money. The new transaction only appears in the lists once the
    /// server has accepted it.
    pub async fn create_transaction(&self, request: &NewTransaction) -> ResultStore<Transaction> {
        let ticket = self.begin(Command::CreateTransaction).await;
        let result = self.api.create_transaction(request).await;
        if let Ok(tx) = &result {
            tracing::info!("transaction {} created ({})", tx.id, tx.status);
        }
        self.settle(ticket, result, |tx| Outcome::TransactionCreated(tx.clone()))
            .await
    }

    /// Asks someone for money. Nothing is added to the local lists.
    pub async fn request_money(&self, request: &NewMoneyRequest) -> ResultStore<()> {
        let ticket = self.begin(Command::RequestMoney).await;
        let result = self.api.create_money_request(request).await;
        self.settle(ticket, result, |_| Outcome::MoneyRequested).await
    }

    pub async fn fetch_scheduled_transactions(
        &self,
        query: &ScheduledQuery,
    ) -> ResultStore<Vec<ScheduledTransaction>> {
        let ticket = self.begin(Command::FetchScheduledTransactions).await;
        let result = self.api.get_scheduled_transactions(query).await;
        self.settle(ticket, result, |items| Outcome::Scheduled(items.clone()))
            .await
    }

    pub async fn fetch_scheduled_transaction_details(
        &self,
        id: &str,
    ) -> ResultStore<ScheduledTransaction> {
        let ticket = self
            .begin(Command::FetchScheduledTransactionDetails)
            .await;
        let result = self.api.get_scheduled_transaction_details(id).await;
        self.settle(ticket, result, |tx| Outcome::ScheduledDetails(tx.clone()))
            .await
    }

    pub async fn create_scheduled_transaction(
        &self,
        request: &NewScheduledTransaction,
    ) -> ResultStore<ScheduledTransaction> {
        let ticket = self.begin(Command::CreateScheduledTransaction).await;
        let result = self.api.create_scheduled_transaction(request).await;
        if let Ok(tx) = &result {
            tracing::info!("scheduled transaction {} created", tx.id);
        }
        self.settle(ticket, result, |tx| Outcome::ScheduledCreated(tx.clone()))
            .await
    }

    /// Patches a pending schedule.
    ///
    /// A schedule known locally is checked first: it must still be PENDING
    /// and the patch must keep its recurrence consistent. Unknown ids go
    /// straight to the server.
    pub async fn update_scheduled_transaction(
        &self,
        id: &str,
        patch: &ScheduledTransactionPatch,
    ) -> ResultStore<ScheduledTransaction> {
        let ticket = {
            let mut state = self.state.lock().await;
            let check = match state.scheduled.find(id) {
                Some(current) if !current.is_editable() => Err(StoreError::NotEditable {
                    id: id.to_string(),
                    status: current.status,
                }),
                Some(current) => patch.check_against(current).map_err(StoreError::from),
                None => Ok(()),
            };
            if let Err(err) = check {
                state.record_error(Slice::Scheduled, err.to_string());
                return Err(err);
            }
            state.begin(Command::UpdateScheduledTransaction)
        };
        let result = self.api.update_scheduled_transaction(id, patch).await;
        self.settle(ticket, result, |tx| Outcome::ScheduledUpdated(tx.clone()))
            .await
    }

    /// Cancels a pending schedule and marks it CANCELLED locally.
    pub async fn cancel_scheduled_transaction(&self, id: &str) -> ResultStore<()> {
        let ticket = {
            let mut state = self.state.lock().await;
            let blocked = state
                .scheduled
                .find(id)
                .filter(|current| !current.is_editable())
                .map(|current| current.status);
            if let Some(status) = blocked {
                let err = StoreError::NotCancellable {
                    id: id.to_string(),
                    status,
                };
                state.record_error(Slice::Scheduled, err.to_string());
                return Err(err);
            }
            state.begin(Command::CancelScheduledTransaction)
        };
        let result = self.api.cancel_scheduled_transaction(id).await;
        if let Ok(cancelled) = &result {
            tracing::info!("scheduled transaction {} cancelled", cancelled.id);
        }
        let id = id.to_string();
        self.settle(ticket, result, |_| Outcome::ScheduledCancelled(id))
            .await
            .map(|_| ())
    }

    pub async fn clear_selected_transaction(&self) {
        self.state.lock().await.clear_selected_transaction();
    }

    pub async fn clear_selected_scheduled_transaction(&self) {
        self.state.lock().await.clear_selected_scheduled_transaction();
    }
}
