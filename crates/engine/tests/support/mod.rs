#![allow(dead_code)]

use std::{
    collections::{HashMap, VecDeque},
    sync::Mutex,
};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use tokio::sync::oneshot;

use engine::{
    ApiError, CancelledScheduledTransaction, Currency, Destination, FeeRequest, Money,
    NewMoneyRequest, NewScheduledTransaction, NewTransaction, Recurrence, RecipientInfo,
    ScheduledQuery, ScheduledStatus, ScheduledTransaction, ScheduledTransactionPatch,
    Transaction, TransactionApi, TransactionQuery, TransactionStatus, TransactionType, Wallet,
};

pub fn at(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 11, day, 9, 0, 0).unwrap()
}

pub fn tx(id: &str) -> Transaction {
    Transaction {
        id: id.to_string(),
        amount: Money::new(1000),
        currency: Currency::EUR,
        kind: TransactionType::Debit,
        status: TransactionStatus::Completed,
        description: None,
        source_wallet_id: None,
        destination_wallet_id: None,
        recipient: None,
        created_at: at(1),
        updated_at: at(1),
    }
}

pub fn scheduled(id: &str, status: ScheduledStatus) -> ScheduledTransaction {
    ScheduledTransaction {
        id: id.to_string(),
        amount: Money::new(5000),
        currency: Currency::EUR,
        description: Some("Rent".to_string()),
        source_wallet_id: "w1".to_string(),
        destination: Destination::Wallet("w2".to_string()),
        scheduled_date: at(1),
        recurrence: Recurrence::Once,
        recurrence_end_date: None,
        status,
        last_execution_date: None,
        next_execution_date: Some(at(1)),
        created_at: at(1),
        updated_at: at(1),
    }
}

/// Holds back one call until released.
pub struct Gate {
    entered: oneshot::Receiver<()>,
    release: oneshot::Sender<()>,
}

impl Gate {
    /// Waits until the gated call has computed its response and is parked.
    pub async fn entered(&mut self) {
        (&mut self.entered).await.unwrap();
    }

    pub fn release(self) {
        let _ = self.release.send(());
    }
}

struct Parked {
    entered: oneshot::Sender<()>,
    release: oneshot::Receiver<()>,
}

#[derive(Default)]
struct Data {
    transactions: Vec<Transaction>,
    pending: Vec<Transaction>,
    scheduled: Vec<ScheduledTransaction>,
    wallets: Vec<Wallet>,
    created_status: Option<TransactionStatus>,
    fee: Option<Money>,
    next_id: u32,
}

/// In-memory `TransactionApi`.
///
/// Every call is recorded by name. Failures and gates are armed per method
/// name and consumed by the next call to that method.
#[derive(Default)]
pub struct FakeApi {
    data: Mutex<Data>,
    calls: Mutex<Vec<&'static str>>,
    failures: Mutex<HashMap<&'static str, String>>,
    gates: Mutex<HashMap<&'static str, VecDeque<Parked>>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_transactions(&self, items: Vec<Transaction>) {
        self.data.lock().unwrap().transactions = items;
    }

    pub fn set_pending(&self, items: Vec<Transaction>) {
        self.data.lock().unwrap().pending = items;
    }

    pub fn set_scheduled(&self, items: Vec<ScheduledTransaction>) {
        self.data.lock().unwrap().scheduled = items;
    }

    pub fn set_wallets(&self, items: Vec<Wallet>) {
        self.data.lock().unwrap().wallets = items;
    }

    /// Status the server gives to the next created transactions.
    pub fn set_created_status(&self, status: TransactionStatus) {
        self.data.lock().unwrap().created_status = Some(status);
    }

    pub fn set_fee(&self, fee: Money) {
        self.data.lock().unwrap().fee = Some(fee);
    }

    pub fn fail_next(&self, method: &'static str, message: &str) {
        self.failures
            .lock()
            .unwrap()
            .insert(method, message.to_string());
    }

    pub fn gate(&self, method: &'static str) -> Gate {
        let (entered_tx, entered_rx) = oneshot::channel();
        let (release_tx, release_rx) = oneshot::channel();
        self.gates
            .lock()
            .unwrap()
            .entry(method)
            .or_default()
            .push_back(Parked {
                entered: entered_tx,
                release: release_rx,
            });
        Gate {
            entered: entered_rx,
            release: release_tx,
        }
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, method: &str) -> usize {
        self.calls().iter().filter(|call| **call == method).count()
    }

    pub fn stored_scheduled(&self, id: &str) -> Option<ScheduledTransaction> {
        self.data
            .lock()
            .unwrap()
            .scheduled
            .iter()
            .find(|tx| tx.id == id)
            .cloned()
    }

    /// Records the call and returns the armed failure, if any.
    fn enter(&self, method: &'static str) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(method);
        match self.failures.lock().unwrap().remove(method) {
            Some(message) => Err(ApiError::new(message)),
            None => Ok(()),
        }
    }

    /// Parks the call if a gate is armed for `method`.
    async fn wait(&self, method: &'static str) {
        let parked = self
            .gates
            .lock()
            .unwrap()
            .get_mut(method)
            .and_then(VecDeque::pop_front);
        if let Some(parked) = parked {
            let _ = parked.entered.send(());
            let _ = parked.release.await;
        }
    }

    async fn respond<T>(&self, method: &'static str, result: Result<T, ApiError>) -> Result<T, ApiError> {
        self.wait(method).await;
        result
    }

    fn next_id(&self, prefix: &str) -> String {
        let mut data = self.data.lock().unwrap();
        data.next_id += 1;
        format!("{prefix}{}", data.next_id)
    }

    fn not_found(id: &str) -> ApiError {
        ApiError::new(format!("{id} not found"))
    }
}

#[async_trait]
impl TransactionApi for FakeApi {
    async fn get_transactions(&self, query: &TransactionQuery) -> Result<Vec<Transaction>, ApiError> {
        let method = "get_transactions";
        let result = self.enter(method).map(|()| {
            let data = self.data.lock().unwrap();
            data.transactions
                .iter()
                .filter(|tx| query.wallet_id.as_deref().is_none_or(|id| tx.touches_wallet(id)))
                .filter(|tx| query.kind.is_none_or(|kind| tx.kind == kind))
                .filter(|tx| query.status.is_none_or(|status| tx.status == status))
                .take(query.limit.map_or(usize::MAX, |limit| limit as usize))
                .cloned()
                .collect()
        });
        self.respond(method, result).await
    }

    async fn get_pending_transactions(&self) -> Result<Vec<Transaction>, ApiError> {
        let method = "get_pending_transactions";
        let result = self
            .enter(method)
            .map(|()| self.data.lock().unwrap().pending.clone());
        self.respond(method, result).await
    }

    async fn get_transaction_details(&self, id: &str) -> Result<Transaction, ApiError> {
        let method = "get_transaction_details";
        let result = self.enter(method).and_then(|()| {
            let data = self.data.lock().unwrap();
            data.transactions
                .iter()
                .find(|tx| tx.id == id)
                .cloned()
                .ok_or_else(|| Self::not_found(id))
        });
        self.respond(method, result).await
    }

    async fn create_transaction(&self, request: &NewTransaction) -> Result<Transaction, ApiError> {
        let method = "create_transaction";
        let result = self.enter(method).map(|()| {
            let id = self.next_id("t");
            let mut data = self.data.lock().unwrap();
            let created = Transaction {
                id,
                amount: request.amount,
                currency: request.currency,
                kind: request.kind,
                status: data.created_status.unwrap_or(TransactionStatus::Pending),
                description: request.description.clone(),
                source_wallet_id: Some(request.source_wallet_id.clone()),
                destination_wallet_id: None,
                recipient: Some(RecipientInfo {
                    email: Some(request.recipient_identifier.clone()),
                    ..Default::default()
                }),
                created_at: at(2),
                updated_at: at(2),
            };
            data.transactions.insert(0, created.clone());
            created
        });
        self.respond(method, result).await
    }

    async fn calculate_transaction_fee(&self, _request: FeeRequest) -> Result<Money, ApiError> {
        let method = "calculate_transaction_fee";
        let result = self
            .enter(method)
            .map(|()| self.data.lock().unwrap().fee.unwrap_or(Money::ZERO));
        self.respond(method, result).await
    }

    async fn create_money_request(&self, _request: &NewMoneyRequest) -> Result<(), ApiError> {
        let method = "create_money_request";
        let result = self.enter(method);
        self.respond(method, result).await
    }

    async fn get_scheduled_transactions(
        &self,
        query: &ScheduledQuery,
    ) -> Result<Vec<ScheduledTransaction>, ApiError> {
        let method = "get_scheduled_transactions";
        let result = self.enter(method).map(|()| {
            let data = self.data.lock().unwrap();
            data.scheduled
                .iter()
                .filter(|tx| query.status.is_none_or(|status| tx.status == status))
                .filter(|tx| query.recurrence.is_none_or(|r| tx.recurrence == r))
                .cloned()
                .collect()
        });
        self.respond(method, result).await
    }

    async fn get_scheduled_transaction_details(
        &self,
        id: &str,
    ) -> Result<ScheduledTransaction, ApiError> {
        let method = "get_scheduled_transaction_details";
        let result = self
            .enter(method)
            .and_then(|()| self.stored_scheduled(id).ok_or_else(|| Self::not_found(id)));
        self.respond(method, result).await
    }

    async fn create_scheduled_transaction(
        &self,
        request: &NewScheduledTransaction,
    ) -> Result<ScheduledTransaction, ApiError> {
        let method = "create_scheduled_transaction";
        let result = self.enter(method).map(|()| {
            let id = self.next_id("s");
            let created = ScheduledTransaction {
                id,
                amount: request.amount(),
                currency: request.currency(),
                description: request.description().map(str::to_string),
                source_wallet_id: request.source_wallet_id().to_string(),
                destination: request.destination().clone(),
                scheduled_date: request.scheduled_date(),
                recurrence: request.recurrence(),
                recurrence_end_date: request.recurrence_end_date(),
                status: ScheduledStatus::Pending,
                last_execution_date: None,
                next_execution_date: Some(request.scheduled_date()),
                created_at: at(2),
                updated_at: at(2),
            };
            self.data
                .lock()
                .unwrap()
                .scheduled
                .insert(0, created.clone());
            created
        });
        self.respond(method, result).await
    }

    async fn update_scheduled_transaction(
        &self,
        id: &str,
        patch: &ScheduledTransactionPatch,
    ) -> Result<ScheduledTransaction, ApiError> {
        let method = "update_scheduled_transaction";
        let result = self.enter(method).and_then(|()| {
            let mut data = self.data.lock().unwrap();
            let entry = data
                .scheduled
                .iter_mut()
                .find(|tx| tx.id == id)
                .ok_or_else(|| Self::not_found(id))?;
            if entry.status != ScheduledStatus::Pending {
                return Err(ApiError::new("Only pending transactions can be updated"));
            }
            *entry = patch.apply_to(entry);
            entry.updated_at = at(3);
            Ok(entry.clone())
        });
        self.respond(method, result).await
    }

    async fn cancel_scheduled_transaction(
        &self,
        id: &str,
    ) -> Result<CancelledScheduledTransaction, ApiError> {
        let method = "cancel_scheduled_transaction";
        let result = self.enter(method).and_then(|()| {
            let mut data = self.data.lock().unwrap();
            let entry = data
                .scheduled
                .iter_mut()
                .find(|tx| tx.id == id)
                .ok_or_else(|| Self::not_found(id))?;
            if entry.status != ScheduledStatus::Pending {
                return Err(ApiError::new("Only pending transactions can be cancelled"));
            }
            entry.status = ScheduledStatus::Cancelled;
            Ok(CancelledScheduledTransaction { id: id.to_string() })
        });
        self.respond(method, result).await
    }

    async fn get_wallets(&self) -> Result<Vec<Wallet>, ApiError> {
        let method = "get_wallets";
        let result = self
            .enter(method)
            .map(|()| self.data.lock().unwrap().wallets.clone());
        self.respond(method, result).await
    }
}
