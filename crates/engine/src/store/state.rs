//! Store state and the reducer that applies command results to it.
//!
//! Nothing here is async: [`StoreState`] is a plain value. The store wraps it
//! in a mutex and calls [`StoreState::begin`] before a remote call and
//! [`StoreState::settle`] after it.

use std::collections::HashMap;

use crate::{ScheduledStatus, ScheduledTransaction, Transaction, TransactionStatus};

/// Every command the store can run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    FetchTransactions,
    FetchTransactionDetails,
    FetchPendingTransactions,
    CreateTransaction,
    RequestMoney,
    FetchScheduledTransactions,
    FetchScheduledTransactionDetails,
    CreateScheduledTransaction,
    UpdateScheduledTransaction,
    CancelScheduledTransaction,
}

/// The two independent halves of the state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slice {
    Transactions,
    Scheduled,
}

impl Command {
    pub fn slice(self) -> Slice {
        match self {
            Self::FetchTransactions
            | Self::FetchTransactionDetails
            | Self::FetchPendingTransactions
            | Self::CreateTransaction
            | Self::RequestMoney => Slice::Transactions,
            Self::FetchScheduledTransactions
            | Self::FetchScheduledTransactionDetails
            | Self::CreateScheduledTransaction
            | Self::UpdateScheduledTransaction
            | Self::CancelScheduledTransaction => Slice::Scheduled,
        }
    }

    /// Fetches replace what they target, so a newer fetch supersedes an
    /// older one. Mutations never supersede each other.
    pub fn supersedes(self) -> bool {
        matches!(
            self,
            Self::FetchTransactions
                | Self::FetchTransactionDetails
                | Self::FetchPendingTransactions
                | Self::FetchScheduledTransactions
                | Self::FetchScheduledTransactionDetails
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::FetchTransactions => "fetch_transactions",
            Self::FetchTransactionDetails => "fetch_transaction_details",
            Self::FetchPendingTransactions => "fetch_pending_transactions",
            Self::CreateTransaction => "create_transaction",
            Self::RequestMoney => "request_money",
            Self::FetchScheduledTransactions => "fetch_scheduled_transactions",
            Self::FetchScheduledTransactionDetails => "fetch_scheduled_transaction_details",
            Self::CreateScheduledTransaction => "create_scheduled_transaction",
            Self::UpdateScheduledTransaction => "update_scheduled_transaction",
            Self::CancelScheduledTransaction => "cancel_scheduled_transaction",
        }
    }
}

/// Handed out by [`StoreState::begin`] and given back to
/// [`StoreState::settle`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket {
    command: Command,
    generation: u64,
}

impl Ticket {
    pub fn command(&self) -> Command {
        self.command
    }
}

/// Successful result of a command, ready to be reduced into the state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Transactions(Vec<Transaction>),
    TransactionDetails(Transaction),
    PendingTransactions(Vec<Transaction>),
    TransactionCreated(Transaction),
    MoneyRequested,
    Scheduled(Vec<ScheduledTransaction>),
    ScheduledDetails(ScheduledTransaction),
    ScheduledCreated(ScheduledTransaction),
    ScheduledUpdated(ScheduledTransaction),
    /// Id of the schedule that moved to CANCELLED.
    ScheduledCancelled(String),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransactionsSlice {
    pub items: Vec<Transaction>,
    pub selected: Option<Transaction>,
    /// Transactions still waiting for settlement.
    pub pending: Vec<Transaction>,
    /// Message of the last failed command, verbatim.
    pub error: Option<String>,
    in_flight: usize,
}

impl TransactionsSlice {
    /// `true` while at least one command on this slice is outstanding.
    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScheduledSlice {
    pub items: Vec<ScheduledTransaction>,
    pub selected: Option<ScheduledTransaction>,
    pub error: Option<String>,
    in_flight: usize,
}

impl ScheduledSlice {
    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    /// Looks the schedule up in the list, then in the selection.
    pub fn find(&self, id: &str) -> Option<&ScheduledTransaction> {
        self.items
            .iter()
            .find(|tx| tx.id == id)
            .or(self.selected.as_ref().filter(|tx| tx.id == id))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StoreState {
    pub transactions: TransactionsSlice,
    pub scheduled: ScheduledSlice,
    generations: HashMap<Command, u64>,
}

impl StoreState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `command` as started: its slice becomes loading and loses its
    /// previous error.
    pub fn begin(&mut self, command: Command) -> Ticket {
        let generation = if command.supersedes() {
            self.bump(command)
        } else {
            0
        };
        match command.slice() {
            Slice::Transactions => {
                self.transactions.in_flight += 1;
                self.transactions.error = None;
            }
            Slice::Scheduled => {
                self.scheduled.in_flight += 1;
                self.scheduled.error = None;
            }
        }
        tracing::debug!("{} started", command.as_str());
        Ticket {
            command,
            generation,
        }
    }

    /// Returns `true` if a newer command of the same kind was started after
    /// the ticket was issued.
    pub fn is_stale(&self, ticket: &Ticket) -> bool {
        ticket.command.supersedes()
            && self.generations.get(&ticket.command).copied().unwrap_or(0) != ticket.generation
    }

    /// Ends the command behind `ticket` and reduces its result into the
    /// state. `Err` carries the failure message.
    ///
    /// Returns `false` when the result was discarded because the ticket is
    /// stale. The slice's loading mark is cleared either way.
    pub fn settle(&mut self, ticket: Ticket, result: Result<Outcome, String>) -> bool {
        let command = ticket.command;
        match command.slice() {
            Slice::Transactions => {
                self.transactions.in_flight = self.transactions.in_flight.saturating_sub(1);
            }
            Slice::Scheduled => {
                self.scheduled.in_flight = self.scheduled.in_flight.saturating_sub(1);
            }
        }

        if self.is_stale(&ticket) {
            tracing::debug!("{} superseded, result discarded", command.as_str());
            return false;
        }

        match result {
            Ok(outcome) => self.apply(outcome),
            Err(message) => {
                tracing::debug!("{} failed: {message}", command.as_str());
                self.record_error(command.slice(), message);
            }
        }
        true
    }

    /// Records a failure that happened before any remote call.
    pub fn record_error(&mut self, slice: Slice, message: String) {
        match slice {
            Slice::Transactions => self.transactions.error = Some(message),
            Slice::Scheduled => self.scheduled.error = Some(message),
        }
    }

    /// Drops the selected transaction. A details fetch still in flight will
    /// not bring it back.
    pub fn clear_selected_transaction(&mut self) {
        self.bump(Command::FetchTransactionDetails);
        self.transactions.selected = None;
    }

    pub fn clear_selected_scheduled_transaction(&mut self) {
        self.bump(Command::FetchScheduledTransactionDetails);
        self.scheduled.selected = None;
    }

    fn bump(&mut self, command: Command) -> u64 {
        let generation = self.generations.entry(command).or_insert(0);
        *generation += 1;
        *generation
    }

    fn apply(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Transactions(items) => self.transactions.items = items,
            Outcome::TransactionDetails(tx) => self.transactions.selected = Some(tx),
            Outcome::PendingTransactions(items) => self.transactions.pending = items,
            Outcome::TransactionCreated(tx) => {
                if tx.status == TransactionStatus::Pending {
                    self.transactions.pending.insert(0, tx.clone());
                }
                self.transactions.items.insert(0, tx);
            }
            Outcome::MoneyRequested => {}
            Outcome::Scheduled(items) => self.scheduled.items = items,
            Outcome::ScheduledDetails(tx) => self.scheduled.selected = Some(tx),
            Outcome::ScheduledCreated(tx) => self.scheduled.items.insert(0, tx),
            Outcome::ScheduledUpdated(tx) => {
                if let Some(selected) = self.scheduled.selected.as_mut()
                    && selected.id == tx.id
                {
                    *selected = tx.clone();
                }
                if let Some(entry) = self.scheduled.items.iter_mut().find(|e| e.id == tx.id) {
                    *entry = tx;
                }
            }
            Outcome::ScheduledCancelled(id) => {
                for entry in self.scheduled.items.iter_mut().filter(|e| e.id == id) {
                    entry.status = ScheduledStatus::Cancelled;
                }
                if let Some(selected) = self.scheduled.selected.as_mut()
                    && selected.id == id
                {
                    selected.status = ScheduledStatus::Cancelled;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::{Currency, Destination, Money, Recurrence, TransactionType};

    fn tx(id: &str, status: TransactionStatus) -> Transaction {
        Transaction {
            id: id.to_string(),
            amount: Money::new(500),
            currency: Currency::EUR,
            kind: TransactionType::Debit,
            status,
            description: None,
            source_wallet_id: Some("w1".to_string()),
            destination_wallet_id: None,
            recipient: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn scheduled(id: &str) -> ScheduledTransaction {
        let now = Utc::now();
        ScheduledTransaction {
            id: id.to_string(),
            amount: Money::new(5000),
            currency: Currency::EUR,
            description: Some("Rent".to_string()),
            source_wallet_id: "w1".to_string(),
            destination: Destination::Wallet("w2".to_string()),
            scheduled_date: now,
            recurrence: Recurrence::Once,
            recurrence_end_date: None,
            status: ScheduledStatus::Pending,
            last_execution_date: None,
            next_execution_date: Some(now),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn begin_sets_loading_and_clears_error() {
        let mut state = StoreState::new();
        state.transactions.error = Some("boom".to_string());

        let ticket = state.begin(Command::FetchTransactions);
        assert!(state.transactions.is_loading());
        assert!(state.transactions.error.is_none());
        assert!(!state.scheduled.is_loading());

        assert!(state.settle(ticket, Ok(Outcome::Transactions(vec![]))));
        assert!(!state.transactions.is_loading());
    }

    #[test]
    fn failure_keeps_items_and_records_message() {
        let mut state = StoreState::new();
        state.transactions.items = vec![tx("t1", TransactionStatus::Completed)];

        let ticket = state.begin(Command::FetchTransactions);
        state.settle(ticket, Err("Network Error".to_string()));

        assert_eq!(state.transactions.items.len(), 1);
        assert_eq!(state.transactions.error.as_deref(), Some("Network Error"));
        assert!(!state.transactions.is_loading());
    }

    #[test]
    fn stale_fetch_is_discarded() {
        let mut state = StoreState::new();
        let first = state.begin(Command::FetchTransactions);
        let second = state.begin(Command::FetchTransactions);

        let newer = vec![tx("new", TransactionStatus::Completed)];
        let older = vec![tx("old", TransactionStatus::Completed)];
        assert!(state.settle(second, Ok(Outcome::Transactions(newer))));
        assert!(state.transactions.is_loading());
        assert!(!state.settle(first, Ok(Outcome::Transactions(older))));

        assert_eq!(state.transactions.items[0].id, "new");
        assert!(!state.transactions.is_loading());
    }

    #[test]
    fn mutations_are_never_superseded() {
        let mut state = StoreState::new();
        let first = state.begin(Command::CreateTransaction);
        let second = state.begin(Command::CreateTransaction);

        let b = tx("b", TransactionStatus::Completed);
        let a = tx("a", TransactionStatus::Completed);
        assert!(state.settle(second, Ok(Outcome::TransactionCreated(b))));
        assert!(state.settle(first, Ok(Outcome::TransactionCreated(a))));
        assert_eq!(state.transactions.items.len(), 2);
    }

    #[test]
    fn pending_create_goes_to_both_lists() {
        let mut state = StoreState::new();
        let ticket = state.begin(Command::CreateTransaction);
        let pending = tx("p", TransactionStatus::Pending);
        state.settle(ticket, Ok(Outcome::TransactionCreated(pending)));
        let ticket = state.begin(Command::CreateTransaction);
        let completed = tx("c", TransactionStatus::Completed);
        state.settle(ticket, Ok(Outcome::TransactionCreated(completed)));

        let ids: Vec<_> = state.transactions.items.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "p"]);
        assert_eq!(state.transactions.pending.len(), 1);
        assert_eq!(state.transactions.pending[0].id, "p");
    }

    #[test]
    fn cancel_updates_list_and_selection() {
        let mut state = StoreState::new();
        state.scheduled.items = vec![scheduled("s1"), scheduled("s2")];
        state.scheduled.selected = Some(scheduled("s1"));
        let before = state.scheduled.items[0].clone();

        let ticket = state.begin(Command::CancelScheduledTransaction);
        state.settle(ticket, Ok(Outcome::ScheduledCancelled("s1".to_string())));

        let after = &state.scheduled.items[0];
        assert_eq!(after.status, ScheduledStatus::Cancelled);
        assert_eq!(
            ScheduledTransaction {
                status: ScheduledStatus::Pending,
                ..after.clone()
            },
            before
        );
        assert_eq!(state.scheduled.items.len(), 2);
        assert_eq!(state.scheduled.items[1].status, ScheduledStatus::Pending);
        assert_eq!(
            state.scheduled.selected.as_ref().map(|s| s.status),
            Some(ScheduledStatus::Cancelled)
        );
    }

    #[test]
    fn update_replaces_entry_and_matching_selection() {
        let mut state = StoreState::new();
        state.scheduled.items = vec![scheduled("s1")];
        state.scheduled.selected = Some(scheduled("s1"));

        let mut updated = scheduled("s1");
        updated.amount = Money::new(7500);
        let ticket = state.begin(Command::UpdateScheduledTransaction);
        state.settle(ticket, Ok(Outcome::ScheduledUpdated(updated.clone())));

        assert_eq!(state.scheduled.items[0], updated);
        assert_eq!(state.scheduled.selected, Some(updated));
    }

    #[test]
    fn clearing_selection_discards_inflight_details() {
        let mut state = StoreState::new();
        let ticket = state.begin(Command::FetchScheduledTransactionDetails);
        state.clear_selected_scheduled_transaction();

        assert!(!state.settle(ticket, Ok(Outcome::ScheduledDetails(scheduled("s1")))));
        assert!(state.scheduled.selected.is_none());
        assert!(!state.scheduled.is_loading());
    }
}
