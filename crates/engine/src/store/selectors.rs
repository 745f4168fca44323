//! Read accessors over a [`StoreState`].

use crate::{ScheduledFilter, ScheduledTransaction, StoreState, Transaction, TransactionFilter};

/// Transactions currently shown for `filter`.
pub fn visible_transactions<'a>(
    state: &'a StoreState,
    filter: &TransactionFilter,
) -> Vec<&'a Transaction> {
    filter.apply(&state.transactions.items)
}

pub fn visible_scheduled(
    state: &StoreState,
    filter: ScheduledFilter,
) -> Vec<&ScheduledTransaction> {
    filter.apply(&state.scheduled.items)
}

/// Transactions that move money in or out of `wallet_id`.
pub fn transactions_for_wallet<'a>(
    state: &'a StoreState,
    wallet_id: &str,
) -> Vec<&'a Transaction> {
    state
        .transactions
        .items
        .iter()
        .filter(|tx| tx.touches_wallet(wallet_id))
        .collect()
}

pub fn pending_transactions(state: &StoreState) -> &[Transaction] {
    &state.transactions.pending
}

pub fn selected_transaction(state: &StoreState) -> Option<&Transaction> {
    state.transactions.selected.as_ref()
}

pub fn selected_scheduled(state: &StoreState) -> Option<&ScheduledTransaction> {
    state.scheduled.selected.as_ref()
}

pub fn transactions_loading(state: &StoreState) -> bool {
    state.transactions.is_loading()
}

pub fn scheduled_loading(state: &StoreState) -> bool {
    state.scheduled.is_loading()
}

pub fn transactions_error(state: &StoreState) -> Option<&str> {
    state.transactions.error.as_deref()
}

pub fn scheduled_error(state: &StoreState) -> Option<&str> {
    state.scheduled.error.as_deref()
}
