//! Client-side engine of the wallet: domain types, validation, filtering,
//! fee quotes and the transaction store.
//!
//! Nothing in here knows about HTTP. The store reaches the backend only
//! through a [`TransactionApi`] implementation supplied by the front-end.

pub use api::{ApiError, CancelledScheduledTransaction, TransactionApi};
pub use currency::Currency;
pub use error::EngineError;
pub use fee::FeeQuoter;
pub use filter::{Clause, ScheduledFilter, TransactionFilter, apply_clauses};
pub use money::Money;
pub use scheduled::{
    Destination, NewScheduledTransaction, Recurrence, ScheduleDraft, ScheduledQuery,
    ScheduledStatus, ScheduledTransaction, ScheduledTransactionPatch, scheduled_from_wire,
};
pub use store::{ResultStore, StoreError, TransactionStore, selectors};
pub use store::state::{Command, ScheduledSlice, StoreState, TransactionsSlice};
pub use transactions::{
    FeeRequest, NewMoneyRequest, NewTransaction, RecipientInfo, Transaction, TransactionQuery,
    TransactionStatus, TransactionType, transactions_from_wire,
};
pub use validation::{
    RequestForm, ScheduleForm, SchedulePatchForm, SendForm, ValidationError, parse_amount,
};
pub use wallets::{Wallet, find_wallet};

mod api;
mod currency;
mod error;
mod fee;
mod filter;
mod money;
mod scheduled;
pub mod store;
mod transactions;
mod validation;
mod wallets;

type ResultEngine<T> = Result<T, EngineError>;
