//! Client-side narrowing of transaction lists.
//!
//! Everything here is pure: the same collection and filter always give the
//! same result, in the input order.

use std::str::FromStr;

use crate::{
    EngineError, Recurrence, ScheduledStatus, ScheduledTransaction, Transaction,
    TransactionStatus, TransactionType,
};

/// Filter applied to the immediate transaction list.
///
/// `None` / empty means "all" for that dimension.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    pub wallet_id: Option<String>,
    pub kind: Option<TransactionType>,
    pub status: Option<TransactionStatus>,
    pub search: String,
}

impl TransactionFilter {
    /// Returns `true` if no clause narrows the list.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.clauses().is_empty()
    }

    /// The active clauses. They are independent, so any evaluation order
    /// gives the same result.
    #[must_use]
    pub fn clauses(&self) -> Vec<Clause<'_>> {
        let mut clauses = Vec::with_capacity(4);
        if let Some(wallet_id) = self.wallet_id.as_deref() {
            clauses.push(Clause::Wallet(wallet_id));
        }
        if let Some(kind) = self.kind {
            clauses.push(Clause::Kind(kind));
        }
        if let Some(status) = self.status {
            clauses.push(Clause::Status(status));
        }
        let needle = self.search.trim();
        if !needle.is_empty() {
            clauses.push(Clause::Search(needle.to_lowercase()));
        }
        clauses
    }

    #[must_use]
    pub fn matches(&self, tx: &Transaction) -> bool {
        self.clauses().iter().all(|clause| clause.matches(tx))
    }

    /// Returns the matching transactions, preserving input order.
    #[must_use]
    pub fn apply<'a>(&self, items: &'a [Transaction]) -> Vec<&'a Transaction> {
        apply_clauses(items, &self.clauses())
    }
}

/// One dimension of a [`TransactionFilter`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Clause<'a> {
    /// Source or destination wallet equals the id.
    Wallet(&'a str),
    Kind(TransactionType),
    Status(TransactionStatus),
    /// Lower-cased needle matched against description, id and recipient name.
    Search(String),
}

impl Clause<'_> {
    #[must_use]
    pub fn matches(&self, tx: &Transaction) -> bool {
        match self {
            Clause::Wallet(wallet_id) => tx.touches_wallet(wallet_id),
            Clause::Kind(kind) => tx.kind == *kind,
            Clause::Status(status) => tx.status == *status,
            Clause::Search(needle) => {
                let contains = |haystack: &str| haystack.to_lowercase().contains(needle.as_str());
                tx.description.as_deref().is_some_and(contains)
                    || contains(&tx.id)
                    || tx.recipient_name().is_some_and(contains)
            }
        }
    }
}

/// Keeps the items matching every clause, in input order.
#[must_use]
pub fn apply_clauses<'a>(items: &'a [Transaction], clauses: &[Clause<'_>]) -> Vec<&'a Transaction> {
    items
        .iter()
        .filter(|tx| clauses.iter().all(|clause| clause.matches(tx)))
        .collect()
}

/// Single-dimension selector for scheduled transaction lists.
///
/// `Once` / `Recurring` look at the recurrence, the others at the status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScheduledFilter {
    #[default]
    All,
    Status(ScheduledStatus),
    Once,
    Recurring,
}

impl ScheduledFilter {
    #[must_use]
    pub fn matches(self, tx: &ScheduledTransaction) -> bool {
        match self {
            Self::All => true,
            Self::Status(status) => tx.status == status,
            Self::Once => tx.recurrence == Recurrence::Once,
            Self::Recurring => tx.recurrence.is_recurring(),
        }
    }

    #[must_use]
    pub fn apply(self, items: &[ScheduledTransaction]) -> Vec<&ScheduledTransaction> {
        items.iter().filter(|tx| self.matches(tx)).collect()
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "ALL",
            Self::Status(status) => status.as_str(),
            Self::Once => "ONCE",
            Self::Recurring => "RECURRING",
        }
    }
}

impl FromStr for ScheduledFilter {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "" | "ALL" => Ok(Self::All),
            "ONCE" => Ok(Self::Once),
            "RECURRING" => Ok(Self::Recurring),
            other => other
                .parse::<ScheduledStatus>()
                .map(Self::Status)
                .map_err(|_| EngineError::UnknownVariant(format!("invalid filter: {other}"))),
        }
    }
}
