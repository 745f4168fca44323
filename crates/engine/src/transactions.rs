//! Immediate transactions.
//!
//! A `Transaction` is a completed or in-flight money movement between wallets
//! or to/from an external party. Records only ever come from the backend;
//! the client never assigns an `id`.

use std::{fmt, str::FromStr};

use api_types::transaction as wire;
use chrono::{DateTime, Utc};

use crate::{Currency, EngineError, Money, ResultEngine};

/// Direction relative to the wallet viewing the transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransactionType {
    Credit,
    Debit,
}

impl TransactionType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Credit => "CREDIT",
            Self::Debit => "DEBIT",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CREDIT" => Ok(Self::Credit),
            "DEBIT" => Ok(Self::Debit),
            other => Err(EngineError::UnknownVariant(format!(
                "invalid transaction type: {other}"
            ))),
        }
    }
}

impl From<wire::TransactionType> for TransactionType {
    fn from(value: wire::TransactionType) -> Self {
        match value {
            wire::TransactionType::Credit => Self::Credit,
            wire::TransactionType::Debit => Self::Debit,
        }
    }
}

impl From<TransactionType> for wire::TransactionType {
    fn from(value: TransactionType) -> Self {
        match value {
            TransactionType::Credit => Self::Credit,
            TransactionType::Debit => Self::Debit,
        }
    }
}

/// Lifecycle of an immediate transaction. There is no backward transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
}

impl TransactionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionStatus {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(Self::Pending),
            "COMPLETED" => Ok(Self::Completed),
            "FAILED" => Ok(Self::Failed),
            other => Err(EngineError::UnknownVariant(format!(
                "invalid transaction status: {other}"
            ))),
        }
    }
}

impl From<wire::TransactionStatus> for TransactionStatus {
    fn from(value: wire::TransactionStatus) -> Self {
        match value {
            wire::TransactionStatus::Pending => Self::Pending,
            wire::TransactionStatus::Completed => Self::Completed,
            wire::TransactionStatus::Failed => Self::Failed,
        }
    }
}

impl From<TransactionStatus> for wire::TransactionStatus {
    fn from(value: TransactionStatus) -> Self {
        match value {
            TransactionStatus::Pending => Self::Pending,
            TransactionStatus::Completed => Self::Completed,
            TransactionStatus::Failed => Self::Failed,
        }
    }
}

/// Contact details of an external counterpart.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecipientInfo {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl RecipientInfo {
    /// Returns `true` when no contact field carries any text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        [&self.name, &self.email, &self.phone]
            .iter()
            .all(|field| field.as_deref().is_none_or(|v| v.trim().is_empty()))
    }

    /// Best label for display: name, then email, then phone.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.name
            .as_deref()
            .or(self.email.as_deref())
            .or(self.phone.as_deref())
    }
}

impl From<wire::RecipientInfo> for RecipientInfo {
    fn from(value: wire::RecipientInfo) -> Self {
        Self {
            name: value.name,
            email: value.email,
            phone: value.phone,
        }
    }
}

impl From<RecipientInfo> for wire::RecipientInfo {
    fn from(value: RecipientInfo) -> Self {
        Self {
            name: value.name,
            email: value.email,
            phone: value.phone,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub id: String,
    /// Never negative; the direction is given by `kind`.
    pub amount: Money,
    pub currency: Currency,
    pub kind: TransactionType,
    pub status: TransactionStatus,
    pub description: Option<String>,
    pub source_wallet_id: Option<String>,
    pub destination_wallet_id: Option<String>,
    pub recipient: Option<RecipientInfo>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Returns `true` if the transaction moves money in or out of `wallet_id`.
    #[must_use]
    pub fn touches_wallet(&self, wallet_id: &str) -> bool {
        self.source_wallet_id.as_deref() == Some(wallet_id)
            || self.destination_wallet_id.as_deref() == Some(wallet_id)
    }

    #[must_use]
    pub fn recipient_name(&self) -> Option<&str> {
        self.recipient.as_ref().and_then(|r| r.name.as_deref())
    }
}

impl TryFrom<wire::TransactionView> for Transaction {
    type Error = EngineError;

    fn try_from(view: wire::TransactionView) -> Result<Self, Self::Error> {
        let malformed =
            |msg: String| EngineError::MalformedResponse(format!("transaction {}: {msg}", view.id));

        let currency =
            Currency::try_from(view.currency.as_str()).map_err(|e| malformed(e.to_string()))?;
        let amount =
            Money::from_major_f64(view.amount, currency).map_err(|e| malformed(e.to_string()))?;
        if amount.is_negative() {
            return Err(malformed("negative amount".to_string()));
        }

        Ok(Self {
            id: view.id,
            amount,
            currency,
            kind: view.kind.into(),
            status: view.status.into(),
            description: view.description,
            source_wallet_id: view.source_wallet_id,
            destination_wallet_id: view.destination_wallet_id,
            recipient: view.recipient_info.map(RecipientInfo::from),
            created_at: view.created_at,
            updated_at: view.updated_at,
        })
    }
}

/// Converts a list payload, failing on the first malformed record.
pub fn transactions_from_wire(
    views: Vec<wire::TransactionView>,
) -> ResultEngine<Vec<Transaction>> {
    views.into_iter().map(Transaction::try_from).collect()
}

/// Server-side narrowing for `GET transactions`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransactionQuery {
    pub wallet_id: Option<String>,
    pub kind: Option<TransactionType>,
    pub status: Option<TransactionStatus>,
    pub limit: Option<u32>,
}

impl From<&TransactionQuery> for wire::TransactionListQuery {
    fn from(query: &TransactionQuery) -> Self {
        Self {
            wallet_id: query.wallet_id.clone(),
            kind: query.kind.map(Into::into),
            status: query.status.map(Into::into),
            limit: query.limit,
        }
    }
}

/// A validated send request. Build it with `validation::SendForm`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewTransaction {
    pub amount: Money,
    pub currency: Currency,
    pub source_wallet_id: String,
    pub recipient_identifier: String,
    pub description: Option<String>,
    pub kind: TransactionType,
}

impl From<&NewTransaction> for wire::TransactionNew {
    fn from(tx: &NewTransaction) -> Self {
        Self {
            amount: tx.amount.to_major_f64(tx.currency),
            currency: tx.currency.code().to_string(),
            source_wallet_id: tx.source_wallet_id.clone(),
            recipient_identifier: tx.recipient_identifier.clone(),
            description: tx.description.clone(),
            kind: tx.kind.into(),
            idempotency_key: None,
        }
    }
}

/// A validated money request. Build it with `validation::RequestForm`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewMoneyRequest {
    pub amount: Money,
    pub currency: Currency,
    pub destination_wallet_id: String,
    pub sender_identifier: String,
    pub description: Option<String>,
}

impl From<&NewMoneyRequest> for wire::MoneyRequestNew {
    fn from(req: &NewMoneyRequest) -> Self {
        Self {
            amount: req.amount.to_major_f64(req.currency),
            currency: req.currency.code().to_string(),
            destination_wallet_id: req.destination_wallet_id.clone(),
            sender_identifier: req.sender_identifier.clone(),
            description: req.description.clone(),
        }
    }
}

/// Fee quote request for a prospective transfer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeeRequest {
    pub amount: Money,
    pub currency: Currency,
}

impl From<FeeRequest> for wire::FeeRequest {
    fn from(req: FeeRequest) -> Self {
        Self {
            amount: req.amount.to_major_f64(req.currency),
            currency: req.currency.code().to_string(),
            kind: wire::FeeKind::Transfer,
        }
    }
}
