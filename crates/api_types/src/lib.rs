//! Wire types exchanged with the wallet backend.
//!
//! These mirror the JSON payloads one-to-one (camelCase keys, upper-case enum
//! tags, optional fields as the server sends them). Domain invariants are
//! enforced by `engine` when converting out of these types.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Error body returned by the backend on non-2xx responses.
///
/// Older endpoints use `error`, newer ones `message`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorResponse {
    pub fn into_message(self) -> Option<String> {
        self.message
            .or(self.error)
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
    }
}

pub mod wallet {
    use super::*;

    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct WalletView {
        pub id: String,
        pub name: String,
        /// Major units (e.g. `12.5` for 12.50 EUR).
        pub balance: f64,
        pub currency: String,
        pub is_active: bool,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "UPPERCASE")]
    pub enum TransactionType {
        Credit,
        Debit,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "UPPERCASE")]
    pub enum TransactionStatus {
        Pending,
        Completed,
        Failed,
    }

    #[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct RecipientInfo {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub email: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub phone: Option<String>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionView {
        pub id: String,
        /// Major units, never negative. Direction is carried by `type`.
        pub amount: f64,
        pub currency: String,
        #[serde(rename = "type")]
        pub kind: TransactionType,
        pub status: TransactionStatus,
        #[serde(default)]
        pub description: Option<String>,
        #[serde(default)]
        pub source_wallet_id: Option<String>,
        #[serde(default)]
        pub destination_wallet_id: Option<String>,
        #[serde(default)]
        pub recipient_info: Option<RecipientInfo>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    /// Query string for `GET transactions`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionListQuery {
        #[serde(skip_serializing_if = "Option::is_none")]
        pub wallet_id: Option<String>,
        #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
        pub kind: Option<TransactionType>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub status: Option<TransactionStatus>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub limit: Option<u32>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionNew {
        pub amount: f64,
        pub currency: String,
        pub source_wallet_id: String,
        /// Email, phone number or wallet id of the counterpart.
        pub recipient_identifier: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub description: Option<String>,
        #[serde(rename = "type")]
        pub kind: TransactionType,
        /// Optional idempotency key for safely retrying the same create request.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub idempotency_key: Option<String>,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "UPPERCASE")]
    pub enum FeeKind {
        Transfer,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct FeeRequest {
        pub amount: f64,
        pub currency: String,
        #[serde(rename = "type")]
        pub kind: FeeKind,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct FeeResponse {
        pub fee: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MoneyRequestNew {
        pub amount: f64,
        pub currency: String,
        pub destination_wallet_id: String,
        /// Email or phone number of the person asked to pay.
        pub sender_identifier: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub description: Option<String>,
    }
}

pub mod scheduled {
    use super::*;
    use crate::transaction::RecipientInfo;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "UPPERCASE")]
    pub enum RecurrenceType {
        Once,
        Daily,
        Weekly,
        Monthly,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "UPPERCASE")]
    pub enum ScheduledStatus {
        Pending,
        Completed,
        Cancelled,
        Failed,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ScheduledTransactionView {
        pub id: String,
        pub amount: f64,
        pub currency: String,
        #[serde(default)]
        pub description: Option<String>,
        pub source_wallet_id: String,
        #[serde(default)]
        pub destination_wallet_id: Option<String>,
        #[serde(default)]
        pub recipient_info: Option<RecipientInfo>,
        pub scheduled_date: DateTime<Utc>,
        pub recurrence_type: RecurrenceType,
        #[serde(default)]
        pub recurrence_end_date: Option<DateTime<Utc>>,
        pub status: ScheduledStatus,
        #[serde(default)]
        pub last_execution_date: Option<DateTime<Utc>>,
        #[serde(default)]
        pub next_execution_date: Option<DateTime<Utc>>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    /// Query string for `GET scheduled-transactions`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ScheduledListQuery {
        #[serde(skip_serializing_if = "Option::is_none")]
        pub status: Option<ScheduledStatus>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub recurrence_type: Option<RecurrenceType>,
    }

    /// Request body for creating a scheduled transaction.
    ///
    /// Exactly one of `destination_wallet_id` / `recipient_info` is set.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ScheduledTransactionNew {
        pub amount: f64,
        pub currency: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub description: Option<String>,
        pub source_wallet_id: String,
        pub scheduled_date: DateTime<Utc>,
        pub recurrence_type: RecurrenceType,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub recurrence_end_date: Option<DateTime<Utc>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub destination_wallet_id: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub recipient_info: Option<RecipientInfo>,
        /// Optional idempotency key for safely retrying the same create request.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub idempotency_key: Option<String>,
    }

    /// Partial update; absent fields are left untouched by the server.
    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ScheduledTransactionUpdate {
        #[serde(skip_serializing_if = "Option::is_none")]
        pub amount: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub description: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub scheduled_date: Option<DateTime<Utc>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub recurrence_type: Option<RecurrenceType>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub recurrence_end_date: Option<DateTime<Utc>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ScheduledTransactionCancelled {
        pub id: String,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_view_reads_camel_case_payload() {
        let raw = r#"{
            "id": "t1",
            "amount": 12.5,
            "currency": "EUR",
            "type": "DEBIT",
            "status": "PENDING",
            "sourceWalletId": "w1",
            "createdAt": "2026-03-01T10:00:00Z",
            "updatedAt": "2026-03-01T10:00:00+02:00"
        }"#;
        let view: transaction::TransactionView = serde_json::from_str(raw).unwrap();
        assert_eq!(view.kind, transaction::TransactionType::Debit);
        assert_eq!(view.status, transaction::TransactionStatus::Pending);
        assert_eq!(view.source_wallet_id.as_deref(), Some("w1"));
        assert!(view.destination_wallet_id.is_none());
        assert!(view.recipient_info.is_none());
    }

    #[test]
    fn update_skips_absent_fields() {
        let patch = scheduled::ScheduledTransactionUpdate {
            description: Some("rent".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({ "description": "rent" }));
    }

    #[test]
    fn error_response_prefers_message() {
        let body: ErrorResponse =
            serde_json::from_str(r#"{"message":"nope","error":"old"}"#).unwrap();
        assert_eq!(body.into_message().as_deref(), Some("nope"));

        let body: ErrorResponse = serde_json::from_str(r#"{"error":" old "}"#).unwrap();
        assert_eq!(body.into_message().as_deref(), Some("old"));

        let body: ErrorResponse = serde_json::from_str("{}").unwrap();
        assert!(body.into_message().is_none());
    }
}
