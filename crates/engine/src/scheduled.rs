//! Scheduled (future-dated or recurring) transactions.
//!
//! A scheduled transaction is an instruction the backend turns into real
//! transactions later. From the client's perspective it can be edited or
//! cancelled only while it is `Pending`; every other status is terminal.

use std::{fmt, str::FromStr};

use api_types::scheduled as wire;
use chrono::{DateTime, Utc};

use crate::{Currency, EngineError, Money, RecipientInfo, ResultEngine, ValidationError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Recurrence {
    Once,
    Daily,
    Weekly,
    Monthly,
}

impl Recurrence {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Once => "ONCE",
            Self::Daily => "DAILY",
            Self::Weekly => "WEEKLY",
            Self::Monthly => "MONTHLY",
        }
    }

    /// Everything except `Once` repeats and therefore needs an end date.
    #[must_use]
    pub fn is_recurring(self) -> bool {
        self != Self::Once
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Recurrence {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ONCE" => Ok(Self::Once),
            "DAILY" => Ok(Self::Daily),
            "WEEKLY" => Ok(Self::Weekly),
            "MONTHLY" => Ok(Self::Monthly),
            other => Err(EngineError::UnknownVariant(format!(
                "invalid recurrence: {other}"
            ))),
        }
    }
}

impl From<wire::RecurrenceType> for Recurrence {
    fn from(value: wire::RecurrenceType) -> Self {
        match value {
            wire::RecurrenceType::Once => Self::Once,
            wire::RecurrenceType::Daily => Self::Daily,
            wire::RecurrenceType::Weekly => Self::Weekly,
            wire::RecurrenceType::Monthly => Self::Monthly,
        }
    }
}

impl From<Recurrence> for wire::RecurrenceType {
    fn from(value: Recurrence) -> Self {
        match value {
            Recurrence::Once => Self::Once,
            Recurrence::Daily => Self::Daily,
            Recurrence::Weekly => Self::Weekly,
            Recurrence::Monthly => Self::Monthly,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScheduledStatus {
    Pending,
    Completed,
    Cancelled,
    Failed,
}

impl ScheduledStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
            Self::Failed => "FAILED",
        }
    }

    /// Completed, cancelled and failed schedules are immutable.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        self != Self::Pending
    }
}

impl fmt::Display for ScheduledStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScheduledStatus {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(Self::Pending),
            "COMPLETED" => Ok(Self::Completed),
            "CANCELLED" | "CANCELED" => Ok(Self::Cancelled),
            "FAILED" => Ok(Self::Failed),
            other => Err(EngineError::UnknownVariant(format!(
                "invalid scheduled status: {other}"
            ))),
        }
    }
}

impl From<wire::ScheduledStatus> for ScheduledStatus {
    fn from(value: wire::ScheduledStatus) -> Self {
        match value {
            wire::ScheduledStatus::Pending => Self::Pending,
            wire::ScheduledStatus::Completed => Self::Completed,
            wire::ScheduledStatus::Cancelled => Self::Cancelled,
            wire::ScheduledStatus::Failed => Self::Failed,
        }
    }
}

impl From<ScheduledStatus> for wire::ScheduledStatus {
    fn from(value: ScheduledStatus) -> Self {
        match value {
            ScheduledStatus::Pending => Self::Pending,
            ScheduledStatus::Completed => Self::Completed,
            ScheduledStatus::Cancelled => Self::Cancelled,
            ScheduledStatus::Failed => Self::Failed,
        }
    }
}

/// Where the money of a scheduled transaction goes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Destination {
    /// Internal transfer to another wallet.
    Wallet(String),
    /// Payment to someone outside the product.
    External(RecipientInfo),
}

impl Destination {
    #[must_use]
    pub fn wallet_id(&self) -> Option<&str> {
        match self {
            Self::Wallet(id) => Some(id),
            Self::External(_) => None,
        }
    }

    #[must_use]
    pub fn recipient(&self) -> Option<&RecipientInfo> {
        match self {
            Self::Wallet(_) => None,
            Self::External(info) => Some(info),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScheduledTransaction {
    pub id: String,
    pub amount: Money,
    pub currency: Currency,
    pub description: Option<String>,
    pub source_wallet_id: String,
    pub destination: Destination,
    pub scheduled_date: DateTime<Utc>,
    pub recurrence: Recurrence,
    /// Always present when `recurrence.is_recurring()`, never before
    /// `scheduled_date`.
    pub recurrence_end_date: Option<DateTime<Utc>>,
    pub status: ScheduledStatus,
    pub last_execution_date: Option<DateTime<Utc>>,
    pub next_execution_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ScheduledTransaction {
    /// Returns `true` while the client may still edit or cancel the schedule.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        self.status == ScheduledStatus::Pending
    }

    #[must_use]
    pub fn recipient_name(&self) -> Option<&str> {
        self.destination.recipient().and_then(|r| r.name.as_deref())
    }

    /// Returns `true` if the schedule debits or credits `wallet_id`.
    #[must_use]
    pub fn touches_wallet(&self, wallet_id: &str) -> bool {
        self.source_wallet_id == wallet_id || self.destination.wallet_id() == Some(wallet_id)
    }
}

/// Checks the recurrence invariants shared by requests, patches and
/// server payloads.
fn check_schedule(
    scheduled_date: DateTime<Utc>,
    recurrence: Recurrence,
    recurrence_end_date: Option<DateTime<Utc>>,
) -> Result<(), ValidationError> {
    match recurrence_end_date {
        None if recurrence.is_recurring() => Err(ValidationError::MissingRecurrenceEndDate),
        Some(end) if end < scheduled_date => Err(ValidationError::EndBeforeStart),
        _ => Ok(()),
    }
}

impl TryFrom<wire::ScheduledTransactionView> for ScheduledTransaction {
    type Error = EngineError;

    fn try_from(view: wire::ScheduledTransactionView) -> Result<Self, Self::Error> {
        let id = view.id;
        let malformed =
            |msg: String| EngineError::MalformedResponse(format!("scheduled transaction {id}: {msg}"));

        let currency =
            Currency::try_from(view.currency.as_str()).map_err(|e| malformed(e.to_string()))?;
        let amount =
            Money::from_major_f64(view.amount, currency).map_err(|e| malformed(e.to_string()))?;
        if amount.is_negative() {
            return Err(malformed("negative amount".to_string()));
        }

        let destination = match (view.destination_wallet_id, view.recipient_info) {
            (Some(wallet_id), None) => Destination::Wallet(wallet_id),
            (None, Some(info)) => Destination::External(info.into()),
            (Some(_), Some(_)) => {
                return Err(malformed(
                    "both destination wallet and recipient are set".to_string(),
                ));
            }
            (None, None) => return Err(malformed("missing destination".to_string())),
        };

        let recurrence = Recurrence::from(view.recurrence_type);
        check_schedule(view.scheduled_date, recurrence, view.recurrence_end_date)
            .map_err(|e| malformed(e.to_string()))?;

        Ok(Self {
            id,
            amount,
            currency,
            description: view.description,
            source_wallet_id: view.source_wallet_id,
            destination,
            scheduled_date: view.scheduled_date,
            recurrence,
            recurrence_end_date: view.recurrence_end_date,
            status: view.status.into(),
            last_execution_date: view.last_execution_date,
            next_execution_date: view.next_execution_date,
            created_at: view.created_at,
            updated_at: view.updated_at,
        })
    }
}

/// Converts a list payload, failing on the first malformed record.
pub fn scheduled_from_wire(
    views: Vec<wire::ScheduledTransactionView>,
) -> ResultEngine<Vec<ScheduledTransaction>> {
    views.into_iter().map(ScheduledTransaction::try_from).collect()
}

/// Server-side narrowing for `GET scheduled-transactions`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScheduledQuery {
    pub status: Option<ScheduledStatus>,
    pub recurrence: Option<Recurrence>,
}

impl From<&ScheduledQuery> for wire::ScheduledListQuery {
    fn from(query: &ScheduledQuery) -> Self {
        Self {
            status: query.status.map(Into::into),
            recurrence_type: query.recurrence.map(Into::into),
        }
    }
}

/// Fields of a scheduled transaction before the recurrence and destination
/// rules are checked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScheduleDraft {
    pub amount: Money,
    pub currency: Currency,
    pub description: Option<String>,
    pub source_wallet_id: String,
    pub destination: Destination,
    pub scheduled_date: DateTime<Utc>,
    pub recurrence: Recurrence,
    pub recurrence_end_date: Option<DateTime<Utc>>,
}

/// A scheduled transaction ready to be submitted.
///
/// The only way to obtain one is [`NewScheduledTransaction::new`] (usually
/// through `validation::ScheduleForm`), so a request that violates the
/// recurrence rules can never reach the network.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewScheduledTransaction {
    amount: Money,
    currency: Currency,
    description: Option<String>,
    source_wallet_id: String,
    destination: Destination,
    scheduled_date: DateTime<Utc>,
    recurrence: Recurrence,
    recurrence_end_date: Option<DateTime<Utc>>,
}

impl NewScheduledTransaction {
    pub fn new(draft: ScheduleDraft) -> Result<Self, ValidationError> {
        let ScheduleDraft {
            amount,
            currency,
            description,
            source_wallet_id,
            destination,
            scheduled_date,
            recurrence,
            recurrence_end_date,
        } = draft;
        if !amount.is_positive() {
            return Err(ValidationError::InvalidAmount(
                "amount must be greater than zero".to_string(),
            ));
        }
        if source_wallet_id.trim().is_empty() {
            return Err(ValidationError::MissingSourceWallet);
        }
        match &destination {
            Destination::Wallet(id) if id.trim().is_empty() => {
                return Err(ValidationError::MissingRecipient);
            }
            Destination::Wallet(id) if *id == source_wallet_id => {
                return Err(ValidationError::SameWallet);
            }
            Destination::External(info) if info.is_empty() => {
                return Err(ValidationError::MissingRecipient);
            }
            _ => {}
        }
        check_schedule(scheduled_date, recurrence, recurrence_end_date)?;

        Ok(Self {
            amount,
            currency,
            description,
            source_wallet_id,
            destination,
            scheduled_date,
            recurrence,
            recurrence_end_date,
        })
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn source_wallet_id(&self) -> &str {
        &self.source_wallet_id
    }

    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    pub fn scheduled_date(&self) -> DateTime<Utc> {
        self.scheduled_date
    }

    pub fn recurrence(&self) -> Recurrence {
        self.recurrence
    }

    pub fn recurrence_end_date(&self) -> Option<DateTime<Utc>> {
        self.recurrence_end_date
    }
}

impl From<&NewScheduledTransaction> for wire::ScheduledTransactionNew {
    fn from(req: &NewScheduledTransaction) -> Self {
        Self {
            amount: req.amount.to_major_f64(req.currency),
            currency: req.currency.code().to_string(),
            description: req.description.clone(),
            source_wallet_id: req.source_wallet_id.clone(),
            scheduled_date: req.scheduled_date,
            recurrence_type: req.recurrence.into(),
            recurrence_end_date: req.recurrence_end_date,
            destination_wallet_id: req.destination.wallet_id().map(ToString::to_string),
            recipient_info: req.destination.recipient().cloned().map(Into::into),
            idempotency_key: None,
        }
    }
}

/// Partial update of a pending scheduled transaction.
///
/// `None` means "leave as is"; the server keeps every field not named here.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScheduledTransactionPatch {
    pub amount: Option<Money>,
    /// Currency `amount` is expressed in. Never sent: the currency of a
    /// schedule cannot change.
    pub currency: Currency,
    pub description: Option<String>,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub recurrence: Option<Recurrence>,
    pub recurrence_end_date: Option<DateTime<Utc>>,
}

impl ScheduledTransactionPatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.amount.is_none()
            && self.description.is_none()
            && self.scheduled_date.is_none()
            && self.recurrence.is_none()
            && self.recurrence_end_date.is_none()
    }

    /// Returns `current` with the patch applied, leaving every other field
    /// untouched.
    #[must_use]
    pub fn apply_to(&self, current: &ScheduledTransaction) -> ScheduledTransaction {
        let mut next = current.clone();
        if let Some(amount) = self.amount {
            next.amount = amount;
        }
        if let Some(description) = &self.description {
            next.description = Some(description.clone());
        }
        if let Some(date) = self.scheduled_date {
            next.scheduled_date = date;
        }
        if let Some(recurrence) = self.recurrence {
            next.recurrence = recurrence;
        }
        if let Some(end) = self.recurrence_end_date {
            next.recurrence_end_date = Some(end);
        }
        next
    }

    /// Checks that applying the patch to `current` keeps the recurrence
    /// invariants.
    pub fn check_against(&self, current: &ScheduledTransaction) -> Result<(), ValidationError> {
        let next = self.apply_to(current);
        check_schedule(next.scheduled_date, next.recurrence, next.recurrence_end_date)
    }

    #[must_use]
    pub fn to_wire(&self) -> wire::ScheduledTransactionUpdate {
        wire::ScheduledTransactionUpdate {
            amount: self.amount.map(|a| a.to_major_f64(self.currency)),
            description: self.description.clone(),
            scheduled_date: self.scheduled_date,
            recurrence_type: self.recurrence.map(Into::into),
            recurrence_end_date: self.recurrence_end_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 11, day, 9, 0, 0).unwrap()
    }

    fn draft(recurrence: Recurrence, end: Option<DateTime<Utc>>) -> ScheduleDraft {
        ScheduleDraft {
            amount: Money::new(100),
            currency: Currency::EUR,
            description: None,
            source_wallet_id: "w1".to_string(),
            destination: Destination::Wallet("w2".to_string()),
            scheduled_date: at(1),
            recurrence,
            recurrence_end_date: end,
        }
    }

    fn view() -> wire::ScheduledTransactionView {
        wire::ScheduledTransactionView {
            id: "s1".to_string(),
            amount: 50.0,
            currency: "EUR".to_string(),
            description: Some("Rent".to_string()),
            source_wallet_id: "w1".to_string(),
            destination_wallet_id: Some("w2".to_string()),
            recipient_info: None,
            scheduled_date: at(1),
            recurrence_type: wire::RecurrenceType::Monthly,
            recurrence_end_date: Some(at(30)),
            status: wire::ScheduledStatus::Pending,
            last_execution_date: None,
            next_execution_date: Some(at(1)),
            created_at: at(1),
            updated_at: at(1),
        }
    }

    #[test]
    fn converts_wallet_destination() {
        let tx = ScheduledTransaction::try_from(view()).unwrap();
        assert_eq!(tx.destination, Destination::Wallet("w2".to_string()));
        assert_eq!(tx.amount, Money::new(5000));
        assert!(tx.is_editable());
        assert!(tx.touches_wallet("w2"));
    }

    #[test]
    fn rejects_ambiguous_destination() {
        let mut both = view();
        both.recipient_info = Some(api_types::transaction::RecipientInfo {
            name: Some("Bob".to_string()),
            ..Default::default()
        });
        assert!(ScheduledTransaction::try_from(both).is_err());

        let mut neither = view();
        neither.destination_wallet_id = None;
        assert!(ScheduledTransaction::try_from(neither).is_err());
    }

    #[test]
    fn rejects_recurring_payload_without_end_date() {
        let mut payload = view();
        payload.recurrence_end_date = None;
        assert!(matches!(
            ScheduledTransaction::try_from(payload),
            Err(EngineError::MalformedResponse(_))
        ));
    }

    #[test]
    fn new_requires_end_date_for_recurring() {
        let err = NewScheduledTransaction::new(draft(Recurrence::Weekly, None)).unwrap_err();
        assert_eq!(err, ValidationError::MissingRecurrenceEndDate);

        assert!(NewScheduledTransaction::new(draft(Recurrence::Once, None)).is_ok());
    }

    #[test]
    fn new_rejects_end_before_start_and_same_wallet() {
        let end_before = NewScheduledTransaction::new(ScheduleDraft {
            scheduled_date: at(10),
            ..draft(Recurrence::Daily, Some(at(10) - Duration::days(1)))
        });
        assert_eq!(end_before.unwrap_err(), ValidationError::EndBeforeStart);

        let same = NewScheduledTransaction::new(ScheduleDraft {
            destination: Destination::Wallet("w1".to_string()),
            ..draft(Recurrence::Once, None)
        });
        assert_eq!(same.unwrap_err(), ValidationError::SameWallet);
    }

    #[test]
    fn wire_request_carries_exactly_one_destination() {
        let req = NewScheduledTransaction::new(ScheduleDraft {
            amount: Money::new(1999),
            description: Some("Gym".to_string()),
            destination: Destination::External(RecipientInfo {
                name: Some("Gym Ltd".to_string()),
                ..Default::default()
            }),
            scheduled_date: at(3),
            ..draft(Recurrence::Once, None)
        })
        .unwrap();
        let body = wire::ScheduledTransactionNew::from(&req);
        assert!(body.destination_wallet_id.is_none());
        assert_eq!(
            body.recipient_info.and_then(|r| r.name).as_deref(),
            Some("Gym Ltd")
        );
        assert_eq!(body.amount, 19.99);
    }

    #[test]
    fn patch_keeps_untouched_fields() {
        let current = ScheduledTransaction::try_from(view()).unwrap();
        let patch = ScheduledTransactionPatch {
            description: Some("New rent".to_string()),
            ..Default::default()
        };
        let next = patch.apply_to(&current);
        assert_eq!(next.description.as_deref(), Some("New rent"));
        assert_eq!(next.amount, current.amount);
        assert_eq!(next.destination, current.destination);
        assert_eq!(next.recurrence_end_date, current.recurrence_end_date);
    }

    #[test]
    fn patch_is_checked_against_current_record() {
        let mut current = ScheduledTransaction::try_from(view()).unwrap();
        current.recurrence = Recurrence::Once;
        current.recurrence_end_date = None;

        let patch = ScheduledTransactionPatch {
            recurrence: Some(Recurrence::Daily),
            ..Default::default()
        };
        assert_eq!(
            patch.check_against(&current),
            Err(ValidationError::MissingRecurrenceEndDate)
        );
    }
}
