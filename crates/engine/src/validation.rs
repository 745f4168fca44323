//! Client-side form validation.
//!
//! Forms hold raw user input. Validating a form yields the typed request the
//! store accepts, or a [`ValidationError`] to show inline. Nothing here talks
//! to the store or the network.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::{
    Currency, Destination, Money, NewMoneyRequest, NewScheduledTransaction, NewTransaction,
    Recurrence, ScheduleDraft, ScheduledTransaction, ScheduledTransactionPatch, TransactionType,
    Wallet,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter an amount.")]
    MissingAmount,
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Insufficient balance: {available} available.")]
    InsufficientBalance { available: String },
    #[error("Wallet {0} is not active.")]
    InactiveWallet(String),
    #[error("Wallet currency is {wallet}, got {amount}.")]
    CurrencyMismatch { wallet: Currency, amount: Currency },
    #[error("Please choose a source wallet.")]
    MissingSourceWallet,
    #[error("Please enter a recipient.")]
    MissingRecipient,
    #[error("Please choose a date.")]
    MissingScheduledDate,
    #[error("Recurring transactions need an end date.")]
    MissingRecurrenceEndDate,
    #[error("The end date must not precede the scheduled date.")]
    EndBeforeStart,
    #[error("The scheduled date is in the past.")]
    ScheduledInPast,
    #[error("Source and destination wallet must differ.")]
    SameWallet,
    #[error("Nothing to update.")]
    EmptyPatch,
}

/// Parses a required, strictly positive amount.
pub fn parse_amount(raw: &str, currency: Currency) -> Result<Money, ValidationError> {
    if raw.trim().is_empty() {
        return Err(ValidationError::MissingAmount);
    }
    let amount = Money::parse_major(raw, currency)
        .map_err(|err| ValidationError::InvalidAmount(err.to_string()))?;
    if !amount.is_positive() {
        return Err(ValidationError::InvalidAmount(
            "amount must be greater than zero".to_string(),
        ));
    }
    Ok(amount)
}

fn normalize_optional_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn normalize_required(value: &str, missing: ValidationError) -> Result<String, ValidationError> {
    normalize_optional_text(value).ok_or(missing)
}

/// Checks that `wallet` can be used as the source of `amount`.
///
/// `check_balance` is off for schedules: the balance at execution time is
/// unknown.
fn check_source_wallet(
    wallet: &Wallet,
    amount: Money,
    currency: Currency,
    check_balance: bool,
) -> Result<(), ValidationError> {
    if !wallet.is_active {
        return Err(ValidationError::InactiveWallet(wallet.name.clone()));
    }
    if wallet.currency != currency {
        return Err(ValidationError::CurrencyMismatch {
            wallet: wallet.currency,
            amount: currency,
        });
    }
    if check_balance && !wallet.covers(amount) {
        return Err(ValidationError::InsufficientBalance {
            available: wallet.balance.format(wallet.currency),
        });
    }
    Ok(())
}

/// Raw input of the "send money" screen.
#[derive(Clone, Debug, Default)]
pub struct SendForm {
    pub amount: String,
    pub currency: Currency,
    pub source_wallet_id: String,
    /// Email, phone number or wallet id.
    pub recipient: String,
    pub description: String,
    pub kind: Option<TransactionType>,
}

impl SendForm {
    /// Validates the form.
    ///
    /// When the caller knows the source wallet it is checked for activity,
    /// currency and (for debits) balance.
    pub fn validate(&self, source_wallet: Option<&Wallet>) -> Result<NewTransaction, ValidationError> {
        let amount = parse_amount(&self.amount, self.currency)?;
        let source_wallet_id =
            normalize_required(&self.source_wallet_id, ValidationError::MissingSourceWallet)?;
        let recipient_identifier =
            normalize_required(&self.recipient, ValidationError::MissingRecipient)?;
        if recipient_identifier == source_wallet_id {
            return Err(ValidationError::SameWallet);
        }
        let kind = self.kind.unwrap_or(TransactionType::Debit);

        if let Some(wallet) = source_wallet {
            check_source_wallet(wallet, amount, self.currency, kind == TransactionType::Debit)?;
        }

        Ok(NewTransaction {
            amount,
            currency: self.currency,
            source_wallet_id,
            recipient_identifier,
            description: normalize_optional_text(&self.description),
            kind,
        })
    }
}

/// Raw input of the "request money" screen.
#[derive(Clone, Debug, Default)]
pub struct RequestForm {
    pub amount: String,
    pub currency: Currency,
    pub destination_wallet_id: String,
    /// Email or phone number of the person asked to pay.
    pub sender: String,
    pub description: String,
}

impl RequestForm {
    pub fn validate(&self) -> Result<NewMoneyRequest, ValidationError> {
        let amount = parse_amount(&self.amount, self.currency)?;
        let destination_wallet_id = normalize_required(
            &self.destination_wallet_id,
            ValidationError::MissingSourceWallet,
        )?;
        let sender_identifier = normalize_required(&self.sender, ValidationError::MissingRecipient)?;

        Ok(NewMoneyRequest {
            amount,
            currency: self.currency,
            destination_wallet_id,
            sender_identifier,
            description: normalize_optional_text(&self.description),
        })
    }
}

/// Raw input of the "schedule transaction" screen.
///
/// The destination is chosen explicitly by the caller.
#[derive(Clone, Debug)]
pub struct ScheduleForm {
    pub amount: String,
    pub currency: Currency,
    pub description: String,
    pub source_wallet_id: String,
    pub destination: Destination,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub recurrence: Recurrence,
    pub recurrence_end_date: Option<DateTime<Utc>>,
}

impl ScheduleForm {
    pub fn validate(
        &self,
        now: DateTime<Utc>,
        source_wallet: Option<&Wallet>,
    ) -> Result<NewScheduledTransaction, ValidationError> {
        let amount = parse_amount(&self.amount, self.currency)?;
        let scheduled_date = self
            .scheduled_date
            .ok_or(ValidationError::MissingScheduledDate)?;
        if scheduled_date < now {
            return Err(ValidationError::ScheduledInPast);
        }
        if let Some(wallet) = source_wallet {
            check_source_wallet(wallet, amount, self.currency, false)?;
        }

        let destination = match &self.destination {
            Destination::Wallet(id) => Destination::Wallet(id.trim().to_string()),
            Destination::External(info) => Destination::External(crate::RecipientInfo {
                name: info.name.as_deref().and_then(normalize_optional_text),
                email: info.email.as_deref().and_then(normalize_optional_text),
                phone: info.phone.as_deref().and_then(normalize_optional_text),
            }),
        };

        NewScheduledTransaction::new(ScheduleDraft {
            amount,
            currency: self.currency,
            description: normalize_optional_text(&self.description),
            source_wallet_id: self.source_wallet_id.trim().to_string(),
            destination,
            scheduled_date,
            recurrence: self.recurrence,
            recurrence_end_date: self.recurrence_end_date,
        })
    }
}

/// Raw input of the "edit scheduled transaction" screen.
#[derive(Clone, Debug, Default)]
pub struct SchedulePatchForm {
    pub amount: Option<String>,
    pub description: Option<String>,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub recurrence: Option<Recurrence>,
    pub recurrence_end_date: Option<DateTime<Utc>>,
}

impl SchedulePatchForm {
    /// Validates the form on its own and, when known, against the record
    /// being edited.
    pub fn validate(
        &self,
        now: DateTime<Utc>,
        currency: Currency,
        current: Option<&ScheduledTransaction>,
    ) -> Result<ScheduledTransactionPatch, ValidationError> {
        let amount = self
            .amount
            .as_deref()
            .map(|raw| parse_amount(raw, currency))
            .transpose()?;
        if let Some(date) = self.scheduled_date
            && date < now
        {
            return Err(ValidationError::ScheduledInPast);
        }

        let patch = ScheduledTransactionPatch {
            amount,
            currency,
            description: self.description.as_deref().map(|d| d.trim().to_string()),
            scheduled_date: self.scheduled_date,
            recurrence: self.recurrence,
            recurrence_end_date: self.recurrence_end_date,
        };
        if patch.is_empty() {
            return Err(ValidationError::EmptyPatch);
        }

        if let Some(current) = current {
            patch.check_against(current)?;
        } else if patch.recurrence.is_some_and(Recurrence::is_recurring)
            && patch.recurrence_end_date.is_none()
        {
            return Err(ValidationError::MissingRecurrenceEndDate);
        }

        Ok(patch)
    }
}
