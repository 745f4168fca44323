//! Advisory fee quotes for the send flow.

use crate::{Currency, FeeRequest, Money, TransactionApi};

#[derive(Clone, Debug, PartialEq, Eq)]
struct FeeKey {
    amount: Money,
    currency: Currency,
    source_wallet_id: String,
}

/// Asks the backend for the fee of a prospective transfer.
///
/// A quote is informational only: a failed quote never blocks the send.
/// The last successful quote is kept and reused while the amount, currency
/// and source wallet stay the same. Failures are not remembered, so the next
/// call retries.
#[derive(Clone, Debug, Default)]
pub struct FeeQuoter {
    last: Option<(FeeKey, Money)>,
}

impl FeeQuoter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the fee for sending `amount`, or `None` when there is nothing
    /// to quote or the backend could not answer.
    pub async fn quote<A>(
        &mut self,
        api: &A,
        amount: Money,
        currency: Currency,
        source_wallet_id: &str,
    ) -> Option<Money>
    where
        A: TransactionApi + ?Sized,
    {
        if !amount.is_positive() {
            return None;
        }

        let key = FeeKey {
            amount,
            currency,
            source_wallet_id: source_wallet_id.to_string(),
        };
        if let Some((last_key, fee)) = &self.last
            && *last_key == key
        {
            return Some(*fee);
        }

        match api
            .calculate_transaction_fee(FeeRequest { amount, currency })
            .await
        {
            Ok(fee) => {
                tracing::debug!("fee for {} quoted: {}", amount.format(currency), fee.format(currency));
                self.last = Some((key, fee));
                Some(fee)
            }
            Err(err) => {
                tracing::warn!("fee quote failed: {err}");
                None
            }
        }
    }

    /// The last successful quote, if any.
    pub fn last_quote(&self) -> Option<Money> {
        self.last.as_ref().map(|(_, fee)| *fee)
    }
}
