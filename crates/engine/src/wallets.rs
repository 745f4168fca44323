//! The module contains the read-only `Wallet` view.

use api_types::wallet::WalletView;

use crate::{Currency, EngineError, Money};

/// A wallet as reported by the backend.
///
/// The client never mutates wallets: they are read for display, for the
/// wallet filter and for the balance check before sending money.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Wallet {
    pub id: String,
    pub name: String,
    pub balance: Money,
    pub currency: Currency,
    pub is_active: bool,
}

impl Wallet {
    /// Returns `true` if `amount` (in the wallet currency) can be debited.
    #[must_use]
    pub fn covers(&self, amount: Money) -> bool {
        self.balance >= amount
    }
}

impl TryFrom<WalletView> for Wallet {
    type Error = EngineError;

    fn try_from(view: WalletView) -> Result<Self, Self::Error> {
        let currency = Currency::try_from(view.currency.as_str()).map_err(|err| {
            EngineError::MalformedResponse(format!("wallet {}: {err}", view.id))
        })?;
        let balance = Money::from_major_f64(view.balance, currency).map_err(|err| {
            EngineError::MalformedResponse(format!("wallet {}: {err}", view.id))
        })?;
        Ok(Self {
            id: view.id,
            name: view.name,
            balance,
            currency,
            is_active: view.is_active,
        })
    }
}

/// Finds a wallet by id.
pub fn find_wallet<'a>(wallets: &'a [Wallet], id: &str) -> Option<&'a Wallet> {
    wallets.iter().find(|wallet| wallet.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_view_and_checks_balance() {
        let wallet = Wallet::try_from(WalletView {
            id: "w1".to_string(),
            name: "Main".to_string(),
            balance: 20.0,
            currency: "eur".to_string(),
            is_active: true,
        })
        .unwrap();

        assert_eq!(wallet.balance, Money::new(2000));
        assert_eq!(wallet.currency, Currency::EUR);
        assert!(wallet.covers(Money::new(2000)));
        assert!(!wallet.covers(Money::new(2001)));
    }

    #[test]
    fn rejects_unknown_currency() {
        let err = Wallet::try_from(WalletView {
            id: "w1".to_string(),
            name: "Main".to_string(),
            balance: 1.0,
            currency: "DOGE".to_string(),
            is_active: true,
        })
        .unwrap_err();
        assert!(matches!(err, EngineError::MalformedResponse(_)));
    }
}
