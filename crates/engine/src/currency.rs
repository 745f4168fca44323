use std::str::FromStr;

use crate::EngineError;

/// Codes whose amounts have no fractional part.
const ZERO_DECIMALS: &[&str] = &[
    "BIF", "CLP", "DJF", "GNF", "ISK", "JPY", "KMF", "KRW", "PYG", "RWF", "UGX", "UYI", "VND",
    "VUV", "XAF", "XOF", "XPF",
];

/// Codes with three fractional digits.
const THREE_DECIMALS: &[&str] = &["BHD", "IQD", "JOD", "KWD", "LYD", "OMR", "TND"];

/// ISO-4217 currency code used by wallets and transactions.
///
/// Any code made of three ASCII letters is accepted, so records in a
/// currency the client has never seen still load. Only the number of minor
/// units depends on the code.
///
/// ## Minor units
///
/// Amounts are kept as an `i64` number of **minor units** (see `Money`).
/// `minor_units()` returns how many decimal digits are used when converting
/// between major units (user input, wire values) and minor units. Codes not
/// listed in the tables above use 2.
///
/// Example: EUR has 2 minor units, so `10.50 EUR` ⇄ `1050`; JPY has none.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Currency([u8; 3]);

impl Currency {
    pub const EUR: Currency = Currency(*b"EUR");
    pub const USD: Currency = Currency(*b"USD");
    pub const GBP: Currency = Currency(*b"GBP");
    pub const CHF: Currency = Currency(*b"CHF");
    pub const JPY: Currency = Currency(*b"JPY");

    /// Canonical (upper case) currency code.
    #[must_use]
    pub fn code(&self) -> &str {
        // Built only from ASCII letters.
        std::str::from_utf8(&self.0).unwrap_or("???")
    }

    /// Number of fraction digits used when formatting/parsing amounts.
    #[must_use]
    pub fn minor_units(self) -> u8 {
        let code = self.code();
        if ZERO_DECIMALS.contains(&code) {
            0
        } else if THREE_DECIMALS.contains(&code) {
            3
        } else {
            2
        }
    }

    /// `10^minor_units`, the number of minor units in one major unit.
    #[must_use]
    pub fn scale(self) -> i64 {
        10i64.pow(u32::from(self.minor_units()))
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self::EUR
    }
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<&str> for Currency {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let trimmed = value.trim();
        match <[u8; 3]>::try_from(trimmed.as_bytes()) {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_alphabetic) => {
                Ok(Self(bytes.map(|b| b.to_ascii_uppercase())))
            }
            _ => Err(EngineError::InvalidCurrency(trimmed.to_string())),
        }
    }
}

impl FromStr for Currency {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Currency::try_from(s)
    }
}
