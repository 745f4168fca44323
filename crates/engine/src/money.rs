use crate::{Currency, EngineError, ResultEngine};

/// Largest magnitude accepted when converting from a wire `f64`.
///
/// Beyond 2^53 an `f64` no longer represents every integer.
const MAX_SAFE_MINOR: f64 = 9_007_199_254_740_991.0;

/// Money amount represented as an integer number of **minor units**.
///
/// Use this type for all monetary values (transaction amounts, balances,
/// fees) to avoid floating-point drift. The currency is carried alongside,
/// never inside.
///
/// # Examples
///
/// ```rust
/// use engine::{Currency, Money};
///
/// let amount = Money::new(12_34);
/// assert_eq!(amount.minor(), 1234);
/// assert_eq!(amount.format(Currency::EUR), "12.34 EUR");
/// ```
///
/// Parsing from user input (accepts `.` or `,` as decimal separator; rejects
/// more decimals than the currency has minor units):
///
/// ```rust
/// use engine::{Currency, Money};
///
/// assert_eq!(Money::parse_major("10", Currency::EUR).unwrap().minor(), 1000);
/// assert_eq!(Money::parse_major("10,5", Currency::EUR).unwrap().minor(), 1050);
/// assert!(Money::parse_major("12.345", Currency::EUR).is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Creates a new amount from minor units.
    #[must_use]
    pub const fn new(minor: i64) -> Self {
        Self(minor)
    }

    /// Returns the raw value in minor units.
    #[must_use]
    pub const fn minor(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    /// Parses a decimal string in major units.
    ///
    /// Accepts `.` or `,` as decimal separator and an optional leading
    /// `+`/`-`. Rejects empty input, stray characters and more fractional
    /// digits than `currency.minor_units()`.
    pub fn parse_major(input: &str, currency: Currency) -> ResultEngine<Self> {
        let empty = || EngineError::InvalidAmount("empty amount".to_string());
        let invalid = || EngineError::InvalidAmount("invalid amount".to_string());
        let overflow = || EngineError::InvalidAmount("amount too large".to_string());

        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(empty());
        }

        let (negative, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
            (true, stripped)
        } else if let Some(stripped) = trimmed.strip_prefix('+') {
            (false, stripped)
        } else {
            (false, trimmed)
        };

        let rest = rest.trim();
        if rest.is_empty() {
            return Err(empty());
        }

        let rest = rest.replace(',', ".");
        let mut parts = rest.split('.');
        let major_str = parts.next().ok_or_else(invalid)?;
        let frac_str = parts.next();
        if parts.next().is_some() {
            return Err(invalid());
        }

        if major_str.is_empty() || !major_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let major: i64 = major_str.parse().map_err(|_| overflow())?;

        let digits = usize::from(currency.minor_units());
        let frac: i64 = match frac_str {
            None | Some("") => 0,
            Some(frac) => {
                if !frac.chars().all(|c| c.is_ascii_digit()) {
                    return Err(invalid());
                }
                if frac.len() > digits {
                    return Err(EngineError::InvalidAmount(format!(
                        "too many decimals for {currency}"
                    )));
                }
                let value: i64 = frac.parse().map_err(|_| invalid())?;
                value * 10i64.pow((digits - frac.len()) as u32)
            }
        };

        let total = major
            .checked_mul(currency.scale())
            .and_then(|v| v.checked_add(frac))
            .ok_or_else(overflow)?;

        let signed = if negative {
            total.checked_neg().ok_or_else(overflow)?
        } else {
            total
        };
        Ok(Money(signed))
    }

    /// Converts a wire amount expressed in major units.
    ///
    /// The value is rounded to the nearest minor unit.
    pub fn from_major_f64(value: f64, currency: Currency) -> ResultEngine<Self> {
        if !value.is_finite() {
            return Err(EngineError::InvalidAmount(format!(
                "non-finite amount: {value}"
            )));
        }
        let minor = (value * currency.scale() as f64).round();
        if minor.abs() > MAX_SAFE_MINOR {
            return Err(EngineError::InvalidAmount("amount too large".to_string()));
        }
        Ok(Money(minor as i64))
    }

    /// Converts to major units for the wire.
    #[must_use]
    pub fn to_major_f64(self, currency: Currency) -> f64 {
        self.0 as f64 / currency.scale() as f64
    }

    /// Formats as `<major>.<minor> <CODE>`, e.g. `-12.30 EUR` or `500 JPY`.
    #[must_use]
    pub fn format(self, currency: Currency) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let scale = currency.scale().unsigned_abs();
        let digits = usize::from(currency.minor_units());
        if digits == 0 {
            return format!("{sign}{abs} {currency}");
        }
        let major = abs / scale;
        let minor = abs % scale;
        format!("{sign}{major}.{minor:0digits$} {currency}")
    }
}
