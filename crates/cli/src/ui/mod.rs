//! Plain-text rendering of the screens.
//!
//! Every function writes to the `out` it is given, so screens can be checked
//! against a `Vec<u8>` in tests.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use engine::{Currency, Money, TransactionType};

pub mod prompt;
pub mod screens;

/// Formats a timestamp in the user's timezone.
pub fn format_date(value: DateTime<Utc>, tz: Tz) -> String {
    value.with_timezone(&tz).format("%Y-%m-%d %H:%M").to_string()
}

pub fn format_optional_date(value: Option<DateTime<Utc>>, tz: Tz) -> String {
    value.map_or_else(|| "-".to_string(), |value| format_date(value, tz))
}

/// Amount with the sign the viewer expects: `+` for money coming in, `-` for
/// money going out.
pub fn signed_amount(amount: Money, currency: Currency, kind: TransactionType) -> String {
    let prefix = match kind {
        TransactionType::Credit => "+",
        TransactionType::Debit => "-",
    };
    format!("{prefix}{}", amount.format(currency))
}

/// Cuts `value` to `width` characters, marking the cut with `…`.
pub fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let kept: String = value.chars().take(width.saturating_sub(1)).collect();
    format!("{kept}…")
}
