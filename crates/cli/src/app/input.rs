//! Parsing of raw command line values into engine types.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use engine::EngineError;

use crate::error::{AppError, Result};

/// Accepts an RFC 3339 timestamp, or a plain `YYYY-MM-DD` taken as the
/// start of that day in `tz`.
pub fn parse_date(raw: &str, tz: Tz) -> Result<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(value) = DateTime::parse_from_rfc3339(raw) {
        return Ok(value.with_timezone(&Utc));
    }

    let day = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::Input(format!("invalid date {raw}, expected YYYY-MM-DD")))?;
    let midnight = day
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| AppError::Input(format!("invalid date {raw}")))?;
    tz.from_local_datetime(&midnight)
        .earliest()
        .map(|value| value.with_timezone(&Utc))
        .ok_or_else(|| AppError::Input(format!("{raw} does not exist in {tz}")))
}

pub fn parse_optional_date(raw: Option<&str>, tz: Tz) -> Result<Option<DateTime<Utc>>> {
    raw.map(|raw| parse_date(raw, tz)).transpose()
}

/// Parses an optional flag with the engine's own spelling rules.
pub fn parse_optional<T>(raw: Option<&str>) -> Result<Option<T>>
where
    T: FromStr<Err = EngineError>,
{
    Ok(raw.map(str::parse).transpose()?)
}

#[cfg(test)]
mod tests {
    use engine::{Currency, Recurrence, TransactionStatus};

    use super::*;

    #[test]
    fn plain_dates_start_the_day_in_the_timezone() {
        let utc = parse_date("2026-11-01", chrono_tz::UTC).unwrap();
        assert_eq!(utc, Utc.with_ymd_and_hms(2026, 11, 1, 0, 0, 0).unwrap());

        let rome = parse_date("2026-11-01", chrono_tz::Europe::Rome).unwrap();
        assert_eq!(rome, Utc.with_ymd_and_hms(2026, 10, 31, 23, 0, 0).unwrap());
    }

    #[test]
    fn rfc3339_keeps_its_offset() {
        let value = parse_date("2026-11-01T10:00:00+02:00", chrono_tz::UTC).unwrap();
        assert_eq!(value, Utc.with_ymd_and_hms(2026, 11, 1, 8, 0, 0).unwrap());
    }

    #[test]
    fn rejects_garbage_dates() {
        assert!(matches!(
            parse_date("next tuesday", chrono_tz::UTC),
            Err(AppError::Input(_))
        ));
        assert!(parse_optional_date(None, chrono_tz::UTC).unwrap().is_none());
    }

    #[test]
    fn optional_values_use_engine_spellings() {
        assert_eq!(
            parse_optional::<TransactionStatus>(Some("pending")).unwrap(),
            Some(TransactionStatus::Pending)
        );
        assert_eq!(
            parse_optional::<Recurrence>(Some("weekly")).unwrap(),
            Some(Recurrence::Weekly)
        );
        assert_eq!(parse_optional::<Currency>(None).unwrap(), None);
        assert!(parse_optional::<Recurrence>(Some("yearly")).is_err());
    }
}
