use std::io::{self, Write};

use chrono_tz::Tz;
use engine::{Destination, ScheduledFilter, ScheduledTransaction};

use crate::ui::{format_date, format_optional_date, truncate};

fn destination_label(destination: &Destination) -> String {
    match destination {
        Destination::Wallet(id) => format!("wallet {id}"),
        Destination::External(info) => info.label().unwrap_or("-").to_string(),
    }
}

fn recurrence_label(tx: &ScheduledTransaction, tz: Tz) -> String {
    match tx.recurrence_end_date {
        Some(end) if tx.recurrence.is_recurring() => {
            format!("{} until {}", tx.recurrence, format_date(end, tz))
        }
        _ => tx.recurrence.to_string(),
    }
}

pub fn render_list(
    out: &mut dyn Write,
    items: &[&ScheduledTransaction],
    filter: ScheduledFilter,
    tz: Tz,
) -> io::Result<()> {
    if items.is_empty() {
        return writeln!(out, "No scheduled transactions ({}).", filter.label());
    }

    writeln!(
        out,
        "{:<16}  {:<12}  {:<9}  {:<8}  {:>14}  TO",
        "NEXT", "ID", "STATUS", "REPEAT", "AMOUNT"
    )?;
    for tx in items {
        let next = tx.next_execution_date.unwrap_or(tx.scheduled_date);
        writeln!(
            out,
            "{:<16}  {:<12}  {:<9}  {:<8}  {:>14}  {}",
            format_date(next, tz),
            truncate(&tx.id, 12),
            tx.status,
            tx.recurrence,
            tx.amount.format(tx.currency),
            truncate(&destination_label(&tx.destination), 28),
        )?;
    }
    writeln!(out, "{} scheduled ({})", items.len(), filter.label())
}

pub fn render_details(out: &mut dyn Write, tx: &ScheduledTransaction, tz: Tz) -> io::Result<()> {
    writeln!(out, "Scheduled transaction {}", tx.id)?;
    writeln!(out, "  Amount:      {}", tx.amount.format(tx.currency))?;
    writeln!(out, "  Status:      {}", tx.status)?;
    writeln!(out, "  Description: {}", tx.description.as_deref().unwrap_or("-"))?;
    writeln!(out, "  From wallet: {}", tx.source_wallet_id)?;
    writeln!(out, "  To:          {}", destination_label(&tx.destination))?;
    writeln!(out, "  Date:        {}", format_date(tx.scheduled_date, tz))?;
    writeln!(out, "  Repeat:      {}", recurrence_label(tx, tz))?;
    writeln!(out, "  Last run:    {}", format_optional_date(tx.last_execution_date, tz))?;
    writeln!(out, "  Next run:    {}", format_optional_date(tx.next_execution_date, tz))?;
    if tx.is_editable() {
        writeln!(out, "  Can be edited or cancelled.")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use engine::{Currency, Money, RecipientInfo, Recurrence, ScheduledStatus};

    use super::*;

    fn scheduled(status: ScheduledStatus) -> ScheduledTransaction {
        let at = Utc.with_ymd_and_hms(2026, 11, 1, 9, 0, 0).unwrap();
        ScheduledTransaction {
            id: "s1".to_string(),
            amount: Money::new(5000),
            currency: Currency::EUR,
            description: Some("Rent".to_string()),
            source_wallet_id: "w1".to_string(),
            destination: Destination::External(RecipientInfo {
                name: Some("Landlord".to_string()),
                ..Default::default()
            }),
            scheduled_date: at,
            recurrence: Recurrence::Monthly,
            recurrence_end_date: Some(Utc.with_ymd_and_hms(2027, 5, 1, 9, 0, 0).unwrap()),
            status,
            last_execution_date: None,
            next_execution_date: Some(at),
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn details_show_recurrence_window() {
        let mut out = Vec::new();
        render_details(&mut out, &scheduled(ScheduledStatus::Pending), chrono_tz::UTC).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Repeat:      MONTHLY until 2027-05-01 09:00"));
        assert!(text.contains("To:          Landlord"));
        assert!(text.contains("Last run:    -"));
        assert!(text.contains("Can be edited"));
    }

    #[test]
    fn terminal_schedules_are_not_editable() {
        let mut out = Vec::new();
        render_details(&mut out, &scheduled(ScheduledStatus::Cancelled), chrono_tz::UTC).unwrap();
        assert!(!String::from_utf8(out).unwrap().contains("Can be edited"));
    }

    #[test]
    fn empty_list_names_the_filter() {
        let mut out = Vec::new();
        render_list(&mut out, &[], ScheduledFilter::Recurring, chrono_tz::UTC).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("No scheduled transactions ("));
    }
}
