use std::io::{self, Write};

use chrono_tz::Tz;
use engine::{Money, NewTransaction, Transaction};

use crate::ui::{format_date, signed_amount, truncate};

const DESCRIPTION_WIDTH: usize = 32;

fn label(tx: &Transaction) -> &str {
    tx.description
        .as_deref()
        .or_else(|| tx.recipient.as_ref().and_then(|r| r.label()))
        .unwrap_or("-")
}

pub fn render_list(out: &mut dyn Write, items: &[&Transaction], tz: Tz) -> io::Result<()> {
    if items.is_empty() {
        return writeln!(out, "No transactions.");
    }

    writeln!(
        out,
        "{:<16}  {:<12}  {:<9}  {:>16}  DESCRIPTION",
        "DATE", "ID", "STATUS", "AMOUNT"
    )?;
    for tx in items {
        writeln!(
            out,
            "{:<16}  {:<12}  {:<9}  {:>16}  {}",
            format_date(tx.created_at, tz),
            truncate(&tx.id, 12),
            tx.status,
            signed_amount(tx.amount, tx.currency, tx.kind),
            truncate(label(tx), DESCRIPTION_WIDTH),
        )?;
    }
    writeln!(out, "{} transaction(s)", items.len())
}

pub fn render_details(out: &mut dyn Write, tx: &Transaction, tz: Tz) -> io::Result<()> {
    writeln!(out, "Transaction {}", tx.id)?;
    writeln!(out, "  Amount:      {}", signed_amount(tx.amount, tx.currency, tx.kind))?;
    writeln!(out, "  Type:        {}", tx.kind)?;
    writeln!(out, "  Status:      {}", tx.status)?;
    writeln!(out, "  Description: {}", tx.description.as_deref().unwrap_or("-"))?;
    writeln!(out, "  From wallet: {}", tx.source_wallet_id.as_deref().unwrap_or("-"))?;
    writeln!(out, "  To wallet:   {}", tx.destination_wallet_id.as_deref().unwrap_or("-"))?;
    if let Some(recipient) = &tx.recipient {
        writeln!(out, "  Recipient:   {}", recipient.label().unwrap_or("-"))?;
    }
    writeln!(out, "  Created:     {}", format_date(tx.created_at, tz))?;
    writeln!(out, "  Updated:     {}", format_date(tx.updated_at, tz))
}

/// Recap printed before a send is confirmed. The fee line is omitted when no
/// quote is available.
pub fn render_send_summary(
    out: &mut dyn Write,
    request: &NewTransaction,
    fee: Option<Money>,
) -> io::Result<()> {
    let currency = request.currency;
    writeln!(out, "Send {}", request.amount.format(currency))?;
    writeln!(out, "  From: {}", request.source_wallet_id)?;
    writeln!(out, "  To:   {}", request.recipient_identifier)?;
    if let Some(description) = &request.description {
        writeln!(out, "  Note: {description}")?;
    }
    if let Some(fee) = fee {
        writeln!(out, "  Fee:  {}", fee.format(currency))?;
        if let Some(total) = request.amount.checked_add(fee) {
            writeln!(out, "  Total: {}", total.format(currency))?;
        }
    }
    Ok(())
}
