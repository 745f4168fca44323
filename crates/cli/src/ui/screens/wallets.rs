use std::io::{self, Write};

use engine::Wallet;

use crate::ui::truncate;

/// Wallet table. The default wallet is marked with `*`.
pub fn render_list(
    out: &mut dyn Write,
    wallets: &[Wallet],
    default_wallet: Option<&str>,
) -> io::Result<()> {
    if wallets.is_empty() {
        return writeln!(out, "No wallets.");
    }

    writeln!(out, "   {:<12}  {:<20}  {:>16}  STATE", "ID", "NAME", "BALANCE")?;
    for wallet in wallets {
        let marker = if default_wallet == Some(wallet.id.as_str()) {
            '*'
        } else {
            ' '
        };
        let state = if wallet.is_active { "active" } else { "inactive" };
        writeln!(
            out,
            " {marker} {:<12}  {:<20}  {:>16}  {state}",
            truncate(&wallet.id, 12),
            truncate(&wallet.name, 20),
            wallet.balance.format(wallet.currency),
        )?;
    }
    Ok(())
}
