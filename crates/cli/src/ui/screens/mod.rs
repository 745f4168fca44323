pub mod scheduled;
pub mod transactions;
pub mod wallets;
