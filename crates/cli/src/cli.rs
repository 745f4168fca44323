use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "paybook")]
#[command(about = "Send, request and schedule payments from the command line")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Optional config file path (TOML).
    #[arg(long, global = true)]
    pub config: Option<String>,
    /// Override base URL (e.g. http://127.0.0.1:3000).
    #[arg(long, global = true)]
    pub base_url: Option<String>,
    /// Bearer token for the backend.
    #[arg(long, global = true, env = "PAYBOOK_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
    /// Log filter level (error, warn, info, debug, trace).
    #[arg(long, global = true)]
    pub log_level: Option<String>,
    /// Default currency code.
    #[arg(long, global = true)]
    pub currency: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Browse immediate transactions.
    Transactions(Transactions),
    /// Send money from one of your wallets.
    Send(SendArgs),
    /// Ask someone to pay into one of your wallets.
    Request(RequestArgs),
    /// Manage scheduled transactions.
    Scheduled(Scheduled),
    /// List your wallets.
    Wallets,
    /// Local preferences.
    Prefs(Prefs),
}

#[derive(Args, Debug)]
pub struct Transactions {
    #[command(subcommand)]
    pub command: TransactionsCommand,
}

#[derive(Subcommand, Debug)]
pub enum TransactionsCommand {
    List(ListArgs),
    Show { id: String },
    Pending,
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Only transactions touching this wallet.
    #[arg(long)]
    pub wallet: Option<String>,
    /// credit or debit.
    #[arg(long = "type")]
    pub kind: Option<String>,
    /// pending, completed or failed.
    #[arg(long)]
    pub status: Option<String>,
    /// Case-insensitive text matched against description, id and recipient.
    #[arg(long)]
    pub search: Option<String>,
    /// Remember this filter for the next `list` without flags.
    #[arg(long)]
    pub save: bool,
}

impl ListArgs {
    pub fn has_filter(&self) -> bool {
        self.wallet.is_some() || self.kind.is_some() || self.status.is_some() || self.search.is_some()
    }
}

#[derive(Args, Debug)]
pub struct SendArgs {
    #[arg(long)]
    pub amount: String,
    #[arg(long)]
    pub currency: Option<String>,
    /// Source wallet id; defaults to the saved default wallet.
    #[arg(long)]
    pub from: Option<String>,
    /// Email, phone number or wallet id of the recipient.
    #[arg(long)]
    pub to: String,
    #[arg(long, default_value = "")]
    pub description: String,
    /// credit or debit (default debit).
    #[arg(long = "type")]
    pub kind: Option<String>,
    /// Skip the confirmation prompt.
    #[arg(long, short)]
    pub yes: bool,
}

#[derive(Args, Debug)]
pub struct RequestArgs {
    #[arg(long)]
    pub amount: String,
    #[arg(long)]
    pub currency: Option<String>,
    /// Wallet receiving the money; defaults to the saved default wallet.
    #[arg(long)]
    pub to_wallet: Option<String>,
    /// Email or phone number of the person asked to pay.
    #[arg(long)]
    pub from: String,
    #[arg(long, default_value = "")]
    pub description: String,
}

#[derive(Args, Debug)]
pub struct Scheduled {
    #[command(subcommand)]
    pub command: ScheduledCommand,
}

#[derive(Subcommand, Debug)]
pub enum ScheduledCommand {
    List {
        /// all, pending, completed, cancelled, failed, once or recurring.
        #[arg(long, default_value = "all")]
        filter: String,
    },
    Show {
        id: String,
    },
    Create(ScheduleCreateArgs),
    Update(ScheduleUpdateArgs),
    Cancel {
        id: String,
        /// Skip the confirmation prompt.
        #[arg(long, short)]
        yes: bool,
    },
}

#[derive(Args, Debug)]
pub struct ScheduleCreateArgs {
    #[arg(long)]
    pub amount: String,
    #[arg(long)]
    pub currency: Option<String>,
    /// Source wallet id; defaults to the saved default wallet.
    #[arg(long)]
    pub from: Option<String>,
    /// Destination wallet for an internal transfer.
    #[arg(long, conflicts_with_all = ["recipient_name", "recipient_email", "recipient_phone"])]
    pub to_wallet: Option<String>,
    #[arg(long)]
    pub recipient_name: Option<String>,
    #[arg(long)]
    pub recipient_email: Option<String>,
    #[arg(long)]
    pub recipient_phone: Option<String>,
    #[arg(long, default_value = "")]
    pub description: String,
    /// First execution, RFC 3339 or YYYY-MM-DD.
    #[arg(long)]
    pub date: String,
    /// once, daily, weekly or monthly.
    #[arg(long, default_value = "once")]
    pub recurrence: String,
    /// Last execution of a recurring schedule, RFC 3339 or YYYY-MM-DD.
    #[arg(long)]
    pub until: Option<String>,
}

#[derive(Args, Debug)]
pub struct ScheduleUpdateArgs {
    pub id: String,
    #[arg(long)]
    pub amount: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub date: Option<String>,
    #[arg(long)]
    pub recurrence: Option<String>,
    #[arg(long)]
    pub until: Option<String>,
}

#[derive(Args, Debug)]
pub struct Prefs {
    #[command(subcommand)]
    pub command: PrefsCommand,
}

#[derive(Subcommand, Debug)]
pub enum PrefsCommand {
    /// Set the wallet used when `--from` / `--to-wallet` is omitted.
    SetWallet { id: String },
    Show,
}
