//! Command dispatch.
//!
//! Every command goes through the [`TransactionStore`], reads what it needs
//! back through the selectors and renders it with `ui::screens`.

use std::{
    io::{BufRead, Write},
    sync::Arc,
};

use chrono::Utc;
use chrono_tz::Tz;
use engine::{
    Currency, Destination, FeeQuoter, RecipientInfo, Recurrence, RequestForm, ScheduleForm,
    ScheduledFilter, ScheduledQuery, SchedulePatchForm, SendForm, TransactionApi,
    TransactionFilter, TransactionQuery, TransactionStore, Wallet, find_wallet, selectors,
};

use crate::{
    cli::{
        Command, ListArgs, PrefsCommand, RequestArgs, ScheduleCreateArgs, ScheduleUpdateArgs,
        ScheduledCommand, SendArgs, TransactionsCommand,
    },
    config::AppConfig,
    error::Result,
    local_state::LocalState,
    ui::{prompt, screens},
};

mod input;

use input::{parse_date, parse_optional, parse_optional_date};

pub struct App<A: ?Sized> {
    config: AppConfig,
    store: TransactionStore<A>,
    local: LocalState,
    fees: FeeQuoter,
    tz: Tz,
    currency: Currency,
}

impl<A> App<A>
where
    A: TransactionApi + ?Sized,
{
    pub fn new(config: AppConfig, api: Arc<A>) -> Result<Self> {
        let local = LocalState::load(&config.state_path)?;
        let tz = config.timezone()?;
        let currency = config.currency()?;
        Ok(Self {
            config,
            store: TransactionStore::new(api),
            local,
            fees: FeeQuoter::new(),
            tz,
            currency,
        })
    }

    pub async fn run(
        &mut self,
        command: Command,
        input: &mut dyn BufRead,
        out: &mut dyn Write,
    ) -> Result<()> {
        tracing::debug!("running {command:?}");
        match command {
            Command::Transactions(cmd) => match cmd.command {
                TransactionsCommand::List(args) => self.list_transactions(args, out).await,
                TransactionsCommand::Show { id } => self.show_transaction(&id, out).await,
                TransactionsCommand::Pending => self.list_pending(out).await,
            },
            Command::Send(args) => self.send(args, input, out).await,
            Command::Request(args) => self.request(args, out).await,
            Command::Scheduled(cmd) => match cmd.command {
                ScheduledCommand::List { filter } => self.list_scheduled(&filter, out).await,
                ScheduledCommand::Show { id } => self.show_scheduled(&id, out).await,
                ScheduledCommand::Create(args) => self.create_scheduled(args, out).await,
                ScheduledCommand::Update(args) => self.update_scheduled(args, out).await,
                ScheduledCommand::Cancel { id, yes } => {
                    self.cancel_scheduled(&id, yes, input, out).await
                }
            },
            Command::Wallets => self.list_wallets(out).await,
            Command::Prefs(cmd) => match cmd.command {
                PrefsCommand::SetWallet { id } => self.set_default_wallet(&id, out),
                PrefsCommand::Show => self.show_prefs(out),
            },
        }
    }

    fn default_wallet(&self) -> Option<String> {
        self.local
            .default_wallet(&self.config.base_url)
            .map(str::to_string)
    }

    fn currency_or_default(&self, raw: Option<&str>) -> Result<Currency> {
        Ok(parse_optional(raw)?.unwrap_or(self.currency))
    }

    /// Wallets are only used to sharpen validation, so a failed load is not
    /// fatal.
    async fn wallets_for_validation(&self) -> Vec<Wallet> {
        match self.store.api().get_wallets().await {
            Ok(wallets) => wallets,
            Err(err) => {
                tracing::warn!("could not load wallets, skipping balance checks: {err}");
                Vec::new()
            }
        }
    }

    fn filter_from_args(&self, args: &ListArgs) -> Result<TransactionFilter> {
        if !args.has_filter() {
            return match self.local.saved_filter(&self.config.base_url) {
                Some(saved) => Ok(saved.to_filter()?),
                None => Ok(TransactionFilter::default()),
            };
        }
        Ok(TransactionFilter {
            wallet_id: args.wallet.clone(),
            kind: parse_optional(args.kind.as_deref())?,
            status: parse_optional(args.status.as_deref())?,
            search: args.search.clone().unwrap_or_default(),
        })
    }

    async fn list_transactions(&mut self, args: ListArgs, out: &mut dyn Write) -> Result<()> {
        let filter = self.filter_from_args(&args)?;
        if args.save {
            self.local.set_filter(&self.config.base_url, &filter);
            self.local.save(&self.config.state_path)?;
            tracing::info!("transaction filter saved");
        }

        self.store
            .fetch_transactions(&TransactionQuery::default())
            .await?;
        let tz = self.tz;
        self.store
            .read(|state| {
                let visible = selectors::visible_transactions(state, &filter);
                screens::transactions::render_list(out, &visible, tz)
            })
            .await?;
        Ok(())
    }

    async fn show_transaction(&self, id: &str, out: &mut dyn Write) -> Result<()> {
        let tx = self.store.fetch_transaction_details(id).await?;
        screens::transactions::render_details(out, &tx, self.tz)?;
        Ok(())
    }

    async fn list_pending(&self, out: &mut dyn Write) -> Result<()> {
        self.store.fetch_pending_transactions().await?;
        let tz = self.tz;
        self.store
            .read(|state| {
                let pending: Vec<_> = selectors::pending_transactions(state).iter().collect();
                screens::transactions::render_list(out, &pending, tz)
            })
            .await?;
        Ok(())
    }

    async fn send(
        &mut self,
        args: SendArgs,
        input: &mut dyn BufRead,
        out: &mut dyn Write,
    ) -> Result<()> {
        let form = SendForm {
            amount: args.amount,
            currency: self.currency_or_default(args.currency.as_deref())?,
            source_wallet_id: args.from.or_else(|| self.default_wallet()).unwrap_or_default(),
            recipient: args.to,
            description: args.description,
            kind: parse_optional(args.kind.as_deref())?,
        };
        let wallets = self.wallets_for_validation().await;
        let request = form.validate(find_wallet(&wallets, form.source_wallet_id.trim()))?;

        let fee = self
            .fees
            .quote(
                self.store.api(),
                request.amount,
                request.currency,
                &request.source_wallet_id,
            )
            .await;
        screens::transactions::render_send_summary(out, &request, fee)?;

        if !args.yes && !prompt::confirm("Send now?", input, out)? {
            writeln!(out, "Not sent.")?;
            return Ok(());
        }

        let tx = self.store.create_transaction(&request).await?;
        writeln!(out, "Transaction {} is {}.", tx.id, tx.status)?;
        Ok(())
    }

    async fn request(&self, args: RequestArgs, out: &mut dyn Write) -> Result<()> {
        let form = RequestForm {
            amount: args.amount,
            currency: self.currency_or_default(args.currency.as_deref())?,
            destination_wallet_id: args
                .to_wallet
                .or_else(|| self.default_wallet())
                .unwrap_or_default(),
            sender: args.from,
            description: args.description,
        };
        let request = form.validate()?;
        self.store.request_money(&request).await?;
        writeln!(
            out,
            "Asked {} for {}.",
            request.sender_identifier,
            request.amount.format(request.currency)
        )?;
        Ok(())
    }

    async fn list_scheduled(&self, raw_filter: &str, out: &mut dyn Write) -> Result<()> {
        let filter: ScheduledFilter = raw_filter.parse()?;
        self.store
            .fetch_scheduled_transactions(&ScheduledQuery::default())
            .await?;
        let tz = self.tz;
        self.store
            .read(|state| {
                let visible = selectors::visible_scheduled(state, filter);
                screens::scheduled::render_list(out, &visible, filter, tz)
            })
            .await?;
        Ok(())
    }

    async fn show_scheduled(&self, id: &str, out: &mut dyn Write) -> Result<()> {
        let tx = self.store.fetch_scheduled_transaction_details(id).await?;
        screens::scheduled::render_details(out, &tx, self.tz)?;
        Ok(())
    }

    async fn create_scheduled(&self, args: ScheduleCreateArgs, out: &mut dyn Write) -> Result<()> {
        let destination = match args.to_wallet {
            Some(wallet_id) => Destination::Wallet(wallet_id),
            None => Destination::External(RecipientInfo {
                name: args.recipient_name,
                email: args.recipient_email,
                phone: args.recipient_phone,
            }),
        };
        let form = ScheduleForm {
            amount: args.amount,
            currency: self.currency_or_default(args.currency.as_deref())?,
            description: args.description,
            source_wallet_id: args.from.or_else(|| self.default_wallet()).unwrap_or_default(),
            destination,
            scheduled_date: Some(parse_date(&args.date, self.tz)?),
            recurrence: args.recurrence.parse::<Recurrence>()?,
            recurrence_end_date: parse_optional_date(args.until.as_deref(), self.tz)?,
        };
        let wallets = self.wallets_for_validation().await;
        let request = form.validate(
            Utc::now(),
            find_wallet(&wallets, form.source_wallet_id.trim()),
        )?;

        let tx = self.store.create_scheduled_transaction(&request).await?;
        screens::scheduled::render_details(out, &tx, self.tz)?;
        Ok(())
    }

    async fn update_scheduled(&self, args: ScheduleUpdateArgs, out: &mut dyn Write) -> Result<()> {
        let current = self
            .store
            .fetch_scheduled_transaction_details(&args.id)
            .await?;
        let form = SchedulePatchForm {
            amount: args.amount,
            description: args.description,
            scheduled_date: parse_optional_date(args.date.as_deref(), self.tz)?,
            recurrence: parse_optional(args.recurrence.as_deref())?,
            recurrence_end_date: parse_optional_date(args.until.as_deref(), self.tz)?,
        };
        let patch = form.validate(Utc::now(), current.currency, Some(&current))?;

        let updated = self
            .store
            .update_scheduled_transaction(&args.id, &patch)
            .await?;
        screens::scheduled::render_details(out, &updated, self.tz)?;
        Ok(())
    }

    async fn cancel_scheduled(
        &self,
        id: &str,
        yes: bool,
        input: &mut dyn BufRead,
        out: &mut dyn Write,
    ) -> Result<()> {
        let current = self.store.fetch_scheduled_transaction_details(id).await?;
        screens::scheduled::render_details(out, &current, self.tz)?;

        if !yes && !prompt::confirm("Cancel this schedule?", input, out)? {
            writeln!(out, "Kept.")?;
            return Ok(());
        }

        self.store.cancel_scheduled_transaction(id).await?;
        writeln!(out, "Scheduled transaction {id} cancelled.")?;
        Ok(())
    }

    async fn list_wallets(&self, out: &mut dyn Write) -> Result<()> {
        let wallets = self.store.api().get_wallets().await?;
        let default_wallet = self.default_wallet();
        screens::wallets::render_list(out, &wallets, default_wallet.as_deref())?;
        Ok(())
    }

    fn set_default_wallet(&mut self, id: &str, out: &mut dyn Write) -> Result<()> {
        self.local.set_default_wallet(&self.config.base_url, id.trim());
        self.local.save(&self.config.state_path)?;
        writeln!(out, "Default wallet set to {}.", id.trim())?;
        Ok(())
    }

    fn show_prefs(&self, out: &mut dyn Write) -> Result<()> {
        let base_url = &self.config.base_url;
        writeln!(out, "Backend:        {base_url}")?;
        writeln!(out, "Currency:       {}", self.currency)?;
        writeln!(out, "Timezone:       {}", self.tz)?;
        writeln!(
            out,
            "Default wallet: {}",
            self.local.default_wallet(base_url).unwrap_or("-")
        )?;
        match self.local.saved_filter(base_url) {
            Some(filter) => writeln!(
                out,
                "Saved filter:   wallet={} type={} status={} search={:?}",
                filter.wallet_id.as_deref().unwrap_or("*"),
                filter.kind.as_deref().unwrap_or("*"),
                filter.status.as_deref().unwrap_or("*"),
                filter.search,
            )?,
            None => writeln!(out, "Saved filter:   -")?,
        }
        Ok(())
    }
}
