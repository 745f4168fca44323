use std::time::Duration;

use chrono_tz::Tz;
use engine::Currency;
use serde::Deserialize;

use crate::{
    cli::GlobalArgs,
    error::{AppError, Result},
};

const DEFAULT_CONFIG_PATH: &str = "config/paybook.toml";
const ENV_PREFIX: &str = "PAYBOOK";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    /// Bearer token sent with every request, if set.
    pub token: Option<String>,
    pub log_level: String,
    /// Currency used when a command does not name one.
    pub currency: String,
    pub timeout_secs: u64,
    pub state_path: String,
    /// IANA name used to print dates.
    pub timezone: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000".to_string(),
            token: None,
            log_level: "info".to_string(),
            currency: Currency::default().code().to_string(),
            timeout_secs: 30,
            state_path: "config/paybook_state.json".to_string(),
            timezone: "UTC".to_string(),
        }
    }
}

impl AppConfig {
    pub fn currency(&self) -> Result<Currency> {
        Ok(self.currency.parse::<Currency>()?)
    }

    pub fn timezone(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|err| AppError::Input(format!("invalid timezone {}: {err}", self.timezone)))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Builds the configuration: defaults, then the TOML file, then `PAYBOOK_*`
/// variables, then command line flags.
pub fn load(args: &GlobalArgs) -> Result<AppConfig> {
    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix(ENV_PREFIX));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(base_url) = &args.base_url {
        settings.base_url = base_url.clone();
    }
    if let Some(token) = &args.token {
        settings.token = Some(token.clone());
    }
    if let Some(log_level) = &args.log_level {
        settings.log_level = log_level.clone();
    }
    if let Some(currency) = &args.currency {
        settings.currency = currency.clone();
    }

    // Fail early on values the commands would trip over later.
    settings.currency()?;
    settings.timezone()?;

    Ok(settings)
}
