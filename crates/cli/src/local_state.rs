use std::{fs, path::Path};

use engine::{EngineError, TransactionFilter};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Preferences kept between runs, one profile per backend.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LocalState {
    pub profiles: Vec<ProfileEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileEntry {
    pub base_url: String,
    pub default_wallet_id: Option<String>,
    #[serde(default)]
    pub filter: Option<SavedFilter>,
}

/// A [`TransactionFilter`] in its stored form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedFilter {
    pub wallet_id: Option<String>,
    pub kind: Option<String>,
    pub status: Option<String>,
    #[serde(default)]
    pub search: String,
}

impl From<&TransactionFilter> for SavedFilter {
    fn from(filter: &TransactionFilter) -> Self {
        Self {
            wallet_id: filter.wallet_id.clone(),
            kind: filter.kind.map(|kind| kind.as_str().to_string()),
            status: filter.status.map(|status| status.as_str().to_string()),
            search: filter.search.clone(),
        }
    }
}

impl SavedFilter {
    pub fn to_filter(&self) -> std::result::Result<TransactionFilter, EngineError> {
        Ok(TransactionFilter {
            wallet_id: self.wallet_id.clone(),
            kind: self.kind.as_deref().map(str::parse).transpose()?,
            status: self.status.as_deref().map(str::parse).transpose()?,
            search: self.search.clone(),
        })
    }
}

impl LocalState {
    pub fn load(path: &str) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let parent = Path::new(path).parent();
        if let Some(parent) = parent {
            fs::create_dir_all(parent)?;
        }
        let payload = serde_json::to_string_pretty(self)?;
        fs::write(path, payload)?;
        Ok(())
    }

    pub fn profile(&self, base_url: &str) -> Option<&ProfileEntry> {
        self.profiles
            .iter()
            .find(|entry| entry.base_url == base_url)
    }

    pub fn default_wallet(&self, base_url: &str) -> Option<&str> {
        self.profile(base_url)
            .and_then(|entry| entry.default_wallet_id.as_deref())
    }

    pub fn saved_filter(&self, base_url: &str) -> Option<&SavedFilter> {
        self.profile(base_url).and_then(|entry| entry.filter.as_ref())
    }

    pub fn set_default_wallet(&mut self, base_url: &str, wallet_id: &str) {
        self.profile_mut(base_url).default_wallet_id = Some(wallet_id.to_string());
    }

    pub fn set_filter(&mut self, base_url: &str, filter: &TransactionFilter) {
        self.profile_mut(base_url).filter = Some(SavedFilter::from(filter));
    }

    fn profile_mut(&mut self, base_url: &str) -> &mut ProfileEntry {
        let index = match self
            .profiles
            .iter()
            .position(|entry| entry.base_url == base_url)
        {
            Some(index) => index,
            None => {
                self.profiles.push(ProfileEntry {
                    base_url: base_url.to_string(),
                    default_wallet_id: None,
                    filter: None,
                });
                self.profiles.len() - 1
            }
        };
        &mut self.profiles[index]
    }
}
