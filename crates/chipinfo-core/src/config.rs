//! Runtime configuration
//!
//! Network credentials are resolved at startup: a configuration saved in the
//! persistent store wins, and the values baked in at build time (from `.env`)
//! are only a fallback that gets saved on first boot.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror_no_std::Error;

use crate::store::{CONFIG_KEY, KeyValueStore, StoreError};

pub const SSID_MAX_LEN: usize = 32;
pub const PASSWORD_MIN_LEN: usize = 8;
pub const PASSWORD_MAX_LEN: usize = 64;

/// Upper bound of an encoded [`Config`]
pub const CONFIG_BUF_LEN: usize = 128;

pub type Ssid = heapless::String<SSID_MAX_LEN>;
pub type Password = heapless::String<PASSWORD_MAX_LEN>;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no network configuration stored or built in")]
    Missing,
    #[error("SSID must be 1 to 32 bytes")]
    InvalidSsid,
    #[error("passphrase must be empty or 8 to 64 bytes")]
    InvalidPassword,
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub wifi: WifiConfig,
}

/// Station credentials
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct WifiConfig {
    pub ssid: Ssid,
    pub password: Password,
}

impl WifiConfig {
    pub fn new(ssid: &str, password: &str) -> Result<Self, ConfigError> {
        if ssid.is_empty() || ssid.len() > SSID_MAX_LEN {
            return Err(ConfigError::InvalidSsid);
        }
        if !password.is_empty()
            && !(PASSWORD_MIN_LEN..=PASSWORD_MAX_LEN).contains(&password.len())
        {
            return Err(ConfigError::InvalidPassword);
        }

        Ok(Self {
            ssid: Ssid::try_from(ssid).map_err(|_| ConfigError::InvalidSsid)?,
            password: Password::try_from(password).map_err(|_| ConfigError::InvalidPassword)?,
        })
    }

    /// Build-time defaults. A missing SSID means there is no default at all;
    /// a missing passphrase means an open network.
    pub fn from_build_env(
        ssid: Option<&str>,
        password: Option<&str>,
    ) -> Result<Option<Self>, ConfigError> {
        match ssid {
            None | Some("") => Ok(None),
            Some(ssid) => Self::new(ssid, password.unwrap_or_default()).map(Some),
        }
    }

    pub fn is_open(&self) -> bool {
        self.password.is_empty()
    }
}

impl Config {
    pub fn encode<'b>(&self, buf: &'b mut [u8]) -> Result<&'b mut [u8], StoreError> {
        postcard::to_slice(self, buf).map_err(|_| StoreError::Serialization)
    }

    pub fn decode(bytes: &[u8]) -> Option<Self> {
        postcard::from_bytes(bytes).ok()
    }
}

/// Where the active configuration came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    Stored,
    BuildDefaults,
}

/// Resolve the configuration for this boot.
pub async fn resolve<S: KeyValueStore>(
    store: &mut S,
    defaults: Option<WifiConfig>,
) -> Result<(Config, ConfigSource), ConfigError> {
    let mut buf = [0u8; CONFIG_BUF_LEN];

    if let Some(bytes) = store.fetch(CONFIG_KEY, &mut buf).await? {
        match Config::decode(bytes) {
            Some(config) => {
                info!("Using stored network configuration");
                return Ok((config, ConfigSource::Stored));
            }
            None => warn!("Stored network configuration is unreadable, ignoring it"),
        }
    }

    let wifi = defaults.ok_or(ConfigError::Missing)?;
    let config = Config { wifi };

    let encoded = config.encode(&mut buf)?;
    if let Err(e) = store.store(CONFIG_KEY, encoded).await {
        warn!("Could not save default network configuration: {e}");
    }

    info!("Using built-in network configuration");
    Ok((config, ConfigSource::BuildDefaults))
}
