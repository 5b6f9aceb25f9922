//! Persistent key-value store policy
//!
//! The storage itself is an external collaborator (flash plus a key-value
//! layout crate on the firmware, a `BTreeMap` in the simulator). This module
//! owns the startup policy around it: mount, and if the partition is full or
//! laid out by something incompatible, erase it and mount exactly once more.

use log::{info, warn};
use thiserror_no_std::Error;

/// Key the Wi-Fi configuration is stored under
pub const CONFIG_KEY: u8 = 1;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    #[error("no free pages left in the store partition")]
    NoFreePages,
    #[error("store partition holds an incompatible layout")]
    IncompatibleLayout,
    #[error("flash access failed")]
    Flash,
    #[error("store partition not found")]
    Partition,
    #[error("stored value does not fit the buffer")]
    Serialization,
}

impl StoreError {
    /// Errors that an erase of the whole partition can fix.
    pub const fn is_recoverable(self) -> bool {
        matches!(self, Self::NoFreePages | Self::IncompatibleLayout)
    }
}

/// A mountable key-value partition.
#[allow(async_fn_in_trait)]
pub trait KeyValueStore {
    /// Check that the partition is formatted and usable.
    async fn mount(&mut self) -> Result<(), StoreError>;

    /// Wipe the whole partition.
    async fn erase(&mut self) -> Result<(), StoreError>;

    /// Copy the value for `key` into `buf`, returning the filled prefix.
    async fn fetch<'b>(&mut self, key: u8, buf: &'b mut [u8])
    -> Result<Option<&'b [u8]>, StoreError>;

    async fn store(&mut self, key: u8, value: &[u8]) -> Result<(), StoreError>;
}

/// How the store came up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreInit {
    /// Mounted on the first attempt
    Mounted,
    /// Mounted after erasing the partition
    Recovered,
}

/// Mount the store, erasing and retrying once on a recoverable error.
///
/// Any other error, or a second failure after the erase, is returned to the
/// caller, which treats it as fatal.
pub async fn init_with_recovery<S: KeyValueStore>(store: &mut S) -> Result<StoreInit, StoreError> {
    match store.mount().await {
        Ok(()) => {
            info!("Store mounted");
            Ok(StoreInit::Mounted)
        }
        Err(e) if e.is_recoverable() => {
            warn!("Store mount failed ({e}), erasing partition");
            store.erase().await?;
            store.mount().await?;
            info!("Store mounted after erase");
            Ok(StoreInit::Recovered)
        }
        Err(e) => Err(e),
    }
}
