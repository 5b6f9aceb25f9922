//! Startup sequence
//!
//! [`run`] performs the boot steps once, top to bottom, against a
//! [`Platform`]. The firmware binds the platform to the ESP32-S3 peripherals,
//! the simulator binds it to host threads and in-memory fakes.

use core::fmt::Write as _;

use embassy_futures::select::{Either, select};
use embassy_time::Duration;
use log::{info, warn};
use thiserror_no_std::Error;

use crate::chip::{ChipDescriptor, CoreId};
use crate::config::{self, ConfigError, ConfigSource, WifiConfig};
use crate::console::{ConsoleSink, SharedConsole};
use crate::mac::{MacAddress, MacReadError};
use crate::network::{Network, NetworkError};
use crate::report::{Banner, ChipReport, MacLine};
use crate::store::{self, KeyValueStore, StoreError, StoreInit};
use crate::worker::{WorkerJob, WorkerSignal};

/// Delays between the startup steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartupTimings {
    /// Gives the host time to attach to the console before the report
    pub console_warmup: Duration,
    /// Longest wait for the worker before moving on
    pub worker_grace: Duration,
    /// Pause before network bring-up
    pub network_delay: Duration,
}

impl Default for StartupTimings {
    fn default() -> Self {
        Self {
            console_warmup: Duration::from_millis(3000),
            worker_grace: Duration::from_millis(50),
            network_delay: Duration::from_millis(3000),
        }
    }
}

/// Identification strings baked into the image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildInfo<'a> {
    pub version: &'a str,
    pub build_date: &'a str,
    pub build_time: &'a str,
    pub idf_version: &'a str,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchError {
    #[error("the worker task was already launched")]
    AlreadyLaunched,
    #[error("core {0} cannot host the worker")]
    UnsupportedCore(CoreId),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StartupError {
    #[error("store init failed: {0}")]
    Store(#[from] StoreError),
    #[error("configuration failed: {0}")]
    Config(#[from] ConfigError),
    #[error("worker launch failed: {0}")]
    Launch(#[from] LaunchError),
    #[error("network bring-up failed: {0}")]
    Network(#[from] NetworkError),
    #[error("console write failed")]
    Console,
}

impl From<core::fmt::Error> for StartupError {
    fn from(_: core::fmt::Error) -> Self {
        Self::Console
    }
}

/// Everything the startup sequence needs from the board.
#[allow(async_fn_in_trait)]
pub trait Platform {
    type Console: ConsoleSink + 'static;
    type Store: KeyValueStore;
    type Network: Network;

    fn build_info(&self) -> BuildInfo<'_>;

    /// Snapshot of the chip, taken when called
    fn chip(&self) -> ChipDescriptor;

    fn current_core(&self) -> CoreId;

    fn read_factory_mac(&self) -> Result<MacAddress, MacReadError>;

    /// Credentials baked in at build time, if any
    fn wifi_defaults(&self) -> Result<Option<WifiConfig>, ConfigError>;

    fn store(&mut self) -> &mut Self::Store;

    fn network(&mut self) -> &mut Self::Network;

    /// Start the worker pinned to `core`. Must not wait for it.
    fn launch_worker(
        &mut self,
        core: CoreId,
        job: WorkerJob<Self::Console>,
    ) -> Result<(), LaunchError>;

    async fn sleep(&mut self, duration: Duration);
}

/// What happened during startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupSummary {
    pub store: StoreInit,
    /// Core the worker reported from, `None` if it missed the grace period
    pub worker_core: Option<CoreId>,
    pub mac: Result<MacAddress, MacReadError>,
    pub config_source: ConfigSource,
}

/// Run the startup sequence.
///
/// Returns once the station interface is started; connecting is left to the
/// connectivity driver. Any error is fatal to the caller.
pub async fn run<P: Platform>(
    platform: &mut P,
    console: &'static SharedConsole<P::Console>,
    worker_done: &'static WorkerSignal,
    timings: &StartupTimings,
) -> Result<StartupSummary, StartupError> {
    let store = store::init_with_recovery(platform.store()).await?;

    platform.sleep(timings.console_warmup).await;

    {
        let info = platform.build_info();
        let chip = platform.chip();
        let core = platform.current_core();

        let mut out = console.lock().await;
        writeln!(
            out,
            "{}",
            Banner {
                version: info.version,
                build_date: info.build_date,
                build_time: info.build_time,
            }
        )?;
        writeln!(
            out,
            "{}",
            ChipReport {
                idf_version: info.idf_version,
                chip: &chip,
                core,
            }
        )?;
    }

    platform.launch_worker(
        CoreId::SECONDARY,
        WorkerJob {
            console,
            done: worker_done,
        },
    )?;

    let worker_core = match select(worker_done.wait(), platform.sleep(timings.worker_grace)).await
    {
        Either::First(core) => Some(core),
        Either::Second(()) => {
            warn!(
                "Worker did not report within {} ms, continuing",
                timings.worker_grace.as_millis()
            );
            None
        }
    };

    let mac = {
        let mut out = console.lock().await;
        let mac = platform.read_factory_mac();
        writeln!(out, "{}", MacLine(mac))?;
        writeln!(out)?;
        mac
    };
    if let Err(e) = mac {
        warn!("Factory MAC unavailable: {e}");
    }

    platform.sleep(timings.network_delay).await;

    let defaults = platform.wifi_defaults()?;
    let (config, config_source) = config::resolve(platform.store(), defaults).await?;

    info!("Starting station for \"{}\"", config.wifi.ssid);
    platform.network().start(&config.wifi).await?;

    info!("*** startup finished ***");
    console.lock().await.flush();

    Ok(StartupSummary {
        store,
        worker_core,
        mac,
        config_source,
    })
}
