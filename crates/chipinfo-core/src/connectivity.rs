//! Station connectivity policy
//!
//! The network driver reports lifecycle events; [`ConnectivityHandler`] turns
//! each into a single action and tracks the connection state explicitly:
//!
//! ```text
//! Idle -> Connecting -> Connected -> Backoff(n) -> Connecting -> ...
//!                                        \-> Failed (only with a retry limit)
//! ```
//!
//! Every disconnect asks for exactly one new connection attempt. The default
//! policy reconnects at once, every time, with no retry limit. An opt-in
//! [`ReconnectPolicy::backoff`] keeps the first attempt after a drop immediate
//! and backs off exponentially on later consecutive attempts.

use core::fmt;
use core::net::Ipv4Addr;

use embassy_time::Duration;
use log::{error, info, warn};
use thiserror_no_std::Error;

/// Lifecycle notifications from the network driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityEvent {
    /// The station interface finished starting
    StationStarted,
    /// DHCP assigned an address
    GotIp(Ipv4Addr),
    /// The station lost (or never got) its association
    Disconnected,
    /// Anything else the driver reports; ignored
    Other,
}

/// What the driver should do in response to an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Request a connection after waiting `delay`
    Connect { delay: Duration },
    /// Log the assigned address
    ReportAddress(Ipv4Addr),
    /// The retry limit is exhausted
    GiveUp,
    Ignore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Idle,
    Connecting,
    Connected,
    /// Waiting before reconnect attempt `attempt` (1-based)
    Backoff { attempt: u32 },
    Failed,
}

/// Reconnect timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    /// Wait before the second consecutive attempt; doubles from there
    pub initial_delay: Duration,
    /// Ceiling for the wait
    pub max_delay: Duration,
    /// Consecutive attempts before giving up; `None` retries forever
    pub max_attempts: Option<u32>,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self::immediate()
    }
}

impl ReconnectPolicy {
    /// Reconnect at once, every time, forever.
    pub const fn immediate() -> Self {
        Self {
            initial_delay: Duration::from_ticks(0),
            max_delay: Duration::from_ticks(0),
            max_attempts: None,
        }
    }

    /// Exponential backoff from 500 ms up to 30 s, still unbounded.
    pub const fn backoff() -> Self {
        Self {
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
            max_attempts: None,
        }
    }

    /// Wait before consecutive attempt `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        if attempt <= 1 {
            return Duration::from_ticks(0);
        }

        let shift = (attempt - 2).min(63);
        let ticks = self
            .initial_delay
            .as_ticks()
            .saturating_mul(1u64 << shift);
        Duration::from_ticks(ticks).min(self.max_delay)
    }
}

/// Event-to-action policy with explicit connection state.
#[derive(Debug)]
pub struct ConnectivityHandler {
    policy: ReconnectPolicy,
    state: ConnectionState,
    /// Disconnects since the last successful address assignment
    failures: u32,
}

impl ConnectivityHandler {
    pub const fn new(policy: ReconnectPolicy) -> Self {
        Self {
            policy,
            state: ConnectionState::Idle,
            failures: 0,
        }
    }

    pub const fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn handle(&mut self, event: ConnectivityEvent) -> Action {
        match event {
            ConnectivityEvent::StationStarted => {
                info!("station started");
                self.failures = 0;
                self.state = ConnectionState::Connecting;
                Action::Connect {
                    delay: Duration::from_ticks(0),
                }
            }
            ConnectivityEvent::GotIp(addr) => {
                self.failures = 0;
                self.state = ConnectionState::Connected;
                Action::ReportAddress(addr)
            }
            ConnectivityEvent::Disconnected => {
                info!("disconnected");
                if self.state == ConnectionState::Failed {
                    return Action::Ignore;
                }

                self.failures = self.failures.saturating_add(1);
                if self
                    .policy
                    .max_attempts
                    .is_some_and(|limit| self.failures > limit)
                {
                    self.state = ConnectionState::Failed;
                    return Action::GiveUp;
                }

                self.state = ConnectionState::Backoff {
                    attempt: self.failures,
                };
                Action::Connect {
                    delay: self.policy.delay_for(self.failures),
                }
            }
            ConnectivityEvent::Other => Action::Ignore,
        }
    }

    /// Note that the connection request is going out now.
    pub fn on_connect_attempt(&mut self) {
        self.state = ConnectionState::Connecting;
    }
}

/// Log line for an assigned address
pub struct AddressLine(pub Ipv4Addr);

impl fmt::Display for AddressLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "got ip:{}", self.0)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LinkError {
    #[error("association with the access point failed")]
    AssociationFailed,
    #[error("wifi driver error: {0}")]
    Driver(heapless::String<64>),
}

/// The network driver as seen by [`drive`].
#[allow(async_fn_in_trait)]
pub trait Link {
    /// Next lifecycle event; `None` once the event source is gone.
    async fn next_event(&mut self) -> Option<ConnectivityEvent>;

    /// Ask the driver to associate with the configured network.
    async fn connect(&mut self) -> Result<(), LinkError>;

    async fn wait(&mut self, delay: Duration);

    /// Called after the address is logged.
    fn address_assigned(&mut self, _addr: Ipv4Addr) {}
}

/// Run the event loop until the event source closes or the handler gives up.
///
/// A failed association comes back as a `Disconnected` event. A driver error
/// ends the loop; callers treat it as fatal.
pub async fn drive<L: Link>(
    handler: &mut ConnectivityHandler,
    link: &mut L,
) -> Result<(), LinkError> {
    let mut pending = None;

    loop {
        let event = match pending.take() {
            Some(event) => event,
            None => match link.next_event().await {
                Some(event) => event,
                None => return Ok(()),
            },
        };

        match handler.handle(event) {
            Action::Connect { delay } => {
                if delay > Duration::from_ticks(0) {
                    info!("reconnecting in {} ms", delay.as_millis());
                    link.wait(delay).await;
                }

                handler.on_connect_attempt();
                match link.connect().await {
                    Ok(()) => {}
                    Err(LinkError::AssociationFailed) => {
                        warn!("association failed");
                        pending = Some(ConnectivityEvent::Disconnected);
                    }
                    Err(e) => return Err(e),
                }
            }
            Action::ReportAddress(addr) => {
                info!("{}", AddressLine(addr));
                link.address_assigned(addr);
            }
            Action::GiveUp => {
                error!("giving up on the network after repeated failures");
                return Ok(());
            }
            Action::Ignore => {}
        }
    }
}
