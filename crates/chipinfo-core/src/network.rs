//! Network bring-up seam

use thiserror_no_std::Error;

use crate::config::WifiConfig;

/// Short human-readable detail carried by driver errors
pub type ErrorDetail = heapless::String<64>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    #[error("radio initialization failed: {0}")]
    Radio(ErrorDetail),
    #[error("wifi controller setup failed: {0}")]
    Controller(ErrorDetail),
    #[error("station configuration rejected: {0}")]
    Config(ErrorDetail),
    #[error("station interface failed to start: {0}")]
    Start(ErrorDetail),
}

/// Configures and starts the station interface.
///
/// `start` must leave the event plumbing running and must not connect by
/// itself: it announces `StationStarted` and the connectivity handler asks
/// for the connection.
#[allow(async_fn_in_trait)]
pub trait Network {
    async fn start(&mut self, wifi: &WifiConfig) -> Result<(), NetworkError>;
}

/// Render any debuggable driver error into an [`ErrorDetail`], truncating.
pub fn detail(error: impl core::fmt::Debug) -> ErrorDetail {
    use core::fmt::Write as _;

    let mut text = ErrorDetail::new();
    // Overflow only truncates the text
    let _ = write!(Truncating(&mut text), "{error:?}");
    text
}

struct Truncating<'a>(&'a mut ErrorDetail);

impl core::fmt::Write for Truncating<'_> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        for c in s.chars() {
            if self.0.push(c).is_err() {
                break;
            }
        }
        Ok(())
    }
}
