//! The shared console sink
//!
//! There is exactly one console writer and it lives inside a mutex. Holding
//! the guard is the only way to print a report block, so lines from the
//! startup routine and the worker on the other core never interleave.

use core::fmt;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::{Mutex as AsyncMutex, MutexGuard};

/// Line-oriented console output.
pub trait ConsoleSink: fmt::Write {
    /// Push any buffered output to the host. No-op by default.
    fn flush(&mut self) {}
}

/// The lock that owns the console writer.
///
/// `CriticalSectionRawMutex` is required here: the two holders run on
/// different cores.
pub struct SharedConsole<W: ConsoleSink> {
    inner: AsyncMutex<CriticalSectionRawMutex, W>,
}

pub type ConsoleGuard<'a, W> = MutexGuard<'a, CriticalSectionRawMutex, W>;

impl<W: ConsoleSink> SharedConsole<W> {
    pub const fn new(sink: W) -> Self {
        Self {
            inner: AsyncMutex::new(sink),
        }
    }

    /// Wait for the console. Blocks for as long as another task holds it.
    pub async fn lock(&self) -> ConsoleGuard<'_, W> {
        self.inner.lock().await
    }

    /// Take the console only if nobody holds it right now.
    pub fn try_lock(&self) -> Option<ConsoleGuard<'_, W>> {
        self.inner.try_lock().ok()
    }
}
