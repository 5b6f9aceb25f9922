//! The demonstration worker
//!
//! Runs once on the secondary core to show that the second scheduler is
//! alive: it prints which core it landed on and reports back.

use core::fmt::Write as _;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use log::warn;

use crate::chip::CoreId;
use crate::console::{ConsoleSink, SharedConsole};
use crate::report::CoreLine;

/// Completion signal carrying the core the worker ran on
pub type WorkerSignal = Signal<CriticalSectionRawMutex, CoreId>;

/// Everything the worker borrows from the startup routine
pub struct WorkerJob<W: ConsoleSink + 'static> {
    pub console: &'static SharedConsole<W>,
    pub done: &'static WorkerSignal,
}

impl<W: ConsoleSink + 'static> Clone for WorkerJob<W> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<W: ConsoleSink + 'static> Copy for WorkerJob<W> {}

/// Print the core line under the console lock, then signal completion.
///
/// Waits on the lock without a timeout.
pub async fn run<W: ConsoleSink>(job: WorkerJob<W>, core: CoreId) {
    {
        let mut console = job.console.lock().await;
        if writeln!(console, "{}", CoreLine(core)).is_err() {
            warn!("Console write failed on core {core}");
        }
    }

    job.done.signal(core);
}

#[cfg(test)]
mod tests {
    extern crate std;

    use core::future::Future as _;
    use core::task::{Context, Waker};

    use embassy_futures::block_on;

    use super::*;
    use crate::console::tests::BufferSink;

    fn job() -> WorkerJob<BufferSink> {
        WorkerJob {
            console: std::boxed::Box::leak(std::boxed::Box::new(SharedConsole::new(
                BufferSink::default(),
            ))),
            done: std::boxed::Box::leak(std::boxed::Box::new(WorkerSignal::new())),
        }
    }

    #[test]
    fn test_worker_prints_core_and_signals() {
        let job = job();

        block_on(run(job, CoreId::SECONDARY));

        assert_eq!(job.done.try_take(), Some(CoreId::SECONDARY));
        let out = job.console.try_lock().unwrap();
        assert_eq!(out.text, "Running core           : 1\n");
    }

    #[test]
    fn test_worker_waits_for_console() {
        let job = job();

        let held = job.console.try_lock().unwrap();
        let mut worker = core::pin::pin!(run(job, CoreId::SECONDARY));

        // While the lock is held the worker cannot finish
        let mut cx = Context::from_waker(Waker::noop());
        assert!(worker.as_mut().poll(&mut cx).is_pending());
        assert!(!job.done.signaled());

        drop(held);
        block_on(worker);
        assert!(job.done.signaled());
    }
}
