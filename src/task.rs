//! Background execution of load and save operations.
//!
//! An interactive surface must never run blocking I/O on its control
//! loop. [`TaskRunner`] executes one operation at a time on a
//! short-lived worker thread and hands the outcome back through a
//! single-slot channel that the control loop polls on its own tick.
//! The channel hand-off is the memory barrier between the worker and
//! the consumer. No cancellation or timeout is supported.

use std::{
    panic::{self, AssertUnwindSafe},
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::{self, Receiver, TryRecvError},
        Arc,
    },
    thread,
};

use crate::error::{Error, Result};

/// Runs one blocking operation at a time on a worker thread.
///
/// The busy flag doubles as the single-in-flight guard: a second
/// operation is refused while one is running, and it is cleared before
/// the result is handed off, on both success and failure paths.
#[derive(Debug, Clone, Default)]
pub struct TaskRunner {
    busy: Arc<AtomicBool>,
}

impl TaskRunner {
    /// Creates an idle runner.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True while an operation is in flight. Drives a busy indicator.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Starts `op` on a worker thread, or refuses with `None` if an
    /// operation is already in flight.
    ///
    /// The worker delivers exactly one result (success or error)
    /// through the returned handle. Errors raised inside the worker,
    /// including panics, are caught at the worker boundary and
    /// delivered like any other result.
    pub fn try_spawn<T, F>(&self, op: F) -> Option<TaskHandle<T>>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T> + Send + 'static,
    {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return None;
        }

        let (tx, rx) = mpsc::sync_channel(1);
        let busy = Arc::clone(&self.busy);
        let handle = thread::spawn(move || {
            let result = match panic::catch_unwind(AssertUnwindSafe(op)) {
                Ok(result) => result,
                Err(payload) => Err(worker_panic_error(payload.as_ref())),
            };
            // Clear the indicator before the hand-off so a consumer that
            // observes the result also observes the runner as idle.
            busy.store(false, Ordering::Release);
            let _ = tx.send(result);
        });

        Some(TaskHandle {
            rx,
            handle: Some(handle),
            delivered: false,
        })
    }
}

fn worker_panic_error(payload: &(dyn std::any::Any + Send)) -> Error {
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "worker panicked".to_owned());
    Error::io_no_path(std::io::Error::other(message))
}

/// Receiving end of a worker's single-slot result hand-off.
///
/// The result can be read exactly once, either by polling from a
/// control loop tick or by blocking until completion.
#[derive(Debug)]
pub struct TaskHandle<T> {
    rx: Receiver<Result<T>>,
    handle: Option<thread::JoinHandle<()>>,
    delivered: bool,
}

impl<T> TaskHandle<T> {
    /// Non-blocking poll for the result. Returns `None` while the
    /// worker is still running, `Some` exactly once when it finishes,
    /// and `None` again after the result has been consumed.
    pub fn try_poll(&mut self) -> Option<Result<T>> {
        if self.delivered {
            return None;
        }
        match self.rx.try_recv() {
            Ok(result) => {
                self.deliver();
                Some(result)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.deliver();
                Some(Err(Error::io_no_path(std::io::Error::other(
                    "worker exited without delivering a result",
                ))))
            }
        }
    }

    /// Blocks until the worker finishes and returns its result.
    ///
    /// # Errors
    ///
    /// Returns whatever error the operation produced, or an I/O error
    /// if the worker exited without delivering a result.
    pub fn wait(mut self) -> Result<T> {
        if self.delivered {
            return Err(Error::io_no_path(std::io::Error::other(
                "result already consumed",
            )));
        }
        let result = self.rx.recv().unwrap_or_else(|_| {
            Err(Error::io_no_path(std::io::Error::other(
                "worker exited without delivering a result",
            )))
        });
        self.deliver();
        result
    }

    fn deliver(&mut self) {
        self.delivered = true;
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
