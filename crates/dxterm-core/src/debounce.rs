//! Debouncer — an explicit, cancellable scheduled task.
//!
//! Each [`Debouncer::schedule`] aborts the previously scheduled task before
//! spawning a new one, so at most one timer is alive per debouncer. When the
//! quiet interval elapses without another call, the value is sent on the
//! channel handed to [`Debouncer::new`].

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub struct Debouncer<T> {
    quiet: Duration,
    tx: mpsc::UnboundedSender<T>,
    pending: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new(quiet: Duration, tx: mpsc::UnboundedSender<T>) -> Self {
        Self { quiet, tx, pending: None }
    }

    /// Restart the quiet interval; `value` is delivered if nothing else is
    /// scheduled before it elapses.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule(&mut self, value: T) {
        self.cancel();
        // The deadline counts from the keystroke, not from when the task is
        // first polled.
        let deadline = tokio::time::Instant::now() + self.quiet;
        let tx = self.tx.clone();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            // Receiver gone means the owner was dropped mid-interval.
            let _ = tx.send(value);
        }));
    }

    /// Abort the pending task, if any, without delivering its value.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// True while a timer task is still sleeping.
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}
