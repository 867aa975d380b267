//! Per-call deadline and cancellation.
//!
//! Every registrar operation takes a [`RequestContext`]. The transport races
//! the network round trip against [`RequestContext::done`], so a caller can
//! abort an in-flight request early or impose a deadline shorter than the
//! client's own timeout. Dropping the operation future also aborts it; the
//! context exists so that the abort is reported as a distinct error kind.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;

/// Why [`RequestContext::done`] resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupt {
    /// [`CancelHandle::cancel`] was called.
    Cancelled,
    /// The caller-supplied deadline passed.
    DeadlineExceeded,
}

/// Deadline and cancellation signal for one or more calls.
///
/// Cheap to clone; clones observe the same cancellation signal. A context
/// carries at most one signal: [`RequestContext::with_cancellation`] replaces
/// any existing one.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    deadline: Option<Instant>,
    cancel: Option<watch::Receiver<bool>>,
}

impl RequestContext {
    /// A context that never cancels and has no deadline of its own.
    pub fn background() -> Self {
        Self::default()
    }

    /// Limits the context to `timeout` from now. An earlier existing deadline wins.
    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Sets an absolute deadline. An earlier existing deadline wins.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(existing) => existing.min(deadline),
            None => deadline,
        });
        self
    }

    /// Attaches a fresh cancellation signal and returns its trigger.
    #[must_use]
    pub fn with_cancellation(mut self) -> (Self, CancelHandle) {
        let (tx, rx) = watch::channel(false);
        self.cancel = Some(rx);
        (self, CancelHandle { tx: Arc::new(tx) })
    }

    /// The deadline, if one is set.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Whether the cancellation signal has already fired.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// Resolves once the context is cancelled or its deadline passes.
    ///
    /// Never resolves for a background context. Cancellation takes priority
    /// when both conditions hold.
    pub async fn done(&self) -> Interrupt {
        let cancelled = async {
            if let Some(rx) = &self.cancel {
                let mut rx = rx.clone();
                if rx.wait_for(|cancelled| *cancelled).await.is_ok() {
                    return;
                }
            }
            // No signal, or every handle was dropped without cancelling.
            std::future::pending::<()>().await;
        };
        let expired = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            () = cancelled => Interrupt::Cancelled,
            () = expired => Interrupt::DeadlineExceeded,
        }
    }
}

/// Trigger for the cancellation signal of a [`RequestContext`].
///
/// Clones share the signal. Cancelling is idempotent and cannot be undone.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    /// Cancels every call using the associated context.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}
