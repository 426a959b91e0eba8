//! Activation tokens and deferred results for sketches that acquire things
//! asynchronously (devices, models, files) during `init`.
//!
//! `init` starts the work and returns immediately; `frame` polls for the
//! result each tick. Results produced for an activation that has since been
//! switched away from are dropped, both by the worker before sending and by
//! [`Deferred::poll`] before accepting.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;

use log::{debug, error};

/// Identifies one activation. Stays current until the controller starts the
/// next switch.
#[derive(Clone, Debug)]
pub struct ActivationToken {
    generation: u64,
    current: Arc<AtomicU64>,
}

impl ActivationToken {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self) -> bool {
        self.current.load(Ordering::Acquire) == self.generation
    }
}

impl PartialEq for ActivationToken {
    fn eq(&self, other: &Self) -> bool {
        self.generation == other.generation
            && Arc::ptr_eq(&self.current, &other.current)
    }
}

/// Monotonic activation counter owned by the controller.
#[derive(Debug, Default)]
pub struct Generation {
    current: Arc<AtomicU64>,
}

impl Generation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Invalidates every outstanding token and returns the next one.
    pub fn advance(&self) -> ActivationToken {
        let generation = self.current.fetch_add(1, Ordering::AcqRel) + 1;
        ActivationToken {
            generation,
            current: Arc::clone(&self.current),
        }
    }

    pub fn current(&self) -> u64 {
        self.current.load(Ordering::Acquire)
    }
}

/// Sending half of a [`Deferred`]. Completing after the owning activation
/// ended is a no-op.
pub struct Completer<T> {
    label: &'static str,
    token: ActivationToken,
    tx: Sender<T>,
}

impl<T> Completer<T> {
    /// Returns `true` if the value was handed over.
    pub fn complete(self, value: T) -> bool {
        if !self.token.is_current() {
            debug!(
                "dropping '{}' result for a sketch that is no longer active",
                self.label
            );
            return false;
        }
        self.tx.send(value).is_ok()
    }
}

/// A value that becomes ready at some later tick.
pub struct Deferred<T> {
    label: &'static str,
    token: ActivationToken,
    rx: Receiver<T>,
    value: Option<T>,
    failed: bool,
}

impl<T> Deferred<T> {
    pub fn channel(
        label: &'static str,
        token: ActivationToken,
    ) -> (Completer<T>, Self) {
        let (tx, rx) = mpsc::channel();
        let completer = Completer {
            label,
            token: token.clone(),
            tx,
        };
        let deferred = Self {
            label,
            token,
            rx,
            value: None,
            failed: false,
        };
        (completer, deferred)
    }

    /// Checks for a result without blocking. Always `None` once the owning
    /// activation is no longer current.
    pub fn poll(&mut self) -> Option<&T> {
        if !self.token.is_current() {
            return None;
        }

        if self.value.is_none() && !self.failed {
            match self.rx.try_recv() {
                Ok(value) => {
                    debug!("'{}' is ready", self.label);
                    self.value = Some(value);
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => {
                    debug!("'{}' will never complete", self.label);
                    self.failed = true;
                }
            }
        }

        self.value.as_ref()
    }

    pub fn is_ready(&mut self) -> bool {
        self.poll().is_some()
    }

    /// True once the producer went away without delivering a value.
    pub fn has_failed(&self) -> bool {
        self.failed
    }

    pub fn label(&self) -> &'static str {
        self.label
    }
}

impl<T: Send + 'static> Deferred<T> {
    /// Runs `work` on a worker thread and delivers its result through the
    /// returned handle.
    pub fn spawn<F>(label: &'static str, token: ActivationToken, work: F) -> Self
    where
        F: FnOnce() -> T + Send + 'static,
    {
        let (completer, deferred) = Self::channel(label, token);

        let spawned = thread::Builder::new()
            .name(format!("deferred-{}", label))
            .spawn(move || {
                let value = work();
                completer.complete(value);
            });

        if let Err(err) = spawned {
            error!("failed to spawn worker for '{}': {}", label, err);
        }

        deferred
    }
}
