//! Failure reporting capability used by the probe's assertions.
//!
//! Assertions never panic or return errors themselves; they hand a
//! [`Failure`] to the injected [`FailureReporter`] and return the probe so
//! the chain keeps going. The default [`PanicReporter`] surfaces failures
//! through the host test framework the way `assert!` does, while
//! [`BufferReporter`] records them so every assertion in a chain is
//! evaluated and each miss stays independently observable.

use std::panic::Location;
use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;

/// A single failed assertion, with enough context to diagnose it.
#[derive(Debug, Clone, Error)]
#[error("{message}: expected {expected}, actual {actual}, at {location}")]
pub struct Failure {
    /// What the assertion was checking.
    pub message: String,
    /// Rendered expectation.
    pub expected: String,
    /// Rendered observation.
    pub actual: String,
    /// Where in the test the assertion was invoked.
    pub location: &'static Location<'static>,
}

/// Integration point with the host test framework's pass/fail bookkeeping.
///
/// The probe knows nothing about how failures are ultimately surfaced; it
/// only calls [`failure`] for each assertion whose condition did not hold.
///
/// [`failure`]: FailureReporter::failure
pub trait FailureReporter: Send + Sync {
    /// Records one failed assertion.
    fn failure(&self, failure: Failure);
}

/// Reporter that panics with the rendered failure, aborting the current
/// test the way a bare `assert!` would.
#[derive(Debug, Clone, Copy, Default)]
pub struct PanicReporter;

impl FailureReporter for PanicReporter {
    fn failure(&self, failure: Failure) {
        panic!("{failure}");
    }
}

/// Reporter that buffers failures instead of aborting.
///
/// Clones share the same buffer, so a test can keep one handle while the
/// probe owns another and inspect the recorded misses afterwards.
#[derive(Debug, Clone, Default)]
pub struct BufferReporter {
    failures: Arc<Mutex<Vec<Failure>>>,
}

impl BufferReporter {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the failures recorded so far.
    pub fn failures(&self) -> Vec<Failure> {
        self.failures.lock().clone()
    }

    /// Drains and returns the recorded failures.
    pub fn take(&self) -> Vec<Failure> {
        std::mem::take(&mut *self.failures.lock())
    }

    /// Number of failures recorded so far.
    pub fn len(&self) -> usize {
        self.failures.lock().len()
    }

    /// Whether no failure has been recorded.
    pub fn is_empty(&self) -> bool {
        self.failures.lock().is_empty()
    }
}

impl FailureReporter for BufferReporter {
    fn failure(&self, failure: Failure) {
        self.failures.lock().push(failure);
    }
}
