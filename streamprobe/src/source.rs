//! The emission protocol consumed by the probe.
//!
//! A [`Source`] is anything that can deliver events to an [`Observer`]: zero
//! or more values, then at most one terminal event (an error or a
//! completion), and finally a disposal notification when the subscription is
//! torn down. The probe does not implement stream operators of its own; it
//! only consumes this protocol, so any producer that can call four callbacks
//! can be probed.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

/// A cloneable, type-erased terminal error delivered by a source.
///
/// Sources carry whatever error type they like; the probe only needs to
/// store it and render its message, so the concrete type is erased here.
pub type SourceError = Arc<dyn std::error::Error + Send + Sync>;

/// Receiver side of the emission protocol.
///
/// The four callbacks are invoked zero-or-more / zero-or-one / zero-or-one /
/// zero-or-one times respectively, and the two terminal callbacks are
/// mutually exclusive. Implementations must tolerate being invoked from
/// whatever thread or task the source schedules delivery on.
pub trait Observer<T>: Send {
    /// Called for each emitted value, in emission order.
    fn on_next(&mut self, value: T);

    /// Called when the source terminates with an error.
    fn on_error(&mut self, error: SourceError);

    /// Called when the source terminates successfully.
    fn on_completed(&mut self);

    /// Called when the subscription is torn down, whether by an explicit
    /// dispose or because the source terminated.
    fn on_disposed(&mut self);
}

/// A stream-like producer that can be observed.
pub trait Source<T> {
    /// Registers `observer` and starts delivery.
    ///
    /// Delivery begins at subscribe time, not at the first assertion, so
    /// events may arrive before this method returns (synchronous sources
    /// deliver everything inside this call).
    fn subscribe(&self, observer: Box<dyn Observer<T>>) -> Subscription;
}

/// Teardown handle for an established subscription.
///
/// The teardown closure runs at most once. Calling [`dispose`] repeatedly,
/// or on a handle whose subscription already ended, is a no-op.
///
/// [`dispose`]: Subscription::dispose
pub struct Subscription {
    teardown: Mutex<Option<Box<dyn FnOnce() + Send>>>,
}

impl Subscription {
    /// Creates a handle that runs `teardown` on the first [`dispose`] call.
    ///
    /// [`dispose`]: Subscription::dispose
    pub fn new(teardown: impl FnOnce() + Send + 'static) -> Self {
        Self {
            teardown: Mutex::new(Some(Box::new(teardown))),
        }
    }

    /// A handle with nothing left to tear down.
    ///
    /// Used by sources that deliver their whole sequence and dispose
    /// synchronously inside `subscribe`, and by sources that could not
    /// establish a subscription at all.
    pub fn empty() -> Self {
        Self {
            teardown: Mutex::new(None),
        }
    }

    /// Runs the teardown if it has not run yet.
    pub fn dispose(&self) {
        let teardown = self.teardown.lock().take();
        if let Some(teardown) = teardown {
            teardown();
        }
    }

    /// Whether the teardown has already run (or never existed).
    pub fn is_disposed(&self) -> bool {
        self.teardown.lock().is_none()
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
