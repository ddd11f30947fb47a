//! Adapters that attach probes to the async ecosystem's native stream
//! shapes.
//!
//! Anything that implements [`futures::Stream`] can be probed: the adapter
//! spawns a tokio driver task that forwards each item to the observer,
//! translates end-of-stream into completion, and listens on a oneshot
//! shutdown channel so that disposing the probe cancels the drive. A
//! [`tokio::sync::watch`] receiver gets the same treatment as a
//! single-latest-value container: the value held at subscribe time is
//! delivered first, then every observed change.
//!
//! All adapters are single-use (a Rust stream is consumed by driving it)
//! and must be subscribed from within a tokio runtime.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use futures::stream;
//! use streamprobe::StreamProbeExt;
//!
//! let probe = stream::iter([1, 2, 3]).probe();
//!
//! probe
//!     .await_completion(Duration::from_secs(1))
//!     .assert_values(&[1, 2, 3]);
//! ```

use std::sync::Arc;

use futures::{Stream, StreamExt};
use parking_lot::Mutex;
use tokio::sync::{oneshot, watch};
use tracing::trace;

use crate::probe::TestProbe;
use crate::report::FailureReporter;
use crate::source::{Observer, Source, Subscription};

/// A [`Source`] over any [`futures::Stream`].
///
/// Each item becomes a value event; end-of-stream becomes completion. The
/// wrapped stream is consumed by the first subscriber; later subscribers
/// get an already-torn-down handle and an immediate disposal notification.
pub struct StreamSource<S> {
    stream: Mutex<Option<S>>,
}

impl<S> StreamSource<S> {
    /// Wraps `stream` for probing.
    pub fn new(stream: S) -> Self {
        Self {
            stream: Mutex::new(Some(stream)),
        }
    }
}

impl<S, T> Source<T> for StreamSource<S>
where
    S: Stream<Item = T> + Send + 'static,
    T: Send + 'static,
{
    fn subscribe(&self, mut observer: Box<dyn Observer<T>>) -> Subscription {
        let Some(stream) = self.stream.lock().take() else {
            observer.on_disposed();
            return Subscription::empty();
        };
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();
        tokio::spawn(async move {
            tokio::pin!(stream);
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    item = stream.next() => match item {
                        Some(value) => observer.on_next(value),
                        None => {
                            observer.on_completed();
                            break;
                        }
                    },
                }
            }
            trace!("stream driver finished");
            observer.on_disposed();
        });
        Subscription::new(move || {
            let _ = shutdown_tx.send(());
        })
    }
}

/// A [`Source`] over a [`futures::Stream`] of `Result`s.
///
/// `Ok` items become value events; the first `Err` is recorded as the
/// terminal error and stops the drive.
pub struct ResultStreamSource<S> {
    stream: Mutex<Option<S>>,
}

impl<S> ResultStreamSource<S> {
    /// Wraps `stream` for probing.
    pub fn new(stream: S) -> Self {
        Self {
            stream: Mutex::new(Some(stream)),
        }
    }
}

impl<S, T, E> Source<T> for ResultStreamSource<S>
where
    S: Stream<Item = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: std::error::Error + Send + Sync + 'static,
{
    fn subscribe(&self, mut observer: Box<dyn Observer<T>>) -> Subscription {
        let Some(stream) = self.stream.lock().take() else {
            observer.on_disposed();
            return Subscription::empty();
        };
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();
        tokio::spawn(async move {
            tokio::pin!(stream);
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    item = stream.next() => match item {
                        Some(Ok(value)) => observer.on_next(value),
                        Some(Err(error)) => {
                            observer.on_error(Arc::new(error));
                            break;
                        }
                        None => {
                            observer.on_completed();
                            break;
                        }
                    },
                }
            }
            trace!("result stream driver finished");
            observer.on_disposed();
        });
        Subscription::new(move || {
            let _ = shutdown_tx.send(());
        })
    }
}

/// A [`Source`] over a [`watch::Receiver`], treated as a single-latest-value
/// container.
///
/// The value held at subscribe time is delivered first, then every change
/// observed afterwards; intermediate values overwritten between polls are
/// skipped, which is the watch channel's own semantics. Dropping the sender
/// completes the sequence.
pub struct WatchSource<T> {
    receiver: Mutex<Option<watch::Receiver<T>>>,
}

impl<T> WatchSource<T> {
    /// Wraps `receiver` for probing.
    pub fn new(receiver: watch::Receiver<T>) -> Self {
        Self {
            receiver: Mutex::new(Some(receiver)),
        }
    }
}

impl<T> Source<T> for WatchSource<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn subscribe(&self, mut observer: Box<dyn Observer<T>>) -> Subscription {
        let Some(mut receiver) = self.receiver.lock().take() else {
            observer.on_disposed();
            return Subscription::empty();
        };
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();
        tokio::spawn(async move {
            let current = receiver.borrow_and_update().clone();
            observer.on_next(current);
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    changed = receiver.changed() => match changed {
                        Ok(()) => {
                            let value = receiver.borrow_and_update().clone();
                            observer.on_next(value);
                        }
                        Err(_) => {
                            observer.on_completed();
                            break;
                        }
                    },
                }
            }
            trace!("watch driver finished");
            observer.on_disposed();
        });
        Subscription::new(move || {
            let _ = shutdown_tx.send(());
        })
    }
}

/// Shorthand for probing any [`futures::Stream`].
pub trait StreamProbeExt: Stream + Sized {
    /// Attaches a probe driven by a spawned tokio task.
    ///
    /// Must be called from within a tokio runtime.
    fn probe(self) -> TestProbe<Self::Item>
    where
        Self: Send + 'static,
        Self::Item: Send + 'static,
    {
        TestProbe::attach(&StreamSource::new(self))
    }

    /// Like [`probe`], with an explicit failure reporter.
    ///
    /// [`probe`]: StreamProbeExt::probe
    fn probe_with<R>(self, reporter: R) -> TestProbe<Self::Item>
    where
        Self: Send + 'static,
        Self::Item: Send + 'static,
        R: FailureReporter + 'static,
    {
        TestProbe::attach_with(&StreamSource::new(self), reporter)
    }
}

impl<S: Stream + Sized> StreamProbeExt for S {}

/// Shorthand for probing a [`futures::Stream`] of `Result`s.
pub trait TryStreamProbeExt<T, E>: Sized {
    /// Attaches a probe that records the first `Err` as the terminal error.
    ///
    /// Must be called from within a tokio runtime.
    fn probe_results(self) -> TestProbe<T>;
}

impl<S, T, E> TryStreamProbeExt<T, E> for S
where
    S: Stream<Item = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: std::error::Error + Send + Sync + 'static,
{
    fn probe_results(self) -> TestProbe<T> {
        TestProbe::attach(&ResultStreamSource::new(self))
    }
}

/// Shorthand for probing a [`watch::Receiver`].
pub trait WatchProbeExt<T> {
    /// Attaches a probe that sees the current value, then every change.
    ///
    /// Must be called from within a tokio runtime.
    fn probe(self) -> TestProbe<T>;
}

impl<T> WatchProbeExt<T> for watch::Receiver<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn probe(self) -> TestProbe<T> {
        TestProbe::attach(&WatchSource::new(self))
    }
}
