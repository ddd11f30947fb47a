//! The recording probe and its fluent assertion surface.
//!
//! [`TestProbe`] subscribes to a [`Source`] at construction time and
//! passively records everything the source delivers: values in emission
//! order, at most one terminal error, a completion flag, and disposal. A
//! test then synchronizes with the recording through the blocking waits
//! ([`await_count`], [`await_completion`]) and verifies it through chained
//! `assert_*` calls, each of which reports misses through the injected
//! [`FailureReporter`] and returns the probe for further chaining.
//!
//! The probe runs no threads of its own. Delivery callbacks run on whatever
//! thread or task the source uses; every piece of recorded state sits behind
//! a single mutex shared between the delivery side and the asserting side.
//!
//! [`await_count`]: TestProbe::await_count
//! [`await_completion`]: TestProbe::await_completion
//!
//! # Example
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use streamprobe::SourceProbeExt;
//!
//! let probe = sensor_readings.probe();
//!
//! probe
//!     .await_count(3, Duration::from_secs(1))
//!     .assert_no_error()
//!     .assert_values(&[1, 2, 3]);
//! probe.dispose();
//! ```

use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;
use std::panic::Location;
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::report::{Failure, FailureReporter, PanicReporter};
use crate::signal::Signal;
use crate::source::{Observer, Source, SourceError, Subscription};

/// Pending `await_count` registration: the threshold to reach and the
/// signal to fire once the recording crosses it.
struct CountWaiter {
    threshold: usize,
    signal: Arc<Signal>,
}

/// Everything the probe records, guarded by one mutex.
///
/// `values` is append-only and `error`, `completed`, `disposed` are
/// monotonic; nothing recorded is ever removed or reordered. The waiter
/// slots hold at most one pending wait per kind, replaced wholesale when a
/// new wait is issued.
struct ProbeState<T> {
    values: Vec<T>,
    error: Option<SourceError>,
    completed: bool,
    disposed: bool,
    count_waiter: Option<CountWaiter>,
    completion_waiter: Option<Arc<Signal>>,
}

impl<T> ProbeState<T> {
    fn new() -> Self {
        Self {
            values: Vec::new(),
            error: None,
            completed: false,
            disposed: false,
            count_waiter: None,
            completion_waiter: None,
        }
    }
}

/// Delivery side of the probe.
///
/// Holds only a weak reference to the recorded state: the subscription's
/// callbacks never keep the probe alive, and they degrade to no-ops once
/// the probe is gone.
struct ProbeObserver<T> {
    state: Weak<Mutex<ProbeState<T>>>,
}

impl<T: Send> Observer<T> for ProbeObserver<T> {
    fn on_next(&mut self, value: T) {
        let Some(state) = self.state.upgrade() else {
            return;
        };
        let mut state = state.lock();
        if state.error.is_some() {
            // terminal error already recorded, the sequence is over
            return;
        }
        state.values.push(value);
        let count = state.values.len();
        trace!(count, "recorded value");
        if let Some(waiter) = &state.count_waiter {
            if count >= waiter.threshold {
                waiter.signal.notify();
            }
        }
    }

    fn on_error(&mut self, error: SourceError) {
        let Some(state) = self.state.upgrade() else {
            return;
        };
        let mut state = state.lock();
        trace!(%error, "recorded terminal error");
        state.error = Some(error);
    }

    fn on_completed(&mut self) {
        let Some(state) = self.state.upgrade() else {
            return;
        };
        let mut state = state.lock();
        state.completed = true;
        trace!("recorded completion");
        if let Some(signal) = &state.completion_waiter {
            signal.notify();
        }
    }

    fn on_disposed(&mut self) {
        let Some(state) = self.state.upgrade() else {
            return;
        };
        let mut state = state.lock();
        state.disposed = true;
        trace!("recorded disposal");
    }
}

/// A recording observer over a stream-like source, with a fluent assertion
/// API and blocking waits.
///
/// Created with [`attach`] (or the [`SourceProbeExt::probe`] shorthand);
/// recording starts inside the constructor, so values delivered
/// synchronously at subscribe time are captured too. All assertions take
/// `&self` and return `&Self`, allowing the call chains shown in the module
/// documentation. Failed assertions are handed to the [`FailureReporter`]
/// the probe was built with and never abort the chain themselves.
///
/// [`attach`]: TestProbe::attach
pub struct TestProbe<T> {
    state: Arc<Mutex<ProbeState<T>>>,
    subscription: Subscription,
    reporter: Arc<dyn FailureReporter>,
}

impl<T: Send + 'static> TestProbe<T> {
    /// Attaches a probe to `source`, reporting assertion failures by
    /// panicking (the behavior of the standard `assert!` family).
    pub fn attach<S>(source: &S) -> Self
    where
        S: Source<T> + ?Sized,
    {
        Self::attach_with(source, PanicReporter)
    }

    /// Attaches a probe to `source` with an explicit failure reporter.
    ///
    /// Use a [`BufferReporter`](crate::report::BufferReporter) to keep a
    /// chain evaluating past its first miss and inspect every recorded
    /// failure afterwards.
    pub fn attach_with<S, R>(source: &S, reporter: R) -> Self
    where
        S: Source<T> + ?Sized,
        R: FailureReporter + 'static,
    {
        let state = Arc::new(Mutex::new(ProbeState::new()));
        let observer = ProbeObserver {
            state: Arc::downgrade(&state),
        };
        let subscription = source.subscribe(Box::new(observer));
        debug!("probe attached");
        Self {
            state,
            subscription,
            reporter: Arc::new(reporter),
        }
    }

    /// Snapshot of the values recorded so far, in emission order.
    pub fn values(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.state.lock().values.clone()
    }

    /// The recorded terminal error, if any.
    pub fn error(&self) -> Option<SourceError> {
        self.state.lock().error.clone()
    }

    /// Whether the source has terminated successfully.
    pub fn is_completed(&self) -> bool {
        self.state.lock().completed
    }

    /// Whether the subscription has been torn down.
    pub fn is_disposed(&self) -> bool {
        self.state.lock().disposed
    }

    /// Number of values recorded so far.
    pub fn value_count(&self) -> usize {
        self.state.lock().values.len()
    }

    /// Tears down the underlying subscription.
    ///
    /// Idempotent, and without effect on already-recorded state. Tests
    /// typically call this at the end of an assertion chain.
    pub fn dispose(&self) {
        debug!("disposing probe subscription");
        self.subscription.dispose();
    }

    /// Asserts that exactly `expected` values have been recorded.
    #[track_caller]
    pub fn assert_value_count(&self, expected: usize) -> &Self {
        let location = Location::caller();
        let actual = self.state.lock().values.len();
        self.check(
            actual == expected,
            location,
            "unexpected number of recorded values",
            expected.to_string(),
            actual.to_string(),
        )
    }

    /// Asserts that no value has been recorded.
    #[track_caller]
    pub fn assert_no_values(&self) -> &Self {
        let location = Location::caller();
        let actual = self.state.lock().values.len();
        self.check(
            actual == 0,
            location,
            "unexpected recorded values",
            "no values".to_owned(),
            format!("{actual} values"),
        )
    }

    /// Asserts that a terminal error has been recorded.
    #[track_caller]
    pub fn assert_error(&self) -> &Self {
        let location = Location::caller();
        let error = self.state.lock().error.clone();
        self.check(
            error.is_some(),
            location,
            "missing terminal error",
            "a recorded error".to_owned(),
            "none".to_owned(),
        )
    }

    /// Asserts that no terminal error has been recorded.
    #[track_caller]
    pub fn assert_no_error(&self) -> &Self {
        let location = Location::caller();
        let error = self.state.lock().error.clone();
        let actual = error
            .as_ref()
            .map_or_else(|| "none".to_owned(), ToString::to_string);
        self.check(
            error.is_none(),
            location,
            "unexpected terminal error",
            "no error".to_owned(),
            actual,
        )
    }

    /// Asserts that a terminal error has been recorded and that its
    /// rendered message equals `expected` exactly.
    #[track_caller]
    pub fn assert_error_message(&self, expected: &str) -> &Self {
        let location = Location::caller();
        let error = self.state.lock().error.clone();
        match error {
            Some(error) => {
                let actual = error.to_string();
                self.check(
                    actual == expected,
                    location,
                    "terminal error message mismatch",
                    expected.to_owned(),
                    actual,
                )
            }
            None => self.check(
                false,
                location,
                "terminal error message mismatch",
                expected.to_owned(),
                "no error recorded".to_owned(),
            ),
        }
    }

    /// Asserts that the recorded values equal `expected` exactly: same
    /// length, same order, elementwise equal.
    #[track_caller]
    pub fn assert_values(&self, expected: &[T]) -> &Self
    where
        T: PartialEq + Debug,
    {
        let location = Location::caller();
        let (ok, actual) = {
            let state = self.state.lock();
            (
                state.values.as_slice() == expected,
                format!("{:?}", state.values),
            )
        };
        self.check(
            ok,
            location,
            "recorded values do not match the expected sequence",
            format!("{expected:?}"),
            actual,
        )
    }

    /// Asserts that a value was recorded at `index` and equals `expected`.
    ///
    /// An out-of-range index is reported as a failure and short-circuits
    /// this one assertion; the rest of the chain still runs.
    #[track_caller]
    pub fn assert_value_at(&self, index: usize, expected: &T) -> &Self
    where
        T: PartialEq + Debug,
    {
        let location = Location::caller();
        let miss = {
            let state = self.state.lock();
            match state.values.get(index) {
                Some(value) if value == expected => None,
                Some(value) => Some((
                    format!("unexpected value at index {index}"),
                    format!("{expected:?}"),
                    format!("{value:?}"),
                )),
                None => Some((
                    "value index out of range".to_owned(),
                    format!("an index below {}", state.values.len()),
                    format!("index {index}"),
                )),
            }
        };
        if let Some((message, expected, actual)) = miss {
            self.reporter.failure(Failure {
                message,
                expected,
                actual,
                location,
            });
        }
        self
    }

    /// Asserts that every element of `expected` appears somewhere among the
    /// recorded values, irrespective of order or duplicates.
    ///
    /// This is deliberately one-directional: extra recorded values are not
    /// flagged. Combine with [`assert_value_count`] for an exact-set check.
    ///
    /// [`assert_value_count`]: TestProbe::assert_value_count
    #[track_caller]
    pub fn assert_value_set<I>(&self, expected: I) -> &Self
    where
        T: Eq + Hash + Debug,
        I: IntoIterator<Item = T>,
    {
        let location = Location::caller();
        let expected: HashSet<T> = expected.into_iter().collect();
        let missing: Vec<(String, String)> = {
            let state = self.state.lock();
            let recorded = format!("{:?}", state.values);
            expected
                .iter()
                .filter(|value| !state.values.contains(value))
                .map(|value| (format!("{value:?}"), recorded.clone()))
                .collect()
        };
        for (expected, actual) in missing {
            self.reporter.failure(Failure {
                message: "expected value was never recorded".to_owned(),
                expected,
                actual,
                location,
            });
        }
        self
    }

    /// Blocks the calling thread until the source completes or `timeout`
    /// elapses, whichever happens first; `None` waits indefinitely.
    ///
    /// Returns immediately if the source already completed. A timeout is
    /// silent by design: the caller learns whether the wait succeeded from
    /// the assertions that follow (or from [`is_completed`]).
    ///
    /// Only one completion wait may be outstanding at a time; issuing a new
    /// one replaces the previous registration.
    ///
    /// [`is_completed`]: TestProbe::is_completed
    pub fn await_completion(&self, timeout: impl Into<Option<Duration>>) -> &Self {
        let timeout = timeout.into();
        let signal = {
            let mut state = self.state.lock();
            if state.completed {
                return self;
            }
            let signal = Arc::new(Signal::new());
            state.completion_waiter = Some(Arc::clone(&signal));
            signal
        };
        debug!(?timeout, "waiting for completion");
        signal.wait(timeout);
        self.clear_completion_waiter(&signal);
        self
    }

    /// Blocks the calling thread until at least `count` values have been
    /// recorded or `timeout` elapses; `None` waits indefinitely.
    ///
    /// Returns immediately if the source already completed or the count is
    /// already reached. The wake happens inside the delivery callback that
    /// crosses the threshold, so once this returns (by signal rather than
    /// timeout) the triggering value is fully recorded.
    ///
    /// Only one count wait may be outstanding at a time; issuing a new one
    /// replaces the previous registration.
    pub fn await_count(&self, count: usize, timeout: impl Into<Option<Duration>>) -> &Self {
        let timeout = timeout.into();
        let signal = {
            let mut state = self.state.lock();
            if state.completed || state.values.len() >= count {
                return self;
            }
            let signal = Arc::new(Signal::new());
            state.count_waiter = Some(CountWaiter {
                threshold: count,
                signal: Arc::clone(&signal),
            });
            signal
        };
        debug!(?timeout, count, "waiting for value count");
        signal.wait(timeout);
        let mut state = self.state.lock();
        if let Some(waiter) = &state.count_waiter {
            if Arc::ptr_eq(&waiter.signal, &signal) {
                state.count_waiter = None;
            }
        }
        self
    }

    fn clear_completion_waiter(&self, signal: &Arc<Signal>) {
        let mut state = self.state.lock();
        if let Some(current) = &state.completion_waiter {
            if Arc::ptr_eq(current, signal) {
                state.completion_waiter = None;
            }
        }
    }

    fn check(
        &self,
        ok: bool,
        location: &'static Location<'static>,
        message: &str,
        expected: String,
        actual: String,
    ) -> &Self {
        if !ok {
            self.reporter.failure(Failure {
                message: message.to_owned(),
                expected,
                actual,
                location,
            });
        }
        self
    }
}

/// Shorthand for attaching a probe to any [`Source`].
pub trait SourceProbeExt<T> {
    /// Attaches a probe that panics on assertion failures.
    fn probe(&self) -> TestProbe<T>;

    /// Attaches a probe with an explicit failure reporter.
    fn probe_with<R>(&self, reporter: R) -> TestProbe<T>
    where
        R: FailureReporter + 'static;
}

impl<T, S> SourceProbeExt<T> for S
where
    T: Send + 'static,
    S: Source<T>,
{
    fn probe(&self) -> TestProbe<T> {
        TestProbe::attach(self)
    }

    fn probe_with<R>(&self, reporter: R) -> TestProbe<T>
    where
        R: FailureReporter + 'static,
    {
        TestProbe::attach_with(self, reporter)
    }
}

#[cfg(test)]
mod tests {
    use std::thread;
    use std::time::Instant;

    use thiserror::Error;

    use super::*;
    use crate::report::BufferReporter;

    #[derive(Debug, Error)]
    #[error("boom")]
    struct Boom;

    #[derive(Debug, Error)]
    #[error("late boom")]
    struct LateBoom;

    /// Hand-driven source: holds at most one observer and lets the test
    /// deliver events on whatever thread it likes.
    struct ManualSource<T> {
        slot: Arc<Mutex<Option<Box<dyn Observer<T>>>>>,
    }

    impl<T> ManualSource<T> {
        fn new() -> Self {
            Self {
                slot: Arc::new(Mutex::new(None)),
            }
        }

        fn push(&self, value: T) {
            if let Some(observer) = self.slot.lock().as_mut() {
                observer.on_next(value);
            }
        }

        fn fail(&self, error: impl std::error::Error + Send + Sync + 'static) {
            if let Some(observer) = self.slot.lock().as_mut() {
                observer.on_error(Arc::new(error));
            }
        }

        fn complete(&self) {
            if let Some(observer) = self.slot.lock().as_mut() {
                observer.on_completed();
            }
        }
    }

    impl<T> Clone for ManualSource<T> {
        fn clone(&self) -> Self {
            Self {
                slot: Arc::clone(&self.slot),
            }
        }
    }

    impl<T: Send + 'static> Source<T> for ManualSource<T> {
        fn subscribe(&self, observer: Box<dyn Observer<T>>) -> Subscription {
            *self.slot.lock() = Some(observer);
            let slot = Arc::clone(&self.slot);
            Subscription::new(move || {
                let taken = slot.lock().take();
                if let Some(mut observer) = taken {
                    observer.on_disposed();
                }
            })
        }
    }

    /// Source that delivers its whole sequence inside `subscribe`.
    struct ImmediateSource;

    impl Source<i32> for ImmediateSource {
        fn subscribe(&self, mut observer: Box<dyn Observer<i32>>) -> Subscription {
            observer.on_next(1);
            observer.on_completed();
            observer.on_disposed();
            Subscription::empty()
        }
    }

    #[test]
    fn records_values_in_emission_order() {
        let source = ManualSource::new();
        let probe = source.probe();

        source.push(1);
        source.push(2);
        source.push(3);

        assert_eq!(probe.values(), vec![1, 2, 3]);
        assert_eq!(probe.value_count(), 3);
        probe
            .assert_value_count(3)
            .assert_values(&[1, 2, 3])
            .assert_value_at(1, &2)
            .assert_no_error();
    }

    #[test]
    fn recording_starts_at_subscribe_time() {
        let probe = ImmediateSource.probe();

        probe.assert_value_count(1).assert_values(&[1]);
        assert!(probe.is_completed());
        assert!(probe.is_disposed());
    }

    #[test]
    fn assert_value_count_reports_mismatch() {
        let source: ManualSource<i32> = ManualSource::new();
        let reporter = BufferReporter::new();
        let probe = source.probe_with(reporter.clone());

        source.push(7);
        probe.assert_value_count(2);

        let failures = reporter.take();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].message, "unexpected number of recorded values");
        assert_eq!(failures[0].expected, "2");
        assert_eq!(failures[0].actual, "1");
    }

    #[test]
    fn assert_no_values_passes_only_before_first_value() {
        let source: ManualSource<i32> = ManualSource::new();
        let reporter = BufferReporter::new();
        let probe = source.probe_with(reporter.clone());

        probe.assert_no_values();
        assert!(reporter.is_empty());

        source.push(1);
        probe.assert_no_values();
        let failures = reporter.take();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].actual, "1 values");
    }

    #[test]
    fn error_assertions_cover_both_directions() {
        let source: ManualSource<i32> = ManualSource::new();
        let reporter = BufferReporter::new();
        let probe = source.probe_with(reporter.clone());

        probe.assert_no_error().assert_error();
        assert_eq!(reporter.take().len(), 1);

        source.fail(Boom);
        probe.assert_error().assert_no_error();
        let failures = reporter.take();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].actual, "boom");
    }

    #[test]
    fn assert_error_message_checks_exact_rendering() {
        let source: ManualSource<i32> = ManualSource::new();
        let reporter = BufferReporter::new();
        let probe = source.probe_with(reporter.clone());

        probe.assert_error_message("boom");
        assert_eq!(reporter.take()[0].actual, "no error recorded");

        source.fail(Boom);
        probe.assert_error_message("boom");
        assert!(reporter.is_empty());

        probe.assert_error_message("kaboom");
        let failures = reporter.take();
        assert_eq!(failures[0].expected, "kaboom");
        assert_eq!(failures[0].actual, "boom");
    }

    #[test]
    fn assert_values_flags_order_and_length() {
        let source = ManualSource::new();
        let reporter = BufferReporter::new();
        let probe = source.probe_with(reporter.clone());

        source.push(1);
        source.push(2);

        probe
            .assert_values(&[1, 2])
            .assert_values(&[2, 1])
            .assert_values(&[1]);

        let failures = reporter.take();
        assert_eq!(failures.len(), 2);
        assert_eq!(failures[0].expected, "[2, 1]");
        assert_eq!(failures[0].actual, "[1, 2]");
    }

    #[test]
    fn assert_value_at_out_of_range_short_circuits_that_assertion_only() {
        let source: ManualSource<i32> = ManualSource::new();
        let reporter = BufferReporter::new();
        let probe = source.probe_with(reporter.clone());

        probe.assert_value_at(0, &1).assert_no_values();

        let failures = reporter.take();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].message, "value index out of range");
        assert_eq!(failures[0].expected, "an index below 0");
        assert_eq!(failures[0].actual, "index 0");
    }

    #[test]
    fn assert_value_set_checks_containment_only() {
        let source = ManualSource::new();
        let reporter = BufferReporter::new();
        let probe = source.probe_with(reporter.clone());

        source.push(3);
        source.push(1);
        source.push(2);
        source.push(2);

        probe.assert_value_set([1, 2, 3]);
        assert!(reporter.is_empty());

        // extra recorded values are not flagged, only missing expectations
        probe.assert_value_set([1, 4]);
        let failures = reporter.take();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].expected, "4");
    }

    #[test]
    fn values_are_ignored_after_a_terminal_error() {
        let source = ManualSource::new();
        let probe = source.probe();

        source.push(1);
        source.fail(Boom);
        source.push(2);

        probe.assert_values(&[1]).assert_error_message("boom");
    }

    #[test]
    fn duplicate_terminal_error_keeps_the_last_one() {
        // a misbehaving source must not crash the probe
        let source: ManualSource<i32> = ManualSource::new();
        let probe = source.probe();

        source.fail(Boom);
        source.fail(LateBoom);

        probe.assert_error_message("late boom");
    }

    #[test]
    fn dispose_is_idempotent_and_stops_recording() {
        let source = ManualSource::new();
        let probe = source.probe();

        source.push(1);
        probe.dispose();
        probe.dispose();

        assert!(probe.is_disposed());

        source.push(2);
        probe.assert_values(&[1]);
    }

    #[test]
    fn await_count_returns_immediately_when_already_satisfied() {
        let source = ManualSource::new();
        let probe = source.probe();
        source.push(1);

        let started = Instant::now();
        probe.await_count(1, Duration::from_secs(5));
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn await_count_returns_immediately_when_already_completed() {
        let source: ManualSource<i32> = ManualSource::new();
        let probe = source.probe();
        source.complete();

        let started = Instant::now();
        probe.await_count(10, Duration::from_secs(5));
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn await_count_times_out_silently() {
        let source: ManualSource<i32> = ManualSource::new();
        let probe = source.probe();

        let started = Instant::now();
        probe.await_count(1, Duration::from_millis(50));

        assert!(started.elapsed() >= Duration::from_millis(50));
        assert!(!probe.is_completed());
        probe.assert_no_values().assert_no_error();
    }

    #[test]
    fn await_count_unblocks_when_threshold_is_crossed() {
        let source = ManualSource::new();
        let probe = source.probe();

        let producer = source.clone();
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(30));
            producer.push(42);
        });

        let started = Instant::now();
        probe.await_count(1, Duration::from_secs(5));

        assert!(started.elapsed() < Duration::from_secs(5));
        probe.assert_values(&[42]);
        handle.join().unwrap();
    }

    #[test]
    fn await_completion_returns_immediately_when_completed() {
        let source: ManualSource<i32> = ManualSource::new();
        let probe = source.probe();
        source.complete();

        let started = Instant::now();
        probe.await_completion(None);
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn await_completion_wakes_on_completion() {
        let source: ManualSource<i32> = ManualSource::new();
        let probe = source.probe();

        let producer = source.clone();
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(30));
            producer.complete();
        });

        probe.await_completion(Duration::from_secs(5));

        assert!(probe.is_completed());
        probe.assert_no_values().assert_no_error();
        handle.join().unwrap();
    }

    #[test]
    fn await_completion_timeout_leaves_state_untouched() {
        let source: ManualSource<i32> = ManualSource::new();
        let probe = source.probe();

        let started = Instant::now();
        probe.await_completion(Duration::from_millis(50));

        assert!(started.elapsed() >= Duration::from_millis(50));
        assert!(!probe.is_completed());
        assert!(!probe.is_disposed());
    }

    #[test]
    fn a_new_wait_replaces_the_previous_registration() {
        let source = ManualSource::new();
        let probe = source.probe();

        probe.await_count(5, Duration::from_millis(10));

        let producer = source.clone();
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            producer.push(1);
        });

        probe.await_count(1, Duration::from_secs(5));
        probe.assert_value_count(1);
        handle.join().unwrap();
    }

    #[test]
    fn delivery_after_probe_drop_is_a_no_op() {
        let source = ManualSource::new();
        let probe = source.probe();
        drop(probe);

        // the observer only holds a weak reference, so this must not panic
        source.push(1);
        source.complete();
    }

    #[test]
    fn buffer_reporter_keeps_the_chain_running() {
        let source: ManualSource<i32> = ManualSource::new();
        let reporter = BufferReporter::new();
        let probe = source.probe_with(reporter.clone());

        probe
            .assert_value_count(1)
            .assert_error()
            .assert_value_at(3, &9)
            .assert_no_values();

        assert_eq!(reporter.len(), 3);
    }
}
