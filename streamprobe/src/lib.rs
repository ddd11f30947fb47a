//! `StreamProbe` - recording test probe for asynchronous stream sources.
//!
//! A [`TestProbe`] attaches to a stream-like source and passively records
//! every event it delivers: values in emission order, at most one terminal
//! error, completion, and disposal. Tests then synchronize with the
//! recording through blocking waits and verify it through a fluent chain of
//! assertions, each of which reports failures through an injected
//! [`FailureReporter`] rather than by throwing.
//!
//! # Overview
//!
//! The crate is organized into a few small modules:
//!
//! - [`probe`]: the recording probe, its assertions, and its waits
//! - [`source`]: the emission protocol (`Source`/`Observer`/`Subscription`)
//! - [`report`]: the failure-reporting capability and its two built-ins
//! - [`stream`]: adapters for `futures::Stream` and `tokio::sync::watch`
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use futures::stream;
//! use streamprobe::prelude::*;
//!
//! // probe any futures::Stream
//! let probe = stream::iter(["a", "b"]).probe();
//!
//! probe
//!     .await_count(2, Duration::from_secs(1))
//!     .assert_no_error()
//!     .assert_values(&["a", "b"]);
//! probe.dispose();
//! ```
//!
//! Any producer can be probed by implementing [`Source`], which takes four
//! independent callbacks (value, error, completion, disposal) consistent
//! with standard reactive-stream contracts. In-memory sources for driving
//! tests by hand live in the companion `streamprobe-memory` crate.
//!
//! # Concurrency
//!
//! The probe runs no threads and is safe to drive from any producer
//! context: a background worker, a timer callback, or synchronous delivery
//! inside `subscribe`. Only [`TestProbe::await_completion`] and
//! [`TestProbe::await_count`] block the calling thread, and both accept a
//! timeout whose expiry is silent; everything else returns immediately.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod probe;
pub mod report;
mod signal;
pub mod source;
pub mod stream;

pub use probe::{SourceProbeExt, TestProbe};
pub use report::{BufferReporter, Failure, FailureReporter, PanicReporter};
pub use source::{Observer, Source, SourceError, Subscription};
pub use stream::{
    ResultStreamSource, StreamProbeExt, StreamSource, TryStreamProbeExt, WatchProbeExt,
    WatchSource,
};

/// Prelude module for convenient imports.
///
/// Import everything needed for probing with:
/// ```rust,ignore
/// use streamprobe::prelude::*;
/// ```
pub mod prelude {
    pub use crate::probe::{SourceProbeExt, TestProbe};
    pub use crate::report::{BufferReporter, Failure, FailureReporter, PanicReporter};
    pub use crate::source::{Observer, Source, SourceError, Subscription};
    pub use crate::stream::{StreamProbeExt, TryStreamProbeExt, WatchProbeExt};
}
