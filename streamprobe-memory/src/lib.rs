//! In-memory stream sources for driving `streamprobe` in tests.
//!
//! This crate provides `Source` implementations with no I/O behind them, so
//! tests can feed a probe by hand or with canned sequences:
//!
//! - [`PublishSubject`]: a multi-subscriber push source driven by calling
//!   `next`/`error`/`complete` from any thread
//! - [`BehaviorSubject`]: the same, but holding a current value that every
//!   new subscriber receives before live events
//! - [`just`], [`from_iter`], [`empty`], [`fail`], [`never`]: canned
//!   sources with fully synchronous, deterministic delivery
//!
//! # Example
//!
//! ```rust,ignore
//! use streamprobe::SourceProbeExt;
//! use streamprobe_memory::PublishSubject;
//!
//! let subject = PublishSubject::new();
//! let probe = subject.probe();
//!
//! subject.next(1);
//! subject.next(2);
//! subject.complete();
//!
//! probe.assert_values(&[1, 2]).assert_no_error();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod sources;
mod subject;

pub use sources::{empty, fail, from_iter, just, never, Empty, Fail, FromIter, Just, Never};
pub use subject::{BehaviorSubject, PublishSubject};
