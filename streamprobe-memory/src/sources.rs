//! Canned sources with fully synchronous delivery.
//!
//! Everything here delivers its whole sequence inside `subscribe`, which
//! makes recordings deterministic without any waiting.

use std::marker::PhantomData;
use std::sync::Arc;

use streamprobe::{Observer, Source, SourceError, Subscription};

/// Source that emits a single value and completes. See [`just`].
#[derive(Debug, Clone)]
pub struct Just<T> {
    value: T,
}

/// Emits `value` once, then completes, synchronously at subscribe time.
pub fn just<T>(value: T) -> Just<T> {
    Just { value }
}

impl<T: Clone> Source<T> for Just<T> {
    fn subscribe(&self, mut observer: Box<dyn Observer<T>>) -> Subscription {
        observer.on_next(self.value.clone());
        observer.on_completed();
        observer.on_disposed();
        Subscription::empty()
    }
}

/// Source that emits a fixed sequence and completes. See [`from_iter`].
#[derive(Debug, Clone)]
pub struct FromIter<T> {
    values: Vec<T>,
}

/// Emits every element of `values` in order, then completes.
pub fn from_iter<T, I>(values: I) -> FromIter<T>
where
    I: IntoIterator<Item = T>,
{
    FromIter {
        values: values.into_iter().collect(),
    }
}

impl<T: Clone> Source<T> for FromIter<T> {
    fn subscribe(&self, mut observer: Box<dyn Observer<T>>) -> Subscription {
        for value in &self.values {
            observer.on_next(value.clone());
        }
        observer.on_completed();
        observer.on_disposed();
        Subscription::empty()
    }
}

/// Source that completes without emitting. See [`empty`].
#[derive(Debug, Clone)]
pub struct Empty<T> {
    marker: PhantomData<T>,
}

/// Completes immediately without emitting any value.
pub fn empty<T>() -> Empty<T> {
    Empty {
        marker: PhantomData,
    }
}

impl<T> Source<T> for Empty<T> {
    fn subscribe(&self, mut observer: Box<dyn Observer<T>>) -> Subscription {
        observer.on_completed();
        observer.on_disposed();
        Subscription::empty()
    }
}

/// Source that terminates with an error without emitting. See [`fail`].
pub struct Fail<T> {
    error: SourceError,
    marker: PhantomData<T>,
}

/// Terminates with `error` immediately, without emitting any value.
pub fn fail<T>(error: impl std::error::Error + Send + Sync + 'static) -> Fail<T> {
    Fail {
        error: Arc::new(error),
        marker: PhantomData,
    }
}

impl<T> Source<T> for Fail<T> {
    fn subscribe(&self, mut observer: Box<dyn Observer<T>>) -> Subscription {
        observer.on_error(Arc::clone(&self.error));
        observer.on_disposed();
        Subscription::empty()
    }
}

/// Source that never emits and never terminates. See [`never`].
#[derive(Debug, Clone)]
pub struct Never<T> {
    marker: PhantomData<T>,
}

/// Emits nothing and never terminates; useful for timeout paths.
pub fn never<T>() -> Never<T> {
    Never {
        marker: PhantomData,
    }
}

impl<T: 'static> Source<T> for Never<T> {
    fn subscribe(&self, observer: Box<dyn Observer<T>>) -> Subscription {
        // nothing is ever delivered; the observer lives until disposal
        Subscription::new(move || {
            let mut observer = observer;
            observer.on_disposed();
        })
    }
}
