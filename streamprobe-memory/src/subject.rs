//! Push subjects: hand-driven multi-subscriber sources.

use std::sync::Arc;

use parking_lot::Mutex;
use streamprobe::{Observer, Source, SourceError, Subscription};
use tracing::trace;

/// The terminal event a subject has settled on.
enum Terminal {
    Error(SourceError),
    Completed,
}

struct Entry<T> {
    id: u64,
    observer: Box<dyn Observer<T>>,
}

/// Subscriber bookkeeping shared by the subject flavors.
///
/// Delivery happens while the owning lock is held, so events from
/// concurrent producers reach every subscriber in a single global order.
struct Registry<T> {
    subscribers: Vec<Entry<T>>,
    terminal: Option<Terminal>,
    next_id: u64,
}

impl<T: Clone> Registry<T> {
    fn new() -> Self {
        Self {
            subscribers: Vec::new(),
            terminal: None,
            next_id: 0,
        }
    }

    fn broadcast(&mut self, value: T) {
        if self.terminal.is_some() {
            return;
        }
        for entry in &mut self.subscribers {
            entry.observer.on_next(value.clone());
        }
    }

    /// Delivers the terminal to every subscriber, then tears all
    /// registrations down. Later terminals are ignored.
    fn terminate(&mut self, terminal: Terminal) {
        if self.terminal.is_some() {
            return;
        }
        let mut drained = std::mem::take(&mut self.subscribers);
        match &terminal {
            Terminal::Error(error) => {
                for entry in &mut drained {
                    entry.observer.on_error(Arc::clone(error));
                }
            }
            Terminal::Completed => {
                for entry in &mut drained {
                    entry.observer.on_completed();
                }
            }
        }
        for entry in &mut drained {
            entry.observer.on_disposed();
        }
        trace!(disposed = drained.len(), "subject terminated");
        self.terminal = Some(terminal);
    }

    /// Registers `observer`, or replays the terminal immediately (and
    /// returns `None`) if the subject already terminated.
    fn register(&mut self, mut observer: Box<dyn Observer<T>>) -> Option<u64> {
        if let Some(terminal) = &self.terminal {
            match terminal {
                Terminal::Error(error) => observer.on_error(Arc::clone(error)),
                Terminal::Completed => observer.on_completed(),
            }
            observer.on_disposed();
            return None;
        }
        let id = self.next_id;
        self.next_id += 1;
        self.subscribers.push(Entry { id, observer });
        Some(id)
    }

    fn remove(&mut self, id: u64) -> Option<Box<dyn Observer<T>>> {
        let index = self.subscribers.iter().position(|entry| entry.id == id)?;
        Some(self.subscribers.remove(index).observer)
    }

    fn len(&self) -> usize {
        self.subscribers.len()
    }
}

/// A hand-driven source that forwards each event to every current
/// subscriber.
///
/// `next`/`error`/`complete` may be called from any thread. Events after a
/// terminal are ignored, and a subscriber arriving after the terminal has
/// it replayed immediately, matching the usual subject semantics. Clones
/// share the same subscriber registry.
pub struct PublishSubject<T> {
    registry: Arc<Mutex<Registry<T>>>,
}

impl<T: Clone + Send + 'static> PublishSubject<T> {
    /// Creates a subject with no subscribers.
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry::new())),
        }
    }

    /// Delivers `value` to every current subscriber.
    pub fn next(&self, value: T) {
        self.registry.lock().broadcast(value);
    }

    /// Terminates the subject with an error.
    pub fn error(&self, error: impl std::error::Error + Send + Sync + 'static) {
        self.registry.lock().terminate(Terminal::Error(Arc::new(error)));
    }

    /// Terminates the subject with a completion.
    pub fn complete(&self) {
        self.registry.lock().terminate(Terminal::Completed);
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.registry.lock().len()
    }
}

impl<T: Clone + Send + 'static> Default for PublishSubject<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for PublishSubject<T> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<T: Clone + Send + 'static> Source<T> for PublishSubject<T> {
    fn subscribe(&self, observer: Box<dyn Observer<T>>) -> Subscription {
        let id = self.registry.lock().register(observer);
        let Some(id) = id else {
            return Subscription::empty();
        };
        let registry = Arc::downgrade(&self.registry);
        Subscription::new(move || {
            let Some(registry) = registry.upgrade() else {
                return;
            };
            let removed = registry.lock().remove(id);
            if let Some(mut observer) = removed {
                observer.on_disposed();
            }
        })
    }
}

struct BehaviorInner<T> {
    current: T,
    registry: Registry<T>,
}

/// A subject that also holds a current value.
///
/// Every new subscriber receives the value held at subscribe time before
/// any live event, so probing one always records at least the initial
/// value. After a terminal the current value is frozen and late
/// subscribers receive only the terminal.
pub struct BehaviorSubject<T> {
    inner: Arc<Mutex<BehaviorInner<T>>>,
}

impl<T: Clone + Send + 'static> BehaviorSubject<T> {
    /// Creates a subject holding `initial`.
    pub fn new(initial: T) -> Self {
        Self {
            inner: Arc::new(Mutex::new(BehaviorInner {
                current: initial,
                registry: Registry::new(),
            })),
        }
    }

    /// The value the subject currently holds.
    pub fn value(&self) -> T {
        self.inner.lock().current.clone()
    }

    /// Updates the current value and delivers it to every subscriber.
    pub fn next(&self, value: T) {
        let mut inner = self.inner.lock();
        if inner.registry.terminal.is_some() {
            return;
        }
        inner.current = value.clone();
        inner.registry.broadcast(value);
    }

    /// Terminates the subject with an error.
    pub fn error(&self, error: impl std::error::Error + Send + Sync + 'static) {
        self.inner
            .lock()
            .registry
            .terminate(Terminal::Error(Arc::new(error)));
    }

    /// Terminates the subject with a completion.
    pub fn complete(&self) {
        self.inner.lock().registry.terminate(Terminal::Completed);
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().registry.len()
    }
}

impl<T> Clone for BehaviorSubject<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Clone + Send + 'static> Source<T> for BehaviorSubject<T> {
    fn subscribe(&self, mut observer: Box<dyn Observer<T>>) -> Subscription {
        let id = {
            let mut inner = self.inner.lock();
            if inner.registry.terminal.is_none() {
                observer.on_next(inner.current.clone());
            }
            inner.registry.register(observer)
        };
        let Some(id) = id else {
            return Subscription::empty();
        };
        let inner = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            let Some(inner) = inner.upgrade() else {
                return;
            };
            let removed = inner.lock().registry.remove(id);
            if let Some(mut observer) = removed {
                observer.on_disposed();
            }
        })
    }
}
