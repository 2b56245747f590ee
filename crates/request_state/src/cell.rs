use std::{
    fmt,
    pin::Pin,
    sync::{Arc, Mutex, MutexGuard, PoisonError, Weak},
    task::{Context, Poll},
};

use futures::Stream;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

type Observer<V> = Arc<dyn Fn(&V) + Send + Sync>;

struct CellInner<V> {
    value: V,
    next_id: u64,
    observers: Vec<(u64, Observer<V>)>,
}

/// A value holder with synchronous, replaying notification.
///
/// New observers receive the current value as soon as they attach; every
/// [`write`](StateCell::write) is delivered to all attached observers, in
/// attachment order, before `write` returns. Only the latest value is kept.
///
/// Delivery order matches write order for writes issued from one task or
/// thread. Writes racing on different threads each reach every observer,
/// but observers may see them in a different order than they were stored,
/// so the last value delivered is not necessarily what [`read`](StateCell::read)
/// returns.
///
/// Cloning a cell yields another handle to the same value.
pub struct StateCell<V> {
    inner: Arc<Mutex<CellInner<V>>>,
}

impl<V> Clone for StateCell<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V: Default + Clone + Send + 'static> Default for StateCell<V> {
    fn default() -> Self {
        Self::new(V::default())
    }
}

impl<V: fmt::Debug> fmt::Debug for StateCell<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = lock(&self.inner);
        f.debug_struct("StateCell")
            .field("value", &inner.value)
            .field("observers", &inner.observers.len())
            .finish()
    }
}

fn lock<V>(inner: &Mutex<CellInner<V>>) -> MutexGuard<'_, CellInner<V>> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<V: Clone + Send + 'static> StateCell<V> {
    pub fn new(initial: V) -> Self {
        Self {
            inner: Arc::new(Mutex::new(CellInner {
                value: initial,
                next_id: 0,
                observers: Vec::new(),
            })),
        }
    }

    pub fn read(&self) -> V {
        lock(&self.inner).value.clone()
    }

    /// Stores `value` and notifies every attached observer.
    ///
    /// Observers run after the internal lock is released, so they may read
    /// or write this cell from inside the callback. Ordering across
    /// concurrent writers is not serialized; see the type-level docs.
    pub fn write(&self, value: V) {
        let observers: Vec<Observer<V>> = {
            let mut inner = lock(&self.inner);
            inner.value = value.clone();
            inner
                .observers
                .iter()
                .map(|(_, observer)| Arc::clone(observer))
                .collect()
        };

        for observer in observers {
            observer(&value);
        }
    }

    /// Attaches `observer` and immediately hands it the current value.
    ///
    /// The observer stays attached until the returned [`Subscription`] is
    /// disposed or dropped.
    #[must_use = "dropping the subscription detaches the observer"]
    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&V) + Send + Sync + 'static,
    {
        let observer: Observer<V> = Arc::new(observer);
        let (id, current) = {
            let mut inner = lock(&self.inner);
            let id = inner.next_id;
            inner.next_id += 1;
            inner.observers.push((id, Arc::clone(&observer)));
            (id, inner.value.clone())
        };

        observer(&current);

        let weak: Weak<Mutex<CellInner<V>>> = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                lock(&inner).observers.retain(|(existing, _)| *existing != id);
            }
        })
    }

    /// Async view of this cell: yields the current value first, then every
    /// subsequent write. The stream stays subscribed until it is dropped.
    pub fn changes(&self) -> CellChanges<V> {
        let (tx, rx) = mpsc::unbounded_channel();
        let subscription = self.subscribe(move |value: &V| {
            let _ = tx.send(value.clone());
        });
        CellChanges {
            stream: UnboundedReceiverStream::new(rx),
            _subscription: subscription,
        }
    }

    pub fn observer_count(&self) -> usize {
        lock(&self.inner).observers.len()
    }
}

/// Disposer returned by [`StateCell::subscribe`].
pub struct Subscription {
    detach: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    fn new(detach: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            detach: Some(Box::new(detach)),
        }
    }

    /// Permanently detaches the observer.
    pub fn dispose(mut self) {
        self.run_detach();
    }

    fn run_detach(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_detach();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("attached", &self.detach.is_some())
            .finish()
    }
}

/// Stream returned by [`StateCell::changes`].
pub struct CellChanges<V> {
    stream: UnboundedReceiverStream<V>,
    _subscription: Subscription,
}

impl<V> Stream for CellChanges<V> {
    type Item = V;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<V>> {
        Pin::new(&mut self.stream).poll_next(cx)
    }
}

#[cfg(test)]
#[path = "tests/cell_tests.rs"]
mod tests;
