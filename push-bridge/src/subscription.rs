use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

/// Callback registered with a platform event stream
pub type Listener<T> = Arc<dyn Fn(T) + Send + Sync>;

type Remover = Box<dyn FnOnce() + Send + Sync>;

/// Handle to a registered listener.
///
/// The listener is unregistered when the handle is removed or dropped,
/// whichever comes first. Removal runs at most once.
pub struct Subscription {
    remove: Option<Remover>,
}

impl Subscription {
    pub fn new(remove: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            remove: Some(Box::new(remove)),
        }
    }

    pub fn remove(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(remove) = self.remove.take() {
            remove();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.remove.is_some())
            .finish()
    }
}

struct RegistryInner<T> {
    next_id: u64,
    listeners: Vec<(u64, Listener<T>)>,
}

/// Fan-out list of listeners for one event stream.
///
/// Platform implementations hand out a [`Subscription`] per registered
/// listener. Listeners run outside the registry lock, so a listener may
/// subscribe or unsubscribe while it is being called.
pub struct ListenerRegistry<T> {
    inner: Arc<Mutex<RegistryInner<T>>>,
}

impl<T: Clone + 'static> ListenerRegistry<T> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(RegistryInner {
                next_id: 0,
                listeners: Vec::new(),
            })),
        }
    }

    pub fn add(&self, listener: Listener<T>) -> Subscription {
        let id = {
            let mut inner = lock(&self.inner);
            let id = inner.next_id;
            inner.next_id += 1;
            inner.listeners.push((id, listener));
            id
        };

        let registry: Weak<Mutex<RegistryInner<T>>> = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = registry.upgrade() {
                lock(&inner).listeners.retain(|(listener_id, _)| *listener_id != id);
            }
        })
    }

    /// Call every registered listener with a clone of `event`, returning how many ran
    pub fn emit(&self, event: &T) -> usize {
        let listeners: Vec<Listener<T>> = lock(&self.inner)
            .listeners
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in &listeners {
            listener(event.clone());
        }
        listeners.len()
    }

    pub fn len(&self) -> usize {
        lock(&self.inner).listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone + 'static> Default for ListenerRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_listener(counter: &Arc<AtomicUsize>) -> Listener<u32> {
        let counter = Arc::clone(counter);
        Arc::new(move |_: u32| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn emit_reaches_every_listener() {
        let registry = ListenerRegistry::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let _a = registry.add(counting_listener(&counter));
        let _b = registry.add(counting_listener(&counter));

        assert_eq!(registry.emit(&7), 2);
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn dropping_subscription_unregisters_listener() {
        let registry = ListenerRegistry::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let subscription = registry.add(counting_listener(&counter));
        drop(subscription);

        assert!(registry.is_empty());
        assert_eq!(registry.emit(&1), 0);
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn removing_one_subscription_keeps_the_others() {
        let registry = ListenerRegistry::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let first = registry.add(counting_listener(&counter));
        let _second = registry.add(counting_listener(&counter));

        first.remove();
        assert_eq!(registry.len(), 1);
        registry.emit(&1);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn subscription_outliving_registry_is_harmless() {
        let registry = ListenerRegistry::new();
        let subscription = registry.add(Arc::new(|_: u32| {}));
        drop(registry);
        subscription.remove();
    }

    #[test]
    fn remover_runs_once() {
        let runs = Arc::new(AtomicUsize::new(0));
        let counted = Arc::clone(&runs);
        let subscription = Subscription::new(move || {
            counted.fetch_add(1, Ordering::SeqCst);
        });
        subscription.remove();
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }
}
