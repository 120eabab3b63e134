// File: src/context.rs
// Purpose: Shared values handed down a component tree, with change notification

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

type Consumer<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct ContextInner<T> {
    value: T,
    consumers: Vec<(u64, Consumer<T>)>,
    next_consumer: u64,
}

/// A value shared across components.
///
/// Consumers are called once with the current value when they subscribe
/// and again on every [`Context::provide`].
pub struct Context<T> {
    inner: Arc<RwLock<ContextInner<T>>>,
}

impl<T> Clone for Context<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Context<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.read();
        f.debug_struct("Context")
            .field("value", &inner.value)
            .field("consumers", &inner.consumers.len())
            .finish()
    }
}

impl<T: Default> Default for Context<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> Context<T> {
    pub fn new(default_value: T) -> Self {
        Self {
            inner: Arc::new(RwLock::new(ContextInner {
                value: default_value,
                consumers: Vec::new(),
                next_consumer: 0,
            })),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, ContextInner<T>> {
        self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, ContextInner<T>> {
        self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Replace the value and notify every consumer
    pub fn provide(&self, value: T) {
        let consumers: Vec<Consumer<T>> = {
            let mut inner = self.write();
            inner.value = value;
            inner.consumers.iter().map(|(_, c)| c.clone()).collect()
        };
        let inner = self.read();
        for consumer in consumers {
            consumer(&inner.value);
        }
    }

    /// Subscribe to changes; `callback` runs immediately with the current value
    pub fn consume<F>(&self, callback: F) -> ContextSubscription<T>
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let callback: Consumer<T> = Arc::new(callback);
        let id = {
            let mut inner = self.write();
            let id = inner.next_consumer;
            inner.next_consumer += 1;
            inner.consumers.push((id, callback.clone()));
            id
        };
        callback(&self.read().value);
        ContextSubscription {
            id,
            context: self.clone(),
        }
    }

    pub fn consumer_count(&self) -> usize {
        self.read().consumers.len()
    }
}

impl<T: Clone> Context<T> {
    pub fn get_value(&self) -> T {
        self.read().value.clone()
    }
}

/// Shorthand for [`Context::new`]
pub fn create_context<T>(default_value: T) -> Context<T> {
    Context::new(default_value)
}

/// Handle returned by [`Context::consume`]
pub struct ContextSubscription<T> {
    id: u64,
    context: Context<T>,
}

impl<T> ContextSubscription<T> {
    /// Stop receiving updates. Returns `false` if already removed.
    pub fn unsubscribe(self) -> bool {
        let mut inner = self.context.write();
        let before = inner.consumers.len();
        inner.consumers.retain(|(id, _)| *id != self.id);
        inner.consumers.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    #[test]
    fn test_consume_receives_current_and_new_values() {
        let theme = create_context("light".to_string());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let subscription = theme.consume(move |value: &String| sink.lock().unwrap().push(value.clone()));

        theme.provide("dark".to_string());
        assert_eq!(*seen.lock().unwrap(), vec!["light", "dark"]);
        assert_eq!(theme.get_value(), "dark");

        assert!(subscription.unsubscribe());
        theme.provide("sepia".to_string());
        assert_eq!(seen.lock().unwrap().len(), 2);
        assert_eq!(theme.consumer_count(), 0);
    }

    #[test]
    fn test_clones_share_value() {
        let ctx: Context<u32> = Context::default();
        let other = ctx.clone();
        other.provide(7);
        assert_eq!(ctx.get_value(), 7);
    }
}
