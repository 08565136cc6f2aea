//! Observer registration for document notifications.
//!
//! A [`HookSource`] is owned by whatever object emits events. Observers call
//! [`HookSource::add`] and keep the returned [`Hook`]; dropping the handle
//! unregisters the callback. Dropping the source first leaves outstanding
//! handles inert.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

type Callback<E> = Rc<dyn Fn(&E)>;

struct Registry<E> {
    next_id: u64,
    callbacks: Vec<(u64, Callback<E>)>,
}

impl<E> Default for Registry<E> {
    fn default() -> Self {
        Self {
            next_id: 0,
            callbacks: Vec::new(),
        }
    }
}

/// Owner side of an observer list.
pub struct HookSource<E> {
    registry: Rc<RefCell<Registry<E>>>,
}

impl<E> Default for HookSource<E> {
    fn default() -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry::default())),
        }
    }
}

impl<E> fmt::Debug for HookSource<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookSource")
            .field("len", &self.len())
            .finish()
    }
}

impl<E> HookSource<E> {
    /// Number of live registrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registry.borrow().callbacks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<E: 'static> HookSource<E> {
    /// Create an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback. It stays registered while the returned handle lives.
    #[must_use = "dropping the Hook unregisters the callback"]
    pub fn add<F>(&self, callback: F) -> Hook<E>
    where
        F: Fn(&E) + 'static,
    {
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.callbacks.push((id, Rc::new(callback)));
        Hook {
            registry: Rc::downgrade(&self.registry),
            id,
        }
    }

    /// Invoke every registered callback in registration order.
    ///
    /// Callbacks may add or drop hooks on this source; such changes take
    /// effect from the next call.
    pub fn call(&self, event: &E) {
        let callbacks: Vec<Callback<E>> = self
            .registry
            .borrow()
            .callbacks
            .iter()
            .map(|(_, cb)| Rc::clone(cb))
            .collect();
        for callback in callbacks {
            callback(event);
        }
    }
}

/// Observer side of a registration.
pub struct Hook<E> {
    registry: Weak<RefCell<Registry<E>>>,
    id: u64,
}

impl<E> Hook<E> {
    /// Whether the source this hook was registered with still exists.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.registry.strong_count() > 0
    }
}

impl<E> fmt::Debug for Hook<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hook")
            .field("id", &self.id)
            .field("attached", &self.is_attached())
            .finish()
    }
}

impl<E> Drop for Hook<E> {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            if let Ok(mut registry) = registry.try_borrow_mut() {
                registry.callbacks.retain(|(id, _)| *id != self.id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_hook_called() {
        let source: HookSource<i32> = HookSource::new();
        let sum = Rc::new(Cell::new(0));
        let sum_clone = Rc::clone(&sum);
        let _hook = source.add(move |v| sum_clone.set(sum_clone.get() + *v));

        source.call(&3);
        source.call(&4);
        assert_eq!(sum.get(), 7);
    }

    #[test]
    fn test_hook_drop_unregisters() {
        let source: HookSource<()> = HookSource::new();
        let calls = Rc::new(Cell::new(0));

        let calls_a = Rc::clone(&calls);
        let hook_a = source.add(move |()| calls_a.set(calls_a.get() + 1));
        let calls_b = Rc::clone(&calls);
        let _hook_b = source.add(move |()| calls_b.set(calls_b.get() + 10));
        assert_eq!(source.len(), 2);

        source.call(&());
        assert_eq!(calls.get(), 11);

        drop(hook_a);
        assert_eq!(source.len(), 1);
        source.call(&());
        assert_eq!(calls.get(), 21);
    }

    #[test]
    fn test_debug_reports_registrations() {
        let source: HookSource<&str> = HookSource::new();
        let _hook = source.add(|_| {});
        assert_eq!(format!("{source:?}"), "HookSource { len: 1 }");
    }

    #[test]
    fn test_source_drop_detaches_hooks() {
        let source: HookSource<u8> = HookSource::new();
        let hook = source.add(|_| {});
        assert!(hook.is_attached());
        drop(source);
        assert!(!hook.is_attached());
        // Dropping a detached hook must be harmless.
        drop(hook);
    }

    #[test]
    fn test_callback_may_register_during_call() {
        let source: Rc<HookSource<()>> = Rc::new(HookSource::new());
        let late: Rc<RefCell<Vec<Hook<()>>>> = Rc::new(RefCell::new(Vec::new()));

        let source_clone = Rc::clone(&source);
        let late_clone = Rc::clone(&late);
        let _hook = source.add(move |()| {
            late_clone.borrow_mut().push(source_clone.add(|()| {}));
        });

        source.call(&());
        assert_eq!(source.len(), 2);
    }
}
