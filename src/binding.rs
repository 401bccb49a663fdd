use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

type Observer<T> = Rc<dyn Fn(&T)>;

/// A cloneable handle to a shared, observable value.
///
/// All clones of a `Binding` refer to the same value.  Observers registered
/// with [`Binding::subscribe()`] are called after every change to the value
/// and stay registered until the returned [`Subscription`] is dropped.
pub struct Binding<T>(Rc<RefCell<Slot<T>>>);

struct Slot<T> {
    value: T,
    observers: Vec<(u64, Observer<T>)>,
    next_id: u64,
}

impl<T> Binding<T> {
    pub fn new(value: T) -> Binding<T> {
        Binding(Rc::new(RefCell::new(Slot {
            value,
            observers: Vec::new(),
            next_id: 0,
        })))
    }

    /// Call `func` on a reference to the current value
    pub fn with<F, R>(&self, func: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        func(&self.0.borrow().value)
    }

    pub fn observer_count(&self) -> usize {
        self.0.borrow().observers.len()
    }

    /// Returns true if `self` and `other` refer to the same value
    pub fn same_as(&self, other: &Binding<T>) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<T: 'static> Binding<T> {
    /// Register `observer` to be called with the new value after each change.
    ///
    /// The observer is removed when the returned `Subscription` is dropped.
    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&T) + 'static,
    {
        let id = {
            let mut slot = self.0.borrow_mut();
            let id = slot.next_id;
            slot.next_id += 1;
            slot.observers.push((id, Rc::new(observer)));
            id
        };
        let weak: Weak<RefCell<Slot<T>>> = Rc::downgrade(&self.0);
        Subscription::new(move || {
            if let Some(slot) = weak.upgrade() {
                slot.borrow_mut().observers.retain(|&(oid, _)| oid != id);
            }
        })
    }
}

impl<T: Clone> Binding<T> {
    pub fn get(&self) -> T {
        self.0.borrow().value.clone()
    }
}

impl<T: Clone + PartialEq> Binding<T> {
    /// Store `value` and notify observers.  Nothing happens if `value` equals
    /// the current value.  Returns whether the value changed.
    pub fn set(&self, value: T) -> bool {
        {
            let mut slot = self.0.borrow_mut();
            if slot.value == value {
                return false;
            }
            slot.value = value;
        }
        self.notify();
        true
    }

    /// Modify the value in place, notifying observers if it changed
    pub fn update<F>(&self, func: F) -> bool
    where
        F: FnOnce(&mut T),
    {
        let mut value = self.get();
        func(&mut value);
        self.set(value)
    }

    fn notify(&self) {
        // Observers are called without the slot borrowed so that they may
        // read or write the binding themselves.
        let (value, observers) = {
            let slot = self.0.borrow();
            let observers = slot
                .observers
                .iter()
                .map(|(_, obs)| Rc::clone(obs))
                .collect::<Vec<_>>();
            (slot.value.clone(), observers)
        };
        for obs in observers {
            obs(&value);
        }
    }
}

impl<T> Clone for Binding<T> {
    fn clone(&self) -> Binding<T> {
        Binding(Rc::clone(&self.0))
    }
}

impl<T: fmt::Debug> fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slot = self.0.borrow();
        f.debug_struct("Binding")
            .field("value", &slot.value)
            .field("observers", &slot.observers.len())
            .finish()
    }
}

impl<T: Default> Default for Binding<T> {
    fn default() -> Binding<T> {
        Binding::new(T::default())
    }
}

/// Handle for one or more observer registrations; dropping it unregisters
/// them
#[must_use = "dropping a Subscription unregisters its observers"]
pub struct Subscription {
    cancellers: Vec<Box<dyn FnOnce()>>,
}

impl Subscription {
    fn new<F: FnOnce() + 'static>(cancel: F) -> Subscription {
        Subscription {
            cancellers: vec![Box::new(cancel)],
        }
    }

    /// Combine two subscriptions into one that unregisters both when dropped
    pub fn join(mut self, mut other: Subscription) -> Subscription {
        self.cancellers.append(&mut other.cancellers);
        self
    }

    /// Unregister all observers now
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        for cancel in std::mem::take(&mut self.cancellers) {
            cancel();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("registrations", &self.cancellers.len())
            .finish()
    }
}
