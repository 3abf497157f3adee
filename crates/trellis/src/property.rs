//! Reactive value cells and the binding objects that tie them together.
//!
//! A [`Property`] is a mutable cell that notifies subscribers on every
//! write. Handles are cheap clones sharing one cell, so a property stored
//! inside the view arena can be written from anywhere without borrowing the
//! arena itself. [`Binding`] packages the subscriptions behind one-way,
//! two-way and command bindings so they can be retained by an owning view
//! and dropped with it.

use std::{
    cell::{Cell, RefCell},
    mem,
    rc::Rc,
};

/// Guard for a single registered callback.
///
/// Dropping the guard deactivates the callback; the owning cell prunes the
/// dead entry on its next notification.
#[must_use]
pub struct Subscription {
    /// Liveness flag shared with the subscriber entry.
    alive: Rc<Cell<bool>>,
}

impl Subscription {
    /// Wrap a liveness flag.
    pub(crate) fn new(alive: Rc<Cell<bool>>) -> Self {
        Self { alive }
    }

    /// Leak the guard, keeping the callback registered for the life of the
    /// program.
    pub fn forever(self) {
        mem::forget(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.alive.set(false);
    }
}

/// A registered change callback plus its liveness flag.
struct Entry<T> {
    /// Cleared when the matching [`Subscription`] is dropped.
    alive: Rc<Cell<bool>>,
    /// The callback, invoked with the new value.
    callback: Box<dyn FnMut(&T)>,
}

/// Interior state of a [`Property`].
struct Inner<T> {
    /// Current value.
    value: T,
    /// Registered subscribers.
    subscribers: Vec<Entry<T>>,
}

/// A mutable cell that notifies subscribers on every write.
///
/// Notification runs synchronously in the writing call. Subscribers are
/// taken out of the cell while they run, so a callback may freely read or
/// write the same property; a re-entrant write is stored but not
/// re-notified.
pub struct Property<T> {
    /// Shared cell state.
    inner: Rc<RefCell<Inner<T>>>,
}

impl<T> Clone for Property<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Default> Default for Property<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> Property<T> {
    /// Construct a cell holding `value`.
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                value,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Read the current value through a closure, without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    /// Register a change callback, invoked with the new value after every
    /// subsequent write.
    pub fn subscribe(&self, callback: impl FnMut(&T) + 'static) -> Subscription {
        let alive = Rc::new(Cell::new(true));
        self.inner.borrow_mut().subscribers.push(Entry {
            alive: Rc::clone(&alive),
            callback: Box::new(callback),
        });
        Subscription::new(alive)
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.inner
            .borrow()
            .subscribers
            .iter()
            .filter(|e| e.alive.get())
            .count()
    }
}

impl<T: Clone> Property<T> {
    /// Return a clone of the current value.
    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Store a new value and notify subscribers.
    pub fn set(&self, value: T) {
        self.inner.borrow_mut().value = value.clone();
        self.notify(&value);
    }

    /// Invoke live subscribers outside the cell borrow.
    fn notify(&self, value: &T) {
        let mut subscribers = mem::take(&mut self.inner.borrow_mut().subscribers);
        for entry in &mut subscribers {
            if entry.alive.get() {
                (entry.callback)(value);
            }
        }
        subscribers.retain(|e| e.alive.get());
        // Splice back, keeping any subscribers registered during the calls.
        let mut inner = self.inner.borrow_mut();
        let added = mem::replace(&mut inner.subscribers, subscribers);
        inner.subscribers.extend(added);
    }
}

/// A subscriber entry for [`Signal`].
struct SignalEntry {
    /// Cleared when the matching [`Subscription`] is dropped.
    alive: Rc<Cell<bool>>,
    /// The registered action.
    callback: Box<dyn FnMut()>,
}

/// An argumentless event source, the target of command bindings.
#[derive(Default)]
pub struct Signal {
    /// Registered actions.
    inner: Rc<RefCell<Vec<SignalEntry>>>,
}

impl Clone for Signal {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl Signal {
    /// Construct a signal with no connected actions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an action to run on every [`fire`](Self::fire).
    pub fn connect(&self, callback: impl FnMut() + 'static) -> Subscription {
        let alive = Rc::new(Cell::new(true));
        self.inner.borrow_mut().push(SignalEntry {
            alive: Rc::clone(&alive),
            callback: Box::new(callback),
        });
        Subscription::new(alive)
    }

    /// Invoke all connected live actions.
    pub fn fire(&self) {
        let mut entries = mem::take(&mut *self.inner.borrow_mut());
        for entry in &mut entries {
            if entry.alive.get() {
                (entry.callback)();
            }
        }
        entries.retain(|e| e.alive.get());
        let mut inner = self.inner.borrow_mut();
        let added = mem::replace(&mut *inner, entries);
        inner.extend(added);
    }
}

/// Owns the subscriptions that keep two endpoints in sync.
///
/// Bindings are retained by the owning view and dropped with it, which
/// detaches the underlying callbacks.
#[must_use]
pub struct Binding {
    /// The subscriptions this binding keeps alive.
    _subscriptions: Vec<Subscription>,
}

impl Binding {
    /// Mirror `source` into `target`: the target adopts the source's value
    /// immediately and on every subsequent source write.
    pub fn one_way<T: Clone + 'static>(source: &Property<T>, target: &Property<T>) -> Self {
        target.set(source.get());
        let target = target.clone();
        let sub = source.subscribe(move |v| target.set(v.clone()));
        Self {
            _subscriptions: vec![sub],
        }
    }

    /// Keep two properties equal in both directions. The target adopts the
    /// source's value at bind time. Each hop writes only when the far side
    /// differs, which stops re-entrant propagation once both sides agree.
    pub fn two_way<T: Clone + PartialEq + 'static>(a: &Property<T>, b: &Property<T>) -> Self {
        b.set(a.get());
        let forward = {
            let b = b.clone();
            a.subscribe(move |v| {
                if b.with(|cur| cur != v) {
                    b.set(v.clone());
                }
            })
        };
        let backward = {
            let a = a.clone();
            b.subscribe(move |v| {
                if a.with(|cur| cur != v) {
                    a.set(v.clone());
                }
            })
        };
        Self {
            _subscriptions: vec![forward, backward],
        }
    }

    /// Run `action` whenever `signal` fires.
    pub fn command(signal: &Signal, action: impl FnMut() + 'static) -> Self {
        Self {
            _subscriptions: vec![signal.connect(action)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_notifies_subscribers() {
        let p = Property::new(1);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        let _sub = p.subscribe(move |v| log.borrow_mut().push(*v));

        p.set(2);
        p.set(3);
        assert_eq!(*seen.borrow(), vec![2, 3]);
        assert_eq!(p.get(), 3);
    }

    #[test]
    fn dropped_subscription_stops_notification() {
        let p = Property::new(0);
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        let sub = p.subscribe(move |_| c.set(c.get() + 1));

        p.set(1);
        drop(sub);
        p.set(2);
        assert_eq!(count.get(), 1);
        assert_eq!(p.subscriber_count(), 0);
    }

    #[test]
    fn handles_share_one_cell() {
        let a = Property::new(String::from("x"));
        let b = a.clone();
        b.set(String::from("y"));
        assert_eq!(a.get(), "y");
    }

    #[test]
    fn one_way_mirrors_source() {
        let source = Property::new(1);
        let target = Property::new(0);
        let binding = Binding::one_way(&source, &target);

        assert_eq!(target.get(), 1);
        source.set(5);
        assert_eq!(target.get(), 5);

        // Writes to the target do not flow back.
        target.set(9);
        assert_eq!(source.get(), 5);

        drop(binding);
        source.set(7);
        assert_eq!(target.get(), 9);
    }

    #[test]
    fn two_way_converges_without_ping_pong() {
        let a = Property::new(1);
        let b = Property::new(0);
        let _binding = Binding::two_way(&a, &b);
        assert_eq!(b.get(), 1);

        let writes = Rc::new(Cell::new(0));
        let w = Rc::clone(&writes);
        let _probe = b.subscribe(move |_| w.set(w.get() + 1));

        a.set(4);
        assert_eq!(b.get(), 4);
        b.set(8);
        assert_eq!(a.get(), 8);
        // One notification per effective write on b: a=4 and b=8.
        assert_eq!(writes.get(), 2);
    }

    #[test]
    fn command_fires_action() {
        let signal = Signal::new();
        let fired = Rc::new(Cell::new(0));
        let f = Rc::clone(&fired);
        let binding = Binding::command(&signal, move || f.set(f.get() + 1));

        signal.fire();
        signal.fire();
        assert_eq!(fired.get(), 2);

        drop(binding);
        signal.fire();
        assert_eq!(fired.get(), 2);
    }
}
