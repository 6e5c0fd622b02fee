//! Ordered subscriber lists.
//!
//! Replaces multicast-delegate style event fields with an explicit
//! list: subscribers are invoked synchronously in subscription order,
//! and unsubscribing requires the id handed out at subscribe time.

/// Handle identifying one subscription on one [`Signal`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

/// A synchronous broadcast list for values of type `T`
pub struct Signal<T> {
    subscribers: Vec<(SubscriberId, Box<dyn FnMut(&T)>)>,
    next_id: u64,
}

impl<T> Signal<T> {
    /// Empty signal
    pub fn new() -> Self {
        Self {
            subscribers: Vec::new(),
            next_id: 0,
        }
    }

    /// Attach a listener; returns the id needed to detach it
    pub fn subscribe(&mut self, listener: impl FnMut(&T) + 'static) -> SubscriberId {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(listener)));
        id
    }

    /// Detach a listener; returns whether it was attached
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
        self.subscribers.len() != before
    }

    /// Invoke every listener, in subscription order
    pub fn emit(&mut self, value: &T) {
        for (_, listener) in &mut self.subscribers {
            listener(value);
        }
    }

    /// Number of attached listeners
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    /// Whether no listeners are attached
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

impl<T> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_emit_in_subscription_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut signal = Signal::new();

        let first = Rc::clone(&seen);
        signal.subscribe(move |value: &i32| first.borrow_mut().push(("a", *value)));
        let second = Rc::clone(&seen);
        signal.subscribe(move |value: &i32| second.borrow_mut().push(("b", *value)));

        signal.emit(&7);
        assert_eq!(*seen.borrow(), vec![("a", 7), ("b", 7)]);
    }

    #[test]
    fn test_unsubscribe() {
        let count = Rc::new(RefCell::new(0));
        let mut signal = Signal::new();

        let counter = Rc::clone(&count);
        let id = signal.subscribe(move |_: &()| *counter.borrow_mut() += 1);

        signal.emit(&());
        assert!(signal.unsubscribe(id));
        assert!(!signal.unsubscribe(id));
        signal.emit(&());
        assert_eq!(*count.borrow(), 1);
        assert!(signal.is_empty());
    }
}
