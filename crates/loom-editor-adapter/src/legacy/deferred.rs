//! Lazily computed event fields.

use std::fmt;
use std::rc::Rc;

/// A value computed only when [`get`](Deferred::get) is called.
///
/// Clones share the same thunk. Two `Deferred`s are equal when they share
/// a thunk; the values are never computed for comparison.
pub struct Deferred<T>(Rc<dyn Fn() -> T>);

impl<T> Deferred<T> {
    pub fn new(thunk: impl Fn() -> T + 'static) -> Self {
        Self(Rc::new(thunk))
    }

    /// Run the thunk.
    pub fn get(&self) -> T {
        (self.0)()
    }
}

impl<T: Clone + 'static> Deferred<T> {
    /// A thunk returning a copy of an already known value.
    pub fn value(value: T) -> Self {
        Self::new(move || value.clone())
    }
}

impl<T> Clone for Deferred<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T> fmt::Debug for Deferred<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Deferred(..)")
    }
}

impl<T> PartialEq for Deferred<T> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}
