//! Handlers

use std::fmt;
use std::rc::Rc;

use crate::DelegatedEvent;

/// What a handler asks the dispatcher to do next
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Propagation {
    /// Keep walking the bubble path
    #[default]
    Continue,
    /// Prevent the default action and stop propagation
    Cancel,
}

impl From<()> for Propagation {
    fn from(_: ()) -> Self {
        Propagation::Continue
    }
}

/// `false` cancels, like returning `false` from a DOM0 handler
impl From<bool> for Propagation {
    fn from(keep_going: bool) -> Self {
        if keep_going { Propagation::Continue } else { Propagation::Cancel }
    }
}

type HandlerFn = dyn Fn(&mut DelegatedEvent<'_, '_>) -> Propagation;

/// Shared handler callback.
///
/// Clones share identity: removal by handler compares the underlying
/// allocation, not behavior.
#[derive(Clone)]
pub struct Handler(Rc<HandlerFn>);

impl Handler {
    /// Wrap a closure returning `()`, `bool` or [`Propagation`]
    pub fn new<F, R>(f: F) -> Self
    where
        F: Fn(&mut DelegatedEvent<'_, '_>) -> R + 'static,
        R: Into<Propagation>,
    {
        Self(Rc::new(move |event: &mut DelegatedEvent<'_, '_>| f(event).into()))
    }

    pub(crate) fn call(&self, event: &mut DelegatedEvent<'_, '_>) -> Propagation {
        (self.0)(event)
    }

    /// Check whether both handles refer to the same callback
    pub fn ptr_eq(&self, other: &Handler) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
    }
}

impl PartialEq for Handler {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Handler {}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handler({:p})", Rc::as_ptr(&self.0) as *const ())
    }
}
