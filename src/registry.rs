//! Interception registry.
//!
//! A flat list of bindings plus a table of markers. Build it once at startup,
//! freeze it, hand it to a [`Dispatcher`](crate::Dispatcher). Every builder
//! call returns `self` so registrations chain naturally.

use std::collections::HashMap;
use std::fmt;

use crate::decorator::Decorator;
use crate::invocation::OperationId;

/// An opt-in tag attached to operations.
///
/// Decorators bound to a marker apply to every operation carrying it and to
/// nothing else.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Marker(&'static str);

impl Marker {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub fn name(&self) -> &'static str { self.0 }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

/// Selects the operations a binding applies to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Pointcut {
    /// Exactly one operation, by owner type and method name.
    Operation(OperationId),
    /// Every operation of one owner type.
    Owner(&'static str),
    /// Every operation carrying the marker.
    Marked(Marker),
}

/// One registered association between a pointcut and a decorator.
#[derive(Clone, Debug)]
pub struct Binding {
    pointcut: Pointcut,
    decorator: Decorator,
}

impl Binding {
    pub fn pointcut(&self) -> Pointcut { self.pointcut }
    pub fn decorator(&self) -> &Decorator { &self.decorator }
}

/// The binding table.
///
/// Immutable once built: the dispatcher only ever reads it, so one registry
/// can be shared behind an `Arc` by any number of dispatchers and threads.
///
/// ```rust
/// use weft::{Decorator, Marker, OperationId, Pointcut, Registry};
///
/// const AUDITED: Marker = Marker::new("Audited");
/// const TRANSFER: OperationId = OperationId::new("Ledger", "transfer");
///
/// let registry = Registry::new()
///     .mark(TRANSFER, AUDITED)
///     .on(Pointcut::Marked(AUDITED), Decorator::before_fn(|inv| {
///         tracing::info!("audit {}", inv.id());
///     }))
///     .on(Pointcut::Operation(TRANSFER), Decorator::around_fn(|_, next| next.proceed()));
///
/// assert_eq!(registry.resolve(TRANSFER).len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct Registry {
    bindings: Vec<Binding>,
    markers: HashMap<OperationId, Vec<Marker>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches `marker` to `operation`. Marking twice is a no-op.
    pub fn mark(mut self, operation: OperationId, marker: Marker) -> Self {
        let markers = self.markers.entry(operation).or_default();
        if !markers.contains(&marker) {
            markers.push(marker);
        }
        self
    }

    /// Binds `decorator` to every operation selected by `pointcut`.
    ///
    /// Registration order is significant: among decorators of the same kind
    /// applying to one operation, the one registered first runs first.
    pub fn on(mut self, pointcut: Pointcut, decorator: Decorator) -> Self {
        self.bindings.push(Binding { pointcut, decorator });
        self
    }

    pub fn markers(&self, operation: OperationId) -> &[Marker] {
        self.markers.get(&operation).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn bindings(&self) -> &[Binding] { &self.bindings }

    /// Every decorator applying to `operation`, in registration order.
    ///
    /// A binding is returned at most once even when it matches through more
    /// than one route.
    pub fn resolve(&self, operation: OperationId) -> Vec<Decorator> {
        let markers = self.markers(operation);
        self.bindings.iter()
            .filter(|b| match b.pointcut {
                Pointcut::Operation(id) => id == operation,
                Pointcut::Owner(owner) => owner == operation.owner(),
                Pointcut::Marked(marker) => markers.contains(&marker),
            })
            .map(|b| b.decorator.clone())
            .collect()
    }
}
