//! Decorator traits and type erasure.
//!
//! # How decorators are stored
//!
//! The registry holds decorators of *different* concrete types in a single
//! `Vec<Binding>`. A collection can only hold one concrete type, so each
//! decorator is hidden behind a trait object (`dyn Before` or `dyn Around`)
//! and tagged with its kind in the [`Decorator`] enum.
//!
//! The chain from user code to vtable call is:
//!
//! ```text
//! struct Audit;  impl Before for Audit { … }        ← user writes this
//!        ↓ Decorator::before(Audit)
//! Decorator::Before(Arc::new(Audit))                ← shared, type-erased
//!        ↓  stored in a Binding inside the Registry
//! decorator.before(&invocation)  at call time       ← one vtable dispatch
//! ```
//!
//! Closures are accepted too, through [`Decorator::before_fn`] and
//! [`Decorator::around_fn`], which wrap them in a small newtype exactly like
//! a hand-written decorator.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::error::Error;
use crate::invocation::Invocation;

// ── Results ──────────────────────────────────────────────────────────────────

/// The type-erased return value of an operation.
///
/// The dispatcher boxes the body's result on the way in and downcasts it back
/// to the caller's type on the way out, so decorators can pass it along (or
/// inspect it) without being generic over every operation's return type.
pub type Output = Box<dyn Any + Send>;

/// What a continuation, and therefore every around-decorator, returns.
pub type Outcome = Result<Output, Error>;

// ── Continuation ─────────────────────────────────────────────────────────────

/// The deferred rest of the chain, handed to an [`Around`] decorator.
///
/// [`proceed`](Next::proceed) takes `self` by value: the continuation can run
/// at most once, and the compiler rejects a second call.
pub struct Next<'a> {
    rest: Box<dyn FnOnce() -> Outcome + 'a>,
}

impl<'a> Next<'a> {
    pub(crate) fn new(rest: impl FnOnce() -> Outcome + 'a) -> Self {
        Self { rest: Box::new(rest) }
    }

    /// Runs the remaining decorators and the operation body.
    pub fn proceed(self) -> Outcome {
        (self.rest)()
    }
}

impl fmt::Debug for Next<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Next")
    }
}

// ── Decorator traits ─────────────────────────────────────────────────────────

/// Runs strictly before the operation body. Observes, never vetoes.
pub trait Before: Send + Sync + 'static {
    /// Name used in diagnostics.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn before(&self, invocation: &Invocation);
}

/// Wraps the whole call.
///
/// An implementation must call [`Next::proceed`] exactly once and hand back
/// its result, propagating a failure with `?`:
///
/// ```rust
/// use tracing::info;
/// use weft::{Around, Invocation, Next, Outcome};
///
/// struct Timed;
///
/// impl Around for Timed {
///     fn around(&self, invocation: &Invocation, next: Next<'_>) -> Outcome {
///         let started = std::time::Instant::now();
///         let output = next.proceed()?;
///         info!(operation = %invocation.id(), elapsed = ?started.elapsed(), "done");
///         Ok(output)
///     }
/// }
/// ```
pub trait Around: Send + Sync + 'static {
    /// Name used in diagnostics.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn around(&self, invocation: &Invocation, next: Next<'_>) -> Outcome;
}

// ── Decorator ────────────────────────────────────────────────────────────────

/// A type-erased decorator of either kind, cheap to clone.
#[derive(Clone)]
pub enum Decorator {
    Before(Arc<dyn Before>),
    Around(Arc<dyn Around>),
}

impl Decorator {
    pub fn before(decorator: impl Before) -> Self {
        Self::Before(Arc::new(decorator))
    }

    pub fn around(decorator: impl Around) -> Self {
        Self::Around(Arc::new(decorator))
    }

    /// A before-decorator from a closure.
    pub fn before_fn<F>(f: F) -> Self
    where
        F: Fn(&Invocation) + Send + Sync + 'static,
    {
        Self::before(FnBefore(f))
    }

    /// An around-decorator from a closure.
    pub fn around_fn<F>(f: F) -> Self
    where
        F: Fn(&Invocation, Next<'_>) -> Outcome + Send + Sync + 'static,
    {
        Self::around(FnAround(f))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Before(d) => d.name(),
            Self::Around(d) => d.name(),
        }
    }

    /// Whether both handles point at the same decorator instance.
    pub fn same_as(&self, other: &Decorator) -> bool {
        match (self, other) {
            (Self::Before(a), Self::Before(b)) => Arc::ptr_eq(a, b),
            (Self::Around(a), Self::Around(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Decorator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Before(d) => write!(f, "Before({})", d.name()),
            Self::Around(d) => write!(f, "Around({})", d.name()),
        }
    }
}

// ── Closure wrappers ─────────────────────────────────────────────────────────

/// Newtype bridging a closure to [`Before`].
struct FnBefore<F>(F);

impl<F> Before for FnBefore<F>
where
    F: Fn(&Invocation) + Send + Sync + 'static,
{
    fn name(&self) -> &'static str {
        std::any::type_name::<F>()
    }

    fn before(&self, invocation: &Invocation) {
        (self.0)(invocation)
    }
}

/// Newtype bridging a closure to [`Around`].
struct FnAround<F>(F);

impl<F> Around for FnAround<F>
where
    F: Fn(&Invocation, Next<'_>) -> Outcome + Send + Sync + 'static,
{
    fn name(&self) -> &'static str {
        std::any::type_name::<F>()
    }

    fn around(&self, invocation: &Invocation, next: Next<'_>) -> Outcome {
        (self.0)(invocation, next)
    }
}
