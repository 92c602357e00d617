//! Call dispatch: resolving decorators and composing them around a body.
//!
//! # Composition order
//!
//! For one invocation the dispatcher splits the resolved decorators by kind
//! and nests them like this:
//!
//! ```text
//! around[0] before-logic
//!   around[1] before-logic
//!     before[0], before[1], …      ← as the innermost continuation begins
//!     operation body
//!   around[1] after-logic
//! around[0] after-logic
//! ```
//!
//! Within each kind, registration order decides: the first registered around
//! is the outermost, the first registered before runs first.
//!
//! A failing body short-circuits the stack. Each around sees the error come
//! out of `proceed()` and, by propagating it, skips its own after-logic. The
//! caller receives the very same error value.

use std::any::Any;
use std::cell::Cell;
use std::sync::Arc;

use tracing::{debug_span, trace};

use crate::decorator::{Around, Before, Decorator, Next, Outcome, Output};
use crate::error::Error;
use crate::invocation::{Arg, Invocation, OperationId};
use crate::registry::Registry;

/// Runs operations through the decorators bound to them.
///
/// Cloning is cheap: clones share one frozen [`Registry`].
#[derive(Clone, Debug)]
pub struct Dispatcher {
    registry: Arc<Registry>,
}

impl Dispatcher {
    pub fn new(registry: Registry) -> Self {
        Self { registry: Arc::new(registry) }
    }

    pub fn registry(&self) -> &Registry { &self.registry }

    /// The decorators that will wrap `operation`, in registration order.
    pub fn decorators(&self, operation: OperationId) -> Vec<Decorator> {
        self.registry.resolve(operation)
    }

    /// Invokes `body` as operation `operation` with `args`, wrapped in every
    /// decorator bound to it.
    ///
    /// The body runs exactly once when every around-decorator proceeds. Its
    /// error, if any, is returned unchanged.
    pub fn invoke<R, F>(&self, operation: OperationId, args: Vec<Arg>, body: F) -> Result<R, Error>
    where
        R: Any + Send,
        F: FnOnce(&Invocation) -> Result<R, Error>,
    {
        let invocation = Invocation::new(operation, args);
        let span = debug_span!("invoke", %operation);
        let _entered = span.enter();

        let mut arounds = Vec::new();
        let mut befores = Vec::new();
        for decorator in self.registry.resolve(operation) {
            match decorator {
                Decorator::Around(d) => arounds.push(d),
                Decorator::Before(d) => befores.push(d),
            }
        }
        trace!(arounds = arounds.len(), befores = befores.len(), "resolved decorators");

        let body = move |inv: &Invocation| body(inv).map(|r| Box::new(r) as Output);
        let output = run(&arounds, &befores, &invocation, body)?;

        output.downcast::<R>()
            .map(|r| *r)
            .map_err(|_| Error::UnexpectedOutput {
                operation,
                expected: std::any::type_name::<R>(),
            })
    }
}

// ── Chain ─────────────────────────────────────────────────────────────────────

/// Peels one around-decorator per level; the innermost level runs the
/// before-decorators and then the body.
fn run<F>(
    arounds: &[Arc<dyn Around>],
    befores: &[Arc<dyn Before>],
    invocation: &Invocation,
    body: F,
) -> Outcome
where
    F: FnOnce(&Invocation) -> Outcome,
{
    let Some((outer, rest)) = arounds.split_first() else {
        trace!(stage = "before_decorators");
        for decorator in befores {
            decorator.before(invocation);
        }
        trace!(stage = "underlying_call");
        let outcome = body(invocation);
        if outcome.is_err() {
            trace!(stage = "failed");
        }
        return outcome;
    };

    let proceeded = Cell::new(false);
    let next = Next::new(|| {
        proceeded.set(true);
        run(rest, befores, invocation, body)
    });

    trace!(stage = "around_before", decorator = outer.name());
    let output = outer.around(invocation, next)?;
    if !proceeded.get() {
        return Err(Error::NotProceeded {
            operation: invocation.id(),
            decorator: outer.name(),
        });
    }
    trace!(stage = "around_after", decorator = outer.name());
    Ok(output)
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::Mutex;

    use super::*;
    use crate::registry::{Marker, Pointcut};

    const OP: OperationId = OperationId::new("Greeter", "greet");
    const MARK: Marker = Marker::new("Traced");

    type Journal = Arc<Mutex<Vec<String>>>;

    fn record(journal: &Journal, entry: impl Into<String>) {
        journal.lock().unwrap().push(entry.into());
    }

    fn entries(journal: &Journal) -> Vec<String> {
        journal.lock().unwrap().clone()
    }

    fn around(journal: &Journal, tag: &'static str) -> Decorator {
        let journal = Arc::clone(journal);
        Decorator::around_fn(move |_, next| {
            record(&journal, format!("{tag}:before"));
            let out = next.proceed()?;
            record(&journal, format!("{tag}:after"));
            Ok(out)
        })
    }

    fn before(journal: &Journal, tag: &'static str) -> Decorator {
        let journal = Arc::clone(journal);
        Decorator::before_fn(move |inv| {
            record(&journal, format!("{tag}:{}{}", inv.name(), inv.render_args()));
        })
    }

    #[test]
    fn composes_around_then_before_then_body() {
        let journal = Journal::default();
        let dispatcher = Dispatcher::new(
            Registry::new()
                .mark(OP, MARK)
                .on(Pointcut::Marked(MARK), before(&journal, "args"))
                .on(Pointcut::Operation(OP), around(&journal, "log")),
        );

        let j = Arc::clone(&journal);
        dispatcher
            .invoke(OP, vec![Arg::new("hi")], move |_| {
                record(&j, "body");
                Ok(())
            })
            .unwrap();

        assert_eq!(entries(&journal), ["log:before", "args:greet[hi]", "body", "log:after"]);
    }

    #[test]
    fn same_kind_decorators_follow_registration_order() {
        let journal = Journal::default();
        let dispatcher = Dispatcher::new(
            Registry::new()
                .on(Pointcut::Operation(OP), around(&journal, "outer"))
                .on(Pointcut::Operation(OP), before(&journal, "first"))
                .on(Pointcut::Operation(OP), around(&journal, "inner"))
                .on(Pointcut::Operation(OP), before(&journal, "second")),
        );

        let j = Arc::clone(&journal);
        dispatcher
            .invoke(OP, Vec::new(), move |_| {
                record(&j, "body");
                Ok(())
            })
            .unwrap();

        assert_eq!(
            entries(&journal),
            [
                "outer:before",
                "inner:before",
                "first:greet[]",
                "second:greet[]",
                "body",
                "inner:after",
                "outer:after",
            ]
        );
    }

    #[test]
    fn body_runs_exactly_once() {
        let journal = Journal::default();
        let dispatcher = Dispatcher::new(
            Registry::new()
                .mark(OP, MARK)
                .on(Pointcut::Marked(MARK), before(&journal, "args"))
                .on(Pointcut::Operation(OP), around(&journal, "log")),
        );

        let calls = Cell::new(0);
        dispatcher
            .invoke(OP, Vec::new(), |_| {
                calls.set(calls.get() + 1);
                Ok(())
            })
            .unwrap();

        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn returns_the_body_result() {
        let dispatcher = Dispatcher::new(Registry::new().on(
            Pointcut::Operation(OP),
            Decorator::around_fn(|_, next| next.proceed()),
        ));

        let n = dispatcher.invoke(OP, Vec::new(), |_| Ok(41_u64 + 1)).unwrap();
        assert_eq!(n, 42);
    }

    #[test]
    fn undecorated_operation_just_runs_the_body() {
        let dispatcher = Dispatcher::new(Registry::new());
        let s = dispatcher
            .invoke(OP, vec![Arg::new("x")], |inv| Ok(inv.render_args()))
            .unwrap();
        assert_eq!(s, "[x]");
    }

    #[test]
    fn failure_skips_after_logic_and_reaches_the_caller_unchanged() {
        let journal = Journal::default();
        let dispatcher = Dispatcher::new(
            Registry::new()
                .mark(OP, MARK)
                .on(Pointcut::Marked(MARK), before(&journal, "args"))
                .on(Pointcut::Operation(OP), around(&journal, "log")),
        );

        let err = dispatcher
            .invoke::<(), _>(OP, Vec::new(), |_| {
                Err(Error::operation(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed")))
            })
            .unwrap_err();

        assert_eq!(entries(&journal), ["log:before", "args:greet[]"]);
        assert_eq!(err.to_string(), "sink closed");
        let Error::Operation(inner) = err else { panic!("expected an operation failure") };
        let io_err = inner.downcast_ref::<io::Error>().unwrap();
        assert_eq!(io_err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn around_that_never_proceeds_is_reported() {
        let dispatcher = Dispatcher::new(Registry::new().on(
            Pointcut::Operation(OP),
            Decorator::around_fn(|_, _next| Ok(Box::new(()) as Output)),
        ));

        let calls = Cell::new(0);
        let err = dispatcher
            .invoke(OP, Vec::new(), |_| {
                calls.set(calls.get() + 1);
                Ok(())
            })
            .unwrap_err();

        assert_eq!(calls.get(), 0);
        assert!(matches!(err, Error::NotProceeded { operation, .. } if operation == OP));
    }

    #[test]
    fn around_replacing_the_result_type_is_reported() {
        let dispatcher = Dispatcher::new(Registry::new().on(
            Pointcut::Operation(OP),
            Decorator::around_fn(|_, next| {
                next.proceed()?;
                Ok(Box::new("not a number") as Output)
            }),
        ));

        let err = dispatcher.invoke(OP, Vec::new(), |_| Ok(1_i32)).unwrap_err();
        assert!(matches!(err, Error::UnexpectedOutput { expected: "i32", .. }));
    }

    #[test]
    fn repeated_invocations_are_independent() {
        let journal = Journal::default();
        let dispatcher = Dispatcher::new(
            Registry::new().on(Pointcut::Operation(OP), around(&journal, "log")),
        );

        for _ in 0..2 {
            let j = Arc::clone(&journal);
            dispatcher
                .invoke(OP, Vec::new(), move |_| {
                    record(&j, "body");
                    Ok(())
                })
                .unwrap();
        }

        let all = entries(&journal);
        assert_eq!(all.len(), 6);
        assert_eq!(all[..3], all[3..]);
    }
}
