//! Operation identity and the per-call operation descriptor.

use std::fmt;
use std::sync::Arc;

/// Structural identity of an operation: the owning type plus the method name.
///
/// Identities are plain `&'static str` pairs so they can live in `const`s
/// next to the operation they name:
///
/// ```rust
/// use weft::OperationId;
///
/// const PROCESS_MESSAGE: OperationId = OperationId::new("MessageService", "processMessage");
/// assert_eq!(PROCESS_MESSAGE.to_string(), "MessageService.processMessage");
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct OperationId {
    owner: &'static str,
    name: &'static str,
}

impl OperationId {
    pub const fn new(owner: &'static str, name: &'static str) -> Self {
        Self { owner, name }
    }

    pub fn owner(&self) -> &'static str { self.owner }
    pub fn name(&self) -> &'static str { self.name }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.owner, self.name)
    }
}

/// An opaque argument value.
///
/// Decorators never look inside an argument; they can only render it. Cloning
/// shares the underlying value.
#[derive(Clone)]
pub struct Arg(Arc<dyn fmt::Display + Send + Sync + 'static>);

impl Arg {
    pub fn new(value: impl fmt::Display + Send + Sync + 'static) -> Self {
        Self(Arc::new(value))
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Debug for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Arg({})", self.0)
    }
}

/// Describes one call of an operation: which operation, with which arguments.
///
/// Built by the dispatcher when the call starts and dropped when it returns.
/// Decorators only ever see it by shared reference.
#[derive(Debug)]
pub struct Invocation {
    id: OperationId,
    args: Vec<Arg>,
}

impl Invocation {
    pub(crate) fn new(id: OperationId, args: Vec<Arg>) -> Self {
        Self { id, args }
    }

    pub fn id(&self) -> OperationId { self.id }
    pub fn name(&self) -> &'static str { self.id.name }
    pub fn args(&self) -> &[Arg] { &self.args }

    /// Renders the arguments as `[a, b, c]`.
    pub fn render_args(&self) -> String {
        let mut out = String::from("[");
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push_str(&arg.to_string());
        }
        out.push(']');
        out
    }
}
