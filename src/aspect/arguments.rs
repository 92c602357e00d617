use tracing::info;

use crate::decorator::Before;
use crate::invocation::Invocation;
use crate::registry::Marker;

/// Marks an operation whose name and arguments should be logged before it runs.
pub const ARGUMENTS_LOG: Marker = Marker::new("ArgumentsLog");

/// Logs `Method <name> with parameters [<args>] will execute`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ArgumentsAspect;

impl Before for ArgumentsAspect {
    fn name(&self) -> &'static str {
        "ArgumentsAspect"
    }

    fn before(&self, invocation: &Invocation) {
        info!(
            "Method {} with parameters {} will execute",
            invocation.name(),
            invocation.render_args()
        );
    }
}
