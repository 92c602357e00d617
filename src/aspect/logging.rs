use tracing::info;

use crate::decorator::{Around, Next, Outcome};
use crate::invocation::Invocation;

/// Brackets a call with `Before processing message` and
/// `After processing message`.
///
/// A failing call propagates straight out of `proceed()`, so the trailing
/// line is only logged on success.
#[derive(Clone, Copy, Debug, Default)]
pub struct LoggingAspect;

impl Around for LoggingAspect {
    fn name(&self) -> &'static str {
        "LoggingAspect"
    }

    fn around(&self, _invocation: &Invocation, next: Next<'_>) -> Outcome {
        info!("Before processing message");
        let output = next.proceed()?;
        info!("After processing message");
        Ok(output)
    }
}
