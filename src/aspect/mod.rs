//! Built-in aspects.
//!
//! Aspects carry cross-cutting behavior (here: logging) that would otherwise
//! be copied into every operation body. Each one logs under its own module
//! path, which becomes the logger name in the output.
//!
//! - [`ArgumentsAspect`]: before-decorator, opt-in through the
//!   [`ARGUMENTS_LOG`] marker. Logs the method name and its arguments.
//! - [`LoggingAspect`]: around-decorator, bound by identity. Logs a line
//!   before and after the call.

mod arguments;
mod logging;

pub use arguments::{ARGUMENTS_LOG, ArgumentsAspect};
pub use logging::LoggingAspect;
