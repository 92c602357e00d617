//! Demo entry point: one call to `MessageService::process_message`.
//!
//! Run with:
//!   cargo run
//!
//! Expected output on stderr:
//!   INFO weft::aspect::logging: Before processing message
//!   INFO weft::aspect::arguments: Method processMessage with parameters [Hello World!] will execute
//!   INFO weft::service: Processing message: Hello World!
//!   INFO weft::aspect::logging: After processing message

use std::io::IsTerminal;
use std::process::ExitCode;

use tracing::error;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use weft::ApplicationContext;

fn main() -> ExitCode {
    init_tracing();

    let context = ApplicationContext::new();
    let message_service = context.message_service();

    match message_service.process_message("Hello World!") {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("processMessage failed: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Logs to stderr, filtered by `RUST_LOG` (default `info`).
fn init_tracing() {
    let stderr = std::io::stderr();
    let ansi = stderr.is_terminal();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(ansi),
        )
        .init();
}
