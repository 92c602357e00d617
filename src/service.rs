//! The demo service.

use tracing::info;

use crate::dispatch::Dispatcher;
use crate::error::Error;
use crate::invocation::{Arg, OperationId};

/// Processes messages. Every public method goes through the dispatcher, so
/// whatever is bound to it in the registry wraps the body below.
#[derive(Clone, Debug)]
pub struct MessageService {
    dispatcher: Dispatcher,
}

impl MessageService {
    pub const PROCESS_MESSAGE: OperationId = OperationId::new("MessageService", "processMessage");

    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// Logs `Processing message: <message>`.
    pub fn process_message(&self, message: &str) -> Result<(), Error> {
        self.dispatcher.invoke(
            Self::PROCESS_MESSAGE,
            vec![Arg::new(message.to_owned())],
            |_| {
                info!("Processing message: {message}");
                Ok(())
            },
        )
    }
}
