//! Composition root.
//!
//! Everything is wired here, once, in plain code: the registry with its two
//! bindings, the dispatcher over it, and the single [`MessageService`].

use std::sync::Arc;

use crate::aspect::{ARGUMENTS_LOG, ArgumentsAspect, LoggingAspect};
use crate::decorator::Decorator;
use crate::dispatch::Dispatcher;
use crate::registry::{Pointcut, Registry};
use crate::service::MessageService;

/// The application's object graph.
#[derive(Clone, Debug)]
pub struct ApplicationContext {
    message_service: Arc<MessageService>,
}

impl ApplicationContext {
    pub fn new() -> Self {
        Self::with_registry(Self::registry())
    }

    /// Builds the context over a caller-supplied registry.
    pub fn with_registry(registry: Registry) -> Self {
        let dispatcher = Dispatcher::new(registry);
        Self { message_service: Arc::new(MessageService::new(dispatcher)) }
    }

    /// The application's bindings:
    ///
    /// - `processMessage` carries [`ARGUMENTS_LOG`];
    /// - operations marked [`ARGUMENTS_LOG`] get [`ArgumentsAspect`];
    /// - `MessageService.processMessage` itself gets [`LoggingAspect`].
    pub fn registry() -> Registry {
        Registry::new()
            .mark(MessageService::PROCESS_MESSAGE, ARGUMENTS_LOG)
            .on(Pointcut::Marked(ARGUMENTS_LOG), Decorator::before(ArgumentsAspect))
            .on(Pointcut::Operation(MessageService::PROCESS_MESSAGE), Decorator::around(LoggingAspect))
    }

    /// The singleton [`MessageService`]. Every call returns the same instance.
    pub fn message_service(&self) -> Arc<MessageService> {
        Arc::clone(&self.message_service)
    }
}

impl Default for ApplicationContext {
    fn default() -> Self { Self::new() }
}
