//! # weft
//!
//! Minimal call interception for Rust. Attach logging (or any other
//! cross-cutting behavior) to an operation without touching its body.
//! Nothing more. Nothing less.
//!
//! ## The contract
//!
//! An operation is a plain closure run through a [`Dispatcher`] under an
//! [`OperationId`]. Decorators are bound to operations in a [`Registry`]:
//!
//! - **Before** decorators observe the call and its arguments. No veto.
//! - **Around** decorators wrap the call and receive a single-use
//!   continuation, [`Next`], which they proceed exactly once.
//!
//! Bindings select operations by identity ([`Pointcut::Operation`]), by owner
//! type ([`Pointcut::Owner`]) or by an opt-in [`Marker`]
//! ([`Pointcut::Marked`]). The registry is built once and never changes
//! afterwards. No reflection, no proxies generated at runtime, no container.
//!
//! ## Quick start
//!
//! ```rust
//! use weft::{Arg, Decorator, Dispatcher, Error, OperationId, Pointcut, Registry};
//!
//! const SEND: OperationId = OperationId::new("Mailer", "send");
//!
//! let dispatcher = Dispatcher::new(
//!     Registry::new()
//!         .on(Pointcut::Operation(SEND), Decorator::around_fn(|inv, next| {
//!             tracing::info!("entering {}", inv.id());
//!             let out = next.proceed()?;
//!             tracing::info!("leaving {}", inv.id());
//!             Ok(out)
//!         })),
//! );
//!
//! let sent = dispatcher.invoke(SEND, vec![Arg::new("bob")], |inv| {
//!     Ok::<_, Error>(format!("sent to {}", inv.render_args()))
//! })?;
//! assert_eq!(sent, "sent to [bob]");
//! # Ok::<(), Error>(())
//! ```

mod context;
mod decorator;
mod dispatch;
mod error;
mod invocation;
mod registry;
mod service;

pub mod aspect;

pub use context::ApplicationContext;
pub use decorator::{Around, Before, Decorator, Next, Outcome, Output};
pub use dispatch::Dispatcher;
pub use error::Error;
pub use invocation::{Arg, Invocation, OperationId};
pub use registry::{Binding, Marker, Pointcut, Registry};
pub use service::MessageService;
