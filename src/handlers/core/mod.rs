//! Core handler infrastructure.
//!
//! Event names, the handler trait, the dispatcher with its periodic tasks,
//! and the outbound write path with its interceptor chain.

pub mod event;
pub mod middleware;
pub mod periodic;
pub mod registry;
pub mod traits;

pub use event::{EventName, HandlerEvent};
pub use middleware::{Interceptor, Outbound, Outgoing, WriterCommand};
pub use periodic::PeriodicTask;
pub use registry::{Dispatcher, PERIODIC_EVENT};
pub use traits::{Flow, FnHandler, Handler, HandlerResult};
