//! Event handling.
//!
//! Parsed messages come in through [`process_message`], which feeds numeric
//! replies to the handshake and fans every message out to the handlers
//! bound in the [`Dispatcher`].

mod core;
mod routing;

pub use self::core::{
    Dispatcher, EventName, Flow, FnHandler, Handler, HandlerEvent, HandlerResult, Interceptor,
    Outbound, Outgoing, PERIODIC_EVENT, PeriodicTask, WriterCommand,
};
pub use routing::{FirstDelivery, derived_event, process_message};
