//! Chains of http wrappers around a terminal [`Handler`].
//!
//! Wrappers are plain tower [`Layer`](tower_layer::Layer)s whose service is the
//! same handler type they wrap. Closures become wrappers with [`layer_fn`].

mod handler;
mod wrapper_chain;

pub use handler::Handler;
pub use wrapper_chain::{shared, Chain, SharedWrapper};

pub use tower_layer::layer_fn;
