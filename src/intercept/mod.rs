//! Chains of call interceptors.
//!
//! An interceptor receives the call [`Context`], the request, the [`CallInfo`]
//! of the call and the next [`Step`]. It returns whatever it wants, usually
//! what `next` returned. Chains only decide the order interceptors run in.

mod context;
mod interceptor;
mod interceptor_chain;
mod layer;
mod service;
mod step;

pub use context::{CallInfo, Context};
pub use interceptor::{
    interceptor_fn, shared, ChainedInterceptor, Interceptor, InterceptorFn, SharedInterceptor,
};
pub use interceptor_chain::InterceptorChain;
pub use layer::InterceptorLayer;
pub use service::{Call, InterceptorService};
pub use step::{BoxFuture, Step};
