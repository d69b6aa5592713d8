use std::fmt;

use tower_layer::Layer;

use super::{interceptor::ChainedInterceptor, service::InterceptorService};

/// Puts a [`ChainedInterceptor`] in front of a service.
///
/// Created by [`InterceptorChain::layer`](super::InterceptorChain::layer).
pub struct InterceptorLayer<Req, Res, E> {
    interceptor: ChainedInterceptor<Req, Res, E>,
}

impl<Req, Res, E> InterceptorLayer<Req, Res, E> {
    pub fn new(interceptor: ChainedInterceptor<Req, Res, E>) -> Self {
        Self { interceptor }
    }
}

impl<S, Req, Res, E> Layer<S> for InterceptorLayer<Req, Res, E> {
    type Service = InterceptorService<S, Req, Res, E>;

    fn layer(&self, service: S) -> Self::Service {
        InterceptorService::new(service, self.interceptor.clone())
    }
}

impl<Req, Res, E> Clone for InterceptorLayer<Req, Res, E> {
    fn clone(&self) -> Self {
        Self {
            interceptor: self.interceptor.clone(),
        }
    }
}

impl<Req, Res, E> fmt::Debug for InterceptorLayer<Req, Res, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterceptorLayer")
            .field("interceptor", &self.interceptor)
            .finish()
    }
}
