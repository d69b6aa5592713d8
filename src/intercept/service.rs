use std::{
    fmt,
    sync::{Arc, Mutex, PoisonError},
    task::{self, Poll},
};

use tower::{Service, ServiceExt};

use super::{
    context::{CallInfo, Context},
    interceptor::{ChainedInterceptor, Interceptor},
    step::{BoxFuture, Step},
};

/// A call on its way through an [`InterceptorService`].
#[derive(Debug)]
pub struct Call<Req> {
    pub context: Context,
    pub info: Arc<CallInfo>,
    pub request: Req,
}

impl<Req> Call<Req> {
    pub fn new(info: impl Into<Arc<CallInfo>>, request: Req) -> Self {
        Self {
            context: Context::new(),
            info: info.into(),
            request,
        }
    }

    pub fn with_context(mut self, context: Context) -> Self {
        self.context = context;

        self
    }
}

/// Runs every [`Call`] through a [`ChainedInterceptor`] before the inner service.
///
/// The inner service is the final step. It is called with the context and
/// request the innermost interceptor passed on.
pub struct InterceptorService<S, Req, Res, E> {
    service: S,
    interceptor: ChainedInterceptor<Req, Res, E>,
}

impl<S, Req, Res, E> InterceptorService<S, Req, Res, E> {
    pub fn new(service: S, interceptor: ChainedInterceptor<Req, Res, E>) -> Self {
        Self {
            service,
            interceptor,
        }
    }
}

impl<S, Req, Res, E> Service<Call<Req>> for InterceptorService<S, Req, Res, E>
where
    S: Service<(Context, Req), Response = Res, Error = E> + Clone + Send + 'static,
    S::Future: Send + 'static,
    Req: Send + 'static,
    Res: 'static,
    E: 'static,
{
    type Response = Res;
    type Error = E;
    type Future = BoxFuture<Result<Res, E>>;

    fn poll_ready(&mut self, cx: &mut task::Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&mut self, call: Call<Req>) -> Self::Future {
        // `Step` must be `Sync`, `S` only has to be `Send`.
        let service = Mutex::new(self.service.clone());

        let terminal = Step::new(move |context: Context, request: Req| {
            let service = service
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone();

            service.oneshot((context, request))
        });

        self.interceptor
            .intercept(call.context, call.request, call.info, terminal)
    }
}

impl<S, Req, Res, E> Clone for InterceptorService<S, Req, Res, E>
where
    S: Clone,
{
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            interceptor: self.interceptor.clone(),
        }
    }
}

impl<S, Req, Res, E> fmt::Debug for InterceptorService<S, Req, Res, E>
where
    S: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterceptorService")
            .field("service", &self.service)
            .field("interceptor", &self.interceptor)
            .finish()
    }
}
