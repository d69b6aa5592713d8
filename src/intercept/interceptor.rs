use std::{fmt, future::Future, sync::Arc};

use tracing::Instrument;

use super::{
    context::{CallInfo, Context},
    step::{BoxFuture, Step},
};

/// Intercepts a call before it reaches `next`.
///
/// An interceptor decides whether and how `next` runs and what is returned.
/// Use [`interceptor_fn`] to turn an async closure into an interceptor.
pub trait Interceptor<Req, Res, E> {
    fn intercept(
        &self,
        context: Context,
        request: Req,
        info: Arc<CallInfo>,
        next: Step<Req, Res, E>,
    ) -> BoxFuture<Result<Res, E>>;
}

pub type SharedInterceptor<Req, Res, E> = Arc<dyn Interceptor<Req, Res, E> + Send + Sync>;

pub fn shared<Req, Res, E, I>(interceptor: I) -> SharedInterceptor<Req, Res, E>
where
    I: Interceptor<Req, Res, E> + Send + Sync + 'static,
{
    Arc::new(interceptor)
}

#[derive(Clone, Copy)]
pub struct InterceptorFn<F> {
    f: F,
}

pub fn interceptor_fn<F, Fut, Req, Res, E>(f: F) -> InterceptorFn<F>
where
    F: Fn(Context, Req, Arc<CallInfo>, Step<Req, Res, E>) -> Fut,
    Fut: Future<Output = Result<Res, E>> + Send + 'static,
{
    InterceptorFn { f }
}

impl<F, Fut, Req, Res, E> Interceptor<Req, Res, E> for InterceptorFn<F>
where
    F: Fn(Context, Req, Arc<CallInfo>, Step<Req, Res, E>) -> Fut,
    Fut: Future<Output = Result<Res, E>> + Send + 'static,
{
    fn intercept(
        &self,
        context: Context,
        request: Req,
        info: Arc<CallInfo>,
        next: Step<Req, Res, E>,
    ) -> BoxFuture<Result<Res, E>> {
        Box::pin((self.f)(context, request, info, next))
    }
}

impl<F> fmt::Debug for InterceptorFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterceptorFn")
            .field("f", &std::any::type_name::<F>())
            .finish()
    }
}

/// All interceptors of a chain folded into one.
///
/// Holds the interceptors the chain had when this was created.
pub struct ChainedInterceptor<Req, Res, E> {
    interceptors: Arc<[SharedInterceptor<Req, Res, E>]>,
}

impl<Req, Res, E> ChainedInterceptor<Req, Res, E> {
    pub(crate) fn new(interceptors: Arc<[SharedInterceptor<Req, Res, E>]>) -> Self {
        Self { interceptors }
    }
}

impl<Req, Res, E> Interceptor<Req, Res, E> for ChainedInterceptor<Req, Res, E>
where
    Req: 'static,
    Res: 'static,
    E: 'static,
{
    fn intercept(
        &self,
        context: Context,
        request: Req,
        info: Arc<CallInfo>,
        next: Step<Req, Res, E>,
    ) -> BoxFuture<Result<Res, E>> {
        let span = tracing::info_span!(
            "intercept",
            method = %info.full_method(),
            interceptors = self.interceptors.len()
        );

        let call = span.in_scope(|| {
            tracing::trace!("Chaining interceptors");

            let next = self
                .interceptors
                .iter()
                .rev()
                .fold(next, |next, interceptor| {
                    let interceptor = interceptor.clone();
                    let info = info.clone();

                    Step::new(move |context, request| {
                        interceptor.intercept(context, request, info.clone(), next.clone())
                    })
                });

            next.run(context, request)
        });

        Box::pin(call.instrument(span))
    }
}

impl<Req, Res, E> Clone for ChainedInterceptor<Req, Res, E> {
    fn clone(&self) -> Self {
        Self {
            interceptors: self.interceptors.clone(),
        }
    }
}

impl<Req, Res, E> fmt::Debug for ChainedInterceptor<Req, Res, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainedInterceptor")
            .field("interceptors", &self.interceptors.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::error::Status;

    use super::*;

    type TestStep = Step<String, String, Status>;

    fn current_span() -> &'static str {
        tracing::Span::current()
            .metadata()
            .map_or("none", |metadata| metadata.name())
    }

    #[tokio::test]
    async fn interceptors_run_inside_call_span() {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_test_writer()
            .finish();

        let _guard = tracing::subscriber::set_default(subscriber);

        let outer = interceptor_fn(
            |context: Context, request: String, _info: Arc<CallInfo>, next: TestStep| async move {
                let response = next.run(context, request).await;

                response.map(|response| format!("{}:{response}", current_span()))
            },
        );

        let chained = ChainedInterceptor::new(Arc::from(vec![shared(outer)]));

        let terminal = Step::new(|_context: Context, _request: String| async {
            Ok::<_, Status>(current_span().to_owned())
        });

        let response = chained
            .intercept(
                Context::new(),
                String::from("request"),
                Arc::new(CallInfo::new("/test.Service/Call")),
                terminal,
            )
            .await;

        assert_eq!(response, Ok(String::from("intercept:intercept")));
        assert_eq!(current_span(), "none");
    }
}
