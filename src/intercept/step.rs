use std::{fmt, future::Future, pin::Pin, sync::Arc};

use super::context::Context;

pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

type StepFn<Req, Res, E> = dyn Fn(Context, Req) -> BoxFuture<Result<Res, E>> + Send + Sync;

/// The next unit of work an interceptor hands the call to.
///
/// Cloning a step is cheap and every clone runs the same work.
pub struct Step<Req, Res, E> {
    step: Arc<StepFn<Req, Res, E>>,
}

impl<Req, Res, E> Step<Req, Res, E>
where
    Req: 'static,
    Res: 'static,
    E: 'static,
{
    pub fn new<F, Fut>(step: F) -> Self
    where
        F: Fn(Context, Req) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Res, E>> + Send + 'static,
    {
        let step: Arc<StepFn<Req, Res, E>> =
            Arc::new(move |context: Context, request: Req| -> BoxFuture<Result<Res, E>> {
                Box::pin(step(context, request))
            });

        Self { step }
    }
}

impl<Req, Res, E> Step<Req, Res, E> {
    pub fn run(&self, context: Context, request: Req) -> BoxFuture<Result<Res, E>> {
        (self.step)(context, request)
    }
}

impl<Req, Res, E> Clone for Step<Req, Res, E> {
    fn clone(&self) -> Self {
        Self {
            step: self.step.clone(),
        }
    }
}

impl<Req, Res, E> fmt::Debug for Step<Req, Res, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step").finish_non_exhaustive()
    }
}
