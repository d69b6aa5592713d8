use std::{
    convert::Infallible,
    fmt,
    future::Future,
    task::{Context, Poll},
};

use http::{Request, Response};
use tower::{util::BoxCloneService, Service, ServiceExt};

type BoxedHandler<ReqBody, ResBody> =
    BoxCloneService<Request<ReqBody>, Response<ResBody>, Infallible>;

/// A type-erased, clonable http handler.
///
/// This is the unit of work a [`Chain`](super::Chain) of http wrappers is
/// built around. Failures are responses, so handlers never error.
///
/// The [`Default`] handler does nothing and answers `200 OK` with an empty body.
pub struct Handler<ReqBody, ResBody> {
    service: BoxedHandler<ReqBody, ResBody>,
}

impl<ReqBody, ResBody> Handler<ReqBody, ResBody> {
    pub fn new<S>(service: S) -> Self
    where
        S: Service<Request<ReqBody>, Response = Response<ResBody>, Error = Infallible>
            + Clone
            + Send
            + 'static,
        S::Future: Send + 'static,
    {
        Self {
            service: BoxCloneService::new(service),
        }
    }

    pub fn from_fn<F, Fut>(handler: F) -> Self
    where
        F: Fn(Request<ReqBody>) -> Fut + Clone + Send + 'static,
        Fut: Future<Output = Response<ResBody>> + Send + 'static,
        ReqBody: 'static,
        ResBody: 'static,
    {
        Self::new(tower::service_fn(move |request| {
            let response = handler(request);

            async move { Ok::<_, Infallible>(response.await) }
        }))
    }

    /// Runs the handler on its own copy, so `&self` is enough.
    pub fn handle(
        &self,
        request: Request<ReqBody>,
    ) -> impl Future<Output = Response<ResBody>> + Send + 'static
    where
        ReqBody: Send + 'static,
        ResBody: Send + 'static,
    {
        let service = self.service.clone();

        async move {
            match service.oneshot(request).await {
                Ok(response) => response,
                Err(never) => match never {},
            }
        }
    }
}

impl<ReqBody, ResBody> Default for Handler<ReqBody, ResBody>
where
    ReqBody: Send + 'static,
    ResBody: Default + Send + 'static,
{
    fn default() -> Self {
        Self::from_fn(|_request: Request<ReqBody>| {
            std::future::ready(Response::new(ResBody::default()))
        })
    }
}

impl<ReqBody, ResBody> Clone for Handler<ReqBody, ResBody> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
        }
    }
}

impl<ReqBody, ResBody> fmt::Debug for Handler<ReqBody, ResBody> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler").finish_non_exhaustive()
    }
}

impl<ReqBody, ResBody> Service<Request<ReqBody>> for Handler<ReqBody, ResBody> {
    type Response = Response<ResBody>;
    type Error = Infallible;
    type Future = <BoxedHandler<ReqBody, ResBody> as Service<Request<ReqBody>>>::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&mut self, request: Request<ReqBody>) -> Self::Future {
        self.service.call(request)
    }
}

#[cfg(test)]
mod tests {
    use http::StatusCode;

    use super::*;

    #[tokio::test]
    async fn default_handler_answers_ok_with_empty_body() {
        let response = Handler::<(), String>::default()
            .handle(Request::new(()))
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.body().is_empty());
    }

    #[tokio::test]
    async fn handler_is_a_tower_service() {
        let handler = Handler::from_fn(|request: Request<String>| async move {
            Response::new(format!("echo {}", request.body()))
        });

        let response = handler
            .oneshot(Request::new(String::from("ping")))
            .await
            .expect("Handler is infallible");

        assert_eq!(response.body(), "echo ping");
    }
}
