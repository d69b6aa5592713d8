//! Run with
//!
//! ```not_rust
//! cargo run --example http_chain --features="axum"
//! ```
//!

use std::time::Instant;

use axum::{
    body::Body,
    http::{header, HeaderValue, Request, Response, StatusCode},
    Router,
};
use composable_tower_chain::chain::{layer_fn, shared, Chain, Handler, SharedWrapper};

#[path = "../util/util.rs"]
mod util;

type AppHandler = Handler<Body, Body>;

fn timing() -> SharedWrapper<AppHandler> {
    shared(layer_fn(|next: AppHandler| {
        Handler::from_fn(move |request: Request<Body>| {
            let next = next.clone();

            async move {
                let started = Instant::now();
                let path = request.uri().path().to_owned();

                let response = next.handle(request).await;

                tracing::info!(%path, status = %response.status(), elapsed = ?started.elapsed(), "Handled");

                response
            }
        })
    }))
}

fn powered_by(value: &'static str) -> SharedWrapper<AppHandler> {
    shared(layer_fn(move |next: AppHandler| {
        Handler::from_fn(move |request: Request<Body>| {
            let next = next.clone();

            async move {
                let mut response = next.handle(request).await;

                response
                    .headers_mut()
                    .insert("x-powered-by", HeaderValue::from_static(value));

                response
            }
        })
    }))
}

fn require_api_key(expected: String) -> SharedWrapper<AppHandler> {
    shared(layer_fn(move |next: AppHandler| {
        let expected = expected.clone();

        Handler::from_fn(move |request: Request<Body>| {
            let next = next.clone();
            let expected = expected.clone();

            async move {
                let api_key = request
                    .headers()
                    .get("x-api-key")
                    .and_then(|value| value.to_str().ok());

                if api_key != Some(expected.as_str()) {
                    tracing::warn!("Rejected request without valid api key");

                    let mut response = Response::new(Body::from("Unauthorized"));
                    *response.status_mut() = StatusCode::UNAUTHORIZED;

                    return response;
                }

                next.handle(request).await
            }
        })
    }))
}

async fn hello(_request: Request<Body>) -> Response<Body> {
    let mut response = Response::new(Body::from("Hello"));

    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );

    response
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    util::init("http_chain")?;

    let api_key = util::env_or("API_KEY", "api-key-1");

    let base = Chain::new([timing(), powered_by("composable-tower-chain")]);
    let protected = base.append([require_api_key(api_key)]);

    tracing::info!(?base, ?protected, "Chains ready");

    let app = Router::new()
        // curl -i localhost:5000
        .route_service("/", base.build_fn(Some(hello)))
        // curl -i -H "x-api-key: api-key-1" localhost:5000/protected
        .route_service("/protected", protected.build_fn(Some(hello)))
        // curl -i localhost:5000/noop
        .route_service("/noop", base.build(None));

    util::serve(app).await
}
