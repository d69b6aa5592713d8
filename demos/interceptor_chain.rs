//! Run with
//!
//! ```not_rust
//! cargo run --example interceptor_chain --features="axum"
//! ```
//!

use std::{sync::Arc, time::Duration, time::Instant};

use axum::{extract::State, http::HeaderMap, routing::post, Router};
use composable_tower_chain::{
    error::Status,
    intercept::{interceptor_fn, Call, CallInfo, Context, InterceptorChain, Step},
};
use tower::{service_fn, ServiceBuilder, ServiceExt};

#[path = "../util/util.rs"]
mod util;

type GreeterStep = Step<String, String, Status>;

async fn greet((context, name): (Context, String)) -> Result<String, Status> {
    if context.is_expired() {
        return Err(Status::deadline_exceeded("Greeting took too long"));
    }

    Ok(format!("Hello, {name}!"))
}

async fn say_hello(
    State(chain): State<InterceptorChain<String, String>>,
    headers: HeaderMap,
    name: String,
) -> Result<String, Status> {
    let call = Call::new(CallInfo::new("/greeter.Greeter/SayHello"), name).with_context(
        Context::new()
            .with_timeout(Duration::from_secs(1))
            .with_metadata(headers),
    );

    ServiceBuilder::new()
        .layer(chain.layer())
        .service(service_fn(greet))
        .oneshot(call)
        .await
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    util::init("interceptor_chain")?;

    let token = util::env_or("TOKEN", "secret");
    let expected = format!("Bearer {token}");

    let log = interceptor_fn(
        |context: Context, request: String, info: Arc<CallInfo>, next: GreeterStep| async move {
            let started = Instant::now();

            let result = next.run(context, request).await;

            tracing::info!(method = %info.full_method(), ok = result.is_ok(), elapsed = ?started.elapsed(), "Call finished");

            result
        },
    );

    let authenticate = interceptor_fn(
        move |context: Context, request: String, _info: Arc<CallInfo>, next: GreeterStep| {
            let authorized = context
                .metadata()
                .get("authorization")
                .is_some_and(|value| value.as_bytes() == expected.as_bytes());

            async move {
                if !authorized {
                    return Err(Status::unauthenticated("Missing or invalid token"));
                }

                next.run(context, request).await
            }
        },
    );

    let chain = InterceptorChain::default().with(log).with(authenticate);

    let app = Router::new()
        // curl -i -H "authorization: Bearer secret" -d "world" localhost:5000/greeter.Greeter/SayHello
        .route("/greeter.Greeter/SayHello", post(say_hello))
        .with_state(chain);

    util::serve(app).await
}
