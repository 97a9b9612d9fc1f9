use gemini_proxy::config::{self, UpstreamConfig};
use gemini_proxy::handler::ProxyHandler;
use once_cell::sync::Lazy;
use vercel_runtime::{run, Body, Error, Request, Response, StatusCode};

// Built once per process so warm invocations reuse the key and connection pool.
static HANDLER: Lazy<ProxyHandler> =
    Lazy::new(|| ProxyHandler::new(UpstreamConfig::from_env(), config::api_key_from_env()));

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt::init();
    run(handler).await
}

pub async fn handler(req: Request) -> Result<Response<Body>, Error> {
    let response = HANDLER.handle(req.method().as_str(), req.body().as_ref()).await;
    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    Ok(Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(Body::Text(response.body.to_string()))?)
}
