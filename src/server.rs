use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;
use warp::hyper::body::Bytes;
use warp::http::{Method, StatusCode};
use warp::Filter;

use crate::config::ServerConfig;
use crate::handler::ProxyHandler;

/// Local development server exposing the handler at `/api/solve`, the same
/// route the serverless deployment uses.
pub struct Server {
    config: ServerConfig,
    handler: Arc<ProxyHandler>,
}

impl Server {
    pub fn new(config: ServerConfig, handler: ProxyHandler) -> Self {
        Self {
            config,
            handler: Arc::new(handler),
        }
    }

    pub async fn run(self) -> crate::Result<()> {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .map_err(|e| crate::ProxyError::Internal(format!("Invalid listen address: {}", e)))?;

        info!("Gemini proxy listening on http://{}/api/solve", addr);
        warp::serve(routes(self.handler)).run(addr).await;

        Ok(())
    }
}

/// Every method is routed through so the handler can answer 405 itself.
pub fn routes(
    handler: Arc<ProxyHandler>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    warp::path!("api" / "solve")
        .and(warp::method())
        .and(warp::body::bytes())
        .and(with_handler(handler))
        .and_then(handle_solve)
}

fn with_handler(
    handler: Arc<ProxyHandler>,
) -> impl Filter<Extract = (Arc<ProxyHandler>,), Error = Infallible> + Clone {
    warp::any().map(move || handler.clone())
}

async fn handle_solve(
    method: Method,
    body: Bytes,
    handler: Arc<ProxyHandler>,
) -> Result<impl warp::Reply, Infallible> {
    let response = handler.handle(method.as_str(), &body).await;
    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    Ok(warp::reply::with_status(
        warp::reply::json(&response.body),
        status,
    ))
}
