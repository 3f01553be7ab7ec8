//! Fixture HTTP server for the two datasets
//!
//! Serves a venues document at `/venues` and a sessions document at
//! `/sessions`. Used by the `mock_sources` binary for local runs and by the
//! integration tests to exercise `HttpSource` over a real socket.

use bytes::Bytes;
use http_body_util::Full;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{header, Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{debug, error, info};

pub const VENUES_PATH: &str = "/venues";
pub const SESSIONS_PATH: &str = "/sessions";

/// Raw JSON bodies served by the fixture server
#[derive(Debug, Clone)]
pub struct Fixtures {
    pub venues: Bytes,
    pub sessions: Bytes,
}

impl Fixtures {
    pub fn new(venues: impl Into<Bytes>, sessions: impl Into<Bytes>) -> Self {
        Self { venues: venues.into(), sessions: sessions.into() }
    }
}

fn json_response(body: Bytes) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Full::new(body))
        .expect("static response should not fail")
}

fn not_found() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NOT_FOUND)
        .body(Full::new(Bytes::from("Not Found")))
        .expect("static response should not fail")
}

async fn handle_request(
    req: Request<hyper::body::Incoming>,
    fixtures: Arc<Fixtures>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    debug!(method = %req.method(), path = %req.uri().path(), "fixture_request");
    Ok(match (req.method(), req.uri().path()) {
        (&Method::GET, VENUES_PATH) => json_response(fixtures.venues.clone()),
        (&Method::GET, SESSIONS_PATH) => json_response(fixtures.sessions.clone()),
        _ => not_found(),
    })
}

/// Serve fixtures on an already bound listener until shutdown is signalled
pub async fn serve_fixtures(
    listener: TcpListener,
    fixtures: Fixtures,
    mut shutdown: watch::Receiver<bool>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let fixtures = Arc::new(fixtures);

    info!(addr = %listener.local_addr()?, "fixture_server_started");

    loop {
        tokio::select! {
            result = listener.accept() => {
                match result {
                    Ok((stream, _addr)) => {
                        let io = TokioIo::new(stream);
                        let fixtures = fixtures.clone();

                        tokio::spawn(async move {
                            let service = service_fn(move |req| {
                                let fixtures = fixtures.clone();
                                async move { handle_request(req, fixtures).await }
                            });

                            if let Err(e) = http1::Builder::new()
                                .serve_connection(io, service)
                                .await
                            {
                                error!(error = %e, "fixture_http_error");
                            }
                        });
                    }
                    Err(e) => {
                        error!(error = %e, "fixture_accept_error");
                    }
                }
            }
            changed = shutdown.changed() => {
                // A dropped sender also means shut down
                if changed.is_err() || *shutdown.borrow() {
                    info!("fixture_server_shutdown");
                    return Ok(());
                }
            }
        }
    }
}
