// Connection handling module
// Serves one accepted TCP connection with hyper's HTTP/1 server

use http_body_util::{BodyExt, Full};
use hyper::body::{Body, Bytes, Incoming};
use hyper::header::{HeaderName, REFERER, USER_AGENT};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use super::{App, ServerOptions};
use crate::http;
use crate::logger::{self, AccessLogEntry};

/// Serve the connection in its own task
///
/// Requests on one connection are handled in order; connections run
/// concurrently on the runtime's worker threads.
pub fn handle_connection(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    app: Arc<App>,
    options: Arc<ServerOptions>,
) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let mut builder = http1::Builder::new();
        builder.keep_alive(options.keep_alive);

        let timeout = options.request_timeout;
        let conn = builder.serve_connection(
            io,
            service_fn(move |req| {
                let app = Arc::clone(&app);
                let options = Arc::clone(&options);
                async move {
                    Ok::<_, Infallible>(handle_request(req, peer_addr, &app, &options).await)
                }
            }),
        );

        if timeout.is_zero() {
            if let Err(err) = conn.await {
                logger::log_connection_error(&err);
            }
            return;
        }

        match tokio::time::timeout(timeout, conn).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => logger::log_connection_error(&err),
            Err(_) => logger::log_warning(&format!(
                "Connection from {peer_addr} timed out after {} seconds",
                timeout.as_secs()
            )),
        }
    });
}

/// Buffer the body, dispatch, and write the access log line
async fn handle_request(
    req: Request<Incoming>,
    peer_addr: SocketAddr,
    app: &App,
    options: &ServerOptions,
) -> Response<Full<Bytes>> {
    let started = Instant::now();
    let (parts, body) = req.into_parts();
    let req = match body.collect().await {
        Ok(collected) => Request::from_parts(parts, collected.to_bytes()),
        Err(e) => {
            logger::log_warning(&format!("Failed to read request body from {peer_addr}: {e}"));
            return http::build_bad_request_response();
        }
    };

    let resp = app.dispatch(&req).await;

    if let Some(format) = &options.access_log_format {
        let entry = access_entry(&req, &resp, peer_addr, started);
        logger::log_access(&entry, format);
    }
    resp
}

fn access_entry(
    req: &Request<Bytes>,
    resp: &Response<Full<Bytes>>,
    peer_addr: SocketAddr,
    started: Instant,
) -> AccessLogEntry {
    let header = |name: HeaderName| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = match req.version() {
        hyper::Version::HTTP_10 => "1.0".to_string(),
        hyper::Version::HTTP_2 => "2".to_string(),
        _ => "1.1".to_string(),
    };
    entry.status = resp.status().as_u16();
    entry.body_bytes = resp.body().size_hint().exact().unwrap_or(0);
    entry.referer = header(REFERER);
    entry.user_agent = header(USER_AGENT);
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    entry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_entry_from_request_and_response() {
        let req = Request::builder()
            .uri("/api?name=users")
            .header(USER_AGENT, "curl/8.0")
            .body(Bytes::new())
            .unwrap();
        let resp = Response::new(Full::new(Bytes::from_static(b"[1,2,3]")));
        let entry = access_entry(&req, &resp, "10.0.0.1:5000".parse().unwrap(), Instant::now());

        assert_eq!(entry.remote_addr, "10.0.0.1");
        assert_eq!(entry.path, "/api");
        assert_eq!(entry.query.as_deref(), Some("name=users"));
        assert_eq!(entry.body_bytes, 7);
        assert_eq!(entry.user_agent.as_deref(), Some("curl/8.0"));
        assert_eq!(entry.referer, None);
    }
}
