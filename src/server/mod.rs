// Server module entry point
// Listener setup, the accept loop and the per-connection service

pub mod connection;
pub mod listener;
pub mod signal;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Request, Response};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use crate::config::Config;
use crate::error::ServerError;
use crate::logger;
use crate::mux::ApiMux;
use crate::router::SegmentRouter;

pub use listener::{create_reusable_listener, parse_addr};
pub use signal::shutdown_signal;

/// The dispatcher a server hands requests to
pub enum App {
    Mux(Arc<ApiMux>),
    Router(Arc<SegmentRouter>),
}

impl App {
    pub async fn dispatch(&self, req: &Request<Bytes>) -> Response<Full<Bytes>> {
        match self {
            Self::Mux(mux) => mux.dispatch(req).await,
            Self::Router(router) => router.dispatch(req).await,
        }
    }

    pub const fn mode(&self) -> &'static str {
        match self {
            Self::Mux(_) => "mux",
            Self::Router(_) => "router",
        }
    }
}

/// Per-connection behaviour
#[derive(Debug, Clone)]
pub struct ServerOptions {
    pub keep_alive: bool,
    /// Upper bound for serving one connection; zero disables it
    pub request_timeout: Duration,
    /// Access log format, `None` disables access logging
    pub access_log_format: Option<String>,
}

impl ServerOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            keep_alive: config.performance.keep_alive,
            request_timeout: Duration::from_secs(config.performance.request_timeout),
            access_log_format: config
                .logging
                .access_log
                .then(|| config.logging.access_log_format.clone()),
        }
    }
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            keep_alive: true,
            request_timeout: Duration::from_secs(30),
            access_log_format: Some("combined".to_string()),
        }
    }
}

/// Accept connections until `shutdown` resolves
pub async fn serve<S>(
    listener: TcpListener,
    app: App,
    options: ServerOptions,
    shutdown: S,
) -> Result<(), ServerError>
where
    S: Future<Output = ()>,
{
    let app = Arc::new(app);
    let options = Arc::new(options);
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        logger::log_connection_accepted(&peer_addr);
                        connection::handle_connection(
                            stream,
                            peer_addr,
                            Arc::clone(&app),
                            Arc::clone(&options),
                        );
                    }
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }

            () = &mut shutdown => {
                logger::log_server_stop();
                return Ok(());
            }
        }
    }
}

/// Bind `addr` and serve `app` until Ctrl+C / SIGTERM
pub async fn bind_and_serve(addr: &str, app: App, options: ServerOptions) -> Result<(), ServerError> {
    let addr = parse_addr(addr)?;
    let listener = create_reusable_listener(addr)?;
    logger::log_server_start(&addr, app.mode());
    serve(listener, app, options, shutdown_signal()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::PublicDir;
    use crate::router::{Resource, RouteTable};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;
    use tokio::sync::oneshot;

    struct Users;

    impl Users {
        fn list(&self) -> String {
            "alice,bob".to_string()
        }
    }

    impl Resource for Users {
        const NAME: &'static str = "users";

        fn actions() -> Vec<(&'static str, fn(&Self) -> String)> {
            vec![("list", Self::list)]
        }
    }

    async fn roundtrip(addr: std::net::SocketAddr, request: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut buf = Vec::new();
        stream.read_to_end(&mut buf).await.unwrap();
        String::from_utf8(buf).unwrap()
    }

    async fn start(app: App) -> (std::net::SocketAddr, oneshot::Sender<()>) {
        let listener = create_reusable_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel::<()>();
        let options = ServerOptions {
            access_log_format: None,
            ..ServerOptions::default()
        };
        tokio::spawn(serve(listener, app, options, async move {
            let _ = rx.await;
        }));
        (addr, tx)
    }

    #[tokio::test]
    async fn test_mux_over_tcp() {
        let dir = tempfile::tempdir().unwrap();
        let mux = ApiMux::with_settings(&crate::config::MuxSettings {
            public_folder: dir.path().to_path_buf(),
            ..Default::default()
        })
        .unwrap();
        mux.register_fn("users", |_req| {
            Response::new(Full::new(Bytes::from_static(b"[\"alice\"]")))
        })
        .unwrap();

        let (addr, stop) = start(App::Mux(Arc::new(mux))).await;
        let raw = roundtrip(
            addr,
            "GET /api?name=USERS HTTP/1.1\r\nHost: test\r\nConnection: close\r\n\r\n",
        )
        .await;
        assert!(raw.starts_with("HTTP/1.1 200 OK"), "{raw}");
        assert!(raw.to_ascii_lowercase().contains("content-type: application/json; charset=utf-8"));
        assert!(raw.ends_with("[\"alice\"]"));

        let raw = roundtrip(
            addr,
            "GET /dashboard/ HTTP/1.1\r\nHost: test\r\nConnection: close\r\n\r\n",
        )
        .await;
        assert!(raw.starts_with("HTTP/1.1 301 Moved Permanently"), "{raw}");
        stop.send(()).unwrap();
    }

    #[tokio::test]
    async fn test_router_over_tcp() {
        let dir = tempfile::tempdir().unwrap();
        let mut builder = RouteTable::builder();
        builder.resource(Users).unwrap();
        let router = SegmentRouter::new(builder.build(), PublicDir::new(dir.path()));

        let (addr, stop) = start(App::Router(Arc::new(router))).await;
        let raw = roundtrip(
            addr,
            "GET /users/list HTTP/1.1\r\nHost: test\r\nConnection: close\r\n\r\n",
        )
        .await;
        assert!(raw.starts_with("HTTP/1.1 200 OK"), "{raw}");
        assert!(raw.ends_with("alice,bob"));
        stop.send(()).unwrap();
    }

    #[test]
    fn test_options_from_config() {
        let mut cfg = Config::load_from("does-not-exist/apimux").unwrap();
        cfg.logging.access_log = false;
        cfg.performance.request_timeout = 0;
        let options = ServerOptions::from_config(&cfg);
        assert!(options.access_log_format.is_none());
        assert!(options.request_timeout.is_zero());
    }
}
