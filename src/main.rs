use apimux::config::{self, Config, ServerMode};
use apimux::http::{with_default_headers, JSON_HEADERS};
use apimux::logger;
use apimux::mux::validate::validate_public_folder;
use apimux::router::{Resource, RouteTable, SegmentRouter};
use apimux::server::{self, App, ServerOptions};
use apimux::{ApiMux, ConfigError, PublicDir};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Request, Response};
use std::sync::Arc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::load()?;
    logger::init(&cfg.logging);

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;

    // Every configuration error surfaces here, before anything is bound
    let app = match cfg.server.mode {
        ServerMode::Mux => App::Mux(Arc::new(build_mux(&cfg.mux)?)),
        ServerMode::Router => App::Router(Arc::new(build_router(&cfg.router)?)),
    };

    let listener = server::create_reusable_listener(addr)?;
    logger::log_server_start(&addr, app.mode());
    server::serve(
        listener,
        app,
        ServerOptions::from_config(&cfg),
        server::shutdown_signal(),
    )
    .await?;
    Ok(())
}

fn build_mux(settings: &config::MuxSettings) -> Result<ApiMux, ConfigError> {
    let mux = ApiMux::with_settings(settings)?;
    mux.register_fn("status", status)?;
    mux.register_fn("time", time)?;
    Ok(mux)
}

fn build_router(settings: &config::RouterSettings) -> Result<SegmentRouter, ConfigError> {
    validate_public_folder(&settings.public_folder)?;

    let mut builder = RouteTable::builder();
    builder.resource(Status)?.resource(Clock)?;
    Ok(SegmentRouter::from_layout(
        builder.build(),
        PublicDir::new(&settings.public_folder),
        settings.layout,
    ))
}

fn json(value: &serde_json::Value) -> Response<Full<Bytes>> {
    let resp = Response::new(Full::new(Bytes::from(value.to_string())));
    with_default_headers(resp, &JSON_HEADERS)
}

fn status(_req: &Request<Bytes>) -> Response<Full<Bytes>> {
    json(&serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

fn time(_req: &Request<Bytes>) -> Response<Full<Bytes>> {
    json(&serde_json::json!({ "now": chrono::Local::now().to_rfc3339() }))
}

struct Status;

impl Status {
    fn index(&self) -> String {
        "ok".to_string()
    }

    fn version(&self) -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }
}

impl Resource for Status {
    const NAME: &'static str = "Status";

    fn actions() -> Vec<(&'static str, fn(&Self) -> String)> {
        vec![("Index", Self::index), ("Version", Self::version)]
    }
}

struct Clock;

impl Clock {
    fn index(&self) -> String {
        chrono::Local::now().to_rfc3339()
    }

    fn utc(&self) -> String {
        chrono::Utc::now().to_rfc3339()
    }
}

impl Resource for Clock {
    const NAME: &'static str = "Clock";

    fn actions() -> Vec<(&'static str, fn(&Self) -> String)> {
        vec![("Index", Self::index), ("UTC", Self::utc)]
    }
}

