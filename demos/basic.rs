//! apibuilder example: routes declared through nested groups, served by a
//! small hyper server that owns the routing.
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example basic
//!
//! Try:
//!   curl http://localhost:3000/healthz
//!   curl http://localhost:3000/api/v1/users/42
//!   curl -X DELETE -u admin:admin http://localhost:3000/api/v1/users/42
//!   curl -X DELETE http://localhost:3000/api/v1/users/42      # 401

use std::collections::HashMap;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use apibuilder::{BoxedHandler, Middleware, Registrar, Request, Response, Route, RouteSet};
use bytes::Bytes;
use http::StatusCode;
use http_body_util::{BodyExt, Full};
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let routes = RouteSet::new();
    declare(&routes);

    let mut app = App::default();
    routes.register_into(&mut app);

    serve("0.0.0.0:3000".parse().expect("invalid socket address"), app)
        .await
        .expect("server error");
}

fn declare(routes: &RouteSet) {
    routes.api("GET", "/healthz", liveness);

    let api = routes.with([access_log()]);
    api.apis(["GET", "HEAD"], "/api/v1/users/{id}", get_user);

    api.with([basic_auth()])
        .api("POST", "/api/v1/users", create_user)
        .api("DELETE", "/api/v1/users/{id}", delete_user);
}

// ── Middleware ────────────────────────────────────────────────────────────────

fn access_log() -> Middleware {
    Middleware::from_fn(|req: Request, next: BoxedHandler| async move {
        let started = Instant::now();
        let method = req.method().clone();
        let path = req.path().to_owned();
        let res = next.call(req).await;
        info!(%method, %path, status = res.status_code().as_u16(), elapsed = ?started.elapsed(), "request");
        res
    })
}

fn basic_auth() -> Middleware {
    Middleware::from_fn(|req: Request, next: BoxedHandler| async move {
        let credentials = req.header("authorization").map(str::to_owned);
        match credentials.as_deref() {
            Some("Basic YWRtaW46YWRtaW4=") => next.call(req).await,
            Some(_)                        => Response::status(StatusCode::FORBIDDEN),
            None                           => Response::status(StatusCode::UNAUTHORIZED),
        }
    })
}

// ── Handlers ──────────────────────────────────────────────────────────────────

async fn liveness(_req: Request) -> &'static str {
    "ok"
}

async fn get_user(req: Request) -> Response {
    let id = req.context::<Params>().and_then(|p| p.0.get("id")).map_or("unknown", String::as_str);
    Response::json(format!(r#"{{"id":"{id}","name":"alice"}}"#).into_bytes())
}

async fn create_user(req: Request) -> Response {
    if req.body().is_empty() {
        return Response::status(StatusCode::BAD_REQUEST);
    }
    Response::builder()
        .status(StatusCode::CREATED)
        .header("location", "/api/v1/users/99")
        .json(br#"{"id":"99","name":"new_user"}"#.to_vec())
}

async fn delete_user(_req: Request) -> StatusCode {
    StatusCode::NO_CONTENT
}

// ── Routing (owned by the application, not by apibuilder) ─────────────────────

/// Path parameters matched by [`App`], stored as request context.
#[derive(Clone, Default)]
struct Params(HashMap<String, String>);

/// One radix tree per HTTP method.
#[derive(Default)]
struct App {
    trees: HashMap<http::Method, matchit::Router<BoxedHandler>>,
}

impl Registrar for App {
    fn register(&mut self, routes: Vec<Route>) {
        for route in routes {
            for method in route.methods() {
                let method = http::Method::from_bytes(method.as_bytes())
                    .unwrap_or_else(|e| panic!("invalid method `{method}` for `{}`: {e}", route.path()));
                self.trees
                    .entry(method)
                    .or_default()
                    .insert(route.path(), route.handler().clone())
                    .unwrap_or_else(|e| panic!("invalid route `{}`: {e}", route.path()));
            }
        }
    }
}

impl App {
    fn lookup(&self, method: &http::Method, path: &str) -> Option<(BoxedHandler, Params)> {
        let matched = self.trees.get(method)?.at(path).ok()?;
        let params = matched.params.iter().map(|(k, v)| (k.to_owned(), v.to_owned())).collect();
        Some((matched.value.clone(), Params(params)))
    }
}

// ── Server ────────────────────────────────────────────────────────────────────

async fn serve(addr: SocketAddr, app: App) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    let app = Arc::new(app);

    info!(%addr, "listening");

    let mut tasks = tokio::task::JoinSet::new();
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            biased;

            () = &mut shutdown => {
                info!(in_flight = tasks.len(), "shutdown signal received, draining connections");
                break;
            }

            res = listener.accept() => {
                let (stream, remote_addr) = match res {
                    Ok(v) => v,
                    Err(e) => {
                        error!("accept error: {e}");
                        continue;
                    }
                };

                let app = Arc::clone(&app);
                let io = TokioIo::new(stream);

                tasks.spawn(async move {
                    let svc = service_fn(move |req| {
                        let app = Arc::clone(&app);
                        async move { dispatch(app, req).await }
                    });

                    if let Err(e) = ConnBuilder::new(TokioExecutor::new())
                        .serve_connection(io, svc)
                        .await
                    {
                        error!(peer = %remote_addr, "connection error: {e}");
                    }
                });
            }

            Some(_) = tasks.join_next(), if !tasks.is_empty() => {}
        }
    }

    while tasks.join_next().await.is_some() {}

    info!("stopped");
    Ok(())
}

async fn dispatch(
    app: Arc<App>,
    req: hyper::Request<hyper::body::Incoming>,
) -> Result<http::Response<Full<Bytes>>, Infallible> {
    let (parts, body) = req.into_parts();
    let body = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            error!("body error: {e}");
            return Ok(Response::status(StatusCode::BAD_REQUEST).into_inner());
        }
    };

    let response = match app.lookup(&parts.method, parts.uri.path()) {
        Some((handler, params)) => {
            let mut req = Request::from(http::Request::from_parts(parts, body));
            req.insert_context(params);
            handler.call(req).await
        }
        None => Response::status(StatusCode::NOT_FOUND),
    };

    Ok(response.into_inner())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let sigterm = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c  => {}
        () = sigterm => {}
    }
}
