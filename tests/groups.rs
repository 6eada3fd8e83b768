//! End-to-end route building: auth-style middleware shared through nested
//! groups, then the built routes driven the way a server would drive them.

use apibuilder::{BoxedHandler, Middleware, Request, Response, Route, RouteSet};
use bytes::Bytes;
use http::{Method, StatusCode};

#[derive(Clone, Default)]
struct Trail(Vec<&'static str>);

#[derive(Clone, Debug, PartialEq)]
struct User(String);

fn mark(label: &'static str) -> Middleware {
    Middleware::from_fn(move |mut req: Request, next: BoxedHandler| async move {
        let mut trail = req.context::<Trail>().cloned().unwrap_or_default();
        trail.0.push(label);
        req.insert_context(trail);
        next.call(req).await
    })
}

/// Answers preflight requests without touching the rest of the chain.
fn preflight() -> Middleware {
    Middleware::from_fn(|req: Request, next: BoxedHandler| async move {
        if req.method() == Method::OPTIONS {
            return Response::status(StatusCode::NO_CONTENT);
        }
        next.call(req).await
    })
}

/// `Basic admin:admin` only. Stores the user for downstream handlers.
fn basic_auth() -> Middleware {
    Middleware::from_fn(|mut req: Request, next: BoxedHandler| async move {
        match req.header("authorization") {
            None => return Response::status(StatusCode::UNAUTHORIZED),
            Some("Basic YWRtaW46YWRtaW4=") => {}
            Some(_) => return Response::status(StatusCode::FORBIDDEN),
        }
        req.insert_context(User("admin".to_owned()));
        next.call(req).await
    })
}

async fn whoami(req: Request) -> Response {
    let user = req.context::<User>().map(|u| u.0.as_str()).unwrap_or("anonymous");
    let trail = req.context::<Trail>().map(|t| t.0.join(">")).unwrap_or_default();
    Response::text(format!("{user}|{trail}"))
}

fn request(method: Method, path: &str, auth: Option<&str>) -> Request {
    let mut builder = http::Request::builder().method(method).uri(path);
    if let Some(auth) = auth {
        builder = builder.header("authorization", auth);
    }
    builder.body(Bytes::new()).unwrap().into()
}

fn find<'a>(routes: &'a [Route], path: &str) -> &'a Route {
    routes.iter().find(|r| r.path() == path).unwrap()
}

fn build() -> Vec<Route> {
    let routes = RouteSet::new();
    routes.api("GET", "/healthz", whoami);

    let api = routes.with([preflight(), mark("api")]);
    api.api("GET", "/api/v1/public", whoami);

    let private = api.with([basic_auth(), mark("private")]);
    private
        .apis(["GET", "HEAD"], "/api/v1/me", whoami)
        .api_with("DELETE", "/api/v1/me", whoami, [mark("audit")]);

    private.end().snapshot()
}

#[test]
fn routes_keep_registration_order_across_groups() {
    let got: Vec<_> = build().iter().map(|r| format!("{} {}", r.method(), r.path())).collect();
    assert_eq!(
        got,
        ["GET /healthz", "GET /api/v1/public", "GET;HEAD /api/v1/me", "DELETE /api/v1/me"],
    );
}

#[tokio::test]
async fn ungrouped_route_has_no_middleware() {
    let routes = build();
    let res = find(&routes, "/healthz").handler().call(request(Method::GET, "/healthz", None)).await;
    assert_eq!(res.body(), b"anonymous|");
}

#[tokio::test]
async fn group_middleware_then_route_middleware_then_handler() {
    let routes = build();
    let delete = routes.iter().find(|r| r.method() == "DELETE").unwrap();

    let res = delete
        .handler()
        .call(request(Method::DELETE, "/api/v1/me", Some("Basic YWRtaW46YWRtaW4=")))
        .await;

    assert_eq!(res.status_code(), StatusCode::OK);
    assert_eq!(res.body(), b"admin|api>private>audit");
}

#[tokio::test]
async fn auth_short_circuits_before_inner_middleware() {
    let routes = build();
    let me = find(&routes, "/api/v1/me");

    let missing = me.handler().call(request(Method::GET, "/api/v1/me", None)).await;
    assert_eq!(missing.status_code(), StatusCode::UNAUTHORIZED);

    let wrong = me.handler().call(request(Method::GET, "/api/v1/me", Some("Basic Zm9vOmJhcg=="))).await;
    assert_eq!(wrong.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn outermost_middleware_runs_before_auth() {
    let routes = build();
    let me = find(&routes, "/api/v1/me");

    let res = me.handler().call(request(Method::OPTIONS, "/api/v1/me", None)).await;
    assert_eq!(res.status_code(), StatusCode::NO_CONTENT);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn built_routes_serve_concurrently_with_request_scoped_context() {
    let route = find(&build(), "/api/v1/public").clone();

    let mut tasks = tokio::task::JoinSet::new();
    for _ in 0..32 {
        let handler = route.handler().clone();
        tasks.spawn(async move { handler.call(request(Method::GET, "/api/v1/public", None)).await });
    }

    while let Some(res) = tasks.join_next().await {
        assert_eq!(res.unwrap().body(), b"anonymous|api");
    }
}
