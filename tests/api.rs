// ABOUTME: Integration tests for the HTTP router over a fake runtime.
// ABOUTME: Checks status codes, JSON envelopes, and path handling end to end.

mod support;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use dockward::api::create_router;
use dockward::runtime::{ContainerExit, ContainerState};
use http_body_util::BodyExt;
use nix::sys::signal::Signal;
use serde_json::{Value, json};
use std::sync::Arc;
use support::{Call, FakeRuntime};
use tower::ServiceExt;

fn app(runtime: FakeRuntime) -> (Arc<FakeRuntime>, Router) {
    support::init_tracing();
    let runtime = Arc::new(runtime);
    (Arc::clone(&runtime), create_router(runtime))
}

async fn send(app: Router, method: &str, uri: &str) -> (StatusCode, Vec<u8>) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, body.to_vec())
}

fn json_body(body: &[u8]) -> Value {
    serde_json::from_slice(body).unwrap()
}

#[tokio::test]
async fn kill_returns_no_content() {
    let (runtime, app) = app(FakeRuntime::new().with_container("web", ContainerState::Running));

    let (status, body) = send(app, "POST", "/containers/web/kill?signal=SIGTERM").await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());
    assert_eq!(
        runtime.mutations(),
        vec![Call::Kill(FakeRuntime::id_of("web"), Signal::SIGTERM.into())]
    );
}

#[tokio::test]
async fn kill_forwards_realtime_signal() {
    let (runtime, app) = app(FakeRuntime::new().with_container("web", ContainerState::Running));

    let (status, _) = send(app, "POST", "/containers/web/kill?signal=SIGRTMIN%2B3").await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    let calls = runtime.mutations();
    assert!(
        matches!(&calls[..], [Call::Kill(_, signal)] if signal.number() == 37),
        "{calls:?}"
    );
}

#[tokio::test]
async fn bad_bool_reports_cause() {
    let (_, app) = app(FakeRuntime::new().with_container("web", ContainerState::Running));

    let (status, body) = send(app, "DELETE", "/containers/web/json?force=notabool").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body = json_body(&body);
    assert_eq!(body["message"], json!("unable to parse parameter 'force': notabool"));
    assert!(body["cause"].is_string());
}

#[tokio::test]
async fn versioned_paths_are_accepted() {
    let (runtime, app) = app(FakeRuntime::new().with_container("web", ContainerState::Running));

    let (status, _) = send(app, "POST", "/v1.41/containers/web/pause").await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(runtime.mutations(), vec![Call::Pause(FakeRuntime::id_of("web"))]);
}

#[tokio::test]
async fn names_may_contain_slashes() {
    let (runtime, app) = app(
        FakeRuntime::new()
            .with_container("project/web", ContainerState::Running)
            .with_container("my/app", ContainerState::Running),
    );

    let (status, _) = send(app.clone(), "POST", "/containers/project/web/stop").await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(app, "POST", "/containers/my%2Fapp/unpause").await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    assert_eq!(
        runtime.mutations(),
        vec![
            Call::Stop(FakeRuntime::id_of("project/web"), None),
            Call::Unpause(FakeRuntime::id_of("my/app")),
        ]
    );
}

#[tokio::test]
async fn not_found_has_message_envelope() {
    let (_, app) = app(FakeRuntime::new());

    let (status, body) = send(app, "POST", "/containers/ghost/kill").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        json_body(&body)["message"],
        json!("No such container: ghost")
    );
}

#[tokio::test]
async fn conflict_has_message_envelope() {
    let (_, app) = app(FakeRuntime::new().with_container("web", ContainerState::Exited));

    let (status, body) = send(app, "POST", "/containers/web/restart").await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        json_body(&body)["message"],
        json!("Container web is not running")
    );
}

#[tokio::test]
async fn not_modified_has_no_body() {
    let (_, app) = app(FakeRuntime::new().with_container("web", ContainerState::Exited));

    let (status, body) = send(app, "POST", "/containers/web/stop").await;

    assert_eq!(status, StatusCode::NOT_MODIFIED);
    assert!(body.is_empty());
}

#[tokio::test]
async fn bad_request_has_message_envelope() {
    let (runtime, app) =
        app(FakeRuntime::new().with_container("web", ContainerState::Running));

    let (status, body) = send(app, "POST", "/containers/web/stop?t=abc").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body = json_body(&body);
    assert_eq!(body["message"], json!("unable to parse parameter 't': abc"));
    assert!(runtime.mutations().is_empty());
}

#[tokio::test]
async fn internal_error_carries_cause() {
    let (_, app) = app(
        FakeRuntime::new()
            .with_container("web", ContainerState::Running)
            .failing("device busy"),
    );

    let (status, body) = send(app, "POST", "/containers/web/pause").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json_body(&body),
        json!({
            "message": "unable to pause container web",
            "cause": "runtime error: device busy",
        })
    );
}

#[tokio::test]
async fn wait_returns_exit_envelope() {
    let (_, app) = app(
        FakeRuntime::new()
            .with_container("web", ContainerState::Running)
            .with_exit(ContainerExit::clean(2)),
    );

    let request = Request::builder()
        .method("POST")
        .uri("/containers/web/wait")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(
        json_body(&body),
        json!({"StatusCode": 2, "Error": {"Message": ""}})
    );
}

#[tokio::test]
async fn delete_removes_container() {
    let (runtime, app) =
        app(FakeRuntime::new().with_container("web", ContainerState::Running));

    let (status, _) = send(app, "DELETE", "/containers/web/json?force=1&v=true").await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(runtime.mutations().len(), 1);
}

#[tokio::test]
async fn delete_with_link_is_rejected() {
    let (runtime, app) =
        app(FakeRuntime::new().with_container("web", ContainerState::Running));

    let (status, body) = send(app, "DELETE", "/containers/web/json?link=true").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(&body)["message"],
        json!("DELETE /containers/{id}?link parameter is not supported")
    );
    assert!(runtime.mutations().is_empty());
}

#[tokio::test]
async fn first_query_value_wins() {
    let (runtime, app) =
        app(FakeRuntime::new().with_container("web", ContainerState::Running));

    let (status, _) = send(app, "POST", "/containers/web/kill?signal=HUP&signal=bogus").await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(
        runtime.mutations(),
        vec![Call::Kill(FakeRuntime::id_of("web"), Signal::SIGHUP.into())]
    );
}

#[tokio::test]
async fn list_route_is_not_found() {
    let (_, app) = app(FakeRuntime::new());

    let (status, body) = send(app, "GET", "/containers/").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json_body(&body)["message"], json!("page not found"));
}

#[tokio::test]
async fn rename_is_not_implemented() {
    let (_, app) = app(FakeRuntime::new().with_container("web", ContainerState::Running));

    let (status, body) = send(app, "POST", "/containers/web/rename?name=api").await;

    assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
    assert_eq!(
        json_body(&body)["message"],
        json!("API endpoint is not supported: /containers/web/rename")
    );
}

#[tokio::test]
async fn unknown_paths_are_not_found() {
    let (runtime, app) = app(FakeRuntime::new().with_container("web", ContainerState::Running));

    for uri in ["/images/json", "/containers/web/attach", "/containers/web"] {
        let (status, _) = send(app.clone(), "POST", uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
    }
    assert!(runtime.calls().is_empty());
}

#[tokio::test]
async fn get_on_action_is_method_not_allowed() {
    let (_, app) = app(FakeRuntime::new().with_container("web", ContainerState::Running));

    let (status, _) = send(app, "GET", "/containers/web/wait").await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}
