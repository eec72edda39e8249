// ABOUTME: Docker-compatible HTTP surface for the lifecycle dispatcher.
// ABOUTME: One fallback handler parses container paths and renders replies.

mod response;
mod route;

pub use route::{Route, parse_route};

use crate::dispatch::{ApiError, Dispatcher, OperationRequest, QueryParams};
use crate::runtime::LifecycleOps;
use axum::Router;
use axum::extract::{Query, State};
use axum::http::{Method, Uri};
use axum::response::{IntoResponse, Response};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Application state shared with handlers.
pub struct AppState<R: ?Sized> {
    pub dispatcher: Dispatcher<R>,
}

impl<R: ?Sized> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            dispatcher: self.dispatcher.clone(),
        }
    }
}

/// Creates the router for the container endpoints.
///
/// Container names may contain `/`, which axum path parameters cannot
/// express in the middle of a route, so every request lands in a single
/// handler that parses the path itself.
pub fn create_router<R>(runtime: Arc<R>) -> Router
where
    R: LifecycleOps + ?Sized + 'static,
{
    let state = AppState {
        dispatcher: Dispatcher::new(runtime),
    };

    Router::new()
        .fallback(handle_request::<R>)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn handle_request<R>(
    State(state): State<AppState<R>>,
    method: Method,
    uri: Uri,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response
where
    R: LifecycleOps + ?Sized + 'static,
{
    let dispatcher = &state.dispatcher;

    match parse_route(uri.path()) {
        None => ApiError::not_found("page not found").into_response(),
        Some(Route::Collection) => dispatcher.list().into_response(),
        Some(Route::Container { reference, action }) => {
            let request = OperationRequest {
                method,
                reference,
                action,
                query: pairs.into_iter().collect::<QueryParams>(),
            };
            dispatcher.dispatch(request).await.into_response()
        }
    }
}
