use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    http::{HeaderValue, StatusCode, Uri, header::CACHE_CONTROL},
    middleware,
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::{
    application::{
        error::HttpError,
        navigation::{NavigationController, ToolbarEvent, VIEWER_PATH},
        renderer::{AngRenderer, RenderOutcome},
    },
    domain::ang::AngNumber,
    presentation::views::{compose_viewer, render_not_found_response, render_template_response},
};

use super::middleware::{log_responses, set_request_context};

pub const NAVIGATE_PATH: &str = "/ang/navigate";

/// Base used to give request targets an absolute form for URL parsing.
const REQUEST_BASE: &str = "http://gurshabad.local";

#[derive(Clone)]
pub struct HttpState {
    pub renderer: Arc<AngRenderer>,
    pub navigation: Arc<NavigationController>,
}

pub fn build_router(state: HttpState) -> Router {
    Router::new()
        .route("/", get(viewer))
        .route("/ang", get(viewer))
        .route(VIEWER_PATH, get(viewer))
        .route(NAVIGATE_PATH, get(navigate))
        .route("/_health", get(health))
        .fallback(fallback)
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(set_request_context))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct NavigateQuery {
    action: Option<String>,
    ang: Option<String>,
    current: Option<String>,
}

async fn viewer(State(state): State<HttpState>, uri: Uri) -> Response {
    let request_url = request_url(&uri);
    let ang = state.navigation.resolve_startup(request_url.as_ref());

    let (outcome, template) = compose_viewer(&state.renderer, ang, NAVIGATE_PATH).await;
    if let RenderOutcome::Failed { .. } = outcome {
        debug!(ang = %ang, "serving viewer with error content");
    }

    let mut response = render_template_response(template, StatusCode::OK);
    response
        .headers_mut()
        .insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

async fn navigate(
    State(state): State<HttpState>,
    Query(query): Query<NavigateQuery>,
) -> Result<Response, HttpError> {
    const SOURCE: &str = "infra::http::public::navigate";

    let action = query.action.as_deref().unwrap_or_default();
    let event = ToolbarEvent::parse(action).ok_or_else(|| {
        HttpError::new(
            SOURCE,
            StatusCode::BAD_REQUEST,
            "Unknown navigation action",
            format!("action `{action}` is not one of prev, next, go, enter"),
        )
    })?;

    let current = query.current.as_deref().and_then(AngNumber::parse_strict);

    match state
        .navigation
        .handle(event, current, query.ang.as_deref())
    {
        Some(navigation) => Ok(Redirect::to(&navigation.location()).into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

async fn health() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn fallback() -> Response {
    render_not_found_response()
}

fn request_url(uri: &Uri) -> Option<Url> {
    let target = uri
        .path_and_query()
        .map(|value| value.as_str())
        .unwrap_or("/");
    Url::parse(REQUEST_BASE)
        .and_then(|base| base.join(target))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_url_keeps_the_query() {
        let uri: Uri = "/ang.html?ang=12".parse().expect("uri");
        let url = request_url(&uri).expect("url");

        assert_eq!(url.path(), "/ang.html");
        assert_eq!(url.query(), Some("ang=12"));
    }

    #[test]
    fn request_url_defaults_to_root() {
        let uri: Uri = "http://example.com".parse().expect("uri");
        let url = request_url(&uri).expect("url");

        assert_eq!(url.path(), "/");
    }
}
