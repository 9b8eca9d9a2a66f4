/*============================================================
  Bundlescope
  Module: bundlescope::server
  ------------------------------------------------------------
  Purpose:
    HTTP surface: the JSON lookup endpoint, the server-rendered
    search page, and per-request logging.

  Dependencies:
    axum for routing and extraction, async-stream for the
    two-part search page body, urlencoding for query values.

  Revision History:
    2026-10-16  Authored router and handlers.
============================================================*/

use std::borrow::Cow;
use std::convert::Infallible;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::{RawQuery, Request, State};
use axum::http::header;
use axum::middleware::{self, Next};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};

use crate::bundlephobia::SizeClient;
use crate::error::LookupError;
use crate::logger::Logger;
use crate::package_info::PackageBundleInfo;
use crate::proxy::get_bundle_info;
use crate::render::{self, Links};
use crate::search::SearchSession;

/// Shared, immutable application state.
#[derive(Clone)]
pub struct AppState {
    client: SizeClient,
    logger: Arc<Logger>,
    links: Arc<Links>,
}

impl AppState {
    pub fn new(client: SizeClient, logger: Arc<Logger>, links: Links) -> Self {
        Self {
            client,
            logger,
            links: Arc::new(links),
        }
    }
}

/// First `package` value of a raw query string, decoded the way browsers
/// submit forms (`+` is a space). Later duplicates are ignored and an
/// undecodable value counts as absent.
fn package_param(raw: Option<&str>) -> Option<String> {
    let value = raw?
        .split('&')
        .find_map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode_component(key).as_deref() == Some("package")).then_some(value)
        })?;
    decode_component(value)
}

fn decode_component(raw: &str) -> Option<String> {
    urlencoding::decode(&raw.replace('+', " "))
        .ok()
        .map(Cow::into_owned)
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(search_page))
        .route("/api/bundle-size", get(bundle_size))
        .layer(middleware::from_fn_with_state(state.clone(), log_request))
        .with_state(state)
}

async fn bundle_size(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Json<PackageBundleInfo>, LookupError> {
    let package = package_param(query.as_deref());
    let info = get_bundle_info(&state.client, &state.logger, package.as_deref()).await?;
    Ok(Json(info))
}

/// Idle pages are sent whole. A submitted search streams the loading state
/// first, then the settled card once the lookup completes.
async fn search_page(State(state): State<AppState>, RawQuery(query): RawQuery) -> Response {
    let mut session = SearchSession::new();
    session.set_input(package_param(query.as_deref()).unwrap_or_default());

    let Some((ticket, package)) = session.submit() else {
        return Html(render::page(&session, &state.links)).into_response();
    };

    let prefix = render::loading_prefix(&session, &state.links);
    let chunks = async_stream::stream! {
        yield Ok::<_, Infallible>(prefix);
        let outcome = get_bundle_info(&state.client, &state.logger, Some(&package)).await;
        session.complete(ticket, outcome);
        yield Ok(render::settled_suffix(&session, &state.links));
    };

    (
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        Body::from_stream(chunks),
    )
        .into_response()
}

async fn log_request(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let response = next.run(request).await;
    state.logger.debug(
        "HTTP",
        format!("{method} {uri} -> {}", response.status().as_u16()),
    );
    response
}
