use crate::error::{AppError, Result};
use crate::model::{ShortenRequest, ShortenResponse};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::header::LOCATION;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tinylink_core::Target;
use tracing::info;
use url::Url;

pub async fn shorten_handler(
    State(state): State<AppState>,
    request: ShortenRequest,
) -> Result<Json<ShortenResponse>> {
    let target = Target::from_transport(&request.long_url)?;
    let outcome = state.shortener().shorten(target.as_str()).await?;

    if outcome.created {
        info!(token = %outcome.token, "Shortened new link");
    }

    Ok(Json(ShortenResponse {
        created: outcome.created,
        short_url: state.short_url(&outcome.token),
        token: outcome.token,
        long_url: outcome.canonical_target,
    }))
}

pub async fn redirect_handler(
    Path(token): Path<String>,
    State(state): State<AppState>,
) -> Result<Response> {
    let target = state.shortener().resolve(&token).await?;
    let location = location_header(&target)?;

    Ok((StatusCode::TEMPORARY_REDIRECT, [(LOCATION, location)]).into_response())
}

/// `Location` only carries visible ASCII, so a target with raw non-ASCII
/// characters is sent in its percent-encoded (and punycoded) form.
/// `HeaderValue` accepts obs-text bytes, hence the explicit ASCII check.
fn location_header(target: &str) -> Result<HeaderValue> {
    if target.is_ascii() {
        if let Ok(value) = HeaderValue::from_str(target) {
            return Ok(value);
        }
    }

    let normalized =
        Url::parse(target).map_err(|e| AppError::UnusableTarget(format!("{target}: {e}")))?;
    HeaderValue::from_str(normalized.as_str())
        .map_err(|e| AppError::UnusableTarget(format!("{target}: {e}")))
}
