//! HTTP routes
//!
//! Extracts connector parameters from query strings, forms and multipart
//! bodies, runs the dispatcher on the blocking pool and renders its reply.

use std::collections::HashMap;

use axum::extract::{DefaultBodyLimit, FromRequest, Multipart, Path, Query, Request, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Form, Json, Router, middleware};
use log::error;

use crate::error::{ConnectorError, error_to_http_status, handle_error};
use crate::middleware::log_request;
use crate::protocol::{Envelope, Params, Reply, Transport, Upload};
use crate::server::core::AppState;
use crate::transfer::{Attachment, read_download};

/// Multipart field holding the uploaded file
const UPLOAD_FIELDS: [&str; 2] = ["files", "files[]"];

pub fn router(state: AppState) -> Router {
    let config = state.connector.config();
    let prefix = config.url_prefix.clone();
    // Room for the multipart framing around the largest accepted file.
    let body_limit = config.max_upload_size_bytes().saturating_add(64 * 1024);

    Router::new()
        .route(
            &format!("{prefix}/connector"),
            get(connector_get).post(connector_post),
        )
        .route(&format!("{prefix}/userfiles/{{*path}}"), get(userfile))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

fn is_xhr(headers: &HeaderMap) -> bool {
    headers
        .get("x-requested-with")
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.eq_ignore_ascii_case("XMLHttpRequest"))
}

async fn connector_get(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let allowed = state.access.is_allowed(&headers);
    let params = Params::from_pairs(query).with_xhr(is_xhr(&headers));
    run(state, allowed, Transport::Get, params).await
}

async fn connector_post(State(state): State<AppState>, request: Request) -> Response {
    if !state.access.is_allowed(request.headers()) {
        return StatusCode::NOT_FOUND.into_response();
    }

    let is_multipart = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("multipart/form-data"));

    let params = if is_multipart {
        match Multipart::from_request(request, &state).await {
            Ok(multipart) => read_multipart(multipart).await,
            Err(e) => Err(ConnectorError::OperationFailed(e.body_text())),
        }
    } else {
        match Form::<HashMap<String, String>>::from_request(request, &state).await {
            Ok(Form(fields)) => Ok(Params::from_pairs(fields)),
            Err(e) => Err(ConnectorError::OperationFailed(e.body_text())),
        }
    };

    match params {
        Ok(params) => run(state, true, Transport::Post, params).await,
        Err(e) => {
            handle_error(&e);
            (StatusCode::BAD_REQUEST, Json(Envelope::from_error(&e))).into_response()
        }
    }
}

async fn read_multipart(mut multipart: Multipart) -> Result<Params, ConnectorError> {
    let mut params = Params::default();
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ConnectorError::OperationFailed(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);

        match file_name {
            Some(file_name) if UPLOAD_FIELDS.contains(&name.as_str()) => {
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ConnectorError::OperationFailed(e.body_text()))?;
                // Only the first file is kept; the file manager sends one.
                if upload.is_none() {
                    upload = Some(Upload {
                        file_name,
                        data: data.to_vec(),
                    });
                }
            }
            _ => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ConnectorError::OperationFailed(e.body_text()))?;
                params.insert(name, value);
            }
        }
    }

    Ok(match upload {
        Some(upload) => params.with_upload(upload),
        None => params,
    })
}

/// Dispatch on the blocking pool; filesystem work must not stall the runtime.
async fn run(state: AppState, allowed: bool, transport: Transport, params: Params) -> Response {
    let connector = state.connector.clone();
    let reply = tokio::task::spawn_blocking(move || connector.dispatch(allowed, transport, &params))
        .await
        .unwrap_or_else(|e| {
            error!("Connector task failed: {}", e);
            Reply::Json(Envelope::from_error(&ConnectorError::OperationFailed(
                "internal error".into(),
            )))
        });
    render(reply)
}

fn render(reply: Reply) -> Response {
    match reply {
        Reply::NotFound => StatusCode::NOT_FOUND.into_response(),
        Reply::Json(envelope) => (StatusCode::OK, Json(envelope)).into_response(),
        Reply::Attachment(attachment) => attachment_response(attachment, true),
        Reply::Failed(e) => failure_response(&e),
    }
}

fn attachment_response(attachment: Attachment, as_download: bool) -> Response {
    let disposition = if as_download {
        attachment.disposition()
    } else {
        "inline".to_string()
    };
    (
        [
            (header::CONTENT_TYPE, attachment.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        attachment.data,
    )
        .into_response()
}

fn failure_response(e: &ConnectorError) -> Response {
    let status =
        StatusCode::from_u16(error_to_http_status(e)).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(Envelope::from_error(e))).into_response()
}

/// Raw file bytes for the URL placed in each descriptor's `path`.
async fn userfile(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(path): Path<String>,
) -> Response {
    if !state.access.is_allowed(&headers) {
        return StatusCode::NOT_FOUND.into_response();
    }

    let connector = state.connector.clone();
    let result = tokio::task::spawn_blocking(move || {
        let confined = connector.resolve(&path)?;
        read_download(&confined)
    })
    .await;

    match result {
        Ok(Ok(attachment)) => attachment_response(attachment, false),
        Ok(Err(ConnectorError::Unimplemented(_))) => StatusCode::NOT_FOUND.into_response(),
        Ok(Err(e)) => {
            handle_error(&e);
            failure_response(&e)
        }
        Err(e) => {
            error!("Userfile task failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
