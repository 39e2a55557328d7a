//! HTTP transport: a thin axum adapter over [`NoteService`].
//!
//! This is the only module that knows about HTTP. Handlers extract
//! Basic-auth credentials and JSON bodies, call one service operation, and
//! shape the response; every error is a [`JotError`] translated to a status
//! code here. No business logic lives in this layer.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Deserialize;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::Config;
use crate::error::{JotError, Result};
use crate::model::Note;
use crate::service::{Credentials, NoteService};
use crate::speller::{SpellClient, Validator};
use crate::store::fs::{FileCredentialStore, FileNoteStore};
use crate::store::{CredentialStore, NoteStore};

/// Build the production service from config and serve it until shutdown.
pub async fn serve(config: Config) -> Result<()> {
    let service = Arc::new(NoteService::new(
        FileCredentialStore::new(&config.data_dir),
        FileNoteStore::new(&config.data_dir),
        SpellClient::new(&config.speller_url, config.speller_timeout)?,
    ));

    let app = router(service);

    let address = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&address).await?;
    info!("listening on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server shut down");
    Ok(())
}

pub fn router<C, N, V>(service: Arc<NoteService<C, N, V>>) -> Router
where
    C: CredentialStore + 'static,
    N: NoteStore + 'static,
    V: Validator + 'static,
{
    Router::new()
        .route("/users", post(create_user::<C, N, V>))
        .route(
            "/notes",
            get(list_notes::<C, N, V>).post(add_note::<C, N, V>),
        )
        .route("/notes/{index}", delete(delete_note::<C, N, V>))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

#[derive(Deserialize)]
struct NewUser {
    username: String,
    password: String,
}

async fn create_user<C, N, V>(
    State(service): State<Arc<NoteService<C, N, V>>>,
    Json(user): Json<NewUser>,
) -> Result<Response>
where
    C: CredentialStore + 'static,
    N: NoteStore + 'static,
    V: Validator + 'static,
{
    service.register(&user.username, &user.password).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User created successfully" })),
    )
        .into_response())
}

async fn list_notes<C, N, V>(
    State(service): State<Arc<NoteService<C, N, V>>>,
    headers: HeaderMap,
) -> Result<Response>
where
    C: CredentialStore + 'static,
    N: NoteStore + 'static,
    V: Validator + 'static,
{
    let creds = basic_credentials(&headers)?;
    let notes = service.list_notes(&creds).await?;
    Ok(Json(notes).into_response())
}

async fn add_note<C, N, V>(
    State(service): State<Arc<NoteService<C, N, V>>>,
    headers: HeaderMap,
    Json(note): Json<Note>,
) -> Result<Response>
where
    C: CredentialStore + 'static,
    N: NoteStore + 'static,
    V: Validator + 'static,
{
    let creds = basic_credentials(&headers)?;
    let stored = service.add_note(&creds, note).await?;
    Ok(Json(json!({ "message": "Note added successfully", "note": stored })).into_response())
}

async fn delete_note<C, N, V>(
    State(service): State<Arc<NoteService<C, N, V>>>,
    headers: HeaderMap,
    Path(index): Path<i64>,
) -> Result<Response>
where
    C: CredentialStore + 'static,
    N: NoteStore + 'static,
    V: Validator + 'static,
{
    let creds = basic_credentials(&headers)?;
    // A negative index is just as absent as one past the end.
    let index = usize::try_from(index).map_err(|_| JotError::NoteNotFound)?;
    let removed = service.delete_note(&creds, index).await?;
    Ok(Json(json!({ "message": "Note deleted", "note": removed })).into_response())
}

/// Parse `Authorization: Basic <base64(user:pass)>`. Any missing or
/// malformed header is plain `Unauthorized`; the response never says what
/// exactly was wrong with the credentials.
fn basic_credentials(headers: &HeaderMap) -> Result<Credentials> {
    let header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(JotError::Unauthorized)?;

    let encoded = header.strip_prefix("Basic ").ok_or(JotError::Unauthorized)?;
    let decoded = BASE64
        .decode(encoded.trim())
        .map_err(|_| JotError::Unauthorized)?;
    let decoded = String::from_utf8(decoded).map_err(|_| JotError::Unauthorized)?;

    let (username, password) = decoded.split_once(':').ok_or(JotError::Unauthorized)?;
    Ok(Credentials::new(username, password))
}

impl IntoResponse for JotError {
    fn into_response(self) -> Response {
        let status = match &self {
            JotError::Unauthorized => StatusCode::UNAUTHORIZED,
            JotError::UserExists
            | JotError::InvalidInput(_)
            | JotError::SpellingRejected { .. } => StatusCode::BAD_REQUEST,
            JotError::NoteNotFound => StatusCode::NOT_FOUND,
            JotError::SpellerUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            JotError::Io(_) | JotError::Serialization(_) | JotError::Client(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("internal error: {self}");
        }

        let unauthorized = status == StatusCode::UNAUTHORIZED;
        let mut response =
            (status, Json(json!({ "detail": self.to_string() }))).into_response();
        if unauthorized {
            response
                .headers_mut()
                .insert("WWW-Authenticate", HeaderValue::from_static("Basic"));
        }
        response
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
