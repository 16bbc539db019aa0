use axum::async_trait;
use axum::extract::{FromRequest, Path, Request, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use chrono::{SecondsFormat, Utc};
use filestore_contract::{Transaction, FUNCTIONS};
use filestore_types::FileMetadata;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{ServerError, ServerResult};
use crate::host::Host;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".into(),
            version: env!("CARGO_PKG_VERSION").into(),
        }
    }
}

/// Body of `POST /v1/transactions`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InvokeRequest {
    pub function: String,
    #[serde(default)]
    pub args: Vec<String>,
}

/// `Json` extractor whose rejections become [`ServerError`]s, so malformed
/// bodies get the same JSON error body as every other failure.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    Json<T>: FromRequest<S, Rejection = axum::extract::rejection::JsonRejection>,
    S: Send + Sync,
    T: Send,
{
    type Rejection = ServerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

/// Current time in the format the gateway stamps on records.
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Fill in what a gateway assigns before submitting a new record: an id
/// when the caller left it empty, and both timestamps.
pub fn stamp_new_record(metadata: &mut FileMetadata, now: &str) {
    if metadata.id.is_empty() {
        metadata.id = uuid::Uuid::now_v7().to_string();
    }
    metadata.created_at = now.to_string();
    metadata.last_modified = now.to_string();
}

fn json_payload(payload: Vec<u8>) -> Response {
    ([(header::CONTENT_TYPE, "application/json")], payload).into_response()
}

fn decode_payload(payload: &[u8]) -> ServerResult<Value> {
    if payload.is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_slice(payload).map_err(|e| ServerError::Internal(e.to_string()))
}

/// Health check handler.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

/// Info handler.
pub async fn info_handler() -> Json<Value> {
    Json(json!({
        "name": "filestore-server",
        "version": env!("CARGO_PKG_VERSION"),
        "functions": FUNCTIONS,
    }))
}

/// Raw by-name invocation, as a peer gateway would submit it.
pub async fn invoke_handler(
    State(host): State<Host>,
    JsonBody(request): JsonBody<InvokeRequest>,
) -> ServerResult<Json<Value>> {
    let tx = Transaction::parse(&request.function, request.args.as_slice())?;
    let payload = host.run(tx).await?;
    Ok(Json(json!({ "success": true, "payload": decode_payload(&payload)? })))
}

pub async fn create_file(
    State(host): State<Host>,
    JsonBody(mut metadata): JsonBody<FileMetadata>,
) -> ServerResult<(StatusCode, Json<Value>)> {
    stamp_new_record(&mut metadata, &timestamp_now());
    let id = metadata.id.clone();
    host.run(Transaction::StoreFile(metadata)).await?;
    Ok((StatusCode::CREATED, Json(json!({ "success": true, "id": id }))))
}

pub async fn list_files(State(host): State<Host>) -> ServerResult<Response> {
    let payload = host.run(Transaction::GetAllFiles).await?;
    Ok(json_payload(payload))
}

pub async fn get_file(State(host): State<Host>, Path(id): Path<String>) -> ServerResult<Response> {
    let payload = host.run(Transaction::GetFile(id)).await?;
    Ok(json_payload(payload))
}

pub async fn file_exists(
    State(host): State<Host>,
    Path(id): Path<String>,
) -> ServerResult<Json<Value>> {
    let payload = host.run(Transaction::FileExists(id)).await?;
    Ok(Json(json!({ "exists": decode_payload(&payload)? })))
}

/// Full replacement of an existing record. The path id wins over any id in
/// the body, and `lastModified` is stamped with the current time.
pub async fn update_file(
    State(host): State<Host>,
    Path(id): Path<String>,
    JsonBody(mut metadata): JsonBody<FileMetadata>,
) -> ServerResult<Json<Value>> {
    metadata.id = id;
    metadata.last_modified = timestamp_now();
    let id = metadata.id.clone();
    host.run(Transaction::UpdateFile(metadata)).await?;
    Ok(Json(json!({ "success": true, "id": id })))
}

pub async fn delete_file(
    State(host): State<Host>,
    Path(id): Path<String>,
) -> ServerResult<Json<Value>> {
    host.run(Transaction::DeleteFile(id)).await?;
    Ok(Json(json!({ "success": true })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stamp_assigns_id_only_when_missing() {
        let mut fresh = FileMetadata::new("", "alice");
        stamp_new_record(&mut fresh, "2024-01-01T00:00:00.000Z");
        assert!(!fresh.id.is_empty());
        assert_eq!(fresh.created_at, "2024-01-01T00:00:00.000Z");
        assert_eq!(fresh.last_modified, fresh.created_at);

        let mut named = FileMetadata::new("keep-me", "alice");
        stamp_new_record(&mut named, "t");
        assert_eq!(named.id, "keep-me");
    }

    #[test]
    fn timestamp_is_rfc3339_utc() {
        let now = timestamp_now();
        assert!(now.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&now).is_ok());
    }

    #[test]
    fn empty_payload_decodes_to_null() {
        assert_eq!(decode_payload(b"").unwrap(), Value::Null);
        assert_eq!(decode_payload(b"true").unwrap(), Value::Bool(true));
    }
}
