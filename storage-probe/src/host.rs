//! Azure Functions custom handler surface.
//!
//! The Functions host calls `POST /{Function}` with an invocation envelope,
//! or forwards the raw HTTP request to `/api/{Function}` when
//! `enableForwardingHttpRequest` is set.
//!
//! Reference: <https://learn.microsoft.com/en-us/azure/azure-functions/functions-custom-handlers>

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, RawQuery, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use bytes::Bytes;
use http::{header, StatusCode};
use log::{debug, warn};
use probe_core::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::ingress::{BlobPath, IngressNotifier, TriggerEvent};
use crate::probe::{AccessProber, ProbeRequest};

/// Name of the HTTP trigger binding in `function.json`.
const HTTP_TRIGGER_BINDING: &str = "req";
/// Name of the HTTP output binding in `function.json`.
const HTTP_OUTPUT_BINDING: &str = "res";
/// Name of the blob trigger binding in `function.json`.
const BLOB_TRIGGER_BINDING: &str = "content";

const MAX_INVOCATION_BYTES: usize = 256 * 1024 * 1024;

/// Shared state of the handler routes.
#[derive(Debug, Clone)]
pub struct HostState {
    prober: Arc<AccessProber>,
    notifier: IngressNotifier,
    trigger_path: BlobPath,
}

impl HostState {
    /// Create the state from a prober and the blob trigger path.
    pub fn new(prober: AccessProber, trigger_path: BlobPath) -> Self {
        Self {
            prober: Arc::new(prober),
            notifier: IngressNotifier::new(),
            trigger_path,
        }
    }
}

/// Build the router serving every function of this app.
pub fn router(state: HostState) -> Router {
    Router::new()
        .route("/ConfirmStorageAccess", post(confirm_invocation))
        .route(
            "/api/ConfirmStorageAccess",
            get(confirm_forwarded).post(confirm_forwarded),
        )
        .route("/BlobIngress", post(blob_ingress))
        .layer(DefaultBodyLimit::max(MAX_INVOCATION_BYTES))
        .with_state(state)
}

/// Request sent by the Functions host for every invocation.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct InvocationRequest {
    /// Trigger and input binding data, keyed by binding name.
    pub data: HashMap<String, Value>,
    /// Trigger metadata.
    pub metadata: HashMap<String, Value>,
}

/// Response returned to the Functions host.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct InvocationResponse {
    /// Output binding values, keyed by binding name.
    pub outputs: HashMap<String, Value>,
    /// Lines appended to the invocation log.
    pub logs: Vec<String>,
    /// Value of the `$return` binding.
    pub return_value: Option<Value>,
}

/// HTTP trigger payload inside an invocation envelope.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct HttpTriggerData {
    query: HashMap<String, Value>,
    body: Option<Value>,
}

impl HttpTriggerData {
    fn probe_request(&self) -> ProbeRequest {
        let body = match &self.body {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Null) | None => None,
            Some(other) => Some(other.to_string()),
        };
        let query = self.query.get("container").and_then(Value::as_str);

        ProbeRequest::from_parts(body.as_deref(), query)
    }
}

fn parse_envelope(body: &[u8]) -> Result<InvocationRequest> {
    serde_json::from_slice(body)
        .map_err(|e| Error::request_invalid("malformed invocation envelope").with_source(e))
}

async fn confirm_invocation(
    State(state): State<HostState>,
    body: Bytes,
) -> Json<InvocationResponse> {
    let mut logs = Vec::new();

    let req = parse_envelope(&body).and_then(|envelope| {
        let data = envelope
            .data
            .get(HTTP_TRIGGER_BINDING)
            .cloned()
            .unwrap_or(Value::Null);
        serde_json::from_value::<Option<HttpTriggerData>>(data)
            .map(Option::unwrap_or_default)
            .map_err(|e| Error::request_invalid("malformed http trigger data").with_source(e))
    });
    let req = match req {
        Ok(data) => data.probe_request(),
        Err(err) => {
            warn!("ConfirmStorageAccess received {err}, probing without container");
            logs.push(err.to_string());
            ProbeRequest::default()
        }
    };

    let result = state.prober.probe(&req).await;
    logs.push(format!(
        "ConfirmStorageAccess processed container {:?}: access {}",
        req.container,
        result.flag()
    ));

    Json(InvocationResponse {
        outputs: HashMap::from([(
            HTTP_OUTPUT_BINDING.to_string(),
            json!({
                "statusCode": StatusCode::OK.as_u16(),
                "body": result.body(),
                "headers": { "Content-Type": "application/json" },
            }),
        )]),
        logs,
        return_value: None,
    })
}

async fn confirm_forwarded(
    State(state): State<HostState>,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> impl IntoResponse {
    let container = query.as_deref().and_then(|q| {
        form_urlencoded::parse(q.as_bytes())
            .find(|(k, _)| k == "container")
            .map(|(_, v)| v.into_owned())
    });
    let body = String::from_utf8_lossy(&body);

    let req = ProbeRequest::from_parts(Some(&body), container.as_deref());
    let result = state.prober.probe(&req).await;

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        result.body(),
    )
}

async fn blob_ingress(State(state): State<HostState>, body: Bytes) -> Json<InvocationResponse> {
    let logs = match parse_envelope(&body).and_then(|e| trigger_event(&e, &state.trigger_path)) {
        Ok(event) => vec![state.notifier.notify(&event).to_string()],
        Err(err) => {
            warn!("BlobIngress dropped invocation: {err}");
            vec![format!("BlobIngress dropped invocation: {err}")]
        }
    };

    Json(InvocationResponse {
        logs,
        ..Default::default()
    })
}

fn trigger_event(envelope: &InvocationRequest, trigger_path: &BlobPath) -> Result<TriggerEvent> {
    let payload = match envelope.data.get(BLOB_TRIGGER_BINDING) {
        Some(Value::String(s)) => Bytes::from(s.clone().into_bytes()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|v| v.as_u64().and_then(|b| u8::try_from(b).ok()))
            .collect::<Option<Vec<u8>>>()
            .map(Bytes::from)
            .ok_or_else(|| Error::request_invalid("blob content array must hold bytes"))?,
        Some(Value::Null) | None => {
            return Err(Error::request_invalid(format!(
                "missing `{BLOB_TRIGGER_BINDING}` in invocation data"
            )))
        }
        Some(other) => {
            return Err(Error::request_invalid(format!(
                "unsupported blob content type: {other}"
            )))
        }
    };

    let name = metadata_str(envelope, "name")
        .or_else(|| {
            let path = metadata_str(envelope, "BlobTrigger")?;
            debug!("name not bound, deriving it from trigger path {path}");
            Some(
                trigger_path
                    .name_of(&path)
                    .map(str::to_string)
                    .unwrap_or(path),
            )
        })
        .ok_or_else(|| Error::request_invalid("missing blob name in invocation metadata"))?;

    Ok(TriggerEvent::new(name, payload))
}

/// Metadata values may arrive JSON encoded a second time, as `"\"foo.txt\""`.
fn metadata_str(envelope: &InvocationRequest, key: &str) -> Option<String> {
    let raw = envelope.metadata.get(key)?.as_str()?;
    let value = serde_json::from_str::<String>(raw).unwrap_or_else(|_| raw.to_string());
    Some(value).filter(|v| !v.is_empty())
}
