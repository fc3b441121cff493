use crate::config::Configuration;
use crate::{ASCOMError, ASCOMErrorCode};
use axum::Router;
use axum::extract::{Form, Path, Query, State};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A request as seen by [`MockServer`].
#[derive(Debug, Clone)]
pub(crate) struct RecordedRequest {
    pub(crate) method: &'static str,
    pub(crate) device_type: String,
    pub(crate) action: String,
    pub(crate) params: Vec<(String, String)>,
    pub(crate) authorization: Option<String>,
}

impl RecordedRequest {
    /// Alpaca parameter names are case-insensitive.
    pub(crate) fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug)]
struct RawReply {
    status: StatusCode,
    content_type: String,
    body: String,
}

#[derive(Debug, Default)]
struct MockState {
    values: HashMap<String, serde_json::Value>,
    errors: HashMap<String, ASCOMError>,
    delays: HashMap<String, Duration>,
    raw: HashMap<String, RawReply>,
    requests: Vec<RecordedRequest>,
}

type SharedState = Arc<Mutex<MockState>>;

/// In-process Alpaca device server.
///
/// Property writes (a PUT whose only argument is named after the resource)
/// are stored and echoed back by subsequent reads. Reads of unknown
/// properties answer with `NOT_IMPLEMENTED`, methods succeed with no value
/// unless a reply was configured for them.
#[derive(Debug)]
pub(crate) struct MockServer {
    addr: SocketAddr,
    state: SharedState,
    task: JoinHandle<()>,
}

impl MockServer {
    pub(crate) async fn start() -> eyre::Result<Self> {
        let state = SharedState::default();

        let router = Router::new()
            .route(
                "/api/v1/{device_type}/{device_number}/{action}",
                axum::routing::get(handle_get).put(handle_put),
            )
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let task = tokio::spawn(async move {
            if let Err(err) = axum::serve(listener, router).await {
                tracing::error!(%err, "Mock server stopped");
            }
        });

        tracing::debug!(%addr, "Mock server started");

        Ok(Self { addr, state, task })
    }

    /// Configuration pointing at this server.
    pub(crate) fn config(&self) -> Configuration {
        Configuration {
            host: self.addr.ip().to_string(),
            port: self.addr.port(),
            ..Configuration::default()
        }
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        lock(&self.state)
    }

    pub(crate) fn set_value(&self, action: &str, value: serde_json::Value) {
        let _ = self.state().values.insert(action.to_ascii_lowercase(), value);
    }

    pub(crate) fn value(&self, action: &str) -> Option<serde_json::Value> {
        self.state().values.get(&action.to_ascii_lowercase()).cloned()
    }

    pub(crate) fn fail_with(&self, action: &str, code: ASCOMErrorCode, message: &str) {
        let _ = self
            .state()
            .errors
            .insert(action.to_ascii_lowercase(), ASCOMError::new(code, message));
    }

    pub(crate) fn clear_failure(&self, action: &str) {
        let _ = self.state().errors.remove(&action.to_ascii_lowercase());
    }

    pub(crate) fn delay(&self, action: &str, delay: Duration) {
        let _ = self.state().delays.insert(action.to_ascii_lowercase(), delay);
    }

    pub(crate) fn respond_raw(&self, action: &str, status: u16, content_type: &str, body: &str) {
        let _ = self.state().raw.insert(
            action.to_ascii_lowercase(),
            RawReply {
                status: StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                content_type: content_type.to_owned(),
                body: body.to_owned(),
            },
        );
    }

    pub(crate) fn requests(&self) -> Vec<RecordedRequest> {
        self.state().requests.clone()
    }

    pub(crate) fn requests_to(&self, action: &str) -> Vec<RecordedRequest> {
        self.state()
            .requests
            .iter()
            .filter(|request| request.action.eq_ignore_ascii_case(action))
            .cloned()
            .collect()
    }

    pub(crate) fn last_request(&self, action: &str) -> Option<RecordedRequest> {
        self.requests_to(action).pop()
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn lock(state: &SharedState) -> MutexGuard<'_, MockState> {
    // A panicking test thread must not cascade into unrelated assertions.
    state
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// Start a server that accepts TCP connections and immediately drops them.
pub(crate) async fn dropping_server() -> eyre::Result<SocketAddr> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    drop(tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            drop(stream);
        }
    }));

    Ok(addr)
}

type DevicePath = Path<(String, u32, String)>;

async fn handle_get(
    State(state): State<SharedState>,
    Path((device_type, _device_number, action)): DevicePath,
    headers: HeaderMap,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    handle(state, "GET", device_type, action, &headers, params).await
}

async fn handle_put(
    State(state): State<SharedState>,
    Path((device_type, _device_number, action)): DevicePath,
    headers: HeaderMap,
    Form(params): Form<Vec<(String, String)>>,
) -> Response {
    handle(state, "PUT", device_type, action, &headers, params).await
}

fn wire_to_json(value: &str) -> serde_json::Value {
    if value.eq_ignore_ascii_case("true") {
        true.into()
    } else if value.eq_ignore_ascii_case("false") {
        false.into()
    } else if let Ok(number) = value.parse::<i64>() {
        number.into()
    } else if let Ok(number) = value.parse::<f64>() {
        number.into()
    } else {
        value.into()
    }
}

async fn handle(
    state: SharedState,
    method: &'static str,
    device_type: String,
    action: String,
    headers: &HeaderMap,
    params: Vec<(String, String)>,
) -> Response {
    static SERVER_TRANSACTION_ID: AtomicU32 = AtomicU32::new(1);

    let action = action.to_ascii_lowercase();
    let client_transaction_id = params
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case("ClientTransactionID"))
        .and_then(|(_, value)| value.parse::<u32>().ok());

    let request = RecordedRequest {
        method,
        device_type,
        action: action.clone(),
        params,
        authorization: headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned),
    };

    tracing::trace!(?request, "Mock request");

    let (delay, reply) = {
        let mut state = lock(&state);

        let delay = state.delays.get(&action).copied();

        let reply = if let Some(raw) = state.raw.get(&action) {
            Err((
                raw.status,
                [(CONTENT_TYPE, raw.content_type.clone())],
                raw.body.clone(),
            ))
        } else {
            let mut body = serde_json::json!({
                "ClientTransactionID": client_transaction_id,
                "ServerTransactionID": SERVER_TRANSACTION_ID.fetch_add(1, Ordering::Relaxed),
                "ErrorNumber": 0,
                "ErrorMessage": "",
            });

            if let Some(err) = state.errors.get(&action) {
                body["ErrorNumber"] = err.code.raw().into();
                body["ErrorMessage"] = err.message.to_string().into();
            } else if method == "PUT" {
                // A property write carries exactly one argument, named after the property.
                let mut arguments = request.params.iter().filter(|(key, _)| {
                    !key.eq_ignore_ascii_case("ClientID")
                        && !key.eq_ignore_ascii_case("ClientTransactionID")
                });
                let setter = match (arguments.next(), arguments.next()) {
                    (Some((key, value)), None) if key.eq_ignore_ascii_case(&action) => {
                        Some(wire_to_json(value))
                    }
                    _ => None,
                };
                match setter {
                    Some(value) => {
                        let _ = state.values.insert(action.clone(), value);
                    }
                    None => {
                        if let Some(value) = state.values.get(&action) {
                            body["Value"] = value.clone();
                        }
                    }
                }
            } else if let Some(value) = state.values.get(&action) {
                body["Value"] = value.clone();
            } else {
                body["ErrorNumber"] = ASCOMErrorCode::NOT_IMPLEMENTED.raw().into();
                body["ErrorMessage"] = format!("Property {action} is not implemented").into();
            }

            Ok(axum::Json(body))
        };

        state.requests.push(request);

        (delay, reply)
    };

    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    match reply {
        Ok(json) => json.into_response(),
        Err(raw) => raw.into_response(),
    }
}
