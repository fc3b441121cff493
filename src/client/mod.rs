//! Remote proxy client: one HTTP round trip per device operation.

mod registry;
pub use registry::{ClientId, ClientIdRegistry};

mod session;
pub use session::Session;

mod transaction;
use transaction::{RequestTransaction, RequestWithTransaction, ResponseWithTransaction};

mod response;

use crate::config::TimeoutTier;
use crate::params::{ASCOMParam, Params};
use crate::{Error, Result};
use futures::TryFutureExt;
use mime::Mime;
use reqwest::RequestBuilder;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::Instrument;

/// HTTP verb of a remote operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum Method {
    /// Property reads. Parameters go into the query string.
    #[display("GET")]
    Get,
    /// Property writes and method invocations. Parameters go into a form body.
    #[display("PUT")]
    Put,
}

/// Proxy client of one remote device.
///
/// Every primitive issues exactly one HTTP request and completes only once
/// the response has arrived or the active timeout has expired.
#[derive(Debug, Clone)]
pub struct RemoteClient {
    session: Session,
    client_id: ClientId,
    timeout: Option<Duration>,
}

impl RemoteClient {
    /// Bind a client identity to a session.
    pub const fn new(session: Session, client_id: ClientId) -> Self {
        Self {
            session,
            client_id,
            timeout: None,
        }
    }

    /// Underlying session.
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Identity sent as `ClientID` with every request.
    pub const fn client_id(&self) -> ClientId {
        self.client_id
    }

    /// A client that uses the given tier instead of the session's active timeout.
    ///
    /// Unlike [`Session::set_tier`], this doesn't affect other users of the session.
    #[must_use]
    pub fn with_tier(&self, tier: TimeoutTier) -> Self {
        Self {
            timeout: Some(self.session.tier_timeout(tier)),
            ..self.clone()
        }
    }

    /// Read a property.
    pub async fn get_value<T: 'static + DeserializeOwned>(&self, name: &str) -> Result<T> {
        self.request(Method::Get, name, &Params::new()).await
    }

    /// Read a property that takes parameters, e.g. a per-switch value.
    pub async fn query<T: 'static + DeserializeOwned>(
        &self,
        name: &str,
        params: &Params,
    ) -> Result<T> {
        self.request(Method::Get, name, params).await
    }

    /// Write a property.
    ///
    /// The value is sent as a single parameter named after the property.
    pub async fn set_value(&self, name: &str, value: impl ASCOMParam) -> Result {
        self.request(Method::Put, name, &Params::new().with(name, value))
            .await
    }

    /// Invoke a remote method.
    ///
    /// Use `T = ()` for methods without a meaningful return value.
    pub async fn invoke<T: 'static + DeserializeOwned>(
        &self,
        name: &str,
        params: &Params,
    ) -> Result<T> {
        self.request(Method::Put, name, params).await
    }

    /// Invoke a remote method that takes no parameters and returns nothing.
    pub async fn call_no_args(&self, name: &str) -> Result {
        self.invoke(name, &Params::new()).await
    }

    /// Transmit an arbitrary string to the device and don't wait for a response value.
    pub async fn command_blind(&self, command: &str, raw: bool) -> Result {
        self.invoke("commandblind", &command_params(command, raw))
            .await
    }

    /// Transmit an arbitrary string to the device and wait for a boolean response.
    pub async fn command_bool(&self, command: &str, raw: bool) -> Result<bool> {
        self.invoke("commandbool", &command_params(command, raw))
            .await
    }

    /// Transmit an arbitrary string to the device and wait for a string response.
    pub async fn command_string(&self, command: &str, raw: bool) -> Result<String> {
        self.invoke("commandstring", &command_params(command, raw))
            .await
    }

    /// Invoke a device-specific action.
    pub async fn action(&self, name: &str, parameters: &str) -> Result<String> {
        self.invoke(
            "action",
            &Params::new()
                .with("Action", name)
                .with("Parameters", parameters),
        )
        .await
    }

    /// Names of the device-specific actions supported by the remote driver.
    pub async fn supported_actions(&self) -> Result<Vec<String>> {
        self.get_value("supportedactions").await
    }

    /// Ask the remote driver to connect to its hardware.
    pub async fn connect(&self) -> Result {
        self.set_value("Connected", true).await
    }

    /// Ask the remote driver to disconnect from its hardware.
    pub async fn disconnect(&self) -> Result {
        self.set_value("Connected", false).await
    }

    /// Remote view of the connection state.
    pub async fn connected(&self) -> Result<bool> {
        self.get_value("connected").await
    }

    /// Issue a single request and decode its `Value`.
    pub async fn request<T: 'static + DeserializeOwned>(
        &self,
        method: Method,
        name: &str,
        params: &Params,
    ) -> Result<T> {
        let http = self.session.http()?;

        let path = name.to_ascii_lowercase();
        let request_transaction = RequestTransaction::new(self.client_id.get());
        let timeout = self.timeout.unwrap_or_else(|| self.session.timeout());

        let span = tracing::debug_span!(
            "Alpaca transaction",
            %method,
            path = %path,
            ?params,
            client_id = request_transaction.client_id,
            client_transaction_id = request_transaction.client_transaction_id,
        );

        async move {
            let url = self
                .session
                .base_url()
                .join(&path)
                .map_err(|err| Error::Protocol(format!("Invalid resource name {path:?}: {err}")))?;

            let mut request = http
                .request(
                    match method {
                        Method::Get => reqwest::Method::GET,
                        Method::Put => reqwest::Method::PUT,
                    },
                    url,
                )
                .timeout(timeout);

            let add_params = match method {
                Method::Get => RequestBuilder::query,
                Method::Put => RequestBuilder::form,
            };
            request = add_params(
                request,
                &RequestWithTransaction {
                    params,
                    transaction: request_transaction,
                },
            );

            if let Some(credentials) = self.session.credentials() {
                request = request.basic_auth(&credentials.username, Some(&credentials.password));
            }

            let response = request.send().await.map_err(Error::transport)?;

            let status = response.status();
            if matches!(
                status,
                reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN
            ) {
                return Err(Error::Connection(format!(
                    "Credentials were rejected by the remote server ({status})"
                )));
            }
            if !status.is_success() {
                let body = response.text().await.map_err(Error::transport)?;
                return Err(Error::Protocol(format!("HTTP {status}: {}", body.trim())));
            }

            let mime_type = response
                .headers()
                .get(CONTENT_TYPE)
                .ok_or_else(|| Error::Protocol("Missing Content-Type header".to_owned()))?
                .to_str()
                .map_err(|err| Error::Protocol(format!("Invalid Content-Type header: {err}")))?
                .parse::<Mime>()
                .map_err(|err| Error::Protocol(format!("Invalid Content-Type header: {err}")))?;

            let bytes = response.bytes().await.map_err(Error::transport)?;

            if self.session.debug_trace() {
                tracing::trace!(body = %String::from_utf8_lossy(&bytes), "Raw response");
            }

            let ResponseWithTransaction {
                transaction: response_transaction,
                response,
            } = response::parse::<T>(&mime_type, &bytes)?;

            if self.session.trace() {
                tracing::debug!(
                    server_transaction_id = response_transaction.server_transaction_id,
                    "Received response",
                );
            }

            match response_transaction.client_transaction_id {
                Some(received_client_transaction_id)
                    if received_client_transaction_id
                        != request_transaction.client_transaction_id =>
                {
                    tracing::warn!(
                        sent = request_transaction.client_transaction_id,
                        received = received_client_transaction_id,
                        "ClientTransactionID mismatch",
                    );
                }
                _ => {}
            }

            Ok::<_, Error>(response)
        }
        .map_err(|err| {
            tracing::error!(%err, "Alpaca request failed");
            err
        })
        .instrument(span)
        .await
    }
}

fn command_params(command: &str, raw: bool) -> Params {
    Params::new().with("Command", command).with("Raw", raw)
}
