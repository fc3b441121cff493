use crate::api::DeviceType;
use crate::config::{Configuration, Credentials, TimeoutTier};
use crate::{Error, Result};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

#[derive(Debug)]
struct SessionInner {
    // `None` once closed. Dropping the client releases its connection pool.
    http: Mutex<Option<reqwest::Client>>,
    base_url: reqwest::Url,
    establish_timeout: Duration,
    standard_timeout: Duration,
    long_timeout: Duration,
    timeout_ms: AtomicU64,
    credentials: Option<Credentials>,
    trace: bool,
    debug_trace: bool,
}

/// Reusable HTTP connection context bound to one remote device endpoint.
///
/// Cheap to clone; clones share the same connection pool, the same active
/// timeout and the same closed state.
#[derive(Debug, Clone)]
pub struct Session(Arc<SessionInner>);

impl Session {
    /// Open a session to the device described by `config`.
    ///
    /// Fails with [`Error::Connection`] if the record is invalid or the
    /// endpoint doesn't accept TCP connections within the establish timeout.
    /// The active timeout of the new session is the standard tier.
    #[tracing::instrument(level = "debug", skip(config), fields(host = %config.host, port = config.port, device_number = config.device_number))]
    pub async fn open(config: &Configuration, device_type: DeviceType) -> Result<Self> {
        config
            .validate()
            .map_err(|err| Error::Connection(format!("{err:#}")))?;

        let base_url = format!(
            "{scheme}://{host}:{port}/api/v1/{device_type}/{device_number}/",
            scheme = config.scheme,
            host = config.url_host(),
            port = config.port,
            device_number = config.device_number,
        )
        .parse::<reqwest::Url>()
        .map_err(|err| Error::Connection(format!("Invalid endpoint URL: {err}")))?;

        let establish_timeout = config.timeout(TimeoutTier::Establish);

        let http = reqwest::Client::builder()
            .connect_timeout(establish_timeout)
            .build()
            .map_err(|err| Error::Connection(format!("Couldn't create HTTP client: {err}")))?;

        let addr = (config.host.trim(), config.port);
        match tokio::time::timeout(establish_timeout, tokio::net::TcpStream::connect(addr)).await {
            Ok(Ok(_probe)) => {}
            Ok(Err(err)) => {
                return Err(Error::Connection(format!(
                    "{}:{} is unreachable: {err}",
                    config.host, config.port
                )));
            }
            Err(_) => {
                return Err(Error::Connection(format!(
                    "{}:{} didn't respond within {establish_timeout:?}",
                    config.host, config.port
                )));
            }
        }

        tracing::debug!(%base_url, "Session opened");

        let standard_timeout = config.timeout(TimeoutTier::Standard);

        Ok(Self(Arc::new(SessionInner {
            http: Mutex::new(Some(http)),
            base_url,
            establish_timeout,
            standard_timeout,
            long_timeout: config.timeout(TimeoutTier::Long),
            timeout_ms: AtomicU64::new(duration_to_ms(standard_timeout)),
            credentials: config.credentials.clone(),
            trace: config.trace,
            debug_trace: config.debug_trace,
        })))
    }

    /// Set the timeout applied to subsequent requests.
    pub fn set_timeout(&self, timeout: Duration) {
        self.0
            .timeout_ms
            .store(duration_to_ms(timeout), Ordering::Relaxed);
    }

    /// Set the active timeout to one of the configured tiers.
    pub fn set_tier(&self, tier: TimeoutTier) {
        self.set_timeout(self.tier_timeout(tier));
    }

    /// Configured duration of a timeout tier.
    pub fn tier_timeout(&self, tier: TimeoutTier) -> Duration {
        match tier {
            TimeoutTier::Establish => self.0.establish_timeout,
            TimeoutTier::Standard => self.0.standard_timeout,
            TimeoutTier::Long => self.0.long_timeout,
        }
    }

    /// Currently active timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.0.timeout_ms.load(Ordering::Relaxed))
    }

    /// Release the session and its pooled connections. Idempotent.
    ///
    /// Requests issued afterwards fail with [`Error::SessionClosed`]. Requests
    /// already in flight run to completion.
    pub fn close(&self) {
        if let Some(http) = self.http_slot().take() {
            drop(http);
            tracing::debug!(base_url = %self.0.base_url, "Session closed");
        }
    }

    /// Whether [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.http_slot().is_none()
    }

    fn http_slot(&self) -> MutexGuard<'_, Option<reqwest::Client>> {
        self.0.http.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Device endpoint all request paths are resolved against.
    pub fn base_url(&self) -> &reqwest::Url {
        &self.0.base_url
    }

    /// HTTP client of an open session.
    pub(crate) fn http(&self) -> Result<reqwest::Client> {
        self.http_slot().clone().ok_or(Error::SessionClosed)
    }

    pub(crate) fn credentials(&self) -> Option<&Credentials> {
        self.0.credentials.as_ref()
    }

    pub(crate) fn trace(&self) -> bool {
        self.0.trace
    }

    pub(crate) fn debug_trace(&self) -> bool {
        self.0.debug_trace
    }
}

fn duration_to_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockServer;

    #[tokio::test]
    async fn invalid_config_is_a_connection_error() {
        let config = Configuration {
            scheme: "gopher".to_owned(),
            ..Configuration::default()
        };
        let err = Session::open(&config, DeviceType::Rotator)
            .await
            .expect_err("invalid scheme must be rejected");
        assert!(matches!(err, Error::Connection(_)), "{err:?}");
    }

    #[cfg(not(feature = "rustls"))]
    #[tokio::test]
    async fn https_without_tls_is_a_connection_error() -> eyre::Result<()> {
        let server = MockServer::start().await?;
        let config = Configuration {
            scheme: "https".to_owned(),
            ..server.config()
        };
        let err = Session::open(&config, DeviceType::Rotator)
            .await
            .expect_err("TLS support is not compiled in");
        assert!(matches!(err, Error::Connection(_)), "{err:?}");
        assert!(server.requests().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_connection_error() -> eyre::Result<()> {
        // Bind and immediately release a port so nothing listens on it.
        let port = std::net::TcpListener::bind("127.0.0.1:0")?.local_addr()?.port();
        let config = Configuration {
            port,
            ..Configuration::default()
        };
        let err = Session::open(&config, DeviceType::Focuser)
            .await
            .expect_err("nothing listens on the port");
        assert!(matches!(err, Error::Connection(_)), "{err:?}");
        Ok(())
    }

    #[tokio::test]
    async fn tiers_and_close() -> eyre::Result<()> {
        let server = MockServer::start().await?;
        let config = Configuration {
            standard_timeout_ms: 2_000,
            long_timeout_ms: 60_000,
            ..server.config()
        };
        let session = Session::open(&config, DeviceType::Rotator).await?;

        assert_eq!(session.timeout(), Duration::from_secs(2));
        session.set_tier(TimeoutTier::Long);
        assert_eq!(session.timeout(), Duration::from_secs(60));
        session.set_timeout(Duration::from_millis(250));
        assert_eq!(session.clone().timeout(), Duration::from_millis(250));

        assert_eq!(
            session.base_url().path(),
            format!("/api/v1/rotator/{}/", config.device_number)
        );

        assert!(!session.is_closed());
        let clone = session.clone();
        session.close();
        session.close();
        assert!(session.is_closed());
        assert!(clone.is_closed());
        assert!(matches!(clone.http(), Err(Error::SessionClosed)));
        Ok(())
    }
}
