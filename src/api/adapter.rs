use super::DeviceKind;
use crate::client::{ClientId, ClientIdRegistry, Method, RemoteClient, Session};
use crate::config::{Configuration, ProfileKey, ProfileStore, TimeoutTier};
use crate::errors::TransportErrorKind;
use crate::params::Params;
use crate::{Error, Result};
use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::de::DeserializeOwned;
use std::fmt::{self, Debug};
use std::marker::PhantomData;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use tokio::sync::{Mutex, RwLock};

/// Connection state of a [`DeviceAdapter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum ConnectionState {
    /// Not connected. The initial state.
    Disconnected = 0,
    /// A connect request is in flight.
    Connecting = 1,
    /// Connected to the remote device.
    Connected = 2,
}

#[derive(Debug)]
struct Live {
    config: Configuration,
    client: RemoteClient,
}

/// Client-side remote driver for one device of the interface `T`.
///
/// `T` is the device interface as a trait object, e.g. `DeviceAdapter<dyn Rotator>`;
/// see the type aliases in [`crate::api`].
pub struct DeviceAdapter<T: ?Sized> {
    driver_id: String,
    display_name: String,
    client_id: ClientId,
    profile: Arc<dyn ProfileStore>,
    live: RwLock<Live>,
    state: AtomicU8,
    // Serializes connection toggles and reconfiguration.
    transition: Mutex<()>,
    _kind: PhantomData<fn() -> Box<T>>,
}

impl<T: ?Sized> Debug for DeviceAdapter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceAdapter")
            .field("driver_id", &self.driver_id)
            .field("display_name", &self.display_name)
            .field("client_id", &self.client_id)
            .field("state", &self.connection_state())
            .finish_non_exhaustive()
    }
}

impl<T: ?Sized + DeviceKind> DeviceAdapter<T> {
    /// Create a remote driver.
    ///
    /// Loads the configuration stored under `driver_id` (defaults if there is
    /// none), allocates a client identity from `registry` and opens a session
    /// to the configured endpoint.
    #[tracing::instrument(level = "debug", skip(registry, profile), fields(device_type = %T::TYPE))]
    pub async fn new(
        registry: &ClientIdRegistry,
        profile: Arc<dyn ProfileStore>,
        driver_id: &str,
        display_name: &str,
    ) -> Result<Self> {
        let key = ProfileKey {
            device_type: T::TYPE,
            driver_id: driver_id.to_owned(),
        };
        let config = profile
            .load(&key)
            .map_err(Error::profile)?
            .unwrap_or_default();

        let client_id = registry.allocate();

        tracing::info!(
            %client_id,
            host = %config.host,
            port = config.port,
            device_number = config.device_number,
            manage_connect_locally = config.manage_connect_locally,
            username = config.credentials.as_ref().map(|c| c.username.as_str()),
            password_len = config.credentials.as_ref().map(|c| c.password.len()),
            "Creating remote driver",
        );

        let session = Session::open(&config, T::TYPE).await?;

        Ok(Self {
            driver_id: driver_id.to_owned(),
            display_name: display_name.to_owned(),
            client_id,
            profile,
            live: RwLock::new(Live {
                config,
                client: RemoteClient::new(session, client_id),
            }),
            state: AtomicU8::new(ConnectionState::Disconnected.into()),
            transition: Mutex::new(()),
            _kind: PhantomData,
        })
    }

    /// Key of the persisted configuration of this driver.
    pub fn profile_key(&self) -> ProfileKey {
        ProfileKey {
            device_type: T::TYPE,
            driver_id: self.driver_id.clone(),
        }
    }

    /// Replace the connection parameters.
    ///
    /// Refused while connected. Closes the current session, opens a new one
    /// for `config`, persists `config` and only then makes it current. If
    /// anything fails after the old session was closed, remote calls fail
    /// with [`Error::SessionClosed`] until a later reconfiguration succeeds.
    #[tracing::instrument(level = "debug", skip(self, config), fields(device_type = %T::TYPE, client_id = %self.client_id))]
    pub async fn reconfigure(&self, config: Configuration) -> Result {
        let _transition = self.transition.lock().await;

        if self.connection_state() != ConnectionState::Disconnected {
            return Err(Error::InvalidOperation(
                "Can't change the configuration while connected".into(),
            ));
        }

        config
            .validate()
            .map_err(|err| Error::Connection(format!("{err:#}")))?;

        self.live.read().await.client.session().close();

        let session = Session::open(&config, T::TYPE).await?;

        if let Err(err) = self.profile.save(&self.profile_key(), &config) {
            session.close();
            return Err(Error::profile(err));
        }

        tracing::info!(
            host = %config.host,
            port = config.port,
            device_number = config.device_number,
            "Configuration updated",
        );

        *self.live.write().await = Live {
            config,
            client: RemoteClient::new(session, self.client_id),
        };

        Ok(())
    }
}

impl<T: ?Sized> DeviceAdapter<T> {
    /// Identity this driver sends as `ClientID`.
    pub const fn client_id(&self) -> ClientId {
        self.client_id
    }

    /// Name shown to users, e.g. in decorated device names.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Snapshot of the current connection parameters.
    pub async fn configuration(&self) -> Configuration {
        self.live.read().await.config.clone()
    }

    /// Current connection state.
    pub fn connection_state(&self) -> ConnectionState {
        ConnectionState::try_from(self.state.load(Ordering::Acquire))
            .unwrap_or(ConnectionState::Disconnected)
    }

    fn set_state(&self, state: ConnectionState) {
        self.state.store(state.into(), Ordering::Release);
    }

    /// Proxy client bound to the current session, using the given timeout tier.
    pub async fn remote(&self, tier: TimeoutTier) -> RemoteClient {
        self.live.read().await.client.with_tier(tier)
    }

    pub(crate) async fn manages_connection_locally(&self) -> bool {
        self.live.read().await.config.manage_connect_locally
    }

    pub(crate) async fn trace_enabled(&self) -> bool {
        self.live.read().await.config.trace
    }

    /// Issue one remote call and track connection loss.
    pub(crate) async fn exec<R: 'static + DeserializeOwned + Debug>(
        &self,
        method: Method,
        path: &str,
        params: Params,
        tier: TimeoutTier,
    ) -> Result<R> {
        let (client, trace) = {
            let live = self.live.read().await;
            (live.client.with_tier(tier), live.config.trace)
        };
        let result = client.request::<R>(method, path, &params).await;
        self.observe(&result);
        if trace {
            match &result {
                Ok(value) => tracing::info!(path, ?value, "OK"),
                Err(err) => tracing::info!(path, %err, "Failed"),
            }
        }
        result
    }

    /// A network failure while connected means the remote end is gone.
    pub(crate) fn observe<R>(&self, result: &Result<R>) {
        if let Err(err) = result {
            if err.is_transport(TransportErrorKind::Network)
                && self
                    .state
                    .compare_exchange(
                        ConnectionState::Connected.into(),
                        ConnectionState::Disconnected.into(),
                        Ordering::AcqRel,
                        Ordering::Acquire,
                    )
                    .is_ok()
            {
                tracing::warn!(%err, "Lost connection to the remote device");
            }
        }
    }

    /// Drive the connection state machine.
    #[tracing::instrument(level = "debug", skip(self), fields(client_id = %self.client_id))]
    pub(crate) async fn transition_to(&self, connected: bool) -> Result {
        let _transition = self.transition.lock().await;

        let current = self.connection_state();
        if connected == (current == ConnectionState::Connected) {
            tracing::debug!(?current, "Already in the requested state");
            return Ok(());
        }

        let locally = self.manages_connection_locally().await;

        if connected {
            self.set_state(ConnectionState::Connecting);
            if locally {
                tracing::info!("Connection is managed locally, not contacting the remote server");
            } else if let Err(err) = self.remote(TimeoutTier::Establish).await.connect().await {
                self.set_state(ConnectionState::Disconnected);
                return Err(err);
            }
            self.set_state(ConnectionState::Connected);
            return Ok(());
        }

        if locally {
            tracing::info!("Connection is managed locally, not contacting the remote server");
        } else {
            match self.remote(TimeoutTier::Establish).await.disconnect().await {
                Ok(()) => {}
                Err(err @ (Error::Transport { .. } | Error::SessionClosed)) => {
                    tracing::warn!(%err, "Remote end is unreachable, disconnecting locally");
                }
                Err(err) => return Err(err),
            }
        }
        self.set_state(ConnectionState::Disconnected);
        Ok(())
    }
}
