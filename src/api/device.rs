use super::{DeviceAdapter, DeviceKind};
use crate::Result;
use crate::client::Method;
use crate::config::TimeoutTier;
use crate::params::Params;
use std::fmt::Debug;

/// ASCOM methods common to all devices.
#[async_trait::async_trait]
pub trait Device: Debug + Send + Sync {
    /// Invoke a device-specific action.
    ///
    /// The list of action names supported by the remote driver can be discovered
    /// through [`supported_actions`](Self::supported_actions).
    async fn action(&self, action: &str, parameters: &str) -> Result<String>;

    /// Transmit an arbitrary string to the device and don't wait for a response.
    ///
    /// If `raw` is false, protocol framing characters may be added by the remote driver.
    async fn command_blind(&self, command: &str, raw: bool) -> Result;

    /// Transmit an arbitrary string to the device and wait for a boolean response.
    async fn command_bool(&self, command: &str, raw: bool) -> Result<bool>;

    /// Transmit an arbitrary string to the device and wait for a string response.
    async fn command_string(&self, command: &str, raw: bool) -> Result<String>;

    /// Whether this driver is connected.
    async fn connected(&self) -> Result<bool>;

    /// Connect to or disconnect from the device.
    ///
    /// Does nothing if the driver is already in the requested state.
    async fn set_connected(&self, connected: bool) -> Result;

    /// True while a connection is being established.
    async fn connecting(&self) -> Result<bool>;

    /// The description of the device.
    async fn description(&self) -> Result<String>;

    /// The description of the driver.
    async fn driver_info(&self) -> Result<String>;

    /// A string containing only the major and minor version of the driver.
    async fn driver_version(&self) -> Result<String>;

    /// The version of the ASCOM device interface contract the device complies with.
    async fn interface_version(&self) -> Result<i32>;

    /// The name of the device.
    async fn name(&self) -> Result<String>;

    /// The list of action names supported by the remote driver.
    async fn supported_actions(&self) -> Result<Vec<String>>;
}

#[async_trait::async_trait]
impl<T: ?Sized + DeviceKind> Device for DeviceAdapter<T> {
    async fn action(&self, action: &str, parameters: &str) -> Result<String> {
        self.exec(
            Method::Put,
            "action",
            Params::new()
                .with("Action", action)
                .with("Parameters", parameters),
            TimeoutTier::Long,
        )
        .await
    }

    async fn command_blind(&self, command: &str, raw: bool) -> Result {
        self.exec(
            Method::Put,
            "commandblind",
            Params::new().with("Command", command).with("Raw", raw),
            TimeoutTier::Long,
        )
        .await
    }

    async fn command_bool(&self, command: &str, raw: bool) -> Result<bool> {
        self.exec(
            Method::Put,
            "commandbool",
            Params::new().with("Command", command).with("Raw", raw),
            TimeoutTier::Long,
        )
        .await
    }

    async fn command_string(&self, command: &str, raw: bool) -> Result<String> {
        self.exec(
            Method::Put,
            "commandstring",
            Params::new().with("Command", command).with("Raw", raw),
            TimeoutTier::Long,
        )
        .await
    }

    async fn connected(&self) -> Result<bool> {
        Ok(self.connection_state() == super::ConnectionState::Connected)
    }

    async fn set_connected(&self, connected: bool) -> Result {
        self.transition_to(connected).await
    }

    async fn connecting(&self) -> Result<bool> {
        Ok(self.connection_state() == super::ConnectionState::Connecting)
    }

    async fn description(&self) -> Result<String> {
        self.exec(Method::Get, "description", Params::new(), TimeoutTier::Standard)
            .await
    }

    async fn driver_info(&self) -> Result<String> {
        let remote: String = self
            .exec(Method::Get, "driverinfo", Params::new(), TimeoutTier::Standard)
            .await?;
        Ok(format!(
            "{} v{} - REMOTE DEVICE: {remote}",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
        ))
    }

    async fn driver_version(&self) -> Result<String> {
        self.exec(Method::Get, "driverversion", Params::new(), TimeoutTier::Standard)
            .await
    }

    async fn interface_version(&self) -> Result<i32> {
        self.exec(
            Method::Get,
            "interfaceversion",
            Params::new(),
            TimeoutTier::Standard,
        )
        .await
    }

    async fn name(&self) -> Result<String> {
        let remote: String = self
            .exec(Method::Get, "name", Params::new(), TimeoutTier::Standard)
            .await?;
        let name = format!("{} REMOTE DRIVER: {remote}", self.display_name());
        if self.trace_enabled().await {
            tracing::info!(%name, "Decorated device name");
        }
        Ok(name)
    }

    async fn supported_actions(&self) -> Result<Vec<String>> {
        self.exec(
            Method::Get,
            "supportedactions",
            Params::new(),
            TimeoutTier::Standard,
        )
        .await
    }
}
