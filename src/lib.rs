/*!
Client-side remote drivers for ASCOM devices.

Each driver in this crate looks like a local ASCOM device to the application
using it, and forwards every operation as a single Alpaca HTTP request to a
device hosted on a remote Alpaca server.

```no_run
use ascom_remote::api::{Device, Rotator};
use ascom_remote::{ClientIdRegistry, JsonFileProfile, RotatorClient};
use std::sync::Arc;

# async fn example() -> ascom_remote::Result {
let registry = ClientIdRegistry::new();
let profile = Arc::new(JsonFileProfile::new("profiles"));

let rotator = RotatorClient::new(&registry, profile, "ascom.remote1.rotator", "ASCOM Remote Rotator 1").await?;
rotator.set_connected(true).await?;
rotator.move_absolute(90.0).await?;
# Ok(())
# }
```

Endpoint, timeouts and credentials are read from a per-driver
[`Configuration`] stored in a [`ProfileStore`]. Missing fields fall back to
defaults, so a driver always starts even without a stored profile.
*/

#[macro_use]
mod macros;

mod errors;
pub use errors::{ASCOMError, ASCOMErrorCode, Error, Result, TransportErrorKind};

mod params;
pub use params::{ASCOMParam, Params};

mod response;

pub mod config;
pub use config::{
    Configuration, Credentials, ImageArrayCompression, ImageArrayTransferType, JsonFileProfile,
    MemoryProfile, ProfileKey, ProfileStore, TimeoutTier,
};

pub mod client;
pub use client::{ClientId, ClientIdRegistry, Method, RemoteClient, Session};

pub mod api;
pub use api::{ConnectionState, Device, DeviceAdapter, DeviceKind, DeviceType};

#[cfg(feature = "filter_wheel")]
pub use api::FilterWheelClient;
#[cfg(feature = "focuser")]
pub use api::FocuserClient;
#[cfg(feature = "rotator")]
pub use api::RotatorClient;
#[cfg(feature = "safety_monitor")]
pub use api::SafetyMonitorClient;
#[cfg(feature = "switch")]
pub use api::SwitchClient;
#[cfg(feature = "telescope")]
pub use api::TelescopeClient;

#[cfg(test)]
mod test_utils;
