/*!
ASCOM device interfaces proxied to a remote Alpaca server.

Every interface is implemented by the same generic [`DeviceAdapter`]. Each
operation of an interface is declared once, together with its Alpaca resource
name, HTTP verb and timeout tier, and maps 1:1 onto a single request.

Alpaca device URLs are of the form
`http(s)://host:port/api/v1/{device_type}/{device_number}/{operation}`, all
lower case. Parameter names are case-insensitive; GET parameters travel in the
query string and PUT parameters in a form-encoded body.
*/

#![expect(clippy::doc_markdown)]

#[macro_use]
mod macros;

mod adapter;
pub use adapter::{ConnectionState, DeviceAdapter};

/// Methods common to all devices.
pub mod device;
pub use device::Device;

#[cfg(feature = "telescope")]
mod time_repr;

/// Alpaca device type, as used in device URLs and profile keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub enum DeviceType {
    /// Filter wheel.
    #[cfg(feature = "filter_wheel")]
    #[display("filterwheel")]
    FilterWheel,
    /// Focuser.
    #[cfg(feature = "focuser")]
    #[display("focuser")]
    Focuser,
    /// Rotator.
    #[cfg(feature = "rotator")]
    #[display("rotator")]
    Rotator,
    /// Safety monitor.
    #[cfg(feature = "safety_monitor")]
    #[display("safetymonitor")]
    SafetyMonitor,
    /// Switch.
    #[cfg(feature = "switch")]
    #[display("switch")]
    Switch,
    /// Telescope.
    #[cfg(feature = "telescope")]
    #[display("telescope")]
    Telescope,
}

/// Links a device interface (as `dyn Trait`) to its Alpaca device type.
pub trait DeviceKind: 'static {
    /// Device type used in URLs and profile keys.
    const TYPE: DeviceType;
}

#[cfg(feature = "filter_wheel")]
mod filter_wheel;
#[cfg(feature = "filter_wheel")]
pub use filter_wheel::FilterWheel;
/// Remote filter wheel driver.
#[cfg(feature = "filter_wheel")]
pub type FilterWheelClient = DeviceAdapter<dyn FilterWheel>;

#[cfg(feature = "focuser")]
mod focuser;
#[cfg(feature = "focuser")]
pub use focuser::Focuser;
/// Remote focuser driver.
#[cfg(feature = "focuser")]
pub type FocuserClient = DeviceAdapter<dyn Focuser>;

#[cfg(feature = "rotator")]
mod rotator;
#[cfg(feature = "rotator")]
pub use rotator::Rotator;
/// Remote rotator driver.
#[cfg(feature = "rotator")]
pub type RotatorClient = DeviceAdapter<dyn Rotator>;

#[cfg(feature = "safety_monitor")]
mod safety_monitor;
#[cfg(feature = "safety_monitor")]
pub use safety_monitor::SafetyMonitor;
/// Remote safety monitor driver.
#[cfg(feature = "safety_monitor")]
pub type SafetyMonitorClient = DeviceAdapter<dyn SafetyMonitor>;

#[cfg(feature = "switch")]
mod switch;
#[cfg(feature = "switch")]
pub use switch::Switch;
/// Remote switch driver.
#[cfg(feature = "switch")]
pub type SwitchClient = DeviceAdapter<dyn Switch>;

/// Types used by the [`Telescope`] interface.
#[cfg(feature = "telescope")]
pub mod telescope;
#[cfg(feature = "telescope")]
pub use telescope::Telescope;
/// Remote telescope driver.
#[cfg(feature = "telescope")]
pub type TelescopeClient = DeviceAdapter<dyn Telescope>;
