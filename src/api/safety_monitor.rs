use crate::Result;
use macro_rules_attribute::apply;

/// Safety monitor specific methods.
#[apply(device_interface)]
pub trait SafetyMonitor: Device {
    /// True if conditions are safe, false if they are unsafe.
    #[http("issafe", method = Get)]
    async fn is_safe(&self) -> Result<bool>;
}
