use crate::Result;
use macro_rules_attribute::apply;

/// Switch specific methods.
///
/// Switch devices are numbered from `0` to `max_switch() - 1`.
#[apply(device_interface)]
pub trait Switch: Device {
    /// Number of switch devices managed by this driver.
    #[http("maxswitch", method = Get)]
    async fn max_switch(&self) -> Result<i32>;

    /// Whether the switch can operate asynchronously.
    #[http("canasync", method = Get)]
    async fn can_async(&self, #[http("Id")] id: i32) -> Result<bool>;

    /// Whether the switch can be written to. Limit switches and sensors can't.
    #[http("canwrite", method = Get)]
    async fn can_write(&self, #[http("Id")] id: i32) -> Result<bool>;

    /// State of the switch as a boolean.
    #[http("getswitch", method = Get)]
    async fn get_switch(&self, #[http("Id")] id: i32) -> Result<bool>;

    /// Full description of the switch.
    #[http("getswitchdescription", method = Get)]
    async fn get_switch_description(&self, #[http("Id")] id: i32) -> Result<String>;

    /// Name of the switch.
    #[http("getswitchname", method = Get)]
    async fn get_switch_name(&self, #[http("Id")] id: i32) -> Result<String>;

    /// Value of the switch, between its minimum and maximum values.
    #[http("getswitchvalue", method = Get)]
    async fn get_switch_value(&self, #[http("Id")] id: i32) -> Result<f64>;

    /// Minimum value of the switch.
    #[http("minswitchvalue", method = Get)]
    async fn min_switch_value(&self, #[http("Id")] id: i32) -> Result<f64>;

    /// Maximum value of the switch.
    #[http("maxswitchvalue", method = Get)]
    async fn max_switch_value(&self, #[http("Id")] id: i32) -> Result<f64>;

    /// Start setting the switch to a boolean state asynchronously.
    #[http("setasync", method = Put, tier = Long)]
    async fn set_async(&self, #[http("Id")] id: i32, #[http("State")] state: bool) -> Result;

    /// Start setting the switch to a value asynchronously.
    #[http("setasyncvalue", method = Put, tier = Long)]
    async fn set_async_value(&self, #[http("Id")] id: i32, #[http("Value")] value: f64) -> Result;

    /// Set the switch to a boolean state.
    #[http("setswitch", method = Put, tier = Long)]
    async fn set_switch(&self, #[http("Id")] id: i32, #[http("State")] state: bool) -> Result;

    /// Rename the switch.
    #[http("setswitchname", method = Put)]
    async fn set_switch_name(&self, #[http("Id")] id: i32, #[http("Name")] name: String) -> Result;

    /// Set the switch to a value.
    #[http("setswitchvalue", method = Put, tier = Long)]
    async fn set_switch_value(&self, #[http("Id")] id: i32, #[http("Value")] value: f64) -> Result;

    /// True once an asynchronous state change has completed.
    #[http("statechangecomplete", method = Get)]
    async fn state_change_complete(&self, #[http("Id")] id: i32) -> Result<bool>;

    /// Step size of the switch value.
    #[http("switchstep", method = Get)]
    async fn switch_step(&self, #[http("Id")] id: i32) -> Result<f64>;
}
