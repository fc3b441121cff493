use crate::Result;
use macro_rules_attribute::apply;

/// Filter wheel specific methods.
#[apply(device_interface)]
pub trait FilterWheel: Device {
    /// Focus offset of each filter in the wheel.
    #[http("focusoffsets", method = Get)]
    async fn focus_offsets(&self) -> Result<Vec<i32>>;

    /// Names of the filters.
    #[http("names", method = Get)]
    async fn names(&self) -> Result<Vec<String>>;

    /// Current filter wheel position, or `-1` while moving.
    #[http("position", method = Get)]
    async fn position(&self) -> Result<i32>;

    /// Start moving the wheel to the given slot.
    #[http("position", method = Put, tier = Long)]
    async fn set_position(&self, #[http("Position")] position: i32) -> Result;
}
