use crate::Result;
use macro_rules_attribute::apply;

/// Focuser specific methods.
#[apply(device_interface)]
pub trait Focuser: Device {
    /// True if the focuser can be commanded to a specific step location.
    #[http("absolute", method = Get)]
    async fn absolute(&self) -> Result<bool>;

    /// True if the focuser is currently moving to a new position.
    #[http("ismoving", method = Get)]
    async fn is_moving(&self) -> Result<bool>;

    /// Maximum number of steps allowed in one move operation.
    #[http("maxincrement", method = Get)]
    async fn max_increment(&self) -> Result<i32>;

    /// Maximum step position permitted.
    #[http("maxstep", method = Get)]
    async fn max_step(&self) -> Result<i32>;

    /// Current focuser position, in steps.
    #[http("position", method = Get)]
    async fn position(&self) -> Result<i32>;

    /// Step size, in microns.
    #[http("stepsize", method = Get)]
    async fn step_size(&self) -> Result<f64>;

    /// State of temperature compensation mode.
    #[http("tempcomp", method = Get)]
    async fn temp_comp(&self) -> Result<bool>;

    /// Set the state of temperature compensation mode.
    #[http("tempcomp", method = Put)]
    async fn set_temp_comp(&self, #[http("TempComp")] temp_comp: bool) -> Result;

    /// True if the focuser has temperature compensation available.
    #[http("tempcompavailable", method = Get)]
    async fn temp_comp_available(&self) -> Result<bool>;

    /// Current ambient temperature as measured by the focuser, in degrees Celsius.
    #[http("temperature", method = Get)]
    async fn temperature(&self) -> Result<f64>;

    /// Immediately stop any focuser motion.
    #[http("halt", method = Put, tier = Long)]
    async fn halt(&self) -> Result;

    /// Move by `position` steps or to step `position`, depending on [`absolute`](Self::absolute).
    #[http("move", method = Put, tier = Long)]
    async fn move_(&self, #[http("Position")] position: i32) -> Result;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClientIdRegistry;
    use crate::api::FocuserClient;
    use crate::config::{MemoryProfile, ProfileKey, ProfileStore};
    use crate::test_utils::MockServer;
    use std::sync::Arc;

    #[tokio::test]
    async fn focuser_operations() -> eyre::Result<()> {
        let server = MockServer::start().await?;
        server.set_value("maxstep", serde_json::json!(50_000));
        server.set_value("temperature", serde_json::json!(-3.5));
        let profile = Arc::new(MemoryProfile::new());
        profile.save(
            &ProfileKey {
                device_type: crate::api::DeviceType::Focuser,
                driver_id: "focuser".to_owned(),
            },
            &server.config(),
        )?;
        let focuser =
            FocuserClient::new(&ClientIdRegistry::new(), profile, "focuser", "Focuser").await?;

        assert_eq!(focuser.max_step().await?, 50_000);
        assert_eq!(focuser.temperature().await?, -3.5);

        focuser.set_temp_comp(true).await?;
        assert!(focuser.temp_comp().await?);

        focuser.move_(1200).await?;
        let request = server.last_request("move").expect("request recorded");
        assert_eq!(request.param("Position"), Some("1200"));
        assert_eq!(request.device_type, "focuser");
        Ok(())
    }
}
