use crate::Result;
use macro_rules_attribute::apply;

/// Rotator specific methods.
#[apply(device_interface)]
pub trait Rotator: Device {
    /// True if the rotator supports the Reverse method.
    #[http("canreverse", method = Get)]
    async fn can_reverse(&self) -> Result<bool>;

    /// True if the rotator is currently moving to a new position.
    #[http("ismoving", method = Get)]
    async fn is_moving(&self) -> Result<bool>;

    /// Raw mechanical position of the rotator, in degrees.
    #[http("mechanicalposition", method = Get)]
    async fn mechanical_position(&self) -> Result<f64>;

    /// Current instantaneous rotator position, in degrees.
    #[http("position", method = Get)]
    async fn position(&self) -> Result<f64>;

    /// The rotator's Reverse state.
    #[http("reverse", method = Get)]
    async fn reverse(&self) -> Result<bool>;

    /// Set the rotator's Reverse state.
    #[http("reverse", method = Put)]
    async fn set_reverse(&self, #[http("Reverse")] reverse: bool) -> Result;

    /// The minimum step size, in degrees.
    #[http("stepsize", method = Get)]
    async fn step_size(&self) -> Result<f64>;

    /// The destination position angle for `move_` and `move_absolute`.
    #[http("targetposition", method = Get)]
    async fn target_position(&self) -> Result<f64>;

    /// Immediately stop any rotator motion.
    #[http("halt", method = Put, tier = Long)]
    async fn halt(&self) -> Result;

    /// Move `position` degrees relative to the current position.
    #[http("move", method = Put, tier = Long)]
    async fn move_(&self, #[http("Position")] position: f64) -> Result;

    /// Move to the absolute position angle of `position` degrees.
    #[http("moveabsolute", method = Put, tier = Long)]
    async fn move_absolute(&self, #[http("Position")] position: f64) -> Result;

    /// Move to the mechanical position angle of `position` degrees.
    #[http("movemechanical", method = Put, tier = Long)]
    async fn move_mechanical(&self, #[http("Position")] position: f64) -> Result;

    /// Sync the current position angle to `position` degrees.
    #[http("sync", method = Put, tier = Long)]
    async fn sync(&self, #[http("Position")] position: f64) -> Result;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RotatorClient;
    use crate::config::{MemoryProfile, ProfileKey, ProfileStore};
    use crate::test_utils::MockServer;
    use crate::{ASCOMErrorCode, ClientIdRegistry, Error};
    use std::sync::Arc;

    async fn rotator(server: &MockServer) -> eyre::Result<RotatorClient> {
        let profile = Arc::new(MemoryProfile::new());
        profile.save(
            &ProfileKey {
                device_type: crate::api::DeviceType::Rotator,
                driver_id: "ascom.remote1.rotator".to_owned(),
            },
            &server.config(),
        )?;
        Ok(RotatorClient::new(
            &ClientIdRegistry::new(),
            profile,
            "ascom.remote1.rotator",
            "ASCOM Remote Rotator 1",
        )
        .await?)
    }

    #[tokio::test]
    async fn reverse_round_trips() -> eyre::Result<()> {
        let server = MockServer::start().await?;
        let rotator = rotator(&server).await?;

        rotator.set_reverse(true).await?;
        assert!(rotator.reverse().await?);
        rotator.set_reverse(false).await?;
        assert!(!rotator.reverse().await?);
        Ok(())
    }

    #[tokio::test]
    async fn moves_send_invariant_positions() -> eyre::Result<()> {
        let server = MockServer::start().await?;
        let rotator = rotator(&server).await?;

        rotator.move_absolute(1.5).await?;
        rotator.move_(-0.25).await?;
        rotator.move_mechanical(359.875).await?;
        rotator.sync(180.0).await?;
        rotator.halt().await?;

        let sent = server
            .requests()
            .into_iter()
            .map(|request| {
                (
                    request.action.clone(),
                    request.param("Position").map(str::to_owned),
                )
            })
            .collect::<Vec<_>>();
        assert_eq!(
            sent,
            [
                ("moveabsolute".to_owned(), Some("1.5".to_owned())),
                ("move".to_owned(), Some("-0.25".to_owned())),
                ("movemechanical".to_owned(), Some("359.875".to_owned())),
                ("sync".to_owned(), Some("180".to_owned())),
                ("halt".to_owned(), None),
            ]
        );
        assert!(server.requests().iter().all(|request| request.method == "PUT"
            && request.device_type == "rotator"));
        Ok(())
    }

    #[tokio::test]
    async fn move_reports_remote_error() -> eyre::Result<()> {
        let server = MockServer::start().await?;
        server.fail_with("move", ASCOMErrorCode::new(1025), "not connected");
        let rotator = rotator(&server).await?;

        match rotator.move_(10.0).await {
            Err(Error::Remote(err)) => {
                assert_eq!(err.code, ASCOMErrorCode::new(1025));
                assert_eq!(err.message, "not connected");
            }
            other => eyre::bail!("unexpected result {other:?}"),
        }
        Ok(())
    }

    #[tokio::test]
    async fn unimplemented_property() -> eyre::Result<()> {
        let server = MockServer::start().await?;
        let rotator = rotator(&server).await?;

        let err = rotator.step_size().await.expect_err("not configured on the server");
        assert_eq!(err.remote_code(), Some(ASCOMErrorCode::NOT_IMPLEMENTED));
        Ok(())
    }
}
