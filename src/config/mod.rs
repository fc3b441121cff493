//! Connection parameters of a remote driver.

mod profile;
pub use profile::{JsonFileProfile, MemoryProfile, ProfileKey, ProfileStore};

use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use std::time::Duration;

/// How image arrays should be transferred by camera drivers.
#[derive(
    Debug,
    Default,
    PartialEq,
    Eq,
    Clone,
    Copy,
    Serialize_repr,
    Deserialize_repr,
    TryFromPrimitive,
    IntoPrimitive,
)]
#[repr(i32)]
pub enum ImageArrayTransferType {
    /// Plain JSON arrays.
    Json = 0,
    /// JSON metadata with a separate base64 download.
    Base64HandOff = 1,
    /// Binary `application/imagebytes` payload.
    ImageBytes = 2,
    /// Let the client pick the most efficient mechanism the server supports.
    #[default]
    BestAvailable = 3,
}

/// Compression requested for image array transfers.
#[derive(
    Debug,
    Default,
    PartialEq,
    Eq,
    Clone,
    Copy,
    Serialize_repr,
    Deserialize_repr,
    TryFromPrimitive,
    IntoPrimitive,
)]
#[repr(i32)]
pub enum ImageArrayCompression {
    /// No compression.
    #[default]
    None = 0,
    /// Deflate only.
    Deflate = 1,
    /// GZip only.
    GZip = 2,
    /// Whichever of GZip or Deflate the server prefers.
    GZipOrDeflate = 3,
}

/// Named timeout budget, selected per call kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum TimeoutTier {
    /// Opening or closing the connection.
    #[display("establish")]
    Establish,
    /// Simple property reads and writes.
    #[display("standard")]
    Standard,
    /// Movement and other state-changing commands that may block on the server.
    #[display("long")]
    Long,
}

/// Basic authentication credentials.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, derive_more::Debug)]
pub struct Credentials {
    /// User name.
    pub username: String,
    /// Password. Never logged.
    #[debug("<{} chars>", password.len())]
    pub password: String,
}

/// Immutable snapshot of the connection parameters of one remote driver.
///
/// Missing fields of a persisted record are filled in from [`Default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// Host name or IP address of the remote Alpaca server.
    pub host: String,
    /// TCP port of the remote Alpaca server.
    pub port: u16,
    /// `http` or `https`.
    pub scheme: String,
    /// Device number on the remote server.
    pub device_number: u32,
    /// Timeout for connection open/close, in milliseconds.
    pub establish_timeout_ms: u64,
    /// Timeout for simple property reads, in milliseconds.
    pub standard_timeout_ms: u64,
    /// Timeout for long-running commands, in milliseconds.
    pub long_timeout_ms: u64,
    /// Optional basic auth credentials.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials: Option<Credentials>,
    /// When set, `Connected` changes are tracked locally and never sent to the server.
    pub manage_connect_locally: bool,
    /// Image array transfer mechanism for camera drivers.
    pub image_array_transfer_type: ImageArrayTransferType,
    /// Image array compression for camera drivers.
    pub image_array_compression: ImageArrayCompression,
    /// Log request/response summaries.
    pub trace: bool,
    /// Additionally log raw response bodies.
    pub debug_trace: bool,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 11111,
            scheme: "http".to_owned(),
            device_number: 0,
            establish_timeout_ms: 1_000,
            standard_timeout_ms: 3_000,
            long_timeout_ms: 100_000,
            credentials: None,
            manage_connect_locally: false,
            image_array_transfer_type: ImageArrayTransferType::default(),
            image_array_compression: ImageArrayCompression::default(),
            trace: true,
            debug_trace: false,
        }
    }
}

impl Configuration {
    /// Duration of the given timeout tier.
    pub const fn timeout(&self, tier: TimeoutTier) -> Duration {
        Duration::from_millis(match tier {
            TimeoutTier::Establish => self.establish_timeout_ms,
            TimeoutTier::Standard => self.standard_timeout_ms,
            TimeoutTier::Long => self.long_timeout_ms,
        })
    }

    /// Check that the record describes a usable endpoint.
    pub fn validate(&self) -> eyre::Result<()> {
        eyre::ensure!(
            matches!(self.scheme.as_str(), "http" | "https"),
            "Unsupported scheme {:?}, expected \"http\" or \"https\"",
            self.scheme
        );
        eyre::ensure!(
            cfg!(feature = "rustls") || self.scheme != "https",
            "The \"https\" scheme requires the `rustls` feature"
        );
        eyre::ensure!(!self.host.trim().is_empty(), "Host must not be empty");
        eyre::ensure!(self.port != 0, "Port must not be zero");
        for tier in [
            TimeoutTier::Establish,
            TimeoutTier::Standard,
            TimeoutTier::Long,
        ] {
            eyre::ensure!(
                !self.timeout(tier).is_zero(),
                "The {tier} timeout must not be zero"
            );
        }
        if let Some(credentials) = &self.credentials {
            eyre::ensure!(
                !credentials.username.is_empty(),
                "Credentials must include a user name"
            );
        }
        Ok(())
    }

    /// Host formatted for use inside a URL authority.
    pub(crate) fn url_host(&self) -> String {
        let host = self.host.trim();
        if host.contains(':') && !host.starts_with('[') {
            format!("[{host}]")
        } else {
            host.to_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() -> eyre::Result<()> {
        let config = Configuration::default();
        config.validate()?;
        assert_eq!(config.timeout(TimeoutTier::Standard), Duration::from_secs(3));
        Ok(())
    }

    #[test]
    fn rejects_bad_records() {
        let bad = [
            Configuration {
                scheme: "ftp".to_owned(),
                ..Configuration::default()
            },
            Configuration {
                host: " ".to_owned(),
                ..Configuration::default()
            },
            Configuration {
                port: 0,
                ..Configuration::default()
            },
            Configuration {
                long_timeout_ms: 0,
                ..Configuration::default()
            },
            Configuration {
                credentials: Some(Credentials {
                    username: String::new(),
                    password: "secret".to_owned(),
                }),
                ..Configuration::default()
            },
        ];

        for config in bad {
            assert!(config.validate().is_err(), "{config:?} should be rejected");
        }
    }

    #[cfg(not(feature = "rustls"))]
    #[test]
    fn https_needs_tls_support() {
        let config = Configuration {
            scheme: "https".to_owned(),
            ..Configuration::default()
        };
        let err = config.validate().expect_err("built without TLS");
        assert!(err.to_string().contains("rustls"), "{err}");
    }

    #[test]
    fn password_is_redacted() {
        let config = Configuration {
            credentials: Some(Credentials {
                username: "observer".to_owned(),
                password: "hunter2".to_owned(),
            }),
            ..Configuration::default()
        };
        let debug = format!("{config:?}");
        assert!(debug.contains("observer"));
        assert!(debug.contains("<7 chars>"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn partial_record_fills_defaults() -> eyre::Result<()> {
        let config: Configuration =
            serde_json::from_str(r#"{"host":"10.0.0.5","image_array_transfer_type":2}"#)?;
        assert_eq!(config.host, "10.0.0.5");
        assert_eq!(config.port, 11111);
        assert_eq!(
            config.image_array_transfer_type,
            ImageArrayTransferType::ImageBytes
        );
        Ok(())
    }

    #[test]
    fn ipv6_hosts_are_bracketed() {
        let config = Configuration {
            host: "::1".to_owned(),
            ..Configuration::default()
        };
        assert_eq!(config.url_host(), "[::1]");
    }
}
