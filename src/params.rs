//! Invariant wire encoding of request parameters.
//!
//! Every value crossing the wire is turned into text here and nowhere else.
//! The encoding never consults the host locale: a remote parser running under
//! a different culture must read `1.5` as one and a half, never as `15` or an
//! error, so floats are always written with a `.` decimal separator and no
//! grouping.

use eyre::Context;
use indexmap::IndexMap;
use serde::Serialize;

/// A value that can be sent as an Alpaca request parameter.
pub trait ASCOMParam: Sized {
    /// Parse a value from its wire representation.
    fn from_param(s: &str) -> eyre::Result<Self>;

    /// Canonical, locale-independent wire representation.
    fn to_param(&self) -> String;
}

impl ASCOMParam for String {
    fn from_param(s: &str) -> eyre::Result<Self> {
        Ok(s.to_owned())
    }

    fn to_param(&self) -> String {
        self.clone()
    }
}

impl ASCOMParam for &str {
    fn from_param(_s: &str) -> eyre::Result<Self> {
        eyre::bail!("borrowed strings can only be encoded")
    }

    fn to_param(&self) -> String {
        (*self).to_owned()
    }
}

impl ASCOMParam for bool {
    fn from_param(s: &str) -> eyre::Result<Self> {
        if s.eq_ignore_ascii_case("true") {
            Ok(true)
        } else if s.eq_ignore_ascii_case("false") {
            Ok(false)
        } else {
            eyre::bail!(r#"Invalid bool value {s:?}, expected "True" or "False""#)
        }
    }

    fn to_param(&self) -> String {
        (if *self { "True" } else { "False" }).to_owned()
    }
}

macro_rules! simple_ascom_param {
    ($($ty:ty),*) => {
        $(
            impl ASCOMParam for $ty {
                fn from_param(s: &str) -> eyre::Result<Self> {
                    s.trim()
                        .parse()
                        .with_context(|| format!("Invalid {} value {s:?}", stringify!($ty)))
                }

                fn to_param(&self) -> String {
                    ToString::to_string(self)
                }
            }
        )*
    };
}

simple_ascom_param!(i32, u32, i64);

impl ASCOMParam for f64 {
    fn from_param(s: &str) -> eyre::Result<Self> {
        // Rust float parsing is locale-free and accepts `NaN` / `Infinity` in any casing.
        s.trim()
            .parse()
            .with_context(|| format!("Invalid f64 value {s:?}"))
    }

    fn to_param(&self) -> String {
        if self.is_nan() {
            "NaN".to_owned()
        } else if self.is_infinite() {
            (if self.is_sign_positive() {
                "Infinity"
            } else {
                "-Infinity"
            })
            .to_owned()
        } else {
            // `Display` for floats is the shortest round-trip form with a `.` separator.
            self.to_string()
        }
    }
}

/// Implements [`ASCOMParam`] for `#[repr(i32)]` enums via their integer value.
macro_rules! ascom_enum_param {
    ($($name:ty),* $(,)?) => {
        $(
            impl $crate::params::ASCOMParam for $name {
                fn from_param(s: &str) -> eyre::Result<Self> {
                    Ok(<Self as num_enum::TryFromPrimitive>::try_from_primitive(
                        $crate::params::ASCOMParam::from_param(s)?,
                    )?)
                }

                fn to_param(&self) -> String {
                    let primitive: i32 = (*self).into();
                    $crate::params::ASCOMParam::to_param(&primitive)
                }
            }
        )*
    };
}
pub(crate) use ascom_enum_param;

/// Ordered request parameters, already in their wire representation.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Params(IndexMap<Box<str>, String>);

impl Params {
    /// Create an empty parameter list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode and append a parameter.
    ///
    /// Re-inserting an existing name replaces the value but keeps its position.
    pub fn insert<T: ASCOMParam>(&mut self, name: &str, value: T) {
        let _ = self.0.insert(name.into(), value.to_param());
    }

    /// Builder-style variant of [`insert`](Self::insert).
    #[must_use]
    pub fn with<T: ASCOMParam>(mut self, name: &str, value: T) -> Self {
        self.insert(name, value);
        self
    }

    /// Look up an encoded parameter by its exact name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Iterate over encoded parameters in insertion order.
    pub fn iter(&self) -> impl '_ + Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(name, value)| (&**name, value.as_str()))
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
