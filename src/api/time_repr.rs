use crate::params::ASCOMParam;
use crate::{Error, Result};
use serde::Deserialize;
use std::time::SystemTime;
use time::OffsetDateTime;
use time::format_description::FormatItem;
use time::format_description::well_known::Iso8601;
use time::macros::format_description;

/// Alpaca UTC timestamps: ISO 8601 with seven fractional digits and a `Z` suffix.
const UTC_DATE_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:7]Z");

fn parse_utc_date(s: &str) -> eyre::Result<SystemTime> {
    // Servers differ in the number of fractional digits and the offset notation.
    Ok(OffsetDateTime::parse(s.trim(), &Iso8601::DEFAULT)?.into())
}

fn format_utc_date(value: SystemTime) -> Result<String> {
    let offset = match value.duration_since(SystemTime::UNIX_EPOCH) {
        Ok(after) => time::Duration::try_from(after).ok(),
        Err(before) => time::Duration::try_from(before.duration())
            .ok()
            .map(|before| -before),
    };

    offset
        .and_then(|offset| OffsetDateTime::UNIX_EPOCH.checked_add(offset))
        .ok_or_else(|| Error::Protocol(format!("{value:?} is outside the Alpaca date range")))?
        .format(UTC_DATE_FORMAT)
        .map_err(|err| {
            Error::Protocol(format!("Couldn't format {value:?} as an Alpaca date: {err}"))
        })
}

/// UTC date decoded from a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct UtcDate(SystemTime);

impl From<UtcDate> for SystemTime {
    fn from(wrapper: UtcDate) -> Self {
        wrapper.0
    }
}

impl<'de> Deserialize<'de> for UtcDate {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        let s = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
        parse_utc_date(&s)
            .map(Self)
            .map_err(serde::de::Error::custom)
    }
}

/// UTC date already encoded for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct UtcDateParam(String);

impl TryFrom<SystemTime> for UtcDateParam {
    type Error = Error;

    fn try_from(value: SystemTime) -> Result<Self> {
        format_utc_date(value).map(Self)
    }
}

impl ASCOMParam for UtcDateParam {
    fn from_param(s: &str) -> eyre::Result<Self> {
        Ok(Self::try_from(parse_utc_date(s)?)?)
    }

    fn to_param(&self) -> String {
        self.0.clone()
    }
}
