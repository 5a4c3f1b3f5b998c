use std::fmt::{Display, Formatter};

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::format_description::well_known::Rfc3339;
use time::macros::{format_description, offset};
use time::{Date, OffsetDateTime, PrimitiveDateTime, UtcOffset};

use crate::ValidationError;

/// Fixed offset of `Asia/Shanghai`; no daylight saving has been observed since 1991.
pub const CHINA_OFFSET: UtcOffset = offset!(+8);

/// Timestamp attached to the offset of the exchange it was recorded on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExchangeDateTime(OffsetDateTime);

impl ExchangeDateTime {
    /// Converts nanoseconds since the Unix epoch into a zoned timestamp.
    pub fn from_epoch_nanos(nanos: i128, offset: UtcOffset) -> Result<Self, ValidationError> {
        let instant = OffsetDateTime::from_unix_timestamp_nanos(nanos)
            .map_err(|_| ValidationError::TimestampOutOfRange { nanos })?;
        Ok(Self(instant.to_offset(offset)))
    }

    /// Interprets a naive exchange-local wall-clock value in `offset`.
    pub fn from_local(local: PrimitiveDateTime, offset: UtcOffset) -> Self {
        Self(local.assume_offset(offset))
    }

    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        OffsetDateTime::parse(input, &Rfc3339)
            .map(Self)
            .map_err(|_| ValidationError::InvalidLocalTimestamp {
                value: input.to_owned(),
            })
    }

    /// Rejects a timestamp that is not expressed in `offset`.
    pub fn ensure_offset(self, offset: UtcOffset) -> Result<Self, ValidationError> {
        if self.0.offset() != offset {
            return Err(ValidationError::TimestampWrongOffset {
                value: self.format_rfc3339(),
            });
        }
        Ok(self)
    }

    pub fn epoch_nanos(self) -> i128 {
        self.0.unix_timestamp_nanos()
    }

    pub fn into_inner(self) -> OffsetDateTime {
        self.0
    }

    pub fn format_rfc3339(self) -> String {
        self.0
            .format(&Rfc3339)
            .unwrap_or_else(|_| String::from("<unformattable>"))
    }
}

impl Display for ExchangeDateTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format_rfc3339())
    }
}

impl Serialize for ExchangeDateTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.format_rfc3339())
    }
}

impl<'de> Deserialize<'de> for ExchangeDateTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(D::Error::custom)
    }
}

/// Parses a naive exchange-local timestamp.
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM` and `YYYY-MM-DD HH:MM:SS`; a `T`
/// may separate date and time.
pub fn parse_local_datetime(input: &str) -> Result<PrimitiveDateTime, ValidationError> {
    let normalized = input.trim().replacen('T', " ", 1);
    let invalid = || ValidationError::InvalidLocalTimestamp {
        value: input.to_owned(),
    };

    match normalized.len() {
        10 => Date::parse(&normalized, format_description!("[year]-[month]-[day]"))
            .map(Date::midnight)
            .map_err(|_| invalid()),
        16 => PrimitiveDateTime::parse(
            &normalized,
            format_description!("[year]-[month]-[day] [hour]:[minute]"),
        )
        .map_err(|_| invalid()),
        19 => PrimitiveDateTime::parse(
            &normalized,
            format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
        )
        .map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}

pub fn format_local_datetime(value: PrimitiveDateTime) -> String {
    value
        .format(format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second]"
        ))
        .unwrap_or_else(|_| String::from("<unformattable>"))
}
