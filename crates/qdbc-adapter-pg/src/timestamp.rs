//! UTC timestamps.
//!
//! QuestDB stores timestamps as microseconds since the Unix epoch without any
//! zone information, and every value is meant to be read as UTC. On the wire
//! they arrive as `TIMESTAMP` (without time zone). `UtcTimestamp` decodes them
//! straight into `DateTime<Utc>` so the host's local zone never gets a say.

use std::fmt;
use std::ops::Deref;

use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::encode::IsNull;
use sqlx::error::BoxDynError;
use sqlx::postgres::{PgArgumentBuffer, PgTypeInfo, PgValueRef, Postgres};
use sqlx::{Decode, Encode, Type};

/// A QuestDB `TIMESTAMP` interpreted as UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UtcTimestamp(pub DateTime<Utc>);

impl UtcTimestamp {
    pub fn into_inner(self) -> DateTime<Utc> {
        self.0
    }

    /// Microseconds since the Unix epoch, QuestDB's native resolution.
    pub fn timestamp_micros(&self) -> i64 {
        self.0.timestamp_micros()
    }
}

impl From<DateTime<Utc>> for UtcTimestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Self(value)
    }
}

impl From<NaiveDateTime> for UtcTimestamp {
    fn from(value: NaiveDateTime) -> Self {
        Self(value.and_utc())
    }
}

impl From<UtcTimestamp> for DateTime<Utc> {
    fn from(value: UtcTimestamp) -> Self {
        value.0
    }
}

impl Deref for UtcTimestamp {
    type Target = DateTime<Utc>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for UtcTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%dT%H:%M:%S%.6fZ"))
    }
}

impl Type<Postgres> for UtcTimestamp {
    fn type_info() -> PgTypeInfo {
        <NaiveDateTime as Type<Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <NaiveDateTime as Type<Postgres>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Postgres> for UtcTimestamp {
    fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
        let naive = <NaiveDateTime as Decode<'r, Postgres>>::decode(value)?;
        Ok(Self(naive.and_utc()))
    }
}

impl<'q> Encode<'q, Postgres> for UtcTimestamp {
    fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> Result<IsNull, BoxDynError> {
        <NaiveDateTime as Encode<'q, Postgres>>::encode_by_ref(&self.0.naive_utc(), buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    #[test]
    fn test_naive_value_is_read_as_utc() {
        let naive = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_micro_opt(12, 30, 0, 123_456)
            .unwrap();
        let ts = UtcTimestamp::from(naive);
        assert_eq!(
            ts.into_inner(),
            Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap()
                + chrono::Duration::microseconds(123_456)
        );
        assert_eq!(ts.to_string(), "2024-03-01T12:30:00.123456Z");
    }

    #[test]
    fn test_micros_round_trip() {
        let ts = UtcTimestamp::from(DateTime::<Utc>::from_timestamp_micros(1_700_000_000_000_001).unwrap());
        assert_eq!(ts.timestamp_micros(), 1_700_000_000_000_001);
    }

    #[test]
    fn test_wire_type_is_timestamp() {
        assert!(<UtcTimestamp as Type<Postgres>>::compatible(
            &<NaiveDateTime as Type<Postgres>>::type_info()
        ));
        assert!(!<UtcTimestamp as Type<Postgres>>::compatible(
            &<String as Type<Postgres>>::type_info()
        ));
    }
}
