// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 strata.dev

//! Codecs for the chrono date/time types (feature `chrono`).
//!
//! The registrar mirrors the legacy temporal block of the bootstrap: when
//! the feature is enabled, [`register_date_time_codecs`] installs one codec
//! per chrono host type during registry construction.

use std::any::Any;

use chrono::{
    DateTime, Datelike, FixedOffset, Month, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc,
};

use crate::codec::{Codec, CodecClass, HostValue};
use crate::column::ColumnValue;
use crate::error::{Result, TypeError};
use crate::registry::CodecRegistry;
use crate::token::TypeToken;

/// Days from CE day zero to 1970-01-01, chrono's `num_days_from_ce` scale.
const EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Install the chrono codecs into a registry.
pub fn register_date_time_codecs(registry: &CodecRegistry) {
    registry.register_for(TypeToken::class_of::<DateTime<Utc>>().build(), UtcDateTimeCodec);
    registry.register_for(
        TypeToken::class_of::<DateTime<FixedOffset>>().build(),
        OffsetDateTimeCodec,
    );
    registry.register_for(
        TypeToken::class_of::<NaiveDateTime>().build(),
        NaiveDateTimeCodec,
    );
    registry.register_for(TypeToken::class_of::<NaiveDate>().build(), NaiveDateCodec);
    registry.register_for(TypeToken::class_of::<NaiveTime>().build(), NaiveTimeCodec);
    registry.register_for(TypeToken::class_of::<Month>().build(), MonthCodec);
}

fn out_of_range(codec: &str, detail: impl Into<String>) -> TypeError {
    TypeError::InvalidValue {
        codec: codec.to_string(),
        detail: detail.into(),
    }
}

macro_rules! chrono_codec {
    ($(#[$meta:meta])* $codec:ident, $host:ty, $encode:expr, $decode:expr) => {
        $(#[$meta])*
        pub struct $codec;

        impl $codec {
            /// Reified class of this codec.
            pub fn codec_class() -> CodecClass {
                CodecClass::builder::<Self>()
                    .with_nullary_ctor(|| Ok(Box::new($codec)))
                    .build()
            }
        }

        impl Codec for $codec {
            fn class(&self) -> CodecClass {
                Self::codec_class()
            }

            fn encode(&self, value: &dyn Any) -> Result<ColumnValue> {
                let host = value.downcast_ref::<$host>().ok_or_else(|| {
                    TypeError::HostValueMismatch {
                        codec: stringify!($codec).to_string(),
                        expected: stringify!($host),
                    }
                })?;
                let encode: fn(&$host) -> Result<ColumnValue> = $encode;
                encode(host)
            }

            fn decode(&self, value: &ColumnValue) -> Result<HostValue> {
                let decode: fn(&ColumnValue) -> Result<$host> = $decode;
                decode(value).map(|v| Box::new(v) as HostValue)
            }

            fn described_host_type(&self) -> Option<TypeToken> {
                Some(TypeToken::class_of::<$host>().build())
            }
        }
    };
}

chrono_codec!(
    /// `DateTime<Utc>` under TIMESTAMP columns.
    UtcDateTimeCodec,
    DateTime<Utc>,
    |t| Ok(ColumnValue::Timestamp(t.timestamp_millis())),
    |v| match v {
        ColumnValue::Timestamp(millis) => DateTime::<Utc>::from_timestamp_millis(*millis)
            .ok_or_else(|| out_of_range("UtcDateTimeCodec", "timestamp out of range")),
        _ => Err(TypeError::ColumnValueMismatch {
            codec: "UtcDateTimeCodec".to_string(),
            expected: "Timestamp",
        }),
    }
);

chrono_codec!(
    /// `DateTime<FixedOffset>` under TIMESTAMP columns; the offset is
    /// normalized to UTC on the way in and comes back as +00:00.
    OffsetDateTimeCodec,
    DateTime<FixedOffset>,
    |t| Ok(ColumnValue::Timestamp(t.timestamp_millis())),
    |v| match v {
        ColumnValue::Timestamp(millis) => DateTime::<Utc>::from_timestamp_millis(*millis)
            .map(|t| t.fixed_offset())
            .ok_or_else(|| out_of_range("OffsetDateTimeCodec", "timestamp out of range")),
        _ => Err(TypeError::ColumnValueMismatch {
            codec: "OffsetDateTimeCodec".to_string(),
            expected: "Timestamp",
        }),
    }
);

chrono_codec!(
    /// `NaiveDateTime` under TIMESTAMP columns, interpreted as UTC.
    NaiveDateTimeCodec,
    NaiveDateTime,
    |t| Ok(ColumnValue::Timestamp(t.and_utc().timestamp_millis())),
    |v| match v {
        ColumnValue::Timestamp(millis) => DateTime::<Utc>::from_timestamp_millis(*millis)
            .map(|t| t.naive_utc())
            .ok_or_else(|| out_of_range("NaiveDateTimeCodec", "timestamp out of range")),
        _ => Err(TypeError::ColumnValueMismatch {
            codec: "NaiveDateTimeCodec".to_string(),
            expected: "Timestamp",
        }),
    }
);

chrono_codec!(
    /// `NaiveDate` under DATE columns.
    NaiveDateCodec,
    NaiveDate,
    |d| Ok(ColumnValue::Date(d.num_days_from_ce() - EPOCH_DAYS_FROM_CE)),
    |v| match v {
        ColumnValue::Date(days) => NaiveDate::from_num_days_from_ce_opt(
            days.saturating_add(EPOCH_DAYS_FROM_CE),
        )
        .ok_or_else(|| out_of_range("NaiveDateCodec", "date out of range")),
        _ => Err(TypeError::ColumnValueMismatch {
            codec: "NaiveDateCodec".to_string(),
            expected: "Date",
        }),
    }
);

chrono_codec!(
    /// `NaiveTime` under TIME columns (millisecond precision).
    NaiveTimeCodec,
    NaiveTime,
    |t| Ok(ColumnValue::Time(
        i64::from(t.num_seconds_from_midnight()) * 1_000
            + i64::from(t.nanosecond() / 1_000_000)
    )),
    |v| match v {
        ColumnValue::Time(millis) if (0..86_400_000).contains(millis) => {
            let secs = (millis / 1_000) as u32;
            let nanos = ((millis % 1_000) * 1_000_000) as u32;
            NaiveTime::from_num_seconds_from_midnight_opt(secs, nanos)
                .ok_or_else(|| out_of_range("NaiveTimeCodec", "time out of range"))
        }
        ColumnValue::Time(millis) => Err(out_of_range(
            "NaiveTimeCodec",
            format!("{} ms is outside the day", millis),
        )),
        _ => Err(TypeError::ColumnValueMismatch {
            codec: "NaiveTimeCodec".to_string(),
            expected: "Time",
        }),
    }
);

chrono_codec!(
    /// `Month` stored as its 1-based number.
    MonthCodec,
    Month,
    |m| Ok(ColumnValue::I32(m.number_from_month() as i32)),
    |v| match v {
        ColumnValue::I32(n) => u8::try_from(*n)
            .ok()
            .and_then(|n| Month::try_from(n).ok())
            .ok_or_else(|| out_of_range("MonthCodec", format!("{} is not a month number", n))),
        _ => Err(TypeError::ColumnValueMismatch {
            codec: "MonthCodec".to_string(),
            expected: "I32",
        }),
    }
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_naive_date_epoch_alignment() {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        assert_eq!(
            NaiveDateCodec.encode(&epoch).unwrap(),
            ColumnValue::Date(0)
        );
        let next_day = NaiveDateCodec.decode(&ColumnValue::Date(1)).unwrap();
        assert_eq!(
            next_day.downcast_ref::<NaiveDate>(),
            Some(&NaiveDate::from_ymd_opt(1970, 1, 2).unwrap())
        );
    }

    #[test]
    fn test_utc_datetime_round_trip() {
        let t = DateTime::<Utc>::from_timestamp_millis(1_700_000_000_123).unwrap();
        let column = UtcDateTimeCodec.encode(&t).unwrap();
        assert_eq!(column, ColumnValue::Timestamp(1_700_000_000_123));
        let host = UtcDateTimeCodec.decode(&column).unwrap();
        assert_eq!(host.downcast_ref::<DateTime<Utc>>(), Some(&t));
    }

    #[test]
    fn test_naive_time_millisecond_precision() {
        let t = NaiveTime::from_hms_milli_opt(13, 30, 5, 250).unwrap();
        let column = NaiveTimeCodec.encode(&t).unwrap();
        assert_eq!(
            column,
            ColumnValue::Time((13 * 3600 + 30 * 60 + 5) * 1_000 + 250)
        );
        let host = NaiveTimeCodec.decode(&column).unwrap();
        assert_eq!(host.downcast_ref::<NaiveTime>(), Some(&t));
    }

    #[test]
    fn test_month_numbering() {
        assert_eq!(
            MonthCodec.encode(&Month::March).unwrap(),
            ColumnValue::I32(3)
        );
        let host = MonthCodec.decode(&ColumnValue::I32(12)).unwrap();
        assert_eq!(host.downcast_ref::<Month>(), Some(&Month::December));
        assert!(MonthCodec.decode(&ColumnValue::I32(0)).is_err());
    }
}
