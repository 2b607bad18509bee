// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 strata.dev

//! Codecs for temporal host types.
//!
//! `SystemTime` is the legacy catch-all host type: the full codec maps it to
//! TIMESTAMP columns, while the date-only and time-only codecs truncate to
//! the DATE and TIME portions. The `Sql*` newtypes carry column-shaped
//! values for callers who want no truncation behavior at all.

use std::any::Any;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::codec::{Codec, CodecClass, HostValue};
use crate::column::ColumnValue;
use crate::error::{Result, TypeError};
use crate::token::TypeToken;

const MILLIS_PER_DAY: i64 = 86_400_000;

fn to_epoch_millis(t: SystemTime) -> i64 {
    match t.duration_since(UNIX_EPOCH) {
        Ok(d) => saturating_millis(d),
        Err(e) => -saturating_millis(e.duration()),
    }
}

fn saturating_millis(d: Duration) -> i64 {
    i64::try_from(d.as_millis()).unwrap_or(i64::MAX)
}

fn from_epoch_millis(millis: i64) -> SystemTime {
    if millis >= 0 {
        UNIX_EPOCH + Duration::from_millis(millis.unsigned_abs())
    } else {
        UNIX_EPOCH - Duration::from_millis(millis.unsigned_abs())
    }
}

fn downcast_system_time(codec: &str, value: &dyn Any) -> Result<SystemTime> {
    value
        .downcast_ref::<SystemTime>()
        .copied()
        .ok_or_else(|| TypeError::HostValueMismatch {
            codec: codec.to_string(),
            expected: "SystemTime",
        })
}

// ---------------------------------------------------------------------------
// SystemTime codecs
// ---------------------------------------------------------------------------

/// `SystemTime` under TIMESTAMP columns.
pub struct DateCodec;

impl DateCodec {
    /// Reified class of this codec.
    pub fn codec_class() -> CodecClass {
        CodecClass::builder::<Self>()
            .with_nullary_ctor(|| Ok(Box::new(DateCodec)))
            .build()
    }
}

impl Codec for DateCodec {
    fn class(&self) -> CodecClass {
        Self::codec_class()
    }

    fn encode(&self, value: &dyn Any) -> Result<ColumnValue> {
        let t = downcast_system_time("DateCodec", value)?;
        Ok(ColumnValue::Timestamp(to_epoch_millis(t)))
    }

    fn decode(&self, value: &ColumnValue) -> Result<HostValue> {
        match value {
            ColumnValue::Timestamp(millis) => Ok(Box::new(from_epoch_millis(*millis))),
            _ => Err(TypeError::ColumnValueMismatch {
                codec: "DateCodec".to_string(),
                expected: "Timestamp",
            }),
        }
    }

    fn described_host_type(&self) -> Option<TypeToken> {
        Some(TypeToken::of::<SystemTime>())
    }
}

/// `SystemTime` truncated to the day, under DATE columns.
pub struct DateOnlyCodec;

impl DateOnlyCodec {
    /// Reified class of this codec.
    pub fn codec_class() -> CodecClass {
        CodecClass::builder::<Self>()
            .with_nullary_ctor(|| Ok(Box::new(DateOnlyCodec)))
            .build()
    }
}

impl Codec for DateOnlyCodec {
    fn class(&self) -> CodecClass {
        Self::codec_class()
    }

    fn encode(&self, value: &dyn Any) -> Result<ColumnValue> {
        let t = downcast_system_time("DateOnlyCodec", value)?;
        let days = to_epoch_millis(t).div_euclid(MILLIS_PER_DAY);
        let days = i32::try_from(days).map_err(|_| TypeError::InvalidValue {
            codec: "DateOnlyCodec".to_string(),
            detail: "timestamp out of DATE range".to_string(),
        })?;
        Ok(ColumnValue::Date(days))
    }

    fn decode(&self, value: &ColumnValue) -> Result<HostValue> {
        match value {
            ColumnValue::Date(days) => {
                Ok(Box::new(from_epoch_millis(i64::from(*days) * MILLIS_PER_DAY)))
            }
            _ => Err(TypeError::ColumnValueMismatch {
                codec: "DateOnlyCodec".to_string(),
                expected: "Date",
            }),
        }
    }

    fn described_host_type(&self) -> Option<TypeToken> {
        Some(TypeToken::of::<SystemTime>())
    }
}

/// `SystemTime` truncated to the time of day, under TIME columns.
pub struct TimeOnlyCodec;

impl TimeOnlyCodec {
    /// Reified class of this codec.
    pub fn codec_class() -> CodecClass {
        CodecClass::builder::<Self>()
            .with_nullary_ctor(|| Ok(Box::new(TimeOnlyCodec)))
            .build()
    }
}

impl Codec for TimeOnlyCodec {
    fn class(&self) -> CodecClass {
        Self::codec_class()
    }

    fn encode(&self, value: &dyn Any) -> Result<ColumnValue> {
        let t = downcast_system_time("TimeOnlyCodec", value)?;
        Ok(ColumnValue::Time(to_epoch_millis(t).rem_euclid(MILLIS_PER_DAY)))
    }

    fn decode(&self, value: &ColumnValue) -> Result<HostValue> {
        match value {
            ColumnValue::Time(millis) => Ok(Box::new(from_epoch_millis(*millis))),
            _ => Err(TypeError::ColumnValueMismatch {
                codec: "TimeOnlyCodec".to_string(),
                expected: "Time",
            }),
        }
    }

    fn described_host_type(&self) -> Option<TypeToken> {
        Some(TypeToken::of::<SystemTime>())
    }
}

// ---------------------------------------------------------------------------
// Column-shaped newtypes
// ---------------------------------------------------------------------------

/// Days since the Unix epoch; the host-side mirror of a DATE column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SqlDate(pub i32);

/// Milliseconds into the day; the host-side mirror of a TIME column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SqlTime(pub i64);

/// Milliseconds since the Unix epoch; the host-side mirror of a TIMESTAMP
/// column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SqlTimestamp(pub i64);

macro_rules! sql_temporal_codec {
    ($(#[$meta:meta])* $codec:ident, $host:ident, $variant:ident) => {
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
                value
                    .downcast_ref::<$host>()
                    .map(|v| ColumnValue::$variant(v.0))
                    .ok_or_else(|| TypeError::HostValueMismatch {
                        codec: stringify!($codec).to_string(),
                        expected: stringify!($host),
                    })
            }

            fn decode(&self, value: &ColumnValue) -> Result<HostValue> {
                match value {
                    ColumnValue::$variant(v) => Ok(Box::new($host(*v))),
                    _ => Err(TypeError::ColumnValueMismatch {
                        codec: stringify!($codec).to_string(),
                        expected: stringify!($variant),
                    }),
                }
            }

            fn described_host_type(&self) -> Option<TypeToken> {
                Some(TypeToken::of::<$host>())
            }
        }
    };
}

sql_temporal_codec!(
    /// [`SqlDate`] under DATE columns.
    SqlDateCodec, SqlDate, Date
);
sql_temporal_codec!(
    /// [`SqlTime`] under TIME columns.
    SqlTimeCodec, SqlTime, Time
);
sql_temporal_codec!(
    /// [`SqlTimestamp`] under TIMESTAMP columns.
    SqlTimestampCodec, SqlTimestamp, Timestamp
);
