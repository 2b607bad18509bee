// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 strata.dev

//! Codecs for the scalar host types.

use std::any::Any;

use crate::codec::{Codec, CodecClass, HostValue};
use crate::column::ColumnValue;
use crate::error::{Result, TypeError};
use crate::token::TypeToken;

macro_rules! scalar_codec {
    ($(#[$meta:meta])* $codec:ident, $host:ty, $variant:ident) => {
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
                    .map(|v| ColumnValue::$variant(*v))
                    .ok_or_else(|| TypeError::HostValueMismatch {
                        codec: stringify!($codec).to_string(),
                        expected: stringify!($host),
                    })
            }

            fn decode(&self, value: &ColumnValue) -> Result<HostValue> {
                match value {
                    ColumnValue::$variant(v) => Ok(Box::new(*v)),
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

scalar_codec!(
    /// `bool` under BOOLEAN/BIT columns.
    BoolCodec, bool, Bool
);
scalar_codec!(
    /// `i8` under TINYINT columns.
    ByteCodec, i8, I8
);
scalar_codec!(
    /// `i16` under SMALLINT columns.
    ShortCodec, i16, I16
);
scalar_codec!(
    /// `i32` under INTEGER columns.
    IntCodec, i32, I32
);
scalar_codec!(
    /// `i64` under BIGINT columns.
    LongCodec, i64, I64
);
scalar_codec!(
    /// `i128` for arbitrary-width integer columns.
    BigIntegerCodec, i128, I128
);
scalar_codec!(
    /// `f32` under FLOAT columns.
    FloatCodec, f32, F32
);
scalar_codec!(
    /// `f64` under DOUBLE columns.
    DoubleCodec, f64, F64
);

/// `char` stored as single-character text.
pub struct CharCodec;

impl CharCodec {
    /// Reified class of this codec.
    pub fn codec_class() -> CodecClass {
        CodecClass::builder::<Self>()
            .with_nullary_ctor(|| Ok(Box::new(CharCodec)))
            .build()
    }
}

impl Codec for CharCodec {
    fn class(&self) -> CodecClass {
        Self::codec_class()
    }

    fn encode(&self, value: &dyn Any) -> Result<ColumnValue> {
        value
            .downcast_ref::<char>()
            .map(|c| ColumnValue::Text(c.to_string()))
            .ok_or_else(|| TypeError::HostValueMismatch {
                codec: "CharCodec".to_string(),
                expected: "char",
            })
    }

    fn decode(&self, value: &ColumnValue) -> Result<HostValue> {
        let text = value.as_str().ok_or(TypeError::ColumnValueMismatch {
            codec: "CharCodec".to_string(),
            expected: "Text",
        })?;
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(Box::new(c)),
            _ => Err(TypeError::InvalidValue {
                codec: "CharCodec".to_string(),
                detail: format!("expected exactly one character, got {:?}", text),
            }),
        }
    }

    fn described_host_type(&self) -> Option<TypeToken> {
        Some(TypeToken::of::<char>())
    }
}
