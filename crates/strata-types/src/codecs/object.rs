// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 strata.dev

//! Codecs registered under the root object type.

use std::any::Any;
use std::time::SystemTime;

use crate::codec::{Codec, CodecClass, HostValue};
use crate::column::ColumnValue;
use crate::codecs::decimal::Decimal;
use crate::error::{Result, TypeError};
use crate::token::TypeToken;

/// Last-resort codec for callers that only know the root object type.
///
/// Encoding is best-effort over the standard scalar, text, and binary host
/// types (a `ColumnValue` host value passes through unchanged). Decoding
/// hands the column value back as the host value; interpreting it further is
/// the caller's decision.
pub struct UnknownCodec;

impl UnknownCodec {
    /// Reified class of this codec.
    pub fn codec_class() -> CodecClass {
        CodecClass::builder::<Self>()
            .with_nullary_ctor(|| Ok(Box::new(UnknownCodec)))
            .build()
    }
}

impl Codec for UnknownCodec {
    fn class(&self) -> CodecClass {
        Self::codec_class()
    }

    fn encode(&self, value: &dyn Any) -> Result<ColumnValue> {
        if let Some(v) = value.downcast_ref::<ColumnValue>() {
            return Ok(v.clone());
        }
        if let Some(v) = value.downcast_ref::<bool>() {
            return Ok(ColumnValue::Bool(*v));
        }
        if let Some(v) = value.downcast_ref::<i8>() {
            return Ok(ColumnValue::I8(*v));
        }
        if let Some(v) = value.downcast_ref::<i16>() {
            return Ok(ColumnValue::I16(*v));
        }
        if let Some(v) = value.downcast_ref::<i32>() {
            return Ok(ColumnValue::I32(*v));
        }
        if let Some(v) = value.downcast_ref::<i64>() {
            return Ok(ColumnValue::I64(*v));
        }
        if let Some(v) = value.downcast_ref::<i128>() {
            return Ok(ColumnValue::I128(*v));
        }
        if let Some(v) = value.downcast_ref::<f32>() {
            return Ok(ColumnValue::F32(*v));
        }
        if let Some(v) = value.downcast_ref::<f64>() {
            return Ok(ColumnValue::F64(*v));
        }
        if let Some(v) = value.downcast_ref::<char>() {
            return Ok(ColumnValue::Text(v.to_string()));
        }
        if let Some(v) = value.downcast_ref::<String>() {
            return Ok(ColumnValue::Text(v.clone()));
        }
        if let Some(v) = value.downcast_ref::<Decimal>() {
            return Ok(ColumnValue::Decimal(v.as_str().to_string()));
        }
        if let Some(v) = value.downcast_ref::<Vec<u8>>() {
            return Ok(ColumnValue::Bytes(v.clone()));
        }
        if let Some(v) = value.downcast_ref::<Box<[u8]>>() {
            return Ok(ColumnValue::Bytes(v.to_vec()));
        }
        if value.downcast_ref::<SystemTime>().is_some() {
            // Route through the full timestamp codec for one source of truth.
            return crate::codecs::temporal::DateCodec.encode(value);
        }
        Err(TypeError::HostValueMismatch {
            codec: "UnknownCodec".to_string(),
            expected: "a standard scalar, text, binary, or temporal type",
        })
    }

    fn decode(&self, value: &ColumnValue) -> Result<HostValue> {
        Ok(Box::new(value.clone()))
    }

    fn described_host_type(&self) -> Option<TypeToken> {
        Some(TypeToken::object())
    }
}

/// `Vec<ColumnValue>` under ARRAY columns.
pub struct ArrayCodec;

impl ArrayCodec {
    /// Reified class of this codec.
    pub fn codec_class() -> CodecClass {
        CodecClass::builder::<Self>()
            .with_nullary_ctor(|| Ok(Box::new(ArrayCodec)))
            .build()
    }
}

impl Codec for ArrayCodec {
    fn class(&self) -> CodecClass {
        Self::codec_class()
    }

    fn encode(&self, value: &dyn Any) -> Result<ColumnValue> {
        value
            .downcast_ref::<Vec<ColumnValue>>()
            .map(|v| ColumnValue::Array(v.clone()))
            .ok_or_else(|| TypeError::HostValueMismatch {
                codec: "ArrayCodec".to_string(),
                expected: "Vec<ColumnValue>",
            })
    }

    fn decode(&self, value: &ColumnValue) -> Result<HostValue> {
        match value {
            ColumnValue::Array(elements) => Ok(Box::new(elements.clone())),
            _ => Err(TypeError::ColumnValueMismatch {
                codec: "ArrayCodec".to_string(),
                expected: "Array",
            }),
        }
    }

    fn described_host_type(&self) -> Option<TypeToken> {
        Some(TypeToken::object())
    }
}
