// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 strata.dev

//! Default codecs for enum host types.
//!
//! Both codecs are parameterized by the concrete enum: they only offer the
//! host-type constructor convention, and construction fails for tokens that
//! carry no variant access.

use std::any::Any;

use crate::codec::{Codec, CodecClass, HostValue};
use crate::column::ColumnValue;
use crate::error::{Result, TypeError};
use crate::token::{EnumAccess, TypeToken};

fn enum_access_of(codec: &str, host_type: &TypeToken) -> Result<EnumAccess> {
    host_type
        .enum_access()
        .copied()
        .ok_or_else(|| TypeError::ConstructionFailed {
            codec: codec.to_string(),
            reason: format!("host type '{}' provides no enum variant access", host_type),
        })
}

// ---------------------------------------------------------------------------
// EnumCodec
// ---------------------------------------------------------------------------

/// Stores enum values by variant name in a textual column.
pub struct EnumCodec {
    host_type: TypeToken,
    access: EnumAccess,
}

impl EnumCodec {
    /// Build for a concrete enum token.
    pub fn new(host_type: TypeToken) -> Result<Self> {
        let access = enum_access_of("EnumCodec", &host_type)?;
        Ok(EnumCodec { host_type, access })
    }

    /// Reified class of this codec.
    pub fn codec_class() -> CodecClass {
        CodecClass::builder::<Self>()
            .with_host_type_ctor(|host_type| {
                EnumCodec::new(host_type).map(|c| Box::new(c) as Box<dyn Codec>)
            })
            .build()
    }
}

impl Codec for EnumCodec {
    fn class(&self) -> CodecClass {
        Self::codec_class()
    }

    fn encode(&self, value: &dyn Any) -> Result<ColumnValue> {
        (self.access.variant_name)(value)
            .map(|name| ColumnValue::Text(name.to_string()))
            .ok_or_else(|| TypeError::HostValueMismatch {
                codec: "EnumCodec".to_string(),
                expected: "a value of the constructed enum type",
            })
    }

    fn decode(&self, value: &ColumnValue) -> Result<HostValue> {
        let name = value.as_str().ok_or_else(|| TypeError::ColumnValueMismatch {
            codec: "EnumCodec".to_string(),
            expected: "Text",
        })?;
        (self.access.from_name)(name).ok_or_else(|| TypeError::InvalidValue {
            codec: "EnumCodec".to_string(),
            detail: format!("'{}' is not a variant of {}", name, self.host_type),
        })
    }

    fn described_host_type(&self) -> Option<TypeToken> {
        Some(self.host_type.clone())
    }
}

// ---------------------------------------------------------------------------
// EnumOrdinalCodec
// ---------------------------------------------------------------------------

/// Stores enum values by variant position in an integral column.
pub struct EnumOrdinalCodec {
    host_type: TypeToken,
    access: EnumAccess,
}

impl EnumOrdinalCodec {
    /// Build for a concrete enum token.
    pub fn new(host_type: TypeToken) -> Result<Self> {
        let access = enum_access_of("EnumOrdinalCodec", &host_type)?;
        Ok(EnumOrdinalCodec { host_type, access })
    }

    /// Reified class of this codec.
    pub fn codec_class() -> CodecClass {
        CodecClass::builder::<Self>()
            .with_host_type_ctor(|host_type| {
                EnumOrdinalCodec::new(host_type).map(|c| Box::new(c) as Box<dyn Codec>)
            })
            .build()
    }
}

impl Codec for EnumOrdinalCodec {
    fn class(&self) -> CodecClass {
        Self::codec_class()
    }

    fn encode(&self, value: &dyn Any) -> Result<ColumnValue> {
        (self.access.variant_ordinal)(value)
            .map(|ordinal| ColumnValue::I32(ordinal as i32))
            .ok_or_else(|| TypeError::HostValueMismatch {
                codec: "EnumOrdinalCodec".to_string(),
                expected: "a value of the constructed enum type",
            })
    }

    fn decode(&self, value: &ColumnValue) -> Result<HostValue> {
        let ordinal = match value {
            ColumnValue::I32(v) if *v >= 0 => *v as u32,
            ColumnValue::I32(v) => {
                return Err(TypeError::InvalidValue {
                    codec: "EnumOrdinalCodec".to_string(),
                    detail: format!("negative ordinal {}", v),
                })
            }
            _ => {
                return Err(TypeError::ColumnValueMismatch {
                    codec: "EnumOrdinalCodec".to_string(),
                    expected: "I32",
                })
            }
        };
        (self.access.from_ordinal)(ordinal).ok_or_else(|| TypeError::InvalidValue {
            codec: "EnumOrdinalCodec".to_string(),
            detail: format!("{} has no variant at position {}", self.host_type, ordinal),
        })
    }

    fn described_host_type(&self) -> Option<TypeToken> {
        Some(self.host_type.clone())
    }
}
