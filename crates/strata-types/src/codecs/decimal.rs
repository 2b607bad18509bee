// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 strata.dev

//! Arbitrary-precision decimal host type and its codec.

use std::any::Any;
use std::fmt;
use std::str::FromStr;

use crate::codec::{Codec, CodecClass, HostValue};
use crate::column::ColumnValue;
use crate::error::{Result, TypeError};
use crate::token::TypeToken;

/// Lexical decimal value.
///
/// Kept as its canonical string form so DECIMAL/NUMERIC columns round-trip
/// without precision loss. Format: optional sign, digits, optional fraction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Decimal(String);

impl Decimal {
    /// Validate and wrap a lexical decimal.
    pub fn new(lexical: impl Into<String>) -> Result<Self> {
        let lexical = lexical.into();
        if Self::is_valid(&lexical) {
            Ok(Decimal(lexical))
        } else {
            Err(TypeError::InvalidValue {
                codec: "Decimal".to_string(),
                detail: format!("not a decimal literal: {:?}", lexical),
            })
        }
    }

    /// The lexical form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn is_valid(s: &str) -> bool {
        let unsigned = s.strip_prefix(['-', '+']).unwrap_or(s);
        let (int_part, frac_part) = match unsigned.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (unsigned, None),
        };
        let digits = |p: &str| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit());
        digits(int_part) && frac_part.map_or(true, digits)
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Decimal {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self> {
        Decimal::new(s)
    }
}

/// [`Decimal`] under REAL/DECIMAL/NUMERIC columns.
pub struct DecimalCodec;

impl DecimalCodec {
    /// Reified class of this codec.
    pub fn codec_class() -> CodecClass {
        CodecClass::builder::<Self>()
            .with_nullary_ctor(|| Ok(Box::new(DecimalCodec)))
            .build()
    }
}

impl Codec for DecimalCodec {
    fn class(&self) -> CodecClass {
        Self::codec_class()
    }

    fn encode(&self, value: &dyn Any) -> Result<ColumnValue> {
        value
            .downcast_ref::<Decimal>()
            .map(|d| ColumnValue::Decimal(d.as_str().to_string()))
            .ok_or_else(|| TypeError::HostValueMismatch {
                codec: "DecimalCodec".to_string(),
                expected: "Decimal",
            })
    }

    fn decode(&self, value: &ColumnValue) -> Result<HostValue> {
        match value {
            ColumnValue::Decimal(lexical) => {
                let decimal = Decimal::new(lexical.clone())?;
                Ok(Box::new(decimal))
            }
            _ => Err(TypeError::ColumnValueMismatch {
                codec: "DecimalCodec".to_string(),
                expected: "Decimal",
            }),
        }
    }

    fn described_host_type(&self) -> Option<TypeToken> {
        Some(TypeToken::of::<Decimal>())
    }
}
