// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 strata.dev

//! Codec construction through the two constructor conventions.

use crate::codec::{Codec, CodecClass};
use crate::error::{Result, TypeError};
use crate::token::TypeToken;

/// Instantiate a codec class.
///
/// When a host type is supplied and the class offers a host-type
/// constructor, that constructor is used; enum codecs and other
/// parameterized handlers need the concrete host type at construction time.
/// Otherwise the no-argument constructor is tried. If neither convention
/// applies, the call fails with [`TypeError::ConstructionFailed`].
pub fn instantiate(
    host_type: Option<&TypeToken>,
    class: &CodecClass,
) -> Result<Box<dyn Codec>> {
    if let Some(host_type) = host_type {
        if let Some(ctor) = class.host_type_ctor() {
            return ctor(host_type.clone()).map_err(|e| construction_failed(class, e));
        }
    }
    match class.nullary_ctor() {
        Some(ctor) => ctor().map_err(|e| construction_failed(class, e)),
        None => Err(TypeError::ConstructionFailed {
            codec: class.name().to_string(),
            reason: "no usable constructor".to_string(),
        }),
    }
}

fn construction_failed(class: &CodecClass, cause: TypeError) -> TypeError {
    match cause {
        already @ TypeError::ConstructionFailed { .. } => already,
        other => TypeError::ConstructionFailed {
            codec: class.name().to_string(),
            reason: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::HostValue;
    use crate::column::ColumnValue;
    use std::any::Any;

    struct Fixed;

    impl Codec for Fixed {
        fn class(&self) -> CodecClass {
            CodecClass::builder::<Self>()
                .with_nullary_ctor(|| Ok(Box::new(Fixed)))
                .build()
        }

        fn encode(&self, _value: &dyn Any) -> Result<ColumnValue> {
            Ok(ColumnValue::I32(1))
        }

        fn decode(&self, _value: &ColumnValue) -> Result<HostValue> {
            Ok(Box::new(1_i32))
        }
    }

    struct PerType {
        host_type: TypeToken,
    }

    impl Codec for PerType {
        fn class(&self) -> CodecClass {
            CodecClass::builder::<Self>()
                .with_host_type_ctor(|host_type| Ok(Box::new(PerType { host_type })))
                .build()
        }

        fn encode(&self, _value: &dyn Any) -> Result<ColumnValue> {
            Ok(ColumnValue::Text(self.host_type.name().to_string()))
        }

        fn decode(&self, _value: &ColumnValue) -> Result<HostValue> {
            Ok(Box::new(()))
        }
    }

    #[test]
    fn test_nullary_fallback_when_no_host_type_ctor() {
        let class = Fixed.class();
        // A host type is supplied but the class only has a no-arg ctor.
        let codec = instantiate(Some(&TypeToken::of::<i32>()), &class).unwrap();
        assert_eq!(codec.encode(&0_i32).unwrap(), ColumnValue::I32(1));
    }

    #[test]
    fn test_host_type_ctor_preferred() {
        let class = PerType {
            host_type: TypeToken::of::<i32>(),
        }
        .class();
        let codec = instantiate(Some(&TypeToken::of::<String>()), &class).unwrap();
        assert_eq!(
            codec.encode(&0_i32).unwrap(),
            ColumnValue::Text("String".to_string())
        );
    }

    #[test]
    fn test_no_usable_constructor() {
        // Host-type-only class without a host type to give it.
        let class = PerType {
            host_type: TypeToken::of::<i32>(),
        }
        .class();
        let err = instantiate(None, &class).err().unwrap();
        assert!(matches!(err, TypeError::ConstructionFailed { .. }));
    }
}
