// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 strata.dev

#![allow(clippy::uninlined_format_args)] // Test code readability over pedantic
#![allow(clippy::missing_panics_doc)] // Tests panic on failure
#![allow(clippy::items_after_statements)] // Test helpers

//! End-to-end resolution behavior of the codec registry: built-in bindings,
//! hierarchy walks, negative caching, and the registration surface.

use std::any::Any;
use std::sync::Arc;

use strata_types::{
    Candidate, CandidateKind, Codec, CodecClass, CodecDescriptor, CodecRegistry, ColumnType,
    ColumnValue, HostEnum, HostValue, Result, StaticDiscovery, TypeError, TypeToken,
};

// ---------------------------------------------------------------------------
// Test fixtures
// ---------------------------------------------------------------------------

#[derive(Debug, PartialEq)]
enum Color {
    Red,
    Green,
    Blue,
}

impl HostEnum for Color {
    fn variant_name(&self) -> &'static str {
        match self {
            Color::Red => "Red",
            Color::Green => "Green",
            Color::Blue => "Blue",
        }
    }

    fn from_variant_name(name: &str) -> Option<Self> {
        match name {
            "Red" => Some(Color::Red),
            "Green" => Some(Color::Green),
            "Blue" => Some(Color::Blue),
            _ => None,
        }
    }

    fn ordinal(&self) -> u32 {
        match self {
            Color::Red => 0,
            Color::Green => 1,
            Color::Blue => 2,
        }
    }

    fn from_ordinal(ordinal: u32) -> Option<Self> {
        match ordinal {
            0 => Some(Color::Red),
            1 => Some(Color::Green),
            2 => Some(Color::Blue),
            _ => None,
        }
    }
}

fn color_token() -> TypeToken {
    TypeToken::enumeration::<Color>().build()
}

/// Codec with both constructor conventions; remembers the host type it was
/// built with so re-instantiation is observable.
struct WidgetCodec {
    host_type: Option<TypeToken>,
}

impl WidgetCodec {
    fn codec_class() -> CodecClass {
        CodecClass::builder::<Self>()
            .with_host_type_ctor(|host_type| {
                Ok(Box::new(WidgetCodec {
                    host_type: Some(host_type),
                }))
            })
            .with_nullary_ctor(|| Ok(Box::new(WidgetCodec { host_type: None })))
            .build()
    }
}

impl Codec for WidgetCodec {
    fn class(&self) -> CodecClass {
        Self::codec_class()
    }

    fn encode(&self, _value: &dyn Any) -> Result<ColumnValue> {
        Ok(ColumnValue::Null)
    }

    fn decode(&self, _value: &ColumnValue) -> Result<HostValue> {
        Ok(Box::new(()))
    }

    fn described_host_type(&self) -> Option<TypeToken> {
        self.host_type.clone()
    }
}

fn class_of(codec: &Arc<dyn Codec>) -> CodecClass {
    codec.class()
}

// ---------------------------------------------------------------------------
// Built-in bindings
// ---------------------------------------------------------------------------

#[test]
fn builtin_integer_lookup() {
    let registry = CodecRegistry::new();
    let int_token = TypeToken::of::<i32>();

    let direct = registry
        .get_codec(&int_token, Some(ColumnType::Integer))
        .expect("integer codec");
    let untyped = registry.get_codec(&int_token, None).expect("integer codec");
    let varchar = registry
        .get_codec(&int_token, Some(ColumnType::Varchar))
        .expect("integer codec via fallback");

    assert!(Arc::ptr_eq(&direct, &untyped));
    assert!(Arc::ptr_eq(&direct, &varchar));
    assert_eq!(direct.encode(&7_i32).unwrap(), ColumnValue::I32(7));
}

#[test]
fn builtin_string_clob_distinction() {
    let registry = CodecRegistry::new();
    let string_token = TypeToken::of::<String>();

    let varchar = registry
        .get_codec(&string_token, Some(ColumnType::Varchar))
        .expect("string codec");
    let clob = registry
        .get_codec(&string_token, Some(ColumnType::Clob))
        .expect("clob codec");

    assert!(!Arc::ptr_eq(&varchar, &clob));
    assert_ne!(class_of(&varchar), class_of(&clob));
}

#[test]
fn builtin_unknown_fallback() {
    let registry = CodecRegistry::new();
    let object = TypeToken::object();

    let via_other = registry
        .get_codec(&object, Some(ColumnType::Other))
        .expect("unknown codec");
    let via_untyped = registry.get_codec(&object, None).expect("unknown codec");

    assert!(Arc::ptr_eq(&via_other, &registry.unknown_codec()));
    assert!(Arc::ptr_eq(&via_untyped, &registry.unknown_codec()));
}

#[test]
fn builtin_column_only_lookups() {
    let registry = CodecRegistry::new();
    for column in [
        ColumnType::Boolean,
        ColumnType::Bit,
        ColumnType::TinyInt,
        ColumnType::SmallInt,
        ColumnType::Integer,
        ColumnType::BigInt,
        ColumnType::Float,
        ColumnType::Double,
        ColumnType::Real,
        ColumnType::Decimal,
        ColumnType::Numeric,
        ColumnType::Char,
        ColumnType::Varchar,
        ColumnType::LongVarchar,
        ColumnType::Clob,
        ColumnType::NChar,
        ColumnType::NVarchar,
        ColumnType::NClob,
        ColumnType::LongVarBinary,
        ColumnType::Blob,
        ColumnType::Date,
        ColumnType::Time,
        ColumnType::Timestamp,
        ColumnType::Array,
        ColumnType::Other,
    ] {
        assert!(
            registry.get_codec_for_column(column).is_some(),
            "no column-only codec for {}",
            column
        );
    }
    // BIGINT maps to the long codec through the column-type index.
    let bigint = registry
        .get_codec_for_column(ColumnType::BigInt)
        .expect("long codec");
    assert_eq!(bigint.encode(&1_i64).unwrap(), ColumnValue::I64(1));
}

#[test]
fn builtin_temporal_variants() {
    use std::time::{Duration, UNIX_EPOCH};

    let registry = CodecRegistry::new();
    let time_token = TypeToken::of::<std::time::SystemTime>();
    let t = UNIX_EPOCH + Duration::from_millis(90_061_000); // day 1, 01:01:01

    let full = registry.get_codec(&time_token, None).expect("full codec");
    let date_only = registry
        .get_codec(&time_token, Some(ColumnType::Date))
        .expect("date-only codec");
    let time_only = registry
        .get_codec(&time_token, Some(ColumnType::Time))
        .expect("time-only codec");

    assert_eq!(full.encode(&t).unwrap(), ColumnValue::Timestamp(90_061_000));
    assert_eq!(date_only.encode(&t).unwrap(), ColumnValue::Date(1));
    assert_eq!(time_only.encode(&t).unwrap(), ColumnValue::Time(3_661_000));
}

// ---------------------------------------------------------------------------
// Enum resolution
// ---------------------------------------------------------------------------

#[test]
fn enum_discovery_installs_default_codec() {
    let registry = CodecRegistry::new();

    let first = registry
        .get_codec(&color_token(), None)
        .expect("default enum codec installed on first lookup");
    let second = registry
        .get_codec(&color_token(), None)
        .expect("memoized enum codec");
    assert!(Arc::ptr_eq(&first, &second));

    // The installed codec was constructed with the enum type.
    assert_eq!(first.described_host_type(), Some(color_token()));
    assert_eq!(
        first.encode(&Color::Green).unwrap(),
        ColumnValue::Text("Green".to_string())
    );
    let decoded = first.decode(&ColumnValue::Text("Blue".into())).unwrap();
    assert_eq!(decoded.downcast_ref::<Color>(), Some(&Color::Blue));
}

#[test]
fn enum_default_codec_class_is_swappable() {
    use strata_types::codecs::EnumOrdinalCodec;

    let registry = CodecRegistry::new();
    registry.set_default_enum_codec_class(EnumOrdinalCodec::codec_class());

    let codec = registry
        .get_codec(&color_token(), None)
        .expect("ordinal enum codec");
    assert_eq!(codec.encode(&Color::Blue).unwrap(), ColumnValue::I32(2));
}

#[test]
fn enum_resolves_through_interface_with_fresh_instances() {
    let registry = CodecRegistry::new();
    let labeled = TypeToken::interface("Labeled").build();
    registry.register_mapping(labeled.clone(), Some(ColumnType::Varchar), WidgetCodec {
        host_type: None,
    });
    let original = registry
        .get_codec(&labeled, Some(ColumnType::Varchar))
        .expect("interface codec");

    let color = TypeToken::enumeration::<Color>()
        .implements(labeled)
        .build();
    let rebuilt = registry
        .get_codec(&color, Some(ColumnType::Varchar))
        .expect("rebuilt codec");

    // Same codec class, distinct instance, constructed with the enum type.
    assert_eq!(class_of(&rebuilt), class_of(&original));
    assert!(!Arc::ptr_eq(&rebuilt, &original));
    assert_eq!(rebuilt.described_host_type(), Some(color_token()));
}

#[test]
fn enum_interface_walk_is_transitive() {
    let registry = CodecRegistry::new();
    let base = TypeToken::interface("HasLabel").build();
    registry.register_mapping(base.clone(), Some(ColumnType::Varchar), WidgetCodec {
        host_type: None,
    });

    // Color implements Labeled, which extends HasLabel.
    let labeled = TypeToken::interface("Labeled").implements(base).build();
    let color = TypeToken::enumeration::<Color>()
        .implements(labeled)
        .build();

    let rebuilt = registry
        .get_codec(&color, Some(ColumnType::Varchar))
        .expect("transitively found codec");
    assert_eq!(rebuilt.described_host_type(), Some(color_token()));
}

// ---------------------------------------------------------------------------
// Hierarchy and negative caching
// ---------------------------------------------------------------------------

#[test]
fn superclass_instances_are_shared() {
    let registry = CodecRegistry::new();
    let base = TypeToken::class("vehicle.Base").build();
    registry.register_for(base.clone(), WidgetCodec { host_type: None });

    let derived = TypeToken::class("vehicle.Derived")
        .extends(base.clone())
        .build();
    let deeper = TypeToken::class("vehicle.Deeper").extends(derived.clone()).build();

    let from_base = registry.get_codec(&base, None).expect("base codec");
    let from_derived = registry.get_codec(&derived, None).expect("inherited codec");
    let from_deeper = registry.get_codec(&deeper, None).expect("inherited codec");
    assert!(Arc::ptr_eq(&from_base, &from_derived));
    assert!(Arc::ptr_eq(&from_base, &from_deeper));
}

#[test]
fn negative_cache_is_invalidated_by_registration() {
    let registry = CodecRegistry::new();
    let host = TypeToken::class("late.Arrival").build();

    assert!(registry.get_codec(&host, None).is_none());
    assert!(registry.get_codec(&host, Some(ColumnType::Varchar)).is_none());

    // Registering after the memoized miss supersedes it.
    registry.register_for(host.clone(), WidgetCodec { host_type: None });
    assert!(registry.get_codec(&host, None).is_some());
}

#[test]
fn ambiguous_untyped_lookup_returns_none() {
    struct OtherCodec;

    impl Codec for OtherCodec {
        fn class(&self) -> CodecClass {
            CodecClass::builder::<Self>()
                .with_nullary_ctor(|| Ok(Box::new(OtherCodec)))
                .build()
        }

        fn encode(&self, _value: &dyn Any) -> Result<ColumnValue> {
            Ok(ColumnValue::Null)
        }

        fn decode(&self, _value: &ColumnValue) -> Result<HostValue> {
            Ok(Box::new(()))
        }
    }

    let registry = CodecRegistry::new();
    let host = TypeToken::class("Ambiguous").build();
    registry.register_mapping(host.clone(), Some(ColumnType::Varchar), WidgetCodec {
        host_type: None,
    });
    registry.register_mapping(host.clone(), Some(ColumnType::Clob), OtherCodec);

    assert!(registry.get_codec(&host, None).is_none());
    // The specific pairs still resolve.
    assert!(registry.get_codec(&host, Some(ColumnType::Varchar)).is_some());
    assert!(registry.get_codec(&host, Some(ColumnType::Clob)).is_some());
}

#[test]
fn parameterized_tokens_are_distinct_keys() {
    let registry = CodecRegistry::new();
    let list = TypeToken::class("List").build();
    let list_of_strings = TypeToken::parameterized(list.clone(), [TypeToken::of::<String>()]);
    let list_of_ints = TypeToken::parameterized(list, [TypeToken::of::<i32>()]);

    registry.register_for(list_of_strings.clone(), WidgetCodec { host_type: None });
    assert!(registry.get_codec(&list_of_strings, None).is_some());
    assert!(registry.get_codec(&list_of_ints, None).is_none());
}

// ---------------------------------------------------------------------------
// Registration surface
// ---------------------------------------------------------------------------

#[test]
fn metadata_driven_registration() {
    struct TaggedCodec;

    impl Codec for TaggedCodec {
        fn class(&self) -> CodecClass {
            CodecClass::builder::<Self>()
                .with_nullary_ctor(|| Ok(Box::new(TaggedCodec)))
                .with_descriptor(
                    CodecDescriptor::new()
                        .with_host_type(TypeToken::class("acme.X").build())
                        .with_host_type(TypeToken::class("acme.Y").build())
                        .with_column_type(ColumnType::Varchar)
                        .with_column_type(ColumnType::Char)
                        .with_untyped_column(),
                )
                .build()
        }

        fn encode(&self, _value: &dyn Any) -> Result<ColumnValue> {
            Ok(ColumnValue::Null)
        }

        fn decode(&self, _value: &ColumnValue) -> Result<HostValue> {
            Ok(Box::new(()))
        }
    }

    let registry = CodecRegistry::new();
    registry.register(TaggedCodec);

    for host in [
        TypeToken::class("acme.X").build(),
        TypeToken::class("acme.Y").build(),
    ] {
        assert!(registry.get_codec(&host, Some(ColumnType::Varchar)).is_some());
        assert!(registry.get_codec(&host, Some(ColumnType::Char)).is_some());
        assert!(registry.get_codec(&host, None).is_some());
    }
}

#[test]
fn class_registration_instantiates_per_host_type() {
    let registry = CodecRegistry::new();
    let host = TypeToken::class("acme.Widget").build();
    registry
        .register_class_for(host.clone(), &WidgetCodec::codec_class())
        .expect("class registration");

    let codec = registry.get_codec(&host, None).expect("instantiated codec");
    // The factory passed the host type to the constructor.
    assert_eq!(codec.described_host_type(), Some(host));
}

#[test]
fn reverse_lookup_returns_canonical_instance() {
    let registry = CodecRegistry::new();
    let host = TypeToken::class("acme.Widget").build();
    registry.register_for(host.clone(), WidgetCodec { host_type: None });

    let resolved = registry.get_codec(&host, None).expect("registered codec");
    let by_class = registry
        .get_codec_by_class(&WidgetCodec::codec_class())
        .expect("reverse lookup");
    assert!(Arc::ptr_eq(&resolved, &by_class));
}

#[test]
fn name_based_registration_requires_resolvable_names() {
    let registry = CodecRegistry::new();

    // No provider installed: nothing is resolvable.
    let err = registry
        .register_by_name("acme.Widget", "acme.WidgetCodec")
        .unwrap_err();
    assert!(matches!(err, TypeError::TypeNotFound(_)));

    let host = TypeToken::class("acme.Widget").build();
    registry.set_discovery(Box::new(
        StaticDiscovery::new()
            .with_host_type("acme.Widget", host.clone())
            .with_codec_class("acme.WidgetCodec", WidgetCodec::codec_class()),
    ));

    registry
        .register_by_name("acme.Widget", "acme.WidgetCodec")
        .expect("both names resolve");
    assert!(registry.get_codec(&host, None).is_some());

    let err = registry
        .register_by_name("acme.Missing", "acme.WidgetCodec")
        .unwrap_err();
    assert_eq!(err, TypeError::TypeNotFound("acme.Missing".to_string()));
}

#[test]
fn namespace_scan_skips_uninstantiable_candidates() {
    let registry = CodecRegistry::new();
    registry.set_discovery(Box::new(
        StaticDiscovery::new()
            .with_candidate("acme.codecs", Candidate::concrete(WidgetCodec::codec_class()))
            .with_candidate(
                "acme.codecs",
                Candidate {
                    class: WidgetCodec::codec_class(),
                    kind: CandidateKind::Abstract,
                },
            )
            .with_candidate(
                "acme.codecs",
                Candidate {
                    class: WidgetCodec::codec_class(),
                    kind: CandidateKind::Interface,
                },
            ),
    ));

    let registered = registry.register_namespace("acme.codecs").expect("scan");
    assert_eq!(registered, 1);
    assert!(registry.get_codec_by_class(&WidgetCodec::codec_class()).is_some());

    // Unknown namespaces register nothing.
    assert_eq!(registry.register_namespace("acme.empty").unwrap(), 0);
}

// ---------------------------------------------------------------------------
// Concurrency
// ---------------------------------------------------------------------------

#[test]
fn concurrent_resolution_and_registration() {
    use std::thread;

    let registry = Arc::new(CodecRegistry::new());
    let mut handles = Vec::new();

    for worker in 0..8 {
        let registry = Arc::clone(&registry);
        handles.push(thread::spawn(move || {
            for i in 0..200 {
                // Read path: built-ins and a shared unmapped type.
                assert!(registry
                    .get_codec(&TypeToken::of::<i32>(), Some(ColumnType::Integer))
                    .is_some());
                let _ = registry.get_codec(&TypeToken::class("shared.Unmapped").build(), None);

                // Write path: worker-private registrations.
                let host = TypeToken::class(format!("worker{}.T{}", worker, i % 10)).build();
                registry.register_for(host.clone(), WidgetCodec { host_type: None });
                assert!(registry.get_codec(&host, None).is_some());
            }
        }));
    }

    for handle in handles {
        handle.join().expect("worker panicked");
    }

    // Post-condition: the shared miss is memoized, built-ins intact.
    assert!(registry
        .get_codec(&TypeToken::class("shared.Unmapped").build(), None)
        .is_none());
    assert!(registry.has_codec(&TypeToken::of::<String>()));
}
