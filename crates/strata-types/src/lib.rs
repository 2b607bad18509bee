// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 strata.dev

//! # strata-types — Type Codec Registry
//!
//! The type-mapping layer of the Strata data-access framework: a
//! bidirectional dispatch table that, given a host type and/or a database
//! column type, selects the codec that translates values between the two
//! worlds.
//!
//! ## Quick Start
//!
//! ```rust
//! use strata_types::{CodecRegistry, ColumnType, TypeToken};
//!
//! let registry = CodecRegistry::new();
//!
//! // Built-in codecs are installed at construction.
//! let codec = registry
//!     .get_codec(&TypeToken::of::<i32>(), Some(ColumnType::Integer))
//!     .expect("built-in integer codec");
//!
//! let column = codec.encode(&42_i32).unwrap();
//! assert_eq!(column.as_i32(), Some(42));
//!
//! let host = codec.decode(&column).unwrap();
//! assert_eq!(host.downcast_ref::<i32>(), Some(&42));
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`CodecRegistry`] | The dispatch table; register on the write path, resolve on the read path |
//! | [`Codec`] | Capability object translating host values to column values and back |
//! | [`CodecClass`] | Reified codec class: identity, constructors, declarative metadata |
//! | [`TypeToken`] | Reified host type, carrying hierarchy metadata where needed |
//! | [`ColumnType`] | Closed enumeration of database column categories |
//! | [`ColumnValue`] | Dynamic value on the column side of a codec |
//!
//! ## Resolution
//!
//! Lookup walks the host type's inner map in order: the requested column
//! type, then the unspecified slot, then the sole registered codec if the
//! map is unambiguous. On a full miss the registry walks the host type's
//! hierarchy — interfaces for enums (re-instantiating the found codecs with
//! the enum type), superclasses otherwise — and memoizes the outcome.
//! Unregistered enums get the default enum codec installed on first lookup.
//!
//! ## Features
//!
//! - `chrono`: installs codecs for the chrono date/time types during
//!   bootstrap.

mod codec;
mod column;
mod discovery;
mod error;
mod registry;
mod token;
mod util;

pub mod codecs;
pub mod factory;

pub use codec::{
    Codec, CodecClass, CodecClassBuilder, CodecDescriptor, HostTypeCtor, HostValue, NullaryCtor,
};
pub use column::{ColumnType, ColumnValue};
pub use discovery::{Candidate, CandidateKind, CodecDiscovery, StaticDiscovery};
pub use error::{Result, TypeError};
pub use registry::CodecRegistry;
pub use token::{EnumAccess, HostEnum, TypeShape, TypeToken, TypeTokenBuilder};
