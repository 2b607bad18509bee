// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 strata.dev

//! The codec capability and its reified class.
//!
//! A codec translates values between a host type and a column type. The
//! registry treats codecs as black boxes: everything it needs to know about
//! one — identity, constructor conventions, declarative metadata — lives on
//! the [`CodecClass`] the codec reports via [`Codec::class`].

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use crate::column::{ColumnType, ColumnValue};
use crate::error::Result;
use crate::token::TypeToken;
use crate::util::short_type_name;

/// A dynamically-typed host-side value produced by decoding.
pub type HostValue = Box<dyn Any + Send + Sync>;

/// Constructor convention taking the concrete host type token.
pub type HostTypeCtor = fn(TypeToken) -> Result<Box<dyn Codec>>;

/// No-argument constructor convention.
pub type NullaryCtor = fn() -> Result<Box<dyn Codec>>;

// ---------------------------------------------------------------------------
// Codec
// ---------------------------------------------------------------------------

/// Translates values between a host type and a column type.
pub trait Codec: Send + Sync + 'static {
    /// The reified class of this codec.
    fn class(&self) -> CodecClass;

    /// Encode a host value into its column representation.
    fn encode(&self, value: &dyn Any) -> Result<ColumnValue>;

    /// Decode a column value back into a host value.
    fn decode(&self, value: &ColumnValue) -> Result<HostValue>;

    /// The host type this codec knows it handles, if it can say.
    ///
    /// Used by instance-only registration when the class declares no mapped
    /// host types.
    fn described_host_type(&self) -> Option<TypeToken> {
        None
    }
}

// ---------------------------------------------------------------------------
// CodecDescriptor
// ---------------------------------------------------------------------------

/// Declarative metadata attached to a codec class.
///
/// Mirrors what the registry reads during registration: the host types the
/// codec handles, the column types it handles, and whether it also applies
/// when the column type is unspecified.
#[derive(Clone, Default)]
pub struct CodecDescriptor {
    host_types: Vec<TypeToken>,
    column_types: Vec<ColumnType>,
    include_untyped: bool,
}

impl CodecDescriptor {
    /// Empty descriptor (no declared metadata).
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a handled host type (repeatable).
    #[must_use]
    pub fn with_host_type(mut self, host_type: TypeToken) -> Self {
        self.host_types.push(host_type);
        self
    }

    /// Declare a handled column type (repeatable).
    #[must_use]
    pub fn with_column_type(mut self, column_type: ColumnType) -> Self {
        self.column_types.push(column_type);
        self
    }

    /// Also register under the unspecified column type.
    #[must_use]
    pub fn with_untyped_column(mut self) -> Self {
        self.include_untyped = true;
        self
    }

    /// Declared host types.
    pub fn host_types(&self) -> &[TypeToken] {
        &self.host_types
    }

    /// Declared column types.
    pub fn column_types(&self) -> &[ColumnType] {
        &self.column_types
    }

    /// Whether the codec also applies under the unspecified column type.
    pub fn includes_untyped_column(&self) -> bool {
        self.include_untyped
    }
}

// ---------------------------------------------------------------------------
// CodecClass
// ---------------------------------------------------------------------------

pub(crate) struct CodecClassData {
    name: String,
    id: TypeId,
    host_type_ctor: Option<HostTypeCtor>,
    nullary_ctor: Option<NullaryCtor>,
    descriptor: CodecDescriptor,
}

/// The reified class of a codec implementation.
///
/// Identity is the `TypeId` of the implementing Rust type, so separately
/// built `CodecClass` values for the same implementation compare equal.
#[derive(Clone)]
pub struct CodecClass(pub(crate) Arc<CodecClassData>);

impl CodecClass {
    /// Start building the class of codec implementation `C`.
    pub fn builder<C: Codec>() -> CodecClassBuilder {
        CodecClassBuilder {
            name: short_type_name(std::any::type_name::<C>()),
            id: TypeId::of::<C>(),
            host_type_ctor: None,
            nullary_ctor: None,
            descriptor: CodecDescriptor::new(),
        }
    }

    /// Display name of the codec class.
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Identity of the implementing type.
    pub fn id(&self) -> TypeId {
        self.0.id
    }

    /// Declarative metadata.
    pub fn descriptor(&self) -> &CodecDescriptor {
        &self.0.descriptor
    }

    pub(crate) fn host_type_ctor(&self) -> Option<HostTypeCtor> {
        self.0.host_type_ctor
    }

    pub(crate) fn nullary_ctor(&self) -> Option<NullaryCtor> {
        self.0.nullary_ctor
    }
}

impl PartialEq for CodecClass {
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id
    }
}

impl Eq for CodecClass {}

impl fmt::Debug for CodecClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CodecClass").field(&self.0.name).finish()
    }
}

/// Builder for [`CodecClass`].
pub struct CodecClassBuilder {
    name: String,
    id: TypeId,
    host_type_ctor: Option<HostTypeCtor>,
    nullary_ctor: Option<NullaryCtor>,
    descriptor: CodecDescriptor,
}

impl CodecClassBuilder {
    /// Override the display name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Install the host-type constructor convention.
    #[must_use]
    pub fn with_host_type_ctor(mut self, ctor: HostTypeCtor) -> Self {
        self.host_type_ctor = Some(ctor);
        self
    }

    /// Install the no-argument constructor convention.
    #[must_use]
    pub fn with_nullary_ctor(mut self, ctor: NullaryCtor) -> Self {
        self.nullary_ctor = Some(ctor);
        self
    }

    /// Attach declarative metadata.
    #[must_use]
    pub fn with_descriptor(mut self, descriptor: CodecDescriptor) -> Self {
        self.descriptor = descriptor;
        self
    }

    /// Finish the class.
    pub fn build(self) -> CodecClass {
        CodecClass(Arc::new(CodecClassData {
            name: self.name,
            id: self.id,
            host_type_ctor: self.host_type_ctor,
            nullary_ctor: self.nullary_ctor,
            descriptor: self.descriptor,
        }))
    }
}
