// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 strata.dev

//! Reified host-type tokens.
//!
//! Rust has no runtime reflection, so the token *is* the type descriptor:
//! hierarchy metadata (supertype, implemented interfaces) and enum variant
//! access are supplied when the token is built. Tokens are cheap to clone and
//! compare structurally on the underlying class, which makes them usable as
//! index keys in the registry.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use crate::codec::HostValue;
use crate::util::short_type_name;

// ---------------------------------------------------------------------------
// HostEnum
// ---------------------------------------------------------------------------

/// Variant-level access to a host enum type.
///
/// Implementing this for an enum and building its token via
/// [`TypeToken::enumeration`] is what lets the default enum codecs translate
/// values of the enum without knowing it at compile time.
pub trait HostEnum: Any + Send + Sync + Sized {
    /// Name of this value's variant.
    fn variant_name(&self) -> &'static str;
    /// Construct a value from a variant name.
    fn from_variant_name(name: &str) -> Option<Self>;
    /// Zero-based position of this value's variant.
    fn ordinal(&self) -> u32;
    /// Construct a value from a variant position.
    fn from_ordinal(ordinal: u32) -> Option<Self>;
}

/// Erased variant access captured from a [`HostEnum`] implementation.
///
/// Function pointers, not closures: the vtable is `Copy` and carries no
/// state, so tokens stay cheap to share across threads.
#[derive(Clone, Copy)]
pub struct EnumAccess {
    pub(crate) variant_name: fn(&dyn Any) -> Option<&'static str>,
    pub(crate) variant_ordinal: fn(&dyn Any) -> Option<u32>,
    pub(crate) from_name: fn(&str) -> Option<HostValue>,
    pub(crate) from_ordinal: fn(u32) -> Option<HostValue>,
}

impl EnumAccess {
    fn of<T: HostEnum>() -> Self {
        EnumAccess {
            variant_name: |value| value.downcast_ref::<T>().map(T::variant_name),
            variant_ordinal: |value| value.downcast_ref::<T>().map(T::ordinal),
            from_name: |name| T::from_variant_name(name).map(|v| Box::new(v) as HostValue),
            from_ordinal: |ordinal| T::from_ordinal(ordinal).map(|v| Box::new(v) as HostValue),
        }
    }
}

impl fmt::Debug for EnumAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EnumAccess")
    }
}

// ---------------------------------------------------------------------------
// TypeToken
// ---------------------------------------------------------------------------

/// Shape of the type a token describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeShape {
    /// Scalar leaf type.
    Primitive,
    /// Concrete (non-enum) class.
    Class,
    /// Abstract interface.
    Interface,
    /// Enumeration.
    Enum,
    /// Generic type reference carrying a raw class and its arguments.
    Parameterized,
}

/// Structural identity of a token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Identity {
    /// A native Rust type.
    Native(TypeId),
    /// A declared type known only by fully-qualified name.
    Named(String),
    /// The root object type.
    Object,
    /// Raw-class identity followed by the argument identities.
    Parameterized(Vec<Identity>),
}

struct TypeInfo {
    name: String,
    identity: Identity,
    shape: TypeShape,
    supertype: Option<TypeToken>,
    interfaces: Vec<TypeToken>,
    enum_access: Option<EnumAccess>,
    raw: Option<TypeToken>,
}

/// A reified host-type token.
///
/// Equality and hashing are structural on the underlying class: two tokens
/// built independently for the same native type (or the same declared name)
/// are equal, regardless of the hierarchy metadata they carry.
#[derive(Clone)]
pub struct TypeToken(Arc<TypeInfo>);

impl TypeToken {
    /// Token for a native Rust type with no hierarchy metadata.
    pub fn of<T: Any>() -> Self {
        TypeTokenBuilder::native::<T>(TypeShape::Class).build()
    }

    /// Token for a native scalar type under an explicit display name.
    pub fn primitive<T: Any>(name: &str) -> Self {
        let mut builder = TypeTokenBuilder::native::<T>(TypeShape::Primitive);
        builder.name = name.to_string();
        builder.build()
    }

    /// The distinguished root object token.
    ///
    /// Codecs may be registered under it; the superclass walk never
    /// traverses past it.
    pub fn object() -> Self {
        TypeToken(Arc::new(TypeInfo {
            name: "Object".to_string(),
            identity: Identity::Object,
            shape: TypeShape::Class,
            supertype: None,
            interfaces: Vec::new(),
            enum_access: None,
            raw: None,
        }))
    }

    /// Builder for a declared class token.
    pub fn class(name: impl Into<String>) -> TypeTokenBuilder {
        TypeTokenBuilder::named(name.into(), TypeShape::Class)
    }

    /// Builder for a native class token (hierarchy metadata may be added).
    pub fn class_of<T: Any>() -> TypeTokenBuilder {
        TypeTokenBuilder::native::<T>(TypeShape::Class)
    }

    /// Builder for a declared interface token.
    pub fn interface(name: impl Into<String>) -> TypeTokenBuilder {
        TypeTokenBuilder::named(name.into(), TypeShape::Interface)
    }

    /// Builder for a native enum token with variant access wired in.
    pub fn enumeration<T: HostEnum>() -> TypeTokenBuilder {
        let mut builder = TypeTokenBuilder::native::<T>(TypeShape::Enum);
        builder.enum_access = Some(EnumAccess::of::<T>());
        builder
    }

    /// Builder for a declared enum token without native variant access.
    ///
    /// The default enum codec cannot be constructed for such a token; it is
    /// still a valid registration and lookup key.
    pub fn enum_named(name: impl Into<String>) -> TypeTokenBuilder {
        TypeTokenBuilder::named(name.into(), TypeShape::Enum)
    }

    /// A parameterized-type reference.
    ///
    /// Identity is structural over the raw class and the arguments.
    pub fn parameterized(raw: TypeToken, args: impl IntoIterator<Item = TypeToken>) -> Self {
        let args: Vec<TypeToken> = args.into_iter().collect();
        let mut identity = Vec::with_capacity(args.len() + 1);
        identity.push(raw.0.identity.clone());
        identity.extend(args.iter().map(|a| a.0.identity.clone()));
        let name = format!(
            "{}<{}>",
            raw.name(),
            args.iter().map(TypeToken::name).collect::<Vec<_>>().join(", ")
        );
        TypeToken(Arc::new(TypeInfo {
            name,
            identity: Identity::Parameterized(identity),
            shape: TypeShape::Parameterized,
            supertype: None,
            interfaces: Vec::new(),
            enum_access: None,
            raw: Some(raw),
        }))
    }

    /// Display name of the type.
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Shape of the type.
    pub fn shape(&self) -> TypeShape {
        self.0.shape
    }

    /// Whether this token describes an enum.
    pub fn is_enum(&self) -> bool {
        self.0.shape == TypeShape::Enum
    }

    /// Whether this is the root object token.
    pub fn is_object(&self) -> bool {
        self.0.identity == Identity::Object
    }

    /// Declared supertype, if any.
    pub fn supertype(&self) -> Option<&TypeToken> {
        self.0.supertype.as_ref()
    }

    /// Implemented interfaces, in declaration order.
    pub fn interfaces(&self) -> &[TypeToken] {
        &self.0.interfaces
    }

    /// Raw class of a parameterized reference.
    pub fn raw_component(&self) -> Option<&TypeToken> {
        self.0.raw.as_ref()
    }

    /// Variant access for native enum tokens.
    pub(crate) fn enum_access(&self) -> Option<&EnumAccess> {
        self.0.enum_access.as_ref()
    }
}

impl PartialEq for TypeToken {
    fn eq(&self, other: &Self) -> bool {
        self.0.identity == other.0.identity
    }
}

impl Eq for TypeToken {}

impl std::hash::Hash for TypeToken {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.identity.hash(state);
    }
}

impl fmt::Debug for TypeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeToken")
            .field("name", &self.0.name)
            .field("shape", &self.0.shape)
            .finish()
    }
}

impl fmt::Display for TypeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.name)
    }
}

// ---------------------------------------------------------------------------
// TypeTokenBuilder
// ---------------------------------------------------------------------------

/// Builder for tokens that carry hierarchy metadata.
pub struct TypeTokenBuilder {
    name: String,
    identity: Identity,
    shape: TypeShape,
    supertype: Option<TypeToken>,
    interfaces: Vec<TypeToken>,
    enum_access: Option<EnumAccess>,
}

impl TypeTokenBuilder {
    fn native<T: Any>(shape: TypeShape) -> Self {
        TypeTokenBuilder {
            name: short_type_name(std::any::type_name::<T>()),
            identity: Identity::Native(TypeId::of::<T>()),
            shape,
            supertype: None,
            interfaces: Vec::new(),
            enum_access: None,
        }
    }

    fn named(name: String, shape: TypeShape) -> Self {
        TypeTokenBuilder {
            identity: Identity::Named(name.clone()),
            name,
            shape,
            supertype: None,
            interfaces: Vec::new(),
            enum_access: None,
        }
    }

    /// Declare the supertype.
    #[must_use]
    pub fn extends(mut self, supertype: TypeToken) -> Self {
        self.supertype = Some(supertype);
        self
    }

    /// Declare an implemented interface (repeatable; order is preserved and
    /// drives the enum interface walk).
    #[must_use]
    pub fn implements(mut self, interface: TypeToken) -> Self {
        self.interfaces.push(interface);
        self
    }

    /// Finish the token.
    pub fn build(self) -> TypeToken {
        TypeToken(Arc::new(TypeInfo {
            name: self.name,
            identity: self.identity,
            shape: self.shape,
            supertype: self.supertype,
            interfaces: self.interfaces,
            enum_access: self.enum_access,
            raw: None,
        }))
    }
}
