// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 strata.dev

//! Error types for the type codec registry.

use std::fmt;

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, TypeError>;

/// Errors produced by codec registration, construction, and value translation.
///
/// Resolution (`CodecRegistry::get_codec` and friends) never errors: a missing
/// codec is a normal `None` return. Registration errors only for class-name
/// resolution and codec construction failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeError {
    // ========================================================================
    // Registration Errors
    // ========================================================================
    /// A host-type or codec-class name could not be resolved by the
    /// discovery provider.
    TypeNotFound(String),
    /// Neither constructor convention applied to the codec class, or the
    /// applicable constructor failed.
    ConstructionFailed {
        /// Codec class name.
        codec: String,
        /// Underlying cause.
        reason: String,
    },

    // ========================================================================
    // Translation Errors
    // ========================================================================
    /// A host value had the wrong concrete type for the codec.
    HostValueMismatch {
        /// Codec class name.
        codec: String,
        /// Host type the codec expected.
        expected: &'static str,
    },
    /// A column value had a shape the codec cannot interpret.
    ColumnValueMismatch {
        /// Codec class name.
        codec: String,
        /// Column value shape the codec expected.
        expected: &'static str,
    },
    /// A value was shaped correctly but failed lexical or range validation.
    InvalidValue {
        /// Codec class name.
        codec: String,
        /// What was wrong with the value.
        detail: String,
    },
}

impl fmt::Display for TypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeError::TypeNotFound(name) => write!(f, "type not found: {}", name),
            TypeError::ConstructionFailed { codec, reason } => {
                write!(f, "could not construct codec {}: {}", codec, reason)
            }
            TypeError::HostValueMismatch { codec, expected } => {
                write!(f, "{} expected a host value of type {}", codec, expected)
            }
            TypeError::ColumnValueMismatch { codec, expected } => {
                write!(f, "{} expected a column value of shape {}", codec, expected)
            }
            TypeError::InvalidValue { codec, detail } => {
                write!(f, "{} rejected value: {}", codec, detail)
            }
        }
    }
}

impl std::error::Error for TypeError {}
