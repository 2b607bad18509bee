// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 strata.dev

//! Codec discovery collaborator.
//!
//! Namespace scanning and class-name resolution are injected behind this
//! trait; the registry never does its own lookup of names. A provider is
//! typically generated at build time or assembled from plugin manifests.

use std::collections::HashMap;

use crate::codec::CodecClass;
use crate::token::TypeToken;

/// What kind of declaration a scan candidate is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateKind {
    /// Instantiable codec class.
    Concrete,
    /// Abstract base; never registered.
    Abstract,
    /// Interface; never registered.
    Interface,
    /// Anonymous class; never registered.
    Anonymous,
}

/// A codec class found by a namespace scan.
#[derive(Clone)]
pub struct Candidate {
    /// The discovered class.
    pub class: CodecClass,
    /// Declaration kind; only [`CandidateKind::Concrete`] gets registered.
    pub kind: CandidateKind,
}

impl Candidate {
    /// A concrete, registrable candidate.
    pub fn concrete(class: CodecClass) -> Self {
        Candidate {
            class,
            kind: CandidateKind::Concrete,
        }
    }
}

/// Resolves codec classes and host types from names and namespaces.
pub trait CodecDiscovery: Send + Sync {
    /// All codec classes declared under a namespace.
    fn scan(&self, namespace: &str) -> Vec<Candidate>;

    /// Resolve a host type by fully-qualified name.
    fn resolve_host_type(&self, name: &str) -> Option<TypeToken>;

    /// Resolve a codec class by fully-qualified name.
    fn resolve_codec_class(&self, name: &str) -> Option<CodecClass>;
}

/// Table-backed discovery provider.
///
/// Handy for tests and for hosts that assemble their codec set statically.
#[derive(Default)]
pub struct StaticDiscovery {
    namespaces: HashMap<String, Vec<Candidate>>,
    host_types: HashMap<String, TypeToken>,
    codec_classes: HashMap<String, CodecClass>,
}

impl StaticDiscovery {
    /// Empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a candidate under a namespace.
    #[must_use]
    pub fn with_candidate(mut self, namespace: impl Into<String>, candidate: Candidate) -> Self {
        self.namespaces
            .entry(namespace.into())
            .or_default()
            .push(candidate);
        self
    }

    /// Make a host type resolvable by name.
    #[must_use]
    pub fn with_host_type(mut self, name: impl Into<String>, token: TypeToken) -> Self {
        self.host_types.insert(name.into(), token);
        self
    }

    /// Make a codec class resolvable by name.
    #[must_use]
    pub fn with_codec_class(mut self, name: impl Into<String>, class: CodecClass) -> Self {
        self.codec_classes.insert(name.into(), class);
        self
    }
}

impl CodecDiscovery for StaticDiscovery {
    fn scan(&self, namespace: &str) -> Vec<Candidate> {
        self.namespaces.get(namespace).cloned().unwrap_or_default()
    }

    fn resolve_host_type(&self, name: &str) -> Option<TypeToken> {
        self.host_types.get(name).cloned()
    }

    fn resolve_codec_class(&self, name: &str) -> Option<CodecClass> {
        self.codec_classes.get(name).cloned()
    }
}
