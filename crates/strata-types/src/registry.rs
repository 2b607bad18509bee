// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 strata.dev

//! The bidirectional type codec registry.
//!
//! Codecs are keyed under a two-dimensional index: host type on the outside,
//! column type (or "unspecified") on the inside. Resolution walks the host
//! type's hierarchy — interfaces for enums, superclasses otherwise — and
//! memoizes misses with a negative sentinel so repeated lookups of unmapped
//! types stay cheap.
//!
//! The host-type index is concurrent; the column-type and codec-class
//! indices are written during single-threaded configuration and read-mostly
//! afterwards.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use arc_swap::ArcSwap;
use dashmap::DashMap;
use parking_lot::RwLock;

use crate::codec::{Codec, CodecClass, CodecClassData};
use crate::codecs::{
    ArrayCodec, BigIntegerCodec, BlobBoxedByteArrayCodec, BlobCodec, BlobStreamCodec, BoolCodec,
    BoxedByteArrayCodec, ByteArrayCodec, ByteCodec, ByteStream, CharCodec, CharReader, ClobCodec,
    ClobReaderCodec, DateCodec, DateOnlyCodec, Decimal, DecimalCodec, DoubleCodec, EnumCodec,
    FloatCodec, IntCodec, LongCodec, NClobCodec, NStringCodec, ShortCodec, SqlDate, SqlDateCodec,
    SqlTime, SqlTimeCodec, SqlTimestamp, SqlTimestampCodec, StringCodec, TimeOnlyCodec,
    UnknownCodec,
};
use crate::column::ColumnType;
use crate::discovery::{CandidateKind, CodecDiscovery};
use crate::error::{Result, TypeError};
use crate::factory;
use crate::token::TypeToken;

/// Inner mapping from column type (or unspecified) to codec.
type ColumnMap = HashMap<Option<ColumnType>, CodecEntry>;

/// A registered codec with its reified class.
///
/// The class rides along so the enum interface walk can re-instantiate the
/// codec for a concrete enum type.
#[derive(Clone)]
struct CodecEntry {
    class: CodecClass,
    instance: Arc<dyn Codec>,
}

impl CodecEntry {
    fn new(codec: impl Codec) -> Self {
        let class = codec.class();
        CodecEntry {
            class,
            instance: Arc::new(codec),
        }
    }

    fn from_boxed(codec: Box<dyn Codec>) -> Self {
        let class = codec.class();
        CodecEntry {
            class,
            instance: Arc::from(codec),
        }
    }
}

/// State of a host type in the index.
#[derive(Clone)]
enum ColumnMapSlot {
    /// Registered (or hierarchy-resolved) codecs.
    Codecs(ColumnMap),
    /// Negative sentinel: resolution was attempted and found nothing.
    NoCodec,
}

// ---------------------------------------------------------------------------
// CodecRegistry
// ---------------------------------------------------------------------------

/// Bidirectional dispatch table from host types and column types to codecs.
///
/// Created once, populated eagerly with the built-in codecs, extended by
/// user registrations during configuration, and read-mostly afterwards.
/// All methods take `&self`; the registry is safe to share across threads.
///
/// Late registrations supersede memoized misses: registering a host type
/// whose slot holds the negative sentinel replaces the sentinel with a fresh
/// inner map.
pub struct CodecRegistry {
    by_host_type: DashMap<TypeToken, ColumnMapSlot>,
    by_column_type: RwLock<HashMap<ColumnType, CodecEntry>>,
    by_codec_class: RwLock<HashMap<TypeId, CodecEntry>>,
    unknown: CodecEntry,
    default_enum_class: ArcSwap<CodecClassData>,
    discovery: RwLock<Option<Box<dyn CodecDiscovery>>>,
}

impl CodecRegistry {
    /// Create a registry with the built-in codecs installed.
    #[must_use]
    pub fn new() -> Self {
        let registry = CodecRegistry {
            by_host_type: DashMap::new(),
            by_column_type: RwLock::new(HashMap::new()),
            by_codec_class: RwLock::new(HashMap::new()),
            unknown: CodecEntry::new(UnknownCodec),
            default_enum_class: ArcSwap::from(EnumCodec::codec_class().0),
            discovery: RwLock::new(None),
        };
        registry.install_builtins();
        registry
    }

    /// Install the discovery provider used by namespace and name-based
    /// registration.
    pub fn set_discovery(&self, provider: Box<dyn CodecDiscovery>) {
        *self.discovery.write() = Some(provider);
    }

    /// Replace the codec class installed for enums with no explicit
    /// registration.
    pub fn set_default_enum_codec_class(&self, class: CodecClass) {
        self.default_enum_class.store(class.0);
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Register a codec instance.
    ///
    /// Host types are taken from the class descriptor if declared, else from
    /// the codec's self-description, else the codec is reachable only
    /// through column-type and reverse lookup.
    pub fn register<C: Codec>(&self, codec: C) {
        self.register_instance(CodecEntry::new(codec));
    }

    /// Register a codec instance under an explicit host type.
    ///
    /// Column types are taken from the class descriptor if declared, else
    /// the codec lands under the unspecified column type.
    pub fn register_for<C: Codec>(&self, host_type: TypeToken, codec: C) {
        self.register_with_descriptor_columns(Some(host_type), CodecEntry::new(codec));
    }

    /// Register a codec instance under an explicit host and column type.
    ///
    /// `None` for the column type means "unspecified". An existing entry
    /// under the same pair is overwritten.
    pub fn register_mapping<C: Codec>(
        &self,
        host_type: TypeToken,
        column_type: Option<ColumnType>,
        codec: C,
    ) {
        self.register_entry(Some(host_type), column_type, CodecEntry::new(codec));
    }

    /// Register the codec used when only the column type is known.
    pub fn register_column<C: Codec>(&self, column_type: ColumnType, codec: C) {
        self.register_column_entry(column_type, CodecEntry::new(codec));
    }

    /// Register a codec class, instantiating through the factory.
    ///
    /// Descriptor host types are honored: the codec is instantiated once per
    /// declared host type, with that type passed to the constructor.
    pub fn register_class(&self, class: &CodecClass) -> Result<()> {
        let host_types = class.descriptor().host_types().to_vec();
        if host_types.is_empty() {
            let codec = factory::instantiate(None, class)?;
            self.register_instance(CodecEntry::from_boxed(codec));
            return Ok(());
        }
        for host_type in host_types {
            self.register_class_for(host_type, class)?;
        }
        Ok(())
    }

    /// Register a codec class under an explicit host type.
    pub fn register_class_for(&self, host_type: TypeToken, class: &CodecClass) -> Result<()> {
        let codec = factory::instantiate(Some(&host_type), class)?;
        self.register_with_descriptor_columns(Some(host_type), CodecEntry::from_boxed(codec));
        Ok(())
    }

    /// Register a codec class under an explicit host and column type.
    pub fn register_class_mapping(
        &self,
        host_type: TypeToken,
        column_type: Option<ColumnType>,
        class: &CodecClass,
    ) -> Result<()> {
        let codec = factory::instantiate(Some(&host_type), class)?;
        self.register_entry(Some(host_type), column_type, CodecEntry::from_boxed(codec));
        Ok(())
    }

    /// Register a codec class for a host type, both given by name.
    ///
    /// Names are resolved through the discovery provider; an unresolvable
    /// name fails with [`TypeError::TypeNotFound`].
    pub fn register_by_name(&self, host_type: &str, codec_class: &str) -> Result<()> {
        let (host, class) = {
            let guard = self.discovery.read();
            let provider = guard
                .as_ref()
                .ok_or_else(|| TypeError::TypeNotFound(host_type.to_string()))?;
            let host = provider
                .resolve_host_type(host_type)
                .ok_or_else(|| TypeError::TypeNotFound(host_type.to_string()))?;
            let class = provider
                .resolve_codec_class(codec_class)
                .ok_or_else(|| TypeError::TypeNotFound(codec_class.to_string()))?;
            (host, class)
        };
        self.register_class_for(host, &class)
    }

    /// Register every concrete codec class the discovery provider finds
    /// under a namespace. Returns how many classes were registered.
    pub fn register_namespace(&self, namespace: &str) -> Result<usize> {
        let candidates = {
            let guard = self.discovery.read();
            match guard.as_ref() {
                Some(provider) => provider.scan(namespace),
                None => {
                    log::warn!(
                        "[CodecRegistry::register_namespace] no discovery provider; skipping '{}'",
                        namespace
                    );
                    return Ok(0);
                }
            }
        };
        let mut registered = 0;
        for candidate in candidates {
            // Abstract bases, interfaces, and anonymous classes are not
            // instantiable registrations.
            if candidate.kind != CandidateKind::Concrete {
                continue;
            }
            self.register_class(&candidate.class)?;
            registered += 1;
        }
        log::debug!(
            "[CodecRegistry::register_namespace] '{}': {} codec classes",
            namespace,
            registered
        );
        Ok(registered)
    }

    // ========================================================================
    // Resolution
    // ========================================================================

    /// Resolve the codec for a host type and an optional column type.
    ///
    /// Lookup order inside the host type's inner map: the requested column
    /// type, then "unspecified", then the sole registered codec if every
    /// entry shares one codec class. Absence is a normal return; resolution
    /// never errors.
    pub fn get_codec(
        &self,
        host_type: &TypeToken,
        column_type: Option<ColumnType>,
    ) -> Option<Arc<dyn Codec>> {
        let map = self.column_map_for(host_type)?;
        let entry = map
            .get(&column_type)
            .or_else(|| map.get(&None))
            .cloned()
            .or_else(|| Self::sole_entry(&map));
        entry.map(|e| e.instance)
    }

    /// Resolve the codec to use when only the column type is known.
    pub fn get_codec_for_column(&self, column_type: ColumnType) -> Option<Arc<dyn Codec>> {
        self.by_column_type
            .read()
            .get(&column_type)
            .map(|e| e.instance.clone())
    }

    /// The canonical instance registered for a codec class.
    pub fn get_codec_by_class(&self, class: &CodecClass) -> Option<Arc<dyn Codec>> {
        self.by_codec_class
            .read()
            .get(&class.id())
            .map(|e| e.instance.clone())
    }

    /// The canonical instance registered for codec implementation `C`.
    pub fn get_codec_by_class_of<C: Codec>(&self) -> Option<Arc<dyn Codec>> {
        self.by_codec_class
            .read()
            .get(&TypeId::of::<C>())
            .map(|e| e.instance.clone())
    }

    /// The last-resort codec for the root object type.
    pub fn unknown_codec(&self) -> Arc<dyn Codec> {
        self.unknown.instance.clone()
    }

    /// Whether a codec resolves for the host type with no column type given.
    pub fn has_codec(&self, host_type: &TypeToken) -> bool {
        self.get_codec(host_type, None).is_some()
    }

    /// Whether a codec resolves for the host type under the given column
    /// type.
    pub fn has_codec_for(&self, host_type: &TypeToken, column_type: ColumnType) -> bool {
        self.get_codec(host_type, Some(column_type)).is_some()
    }

    /// Every registered codec instance (read-only snapshot).
    pub fn all_codecs(&self) -> Vec<Arc<dyn Codec>> {
        self.by_codec_class
            .read()
            .values()
            .map(|e| e.instance.clone())
            .collect()
    }

    // ========================================================================
    // Registration internals
    // ========================================================================

    /// Instance-only registration: descriptor host types, then
    /// self-description, then host-type-agnostic.
    fn register_instance(&self, entry: CodecEntry) {
        let host_types = entry.class.descriptor().host_types().to_vec();
        if !host_types.is_empty() {
            for host_type in host_types {
                self.register_with_descriptor_columns(Some(host_type), entry.clone());
            }
            return;
        }
        if let Some(host_type) = entry.instance.described_host_type() {
            self.register_with_descriptor_columns(Some(host_type), entry);
            return;
        }
        self.register_with_descriptor_columns(None, entry);
    }

    /// Fan a registration out over the descriptor's column types.
    fn register_with_descriptor_columns(&self, host_type: Option<TypeToken>, entry: CodecEntry) {
        let descriptor = entry.class.descriptor().clone();
        let column_types = descriptor.column_types();
        if column_types.is_empty() {
            self.register_entry(host_type, None, entry);
            return;
        }
        for column_type in column_types {
            self.register_entry(host_type.clone(), Some(*column_type), entry.clone());
        }
        if descriptor.includes_untyped_column() {
            self.register_entry(host_type, None, entry);
        }
    }

    /// Canonical registration form.
    fn register_entry(
        &self,
        host_type: Option<TypeToken>,
        column_type: Option<ColumnType>,
        entry: CodecEntry,
    ) {
        if let Some(host_type) = host_type {
            log::debug!(
                "[CodecRegistry::register] {} under {} -> {}",
                host_type,
                column_type.map_or("ANY", |c| c.name()),
                entry.class.name()
            );
            let mut slot = self
                .by_host_type
                .entry(host_type)
                .or_insert_with(|| ColumnMapSlot::Codecs(ColumnMap::new()));
            if matches!(&*slot, ColumnMapSlot::NoCodec) {
                // A late registration supersedes the memoized miss.
                *slot = ColumnMapSlot::Codecs(ColumnMap::new());
            }
            if let ColumnMapSlot::Codecs(map) = &mut *slot {
                map.insert(column_type, entry.clone());
            }
        }
        self.by_codec_class.write().insert(entry.class.id(), entry);
    }

    fn register_column_entry(&self, column_type: ColumnType, entry: CodecEntry) {
        self.by_column_type.write().insert(column_type, entry);
    }

    // ========================================================================
    // Resolution internals
    // ========================================================================

    fn slot_of(&self, host_type: &TypeToken) -> Option<ColumnMapSlot> {
        // Clone out so no shard lock is held across hierarchy walks.
        self.by_host_type.get(host_type).map(|r| r.value().clone())
    }

    /// Fetch (or compute and install) the inner map for a host type.
    fn column_map_for(&self, host_type: &TypeToken) -> Option<ColumnMap> {
        match self.slot_of(host_type) {
            Some(ColumnMapSlot::Codecs(map)) => return Some(map),
            Some(ColumnMapSlot::NoCodec) => return None,
            None => {}
        }
        let resolved = if host_type.is_enum() {
            match self.find_interface_map(host_type) {
                Some(found) => Some(self.rebuild_for_enum(&found, host_type)),
                None => return self.install_default_enum_codec(host_type),
            }
        } else {
            self.superclass_map(host_type)
        };
        match resolved {
            Some(map) => {
                self.by_host_type
                    .insert(host_type.clone(), ColumnMapSlot::Codecs(map.clone()));
                Some(map)
            }
            None => {
                log::debug!(
                    "[CodecRegistry::resolve] no codec for '{}'; caching miss",
                    host_type
                );
                self.by_host_type
                    .insert(host_type.clone(), ColumnMapSlot::NoCodec);
                None
            }
        }
    }

    /// Depth-first search of the implemented interfaces, declaration order,
    /// first existing inner map wins.
    fn find_interface_map(&self, current: &TypeToken) -> Option<ColumnMap> {
        for interface in current.interfaces() {
            match self.slot_of(interface) {
                Some(ColumnMapSlot::Codecs(map)) => return Some(map),
                // A memoized miss on the interface says nothing about its
                // super-interfaces; keep walking.
                Some(ColumnMapSlot::NoCodec) | None => {
                    if let Some(found) = self.find_interface_map(interface) {
                        return Some(found);
                    }
                }
            }
        }
        None
    }

    /// Rebuild an interface's inner map for a concrete enum: every entry is
    /// re-instantiated with the enum type, since enum codecs generally
    /// depend on it at construction.
    fn rebuild_for_enum(&self, found: &ColumnMap, enum_type: &TypeToken) -> ColumnMap {
        let mut rebuilt = ColumnMap::new();
        for (column_type, entry) in found {
            match factory::instantiate(Some(enum_type), &entry.class) {
                Ok(codec) => {
                    rebuilt.insert(*column_type, CodecEntry::from_boxed(codec));
                }
                Err(e) => {
                    log::warn!(
                        "[CodecRegistry::resolve] dropping {} for enum '{}': {}",
                        entry.class.name(),
                        enum_type,
                        e
                    );
                }
            }
        }
        rebuilt
    }

    /// Enum with no interface hit: install the default enum codec under the
    /// enum type itself.
    fn install_default_enum_codec(&self, host_type: &TypeToken) -> Option<ColumnMap> {
        let class = CodecClass(self.default_enum_class.load_full());
        match factory::instantiate(Some(host_type), &class) {
            Ok(codec) => {
                self.register_entry(Some(host_type.clone()), None, CodecEntry::from_boxed(codec));
                match self.slot_of(host_type) {
                    Some(ColumnMapSlot::Codecs(map)) => Some(map),
                    _ => None,
                }
            }
            Err(e) => {
                // Resolution never raises; the miss is cached instead.
                log::warn!(
                    "[CodecRegistry::resolve] default enum codec {} failed for '{}': {}",
                    class.name(),
                    host_type,
                    e
                );
                self.by_host_type
                    .insert(host_type.clone(), ColumnMapSlot::NoCodec);
                None
            }
        }
    }

    /// Walk superclasses looking for an existing inner map. The walk stops
    /// at the root object type without reading it; codecs registered there
    /// are reachable by direct lookup only. Subclasses share the found map's
    /// codec instances.
    fn superclass_map(&self, host_type: &TypeToken) -> Option<ColumnMap> {
        let mut current = host_type.supertype().cloned();
        while let Some(supertype) = current {
            if supertype.is_object() {
                return None;
            }
            match self.slot_of(&supertype) {
                Some(ColumnMapSlot::Codecs(map)) => return Some(map),
                Some(ColumnMapSlot::NoCodec) => return None,
                None => {}
            }
            current = supertype.supertype().cloned();
        }
        None
    }

    /// The sole codec of the map, if all entries share one codec class.
    fn sole_entry(map: &ColumnMap) -> Option<CodecEntry> {
        let mut sole: Option<&CodecEntry> = None;
        for entry in map.values() {
            match sole {
                None => sole = Some(entry),
                Some(prev) if prev.class.id() == entry.class.id() => {}
                Some(_) => return None,
            }
        }
        sole.cloned()
    }

    // ========================================================================
    // Bootstrap
    // ========================================================================

    #[allow(clippy::too_many_lines)] // flat table of built-in bindings
    fn install_builtins(&self) {
        // boolean
        self.register_for(TypeToken::primitive::<bool>("bool"), BoolCodec);
        self.register_column(ColumnType::Boolean, BoolCodec);
        self.register_column(ColumnType::Bit, BoolCodec);

        // integral widths
        self.register_for(TypeToken::primitive::<i8>("i8"), ByteCodec);
        self.register_column(ColumnType::TinyInt, ByteCodec);
        self.register_for(TypeToken::primitive::<i16>("i16"), ShortCodec);
        self.register_column(ColumnType::SmallInt, ShortCodec);
        self.register_for(TypeToken::primitive::<i32>("i32"), IntCodec);
        self.register_column(ColumnType::Integer, IntCodec);
        self.register_for(TypeToken::primitive::<i64>("i64"), LongCodec);

        // floating widths
        self.register_for(TypeToken::primitive::<f32>("f32"), FloatCodec);
        self.register_column(ColumnType::Float, FloatCodec);
        self.register_for(TypeToken::primitive::<f64>("f64"), DoubleCodec);
        self.register_column(ColumnType::Double, DoubleCodec);

        // strings
        let string = TypeToken::class_of::<String>().build();
        self.register_for(TypeToken::class_of::<CharReader>().build(), ClobReaderCodec);
        self.register_for(string.clone(), StringCodec);
        self.register_mapping(string.clone(), Some(ColumnType::Char), StringCodec);
        self.register_mapping(string.clone(), Some(ColumnType::Clob), ClobCodec);
        self.register_mapping(string.clone(), Some(ColumnType::Varchar), StringCodec);
        self.register_mapping(string.clone(), Some(ColumnType::LongVarchar), ClobCodec);
        self.register_mapping(string.clone(), Some(ColumnType::NVarchar), NStringCodec);
        self.register_mapping(string.clone(), Some(ColumnType::NChar), NStringCodec);
        self.register_mapping(string, Some(ColumnType::NClob), NClobCodec);
        self.register_column(ColumnType::Char, StringCodec);
        self.register_column(ColumnType::Varchar, StringCodec);
        self.register_column(ColumnType::Clob, ClobCodec);
        self.register_column(ColumnType::LongVarchar, ClobCodec);
        self.register_column(ColumnType::NVarchar, NStringCodec);
        self.register_column(ColumnType::NChar, NStringCodec);
        self.register_column(ColumnType::NClob, NClobCodec);

        // array
        self.register_mapping(TypeToken::object(), Some(ColumnType::Array), ArrayCodec);
        self.register_column(ColumnType::Array, ArrayCodec);

        // big integer
        self.register_for(TypeToken::primitive::<i128>("i128"), BigIntegerCodec);
        self.register_column(ColumnType::BigInt, LongCodec);

        // decimal
        let decimal = TypeToken::class_of::<Decimal>().build();
        self.register_for(decimal, DecimalCodec);
        self.register_column(ColumnType::Real, DecimalCodec);
        self.register_column(ColumnType::Decimal, DecimalCodec);
        self.register_column(ColumnType::Numeric, DecimalCodec);

        // byte arrays
        let boxed_bytes = TypeToken::class_of::<Box<[u8]>>().build();
        let bytes = TypeToken::class_of::<Vec<u8>>().build();
        self.register_for(TypeToken::class_of::<ByteStream>().build(), BlobStreamCodec);
        self.register_for(boxed_bytes.clone(), BoxedByteArrayCodec);
        self.register_mapping(
            boxed_bytes.clone(),
            Some(ColumnType::Blob),
            BlobBoxedByteArrayCodec,
        );
        self.register_mapping(
            boxed_bytes,
            Some(ColumnType::LongVarBinary),
            BlobBoxedByteArrayCodec,
        );
        self.register_for(bytes.clone(), ByteArrayCodec);
        self.register_mapping(bytes.clone(), Some(ColumnType::Blob), BlobCodec);
        self.register_mapping(bytes, Some(ColumnType::LongVarBinary), BlobCodec);
        self.register_column(ColumnType::LongVarBinary, BlobCodec);
        self.register_column(ColumnType::Blob, BlobCodec);

        // object
        self.register_entry(Some(TypeToken::object()), None, self.unknown.clone());
        self.register_entry(
            Some(TypeToken::object()),
            Some(ColumnType::Other),
            self.unknown.clone(),
        );
        self.register_column_entry(ColumnType::Other, self.unknown.clone());

        // legacy date/time
        let system_time = TypeToken::class_of::<std::time::SystemTime>().build();
        self.register_for(system_time.clone(), DateCodec);
        self.register_mapping(system_time.clone(), Some(ColumnType::Date), DateOnlyCodec);
        self.register_mapping(system_time, Some(ColumnType::Time), TimeOnlyCodec);
        self.register_column(ColumnType::Timestamp, DateCodec);
        self.register_column(ColumnType::Date, DateOnlyCodec);
        self.register_column(ColumnType::Time, TimeOnlyCodec);

        // column-shaped temporal newtypes
        self.register_for(TypeToken::class_of::<SqlDate>().build(), SqlDateCodec);
        self.register_for(TypeToken::class_of::<SqlTime>().build(), SqlTimeCodec);
        self.register_for(
            TypeToken::class_of::<SqlTimestamp>().build(),
            SqlTimestampCodec,
        );

        // modern date/time API
        #[cfg(feature = "chrono")]
        crate::codecs::chrono::register_date_time_codecs(self);

        // character
        self.register_for(TypeToken::primitive::<char>("char"), CharCodec);
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::new()
    }
}
