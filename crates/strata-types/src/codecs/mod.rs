// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 strata.dev

//! Built-in codec implementations.
//!
//! These are the leaves the registry wires up at construction. Each codec is
//! a small black box: the registry only ever sees the [`crate::CodecClass`]
//! it reports.

mod binary;
mod decimal;
mod enums;
mod object;
mod scalar;
mod temporal;
mod text;

#[cfg(feature = "chrono")]
pub mod chrono;

pub use binary::{
    BlobBoxedByteArrayCodec, BlobCodec, BlobStreamCodec, BoxedByteArrayCodec, ByteArrayCodec,
    ByteStream,
};
pub use decimal::{Decimal, DecimalCodec};
pub use enums::{EnumCodec, EnumOrdinalCodec};
pub use object::{ArrayCodec, UnknownCodec};
pub use scalar::{
    BigIntegerCodec, BoolCodec, ByteCodec, CharCodec, DoubleCodec, FloatCodec, IntCodec,
    LongCodec, ShortCodec,
};
pub use temporal::{
    DateCodec, DateOnlyCodec, SqlDate, SqlDateCodec, SqlTime, SqlTimeCodec, SqlTimestamp,
    SqlTimestampCodec, TimeOnlyCodec,
};
pub use text::{CharReader, ClobCodec, ClobReaderCodec, NClobCodec, NStringCodec, StringCodec};
