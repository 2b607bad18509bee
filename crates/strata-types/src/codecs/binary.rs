// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 strata.dev

//! Codecs for binary host types.

use std::any::Any;
use std::io::{Cursor, Read};

use parking_lot::Mutex;

use crate::codec::{Codec, CodecClass, HostValue};
use crate::column::ColumnValue;
use crate::error::{Result, TypeError};
use crate::token::TypeToken;

macro_rules! bytes_codec {
    ($(#[$meta:meta])* $codec:ident, $host:ty, $to_host:expr) => {
        $(#[$meta])*
        pub struct $codec;

        impl $codec {
            /// Reified class of this codec.
            pub fn codec_class() -> CodecClass {
                CodecClass::builder::<Self>()
                    .with_nullary_ctor(|| Ok(Box::new($codec)))
                    .build()
            }
        }

        impl Codec for $codec {
            fn class(&self) -> CodecClass {
                Self::codec_class()
            }

            fn encode(&self, value: &dyn Any) -> Result<ColumnValue> {
                value
                    .downcast_ref::<$host>()
                    .map(|v| ColumnValue::Bytes(v.to_vec()))
                    .ok_or_else(|| TypeError::HostValueMismatch {
                        codec: stringify!($codec).to_string(),
                        expected: stringify!($host),
                    })
            }

            fn decode(&self, value: &ColumnValue) -> Result<HostValue> {
                match value {
                    ColumnValue::Bytes(bytes) => {
                        let convert: fn(&[u8]) -> $host = $to_host;
                        Ok(Box::new(convert(bytes)))
                    }
                    _ => Err(TypeError::ColumnValueMismatch {
                        codec: stringify!($codec).to_string(),
                        expected: "Bytes",
                    }),
                }
            }

            fn described_host_type(&self) -> Option<TypeToken> {
                Some(TypeToken::of::<$host>())
            }
        }
    };
}

bytes_codec!(
    /// `Vec<u8>` under inline binary columns.
    ByteArrayCodec, Vec<u8>, <[u8]>::to_vec
);
bytes_codec!(
    /// `Vec<u8>` under BLOB/LONGVARBINARY columns.
    BlobCodec, Vec<u8>, <[u8]>::to_vec
);
bytes_codec!(
    /// `Box<[u8]>` under inline binary columns.
    BoxedByteArrayCodec, Box<[u8]>, |b| b.to_vec().into_boxed_slice()
);
bytes_codec!(
    /// `Box<[u8]>` under BLOB/LONGVARBINARY columns.
    BlobBoxedByteArrayCodec, Box<[u8]>, |b| b.to_vec().into_boxed_slice()
);

// ---------------------------------------------------------------------------
// ByteStream
// ---------------------------------------------------------------------------

/// Host-side byte stream for BLOB I/O.
///
/// Like [`crate::codecs::CharReader`], the stream is consumed on first
/// encode.
pub struct ByteStream {
    inner: Mutex<Box<dyn Read + Send>>,
}

impl ByteStream {
    /// Wrap a raw reader.
    pub fn new(reader: impl Read + Send + 'static) -> Self {
        ByteStream {
            inner: Mutex::new(Box::new(reader)),
        }
    }

    /// A stream over in-memory bytes.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self::new(Cursor::new(bytes.into()))
    }

    /// Drain the stream into a byte vector.
    pub fn read_all(&self) -> std::io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.inner.lock().read_to_end(&mut buf)?;
        Ok(buf)
    }
}

/// [`ByteStream`] under BLOB columns.
pub struct BlobStreamCodec;

impl BlobStreamCodec {
    /// Reified class of this codec.
    pub fn codec_class() -> CodecClass {
        CodecClass::builder::<Self>()
            .with_nullary_ctor(|| Ok(Box::new(BlobStreamCodec)))
            .build()
    }
}

impl Codec for BlobStreamCodec {
    fn class(&self) -> CodecClass {
        Self::codec_class()
    }

    fn encode(&self, value: &dyn Any) -> Result<ColumnValue> {
        let stream = value
            .downcast_ref::<ByteStream>()
            .ok_or_else(|| TypeError::HostValueMismatch {
                codec: "BlobStreamCodec".to_string(),
                expected: "ByteStream",
            })?;
        let bytes = stream.read_all().map_err(|e| TypeError::InvalidValue {
            codec: "BlobStreamCodec".to_string(),
            detail: format!("stream read failed: {}", e),
        })?;
        Ok(ColumnValue::Bytes(bytes))
    }

    fn decode(&self, value: &ColumnValue) -> Result<HostValue> {
        match value {
            ColumnValue::Bytes(bytes) => {
                Ok(Box::new(ByteStream::from_bytes(bytes.clone())) as HostValue)
            }
            _ => Err(TypeError::ColumnValueMismatch {
                codec: "BlobStreamCodec".to_string(),
                expected: "Bytes",
            }),
        }
    }

    fn described_host_type(&self) -> Option<TypeToken> {
        Some(TypeToken::of::<ByteStream>())
    }
}
