// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 strata.dev

//! Codecs for textual host types.
//!
//! `StringCodec` and `NStringCodec` cover the inline character columns;
//! `ClobCodec`/`NClobCodec` cover the LOB-backed ones. `ClobReaderCodec`
//! streams a [`CharReader`] in and out of CLOB columns.

use std::any::Any;
use std::io::{Cursor, Read};

use parking_lot::Mutex;

use crate::codec::{Codec, CodecClass, HostValue};
use crate::column::ColumnValue;
use crate::error::{Result, TypeError};
use crate::token::TypeToken;

macro_rules! string_codec {
    ($(#[$meta:meta])* $codec:ident, $variant:ident) => {
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
                    .downcast_ref::<String>()
                    .map(|s| ColumnValue::$variant(s.clone()))
                    .ok_or_else(|| TypeError::HostValueMismatch {
                        codec: stringify!($codec).to_string(),
                        expected: "String",
                    })
            }

            fn decode(&self, value: &ColumnValue) -> Result<HostValue> {
                value
                    .as_str()
                    .map(|s| Box::new(s.to_string()) as HostValue)
                    .ok_or_else(|| TypeError::ColumnValueMismatch {
                        codec: stringify!($codec).to_string(),
                        expected: "Text",
                    })
            }

            fn described_host_type(&self) -> Option<TypeToken> {
                Some(TypeToken::of::<String>())
            }
        }
    };
}

string_codec!(
    /// `String` under CHAR/VARCHAR columns.
    StringCodec, Text
);
string_codec!(
    /// `String` under CLOB/LONGVARCHAR columns.
    ClobCodec, Text
);
string_codec!(
    /// `String` under NCHAR/NVARCHAR columns.
    NStringCodec, NText
);
string_codec!(
    /// `String` under NCLOB columns.
    NClobCodec, NText
);

// ---------------------------------------------------------------------------
// CharReader
// ---------------------------------------------------------------------------

/// Host-side character stream for CLOB I/O.
///
/// The reader is consumed on first encode; a codec never encodes the same
/// stream twice.
pub struct CharReader {
    inner: Mutex<Box<dyn Read + Send>>,
}

impl CharReader {
    /// Wrap a raw reader.
    pub fn new(reader: impl Read + Send + 'static) -> Self {
        CharReader {
            inner: Mutex::new(Box::new(reader)),
        }
    }

    /// A reader over in-memory text.
    pub fn from_string(text: impl Into<String>) -> Self {
        Self::new(Cursor::new(text.into().into_bytes()))
    }

    /// Drain the stream into a string.
    pub fn read_all(&self) -> std::io::Result<String> {
        let mut buf = String::new();
        self.inner.lock().read_to_string(&mut buf)?;
        Ok(buf)
    }
}

/// [`CharReader`] under CLOB columns.
pub struct ClobReaderCodec;

impl ClobReaderCodec {
    /// Reified class of this codec.
    pub fn codec_class() -> CodecClass {
        CodecClass::builder::<Self>()
            .with_nullary_ctor(|| Ok(Box::new(ClobReaderCodec)))
            .build()
    }
}

impl Codec for ClobReaderCodec {
    fn class(&self) -> CodecClass {
        Self::codec_class()
    }

    fn encode(&self, value: &dyn Any) -> Result<ColumnValue> {
        let reader = value
            .downcast_ref::<CharReader>()
            .ok_or_else(|| TypeError::HostValueMismatch {
                codec: "ClobReaderCodec".to_string(),
                expected: "CharReader",
            })?;
        let text = reader.read_all().map_err(|e| TypeError::InvalidValue {
            codec: "ClobReaderCodec".to_string(),
            detail: format!("stream read failed: {}", e),
        })?;
        Ok(ColumnValue::Text(text))
    }

    fn decode(&self, value: &ColumnValue) -> Result<HostValue> {
        value
            .as_str()
            .map(|s| Box::new(CharReader::from_string(s)) as HostValue)
            .ok_or_else(|| TypeError::ColumnValueMismatch {
                codec: "ClobReaderCodec".to_string(),
                expected: "Text",
            })
    }

    fn described_host_type(&self) -> Option<TypeToken> {
        Some(TypeToken::of::<CharReader>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_and_nstring_use_distinct_column_shapes() {
        let s = "héllo".to_string();
        assert_eq!(
            StringCodec.encode(&s).unwrap(),
            ColumnValue::Text("héllo".to_string())
        );
        assert_eq!(
            NStringCodec.encode(&s).unwrap(),
            ColumnValue::NText("héllo".to_string())
        );
    }

    #[test]
    fn test_clob_reader_round_trip() {
        let codec = ClobReaderCodec;
        let column = codec
            .encode(&CharReader::from_string("stream contents"))
            .unwrap();
        assert_eq!(column, ColumnValue::Text("stream contents".to_string()));

        let host = codec.decode(&column).unwrap();
        let reader = host.downcast_ref::<CharReader>().unwrap();
        assert_eq!(reader.read_all().unwrap(), "stream contents");
    }

    #[test]
    fn test_reader_is_consumed_by_encode() {
        let reader = CharReader::from_string("once");
        assert_eq!(ClobReaderCodec.encode(&reader).unwrap().as_str(), Some("once"));
        // Second encode sees an exhausted stream.
        assert_eq!(ClobReaderCodec.encode(&reader).unwrap().as_str(), Some(""));
    }
}
