// Copyright 2026 BadCompany
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Generated argument values.
//!
//! A `Value` is one fully materialized argument of a fuzz case. The enum
//! deliberately admits payloads a well-behaved client would never send:
//! out-of-range boolean words, string slots holding invalid UTF-8,
//! syntactically broken object paths.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Byte(u8),
    Boolean(bool),
    /// A boolean carried as its raw 32-bit wire word, used to probe
    /// values outside {0, 1}.
    BooleanWord(u32),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Double(f64),
    Text(String),
    /// A string slot filled with bytes that are not valid UTF-8.
    RawText(Vec<u8>),
    ObjectPath(String),
    Signature(String),
    Array(Vec<Value>),
    Struct(Vec<Value>),
    /// A map as a sequence of key/value entries. Duplicate keys are
    /// intentionally representable.
    Dict(Vec<(Value, Value)>),
    Variant(Box<Value>),
}

impl Value {
    /// Conservative wire-size estimate in bytes, used to keep every
    /// generated value under the configured buffer cap. Mirrors the
    /// fixed widths and length-prefix overheads of the wire format.
    pub fn encoded_size(&self) -> usize {
        match self {
            Self::Byte(_) => 1,
            Self::Boolean(_) | Self::BooleanWord(_) => 4,
            Self::Int16(_) | Self::UInt16(_) => 2,
            Self::Int32(_) | Self::UInt32(_) => 4,
            Self::Int64(_) | Self::UInt64(_) | Self::Double(_) => 8,
            Self::Text(s) | Self::ObjectPath(s) => 5 + s.len(),
            Self::RawText(bytes) => 5 + bytes.len(),
            Self::Signature(s) => 2 + s.len(),
            Self::Array(elements) => 4 + elements.iter().map(Value::encoded_size).sum::<usize>(),
            Self::Struct(fields) => 8 + fields.iter().map(Value::encoded_size).sum::<usize>(),
            Self::Dict(entries) => {
                4 + entries
                    .iter()
                    .map(|(k, v)| 8 + k.encoded_size() + v.encoded_size())
                    .sum::<usize>()
            }
            Self::Variant(inner) => 3 + inner.encoded_size(),
        }
    }

    /// Literal rendering for the failure log, loosely following the
    /// GVariant text notation.
    pub fn render(&self) -> String {
        match self {
            Self::Byte(b) => b.to_string(),
            Self::Boolean(b) => b.to_string(),
            Self::BooleanWord(word) => format!("bool#{word}"),
            Self::Int16(n) => n.to_string(),
            Self::UInt16(n) => n.to_string(),
            Self::Int32(n) => n.to_string(),
            Self::UInt32(n) => n.to_string(),
            Self::Int64(n) => n.to_string(),
            Self::UInt64(n) => n.to_string(),
            Self::Double(d) => format!("{d:?}"),
            Self::Text(s) => format!("{s:?}"),
            Self::RawText(bytes) => format!("0x{}", hex::encode(bytes)),
            Self::ObjectPath(p) => format!("objectpath {p:?}"),
            Self::Signature(s) => format!("signature {s:?}"),
            Self::Array(elements) => {
                let inner: Vec<String> = elements.iter().map(Value::render).collect();
                format!("[{}]", inner.join(", "))
            }
            Self::Struct(fields) => {
                let inner: Vec<String> = fields.iter().map(Value::render).collect();
                format!("({})", inner.join(", "))
            }
            Self::Dict(entries) => {
                let inner: Vec<String> = entries
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k.render(), v.render()))
                    .collect();
                format!("{{{}}}", inner.join(", "))
            }
            Self::Variant(inner) => format!("<{}>", inner.render()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_nested_containers() {
        let value = Value::Array(vec![Value::Struct(vec![
            Value::Int32(-1),
            Value::Variant(Box::new(Value::Text("x".into()))),
        ])]);
        assert_eq!(value.render(), "[(-1, <\"x\">)]");
    }

    #[test]
    fn test_renders_invalid_utf8_as_hex() {
        let value = Value::RawText(vec![0xc3, 0x28]);
        assert_eq!(value.render(), "0xc328");
    }

    #[test]
    fn test_encoded_size_counts_length_prefixes() {
        assert_eq!(Value::Text("abc".into()).encoded_size(), 8);
        assert_eq!(Value::Array(vec![Value::Byte(0); 3]).encoded_size(), 7);
    }
}
