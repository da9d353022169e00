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

//! Type-signature model.
//!
//! Parses a single argument signature (one complete type) into a
//! structural tree. Pure and deterministic; a malformed signature is
//! rejected here, before any value generation starts.

use crate::core::constants::signature::MAX_NESTING_DEPTH;
use crate::core::errors::SignatureError;
use std::iter::Peekable;
use std::str::Chars;

/// Fixed-width scalar and string-like type codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    /// `y` - unsigned 8-bit
    Byte,
    /// `b` - boolean, carried as a 32-bit word on the wire
    Boolean,
    /// `n` - signed 16-bit
    Int16,
    /// `q` - unsigned 16-bit
    UInt16,
    /// `i` - signed 32-bit
    Int32,
    /// `u` - unsigned 32-bit
    UInt32,
    /// `x` - signed 64-bit
    Int64,
    /// `t` - unsigned 64-bit
    UInt64,
    /// `d` - IEEE 754 double
    Double,
    /// `s` - UTF-8 string
    Text,
    /// `o` - object path
    ObjectPath,
    /// `g` - type signature carried as a string
    Signature,
}

impl PrimitiveKind {
    pub fn code(self) -> char {
        match self {
            Self::Byte => 'y',
            Self::Boolean => 'b',
            Self::Int16 => 'n',
            Self::UInt16 => 'q',
            Self::Int32 => 'i',
            Self::UInt32 => 'u',
            Self::Int64 => 'x',
            Self::UInt64 => 't',
            Self::Double => 'd',
            Self::Text => 's',
            Self::ObjectPath => 'o',
            Self::Signature => 'g',
        }
    }

    fn from_code(c: char) -> Option<Self> {
        Some(match c {
            'y' => Self::Byte,
            'b' => Self::Boolean,
            'n' => Self::Int16,
            'q' => Self::UInt16,
            'i' => Self::Int32,
            'u' => Self::UInt32,
            'x' => Self::Int64,
            't' => Self::UInt64,
            'd' => Self::Double,
            's' => Self::Text,
            'o' => Self::ObjectPath,
            'g' => Self::Signature,
            _ => return None,
        })
    }
}

/// Structural type tree for one argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeNode {
    Primitive(PrimitiveKind),
    Array(Box<TypeNode>),
    /// Ordered fields, at least one.
    Struct(Vec<TypeNode>),
    /// Key must be a primitive.
    DictEntry {
        key: Box<TypeNode>,
        value: Box<TypeNode>,
    },
    /// Inner type decided at value-generation time.
    Variant,
}

impl TypeNode {
    /// Re-serializes the tree's shape to a canonical signature string.
    pub fn signature(&self) -> String {
        let mut out = String::new();
        self.write_signature(&mut out);
        out
    }

    fn write_signature(&self, out: &mut String) {
        match self {
            Self::Primitive(kind) => out.push(kind.code()),
            Self::Array(element) => {
                out.push('a');
                element.write_signature(out);
            }
            Self::Struct(fields) => {
                out.push('(');
                for field in fields {
                    field.write_signature(out);
                }
                out.push(')');
            }
            Self::DictEntry { key, value } => {
                out.push('{');
                key.write_signature(out);
                value.write_signature(out);
                out.push('}');
            }
            Self::Variant => out.push('v'),
        }
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, Self::Primitive(_))
    }

    pub fn is_dict_entry(&self) -> bool {
        matches!(self, Self::DictEntry { .. })
    }
}

/// Parses one complete type. Trailing characters are an error: argument
/// signatures carry exactly one type each.
pub fn parse(signature: &str) -> Result<TypeNode, SignatureError> {
    let mut chars = signature.chars().peekable();
    let node = parse_one(&mut chars, signature, 0)?;
    if chars.next().is_some() {
        return Err(SignatureError::malformed(
            signature,
            "trailing characters after one complete type",
        ));
    }
    Ok(node)
}

fn parse_one(
    chars: &mut Peekable<Chars<'_>>,
    signature: &str,
    depth: usize,
) -> Result<TypeNode, SignatureError> {
    if depth > MAX_NESTING_DEPTH {
        return Err(SignatureError::TooDeep {
            signature: signature.to_string(),
            max_depth: MAX_NESTING_DEPTH,
        });
    }

    let code = chars.next().ok_or_else(|| {
        SignatureError::malformed(signature, "expected a type code, found end of input")
    })?;

    match code {
        'v' => Ok(TypeNode::Variant),
        'a' => {
            let element = parse_one(chars, signature, depth + 1)?;
            Ok(TypeNode::Array(Box::new(element)))
        }
        '(' => {
            let mut fields = Vec::new();
            loop {
                match chars.peek() {
                    Some(&')') => {
                        chars.next();
                        break;
                    }
                    Some(_) => fields.push(parse_one(chars, signature, depth + 1)?),
                    None => {
                        return Err(SignatureError::malformed(signature, "unterminated struct"))
                    }
                }
            }
            if fields.is_empty() {
                return Err(SignatureError::malformed(signature, "empty struct"));
            }
            Ok(TypeNode::Struct(fields))
        }
        '{' => {
            let key = parse_one(chars, signature, depth + 1)?;
            if !key.is_primitive() {
                return Err(SignatureError::malformed(
                    signature,
                    "dict-entry key must be a primitive type",
                ));
            }
            let value = parse_one(chars, signature, depth + 1)?;
            match chars.next() {
                Some('}') => Ok(TypeNode::DictEntry {
                    key: Box::new(key),
                    value: Box::new(value),
                }),
                Some(_) => Err(SignatureError::malformed(
                    signature,
                    "dict entry holds exactly a key and a value",
                )),
                None => Err(SignatureError::malformed(signature, "unterminated dict entry")),
            }
        }
        ')' | '}' => Err(SignatureError::malformed(
            signature,
            "container close without matching open",
        )),
        other => PrimitiveKind::from_code(other)
            .map(TypeNode::Primitive)
            .ok_or_else(|| {
                SignatureError::malformed(signature, format!("unknown type code '{other}'"))
            }),
    }
}
