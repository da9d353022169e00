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

//! Per-primitive case tables.
//!
//! Every primitive has a fixed, documented case layout: the deterministic
//! boundary values first, pseudo-random samples last. `case_count` and
//! `case` agree on that layout; the random tail draws from the seeded rng
//! handed down by the generator so runs stay reproducible.

use crate::core::constants::generator::RANDOM_SAMPLES_PER_INTEGER;
use crate::generator::value::Value;
use crate::signature::PrimitiveKind;
use rand::distr::Alphanumeric;
use rand::rngs::StdRng;
use rand::Rng;

/// Length-prefix plus NUL overhead assumed for string-like values; kept in
/// sync with `Value::encoded_size`.
const TEXT_OVERHEAD: usize = 5;
const SIGNATURE_OVERHEAD: usize = 2;

/// Probe depth for the over-nested signature-string case. Far beyond the
/// protocol's marshaling limit, so a validating target must reject it.
const OVERDEEP_SIGNATURE_ARRAYS: usize = 128;

fn push_unique(cases: &mut Vec<Value>, candidate: Value) {
    if !cases.contains(&candidate) {
        cases.push(candidate);
    }
}

/// Deterministic integer/float/bool boundary tables. Unsigned types fold
/// their duplicated {0, min} and {1, min+1} pairs away.
fn fixed_cases(kind: PrimitiveKind) -> Vec<Value> {
    use PrimitiveKind::*;
    let mut cases = Vec::new();
    match kind {
        Byte => {
            for v in [0u8, 1, u8::MAX, u8::MAX - 1] {
                push_unique(&mut cases, Value::Byte(v));
            }
        }
        UInt16 => {
            for v in [0u16, 1, u16::MAX, u16::MAX - 1] {
                push_unique(&mut cases, Value::UInt16(v));
            }
        }
        UInt32 => {
            for v in [0u32, 1, u32::MAX, u32::MAX - 1] {
                push_unique(&mut cases, Value::UInt32(v));
            }
        }
        UInt64 => {
            for v in [0u64, 1, u64::MAX, u64::MAX - 1] {
                push_unique(&mut cases, Value::UInt64(v));
            }
        }
        Int16 => {
            for v in [0i16, 1, -1, i16::MIN, i16::MAX, i16::MIN + 1, i16::MAX - 1] {
                push_unique(&mut cases, Value::Int16(v));
            }
        }
        Int32 => {
            for v in [0i32, 1, -1, i32::MIN, i32::MAX, i32::MIN + 1, i32::MAX - 1] {
                push_unique(&mut cases, Value::Int32(v));
            }
        }
        Int64 => {
            for v in [0i64, 1, -1, i64::MIN, i64::MAX, i64::MIN + 1, i64::MAX - 1] {
                push_unique(&mut cases, Value::Int64(v));
            }
        }
        Double => {
            cases.extend([
                Value::Double(0.0),
                Value::Double(-0.0),
                Value::Double(f64::MIN_POSITIVE),
                Value::Double(f64::MAX),
                Value::Double(f64::NAN),
                Value::Double(f64::INFINITY),
                Value::Double(f64::NEG_INFINITY),
            ]);
        }
        Boolean => {
            cases.extend([
                Value::Boolean(false),
                Value::Boolean(true),
                // Out-of-range backing word to probe target-side validation.
                Value::BooleanWord(u32::MAX),
            ]);
        }
        Text | ObjectPath | Signature => unreachable!("string kinds use their own layouts"),
    }
    cases
}

fn random_case(kind: PrimitiveKind, rng: &mut StdRng) -> Value {
    use PrimitiveKind::*;
    match kind {
        Byte => Value::Byte(rng.random()),
        UInt16 => Value::UInt16(rng.random()),
        UInt32 => Value::UInt32(rng.random()),
        UInt64 => Value::UInt64(rng.random()),
        Int16 => Value::Int16(rng.random()),
        Int32 => Value::Int32(rng.random()),
        Int64 => Value::Int64(rng.random()),
        // Arbitrary bit pattern: exercises subnormals, huge magnitudes
        // and the odd NaN payload.
        Double => Value::Double(f64::from_bits(rng.random())),
        Boolean | Text | ObjectPath | Signature => {
            unreachable!("kind has no random tail")
        }
    }
}

fn printable(rng: &mut StdRng, len: usize) -> String {
    rng.sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

fn saturating_text_len(max_buffer_bytes: usize) -> usize {
    max_buffer_bytes.saturating_sub(TEXT_OVERHEAD)
}

/// Length ladder for the mid-sized string probes, stopping short of the
/// saturating case.
fn text_length_ladder(max_buffer_bytes: usize) -> Vec<usize> {
    let saturating = saturating_text_len(max_buffer_bytes);
    [16usize, 256, 4_096, 65_536, 1_048_576]
        .into_iter()
        .filter(|len| *len < saturating)
        .collect()
}

fn text_case(index: usize, max_buffer_bytes: usize, rng: &mut StdRng) -> Value {
    let ladder = text_length_ladder(max_buffer_bytes);
    match index {
        0 => Value::Text(String::new()),
        1 => Value::Text("A".to_string()),
        i if i - 2 < ladder.len() => Value::Text(printable(rng, ladder[i - 2])),
        i if i == 2 + ladder.len() => {
            Value::Text(printable(rng, saturating_text_len(max_buffer_bytes)))
        }
        i if i == 3 + ladder.len() => Value::Text("fuzz\0fuzz".to_string()),
        // Truncated two-byte sequence.
        i if i == 4 + ladder.len() => Value::RawText(vec![0xc3, 0x28]),
        // An encoded UTF-16 surrogate, never valid in UTF-8.
        _ => Value::RawText(vec![0xed, 0xa0, 0x80]),
    }
}

fn object_path(len: usize) -> String {
    let mut path = String::with_capacity(len.max(1));
    path.push('/');
    for _ in 1..len {
        path.push('a');
    }
    path
}

fn object_path_case(index: usize, max_buffer_bytes: usize) -> Value {
    let ladder = text_length_ladder(max_buffer_bytes);
    match index {
        0 => Value::ObjectPath("/".to_string()),
        1 => Value::ObjectPath("/fuzz".to_string()),
        i if i - 2 < ladder.len() => Value::ObjectPath(object_path(ladder[i - 2])),
        i if i == 2 + ladder.len() => {
            Value::ObjectPath(object_path(saturating_text_len(max_buffer_bytes)))
        }
        // Syntactically invalid probes.
        i if i == 3 + ladder.len() => Value::ObjectPath("fuzz/without/leading/slash".to_string()),
        i if i == 4 + ladder.len() => Value::ObjectPath("/trailing/slash/".to_string()),
        _ => Value::ObjectPath(String::new()),
    }
}

fn overdeep_signature() -> String {
    let mut sig = "a".repeat(OVERDEEP_SIGNATURE_ARRAYS);
    sig.push('y');
    sig
}

fn saturating_signature(max_buffer_bytes: usize) -> String {
    let len = max_buffer_bytes.saturating_sub(SIGNATURE_OVERHEAD);
    let mut sig = "a".repeat(len.saturating_sub(1));
    sig.push('y');
    sig
}

fn signature_case(index: usize, max_buffer_bytes: usize) -> Value {
    match index {
        0 => Value::Signature(String::new()),
        1 => Value::Signature("s".to_string()),
        2 => Value::Signature("a{sv}".to_string()),
        3 => Value::Signature(overdeep_signature()),
        4 => Value::Signature("(((".to_string()),
        5 => Value::Signature("!".to_string()),
        _ => Value::Signature(saturating_signature(max_buffer_bytes)),
    }
}

pub(crate) fn case_count(kind: PrimitiveKind, max_buffer_bytes: usize) -> usize {
    use PrimitiveKind::*;
    match kind {
        Boolean => 3,
        Double => fixed_cases(kind).len() + 1,
        Byte | Int16 | UInt16 | Int32 | UInt32 | Int64 | UInt64 => {
            fixed_cases(kind).len() + RANDOM_SAMPLES_PER_INTEGER
        }
        // empty, single, ladder, saturating, NUL, two invalid-UTF-8 probes
        Text => 6 + text_length_ladder(max_buffer_bytes).len(),
        // root, simple, ladder, saturating, three invalid probes
        ObjectPath => 6 + text_length_ladder(max_buffer_bytes).len(),
        Signature => 7,
    }
}

pub(crate) fn case(
    kind: PrimitiveKind,
    index: usize,
    max_buffer_bytes: usize,
    rng: &mut StdRng,
) -> Value {
    use PrimitiveKind::*;
    let index = index % case_count(kind, max_buffer_bytes);
    match kind {
        Text => text_case(index, max_buffer_bytes, rng),
        ObjectPath => object_path_case(index, max_buffer_bytes),
        Signature => signature_case(index, max_buffer_bytes),
        Boolean | Double | Byte | Int16 | UInt16 | Int32 | UInt32 | Int64 | UInt64 => {
            let fixed = fixed_cases(kind);
            if index < fixed.len() {
                fixed[index].clone()
            } else {
                random_case(kind, rng)
            }
        }
    }
}

pub(crate) fn boundary_low(kind: PrimitiveKind) -> Value {
    use PrimitiveKind::*;
    match kind {
        Byte => Value::Byte(0),
        Boolean => Value::Boolean(false),
        Int16 => Value::Int16(i16::MIN),
        UInt16 => Value::UInt16(0),
        Int32 => Value::Int32(i32::MIN),
        UInt32 => Value::UInt32(0),
        Int64 => Value::Int64(i64::MIN),
        UInt64 => Value::UInt64(0),
        Double => Value::Double(f64::MIN),
        Text => Value::Text(String::new()),
        ObjectPath => Value::ObjectPath("/".to_string()),
        Signature => Value::Signature(String::new()),
    }
}

pub(crate) fn boundary_high(
    kind: PrimitiveKind,
    max_buffer_bytes: usize,
    rng: &mut StdRng,
) -> Value {
    use PrimitiveKind::*;
    match kind {
        Byte => Value::Byte(u8::MAX),
        Boolean => Value::Boolean(true),
        Int16 => Value::Int16(i16::MAX),
        UInt16 => Value::UInt16(u16::MAX),
        Int32 => Value::Int32(i32::MAX),
        UInt32 => Value::UInt32(u32::MAX),
        Int64 => Value::Int64(i64::MAX),
        UInt64 => Value::UInt64(u64::MAX),
        Double => Value::Double(f64::MAX),
        Text => Value::Text(printable(rng, saturating_text_len(max_buffer_bytes))),
        ObjectPath => Value::ObjectPath(object_path(saturating_text_len(max_buffer_bytes))),
        Signature => Value::Signature(saturating_signature(max_buffer_bytes)),
    }
}
