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

//! Type-directed value generation.
//!
//! For a given type tree the generator exposes a finite, indexed case
//! space: `case(tree, i)` is deterministic for a fixed seed, so a sequence
//! can be restarted, replayed from a log entry, or walked lazily without
//! holding more than one materialized value at a time.
//!
//! Container layouts (indexes in order):
//! - array: empty, single-element per representative, large probe
//! - struct: positionally paired field cases, all-boundary-low, all-boundary-high
//! - map (array of dict entries): empty, single entry, boundary entry,
//!   duplicate-key pair
//! - variant: rotation over {i32, string, byte array} inner types

pub mod scalars;
pub mod value;

use crate::core::constants::generator::{
    ARRAY_SINGLE_REPRESENTATIVES, DICT_CASES, MAX_ARRAY_PROBE_ELEMENTS, MAX_CASES_PER_ARGUMENT,
    STRUCT_PAIRED_CASES, VARIANT_INNER_CASES, VARIANT_ROTATION,
};
use crate::signature::{PrimitiveKind, TypeNode};
use rand::rngs::StdRng;
use rand::SeedableRng;
use self::value::Value;

/// Size-prefix overheads matching `Value::encoded_size`.
const ARRAY_OVERHEAD: usize = 4;
const STRUCT_OVERHEAD: usize = 8;
const DICT_ENTRY_OVERHEAD: usize = 8;
const VARIANT_OVERHEAD: usize = 4;

pub struct ValueGenerator {
    max_buffer_bytes: usize,
    seed: u64,
}

impl ValueGenerator {
    /// `max_buffer_bytes` is validated at the configuration boundary; the
    /// generator trusts it.
    pub fn new(max_buffer_bytes: usize, seed: u64) -> Self {
        Self {
            max_buffer_bytes,
            seed,
        }
    }

    /// Finite case count for one argument, capped so methods with many
    /// arguments still finish in bounded time.
    pub fn case_count(&self, tree: &TypeNode) -> usize {
        self.count(tree).min(MAX_CASES_PER_ARGUMENT)
    }

    fn count(&self, tree: &TypeNode) -> usize {
        match tree {
            TypeNode::Primitive(kind) => scalars::case_count(*kind, self.max_buffer_bytes),
            // An array of dict entries is the map itself; the dict layout
            // already spans empty through duplicate-key.
            TypeNode::Array(element) if element.is_dict_entry() => DICT_CASES,
            TypeNode::Array(element) => {
                2 + self.count(element).min(ARRAY_SINGLE_REPRESENTATIVES)
            }
            TypeNode::Struct(fields) => {
                let widest = fields.iter().map(|f| self.count(f)).max().unwrap_or(0);
                widest.min(STRUCT_PAIRED_CASES) + 2
            }
            TypeNode::DictEntry { .. } => DICT_CASES,
            TypeNode::Variant => VARIANT_ROTATION * VARIANT_INNER_CASES,
        }
    }

    /// Materializes case `index` (modulo the case count). Never allocates
    /// more than `max_buffer_bytes` for the returned value.
    pub fn case(&self, tree: &TypeNode, index: usize) -> Value {
        let mut rng = StdRng::seed_from_u64(
            self.seed ^ (index as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15),
        );
        self.build(tree, index % self.case_count(tree), self.max_buffer_bytes, &mut rng)
    }

    /// Lazy, restartable walk over the full case space of one argument.
    pub fn cases<'a>(&'a self, tree: &'a TypeNode) -> Cases<'a> {
        Cases {
            generator: self,
            tree,
            next: 0,
            count: self.case_count(tree),
        }
    }

    fn build(&self, tree: &TypeNode, index: usize, budget: usize, rng: &mut StdRng) -> Value {
        match tree {
            TypeNode::Primitive(kind) => scalars::case(*kind, index, budget, rng),
            TypeNode::Array(element) => match element.as_ref() {
                TypeNode::DictEntry { key, value } => {
                    self.build_dict(key, value, index, budget, rng)
                }
                _ => self.build_array(element, index, budget, rng),
            },
            TypeNode::Struct(fields) => self.build_struct(fields, index, budget, rng),
            TypeNode::DictEntry { key, value } => self.build_dict(key, value, index, budget, rng),
            TypeNode::Variant => self.build_variant(index, budget, rng),
        }
    }

    fn build_array(
        &self,
        element: &TypeNode,
        index: usize,
        budget: usize,
        rng: &mut StdRng,
    ) -> Value {
        let representatives = self.count(element).min(ARRAY_SINGLE_REPRESENTATIVES);
        let element_budget = budget.saturating_sub(ARRAY_OVERHEAD);
        match index {
            0 => Value::Array(Vec::new()),
            i if i <= representatives => {
                Value::Array(vec![self.build(element, i - 1, element_budget, rng)])
            }
            _ => self.large_array(element, budget, rng),
        }
    }

    /// Element count times per-element size approaches the buffer cap,
    /// bounded by a hard element limit.
    fn large_array(&self, element: &TypeNode, budget: usize, rng: &mut StdRng) -> Value {
        let available = budget.saturating_sub(ARRAY_OVERHEAD);
        let representative = self.build(element, 0, available, rng);
        let element_size = representative.encoded_size().max(1);
        let count = (available / element_size).clamp(1, MAX_ARRAY_PROBE_ELEMENTS);
        Value::Array(vec![representative; count])
    }

    fn build_struct(
        &self,
        fields: &[TypeNode],
        index: usize,
        budget: usize,
        rng: &mut StdRng,
    ) -> Value {
        let field_budget = budget.saturating_sub(STRUCT_OVERHEAD) / fields.len().max(1);
        let widest = fields.iter().map(|f| self.count(f)).max().unwrap_or(0);
        let paired = widest.min(STRUCT_PAIRED_CASES);
        if index < paired {
            // Positional pairing: each field walks its own table, clamped
            // at its last case instead of a full cross product.
            let values = fields
                .iter()
                .map(|field| {
                    let clamped = index.min(self.count(field).saturating_sub(1));
                    self.build(field, clamped, field_budget, rng)
                })
                .collect();
            Value::Struct(values)
        } else if index == paired {
            Value::Struct(
                fields
                    .iter()
                    .map(|field| self.boundary_low(field, field_budget, rng))
                    .collect(),
            )
        } else {
            Value::Struct(
                fields
                    .iter()
                    .map(|field| self.boundary_high(field, field_budget, rng))
                    .collect(),
            )
        }
    }

    fn build_dict(
        &self,
        key: &TypeNode,
        value: &TypeNode,
        index: usize,
        budget: usize,
        rng: &mut StdRng,
    ) -> Value {
        let half = budget
            .saturating_sub(ARRAY_OVERHEAD + DICT_ENTRY_OVERHEAD)
            / 2;
        match index {
            0 => Value::Dict(Vec::new()),
            1 => Value::Dict(vec![(
                self.build(key, 0, half, rng),
                self.build(value, 0, half, rng),
            )]),
            2 => Value::Dict(vec![(
                self.boundary_high(key, half, rng),
                self.boundary_high(value, half, rng),
            )]),
            _ => {
                // Same key twice; tolerated by the wire format, frequently
                // not by the target.
                let quarter = budget
                    .saturating_sub(ARRAY_OVERHEAD + 2 * DICT_ENTRY_OVERHEAD)
                    / 4;
                let duplicate_key = self.build(key, 0, quarter, rng);
                Value::Dict(vec![
                    (duplicate_key.clone(), self.build(value, 0, quarter, rng)),
                    (duplicate_key, self.build(value, 1, quarter, rng)),
                ])
            }
        }
    }

    /// Variants rotate through a small set of concrete inner types rather
    /// than enumerating everything a variant could carry.
    fn build_variant(&self, index: usize, budget: usize, rng: &mut StdRng) -> Value {
        let inner_budget = budget.saturating_sub(VARIANT_OVERHEAD);
        let inner_index = index / VARIANT_ROTATION;
        let inner = match index % VARIANT_ROTATION {
            0 => scalars::case(PrimitiveKind::Int32, inner_index, inner_budget, rng),
            1 => scalars::case(PrimitiveKind::Text, inner_index, inner_budget, rng),
            _ => {
                let bytes = TypeNode::Array(Box::new(TypeNode::Primitive(PrimitiveKind::Byte)));
                self.build_array(
                    &TypeNode::Primitive(PrimitiveKind::Byte),
                    inner_index % self.count(&bytes),
                    inner_budget,
                    rng,
                )
            }
        };
        Value::Variant(Box::new(inner))
    }

    fn boundary_low(&self, tree: &TypeNode, budget: usize, rng: &mut StdRng) -> Value {
        match tree {
            TypeNode::Primitive(kind) => scalars::boundary_low(*kind),
            TypeNode::Array(element) if element.is_dict_entry() => Value::Dict(Vec::new()),
            TypeNode::Array(_) => Value::Array(Vec::new()),
            TypeNode::Struct(fields) => {
                let field_budget = budget.saturating_sub(STRUCT_OVERHEAD) / fields.len().max(1);
                Value::Struct(
                    fields
                        .iter()
                        .map(|field| self.boundary_low(field, field_budget, rng))
                        .collect(),
                )
            }
            TypeNode::DictEntry { .. } => Value::Dict(Vec::new()),
            TypeNode::Variant => Value::Variant(Box::new(Value::Int32(i32::MIN))),
        }
    }

    fn boundary_high(&self, tree: &TypeNode, budget: usize, rng: &mut StdRng) -> Value {
        match tree {
            TypeNode::Primitive(kind) => scalars::boundary_high(*kind, budget, rng),
            TypeNode::Array(element) if element.is_dict_entry() => {
                self.boundary_high(element, budget, rng)
            }
            TypeNode::Array(element) => self.large_array(element, budget, rng),
            TypeNode::Struct(fields) => {
                let field_budget = budget.saturating_sub(STRUCT_OVERHEAD) / fields.len().max(1);
                Value::Struct(
                    fields
                        .iter()
                        .map(|field| self.boundary_high(field, field_budget, rng))
                        .collect(),
                )
            }
            TypeNode::DictEntry { key, value } => {
                let half = budget
                    .saturating_sub(ARRAY_OVERHEAD + DICT_ENTRY_OVERHEAD)
                    / 2;
                Value::Dict(vec![(
                    self.boundary_high(key, half, rng),
                    self.boundary_high(value, half, rng),
                )])
            }
            TypeNode::Variant => {
                let inner_budget = budget.saturating_sub(VARIANT_OVERHEAD);
                Value::Variant(Box::new(scalars::boundary_high(
                    PrimitiveKind::Text,
                    inner_budget,
                    rng,
                )))
            }
        }
    }
}

/// Lazy iterator over one argument's case space.
pub struct Cases<'a> {
    generator: &'a ValueGenerator,
    tree: &'a TypeNode,
    next: usize,
    count: usize,
}

impl Iterator for Cases<'_> {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        if self.next >= self.count {
            return None;
        }
        let value = self.generator.case(self.tree, self.next);
        self.next += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.next;
        (remaining, Some(remaining))
    }
}
