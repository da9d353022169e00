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

//! In-memory model of the introspected interface.
//!
//! The catalog owns every method descriptor and exposes an explicit
//! restartable cursor over methods and, nested, over the current method's
//! arguments. Advancing the cursor never mutates yielded descriptors, so
//! the engine can hold the current one across several generation calls.

use crate::core::errors::SignatureError;
use crate::signature::{self, TypeNode};

/// One method as delivered by the external introspection source: raw
/// name plus ordered input-argument signature strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMethod {
    pub name: String,
    pub inputs: Vec<String>,
}

impl RawMethod {
    pub fn new(name: impl Into<String>, inputs: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            inputs: inputs.into_iter().map(Into::into).collect(),
        }
    }
}

/// A single argument's type, decoded once and reused for every generated
/// case of that argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgSpec {
    raw_signature: String,
    type_tree: TypeNode,
}

impl ArgSpec {
    pub fn parse(raw_signature: &str) -> Result<Self, SignatureError> {
        Ok(Self {
            raw_signature: raw_signature.to_string(),
            type_tree: signature::parse(raw_signature)?,
        })
    }

    pub fn raw_signature(&self) -> &str {
        &self.raw_signature
    }

    pub fn type_tree(&self) -> &TypeNode {
        &self.type_tree
    }
}

/// An introspected method with its arguments in declaration order; calls
/// are positional, so order is load-bearing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    name: String,
    arguments: Vec<ArgSpec>,
}

impl MethodDescriptor {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arguments(&self) -> &[ArgSpec] {
        &self.arguments
    }
}

/// Ordered, restartable traversal over the interface's methods.
#[derive(Debug)]
pub struct MethodCatalog {
    methods: Vec<MethodDescriptor>,
    method_cursor: usize,
    argument_cursor: usize,
}

impl MethodCatalog {
    /// Decodes every argument signature up front: a malformed signature
    /// fails the whole catalog before any fuzzing begins.
    pub fn from_methods(raw: Vec<RawMethod>) -> Result<Self, SignatureError> {
        let mut methods = Vec::with_capacity(raw.len());
        for method in raw {
            let arguments = method
                .inputs
                .iter()
                .map(|sig| ArgSpec::parse(sig))
                .collect::<Result<Vec<_>, _>>()?;
            methods.push(MethodDescriptor {
                name: method.name,
                arguments,
            });
        }
        Ok(Self {
            methods,
            method_cursor: 0,
            argument_cursor: 0,
        })
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// End-of-sequence is a normal terminal state, not an error.
    pub fn current_method(&self) -> Option<&MethodDescriptor> {
        self.methods.get(self.method_cursor)
    }

    pub fn advance_method(&mut self) {
        if self.method_cursor < self.methods.len() {
            self.method_cursor += 1;
        }
        self.argument_cursor = 0;
    }

    pub fn current_argument(&self) -> Option<&ArgSpec> {
        self.current_method()?.arguments.get(self.argument_cursor)
    }

    pub fn advance_argument(&mut self) {
        self.argument_cursor += 1;
    }

    pub fn restart(&mut self) {
        self.method_cursor = 0;
        self.argument_cursor = 0;
    }
}
