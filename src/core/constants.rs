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

//! hornet constants - single source of truth for all tunable values.
//!
//! This module centralizes magic numbers and environment variable names
//! to ensure consistency and maintainability.

/// Type-signature parsing
pub mod signature {
    /// Maximum container nesting accepted by the parser. Signatures deeper
    /// than this are rejected with `SignatureError::TooDeep` before any
    /// value generation happens.
    pub const MAX_NESTING_DEPTH: usize = 32;
}

/// Value generation
pub mod generator {
    /// Smallest accepted `max_buffer_bytes`. Values below this leave no
    /// room for the string and array boundary probes.
    pub const MIN_BUFFER_BYTES: usize = 256;
    /// Default `max_buffer_bytes` (~5 MB).
    pub const DEFAULT_BUFFER_BYTES: usize = 5_000_000;
    /// Hard cap on generated cases for a single argument, so a method with
    /// many arguments still completes in bounded time.
    pub const MAX_CASES_PER_ARGUMENT: usize = 64;
    /// Element cap for the large-array probe.
    pub const MAX_ARRAY_PROBE_ELEMENTS: usize = 4096;
    /// Single-element array cases drawn from the element type's generator.
    pub const ARRAY_SINGLE_REPRESENTATIVES: usize = 4;
    /// Positionally paired struct cases before the two boundary combinations.
    pub const STRUCT_PAIRED_CASES: usize = 6;
    /// Dict-entry cases: empty map, single entry, boundary entry, duplicate key.
    pub const DICT_CASES: usize = 4;
    /// Concrete inner types a variant rotates through (i32, string, byte array).
    pub const VARIANT_ROTATION: usize = 3;
    /// Representative cases generated per rotated variant inner type.
    pub const VARIANT_INNER_CASES: usize = 2;
    /// Pseudo-random samples appended to every integer case table.
    pub const RANDOM_SAMPLES_PER_INTEGER: usize = 4;
}

/// Fuzz engine
pub mod engine {
    /// Default bounded wait for a single call.
    pub const DEFAULT_CALL_TIMEOUT_MS: u64 = 5_000;
    /// Hard cap on invocations per method.
    pub const MAX_CASES_PER_METHOD: usize = 512;
}

/// Process health monitoring
pub mod health {
    /// Status-file field carrying the resident set size, in kB.
    pub const RESIDENT_FIELD: &str = "VmRSS:";
    /// Fallback memory limit when the requested limit does not exceed the
    /// baseline: this multiple of the baseline resident size.
    pub const FALLBACK_LIMIT_MULTIPLIER: u64 = 3;
}

/// Bus identifier limits
pub mod limits {
    /// Maximum length of bus names, object paths and interface names.
    pub const MAX_NAME_LEN: usize = 255;
}

/// Failure-log rendering
pub mod report {
    /// Rendered argument literals are truncated at this many bytes; the
    /// recorded seed and case index keep every entry reproducible.
    pub const MAX_RENDERED_LITERAL_BYTES: usize = 512;
}

/// Configuration environment variables
pub mod config {
    pub const ENV_LOG_LEVEL: &str = "HORNET_LOG_LEVEL";
    pub const ENV_LOG_FORMAT: &str = "HORNET_LOG_FORMAT";
    pub const ENV_LOG_PATH: &str = "HORNET_LOG_PATH";
    pub const ENV_MAX_BUFFER_BYTES: &str = "HORNET_MAX_BUFFER_BYTES";
    pub const ENV_MEMORY_LIMIT_KB: &str = "HORNET_MEMORY_LIMIT_KB";
    pub const ENV_CALL_TIMEOUT_MS: &str = "HORNET_CALL_TIMEOUT_MS";
    pub const ENV_RANDOM_SEED: &str = "HORNET_RANDOM_SEED";
}
