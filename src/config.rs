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

use crate::core::constants::config as env_keys;
use crate::core::constants::engine::DEFAULT_CALL_TIMEOUT_MS;
use crate::core::constants::generator::{DEFAULT_BUFFER_BYTES, MIN_BUFFER_BYTES};
use crate::core::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default seed; override to reproduce a logged finding from another run.
const DEFAULT_SEED: u64 = 0x5eed_0001;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub log_level: String,
    pub log_format: String, // "json" or "text"
    /// Failure log destination.
    pub log_path: PathBuf,
    /// Upper bound for any single generated value, in bytes.
    pub max_buffer_bytes: usize,
    /// Optional resident-memory limit; when unset (or not above the
    /// baseline) the limit falls back to 3x the baseline.
    pub memory_limit_kb: Option<u64>,
    /// Bounded wait for a single call.
    pub per_call_timeout: Duration,
    pub random_seed: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self {
            log_level: env::var(env_keys::ENV_LOG_LEVEL).unwrap_or_else(|_| "info".to_string()),
            log_format: env::var(env_keys::ENV_LOG_FORMAT).unwrap_or_else(|_| "text".to_string()),
            log_path: env::var(env_keys::ENV_LOG_PATH)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./hornet.log")),
            max_buffer_bytes: DEFAULT_BUFFER_BYTES,
            memory_limit_kb: None,
            per_call_timeout: Duration::from_millis(DEFAULT_CALL_TIMEOUT_MS),
            random_seed: DEFAULT_SEED,
        };

        if let Ok(raw) = env::var(env_keys::ENV_MAX_BUFFER_BYTES) {
            config.max_buffer_bytes = parse_env(env_keys::ENV_MAX_BUFFER_BYTES, &raw)?;
        }
        if let Ok(raw) = env::var(env_keys::ENV_MEMORY_LIMIT_KB) {
            config.memory_limit_kb = Some(parse_env(env_keys::ENV_MEMORY_LIMIT_KB, &raw)?);
        }
        if let Ok(raw) = env::var(env_keys::ENV_CALL_TIMEOUT_MS) {
            config.per_call_timeout =
                Duration::from_millis(parse_env(env_keys::ENV_CALL_TIMEOUT_MS, &raw)?);
        }
        if let Ok(raw) = env::var(env_keys::ENV_RANDOM_SEED) {
            config.random_seed = parse_env(env_keys::ENV_RANDOM_SEED, &raw)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Boundary validation: everything downstream trusts these values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_buffer_bytes < MIN_BUFFER_BYTES {
            return Err(ConfigError::BufferTooSmall {
                floor: MIN_BUFFER_BYTES,
                got: self.max_buffer_bytes,
            });
        }
        if let Some(0) = self.memory_limit_kb {
            return Err(ConfigError::InvalidValue {
                var: env_keys::ENV_MEMORY_LIMIT_KB,
                reason: "memory limit must be positive".to_string(),
            });
        }
        if self.per_call_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                var: env_keys::ENV_CALL_TIMEOUT_MS,
                reason: "timeout must be positive".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            log_path: PathBuf::from("./hornet.log"),
            max_buffer_bytes: DEFAULT_BUFFER_BYTES,
            memory_limit_kb: None,
            per_call_timeout: Duration::from_millis(DEFAULT_CALL_TIMEOUT_MS),
            random_seed: DEFAULT_SEED,
        }
    }
}

fn parse_env<T: std::str::FromStr>(var: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    raw.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        var,
        reason: e.to_string(),
    })
}
