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

//! Target identifiers.
//!
//! Owned, growth-checked string wrappers for the three bus identifiers.
//! Validation happens once at construction; the rest of the crate can
//! hold them read-only without re-checking.

use crate::core::constants::limits;
use crate::core::errors::ConfigError;
use serde::{Deserialize, Serialize};

fn check_len(field: &'static str, s: &str) -> Result<(), ConfigError> {
    if s.is_empty() {
        return Err(ConfigError::EmptyName { field });
    }
    if s.len() > limits::MAX_NAME_LEN {
        return Err(ConfigError::NameTooLong {
            field,
            max: limits::MAX_NAME_LEN,
        });
    }
    Ok(())
}

/// A connection name on the bus, well-known (`org.example.Daemon`) or
/// unique (`:1.42`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BusName(String);

impl BusName {
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        check_len("bus name", s)?;
        if !s.starts_with(':') && !s.contains('.') {
            return Err(ConfigError::MalformedName {
                field: "bus name",
                reason: "well-known names need at least two dot-separated elements",
            });
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// An object path (`/org/example/Daemon`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectPath(String);

impl ObjectPath {
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        check_len("object path", s)?;
        if !s.starts_with('/') {
            return Err(ConfigError::MalformedName {
                field: "object path",
                reason: "object paths start with '/'",
            });
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// An interface name (`org.example.Daemon.Control`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InterfaceName(String);

impl InterfaceName {
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        check_len("interface name", s)?;
        if !s.contains('.') {
            return Err(ConfigError::MalformedName {
                field: "interface name",
                reason: "interface names need at least two dot-separated elements",
            });
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The process/interface under test. Created once from configuration,
/// read-only for the whole run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuzzTarget {
    bus_name: BusName,
    object_path: ObjectPath,
    interface: InterfaceName,
}

impl FuzzTarget {
    pub fn new(bus_name: &str, object_path: &str, interface: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            bus_name: BusName::parse(bus_name)?,
            object_path: ObjectPath::parse(object_path)?,
            interface: InterfaceName::parse(interface)?,
        })
    }

    pub fn bus_name(&self) -> &BusName {
        &self.bus_name
    }

    pub fn object_path(&self) -> &ObjectPath {
        &self.object_path
    }

    pub fn interface(&self) -> &InterfaceName {
        &self.interface
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_well_formed_target() {
        let target = FuzzTarget::new("org.gnome.Shell", "/org/gnome/Shell", "org.gnome.Shell")
            .expect("valid target");
        assert_eq!(target.bus_name().as_str(), "org.gnome.Shell");
    }

    #[test]
    fn test_accepts_unique_bus_name() {
        assert!(BusName::parse(":1.42").is_ok());
    }

    #[test]
    fn test_rejects_empty_identifier() {
        assert!(matches!(
            BusName::parse(""),
            Err(ConfigError::EmptyName { .. })
        ));
    }

    #[test]
    fn test_rejects_pathless_object_path() {
        assert!(matches!(
            ObjectPath::parse("org/gnome/Shell"),
            Err(ConfigError::MalformedName { .. })
        ));
    }

    #[test]
    fn test_rejects_oversized_identifier() {
        let long = format!("org.{}", "x".repeat(300));
        assert!(matches!(
            InterfaceName::parse(&long),
            Err(ConfigError::NameTooLong { .. })
        ));
    }
}
