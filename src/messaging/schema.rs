//! # Adapter Configuration Schema
//!
//! Each adapter publishes a schema of typed properties. The host process
//! surfaces every property as a configurable option (`--<adapter>-<property>`)
//! and feeds the chosen values back as an [`AdapterConfig`], validated against
//! the schema.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::config::{ConfigResult, ConfigurationError};

/// Closed set of property types an adapter may declare
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    String,
    Int,
    Bool,
}

impl PropertyKind {
    /// Parse a raw string into a typed value of this kind
    pub fn parse(&self, property: &str, raw: &str) -> ConfigResult<PropertyValue> {
        match self {
            Self::String => Ok(PropertyValue::String(raw.to_string())),
            Self::Int => raw.trim().parse::<i64>().map(PropertyValue::Int).map_err(|_| {
                ConfigurationError::invalid_property(property, self.as_str(), raw)
            }),
            Self::Bool => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Ok(PropertyValue::Bool(true)),
                "false" | "0" | "no" | "off" => Ok(PropertyValue::Bool(false)),
                _ => Err(ConfigurationError::invalid_property(
                    property,
                    self.as_str(),
                    raw,
                )),
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Bool => "bool",
        }
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed property value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    String(String),
    Int(i64),
    Bool(bool),
}

impl PropertyValue {
    pub fn kind(&self) -> PropertyKind {
        match self {
            Self::String(_) => PropertyKind::String,
            Self::Int(_) => PropertyKind::Int,
            Self::Bool(_) => PropertyKind::Bool,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Int(i) => write!(f, "{i}"),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// Descriptor for one adapter property
#[derive(Debug, Clone)]
pub struct AdapterProperty {
    pub name: &'static str,
    pub kind: PropertyKind,
    pub default: PropertyValue,
    pub description: &'static str,
}

impl AdapterProperty {
    pub fn string(name: &'static str, default: &str, description: &'static str) -> Self {
        Self {
            name,
            kind: PropertyKind::String,
            default: PropertyValue::String(default.to_string()),
            description,
        }
    }

    pub fn int(name: &'static str, default: i64, description: &'static str) -> Self {
        Self {
            name,
            kind: PropertyKind::Int,
            default: PropertyValue::Int(default),
            description,
        }
    }

    pub fn bool(name: &'static str, default: bool, description: &'static str) -> Self {
        Self {
            name,
            kind: PropertyKind::Bool,
            default: PropertyValue::Bool(default),
            description,
        }
    }

    /// Name of the command line option for this property (`<adapter>-<property>`)
    pub fn option_name(&self, adapter: &str) -> String {
        format!("{adapter}-{}", self.name)
    }
}

/// The set of properties an adapter accepts
#[derive(Debug, Clone)]
pub struct AdapterSchema {
    pub adapter: &'static str,
    pub properties: Vec<AdapterProperty>,
}

impl AdapterSchema {
    pub fn new(adapter: &'static str, properties: Vec<AdapterProperty>) -> Self {
        Self {
            adapter,
            properties,
        }
    }

    /// Look up a property descriptor by name
    pub fn property(&self, name: &str) -> Option<&AdapterProperty> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Configuration holding every property at its default value
    pub fn defaults(&self) -> AdapterConfig {
        let values = self
            .properties
            .iter()
            .map(|p| (p.name.to_string(), p.default.clone()))
            .collect();

        AdapterConfig {
            adapter: self.adapter.to_string(),
            values,
        }
    }

    /// Build a validated configuration from raw string values
    ///
    /// Properties absent from `raw` keep their defaults. Unknown property names
    /// and values that do not parse as the declared kind are rejected.
    pub fn config_from(&self, raw: &HashMap<String, String>) -> ConfigResult<AdapterConfig> {
        let mut config = self.defaults();
        for (name, value) in raw {
            config.set(self, name, value)?;
        }
        Ok(config)
    }
}

/// Validated adapter configuration (property name -> typed value)
#[derive(Debug, Clone, PartialEq)]
pub struct AdapterConfig {
    adapter: String,
    values: BTreeMap<String, PropertyValue>,
}

impl AdapterConfig {
    /// Name of the adapter this configuration belongs to
    pub fn adapter(&self) -> &str {
        &self.adapter
    }

    /// Set a property from its raw string form, validating against the schema
    pub fn set(&mut self, schema: &AdapterSchema, name: &str, raw: &str) -> ConfigResult<()> {
        let property = schema
            .property(name)
            .ok_or_else(|| ConfigurationError::unknown_property(schema.adapter, name))?;
        let value = property.kind.parse(name, raw)?;
        self.values.insert(name.to_string(), value);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.values.get(name)
    }

    pub fn get_string(&self, name: &str) -> ConfigResult<&str> {
        match self.values.get(name) {
            Some(PropertyValue::String(s)) => Ok(s),
            other => Err(self.type_mismatch(name, PropertyKind::String, other)),
        }
    }

    pub fn get_int(&self, name: &str) -> ConfigResult<i64> {
        match self.values.get(name) {
            Some(PropertyValue::Int(i)) => Ok(*i),
            other => Err(self.type_mismatch(name, PropertyKind::Int, other)),
        }
    }

    pub fn get_bool(&self, name: &str) -> ConfigResult<bool> {
        match self.values.get(name) {
            Some(PropertyValue::Bool(b)) => Ok(*b),
            other => Err(self.type_mismatch(name, PropertyKind::Bool, other)),
        }
    }

    /// Iterate properties in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    fn type_mismatch(
        &self,
        name: &str,
        expected: PropertyKind,
        found: Option<&PropertyValue>,
    ) -> ConfigurationError {
        match found {
            Some(value) => {
                ConfigurationError::invalid_property(name, expected.as_str(), value.to_string())
            }
            None => ConfigurationError::unknown_property(&self.adapter, name),
        }
    }
}
