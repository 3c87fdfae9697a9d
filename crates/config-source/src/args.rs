//! Named loader arguments and default-argument merging.
//!
//! Responsibilities:
//! - Provide `SourceArgs`, the uniform bag of named arguments every loader
//!   receives, with typed accessors for the common argument shapes.
//! - Provide `merge_kwargs` for combining per-source default arguments with
//!   call-site arguments.
//!
//! Invariants:
//! - Call-site arguments always win over registered defaults.
//! - `merge_kwargs` never mutates its inputs; defaults tables stay stable
//!   across any number of loads.
//! - Accessor errors name the argument and the expected kind, never the
//!   supplied value.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ConfigSourceError, SourceResult};

/// Named arguments passed to a source loader.
///
/// Extra keys in a [`SourceDescriptor`](crate::SourceDescriptor) flatten into
/// this map, so argument lists round-trip through JSON/TOML/YAML descriptor
/// files unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceArgs(BTreeMap<String, Value>);

impl SourceArgs {
    /// Create an empty argument map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an argument, consuming and returning the map for chaining.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    /// Insert an argument in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(name.into(), value.into());
    }

    /// Look up a raw argument value.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate arguments in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// A required string argument.
    pub fn require_str(&self, name: &str) -> SourceResult<&str> {
        match self.opt_str(name)? {
            Some(value) => Ok(value),
            None => Err(ConfigSourceError::MissingArgument {
                name: name.to_string(),
            }),
        }
    }

    /// An optional string argument; errors if present with another type.
    pub fn opt_str(&self, name: &str) -> SourceResult<Option<&str>> {
        match self.0.get(name) {
            None => Ok(None),
            Some(Value::String(value)) => Ok(Some(value)),
            Some(other) => Err(invalid(name, "a string", other)),
        }
    }

    /// A boolean flag with a default for when the argument is absent.
    pub fn flag_or(&self, name: &str, default: bool) -> SourceResult<bool> {
        match self.0.get(name) {
            None => Ok(default),
            Some(Value::Bool(value)) => Ok(*value),
            Some(other) => Err(invalid(name, "a boolean", other)),
        }
    }

    /// A required object-valued argument (a key/value mapping).
    pub fn require_object(&self, name: &str) -> SourceResult<&Map<String, Value>> {
        match self.0.get(name) {
            None => Err(ConfigSourceError::MissingArgument {
                name: name.to_string(),
            }),
            Some(Value::Object(map)) => Ok(map),
            Some(other) => Err(invalid(name, "an object", other)),
        }
    }
}

impl From<BTreeMap<String, Value>> for SourceArgs {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, Value)> for SourceArgs {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a SourceArgs {
    type Item = (&'a String, &'a Value);
    type IntoIter = std::collections::btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

fn invalid(name: &str, expected: &str, got: &Value) -> ConfigSourceError {
    ConfigSourceError::InvalidArgument {
        name: name.to_string(),
        message: format!("expected {expected}, got {}", value_kind(got)),
    }
}

/// Human-readable kind of a JSON value, used in argument errors so that
/// messages never echo the value itself.
fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Merge call-site arguments over per-source defaults.
///
/// With no defaults the call-site arguments are returned as-is. Otherwise the
/// result starts from a copy of the defaults and every call-site key
/// overrides; keys present only in the defaults pass through untouched.
pub fn merge_kwargs(call_args: SourceArgs, defaults: Option<&SourceArgs>) -> SourceArgs {
    match defaults {
        None => call_args,
        Some(defaults) => {
            let mut merged = defaults.clone();
            merged.0.extend(call_args.0);
            merged
        }
    }
}
