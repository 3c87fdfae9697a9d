//! Built-in source loaders.
//!
//! Responsibilities:
//! - Provide the loaders registered under the "dict" config type: `object`,
//!   `dict`, `env`, `json`, `toml`, `yaml`.
//! - Share the uppercase-key copy rule all built-ins follow.
//!
//! Invariants:
//! - Built-ins only ever write all-uppercase keys; anything else is silently
//!   skipped. This is a deliberate convention, not a filter callers can
//!   disable.
//! - Every loader returns `Ok(true)` iff at least one value was written.

pub mod dict;
pub mod env;
pub mod file;
pub mod object;

use serde_json::{Map, Value};

use crate::constants::{
    DEFAULT_CONFIG_TYPE, SOURCE_DICT, SOURCE_ENV, SOURCE_JSON, SOURCE_OBJECT, SOURCE_TOML,
    SOURCE_YAML,
};
use crate::registry::{ConfigMap, SourceRegistry};

/// Register all built-in loaders under the default config type.
pub fn register_builtins(registry: &SourceRegistry) {
    registry.register_force(DEFAULT_CONFIG_TYPE, SOURCE_OBJECT, object::load);
    registry.register_force(DEFAULT_CONFIG_TYPE, SOURCE_DICT, dict::load);
    registry.register_force(DEFAULT_CONFIG_TYPE, SOURCE_ENV, env::load);
    registry.register_force(DEFAULT_CONFIG_TYPE, SOURCE_JSON, file::load_json);
    registry.register_force(DEFAULT_CONFIG_TYPE, SOURCE_TOML, file::load_toml);
    registry.register_force(DEFAULT_CONFIG_TYPE, SOURCE_YAML, file::load_yaml);
}

/// Whether a key is "all uppercase": at least one uppercase character and no
/// lowercase characters. Keys like `PARAM_2` qualify; `param`, `Param`, and
/// `_2` do not.
pub(crate) fn is_uppercase_key(key: &str) -> bool {
    let mut has_upper = false;
    for c in key.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            has_upper = true;
        }
    }
    has_upper
}

/// Copy the all-uppercase keys of `map` into `dest`.
///
/// With `skip_none`, null-valued keys are not written, leaving whatever the
/// destination already holds for them untouched. Returns true iff at least
/// one key was copied.
pub(crate) fn copy_uppercase(
    dest: &mut dyn ConfigMap,
    map: &Map<String, Value>,
    skip_none: bool,
) -> bool {
    let mut loaded = false;
    for (key, value) in map {
        if !is_uppercase_key(key) {
            continue;
        }
        if skip_none && value.is_null() {
            continue;
        }
        dest.set(key.clone(), value.clone());
        loaded = true;
    }
    loaded
}
