//! Dict-like configuration container.
//!
//! Responsibilities:
//! - Hold loaded key/value pairs and per-source default arguments.
//! - Provide `load_from` as sugar over registry dispatch, with default
//!   arguments merged under call-site arguments.
//! - Provide typed convenience wrappers for the built-in sources.
//!
//! Invariants:
//! - The defaults table is set at construction and never mutated by loads.
//! - The container dispatches under the "dict" config type.
//! - Values accumulate across loads; nothing resets the container.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::args::{SourceArgs, merge_kwargs};
use crate::constants::{
    DEFAULT_CONFIG_TYPE, SOURCE_DICT, SOURCE_ENV, SOURCE_JSON, SOURCE_OBJECT, SOURCE_TOML,
    SOURCE_YAML,
};
use crate::error::SourceResult;
use crate::registry::{ConfigMap, SourceRegistry};

/// Mutable key/value configuration populated from registered sources.
///
/// ```
/// use config_source::{DictConfig, SourceArgs};
///
/// let mut config = DictConfig::new();
/// config.load_from("dict", SourceArgs::new().with("value", serde_json::json!({
///     "DEBUG": true,
///     "ignored": 1,
/// })))?;
/// assert_eq!(config.get("DEBUG"), Some(&serde_json::Value::Bool(true)));
/// # Ok::<(), config_source::ConfigSourceError>(())
/// ```
#[derive(Debug, Clone)]
pub struct DictConfig {
    data: BTreeMap<String, Value>,
    defaults: HashMap<String, SourceArgs>,
    registry: Arc<SourceRegistry>,
}

impl DictConfig {
    /// Create an empty container backed by the shared registry.
    pub fn new() -> Self {
        Self {
            data: BTreeMap::new(),
            defaults: HashMap::new(),
            registry: SourceRegistry::shared(),
        }
    }

    /// Set per-source default arguments, keyed by source name.
    ///
    /// Defaults are merged under call-site arguments on every
    /// [`load_from`](Self::load_from); call-site arguments win.
    pub fn with_defaults(mut self, defaults: HashMap<String, SourceArgs>) -> Self {
        self.defaults = defaults;
        self
    }

    /// Use an explicit registry instead of the shared one.
    pub fn with_registry(mut self, registry: Arc<SourceRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Load values from a named source.
    ///
    /// Merges `args` over this container's defaults for `source` and
    /// dispatches through the registry under the "dict" config type. Returns
    /// the loader's result: `Ok(true)` iff it loaded at least one value.
    pub fn load_from(&mut self, source: &str, args: SourceArgs) -> SourceResult<bool> {
        let args = merge_kwargs(args, self.defaults.get(source));
        let registry = Arc::clone(&self.registry);
        registry.load_to(self, source, DEFAULT_CONFIG_TYPE, &args)
    }

    /// Load the all-uppercase fields of a serializable object.
    pub fn load_object<T: Serialize>(&mut self, object: &T) -> SourceResult<bool> {
        let value = serde_json::to_value(object)?;
        self.load_from(SOURCE_OBJECT, SourceArgs::new().with("value", value))
    }

    /// Load the all-uppercase keys of a plain mapping.
    pub fn load_map(&mut self, map: serde_json::Map<String, Value>) -> SourceResult<bool> {
        self.load_from(SOURCE_DICT, SourceArgs::new().with("value", Value::Object(map)))
    }

    /// Load environment variables starting with `prefix` (prefix trimmed).
    pub fn load_env(&mut self, prefix: &str) -> SourceResult<bool> {
        self.load_from(SOURCE_ENV, SourceArgs::new().with("prefix", prefix))
    }

    /// Load the top-level uppercase keys of a JSON file.
    pub fn load_json_file(&mut self, path: impl AsRef<Path>) -> SourceResult<bool> {
        self.load_file(SOURCE_JSON, path.as_ref())
    }

    /// Load the top-level uppercase keys of a TOML file.
    pub fn load_toml_file(&mut self, path: impl AsRef<Path>) -> SourceResult<bool> {
        self.load_file(SOURCE_TOML, path.as_ref())
    }

    /// Load the top-level uppercase keys of a YAML file.
    pub fn load_yaml_file(&mut self, path: impl AsRef<Path>) -> SourceResult<bool> {
        self.load_file(SOURCE_YAML, path.as_ref())
    }

    fn load_file(&mut self, source: &str, path: &Path) -> SourceResult<bool> {
        let args = SourceArgs::new().with("path", path.display().to_string());
        self.load_from(source, args)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.data.insert(key.into(), value.into())
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.data.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.data.iter()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Borrow the underlying key/value map.
    pub fn as_map(&self) -> &BTreeMap<String, Value> {
        &self.data
    }

    /// Consume the container, keeping only the key/value map.
    pub fn into_map(self) -> BTreeMap<String, Value> {
        self.data
    }
}

impl Default for DictConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigMap for DictConfig {
    fn set(&mut self, key: String, value: Value) {
        self.data.insert(key, value);
    }
}

impl PartialEq<BTreeMap<String, Value>> for DictConfig {
    fn eq(&self, other: &BTreeMap<String, Value>) -> bool {
        self.data == *other
    }
}

impl PartialEq<DictConfig> for BTreeMap<String, Value> {
    fn eq(&self, other: &DictConfig) -> bool {
        *self == other.data
    }
}

impl<'a> IntoIterator for &'a DictConfig {
    type Item = (&'a String, &'a Value);
    type IntoIter = std::collections::btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}
