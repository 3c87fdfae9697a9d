//! Source registry and dispatch.
//!
//! Responsibilities:
//! - Map (config type, source name) pairs to loaders.
//! - Dispatch `load_to` calls to the registered loader with the supplied
//!   arguments verbatim.
//! - Provide scoped temporary registration for test isolation.
//!
//! Does NOT handle:
//! - Argument merging with per-source defaults (see `args.rs` /
//!   `DictConfig::load_from`).
//! - Batch loading across descriptors (see `batch.rs`).
//!
//! Invariants / Assumptions:
//! - Within a config type, source names are unique unless the caller
//!   explicitly registers with `register_force`.
//! - The registry never examines a loader's return value; `load_to` returns
//!   it unchanged.
//! - The internal lock is released before a loader runs, so loaders may do
//!   I/O or register further sources without deadlocking.
//! - Registration ordering across threads is the caller's problem; the lock
//!   only keeps the table itself consistent.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use serde_json::Value;

use crate::args::SourceArgs;
use crate::constants::DEFAULT_CONFIG_TYPE;
use crate::error::{ConfigSourceError, SourceResult};
use crate::sources::register_builtins;

/// Destination contract for loaders.
///
/// A loader only ever writes keys; skipping a key is how values already in
/// the destination are preserved.
pub trait ConfigMap {
    /// Store one key/value pair.
    fn set(&mut self, key: String, value: Value);
}

impl ConfigMap for std::collections::BTreeMap<String, Value> {
    fn set(&mut self, key: String, value: Value) {
        self.insert(key, value);
    }
}

impl ConfigMap for serde_json::Map<String, Value> {
    fn set(&mut self, key: String, value: Value) {
        self.insert(key, value);
    }
}

/// The shape every source loader must satisfy.
///
/// Returns `Ok(true)` iff at least one value was written to the destination;
/// `Ok(false)` is the soft "nothing loaded" signal.
pub type LoaderFn = dyn Fn(&mut dyn ConfigMap, &SourceArgs) -> SourceResult<bool> + Send + Sync;

type SourceTable = HashMap<String, HashMap<String, Arc<LoaderFn>>>;

/// Registry of source loaders keyed by (config type, source name).
///
/// The registry is an explicit object rather than process-global state so
/// tests can construct isolated instances; [`SourceRegistry::shared`] gives
/// the conventional process-wide instance pre-populated with the built-in
/// sources.
pub struct SourceRegistry {
    sources: RwLock<SourceTable>,
}

impl SourceRegistry {
    /// Create an empty registry with no sources.
    pub fn new() -> Self {
        Self {
            sources: RwLock::new(HashMap::new()),
        }
    }

    /// Create a registry pre-populated with the built-in sources.
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        register_builtins(&registry);
        registry
    }

    /// The process-wide registry, created on first use with the built-in
    /// sources registered. Plugins register here at startup.
    pub fn shared() -> Arc<SourceRegistry> {
        static SHARED: OnceLock<Arc<SourceRegistry>> = OnceLock::new();
        Arc::clone(SHARED.get_or_init(|| Arc::new(SourceRegistry::with_builtins())))
    }

    /// Register a loader for `source` under `config_type`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigSourceError::DuplicateSource`] if the pair is already
    /// registered; use [`register_force`](Self::register_force) to replace.
    pub fn register<F>(
        &self,
        config_type: impl Into<String>,
        source: impl Into<String>,
        loader: F,
    ) -> SourceResult<()>
    where
        F: Fn(&mut dyn ConfigMap, &SourceArgs) -> SourceResult<bool> + Send + Sync + 'static,
    {
        let config_type = config_type.into();
        let source = source.into();
        let mut sources = self.write_lock();
        let by_type = sources.entry(config_type.clone()).or_default();
        if by_type.contains_key(&source) {
            return Err(ConfigSourceError::DuplicateSource {
                source_name: source,
                config_type,
            });
        }
        tracing::debug!(config_type = %config_type, source = %source, "registered config source");
        by_type.insert(source, Arc::new(loader));
        Ok(())
    }

    /// Register a loader, replacing any existing entry for the pair.
    pub fn register_force<F>(
        &self,
        config_type: impl Into<String>,
        source: impl Into<String>,
        loader: F,
    ) where
        F: Fn(&mut dyn ConfigMap, &SourceArgs) -> SourceResult<bool> + Send + Sync + 'static,
    {
        let config_type = config_type.into();
        let source = source.into();
        tracing::debug!(config_type = %config_type, source = %source, "registered config source");
        self.write_lock()
            .entry(config_type)
            .or_default()
            .insert(source, Arc::new(loader));
    }

    /// Look up the loader registered for (config type, source name).
    pub fn lookup(&self, config_type: &str, source: &str) -> Option<Arc<LoaderFn>> {
        self.read_lock()
            .get(config_type)
            .and_then(|by_type| by_type.get(source))
            .cloned()
    }

    /// Resolve a (source, config type) pair and invoke the loader.
    ///
    /// The loader receives `dest` and `args` exactly as supplied; its return
    /// value (and any error) comes back unexamined. All destination mutation
    /// is the loader's.
    ///
    /// # Errors
    ///
    /// [`ConfigSourceError::UnknownConfigType`] if `config_type` has no
    /// registered sources, [`ConfigSourceError::UnknownSource`] if `source`
    /// is not registered under it.
    pub fn load_to(
        &self,
        dest: &mut dyn ConfigMap,
        source: &str,
        config_type: &str,
        args: &SourceArgs,
    ) -> SourceResult<bool> {
        let loader = {
            let sources = self.read_lock();
            let by_type = sources.get(config_type).ok_or_else(|| {
                ConfigSourceError::UnknownConfigType(config_type.to_string())
            })?;
            by_type
                .get(source)
                .cloned()
                .ok_or_else(|| ConfigSourceError::UnknownSource {
                    source_name: source.to_string(),
                    config_type: config_type.to_string(),
                })?
        };
        tracing::trace!(config_type = %config_type, source = %source, "dispatching config source");
        loader(dest, args)
    }

    /// Register a loader for the duration of the returned guard.
    ///
    /// Replaces any existing entry; dropping the guard restores the previous
    /// loader or removes the entry again. Intended for tests that need to
    /// stub a source on a shared registry.
    pub fn temporary_source<F>(
        &self,
        config_type: impl Into<String>,
        source: impl Into<String>,
        loader: F,
    ) -> TemporarySource<'_>
    where
        F: Fn(&mut dyn ConfigMap, &SourceArgs) -> SourceResult<bool> + Send + Sync + 'static,
    {
        let config_type = config_type.into();
        let source = source.into();
        let mut sources = self.write_lock();
        let type_existed = sources.contains_key(&config_type);
        let previous = sources
            .entry(config_type.clone())
            .or_default()
            .insert(source.clone(), Arc::new(loader));
        drop(sources);
        TemporarySource {
            registry: self,
            config_type,
            source,
            previous,
            type_existed,
        }
    }

    fn read_lock(&self) -> std::sync::RwLockReadGuard<'_, SourceTable> {
        self.sources.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_lock(&self) -> std::sync::RwLockWriteGuard<'_, SourceTable> {
        self.sources.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SourceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sources = self.read_lock();
        let mut config_types: Vec<&String> = sources.keys().collect();
        config_types.sort();
        f.debug_struct("SourceRegistry")
            .field("config_types", &config_types)
            .finish_non_exhaustive()
    }
}

/// Guard for a scoped registration; see [`SourceRegistry::temporary_source`].
#[must_use = "dropping the guard immediately undoes the registration"]
pub struct TemporarySource<'a> {
    registry: &'a SourceRegistry,
    config_type: String,
    source: String,
    previous: Option<Arc<LoaderFn>>,
    type_existed: bool,
}

impl Drop for TemporarySource<'_> {
    fn drop(&mut self) {
        let mut sources = self.registry.write_lock();
        match self.previous.take() {
            Some(previous) => {
                sources
                    .entry(self.config_type.clone())
                    .or_default()
                    .insert(self.source.clone(), previous);
            }
            None => {
                if let Some(by_type) = sources.get_mut(&self.config_type) {
                    by_type.remove(&self.source);
                    if by_type.is_empty() && !self.type_existed {
                        sources.remove(&self.config_type);
                    }
                }
            }
        }
    }
}

/// Declarative registry construction.
///
/// The builder replaces decorator-style registration: sources are named at
/// definition sites and applied together, with duplicate detection deferred
/// to [`build`](RegistryBuilder::build).
#[derive(Default)]
pub struct RegistryBuilder {
    entries: Vec<(String, String, Arc<LoaderFn>)>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a source under the default config type ("dict").
    pub fn source<F>(self, name: impl Into<String>, loader: F) -> Self
    where
        F: Fn(&mut dyn ConfigMap, &SourceArgs) -> SourceResult<bool> + Send + Sync + 'static,
    {
        self.source_for(DEFAULT_CONFIG_TYPE, name, loader)
    }

    /// Add a source under an explicit config type.
    pub fn source_for<F>(
        mut self,
        config_type: impl Into<String>,
        name: impl Into<String>,
        loader: F,
    ) -> Self
    where
        F: Fn(&mut dyn ConfigMap, &SourceArgs) -> SourceResult<bool> + Send + Sync + 'static,
    {
        self.entries
            .push((config_type.into(), name.into(), Arc::new(loader)));
        self
    }

    /// Build the registry.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigSourceError::DuplicateSource`] if two entries name the
    /// same (config type, source) pair.
    pub fn build(self) -> SourceResult<SourceRegistry> {
        let registry = SourceRegistry::new();
        {
            let mut sources = registry.write_lock();
            for (config_type, source, loader) in self.entries {
                let by_type = sources.entry(config_type.clone()).or_default();
                if by_type.contains_key(&source) {
                    return Err(ConfigSourceError::DuplicateSource {
                        source_name: source,
                        config_type,
                    });
                }
                by_type.insert(source, loader);
            }
        }
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn noop(_: &mut dyn ConfigMap, _: &SourceArgs) -> SourceResult<bool> {
        Ok(true)
    }

    #[test]
    fn test_register_default_type() {
        let registry = SourceRegistry::new();
        registry.register(DEFAULT_CONFIG_TYPE, "one", noop).unwrap();
        registry.register(DEFAULT_CONFIG_TYPE, "two", noop).unwrap();

        assert!(registry.lookup("dict", "one").is_some());
        assert!(registry.lookup("dict", "two").is_some());
        assert!(registry.lookup("dict", "three").is_none());
    }

    #[test]
    fn test_register_partitions_config_types() {
        let registry = SourceRegistry::new();
        registry.register("xx", "one", noop).unwrap();
        registry.register("yy", "two", noop).unwrap();

        assert!(registry.lookup("xx", "one").is_some());
        assert!(registry.lookup("yy", "one").is_none());
        assert!(registry.lookup("yy", "two").is_some());
    }

    #[test]
    fn test_register_duplicate_fails() {
        let registry = SourceRegistry::new();
        registry.register("dict", "one", noop).unwrap();

        let err = registry.register("dict", "one", noop).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Already registered: one (config type: dict)"
        );
    }

    #[test]
    fn test_register_force_replaces() {
        let registry = SourceRegistry::new();
        registry
            .register("dict", "one", |_: &mut dyn ConfigMap, _: &SourceArgs| Ok(false))
            .unwrap();
        registry.register_force("dict", "one", noop);

        let mut dest = BTreeMap::new();
        let res = registry
            .load_to(&mut dest, "one", "dict", &SourceArgs::new())
            .unwrap();
        assert!(res, "replacement loader should be the one invoked");
    }

    #[test]
    fn test_load_to_unknown_config_type() {
        let registry = SourceRegistry::new();
        let mut dest = BTreeMap::new();
        let err = registry
            .load_to(&mut dest, "env", "bla", &SourceArgs::new())
            .unwrap_err();
        assert_eq!(err.to_string(), "Unknown config type: bla");
    }

    #[test]
    fn test_load_to_unknown_source() {
        let registry = SourceRegistry::new();
        registry.register("bla", "other", noop).unwrap();

        let mut dest = BTreeMap::new();
        let err = registry
            .load_to(&mut dest, "env", "bla", &SourceArgs::new())
            .unwrap_err();
        assert_eq!(err.to_string(), "Unknown source: env (config type: bla)");
    }

    #[test]
    fn test_load_to_passes_dest_and_args_verbatim() {
        let registry = SourceRegistry::new();
        let seen: Arc<Mutex<Option<SourceArgs>>> = Arc::new(Mutex::new(None));
        let seen_in_loader = Arc::clone(&seen);
        registry
            .register("dict", "probe", move |dest, args| {
                *seen_in_loader.lock().unwrap() = Some(args.clone());
                dest.set("CALLED".to_string(), Value::Bool(true));
                Ok(true)
            })
            .unwrap();

        let args = SourceArgs::new().with("a", 2).with("b", "x");
        let mut dest = BTreeMap::new();
        let res = registry.load_to(&mut dest, "probe", "dict", &args).unwrap();

        assert!(res);
        assert_eq!(dest.get("CALLED"), Some(&Value::Bool(true)));
        assert_eq!(seen.lock().unwrap().as_ref(), Some(&args));
    }

    #[test]
    fn test_load_to_returns_loader_result_unexamined() {
        let registry = SourceRegistry::new();
        registry
            .register("dict", "nothing", |_: &mut dyn ConfigMap, _: &SourceArgs| Ok(false))
            .unwrap();

        let mut dest = BTreeMap::new();
        let res = registry
            .load_to(&mut dest, "nothing", "dict", &SourceArgs::new())
            .unwrap();
        assert!(!res);
        assert!(dest.is_empty());
    }

    #[test]
    fn test_lookup_returns_registered_loader() {
        let registry = SourceRegistry::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_in_loader = Arc::clone(&calls);
        registry
            .register("dict", "counted", move |_, _| {
                calls_in_loader.fetch_add(1, Ordering::SeqCst);
                Ok(true)
            })
            .unwrap();

        let loader = registry.lookup("dict", "counted").unwrap();
        let mut dest = BTreeMap::new();
        loader(&mut dest, &SourceArgs::new()).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_temporary_source_removes_new_entry() {
        let registry = SourceRegistry::new();
        {
            let _guard = registry.temporary_source("dict", "tmp", noop);
            assert!(registry.lookup("dict", "tmp").is_some());
        }
        assert!(registry.lookup("dict", "tmp").is_none());
        // The "dict" bucket was created by the guard, so lookups report an
        // unknown config type again.
        let mut dest = BTreeMap::new();
        let err = registry
            .load_to(&mut dest, "tmp", "dict", &SourceArgs::new())
            .unwrap_err();
        assert!(matches!(err, ConfigSourceError::UnknownConfigType(_)));
    }

    #[test]
    fn test_temporary_source_restores_previous() {
        let registry = SourceRegistry::new();
        registry
            .register("dict", "one", |_: &mut dyn ConfigMap, _: &SourceArgs| Ok(false))
            .unwrap();

        let mut dest = BTreeMap::new();
        {
            let _guard = registry.temporary_source("dict", "one", noop);
            let res = registry
                .load_to(&mut dest, "one", "dict", &SourceArgs::new())
                .unwrap();
            assert!(res, "temporary loader should shadow the original");
        }
        let res = registry
            .load_to(&mut dest, "one", "dict", &SourceArgs::new())
            .unwrap();
        assert!(!res, "original loader should be restored");
    }

    #[test]
    fn test_builder_registers_sources() {
        let registry = RegistryBuilder::new()
            .source("one", noop)
            .source_for("xx", "two", noop)
            .build()
            .unwrap();

        assert!(registry.lookup("dict", "one").is_some());
        assert!(registry.lookup("xx", "two").is_some());
    }

    #[test]
    fn test_builder_duplicate_fails() {
        let err = RegistryBuilder::new()
            .source("one", noop)
            .source("one", noop)
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigSourceError::DuplicateSource { .. }));
    }

    #[test]
    fn test_shared_registry_has_builtins() {
        let registry = SourceRegistry::shared();
        for source in ["dict", "object", "env", "json", "toml", "yaml"] {
            assert!(
                registry.lookup("dict", source).is_some(),
                "builtin source {source} should be registered"
            );
        }
    }
}
