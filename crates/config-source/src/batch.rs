//! Batch loading from an ordered list of source descriptors.
//!
//! Responsibilities:
//! - Define `SourceDescriptor`, the serializable record describing one load
//!   step (source name, optional config type, extra loader arguments).
//! - Apply a descriptor sequence to one destination with short-circuit
//!   failure semantics.
//!
//! Invariants:
//! - Descriptors apply in order; iteration STOPS at the first loader that
//!   reports nothing loaded, leaving later descriptors unapplied.
//! - Mutations from loaders that already ran are kept; there is no rollback.
//! - An empty descriptor list is not an error, it is simply "nothing loaded".

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::args::SourceArgs;
use crate::constants::DEFAULT_CONFIG_TYPE;
use crate::error::SourceResult;
use crate::registry::{ConfigMap, SourceRegistry};

/// One batch-load step.
///
/// Serializes with the wire names `from` and `type`; every other key in the
/// serialized form flattens into [`args`](Self::args) and is handed to the
/// loader untouched, so descriptor lists can live in JSON/TOML/YAML files:
///
/// ```json
/// [
///     {"from": "env", "prefix": "APP_"},
///     {"from": "json", "path": "app.json", "silent": true}
/// ]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceDescriptor {
    /// Source name to load from.
    #[serde(rename = "from")]
    pub source: String,

    /// Config type to dispatch under; `None` means the default ("dict").
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub config_type: Option<String>,

    /// Remaining keys, passed to the loader as its arguments.
    #[serde(flatten)]
    pub args: SourceArgs,
}

impl SourceDescriptor {
    /// Describe a load from `source` under the default config type.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            config_type: None,
            args: SourceArgs::new(),
        }
    }

    /// Dispatch under an explicit config type.
    pub fn with_type(mut self, config_type: impl Into<String>) -> Self {
        self.config_type = Some(config_type.into());
        self
    }

    /// Add a loader argument.
    pub fn with_arg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.args.insert(name, value);
        self
    }
}

impl SourceRegistry {
    /// Apply a sequence of source descriptors to one destination.
    ///
    /// Returns `Ok(true)` only if every descriptor's loader reported data
    /// loaded. The first loader that returns `false` stops the iteration;
    /// descriptors after it never run, and earlier mutations stay applied.
    /// An empty sequence returns `Ok(false)` without touching `dest`.
    ///
    /// # Errors
    ///
    /// Dispatch and loader errors propagate immediately, also leaving earlier
    /// mutations in place.
    pub fn load_multiple_to(
        &self,
        dest: &mut dyn ConfigMap,
        descriptors: &[SourceDescriptor],
    ) -> SourceResult<bool> {
        let mut loaded = false;
        for descriptor in descriptors {
            let config_type = descriptor
                .config_type
                .as_deref()
                .unwrap_or(DEFAULT_CONFIG_TYPE);
            loaded = self.load_to(dest, &descriptor.source, config_type, &descriptor.args)?;
            if !loaded {
                tracing::debug!(
                    source = %descriptor.source,
                    config_type = %config_type,
                    "source reported nothing loaded, stopping batch"
                );
                return Ok(false);
            }
        }
        Ok(loaded)
    }
}
