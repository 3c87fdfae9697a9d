//! Configuration aggregation from pluggable, named sources.
//!
//! This crate populates mutable key/value containers from heterogeneous
//! sources (in-process objects, environment variables, structured-data
//! files, or other mappings) through a registry keyed by (config type,
//! source name). Loaders share one contract: they receive a destination and
//! a bag of named arguments, write the values they find, and report whether
//! anything was loaded.
//!
//! ```no_run
//! use config_source::{DictConfig, SourceArgs};
//!
//! let mut config = DictConfig::new();
//! config.load_env("APP_")?;
//! config.load_from(
//!     "json",
//!     SourceArgs::new().with("path", "app.json").with("silent", true),
//! )?;
//! # Ok::<(), config_source::ConfigSourceError>(())
//! ```

pub mod args;
pub mod auto;
pub mod batch;
pub mod config;
pub mod constants;
pub mod error;
pub mod registry;
pub mod sources;

pub use args::{SourceArgs, merge_kwargs};
pub use auto::{ConfigInput, DictConfigLoader, detect_source};
pub use batch::SourceDescriptor;
pub use config::DictConfig;
pub use constants::DEFAULT_CONFIG_TYPE;
pub use error::{ConfigSourceError, SourceResult};
pub use registry::{ConfigMap, LoaderFn, RegistryBuilder, SourceRegistry, TemporarySource};
pub use sources::env::load_dotenv;
