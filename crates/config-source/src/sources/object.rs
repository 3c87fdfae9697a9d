//! Object loader: copies uppercase fields of a serialized in-process object.
//!
//! Reflection over arbitrary objects is expressed through serde: the caller
//! serializes the object (see `DictConfig::load_object`), and this loader
//! copies the all-uppercase keys of the resulting JSON object. Only public
//! data members survive serialization, so methods and private state never
//! leak into the destination.

use crate::args::SourceArgs;
use crate::error::SourceResult;
use crate::registry::ConfigMap;

use super::copy_uppercase;

/// Copy the all-uppercase keys of the serialized object in `value`.
///
/// Arguments:
/// - `value` (required object): the serialized form of the source object.
pub fn load(dest: &mut dyn ConfigMap, args: &SourceArgs) -> SourceResult<bool> {
    let map = args.require_object("value")?;
    Ok(copy_uppercase(dest, map, false))
}
