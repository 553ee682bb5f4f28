//! Generator configuration.
//!
//! One immutable [`GeneratorConfig`] is built per run and passed explicitly to
//! every component. Most flags only matter to the output-assembly stage and
//! are handed to the renderer untouched via [`GeneratorConfig::renderer_flags`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::ConfigurationError;
use crate::naming::NamingPolicy;

/// Default collection-view type used when collapsing list return types.
pub const DEFAULT_COLLECTION_VIEW: &str = "ICollection";

/// Options recognized by the transformation core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[allow(clippy::struct_excessive_bools)]
pub struct GeneratorConfig {
    /// Casing applied to property names.
    pub naming_policy: NamingPolicy,
    /// Rewrite `List<T>`/`Collection<T>` return types to the collection view.
    pub collapse_return_to_collection_view: bool,
    /// Collection-view type name, e.g. `ICollection`.
    pub collection_view_type: String,
    /// Skip (and report) invalid patterns instead of aborting the run.
    pub skip_invalid_patterns: bool,
    /// Emit non-public members. Pass-through.
    pub non_public_visibility: bool,
    /// Emit test sources. Pass-through.
    pub include_tests: bool,
    /// Emit project/solution files. Pass-through.
    pub include_project_file: bool,
    /// Emit assembly metadata. Pass-through.
    pub include_assembly_metadata: bool,
    /// Leave the generation timestamp out of generated headers. Pass-through.
    pub hide_generation_timestamp: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            naming_policy: NamingPolicy::PascalCase,
            collapse_return_to_collection_view: false,
            collection_view_type: DEFAULT_COLLECTION_VIEW.to_string(),
            skip_invalid_patterns: false,
            non_public_visibility: false,
            include_tests: true,
            include_project_file: true,
            include_assembly_metadata: true,
            hide_generation_timestamp: true,
        }
    }
}

impl GeneratorConfig {
    /// Parse a TOML configuration. Missing keys take their defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigurationError> {
        let config: Self = toml::from_str(contents)?;
        Ok(config)
    }

    /// Flags handed to the renderer unchanged, keyed as the templates expect them.
    pub fn renderer_flags(&self) -> BTreeMap<&'static str, Value> {
        BTreeMap::from([
            (
                "modelPropertyNaming",
                Value::from(self.naming_policy.as_str()),
            ),
            ("nonPublicApi", Value::from(self.non_public_visibility)),
            ("excludeTests", Value::from(!self.include_tests)),
            ("optionalProjectFile", Value::from(self.include_project_file)),
            (
                "optionalAssemblyInfo",
                Value::from(self.include_assembly_metadata),
            ),
            (
                "hideGenerationTimestamp",
                Value::from(self.hide_generation_timestamp),
            ),
            ("apiPackage", Value::from("Api")),
            ("modelPackage", Value::from("Model")),
            ("clientPackage", Value::from("Client")),
        ])
    }
}
