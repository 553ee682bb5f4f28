//! Model assembly: the transformation pass run once per generation.
//!
//! Stages, each over the whole registry:
//! 1. Naming: list normalization, property names per the naming policy, enum
//!    member names
//! 2. Inheritance: reconcile children against parents, ancestors first
//! 3. Patterns: translate validation patterns on properties and parameters
//! 4. Operations: return-type post-processing
//!
//! Models are visited in name order so output and logs are deterministic.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::GeneratorConfig;
use crate::error::{Error, Result};
use crate::inheritance::{ancestry, collapse_duplicates, reconcile};
use crate::model::{ApiDescription, ModelDefinition, ModelRegistry, Property};
use crate::naming::enums::name_enum_values;
use crate::naming::{NameTable, NamingPolicy};
use crate::operations::post_process_return;
use crate::pattern::translate;

/// A validation pattern that was skipped instead of aborting the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedPattern {
    /// Model name or operation id.
    pub owner: String,
    /// Wire-level property or parameter name.
    pub property: String,
    /// The rejected pattern.
    pub pattern: String,
    /// Why it was rejected.
    pub message: String,
}

/// Summary of one assembly pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssemblyReport {
    /// Models in the registry.
    pub models_processed: usize,
    /// Models reconciled against a parent found in the registry.
    pub models_reconciled: usize,
    /// Parent variables projected onto children.
    pub inherited_properties: usize,
    /// Read/write duplicates collapsed.
    pub duplicates_collapsed: usize,
    /// Patterns translated on properties and parameters.
    pub patterns_translated: usize,
    /// Operations whose return type moved to the collection view.
    pub returns_collapsed: usize,
    /// Patterns skipped because `skip_invalid_patterns` is set.
    pub skipped_patterns: Vec<SkippedPattern>,
}

fn sorted_names(registry: &ModelRegistry) -> Vec<String> {
    let mut names: Vec<String> = registry.keys().cloned().collect();
    names.sort();
    names
}

/// Run the full transformation pass over an API description, in place.
pub fn assemble(api: &mut ApiDescription, config: &GeneratorConfig) -> Result<AssemblyReport> {
    let mut report = AssemblyReport {
        models_processed: api.models.len(),
        ..AssemblyReport::default()
    };

    debug!(
        models = api.models.len(),
        operations = api.operations.len(),
        naming_policy = %config.naming_policy,
        "Starting model assembly."
    );

    for name in sorted_names(&api.models) {
        if let Some(model) = api.models.get_mut(&name) {
            model.normalize_lists();
            apply_naming(model, config.naming_policy);
        }
    }

    reconcile_registry(&mut api.models, &mut report)?;

    for name in sorted_names(&api.models) {
        if let Some(model) = api.models.get_mut(&name) {
            let owner = model.name.clone();
            for property in model.all_properties_mut() {
                translate_pattern(&owner, property, config, &mut report)?;
            }
        }
    }

    for operation in &mut api.operations {
        let owner = operation.operation_id.clone();
        for parameter in &mut operation.parameters {
            translate_pattern(&owner, parameter, config, &mut report)?;
        }
        if post_process_return(operation, config) {
            report.returns_collapsed += 1;
        }
    }

    info!(
        models = report.models_processed,
        reconciled = report.models_reconciled,
        patterns = report.patterns_translated,
        skipped_patterns = report.skipped_patterns.len(),
        "Model assembly complete."
    );

    Ok(report)
}

/// Convert property names and enum member names of one model.
///
/// Names are unique per model and decided per wire-level name, so every copy
/// of a property (declared, read/write, inherited) gets the same name.
pub fn apply_naming(model: &mut ModelDefinition, policy: NamingPolicy) {
    let mut table = NameTable::new(policy);
    for property in model.all_properties_mut() {
        property.name = table.name_for(&property.base_name);
        if property.is_enum {
            name_enum_values(&mut property.allowable_values);
        }
    }
    name_enum_values(&mut model.enum_values);
    model.refresh_has_enums();
}

/// Reconcile every model against its parent, ancestors before descendants.
fn reconcile_registry(registry: &mut ModelRegistry, report: &mut AssemblyReport) -> Result<()> {
    let mut order = Vec::with_capacity(registry.len());
    for name in sorted_names(registry) {
        let depth = ancestry(&name, registry)?.len();
        order.push((depth, name));
    }
    order.sort();

    for (depth, name) in order {
        let Some(mut model) = registry.remove(&name) else {
            continue;
        };

        let parent_known = model
            .parent
            .as_deref()
            .is_some_and(|parent| registry.contains_key(parent));

        if parent_known {
            let before = model.read_write_properties.len();
            model = reconcile(model, registry);
            report.models_reconciled += 1;
            report.inherited_properties += model.parent_properties.len();
            report.duplicates_collapsed += before - model.read_write_properties.len();
            debug!(
                model = %name,
                depth,
                inherited = model.parent_properties.len(),
                "Reconciled model with parent."
            );
        } else {
            if model.parent.is_some() {
                model = reconcile(model, registry);
            }
            report.duplicates_collapsed += collapse_duplicates(&mut model.read_write_properties);
        }

        registry.insert(name, model);
    }

    Ok(())
}

fn translate_pattern(
    owner: &str,
    property: &mut Property,
    config: &GeneratorConfig,
    report: &mut AssemblyReport,
) -> Result<()> {
    let Some(pattern) = property.pattern.as_deref() else {
        return Ok(());
    };

    match translate(pattern) {
        Ok(translation) => {
            translation.attach(&mut property.vendor_extensions);
            report.patterns_translated += 1;
            Ok(())
        }
        Err(err) if config.skip_invalid_patterns => {
            warn!(
                owner = %owner,
                property = %property.base_name,
                pattern = %err.pattern,
                "Skipping invalid validation pattern."
            );
            report.skipped_patterns.push(SkippedPattern {
                owner: owner.to_string(),
                property: property.base_name.clone(),
                message: err.to_string(),
                pattern: err.pattern,
            });
            Ok(())
        }
        Err(source) => Err(Error::InvalidPattern {
            owner: owner.to_string(),
            property: property.base_name.clone(),
            source,
        }),
    }
}
