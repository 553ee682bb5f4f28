//! Single-parent inheritance reconciliation.
//!
//! C# models are emitted as subclasses, so anything a child re-declares from
//! its parent has to be reconciled before rendering:
//! - inline enums duplicated from the parent are dropped from the child
//! - the parent's discriminator self-populates with the child's name
//! - `parent_properties` lists what the parent contributes, for templates
//! - upstream duplicates in the read/write list are collapsed

use std::collections::{BTreeSet, HashSet};

use tracing::{debug, info};

use crate::error::ConfigurationError;
use crate::model::{ModelDefinition, ModelRegistry, Property, mark_sequence};

/// Ancestors of a model, nearest first.
///
/// The walk stops at a model without a parent or at a parent reference that
/// is not in the registry. Revisiting a model is an inheritance cycle.
pub fn ancestry(name: &str, registry: &ModelRegistry) -> Result<Vec<String>, ConfigurationError> {
    let mut chain = vec![name.to_string()];
    let mut seen: HashSet<&str> = HashSet::from([name]);
    let mut current = registry.get(name);

    while let Some(parent_name) = current.and_then(|m| m.parent.as_deref()) {
        if !seen.insert(parent_name) {
            chain.push(parent_name.to_string());
            return Err(ConfigurationError::InheritanceCycle(chain));
        }
        let Some(parent) = registry.get(parent_name) else {
            break;
        };
        chain.push(parent_name.to_string());
        current = Some(parent);
    }

    chain.remove(0);
    Ok(chain)
}

/// Reconcile a child model against its parent in `registry`.
///
/// A model without a parent, or whose parent is not in the registry, is
/// returned unchanged. The parent is used as currently stored; callers that
/// want multi-level chains resolved reconcile ancestors first.
pub fn reconcile(mut model: ModelDefinition, registry: &ModelRegistry) -> ModelDefinition {
    let Some(parent_name) = model.parent.as_deref() else {
        return model;
    };
    let Some(parent) = registry.get(parent_name) else {
        info!(
            model = %model.name,
            parent = %parent_name,
            "Parent model not found in registry, treating as root."
        );
        return model;
    };

    if model.properties.iter().any(|p| p.is_enum) {
        remove_inherited_enums(&mut model, parent);
    }
    apply_discriminator_default(&mut model, parent);
    project_parent_vars(&mut model, parent);
    collapse_duplicates(&mut model.read_write_properties);
    model.refresh_has_enums();

    model
}

fn enum_value_set(property: &Property) -> BTreeSet<&str> {
    property
        .allowable_values
        .iter()
        .map(|v| v.raw_value.as_str())
        .collect()
}

fn is_same_enum(a: &Property, b: &Property) -> bool {
    a.is_enum && b.is_enum && a.name == b.name && enum_value_set(a) == enum_value_set(b)
}

/// Drop child enum properties that repeat one of the parent's inline enums.
/// Subclasses already see the parent's enum, and redeclaring it breaks the
/// generated inline enum classes.
fn remove_inherited_enums(model: &mut ModelDefinition, parent: &ModelDefinition) {
    let parent_enums: Vec<&Property> = parent.properties.iter().filter(|p| p.is_enum).collect();
    if parent_enums.is_empty() {
        return;
    }

    let before = model.properties.len();
    model
        .properties
        .retain(|child| !parent_enums.iter().any(|p| is_same_enum(p, child)));

    if model.properties.len() != before {
        debug!(
            model = %model.name,
            removed = before - model.properties.len(),
            "Removed enums duplicated from parent."
        );
        mark_sequence(&mut model.properties);
    }
}

fn apply_discriminator_default(model: &mut ModelDefinition, parent: &ModelDefinition) {
    let Some(discriminator) = parent.discriminator.as_deref() else {
        return;
    };
    let literal = format!("\"{}\"", model.name);

    for property in model
        .properties
        .iter_mut()
        .chain(model.read_write_properties.iter_mut())
    {
        let matches = property.name == discriminator || property.base_name == discriminator;
        if matches && property.default_value.is_none() {
            property.default_value = Some(literal.clone());
        }
    }
}

fn project_parent_vars(model: &mut ModelDefinition, parent: &ModelDefinition) {
    let declared: HashSet<&str> = model.properties.iter().map(|p| p.name.as_str()).collect();

    let mut parent_vars = Vec::new();
    for property in &parent.properties {
        if declared.contains(property.name.as_str()) {
            continue;
        }
        info!(
            model = %model.name,
            property = %property.name,
            "Adding parent variable."
        );
        let mut inherited = property.clone();
        inherited.is_inherited = true;
        parent_vars.push(inherited);
    }

    mark_sequence(&mut parent_vars);
    model.parent_properties = parent_vars;
}

/// Collapse upstream duplicates in a read/write property list.
///
/// Scans from the end down to the midpoint only, dropping an item when the same
/// property occurs at a lower index. This compensates for the duplication
/// pattern of the upstream merge and is not a general uniqueness guarantee:
/// duplicate pairs that both sit in the first half are left alone.
///
/// Returns the number of items removed.
pub fn collapse_duplicates(properties: &mut Vec<Property>) -> usize {
    if properties.len() < 2 {
        return 0;
    }

    let last = properties.len() - 1;
    let mut removed = 0;
    for i in (last / 2 + 1..=last).rev() {
        let earlier = properties[..i]
            .iter()
            .any(|p| p.is_same_property(&properties[i]));
        if earlier {
            properties.remove(i);
            removed += 1;
        }
    }

    if removed > 0 {
        mark_sequence(properties);
    }
    removed
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn registry(models: Vec<ModelDefinition>) -> ModelRegistry {
        models.into_iter().map(|m| (m.name.clone(), m)).collect()
    }

    fn names(props: &[Property]) -> Vec<&str> {
        props.iter().map(|p| p.name.as_str()).collect()
    }

    fn animal() -> ModelDefinition {
        ModelDefinition::new(
            "Animal",
            vec![
                Property::new("type", "string"),
                Property::new("name", "string"),
                Property::enumeration("status", &["alive", "dead"]),
            ],
        )
        .with_discriminator("type")
    }

    #[test]
    fn test_no_parent_is_unchanged() {
        let model = ModelDefinition::new("Solo", vec![Property::new("a", "string")]);
        let out = reconcile(model.clone(), &ModelRegistry::new());
        assert_eq!(out, model);
    }

    #[test]
    fn test_missing_parent_is_unchanged() {
        let model =
            ModelDefinition::new("Orphan", vec![Property::new("a", "string")]).with_parent("Ghost");
        let out = reconcile(model.clone(), &registry(vec![animal()]));
        assert_eq!(out, model);
    }

    #[test]
    fn test_duplicate_enum_removed_from_child() {
        let dog = ModelDefinition::new(
            "Dog",
            vec![
                Property::new("type", "string"),
                Property::enumeration("status", &["dead", "alive"]),
                Property::new("bark", "bool"),
            ],
        )
        .with_parent("Animal");

        let out = reconcile(dog, &registry(vec![animal()]));
        assert_eq!(names(&out.properties), vec!["type", "bark"]);
        assert!(out.properties[0].has_more);
        assert!(!out.properties[1].has_more);
        assert!(!out.has_enums);
        // The dropped enum is now contributed by the parent.
        assert_eq!(names(&out.parent_properties), vec!["name", "status"]);
    }

    #[test]
    fn test_enum_with_different_values_is_kept() {
        let dog = ModelDefinition::new(
            "Dog",
            vec![Property::enumeration("status", &["alive", "dead", "zombie"])],
        )
        .with_parent("Animal");

        let out = reconcile(dog, &registry(vec![animal()]));
        assert_eq!(names(&out.properties), vec!["status"]);
        assert!(out.has_enums);
        assert!(!out.properties[0].has_more);
    }

    #[test]
    fn test_discriminator_default_uses_child_name() {
        let mut explicit = Property::new("type", "string");
        explicit.default_value = Some("\"Canine\"".to_string());

        let dog = ModelDefinition::new("Dog", vec![Property::new("type", "string")])
            .with_parent("Animal");
        let out = reconcile(dog, &registry(vec![animal()]));
        assert_eq!(out.properties[0].default_value.as_deref(), Some("\"Dog\""));
        assert_eq!(
            out.read_write_properties[0].default_value.as_deref(),
            Some("\"Dog\"")
        );

        let cat = ModelDefinition::new("Cat", vec![explicit]).with_parent("Animal");
        let out = reconcile(cat, &registry(vec![animal()]));
        assert_eq!(out.properties[0].default_value.as_deref(), Some("\"Canine\""));
    }

    #[test]
    fn test_discriminator_matches_wire_name_after_renaming() {
        let mut renamed = Property::new("type", "string");
        renamed.name = "Type".to_string();
        let dog = ModelDefinition::new("Dog", vec![renamed]).with_parent("Animal");

        let out = reconcile(dog, &registry(vec![animal()]));
        assert_eq!(out.properties[0].default_value.as_deref(), Some("\"Dog\""));
    }

    #[test]
    fn test_parent_vars_projection() {
        let dog = ModelDefinition::new(
            "Dog",
            vec![Property::new("name", "string"), Property::new("bark", "bool")],
        )
        .with_parent("Animal");

        let out = reconcile(dog, &registry(vec![animal()]));
        assert_eq!(names(&out.parent_properties), vec!["type", "status"]);
        assert!(out.parent_properties.iter().all(|p| p.is_inherited));
        let flags: Vec<_> = out.parent_properties.iter().map(|p| p.has_more).collect();
        assert_eq!(flags, vec![true, false]);
        // The child's own sequencing is untouched.
        assert!(out.properties.iter().all(|p| !p.is_inherited));
        assert!(out.properties[0].has_more);
        assert!(!out.properties[1].has_more);
    }

    #[test]
    fn test_reconcile_twice_is_stable() {
        let dog = ModelDefinition::new("Dog", vec![Property::new("bark", "bool")])
            .with_parent("Animal");
        let reg = registry(vec![animal()]);
        let once = reconcile(dog, &reg);
        let twice = reconcile(once.clone(), &reg);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_collapse_duplicate_in_second_half() {
        let a = Property::new("a", "string");
        let mut list = vec![
            a.clone(),
            Property::new("b", "string"),
            Property::new("c", "string"),
            Property::new("d", "string"),
            a,
        ];
        mark_sequence(&mut list);

        assert_eq!(collapse_duplicates(&mut list), 1);
        assert_eq!(names(&list), vec!["a", "b", "c", "d"]);
        assert!(!list[3].has_more);
    }

    #[test]
    fn test_collapse_leaves_first_half_pairs() {
        let a = Property::new("a", "string");
        let mut list = vec![
            a.clone(),
            a,
            Property::new("c", "string"),
            Property::new("d", "string"),
            Property::new("e", "string"),
        ];
        mark_sequence(&mut list);

        assert_eq!(collapse_duplicates(&mut list), 0);
        assert_eq!(names(&list), vec!["a", "a", "c", "d", "e"]);
    }

    #[test]
    fn test_collapse_full_duplicate_tail() {
        let props: Vec<_> = ["a", "b", "c"]
            .iter()
            .map(|n| Property::new(*n, "string"))
            .collect();
        let mut list: Vec<_> = props.iter().chain(props.iter()).cloned().collect();
        mark_sequence(&mut list);

        assert_eq!(collapse_duplicates(&mut list), 3);
        assert_eq!(names(&list), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_collapse_short_lists() {
        let mut empty = Vec::new();
        assert_eq!(collapse_duplicates(&mut empty), 0);
        let mut single = vec![Property::new("a", "string")];
        assert_eq!(collapse_duplicates(&mut single), 0);
        let mut pair = vec![Property::new("a", "string"), Property::new("a", "string")];
        assert_eq!(collapse_duplicates(&mut pair), 1);
    }

    #[test]
    fn test_ancestry_chain() {
        let reg = registry(vec![
            ModelDefinition::new("A", vec![]),
            ModelDefinition::new("B", vec![]).with_parent("A"),
            ModelDefinition::new("C", vec![]).with_parent("B"),
            ModelDefinition::new("D", vec![]).with_parent("Missing"),
        ]);
        assert_eq!(ancestry("C", &reg).unwrap(), vec!["B", "A"]);
        assert!(ancestry("A", &reg).unwrap().is_empty());
        assert!(ancestry("D", &reg).unwrap().is_empty());
    }

    #[test]
    fn test_ancestry_detects_cycles() {
        let reg = registry(vec![
            ModelDefinition::new("A", vec![]).with_parent("C"),
            ModelDefinition::new("B", vec![]).with_parent("A"),
            ModelDefinition::new("C", vec![]).with_parent("B"),
            ModelDefinition::new("Self", vec![]).with_parent("Self"),
        ]);
        let err = ancestry("A", &reg).unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::InheritanceCycle(ref chain) if chain == &["A", "C", "B", "A"]
        ));
        assert!(ancestry("Self", &reg).is_err());
    }
}
