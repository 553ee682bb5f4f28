//! Language-neutral model structs exchanged with the parser and the renderer.
//!
//! The parser hands over a registry of [`ModelDefinition`]s plus the API's
//! [`Operation`]s. The transformation pass mutates them in place and the
//! renderer consumes the same shapes, so everything here is plain serde data
//! with camelCase keys.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Model name -> definition, as produced by the parser.
pub type ModelRegistry = HashMap<String, ModelDefinition>;

/// Extension metadata attached to properties for the renderer.
pub type VendorExtensions = BTreeMap<String, VendorExtension>;

/// Value shapes allowed in [`VendorExtensions`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VendorExtension {
    /// A single string, e.g. the translated regex body.
    Text(String),
    /// An ordered list of strings, e.g. regex option names.
    List(Vec<String>),
}

impl VendorExtension {
    /// The string payload, if this is a `Text` extension.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            VendorExtension::Text(s) => Some(s),
            VendorExtension::List(_) => None,
        }
    }

    /// The list payload, if this is a `List` extension.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            VendorExtension::Text(_) => None,
            VendorExtension::List(items) => Some(items),
        }
    }
}

/// Datatype hint of an enum member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EnumDatatype {
    /// int / long
    Integer,
    /// float / double
    Floating,
    /// Anything else.
    #[default]
    String,
}

impl EnumDatatype {
    /// Target type name handed to the enum member namer.
    pub fn as_type_name(self) -> &'static str {
        match self {
            EnumDatatype::Integer => "int",
            EnumDatatype::Floating => "double",
            EnumDatatype::String => "string",
        }
    }
}

/// One member of an enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EnumValue {
    /// Wire-level literal.
    pub raw_value: String,
    /// Target-language member name, filled in by the naming pass.
    pub converted_name: String,
    /// How the literal should be interpreted.
    pub datatype_hint: EnumDatatype,
}

impl EnumValue {
    /// Create an unnamed enum member.
    pub fn new(raw_value: impl Into<String>, datatype_hint: EnumDatatype) -> Self {
        Self {
            raw_value: raw_value.into(),
            converted_name: String::new(),
            datatype_hint,
        }
    }
}

/// A field of a model or a parameter of an operation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Property {
    /// Wire-level name; never changed so serialization stays correct.
    pub base_name: String,
    /// Target-language name.
    pub name: String,
    /// Target-language type, e.g. `string`, `int?`, `List<Pet>`.
    pub type_name: String,
    /// Whether the property is an inline enum.
    pub is_enum: bool,
    /// Members of the inline enum, if any.
    pub allowable_values: Vec<EnumValue>,
    /// Default value as a target-language literal.
    pub default_value: Option<String>,
    /// Sourced from an ancestor rather than declared directly.
    pub is_inherited: bool,
    /// Another item follows this one in its list.
    pub has_more: bool,
    /// Raw validation pattern in `/body/flags` form.
    #[serde(rename = "validationPattern")]
    pub pattern: Option<String>,
    /// Derived metadata for the renderer.
    pub vendor_extensions: VendorExtensions,
}

impl Property {
    /// Create a plain property whose target name starts out as the wire name.
    pub fn new(base_name: impl Into<String>, type_name: impl Into<String>) -> Self {
        let base_name = base_name.into();
        Self {
            name: base_name.clone(),
            base_name,
            type_name: type_name.into(),
            ..Self::default()
        }
    }

    /// Create an inline string enum property.
    pub fn enumeration(base_name: impl Into<String>, values: &[&str]) -> Self {
        Self {
            is_enum: true,
            allowable_values: values
                .iter()
                .map(|v| EnumValue::new(*v, EnumDatatype::String))
                .collect(),
            ..Self::new(base_name, "string")
        }
    }

    /// Attach a raw validation pattern.
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Structural equality ignoring `has_more`, which only reflects list position.
    pub fn is_same_property(&self, other: &Self) -> bool {
        self.base_name == other.base_name
            && self.name == other.name
            && self.type_name == other.type_name
            && self.is_enum == other.is_enum
            && self.allowable_values == other.allowable_values
            && self.default_value == other.default_value
            && self.is_inherited == other.is_inherited
            && self.pattern == other.pattern
            && self.vendor_extensions == other.vendor_extensions
    }
}

/// Recompute `has_more` over a list: every item but the last gets `true`.
pub fn mark_sequence(properties: &mut [Property]) {
    let len = properties.len();
    for (i, property) in properties.iter_mut().enumerate() {
        property.has_more = i + 1 < len;
    }
}

/// One named data schema.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModelDefinition {
    /// Schema name.
    pub name: String,
    /// Single parent, if the schema extends another one.
    #[serde(rename = "parentName")]
    pub parent: Option<String>,
    /// Properties declared directly on this model.
    pub properties: Vec<Property>,
    /// Externally visible read/write properties. May contain upstream duplicates.
    pub read_write_properties: Vec<Property>,
    /// Properties contributed by the parent, filled in by reconciliation.
    #[serde(rename = "parentVars")]
    pub parent_properties: Vec<Property>,
    /// Members, if the model itself is an enum.
    pub enum_values: Vec<EnumValue>,
    /// Field used for polymorphic dispatch.
    #[serde(rename = "discriminatorField")]
    pub discriminator: Option<String>,
    /// Any declared property is enum-typed.
    pub has_enums: bool,
}

impl ModelDefinition {
    /// Create a model from its declared properties.
    ///
    /// The read/write list starts as a copy of the declared list and
    /// `has_more`/`has_enums` are derived.
    pub fn new(name: impl Into<String>, mut properties: Vec<Property>) -> Self {
        mark_sequence(&mut properties);
        let mut model = Self {
            name: name.into(),
            read_write_properties: properties.clone(),
            properties,
            ..Self::default()
        };
        model.refresh_has_enums();
        model
    }

    /// Set the parent model name.
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Set the discriminator field.
    pub fn with_discriminator(mut self, field: impl Into<String>) -> Self {
        self.discriminator = Some(field.into());
        self
    }

    /// Bring a parser-supplied model into the shape [`ModelDefinition::new`] builds.
    ///
    /// An empty read/write list is filled from the declared properties, and
    /// `has_more`/`has_enums` are re-derived since the parser does not send them.
    pub fn normalize_lists(&mut self) {
        if self.read_write_properties.is_empty() {
            self.read_write_properties.clone_from(&self.properties);
        }
        mark_sequence(&mut self.properties);
        mark_sequence(&mut self.read_write_properties);
        self.refresh_has_enums();
    }

    /// Re-derive `has_enums` from the declared properties.
    pub fn refresh_has_enums(&mut self) {
        self.has_enums = self.properties.iter().any(|p| p.is_enum);
    }

    /// Every property list of the model, mutably.
    pub fn all_properties_mut(&mut self) -> impl Iterator<Item = &mut Property> {
        self.properties
            .iter_mut()
            .chain(self.read_write_properties.iter_mut())
            .chain(self.parent_properties.iter_mut())
    }
}

/// One API action.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Operation {
    /// Operation identifier.
    pub operation_id: String,
    /// Ordered parameters.
    pub parameters: Vec<Property>,
    /// Target-language return type.
    #[serde(rename = "returnTypeName")]
    pub return_type: Option<String>,
    /// The return type exactly as declared, before any collection-view rewrite.
    pub return_container: Option<String>,
    /// The declared return type is a list or collection.
    pub return_is_collection: bool,
}

/// Everything the parser hands over for one generation run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiDescription {
    /// The model registry.
    pub models: ModelRegistry,
    /// The API's operations.
    pub operations: Vec<Operation>,
}
