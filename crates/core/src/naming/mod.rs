//! Identifier naming for the C# target.
//!
//! - [`NamingPolicy`]: the configured casing convention
//! - [`convert`]: pure casing conversion (idempotent for every policy)
//! - [`to_var_name`]: sanitize, convert and apply the reserved-word/leading-digit safety net
//! - [`NameTable`]: per-model uniqueness with deterministic numeric suffixes
//! - [`enums`]: enum member names

pub mod enums;

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::error::ConfigurationError;

/// C# reserved words that cannot be used as identifiers.
pub static CSHARP_RESERVED_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "abstract",
        "as",
        "base",
        "bool",
        "break",
        "byte",
        "case",
        "catch",
        "char",
        "checked",
        "class",
        "const",
        "continue",
        "decimal",
        "default",
        "delegate",
        "do",
        "double",
        "else",
        "enum",
        "event",
        "explicit",
        "extern",
        "false",
        "finally",
        "fixed",
        "float",
        "for",
        "foreach",
        "goto",
        "if",
        "implicit",
        "in",
        "int",
        "interface",
        "internal",
        "is",
        "lock",
        "long",
        "namespace",
        "new",
        "null",
        "object",
        "operator",
        "out",
        "override",
        "params",
        "private",
        "protected",
        "public",
        "readonly",
        "ref",
        "return",
        "sbyte",
        "sealed",
        "short",
        "sizeof",
        "stackalloc",
        "static",
        "string",
        "struct",
        "switch",
        "this",
        "throw",
        "true",
        "try",
        "typeof",
        "uint",
        "ulong",
        "unchecked",
        "unsafe",
        "ushort",
        "using",
        "virtual",
        "void",
        "volatile",
        "while",
    ]
    .into_iter()
    .collect()
});

/// Casing convention applied to property names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum NamingPolicy {
    /// Keep the (sanitized) wire name.
    Original,
    /// `petId`
    CamelCase,
    /// `PetId`
    #[default]
    PascalCase,
    /// `pet_id`
    SnakeCase,
}

impl NamingPolicy {
    /// Canonical configuration token.
    pub fn as_str(self) -> &'static str {
        match self {
            NamingPolicy::Original => "original",
            NamingPolicy::CamelCase => "camelCase",
            NamingPolicy::PascalCase => "PascalCase",
            NamingPolicy::SnakeCase => "snake_case",
        }
    }
}

impl FromStr for NamingPolicy {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "original" | "Original" => Ok(NamingPolicy::Original),
            "camelCase" | "CamelCase" => Ok(NamingPolicy::CamelCase),
            "PascalCase" => Ok(NamingPolicy::PascalCase),
            "snake_case" | "SnakeCase" => Ok(NamingPolicy::SnakeCase),
            other => Err(ConfigurationError::InvalidNamingPolicy(other.to_string())),
        }
    }
}

impl TryFrom<String> for NamingPolicy {
    type Error = ConfigurationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<NamingPolicy> for String {
    fn from(policy: NamingPolicy) -> Self {
        policy.as_str().to_string()
    }
}

impl fmt::Display for NamingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Split an identifier into words.
///
/// Boundaries are non-alphanumeric characters (including `_`), a lowercase
/// letter or digit followed by an uppercase letter, and the end of an acronym
/// (`HTTPServer` -> `HTTP`, `Server`).
pub fn tokenize(raw: &str) -> Vec<String> {
    let chars: Vec<char> = raw.chars().collect();
    let mut tokens = Vec::new();
    let mut current = String::new();

    for (i, &ch) in chars.iter().enumerate() {
        if !ch.is_alphanumeric() {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
            continue;
        }

        if ch.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_lower = chars.get(i + 1).is_some_and(|c| c.is_lowercase());
            if prev.is_lowercase() || prev.is_numeric() || (prev.is_uppercase() && next_lower) {
                tokens.push(std::mem::take(&mut current));
            }
        }

        current.push(ch);
    }

    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first
            .to_uppercase()
            .chain(chars)
            .filter(|c| c.is_alphanumeric())
            .collect(),
    }
}

/// Lowercase a token, dropping combining marks some mappings emit (`İ` -> `i\u{307}`).
fn lowercase(s: &str) -> String {
    s.to_lowercase().chars().filter(|c| c.is_alphanumeric()).collect()
}

/// Convert a raw identifier to the given casing policy.
pub fn convert(raw: &str, policy: NamingPolicy) -> String {
    match policy {
        NamingPolicy::Original => raw.to_string(),
        NamingPolicy::PascalCase => tokenize(raw)
            .iter()
            .map(String::as_str)
            .map(capitalize_first)
            .collect(),
        NamingPolicy::CamelCase => tokenize(raw)
            .iter()
            .enumerate()
            .map(|(i, t)| {
                if i == 0 {
                    lowercase(t)
                } else {
                    capitalize_first(t)
                }
            })
            .collect(),
        NamingPolicy::SnakeCase => tokenize(raw)
            .iter()
            .map(String::as_str)
            .map(lowercase)
            .collect::<Vec<_>>()
            .join("_"),
    }
}

/// Replace every character that cannot appear in an identifier with `_`.
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// Whether a name must be escaped before use as a C# identifier.
pub fn needs_escape(name: &str) -> bool {
    CSHARP_RESERVED_WORDS.contains(name) || name.chars().next().is_some_and(|c| c.is_ascii_digit())
}

/// Turn a wire-level property name into a C# member name.
///
/// Names made only of `A-Z` and `_` are constants and kept as they are.
pub fn to_var_name(raw: &str, policy: NamingPolicy) -> String {
    let name = sanitize_name(raw);

    if name.chars().all(|c| c.is_ascii_uppercase() || c == '_') {
        return name;
    }

    let name = convert(&name, policy);
    if needs_escape(&name) {
        format!("_{name}")
    } else {
        name
    }
}

/// Append the smallest numeric suffix (starting at 2) that makes `ident` free.
pub fn disambiguate(ident: &str, mut taken: impl FnMut(&str) -> bool) -> String {
    if !taken(ident) {
        return ident.to_string();
    }

    let mut suffix = 2usize;
    loop {
        let candidate = format!("{ident}{suffix}");
        if !taken(&candidate) {
            return candidate;
        }
        suffix += 1;
    }
}

/// Converted names for one model, keyed by wire-level name.
///
/// The first wire name to claim a converted name keeps it; later, different
/// wire names colliding with it get a numeric suffix. Asking again for a wire
/// name already in the table returns the same answer.
#[derive(Debug, Clone)]
pub struct NameTable {
    policy: NamingPolicy,
    by_base_name: HashMap<String, String>,
    used: HashSet<String>,
}

impl NameTable {
    /// Create an empty table for a policy.
    pub fn new(policy: NamingPolicy) -> Self {
        Self {
            policy,
            by_base_name: HashMap::new(),
            used: HashSet::new(),
        }
    }

    /// The unique converted name for a wire-level name.
    pub fn name_for(&mut self, base_name: &str) -> String {
        if let Some(existing) = self.by_base_name.get(base_name) {
            return existing.clone();
        }

        let converted = to_var_name(base_name, self.policy);
        let unique = disambiguate(&converted, |candidate| self.used.contains(candidate));
        self.used.insert(unique.clone());
        self.by_base_name
            .insert(base_name.to_string(), unique.clone());
        unique
    }
}
