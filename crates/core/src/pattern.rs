//! Perl-style `/pattern/modifiers` to .NET regex translation.
//!
//! OpenAPI validation patterns follow the Perl delimiter-and-modifier
//! convention, which .NET does not understand. The body is extracted and the
//! modifiers are mapped onto `RegexOptions` names for the renderer to emit.
//! Perl matching is culture-invariant unless `l` is given; .NET is the reverse,
//! so `CultureInvariant` is on by default.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::InvalidPatternError;
use crate::model::{VendorExtension, VendorExtensions};

/// Extension key holding the translated regex body.
pub const REGEX_EXTENSION: &str = "x-regex";
/// Extension key holding the ordered option names.
pub const MODIFIERS_EXTENSION: &str = "x-modifiers";

/// A .NET `RegexOptions` member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegexOption {
    /// Default; removed by the `l` modifier.
    CultureInvariant,
    /// `i`
    IgnoreCase,
    /// `m`
    Multiline,
    /// `s`
    Singleline,
    /// `x`
    IgnorePatternWhitespace,
}

impl RegexOption {
    /// Map a Perl modifier character. `l` and unknown characters map to nothing.
    pub fn from_modifier(c: char) -> Option<Self> {
        match c {
            'i' => Some(RegexOption::IgnoreCase),
            'm' => Some(RegexOption::Multiline),
            's' => Some(RegexOption::Singleline),
            'x' => Some(RegexOption::IgnorePatternWhitespace),
            _ => None,
        }
    }

    /// The `RegexOptions` member name.
    pub fn as_str(self) -> &'static str {
        match self {
            RegexOption::CultureInvariant => "CultureInvariant",
            RegexOption::IgnoreCase => "IgnoreCase",
            RegexOption::Multiline => "Multiline",
            RegexOption::Singleline => "Singleline",
            RegexOption::IgnorePatternWhitespace => "IgnorePatternWhitespace",
        }
    }
}

impl fmt::Display for RegexOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A translated pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternTranslation {
    /// Regex body with single quotes escaped.
    pub regex: String,
    /// Options in order: the default first, then modifiers in input order, no repeats.
    pub options: Vec<RegexOption>,
}

impl PatternTranslation {
    /// Write `x-regex` and `x-modifiers` into a property's extensions.
    pub fn attach(&self, extensions: &mut VendorExtensions) {
        extensions.insert(
            REGEX_EXTENSION.to_string(),
            VendorExtension::Text(self.regex.clone()),
        );
        extensions.insert(
            MODIFIERS_EXTENSION.to_string(),
            VendorExtension::List(self.options.iter().map(|o| o.as_str().to_string()).collect()),
        );
    }
}

/// Translate a `/body/modifiers` pattern.
///
/// Fails unless the pattern starts with `/` and its last `/` sits at index 2 or
/// later. Modifiers other than `i`, `m`, `s`, `x` and `l` are ignored.
pub fn translate(pattern: &str) -> Result<PatternTranslation, InvalidPatternError> {
    let invalid = || InvalidPatternError {
        pattern: pattern.to_string(),
    };

    if !pattern.starts_with('/') {
        return Err(invalid());
    }
    let last = pattern.rfind('/').ok_or_else(invalid)?;
    if last < 2 {
        return Err(invalid());
    }

    let regex = pattern[1..last].replace('\'', "\\'");

    let mut options = vec![RegexOption::CultureInvariant];
    for c in pattern[last + 1..].chars() {
        if let Some(option) = RegexOption::from_modifier(c) {
            if !options.contains(&option) {
                options.push(option);
            }
        } else if c == 'l' {
            options.retain(|o| *o != RegexOption::CultureInvariant);
        }
    }

    Ok(PatternTranslation { regex, options })
}
