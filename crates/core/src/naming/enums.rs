//! Enum member naming.
//!
//! Wire-level enum literals can be anything: empty strings, lone symbols,
//! signed decimals, URNs. Every one of them still needs a valid C# member name,
//! and numeric members must stay distinguishable from string ones.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use super::{NamingPolicy, convert, disambiguate};
use crate::model::EnumValue;

/// Whole-value symbol lookup for enum literals made only of punctuation.
pub static SYMBOL_NAMES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    [
        ("$", "Dollar"),
        ("^", "Caret"),
        ("|", "Pipe"),
        ("=", "Equal"),
        ("*", "Star"),
        ("-", "Minus"),
        ("&", "Ampersand"),
        ("%", "Percent"),
        ("#", "Hash"),
        ("@", "At"),
        ("!", "Exclamation"),
        ("+", "Plus"),
        (":", "Colon"),
        (">", "Greater_Than"),
        ("<", "Less_Than"),
        (".", "Period"),
        ("_", "Underscore"),
        ("?", "Question_Mark"),
        (",", "Comma"),
        ("'", "Quote"),
        ("\"", "Double_Quote"),
        ("/", "Slash"),
        ("\\", "Back_Slash"),
        ("(", "Left_Parenthesis"),
        (")", "Right_Parenthesis"),
        ("{", "Left_Curly_Bracket"),
        ("}", "Right_Curly_Bracket"),
        ("[", "Left_Square_Bracket"),
        ("]", "Right_Square_Bracket"),
        ("~", "Tilde"),
        ("`", "Backtick"),
        ("<=", "Less_Than_Or_Equal_To"),
        (">=", "Greater_Than_Or_Equal_To"),
        ("!=", "Not_Equal"),
    ]
    .into_iter()
    .collect()
});

/// Datatypes whose enum members are named `NUMBER_...`.
const NUMERIC_PREFIXES: [&str; 4] = ["int", "long", "double", "float"];

fn is_numeric_datatype(datatype: &str) -> bool {
    let datatype = datatype.to_ascii_lowercase();
    NUMERIC_PREFIXES.iter().any(|p| datatype.starts_with(p))
}

/// Produce a C# member name for one enum literal.
///
/// Rules, first match wins:
/// 1. `""` -> `Empty`
/// 2. a known symbol (`$`, `>=`, ...) -> its word in PascalCase
/// 3. numeric datatype -> `NUMBER_` + literal, with `-`, `+`, `.` spelled out
/// 4. otherwise PascalCase of the literal (underscores read as spaces), non-word
///    characters stripped, `_` prefixed when it starts with a digit
pub fn name_enum_member(value: &str, datatype: &str) -> String {
    if value.is_empty() {
        return "Empty".to_string();
    }

    if let Some(word) = SYMBOL_NAMES.get(value) {
        return convert(word, NamingPolicy::PascalCase);
    }

    if is_numeric_datatype(datatype) {
        return format!("NUMBER_{value}")
            .replace('-', "MINUS_")
            .replace('+', "PLUS_")
            .replace('.', "_DOT_");
    }

    let spaced = value.replace('_', " ");
    let name: String = convert(&spaced, NamingPolicy::PascalCase)
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();

    if name.is_empty() {
        "Value".to_string()
    } else if name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{name}")
    } else {
        name
    }
}

/// Name every member of one enum, keeping the names unique within it.
pub fn name_enum_values(values: &mut [EnumValue]) {
    let mut used = HashSet::new();
    for value in values.iter_mut() {
        let name = name_enum_member(&value.raw_value, value.datatype_hint.as_type_name());
        let unique = disambiguate(&name, |candidate| used.contains(candidate));
        used.insert(unique.clone());
        value.converted_name = unique;
    }
}
