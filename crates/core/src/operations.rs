//! Operation return-type post-processing.

use crate::config::GeneratorConfig;
use crate::model::Operation;

/// Generic return types treated as list/collection returns.
const COLLECTION_PREFIXES: [&str; 2] = ["List<", "Collection<"];

/// Record the declared return type and, when configured, project list and
/// collection returns onto the collection-view type (`List<Pet>` ->
/// `ICollection<Pet>`). The generic argument is preserved as written.
///
/// Returns whether the return type was rewritten.
pub fn post_process_return(operation: &mut Operation, config: &GeneratorConfig) -> bool {
    let Some(return_type) = operation.return_type.as_deref() else {
        return false;
    };

    operation.return_container = Some(return_type.to_string());
    let generic_start = COLLECTION_PREFIXES
        .iter()
        .find(|prefix| return_type.starts_with(*prefix))
        .map(|prefix| prefix.len() - 1);
    operation.return_is_collection = generic_start.is_some();

    match generic_start {
        Some(start) if config.collapse_return_to_collection_view => {
            let rewritten = format!("{}{}", config.collection_view_type, &return_type[start..]);
            operation.return_type = Some(rewritten);
            true
        }
        _ => false,
    }
}
