//! Stable table identifiers.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::model::{fallback_identifier, TableIdentifier};

/// Resolve one identifier per table, in discovery order.
///
/// A label is used verbatim; an unlabeled table at position `i` (counted
/// among all tables) becomes `Table{i}`. Any repeated identifier is an error,
/// including a label that collides with a synthesized one.
///
/// # Example
/// ```
/// use tex2model::parser::resolve_identifiers;
///
/// let ids = resolve_identifiers([Some("tbl:costs".to_string()), None]).unwrap();
/// assert_eq!(ids, vec!["tbl:costs", "Table1"]);
/// ```
pub fn resolve_identifiers<I>(labels: I) -> Result<Vec<TableIdentifier>>
where
    I: IntoIterator<Item = Option<String>>,
{
    let mut seen: HashMap<TableIdentifier, usize> = HashMap::new();
    let mut identifiers = Vec::new();

    for (index, label) in labels.into_iter().enumerate() {
        let identifier = label.unwrap_or_else(|| fallback_identifier(index));
        if let Some(&first) = seen.get(&identifier) {
            return Err(Error::DuplicateIdentifier {
                identifier,
                first,
                second: index,
            });
        }
        seen.insert(identifier.clone(), index);
        identifiers.push(identifier);
    }

    Ok(identifiers)
}
