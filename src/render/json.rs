//! JSON rendering for table collections.

use crate::error::{Error, Result};
use crate::model::TableCollection;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert a collection to a JSON object keyed by table identifier.
pub fn to_json(collection: &TableCollection, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(collection),
        JsonFormat::Compact => serde_json::to_string(collection),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TabularData;

    fn sample() -> TableCollection {
        let mut collection = TableCollection::new();
        collection
            .insert(
                "tbl:sets".to_string(),
                TabularData::new(
                    vec!["Name".into(), "Description".into()],
                    vec![vec!["\\(I\\)".into(), "facilities".into()]],
                ),
            )
            .unwrap();
        collection
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&sample(), JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"tbl:sets\""));
        assert!(json.contains("\"columns\""));
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&sample(), JsonFormat::Compact).unwrap();
        assert_eq!(
            json,
            r#"{"tbl:sets":{"columns":["Name","Description"],"rows":[["\\(I\\)","facilities"]]}}"#
        );
    }
}
