//! Identifier-keyed table collections.

use super::TabularData;
use crate::error::{Error, Result};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::HashMap;

/// Stable identifier of a table within one document.
pub type TableIdentifier = String;

/// Ordered mapping from table identifier to tabular data.
///
/// Keys are unique; iteration order is insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableCollection {
    entries: Vec<(TableIdentifier, TabularData)>,
    positions: HashMap<TableIdentifier, usize>,
}

impl TableCollection {
    /// Create a new empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection by pairing identifiers and data positionally.
    ///
    /// Both sequences must have the same length.
    pub fn from_pairs(
        identifiers: Vec<TableIdentifier>,
        data: Vec<TabularData>,
    ) -> Result<Self> {
        if identifiers.len() != data.len() {
            return Err(Error::TableCountMismatch {
                native: identifiers.len(),
                converted: data.len(),
            });
        }

        let mut collection = Self::new();
        for (identifier, table) in identifiers.into_iter().zip(data) {
            collection.insert(identifier, table)?;
        }
        Ok(collection)
    }

    /// Build a collection with synthesized `TableN` identifiers.
    pub fn positional(data: Vec<TabularData>) -> Self {
        let entries: Vec<_> = data
            .into_iter()
            .enumerate()
            .map(|(i, table)| (fallback_identifier(i), table))
            .collect();
        let positions = entries
            .iter()
            .enumerate()
            .map(|(i, (id, _))| (id.clone(), i))
            .collect();
        Self { entries, positions }
    }

    /// Append a table, failing if the identifier is already present.
    pub fn insert(&mut self, identifier: TableIdentifier, table: TabularData) -> Result<()> {
        let position = self.entries.len();
        if let Some(&first) = self.positions.get(&identifier) {
            return Err(Error::DuplicateIdentifier {
                identifier,
                first,
                second: position,
            });
        }
        self.positions.insert(identifier.clone(), position);
        self.entries.push((identifier, table));
        Ok(())
    }

    /// Get a table by identifier.
    pub fn get(&self, identifier: &str) -> Option<&TabularData> {
        self.positions
            .get(identifier)
            .map(|&i| &self.entries[i].1)
    }

    /// Check if an identifier is present.
    pub fn contains(&self, identifier: &str) -> bool {
        self.positions.contains_key(identifier)
    }

    /// Identifiers in insertion order.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(id, _)| id.as_str())
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TabularData)> {
        self.entries.iter().map(|(id, t)| (id.as_str(), t))
    }

    /// Get the number of tables.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keep only entries whose identifier satisfies `keep`, preserving order.
    pub fn retain<F: FnMut(&str) -> bool>(&mut self, mut keep: F) {
        self.entries.retain(|(id, _)| keep(id));
        self.positions = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, (id, _))| (id.clone(), i))
            .collect();
    }
}

impl IntoIterator for TableCollection {
    type Item = (TableIdentifier, TabularData);
    type IntoIter = std::vec::IntoIter<(TableIdentifier, TabularData)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for TableCollection {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, table) in &self.entries {
            map.serialize_entry(id, table)?;
        }
        map.end()
    }
}

/// Identifier given to an unlabeled table at `index`.
pub fn fallback_identifier(index: usize) -> TableIdentifier {
    format!("Table{}", index)
}
