//! Title resolution
//!
//! Builds the column-name→index map from the header row, once per run.
//! Validation here is fail-fast for the whole batch: the header row is
//! common to every data row, so a missing required column or an explicit
//! index past the header width can never succeed later.

use std::collections::HashMap;

use super::binding::BindingSet;
use crate::{Error, Result};

/// Column-name→index lookup derived from the header row
///
/// Immutable after construction and shared read-only across workers.
#[derive(Debug, Clone)]
pub struct TitleMap {
    indices: HashMap<String, usize>,
    width: usize,
}

impl TitleMap {
    /// Build the map from the header row and validate it against the bindings
    ///
    /// Labels are trimmed; the first occurrence of a repeated label wins.
    /// Fails with [`Error::FieldMatch`] when a required binding's column is
    /// absent, and with [`Error::IndexExceeded`] when an explicit column
    /// index points past the header width.
    pub fn resolve(header: &[String], bindings: &BindingSet) -> Result<Self> {
        let mut indices = HashMap::new();
        for (index, label) in header.iter().enumerate() {
            indices.entry(label.trim().to_string()).or_insert(index);
        }
        let width = header.len();

        for binding in bindings.iter() {
            if binding.required && !indices.contains_key(&binding.column_name) {
                return Err(Error::FieldMatch {
                    column: binding.column_name.clone(),
                });
            }
            if let Some(explicit) = binding.explicit_index {
                if explicit > width {
                    return Err(Error::IndexExceeded {
                        column: binding.column_name.clone(),
                        index: explicit,
                        width,
                    });
                }
            }
        }

        Ok(Self { indices, width })
    }

    /// 0-based column index for a label, if the header contains it
    pub fn index_of(&self, column: &str) -> Option<usize> {
        self.indices.get(column).copied()
    }

    /// Header row width the map was built from
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of distinct labels
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}
