//! Record-to-row composition (write path)
//!
//! The reverse direction of the engine: turn a slice of records back into
//! a header row plus one text row per record, in field order. Single-pass,
//! no concurrency, no error recovery — any converter failure aborts the
//! composition.

use std::collections::HashMap;
use std::sync::Arc;

use crate::engine::binding::BindingSet;
use crate::engine::registry::ParseCellError;
use crate::schema::{CellValue, Record};
use crate::{Error, Result};

/// Conversion applied to a field value on its way out
pub type ConverterFn = dyn Fn(CellValue) -> std::result::Result<CellValue, ParseCellError> + Send + Sync;

/// Composes tabular text rows from typed records
///
/// Fields whose annotation declares a converter key have the registered
/// converter applied before formatting; a declared key with no
/// registration is fatal.
pub struct RowComposer {
    converters: HashMap<String, Arc<ConverterFn>>,
}

impl RowComposer {
    pub fn new() -> Self {
        Self {
            converters: HashMap::new(),
        }
    }

    /// Register a converter under `key`, replacing any existing entry
    pub fn register_converter<F>(&mut self, key: impl Into<String>, converter: F)
    where
        F: Fn(CellValue) -> std::result::Result<CellValue, ParseCellError> + Send + Sync + 'static,
    {
        self.converters.insert(key.into(), Arc::new(converter));
    }

    /// Compose the header row and one row per record
    pub fn compose<T: Record>(&self, records: &[T]) -> Result<Vec<Vec<String>>> {
        let bindings = BindingSet::extract::<T>()?;

        let mut rows = Vec::with_capacity(records.len() + 1);
        rows.push(
            bindings
                .iter()
                .map(|b| b.column_name.clone())
                .collect::<Vec<String>>(),
        );

        for (offset, record) in records.iter().enumerate() {
            let mut row = Vec::with_capacity(bindings.len());
            for binding in bindings.iter() {
                let cell = match record.get(binding.field_index) {
                    Some(value) => {
                        let value = match binding.converter_key {
                            Some(key) => {
                                let converter = self.converters.get(key).ok_or_else(|| {
                                    Error::ConverterNotRegistered {
                                        key: key.to_string(),
                                    }
                                })?;
                                converter(value).map_err(|e| Error::Parse {
                                    column: binding.column_name.clone(),
                                    row: offset + 1,
                                    message: e.to_string(),
                                })?
                            }
                            None => value,
                        };
                        value.to_string()
                    }
                    None => String::new(),
                };
                row.push(cell);
            }
            rows.push(row);
        }

        Ok(rows)
    }
}

impl Default for RowComposer {
    fn default() -> Self {
        Self::new()
    }
}
