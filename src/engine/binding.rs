//! Column binding extraction
//!
//! Compiles a record type's static annotation table into an immutable
//! [`BindingSet`]: the per-field association between struct field, source
//! column, parser key, and policy flags. Extraction runs once per mapping
//! run; everything downstream reads the set without synchronization.

use std::collections::HashMap;

use crate::schema::Record;
use crate::{Error, Result};

/// Compiled association between one record field and its source column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldBinding {
    /// Position of the field within the record type
    pub field_index: usize,

    /// Struct field name, for diagnostics
    pub field_name: &'static str,

    /// Trimmed external column label; unique key into the title map
    pub column_name: String,

    /// Explicit 1-based column override; takes precedence over the
    /// title-resolved index when it differs
    pub explicit_index: Option<usize>,

    /// Registry key of the conversion function to invoke
    pub parser_key: String,

    /// Write-path converter key, when declared
    pub converter_key: Option<&'static str>,

    /// Whether a blank value (after default substitution) is an error
    pub required: bool,

    /// Literal substituted when the raw cell is blank
    pub default: Option<&'static str>,
}

/// Immutable set of field bindings for one record type
///
/// Keyed both by column name (row materialization) and by field index
/// (write path). Iteration yields bindings in field order.
#[derive(Debug, Clone)]
pub struct BindingSet {
    bindings: Vec<FieldBinding>,
    by_column: HashMap<String, usize>,
}

impl BindingSet {
    /// Derive the binding set from a record type's annotation table
    ///
    /// Fields whose column label is blank or `"-"` are excluded. An
    /// undeclared parser key falls back to the field's primitive type
    /// name; resolution against the registry happens later, at parse
    /// time. Duplicate column labels within one table are a configuration
    /// defect and fail extraction.
    pub fn extract<T: Record>() -> Result<Self> {
        let mut bindings: Vec<FieldBinding> = Vec::new();
        let mut by_column = HashMap::new();

        for (field_index, spec) in T::fields().iter().enumerate() {
            let column = spec.column.trim();
            if column.is_empty() || column == "-" {
                continue;
            }

            let parser = spec.parser.trim();
            let parser_key = if parser.is_empty() || parser == "-" {
                spec.type_name
            } else {
                parser
            };
            if parser_key.is_empty() {
                return Err(Error::binding(format!(
                    "field '{}' maps column '{}' but declares neither a parser key nor a type name",
                    spec.name, column
                )));
            }

            let binding = FieldBinding {
                field_index,
                field_name: spec.name,
                column_name: column.to_string(),
                explicit_index: (spec.column_index > 0).then_some(spec.column_index as usize),
                parser_key: parser_key.to_string(),
                converter_key: (!spec.converter.is_empty()).then_some(spec.converter),
                required: spec.required,
                default: (!spec.default.is_empty()).then_some(spec.default),
            };

            if by_column
                .insert(binding.column_name.clone(), bindings.len())
                .is_some()
            {
                return Err(Error::binding(format!(
                    "duplicate column label '{}' in annotation table (field '{}')",
                    binding.column_name, binding.field_name
                )));
            }
            bindings.push(binding);
        }

        if bindings.is_empty() {
            return Err(Error::binding(
                "record type declares no mappable fields".to_string(),
            ));
        }

        Ok(Self {
            bindings,
            by_column,
        })
    }

    /// Iterate bindings in field order
    pub fn iter(&self) -> impl Iterator<Item = &FieldBinding> {
        self.bindings.iter()
    }

    /// Look up a binding by its column label
    pub fn by_column(&self, column: &str) -> Option<&FieldBinding> {
        self.by_column.get(column).map(|&i| &self.bindings[i])
    }

    /// Look up a binding by its record field index
    pub fn by_field(&self, field_index: usize) -> Option<&FieldBinding> {
        self.bindings.iter().find(|b| b.field_index == field_index)
    }

    /// Number of mapped fields
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
