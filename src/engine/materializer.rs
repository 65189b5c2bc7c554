//! Row materialization
//!
//! Applies the compiled bindings and the parser registry to one row of
//! text cells, producing either a record or a row-level abort. The
//! function is pure with respect to the run: it reads only shared
//! immutable state and reports everything through its return value, so
//! workers can call it without synchronization.

use tracing::debug;

use super::binding::{BindingSet, FieldBinding};
use super::registry::ParserRegistry;
use super::title::TitleMap;
use crate::error::{ErrorCode, RowError};
use crate::schema::Record;
use crate::{Error, Result};

/// Outcome of materializing one row
///
/// `record` is `None` only when the row aborted under strict policy.
/// Under skip policy a required-field failure truncates processing of the
/// remaining bindings but the partially filled record is still returned,
/// and callers emit it alongside the recorded diagnostics. Regression
/// tests pin this truncation behavior; keep them passing.
#[derive(Debug)]
pub(crate) struct RowOutput<T> {
    pub record: Option<T>,
    pub errors: Vec<RowError>,
}

/// Materialize one row into a record
///
/// `row_number` is the 0-based index of the row within the input matrix
/// (header included), used only for diagnostics. Fatal configuration
/// defects (unregistered parser key, impossible assignment) surface as
/// `Err` and abort the whole run regardless of policy.
pub(crate) fn materialize_row<T: Record>(
    row_number: usize,
    row: &[String],
    bindings: &BindingSet,
    titles: &TitleMap,
    registry: &ParserRegistry,
    skip: bool,
) -> Result<RowOutput<T>> {
    let mut record = T::default();
    let mut errors = Vec::new();

    for binding in bindings.iter() {
        let raw = resolve_cell(row, binding, titles);

        let value = if raw.is_empty() {
            binding.default.unwrap_or("")
        } else {
            raw
        };

        if value.is_empty() {
            if binding.required {
                let error = RowError::new(
                    row_number,
                    &binding.column_name,
                    ErrorCode::Required,
                    format!("column '{}' is required but blank", binding.column_name),
                );
                debug!("Row {}: {}", row_number, error);
                errors.push(error);
                // Skip policy stops the remaining bindings for this row but
                // keeps the partial record; strict policy aborts the row.
                let record = skip.then_some(record);
                return Ok(RowOutput { record, errors });
            }
            continue;
        }

        let parser = registry
            .get(&binding.parser_key)
            .ok_or_else(|| Error::ParserNotRegistered {
                key: binding.parser_key.clone(),
            })?;

        match parser(value) {
            Ok(cell) => {
                record
                    .assign(binding.field_index, cell)
                    .map_err(|e| Error::binding(format!("field '{}': {e}", binding.field_name)))?;
            }
            Err(e) => {
                let error = RowError::new(
                    row_number,
                    &binding.column_name,
                    ErrorCode::Parse,
                    format!(
                        "unable to parse column '{}' (required: {}): {e}",
                        binding.column_name, binding.required
                    ),
                );
                debug!("Row {}: {}", row_number, error);
                errors.push(error);
                if binding.required {
                    let record = skip.then_some(record);
                    return Ok(RowOutput { record, errors });
                }
                // Non-required parse failures are recorded and the row
                // continues with the field left at its zero value.
            }
        }
    }

    Ok(RowOutput {
        record: Some(record),
        errors,
    })
}

/// Locate the raw cell for a binding, trimmed
///
/// The explicit 1-based index overrides the title-resolved index when it
/// differs. Indices past the end of the row read as blank: rows are
/// allowed to be shorter than the header.
fn resolve_cell<'a>(row: &'a [String], binding: &FieldBinding, titles: &TitleMap) -> &'a str {
    let resolved = titles.index_of(&binding.column_name);
    let index = match (binding.explicit_index, resolved) {
        (Some(explicit), Some(title)) if explicit - 1 != title => Some(explicit - 1),
        (Some(explicit), None) => Some(explicit - 1),
        (_, title) => title,
    };
    index
        .and_then(|i| row.get(i))
        .map(|cell| cell.trim())
        .unwrap_or("")
}
