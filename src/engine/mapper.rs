//! Core mapping orchestration
//!
//! [`RowMapper`] owns the configuration and the parser registry, compiles
//! the binding set and title map once per run, and executes the row
//! mapping either sequentially or across the worker pipeline.
//!
//! The two control paths carry different failure semantics on purpose:
//! the sequential strict path aborts the whole batch on the first
//! unrecoverable row, while the worker path drops aborted rows and keeps
//! the batch going.

use std::path::Path;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::binding::BindingSet;
use super::materializer::materialize_row;
use super::registry::{ParseCellError, ParserRegistry};
use super::report::MapReport;
use super::title::TitleMap;
use super::workers::map_with_workers;
use crate::config::MapperConfig;
use crate::error::{ErrorCode, RowError};
use crate::schema::{CellValue, Record};
use crate::{Error, Result};

/// Tag-driven mapper from rows of text cells to typed records
///
/// # Example
///
/// ```rust,no_run
/// use rowbind::{MapperConfig, RowMapper};
/// use tokio_util::sync::CancellationToken;
///
/// # #[derive(Debug, Default)] struct Person;
/// # impl rowbind::Record for Person {
/// #     fn fields() -> &'static [rowbind::FieldSpec] {
/// #         const F: &[rowbind::FieldSpec] = &[rowbind::FieldSpec::new("name", "name", "String")];
/// #         F
/// #     }
/// #     fn assign(&mut self, _: usize, _: rowbind::CellValue) -> Result<(), rowbind::AssignError> { Ok(()) }
/// #     fn get(&self, _: usize) -> Option<rowbind::CellValue> { None }
/// # }
/// # async fn example(rows: Vec<Vec<String>>) -> rowbind::Result<()> {
/// let mapper = RowMapper::new(MapperConfig::new().with_workers(4).with_skip(true));
/// let mut people: Vec<Person> = Vec::new();
/// let report = mapper
///     .map_rows(rows, &mut people, CancellationToken::new())
///     .await?;
/// println!("Mapped {} records, {} errors", people.len(), report.errors.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct RowMapper {
    config: MapperConfig,
    registry: ParserRegistry,
}

impl RowMapper {
    /// Create a mapper with the default parser registry
    pub fn new(config: MapperConfig) -> Self {
        Self {
            config,
            registry: ParserRegistry::with_defaults(),
        }
    }

    /// Register a custom field parser, shadowing any default entry
    ///
    /// Registration is a construction-time operation; the registry is
    /// immutable once a run starts.
    pub fn register_parser<F>(&mut self, key: impl Into<String>, parser: F)
    where
        F: Fn(&str) -> std::result::Result<CellValue, ParseCellError> + Send + Sync + 'static,
    {
        self.registry.register(key, parser);
    }

    /// The active configuration
    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    /// Read a row source from disk and map it in one step
    ///
    /// Dispatches on the file extension and hands the configured sheet
    /// selector to the row-source reader.
    pub async fn map_file<T: Record>(
        &self,
        path: &Path,
        destination: &mut Vec<T>,
        token: CancellationToken,
    ) -> Result<MapReport> {
        let rows = crate::io::read_rows_from_path(path, self.config.sheet.as_deref())?;
        self.map_rows(rows, destination, token).await
    }

    /// Map a row matrix into `destination`, appending one record per row
    ///
    /// `rows` is the full ordered matrix including the header row at the
    /// configured index. Rows before the header are ignored; rows after it
    /// are data. Recoverable diagnostics end up in the returned
    /// [`MapReport`]; fatal errors leave `destination` untouched.
    pub async fn map_rows<T: Record>(
        &self,
        rows: Vec<Vec<String>>,
        destination: &mut Vec<T>,
        token: CancellationToken,
    ) -> Result<MapReport> {
        if rows.is_empty() {
            return Ok(MapReport::new(0));
        }

        let header_index = self.config.header_index;
        if header_index >= rows.len() {
            return Err(Error::HeaderRow {
                index: header_index,
                total: rows.len(),
            });
        }

        let bindings = BindingSet::extract::<T>()?;
        let titles = TitleMap::resolve(&rows[header_index], &bindings)?;
        debug!(
            "Resolved {} bindings against {} header titles",
            bindings.len(),
            titles.len()
        );

        let mut rows = rows;
        let data = rows.split_off(header_index + 1);
        if data.is_empty() {
            return Ok(MapReport::new(0));
        }

        let workers = self.config.effective_workers();
        info!(
            "Mapping {} rows ({})",
            data.len(),
            if workers == 0 {
                "sequential".to_string()
            } else {
                format!("{workers} workers")
            }
        );

        let (records, report) = if workers == 0 {
            self.map_sequential(data, header_index, &bindings, &titles, token)?
        } else {
            map_with_workers(
                data,
                header_index,
                bindings,
                titles,
                self.registry.clone(),
                workers,
                self.config.skip,
                token,
            )
            .await?
        };

        info!(
            "Mapped {} of {} rows ({} diagnostics)",
            report.records_mapped,
            report.rows_total,
            report.errors.len()
        );
        destination.extend(records);
        Ok(report)
    }

    /// Sequential control path: batch-abort semantics under strict policy
    fn map_sequential<T: Record>(
        &self,
        data: Vec<Vec<String>>,
        header_index: usize,
        bindings: &BindingSet,
        titles: &TitleMap,
        token: CancellationToken,
    ) -> Result<(Vec<T>, MapReport)> {
        let mut records = Vec::with_capacity(data.len());
        let mut report = MapReport::new(data.len());

        for (offset, row) in data.iter().enumerate() {
            if token.is_cancelled() {
                return Err(Error::Cancelled);
            }

            let row_number = header_index + 1 + offset;
            let mut output = materialize_row::<T>(
                row_number,
                row,
                bindings,
                titles,
                &self.registry,
                self.config.skip,
            )?;

            match output.record.take() {
                Some(record) => {
                    report.errors.append(&mut output.errors);
                    records.push(record);
                    report.records_mapped += 1;
                }
                None => {
                    // Strict row abort escalates to a batch abort here.
                    let abort = output.errors.pop();
                    return Err(batch_abort(abort));
                }
            }
        }

        Ok((records, report))
    }
}

/// Convert the abort diagnostic of a strict-mode row into the fatal error
/// returned for the whole batch
fn batch_abort(error: Option<RowError>) -> Error {
    match error {
        Some(RowError {
            row,
            column,
            code: ErrorCode::Required,
            ..
        }) => Error::Required { column, row },
        Some(RowError {
            row,
            column,
            code: ErrorCode::Parse,
            message,
        }) => Error::Parse {
            column,
            row,
            message,
        },
        Some(other) => Error::binding(other.to_string()),
        None => Error::Worker {
            message: "row aborted without a diagnostic".to_string(),
        },
    }
}
