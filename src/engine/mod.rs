//! Tag-driven row/record mapping engine
//!
//! Inspects a record type's field annotations, builds a column-to-field
//! binding, applies per-field parsing/validation/default policies, and
//! executes the mapping either sequentially or across a concurrent worker
//! pool while preserving output order and collecting recoverable per-row
//! errors.
//!
//! ## Architecture
//!
//! The engine is organized into logical components:
//! - [`mapper`] - Core orchestration and the sequential control path
//! - [`binding`] - Annotation table compilation into column bindings
//! - [`registry`] - Typed string→value conversion functions
//! - [`layouts`] - Ordered timestamp layout matching
//! - [`title`] - Header row resolution and batch-wide validation
//! - [`materializer`] - Individual row processing
//! - [`workers`] - Worker pool, result aggregation, error collection
//! - [`report`] - Run statistics and diagnostics
//!
//! ## Usage
//!
//! ```rust,no_run
//! use rowbind::{MapperConfig, RowMapper};
//! use tokio_util::sync::CancellationToken;
//!
//! # #[derive(Debug, Default)] struct Person;
//! # impl rowbind::Record for Person {
//! #     fn fields() -> &'static [rowbind::FieldSpec] {
//! #         const F: &[rowbind::FieldSpec] = &[rowbind::FieldSpec::new("name", "name", "String")];
//! #         F
//! #     }
//! #     fn assign(&mut self, _: usize, _: rowbind::CellValue) -> Result<(), rowbind::AssignError> { Ok(()) }
//! #     fn get(&self, _: usize) -> Option<rowbind::CellValue> { None }
//! # }
//! # async fn example() -> rowbind::Result<()> {
//! let rows = rowbind::io::read_rows_from_path(std::path::Path::new("people.csv"), None)?;
//!
//! let mapper = RowMapper::new(MapperConfig::new().with_skip(true));
//! let mut people: Vec<Person> = Vec::new();
//! let report = mapper
//!     .map_rows(rows, &mut people, CancellationToken::new())
//!     .await?;
//!
//! println!("{} records, {} row errors", people.len(), report.errors.len());
//! # Ok(())
//! # }
//! ```

pub mod binding;
pub mod layouts;
pub mod mapper;
pub mod materializer;
pub mod registry;
pub mod report;
pub mod title;
pub mod workers;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use binding::{BindingSet, FieldBinding};
pub use mapper::RowMapper;
pub use registry::{ParseCellError, ParserFn, ParserRegistry};
pub use report::MapReport;
pub use title::TitleMap;
