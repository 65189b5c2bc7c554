//! rowbind
//!
//! A Rust library for mapping tabular text data (CSV/XLSX rows) into
//! strongly-typed records and back, driven by per-field column
//! annotations.
//!
//! This library provides tools for:
//! - Compiling a record type's annotation table into an immutable set of
//!   column bindings
//! - Resolving header rows into column-name→index maps with fail-fast
//!   validation
//! - Parsing cells through a registry of typed conversion functions,
//!   built-in and user-registered
//! - Executing a batch sequentially (batch-abort semantics) or across a
//!   worker pool (partial-result semantics) while preserving row order
//! - Collecting recoverable per-row errors without disturbing the output
//!
//! ## Quick start
//!
//! Implement [`Record`] for your type (an annotation table plus typed
//! field access), then hand a row matrix to [`RowMapper::map_rows`]:
//!
//! ```rust,no_run
//! use rowbind::{AssignError, CellValue, FieldSpec, FromCell, MapperConfig, Record, RowMapper};
//! use tokio_util::sync::CancellationToken;
//!
//! #[derive(Debug, Default)]
//! struct Person {
//!     name: String,
//!     age: i8,
//! }
//!
//! impl Record for Person {
//!     fn fields() -> &'static [FieldSpec] {
//!         const FIELDS: &[FieldSpec] = &[
//!             FieldSpec::new("name", "name", "String").required(),
//!             FieldSpec::new("age", "age", "i8").required(),
//!         ];
//!         FIELDS
//!     }
//!
//!     fn assign(&mut self, index: usize, value: CellValue) -> Result<(), AssignError> {
//!         let got = value.type_name();
//!         let mismatch = move || AssignError { index, got };
//!         match index {
//!             0 => self.name = FromCell::from_cell(value).ok_or_else(mismatch)?,
//!             1 => self.age = FromCell::from_cell(value).ok_or_else(mismatch)?,
//!             _ => return Err(mismatch()),
//!         }
//!         Ok(())
//!     }
//!
//!     fn get(&self, index: usize) -> Option<CellValue> {
//!         match index {
//!             0 => Some(CellValue::Str(self.name.clone())),
//!             1 => Some(CellValue::I8(self.age)),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! # async fn example() -> rowbind::Result<()> {
//! let rows = rowbind::io::read_rows_from_path(std::path::Path::new("people.csv"), None)?;
//! let mapper = RowMapper::new(MapperConfig::new().with_workers(4).with_skip(true));
//!
//! let mut people: Vec<Person> = Vec::new();
//! let report = mapper
//!     .map_rows(rows, &mut people, CancellationToken::new())
//!     .await?;
//!
//! for error in &report.errors {
//!     eprintln!("{error}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod io;
pub mod schema;

// Re-export commonly used types
pub use config::MapperConfig;
pub use engine::{
    BindingSet, FieldBinding, MapReport, ParseCellError, ParserFn, ParserRegistry, RowMapper,
    TitleMap,
};
pub use error::{Error, ErrorCode, Result, RowError};
pub use io::{RowComposer, read_rows_from_path};
pub use schema::{AssignError, CellValue, FieldSpec, FromCell, Record};
