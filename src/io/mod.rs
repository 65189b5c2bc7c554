//! Row-source and row-sink glue around the mapping engine
//!
//! The engine itself only ever sees ordered rows of text cells. This
//! module adapts the delegated grid readers (CSV via the `csv` crate,
//! XLSX via `calamine`) to that shape, and provides the symmetric
//! record→row composition for the write direction.

pub mod reader;
pub mod writer;

#[cfg(test)]
pub mod tests;

pub use reader::{read_csv, read_rows_from_path, read_xlsx};
pub use writer::{ConverterFn, RowComposer};
