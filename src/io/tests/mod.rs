//! Tests for the row-source and row-sink glue
