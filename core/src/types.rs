//! Shared primitive types used across the pipeline.

/// Row index into a table. Rows keep their file order.
pub type RowIdx = usize;

/// The canonical customer identifier (`customer_id` column).
pub type CustomerId = String;
