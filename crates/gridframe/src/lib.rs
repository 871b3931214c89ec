//! Small in-memory labeled-column table for ad hoc data manipulation.
//!
//! This crate focuses on:
//! - A columnar data model: named, equal-length cell sequences with purely
//!   positional row identity.
//! - Value-like operations (selection, aggregation, filtering, sorting,
//!   dedup summaries, missing-data handling, element-wise transforms) that
//!   return new frames; only column assignment mutates in place.
//! - Boundary conversions: row-oriented text (CSV) always, and an Arrow /
//!   Parquet columnar interop behind the `arrow` feature.
//!
//! Everything is held in memory and evaluated synchronously; the crate
//! targets small-to-medium tables, not out-of-core processing.

#![forbid(unsafe_code)]

mod error;
mod frame;
mod stats;
mod value;

pub mod rows;

#[cfg(feature = "arrow")]
pub mod arrow;
#[cfg(feature = "arrow")]
pub mod parquet;

pub use crate::error::FrameError;
pub use crate::frame::{AggKind, DataFrame, DistinctSummary};
pub use crate::stats::{ColumnSummary, Moments, StatsProvider};
pub use crate::value::Value;
