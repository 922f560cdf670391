//! # gsheets-core
//!
//! Core types and helpers shared by the gsheets crates.
//!
//! This crate provides:
//! - The error taxonomy used across the workspace
//! - Value matrices and the row/column transpose helper
//! - Conversion from 1-based cell positions to 0-based grid ranges
//! - Render, input and paste options, and per-call deadline/cancellation

/// Per-call deadline and cancellation.
pub mod call;
/// Error types and result aliases.
pub mod error;
/// Cell positions and grid ranges.
pub mod grid;
/// Value matrices.
pub mod matrix;
/// Request options for reads, writes and pastes.
pub mod options;

pub use call::CallOptions;
pub use error::{CopyStep, GSheetError, Result, SheetKey};
pub use grid::{to_grid_range, CellPosition, CellSpan, GridRange};
pub use matrix::{transpose, CellValue, ValueMatrix};
pub use options::{MajorDimension, PasteType, ValueInputOption, ValueRenderOption};
