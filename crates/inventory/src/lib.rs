//! `invmerge-inventory`: inventory reconciliation engine.
//!
//! Pure engine crate: receives grids of text cells, returns updated grids and
//! reports. Diagnostics go through an injected [`Diagnostics`] sink.
//! No CLI or IO dependencies.

pub mod aggregate;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod model;
pub mod pseudo_id;
pub mod reconcile;
pub mod table;

pub use aggregate::{fold_case, RecordedCounts};
pub use config::{AppConfig, ColumnRoles, ExcelConfig, Role};
pub use diagnostics::{format_count_line, Diagnostics, LogDiagnostics, RecordingDiagnostics};
pub use error::InventoryError;
pub use model::{GenerationReport, ReconcileReport, UnmatchedEntry};
pub use pseudo_id::generate_pseudo_ids;
pub use reconcile::reconcile;
pub use table::{ColumnIndex, InventoryTable, Row};
