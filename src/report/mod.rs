//! Renderers and writers for audit results.
//!
//! - [`terminal`]: colored, tabular console output; respects `--verbose` / `--quiet`.
//! - [`markdown`]: the client-facing `serp_audit_summary.md`.
//! - [`export`]: CSV tables: enriched rows, count tables, flagged rows.

pub mod export;
pub mod markdown;
pub mod terminal;
