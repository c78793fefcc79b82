//! pgconsole-core — the statistics refresh engine behind `pgconsole`.
//!
//! Provides:
//! - `view` — the static View Catalog (query templates, sort/diff ranges)
//! - `query` — query text construction for the active console
//! - `table` — the in-memory Result Table (diff, sort, column widths)
//! - `aligner` — the snapshot re-alignment policy between ticks
//! - `console` — per-connection state, up to [`console::MAX_CONSOLES`]
//! - `collector` — host (`/proc`) and PostgreSQL data sources
//! - `engine` — the top-level Refresh Engine tick
//! - `dispatch` — keystroke-to-state-transition command handling
//! - `config` — `~/.pgcenterrc` connection file parsing
//! - `error` — shared error types

pub mod aligner;
pub mod collector;
pub mod config;
pub mod console;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod query;
pub mod table;
pub mod view;
