//! tasksheet - task tracking over a spreadsheet
//!
//! Bug reports and feature requests arrive as rows of a form-response sheet.
//! This library turns those rows into typed tasks with derived fields, writes
//! hours and kanban moves back to the sheet, and aggregates task lists.
//!
//! # Core Concepts
//!
//! - **Row store**: an external table of string cells ([`store::RowStore`])
//! - **Normalization**: row to [`task::Task`], deriving cost, status, month,
//!   kanban column and days until deadline
//! - **Repository**: list, add and update tasks over a row store, locating
//!   rows by task id before each write
//! - **Aggregation**: grouping and totals over task lists
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `.tasksheet.toml`
//! - `error`: Error types and result aliases
//! - `columns`: Sheet column layout and A1 cell references
//! - `dates`: Lenient date parsing for sheet cells
//! - `task`: Task model and pricing
//! - `normalize`: Row to task derivation
//! - `repository`: Task repository over a row store
//! - `aggregate`: Grouping and totals
//! - `store`: Row store trait, file and in-memory implementations
//! - `sample`: Sample task sheet
//! - `lock`: File locking and atomic writes for the file store

pub mod aggregate;
pub mod cli;
pub mod columns;
pub mod config;
pub mod dates;
pub mod error;
pub mod lock;
pub mod normalize;
pub mod output;
pub mod repository;
pub mod sample;
pub mod store;
pub mod task;

pub use error::{Error, Result};
