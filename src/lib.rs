//! Internal library crate for runa-ls.
//!
//! The shipped application is the `rls` binary (`src/main.rs`).
//!
//! This library exists to share code between targets (binary, tests) and to keep modules organized.
//! The [core] engine (entry model, comparator, column layout, renderer glue) does not touch the
//! terminal and can be driven directly, which is what the integration tests do.

pub mod app;
pub mod config;
pub mod core;
pub mod utils;
