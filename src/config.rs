//! Configuration for runa-ls.
//!
//! Settings are read from `ls.toml` (see [Config::default_path]) and act as defaults that the
//! command line can override.
//!
//! - [load]: the main [Config] struct, file loading and default config generation.
//! - [general]: the `[general]` table with listing defaults.

pub mod general;
pub mod load;

pub use general::{Collation, General, InternalGeneral};
pub use load::Config;
