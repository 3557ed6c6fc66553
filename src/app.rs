//! The listing application for runa-ls.
//!
//! Ties the core engine to an output stream:
//! - [options]: the resolved [ListOptions] and output [Format].
//! - [printer]: [EntryPrinter], the [GridSink](crate::core::GridSink) writing names, prefixes
//!   and indicators, plus the long format writer.
//! - [lister]: [Lister], which walks operands and directories and reports the [ExitStatus].

pub mod lister;
pub mod options;
pub mod printer;

pub use lister::{ExitStatus, Lister};
pub use options::{Format, ListOptions};
pub use printer::{EntryPrinter, write_long};
