//! Host-facing NDJSON bridge driving a [`crate::SearchController`].

pub mod contract;
pub mod handler;
pub mod stdio;

pub use handler::{CommandHandler, StateView};
pub use stdio::{run_bridge, run_stdio_bridge};
