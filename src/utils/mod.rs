//! Process-level helpers shared by the binary and tests.
//!
//! - [`logging`] - `tracing` subscriber setup (console or JSON)

pub mod logging;

pub use logging::*;
