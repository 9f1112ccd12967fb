//! # nsscache-index - fixed-stride indexes for passwd-style databases
//!
//! Reads a colon-separated text database such as `/etc/passwd`, `/etc/group`
//! or `/etc/shadow`, extracts one column as the key, and writes a sorted
//! binary index where every record has the same length. A reader that knows
//! the stride can binary-search the index and seek straight to the source
//! line.
//!
//! ## Record layout
//!
//! ```text
//! key NUL decimal-offset NUL [NUL padding...] LF
//! ```
//!
//! ## Modules
//!
//! - [`index`] - scanning, key extraction, sorting, encoding and atomic publish
//! - [`error`] - the [`IndexError`] taxonomy
//! - [`utils`] - logger setup for the binary
//!
//! ## Quick Start
//!
//! ```no_run
//! use nsscache_index::index::{build_index, IndexConfig};
//!
//! let config = IndexConfig::new("/etc/passwd", "/etc/passwd.cache.ixname", 1, false)?;
//! let stats = build_index(&config)?;
//! println!("{} records, stride {}", stats.records, stats.stride);
//! # Ok::<(), nsscache_index::IndexError>(())
//! ```

pub mod error;
pub mod index;
pub mod utils;

pub use error::{IndexError, IoOp, Result};
