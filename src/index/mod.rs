pub mod build;
pub mod builder;
pub mod encoder;
pub mod extract;
pub mod scanner;
pub mod types;
pub mod writer;

pub use build::build_index;
pub use builder::{IndexBuilder, SortedIndex};
pub use encoder::RecordEncoder;
pub use extract::RecordExtractor;
pub use scanner::LineScanner;
pub use types::*;
pub use writer::{AtomicFileWriter, FileOwnership};
