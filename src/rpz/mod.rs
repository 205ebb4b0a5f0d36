//! Response policy zone output.

pub mod format;
mod writer;

pub use format::ZoneOptions;
pub use writer::ZoneWriter;
