//! Moving bytes between sources and sinks.
//!
//! - [`read_into`] / [`write_from`] - One fill or one drain of a [`StagingBuffer`](crate::StagingBuffer)
//! - [`copy`] - Fill, flip, drain, clear until the source is exhausted
//! - [`copy_file`] - The same loop between two files, with a [`CopyReport`]
//! - [`copy_mapped`] - File copy through memory maps (requires `mmap` feature)
//!
//! Every handle opened here is an owned value, so it is closed on every exit
//! path, in reverse order of opening. A destination file a failed copy has
//! created or truncated is removed. Errors are returned, never swallowed.

mod copy;
mod hash;
mod partial;
mod report;

#[cfg(feature = "mmap")]
mod mapped;

pub use copy::{copy, copy_file, read_into, write_from};
pub use hash::TransferHash;
pub use report::CopyReport;

#[cfg(feature = "mmap")]
pub use mapped::copy_mapped;
