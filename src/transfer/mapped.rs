//! Memory-mapped file copy.
//!
//! Source and destination are both mapped into memory, sized to the source's
//! length, and the bytes are copied straight from one region into the other
//! with no intermediate staging buffer.

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::time::Instant;

use log::debug;
use memmap2::MmapOptions;

use super::CopyReport;
use super::partial::PartialFile;
use super::report::DigestState;
use crate::config::CopyConfig;
use crate::error::{Result, StagingError};

/// Copies the file at `src` to a new file at `dst` through memory maps.
///
/// `dst` must not exist yet; if it does, the I/O error of kind
/// [`AlreadyExists`](std::io::ErrorKind::AlreadyExists) is returned and the
/// existing file is left untouched. Once `dst` has been created, any later
/// failure removes it again. The destination mapping is flushed before
/// returning. The staging capacity in
/// `config` is not used; only its hash settings apply.
///
/// The maps are only valid while no other process truncates either file.
#[allow(unsafe_code)]
pub fn copy_mapped(
    src: impl AsRef<Path>,
    dst: impl AsRef<Path>,
    config: &CopyConfig,
) -> Result<CopyReport> {
    let (src, dst) = (src.as_ref(), dst.as_ref());
    let start = Instant::now();

    let input = File::open(src)?;
    let mut partial = PartialFile::new(dst);
    let output = OpenOptions::new()
        .read(true)
        .write(true)
        .create_new(true)
        .open(dst)?;
    partial.arm();

    let len = input.metadata()?.len();
    let map_len = usize::try_from(len).map_err(|_| StagingError::InvalidArgument {
        message: "source is too large to map",
    })?;
    output.set_len(len)?;
    debug!(
        "mapping {} -> {} ({} bytes)",
        src.display(),
        dst.display(),
        len
    );

    let mut digest = DigestState::new(config.hash_config());

    // Mapping a zero-length file is an error on most platforms.
    if map_len > 0 {
        // SAFETY: both files stay open for the lifetime of the maps, and the
        // maps are sized explicitly so a concurrently growing source cannot
        // change their lengths.
        let source = unsafe { MmapOptions::new().len(map_len).map(&input)? };
        let mut target = unsafe { MmapOptions::new().len(map_len).map_mut(&output)? };

        target.copy_from_slice(&source);
        digest.update(&source);
        target.flush()?;
    }
    drop(output);
    partial.complete();

    debug!("mapped copy finished: {} bytes", len);
    Ok(CopyReport {
        bytes: len,
        elapsed: start.elapsed(),
        hash: digest.finish(),
    })
}
