//! Memory-mapped file copy example.
//!
//! The destination must not exist yet.
//!
//! Run with:
//!     cargo run --example copy_mapped --features mmap -- <src> <dst>

use std::env;

use stagebuf::{CopyConfig, copy_mapped};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let (Some(src), Some(dst)) = (args.next(), args.next()) else {
        eprintln!("usage: copy_mapped <src> <dst>");
        std::process::exit(2);
    };

    let report = copy_mapped(&src, &dst, &CopyConfig::default())?;
    println!(
        "Mapped {} bytes from {} to {} in {} ms",
        report.bytes,
        src,
        dst,
        report.elapsed_millis()
    );

    Ok(())
}
