//! Staged file copy example.
//!
//! Run with:
//!     RUST_LOG=debug cargo run --example copy_file -- <src> <dst> [capacity]

use std::env;

use stagebuf::{CopyConfig, copy_file};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let src = args.next().unwrap_or_else(|| "Cargo.toml".to_string());
    let dst = args.next().unwrap_or_else(|| "Cargo.toml.copy".to_string());
    let capacity = match args.next() {
        Some(c) => c.parse()?,
        None => stagebuf::DEFAULT_CAPACITY,
    };

    let config = CopyConfig::new(capacity)?;
    let report = copy_file(&src, &dst, &config)?;

    println!("Copied {} -> {}", src, dst);
    println!("Bytes:   {}", report.bytes);
    println!("Elapsed: {} ms", report.elapsed_millis());
    if let Some(hash) = report.hash {
        println!("BLAKE3:  {}", hash);
    }

    Ok(())
}
