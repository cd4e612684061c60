//! Async staged copy between tokio files.
//!
//! Run with:
//!     cargo run --example async_copy --features async-io -- <src> <dst>

use std::env;

use stagebuf::{StagingBuffer, copy_async};
use tokio_util::compat::{TokioAsyncReadCompatExt, TokioAsyncWriteCompatExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let src = args.next().unwrap_or_else(|| "Cargo.toml".to_string());
    let dst = args.next().unwrap_or_else(|| "Cargo.toml.copy".to_string());

    let mut reader = tokio::fs::File::open(&src).await?.compat();
    let mut writer = tokio::fs::File::create(&dst).await?.compat_write();
    let mut buf = StagingBuffer::take(8 * 1024);

    let moved = copy_async(&mut reader, &mut writer, &mut buf).await?;
    println!("Copied {} bytes from {} to {}", moved, src, dst);

    Ok(())
}
