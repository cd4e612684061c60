// Integration tests for the async staging API (feature = "async-io")
// Tests cover: tokio interop through tokio-util compat, stream offsets

#![cfg(feature = "async-io")]

use futures_util::StreamExt;
use stagebuf::{StagingBuffer, copy_async, stage_async};
use tokio_util::compat::{TokioAsyncReadCompatExt, TokioAsyncWriteCompatExt};

#[tokio::test]
async fn test_copy_async_between_tokio_files() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("src.bin");
    let dst = dir.path().join("dst.bin");
    let data: Vec<u8> = (0..20_000).map(|i| (i % 253) as u8).collect();
    tokio::fs::write(&src, &data).await.unwrap();

    let mut reader = tokio::fs::File::open(&src).await.unwrap().compat();
    let mut writer = tokio::fs::File::create(&dst).await.unwrap().compat_write();
    let mut buf = StagingBuffer::allocate(1024);

    let moved = copy_async(&mut reader, &mut writer, &mut buf).await.unwrap();
    drop(writer);

    assert_eq!(moved, data.len() as u64);
    assert_eq!(tokio::fs::read(&dst).await.unwrap(), data);
}

#[tokio::test]
async fn test_stage_async_offsets() {
    let data = vec![0x5Au8; 3000];
    let reader = tokio_test::io::Builder::new()
        .read(&data[..1000])
        .read(&data[1000..])
        .build()
        .compat();

    let mut stream = stage_async(reader, 512);
    let mut total = 0usize;
    while let Some(piece) = stream.next().await {
        let piece = piece.unwrap();
        assert!(piece.len() <= 512);
        assert!(piece.iter().all(|&b| b == 0x5A));
        total += piece.len();
    }

    assert_eq!(total, data.len());
    assert_eq!(stream.offset(), data.len() as u64);
}
