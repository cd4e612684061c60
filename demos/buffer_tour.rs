//! Walk through the staging buffer cursors.
//!
//! Run with:
//!     cargo run --example buffer_tour

use stagebuf::{StagingBuffer, StagingError};

fn show(label: &str, buf: &StagingBuffer) {
    println!(
        "===== {:<8} ===== position={:<4} limit={:<4} capacity={}",
        label,
        buf.position(),
        buf.limit(),
        buf.capacity()
    );
}

fn main() -> Result<(), StagingError> {
    let mut buf = StagingBuffer::allocate(1024);
    show("allocate", &buf);

    buf.put("test".as_bytes())?;
    show("put", &buf);

    // Switch to reading: limit takes the old position, position goes to 0
    buf.flip();
    show("flip", &buf);

    let mut dst = vec![0u8; buf.limit()];
    buf.get_into(&mut dst)?;
    println!("read back: {}", String::from_utf8_lossy(&dst));
    show("get", &buf);

    buf.rewind();
    show("rewind", &buf);

    // Cursors reset, bytes stay
    buf.clear();
    show("clear", &buf);
    println!("byte 1 after clear: {}\n", buf.get_at(1)? as char);

    let mut buf = StagingBuffer::allocate(1024);
    buf.put(b"asdfg")?;
    buf.flip();

    let first = buf.get(2)?;
    println!("{} (position {})", String::from_utf8_lossy(&first), buf.position());

    buf.mark();
    let second = buf.get(2)?;
    println!("{} (position {})", String::from_utf8_lossy(&second), buf.position());

    buf.reset()?;
    println!("after reset: position {}", buf.position());

    if buf.has_remaining() {
        println!("remaining: {}", buf.remaining());
    }

    Ok(())
}
