#![no_main]

use libfuzzer_sys::fuzz_target;
use stagebuf::StagingBuffer;

// Each input byte selects an operation; the low bits double as a length.
fuzz_target!(|data: Vec<u8>| {
    let capacity = data.first().copied().unwrap_or(0) as usize;
    let mut buf = StagingBuffer::allocate(capacity);

    for &op in data.iter().skip(1) {
        let len = (op >> 3) as usize;
        match op & 0x7 {
            0 => {
                let _ = buf.put(&vec![op; len]);
            }
            1 => {
                if let Ok(bytes) = buf.get(len) {
                    assert_eq!(bytes.len(), len);
                }
            }
            2 => {
                buf.flip();
            }
            3 => {
                buf.rewind();
            }
            4 => {
                buf.clear();
            }
            5 => {
                buf.mark();
            }
            6 => {
                let _ = buf.reset();
            }
            _ => {
                buf.compact();
            }
        }

        // Verify: cursor invariant holds after every operation
        assert!(buf.position() <= buf.limit());
        assert!(buf.limit() <= buf.capacity());
        if let Some(mark) = buf.mark_position() {
            assert!(mark <= buf.position());
        }
        assert_eq!(buf.remaining(), buf.limit() - buf.position());
    }
});
