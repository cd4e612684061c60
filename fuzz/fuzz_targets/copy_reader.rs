#![no_main]

use std::io::Cursor;

use libfuzzer_sys::fuzz_target;
use stagebuf::{StagingBuffer, copy};

fuzz_target!(|data: Vec<u8>| {
    // Capacities below, at, and above typical input sizes
    for capacity in [1, 7, 64, 1024] {
        let mut buf = StagingBuffer::allocate(capacity);
        let mut out = Vec::new();

        let moved = copy(&mut Cursor::new(&data), &mut out, &mut buf).unwrap();

        // Verify: every byte arrives, in order
        assert_eq!(moved, data.len() as u64);
        assert_eq!(out, data);
    }
});
