#![no_main]

use atomkit_wire::AtomStream;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut stream = AtomStream::new(data);
    while let Some(item) = stream.next() {
        if let Err(err) = item {
            assert!(err.is_malformed());
        }
    }
    assert!(stream.offset() <= data.len());
});
