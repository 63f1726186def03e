#![no_main]

use atomkit_wire::{decode, encode};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    match decode(data) {
        // Anything accepted must re-encode to the exact input
        Ok(atom) => {
            let bytes = encode(&atom).expect("decoded atom must encode");
            assert_eq!(&bytes[..], data);
        }
        Err(err) => assert!(err.is_malformed()),
    }
});
