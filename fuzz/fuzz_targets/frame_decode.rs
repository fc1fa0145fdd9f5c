//! Fuzz target for length-prefixed frame decoding
//!
//! # Invariants
//!
//! - Arbitrary bytes never panic the decoder
//! - A decoded frame never claims more bytes than were supplied
//! - A decoded frame re-encodes to a frame that decodes to the same value

#![no_main]

use libfuzzer_sys::fuzz_target;
use shellquiz_proto::{
    ClientFrame, ServerFrame,
    codec::{decode, encode},
};

fuzz_target!(|data: &[u8]| {
    if let Ok((frame, consumed)) = decode::<ClientFrame>(data) {
        assert!(consumed <= data.len());

        let mut buf = Vec::new();
        encode(&frame, &mut buf).unwrap();
        let (again, _) = decode::<ClientFrame>(&buf).unwrap();
        assert_eq!(frame, again);
    }

    if let Ok((_, consumed)) = decode::<ServerFrame>(data) {
        assert!(consumed <= data.len());
    }
});
