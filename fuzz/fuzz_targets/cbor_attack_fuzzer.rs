//! Fuzz target for hostile CBOR frame bodies
//!
//! # Strategy
//!
//! - Deeply nested: arrays/maps nested to arbitrary depth (stack overflow)
//! - Huge lengths: bodies claiming massive byte/string/array lengths (memory)
//! - Random bodies: arbitrary bytes behind a well-formed length prefix
//!
//! # Invariants
//!
//! - Decoding completes quickly
//! - Huge claimed lengths are rejected, not allocated
//! - NEVER panic on malformed CBOR

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use shellquiz_proto::{ClientFrame, ServerFrame, codec::decode};

#[derive(Debug, Clone, Arbitrary)]
enum CborAttack {
    DeeplyNested { depth: u8, kind: NestingKind },
    HugeLength { claimed_len_exponent: u8 },
    RandomBody { body: Vec<u8> },
}

#[derive(Debug, Clone, Arbitrary)]
enum NestingKind {
    Array,
    Map,
}

fuzz_target!(|attack: CborAttack| {
    let bodies = match attack {
        CborAttack::DeeplyNested { depth, kind } => vec![nested(usize::from(depth % 64), &kind)],
        CborAttack::HugeLength { claimed_len_exponent } => {
            let exponent = u32::from(claimed_len_exponent % 33);
            let claimed = if exponent < 32 { 1u32 << exponent } else { u32::MAX };
            vec![huge(0x5A, claimed), huge(0x7A, claimed), huge(0x9A, claimed)]
        },
        CborAttack::RandomBody { body } => vec![body],
    };

    for body in bodies {
        let frame = framed(&body);
        let _ = decode::<ClientFrame>(&frame);
        let _ = decode::<ServerFrame>(&frame);
    }
});

fn framed(body: &[u8]) -> Vec<u8> {
    let mut frame = (body.len() as u32).to_be_bytes().to_vec();
    frame.extend_from_slice(body);
    frame
}

fn nested(depth: usize, kind: &NestingKind) -> Vec<u8> {
    let mut bytes = Vec::new();
    for _ in 0..depth {
        match kind {
            NestingKind::Array => bytes.push(0x81),
            NestingKind::Map => bytes.extend_from_slice(&[0xA1, 0x61, b'a']),
        }
    }
    bytes.push(0x01);
    bytes
}

fn huge(major: u8, claimed: u32) -> Vec<u8> {
    let mut bytes = vec![major];
    bytes.extend_from_slice(&claimed.to_be_bytes());
    bytes.extend(std::iter::repeat_n(0x01, (claimed as usize).min(8)));
    bytes
}
