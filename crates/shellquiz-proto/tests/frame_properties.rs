//! Property-based tests for frame decoding.
//!
//! Decoding arbitrary bytes must never panic, and any frame the encoder
//! produces must decode to the same message regardless of what follows it in
//! the buffer.

use proptest::prelude::*;
use shellquiz_proto::{
    ClientFrame, KeyInput, PtyRequest, ScrollDirection,
    codec::{decode, encode},
};

fn key_strategy() -> impl Strategy<Value = KeyInput> {
    prop_oneof![
        any::<char>().prop_map(KeyInput::Char),
        any::<char>().prop_map(KeyInput::Ctrl),
        Just(KeyInput::Enter),
        Just(KeyInput::Esc),
        Just(KeyInput::Up),
        Just(KeyInput::Down),
        Just(KeyInput::PageUp),
        Just(KeyInput::PageDown),
    ]
}

fn client_frame_strategy() -> impl Strategy<Value = ClientFrame> {
    prop_oneof![
        Just(ClientFrame::Hello { pty: None }),
        ("[a-z0-9-]{0,16}", any::<u16>(), any::<u16>()).prop_map(|(term, cols, rows)| {
            ClientFrame::Hello { pty: Some(PtyRequest { term, cols, rows }) }
        }),
        (any::<u16>(), any::<u16>()).prop_map(|(cols, rows)| ClientFrame::Resize { cols, rows }),
        key_strategy().prop_map(ClientFrame::Key),
        Just(ClientFrame::Scroll(ScrollDirection::Up)),
        Just(ClientFrame::Scroll(ScrollDirection::Down)),
    ]
}

proptest! {
    #[test]
    fn prop_decode_never_panics(data in prop::collection::vec(any::<u8>(), 0..256)) {
        let _ = decode::<ClientFrame>(&data);
    }

    #[test]
    fn prop_frame_survives_trailing_bytes(
        frame in client_frame_strategy(),
        trailing in prop::collection::vec(any::<u8>(), 0..32),
    ) {
        let mut buf = Vec::new();
        encode(&frame, &mut buf).unwrap();
        let encoded_len = buf.len();
        buf.extend_from_slice(&trailing);

        let (decoded, used): (ClientFrame, usize) = decode(&buf).unwrap();
        prop_assert_eq!(decoded, frame);
        prop_assert_eq!(used, encoded_len);
    }
}
