//! Property-based tests for the transcoders.
//!
//! Run with: `cargo test --test property`

use httpcodec::{Error, base64, html, url};
use proptest::prelude::*;

const GUARD: u8 = 0xA5;
const GUARD_LEN: usize = 16;

/// Run `f` on the first `cap` bytes of a buffer followed by guard bytes and
/// check the guard survived.
fn with_guard<F>(cap: usize, f: F) -> (Result<usize, Error>, Vec<u8>)
where
    F: FnOnce(&mut [u8]) -> Result<usize, Error>,
{
    let mut buf = vec![GUARD; cap + GUARD_LEN];
    let (head, guard) = buf.split_at_mut(cap);
    let res = f(head);
    assert!(guard.iter().all(|&b| b == GUARD), "write past capacity {cap}");
    buf.truncate(cap);
    (res, buf)
}

const RESERVED: &[u8] = b"\"#&'+<>";

proptest! {
    #[test]
    fn url_roundtrip(input in prop::collection::vec(any::<u8>(), 0..256)) {
        let mut enc = vec![0u8; url::encoded_len(&input)];
        let n = url::encode(&mut enc, &input).unwrap();
        prop_assert_eq!(n, enc.len());

        let mut dec = vec![0u8; url::decoded_len_max(n)];
        let m = url::decode(&mut dec, &enc[..n]).unwrap();
        prop_assert_eq!(&dec[..m], &input[..]);
    }

    #[test]
    fn url_encode_output_alphabet(input in prop::collection::vec(any::<u8>(), 0..128)) {
        let mut enc = vec![0u8; url::encoded_len(&input)];
        let n = url::encode(&mut enc, &input).unwrap();
        for &b in &enc[..n] {
            prop_assert!(url::is_unreserved(b) || b == b'%');
            prop_assert!(!b.is_ascii_uppercase() || input.contains(&b));
        }
    }

    #[test]
    fn base64_roundtrip(input in prop::collection::vec(any::<u8>(), 0..256)) {
        let mut enc = vec![0u8; base64::encoded_len(input.len())];
        let n = base64::encode(&mut enc, &input).unwrap();
        prop_assert_eq!(n, 4 * input.len().div_ceil(3));

        let mut dec = vec![0u8; base64::decoded_len_max(n)];
        let m = base64::decode(&mut dec, &enc[..n]).unwrap();
        prop_assert_eq!(&dec[..m], &input[..]);
    }

    #[test]
    fn base64_matches_reference(input in prop::collection::vec(any::<u8>(), 0..256)) {
        let mut enc = vec![0u8; base64::encoded_len(input.len())];
        let n = base64::encode(&mut enc, &input).unwrap();
        let expected = base64_simd::STANDARD.encode_to_string(&input);
        prop_assert_eq!(&enc[..n], expected.as_bytes());
    }

    #[test]
    fn base64_decode_ignores_interleaved_garbage(
        input in prop::collection::vec(any::<u8>(), 1..64),
        junk in prop::sample::select(vec![b'-', b' ', b'\n', b'!', b'.', 0x80u8]),
    ) {
        let mut enc = vec![0u8; base64::encoded_len(input.len())];
        let n = base64::encode(&mut enc, &input).unwrap();
        let noisy: Vec<u8> = enc[..n].iter().flat_map(|&b| [b, junk]).collect();

        let mut dec = vec![0u8; input.len()];
        let m = base64::decode(&mut dec, &noisy).unwrap();
        prop_assert_eq!(&dec[..m], &input[..]);
    }

    #[test]
    fn html_escapes_exactly_reserved(input in prop::collection::vec(any::<u8>(), 0..128)) {
        let mut enc = vec![0u8; html::encoded_len(&input)];
        let n = html::encode(&mut enc, &input).unwrap();

        // Walk the output alongside the input: one 5-byte entity per reserved
        // byte, a verbatim copy otherwise.
        let mut pos = 0;
        for &b in &input {
            if RESERVED.contains(&b) {
                let entity = html::entity(b).unwrap();
                prop_assert_eq!(&enc[pos..pos + html::ENTITY_LEN], &entity[..]);
                pos += html::ENTITY_LEN;
            } else {
                prop_assert_eq!(enc[pos], b);
                pos += 1;
            }
        }
        prop_assert_eq!(pos, n);
    }

    #[test]
    fn one_byte_short_overflows(input in prop::collection::vec(any::<u8>(), 1..96)) {
        let need = html::encoded_len(&input);
        let (res, _) = with_guard(need - 1, |out| html::encode(out, &input));
        prop_assert_eq!(res, Err(Error::Overflow));

        let need = url::encoded_len(&input);
        let (res, _) = with_guard(need - 1, |out| url::encode(out, &input));
        prop_assert_eq!(res, Err(Error::Overflow));

        let need = base64::encoded_len(input.len());
        let (res, _) = with_guard(need - 1, |out| base64::encode(out, &input));
        prop_assert_eq!(res, Err(Error::Overflow));

        // Decoders: feed canonical encodings so the exact size is the input length.
        let mut enc = vec![0u8; url::encoded_len(&input)];
        let n = url::encode(&mut enc, &input).unwrap();
        let (res, _) = with_guard(input.len() - 1, |out| url::decode(out, &enc[..n]));
        prop_assert_eq!(res, Err(Error::Overflow));

        let mut enc = vec![0u8; base64::encoded_len(input.len())];
        let n = base64::encode(&mut enc, &input).unwrap();
        let (res, _) = with_guard(input.len() - 1, |out| base64::decode(out, &enc[..n]));
        prop_assert_eq!(res, Err(Error::Overflow));
    }

    #[test]
    fn exact_capacity_succeeds(input in prop::collection::vec(any::<u8>(), 0..96)) {
        let need = html::encoded_len(&input);
        let (res, _) = with_guard(need, |out| html::encode(out, &input));
        prop_assert_eq!(res, Ok(need));

        let need = url::encoded_len(&input);
        let (res, _) = with_guard(need, |out| url::encode(out, &input));
        prop_assert_eq!(res, Ok(need));

        let need = base64::encoded_len(input.len());
        let (res, _) = with_guard(need, |out| base64::encode(out, &input));
        prop_assert_eq!(res, Ok(need));
    }

    #[test]
    fn url_decode_never_panics(input in prop::collection::vec(any::<u8>(), 0..64), cap in 0usize..80) {
        let (res, _) = with_guard(cap, |out| url::decode(out, &input));
        if let Ok(n) = res {
            prop_assert!(n <= cap);
        }
    }

    #[test]
    fn base64_decode_never_panics(input in prop::collection::vec(any::<u8>(), 0..64), cap in 0usize..64) {
        let (res, _) = with_guard(cap, |out| base64::decode(out, &input));
        match res {
            Ok(n) => prop_assert!(n <= cap),
            Err(e) => prop_assert_eq!(e, Error::Overflow),
        }
    }
}

#[test]
fn url_decode_malformed_cases() {
    let mut out = [0u8; 8];
    assert_eq!(url::decode(&mut out, b"%2"), Err(Error::Malformed { offset: 0 }));
    assert_eq!(url::decode(&mut out, b"%2g"), Err(Error::Malformed { offset: 0 }));
}
