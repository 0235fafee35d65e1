//! SM3 tests.

use digest::Digest;
use hex_literal::hex;
use proptest::prelude::*;
use shangmi_sm3::{Padding, Sm3, sm3};

/// Digest through the `digest` traits, for any implementation.
fn generic_digest<D: Digest>(data: &[u8]) -> Vec<u8> {
    D::digest(data).to_vec()
}

// GB/T 32905-2016 Appendix A.1
#[test]
fn abc() {
    assert_eq!(
        sm3(b"abc"),
        hex!("66c7f0f462eeedd9d1f2d46bdc10e4e24167c4875cf2f7a2297da02b8f4ba8e0")
    );
}

// GB/T 32905-2016 Appendix A.2
#[test]
fn abcd_16() {
    assert_eq!(
        sm3(b"abcd".repeat(16)),
        hex!("debe9ff92275b8a138604889c18e5a4d6fdb70e5387e5765293dcba39c0c5732")
    );
}

#[test]
fn empty() {
    assert_eq!(
        sm3(b""),
        hex!("1ab21d8355cfa17f8e61194831e81a8f22bec8c728fefb747ed035eb5082aa2b")
    );
}

#[test]
fn digest_trait_matches_inherent_api() {
    let data = b"The quick brown fox jumps over the lazy dog";
    assert_eq!(generic_digest::<Sm3>(data), sm3(data).to_vec());
    assert_eq!(generic_digest::<Sm3>(data), generic_digest::<::sm3::Sm3>(data));
}

#[test]
fn finalize_reset_through_digest_trait() {
    let mut hasher = <Sm3 as Digest>::new();
    Digest::update(&mut hasher, b"abc");
    let first = hasher.finalize_reset();
    Digest::update(&mut hasher, b"abc");
    assert_eq!(first, hasher.finalize_reset());
    assert_eq!(first.as_slice(), &sm3(b"abc"));
}

#[test]
fn million_a() {
    let mut hasher = Sm3::new();
    let chunk = [b'a'; 1000];
    for _ in 0..1000 {
        hasher.update(chunk);
    }
    assert_eq!(hasher.len(), 1_000_000);
    assert_eq!(
        Sm3::finalize(&hasher).to_vec(),
        generic_digest::<::sm3::Sm3>(&vec![b'a'; 1_000_000])
    );
}

#[test]
fn padding_completes_final_block() {
    for len in [0usize, 3, 55, 56, 63, 64, 119, 120] {
        let message = vec![0x61u8; len];
        let padding = Padding::new(len as u64);
        let mut padded = message.clone();
        padded.extend_from_slice(padding.as_ref());
        assert_eq!(padded.len() % 64, 0);
    }
}

proptest! {
    #[test]
    fn matches_reference_implementation(data in any::<Vec<u8>>()) {
        prop_assert_eq!(sm3(&data).to_vec(), generic_digest::<::sm3::Sm3>(&data));
    }

    #[test]
    fn chunking_is_irrelevant(data in any::<Vec<u8>>(), chunk in 1usize..130) {
        let mut hasher = Sm3::new();
        for piece in data.chunks(chunk) {
            hasher.update(piece);
        }
        prop_assert_eq!(Sm3::finalize(&hasher), sm3(&data));
    }

    #[test]
    fn single_bit_flip_changes_digest(data in proptest::collection::vec(any::<u8>(), 1..200), byte in any::<prop::sample::Index>(), bit in 0u8..8) {
        let mut tweaked = data.clone();
        tweaked[byte.index(data.len())] ^= 1 << bit;
        prop_assert_ne!(sm3(&data), sm3(&tweaked));
    }
}
