//! HMAC-SM3 tests.

use hex_literal::hex;
use hmac::{Mac, SimpleHmac};
use proptest::prelude::*;
use shangmi_sm3::{Hmac, Sm3, hmac};

/// HMAC through the `hmac` crate, keyed with this crate's `Sm3`.
fn rustcrypto_hmac(key: &[u8], msg: &[u8]) -> Vec<u8> {
    let mut mac = SimpleHmac::<Sm3>::new_from_slice(key).expect("any key length is accepted");
    mac.update(msg);
    mac.finalize().into_bytes().to_vec()
}

/// Same, keyed with the reference `sm3` crate.
fn reference_hmac(key: &[u8], msg: &[u8]) -> Vec<u8> {
    let mut mac =
        SimpleHmac::<::sm3::Sm3>::new_from_slice(key).expect("any key length is accepted");
    mac.update(msg);
    mac.finalize().into_bytes().to_vec()
}

// RFC 4231 test case 1 inputs, checked against OpenSSL's HMAC-SM3
#[test]
fn short_key() {
    assert_eq!(
        hmac(&[0x0b; 20], b"Hi There"),
        hex!("51b00d1fb49832bfb01c3ce27848e59f871d9ba938dc563b338ca964755cce70")
    );
}

// RFC 4231 test case 6 inputs
#[test]
fn key_longer_than_block() {
    assert_eq!(
        hmac(
            &[0xaa; 131],
            b"Test Using Larger Than Block-Size Key - Hash Key First"
        ),
        hex!("b4fd844e13342002f0b2e0690ea7741f1497d993a70494cea601e657bedf67a0")
    );
}

#[test]
fn empty_key_and_message() {
    assert_eq!(
        hmac(b"", b""),
        hex!("0d23f72ba15e9c189a879aefc70996b06091de6e64d31b7a84004356dd915261")
    );
}

#[test]
fn keyed_instance_is_reusable() {
    let keyed = Hmac::new(b"shared key");
    let first = keyed.clone().chain(b"first").finalize();
    let second = keyed.chain(b"second").finalize();
    assert_eq!(first, hmac(b"shared key", b"first"));
    assert_eq!(second, hmac(b"shared key", b"second"));
}

proptest! {
    #[test]
    fn matches_hmac_crate(key in any::<Vec<u8>>(), msg in any::<Vec<u8>>()) {
        let tag = hmac(&key, &msg).to_vec();
        prop_assert_eq!(&tag, &rustcrypto_hmac(&key, &msg));
        prop_assert_eq!(&tag, &reference_hmac(&key, &msg));
    }

    #[test]
    fn key_change_changes_tag(key in proptest::collection::vec(any::<u8>(), 1..100), msg in any::<Vec<u8>>()) {
        let mut other = key.clone();
        other[0] ^= 0x01;
        prop_assert_ne!(hmac(&key, &msg), hmac(&other, &msg));
    }
}
