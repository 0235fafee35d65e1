//! Length extension of `SM3(secret || message)` tags.
//!
//! Knowing a tag and the length of the secret is enough to compute a valid
//! tag for `message || padding || suffix`. HMAC-SM3 is not affected.

use shangmi_sm3::{Padding, Sm3, hmac, sm3};

const SECRET: &[u8] = b"0123456789abcdef";
const MESSAGE: &[u8] = b"user=guest&role=reader";
const SUFFIX: &[u8] = b"&role=admin";

/// Naive MAC vulnerable to length extension.
fn prefix_mac(message: &[u8]) -> [u8; 32] {
    Sm3::new().chain(SECRET).chain(message).finalize()
}

/// Forge a tag for `message || glue || suffix` from `tag`, guessing the
/// secret length. Returns the forged message and tag.
fn forge(message: &[u8], tag: &[u8; 32], secret_len: usize) -> (Vec<u8>, [u8; 32]) {
    let original_len = (secret_len + message.len()) as u64;
    let glue = Padding::new(original_len);

    let mut forged_message = message.to_vec();
    forged_message.extend_from_slice(glue.as_ref());
    forged_message.extend_from_slice(SUFFIX);

    let processed = original_len + glue.len() as u64;
    let forged_tag = Sm3::resume(tag, processed)
        .expect("padded length is block aligned")
        .chain(SUFFIX)
        .finalize();

    (forged_message, forged_tag)
}

#[test]
fn forged_tag_verifies_under_prefix_mac() {
    let tag = prefix_mac(MESSAGE);
    let (forged_message, forged_tag) = forge(MESSAGE, &tag, SECRET.len());

    assert!(forged_message.ends_with(SUFFIX));
    assert_eq!(prefix_mac(&forged_message), forged_tag);
}

#[test]
fn wrong_secret_length_guess_fails() {
    let tag = prefix_mac(MESSAGE);
    let (forged_message, forged_tag) = forge(MESSAGE, &tag, SECRET.len() + 1);

    assert_ne!(prefix_mac(&forged_message), forged_tag);
}

#[test]
fn forgery_does_not_transfer_to_hmac() {
    let tag = hmac(SECRET, MESSAGE);
    let (forged_message, forged_tag) = forge(MESSAGE, &tag, SECRET.len());

    assert_ne!(hmac(SECRET, &forged_message), forged_tag);
}

#[test]
fn resumed_state_continues_padded_message() {
    let digest = sm3(b"abc");
    let glue = Padding::new(3);
    let mut full = b"abc".to_vec();
    full.extend_from_slice(glue.as_ref());
    full.extend_from_slice(b"def");

    let resumed = Sm3::resume(&digest, 64).expect("aligned").chain(b"def");
    assert_eq!(resumed.len(), full.len() as u64);
    assert_eq!(resumed.finalize(), sm3(&full));
}
