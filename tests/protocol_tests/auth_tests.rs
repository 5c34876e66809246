//! Login Response Tests
//!
//! These tests verify:
//! - Known challenge/password vectors
//! - Agreement with a direct MD5 computation
//! - Rejection of malformed challenges

use md5::{Digest, Md5};
use routeros::protocol::compute_response;
use routeros::RouterOsError;

#[test]
fn test_known_vector() {
    let response = compute_response("secret", "0123456789abcdef0123456789abcdef").unwrap();
    assert_eq!(response, "00ebbe7c3df6b3d902bfd1f355c6e63289");
}

#[test]
fn test_known_vector_empty_password() {
    let response = compute_response("", "c8e4c3e5e5b0a1f9e0d2c1b0a9f8e7d6").unwrap();
    assert_eq!(response, "009122038a4cac6a17c575da8e37d188a3");
}

#[test]
fn test_matches_md5_crate_directly() {
    let challenge = [0x5au8, 0x01, 0xff, 0x00, 0x7e, 0x42, 0x13, 0x37];
    let password = "p\u{e4}ssw\u{f6}rd";

    let mut input = vec![0u8];
    input.extend_from_slice(password.as_bytes());
    input.extend_from_slice(&challenge);
    let expected = format!("00{}", hex::encode(Md5::digest(&input)));

    assert_eq!(compute_response(password, &hex::encode(challenge)).unwrap(), expected);
}

#[test]
fn test_response_format() {
    let response = compute_response("admin", "00").unwrap();

    assert_eq!(response.len(), 2 + 32);
    assert!(response.starts_with("00"));
    assert!(response
        .chars()
        .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
}

#[test]
fn test_uppercase_challenge_accepted() {
    let lower = compute_response("secret", "0123456789abcdef0123456789abcdef").unwrap();
    let upper = compute_response("secret", "0123456789ABCDEF0123456789ABCDEF").unwrap();
    assert_eq!(lower, upper);
}

#[test]
fn test_invalid_challenge() {
    assert!(matches!(
        compute_response("secret", "not-hex"),
        Err(RouterOsError::InvalidChallenge(_))
    ));
    assert!(matches!(
        compute_response("secret", "abc"),
        Err(RouterOsError::InvalidChallenge(_))
    ));
}
