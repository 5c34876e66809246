//! Login challenge-response
//!
//! The device answers a bare `/login` with a hex challenge in `ret`. The
//! client proves the password with `00` + hex(MD5(0x00 ‖ password ‖ challenge)).

use md5::{Digest, Md5};

use crate::error::Result;

/// Login command word
pub const LOGIN_COMMAND: &str = "/login";

/// Reply attribute carrying the hex challenge
pub const CHALLENGE_KEY: &str = "ret";

/// Prefix of the response value
const RESPONSE_PREFIX: &str = "00";

/// Compute the login response for a hex-encoded challenge
pub fn compute_response(password: &str, challenge_hex: &str) -> Result<String> {
    let challenge = hex::decode(challenge_hex)?;

    let mut hasher = Md5::new();
    hasher.update([0u8]);
    hasher.update(password.as_bytes());
    hasher.update(&challenge);
    let digest = hasher.finalize();

    Ok(format!("{}{}", RESPONSE_PREFIX, hex::encode(digest)))
}
