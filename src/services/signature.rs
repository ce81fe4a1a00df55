// SPDX-License-Identifier: MIT

//! Webhook signature verification.
//!
//! WHOOP signs each delivery with HMAC-SHA256 over the timestamp header
//! concatenated with the raw request body, keyed by the client secret, and
//! sends the base64-encoded digest in `X-WHOOP-Signature`. Verification
//! must run on the exact bytes received, before any JSON parsing.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Verify a webhook signature against the shared secret.
///
/// Returns false on any mismatch; the comparison is constant-time.
pub fn verify(timestamp: &str, raw_body: &[u8], candidate: &str, secret: &str) -> bool {
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(timestamp.as_bytes());
    mac.update(raw_body);

    let expected = STANDARD.encode(mac.finalize().into_bytes());
    expected.as_bytes().ct_eq(candidate.as_bytes()).into()
}
