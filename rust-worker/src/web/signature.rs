//! Webhook signature verification.
//!
//! The sender signs the raw request body with HMAC-SHA1 keyed by the shared
//! secret and sends `X-Hub-Signature: sha1=<hex digest>`. The algorithm is
//! fixed by the sender; any other tag is rejected.

use hmac::{Hmac, Mac};
use sha1::Sha1;
use tracing::warn;

type HmacSha1 = Hmac<Sha1>;

/// Header carrying the body signature.
pub const SIGNATURE_HEADER: &str = "X-Hub-Signature";

/// Algorithm tag every signature must start with.
pub const SIGNATURE_PREFIX: &str = "sha1=";

/// Length of a SHA-1 digest in bytes.
const DIGEST_LEN: usize = 20;

/// Result of checking a signature header.
///
/// Callers should only distinguish [`SignatureCheck::Missing`] from the
/// rest; the other failure reasons are for logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureCheck {
    Valid,
    /// Header absent or empty
    Missing,
    /// Header does not start with `sha1=`
    UnsupportedAlgorithm,
    /// Digest is not hex
    MalformedDigest,
    /// Digest does not match the body
    Mismatch,
}

impl SignatureCheck {
    pub fn is_valid(self) -> bool {
        self == SignatureCheck::Valid
    }

    fn reason(self) -> &'static str {
        match self {
            SignatureCheck::Valid => "valid",
            SignatureCheck::Missing => "missing",
            SignatureCheck::UnsupportedAlgorithm => "unsupported_algorithm",
            SignatureCheck::MalformedDigest => "malformed_digest",
            SignatureCheck::Mismatch => "mismatch",
        }
    }
}

/// Check a raw signature header against the body.
///
/// The header is taken as bytes so values that are not valid header text are
/// rejected instead of being mistaken for an absent header. No HMAC is
/// computed unless the header is well formed. The digest comparison is
/// constant time.
pub fn check_signature(raw_body: &[u8], header: Option<&[u8]>, secret: &[u8]) -> SignatureCheck {
    let result = evaluate(raw_body, header, secret);

    if !result.is_valid() {
        warn!(
            reason = result.reason(),
            header_length = header.map(|h| h.len()).unwrap_or(0),
            body_length = raw_body.len(),
            "webhook_signature_rejected"
        );
    }

    result
}

fn evaluate(raw_body: &[u8], header: Option<&[u8]>, secret: &[u8]) -> SignatureCheck {
    let header = match header {
        Some(h) if !h.is_empty() => h,
        _ => return SignatureCheck::Missing,
    };

    let claimed_hex = match header.strip_prefix(SIGNATURE_PREFIX.as_bytes()) {
        Some(rest) => rest,
        None => return SignatureCheck::UnsupportedAlgorithm,
    };

    let claimed = match hex::decode(claimed_hex) {
        Ok(bytes) if bytes.len() == DIGEST_LEN => bytes,
        _ => return SignatureCheck::MalformedDigest,
    };

    let mut mac = match HmacSha1::new_from_slice(secret) {
        Ok(m) => m,
        Err(_) => return SignatureCheck::Mismatch,
    };
    mac.update(raw_body);

    match mac.verify_slice(&claimed) {
        Ok(()) => SignatureCheck::Valid,
        Err(_) => SignatureCheck::Mismatch,
    }
}

/// Verify an `X-Hub-Signature` value for `raw_body`.
///
/// Returns `false` for an absent, empty or malformed header and for a digest
/// that does not match. Never panics.
pub fn verify_signature(raw_body: &[u8], header: Option<&str>, secret: &[u8]) -> bool {
    check_signature(raw_body, header.map(str::as_bytes), secret).is_valid()
}

/// Compute the header value a sender would attach to `raw_body`.
#[cfg(test)]
pub(crate) fn sign(raw_body: &[u8], secret: &[u8]) -> String {
    let mut mac = HmacSha1::new_from_slice(secret).unwrap();
    mac.update(raw_body);
    format!("{}{}", SIGNATURE_PREFIX, hex::encode(mac.finalize().into_bytes()))
}
