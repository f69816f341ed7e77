//! Log sanitization utilities
//!
//! Keeps secrets (secret keys, session tokens, signatures) and oversized
//! response bodies out of debug/error logs.

/// Maximum number of bytes to include in truncated log output.
const TRUNCATE_LIMIT: usize = 256;

/// Number of leading characters left visible by [`mask_secret`].
const MASK_VISIBLE_PREFIX: usize = 4;

/// Parameter names whose values must never reach the logs verbatim.
const SENSITIVE_PARAMS: &[&str] = &["Signature", "Token", "SecretKey"];

/// MSRV-compatible replacement for `str::floor_char_boundary` (stable since 1.91.0).
fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        s.len()
    } else {
        let mut i = index;
        while i > 0 && !s.is_char_boundary(i) {
            i -= 1;
        }
        i
    }
}

/// Truncate a string for safe logging.
///
/// Returns the original string if it's within the limit,
/// otherwise returns the first `TRUNCATE_LIMIT` bytes with a suffix
/// indicating the total length.
pub fn truncate_for_log(s: &str) -> String {
    if s.len() <= TRUNCATE_LIMIT {
        s.to_string()
    } else {
        format!(
            "{}... [truncated, total {} bytes]",
            &s[..floor_char_boundary(s, TRUNCATE_LIMIT)],
            s.len()
        )
    }
}

/// Mask a secret, keeping only a short prefix.
///
/// `AKIDz8krbsJ5yKBZQpn7` → `AKID****`. Secrets shorter than the prefix are fully masked.
pub fn mask_secret(secret: &str) -> String {
    if secret.chars().count() <= MASK_VISIBLE_PREFIX {
        return "****".to_string();
    }
    let prefix: String = secret.chars().take(MASK_VISIBLE_PREFIX).collect();
    format!("{prefix}****")
}

/// Whether a parameter value must be masked before logging.
pub fn is_sensitive_param(name: &str) -> bool {
    SENSITIVE_PARAMS.contains(&name)
}
