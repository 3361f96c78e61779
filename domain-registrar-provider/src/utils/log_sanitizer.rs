//! Log sanitization utilities
//!
//! Registrar responses can echo contact details and API keys back at us, so
//! nothing lands in a log line untruncated or unmasked.

use std::borrow::Cow;

/// Maximum number of bytes to include in truncated log output.
const TRUNCATE_LIMIT: usize = 256;

/// Number of leading characters [`mask_secret`] keeps visible.
const MASK_VISIBLE: usize = 4;

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
/// Borrows the input when it is within the limit, otherwise keeps the first
/// `TRUNCATE_LIMIT` bytes (on a char boundary) and appends the total length.
pub fn truncate_for_log(s: &str) -> Cow<'_, str> {
    if s.len() <= TRUNCATE_LIMIT {
        Cow::Borrowed(s)
    } else {
        Cow::Owned(format!(
            "{}... [truncated, total {} bytes]",
            &s[..floor_char_boundary(s, TRUNCATE_LIMIT)],
            s.len()
        ))
    }
}

/// Mask a secret (API key, access key id) for logs: `abcd****`.
pub fn mask_secret(secret: &str) -> String {
    if secret.chars().count() <= MASK_VISIBLE {
        return "****".to_string();
    }
    let visible: String = secret.chars().take(MASK_VISIBLE).collect();
    format!("{visible}****")
}
