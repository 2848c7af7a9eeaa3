//! Shared-secret gate.

/// Constant-time string comparison.
///
/// Takes the same time however many leading bytes match. Both inputs are
/// padded to the longer length with different fill bytes so a length
/// mismatch can never compare equal.
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    use subtle::ConstantTimeEq;

    let max_len = std::cmp::max(a.len(), b.len());
    let mut a_padded = vec![0u8; max_len];
    let mut b_padded = vec![0xFFu8; max_len];
    a_padded[..a.len()].copy_from_slice(a.as_bytes());
    b_padded[..b.len()].copy_from_slice(b.as_bytes());

    let lengths_equal = a.len().ct_eq(&b.len());
    let contents_equal = a_padded.ct_eq(&b_padded);
    (lengths_equal & contents_equal).into()
}

/// Outcome of checking a presented secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretCheck {
    Accepted,
    Rejected,
    /// The server has no secret configured, so nothing can be authorised.
    NotConfigured,
}

/// Check `presented` against the configured secret. An empty configured
/// secret counts as not configured.
pub fn check_secret(configured: Option<&str>, presented: Option<&str>) -> SecretCheck {
    let Some(expected) = configured.filter(|s| !s.is_empty()) else {
        return SecretCheck::NotConfigured;
    };
    match presented {
        Some(given) if constant_time_compare(given, expected) => SecretCheck::Accepted,
        _ => SecretCheck::Rejected,
    }
}
