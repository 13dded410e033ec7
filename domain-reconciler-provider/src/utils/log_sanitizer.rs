//! Response-body shortening for error messages and logs.
//!
//! Provider and webhook error bodies end up in sweep reports and the audit
//! trail, so they are cut down before being embedded anywhere.

/// Budget used by the provider HTTP layer.
pub const PROVIDER_BODY_LIMIT: usize = 256;

/// Cuts `body` to at most `limit` bytes, never splitting a UTF-8 character.
///
/// Surrounding whitespace is dropped first. A shortened body is suffixed with
/// its original byte length so the reader knows something was removed.
#[must_use]
pub fn truncate_body(body: &str, limit: usize) -> String {
    let body = body.trim();
    if body.len() <= limit {
        return body.to_string();
    }

    let mut end = limit;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... [truncated, total {} bytes]", &body[..end], body.len())
}

/// [`truncate_body`] with the provider budget.
#[must_use]
pub fn truncate_for_log(body: &str) -> String {
    truncate_body(body, PROVIDER_BODY_LIMIT)
}
