//! Fire-and-forget policy for side channels.

use std::fmt::Display;

/// Marks a result as non-blocking: errors are logged and discarded.
///
/// Blocking steps propagate with `?`; zone deletion, notifications, audit log
/// writes and webhooks go through this instead.
pub trait BestEffort<T> {
    fn best_effort(self, context: &str) -> Option<T>;
}

impl<T, E: Display> BestEffort<T> for Result<T, E> {
    fn best_effort(self, context: &str) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("{context} failed (ignored): {e}");
                None
            }
        }
    }
}
