//! Exponential-backoff retry for providers whose failures are transient
//! (rate limits, 5xx, timeouts): 3 attempts, 1s base delay, factor 2.

use std::thread::sleep;
use std::time::Duration;

use memoryforge_core::constants::{EMBEDDING_MAX_ATTEMPTS, EMBEDDING_RETRY_BASE_MS, EMBEDDING_RETRY_FACTOR};
use memoryforge_core::errors::{MemoryForgeError, MemoryForgeResult};

/// Runs `attempt` up to [`EMBEDDING_MAX_ATTEMPTS`] times. Only
/// `TransientBackend` failures are retried; anything else returns immediately.
pub fn with_retry<T>(mut attempt: impl FnMut(u32) -> MemoryForgeResult<T>) -> MemoryForgeResult<T> {
    let mut delay_ms = EMBEDDING_RETRY_BASE_MS;
    let mut last_err = None;

    for attempt_no in 0..EMBEDDING_MAX_ATTEMPTS {
        match attempt(attempt_no) {
            Ok(value) => return Ok(value),
            Err(err @ MemoryForgeError::TransientBackend { .. }) => {
                last_err = Some(err);
                if attempt_no + 1 < EMBEDDING_MAX_ATTEMPTS {
                    sleep(Duration::from_millis(delay_ms));
                    delay_ms *= EMBEDDING_RETRY_FACTOR;
                }
            }
            Err(other) => return Err(other),
        }
    }

    Err(last_err.expect("loop runs at least once"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn succeeds_without_retry() {
        let result = with_retry(|_| Ok::<_, MemoryForgeError>(42));
        assert_eq!(result.unwrap(), 42);
    }

    #[test]
    fn retries_transient_failures_then_succeeds() {
        let calls = Cell::new(0);
        let result = with_retry(|_| {
            calls.set(calls.get() + 1);
            if calls.get() < 3 {
                Err(MemoryForgeError::transient("test", "not yet"))
            } else {
                Ok(7)
            }
        });
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn gives_up_after_max_attempts() {
        let calls = Cell::new(0);
        let result: MemoryForgeResult<()> = with_retry(|_| {
            calls.set(calls.get() + 1);
            Err(MemoryForgeError::transient("test", "always fails"))
        });
        assert!(result.is_err());
        assert_eq!(calls.get(), EMBEDDING_MAX_ATTEMPTS);
    }

    #[test]
    fn does_not_retry_non_transient_errors() {
        let calls = Cell::new(0);
        let result: MemoryForgeResult<()> = with_retry(|_| {
            calls.set(calls.get() + 1);
            Err(MemoryForgeError::validation("text", "too long"))
        });
        assert!(result.is_err());
        assert_eq!(calls.get(), 1);
    }
}
