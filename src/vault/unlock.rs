//! Bounded retry loop for proving possession of the unlocking secret.

use tracing::warn;

use crate::errors::{PassVaultError, Result};

/// Default number of retries after the first failed attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 5;

/// Prompt for a secret until `try_decrypt` accepts it.
///
/// `prompt` receives the zero-based attempt number so callers can show
/// a "try again" hint on retries.  A prompt error aborts immediately.
/// After `max_retries` failed retries (so `max_retries + 1` attempts in
/// total) the last decrypt error is returned inside `UnlockExhausted`.
pub fn unlock<S, T, P, D>(max_retries: u32, mut prompt: P, mut try_decrypt: D) -> Result<T>
where
    S: std::ops::Deref,
    S::Target: AsRef<str>,
    P: FnMut(u32) -> Result<S>,
    D: FnMut(&str) -> Result<T>,
{
    let mut failures: u32 = 0;

    loop {
        let secret = prompt(failures)?;

        match try_decrypt((*secret).as_ref()) {
            Ok(value) => return Ok(value),
            Err(e) => {
                failures += 1;
                if failures > max_retries {
                    return Err(PassVaultError::UnlockExhausted {
                        attempts: failures,
                        source: Box::new(e),
                    });
                }
                warn!(attempt = failures, max_retries, "incorrect secret, retrying");
            }
        }
    }
}
