//! System clipboard access.

use tracing::debug;

/// Put `value` on the clipboard.  Returns `false` when no clipboard is
/// available (headless sessions, CI).
pub fn copy(value: &str) -> bool {
    let result = arboard::Clipboard::new().and_then(|mut cb| cb.set_text(value.to_string()));
    match result {
        Ok(()) => true,
        Err(e) => {
            debug!(error = %e, "clipboard unavailable");
            false
        }
    }
}
