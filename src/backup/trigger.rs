//! Decides when a newly created password triggers a backup cycle.

use std::num::NonZeroU64;

/// Returns `true` when `sequence_id` is a multiple of `interval`.
///
/// The sequence id is the storage-assigned password id, so the decision
/// needs no extra persisted state.  A zero interval is rejected when the
/// settings are validated and cannot reach this function.
pub fn should_backup(sequence_id: u64, interval: NonZeroU64) -> bool {
    sequence_id % interval.get() == 0
}
