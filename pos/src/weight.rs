//! Time-weight rule.

use onyx_types::ConsensusParams;

/// Bounded coin age used by the kernel target.
///
/// Weight starts from zero at the minimum age rather than from the minimum
/// age itself; more active coins participating in the hash helps secure the
/// network when proof-of-stake difficulty is low. The result may be
/// negative when the interval is shorter than the minimum age — callers
/// enforce the min-age precondition before multiplying by value.
pub fn time_weight(params: &ConsensusParams, interval_begin: i64, interval_end: i64) -> i64 {
    (interval_end - interval_begin - params.stake_min_age).min(params.stake_max_age)
}
