//! Frame priority to queue priority distribution.
//!
//! Every one of the eight frame priorities is routed to exactly one queue:
//!
//! 1. The Lo class frame priority goes to the Lo queue.
//! 2. The Hi class frame priority goes to the Hi queue.
//! 3. The remaining six are Legacy. In ascending order they fill a run of
//!    `count` queues starting at the Legacy base queue, `ceil(6 / count)`
//!    frame priorities per queue.
//!
//! Pinning the AVB frame priorities to their own queues means the legacy AVB
//! remap register never needs programming, and still gives the AVB classes
//! priority when admission control is off.
//!
//! The distribution is produced as a lazy [`QpriAssignments`] sequence so
//! each family can decide how to encode it: a 4-queue family folds it into
//! one global register word, an 8-queue family writes each pair into every
//! port's mapping table.

use super::config::{AvbPolicy, legacy_bucket_size};
use crate::constants::IEEE_8021Q_MAX_PRIORITIES;
use crate::error::ConfigResult;

/// One routing decision: frames with priority `fpri` use queue `qpri`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct QpriAssignment {
    /// Frame priority
    pub fpri: u8,
    /// Queue priority
    pub qpri: u8,
}

/// Ascending `(fpri, qpri)` sequence for one policy
///
/// Always yields exactly eight assignments. Cloning restarts from the
/// clone's position, so a fresh sequence can be replayed.
#[derive(Debug, Clone)]
pub struct QpriAssignments {
    lo: (u8, u8),
    hi: (u8, u8),
    legacy_base: u8,
    per_bucket: u8,
    legacy_seen: u8,
    next_fpri: u8,
}

impl QpriAssignments {
    /// Build the distribution of `policy` over `num_queues` queues
    ///
    /// Fails unless `policy` passes [`AvbPolicy::validate`], so every
    /// yielded queue priority is below `num_queues`.
    pub fn new(policy: &AvbPolicy, num_queues: u8) -> ConfigResult<Self> {
        policy.validate(num_queues)?;
        let per_bucket = legacy_bucket_size(policy.legacy(), num_queues)?;

        Ok(Self {
            lo: (policy.lo().fpri, policy.lo().qpri),
            hi: (policy.hi().fpri, policy.hi().qpri),
            legacy_base: policy.legacy().qpri,
            per_bucket,
            legacy_seen: 0,
            next_fpri: 0,
        })
    }
}

impl Iterator for QpriAssignments {
    type Item = QpriAssignment;

    fn next(&mut self) -> Option<QpriAssignment> {
        if self.next_fpri as usize >= IEEE_8021Q_MAX_PRIORITIES {
            return None;
        }

        let fpri = self.next_fpri;
        self.next_fpri += 1;

        let qpri = if fpri == self.lo.0 {
            self.lo.1
        } else if fpri == self.hi.0 {
            self.hi.1
        } else {
            let qpri = self.legacy_base + self.legacy_seen / self.per_bucket;
            self.legacy_seen += 1;
            qpri
        };

        Some(QpriAssignment { fpri, qpri })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = IEEE_8021Q_MAX_PRIORITIES.saturating_sub(self.next_fpri as usize);
        (left, Some(left))
    }
}

impl ExactSizeIterator for QpriAssignments {}
