//! Configuration and policy types for AVB traffic shaping

use core::ops::Index;

use crate::constants::{
    DEFAULT_ISO_PTRS_PER_PORT_SHIFT, LEGACY_FRAME_PRIORITIES, MAX_FRAME_PRIORITY, TRAFFIC_CLASSES,
};
use crate::error::{ConfigError, ConfigResult};

/// AVB traffic class
///
/// Lo and Hi are the two credit-based shaper classes (SR class B and A).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum TrafficClass {
    /// Non-shaped background traffic
    Legacy = 0,
    /// SR class B
    Lo = 1,
    /// SR class A
    Hi = 2,
}

impl TrafficClass {
    /// The two shaped classes
    pub const SHAPED: [TrafficClass; 2] = [TrafficClass::Lo, TrafficClass::Hi];

    /// Array index of this class
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Frame priority to queue priority mapping for one traffic class
///
/// For Lo and Hi, `fpri` is the single frame priority carried by the class
/// and `qpri` the queue it is pinned to. For Legacy, `fpri` is unused; `qpri`
/// is the first queue of the run and `count` its length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PriorityMapEntry {
    /// Frame priority (0-7)
    pub fpri: u8,
    /// Queue priority
    pub qpri: u8,
    /// Number of queues (Legacy only)
    pub count: u8,
}

impl PriorityMapEntry {
    /// Entry for a shaped class
    #[must_use]
    pub const fn shaped(fpri: u8, qpri: u8) -> Self {
        Self {
            fpri,
            qpri,
            count: 1,
        }
    }

    /// Entry for the Legacy class
    #[must_use]
    pub const fn legacy(base_qpri: u8, count: u8) -> Self {
        Self {
            fpri: 0,
            qpri: base_qpri,
            count,
        }
    }
}

/// Lo/Hi frame and queue priority pairs
///
/// This is what the global AVB configuration register holds, and what a
/// family restores on disable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AvbClassMap {
    /// Class B mapping
    pub lo: PriorityMapEntry,
    /// Class A mapping
    pub hi: PriorityMapEntry,
}

/// AVB priority policy
///
/// Borrowed for the duration of one [`enable`](crate::Switch::enable) call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AvbPolicy {
    map: [PriorityMapEntry; TRAFFIC_CLASSES],
}

impl AvbPolicy {
    /// Create a policy from its three class entries
    #[must_use]
    pub const fn new(
        legacy: PriorityMapEntry,
        lo: PriorityMapEntry,
        hi: PriorityMapEntry,
    ) -> Self {
        Self {
            map: [legacy, lo, hi],
        }
    }

    /// The Legacy class entry
    #[inline]
    pub const fn legacy(&self) -> &PriorityMapEntry {
        &self.map[TrafficClass::Legacy as usize]
    }

    /// The Lo class entry
    #[inline]
    pub const fn lo(&self) -> &PriorityMapEntry {
        &self.map[TrafficClass::Lo as usize]
    }

    /// The Hi class entry
    #[inline]
    pub const fn hi(&self) -> &PriorityMapEntry {
        &self.map[TrafficClass::Hi as usize]
    }

    /// Lo/Hi pairs of this policy
    pub const fn class_map(&self) -> AvbClassMap {
        AvbClassMap {
            lo: *self.lo(),
            hi: *self.hi(),
        }
    }

    /// Check the policy against a switch with `num_queues` transmit queues
    ///
    /// Family-specific queue windows are checked separately by the family.
    pub fn validate(&self, num_queues: u8) -> ConfigResult<()> {
        for tc in TrafficClass::SHAPED {
            let entry = &self[tc];
            if entry.fpri > MAX_FRAME_PRIORITY {
                return Err(ConfigError::InvalidFramePriority);
            }
            if entry.qpri >= num_queues {
                return Err(ConfigError::InvalidQueuePriority);
            }
        }

        if self.lo().fpri == self.hi().fpri {
            return Err(ConfigError::FramePriorityCollision);
        }

        legacy_bucket_size(self.legacy(), num_queues).map(|_| ())
    }
}

impl Index<TrafficClass> for AvbPolicy {
    type Output = PriorityMapEntry;

    fn index(&self, tc: TrafficClass) -> &PriorityMapEntry {
        &self.map[tc.index()]
    }
}

/// Frame priorities per Legacy queue, checked against the queue count
///
/// `ceil(6 / count)`, provided the last Legacy frame priority still lands on
/// a real queue.
pub(crate) fn legacy_bucket_size(legacy: &PriorityMapEntry, num_queues: u8) -> ConfigResult<u8> {
    if legacy.count == 0 {
        return Err(ConfigError::ZeroLegacyQueueCount);
    }

    let per_bucket = LEGACY_FRAME_PRIORITIES.div_ceil(legacy.count as usize);
    let last_qpri = legacy.qpri as usize + (LEGACY_FRAME_PRIORITIES - 1) / per_bucket;
    if last_qpri >= num_queues as usize {
        return Err(ConfigError::LegacyQueueOverflow);
    }

    Ok(per_bucket as u8)
}

/// Credit-based shaper request for one queue
///
/// Mirrors the traffic-control CBS offload parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CbsRequest {
    /// Transmit queue
    pub queue: u8,
    /// Idle slope in bits per second
    pub idle_slope_bps: u64,
    /// Hi credit in bytes
    pub hi_credit: i32,
    /// Enable shaping on this queue
    pub enable: bool,
}

impl CbsRequest {
    /// Request shaping of `queue` at `idle_slope_bps` with `hi_credit` bytes of burst
    #[must_use]
    pub const fn shape(queue: u8, idle_slope_bps: u64, hi_credit: i32) -> Self {
        Self {
            queue,
            idle_slope_bps,
            hi_credit,
            enable: true,
        }
    }

    /// Request that shaping on `queue` be removed
    #[must_use]
    pub const fn disable(queue: u8) -> Self {
        Self {
            queue,
            idle_slope_bps: 0,
            hi_credit: 0,
            enable: false,
        }
    }
}

/// Port AVB admission mode selected on enable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdmissionControl {
    /// AVB frames forwarded only to ATU entries flagged static AVB, with bad
    /// AVB frames filtered and discarded. Requires an SRP service to manage
    /// the ATU.
    #[default]
    Enhanced,
    /// AVB frames classified by priority alone; no admission gating
    Standard,
}

impl AdmissionControl {
    /// Whether admission-control registers are programmed
    #[inline]
    pub const fn is_enhanced(self) -> bool {
        matches!(self, AdmissionControl::Enhanced)
    }
}

/// AVB engine configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AvbConfig {
    /// Admission control mode
    pub admission: AdmissionControl,
    /// Isochronous pointers reserved = port count shifted left by this
    pub iso_ptrs_per_port_shift: u8,
}

impl Default for AvbConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AvbConfig {
    /// Create a new configuration with defaults
    #[must_use]
    pub const fn new() -> Self {
        Self {
            admission: AdmissionControl::Enhanced,
            iso_ptrs_per_port_shift: DEFAULT_ISO_PTRS_PER_PORT_SHIFT,
        }
    }

    /// Set the admission control mode
    #[must_use]
    pub const fn with_admission_control(mut self, admission: AdmissionControl) -> Self {
        self.admission = admission;
        self
    }

    /// Set the isochronous pointer reservation shift
    #[must_use]
    pub const fn with_iso_ptrs_per_port_shift(mut self, shift: u8) -> Self {
        self.iso_ptrs_per_port_shift = shift;
        self
    }
}

/// AVB state of a switch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// AVB not configured
    #[default]
    Disabled,
    /// Enable sequence started and did not complete
    Enabling,
    /// AVB policy applied
    Enabled,
    /// Disable sequence started and did not complete
    Disabling,
}

// =============================================================================
// Unit Tests
// =============================================================================
