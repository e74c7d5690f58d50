//! Centralized Constants
//!
//! This module provides a single source of truth for the IEEE 802.1Q and AVB
//! constants used throughout the policy engine.
//!
//! # Note
//!
//! Register addresses and bit fields remain in `internal::regs`, as they are
//! specific to the 88E6xxx register blocks.

// =============================================================================
// IEEE 802.1Q
// =============================================================================

/// Number of 802.1p priority code points (and internal frame priorities)
pub const IEEE_8021Q_MAX_PRIORITIES: usize = 8;

/// Highest valid frame priority
pub const MAX_FRAME_PRIORITY: u8 = (IEEE_8021Q_MAX_PRIORITIES - 1) as u8;

/// Frame priorities left for the Legacy class once Lo and Hi claim one each
pub const LEGACY_FRAME_PRIORITIES: usize = IEEE_8021Q_MAX_PRIORITIES - 2;

// =============================================================================
// AVB
// =============================================================================

/// Number of traffic classes (Legacy, Lo, Hi)
pub const TRAFFIC_CLASSES: usize = 3;

/// Default shift applied to the port count to size the isochronous pool
pub const DEFAULT_ISO_PTRS_PER_PORT_SHIFT: u8 = 6;
