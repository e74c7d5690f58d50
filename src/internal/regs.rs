//! 88E6xxx AVB, Qav and priority-map register definitions.
//!
//! # Module Organization
//!
//! - `global1`: ATU control and IEEE priority map (Global 1 block)
//! - `port`: 6390 IEEE priority mapping table (port block)
//! - `avb`: Global AVB configuration
//! - `qav`: Global Qav configuration
//! - `port_avb`: Per-port AVB configuration
//! - `port_qav`: Per-port Qav (credit-based shaper) configuration
//!
//! All registers are 16 bits wide.

/// Build a contiguous bit mask covering bits `high..=low`
pub(crate) const fn genmask(high: u32, low: u32) -> u16 {
    (((1u32 << (high - low + 1)) - 1) << low) as u16
}

/// Place `value` into the field described by `mask`
#[inline]
pub(crate) const fn field_prep(mask: u16, value: u16) -> u16 {
    (value << mask.trailing_zeros()) & mask
}

/// Extract the field described by `mask` from `reg`
#[inline]
pub(crate) const fn field_get(mask: u16, reg: u16) -> u16 {
    (reg & mask) >> mask.trailing_zeros()
}

/// Global 1 registers
pub mod global1 {
    /// ATU Control register
    pub const ATU_CTL: u8 = 0x0A;
    /// Treat static ATU entries flagged AVB_NRL as AVB admission entries
    pub const ATU_CTL_MAC_AVB: u16 = 0x8000;

    /// IEEE-PRI register: 2-bit QPri per tag priority
    pub const IEEE_PRI: u8 = 0x18;
    /// Hardware reset value of IEEE-PRI on 4-queue families
    pub const IEEE_PRI_DEFAULT: u16 = 0xFA50;
    /// Width of one priority's QPri field in IEEE-PRI
    pub const IEEE_PRI_FIELD_BITS: u32 = 2;
}

/// Per-port registers (6390 family)
pub mod port {
    use super::genmask;

    /// IEEE Priority Mapping Table register
    pub const IEEE_PRIO_MAP_TABLE: u8 = 0x18;
    /// Commit the pointer/data pair to the table
    pub const IEEE_PRIO_MAP_TABLE_UPDATE: u16 = 0x8000;
    /// Ingress PCP to FPri/QPri table
    pub const IEEE_PRIO_MAP_TABLE_INGRESS_PCP: u16 = 0x0000;
    /// Table entry pointer (the PCP for the ingress table)
    pub const IEEE_PRIO_MAP_TABLE_PTR_MASK: u16 = genmask(11, 9);
    /// Ingress PCP entry: frame priority
    pub const INGRESS_PCP_FPRI_MASK: u16 = genmask(6, 4);
    /// Ingress PCP entry: queue priority
    pub const INGRESS_PCP_QPRI_MASK: u16 = genmask(2, 0);
}

/// Global AVB registers
pub mod avb {
    use super::genmask;

    /// AVB class priority map
    pub const CFG_AVB: u8 = 0x00;

    /// Hi (class A) frame priority
    pub const HI_FPRI_MASK: u16 = genmask(14, 12);
    /// Lo (class B) frame priority
    pub const LO_FPRI_MASK: u16 = genmask(6, 4);

    /// Hi queue priority, 4-queue families
    pub const HI_QPRI_MASK_4Q: u16 = genmask(9, 8);
    /// Lo queue priority, 4-queue families
    pub const LO_QPRI_MASK_4Q: u16 = genmask(1, 0);
    /// Hi queue priority, 8-queue families
    pub const HI_QPRI_MASK_8Q: u16 = genmask(10, 8);
    /// Lo queue priority, 8-queue families
    pub const LO_QPRI_MASK_8Q: u16 = genmask(2, 0);

    /// Max frame size for class A
    pub const CFG_HI_LIMIT: u8 = 0x08;
    /// Hi-limit field
    pub const HI_LIMIT_MASK: u16 = genmask(10, 0);
}

/// Global Qav registers
pub mod qav {
    use super::genmask;

    /// Qav global configuration
    pub const CFG: u8 = 0x00;
    /// Isochronous pointer threshold; bit 15 (admit management) shares the word
    pub const ISO_PTR_MASK: u16 = genmask(9, 0);
}

/// Per-port AVB registers
pub mod port_avb {
    /// AVB port configuration
    pub const CFG: u8 = 0x00;
    /// All frames legacy unless overridden
    pub const MODE_LEGACY: u16 = 0x0000;
    /// AVB frames identified by priority alone
    pub const MODE_STANDARD: u16 = 0x4000;
    /// Standard, and the DA ATU entry carries the static AVB_NRL flag
    pub const MODE_ENHANCED: u16 = 0x8000;

    /// Filter AVB frames failing admission
    pub const FILTER_BAD_AVB: u16 = 0x1000;
    /// Discard bad AVB frames
    pub const DISCARD_BAD: u16 = 0x0400;
}

/// Per-port Qav registers
pub mod port_qav {
    /// Rate register for `queue`
    #[inline]
    pub const fn cfg_rate(queue: u8) -> u8 {
        0x08 + queue * 2
    }

    /// Hi-limit register for `queue`
    #[inline]
    pub const fn cfg_hi_limit(queue: u8) -> u8 {
        0x09 + queue * 2
    }
}
