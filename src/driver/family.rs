//! Switch family variants.
//!
//! The 88E6xxx chips supporting 802.1Qav fall into three families that share
//! the AVB programming model and differ in queue count, where the frame to
//! queue priority table lives, and shaper constants:
//!
//! | Family | Queues | FPri→QPri table        | Lo / Hi queue window |
//! |--------|--------|------------------------|----------------------|
//! | 6341   | 4      | global (Global 1)      | 1-2 / 2-3            |
//! | 6352   | 4      | global (Global 1)      | 1-2 / 2-3            |
//! | 6390   | 8      | per port (IEEE PMT)    | any                  |
//!
//! The 6341 differs from the 6352 only in its shaper constants.
//!
//! A family is chosen once from the chip's product number and never changes.
//! Everything in this module is read-only and may be shared between chips.

use super::config::{AdmissionControl, AvbClassMap, AvbPolicy, CbsRequest, PriorityMapEntry};
use super::priority::{QpriAssignment, QpriAssignments};
use super::shaper::{ShaperLimits, ShaperParams};
use crate::constants::IEEE_8021Q_MAX_PRIORITIES;
use crate::error::{ConfigError, ConfigResult, Result};
use crate::hal::bus::{RegSpace, SwitchBus};
use crate::internal::regs::{avb, field_get, field_prep, global1, port};

/// Where a family keeps its FPri to QPri table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FpriTable {
    /// One packed word in Global 1 shared by all ports
    Global,
    /// An ingress PCP table in every port
    PerPort,
}

/// Inclusive queue priority range a shaped class may use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct QueueWindow {
    /// Lowest allowed queue
    pub min: u8,
    /// Highest allowed queue
    pub max: u8,
}

impl QueueWindow {
    /// Whether `qpri` falls inside the window
    #[inline]
    pub const fn contains(&self, qpri: u8) -> bool {
        qpri >= self.min && qpri <= self.max
    }
}

/// Static description of a switch family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FamilyInfo {
    /// Family name
    pub name: &'static str,
    /// Transmit queues per port
    pub num_queues: u8,
    /// Location of the FPri to QPri table
    pub fpri_table: FpriTable,
    /// Allowed Lo and Hi queues, if the family restricts them
    pub queue_windows: Option<[QueueWindow; 2]>,
    /// Lo QPri field in the global AVB configuration word
    pub lo_qpri_mask: u16,
    /// Hi QPri field in the global AVB configuration word
    pub hi_qpri_mask: u16,
    /// Lo/Hi pairs restored on disable
    pub default_class_map: AvbClassMap,
    /// Credit-based shaper constants
    pub shaper: ShaperLimits,
}

const FAMILY_6352: FamilyInfo = FamilyInfo {
    name: "6352",
    num_queues: 4,
    fpri_table: FpriTable::Global,
    queue_windows: Some([
        QueueWindow { min: 1, max: 2 },
        QueueWindow { min: 2, max: 3 },
    ]),
    lo_qpri_mask: avb::LO_QPRI_MASK_4Q,
    hi_qpri_mask: avb::HI_QPRI_MASK_4Q,
    default_class_map: AvbClassMap {
        // VI, queue 2
        lo: PriorityMapEntry::shaped(4, 2),
        // VO, queue 3
        hi: PriorityMapEntry::shaped(5, 3),
    },
    shaper: ShaperLimits {
        rate_unit_bps: 64_000,
        max_rate: 0x7FFF,
        max_hilimit: 0x3FFF,
    },
};

const FAMILY_6341: FamilyInfo = FamilyInfo {
    name: "6341",
    shaper: ShaperLimits {
        rate_unit_bps: 32_000,
        max_rate: 0x7FFF,
        max_hilimit: 0x3FFF,
    },
    ..FAMILY_6352
};

const FAMILY_6390: FamilyInfo = FamilyInfo {
    name: "6390",
    num_queues: 8,
    fpri_table: FpriTable::PerPort,
    queue_windows: None,
    lo_qpri_mask: avb::LO_QPRI_MASK_8Q,
    hi_qpri_mask: avb::HI_QPRI_MASK_8Q,
    default_class_map: AvbClassMap {
        // EE, queue 6
        lo: PriorityMapEntry::shaped(2, 6),
        // CA, queue 7
        hi: PriorityMapEntry::shaped(3, 7),
    },
    shaper: ShaperLimits {
        rate_unit_bps: 64_000,
        max_rate: 0x7FFF,
        max_hilimit: 0x3FFF,
    },
};

/// 88E6xxx family supporting AVB
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Family {
    /// 88E6141 / 88E6341
    Mv6341,
    /// 88E6172 / 88E6176 / 88E6240 / 88E6352
    Mv6352,
    /// 88E6190 / 88E6190X / 88E6191 / 88E6290 / 88E6390 / 88E6390X
    Mv6390,
}

impl Family {
    /// Identify the family from the switch product number
    ///
    /// The product number is the upper 12 bits of the port switch identifier
    /// register. Returns `None` for chips without AVB support.
    pub const fn from_product_num(product: u16) -> Option<Self> {
        match product {
            0x340 | 0x341 => Some(Family::Mv6341),
            0x172 | 0x176 | 0x240 | 0x352 => Some(Family::Mv6352),
            0x0A0 | 0x0A1 | 0x190 | 0x191 | 0x290 | 0x390 => Some(Family::Mv6390),
            _ => None,
        }
    }

    /// Static description of this family
    pub const fn info(self) -> &'static FamilyInfo {
        match self {
            Family::Mv6341 => &FAMILY_6341,
            Family::Mv6352 => &FAMILY_6352,
            Family::Mv6390 => &FAMILY_6390,
        }
    }

    /// Transmit queues per port
    #[inline]
    pub const fn num_queues(self) -> u8 {
        self.info().num_queues
    }

    /// Check `policy` against this family
    ///
    /// Covers the generic policy rules plus the family's queue windows.
    pub fn validate_policy(self, policy: &AvbPolicy) -> ConfigResult<()> {
        let info = self.info();
        policy.validate(info.num_queues)?;

        if let Some([lo_window, hi_window]) = info.queue_windows {
            for (entry, window) in [(policy.lo(), lo_window), (policy.hi(), hi_window)] {
                if !window.contains(entry.qpri) {
                    #[cfg(feature = "log")]
                    log::error!(
                        "{}: bad QPri {} for frame priority {}",
                        info.name,
                        entry.qpri,
                        entry.fpri
                    );
                    return Err(ConfigError::UnsupportedQueuePriority);
                }
            }
        }

        Ok(())
    }

    /// Shaper register values for `request`
    pub const fn compute_cbs_parameters(self, request: &CbsRequest) -> ShaperParams {
        self.info().shaper.params(request)
    }

    /// Pack Lo/Hi pairs into the global AVB configuration word
    pub const fn encode_class_map(self, map: &AvbClassMap) -> u16 {
        let info = self.info();
        field_prep(avb::HI_FPRI_MASK, map.hi.fpri as u16)
            | field_prep(info.hi_qpri_mask, map.hi.qpri as u16)
            | field_prep(avb::LO_FPRI_MASK, map.lo.fpri as u16)
            | field_prep(info.lo_qpri_mask, map.lo.qpri as u16)
    }

    /// Unpack the global AVB configuration word
    pub const fn decode_class_map(self, reg: u16) -> AvbClassMap {
        let info = self.info();
        AvbClassMap {
            lo: PriorityMapEntry::shaped(
                field_get(avb::LO_FPRI_MASK, reg) as u8,
                field_get(info.lo_qpri_mask, reg) as u8,
            ),
            hi: PriorityMapEntry::shaped(
                field_get(avb::HI_FPRI_MASK, reg) as u8,
                field_get(info.hi_qpri_mask, reg) as u8,
            ),
        }
    }

    /// Apply `policy` to the priority map registers
    ///
    /// `policy` must already have passed [`validate_policy`](Self::validate_policy).
    /// The global AVB class word is only programmed with enhanced admission
    /// control; the FPri to QPri table is always programmed.
    pub(crate) fn enable_traffic_classes<B: SwitchBus>(
        self,
        bus: &mut B,
        policy: &AvbPolicy,
        admission: AdmissionControl,
    ) -> Result<()> {
        let info = self.info();
        let assignments = QpriAssignments::new(policy, info.num_queues)?;

        if admission.is_enhanced() {
            self.write_class_map(bus, &policy.class_map())?;
        }

        match info.fpri_table {
            FpriTable::Global => write_global_fpri_table(bus, ieee_pri_word(assignments)),
            FpriTable::PerPort => {
                for assignment in assignments {
                    write_port_fpri_entries(bus, assignment)?;
                }
                Ok(())
            }
        }
    }

    /// Restore the family's reset priority maps
    pub(crate) fn disable_traffic_classes<B: SwitchBus>(
        self,
        bus: &mut B,
        admission: AdmissionControl,
    ) -> Result<()> {
        let info = self.info();

        match info.fpri_table {
            FpriTable::Global => write_global_fpri_table(bus, global1::IEEE_PRI_DEFAULT)?,
            FpriTable::PerPort => {
                // One port's whole table before the next port
                for p in bus.user_ports() {
                    for pcp in 0..IEEE_8021Q_MAX_PRIORITIES as u8 {
                        let entry = ingress_pcp_entry(QpriAssignment { fpri: pcp, qpri: pcp });
                        bus.write(RegSpace::Port(p), port::IEEE_PRIO_MAP_TABLE, entry)?;
                    }
                }
            }
        }

        if admission.is_enhanced() {
            self.write_class_map(bus, &info.default_class_map)?;
        }

        Ok(())
    }

    fn write_class_map<B: SwitchBus>(self, bus: &mut B, map: &AvbClassMap) -> Result<()> {
        let reg = self.encode_class_map(map);

        #[cfg(feature = "defmt")]
        defmt::debug!("AVB class map {}: {:#06x}", self.info().name, reg);

        bus.write(RegSpace::GlobalAvb, avb::CFG_AVB, reg)
    }
}

/// Fold a distribution into the Global 1 IEEE-PRI word
fn ieee_pri_word(assignments: QpriAssignments) -> u16 {
    assignments.fold(0u16, |reg, a| {
        let shift = a.fpri as u32 * global1::IEEE_PRI_FIELD_BITS;
        (reg & !(0x3 << shift)) | (((a.qpri as u16) & 0x3) << shift)
    })
}

fn write_global_fpri_table<B: SwitchBus>(bus: &mut B, reg: u16) -> Result<()> {
    #[cfg(feature = "defmt")]
    defmt::debug!("IEEE-PRI: {:#06x}", reg);

    bus.write(RegSpace::Global1, global1::IEEE_PRI, reg)
}

/// Ingress PCP table entry mapping PCP `fpri` to itself and queue `qpri`
fn ingress_pcp_entry(assignment: QpriAssignment) -> u16 {
    port::IEEE_PRIO_MAP_TABLE_UPDATE
        | port::IEEE_PRIO_MAP_TABLE_INGRESS_PCP
        | field_prep(port::IEEE_PRIO_MAP_TABLE_PTR_MASK, assignment.fpri as u16)
        | field_prep(port::INGRESS_PCP_FPRI_MASK, assignment.fpri as u16)
        | field_prep(port::INGRESS_PCP_QPRI_MASK, assignment.qpri as u16)
}

/// Write one ingress PCP entry to every user port, stopping at the first error
fn write_port_fpri_entries<B: SwitchBus>(bus: &mut B, assignment: QpriAssignment) -> Result<()> {
    let entry = ingress_pcp_entry(assignment);
    for p in bus.user_ports() {
        bus.write(RegSpace::Port(p), port::IEEE_PRIO_MAP_TABLE, entry)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::error::{Error, IoError};
    use crate::hal::bus::PortRole;
    use crate::test_utils::{Access, MockSwitchBus};
    use std::vec::Vec;

    fn policy(legacy: (u8, u8), lo: (u8, u8), hi: (u8, u8)) -> AvbPolicy {
        AvbPolicy::new(
            PriorityMapEntry::legacy(legacy.0, legacy.1),
            PriorityMapEntry::shaped(lo.0, lo.1),
            PriorityMapEntry::shaped(hi.0, hi.1),
        )
    }

    // =========================================================================
    // Identification
    // =========================================================================

    #[test]
    fn product_numbers_map_to_families() {
        assert_eq!(Family::from_product_num(0x352), Some(Family::Mv6352));
        assert_eq!(Family::from_product_num(0x176), Some(Family::Mv6352));
        assert_eq!(Family::from_product_num(0x341), Some(Family::Mv6341));
        assert_eq!(Family::from_product_num(0x390), Some(Family::Mv6390));
        assert_eq!(Family::from_product_num(0x0A1), Some(Family::Mv6390));
        // 88E6085 has no AVB blocks
        assert_eq!(Family::from_product_num(0x04A), None);
    }

    #[test]
    fn family_6341_shares_6352_layout() {
        let a = Family::Mv6341.info();
        let b = Family::Mv6352.info();
        assert_eq!(a.num_queues, b.num_queues);
        assert_eq!(a.queue_windows, b.queue_windows);
        assert_eq!(a.default_class_map, b.default_class_map);
        assert_ne!(a.shaper, b.shaper);
    }

    // =========================================================================
    // Validation
    // =========================================================================

    #[test]
    fn four_queue_window_enforced() {
        // Lo must be queue 1 or 2
        assert_eq!(
            Family::Mv6352.validate_policy(&policy((0, 1), (4, 0), (5, 3))),
            Err(ConfigError::UnsupportedQueuePriority)
        );
        // Hi must be queue 2 or 3
        assert_eq!(
            Family::Mv6341.validate_policy(&policy((0, 1), (4, 2), (5, 1))),
            Err(ConfigError::UnsupportedQueuePriority)
        );
        assert_eq!(Family::Mv6352.validate_policy(&policy((0, 2), (4, 1), (5, 2))), Ok(()));
    }

    #[test]
    fn eight_queue_has_no_window() {
        assert_eq!(Family::Mv6390.validate_policy(&policy((2, 4), (4, 0), (5, 1))), Ok(()));
        assert_eq!(
            Family::Mv6390.validate_policy(&policy((0, 4), (4, 8), (5, 1))),
            Err(ConfigError::InvalidQueuePriority)
        );
    }

    // =========================================================================
    // Encoding
    // =========================================================================

    #[test]
    fn class_map_encoding_4q() {
        let map = Family::Mv6352.info().default_class_map;
        // hi fpri 5 @14:12, hi qpri 3 @9:8, lo fpri 4 @6:4, lo qpri 2 @1:0
        assert_eq!(Family::Mv6352.encode_class_map(&map), 0x5342);
        assert_eq!(Family::Mv6352.decode_class_map(0x5342), map);
    }

    #[test]
    fn class_map_encoding_8q() {
        let map = Family::Mv6390.info().default_class_map;
        // hi fpri 3 @14:12, hi qpri 7 @10:8, lo fpri 2 @6:4, lo qpri 6 @2:0
        assert_eq!(Family::Mv6390.encode_class_map(&map), 0x3726);
        assert_eq!(Family::Mv6390.decode_class_map(0x3726), map);
    }

    #[test]
    fn ieee_pri_word_packs_two_bits_per_priority() {
        let p = policy((0, 3), (4, 2), (5, 3));
        let word = ieee_pri_word(QpriAssignments::new(&p, 4).unwrap());
        // 0->0 1->0 2->1 3->1 4->2 5->3 6->2 7->2
        assert_eq!(word, 0b10_10_11_10_01_01_00_00);
    }

    #[test]
    fn ingress_pcp_entry_layout() {
        let entry = ingress_pcp_entry(QpriAssignment { fpri: 5, qpri: 7 });
        assert_eq!(entry, 0x8000 | (5 << 9) | (5 << 4) | 7);
    }

    // =========================================================================
    // Enable / Disable
    // =========================================================================

    #[test]
    fn enable_4q_writes_class_map_then_global_table() {
        let mut bus = MockSwitchBus::new(7);
        let p = policy((0, 3), (4, 2), (5, 3));

        Family::Mv6352
            .enable_traffic_classes(&mut bus, &p, AdmissionControl::Enhanced)
            .unwrap();

        assert_eq!(
            bus.writes(),
            [
                Access::write(RegSpace::GlobalAvb, avb::CFG_AVB, 0x5342),
                Access::write(RegSpace::Global1, global1::IEEE_PRI, 0xAE50),
            ]
        );
    }

    #[test]
    fn enable_standard_skips_class_map() {
        let mut bus = MockSwitchBus::new(7);
        let p = policy((0, 3), (4, 2), (5, 3));

        Family::Mv6341
            .enable_traffic_classes(&mut bus, &p, AdmissionControl::Standard)
            .unwrap();

        assert!(bus.accesses_to(RegSpace::GlobalAvb).is_empty());
        assert_eq!(bus.register(RegSpace::Global1, global1::IEEE_PRI), Some(0xAE50));
    }

    #[test]
    fn enable_8q_writes_every_user_port_per_priority() {
        let mut bus =
            MockSwitchBus::with_roles(&[PortRole::User, PortRole::Cpu, PortRole::User]);
        let p = policy((0, 6), (2, 6), (3, 7));

        Family::Mv6390
            .enable_traffic_classes(&mut bus, &p, AdmissionControl::Enhanced)
            .unwrap();

        let port_writes: Vec<_> = bus
            .writes()
            .into_iter()
            .filter(|a| matches!(a.space, RegSpace::Port(_)))
            .collect();
        assert_eq!(port_writes.len(), 16);
        assert!(bus.accesses_to(RegSpace::Port(1)).is_empty());

        // fpri 0..7 -> 0 1 6 7 2 3 4 5, written fpri-major, port-minor
        let expected = [0u16, 1, 6, 7, 2, 3, 4, 5];
        for (fpri, qpri) in expected.iter().enumerate() {
            let entry = ingress_pcp_entry(QpriAssignment {
                fpri: fpri as u8,
                qpri: *qpri as u8,
            });
            assert_eq!(port_writes[fpri * 2], Access::write(RegSpace::Port(0), 0x18, entry));
            assert_eq!(port_writes[fpri * 2 + 1], Access::write(RegSpace::Port(2), 0x18, entry));
        }
    }

    #[test]
    fn enable_8q_stops_at_first_port_error() {
        let mut bus = MockSwitchBus::new(4);
        bus.fail_on(RegSpace::Port(2), port::IEEE_PRIO_MAP_TABLE, IoError::Timeout);
        let p = policy((0, 6), (2, 6), (3, 7));

        let result = Family::Mv6390.enable_traffic_classes(&mut bus, &p, AdmissionControl::Standard);

        assert_eq!(result, Err(Error::Io(IoError::Timeout)));
        assert!(bus.accesses_to(RegSpace::Port(3)).is_empty());
        assert_eq!(bus.accesses_to(RegSpace::Port(0)).len(), 1);
    }

    #[test]
    fn disable_4q_restores_reset_maps() {
        let mut bus = MockSwitchBus::new(7);

        Family::Mv6352
            .disable_traffic_classes(&mut bus, AdmissionControl::Enhanced)
            .unwrap();

        assert_eq!(
            bus.writes(),
            [
                Access::write(RegSpace::Global1, global1::IEEE_PRI, 0xFA50),
                Access::write(RegSpace::GlobalAvb, avb::CFG_AVB, 0x5342),
            ]
        );
    }

    #[test]
    fn disable_8q_restores_identity_tables() {
        let mut bus = MockSwitchBus::with_roles(&[PortRole::User, PortRole::Dsa]);

        Family::Mv6390
            .disable_traffic_classes(&mut bus, AdmissionControl::Enhanced)
            .unwrap();

        let writes = bus.writes();
        assert_eq!(writes.len(), 9);
        for pcp in 0..8u8 {
            let entry = ingress_pcp_entry(QpriAssignment { fpri: pcp, qpri: pcp });
            assert_eq!(writes[pcp as usize], Access::write(RegSpace::Port(0), 0x18, entry));
        }
        assert_eq!(writes[8], Access::write(RegSpace::GlobalAvb, avb::CFG_AVB, 0x3726));
    }

    #[test]
    fn disable_8q_restores_one_port_at_a_time() {
        let mut bus = MockSwitchBus::with_roles(&[
            PortRole::User,
            PortRole::Cpu,
            PortRole::User,
            PortRole::User,
        ]);

        Family::Mv6390
            .disable_traffic_classes(&mut bus, AdmissionControl::Standard)
            .unwrap();

        let expected: Vec<Access> = [0u8, 2, 3]
            .into_iter()
            .flat_map(|p| {
                (0..8u8).map(move |pcp| {
                    let entry = ingress_pcp_entry(QpriAssignment { fpri: pcp, qpri: pcp });
                    Access::write(RegSpace::Port(p), port::IEEE_PRIO_MAP_TABLE, entry)
                })
            })
            .collect();
        assert_eq!(bus.writes(), expected);
    }

    #[test]
    fn disable_8q_failure_leaves_earlier_ports_fully_restored() {
        let mut bus = MockSwitchBus::new(3);
        bus.fail_on(RegSpace::Port(1), port::IEEE_PRIO_MAP_TABLE, IoError::Timeout);

        assert_eq!(
            Family::Mv6390.disable_traffic_classes(&mut bus, AdmissionControl::Enhanced),
            Err(Error::Io(IoError::Timeout))
        );

        let writes = bus.writes();
        assert_eq!(writes.len(), 9);
        assert!(writes[..8].iter().all(|w| w.space == RegSpace::Port(0)));
        assert_eq!(writes[8].space, RegSpace::Port(1));
        assert!(bus.accesses_to(RegSpace::Port(2)).is_empty());
        assert!(bus.accesses_to(RegSpace::GlobalAvb).is_empty());
    }
}
