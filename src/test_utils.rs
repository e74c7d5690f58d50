//! Testing utilities and mock implementations
//!
//! This module provides a mock switch register bus for testing the AVB
//! engine on the host without hardware access.
//!
//! Only available when running `cargo test`.

// Note: The #[cfg(test)] attribute is applied in lib.rs where this module is declared
#![allow(missing_docs)]
#![allow(clippy::std_instead_of_core, clippy::std_instead_of_alloc)]

extern crate std;

use std::collections::{HashMap, HashSet};
use std::vec;
use std::vec::Vec;

use crate::error::{Error, Feature, IoError, Result};
use crate::hal::bus::{PortRole, RegSpace, SwitchBus};

// =============================================================================
// Access Log
// =============================================================================

/// Direction of a logged register access
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessKind {
    Read,
    Write(u16),
}

/// One attempted register access, in bus order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Access {
    pub space: RegSpace,
    pub addr: u8,
    pub kind: AccessKind,
}

impl Access {
    pub const fn read(space: RegSpace, addr: u8) -> Self {
        Self {
            space,
            addr,
            kind: AccessKind::Read,
        }
    }

    pub const fn write(space: RegSpace, addr: u8, value: u16) -> Self {
        Self {
            space,
            addr,
            kind: AccessKind::Write(value),
        }
    }

    pub const fn is_write(&self) -> bool {
        matches!(self.kind, AccessKind::Write(_))
    }
}

// =============================================================================
// Mock Switch Bus
// =============================================================================

/// Mock switch bus for testing the AVB engine without hardware
///
/// Unset registers read as zero. Every attempted access is logged, including
/// ones that fail; a failed write leaves the register unchanged.
///
/// # Example
///
/// ```ignore
/// let mut bus = MockSwitchBus::new(7);
/// bus.set_unsupported(Feature::GlobalQav);
/// bus.fail_on(RegSpace::Global1, 0x18, IoError::Timeout);
///
/// let mut switch = Switch::new(bus, Family::Mv6352, AvbConfig::new());
/// assert!(switch.enable(&policy).is_err());
/// ```
#[derive(Debug, Default)]
pub struct MockSwitchBus {
    /// Register values: (space, addr) -> value
    registers: HashMap<(RegSpace, u8), u16>,
    /// Every attempted access
    log: Vec<Access>,
    /// Port roles, one per port
    roles: Vec<PortRole>,
    /// Register blocks that answer "not supported"
    unsupported: HashSet<Feature>,
    /// Registers that fail with a transport error
    faults: HashMap<(RegSpace, u8), IoError>,
}

impl MockSwitchBus {
    /// Create a bus with `num_ports` user ports
    pub fn new(num_ports: u8) -> Self {
        Self {
            roles: vec![PortRole::User; num_ports as usize],
            ..Self::default()
        }
    }

    /// Create a bus with one port per role
    pub fn with_roles(roles: &[PortRole]) -> Self {
        Self {
            roles: roles.to_vec(),
            ..Self::default()
        }
    }

    /// Set a register value
    pub fn set_register(&mut self, space: RegSpace, addr: u8, value: u16) {
        self.registers.insert((space, addr), value);
    }

    /// Get the current value of a register (for test verification)
    pub fn register(&self, space: RegSpace, addr: u8) -> Option<u16> {
        self.registers.get(&(space, addr)).copied()
    }

    /// Make every access to `feature` report [`Error::Unsupported`]
    pub fn set_unsupported(&mut self, feature: Feature) {
        self.unsupported.insert(feature);
    }

    /// Make every access to one register fail with `error`
    pub fn fail_on(&mut self, space: RegSpace, addr: u8, error: IoError) {
        self.faults.insert((space, addr), error);
    }

    /// Stop injecting faults
    pub fn clear_faults(&mut self) {
        self.faults.clear();
        self.unsupported.clear();
    }

    /// All attempted accesses
    pub fn accesses(&self) -> Vec<Access> {
        self.log.clone()
    }

    /// All attempted writes
    pub fn writes(&self) -> Vec<Access> {
        self.log.iter().copied().filter(Access::is_write).collect()
    }

    /// All attempted accesses to `space`
    pub fn accesses_to(&self, space: RegSpace) -> Vec<Access> {
        self.log.iter().copied().filter(|a| a.space == space).collect()
    }

    /// Clear the access log
    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    fn check(&self, space: RegSpace, addr: u8) -> Result<()> {
        let feature = space.feature();
        if self.unsupported.contains(&feature) {
            return Err(Error::Unsupported(feature));
        }
        if let Some(err) = self.faults.get(&(space, addr)) {
            return Err(Error::Io(*err));
        }
        Ok(())
    }
}

impl SwitchBus for MockSwitchBus {
    fn read(&mut self, space: RegSpace, addr: u8, data: &mut [u16]) -> Result<()> {
        for (offset, word) in data.iter_mut().enumerate() {
            let reg = addr + offset as u8;
            self.log.push(Access::read(space, reg));
            self.check(space, reg)?;
            *word = self.registers.get(&(space, reg)).copied().unwrap_or(0);
        }
        Ok(())
    }

    fn write(&mut self, space: RegSpace, addr: u8, value: u16) -> Result<()> {
        self.log.push(Access::write(space, addr, value));
        self.check(space, addr)?;
        self.registers.insert((space, addr), value);
        Ok(())
    }

    fn num_ports(&self) -> u8 {
        self.roles.len() as u8
    }

    fn port_role(&self, port: u8) -> PortRole {
        self.roles
            .get(port as usize)
            .copied()
            .unwrap_or(PortRole::Unused)
    }
}

// =============================================================================
// Tests for Mock Implementations
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_bus_read_write() {
        let mut bus = MockSwitchBus::new(4);

        bus.set_register(RegSpace::Global1, 0x18, 0xFA50);
        assert_eq!(bus.read_reg(RegSpace::Global1, 0x18).unwrap(), 0xFA50);

        bus.write(RegSpace::Port(1), 0x18, 0x1234).unwrap();
        assert_eq!(bus.register(RegSpace::Port(1), 0x18), Some(0x1234));
        assert_eq!(bus.writes(), [Access::write(RegSpace::Port(1), 0x18, 0x1234)]);
    }

    #[test]
    fn mock_bus_unset_registers_read_zero() {
        let mut bus = MockSwitchBus::new(1);
        let mut data = [0xFFFFu16; 2];
        bus.read(RegSpace::PortQav(0), 0x08, &mut data).unwrap();
        assert_eq!(data, [0, 0]);
        assert_eq!(bus.accesses().len(), 2);
    }

    #[test]
    fn mock_bus_unsupported_feature() {
        let mut bus = MockSwitchBus::new(1);
        bus.set_unsupported(Feature::GlobalQav);

        assert_eq!(
            bus.write(RegSpace::GlobalQav, 0x00, 1),
            Err(Error::Unsupported(Feature::GlobalQav))
        );
        assert_eq!(bus.register(RegSpace::GlobalQav, 0x00), None);
        // The attempt is still logged
        assert_eq!(bus.writes().len(), 1);
    }

    #[test]
    fn mock_bus_fault_injection() {
        let mut bus = MockSwitchBus::new(1);
        bus.fail_on(RegSpace::Global1, 0x0A, IoError::BusFault);

        assert_eq!(
            bus.read_reg(RegSpace::Global1, 0x0A),
            Err(Error::Io(IoError::BusFault))
        );
        assert!(bus.write(RegSpace::Global1, 0x18, 1).is_ok());

        bus.clear_faults();
        assert!(bus.read_reg(RegSpace::Global1, 0x0A).is_ok());
    }

    #[test]
    fn mock_bus_roles_out_of_range_are_unused() {
        let bus = MockSwitchBus::with_roles(&[PortRole::Cpu]);
        assert_eq!(bus.num_ports(), 1);
        assert_eq!(bus.port_role(0), PortRole::Cpu);
        assert_eq!(bus.port_role(5), PortRole::Unused);
    }
}
