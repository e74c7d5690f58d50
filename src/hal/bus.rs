//! Switch register bus
//!
//! This module defines the narrow interface between the AVB policy engine and
//! whatever transport reaches the switch registers (direct or multi-chip SMI,
//! an MDIO bus, a host driver ioctl). The engine only ever reads or writes
//! 16-bit words in one of a handful of logical register spaces and asks which
//! ports face users.
//!
//! A bus signals a register block the family does not implement by returning
//! [`Error::Unsupported`], which callers can tell apart from a transport
//! failure ([`Error::Io`]).

use crate::error::{Error, Feature, RangeError, Result};

// =============================================================================
// Register Spaces
// =============================================================================

/// Logical register space addressed by a bus access
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegSpace {
    /// Global 1 block
    Global1,
    /// Port block of the given port
    Port(u8),
    /// Global AVB configuration (AVB/TSN indirect access)
    GlobalAvb,
    /// Global Qav configuration
    GlobalQav,
    /// Per-port AVB configuration
    PortAvb(u8),
    /// Per-port Qav configuration
    PortQav(u8),
}

impl RegSpace {
    /// The feature a bus must implement to serve this space
    pub const fn feature(self) -> Feature {
        match self {
            RegSpace::Global1 => Feature::Global1,
            RegSpace::Port(_) => Feature::Port,
            RegSpace::GlobalAvb => Feature::GlobalAvb,
            RegSpace::GlobalQav => Feature::GlobalQav,
            RegSpace::PortAvb(_) => Feature::PortAvb,
            RegSpace::PortQav(_) => Feature::PortQav,
        }
    }
}

// =============================================================================
// Ports
// =============================================================================

/// Largest port count a bus may report (88E6xxx chips have at most 11)
pub const MAX_PORTS: u8 = 32;

/// Role of a switch port in the fabric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PortRole {
    /// Front-panel port facing an end station
    #[default]
    User,
    /// Port facing the management CPU
    Cpu,
    /// Cascade port to another switch chip
    Dsa,
    /// Port not in use
    Unused,
}

impl PortRole {
    /// Whether AVB policy is applied to this port
    #[inline]
    pub const fn is_user(self) -> bool {
        matches!(self, PortRole::User)
    }
}

// =============================================================================
// Bus Trait
// =============================================================================

/// Trait for switch register access
///
/// Implementations must be called with the chip register lock held; every
/// method runs synchronously to completion.
pub trait SwitchBus {
    /// Read `data.len()` consecutive registers starting at `addr`
    fn read(&mut self, space: RegSpace, addr: u8, data: &mut [u16]) -> Result<()>;

    /// Write one register
    fn write(&mut self, space: RegSpace, addr: u8, value: u16) -> Result<()>;

    /// Number of ports on the chip
    fn num_ports(&self) -> u8;

    /// Role of `port`
    fn port_role(&self, port: u8) -> PortRole;

    /// Read a single register
    fn read_reg(&mut self, space: RegSpace, addr: u8) -> Result<u16> {
        let mut data = [0u16; 1];
        self.read(space, addr, &mut data)?;
        Ok(data[0])
    }

    /// Read-modify-write the bits selected by `mask`
    fn modify_reg(&mut self, space: RegSpace, addr: u8, mask: u16, bits: u16) -> Result<()> {
        let value = self.read_reg(space, addr)?;
        self.write(space, addr, (value & !mask) | (bits & mask))
    }

    /// The user-facing ports, in ascending order
    ///
    /// The set is captured up front so the bus can be written to while
    /// iterating.
    fn user_ports(&self) -> UserPorts {
        let mut mask = 0u32;
        for port in 0..self.num_ports().min(MAX_PORTS) {
            if self.port_role(port).is_user() {
                mask |= 1 << port;
            }
        }
        UserPorts { mask }
    }

    /// Check that `port` exists on this chip
    fn check_port(&self, port: u8) -> Result<()> {
        if port < self.num_ports() {
            Ok(())
        } else {
            Err(Error::Range(RangeError::Port))
        }
    }
}

/// Restartable iterator over a set of user-facing ports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserPorts {
    mask: u32,
}

impl Iterator for UserPorts {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        if self.mask == 0 {
            return None;
        }
        let port = self.mask.trailing_zeros() as u8;
        self.mask &= self.mask - 1;
        Some(port)
    }
}
