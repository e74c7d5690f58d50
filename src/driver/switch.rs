//! AVB enable/disable orchestration for one switch chip.
//!
//! This module contains the [`Switch`] structure and its operations:
//!
//! - Enabling and disabling AVB policy
//! - Per-port credit-based shaper configuration
//! - Global Class A frame size limit
//! - State and active map inspection
//!
//! # Sequencing
//!
//! Enable runs four steps in order and disable runs them in reverse:
//!
//! | Step | Enable                               | Disable                       |
//! |------|--------------------------------------|-------------------------------|
//! | 1    | ATU static entries AVB-eligible      | user ports to Legacy mode     |
//! | 2    | reserve isochronous pointers         | restore default priority maps |
//! | 3    | program priority maps                | release isochronous pointers  |
//! | 4    | user ports to Enhanced/Standard mode | ATU AVB eligibility off       |
//!
//! The ATU and isochronous pointer steps only run with enhanced admission
//! control ([`AdmissionControl::Enhanced`](super::config::AdmissionControl)),
//! and are skipped with a warning if the bus reports the register block
//! unsupported. Every other error ends the
//! sequence immediately; steps already applied are not rolled back.
//!
//! The caller must hold the chip's register lock for a whole sequence. With
//! the `critical-section` feature, `sync::SharedSwitch` is a wrapper that
//! does this.

use super::config::{AvbClassMap, AvbConfig, AvbPolicy, CbsRequest, State};
use super::family::Family;
use super::shaper::ShaperParams;
use crate::error::{ConfigError, RangeError, Result};
use crate::hal::bus::{RegSpace, SwitchBus};
use crate::internal::regs::{avb, global1, port_avb, port_qav, qav};

/// Largest usable isochronous pointer reservation shift
const MAX_ISO_PTRS_SHIFT: u8 = 15;

// =============================================================================
// Switch
// =============================================================================

/// AVB policy engine bound to one switch chip
///
/// Owns the register bus for the chip and tracks whether AVB is enabled.
///
/// # Example
///
/// ```ignore
/// let family = Family::from_product_num(product).ok_or(Error::Unsupported(Feature::GlobalAvb))?;
/// let mut switch = Switch::new(bus, family, AvbConfig::new());
///
/// let policy = AvbPolicy::new(
///     PriorityMapEntry::legacy(0, 2),
///     PriorityMapEntry::shaped(4, 2),
///     PriorityMapEntry::shaped(5, 3),
/// );
/// switch.enable(&policy)?;
/// switch.configure_port_shaper(0, &CbsRequest::shape(3, 20_000_000, 1522))?;
/// ```
#[derive(Debug)]
pub struct Switch<B: SwitchBus> {
    bus: B,
    family: Family,
    config: AvbConfig,
    state: State,
    active_map: Option<AvbClassMap>,
}

impl<B: SwitchBus> Switch<B> {
    /// Create a new engine in the [`State::Disabled`] state
    ///
    /// No register is touched until [`enable`](Self::enable) or
    /// [`disable`](Self::disable) is called.
    pub const fn new(bus: B, family: Family, config: AvbConfig) -> Self {
        Self {
            bus,
            family,
            config,
            state: State::Disabled,
            active_map: None,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Current AVB state
    #[inline]
    pub fn state(&self) -> State {
        self.state
    }

    /// Lo/Hi pairs applied by the last successful enable
    #[inline]
    pub fn active_map(&self) -> Option<AvbClassMap> {
        self.active_map
    }

    /// Switch family
    #[inline]
    pub fn family(&self) -> Family {
        self.family
    }

    /// Engine configuration
    #[inline]
    pub fn config(&self) -> &AvbConfig {
        &self.config
    }

    /// Shared access to the register bus
    #[inline]
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Exclusive access to the register bus
    #[inline]
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Consume the engine and return the register bus
    pub fn release(self) -> B {
        self.bus
    }

    // =========================================================================
    // Enable / Disable
    // =========================================================================

    /// Apply `policy` and switch user ports into AVB mode
    ///
    /// The policy and the isochronous pointer count are checked before any
    /// register is written. On a register error the chip is left with the
    /// steps completed so far and the state stays [`State::Enabling`].
    ///
    /// # Errors
    ///
    /// - `ConfigError::AlreadyEnabled` - AVB is already enabled
    /// - `ConfigError::*` - `policy` is not valid for this family
    /// - `RangeError::IsoPointers` - the pointer reservation does not fit
    /// - `Error::Unsupported` / `Error::Io` - from the register bus
    pub fn enable(&mut self, policy: &AvbPolicy) -> Result<()> {
        if self.state == State::Enabled {
            return Err(ConfigError::AlreadyEnabled.into());
        }

        self.family.validate_policy(policy)?;

        let admission = self.config.admission;
        let iso_ptrs = if admission.is_enhanced() {
            Some(self.iso_ptrs_reservation()?)
        } else {
            None
        };

        #[cfg(feature = "defmt")]
        defmt::info!("AVB enable: {} ({})", self.family.info().name, admission);

        self.state = State::Enabling;

        if let Some(count) = iso_ptrs {
            skip_unsupported("ATU AVB", self.set_atu_mac_avb(true))?;
            skip_unsupported("isochronous pointers", self.set_iso_ptrs(count))?;
        }

        self.family
            .enable_traffic_classes(&mut self.bus, policy, admission)?;

        let mode = if admission.is_enhanced() {
            port_avb::MODE_ENHANCED | port_avb::FILTER_BAD_AVB | port_avb::DISCARD_BAD
        } else {
            port_avb::MODE_STANDARD
        };
        self.set_port_modes(mode)?;

        self.state = State::Enabled;
        self.active_map = Some(policy.class_map());

        #[cfg(feature = "defmt")]
        defmt::info!("AVB enabled");

        Ok(())
    }

    /// Return user ports to Legacy mode and restore the default maps
    ///
    /// Allowed in any state. On a register error the remaining steps are not
    /// run and the state stays [`State::Disabling`].
    ///
    /// # Errors
    ///
    /// - `Error::Unsupported` / `Error::Io` - from the register bus
    pub fn disable(&mut self) -> Result<()> {
        let admission = self.config.admission;

        #[cfg(feature = "defmt")]
        defmt::info!("AVB disable: {}", self.family.info().name);

        self.state = State::Disabling;
        self.active_map = None;

        self.set_port_modes(port_avb::MODE_LEGACY)?;

        self.family
            .disable_traffic_classes(&mut self.bus, admission)?;

        if admission.is_enhanced() {
            skip_unsupported("isochronous pointers", self.set_iso_ptrs(0))?;
            skip_unsupported("ATU AVB", self.set_atu_mac_avb(false))?;
        }

        self.state = State::Disabled;

        #[cfg(feature = "defmt")]
        defmt::info!("AVB disabled");

        Ok(())
    }

    // =========================================================================
    // Shaping
    // =========================================================================

    /// Program the credit-based shaper of one queue on `port`
    ///
    /// Does not depend on the AVB state. The rate is written before the
    /// hi-limit.
    ///
    /// # Errors
    ///
    /// - `RangeError::Port` - `port` does not exist
    /// - `RangeError::Queue` - the family has no such queue
    /// - `Error::Unsupported` / `Error::Io` - from the register bus
    pub fn configure_port_shaper(&mut self, port: u8, request: &CbsRequest) -> Result<ShaperParams> {
        self.bus.check_port(port)?;
        if request.queue >= self.family.num_queues() {
            return Err(RangeError::Queue.into());
        }

        let params = self.family.compute_cbs_parameters(request);

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "port {} queue {}: rate {} hilimit {}",
            port,
            request.queue,
            params.rate,
            params.hilimit
        );

        let space = RegSpace::PortQav(port);
        self.bus
            .write(space, port_qav::cfg_rate(request.queue), params.rate)?;
        self.bus
            .write(space, port_qav::cfg_hi_limit(request.queue), params.hilimit)?;

        Ok(params)
    }

    /// Set the largest frame, in bytes, Class A may transmit
    ///
    /// # Errors
    ///
    /// - `RangeError::HiLimit` - `hilimit` does not fit the 11-bit field
    /// - `Error::Unsupported` / `Error::Io` - from the register bus
    pub fn set_class_a_hilimit(&mut self, hilimit: u16) -> Result<()> {
        if hilimit > avb::HI_LIMIT_MASK {
            return Err(RangeError::HiLimit.into());
        }

        self.bus.modify_reg(
            RegSpace::GlobalAvb,
            avb::CFG_HI_LIMIT,
            avb::HI_LIMIT_MASK,
            hilimit & avb::HI_LIMIT_MASK,
        )
    }

    /// Read back the Lo/Hi pairs held by the global AVB register
    pub fn read_class_map(&mut self) -> Result<AvbClassMap> {
        let reg = self.bus.read_reg(RegSpace::GlobalAvb, avb::CFG_AVB)?;
        Ok(self.family.decode_class_map(reg))
    }

    // =========================================================================
    // Sequence Steps
    // =========================================================================

    fn iso_ptrs_reservation(&self) -> Result<u16> {
        let shift = self.config.iso_ptrs_per_port_shift;
        if shift > MAX_ISO_PTRS_SHIFT {
            return Err(RangeError::IsoPointers.into());
        }

        let count = u32::from(self.bus.num_ports()) << shift;
        if count > u32::from(qav::ISO_PTR_MASK) {
            return Err(RangeError::IsoPointers.into());
        }
        Ok(count as u16)
    }

    fn set_atu_mac_avb(&mut self, on: bool) -> Result<()> {
        let bits = if on { global1::ATU_CTL_MAC_AVB } else { 0 };
        self.bus.modify_reg(
            RegSpace::Global1,
            global1::ATU_CTL,
            global1::ATU_CTL_MAC_AVB,
            bits,
        )
    }

    fn set_iso_ptrs(&mut self, count: u16) -> Result<()> {
        #[cfg(feature = "defmt")]
        defmt::debug!("isochronous pointers: {}", count);

        self.bus
            .modify_reg(RegSpace::GlobalQav, qav::CFG, qav::ISO_PTR_MASK, count)
    }

    fn set_port_modes(&mut self, mode: u16) -> Result<()> {
        for port in self.bus.user_ports() {
            if let Err(err) = self.bus.write(RegSpace::PortAvb(port), port_avb::CFG, mode) {
                #[cfg(feature = "log")]
                log::error!("port {port}: AVB mode {mode:#06x} failed: {err}");
                return Err(err);
            }
        }
        Ok(())
    }
}

/// Treat an unsupported register block as a skipped optional step
fn skip_unsupported(step: &'static str, result: Result<()>) -> Result<()> {
    match result {
        Err(err) if err.is_unsupported() => {
            #[cfg(feature = "log")]
            log::warn!("{step}: {err}, skipped");
            #[cfg(not(feature = "log"))]
            let _ = (step, err);
            Ok(())
        }
        other => other,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
