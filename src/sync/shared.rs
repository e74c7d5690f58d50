//! ISR-safe switch wrapper using critical sections.
//!
//! Provides [`SharedSwitch`] for synchronous ISR-safe access to a
//! [`Switch`].

use super::primitives::CriticalSectionCell;
use crate::driver::config::{AvbConfig, AvbPolicy, CbsRequest, State};
use crate::driver::family::Family;
use crate::driver::shaper::ShaperParams;
use crate::driver::switch::Switch;
use crate::error::Result;
use crate::hal::bus::SwitchBus;

/// ISR-safe switch wrapper using critical sections.
///
/// All access goes through `critical_section::with()`, so a whole enable or
/// disable sequence runs with interrupts disabled and no other context can
/// reach the chip registers through this wrapper in the meantime.
///
/// # Example
///
/// ```ignore
/// static SWITCH: SharedSwitch<SmiBus> =
///     SharedSwitch::new(SmiBus::new(), Family::Mv6390, AvbConfig::new());
///
/// SWITCH.with(|switch| {
///     switch.configure_port_shaper(1, &CbsRequest::shape(7, 20_000_000, 1522))
/// })?;
/// ```
pub struct SharedSwitch<B: SwitchBus> {
    inner: CriticalSectionCell<Switch<B>>,
}

impl<B: SwitchBus> SharedSwitch<B> {
    /// Create a new shared switch (const, suitable for static initialization).
    pub const fn new(bus: B, family: Family, config: AvbConfig) -> Self {
        Self {
            inner: CriticalSectionCell::new(Switch::new(bus, family, config)),
        }
    }

    /// Execute a closure with exclusive access to the switch.
    ///
    /// Interrupts are disabled for the duration of the closure.
    #[inline]
    pub fn with<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&mut Switch<B>) -> R,
    {
        self.inner.with(f)
    }

    /// Try to execute a closure, returning `None` if already borrowed.
    #[inline]
    pub fn try_with<R, F>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&mut Switch<B>) -> R,
    {
        self.inner.try_with(f)
    }

    /// Run [`Switch::enable`] under the lock.
    pub fn enable(&self, policy: &AvbPolicy) -> Result<()> {
        self.with(|switch| switch.enable(policy))
    }

    /// Run [`Switch::disable`] under the lock.
    pub fn disable(&self) -> Result<()> {
        self.with(Switch::disable)
    }

    /// Run [`Switch::configure_port_shaper`] under the lock.
    pub fn configure_port_shaper(&self, port: u8, request: &CbsRequest) -> Result<ShaperParams> {
        self.with(|switch| switch.configure_port_shaper(port, request))
    }

    /// Current AVB state.
    pub fn state(&self) -> State {
        self.with(|switch| switch.state())
    }

    /// Consume the wrapper and return the switch.
    pub fn into_inner(self) -> Switch<B> {
        self.inner.into_inner()
    }
}
