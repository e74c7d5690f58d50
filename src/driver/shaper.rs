//! Credit-based shaper register values.
//!
//! Converts a CBS request into the per-queue rate and hi-limit register
//! values of a family. The conversion is pure: it never touches the switch.

use super::config::CbsRequest;

/// Shaper constants of one switch family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ShaperLimits {
    /// Bits per second represented by one rate register unit
    pub rate_unit_bps: u32,
    /// Largest rate register value
    pub max_rate: u16,
    /// Largest hi-limit register value (also "no frame size limit")
    pub max_hilimit: u16,
}

/// Per-queue shaper register values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ShaperParams {
    /// Rate register value
    pub rate: u16,
    /// Hi-limit register value
    pub hilimit: u16,
}

impl ShaperLimits {
    /// Register values for `request`
    ///
    /// The rate is rounded up so a stream is never under-provisioned, and an
    /// enabled shaper is never given a rate of zero.
    pub const fn params(&self, request: &CbsRequest) -> ShaperParams {
        if !request.enable {
            return ShaperParams {
                rate: 0,
                hilimit: self.max_hilimit,
            };
        }

        let units = request.idle_slope_bps.div_ceil(self.rate_unit_bps as u64);
        let rate = clamp(units, self.max_rate);

        let hilimit = if request.hi_credit < 1 {
            1
        } else {
            clamp(request.hi_credit as u64, self.max_hilimit)
        };

        ShaperParams { rate, hilimit }
    }
}

const fn clamp(value: u64, max: u16) -> u16 {
    if value < 1 {
        1
    } else if value > max as u64 {
        max
    } else {
        value as u16
    }
}
