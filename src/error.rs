//! Error types for the AVB policy engine
//!
//! Errors are organized by domain for better diagnostics:
//! - [`ConfigError`]: Caller-supplied policy or sequencing mistakes
//! - [`RangeError`]: Values that do not fit a register field or index
//! - [`IoError`]: Failures reported by the register transport
//! - [`Feature`]: Register blocks a switch family does not implement
//!
//! The unified [`Error`] enum wraps all domain errors and is returned
//! by every operation in this crate. The first error encountered in an
//! enable or disable sequence is returned as-is; nothing is retried and
//! nothing is rolled back.

// =============================================================================
// Configuration Errors
// =============================================================================

/// Invalid configuration errors
///
/// These are detected before any register write of the step that would
/// have consumed the bad value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Frame priority outside 0-7
    InvalidFramePriority,
    /// Lo and Hi classes claim the same frame priority
    FramePriorityCollision,
    /// Queue priority is not at or below the family's highest queue
    InvalidQueuePriority,
    /// Queue priority is outside the window the family allows for this class
    UnsupportedQueuePriority,
    /// Legacy class configured with zero queues
    ZeroLegacyQueueCount,
    /// Legacy queue run extends past the last hardware queue
    LegacyQueueOverflow,
    /// AVB is already enabled on this switch
    AlreadyEnabled,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ConfigError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ConfigError::InvalidFramePriority => "invalid frame priority",
            ConfigError::FramePriorityCollision => "lo and hi frame priorities collide",
            ConfigError::InvalidQueuePriority => "invalid queue priority",
            ConfigError::UnsupportedQueuePriority => "queue priority not supported for class",
            ConfigError::ZeroLegacyQueueCount => "legacy queue count is zero",
            ConfigError::LegacyQueueOverflow => "legacy queues exceed hardware queues",
            ConfigError::AlreadyEnabled => "AVB already enabled",
        }
    }
}

// =============================================================================
// Range Errors
// =============================================================================

/// Register field and index range errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RangeError {
    /// Hi-limit exceeds the frame size field
    HiLimit,
    /// Isochronous pointer count exceeds the pointer field
    IsoPointers,
    /// Port index beyond the switch's port count
    Port,
    /// Queue index beyond the family's queue count
    Queue,
}

impl core::fmt::Display for RangeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl RangeError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            RangeError::HiLimit => "hi-limit out of range",
            RangeError::IsoPointers => "isochronous pointer count out of range",
            RangeError::Port => "port out of range",
            RangeError::Queue => "queue out of range",
        }
    }
}

// =============================================================================
// I/O Errors
// =============================================================================

/// Register transport errors
///
/// Produced by a [`SwitchBus`](crate::hal::SwitchBus) implementation. This
/// crate never inspects them beyond propagation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IoError {
    /// SMI operation timed out
    Timeout,
    /// Bus reported a failed transaction
    BusFault,
}

impl core::fmt::Display for IoError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl IoError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            IoError::Timeout => "register access timed out",
            IoError::BusFault => "register bus fault",
        }
    }
}

// =============================================================================
// Unsupported Features
// =============================================================================

/// Register blocks that may be absent on a given switch family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Feature {
    /// Global 1 registers (ATU control, IEEE priority map)
    Global1,
    /// Per-port registers (IEEE priority mapping table)
    Port,
    /// Global AVB configuration registers
    GlobalAvb,
    /// Global Qav configuration registers
    GlobalQav,
    /// Per-port AVB configuration registers
    PortAvb,
    /// Per-port Qav configuration registers
    PortQav,
}

impl core::fmt::Display for Feature {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Feature {
    /// Returns a human-readable name of the register block
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Feature::Global1 => "global1",
            Feature::Port => "port",
            Feature::GlobalAvb => "global AVB",
            Feature::GlobalQav => "global Qav",
            Feature::PortAvb => "port AVB",
            Feature::PortQav => "port Qav",
        }
    }
}

// =============================================================================
// Unified Error Type
// =============================================================================

/// This enum wraps all domain-specific errors for unified error handling.
///
/// ```ignore
/// match switch.enable(&policy) {
///     Err(Error::Unsupported(Feature::GlobalQav)) => { /* ... */ }
///     Err(Error::Config(ConfigError::UnsupportedQueuePriority)) => { /* ... */ }
///     Err(Error::Io(IoError::Timeout)) => { /* ... */ }
///     _ => {}
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The switch family has no such register block
    Unsupported(Feature),
    /// Configuration error
    Config(ConfigError),
    /// Range error
    Range(RangeError),
    /// Transport error
    Io(IoError),
}

impl Error {
    /// Returns `true` for the "not implemented by this family" signal
    #[inline]
    pub const fn is_unsupported(&self) -> bool {
        matches!(self, Error::Unsupported(_))
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Unsupported(e) => write!(f, "unsupported: {}", e.as_str()),
            Error::Config(e) => write!(f, "config: {}", e.as_str()),
            Error::Range(e) => write!(f, "range: {}", e.as_str()),
            Error::Io(e) => write!(f, "io: {}", e.as_str()),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<RangeError> for Error {
    fn from(e: RangeError) -> Self {
        Error::Range(e)
    }
}

impl From<IoError> for Error {
    fn from(e: IoError) -> Self {
        Error::Io(e)
    }
}

impl From<Feature> for Error {
    fn from(e: Feature) -> Self {
        Error::Unsupported(e)
    }
}

/// Result type alias for AVB operations
pub type Result<T> = core::result::Result<T, Error>;

/// Result type alias for policy validation
pub type ConfigResult<T> = core::result::Result<T, ConfigError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    extern crate std;
    use std::format;

    use super::*;

    #[test]
    fn config_error_as_str_non_empty() {
        let variants = [
            ConfigError::InvalidFramePriority,
            ConfigError::FramePriorityCollision,
            ConfigError::InvalidQueuePriority,
            ConfigError::UnsupportedQueuePriority,
            ConfigError::ZeroLegacyQueueCount,
            ConfigError::LegacyQueueOverflow,
            ConfigError::AlreadyEnabled,
        ];

        for variant in variants {
            assert!(!variant.as_str().is_empty(), "ConfigError::{variant:?} has empty string");
        }
    }

    #[test]
    fn range_error_display() {
        assert_eq!(format!("{}", RangeError::HiLimit), "hi-limit out of range");
    }

    #[test]
    fn unsupported_is_distinct_from_transport_failure() {
        let unsupported: Error = Feature::PortQav.into();
        let transport: Error = IoError::BusFault.into();

        assert!(unsupported.is_unsupported());
        assert!(!transport.is_unsupported());
        assert_ne!(unsupported, transport);
    }

    #[test]
    fn error_display_prefixes_domain() {
        let err = Error::Config(ConfigError::UnsupportedQueuePriority);
        let display = format!("{err}");
        assert!(display.starts_with("config"));
        assert!(display.contains("queue priority"));

        let err = Error::Unsupported(Feature::GlobalQav);
        assert_eq!(format!("{err}"), "unsupported: global Qav");
    }

    #[test]
    fn error_from_domain_errors() {
        assert_eq!(Error::from(RangeError::Queue), Error::Range(RangeError::Queue));
        assert_eq!(
            Error::from(ConfigError::ZeroLegacyQueueCount),
            Error::Config(ConfigError::ZeroLegacyQueueCount)
        );
        assert_eq!(Error::from(IoError::Timeout), Error::Io(IoError::Timeout));
    }
}
