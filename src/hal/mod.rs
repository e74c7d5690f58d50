//! Hardware Abstraction Layer
//!
//! This module defines how the AVB engine reaches the switch registers,
//! without tying it to a particular transport.
//!
//! # Modules
//!
//! - [`bus`]: Register bus trait, register spaces and port roles
//!
//! # Locking
//!
//! A [`SwitchBus`] is assumed to be used with the chip register lock held.
//! The engine never locks on its own; the `sync` module (behind the
//! `critical-section` feature) provides a wrapper.

pub mod bus;

// Re-export commonly used types
pub use bus::{MAX_PORTS, PortRole, RegSpace, SwitchBus, UserPorts};
