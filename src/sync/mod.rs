//! Synchronization Support
//!
//! This module provides a critical-section protected wrapper so one switch
//! engine can be shared between tasks and interrupt handlers. It includes:
//!
//! - **Primitives** (`primitives`): [`CriticalSectionCell`], ISR-safe
//!   interior mutability
//! - **Shared Wrappers** (`shared`): [`SharedSwitch`], a [`Switch`](crate::Switch)
//!   whose every sequence runs inside one critical section
//!
//! The critical section is the chip register lock: an enable or disable
//! sequence never interleaves with another register access made through the
//! same wrapper.
//!
//! # Feature Flags
//!
//! - `critical-section`: Enables this module
//!
//! # Example
//!
//! ```ignore
//! use mv88e6xxx_avb::sync::SharedSwitch;
//!
//! static SWITCH: SharedSwitch<MyBus> =
//!     SharedSwitch::new(MyBus::new(), Family::Mv6352, AvbConfig::new());
//!
//! SWITCH.enable(&policy)?;
//! SWITCH.with(|switch| switch.set_class_a_hilimit(1522))?;
//! ```

mod primitives;

pub use primitives::CriticalSectionCell;

mod shared;

pub use shared::SharedSwitch;
