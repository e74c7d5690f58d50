//! Core AVB policy engine components.
//!
//! This module contains the building blocks for applying 802.1Qav policy to
//! an 88E6xxx switch:
//!
//! - [`config`] - Policy, shaper request and engine configuration types
//! - [`priority`] - Frame priority to queue priority distribution
//! - [`shaper`] - Credit-based shaper register values
//! - [`family`] - Per-family constants and register encodings
//! - [`switch`] - The enable/disable orchestrator
//!
//! # Example
//!
//! ```ignore
//! use mv88e6xxx_avb::driver::{AvbConfig, AdmissionControl, Family, Switch};
//!
//! let config = AvbConfig::new().with_admission_control(AdmissionControl::Standard);
//! let mut switch = Switch::new(bus, Family::Mv6390, config);
//! ```

// Submodules
pub mod config;
pub mod family;
pub mod priority;
pub mod shaper;
pub mod switch;

// Re-exports for convenience
pub use config::{
    AdmissionControl, AvbClassMap, AvbConfig, AvbPolicy, CbsRequest, PriorityMapEntry, State,
    TrafficClass,
};
pub use family::{Family, FamilyInfo, FpriTable, QueueWindow};
pub use priority::{QpriAssignment, QpriAssignments};
pub use shaper::{ShaperLimits, ShaperParams};
pub use switch::Switch;
