//! Marvell 88E6xxx AVB Policy Engine
//!
//! A `no_std`, `no_alloc` Rust implementation of the Audio Video Bridging
//! (IEEE 802.1Qav) configuration layer for Marvell 88E6xxx Ethernet switches.
//!
//! This crate turns an AVB traffic policy into switch register writes. The
//! eight frame priorities are routed to hardware queues and shaped queues get
//! credit-based shaper parameters. Entering and leaving AVB operation follows
//! a fixed register sequence.
//!
//! # Architecture
//!
//! The crate is organized into three layers:
//!
//! 1. **Engine Layer** ([`driver`]): Policy types, the priority distribution,
//!    shaper arithmetic, the per-family variant table and the [`Switch`]
//!    orchestrator
//! 2. **Bus Layer** ([`hal`]): The [`SwitchBus`] trait through which every
//!    register access is made
//! 3. **Sync Layer** (`sync`): ISR-safe `SharedSwitch` wrapper, behind the
//!    `critical-section` feature
//!
//! ## Standard Compliance
//!
//! - **IEEE 802.1Q**: Eight priority code points, credit-based shaper (idle
//!   slope, hi credit)
//! - **IEEE 802.1BA / Avnu**: SR class A/B on dedicated queues with admission
//!   control through static ATU entries
//!
//! # Supported Switch Families
//!
//! - [`Family::Mv6341`]: 88E6141 / 88E6341, 4 queues
//! - [`Family::Mv6352`]: 88E6172 / 88E6176 / 88E6240 / 88E6352, 4 queues
//! - [`Family::Mv6390`]: 88E6190 / 88E6191 / 88E6290 / 88E6390 (and X variants), 8 queues
//!
//! # Features
//!
//! - `defmt`: Enable defmt formatting for public types and debug traces
//! - `log`: Emit warnings and errors through the `log` facade
//! - `critical-section`: Enable ISR-safe `SharedSwitch` wrapper
//!
//! # Example
//!
//! ```ignore
//! use mv88e6xxx_avb::{
//!     AdmissionControl, AvbConfig, AvbPolicy, CbsRequest, Family, PriorityMapEntry, Switch,
//! };
//!
//! let family = Family::from_product_num(product_num).unwrap();
//!
//! // Configure with builder pattern
//! let config = AvbConfig::new().with_admission_control(AdmissionControl::Enhanced);
//! let mut switch = Switch::new(bus, family, config);
//!
//! // Legacy on queues 0-1, class B on queue 2, class A on queue 3
//! let policy = AvbPolicy::new(
//!     PriorityMapEntry::legacy(0, 2),
//!     PriorityMapEntry::shaped(4, 2),
//!     PriorityMapEntry::shaped(5, 3),
//! );
//! switch.enable(&policy)?;
//!
//! // 20 Mb/s of class A on port 1
//! switch.configure_port_shaper(1, &CbsRequest::shape(3, 20_000_000, 1522))?;
//!
//! switch.disable()?;
//! ```

#![no_std]
#![deny(missing_docs)]
// Clippy lint levels live here; thresholds and config are in clippy.toml.
#![deny(clippy::correctness)]
#![warn(
    clippy::suspicious,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::cloned_instead_of_copied,
    clippy::explicit_iter_loop,
    clippy::implicit_clone,
    clippy::inconsistent_struct_constructor,
    clippy::manual_assert,
    clippy::manual_let_else,
    clippy::match_same_arms,
    clippy::needless_pass_by_value,
    clippy::semicolon_if_nothing_returned,
    clippy::uninlined_format_args,
    clippy::unnested_or_patterns,
    clippy::std_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::alloc_instead_of_core
)]
#![allow(
    clippy::mod_module_files,
    clippy::self_named_module_files,
    clippy::similar_names,
    clippy::too_many_arguments,
    clippy::struct_excessive_bools,
    clippy::fn_params_excessive_bools,
    clippy::type_complexity,
    clippy::must_use_candidate,
    clippy::assertions_on_constants,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::cast_lossless,
    clippy::panic_in_result_fn,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::module_name_repetitions,
    clippy::wildcard_imports,
    clippy::items_after_statements
)]

// =============================================================================
// Modules
// =============================================================================

pub mod constants;
pub mod driver;
pub mod error;
pub mod hal;

// Internal implementation details (pub(crate) only)
mod internal;

#[cfg(feature = "critical-section")]
#[cfg_attr(docsrs, doc(cfg(feature = "critical-section")))]
pub mod sync;

// Test utilities (only available during testing)
#[cfg(test)]
mod test_utils;

// =============================================================================
// Re-exports
// =============================================================================

pub use driver::config::{
    AdmissionControl, AvbClassMap, AvbConfig, AvbPolicy, CbsRequest, PriorityMapEntry, State,
    TrafficClass,
};
pub use driver::family::{Family, FamilyInfo};
pub use driver::shaper::ShaperParams;
pub use driver::switch::Switch;
pub use error::{ConfigError, ConfigResult, Error, Feature, IoError, RangeError, Result};
pub use hal::bus::{PortRole, RegSpace, SwitchBus};

// Re-export sync types when critical-section is enabled
#[cfg(feature = "critical-section")]
pub use sync::SharedSwitch;
