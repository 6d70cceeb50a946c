//! Multi-battery status aggregation for bathud.
//!
//! This crate reads raw counters from the Linux power-supply class and
//! derives whole-system metrics: charge percent, time remaining, time to the
//! configured charge threshold and current power draw.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use bathud_platform::{Batteries, SysfsSource, ThresholdPolicy};
//!
//! let source = Arc::new(SysfsSource::default());
//! let batteries = Batteries::discover(source, ThresholdPolicy::FallbackToFull)?;
//! println!("{}", batteries.hud()?);
//! # Ok::<(), bathud_platform::PowerSupplyError>(())
//! ```

mod aggregator;
mod battery;
mod error;
pub mod format;
mod hud;
mod source;
mod sysfs;
mod types;

pub use aggregator::Batteries;
pub use battery::Battery;
pub use error::{PowerSupplyError, Result};
pub use hud::Hud;
pub use source::{Attribute, PowerSupplySource, BATTERY_PREFIX};
pub use sysfs::{SysfsSource, POWER_SUPPLY_PATH};
pub use types::{AggregateStatus, ChargeState, Estimate, ThresholdPolicy, Units};
