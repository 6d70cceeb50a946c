//! Data source contract for battery attributes.

use std::fmt;

use crate::error::Result;
use crate::types::Units;

/// Name prefix shared by every battery entry in the power-supply tree.
pub const BATTERY_PREFIX: &str = "BAT";

/// Fixed set of per-battery attributes read from the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    Status,
    EnergyNow,
    PowerNow,
    EnergyFull,
    ChargeStartThreshold,
    ChargeStopThreshold,
}

impl Attribute {
    pub const ALL: [Attribute; 6] = [
        Attribute::Status,
        Attribute::EnergyNow,
        Attribute::PowerNow,
        Attribute::EnergyFull,
        Attribute::ChargeStartThreshold,
        Attribute::ChargeStopThreshold,
    ];

    /// File name of the attribute under a battery directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            Attribute::Status => "status",
            Attribute::EnergyNow => "energy_now",
            Attribute::PowerNow => "power_now",
            Attribute::EnergyFull => "energy_full",
            Attribute::ChargeStartThreshold => "charge_start_threshold",
            Attribute::ChargeStopThreshold => "charge_stop_threshold",
        }
    }

    /// Counters are the attributes whose file depends on the battery's [`Units`].
    pub fn is_counter(&self) -> bool {
        matches!(
            self,
            Attribute::EnergyNow | Attribute::PowerNow | Attribute::EnergyFull
        )
    }

    /// File name for a battery reporting in `units`.
    pub fn file_name_in(&self, units: Units) -> &'static str {
        match (units, self) {
            (Units::Charge, Attribute::EnergyNow) => "charge_now",
            (Units::Charge, Attribute::PowerNow) => "current_now",
            (Units::Charge, Attribute::EnergyFull) => "charge_full",
            _ => self.file_name(),
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.file_name())
    }
}

/// Supplier of raw battery attributes.
///
/// Every call reads the current value. Implementations must not cache, the
/// hardware changes underneath between reads.
pub trait PowerSupplySource {
    /// Names of all batteries currently present, in no particular order.
    fn battery_names(&self) -> Result<Vec<String>>;

    /// Counter family of a battery. Every counter of one battery is read
    /// from the same family.
    fn units(&self, battery: &str) -> Result<Units>;

    /// Attribute text with surrounding whitespace trimmed.
    fn read_attribute(&self, battery: &str, attribute: Attribute) -> Result<String>;
}
