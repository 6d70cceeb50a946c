//! Shared types for battery reporting.

use std::fmt;

/// Charging state of a single battery, parsed from its `status` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChargeState {
    /// Battery is actively charging
    Charging,
    /// Battery is discharging (on battery power)
    Discharging,
    /// Battery is full
    Full,
    /// External power connected but not charging (e.g., charge threshold reached)
    NotCharging,
    /// Anything else the firmware reports
    #[default]
    Unknown,
}

impl ChargeState {
    /// Classifies raw status text, ignoring case.
    pub fn from_status(status: &str) -> Self {
        let status = status.trim();
        if status.eq_ignore_ascii_case("charging") {
            ChargeState::Charging
        } else if status.eq_ignore_ascii_case("discharging") {
            ChargeState::Discharging
        } else if status.eq_ignore_ascii_case("full") {
            ChargeState::Full
        } else if status.eq_ignore_ascii_case("not charging") {
            ChargeState::NotCharging
        } else {
            ChargeState::Unknown
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ChargeState::Charging => "Charging",
            ChargeState::Discharging => "Discharging",
            ChargeState::Full => "Full",
            ChargeState::NotCharging => "Not charging",
            ChargeState::Unknown => "Unknown",
        }
    }

    pub fn is_charging(&self) -> bool {
        matches!(self, ChargeState::Charging)
    }

    pub fn is_discharging(&self) -> bool {
        matches!(self, ChargeState::Discharging)
    }

    /// Charging or discharging, i.e. the battery is taking part in the power flow.
    pub fn is_active(&self) -> bool {
        self.is_charging() || self.is_discharging()
    }
}

impl fmt::Display for ChargeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Whole-system status derived from every battery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateStatus {
    Charging,
    Discharging,
    AcPower,
}

impl AggregateStatus {
    /// Charging wins over discharging; anything else is AC power.
    pub fn classify<I>(states: I) -> Self
    where
        I: IntoIterator<Item = ChargeState>,
    {
        let mut any_discharging = false;
        for state in states {
            match state {
                ChargeState::Charging => return AggregateStatus::Charging,
                ChargeState::Discharging => any_discharging = true,
                _ => {}
            }
        }

        if any_discharging {
            AggregateStatus::Discharging
        } else {
            AggregateStatus::AcPower
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AggregateStatus::Charging => "charging",
            AggregateStatus::Discharging => "discharging",
            AggregateStatus::AcPower => "ac power",
        }
    }
}

impl fmt::Display for AggregateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// What to do when a battery does not expose `charge_stop_threshold`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThresholdPolicy {
    /// Assume the battery charges to 100%.
    #[default]
    FallbackToFull,
    /// Treat the missing attribute as a read failure.
    Required,
}

/// Counter family a battery reports in.
///
/// Energy-based batteries expose `energy_*`/`power_now` (µWh, µW),
/// charge-based ones `charge_*`/`current_now` (µAh, µA). Hour estimates
/// come out the same either way, but the two never mix in one sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Units {
    #[default]
    Energy,
    Charge,
}

impl Units {
    pub fn label(&self) -> &'static str {
        match self {
            Units::Energy => "energy",
            Units::Charge => "charge",
        }
    }

    /// Symbol of the rate counter once scaled down from micro-units.
    pub fn rate_symbol(&self) -> &'static str {
        match self {
            Units::Energy => "W",
            Units::Charge => "A",
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Result of a rate-based time estimate, in hours.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Estimate {
    /// The estimate does not apply in the current state (e.g. on AC power).
    NotApplicable,
    /// Power draw is zero, so no rate can be derived.
    RateUnknown,
    /// Hours until empty or until the charge target. May be negative for
    /// time-to-charge when batteries sit above their stop threshold.
    Hours(f64),
}

impl Estimate {
    /// Divides `amount` by `rate`, yielding `RateUnknown` for a zero rate.
    pub fn from_rate(amount: f64, rate: u64) -> Self {
        if rate == 0 {
            Estimate::RateUnknown
        } else {
            Estimate::Hours(amount / rate as f64)
        }
    }

    pub fn hours(&self) -> Option<f64> {
        match self {
            Estimate::Hours(h) => Some(*h),
            _ => None,
        }
    }

    /// Numeric form: `-1` when not applicable, infinity when the rate is unknown.
    pub fn sentinel(&self) -> f64 {
        match self {
            Estimate::NotApplicable => -1.0,
            Estimate::RateUnknown => f64::INFINITY,
            Estimate::Hours(h) => *h,
        }
    }
}
