//! Reader for a single physical battery.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::error::{PowerSupplyError, Result};
use crate::format::percent_trunc;
use crate::source::{Attribute, PowerSupplySource};
use crate::types::{ChargeState, Estimate, ThresholdPolicy, Units};

const NO_STOP_THRESHOLD: u8 = 100;
const NO_START_THRESHOLD: u8 = 0;

/// One battery of the host, identified by its directory name (`BAT0`, ...).
///
/// Nothing is cached: every accessor reads the source again, so two calls
/// may observe different hardware states.
pub struct Battery<S> {
    name: String,
    source: Arc<S>,
    threshold_policy: ThresholdPolicy,
}

impl<S> Clone for Battery<S> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            source: Arc::clone(&self.source),
            threshold_policy: self.threshold_policy,
        }
    }
}

impl<S> fmt::Debug for Battery<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Battery")
            .field("name", &self.name)
            .field("threshold_policy", &self.threshold_policy)
            .finish()
    }
}

impl<S: PowerSupplySource> Battery<S> {
    pub fn new(name: impl Into<String>, source: Arc<S>) -> Self {
        Self {
            name: name.into(),
            source,
            threshold_policy: ThresholdPolicy::default(),
        }
    }

    pub fn with_threshold_policy(mut self, policy: ThresholdPolicy) -> Self {
        self.threshold_policy = policy;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw status text as reported by the firmware.
    pub fn status(&self) -> Result<String> {
        self.source.read_attribute(&self.name, Attribute::Status)
    }

    pub fn state(&self) -> Result<ChargeState> {
        Ok(ChargeState::from_status(&self.status()?))
    }

    /// Counter family of `energy_now`, `power_now` and `energy_full`.
    pub fn units(&self) -> Result<Units> {
        self.source.units(&self.name)
    }

    pub fn energy_now(&self) -> Result<u64> {
        self.read_counter(Attribute::EnergyNow)
    }

    /// Instantaneous draw. Some drivers report a signed current, so the
    /// magnitude is used.
    pub fn power_now(&self) -> Result<u64> {
        let value = self.source.read_attribute(&self.name, Attribute::PowerNow)?;
        value
            .parse::<i64>()
            .map(i64::unsigned_abs)
            .map_err(|_| self.invalid(Attribute::PowerNow, value))
    }

    pub fn energy_full(&self) -> Result<u64> {
        self.read_counter(Attribute::EnergyFull)
    }

    pub fn charge_start_threshold(&self) -> Result<u8> {
        self.read_threshold(Attribute::ChargeStartThreshold, NO_START_THRESHOLD)
    }

    /// Percent at which charging stops, 100 when the battery has no threshold
    /// and the policy allows the fallback.
    pub fn charge_stop_threshold(&self) -> Result<u8> {
        self.read_threshold(Attribute::ChargeStopThreshold, NO_STOP_THRESHOLD)
    }

    /// Energy level at which this battery stops charging.
    pub fn energy_charge_threshold(&self) -> Result<f64> {
        let percent = f64::from(self.charge_stop_threshold()?) / 100.0;
        Ok(self.energy_full()? as f64 * percent)
    }

    /// Own charge percent, `None` when the battery reports no capacity.
    pub fn percent(&self) -> Result<Option<f64>> {
        let energy_now = self.energy_now()?;
        let energy_full = self.energy_full()?;
        if energy_full == 0 {
            return Ok(None);
        }
        Ok(Some(percent_trunc(energy_now as f64 / energy_full as f64)))
    }

    pub fn time_remaining(&self) -> Result<Estimate> {
        if !self.state()?.is_discharging() {
            return Ok(Estimate::NotApplicable);
        }
        Ok(Estimate::from_rate(
            self.energy_now()? as f64,
            self.power_now()?,
        ))
    }

    fn read_counter(&self, attribute: Attribute) -> Result<u64> {
        let value = self.source.read_attribute(&self.name, attribute)?;
        value
            .parse::<u64>()
            .map_err(|_| self.invalid(attribute, value))
    }

    fn read_threshold(&self, attribute: Attribute, fallback: u8) -> Result<u8> {
        let value = match self.source.read_attribute(&self.name, attribute) {
            Ok(value) => value,
            Err(e)
                if e.is_missing() && self.threshold_policy == ThresholdPolicy::FallbackToFull =>
            {
                debug!(battery = %self.name, %attribute, fallback, "Threshold not exposed");
                return Ok(fallback);
            }
            Err(e) => return Err(e),
        };

        match value.parse::<u8>() {
            Ok(percent) if percent <= 100 => Ok(percent),
            _ => Err(self.invalid(attribute, value)),
        }
    }

    fn invalid(&self, attribute: Attribute, value: String) -> PowerSupplyError {
        PowerSupplyError::InvalidValue {
            battery: self.name.clone(),
            attribute,
            value,
        }
    }
}
