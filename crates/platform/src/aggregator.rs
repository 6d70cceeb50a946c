//! Combines every battery of the host into one report.
//!
//! Each accessor re-reads the source. Metrics that make up a single report
//! may therefore observe slightly different hardware snapshots; at
//! human-scale refresh rates the variance is not visible and no locking
//! is attempted.

use std::sync::Arc;

use tracing::debug;

use crate::battery::Battery;
use crate::error::{PowerSupplyError, Result};
use crate::format::{
    hours_to_duration, humanize_duration, percent_trunc, watts_trunc, DisplayNumber,
};
use crate::hud::{format_percent, Hud};
use crate::source::{Attribute, PowerSupplySource};
use crate::types::{AggregateStatus, ChargeState, Estimate, ThresholdPolicy, Units};

/// Batteries of the host, sorted by name, all reporting the same [`Units`].
pub struct Batteries<S> {
    batteries: Vec<Battery<S>>,
    units: Units,
}

impl<S: PowerSupplySource> Batteries<S> {
    /// Sorts by name and drops duplicate names.
    ///
    /// Fails with [`PowerSupplyError::MixedUnits`] when energy-based and
    /// charge-based batteries are combined.
    pub fn new(mut batteries: Vec<Battery<S>>) -> Result<Self> {
        batteries.sort_by(|a, b| a.name().cmp(b.name()));
        batteries.dedup_by(|a, b| a.name() == b.name());

        let mut first: Option<(&str, Units)> = None;
        for battery in &batteries {
            let units = battery.units()?;
            match first {
                None => first = Some((battery.name(), units)),
                Some((name, expected)) if expected != units => {
                    return Err(PowerSupplyError::MixedUnits {
                        first: name.to_string(),
                        expected,
                        battery: battery.name().to_string(),
                        units,
                    });
                }
                Some(_) => {}
            }
        }
        let units = first.map(|(_, units)| units).unwrap_or_default();

        Ok(Self { batteries, units })
    }

    /// Builds a reader for every battery the source currently lists.
    pub fn discover(source: Arc<S>, policy: ThresholdPolicy) -> Result<Self> {
        let names = source.battery_names()?;
        debug!(?names, ?policy, "Building battery set");

        let batteries = names
            .into_iter()
            .map(|name| Battery::new(name, Arc::clone(&source)).with_threshold_policy(policy))
            .collect();
        Self::new(batteries)
    }

    pub fn batteries(&self) -> &[Battery<S>] {
        &self.batteries
    }

    pub fn len(&self) -> usize {
        self.batteries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.batteries.is_empty()
    }

    /// Counter family shared by every battery, `Energy` for an empty set.
    pub fn units(&self) -> Units {
        self.units
    }

    pub fn energy_now(&self) -> Result<u64> {
        self.checked_sum(Attribute::EnergyNow, Battery::energy_now)
    }

    pub fn power_now(&self) -> Result<u64> {
        self.checked_sum(Attribute::PowerNow, Battery::power_now)
    }

    pub fn energy_full(&self) -> Result<u64> {
        self.checked_sum(Attribute::EnergyFull, Battery::energy_full)
    }

    pub fn energy_charge_threshold(&self) -> Result<f64> {
        self.batteries
            .iter()
            .map(Battery::energy_charge_threshold)
            .sum()
    }

    pub fn status(&self) -> Result<AggregateStatus> {
        let states = self
            .batteries
            .iter()
            .map(Battery::state)
            .collect::<Result<Vec<ChargeState>>>()?;
        Ok(AggregateStatus::classify(states))
    }

    /// Hours until the batteries are empty, from summed energy and draw.
    pub fn time_remaining(&self) -> Result<Estimate> {
        if self.status()? != AggregateStatus::Discharging {
            return Ok(Estimate::NotApplicable);
        }
        Ok(Estimate::from_rate(
            self.energy_now()? as f64,
            self.power_now()?,
        ))
    }

    /// Hours until every battery reaches its stop threshold.
    ///
    /// A battery already above its threshold contributes a negative amount,
    /// which is left unclamped so the remaining batteries still dominate.
    pub fn time_to_charge(&self) -> Result<Estimate> {
        if self.status()? != AggregateStatus::Charging {
            return Ok(Estimate::NotApplicable);
        }

        let mut total_missing = 0.0;
        for battery in &self.batteries {
            total_missing += battery.energy_charge_threshold()? - battery.energy_now()? as f64;
        }

        Ok(Estimate::from_rate(total_missing, self.power_now()?))
    }

    /// System-wide charge percent, `None` when no capacity is reported.
    pub fn battery_percent(&self) -> Result<Option<f64>> {
        let energy_full = self.energy_full()?;
        if energy_full == 0 {
            return Ok(None);
        }
        Ok(Some(percent_trunc(
            self.energy_now()? as f64 / energy_full as f64,
        )))
    }

    pub fn all_battery_percents(&self) -> Result<Vec<Option<f64>>> {
        self.batteries.iter().map(Battery::percent).collect()
    }

    /// Summed draw scaled from micro-units: watts, or amps for a charge-based set.
    pub fn power_now_watts(&self) -> Result<f64> {
        Ok(watts_trunc(self.power_now()?))
    }

    /// First charging or discharging battery, `ac power` when none is.
    pub fn battery_in_use(&self) -> Result<String> {
        for battery in &self.batteries {
            if battery.state()?.is_active() {
                return Ok(battery.name().to_string());
            }
        }
        Ok(AggregateStatus::AcPower.label().to_string())
    }

    pub fn time_remaining_human(&self) -> Result<String> {
        Ok(match self.time_remaining()? {
            Estimate::NotApplicable => "not using battery".to_string(),
            estimate => humanize_estimate(estimate),
        })
    }

    pub fn time_to_charge_human(&self) -> Result<String> {
        Ok(match self.time_to_charge()? {
            Estimate::NotApplicable => "not charging".to_string(),
            estimate => humanize_estimate(estimate),
        })
    }

    pub fn hud(&self) -> Result<Hud> {
        let status = self.status()?;
        let multiple = self.len() > 1;

        let mut summary = format!("{} - ", status);
        if multiple {
            summary.push_str(&format!(
                "batteries: {} - using {} - ",
                self.len(),
                self.battery_in_use()?
            ));
        }
        summary.push_str(&format_percent(self.battery_percent()?));
        if multiple {
            let percents: Vec<String> = self
                .all_battery_percents()?
                .into_iter()
                .map(format_percent)
                .collect();
            summary.push_str(&format!(" ({})", percents.join(", ")));
        }

        let details = match status {
            AggregateStatus::Discharging => vec![
                format!("estimated battery remaining: {}", self.time_remaining_human()?),
                self.draw_line()?,
            ],
            AggregateStatus::Charging => vec![format!(
                "estimated charge time: {}",
                self.time_to_charge_human()?
            )],
            AggregateStatus::AcPower => vec!["using ac power".to_string()],
        };

        Ok(Hud::new(summary, details))
    }

    fn draw_line(&self) -> Result<String> {
        let label = match self.units {
            Units::Energy => "current power draw",
            Units::Charge => "current draw",
        };
        let draw = DisplayNumber(self.power_now_watts()?);
        Ok(format!("{}: {} {}", label, draw, self.units.rate_symbol()))
    }

    /// A sum past `u64::MAX` is reported against the battery that overflowed it.
    fn checked_sum<F>(&self, attribute: Attribute, read: F) -> Result<u64>
    where
        F: Fn(&Battery<S>) -> Result<u64>,
    {
        self.batteries.iter().try_fold(0u64, |total, battery| {
            let value = read(battery)?;
            total
                .checked_add(value)
                .ok_or_else(|| PowerSupplyError::InvalidValue {
                    battery: battery.name().to_string(),
                    attribute,
                    value: value.to_string(),
                })
        })
    }
}

/// Negative hours (already past the target) display as `0:00`.
fn humanize_estimate(estimate: Estimate) -> String {
    match estimate {
        Estimate::Hours(hours) => {
            humanize_duration(hours_to_duration(hours.max(0.0)).unwrap_or_default())
        }
        _ => "unknown".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use std::io;

    use super::*;
    use crate::source::mock::MockSource;

    fn batteries(source: MockSource) -> (Arc<MockSource>, Batteries<MockSource>) {
        let source = Arc::new(source);
        let batteries = Batteries::discover(Arc::clone(&source), ThresholdPolicy::default())
            .expect("mock discovery");
        (source, batteries)
    }

    fn bat<'a>(
        status: &'a str,
        energy_now: &'a str,
        power_now: &'a str,
        energy_full: &'a str,
    ) -> [(Attribute, &'a str); 4] {
        [
            (Attribute::Status, status),
            (Attribute::EnergyNow, energy_now),
            (Attribute::PowerNow, power_now),
            (Attribute::EnergyFull, energy_full),
        ]
    }

    #[test]
    fn test_sorted_and_deduplicated() {
        let source = Arc::new(MockSource::new());
        let set = Batteries::new(vec![
            Battery::new("BAT1", Arc::clone(&source)),
            Battery::new("BAT0", Arc::clone(&source)),
            Battery::new("BAT1", Arc::clone(&source)),
        ])
        .unwrap();

        let names: Vec<&str> = set.batteries().iter().map(Battery::name).collect();
        assert_eq!(names, vec!["BAT0", "BAT1"]);
    }

    #[test]
    fn test_sums() {
        let (_, set) = batteries(
            MockSource::new()
                .battery("BAT0", &bat("Discharging", "4000", "2000", "10000"))
                .battery("BAT1", &bat("Discharging", "6000", "3000", "20000")),
        );

        assert_eq!(set.energy_now().unwrap(), 10000);
        assert_eq!(set.power_now().unwrap(), 5000);
        assert_eq!(set.energy_full().unwrap(), 30000);
        assert_eq!(set.energy_charge_threshold().unwrap(), 30000.0);
    }

    #[test]
    fn test_sum_overflow_is_invalid() {
        let max = u64::MAX.to_string();
        let (_, set) = batteries(
            MockSource::new()
                .battery("BAT0", &bat("Discharging", &max, "1", "10"))
                .battery("BAT1", &bat("Discharging", "1", "1", "10")),
        );

        let err = set.energy_now().unwrap_err();
        assert!(matches!(
            &err,
            PowerSupplyError::InvalidValue {
                battery,
                attribute: Attribute::EnergyNow,
                ..
            } if battery == "BAT1"
        ));
        assert!(set.time_remaining().is_err());
        assert!(set.hud().is_err());
        assert_eq!(set.power_now().unwrap(), 2);
    }

    #[test]
    fn test_mixed_units_are_rejected() {
        let source = MockSource::new()
            .battery("BAT0", &bat("Discharging", "40000000", "10000000", "50000000"))
            .battery("BAT1", &bat("Discharging", "2000000", "1000000", "3000000"));
        source.set_units("BAT1", Units::Charge);
        let source = Arc::new(source);

        let err = Batteries::discover(source, ThresholdPolicy::default())
            .err()
            .expect("mixed set");
        assert!(matches!(
            err,
            PowerSupplyError::MixedUnits {
                expected: Units::Energy,
                units: Units::Charge,
                ..
            }
        ));
    }

    #[test]
    fn test_charge_based_set_reports_amps() {
        let source = MockSource::new()
            .battery("BAT0", &bat("Discharging", "2000000", "1000000", "4000000"))
            .battery("BAT1", &bat("Discharging", "1000000", "500000", "4000000"));
        source.set_units("BAT0", Units::Charge);
        source.set_units("BAT1", Units::Charge);
        let (_, set) = batteries(source);

        assert_eq!(set.units(), Units::Charge);
        assert_eq!(
            set.hud().unwrap().details(),
            &[
                "estimated battery remaining: 2:00".to_string(),
                "current draw: 1.5 A".to_string(),
            ]
        );
    }

    #[test]
    fn test_unreadable_threshold_fails_time_to_charge() {
        let (source, set) = batteries(
            MockSource::new().battery("BAT0", &bat("Charging", "5000", "1500", "10000")),
        );
        source.fail("BAT0", Attribute::ChargeStopThreshold, io::ErrorKind::PermissionDenied);

        let err = set.time_to_charge().unwrap_err();
        assert!(!err.is_missing());
        assert!(set.energy_charge_threshold().is_err());
        assert!(set.hud().is_err());
    }

    #[test]
    fn test_charging_wins_over_discharging() {
        let (_, set) = batteries(
            MockSource::new()
                .battery("BAT0", &bat("Discharging", "4000", "2000", "10000"))
                .battery("BAT1", &bat("Charging", "6000", "3000", "10000")),
        );

        assert_eq!(set.status().unwrap(), AggregateStatus::Charging);
        assert_eq!(set.battery_in_use().unwrap(), "BAT0");
    }

    #[test]
    fn test_time_remaining_two_batteries() {
        let (_, set) = batteries(
            MockSource::new()
                .battery("BAT1", &bat("Discharging", "6000", "3000", "10000"))
                .battery("BAT0", &bat("Discharging", "4000", "2000", "10000")),
        );

        assert_eq!(set.time_remaining().unwrap(), Estimate::Hours(2.0));
        assert_eq!(set.time_remaining_human().unwrap(), "2:00");
    }

    #[test]
    fn test_time_remaining_not_applicable_unless_discharging() {
        let (source, set) = batteries(
            MockSource::new().battery("BAT0", &bat("Charging", "4000", "2000", "10000")),
        );
        assert_eq!(set.time_remaining().unwrap(), Estimate::NotApplicable);
        assert_eq!(set.time_remaining().unwrap().sentinel(), -1.0);
        assert_eq!(set.time_remaining_human().unwrap(), "not using battery");

        source.set("BAT0", Attribute::Status, "Full");
        assert_eq!(set.time_remaining().unwrap().sentinel(), -1.0);
    }

    #[test]
    fn test_time_remaining_with_zero_draw() {
        let (_, set) = batteries(
            MockSource::new().battery("BAT0", &bat("Discharging", "4000", "0", "10000")),
        );
        assert_eq!(set.time_remaining().unwrap(), Estimate::RateUnknown);
        assert_eq!(set.time_remaining_human().unwrap(), "unknown");
    }

    #[test]
    fn test_time_to_charge_uses_stop_threshold() {
        let (source, set) = batteries(
            MockSource::new().battery("BAT0", &bat("Charging", "5000", "1500", "10000")),
        );
        source.set("BAT0", Attribute::ChargeStopThreshold, "80");

        // (8000 - 5000) / 1500
        assert_eq!(set.time_to_charge().unwrap(), Estimate::Hours(2.0));
        assert_eq!(set.time_to_charge_human().unwrap(), "2:00");
    }

    #[test]
    fn test_time_to_charge_keeps_negative_contributions() {
        let (source, set) = batteries(
            MockSource::new()
                .battery("BAT0", &bat("Not charging", "9000", "0", "10000"))
                .battery("BAT1", &bat("Charging", "2000", "1000", "10000")),
        );
        source.set("BAT0", Attribute::ChargeStopThreshold, "80");

        // (8000 - 9000) + (10000 - 2000) = 7000 over 1000
        assert_eq!(set.time_to_charge().unwrap(), Estimate::Hours(7.0));
    }

    #[test]
    fn test_time_to_charge_negative_total_displays_zero() {
        let (source, set) = batteries(
            MockSource::new().battery("BAT0", &bat("Charging", "9000", "1000", "10000")),
        );
        source.set("BAT0", Attribute::ChargeStopThreshold, "80");

        assert_eq!(set.time_to_charge().unwrap(), Estimate::Hours(-1.0));
        assert_eq!(set.time_to_charge_human().unwrap(), "0:00");
    }

    #[test]
    fn test_time_to_charge_not_applicable_when_discharging() {
        let (_, set) = batteries(
            MockSource::new().battery("BAT0", &bat("Discharging", "4000", "2000", "10000")),
        );
        assert_eq!(set.time_to_charge().unwrap(), Estimate::NotApplicable);
        assert_eq!(set.time_to_charge_human().unwrap(), "not charging");
    }

    #[test]
    fn test_percents() {
        let (_, set) = batteries(
            MockSource::new()
                .battery("BAT0", &bat("Discharging", "5000", "0", "10000"))
                .battery("BAT1", &bat("Discharging", "3333", "0", "10000")),
        );

        assert_eq!(set.battery_percent().unwrap(), Some(41.66));
        assert_eq!(
            set.all_battery_percents().unwrap(),
            vec![Some(50.0), Some(33.33)]
        );
    }

    #[test]
    fn test_power_now_watts() {
        let (_, set) = batteries(
            MockSource::new()
                .battery("BAT0", &bat("Discharging", "5000", "7250000", "10000"))
                .battery("BAT1", &bat("Discharging", "5000", "5259999", "10000")),
        );
        assert_eq!(set.power_now_watts().unwrap(), 12.5);
    }

    #[test]
    fn test_full_battery_on_ac() {
        let (source, set) = batteries(
            MockSource::new().battery("BAT0", &bat("Full", "10000", "0", "10000")),
        );
        source.set("BAT0", Attribute::ChargeStopThreshold, "80");

        assert_eq!(set.status().unwrap(), AggregateStatus::AcPower);
        assert_eq!(set.battery_in_use().unwrap(), "ac power");
        assert_eq!(
            set.hud().unwrap().to_string(),
            "ac power - 100.0%\n\tusing ac power"
        );
    }

    #[test]
    fn test_empty_set() {
        let (_, set) = batteries(MockSource::new());

        assert!(set.is_empty());
        assert_eq!(set.status().unwrap(), AggregateStatus::AcPower);
        assert_eq!(set.battery_percent().unwrap(), None);
        assert_eq!(set.time_remaining().unwrap(), Estimate::NotApplicable);
        assert_eq!(set.battery_in_use().unwrap(), "ac power");
        assert_eq!(
            set.hud().unwrap().to_string(),
            "ac power - unavailable\n\tusing ac power"
        );
    }

    #[test]
    fn test_hud_discharging_two_batteries() {
        let (_, set) = batteries(
            MockSource::new()
                .battery("BAT0", &bat("Discharging", "4000000", "2000000", "10000000"))
                .battery("BAT1", &bat("Unknown", "6000000", "3000000", "10000000")),
        );

        let hud = set.hud().unwrap();
        assert_eq!(
            hud.summary(),
            "discharging - batteries: 2 - using BAT0 - 50.0% (40.0%, 60.0%)"
        );
        assert_eq!(
            hud.details(),
            &[
                "estimated battery remaining: 2:00".to_string(),
                "current power draw: 5.0 W".to_string(),
            ]
        );
    }

    #[test]
    fn test_hud_charging_single_battery() {
        let (_, set) = batteries(
            MockSource::new().battery("BAT0", &bat("Charging", "5000", "2500", "10000")),
        );

        assert_eq!(
            set.hud().unwrap().to_string(),
            "charging - 50.0%\n\testimated charge time: 2:00"
        );
    }

    #[test]
    fn test_hud_fails_when_attribute_disappears() {
        let (source, set) = batteries(
            MockSource::new().battery("BAT0", &bat("Discharging", "4000", "2000", "10000")),
        );
        source.remove("BAT0", Attribute::EnergyNow);

        assert!(set.hud().is_err());
    }
}
