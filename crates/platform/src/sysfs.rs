use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::error::{PowerSupplyError, Result};
use crate::source::{Attribute, PowerSupplySource, BATTERY_PREFIX};
use crate::types::Units;

pub const POWER_SUPPLY_PATH: &str = "/sys/class/power_supply";

/// Source backed by the kernel power-supply class directory.
#[derive(Debug, Clone)]
pub struct SysfsSource {
    root: PathBuf,
}

impl Default for SysfsSource {
    fn default() -> Self {
        Self::new(POWER_SUPPLY_PATH)
    }
}

impl SysfsSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn is_supported(&self) -> bool {
        self.root.exists()
    }

    fn battery_path(&self, battery: &str) -> PathBuf {
        self.root.join(battery)
    }

    fn unavailable(battery: &str, attribute: Attribute, source: io::Error) -> PowerSupplyError {
        PowerSupplyError::SourceUnavailable {
            battery: battery.to_string(),
            attribute,
            source,
        }
    }
}

impl PowerSupplySource for SysfsSource {
    fn battery_names(&self) -> Result<Vec<String>> {
        if !self.root.exists() {
            return Err(PowerSupplyError::NoPowerSource {
                root: self.root.clone(),
            });
        }

        let entries = fs::read_dir(&self.root).map_err(|_| PowerSupplyError::NoPowerSource {
            root: self.root.clone(),
        })?;

        let names: Vec<String> = entries
            .flatten()
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| name.starts_with(BATTERY_PREFIX))
            .collect();

        debug!(root = %self.root.display(), count = names.len(), "Discovered batteries");
        Ok(names)
    }

    /// `energy_now` selects energy counters, `charge_now` charge counters.
    fn units(&self, battery: &str) -> Result<Units> {
        let dir = self.battery_path(battery);
        for units in [Units::Energy, Units::Charge] {
            let path = dir.join(Attribute::EnergyNow.file_name_in(units));
            match fs::metadata(&path) {
                Ok(_) => return Ok(units),
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => return Err(Self::unavailable(battery, Attribute::EnergyNow, e)),
            }
        }
        Err(Self::unavailable(
            battery,
            Attribute::EnergyNow,
            io::Error::from(io::ErrorKind::NotFound),
        ))
    }

    fn read_attribute(&self, battery: &str, attribute: Attribute) -> Result<String> {
        let file = if attribute.is_counter() {
            attribute.file_name_in(self.units(battery)?)
        } else {
            attribute.file_name()
        };

        let content = fs::read_to_string(self.battery_path(battery).join(file))
            .map_err(|e| Self::unavailable(battery, attribute, e))?;

        let value = content.trim().to_string();
        trace!(battery, %attribute, file, value = %value, "Read attribute");
        Ok(value)
    }
}
