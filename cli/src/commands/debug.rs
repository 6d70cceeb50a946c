use std::fmt::Display;
use std::io::{self, Write};
use std::sync::Arc;

use color_eyre::eyre::Result;

use bathud_platform::{Attribute, Battery, PowerSupplySource, SysfsSource};

use crate::config::{config_path, runtime_dir, UserConfig};

pub fn run(config: &UserConfig) -> Result<()> {
    println!("bathud debug information");
    println!("{}", "=".repeat(60));

    let source = Arc::new(SysfsSource::new(&config.power_supply_root));
    println!("\n--- Power Supply ---");
    println!("Root: {}", source.root().display());
    println!("Supported: {}", source.is_supported());
    println!("Threshold policy: {:?}", config.threshold_policy());

    let mut names = source.battery_names()?;
    names.sort();
    if names.is_empty() {
        println!("No batteries found");
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for name in &names {
        let battery = Battery::new(name.as_str(), Arc::clone(&source))
            .with_threshold_policy(config.threshold_policy());
        write_battery(&mut out, &battery, source.as_ref())?;
    }

    println!("\n--- Config Paths ---");
    println!("Config: {}", config_path().display());
    println!("Logs: {}", runtime_dir().display());

    println!("\n--- Current Config ---");
    println!("{}", toml::to_string_pretty(config)?);

    Ok(())
}

/// Raw attribute text followed by the values the report would use.
fn write_battery<S, W>(out: &mut W, battery: &Battery<S>, source: &S) -> io::Result<()>
where
    S: PowerSupplySource,
    W: Write,
{
    writeln!(out, "\n--- {} ---", battery.name())?;
    for attribute in Attribute::ALL {
        match source.read_attribute(battery.name(), attribute) {
            Ok(value) => writeln!(out, "{:<24} {}", attribute, value)?,
            Err(e) if e.is_missing() => writeln!(out, "{:<24} (not exposed)", attribute)?,
            Err(e) => writeln!(out, "{:<24} error: {}", attribute, e)?,
        }
    }

    writeln!(out, "Parsed:")?;
    show(out, "units", battery.units())?;
    show(out, "start threshold (%)", battery.charge_start_threshold())?;
    show(out, "stop threshold (%)", battery.charge_stop_threshold())
}

fn show<W: Write, T: Display>(
    out: &mut W,
    label: &str,
    value: bathud_platform::Result<T>,
) -> io::Result<()> {
    match value {
        Ok(value) => writeln!(out, "  {:<22} {}", label, value),
        Err(e) => writeln!(out, "  {:<22} error: {}", label, e),
    }
}
