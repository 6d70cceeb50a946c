use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use bathud_platform::{Batteries, PowerSupplySource, SysfsSource};
use color_eyre::eyre::{Result, WrapErr};
use tracing::{debug, info};

use crate::config::UserConfig;

pub fn run(config: &UserConfig, watch: bool, samples: u32) -> Result<()> {
    let source = Arc::new(SysfsSource::new(&config.power_supply_root));
    let batteries = Batteries::discover(source, config.threshold_policy())
        .wrap_err("Failed to discover batteries")?;
    info!(count = batteries.len(), "Discovered batteries");

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if !watch {
        return write_report(&batteries, &mut out);
    }

    let interval = Duration::from_millis(config.refresh_ms);
    let mut counter = 0u32;

    loop {
        write_report(&batteries, &mut out)?;

        counter += 1;
        if samples > 0 && counter >= samples {
            break;
        }

        debug!(?interval, "Waiting for next report");
        std::thread::sleep(interval);
    }

    Ok(())
}

/// Writes one full report. Nothing is written if any reading fails.
pub fn write_report<S, W>(batteries: &Batteries<S>, out: &mut W) -> Result<()>
where
    S: PowerSupplySource,
    W: Write,
{
    let hud = batteries
        .hud()
        .wrap_err("Failed to generate battery report")?;
    writeln!(out, "{}", hud)?;
    out.flush()?;
    Ok(())
}
