//! Errors raised while reading the power-supply tree.

use std::io;
use std::path::PathBuf;

use crate::source::Attribute;
use crate::types::Units;

pub type Result<T> = std::result::Result<T, PowerSupplyError>;

#[derive(Debug, thiserror::Error)]
pub enum PowerSupplyError {
    /// The enumeration root does not exist, so no battery can be discovered.
    #[error("No power supply information at {}", root.display())]
    NoPowerSource { root: PathBuf },

    /// A single attribute of a single battery could not be read.
    #[error("Failed to read {attribute} for {battery}: {source}")]
    SourceUnavailable {
        battery: String,
        attribute: Attribute,
        #[source]
        source: io::Error,
    },

    #[error("Invalid value {value:?} for {attribute} of {battery}")]
    InvalidValue {
        battery: String,
        attribute: Attribute,
        value: String,
    },

    /// Batteries of one set report counters of different families.
    #[error("{battery} reports {units} counters but {first} reports {expected}")]
    MixedUnits {
        first: String,
        expected: Units,
        battery: String,
        units: Units,
    },
}

impl PowerSupplyError {
    /// True when the source simply does not expose the attribute.
    pub fn is_missing(&self) -> bool {
        matches!(
            self,
            PowerSupplyError::SourceUnavailable { source, .. }
                if source.kind() == io::ErrorKind::NotFound
        )
    }
}
