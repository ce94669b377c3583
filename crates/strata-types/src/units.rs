use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Length unit declared by a domain object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    Millimeters,
    Centimeters,
    Meters,
    Kilometers,
    Inches,
    Feet,
    Yards,
    Miles,
}

impl Unit {
    /// Metres per one of this unit.
    pub fn meters(self) -> f64 {
        match self {
            Self::Millimeters => 0.001,
            Self::Centimeters => 0.01,
            Self::Meters => 1.0,
            Self::Kilometers => 1000.0,
            Self::Inches => 0.0254,
            Self::Feet => 0.3048,
            Self::Yards => 0.9144,
            Self::Miles => 1609.34,
        }
    }

    pub fn abbreviation(self) -> &'static str {
        match self {
            Self::Millimeters => "mm",
            Self::Centimeters => "cm",
            Self::Meters => "m",
            Self::Kilometers => "km",
            Self::Inches => "in",
            Self::Feet => "ft",
            Self::Yards => "yd",
            Self::Miles => "mi",
        }
    }
}

impl FromStr for Unit {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unit = match s.trim().to_ascii_lowercase().as_str() {
            "mm" | "millimeter" | "millimeters" | "millimetre" | "millimetres" => {
                Self::Millimeters
            }
            "cm" | "centimeter" | "centimeters" | "centimetre" | "centimetres" => {
                Self::Centimeters
            }
            "m" | "meter" | "meters" | "metre" | "metres" => Self::Meters,
            "km" | "kilometer" | "kilometers" | "kilometre" | "kilometres" => Self::Kilometers,
            "in" | "inch" | "inches" => Self::Inches,
            "ft" | "foot" | "feet" => Self::Feet,
            "yd" | "yard" | "yards" => Self::Yards,
            "mi" | "mile" | "miles" => Self::Miles,
            _ => return Err(TypeError::UnknownUnit(s.to_string())),
        };
        Ok(unit)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}

/// Factor that scales coordinates in `units` to metres.
///
/// Absent or unrecognized units leave coordinates untouched (factor 1).
pub fn conversion_factor(units: Option<&str>) -> f64 {
    units
        .and_then(|u| u.parse::<Unit>().ok())
        .map_or(1.0, Unit::meters)
}
