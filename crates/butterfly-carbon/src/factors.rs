//! Per-region emission factors

use butterfly_core::{ButterflyError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    #[default]
    India,
}

impl Region {
    pub const ALL: [Region; 1] = [Region::India];

    pub fn name(&self) -> &'static str {
        match self {
            Region::India => "India",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Region {
    type Err = ButterflyError;

    fn from_str(s: &str) -> Result<Self> {
        Region::ALL
            .into_iter()
            .find(|r| r.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ButterflyError::ConfigError(format!("unknown region: {}", s)))
    }
}

/// kg CO2 per unit of each habit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmissionFactors {
    /// per km travelled
    pub transportation: f64,
    /// per kWh consumed
    pub electricity: f64,
    /// per meal eaten
    pub diet: f64,
    /// per kg of waste
    pub waste: f64,
}

impl EmissionFactors {
    pub fn for_region(region: Region) -> Self {
        match region {
            Region::India => Self {
                transportation: 0.14,
                electricity: 0.82,
                diet: 1.25,
                waste: 0.1,
            },
        }
    }
}

impl Default for EmissionFactors {
    fn default() -> Self {
        Self::for_region(Region::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn india_factors() {
        let f = EmissionFactors::for_region(Region::India);
        assert_eq!(f.transportation, 0.14);
        assert_eq!(f.electricity, 0.82);
        assert_eq!(f.diet, 1.25);
        assert_eq!(f.waste, 0.1);
        assert_eq!(EmissionFactors::default(), f);
    }

    #[test]
    fn region_parses_case_insensitively() {
        assert_eq!("india".parse::<Region>().unwrap(), Region::India);
        assert_eq!(" INDIA ".parse::<Region>().unwrap(), Region::India);
        assert!("Atlantis".parse::<Region>().is_err());
    }
}
