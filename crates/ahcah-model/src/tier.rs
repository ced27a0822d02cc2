//! Measure/waiver tier classification.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// The two tiers of measures and waivers tracked by the source system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    One,
    Two,
}

impl Tier {
    /// Returns the tier number as used in filenames.
    pub fn as_number(&self) -> u8 {
        match self {
            Tier::One => 1,
            Tier::Two => 2,
        }
    }

    /// Build a tier from its number.
    pub fn from_number(value: u8) -> Result<Self, ModelError> {
        match value {
            1 => Ok(Tier::One),
            2 => Ok(Tier::Two),
            _ => Err(ModelError::UnknownTier {
                value: value.to_string(),
            }),
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_number())
    }
}

impl FromStr for Tier {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(Tier::One),
            "2" => Ok(Tier::Two),
            _ => Err(ModelError::UnknownTier {
                value: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_round_trip() {
        assert_eq!("1".parse::<Tier>().unwrap(), Tier::One);
        assert_eq!(Tier::Two.to_string(), "2");
        assert_eq!(Tier::from_number(2).unwrap(), Tier::Two);
        assert!(Tier::from_number(3).is_err());
        assert!("0".parse::<Tier>().is_err());
    }
}
