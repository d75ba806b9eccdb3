use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Number of future calendar days to forecast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct ForecastHorizon(u32);

impl ForecastHorizon {
    pub const MIN_DAYS: u32 = 30;
    pub const MAX_DAYS: u32 = 365;
    pub const DEFAULT_DAYS: u32 = 100;

    pub fn new(days: u32) -> Result<Self, ValidationError> {
        if !(Self::MIN_DAYS..=Self::MAX_DAYS).contains(&days) {
            return Err(ValidationError::HorizonOutOfRange {
                value: days,
                min: Self::MIN_DAYS,
                max: Self::MAX_DAYS,
            });
        }
        Ok(Self(days))
    }

    pub const fn days(self) -> u32 {
        self.0
    }
}

impl Default for ForecastHorizon {
    fn default() -> Self {
        Self(Self::DEFAULT_DAYS)
    }
}

impl Display for ForecastHorizon {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} days", self.0)
    }
}

impl TryFrom<u32> for ForecastHorizon {
    type Error = ValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ForecastHorizon> for u32 {
    fn from(value: ForecastHorizon) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_bounds() {
        assert_eq!(ForecastHorizon::new(30).expect("min").days(), 30);
        assert_eq!(ForecastHorizon::new(365).expect("max").days(), 365);
    }

    #[test]
    fn rejects_values_outside_bounds() {
        for days in [0, 29, 366] {
            let err = ForecastHorizon::new(days).expect_err("must fail");
            assert!(matches!(err, ValidationError::HorizonOutOfRange { value, .. } if value == days));
        }
    }
}
