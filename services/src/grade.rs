use crate::error::GradingError;
use common::config::{self, AppConfig, DEFAULT_MAX_GRADE};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

/// A validated score with exactly two decimal places.
///
/// Only [`GradeBounds::check`] and [`Grade::from_hundredths`] build one, so a
/// `Grade` in hand is always non-negative with at most two decimals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Grade(Decimal);

impl Grade {
    pub fn value(self) -> Decimal {
        self.0
    }

    /// Integer hundredths of a point, the persisted form.
    pub fn to_hundredths(self) -> i64 {
        // Bounded by 999.99, so the mantissa always fits.
        let mut scaled = self.0;
        scaled.rescale(2);
        scaled.mantissa() as i64
    }

    /// Returns `None` for negative input.
    pub fn from_hundredths(hundredths: i64) -> Option<Self> {
        (hundredths >= 0).then(|| Grade(Decimal::new(hundredths, 2)))
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Inclusive range `0.00 ..= max` a grade must fall in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradeBounds {
    max: Decimal,
}

impl Default for GradeBounds {
    fn default() -> Self {
        Self {
            max: DEFAULT_MAX_GRADE,
        }
    }
}

impl GradeBounds {
    /// Returns `None` unless `max` is positive, has at most two decimals and fits
    /// the `999.99` storage limit.
    pub fn new(max: Decimal) -> Option<Self> {
        config::is_valid_max_grade(max).then_some(Self { max })
    }

    /// Bounds taken from `MAX_GRADE`.
    pub fn from_config() -> Self {
        let max = AppConfig::global().max_grade;
        Self::new(max).unwrap_or_else(|| {
            log::warn!(
                "Configured max grade {} is unusable, using {}",
                max,
                DEFAULT_MAX_GRADE
            );
            Self::default()
        })
    }

    pub fn max(&self) -> Decimal {
        self.max
    }

    /// Validates a requested grade. A missing grade is rejected; values with more
    /// than two decimals are rejected rather than rounded.
    pub fn check(&self, grade: Option<Decimal>) -> Result<Grade, GradingError> {
        let value =
            grade.ok_or_else(|| GradingError::InvalidGrade("a grade is required".to_string()))?;

        if value < Decimal::ZERO || value > self.max {
            return Err(GradingError::InvalidGrade(format!(
                "{} is outside 0.00..={:.2}",
                value, self.max
            )));
        }
        if value.normalize().scale() > 2 {
            return Err(GradingError::InvalidGrade(format!(
                "{} has more than two decimals",
                value
            )));
        }

        let mut scaled = value;
        scaled.rescale(2);
        Ok(Grade(scaled))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn accepts_range_edges() {
        let bounds = GradeBounds::default();
        assert_eq!(bounds.check(Some(dec("0"))).unwrap().to_string(), "0.00");
        assert_eq!(bounds.check(Some(dec("100.00"))).unwrap().to_string(), "100.00");
        assert_eq!(bounds.check(Some(dec("85.5"))).unwrap().to_hundredths(), 8550);
    }

    #[test]
    fn rejects_missing_negative_and_too_large() {
        let bounds = GradeBounds::default();
        for input in [None, Some(dec("-1")), Some(dec("100.01")), Some(dec("-0.01"))] {
            assert!(matches!(
                bounds.check(input),
                Err(GradingError::InvalidGrade(_))
            ));
        }
    }

    #[test]
    fn rejects_third_decimal_but_allows_trailing_zeros() {
        let bounds = GradeBounds::default();
        assert!(matches!(
            bounds.check(Some(dec("85.555"))),
            Err(GradingError::InvalidGrade(_))
        ));
        assert_eq!(
            bounds.check(Some(dec("85.500"))).unwrap().to_hundredths(),
            8550
        );
    }

    #[test]
    fn custom_ceiling() {
        let bounds = GradeBounds::new(dec("20")).unwrap();
        assert!(bounds.check(Some(dec("20"))).is_ok());
        assert!(bounds.check(Some(dec("20.5"))).is_err());
    }

    #[test]
    fn ceiling_must_fit_storage() {
        for bad in ["0", "-5", "1000", "999.991", "20.125"] {
            assert_eq!(GradeBounds::new(dec(bad)), None, "{bad}");
        }
        assert_eq!(GradeBounds::new(dec("999.99")).unwrap().max(), dec("999.99"));

        let widest = GradeBounds::new(dec("999.99")).unwrap();
        assert_eq!(widest.check(Some(dec("999.99"))).unwrap().to_hundredths(), 99_999);
    }

    #[test]
    fn hundredths_conversion() {
        let grade = Grade::from_hundredths(9200).unwrap();
        assert_eq!(grade.value(), dec("92"));
        assert_eq!(grade.to_string(), "92.00");
        assert_eq!(grade.to_hundredths(), 9200);
        assert!(Grade::from_hundredths(-1).is_none());
    }
}
