use serde::{Deserialize, Serialize};

use crate::core::types::CarRecord;
use crate::core::x_key::XKeyTransformer;

/// Inclusive numeric bounds of one plotted dimension.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisLimits {
    pub min: f64,
    pub max: f64,
}

impl AxisLimits {
    /// Degenerate bounds used when no records exist.
    #[must_use]
    pub const fn zero() -> Self {
        Self { min: 0.0, max: 0.0 }
    }

    #[must_use]
    pub const fn at(value: f64) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    #[must_use]
    pub fn contains(self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }

    fn fold(&mut self, value: f64) {
        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
    }
}

impl Default for AxisLimits {
    fn default() -> Self {
        Self::zero()
    }
}

/// Per-dimension limits for one render pass: the projected X dimension plus
/// the three stacked Y dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ChartLimits {
    pub x: AxisLimits,
    pub horsepower: AxisLimits,
    pub city_mpg: AxisLimits,
    pub highway_mpg: AxisLimits,
}

/// Folds min/max for all four plotted dimensions in one pass over the
/// records, projecting X through `transformer`.
///
/// Bounds seed from the first record, so every record's value lies inside
/// the resulting range. Zero records yield `{0, 0}` for every dimension.
#[must_use]
pub fn compute_limits(records: &[CarRecord], transformer: XKeyTransformer) -> ChartLimits {
    let Some(first) = records.first() else {
        return ChartLimits::default();
    };

    let mut limits = ChartLimits {
        x: AxisLimits::at(transformer.project(first)),
        horsepower: AxisLimits::at(first.horsepower),
        city_mpg: AxisLimits::at(first.city_mpg),
        highway_mpg: AxisLimits::at(first.highway_mpg),
    };
    for record in &records[1..] {
        limits.x.fold(transformer.project(record));
        limits.horsepower.fold(record.horsepower);
        limits.city_mpg.fold(record.city_mpg);
        limits.highway_mpg.fold(record.highway_mpg);
    }
    limits
}
