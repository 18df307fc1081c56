use serde::{Deserialize, Serialize};

use crate::error::{PlotError, PlotResult};

/// Pixel interval an axis maps onto.
///
/// `start` may exceed `end`; Y axes use an inverted range so larger domain
/// values land higher on screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelRange {
    pub start: f64,
    pub end: f64,
}

impl PixelRange {
    #[must_use]
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Signed extent; negative for inverted ranges.
    #[must_use]
    pub fn span(self) -> f64 {
        self.end - self.start
    }

    #[must_use]
    pub fn midpoint(self) -> f64 {
        (self.start + self.end) / 2.0
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.start.is_finite() && self.end.is_finite()
    }
}

/// Linear domain-to-pixel mapping tolerating degenerate domains.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_min: f64,
    domain_max: f64,
}

impl LinearScale {
    pub fn new(domain_min: f64, domain_max: f64) -> PlotResult<Self> {
        if !domain_min.is_finite() || !domain_max.is_finite() || domain_min > domain_max {
            return Err(PlotError::InvalidData(
                "scale domain must be finite with min <= max".to_owned(),
            ));
        }
        Ok(Self {
            domain_min,
            domain_max,
        })
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_min, self.domain_max)
    }

    #[must_use]
    pub fn is_degenerate(self) -> bool {
        self.domain_min == self.domain_max
    }

    /// Projects a domain value into `range`.
    ///
    /// A degenerate domain maps every value to the midpoint of the range, so
    /// single-record and all-equal datasets still produce defined positions.
    pub fn project(self, value: f64, range: PixelRange) -> PlotResult<f64> {
        if !range.is_finite() {
            return Err(PlotError::InvalidData(
                "pixel range must be finite".to_owned(),
            ));
        }
        if !value.is_finite() {
            return Err(PlotError::InvalidData("value must be finite".to_owned()));
        }

        let span = self.domain_max - self.domain_min;
        if span == 0.0 {
            return Ok(range.midpoint());
        }
        Ok(range.start + (value - self.domain_min) / span * range.span())
    }
}
