use serde::{Deserialize, Serialize};

use crate::core::types::{CarRecord, Manufacturer};

/// Which record dimension drives the shared X axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum XAxisKind {
    Prices,
    #[default]
    Manufacturers,
}

/// Strategy projecting the configured X dimension to a plot-ready number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XKeyTransformer {
    /// Identity projection over the record price.
    Price,
    /// Fixed ordinal of the manufacturer in enum declaration order; never
    /// re-sorted from data, so the mapping is stable across reloads.
    ManufacturerOrdinal,
}

impl XKeyTransformer {
    /// Static axis-kind to transformer table.
    #[must_use]
    pub const fn for_axis(kind: XAxisKind) -> Self {
        match kind {
            XAxisKind::Prices => Self::Price,
            XAxisKind::Manufacturers => Self::ManufacturerOrdinal,
        }
    }

    #[must_use]
    pub fn project(self, record: &CarRecord) -> f64 {
        match self {
            Self::Price => record.price,
            Self::ManufacturerOrdinal => record.manufacturer.ordinal() as f64,
        }
    }

    /// Tick label for a projected X value.
    ///
    /// Ordinal projections label only exact variant positions; anything else
    /// renders empty, matching an axis that puts one tick per category.
    #[must_use]
    pub fn format_tick(self, value: f64) -> String {
        match self {
            Self::Price => format_tick_number(value),
            Self::ManufacturerOrdinal => {
                let index = value.round();
                if (value - index).abs() > 1e-9 || index < 0.0 {
                    return String::new();
                }
                Manufacturer::ALL
                    .get(index as usize)
                    .map(|make| make.label().to_owned())
                    .unwrap_or_default()
            }
        }
    }

    /// Preferred tick positions for categorical projections, `None` for
    /// continuous ones.
    #[must_use]
    pub fn categorical_tick_values(self) -> Option<Vec<f64>> {
        match self {
            Self::Price => None,
            Self::ManufacturerOrdinal => Some(
                Manufacturer::ALL
                    .iter()
                    .map(|make| make.ordinal() as f64)
                    .collect(),
            ),
        }
    }
}

/// Formats a continuous tick value, trimming the fraction when whole.
#[must_use]
pub fn format_tick_number(value: f64) -> String {
    if value.fract().abs() < 1e-9 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}
