use serde::{Deserialize, Serialize};

use crate::core::{CarRecord, CylinderCount, FuelType};
use crate::render::Color;

/// Which categorical record property drives point fill colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ColorProperty {
    #[default]
    CylinderCount,
    FuelType,
}

/// One value of the active coloring property's domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Cylinders(CylinderCount),
    Fuel(FuelType),
}

impl Category {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Cylinders(count) => count.label(),
            Self::Fuel(fuel) => fuel.label(),
        }
    }
}

/// Discrete color scale over the declaration-ordered domain of one
/// categorical property.
///
/// The domain is built from the enum, not from data, so swatch colors stay
/// stable across reloads; the range interpolates between two theme endpoint
/// colors.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoricalColorScale {
    property: ColorProperty,
    domain: Vec<Category>,
    start: Color,
    end: Color,
}

impl CategoricalColorScale {
    #[must_use]
    pub fn new(property: ColorProperty, start: Color, end: Color) -> Self {
        let domain = match property {
            ColorProperty::CylinderCount => CylinderCount::ALL
                .iter()
                .copied()
                .map(Category::Cylinders)
                .collect(),
            ColorProperty::FuelType => {
                FuelType::ALL.iter().copied().map(Category::Fuel).collect()
            }
        };
        Self {
            property,
            domain,
            start,
            end,
        }
    }

    #[must_use]
    pub fn property(&self) -> ColorProperty {
        self.property
    }

    #[must_use]
    pub fn domain(&self) -> &[Category] {
        &self.domain
    }

    /// The record's value of the property this scale colors by.
    #[must_use]
    pub fn category_of(&self, record: &CarRecord) -> Category {
        match self.property {
            ColorProperty::CylinderCount => Category::Cylinders(record.cylinder_count),
            ColorProperty::FuelType => Category::Fuel(record.fuel_type),
        }
    }

    #[must_use]
    pub fn color_for(&self, category: Category) -> Color {
        debug_assert!(self.domain.contains(&category), "category outside domain");
        let index = self
            .domain
            .iter()
            .position(|entry| *entry == category)
            .unwrap_or(0);
        let denominator = (self.domain.len().saturating_sub(1)).max(1) as f64;
        self.start.lerp(self.end, index as f64 / denominator)
    }

    #[must_use]
    pub fn color_of(&self, record: &CarRecord) -> Color {
        self.color_for(self.category_of(record))
    }
}
