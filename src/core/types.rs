use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PlotError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Stable identifier of one record for the lifetime of a loaded dataset.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct CarId(u32);

impl CarId {
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for CarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Car makes of the automobile dataset.
///
/// Declaration order is the fixed ordinal projection table for the
/// manufacturer X axis; it never changes with data contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Manufacturer {
    AlfaRomero,
    Audi,
    Bmw,
    Chevrolet,
    Dodge,
    Honda,
    Isuzu,
    Jaguar,
    Mazda,
    MercedesBenz,
    Mercury,
    Mitsubishi,
    Nissan,
    Peugot,
    Plymouth,
    Porsche,
    Renault,
    Saab,
    Subaru,
    Toyota,
    Volkswagen,
    Volvo,
}

impl Manufacturer {
    pub const ALL: [Self; 22] = [
        Self::AlfaRomero,
        Self::Audi,
        Self::Bmw,
        Self::Chevrolet,
        Self::Dodge,
        Self::Honda,
        Self::Isuzu,
        Self::Jaguar,
        Self::Mazda,
        Self::MercedesBenz,
        Self::Mercury,
        Self::Mitsubishi,
        Self::Nissan,
        Self::Peugot,
        Self::Plymouth,
        Self::Porsche,
        Self::Renault,
        Self::Saab,
        Self::Subaru,
        Self::Toyota,
        Self::Volkswagen,
        Self::Volvo,
    ];

    /// Position in the declaration order, used as the plot-ready projection.
    #[must_use]
    pub const fn ordinal(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::AlfaRomero => "alfa-romero",
            Self::Audi => "audi",
            Self::Bmw => "bmw",
            Self::Chevrolet => "chevrolet",
            Self::Dodge => "dodge",
            Self::Honda => "honda",
            Self::Isuzu => "isuzu",
            Self::Jaguar => "jaguar",
            Self::Mazda => "mazda",
            Self::MercedesBenz => "mercedes-benz",
            Self::Mercury => "mercury",
            Self::Mitsubishi => "mitsubishi",
            Self::Nissan => "nissan",
            Self::Peugot => "peugot",
            Self::Plymouth => "plymouth",
            Self::Porsche => "porsche",
            Self::Renault => "renault",
            Self::Saab => "saab",
            Self::Subaru => "subaru",
            Self::Toyota => "toyota",
            Self::Volkswagen => "volkswagen",
            Self::Volvo => "volvo",
        }
    }
}

impl FromStr for Manufacturer {
    type Err = PlotError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|make| make.label() == value)
            .ok_or_else(|| PlotError::InvalidData(format!("unknown manufacturer `{value}`")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FuelType {
    Diesel,
    Gas,
}

impl FuelType {
    pub const ALL: [Self; 2] = [Self::Diesel, Self::Gas];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Diesel => "diesel",
            Self::Gas => "gas",
        }
    }
}

impl FromStr for FuelType {
    type Err = PlotError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "diesel" => Ok(Self::Diesel),
            "gas" => Ok(Self::Gas),
            _ => Err(PlotError::InvalidData(format!(
                "unknown fuel type `{value}`"
            ))),
        }
    }
}

/// Cylinder counts occurring in the dataset, as an ordinal scale.
///
/// Declaration order is ascending with the missing-value marker first, so
/// deriving `Ord` yields the display/color-domain order directly.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum CylinderCount {
    NotAvailable,
    Two,
    Three,
    Four,
    Five,
    Six,
    Eight,
    Twelve,
}

impl CylinderCount {
    pub const ALL: [Self; 8] = [
        Self::NotAvailable,
        Self::Two,
        Self::Three,
        Self::Four,
        Self::Five,
        Self::Six,
        Self::Eight,
        Self::Twelve,
    ];

    #[must_use]
    pub const fn count(self) -> Option<u8> {
        match self {
            Self::NotAvailable => None,
            Self::Two => Some(2),
            Self::Three => Some(3),
            Self::Four => Some(4),
            Self::Five => Some(5),
            Self::Six => Some(6),
            Self::Eight => Some(8),
            Self::Twelve => Some(12),
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NotAvailable => "n/a",
            Self::Two => "2",
            Self::Three => "3",
            Self::Four => "4",
            Self::Five => "5",
            Self::Six => "6",
            Self::Eight => "8",
            Self::Twelve => "12",
        }
    }
}

impl FromStr for CylinderCount {
    type Err = PlotError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "" | "?" => Ok(Self::NotAvailable),
            "two" => Ok(Self::Two),
            "three" => Ok(Self::Three),
            "four" => Ok(Self::Four),
            "five" => Ok(Self::Five),
            "six" => Ok(Self::Six),
            "eight" => Ok(Self::Eight),
            "twelve" => Ok(Self::Twelve),
            _ => Err(PlotError::InvalidData(format!(
                "unknown cylinder count `{value}`"
            ))),
        }
    }
}

/// One row of the automobile dataset. Never mutated after load; a reload
/// replaces the whole collection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CarRecord {
    pub id: CarId,
    pub price: f64,
    pub manufacturer: Manufacturer,
    pub fuel_type: FuelType,
    pub cylinder_count: CylinderCount,
    pub horsepower: f64,
    pub city_mpg: f64,
    pub highway_mpg: f64,
}
