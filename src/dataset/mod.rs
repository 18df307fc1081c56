//! CSV ingestion for the automobile dataset.
//!
//! Parses the published header-based format (`price`, `make`, `fuel-type`,
//! `num-of-cylinders`, `horsepower`, `city-mpg`, `highway-mpg`) into typed
//! records with sequential ids. Rows with missing numeric fields (`?`) are
//! skipped with a warning; unknown enum words are a hard error.

use tracing::warn;

use crate::core::{CarId, CarRecord, CylinderCount, FuelType, Manufacturer};
use crate::error::{PlotError, PlotResult};

const COLUMN_PRICE: &str = "price";
const COLUMN_MAKE: &str = "make";
const COLUMN_FUEL_TYPE: &str = "fuel-type";
const COLUMN_CYLINDERS: &str = "num-of-cylinders";
const COLUMN_HORSEPOWER: &str = "horsepower";
const COLUMN_CITY_MPG: &str = "city-mpg";
const COLUMN_HIGHWAY_MPG: &str = "highway-mpg";

struct ColumnPositions {
    price: usize,
    make: usize,
    fuel_type: usize,
    cylinders: usize,
    horsepower: usize,
    city_mpg: usize,
    highway_mpg: usize,
}

impl ColumnPositions {
    fn from_header(header: &str) -> PlotResult<Self> {
        let columns: Vec<&str> = header.split(',').map(str::trim).collect();
        let position = |name: &str| {
            columns
                .iter()
                .position(|column| *column == name)
                .ok_or_else(|| {
                    PlotError::InvalidData(format!("csv header is missing column `{name}`"))
                })
        };
        Ok(Self {
            price: position(COLUMN_PRICE)?,
            make: position(COLUMN_MAKE)?,
            fuel_type: position(COLUMN_FUEL_TYPE)?,
            cylinders: position(COLUMN_CYLINDERS)?,
            horsepower: position(COLUMN_HORSEPOWER)?,
            city_mpg: position(COLUMN_CITY_MPG)?,
            highway_mpg: position(COLUMN_HIGHWAY_MPG)?,
        })
    }
}

/// Parses a CSV blob into records, assigning sequential ids in row order.
pub fn parse_cars_csv(text: &str) -> PlotResult<Vec<CarRecord>> {
    let mut lines = text.lines().filter(|line| !line.trim().is_empty());
    let header = lines
        .next()
        .ok_or_else(|| PlotError::InvalidData("csv input has no header row".to_owned()))?;
    let positions = ColumnPositions::from_header(header)?;

    let mut records = Vec::new();
    let mut skipped = 0_usize;
    for (row_index, line) in lines.enumerate() {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        match parse_row(&positions, &fields, row_index)? {
            Some(record) => records.push(record),
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        warn!(skipped, "skipped csv rows with missing numeric fields");
    }
    Ok(records)
}

fn parse_row(
    positions: &ColumnPositions,
    fields: &[&str],
    row_index: usize,
) -> PlotResult<Option<CarRecord>> {
    let field = |position: usize| {
        fields.get(position).copied().ok_or_else(|| {
            PlotError::InvalidData(format!("csv row {row_index} is missing fields"))
        })
    };

    let manufacturer: Manufacturer = field(positions.make)?.parse()?;
    let fuel_type: FuelType = field(positions.fuel_type)?.parse()?;
    let cylinder_count: CylinderCount = field(positions.cylinders)?.parse()?;

    let numeric = |position: usize| field(position).map(|value| value.parse::<f64>().ok());
    let (Some(price), Some(horsepower), Some(city_mpg), Some(highway_mpg)) = (
        numeric(positions.price)?,
        numeric(positions.horsepower)?,
        numeric(positions.city_mpg)?,
        numeric(positions.highway_mpg)?,
    ) else {
        return Ok(None);
    };

    Ok(Some(CarRecord {
        id: CarId::new(row_index as u32),
        price,
        manufacturer,
        fuel_type,
        cylinder_count,
        horsepower,
        city_mpg,
        highway_mpg,
    }))
}
