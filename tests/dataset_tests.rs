use carplot::core::{CarId, CylinderCount, FuelType, Manufacturer};
use carplot::dataset::parse_cars_csv;
use carplot::error::PlotError;

const HEADER: &str = "make,fuel-type,num-of-cylinders,horsepower,city-mpg,highway-mpg,price";

#[test]
fn parses_typed_records_with_sequential_ids() {
    let csv = format!(
        "{HEADER}\n\
         honda,gas,four,76,30,34,7295\n\
         bmw,gas,six,121,21,28,20970\n\
         mercedes-benz,diesel,five,123,22,25,25552\n"
    );
    let records = parse_cars_csv(&csv).expect("parse");

    assert_eq!(records.len(), 3);
    assert_eq!(records[0].id, CarId::new(0));
    assert_eq!(records[0].manufacturer, Manufacturer::Honda);
    assert_eq!(records[0].cylinder_count, CylinderCount::Four);
    assert_eq!(records[0].price, 7_295.0);
    assert_eq!(records[1].id, CarId::new(1));
    assert_eq!(records[1].horsepower, 121.0);
    assert_eq!(records[2].manufacturer, Manufacturer::MercedesBenz);
    assert_eq!(records[2].fuel_type, FuelType::Diesel);
}

#[test]
fn rows_with_missing_numerics_are_skipped() {
    let csv = format!(
        "{HEADER}\n\
         honda,gas,four,76,30,34,7295\n\
         audi,gas,five,?,?,?,?\n\
         volvo,gas,four,114,23,28,12940\n"
    );
    let records = parse_cars_csv(&csv).expect("parse");

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].manufacturer, Manufacturer::Honda);
    assert_eq!(records[1].manufacturer, Manufacturer::Volvo);
}

#[test]
fn missing_cylinder_word_maps_to_not_available() {
    let csv = format!("{HEADER}\nsubaru,gas,?,82,32,37,7126\n");
    let records = parse_cars_csv(&csv).expect("parse");
    assert_eq!(records[0].cylinder_count, CylinderCount::NotAvailable);
}

#[test]
fn header_order_does_not_matter() {
    let csv = "price,make,fuel-type,num-of-cylinders,horsepower,city-mpg,highway-mpg\n\
               16500,toyota,gas,four,116,24,30\n";
    let records = parse_cars_csv(csv).expect("parse");
    assert_eq!(records[0].manufacturer, Manufacturer::Toyota);
    assert_eq!(records[0].price, 16_500.0);
}

#[test]
fn unknown_enum_words_are_a_hard_error() {
    let csv = format!("{HEADER}\ndelorean,gas,six,130,20,24,65000\n");
    assert!(matches!(parse_cars_csv(&csv), Err(PlotError::InvalidData(_))));

    let csv = format!("{HEADER}\nhonda,steam,four,76,30,34,7295\n");
    assert!(matches!(parse_cars_csv(&csv), Err(PlotError::InvalidData(_))));
}

#[test]
fn missing_header_column_is_a_descriptive_error() {
    let csv = "make,fuel-type,num-of-cylinders,horsepower,city-mpg\nhonda,gas,four,76,30\n";
    let error = parse_cars_csv(csv).expect_err("missing columns");
    let message = error.to_string();
    assert!(message.contains("highway-mpg") || message.contains("price"));
}

#[test]
fn empty_input_is_an_error_and_blank_lines_are_ignored() {
    assert!(parse_cars_csv("").is_err());

    let csv = format!("{HEADER}\n\nhonda,gas,four,76,30,34,7295\n\n");
    let records = parse_cars_csv(&csv).expect("parse");
    assert_eq!(records.len(), 1);
}
