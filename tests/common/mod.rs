#![allow(dead_code)]

use chrono::NaiveDate;
use sales_etl::{Cell, DataCleaner, RecordKind, ReferenceTables, Table};
use std::sync::Arc;

pub const REFERENCE_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/config/reference.toml");

/// Fixed run date so future-date checks are deterministic
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

pub fn reference() -> Arc<ReferenceTables> {
    Arc::new(ReferenceTables::load(REFERENCE_PATH).expect("reference artifact loads"))
}

pub fn cleaner() -> DataCleaner {
    DataCleaner::new(reference()).with_reference_date(today())
}

/// Build a text table; empty strings become nulls
pub fn table(columns: &[&str], rows: &[&[&str]]) -> Table {
    let rows = rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|v| if v.is_empty() { Cell::Null } else { Cell::text(*v) })
                .collect()
        })
        .collect();
    Table::from_rows(columns.iter().copied(), rows).unwrap()
}

pub fn column(table: &Table, name: &str) -> Vec<String> {
    table
        .column_values(name)
        .unwrap()
        .map(|c| c.to_string())
        .collect()
}

pub fn users() -> Table {
    table(
        &["first_name", "last_name", "date_of_birth", "country_code", "phone_number", "join_date", "user_uuid"],
        &[
            &["Sigfried", "Noack", "1990-09-30", "DE", "+49(0) 047905356", "2018-10-10", "93caf182-e4e9-4c6e-bebb-60a1a9dcf9b8"],
            &["Guy", "Allen", "1997-01-13", "GB", "(0161) 496 0674", "2001-06-23", "8fe96c3a-d62d-4eb5-b313-cf12d9126a49"],
            &["Harry", "Lawrence", "1972-09-23", "GB", "020 7946 0018", "2016-12-16", "fc461df4-b919-48b2-909e-55c95a03fe6b"],
            &["NULL", "NULL", "NULL", "NULL", "NULL", "NULL", "NULL"],
            &["Elena", "Martín", "1983 February 07", "GB", "+44(0)1632 960 123", "2007-11-03", "bc0e9bd5-1b5d-4a87-9e0a-27cd25c08b22"],
            &["Tom", "Baker", "1990-01-01", "GB", "020 7946 0018", "1989-05-05", "3e4a5a43-f26b-4c28-b8bb-b7a4ad1f7a2b"],
            &["Ada", "Ng", "1990-01-01", "GB", "020 7946 0018", "2024-06-02", "47f7b9dc-7e5e-4a4e-8b5c-4b1e6c1a2f3d"],
            &["GMRBOMI0O1", "GMRBOMI0O1", "GMRBOMI0O1", "GMRBOMI0O1", "GMRBOMI0O1", "GMRBOMI0O1", "GMRBOMI0O1"],
        ],
    )
}

pub fn cards() -> Table {
    table(
        &["card_number", "expiry_date", "card_provider", "date_payment_confirmed"],
        &[
            &["30060773296197", "09/26", "Diners Club / Carte Blanche", "2015-11-25"],
            &["349624180933183", "10/23", "American Express", "2001-06-18"],
            &["3529023891650490", "06/23", "JCB 16 digit", "December 2000 01"],
            &["NULL", "NULL", "NULL", "NULL"],
            &["VAB9DSB8ZM", "VAB9DSB8ZM", "VAB9DSB8ZM", "VAB9DSB8ZM"],
            &["4971858637664481", "09/28", "VISA 16 digit", "2030-12-26"],
        ],
    )
}

pub fn stores() -> Table {
    table(
        &["store_code", "address", "lat", "latitude", "longitude", "staff_numbers", "opening_date", "store_type", "country_code", "continent"],
        &[
            &["WEB-1388012W", "N/A", "", "N/A", "N/A", "325", "2010-06-12", "Web Portal", "GB", "Europe"],
            &["HI-9B97EE4E", "Flat 72W", "", "51.62907", "-0.74934", "34", "1996-10-25", "Local", "GB", "Europe"],
            &["BL-8387506C", "Baker Street", "", "52.5", "13.4", "13", "2012-03-04", "Local", "DE", "eeEurope"],
            &["NULL", "NULL", "", "NULL", "NULL", "NULL", "NULL", "NULL", "NULL", "NULL"],
            &["YELVM536YT", "YELVM536YT", "", "YELVM536YT", "YELVM536YT", "YELVM536YT", "YELVM536YT", "YELVM536YT", "FP8DLXQVGH", "QMAVR5H3LD"],
            &["NY-AB12CD34", "Broadway", "", "40.7", "-74.0", "40", "2024-06-02", "Super Store", "US", "America"],
            &["LS-0A1B2C3D", "Briggate", "", "53.8", "-1.5", "12", "2024-06-01", "Local", "GB", "Europe"],
        ],
    )
}

pub fn products() -> Table {
    table(
        &["product_name", "product_price", "weight", "category", "EAN", "date_added", "uuid", "removed", "product_code"],
        &[
            &["FurReal Dazzlin' Dimples My Playful Pony", "£39.99", "1.6kg", "toys-and-games", "7425710935115", "2005-12-02", "83dc0a69-f96f-4c34-bcb7-928acae19a94", "Still_avaliable", "R7-3126933h"],
            &["Tiffany's Fork", "£5.00", "16 x 10g", "homeware", "1234567890123", "2010-01-01", "712254d7-aea7-4310-aad9-f1ad27f3a4d9", "Still_avaliable", "C2-7287916l"],
            &["Ghost Costume", "£9.99", "120g", "toys-and-games", "2045823468212", "2006-07-22", "5fdb4d3a-6a62-4f28-a4c4-3cd4cd5a3a5e", "Still_avaliable", "w3-1938716w"],
            &["NULL", "NULL", "NULL", "NULL", "NULL", "NULL", "NULL", "NULL", "NULL"],
            &["Olive Oil", "£4.50", "500ml", "food-and-drink", "8000070033215", "2019-05-10", "b5f9b2c1-0b1e-4e59-9a3a-9e1d2c3b4a5f", "Still_avaliable", "F1-1234567a"],
            &["Time Machine", "£1.00", "1kg", "homeware", "5000000000001", "2030-01-01", "c3a1d2e4-5f6a-4b7c-8d9e-0f1a2b3c4d5e", "Still_avaliable", "T1-1234567a"],
            &["Mystery", "$3.00", "3 oz", "homeware", "5000000000002", "2020-01-01", "d4b2e3f5-6a7b-4c8d-9e0f-1a2b3c4d5e6f", "Still_avaliable", "M1-1234567a"],
        ],
    )
}

pub fn orders() -> Table {
    table(
        &["level_0", "index", "date_uuid", "first_name", "last_name", "user_uuid", "card_number", "store_code", "product_code", "1", "product_quantity"],
        &[
            &["0", "0", "9476f17e-5d6a-4117-874d-9cdb38ca1fa7", "", "", "93caf182-e4e9-4c6e-bebb-60a1a9dcf9b8", "30060773296197", "BL-8387506C", "R7-3126933h", "", "3"],
            &["1", "1", "0423a395-cc0f-4a0b-a8bc-4b5f2c12de4c", "Guy", "Allen", "8fe96c3a-d62d-4eb5-b313-cf12d9126a49", "", "HI-9B97EE4E", "C2-7287916l", "", "4"],
            &["2", "2", "65187294-1b7a-4f4c-8d31-18d3e8b4a1b5", "", "", "fc461df4-b919-48b2-909e-55c95a03fe6b", "349624180933183", "WEB-1388012W", "S7-1175877v", "", "2"],
        ],
    )
}

pub fn event_dates() -> Table {
    table(
        &["timestamp", "month", "year", "day", "time_period", "date_uuid"],
        &[
            &["22:00:06", "9", "2012", "19", "Evening", "3b7ca996-37f9-433f-b6d0-ce8391b615ad"],
            &["22:44:06", "2", "1997", "10", "Evening", "adc86836-6c35-49ca-bb0d-65b6507a00fa"],
            &["NULL", "NULL", "NULL", "NULL", "NULL", "NULL"],
            &["SN0WLJ5BR6", "1YMRDJNU2T", "HYTD3ZNLA5", "ZWSD7VGR4J", "DXBU6GX1VC", "1YMRDJNU2T"],
        ],
    )
}

pub fn fixture(kind: RecordKind) -> Table {
    match kind {
        RecordKind::User => users(),
        RecordKind::Card => cards(),
        RecordKind::Store => stores(),
        RecordKind::Product => products(),
        RecordKind::Order => orders(),
        RecordKind::EventDate => event_dates(),
    }
}
