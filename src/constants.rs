/// Column names and fixed vocabularies shared by the cleaners.
/// Names match the upstream source tables, so they stay as plain string constants.

/// Case-insensitive string forms treated as missing values
pub const NULL_MARKERS: [&str; 4] = ["null", "none", "n/a", "nan"];

pub mod user {
    pub const FIRST_NAME: &str = "first_name";
    pub const LAST_NAME: &str = "last_name";
    pub const DATE_OF_BIRTH: &str = "date_of_birth";
    pub const JOIN_DATE: &str = "join_date";
    pub const PHONE_NUMBER: &str = "phone_number";

    pub const REQUIRED: [&str; 5] = [FIRST_NAME, LAST_NAME, DATE_OF_BIRTH, JOIN_DATE, PHONE_NUMBER];
}

pub mod card {
    pub const CARD_NUMBER: &str = "card_number";
    pub const EXPIRY_DATE: &str = "expiry_date";
    pub const DATE_PAYMENT_CONFIRMED: &str = "date_payment_confirmed";

    pub const REQUIRED: [&str; 3] = [CARD_NUMBER, EXPIRY_DATE, DATE_PAYMENT_CONFIRMED];
}

pub mod store {
    pub const STORE_CODE: &str = "store_code";
    pub const CONTINENT: &str = "continent";
    pub const COUNTRY_CODE: &str = "country_code";
    pub const OPENING_DATE: &str = "opening_date";
    pub const LATITUDE: &str = "latitude";
    pub const LONGITUDE: &str = "longitude";
    pub const STAFF_NUMBERS: &str = "staff_numbers";
    /// Empty duplicate of `latitude` produced by the store API
    pub const DUPLICATE_LATITUDE: &str = "lat";

    pub const REQUIRED: [&str; 7] = [
        STORE_CODE,
        CONTINENT,
        COUNTRY_CODE,
        OPENING_DATE,
        LATITUDE,
        LONGITUDE,
        STAFF_NUMBERS,
    ];
    pub const NUMERIC: [&str; 3] = [LATITUDE, LONGITUDE, STAFF_NUMBERS];
}

pub mod product {
    pub const UUID: &str = "uuid";
    pub const DATE_ADDED: &str = "date_added";
    pub const WEIGHT: &str = "weight";
    pub const WEIGHT_IN_KG: &str = "weight_in_kg";
    pub const PRICE: &str = "product_price";
    pub const PRODUCT_CODE: &str = "product_code";
    pub const EAN: &str = "EAN";

    pub const REQUIRED: [&str; 2] = [UUID, DATE_ADDED];
}

pub mod order {
    pub const DATE_UUID: &str = "date_uuid";
    pub const USER_UUID: &str = "user_uuid";
    pub const CARD_NUMBER: &str = "card_number";
    pub const STORE_CODE: &str = "store_code";
    pub const PRODUCT_CODE: &str = "product_code";
    pub const PRODUCT_QUANTITY: &str = "product_quantity";

    /// Leftovers of upstream joins and index exports
    pub const EXTRANEOUS: [&str; 4] = ["first_name", "last_name", "1", "level_0"];

    pub const REQUIRED: [&str; 6] = [
        DATE_UUID,
        USER_UUID,
        CARD_NUMBER,
        STORE_CODE,
        PRODUCT_CODE,
        PRODUCT_QUANTITY,
    ];
}

pub mod event_date {
    pub const DATE_UUID: &str = "date_uuid";

    pub const REQUIRED: [&str; 1] = [DATE_UUID];
}
