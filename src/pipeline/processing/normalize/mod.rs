// Normalization: unit conversion and date parsing into canonical cell values

pub mod dates;
pub mod units;

pub use dates::{parse_flexible_date, parse_month_year, DateFormat};
pub use units::{normalize_price, normalize_weight, to_gbp, to_kg, CanonicalUnit, Quantity, WeightUnit};
