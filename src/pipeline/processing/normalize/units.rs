use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::Cell;
use crate::pipeline::processing::validate::predicates::parse_float;

/// `<magnitude><optional whitespace><unit>` at the start; anything after the
/// unit must be punctuation or whitespace
static WEIGHT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<magnitude>[0-9]+(?:\.[0-9]*)?|\.[0-9]+)\s*(?P<unit>kg|ml|g|l)[^A-Za-z0-9]*$")
        .expect("weight pattern is valid")
});

const POUND_SIGN: char = '£';

/// Units accepted in raw weight strings. Litres and millilitres are treated
/// as kilograms and grams (1:1 density).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightUnit {
    Kilogram,
    Gram,
    Litre,
    Millilitre,
}

impl WeightUnit {
    fn from_token(token: &str) -> Option<Self> {
        match token {
            "kg" => Some(WeightUnit::Kilogram),
            "g" => Some(WeightUnit::Gram),
            "l" => Some(WeightUnit::Litre),
            "ml" => Some(WeightUnit::Millilitre),
            _ => None,
        }
    }

    fn kilograms_per_unit(&self) -> f64 {
        match self {
            WeightUnit::Kilogram | WeightUnit::Litre => 1.0,
            WeightUnit::Gram | WeightUnit::Millilitre => 0.001,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanonicalUnit {
    Kilogram,
    PoundSterling,
}

/// A successfully normalized value in its canonical unit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quantity {
    pub value: f64,
    pub unit: CanonicalUnit,
}

/// Parse a raw weight such as `"250g"` or `"1.5 kg"` into kilograms,
/// rounded to 3 decimal places. Unknown units yield `None`.
pub fn normalize_weight(raw: &str) -> Option<Quantity> {
    let captures = WEIGHT.captures(raw.trim())?;
    let magnitude: f64 = captures.name("magnitude")?.as_str().parse().ok()?;
    let unit = WeightUnit::from_token(captures.name("unit")?.as_str())?;
    Some(Quantity {
        value: round_to(magnitude * unit.kilograms_per_unit(), 3),
        unit: CanonicalUnit::Kilogram,
    })
}

pub fn to_kg(raw: &str) -> Option<f64> {
    normalize_weight(raw).map(|q| q.value)
}

/// Parse a sterling price such as `"£9.99"`, rounded to 2 decimal places.
/// Any other currency, or no parseable amount after the `£`, yields `None`.
pub fn normalize_price(raw: &str) -> Option<Quantity> {
    let (_, amount) = raw.split_once(POUND_SIGN)?;
    let value = parse_float(amount).filter(|v| v.is_finite())?;
    Some(Quantity {
        value: round_to(value, 2),
        unit: CanonicalUnit::PoundSterling,
    })
}

pub fn to_gbp(raw: &str) -> Option<f64> {
    normalize_price(raw).map(|q| q.value)
}

/// Convert a raw weight cell to kilograms; anything unparseable becomes `Null`.
/// Numeric cells are taken as already converted.
pub fn weight_cell(cell: Cell) -> Cell {
    match cell {
        Cell::Text(raw) => to_kg(&raw).into(),
        Cell::Integer(value) => Cell::Float(value as f64),
        Cell::Float(value) if value.is_finite() => Cell::Float(value),
        _ => Cell::Null,
    }
}

/// Convert a price cell to GBP. Numeric cells are taken as already converted.
pub fn price_cell(cell: Cell) -> Cell {
    match cell {
        Cell::Text(raw) => to_gbp(&raw).into(),
        Cell::Integer(value) => Cell::Float(value as f64),
        Cell::Float(value) if value.is_finite() => Cell::Float(value),
        _ => Cell::Null,
    }
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_conversions() {
        assert_eq!(to_kg("250g"), Some(0.25));
        assert_eq!(to_kg("1.5kg"), Some(1.5));
        assert_eq!(to_kg("2l"), Some(2.0));
        assert_eq!(to_kg("330ml"), Some(0.33));
        assert_eq!(to_kg(" 400 g "), Some(0.4));
        assert_eq!(to_kg("0.1234kg"), Some(0.123));
    }

    #[test]
    fn test_weight_ignores_trailing_punctuation() {
        assert_eq!(to_kg("77g ."), Some(0.077));
        assert_eq!(to_kg("1kg."), Some(1.0));
        assert_eq!(to_kg("5kgs"), None);
        assert_eq!(to_kg("100g x 4"), None);
    }

    #[test]
    fn test_weight_rejects_unknown_units_and_garbage() {
        assert_eq!(to_kg("3 oz"), None);
        assert_eq!(to_kg("16oz"), None);
        assert_eq!(to_kg("kg"), None);
        assert_eq!(to_kg("12 x 100g"), None);
        assert_eq!(to_kg("9GO9NZ5JTL"), None);
        assert_eq!(to_kg(""), None);
        assert_eq!(to_kg("-5kg"), None);
    }

    #[test]
    fn test_weight_quantity_carries_canonical_unit() {
        let quantity = normalize_weight("500ml").unwrap();
        assert_eq!(quantity.unit, CanonicalUnit::Kilogram);
        assert_eq!(quantity.value, 0.5);
    }

    #[test]
    fn test_price_conversions() {
        assert_eq!(to_gbp("£9.99"), Some(9.99));
        assert_eq!(to_gbp("£ 12"), Some(12.0));
        assert_eq!(to_gbp("£3.14159"), Some(3.14));
        assert_eq!(to_gbp("$9.99"), None);
        assert_eq!(to_gbp("9.99"), None);
        assert_eq!(to_gbp("£"), None);
        assert_eq!(to_gbp("£1,299.00"), None);
        assert_eq!(normalize_price("£2").unwrap().unit, CanonicalUnit::PoundSterling);
    }

    #[test]
    fn test_cells_become_null_when_unparseable() {
        assert_eq!(weight_cell(Cell::text("100g")), Cell::Float(0.1));
        assert_eq!(weight_cell(Cell::text("3 oz")), Cell::Null);
        assert_eq!(weight_cell(Cell::Integer(3)), Cell::Float(3.0));
        assert_eq!(weight_cell(Cell::Float(1.5)), Cell::Float(1.5));
        assert_eq!(weight_cell(Cell::Float(f64::NAN)), Cell::Null);
        assert_eq!(price_cell(Cell::text("£1.50")), Cell::Float(1.5));
        assert_eq!(price_cell(Cell::Float(1.5)), Cell::Float(1.5));
        assert_eq!(price_cell(Cell::text("€1.50")), Cell::Null);
    }
}
