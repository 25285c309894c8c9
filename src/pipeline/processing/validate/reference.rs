use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::error::{EtlError, Result};

/// Read-only lookup sets used by the continent and country-code predicates.
///
/// Built once at start-up and handed to the cleaner; nothing mutates it afterwards.
#[derive(Debug, Clone)]
pub struct ReferenceTables {
    continents: HashSet<String>,
    country_codes: BTreeMap<String, String>,
    continent_corrections: Vec<(String, String)>,
}

/// On-disk shape of the reference artifact
#[derive(Debug, Deserialize)]
struct ReferenceFile {
    continents: Vec<String>,
    country_codes: BTreeMap<String, String>,
    #[serde(default = "default_continent_corrections")]
    continent_corrections: BTreeMap<String, String>,
}

fn default_continent_corrections() -> BTreeMap<String, String> {
    BTreeMap::from([("eeEurope".to_string(), "Europe".to_string())])
}

impl ReferenceTables {
    pub fn new<C, K, N>(continents: C, country_codes: K) -> Self
    where
        C: IntoIterator,
        C::Item: AsRef<str>,
        K: IntoIterator<Item = (N, N)>,
        N: AsRef<str>,
    {
        Self {
            continents: continents
                .into_iter()
                .map(|c| c.as_ref().to_lowercase())
                .collect(),
            country_codes: country_codes
                .into_iter()
                .map(|(code, name)| (code.as_ref().to_uppercase(), name.as_ref().to_string()))
                .collect(),
            continent_corrections: default_continent_corrections().into_iter().collect(),
        }
    }

    /// Replace the literal continent corrections (typo → canonical value)
    pub fn with_continent_corrections<I, S>(mut self, corrections: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        self.continent_corrections = corrections
            .into_iter()
            .map(|(from, to)| (from.into(), to.into()))
            .collect();
        self
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            EtlError::Reference(format!("Failed to read '{}': {}", path.display(), e))
        })?;
        let tables = Self::from_toml_str(&content)?;
        info!(
            continents = tables.continents.len(),
            country_codes = tables.country_codes.len(),
            "Loaded reference tables from {}",
            path.display()
        );
        Ok(tables)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: ReferenceFile = toml::from_str(content)
            .map_err(|e| EtlError::Reference(format!("Invalid reference file: {}", e)))?;
        if file.continents.is_empty() {
            return Err(EtlError::Reference("continent list is empty".to_string()));
        }
        if file.country_codes.is_empty() {
            return Err(EtlError::Reference("country code list is empty".to_string()));
        }
        Ok(Self::new(file.continents, file.country_codes).with_continent_corrections(file.continent_corrections))
    }

    pub fn is_valid_continent(&self, continent: &str) -> bool {
        self.continents.contains(&continent.to_lowercase())
    }

    pub fn is_valid_country_code(&self, country_code: &str) -> bool {
        self.country_codes.contains_key(&country_code.to_uppercase())
    }

    pub fn country_name(&self, country_code: &str) -> Option<&str> {
        self.country_codes
            .get(&country_code.to_uppercase())
            .map(String::as_str)
    }

    /// Known literal fix for a continent value, if one is listed
    pub fn continent_correction(&self, continent: &str) -> Option<&str> {
        self.continent_corrections
            .iter()
            .find(|(from, _)| from == continent)
            .map(|(_, to)| to.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
continents = ["Europe", "America"]

[country_codes]
GB = "United Kingdom"
DE = "Germany"
US = "United States"
"#;

    #[test]
    fn test_loads_from_toml() {
        let tables = ReferenceTables::from_toml_str(SAMPLE).unwrap();
        assert!(tables.is_valid_continent("europe"));
        assert!(tables.is_valid_continent("AMERICA"));
        assert!(!tables.is_valid_continent("Atlantis"));
        assert!(tables.is_valid_country_code("gb"));
        assert!(!tables.is_valid_country_code("XX"));
        assert_eq!(tables.country_name("de"), Some("Germany"));
    }

    #[test]
    fn test_default_corrections_cover_known_typo() {
        let tables = ReferenceTables::from_toml_str(SAMPLE).unwrap();
        assert_eq!(tables.continent_correction("eeEurope"), Some("Europe"));
        assert_eq!(tables.continent_correction("eeAmerica"), None);
    }

    #[test]
    fn test_corrections_can_be_configured() {
        let content = format!("{SAMPLE}\n[continent_corrections]\neeAmerica = \"America\"\n");
        let tables = ReferenceTables::from_toml_str(&content).unwrap();
        assert_eq!(tables.continent_correction("eeAmerica"), Some("America"));
        assert_eq!(tables.continent_correction("eeEurope"), None);
    }

    #[test]
    fn test_rejects_empty_sets() {
        let err = ReferenceTables::from_toml_str("continents = []\n[country_codes]\nGB = \"UK\"\n").unwrap_err();
        assert!(matches!(err, EtlError::Reference(_)));
        let err = ReferenceTables::from_toml_str("continents = [\"Europe\"]\n[country_codes]\n").unwrap_err();
        assert!(matches!(err, EtlError::Reference(_)));
    }

    #[test]
    fn test_load_reports_missing_file() {
        let err = ReferenceTables::load("does/not/exist.toml").unwrap_err();
        assert!(matches!(err, EtlError::Reference(msg) if msg.contains("does/not/exist.toml")));
    }
}
