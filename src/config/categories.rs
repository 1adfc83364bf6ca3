//! Category catalog loading from config.toml
//!
//! The catalog is the list of category labels the UI offers in dropdowns.
//! It is presentation data only: transactions accept any non-empty label,
//! so an operator can extend the catalog without touching stored rows.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Built-in catalog used when no config.toml is present.
pub const DEFAULT_CATEGORIES: &[&str] = &[
    "Salary",
    "Food",
    "Rent",
    "Transport",
    "Utilities",
    "Entertainment",
    "Health",
    "Shopping",
    "Travel",
    "Other",
];

/// Configuration structure representing the config.toml file
#[derive(Debug, Deserialize)]
pub struct Catalog {
    /// Category labels, in display order
    pub categories: Vec<String>,
}

impl Catalog {
    /// The built-in catalog as an owned value.
    #[must_use]
    pub fn default_catalog() -> Self {
        Self {
            categories: DEFAULT_CATEGORIES
                .iter()
                .map(|c| (*c).to_string())
                .collect(),
        }
    }
}

/// Loads the category catalog from a TOML file.
///
/// # Errors
/// Returns an error if the file cannot be read or the TOML is invalid.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Catalog> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads the catalog from the default location (./config.toml), falling back
/// to the built-in list when the file is missing or unreadable.
#[must_use]
pub fn load_default_catalog() -> Catalog {
    load_catalog("config.toml").unwrap_or_else(|_| Catalog::default_catalog())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_catalog() {
        let toml_str = r#"
            categories = ["Food", "Rent", "Fun"]
        "#;

        let catalog: Catalog = toml::from_str(toml_str).unwrap();
        assert_eq!(catalog.categories, vec!["Food", "Rent", "Fun"]);
    }

    #[test]
    fn test_default_catalog_is_non_empty() {
        let catalog = Catalog::default_catalog();
        assert!(!catalog.categories.is_empty());
        assert!(catalog.categories.iter().any(|c| c == "Food"));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let result = load_catalog("definitely-not-here.toml");
        assert!(result.is_err());

        // The default loader never fails
        let catalog = load_default_catalog();
        assert!(!catalog.categories.is_empty());
    }
}
