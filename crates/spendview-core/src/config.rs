//! Budget and category configuration
//!
//! Config is loaded with a two-layer resolution:
//! 1. An explicit path, or the override in the user config dir
//!    (~/.config/spendview/config.toml on Linux)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! The category label set is data, not code: hosts can rename, add or drop
//! categories without touching the engine.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::models::Category;

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/default.toml");

/// A configured category and its display icon
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryEntry {
    pub category: Category,
    pub icon: Option<String>,
}

/// The host-supplied set of category labels
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySet {
    entries: Vec<CategoryEntry>,
    fallback: Category,
    default_icon: String,
}

impl CategorySet {
    /// Build a category set; `fallback` must be one of the entries
    pub fn new(
        entries: Vec<CategoryEntry>,
        fallback: impl Into<String>,
        default_icon: impl Into<String>,
    ) -> Result<Self> {
        if entries.is_empty() {
            return Err(Error::Config("At least one category is required".into()));
        }

        let mut seen = HashSet::new();
        for entry in &entries {
            let label = entry.category.as_str().trim();
            if label.is_empty() {
                return Err(Error::Config("Category labels must not be empty".into()));
            }
            if !seen.insert(label.to_lowercase()) {
                return Err(Error::Config(format!("Duplicate category: {}", label)));
            }
        }

        let fallback = fallback.into();
        let fallback = entries
            .iter()
            .find(|e| e.category.as_str().eq_ignore_ascii_case(fallback.trim()))
            .map(|e| e.category.clone())
            .ok_or_else(|| {
                Error::Config(format!(
                    "Fallback category '{}' is not in the category list",
                    fallback
                ))
            })?;

        Ok(Self {
            entries,
            fallback,
            default_icon: default_icon.into(),
        })
    }

    /// Configured labels in configuration order
    pub fn labels(&self) -> Vec<Category> {
        self.entries.iter().map(|e| e.category.clone()).collect()
    }

    pub fn entries(&self) -> &[CategoryEntry] {
        &self.entries
    }

    pub fn fallback(&self) -> &Category {
        &self.fallback
    }

    fn find(&self, raw: &str) -> Option<&Category> {
        let raw = raw.trim();
        self.entries
            .iter()
            .map(|e| &e.category)
            .find(|c| c.as_str().eq_ignore_ascii_case(raw))
    }

    /// Strict lookup: the canonical label, or an error listing valid labels
    pub fn parse(&self, raw: &str) -> Result<Category> {
        self.find(raw).cloned().ok_or_else(|| {
            let valid: Vec<&str> = self.entries.iter().map(|e| e.category.as_str()).collect();
            Error::InvalidInput(format!(
                "Unknown category: {} (valid: {})",
                raw,
                valid.join(", ")
            ))
        })
    }

    /// Lenient lookup: unknown labels map to the fallback category
    pub fn resolve(&self, raw: &str) -> Category {
        match self.find(raw) {
            Some(category) => category.clone(),
            None => {
                warn!(
                    label = raw,
                    fallback = %self.fallback,
                    "Unknown category, using fallback"
                );
                self.fallback.clone()
            }
        }
    }

    /// Display icon for a category, or the default icon
    pub fn icon(&self, raw: &str) -> &str {
        let raw = raw.trim();
        self.entries
            .iter()
            .find(|e| e.category.as_str().eq_ignore_ascii_case(raw))
            .and_then(|e| e.icon.as_deref())
            .unwrap_or(&self.default_icon)
    }
}

/// Runtime configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Monthly spending ceiling
    pub budget: f64,
    /// Months before the current one used for historical averages
    pub baseline_months: usize,
    pub categories: CategorySet,
}

impl Config {
    /// Load config (explicit path, then user override, then embedded default)
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let content = match path {
            Some(path) => {
                info!(path = %path.display(), "Loading config");
                fs::read_to_string(path).map_err(|e| {
                    Error::Config(format!("Failed to read config {}: {}", path.display(), e))
                })?
            }
            None => match default_config_path().filter(|p| p.exists()) {
                Some(default_path) => {
                    info!(path = %default_path.display(), "Loading config override");
                    fs::read_to_string(&default_path).map_err(|e| {
                        Error::Config(format!(
                            "Failed to read config {}: {}",
                            default_path.display(),
                            e
                        ))
                    })?
                }
                None => {
                    debug!("Using embedded default config");
                    DEFAULT_CONFIG.to_string()
                }
            },
        };

        parse_config(&content)
    }
}

impl Default for Config {
    fn default() -> Self {
        parse_config(DEFAULT_CONFIG).expect("embedded default config is valid")
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("spendview").join("config.toml"))
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    budget: f64,
    #[serde(default = "default_baseline_months")]
    baseline_months: usize,
    #[serde(default = "default_fallback")]
    fallback_category: String,
    #[serde(default = "default_icon")]
    default_icon: String,
    categories: Vec<CategoryFile>,
}

#[derive(Debug, Deserialize)]
struct CategoryFile {
    label: String,
    icon: Option<String>,
}

fn default_baseline_months() -> usize {
    3
}

fn default_fallback() -> String {
    "Others".to_string()
}

fn default_icon() -> String {
    "💵".to_string()
}

/// Parse and validate a TOML config document
pub fn parse_config(content: &str) -> Result<Config> {
    let file: ConfigFile = toml::from_str(content)?;

    if !file.budget.is_finite() || file.budget <= 0.0 {
        return Err(Error::Config(format!(
            "budget must be a positive amount, got {}",
            file.budget
        )));
    }
    if file.baseline_months == 0 {
        return Err(Error::Config("baseline_months must be at least 1".into()));
    }

    let entries = file
        .categories
        .into_iter()
        .map(|c| CategoryEntry {
            category: Category::new(c.label.trim()),
            icon: c.icon,
        })
        .collect();
    let categories = CategorySet::new(entries, file.fallback_category, file.default_icon)?;

    Ok(Config {
        budget: file.budget,
        baseline_months: file.baseline_months,
        categories,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_default_config() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.budget, 3000.0);
        assert_eq!(config.baseline_months, 3);

        let labels: Vec<String> = config
            .categories
            .labels()
            .into_iter()
            .map(|c| c.to_string())
            .collect();
        assert_eq!(
            labels,
            vec!["Shopping", "Food", "Transport", "Housing", "Utilities", "Education", "Others"]
        );
        assert_eq!(config.categories.fallback().as_str(), "Others");
    }

    #[test]
    fn test_default_matches_embedded() {
        assert_eq!(Config::default(), parse_config(DEFAULT_CONFIG).unwrap());
    }

    #[test]
    fn test_category_parse_is_case_insensitive() {
        let config = Config::default();
        assert_eq!(config.categories.parse("food").unwrap().as_str(), "Food");
        assert_eq!(config.categories.parse(" HOUSING ").unwrap().as_str(), "Housing");
    }

    #[test]
    fn test_category_parse_rejects_typos() {
        let config = Config::default();
        let err = config.categories.parse("Shoping").unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(err.to_string().contains("Shopping"));
    }

    #[test]
    fn test_category_resolve_falls_back() {
        let config = Config::default();
        assert_eq!(config.categories.resolve("transport").as_str(), "Transport");
        assert_eq!(config.categories.resolve("Gifts").as_str(), "Others");
    }

    #[test]
    fn test_category_icons() {
        let config = Config::default();
        assert_eq!(config.categories.icon("Housing"), "🏠");
        // Configured without an icon
        assert_eq!(config.categories.icon("Utilities"), "💵");
        assert_eq!(config.categories.icon("Unknown"), "💵");
    }

    #[test]
    fn test_custom_config() {
        let config = parse_config(
            r#"
            budget = 1500.0
            baseline_months = 6
            fallback_category = "misc"

            [[categories]]
            label = "Groceries"

            [[categories]]
            label = "Misc"
            "#,
        )
        .unwrap();

        assert_eq!(config.budget, 1500.0);
        assert_eq!(config.baseline_months, 6);
        assert_eq!(config.categories.fallback().as_str(), "Misc");
        assert!(config.categories.parse("groceries").is_ok());
        assert!(config.categories.parse("Food").is_err());
    }

    #[test]
    fn test_invalid_budget() {
        let result = parse_config(
            r#"
            budget = 0.0
            [[categories]]
            label = "Others"
            "#,
        );
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_invalid_baseline_months() {
        let result = parse_config(
            r#"
            budget = 100.0
            baseline_months = 0
            [[categories]]
            label = "Others"
            "#,
        );
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_fallback_must_be_listed() {
        let result = parse_config(
            r#"
            budget = 100.0
            fallback_category = "Other"
            [[categories]]
            label = "Food"
            "#,
        );
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_duplicate_categories() {
        let result = parse_config(
            r#"
            budget = 100.0
            [[categories]]
            label = "Others"
            [[categories]]
            label = "others"
            "#,
        );
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_malformed_toml() {
        let result = parse_config("budget = ");
        assert!(matches!(result, Err(Error::Toml(_))));
    }

    #[test]
    fn test_load_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "budget = 2000.0\n[[categories]]\nlabel = \"Others\"\n[[categories]]\nlabel = \"Food\""
        )
        .unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.budget, 2000.0);
        assert_eq!(config.categories.labels().len(), 2);
    }

    #[test]
    fn test_load_missing_path() {
        let result = Config::load(Some(Path::new("/nonexistent/spendview.toml")));
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
