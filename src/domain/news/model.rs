use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    General,
    Technology,
    Business,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::General, Category::Technology, Category::Business];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::General => "general",
            Category::Technology => "technology",
            Category::Business => "business",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "general" => Ok(Category::General),
            "technology" => Ok(Category::Technology),
            "business" => Ok(Category::Business),
            other => Err(format!(
                "unknown category '{other}', expected one of: general, technology, business"
            )),
        }
    }
}

/// A news article as served to clients. Immutable once fetched from the
/// upstream; eviction is governed by the store's retention policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub description: String,
    pub author: String,
    pub url: String,
    pub image_url: String,
    pub published_at: DateTime<Utc>,
    pub category: Category,
    pub source: String,
    pub source_display: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_str_is_case_insensitive() {
        assert_eq!("Technology".parse::<Category>().unwrap(), Category::Technology);
        assert_eq!("GENERAL".parse::<Category>().unwrap(), Category::General);
        assert_eq!("business".parse::<Category>().unwrap(), Category::Business);
    }

    #[test]
    fn test_category_from_str_rejects_unknown() {
        let err = "sports".parse::<Category>().unwrap_err();
        assert!(err.contains("sports"));
        assert!(err.contains("general"));
    }

    #[test]
    fn test_category_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Category::Technology).unwrap(),
            "\"technology\""
        );
    }
}
