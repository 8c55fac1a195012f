//! Product categories.

use serde::{Deserialize, Serialize};

/// Error returned when a category string is not one of the known values.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid category: {0} (expected men, women, or kids)")]
pub struct CategoryParseError(pub String);

/// The fixed set of shopper categories a product can be listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Men,
    Women,
    Kids,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Self; 3] = [Self::Men, Self::Women, Self::Kids];

    /// The wire/database name of the category.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Men => "men",
            Self::Women => "women",
            Self::Kids => "kids",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = CategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "men" => Ok(Self::Men),
            "women" => Ok(Self::Women),
            "kids" => Ok(Self::Kids),
            other => Err(CategoryParseError(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trips_through_str() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>(), Ok(category));
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(" Kids ".parse::<Category>(), Ok(Category::Kids));
        assert!("babies".parse::<Category>().is_err());
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(
            serde_json::to_string(&Category::Women).unwrap_or_default(),
            "\"women\""
        );
    }
}
