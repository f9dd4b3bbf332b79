//! Category model for backlog cards.
//!
//! Every backlog card belongs to exactly one of four fixed categories. The
//! colour, label and icon tables are exhaustive `match`es so adding a
//! category forces every table to be updated.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kind of place a backlog card proposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Hotels,
    Activities,
    Food,
    Clubs,
}

impl Category {
    /// Categories in the order the catalog panel offers them.
    pub const ALL: [Category; 4] = [
        Category::Activities,
        Category::Food,
        Category::Clubs,
        Category::Hotels,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Hotels => "hotels",
            Category::Activities => "activities",
            Category::Food => "food",
            Category::Clubs => "clubs",
        }
    }

    /// Display label for menus and headers.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Hotels => "Hotels",
            Category::Activities => "Activities",
            Category::Food => "Food",
            Category::Clubs => "Clubs",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Category::Hotels => "🏨",
            Category::Activities => "🎟",
            Category::Food => "🍜",
            Category::Clubs => "🎶",
        }
    }

    /// Hex colour used for cards of this category (e.g., "#3B82F6").
    pub fn color(&self) -> &'static str {
        match self {
            Category::Hotels => "#8B5CF6",
            Category::Activities => "#3B82F6",
            Category::Food => "#F59E0B",
            Category::Clubs => "#EC4899",
        }
    }

    /// Lenient parse used for wire data: anything unknown is an activity.
    pub fn parse_or_default(value: Option<&str>) -> Self {
        value
            .and_then(|v| v.parse().ok())
            .unwrap_or_default()
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::Activities
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown category '{}'", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hotels" => Ok(Category::Hotels),
            "activities" => Ok(Category::Activities),
            "food" => Ok(Category::Food),
            "clubs" => Ok(Category::Clubs),
            _ => Err(UnknownCategory(s.to_string())),
        }
    }
}
