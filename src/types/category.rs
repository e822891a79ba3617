use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Activities,
    Food,
    Sights,
    Nature,
    Cultural,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Activities,
        Category::Food,
        Category::Sights,
        Category::Nature,
        Category::Cultural,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Activities => "Activities",
            Category::Food => "Food",
            Category::Sights => "Sights",
            Category::Nature => "Nature",
            Category::Cultural => "Cultural",
        }
    }

    /// Google Places `type` searched for this category.
    pub fn place_type(&self) -> &'static str {
        match self {
            Category::Food => "restaurant",
            Category::Sights => "tourist_attraction",
            Category::Activities => "amusement_park",
            Category::Nature => "park",
            Category::Cultural => "museum",
        }
    }

    /// Free-text term sent alongside the place type.
    pub fn query_term(&self) -> &'static str {
        match self {
            Category::Food => "restaurant",
            Category::Sights => "attraction",
            Category::Activities => "activities",
            Category::Nature => "park",
            Category::Cultural => "museum",
        }
    }

    /// Falls back to every category when the caller selected none.
    pub fn or_default_set(selected: &[Category]) -> Vec<Category> {
        if selected.is_empty() {
            Category::ALL.to_vec()
        } else {
            selected.to_vec()
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
