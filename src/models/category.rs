use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::DirectoryError;

/// Topic of a group. The set is closed: a value the store holds that is not listed
/// here is a corrupt record, never a new category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Category {
    Tech,
    Fun,
    Business,
    Education,
    Social,
    Hobbies,
    Sports,
    Other,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Tech,
        Category::Fun,
        Category::Business,
        Category::Education,
        Category::Social,
        Category::Hobbies,
        Category::Sports,
        Category::Other,
    ];

    /// Value persisted in the store and shown to visitors.
    pub fn label(self) -> &'static str {
        match self {
            Category::Tech => "Technologie",
            Category::Fun => "Divertissement",
            Category::Business => "Business",
            Category::Education => "Éducation",
            Category::Social => "Rencontres",
            Category::Hobbies => "Loisirs",
            Category::Sports => "Sports",
            Category::Other => "Autre",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Category::Tech => "Tech",
            Category::Fun => "Fun",
            Category::Business => "Business",
            Category::Education => "Education",
            Category::Social => "Social",
            Category::Hobbies => "Hobbies",
            Category::Sports => "Sports",
            Category::Other => "Other",
        }
    }
}

impl FromStr for Category {
    type Err = DirectoryError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.label() == value || category.name() == value)
            .ok_or_else(|| DirectoryError::DataIntegrity(format!("unknown category {value:?}")))
    }
}

impl TryFrom<String> for Category {
    type Error = DirectoryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.label().to_string()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
