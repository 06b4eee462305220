//! Derivation of the displayed subset of the directory.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::DirectoryError;
use crate::models::{Category, Group};

/// Category selector: everything, or exactly one category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn accepts(self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => wanted == category,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = DirectoryError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.is_empty() || value == "All" {
            return Ok(CategoryFilter::All);
        }
        value.parse().map(CategoryFilter::Only)
    }
}

impl TryFrom<String> for CategoryFilter {
    type Error = DirectoryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CategoryFilter> for String {
    fn from(filter: CategoryFilter) -> Self {
        filter.to_string()
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str("All"),
            CategoryFilter::Only(category) => write!(f, "{category}"),
        }
    }
}

/// Groups whose name or description contains `search` (ignoring case) and whose
/// category passes `category`, in the order given.
pub fn filter_groups<'a>(groups: &'a [Group], search: &str, category: CategoryFilter) -> Vec<&'a Group> {
    let needle = search.to_lowercase();
    groups
        .iter()
        .filter(|group| {
            needle.is_empty()
                || group.name.to_lowercase().contains(&needle)
                || group.description.to_lowercase().contains(&needle)
        })
        .filter(|group| category.accepts(group.category))
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::GroupId;

    fn group(id: &str, name: &str, description: &str, category: Category) -> Group {
        Group {
            id: GroupId::from(id),
            name: name.into(),
            description: description.into(),
            link: format!("https://chat.example/{id}"),
            category,
            members_count: 0,
            is_verified: false,
            created_at: 0,
        }
    }

    fn ids(groups: Vec<&Group>) -> Vec<&str> {
        groups.into_iter().map(|g| g.id.as_str()).collect()
    }

    fn sample() -> Vec<Group> {
        vec![
            group("1", "Rust Paris", "Systems programming", Category::Tech),
            group("2", "Memes", "Humour all day", Category::Fun),
            group("3", "Go Lyon", "Backend chat about RUST and go", Category::Tech),
        ]
    }

    #[test]
    fn category_keeps_relative_order() {
        let groups = sample();
        assert_eq!(ids(filter_groups(&groups, "", CategoryFilter::Only(Category::Tech))), vec!["1", "3"]);
    }

    #[test]
    fn search_matches_name_or_description_ignoring_case() {
        let groups = sample();
        assert_eq!(ids(filter_groups(&groups, "rust", CategoryFilter::All)), vec!["1", "3"]);
        assert_eq!(ids(filter_groups(&groups, "HUMOUR", CategoryFilter::All)), vec!["2"]);
        assert!(filter_groups(&groups, "cooking", CategoryFilter::All).is_empty());
    }

    #[test]
    fn empty_search_and_all_is_everything() {
        let groups = sample();
        assert_eq!(ids(filter_groups(&groups, "", CategoryFilter::All)), vec!["1", "2", "3"]);
    }

    #[test]
    fn predicates_are_anded() {
        let groups = sample();
        assert_eq!(ids(filter_groups(&groups, "rust", CategoryFilter::Only(Category::Fun))), Vec::<&str>::new());
        assert_eq!(ids(filter_groups(&groups, "go", CategoryFilter::Only(Category::Tech))), vec!["3"]);
    }

    #[test]
    fn single_category_is_subset_of_all() {
        let groups = sample();
        let all = filter_groups(&groups, "", CategoryFilter::All);
        for category in Category::ALL {
            let only = filter_groups(&groups, "", CategoryFilter::Only(category));
            assert!(only.iter().all(|g| g.category == category));
            assert!(only.iter().all(|g| all.contains(g)));
        }
    }

    #[test]
    fn unicode_case_folding() {
        let groups = vec![group("1", "ÉCOLE", "", Category::Education)];
        assert_eq!(ids(filter_groups(&groups, "école", CategoryFilter::All)), vec!["1"]);
    }

    #[test]
    fn filter_parses_all_and_categories() {
        assert_eq!("All".parse::<CategoryFilter>().unwrap(), CategoryFilter::All);
        assert_eq!("".parse::<CategoryFilter>().unwrap(), CategoryFilter::All);
        assert_eq!(
            "Sports".parse::<CategoryFilter>().unwrap(),
            CategoryFilter::Only(Category::Sports)
        );
        assert!("Everything".parse::<CategoryFilter>().is_err());
    }
}
