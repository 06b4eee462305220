use std::fmt;

use serde::{Deserialize, Serialize};

use super::category::Category;

/// Store-assigned identifier. Opaque to the directory and never reassigned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub String);

impl GroupId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for GroupId {
    fn from(id: &str) -> Self {
        GroupId(id.to_string())
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One community chat listed in the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    pub description: String,
    pub link: String,
    pub category: Category,
    pub members_count: u32,
    pub is_verified: bool,
    pub created_at: i64, // epoch millis, store-assigned
}

impl Group {
    pub fn fields(&self) -> GroupFields {
        GroupFields {
            name: self.name.clone(),
            description: self.description.clone(),
            link: self.link.clone(),
            category: self.category,
            members_count: self.members_count,
        }
    }

    pub(crate) fn apply(&mut self, patch: &GroupPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(link) = &patch.link {
            self.link = link.clone();
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(members_count) = patch.members_count {
            self.members_count = members_count;
        }
        if let Some(is_verified) = patch.is_verified {
            self.is_verified = is_verified;
        }
    }
}

/// User-editable part of a group: what the add/edit form produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupFields {
    pub name: String,
    pub description: String,
    pub link: String,
    pub category: Category,
    #[serde(default)]
    pub members_count: u32,
}

impl GroupFields {
    /// Names of the text fields that are blank. The store enforces the same rule.
    pub fn blank_fields(&self) -> Vec<&'static str> {
        [
            ("name", &self.name),
            ("description", &self.description),
            ("link", &self.link),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect()
    }
}

/// Partial update sent to the store. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub category: Option<Category>,
    pub members_count: Option<u32>,
    pub is_verified: Option<bool>,
}

impl GroupPatch {
    pub fn verified(value: bool) -> Self {
        GroupPatch {
            is_verified: Some(value),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == GroupPatch::default()
    }
}

impl From<GroupFields> for GroupPatch {
    fn from(fields: GroupFields) -> Self {
        GroupPatch {
            name: Some(fields.name),
            description: Some(fields.description),
            link: Some(fields.link),
            category: Some(fields.category),
            members_count: Some(fields.members_count),
            is_verified: None,
        }
    }
}
